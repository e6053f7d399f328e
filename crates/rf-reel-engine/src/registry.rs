//! Logic Registry — logic key → constructor plus optional typed capabilities
//!
//! Built once at startup through explicit, ordered calls, then frozen:
//!
//! ```rust,ignore
//! let mut builder = RegistryBuilder::new();
//! builder.register("tumble", TumbleGame::build)?;
//! builder.register_extension::<TumbleExt>("tumble")?;
//! let registry = builder.freeze();
//!
//! let logic = registry.build(setting, &handle)?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::GameSetting;
use crate::error::EngineError;
use crate::games::tumble::{TumbleCheckpoint, TumbleExt, TumbleGame};
use crate::games::ways::WaysGame;
use crate::logic::{Checkpoint, Extension, GameLogic};
use crate::runtime::RuntimeHandle;

/// Unique logic identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LogicKey(pub String);

impl LogicKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LogicKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LogicKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for LogicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Constructor bound to a logic key
pub type LogicBuilder =
    fn(Arc<GameSetting>, &RuntimeHandle) -> Result<Box<dyn GameLogic>, EngineError>;

/// Typed capability descriptor (extension or checkpoint type)
#[derive(Clone, Copy)]
pub struct Capability {
    type_name: &'static str,
    check: fn(&serde_json::Value) -> Result<(), serde_json::Error>,
}

impl Capability {
    fn of<T: serde::de::DeserializeOwned>() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            check: |value: &serde_json::Value| T::deserialize(value).map(|_| ()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl std::fmt::Debug for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Capability").field(&self.type_name).finish()
    }
}

/// Which optional capability slot of a logic entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Extension,
    Checkpoint,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Extension => "extension",
            Self::Checkpoint => "checkpoint",
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct LogicEntry {
    builder: LogicBuilder,
    extension: Option<Capability>,
    checkpoint: Option<Capability>,
}

/// Registry errors. All of them are fatal configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Logic already registered: {0}")]
    DuplicateKey(LogicKey),

    #[error("Logic not found: {0}")]
    UnknownKey(LogicKey),

    #[error("Logic {key} already has a bound {capability} type")]
    DuplicateCapability {
        key: LogicKey,
        capability: CapabilityKind,
    },

    #[error("Logic {key} has no bound {capability} type")]
    MissingCapability {
        key: LogicKey,
        capability: CapabilityKind,
    },

    #[error("Snapshot does not match {type_name}: {source}")]
    SnapshotMismatch {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to build logic {key}: {source}")]
    Build {
        key: LogicKey,
        #[source]
        source: EngineError,
    },
}

/// Mutable registry under construction
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<LogicKey, LogicEntry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a key to a constructor
    pub fn register(
        &mut self,
        key: impl Into<LogicKey>,
        builder: LogicBuilder,
    ) -> Result<&mut Self, RegistryError> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            log::error!("Duplicate logic registration: {}", key);
            return Err(RegistryError::DuplicateKey(key));
        }
        self.entries.insert(
            key,
            LogicEntry {
                builder,
                extension: None,
                checkpoint: None,
            },
        );
        Ok(self)
    }

    /// Bind the Ext type used for generic snapshot handling under `key`
    pub fn register_extension<E: Extension>(
        &mut self,
        key: impl Into<LogicKey>,
    ) -> Result<&mut Self, RegistryError> {
        self.bind(key.into(), CapabilityKind::Extension, Capability::of::<E>())
    }

    /// Bind the checkpoint type used for resume handling under `key`
    pub fn register_checkpoint<C: Checkpoint>(
        &mut self,
        key: impl Into<LogicKey>,
    ) -> Result<&mut Self, RegistryError> {
        self.bind(key.into(), CapabilityKind::Checkpoint, Capability::of::<C>())
    }

    fn bind(
        &mut self,
        key: LogicKey,
        capability: CapabilityKind,
        descriptor: Capability,
    ) -> Result<&mut Self, RegistryError> {
        let Some(entry) = self.entries.get_mut(&key) else {
            log::error!("Capability {} bound to unknown logic {}", capability, key);
            return Err(RegistryError::UnknownKey(key));
        };
        let slot = match capability {
            CapabilityKind::Extension => &mut entry.extension,
            CapabilityKind::Checkpoint => &mut entry.checkpoint,
        };
        if slot.is_some() {
            return Err(RegistryError::DuplicateCapability { key, capability });
        }
        *slot = Some(descriptor);
        Ok(self)
    }

    /// Finish construction; the result is read-only
    pub fn freeze(self) -> LogicRegistry {
        let mut keys: Vec<&LogicKey> = self.entries.keys().collect();
        keys.sort();
        log::info!("Logic registry frozen: {:?}", keys);
        LogicRegistry {
            entries: self.entries,
        }
    }
}

/// Frozen, immutable logic registry
#[derive(Debug)]
pub struct LogicRegistry {
    entries: HashMap<LogicKey, LogicEntry>,
}

impl LogicRegistry {
    /// Registry with every built-in variant
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut builder = RegistryBuilder::new();
        builder
            .register(TumbleGame::KEY, TumbleGame::build)?
            .register_extension::<TumbleExt>(TumbleGame::KEY)?
            .register_checkpoint::<TumbleCheckpoint>(TumbleGame::KEY)?;
        builder.register(WaysGame::KEY, WaysGame::build)?;
        Ok(builder.freeze())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&LogicKey::new(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<&LogicKey> {
        let mut keys: Vec<&LogicKey> = self.entries.keys().collect();
        keys.sort();
        keys
    }

    fn entry(&self, key: &str) -> Result<&LogicEntry, RegistryError> {
        self.entries
            .get(&LogicKey::new(key))
            .ok_or_else(|| RegistryError::UnknownKey(LogicKey::new(key)))
    }

    pub fn extension(&self, key: &str) -> Result<Option<Capability>, RegistryError> {
        Ok(self.entry(key)?.extension)
    }

    pub fn checkpoint(&self, key: &str) -> Result<Option<Capability>, RegistryError> {
        Ok(self.entry(key)?.checkpoint)
    }

    /// Construct the logic named by `setting.logic`
    pub fn build(
        &self,
        setting: Arc<GameSetting>,
        handle: &RuntimeHandle,
    ) -> Result<Box<dyn GameLogic>, RegistryError> {
        let entry = self.entry(&setting.logic)?;
        let key = LogicKey::new(setting.logic.as_str());
        (entry.builder)(setting, handle).map_err(|source| {
            log::error!("Logic {} rejected its setting: {}", key, source);
            RegistryError::Build { key, source }
        })
    }

    /// Check an Ext snapshot against the type bound under `key`
    pub fn check_extension(
        &self,
        key: &str,
        snapshot: &serde_json::Value,
    ) -> Result<(), RegistryError> {
        Self::check(key, CapabilityKind::Extension, self.extension(key)?, snapshot)
    }

    /// Check a checkpoint against the type bound under `key`
    pub fn check_checkpoint(
        &self,
        key: &str,
        snapshot: &serde_json::Value,
    ) -> Result<(), RegistryError> {
        Self::check(key, CapabilityKind::Checkpoint, self.checkpoint(key)?, snapshot)
    }

    fn check(
        key: &str,
        capability: CapabilityKind,
        descriptor: Option<Capability>,
        snapshot: &serde_json::Value,
    ) -> Result<(), RegistryError> {
        let descriptor = descriptor.ok_or_else(|| RegistryError::MissingCapability {
            key: LogicKey::new(key),
            capability,
        })?;
        (descriptor.check)(snapshot).map_err(|source| RegistryError::SnapshotMismatch {
            type_name: descriptor.type_name,
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_builder(
        _: Arc<GameSetting>,
        _: &RuntimeHandle,
    ) -> Result<Box<dyn GameLogic>, EngineError> {
        Err(EngineError::setting("x", "always fails"))
    }

    #[test]
    fn test_builtin_keys() {
        let registry = LogicRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("tumble"));
        assert!(registry.contains("ways"));
        assert!(registry.extension("tumble").unwrap().is_some());
        assert!(registry.checkpoint("tumble").unwrap().is_some());
        assert!(registry.extension("ways").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_key_is_fatal() {
        let mut builder = RegistryBuilder::new();
        builder.register("a", failing_builder).unwrap();
        assert!(matches!(
            builder.register("a", failing_builder),
            Err(RegistryError::DuplicateKey(k)) if k.as_str() == "a"
        ));
    }

    #[test]
    fn test_capability_needs_known_key() {
        let mut builder = RegistryBuilder::new();
        assert!(matches!(
            builder.register_extension::<TumbleExt>("missing"),
            Err(RegistryError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_capability_bound_once() {
        let mut builder = RegistryBuilder::new();
        builder
            .register("a", failing_builder)
            .unwrap()
            .register_checkpoint::<TumbleCheckpoint>("a")
            .unwrap();
        assert!(matches!(
            builder.register_checkpoint::<TumbleCheckpoint>("a"),
            Err(RegistryError::DuplicateCapability { .. })
        ));
    }

    #[test]
    fn test_capabilities_bind_separate_slots() {
        let mut builder = RegistryBuilder::new();
        builder
            .register("a", failing_builder)
            .unwrap()
            .register_checkpoint::<TumbleCheckpoint>("a")
            .unwrap()
            .register_extension::<TumbleExt>("a")
            .unwrap();
        let registry = builder.freeze();

        let ext = registry.extension("a").unwrap().unwrap();
        let checkpoint = registry.checkpoint("a").unwrap().unwrap();
        assert!(ext.type_name().ends_with("TumbleExt"));
        assert!(checkpoint.type_name().ends_with("TumbleCheckpoint"));
    }

    #[test]
    fn test_duplicate_capability_names_its_kind() {
        let mut builder = RegistryBuilder::new();
        builder
            .register("a", failing_builder)
            .unwrap()
            .register_extension::<TumbleExt>("a")
            .unwrap();
        let err = builder.register_extension::<TumbleExt>("a").unwrap_err();
        assert!(matches!(
            err,
            RegistryError::DuplicateCapability {
                capability: CapabilityKind::Extension,
                ..
            }
        ));
        assert_eq!(err.to_string(), "Logic a already has a bound extension type");
    }

    #[test]
    fn test_check_snapshots() {
        let registry = LogicRegistry::builtin().unwrap();
        let good = serde_json::json!({
            "scatter_count": 2,
            "scatter_positions": [0, 5],
            "triggered": false
        });
        assert!(registry.check_extension("tumble", &good).is_ok());
        let bad = serde_json::json!({ "scatter_count": "many" });
        assert!(matches!(
            registry.check_extension("tumble", &bad),
            Err(RegistryError::SnapshotMismatch { .. })
        ));
        assert!(matches!(
            registry.check_extension("ways", &good),
            Err(RegistryError::MissingCapability { .. })
        ));
    }
}

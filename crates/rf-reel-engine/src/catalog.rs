//! Game catalog by id and name

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::GameSetting;
use crate::error::EngineError;

/// Reference to a game by id or by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameRef {
    Id(u32),
    Name(String),
}

impl GameRef {
    /// Numeric strings become ids, anything else a name
    pub fn parse(s: &str) -> Self {
        match s.parse::<u32>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(s.to_string()),
        }
    }
}

impl From<u32> for GameRef {
    fn from(id: u32) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for GameRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl std::fmt::Display for GameRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "#{id}"),
            Self::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Catalog errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Recoverable: the request fails, nothing else is affected
    #[error("Unknown game: {0}")]
    UnknownGame(GameRef),

    #[error("Duplicate game id: {0}")]
    DuplicateId(u32),

    #[error("Duplicate game name: {0}")]
    DuplicateName(String),

    #[error("Failed to load {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: EngineError,
    },
}

/// Immutable index of game settings by id and name
#[derive(Debug, Default)]
pub struct GameCatalog {
    by_id: HashMap<u32, Arc<GameSetting>>,
    by_name: HashMap<String, u32>,
}

impl GameCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-decoded settings
    pub fn from_settings(
        settings: impl IntoIterator<Item = GameSetting>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for setting in settings {
            catalog.insert(setting)?;
        }
        Ok(catalog)
    }

    /// Load every `.yaml`, `.yml` and `.json` file given; directories are
    /// scanned one level deep
    pub fn load_paths(paths: &[PathBuf]) -> Result<Self, CatalogError> {
        let mut files = Vec::new();
        for path in paths {
            if path.is_dir() {
                let entries = std::fs::read_dir(path).map_err(|e| CatalogError::Load {
                    path: path.clone(),
                    source: e.into(),
                })?;
                let mut found: Vec<PathBuf> = entries
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| is_setting_file(p))
                    .collect();
                found.sort();
                files.extend(found);
            } else {
                files.push(path.clone());
            }
        }

        let mut catalog = Self::new();
        for file in files {
            let setting = GameSetting::from_path(&file).map_err(|source| {
                log::error!("Game setting {} rejected: {}", file.display(), source);
                CatalogError::Load {
                    path: file.clone(),
                    source,
                }
            })?;
            catalog.insert(setting)?;
        }

        log::info!("Game catalog loaded: {} game(s)", catalog.len());
        Ok(catalog)
    }

    /// Add a setting; ids and names must be unique
    pub fn insert(&mut self, setting: GameSetting) -> Result<(), CatalogError> {
        if self.by_id.contains_key(&setting.id) {
            return Err(CatalogError::DuplicateId(setting.id));
        }
        if self.by_name.contains_key(&setting.name) {
            return Err(CatalogError::DuplicateName(setting.name));
        }
        self.by_name.insert(setting.name.clone(), setting.id);
        self.by_id.insert(setting.id, Arc::new(setting));
        Ok(())
    }

    /// Resolve a game reference
    pub fn resolve(&self, game: &GameRef) -> Result<Arc<GameSetting>, CatalogError> {
        let found = match game {
            GameRef::Id(id) => self.by_id.get(id),
            GameRef::Name(name) => self.by_name.get(name).and_then(|id| self.by_id.get(id)),
        };
        found.cloned().ok_or_else(|| {
            log::warn!("Game lookup failed: {}", game);
            CatalogError::UnknownGame(game.clone())
        })
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// All game ids, sorted
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

fn is_setting_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

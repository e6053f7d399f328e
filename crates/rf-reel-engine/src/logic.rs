//! Game logic capability and per-spin extension state

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::EngineError;
use crate::runtime::{BetRequest, RunMode, RuntimeHandle};
use crate::spin::SpinResult;

/// The one capability a game variant exposes
pub trait GameLogic: Send {
    /// Registry key this instance was built under
    fn key(&self) -> &str;

    /// Run one complete spin
    fn get_result(
        &mut self,
        request: &BetRequest,
        handle: &mut RuntimeHandle,
    ) -> Result<SpinResult, EngineError>;
}

/// Variant-specific per-spin state (Ext)
pub trait Extension: Serialize + DeserializeOwned + Send + 'static {
    /// Restore the baseline; calling twice is the same as calling once
    fn reset(&mut self);

    /// Immutable copy for audit, `None` in throughput mode
    fn snapshot(&self, mode: RunMode) -> Option<serde_json::Value> {
        snapshot_value(self, mode)
    }
}

/// Resume point a variant records when a mode finishes
pub trait Checkpoint: Serialize + DeserializeOwned + Send + 'static {
    fn snapshot(&self, mode: RunMode) -> Option<serde_json::Value> {
        snapshot_value(self, mode)
    }
}

fn snapshot_value<T: Serialize>(value: &T, mode: RunMode) -> Option<serde_json::Value> {
    if !mode.is_audit() {
        return None;
    }
    match serde_json::to_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            log::warn!("Snapshot serialization failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Counter {
        hits: u32,
    }

    impl Extension for Counter {
        fn reset(&mut self) {
            self.hits = 0;
        }
    }

    #[test]
    fn test_snapshot_only_in_audit() {
        let ext = Counter { hits: 3 };
        assert!(ext.snapshot(RunMode::Throughput).is_none());
        assert_eq!(ext.snapshot(RunMode::Audit).unwrap()["hits"], 3);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut ext = Counter { hits: 5 };
        ext.reset();
        ext.reset();
        assert_eq!(ext.hits, 0);
    }
}

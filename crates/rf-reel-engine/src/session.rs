//! Per-worker spin session
//!
//! Owns the runtime handle and one logic instance per game id, built lazily
//! through the frozen registry. A failed request leaves the session usable.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{CatalogError, GameCatalog};
use crate::error::EngineError;
use crate::logic::GameLogic;
use crate::registry::{LogicRegistry, RegistryError};
use crate::runtime::{BetRequest, RunMode, RuntimeHandle};
use crate::spin::SpinResult;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl SessionError {
    /// Recoverable request failure (unknown game)
    pub fn is_warn(&self) -> bool {
        matches!(self, Self::Catalog(CatalogError::UnknownGame(_)))
    }
}

pub struct SpinSession {
    registry: Arc<LogicRegistry>,
    catalog: Arc<GameCatalog>,
    handle: RuntimeHandle,
    logics: HashMap<u32, Box<dyn GameLogic>>,
}

impl SpinSession {
    pub fn new(
        registry: Arc<LogicRegistry>,
        catalog: Arc<GameCatalog>,
        handle: RuntimeHandle,
    ) -> Self {
        Self {
            registry,
            catalog,
            handle,
            logics: HashMap::new(),
        }
    }

    pub fn run_mode(&self) -> RunMode {
        self.handle.mode()
    }

    /// Number of logic instances built so far
    pub fn built(&self) -> usize {
        self.logics.len()
    }

    /// Serve one spin request
    pub fn spin(&mut self, request: &BetRequest) -> Result<SpinResult, SessionError> {
        let setting = self.catalog.resolve(&request.game)?;
        let id = setting.id;

        if !self.logics.contains_key(&id) {
            let logic = self.registry.build(setting, &self.handle)?;
            log::debug!("Built logic '{}' for game #{}", logic.key(), id);
            self.logics.insert(id, logic);
        }

        let Some(logic) = self.logics.get_mut(&id) else {
            return Err(CatalogError::UnknownGame(request.game.clone()).into());
        };
        Ok(logic.get_result(request, &mut self.handle)?)
    }
}

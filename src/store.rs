use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::EmailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound(String),
    Conflict(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(code) => write!(f, "no configuration for {code}"),
            StoreError::Conflict(code) => write!(f, "configuration for {code} already exists"),
        }
    }
}

impl std::error::Error for StoreError {}

/// In-memory email configurations keyed by organization code.
///
/// Each mutation runs its existence check and write under one write guard.
/// Listing returns codes only, in ascending order.
#[derive(Debug, Default)]
pub struct ConfigStore {
    configs: RwLock<BTreeMap<String, EmailConfig>>,
}

impl ConfigStore {
    /// Build a store pre-populated with the startup seed.
    pub fn seeded(seed: BTreeMap<String, EmailConfig>) -> Self {
        Self {
            configs: RwLock::new(seed),
        }
    }

    pub fn get(&self, code: &str) -> Result<EmailConfig, StoreError> {
        self.read()
            .get(code)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    pub fn create(&self, code: &str, config: EmailConfig) -> Result<(), StoreError> {
        let mut configs = self.write();
        if configs.contains_key(code) {
            return Err(StoreError::Conflict(code.to_string()));
        }
        configs.insert(code.to_string(), config);
        Ok(())
    }

    pub fn update(&self, code: &str, config: EmailConfig) -> Result<(), StoreError> {
        let mut configs = self.write();
        let slot = configs
            .get_mut(code)
            .ok_or_else(|| StoreError::NotFound(code.to_string()))?;
        *slot = config;
        Ok(())
    }

    pub fn delete(&self, code: &str) -> Result<(), StoreError> {
        self.write()
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    pub fn list(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    // Writes are single map operations, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, EmailConfig>> {
        self.configs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, EmailConfig>> {
        self.configs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

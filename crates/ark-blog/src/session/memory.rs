//! In-memory session store

use std::collections::HashMap;
use std::sync::RwLock;

use super::SessionStore;
use crate::error::{Error, Result};

/// Session store that lives as long as the process
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slots: RwLock<HashMap<String, String>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| Error::Session("lock poisoned".to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| Error::Session("lock poisoned".to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| Error::Session("lock poisoned".to_string()))?;
        slots.remove(key);
        Ok(())
    }
}

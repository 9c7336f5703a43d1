//! # Collaborator traits
//!
//! The widget talks to two outside systems: the record store that persists a
//! response, and a durable per-device flag store that remembers whether this
//! client already answered for a period. Both are traits so the browser,
//! the backend tests and the widget tests can each plug in their own.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::{ResponseRecord, SurveyError};

/// Remote storage for submitted responses
///
/// Implementations must report a store-side refusal as
/// [`SurveyError::InsertRejected`] and transport problems as
/// [`SurveyError::InsertFailed`]; the caller keeps the selection either way.
#[async_trait(?Send)]
pub trait RecordStore {
    async fn insert_response(&self, record: &ResponseRecord) -> Result<(), SurveyError>;
}

/// Durable key-value flags scoped to this client
pub trait GuardStore {
    /// Presence check for `key`
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), SurveyError>;
}

/// In-process guard store, mainly for tests and non-browser hosts
#[derive(Debug, Clone, Default)]
pub struct MemoryGuardStore {
    values: HashMap<String, String>,
}

impl MemoryGuardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GuardStore for MemoryGuardStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SurveyError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

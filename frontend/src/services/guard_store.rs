use gloo::storage::{LocalStorage, Storage};
use shared::{GuardStore, SurveyError};

/// Per-browser "already submitted" flags kept in `window.localStorage`.
///
/// Values are written raw (not JSON encoded) so flags set by older builds,
/// which stored the string `true`, are still recognised.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageGuardStore;

impl GuardStore for LocalStorageGuardStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SurveyError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|e| SurveyError::GuardStore(format!("{:?}", e)))
    }
}

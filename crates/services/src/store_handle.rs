use std::sync::{Arc, OnceLock};

use crate::error::StoreError;
use crate::progress_store::ProgressStore;

/// Shared handle consumers hold instead of reaching for a global store.
///
/// The handle is created empty and filled exactly once at startup. Reading it
/// before that is a wiring mistake and fails fast with
/// `StoreError::NotInitialized`.
#[derive(Clone, Default)]
pub struct StoreHandle {
    inner: Arc<OnceLock<Arc<ProgressStore>>>,
}

impl StoreHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the store.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::AlreadyInitialized` on a second call.
    pub fn install(&self, store: Arc<ProgressStore>) -> Result<(), StoreError> {
        self.inner
            .set(store)
            .map_err(|_| StoreError::AlreadyInitialized)
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotInitialized` if `install` has not run.
    pub fn get(&self) -> Result<Arc<ProgressStore>, StoreError> {
        self.inner
            .get()
            .map(Arc::clone)
            .ok_or(StoreError::NotInitialized)
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.get().is_some()
    }
}

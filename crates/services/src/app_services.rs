use std::sync::Arc;

use realms_core::Catalog;
use storage::repository::{SnapshotRepository, Storage};
use tracing::info;

use crate::Clock;
use crate::error::{AppServicesError, StoreError};
use crate::progress_store::ProgressStore;
use crate::store_handle::StoreHandle;

/// Assembles the catalog, the backing storage and the progress store.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<Catalog>,
    snapshots: SnapshotRepository,
    handle: StoreHandle,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage or catalog initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::bootstrap(storage, clock).await
    }

    /// Build services over a volatile in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog fails validation.
    pub async fn in_memory(clock: Clock) -> Result<Self, AppServicesError> {
        Self::bootstrap(Storage::in_memory(), clock).await
    }

    /// Load the saved snapshot from `storage` and install the progress store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog fails validation.
    pub async fn bootstrap(storage: Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(Catalog::builtin()?);
        let snapshots = storage.snapshots();
        let store = ProgressStore::load(Arc::clone(&catalog), snapshots.clone(), clock).await;

        let handle = StoreHandle::new();
        handle.install(Arc::new(store))?;
        info!(realms = catalog.realms().len(), "app services ready");

        Ok(Self {
            catalog,
            snapshots,
            handle,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Direct access to the persisted snapshot, bypassing the store.
    #[must_use]
    pub fn snapshots(&self) -> &SnapshotRepository {
        &self.snapshots
    }

    #[must_use]
    pub fn handle(&self) -> StoreHandle {
        self.handle.clone()
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotInitialized` if bootstrap did not install a store.
    pub fn store(&self) -> Result<Arc<ProgressStore>, StoreError> {
        self.handle.get()
    }
}

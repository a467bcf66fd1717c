//! A store paired with the lock that serializes its writers.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use super::{Store, StoreError};

/// A [`Store`] shared between handlers.
///
/// Plain reads go straight to the store. Any read-modify-write must go
/// through [`SharedStore::lock`], which hands out a [`StoreGuard`] that
/// keeps other writers out until it is dropped.
pub struct SharedStore<T> {
    store: Arc<dyn Store<T>>,
    lock: Mutex<()>,
}

impl<T> SharedStore<T> {
    #[must_use]
    pub fn new(store: Arc<dyn Store<T>>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Read every record without taking the write lock.
    ///
    /// # Errors
    ///
    /// Returns the underlying store error.
    pub async fn read(&self) -> Result<Vec<T>, StoreError> {
        self.store.read().await
    }

    /// Wait for exclusive write access.
    pub async fn lock(&self) -> StoreGuard<'_, T> {
        StoreGuard {
            store: self.store.as_ref(),
            _guard: self.lock.lock().await,
        }
    }
}

/// Exclusive access to a [`SharedStore`]. Released on drop.
pub struct StoreGuard<'a, T> {
    store: &'a dyn Store<T>,
    _guard: MutexGuard<'a, ()>,
}

impl<T> StoreGuard<'_, T> {
    /// # Errors
    ///
    /// Returns the underlying store error.
    pub async fn read(&self) -> Result<Vec<T>, StoreError> {
        self.store.read().await
    }

    /// # Errors
    ///
    /// Returns the underlying store error.
    pub async fn write(&self, records: &[T]) -> Result<(), StoreError> {
        self.store.write(records).await
    }
}

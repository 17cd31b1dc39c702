//! Async storage seam for the parcel service.
//!
//! Implementations share the store semantics: `get` fails with
//! [`Error::NotFound`] on a miss, updates and deletes on a miss succeed without
//! effect.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use futures::lock::Mutex;

use crate::error::{Error, Result};
use crate::parcel::{Parcel, ParcelStatus};
use crate::store::ParcelStore;

#[async_trait]
pub trait ParcelRepository: Send + Sync {
    /// Store a parcel and return its assigned number.
    async fn add(&self, parcel: &Parcel) -> Result<i64>;

    async fn get(&self, number: i64) -> Result<Parcel>;

    async fn set_address(&self, number: i64, address: &str) -> Result<()>;

    async fn set_status(&self, number: i64, status: ParcelStatus) -> Result<()>;

    async fn delete(&self, number: i64) -> Result<()>;

    async fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>>;
}

/// [`ParcelStore`] shared between async callers.
#[derive(Clone)]
pub struct SqliteRepository {
    store: Arc<Mutex<ParcelStore>>,
}

impl SqliteRepository {
    pub fn new(store: ParcelStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }
}

#[async_trait]
impl ParcelRepository for SqliteRepository {
    async fn add(&self, parcel: &Parcel) -> Result<i64> {
        self.store.lock().await.add(parcel)
    }

    async fn get(&self, number: i64) -> Result<Parcel> {
        self.store.lock().await.get(number)
    }

    async fn set_address(&self, number: i64, address: &str) -> Result<()> {
        self.store.lock().await.set_address(number, address)
    }

    async fn set_status(&self, number: i64, status: ParcelStatus) -> Result<()> {
        self.store.lock().await.set_status(number, status)
    }

    async fn delete(&self, number: i64) -> Result<()> {
        self.store.lock().await.delete(number)
    }

    async fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>> {
        self.store.lock().await.get_by_client(client)
    }
}

/// In-memory repository for tests and dry runs.
pub struct MemoryRepository {
    parcels: RwLock<BTreeMap<i64, Parcel>>,
    last_number: AtomicI64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            parcels: RwLock::new(BTreeMap::new()),
            last_number: AtomicI64::new(0),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<i64, Parcel>> {
        self.parcels.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<i64, Parcel>> {
        self.parcels.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ParcelRepository for MemoryRepository {
    async fn add(&self, parcel: &Parcel) -> Result<i64> {
        let number = self.last_number.fetch_add(1, Ordering::SeqCst) + 1;
        self.write()
            .insert(number, parcel.clone().with_number(number));
        Ok(number)
    }

    async fn get(&self, number: i64) -> Result<Parcel> {
        self.read()
            .get(&number)
            .cloned()
            .ok_or(Error::NotFound(number))
    }

    async fn set_address(&self, number: i64, address: &str) -> Result<()> {
        if let Some(parcel) = self.write().get_mut(&number) {
            parcel.address = address.to_string();
        }
        Ok(())
    }

    async fn set_status(&self, number: i64, status: ParcelStatus) -> Result<()> {
        if let Some(parcel) = self.write().get_mut(&number) {
            parcel.status = status;
        }
        Ok(())
    }

    async fn delete(&self, number: i64) -> Result<()> {
        self.write().remove(&number);
        Ok(())
    }

    async fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>> {
        Ok(self
            .read()
            .values()
            .filter(|p| p.client == client)
            .cloned()
            .collect())
    }
}

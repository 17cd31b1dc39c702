use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use parcel_tracker::{Error, Parcel, ParcelStatus, ParcelStore, Result, StoreConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::NamedTempFile;

// Helper function to build an unsaved parcel
fn test_parcel() -> Parcel {
    Parcel::new(1000, "test")
}

// Helper function to create an in-memory store for testing
fn create_test_store() -> Result<ParcelStore> {
    ParcelStore::open_in_memory()
}

// Helper function to create a temporary file-based store
fn create_temp_store() -> Result<(ParcelStore, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let store = ParcelStore::open(&StoreConfig::new(temp_file.path()))?;
    Ok((store, temp_file))
}

// Seeded per run so client ids differ between runs of a shared database
fn test_rng() -> StdRng {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() ^ u64::from(d.subsec_nanos()))
        .unwrap_or_default();
    StdRng::seed_from_u64(seed)
}

#[tokio::test]
async fn test_add_get_delete() {
    test_add_get_delete_impl().unwrap();
}

fn test_add_get_delete_impl() -> Result<()> {
    let store = create_test_store()?;
    let mut parcel = test_parcel();

    let number = store.add(&parcel)?;
    let stored = store.get(number)?;

    parcel.number = number;
    assert_eq!(stored, parcel);

    store.delete(number)?;

    let err = store.get(number).unwrap_err();
    assert!(matches!(err, Error::NotFound(n) if n == number));
    Ok(())
}

#[test]
fn test_set_address() -> Result<()> {
    let store = create_test_store()?;
    let parcel = test_parcel();
    let number = store.add(&parcel)?;

    let new_address = "new test address";
    store.set_address(number, new_address)?;

    let stored = store.get(number)?;
    assert_eq!(stored.address, new_address);
    assert_eq!(stored.client, parcel.client);
    assert_eq!(stored.status, parcel.status);
    assert_eq!(stored.created_at, parcel.created_at);
    Ok(())
}

#[test]
fn test_set_status() -> Result<()> {
    let store = create_test_store()?;
    let parcel = test_parcel();
    let number = store.add(&parcel)?;

    store.set_status(number, ParcelStatus::Sent)?;

    let stored = store.get(number)?;
    assert_eq!(stored.status, ParcelStatus::Sent);
    assert_eq!(stored.address, parcel.address);
    assert_eq!(stored.client, parcel.client);
    assert_eq!(stored.created_at, parcel.created_at);
    Ok(())
}

#[test]
fn test_get_by_client() -> Result<()> {
    let (store, _temp_file) = create_temp_store()?;
    let mut rng = test_rng();

    let client: i64 = rng.gen_range(0..10_000_000);
    let other_client = client + 1;

    let mut expected = HashMap::new();
    for address in ["first", "second", "third"] {
        let parcel = Parcel::new(client, address);
        let number = store.add(&parcel)?;
        expected.insert(number, parcel.with_number(number));
    }
    store.add(&Parcel::new(other_client, "elsewhere"))?;

    let stored = store.get_by_client(client)?;
    assert_eq!(stored.len(), expected.len());
    for parcel in &stored {
        assert_eq!(expected.get(&parcel.number), Some(parcel));
    }
    Ok(())
}

#[test]
fn test_get_by_client_without_parcels() -> Result<()> {
    let store = create_test_store()?;
    store.add(&test_parcel())?;
    assert!(store.get_by_client(-1)?.is_empty());
    Ok(())
}

#[test]
fn test_file_store_survives_reopen() -> Result<()> {
    let (store, temp_file) = create_temp_store()?;
    let number = store.add(&test_parcel())?;
    store.set_status(number, ParcelStatus::Delivered)?;
    drop(store);

    let reopened = ParcelStore::open(&StoreConfig::new(temp_file.path()))?;
    let parcel = reopened.get(number)?;
    assert_eq!(parcel.status, ParcelStatus::Delivered);
    assert_eq!(parcel.address, "test");
    Ok(())
}

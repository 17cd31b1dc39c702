use rusqlite::{named_params, params, Connection, Row};
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::parcel::{Parcel, ParcelStatus};
use crate::schema::tracker_schema;

const SELECT_PARCEL: &str = "SELECT number, client, status, address, created_at FROM parcel";

/// Blocking data-access object for the `parcel` table.
///
/// Updates and deletes do not check that the row exists; a miss is a successful no-op.
#[derive(Debug)]
pub struct ParcelStore {
    conn: Connection,
}

impl ParcelStore {
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::from_connection(config.open()?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Wrap an existing connection, creating the parcel table if needed.
    pub fn from_connection(conn: Connection) -> Result<Self> {
        tracker_schema().apply(&conn)?;
        info!("parcel store ready");
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a parcel and return its newly assigned number.
    pub fn add(&self, parcel: &Parcel) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO parcel (client, status, address, created_at) \
             VALUES (:client, :status, :address, :created_at)",
            named_params! {
                ":client": parcel.client,
                ":status": parcel.status,
                ":address": parcel.address,
                ":created_at": parcel.created_at,
            },
        )?;
        let number = self.conn.last_insert_rowid();
        debug!(number, client = parcel.client, "parcel added");
        Ok(number)
    }

    pub fn get(&self, number: i64) -> Result<Parcel> {
        self.conn
            .query_row(
                &format!("{SELECT_PARCEL} WHERE number = ?1"),
                [number],
                parcel_from_row,
            )
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => Error::NotFound(number),
                other => Error::Sqlite(other),
            })
    }

    pub fn set_address(&self, number: i64, address: &str) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET address = ?1 WHERE number = ?2",
            params![address, number],
        )?;
        debug!(number, changed, "parcel address set");
        Ok(())
    }

    pub fn set_status(&self, number: i64, status: ParcelStatus) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE parcel SET status = ?1 WHERE number = ?2",
            params![status, number],
        )?;
        debug!(number, %status, changed, "parcel status set");
        Ok(())
    }

    pub fn delete(&self, number: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM parcel WHERE number = ?1", [number])?;
        debug!(number, changed, "parcel deleted");
        Ok(())
    }

    /// All parcels of `client`, in ascending number order.
    pub fn get_by_client(&self, client: i64) -> Result<Vec<Parcel>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{SELECT_PARCEL} WHERE client = ?1 ORDER BY number"))?;
        let parcels = stmt
            .query_map([client], parcel_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(client, count = parcels.len(), "parcels listed");
        Ok(parcels)
    }
}

fn parcel_from_row(row: &Row<'_>) -> rusqlite::Result<Parcel> {
    Ok(Parcel {
        number: row.get(0)?,
        client: row.get(1)?,
        status: row.get(2)?,
        address: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_parcel() -> Parcel {
        Parcel {
            number: 0,
            client: 1000,
            status: ParcelStatus::Registered,
            address: "test".to_string(),
            created_at: "2024-05-01T10:00:00Z".to_string(),
        }
    }

    #[test]
    fn numbers_are_not_reused_after_delete() -> Result<()> {
        let store = ParcelStore::open_in_memory()?;
        let first = store.add(&test_parcel())?;
        store.delete(first)?;
        let second = store.add(&test_parcel())?;
        assert!(second > first);
        Ok(())
    }

    #[test]
    fn updates_on_missing_parcel_are_noops() -> Result<()> {
        let store = ParcelStore::open_in_memory()?;
        store.set_address(42, "nowhere")?;
        store.set_status(42, ParcelStatus::Sent)?;
        store.delete(42)?;
        assert!(store.get(42).unwrap_err().is_not_found());
        Ok(())
    }

    #[test]
    fn unknown_status_in_row_is_a_conversion_error() -> Result<()> {
        let store = ParcelStore::open_in_memory()?;
        store.connection().execute(
            "INSERT INTO parcel (client, status, address, created_at) VALUES (1, 'lost', 'x', 'y')",
            [],
        )?;
        let number = store.connection().last_insert_rowid();
        let err = store.get(number).unwrap_err();
        assert!(matches!(
            err,
            Error::Sqlite(rusqlite::Error::FromSqlConversionFailure(..))
        ));
        Ok(())
    }

    #[test]
    fn number_on_insert_is_ignored() -> Result<()> {
        let store = ParcelStore::open_in_memory()?;
        let number = store.add(&test_parcel().with_number(777))?;
        assert_ne!(number, 777);
        assert!(store.get(777).unwrap_err().is_not_found());
        Ok(())
    }
}

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::parcel::{Parcel, ParcelStatus};
use crate::repository::ParcelRepository;

/// Parcel lifecycle on top of a repository.
///
/// Status only moves forward (`registered -> sent -> delivered`), and address
/// changes or removal are allowed only while a parcel is still registered.
pub struct ParcelService<R> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Store a new registered parcel and return it with its number.
    pub async fn register(&self, client: i64, address: &str) -> Result<Parcel> {
        let parcel = Parcel::new(client, address);
        let number = self.repo.add(&parcel).await?;
        info!(number, client, "parcel registered");
        Ok(parcel.with_number(number))
    }

    pub async fn get(&self, number: i64) -> Result<Parcel> {
        self.repo.get(number).await
    }

    pub async fn client_parcels(&self, client: i64) -> Result<Vec<Parcel>> {
        self.repo.get_by_client(client).await
    }

    /// Advance the parcel to its next status and return the resulting status.
    ///
    /// A delivered parcel is left untouched.
    pub async fn next_status(&self, number: i64) -> Result<ParcelStatus> {
        let parcel = self.repo.get(number).await?;
        match parcel.status.next() {
            Some(next) => {
                self.repo.set_status(number, next).await?;
                info!(number, from = %parcel.status, to = %next, "parcel status advanced");
                Ok(next)
            }
            None => Ok(parcel.status),
        }
    }

    pub async fn change_address(&self, number: i64, address: &str) -> Result<()> {
        self.ensure_registered(number).await?;
        self.repo.set_address(number, address).await
    }

    pub async fn delete(&self, number: i64) -> Result<()> {
        self.ensure_registered(number).await?;
        self.repo.delete(number).await?;
        info!(number, "parcel deleted");
        Ok(())
    }

    async fn ensure_registered(&self, number: i64) -> Result<()> {
        let parcel = self.repo.get(number).await?;
        if parcel.status != ParcelStatus::Registered {
            warn!(number, status = %parcel.status, "parcel is no longer registered");
            return Err(Error::NotRegistered {
                number,
                status: parcel.status,
            });
        }
        Ok(())
    }
}

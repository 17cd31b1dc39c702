use thiserror::Error;

use crate::parcel::ParcelStatus;

/// Errors returned by the parcel store, repositories and service.
#[derive(Error, Debug)]
pub enum Error {
    /// No parcel row with this number.
    #[error("parcel not found: {0}")]
    NotFound(i64),

    /// The operation is only allowed while the parcel is registered.
    #[error("parcel {number} is {status}, expected registered")]
    NotRegistered { number: i64, status: ParcelStatus },

    #[error("invalid parcel status: {0:?}")]
    InvalidStatus(String),

    /// Any other SQLite failure, kept as-is.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for the "no rows" condition of a lookup by number.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! SQLite-backed parcel tracking.
//!
//! # Intention
//!
//! - Persist parcels (client, status, address, creation time) in a single SQLite table.
//! - Expose the store both as a blocking [`ParcelStore`] and behind the async
//!   [`ParcelRepository`] seam used by [`ParcelService`].
//!
//! # Architectural Boundaries
//!
//! - The store maps records to rows and nothing else: no status validation.
//! - Lifecycle rules (which status follows which, when an address may change)
//!   belong to the service.

pub mod config;
pub mod error;
pub mod parcel;
pub mod repository;
pub mod schema;
pub mod service;
pub mod store;

pub use config::{JournalMode, StoreConfig};
pub use error::{Error, Result};
pub use parcel::{Parcel, ParcelStatus};
pub use repository::{MemoryRepository, ParcelRepository, SqliteRepository};
pub use service::ParcelService;
pub use store::ParcelStore;

// Service exports
pub mod board;
pub mod geocoding;
pub mod memory;
pub mod postgres;
pub mod store;

pub use board::{BoardError, JobBoard};
pub use geocoding::{Geocoded, Geocoder, GeocodingError, MapboxGeocoder, UnresolvedReason};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use store::{ApplicationFilter, JobFilter, JobOrder, JobStore, StoreError};

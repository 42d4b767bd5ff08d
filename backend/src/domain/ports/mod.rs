//! Driven ports: interfaces the core expects its collaborators to satisfy.
//!
//! The data-access layer lives behind these traits. HTTP handler tests (and
//! the default wiring) substitute the in-memory adapters from
//! [`crate::outbound::memory`] instead of a database.

mod account_repository;
mod record_store;

pub use account_repository::AccountRepository;
pub use record_store::{RecordStore, StoreError};

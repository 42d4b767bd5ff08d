//! Data-access port for generic dispatcher resources.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::ApiError;
use crate::domain::Record;

/// Failure inside a data-access collaborator.
///
/// The dispatcher treats these as unexpected faults: they surface as the
/// generic error code, never as business outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store failed or returned something unusable.
    #[error("data access failure: {0}")]
    Backend(String),
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError::unhandled(value)
    }
}

/// Record collection a dispatcher endpoint operates on.
///
/// Implementations own ordering: `all` must return records in the order the
/// resource's list endpoint should present them. Identifier assignment on
/// insert is also the store's business.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record, in presentation order.
    async fn all(&self) -> Result<Vec<Record>, StoreError>;
    /// One record by identifier; `None` is an ordinary outcome.
    async fn find(&self, id: &str) -> Result<Option<Record>, StoreError>;
    /// Persist a new record, assigning its identifier.
    async fn insert(&self, record: Record) -> Result<Record, StoreError>;
    /// Persist changes to an existing record.
    async fn save(&self, record: Record) -> Result<Record, StoreError>;
    /// Remove a record; removing a missing record is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

//! Data-access port for account lookup and persistence.

use async_trait::async_trait;

use crate::domain::ports::StoreError;
use crate::domain::Account;

/// Identity collaborator used by the token service, the login flow, and the
/// account-management resource.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Account by identifier (token subject lookup).
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError>;
    /// Account by unique login name.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
    /// Every account, in presentation order.
    async fn list(&self) -> Result<Vec<Account>, StoreError>;
    /// Persist a new account, assigning its identifier when empty.
    async fn insert(&self, account: Account) -> Result<Account, StoreError>;
    /// Persist changes to an existing account.
    async fn save(&self, account: Account) -> Result<Account, StoreError>;
    /// Remove an account; removing a missing account is not an error.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

//! In-memory port implementations.
//!
//! Default wiring and test fixture in one: insertion order is presentation
//! order, and identifier assignment uses UUIDs. A real deployment replaces
//! these with database-backed adapters behind the same ports.

use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::contract::ID_FIELD;
use crate::domain::ports::{AccountRepository, RecordStore, StoreError};
use crate::domain::{Account, Record};

fn poisoned(_: impl std::fmt::Debug) -> StoreError {
    StoreError::Backend("memory store lock poisoned".to_owned())
}

fn record_id(record: &Record) -> Option<&str> {
    record.get(ID_FIELD).and_then(Value::as_str)
}

/// Generic in-memory record collection.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<Record>>,
}

impl MemoryRecordStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with records; missing identifiers are assigned.
    #[must_use]
    pub fn with_records(records: Vec<Record>) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                if record_id(&record).is_none() {
                    record.insert(
                        ID_FIELD.to_owned(),
                        Value::String(Uuid::new_v4().to_string()),
                    );
                }
                record
            })
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn all(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self.records.read().map_err(poisoned)?.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self
            .records
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|record| record_id(record) == Some(id))
            .cloned())
    }

    async fn insert(&self, mut record: Record) -> Result<Record, StoreError> {
        if record_id(&record).is_none() {
            record.insert(
                ID_FIELD.to_owned(),
                Value::String(Uuid::new_v4().to_string()),
            );
        }
        self.records.write().map_err(poisoned)?.push(record.clone());
        Ok(record)
    }

    async fn save(&self, record: Record) -> Result<Record, StoreError> {
        let id = record_id(&record)
            .ok_or_else(|| StoreError::Backend("cannot save a record without an id".to_owned()))?
            .to_owned();
        let mut records = self.records.write().map_err(poisoned)?;
        let slot = records
            .iter_mut()
            .find(|candidate| record_id(candidate) == Some(id.as_str()))
            .ok_or_else(|| StoreError::Backend(format!("record {id} vanished during save")))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.records
            .write()
            .map_err(poisoned)?
            .retain(|record| record_id(record) != Some(id));
        Ok(())
    }
}

/// In-memory account collection.
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: RwLock<Vec<Account>>,
}

impl MemoryAccountRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for MemoryAccountRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|account| account.id == id)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.read().map_err(poisoned)?.clone())
    }

    async fn insert(&self, mut account: Account) -> Result<Account, StoreError> {
        if account.id.is_empty() {
            account.id = Uuid::new_v4().to_string();
        }
        self.accounts
            .write()
            .map_err(poisoned)?
            .push(account.clone());
        Ok(account)
    }

    async fn save(&self, account: Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().map_err(poisoned)?;
        let slot = accounts
            .iter_mut()
            .find(|candidate| candidate.id == account.id)
            .ok_or_else(|| {
                StoreError::Backend(format!("account {} vanished during save", account.id))
            })?;
        *slot = account.clone();
        Ok(account)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.accounts
            .write()
            .map_err(poisoned)?
            .retain(|account| account.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(name: &str) -> Record {
        let mut record = Record::new();
        record.insert("name".into(), json!(name));
        record
    }

    #[tokio::test]
    async fn insert_assigns_identifiers_and_preserves_order() {
        let store = MemoryRecordStore::new();
        let first = store.insert(record("a")).await.expect("insert");
        let second = store.insert(record("b")).await.expect("insert");
        assert!(record_id(&first).is_some());
        assert_ne!(record_id(&first), record_id(&second));

        let all = store.all().await.expect("all");
        assert_eq!(all[0].get("name"), Some(&json!("a")));
        assert_eq!(all[1].get("name"), Some(&json!("b")));
    }

    #[tokio::test]
    async fn save_replaces_the_matching_record() {
        let store = MemoryRecordStore::new();
        let mut stored = store.insert(record("a")).await.expect("insert");
        stored.insert("name".into(), json!("renamed"));
        store.save(stored.clone()).await.expect("save");
        let id = record_id(&stored).expect("id").to_owned();
        let found = store.find(&id).await.expect("find").expect("present");
        assert_eq!(found.get("name"), Some(&json!("renamed")));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryRecordStore::new();
        let stored = store.insert(record("a")).await.expect("insert");
        let id = record_id(&stored).expect("id").to_owned();
        store.delete(&id).await.expect("delete");
        store.delete(&id).await.expect("second delete");
        assert!(store.find(&id).await.expect("find").is_none());
    }

    #[tokio::test]
    async fn account_lookup_by_username_and_id() {
        let repo = MemoryAccountRepository::new();
        let stored = repo
            .insert(Account::new("", "ada", "Ada", "13800000000"))
            .await
            .expect("insert");
        assert!(!stored.id.is_empty());
        assert!(repo
            .find_by_username("ada")
            .await
            .expect("query")
            .is_some());
        assert!(repo.find_by_id(&stored.id).await.expect("query").is_some());
        assert!(repo.find_by_id("missing").await.expect("query").is_none());
    }
}

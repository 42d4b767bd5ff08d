//! Record-store adapter exposing accounts to the generic dispatcher.
//!
//! Translates between the dispatcher's flat records and the typed
//! [`Account`], digesting the raw password material the account contracts
//! leave in their bound records.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::domain::account_contracts::{INIT_PASSWORD, NEW_PASSWORD};
use crate::domain::contract::ID_FIELD;
use crate::domain::ports::{AccountRepository, RecordStore, StoreError};
use crate::domain::{Account, AccountStatus, Record};

/// Accounts viewed as a dispatcher resource.
pub struct AccountRecordStore {
    repo: Arc<dyn AccountRepository>,
}

impl AccountRecordStore {
    /// Adapter over the shared account repository.
    #[must_use]
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }

    fn to_record(account: &Account) -> Record {
        let mut record = Record::new();
        record.insert(ID_FIELD.to_owned(), json!(account.id));
        record.insert("username".to_owned(), json!(account.username));
        record.insert("nickname".to_owned(), json!(account.nickname));
        record.insert("phone".to_owned(), json!(account.phone));
        record.insert("status".to_owned(), json!(account.status.as_number()));
        record.insert("is_superuser".to_owned(), json!(account.is_superuser));
        record.insert(
            "registered_at".to_owned(),
            json!(account
                .registered_at
                .to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        record
    }

    fn apply_fields(account: &mut Account, record: &Record) {
        if let Some(username) = record.get("username").and_then(Value::as_str) {
            account.username = username.to_owned();
        }
        if let Some(nickname) = record.get("nickname").and_then(Value::as_str) {
            account.nickname = nickname.to_owned();
        }
        if let Some(phone) = record.get("phone").and_then(Value::as_str) {
            account.phone = phone.to_owned();
        }
        if let Some(status) = record
            .get("status")
            .and_then(Value::as_u64)
            .and_then(AccountStatus::from_number)
        {
            account.status = status;
        }
    }
}

#[async_trait]
impl RecordStore for AccountRecordStore {
    async fn all(&self) -> Result<Vec<Record>, StoreError> {
        Ok(self
            .repo
            .list()
            .await?
            .iter()
            .map(Self::to_record)
            .collect())
    }

    async fn find(&self, id: &str) -> Result<Option<Record>, StoreError> {
        Ok(self
            .repo
            .find_by_id(id)
            .await?
            .as_ref()
            .map(Self::to_record))
    }

    async fn insert(&self, record: Record) -> Result<Record, StoreError> {
        let raw_password = record
            .get(INIT_PASSWORD)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                StoreError::Backend("account record reached the store without a password".into())
            })?
            .to_owned();
        let mut account = Account::new("", "", "", "");
        Self::apply_fields(&mut account, &record);
        account.set_password(&raw_password, Utc::now());
        let stored = self.repo.insert(account).await?;
        Ok(Self::to_record(&stored))
    }

    async fn save(&self, record: Record) -> Result<Record, StoreError> {
        let id = record
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Backend("cannot save an account without an id".into()))?;
        let mut account = self.repo.find_by_id(id).await?.ok_or_else(|| {
            StoreError::Backend(format!("account {id} vanished during save"))
        })?;
        Self::apply_fields(&mut account, &record);
        if let Some(raw) = record.get(NEW_PASSWORD).and_then(Value::as_str) {
            account.set_password(raw, Utc::now());
        }
        let stored = self.repo.save(account).await?;
        Ok(Self::to_record(&stored))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.repo.delete(id).await
    }
}

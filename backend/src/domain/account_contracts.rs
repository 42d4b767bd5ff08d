//! Contracts for the account-management resource.
//!
//! The account endpoints cannot use the plain field contract because account
//! input carries credential material: creation requires an agreed initial
//! password and the `reset_password` action swaps in its own contract. Raw
//! passwords travel inside the bound record under write-only keys and are
//! digested by the account store adapter; they never render.

use serde_json::{json, Value};

use crate::domain::contract::{Contract, FieldContract, FieldSpec, Record};
use crate::domain::error::FieldErrors;
use crate::domain::AccountStatus;

/// Write-only key carrying the raw initial password on create.
pub const INIT_PASSWORD: &str = "init_password";
/// Write-only confirmation of [`INIT_PASSWORD`].
pub const INIT_PASSWORD_CONFIRM: &str = "init_password_confirm";
/// Write-only key carrying the raw replacement password on reset.
pub const NEW_PASSWORD: &str = "new_password";
/// Write-only confirmation of [`NEW_PASSWORD`].
pub const NEW_PASSWORD_CONFIRM: &str = "new_password_confirm";

/// Validation message when a password and its confirmation differ.
pub const MSG_PASSWORD_MISMATCH: &str = "the two passwords do not match";
/// Validation message for malformed phone numbers.
pub const MSG_INVALID_PHONE: &str = "invalid phone number";
/// Validation message for out-of-range status values.
pub const MSG_UNSUPPORTED_STATUS: &str = "unsupported value";

fn is_phone_number(value: &str) -> bool {
    let mut chars = value.chars();
    value.len() == 11
        && chars.next() == Some('1')
        && chars.next().is_some_and(|c| ('3'..='9').contains(&c))
        && value.chars().all(|c| c.is_ascii_digit())
}

fn check_status(record: &Record, errors: &mut FieldErrors) {
    if let Some(status) = record.get("status") {
        let valid = status
            .as_u64()
            .and_then(AccountStatus::from_number)
            .is_some();
        if !valid {
            errors.push("status", MSG_UNSUPPORTED_STATUS);
        }
    }
}

fn check_agreement(record: &mut Record, password: &str, confirm: &str, errors: &mut FieldErrors) {
    let matches = record.get(password).and_then(Value::as_str)
        == record.get(confirm).and_then(Value::as_str);
    if matches {
        // The confirmation has done its job; only the raw password travels
        // on to the store adapter.
        record.remove(confirm);
    } else {
        errors.push(crate::domain::error::NON_FIELD_ERRORS, MSG_PASSWORD_MISMATCH);
    }
}

/// Contract for account create/update/list/retrieve.
pub struct AccountContract {
    fields: FieldContract,
}

impl Default for AccountContract {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountContract {
    /// Declared account fields; digest material never renders.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: FieldContract::new(vec![
                FieldSpec::required("username"),
                FieldSpec::required("nickname"),
                FieldSpec::required("phone"),
                FieldSpec::optional("status"),
                FieldSpec::read_only("is_superuser"),
                FieldSpec::read_only("registered_at"),
                FieldSpec::required(INIT_PASSWORD).write_only(),
                FieldSpec::required(INIT_PASSWORD_CONFIRM).write_only(),
            ]),
        }
    }
}

impl Contract for AccountContract {
    fn bind(
        &self,
        body: &Value,
        existing: Option<&Record>,
        partial: bool,
    ) -> Result<Record, FieldErrors> {
        let mut record = self.fields.bind(body, existing, partial)?;
        let mut errors = FieldErrors::new();
        if let Some(phone) = record.get("phone").and_then(Value::as_str) {
            if !is_phone_number(phone) {
                errors.push("phone", MSG_INVALID_PHONE);
            }
        }
        check_status(&record, &mut errors);
        if existing.is_none() {
            check_agreement(&mut record, INIT_PASSWORD, INIT_PASSWORD_CONFIRM, &mut errors);
        } else {
            // Updates never touch credentials; that is the reset action's
            // contract.
            record.remove(INIT_PASSWORD);
            record.remove(INIT_PASSWORD_CONFIRM);
        }
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }

    fn render(&self, record: &Record) -> Value {
        self.fields.render(record)
    }
}

/// Contract for the `reset_password` named action.
pub struct ResetPasswordContract {
    fields: FieldContract,
}

impl Default for ResetPasswordContract {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetPasswordContract {
    /// Requires an agreed replacement password.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: FieldContract::new(vec![
                FieldSpec::required(NEW_PASSWORD).write_only(),
                FieldSpec::required(NEW_PASSWORD_CONFIRM).write_only(),
            ]),
        }
    }
}

impl Contract for ResetPasswordContract {
    fn bind(
        &self,
        body: &Value,
        existing: Option<&Record>,
        partial: bool,
    ) -> Result<Record, FieldErrors> {
        let mut record = self.fields.bind(body, existing, partial)?;
        let mut errors = FieldErrors::new();
        check_agreement(&mut record, NEW_PASSWORD, NEW_PASSWORD_CONFIRM, &mut errors);
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }

    fn render(&self, _record: &Record) -> Value {
        json!({})
    }
}

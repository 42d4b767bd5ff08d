//! Input/output contracts for dispatcher resources.
//!
//! A contract is the serializer seam of the dispatcher: it binds a decoded
//! request body to a persistable record and renders stored records for the
//! response envelope. Concrete resources either declare their fields through
//! [`FieldContract`] or implement [`Contract`] directly when binding needs
//! custom logic (the account contracts do).

use serde_json::{Map, Value};

use crate::domain::error::FieldErrors;

/// Stored representation of a dispatcher resource: a flat JSON object.
pub type Record = Map<String, Value>;

/// Name of the identifier field every record carries once persisted.
pub const ID_FIELD: &str = "id";

/// Validation message for a missing required field.
pub const MSG_FIELD_REQUIRED: &str = "this field is required";

/// Serializer seam between wire payloads and stored records.
pub trait Contract: Send + Sync {
    /// Bind a request body to a record ready to persist.
    ///
    /// `existing` carries the current record for update and action
    /// operations; `partial` means unspecified fields keep their prior
    /// values instead of being required.
    fn bind(
        &self,
        body: &Value,
        existing: Option<&Record>,
        partial: bool,
    ) -> Result<Record, FieldErrors>;

    /// Render a stored record for the response envelope.
    fn render(&self, record: &Record) -> Value;
}

/// One declared field of a [`FieldContract`].
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    required: bool,
    read_only: bool,
    write_only: bool,
}

impl FieldSpec {
    /// Field that must be present on a non-partial bind.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            read_only: false,
            write_only: false,
        }
    }

    /// Field the caller may omit.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(name)
        }
    }

    /// Field the caller can read but never write; input values are ignored.
    #[must_use]
    pub fn read_only(name: impl Into<String>) -> Self {
        Self {
            required: false,
            read_only: true,
            ..Self::required(name)
        }
    }

    /// Accept the field on input but never render it.
    #[must_use]
    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }
}

/// Declarative contract over a flat field list.
///
/// # Examples
/// ```
/// use backend::domain::{Contract, FieldContract, FieldSpec};
/// use serde_json::json;
///
/// let contract = FieldContract::new(vec![
///     FieldSpec::required("name"),
///     FieldSpec::optional("remark"),
/// ]);
/// let record = contract
///     .bind(&json!({"name": "rust"}), None, false)
///     .expect("binds");
/// assert_eq!(record.get("name"), Some(&json!("rust")));
/// ```
pub struct FieldContract {
    fields: Vec<FieldSpec>,
}

impl FieldContract {
    /// Contract over the given field declarations.
    #[must_use]
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }
}

impl Contract for FieldContract {
    fn bind(
        &self,
        body: &Value,
        existing: Option<&Record>,
        partial: bool,
    ) -> Result<Record, FieldErrors> {
        let Some(input) = body.as_object() else {
            return Err(FieldErrors::non_field("expected a JSON object"));
        };
        let mut record = existing.cloned().unwrap_or_default();
        let mut errors = FieldErrors::new();
        for field in &self.fields {
            if field.read_only {
                continue;
            }
            match input.get(&field.name) {
                Some(value) if !value.is_null() => {
                    record.insert(field.name.clone(), value.clone());
                }
                _ if partial => {}
                _ if field.required && !record.contains_key(&field.name) => {
                    errors.push(&field.name, MSG_FIELD_REQUIRED);
                }
                _ => {}
            }
        }
        if errors.is_empty() {
            Ok(record)
        } else {
            Err(errors)
        }
    }

    fn render(&self, record: &Record) -> Value {
        let mut output = Record::new();
        if let Some(id) = record.get(ID_FIELD) {
            output.insert(ID_FIELD.to_owned(), id.clone());
        }
        for field in &self.fields {
            if field.write_only {
                continue;
            }
            if let Some(value) = record.get(&field.name) {
                output.insert(field.name.clone(), value.clone());
            }
        }
        Value::Object(output)
    }
}

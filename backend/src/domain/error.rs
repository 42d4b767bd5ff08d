//! Domain-level error taxonomy.
//!
//! Every failure the dispatch core can produce is one of these variants, and
//! each variant owns a stable numeric code that deployments must not change.
//! Expected business outcomes (validation failures, missing records) are
//! ordinary values of this type flowing back up the call chain; nothing in
//! the core reaches the transport layer unmapped.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Key used for validation messages that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Message for requests that need an authenticated caller.
pub const MSG_NEED_LOGIN: &str = "login required";
/// Message for authenticated but disabled accounts.
pub const MSG_ACCOUNT_DISABLED: &str = "account disabled, contact the administrator";
/// Message for accounts flagged for a forced password reset.
pub const MSG_NEED_PASSWORD_RESET: &str = "password reset required";
/// Default message attached to permission denials without a specific reason.
pub const MSG_NOT_PERMITTED: &str = "operation not permitted";
/// Default message for missing resources.
pub const MSG_NOT_FOUND: &str = "resource does not exist";

/// Per-field validation messages, ordered by field name for stable output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field shorthand.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// A message not attached to any particular field.
    #[must_use]
    pub fn non_field(message: impl Into<String>) -> Self {
        Self::single(NON_FIELD_ERRORS, message)
    }

    /// Append one message to a field, creating the field entry on first use.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// True when no messages have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// Failure taxonomy of the dispatch core.
///
/// The numeric codes and HTTP statuses come from [`ApiError::code`] and
/// [`ApiError::http_status`]; the envelope mapper in the HTTP adapter turns
/// them into wire responses.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Request body or parameters failed validation; one message per field.
    #[error("invalid parameters")]
    Validation(FieldErrors),
    /// The identity referenced by the request does not exist.
    #[error("referenced user does not exist")]
    UserNotExists,
    /// The addressed resource does not exist.
    #[error("{MSG_NOT_FOUND}")]
    NotFound,
    /// The caller must authenticate (or re-authenticate).
    #[error("{0}")]
    NeedLogin(String),
    /// The caller must complete a password reset before proceeding.
    #[error("{0}")]
    NeedPasswordReset(String),
    /// Authenticated but not allowed to perform this operation.
    #[error("{0}")]
    PermissionDenied(String),
    /// The HTTP verb is not supported on this route.
    #[error("method not allowed")]
    MethodNotAllowed,
    /// Anything unexpected; carries the full detail for the audit trail.
    #[error("unhandled error: {0}")]
    Unhandled(String),
}

impl ApiError {
    /// [`ApiError::NeedLogin`] with the standard message.
    #[must_use]
    pub fn need_login() -> Self {
        Self::NeedLogin(MSG_NEED_LOGIN.to_owned())
    }

    /// [`ApiError::NeedLogin`] with the disabled-account message.
    ///
    /// Same code as an anonymous caller but a distinct user-facing reason,
    /// matching the permission baseline.
    #[must_use]
    pub fn account_disabled() -> Self {
        Self::NeedLogin(MSG_ACCOUNT_DISABLED.to_owned())
    }

    /// [`ApiError::NeedPasswordReset`] with the standard message.
    #[must_use]
    pub fn need_password_reset() -> Self {
        Self::NeedPasswordReset(MSG_NEED_PASSWORD_RESET.to_owned())
    }

    /// [`ApiError::PermissionDenied`] with the default message.
    #[must_use]
    pub fn permission_denied() -> Self {
        Self::PermissionDenied(MSG_NOT_PERMITTED.to_owned())
    }

    /// Validation failure on a single field.
    #[must_use]
    pub fn field_error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }

    /// Wrap an unexpected fault, preserving its rendered detail.
    #[must_use]
    pub fn unhandled(detail: impl std::fmt::Display) -> Self {
        Self::Unhandled(detail.to_string())
    }

    /// Stable envelope code. Values are part of the deployed contract.
    #[must_use]
    pub fn code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::UserNotExists => 401,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::NeedLogin(_) => 412,
            Self::NeedPasswordReset(_) => 413,
            Self::PermissionDenied(_) => 444,
            Self::Unhandled(_) => 500,
        }
    }

    /// HTTP status carrying the envelope.
    ///
    /// Expected business outcomes travel at 200; only authentication,
    /// permission, and transport faults use non-200 statuses.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NeedLogin(_) | Self::NeedPasswordReset(_) | Self::PermissionDenied(_) => 401,
            Self::MethodNotAllowed => 405,
            _ => 200,
        }
    }

    /// Whether the fault line in the audit trail should omit full detail.
    ///
    /// Ordinary auth/permission denials are routine and logged tersely;
    /// everything unexpected keeps its detail.
    #[must_use]
    pub fn suppress_fault_detail(&self) -> bool {
        !matches!(self, Self::Unhandled(_))
    }
}

/// Envelope code for successful outcomes.
pub const CODE_OK: u16 = 0;

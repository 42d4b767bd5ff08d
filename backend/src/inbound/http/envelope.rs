//! Response envelope and error mapping.
//!
//! Every response body is `{code, data, msg}`, all three keys always
//! present. Expected business failures ride an HTTP 200 with their envelope
//! code; authentication and permission refusals use 401, and unsupported
//! verbs answer a bare 405 with no body at all.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{ApiError, CODE_OK};

/// Message substituted for unhandled faults outside debug deployments.
pub const MSG_INTERNAL_ERROR: &str = "server internal error";

/// Uniform response body.
#[derive(Debug, Serialize, PartialEq)]
pub struct Envelope {
    /// Stable outcome code; `0` for success.
    pub code: u16,
    /// Operation payload, `null` when the outcome has none.
    pub data: Value,
    /// Human-readable outcome message, `null` on success.
    pub msg: Option<String>,
}

impl Envelope {
    /// Successful envelope around an operation's data.
    #[must_use]
    pub fn ok(data: Value) -> Self {
        Self {
            code: CODE_OK,
            data,
            msg: None,
        }
    }

    /// Envelope for a failed outcome.
    ///
    /// Validation failures carry their field messages in `data`; unhandled
    /// fault detail is masked unless `debug` is set.
    #[must_use]
    pub fn failure(error: &ApiError, debug: bool) -> Self {
        let data = match error {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            _ => Value::Null,
        };
        let msg = match error {
            ApiError::Unhandled(_) if !debug => MSG_INTERNAL_ERROR.to_owned(),
            other => other.to_string(),
        };
        Self {
            code: error.code(),
            data,
            msg: Some(msg),
        }
    }
}

/// Map an operation outcome to the wire response.
#[must_use]
pub fn respond(result: &Result<Value, ApiError>, debug: bool) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(Envelope::ok(data.clone())),
        Err(ApiError::MethodNotAllowed) => HttpResponse::MethodNotAllowed().finish(),
        Err(error) => {
            let status = StatusCode::from_u16(error.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HttpResponse::build(status).json(Envelope::failure(error, debug))
        }
    }
}

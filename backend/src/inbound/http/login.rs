//! Credential exchange endpoint.
//!
//! `POST /account/login` trades a username and password for a bearer token.
//! This is the one handler outside the generic dispatcher: it has no
//! resource behind it, and its request body never reaches the audit trail.

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{json, Value};

use crate::audit;
use crate::domain::contract::MSG_FIELD_REQUIRED;
use crate::domain::error::MSG_ACCOUNT_DISABLED;
use crate::domain::{ApiError, FieldErrors};

use super::pipeline;
use super::state::AppState;

/// Mount path of the login handler.
pub const LOGIN_PATH: &str = "/account/login";

/// Validation message for an unknown login name.
pub const MSG_ACCOUNT_NOT_EXISTS: &str = "account does not exist";

/// Validation message for a failed password check.
pub const MSG_WRONG_PASSWORD: &str = "wrong password";

/// Handle any verb on the login path; only `POST` is served.
pub async fn handle(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Bytes,
) -> HttpResponse {
    let ctx = pipeline::accept(&req, &state).await;
    // Never log credential payloads.
    audit::record_entry(&ctx, None);
    let result = login(&state, &ctx.method, &payload).await;
    pipeline::finish(&ctx, &state, result)
}

async fn login(state: &AppState, method: &str, payload: &[u8]) -> Result<Value, ApiError> {
    if method != "POST" {
        return Err(ApiError::MethodNotAllowed);
    }
    let body = pipeline::decode_body(payload)?;
    let mut errors = FieldErrors::new();
    let username = string_field(&body, "username", &mut errors);
    let password = string_field(&body, "password", &mut errors);
    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::Validation(errors));
    };

    // Every credential failure is a validation outcome, with the reason
    // pinned to the offending field.
    let account = state
        .accounts
        .find_by_username(&username)
        .await?
        .ok_or_else(|| ApiError::field_error("username", MSG_ACCOUNT_NOT_EXISTS))?;
    if !account.verify_password(&password) {
        return Err(ApiError::field_error("password", MSG_WRONG_PASSWORD));
    }
    if !account.is_enabled() {
        return Err(ApiError::Validation(FieldErrors::non_field(
            MSG_ACCOUNT_DISABLED,
        )));
    }
    let token = state.tokens.issue(&account)?;
    Ok(json!({ "token": token }))
}

fn string_field(body: &Value, name: &str, errors: &mut FieldErrors) -> Option<String> {
    match body.get(name).and_then(Value::as_str) {
        Some(value) if !value.is_empty() => Some(value.to_owned()),
        _ => {
            errors.push(name, MSG_FIELD_REQUIRED);
            None
        }
    }
}

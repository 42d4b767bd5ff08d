//! Per-request orchestration.
//!
//! Each handler runs the same sequence: build the request context, resolve
//! the caller's identity, write the audit entry line, execute, then write
//! the exit line and map the outcome to the wire. The context is created
//! here and dropped with the response; its request id is what ties the two
//! audit lines together.

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::Value;

use crate::audit;
use crate::dispatch::{Operation, ResourceEndpoint};
use crate::domain::{ApiError, FieldErrors, RequestContext};

use super::envelope::respond;
use super::state::AppState;

/// Session correlation header echoed into the audit trail.
pub const SESSION_HEADER: &str = "X-SESSIONID";

/// Build the request context and resolve the caller's identity.
pub async fn accept(req: &HttpRequest, state: &AppState) -> RequestContext {
    let params = web::Query::<Vec<(String, String)>>::from_query(req.query_string())
        .map(web::Query::into_inner)
        .unwrap_or_default();
    let session_id = header_value(req, SESSION_HEADER);
    let ctx = RequestContext::new(
        req.method().as_str(),
        req.path(),
        req.query_string(),
        params,
        session_id,
    );
    let identity = state
        .tokens
        .resolve(header_value(req, "Authorization").as_deref())
        .await;
    ctx.with_identity(identity)
}

/// Decode a request payload as JSON.
///
/// An empty payload binds as `null`; anything else must parse.
pub fn decode_body(payload: &[u8]) -> Result<Value, ApiError> {
    if payload.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(payload).map_err(|_| {
        ApiError::Validation(FieldErrors::non_field("request body is not valid JSON"))
    })
}

/// Run one dispatcher operation end to end and map it to the wire.
pub async fn run(
    endpoint: &ResourceEndpoint,
    state: &AppState,
    ctx: &RequestContext,
    routed: Result<Operation, ApiError>,
    payload: &[u8],
) -> HttpResponse {
    let body = decode_body(payload);
    let logged_body = match &body {
        Ok(value) if !ctx.is_safe_method() && endpoint.logs_body() => Some(value),
        _ => None,
    };
    audit::record_entry(ctx, logged_body);
    let result = execute(endpoint, ctx, routed, body).await;
    finish(ctx, state, result)
}

async fn execute(
    endpoint: &ResourceEndpoint,
    ctx: &RequestContext,
    routed: Result<Operation, ApiError>,
    body: Result<Value, ApiError>,
) -> Result<Value, ApiError> {
    let operation = routed?;
    endpoint.authorize(&operation, ctx)?;
    let body = body?;
    endpoint.execute(operation, ctx, &body).await
}

/// Write the exit audit line and render the response.
pub fn finish(
    ctx: &RequestContext,
    state: &AppState,
    result: Result<Value, ApiError>,
) -> HttpResponse {
    match &result {
        Ok(_) => audit::record_success(ctx, None),
        Err(error) => audit::record_fault(ctx, error),
    }
    respond(&result, state.debug)
}

fn header_value(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

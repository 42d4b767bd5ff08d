//! Request audit trail.
//!
//! Every request gets exactly one entry line and one exit line, correlated
//! by the context's request id and session id. Lines are emitted through
//! `tracing` under the `api` logger name; the formatting layer renders that
//! name into the output.
//!
//! Expected business outcomes (validation failures, missing records) exit at
//! info with their envelope code; requests refused at the transport level
//! exit at warn with the HTTP status. Only unhandled faults carry their full
//! detail into the log.

use serde_json::Value;

use crate::domain::{ApiError, RequestContext, CODE_OK};

/// Logger name audit lines are emitted under.
pub const LOGGER: &str = "api";

/// Render the entry line for an accepted request.
///
/// `body` is included only when the endpoint allows body logging; credential
/// payloads never reach the trail.
#[must_use]
pub fn entry_line(ctx: &RequestContext, body: Option<&Value>) -> String {
    let body = match body {
        Some(value) if !value.is_null() => format!(" {value}"),
        _ => String::new(),
    };
    format!(
        "[Req|{}][S|{}][U|{}] {}: {}{}{}",
        ctx.req_id,
        session_display(ctx),
        ctx.user_id().unwrap_or("-"),
        ctx.method,
        ctx.path,
        ctx.query_display(),
        body,
    )
}

/// Render the exit line for an envelope delivered at HTTP 200.
#[must_use]
pub fn exit_line(ctx: &RequestContext, code: u16, msg: Option<&str>) -> String {
    format!(
        "[Resp|{}][S|{}]: Code: {} Msg: {}",
        ctx.req_id,
        session_display(ctx),
        code,
        msg.unwrap_or("-"),
    )
}

/// Render the exit line for a request refused at the transport level.
#[must_use]
pub fn refusal_line(ctx: &RequestContext, status: u16) -> String {
    format!(
        "[Resp|{}][S|{}]: StatusCode: {}",
        ctx.req_id,
        session_display(ctx),
        status,
    )
}

fn session_display(ctx: &RequestContext) -> &str {
    ctx.session_id.as_deref().unwrap_or("-")
}

/// Emit the entry line.
pub fn record_entry(ctx: &RequestContext, body: Option<&Value>) {
    tracing::info!(logger = LOGGER, "{}", entry_line(ctx, body));
}

/// Emit the exit line for a successful outcome.
pub fn record_success(ctx: &RequestContext, msg: Option<&str>) {
    tracing::info!(logger = LOGGER, "{}", exit_line(ctx, CODE_OK, msg));
}

/// Emit the exit line for a failed outcome.
///
/// Unhandled faults additionally log their detail at error level before the
/// terse exit line goes out.
pub fn record_fault(ctx: &RequestContext, error: &ApiError) {
    if !error.suppress_fault_detail() {
        tracing::error!(logger = LOGGER, "[Exc|{}] {}", ctx.req_id, error);
    }
    let status = error.http_status();
    if status == 200 {
        tracing::info!(
            logger = LOGGER,
            "{}",
            exit_line(ctx, error.code(), Some(&error.to_string())),
        );
    } else {
        tracing::warn!(logger = LOGGER, "{}", refusal_line(ctx, status));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> RequestContext {
        RequestContext::new(
            "POST",
            "/article/tag",
            "page=2",
            vec![("page".to_owned(), "2".to_owned())],
            Some("sess-9".to_owned()),
        )
    }

    #[test]
    fn entry_line_carries_correlation_method_and_body() {
        let ctx = ctx();
        let line = entry_line(&ctx, Some(&json!({"name": "rust"})));
        assert_eq!(
            line,
            format!(
                "[Req|{}][S|sess-9][U|-] POST: /article/tag?page=2 {}",
                ctx.req_id,
                json!({"name": "rust"}),
            )
        );
    }

    #[test]
    fn suppressed_bodies_and_missing_sessions_render_as_dashes() {
        let ctx = RequestContext::new("GET", "/account/manage", "", Vec::new(), None);
        let line = entry_line(&ctx, None);
        assert_eq!(line, format!("[Req|{}][S|-][U|-] GET: /account/manage", ctx.req_id));
    }

    #[test]
    fn exit_and_entry_lines_share_the_request_id() {
        let ctx = ctx();
        let entry = entry_line(&ctx, None);
        let exit = exit_line(&ctx, CODE_OK, None);
        let id = ctx.req_id.to_string();
        assert!(entry.contains(&id));
        assert!(exit.contains(&id));
    }

    #[test]
    fn envelope_faults_exit_with_their_code_and_message() {
        let line = exit_line(&ctx(), ApiError::NotFound.code(), Some("resource does not exist"));
        assert!(line.ends_with("Code: 404 Msg: resource does not exist"));
    }

    #[test]
    fn transport_refusals_exit_with_the_status_code() {
        let line = refusal_line(&ctx(), 401);
        assert!(line.ends_with("StatusCode: 401"));
    }
}

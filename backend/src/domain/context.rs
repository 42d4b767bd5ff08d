//! Per-request context.
//!
//! One [`RequestContext`] is created when a request is accepted and dropped
//! when the response goes out. It is the correlation point between the audit
//! trail's entry and exit lines and the input to permission evaluation.
//! Nothing here is shared between requests.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::Account;

/// Request-local state owned by the dispatch pipeline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Correlation id shared by the entry and exit audit lines.
    pub req_id: Uuid,
    /// Opaque `X-SESSIONID` header value; echoed into logs, never
    /// interpreted.
    pub session_id: Option<String>,
    /// Identity resolved from the bearer credential, if any.
    pub identity: Option<Account>,
    /// HTTP method, uppercase.
    pub method: String,
    /// Request path.
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: String,
    /// Decoded query parameters in arrival order.
    pub params: Vec<(String, String)>,
    /// Instant the request was accepted.
    pub received_at: DateTime<Utc>,
}

impl RequestContext {
    /// Context for a freshly accepted request; identity is resolved later.
    #[must_use]
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        query: impl Into<String>,
        params: Vec<(String, String)>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            req_id: Uuid::new_v4(),
            session_id,
            identity: None,
            method: method.into(),
            path: path.into(),
            query: query.into(),
            params,
            received_at: Utc::now(),
        }
    }

    /// Attach the resolved identity.
    #[must_use]
    pub fn with_identity(mut self, identity: Option<Account>) -> Self {
        self.identity = identity;
        self
    }

    /// Identifier of the resolved identity, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|account| account.id.as_str())
    }

    /// First value of a query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the verb is one of the safe/read methods.
    #[must_use]
    pub fn is_safe_method(&self) -> bool {
        matches!(self.method.as_str(), "GET" | "HEAD" | "OPTIONS")
    }

    /// Query string rendered for log lines (`?a=b` or empty).
    #[must_use]
    pub fn query_display(&self) -> String {
        if self.query.is_empty() {
            String::new()
        } else {
            format!("?{}", self.query)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(method: &str) -> RequestContext {
        RequestContext::new(
            method,
            "/article/tag",
            "page=2&size=5",
            vec![
                ("page".to_owned(), "2".to_owned()),
                ("size".to_owned(), "5".to_owned()),
            ],
            Some("sess-1".to_owned()),
        )
    }

    #[test]
    fn query_params_resolve_by_first_match() {
        let ctx = context("GET");
        assert_eq!(ctx.query_param("page"), Some("2"));
        assert_eq!(ctx.query_param("missing"), None);
    }

    #[test]
    fn safe_methods_are_read_verbs() {
        assert!(context("GET").is_safe_method());
        assert!(!context("POST").is_safe_method());
        assert!(!context("DELETE").is_safe_method());
    }

    #[test]
    fn query_display_prefixes_question_mark_only_when_present() {
        assert_eq!(context("GET").query_display(), "?page=2&size=5");
        let bare = RequestContext::new("GET", "/", "", Vec::new(), None);
        assert_eq!(bare.query_display(), "");
    }

    #[test]
    fn correlation_ids_are_unique_per_context() {
        assert_ne!(context("GET").req_id, context("GET").req_id);
    }
}

//! Composable authorization predicates.
//!
//! A [`PermissionRule`] either allows, denies, or raises a typed denial
//! reason. Rules AND-compose inside a group; an endpoint's
//! [`PermissionPolicy`] OR-combines its groups with an explicit `any_of`
//! combinator, evaluated left-to-right with short-circuit on the first
//! satisfied group. Rules hold no mutable state, so one policy instance is
//! shared across all requests to an endpoint.

use std::sync::Arc;

use crate::domain::error::ApiError;
use crate::domain::{Account, RequestContext};

/// Authorization predicate over the resolved identity and request context.
pub trait PermissionRule: Send + Sync {
    /// `Ok(true)` allows, `Ok(false)` denies generically, `Err` denies with
    /// a specific user-facing reason.
    fn check(&self, identity: Option<&Account>, ctx: &RequestContext) -> Result<bool, ApiError>;
}

/// AND-combined rule group; part of a policy's OR chain.
pub type RuleGroup = Vec<Arc<dyn PermissionRule>>;

/// Ordered OR-combination of rule groups attached to an endpoint.
#[derive(Clone, Default)]
pub struct PermissionPolicy {
    groups: Vec<RuleGroup>,
}

impl PermissionPolicy {
    /// Policy with no groups: every caller is authorized.
    #[must_use]
    pub fn allow_any() -> Self {
        Self::default()
    }

    /// Policy with a single AND group.
    #[must_use]
    pub fn require(group: RuleGroup) -> Self {
        Self::any_of(vec![group])
    }

    /// Explicit OR-combinator over rule groups, evaluated left-to-right.
    #[must_use]
    pub fn any_of(groups: Vec<RuleGroup>) -> Self {
        Self { groups }
    }

    /// The standard login-required group: baseline access plus the
    /// forced-reset gate.
    #[must_use]
    pub fn login_required() -> Self {
        Self::require(vec![Arc::new(UserAccess), Arc::new(PasswordResetGate)])
    }

    /// Evaluate the policy for one request.
    ///
    /// Short-circuits on the first group whose rules all pass. When no group
    /// passes, the earliest typed error raised during evaluation is
    /// surfaced; if every group denied without raising, a generic
    /// permission denial is returned.
    pub fn evaluate(&self, ctx: &RequestContext) -> Result<(), ApiError> {
        if self.groups.is_empty() {
            return Ok(());
        }
        let mut first_error: Option<ApiError> = None;
        'groups: for group in &self.groups {
            for rule in group {
                match rule.check(ctx.identity.as_ref(), ctx) {
                    Ok(true) => {}
                    Ok(false) => continue 'groups,
                    Err(error) => {
                        first_error.get_or_insert(error);
                        continue 'groups;
                    }
                }
            }
            return Ok(());
        }
        Err(first_error.unwrap_or_else(ApiError::permission_denied))
    }
}

/// Baseline rule: an enabled, authenticated identity.
///
/// Anonymous callers and disabled accounts both map to the need-login code,
/// with distinct messages.
pub struct UserAccess;

impl PermissionRule for UserAccess {
    fn check(&self, identity: Option<&Account>, _ctx: &RequestContext) -> Result<bool, ApiError> {
        match identity {
            None => Err(ApiError::need_login()),
            Some(account) if !account.is_enabled() => Err(ApiError::account_disabled()),
            Some(_) => Ok(true),
        }
    }
}

/// Blocks accounts flagged for a forced password reset.
pub struct PasswordResetGate;

impl PermissionRule for PasswordResetGate {
    fn check(&self, identity: Option<&Account>, _ctx: &RequestContext) -> Result<bool, ApiError> {
        match identity {
            Some(account) if account.require_password_reset => {
                Err(ApiError::need_password_reset())
            }
            _ => Ok(true),
        }
    }
}

/// Baseline plus the elevated flag.
pub struct SuperUser;

impl PermissionRule for SuperUser {
    fn check(&self, identity: Option<&Account>, ctx: &RequestContext) -> Result<bool, ApiError> {
        UserAccess.check(identity, ctx)?;
        Ok(identity.is_some_and(|account| account.is_superuser))
    }
}

/// Baseline, not elevated, and restricted to safe/read methods.
pub struct ReadOnly;

impl PermissionRule for ReadOnly {
    fn check(&self, identity: Option<&Account>, ctx: &RequestContext) -> Result<bool, ApiError> {
        UserAccess.check(identity, ctx)?;
        Ok(identity.is_some_and(|account| !account.is_superuser) && ctx.is_safe_method())
    }
}

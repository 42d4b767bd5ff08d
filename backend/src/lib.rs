//! Generic API dispatch service.
//!
//! A hexagonal backend whose HTTP surface is a single generic dispatcher:
//! resources are declared as an endpoint bundle (store, contract, filters,
//! permissions, actions) and mounted by name, so a new resource is wiring
//! rather than handler code. Authentication is stateless bearer tokens with
//! reset-time invalidation; every response rides a `{code, data, msg}`
//! envelope with a stable code table, and every request leaves a correlated
//! entry/exit pair in the audit trail.

pub mod audit;
pub mod dispatch;
pub mod domain;
pub mod inbound;
pub mod logging;
pub mod outbound;
pub mod server;

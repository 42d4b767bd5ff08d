//! Domain core of the API-dispatch service.
//!
//! Transport-agnostic: nothing in here knows about HTTP. Inbound adapters
//! translate wire requests into these types and map [`ApiError`] values back
//! into envelope responses.

pub mod account;
pub mod account_contracts;
pub mod context;
pub mod contract;
pub mod error;
pub mod filter;
pub mod permission;
pub mod ports;
pub mod token;

pub use account::{Account, AccountStatus};
pub use context::RequestContext;
pub use contract::{Contract, FieldContract, FieldSpec, Record};
pub use error::{ApiError, FieldErrors, CODE_OK};
pub use filter::{FilterMode, FilterSpec};
pub use permission::{PermissionPolicy, PermissionRule};
pub use token::TokenService;

//! HTTP adapter over the dispatch core.

pub mod envelope;
pub mod login;
pub mod pipeline;
pub mod routes;
pub mod state;

pub use envelope::Envelope;
pub use routes::configure;
pub use state::AppState;

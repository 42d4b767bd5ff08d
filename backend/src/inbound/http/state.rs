//! Shared application state.

use std::sync::Arc;

use crate::dispatch::ResourceEndpoint;
use crate::domain::ports::AccountRepository;
use crate::domain::TokenService;

/// State shared by every HTTP handler.
#[derive(Clone)]
pub struct AppState {
    /// Credential issue/resolve service.
    pub tokens: TokenService,
    /// Account lookup for the login handler.
    pub accounts: Arc<dyn AccountRepository>,
    /// Dispatcher endpoints to mount, in declaration order.
    pub endpoints: Vec<Arc<ResourceEndpoint>>,
    /// Whether unhandled fault detail may reach response bodies.
    pub debug: bool,
}

impl AppState {
    /// State over a token service and its backing account repository.
    #[must_use]
    pub fn new(tokens: TokenService, accounts: Arc<dyn AccountRepository>, debug: bool) -> Self {
        Self {
            tokens,
            accounts,
            endpoints: Vec::new(),
            debug,
        }
    }

    /// Mount a dispatcher endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: ResourceEndpoint) -> Self {
        self.endpoints.push(Arc::new(endpoint));
        self
    }
}

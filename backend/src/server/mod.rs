//! Service assembly and entry point.
//!
//! Wires the in-memory adapters, the token service, and the endpoint
//! registry into an [`AppState`], then runs the actix server. Integration
//! tests reuse [`build_state`] and mount the same routes on the test
//! harness.

use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer};
use chrono::Utc;

use crate::dispatch::ResourceEndpoint;
use crate::domain::account_contracts::{AccountContract, ResetPasswordContract};
use crate::domain::permission::{PasswordResetGate, ReadOnly, SuperUser};
use crate::domain::ports::{AccountRepository, StoreError};
use crate::domain::{Account, FieldContract, FieldSpec, FilterSpec, PermissionPolicy, TokenService};
use crate::inbound::http::{self, AppState};
use crate::outbound::accounts::AccountRecordStore;
use crate::outbound::memory::{MemoryAccountRepository, MemoryRecordStore};

pub mod config;

pub use config::AppConfig;

/// Assemble the application state and seed the administrator account.
pub async fn build_state(config: &AppConfig) -> Result<AppState, StoreError> {
    let accounts = Arc::new(MemoryAccountRepository::new());
    let mut admin = Account::new(
        "",
        &config.admin_username,
        &config.admin_username,
        "13000000000",
    )
    .superuser(true);
    admin.set_password(&config.admin_password, Utc::now());
    accounts.insert(admin).await?;

    let tokens = TokenService::new(&config.token_secret, config.token_ttl, accounts.clone());
    Ok(AppState::new(tokens, accounts.clone(), config.debug)
        .with_endpoint(account_management(accounts))
        .with_endpoint(simple_resource("article/tag"))
        .with_endpoint(simple_resource("article/category")))
}

/// Run the HTTP server until shutdown.
pub async fn run(config: AppConfig) -> io::Result<()> {
    let state = build_state(&config).await.map_err(io::Error::other)?;
    let bind_addr = config.bind_addr;
    tracing::info!("listening on {bind_addr}");
    HttpServer::new(move || App::new().configure(|cfg| http::configure(cfg, &state)))
        .bind(bind_addr)?
        .run()
        .await
}

/// Account management: full control for superusers, read access for
/// ordinary enabled accounts, password resets for superusers only.
fn account_management(accounts: Arc<MemoryAccountRepository>) -> ResourceEndpoint {
    ResourceEndpoint::new(
        "account/manage",
        Arc::new(AccountRecordStore::new(accounts)),
        Arc::new(AccountContract::new()),
    )
    .with_policy(PermissionPolicy::any_of(vec![
        vec![Arc::new(SuperUser), Arc::new(PasswordResetGate)],
        vec![Arc::new(ReadOnly), Arc::new(PasswordResetGate)],
    ]))
    .with_filters(vec![
        FilterSpec::contains("username"),
        FilterSpec::contains("nickname"),
        FilterSpec::exact("status"),
    ])
    .with_guarded_action(
        "reset_password",
        Arc::new(ResetPasswordContract::new()),
        PermissionPolicy::require(vec![Arc::new(SuperUser), Arc::new(PasswordResetGate)]),
    )
    // Account payloads carry raw passwords.
    .without_body_logging()
}

fn simple_resource(name: &str) -> ResourceEndpoint {
    ResourceEndpoint::new(
        name,
        Arc::new(MemoryRecordStore::new()),
        Arc::new(FieldContract::new(vec![
            FieldSpec::required("name"),
            FieldSpec::optional("remark"),
        ])),
    )
    .with_filters(vec![FilterSpec::contains("name")])
    .with_policy(PermissionPolicy::login_required())
}

//! Route table.
//!
//! Each dispatcher endpoint mounts three patterns: the collection, the
//! record, and the record action. Every pattern accepts all verbs through a
//! catch-all route so unsupported methods still pass through the pipeline
//! and leave audit lines; the routing table inside the dispatcher is what
//! refuses them.

use actix_web::{web, HttpRequest, HttpResponse};

use crate::dispatch::{Operation, ResourceEndpoint};

use super::login;
use super::pipeline;
use super::state::AppState;

/// Mount the login handler and every endpoint in the state.
pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.clone()));
    cfg.service(web::resource(login::LOGIN_PATH).route(web::route().to(login::handle)));
    for endpoint in &state.endpoints {
        let base = format!("/{}", endpoint.name());
        cfg.service(
            web::resource(base.clone())
                .app_data(web::Data::from(endpoint.clone()))
                .route(web::route().to(collection)),
        );
        cfg.service(
            web::resource(format!("{base}/{{id}}"))
                .app_data(web::Data::from(endpoint.clone()))
                .route(web::route().to(record)),
        );
        cfg.service(
            web::resource(format!("{base}/{{id}}/{{action}}"))
                .app_data(web::Data::from(endpoint.clone()))
                .route(web::route().to(record_action)),
        );
    }
}

async fn collection(
    req: HttpRequest,
    state: web::Data<AppState>,
    endpoint: web::Data<ResourceEndpoint>,
    payload: web::Bytes,
) -> HttpResponse {
    let ctx = pipeline::accept(&req, &state).await;
    let routed = Operation::route(&ctx.method, None, None);
    pipeline::run(&endpoint, &state, &ctx, routed, &payload).await
}

async fn record(
    req: HttpRequest,
    state: web::Data<AppState>,
    endpoint: web::Data<ResourceEndpoint>,
    path: web::Path<String>,
    payload: web::Bytes,
) -> HttpResponse {
    let id = path.into_inner();
    let ctx = pipeline::accept(&req, &state).await;
    let routed = Operation::route(&ctx.method, Some(&id), None);
    pipeline::run(&endpoint, &state, &ctx, routed, &payload).await
}

async fn record_action(
    req: HttpRequest,
    state: web::Data<AppState>,
    endpoint: web::Data<ResourceEndpoint>,
    path: web::Path<(String, String)>,
    payload: web::Bytes,
) -> HttpResponse {
    let (id, action) = path.into_inner();
    let ctx = pipeline::accept(&req, &state).await;
    let routed = Operation::route(&ctx.method, Some(&id), Some(&action));
    pipeline::run(&endpoint, &state, &ctx, routed, &payload).await
}

//! End-to-end tests through the HTTP adapter.
//!
//! Each test mounts the real route table over the default in-memory wiring
//! and drives it with the actix test harness, asserting on the envelope the
//! way a client would see it.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, App, Error};
use clap::Parser;
use serde_json::{json, Value};

use backend::inbound::http::configure;
use backend::server::{build_state, AppConfig};

fn config() -> AppConfig {
    AppConfig::parse_from(["backend"])
}

async fn spawn() -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    let state = build_state(&config()).await.expect("state assembles");
    test::init_service(App::new().configure(|cfg| configure(cfg, &state))).await
}

async fn send(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
    req: Request,
) -> (u16, Value) {
    let res = test::call_service(app, req).await;
    let status = res.status().as_u16();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, value)
}

async fn login(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
    username: &str,
    password: &str,
) -> (u16, Value) {
    let req = test::TestRequest::post()
        .uri("/account/login")
        .set_json(json!({"username": username, "password": password}))
        .to_request();
    send(app, req).await
}

async fn admin_token(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
) -> String {
    let (status, body) = login(app, "admin", "admin").await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(0));
    body["data"]["token"].as_str().expect("token").to_owned()
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn login_trades_credentials_for_a_token() {
    let app = spawn().await;
    let (status, body) = login(&app, "admin", "admin").await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(0));
    assert_eq!(body["msg"], Value::Null);
    assert!(body["data"]["token"].as_str().is_some());
}

#[actix_web::test]
async fn wrong_password_is_a_field_error_at_http_200() {
    let app = spawn().await;
    let (status, body) = login(&app, "admin", "nope").await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(400));
    assert!(body["data"]["errors"]["password"].is_array());
}

#[actix_web::test]
async fn unknown_usernames_are_a_username_field_error() {
    let app = spawn().await;
    let (status, body) = login(&app, "nobody", "whatever").await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(400));
    assert_eq!(
        body["data"]["errors"]["username"],
        json!(["account does not exist"])
    );
}

#[actix_web::test]
async fn missing_credentials_list_every_absent_field() {
    let app = spawn().await;
    let req = test::TestRequest::post()
        .uri("/account/login")
        .set_json(json!({}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(400));
    assert!(body["data"]["errors"]["username"].is_array());
    assert!(body["data"]["errors"]["password"].is_array());
}

#[actix_web::test]
async fn login_only_serves_post() {
    let app = spawn().await;
    let req = test::TestRequest::get().uri("/account/login").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 405);
    assert_eq!(body, Value::Null);
}

#[actix_web::test]
async fn anonymous_callers_are_refused_with_the_login_code() {
    let app = spawn().await;
    let req = test::TestRequest::get().uri("/article/tag").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], json!(412));
    assert_eq!(body["msg"], json!("login required"));
}

#[actix_web::test]
async fn unsupported_verbs_answer_a_bare_405() {
    let app = spawn().await;
    let token = admin_token(&app).await;
    let req = test::TestRequest::patch()
        .uri("/article/tag")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 405);
    assert_eq!(body, Value::Null);
}

#[actix_web::test]
async fn resource_lifecycle_round_trips_through_the_dispatcher() {
    let app = spawn().await;
    let token = admin_token(&app).await;

    let req = test::TestRequest::post()
        .uri("/article/tag")
        .insert_header(bearer(&token))
        .set_json(json!({"name": "rust", "remark": "systems"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(0));
    let id = body["data"]["item"]["id"].as_str().expect("id").to_owned();

    let req = test::TestRequest::put()
        .uri(&format!("/article/tag/{id}"))
        .insert_header(bearer(&token))
        .set_json(json!({"name": "rust-lang"}))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["data"]["item"]["name"], json!("rust-lang"));
    assert_eq!(body["data"]["item"]["remark"], json!("systems"));

    let req = test::TestRequest::get()
        .uri(&format!("/article/tag/{id}"))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["item"]["name"], json!("rust-lang"));

    let req = test::TestRequest::delete()
        .uri(&format!("/article/tag/{id}"))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(0));

    let req = test::TestRequest::get()
        .uri(&format!("/article/tag/{id}"))
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(404));
    assert_eq!(body["msg"], json!("resource does not exist"));
}

#[actix_web::test]
async fn lists_filter_and_paginate() {
    let app = spawn().await;
    let token = admin_token(&app).await;
    for name in ["rust", "ruby", "python", "rails"] {
        let req = test::TestRequest::post()
            .uri("/article/category")
            .insert_header(bearer(&token))
            .set_json(json!({"name": name}))
            .to_request();
        let (_, body) = send(&app, req).await;
        assert_eq!(body["code"], json!(0));
    }

    let req = test::TestRequest::get()
        .uri("/article/category?name=r&page=1&size=2")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["total_count"], json!(3));
    assert_eq!(body["data"]["total_page"], json!(2));
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"]["page_size"], json!(2));
}

#[actix_web::test]
async fn non_numeric_pagination_parameters_are_a_validation_error() {
    let app = spawn().await;
    let token = admin_token(&app).await;
    let req = test::TestRequest::get()
        .uri("/article/tag?page=two")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(400));
    assert!(body["data"]["errors"]["page"].is_array());
}

#[actix_web::test]
async fn invalid_bodies_are_rejected_before_the_store() {
    let app = spawn().await;
    let token = admin_token(&app).await;
    let req = test::TestRequest::post()
        .uri("/article/tag")
        .insert_header(bearer(&token))
        .set_json(json!({"remark": "no name"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(400));
    assert!(body["data"]["errors"]["name"].is_array());
}

#[actix_web::test]
async fn account_management_enforces_the_permission_groups() {
    let app = spawn().await;
    let admin = admin_token(&app).await;

    let req = test::TestRequest::post()
        .uri("/account/manage")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "username": "ada",
            "nickname": "Ada",
            "phone": "13800000000",
            "init_password": "pw-1",
            "init_password_confirm": "pw-1",
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(0));
    let ada_id = body["data"]["item"]["id"].as_str().expect("id").to_owned();
    assert!(body["data"]["item"].get("init_password").is_none());

    let (status, body) = login(&app, "ada", "pw-1").await;
    assert_eq!(status, 200);
    let ada = body["data"]["token"].as_str().expect("token").to_owned();

    // Ordinary accounts may read the roster but not change it.
    let req = test::TestRequest::get()
        .uri("/account/manage")
        .insert_header(bearer(&ada))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(0));
    assert_eq!(body["data"]["total_count"], json!(2));

    let req = test::TestRequest::put()
        .uri(&format!("/account/manage/{ada_id}"))
        .insert_header(bearer(&ada))
        .set_json(json!({"nickname": "Countess"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], json!(444));
    assert_eq!(body["msg"], json!("operation not permitted"));
}

#[actix_web::test]
async fn password_reset_action_rotates_the_credential() {
    let app = spawn().await;
    let admin = admin_token(&app).await;

    let req = test::TestRequest::post()
        .uri("/account/manage")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "username": "ada",
            "nickname": "Ada",
            "phone": "13800000000",
            "init_password": "pw-1",
            "init_password_confirm": "pw-1",
        }))
        .to_request();
    let (_, body) = send(&app, req).await;
    let ada_id = body["data"]["item"]["id"].as_str().expect("id").to_owned();

    let req = test::TestRequest::post()
        .uri(&format!("/account/manage/{ada_id}/reset_password"))
        .insert_header(bearer(&admin))
        .set_json(json!({"new_password": "pw-2", "new_password_confirm": "pw-2"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(0));

    let (_, body) = login(&app, "ada", "pw-1").await;
    assert_eq!(body["code"], json!(400));
    let (_, body) = login(&app, "ada", "pw-2").await;
    assert_eq!(body["code"], json!(0));
}

#[actix_web::test]
async fn password_reset_action_is_superuser_only() {
    let app = spawn().await;
    let admin = admin_token(&app).await;

    let req = test::TestRequest::post()
        .uri("/account/manage")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "username": "ada",
            "nickname": "Ada",
            "phone": "13800000000",
            "init_password": "pw-1",
            "init_password_confirm": "pw-1",
        }))
        .to_request();
    let (_, body) = send(&app, req).await;
    let ada_id = body["data"]["item"]["id"].as_str().expect("id").to_owned();

    let (_, body) = login(&app, "ada", "pw-1").await;
    let ada = body["data"]["token"].as_str().expect("token").to_owned();

    let req = test::TestRequest::post()
        .uri(&format!("/account/manage/{ada_id}/reset_password"))
        .insert_header(bearer(&ada))
        .set_json(json!({"new_password": "x", "new_password_confirm": "x"}))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], json!(444));
}

#[actix_web::test]
async fn disabled_accounts_cannot_log_in_or_act() {
    let app = spawn().await;
    let admin = admin_token(&app).await;

    let req = test::TestRequest::post()
        .uri("/account/manage")
        .insert_header(bearer(&admin))
        .set_json(json!({
            "username": "ada",
            "nickname": "Ada",
            "phone": "13800000000",
            "init_password": "pw-1",
            "init_password_confirm": "pw-1",
        }))
        .to_request();
    let (_, body) = send(&app, req).await;
    let ada_id = body["data"]["item"]["id"].as_str().expect("id").to_owned();

    let (_, body) = login(&app, "ada", "pw-1").await;
    let ada = body["data"]["token"].as_str().expect("token").to_owned();

    let req = test::TestRequest::put()
        .uri(&format!("/account/manage/{ada_id}"))
        .insert_header(bearer(&admin))
        .set_json(json!({"status": 0}))
        .to_request();
    let (_, body) = send(&app, req).await;
    assert_eq!(body["code"], json!(0));
    assert_eq!(body["data"]["item"]["status"], json!(0));

    // At login the refusal is a validation outcome.
    let (status, body) = login(&app, "ada", "pw-1").await;
    assert_eq!(status, 200);
    assert_eq!(body["code"], json!(400));
    assert_eq!(
        body["data"]["errors"]["non_field_errors"],
        json!(["account disabled, contact the administrator"])
    );

    // The still-valid token resolves, but the permission baseline refuses it
    // with the need-login code and the distinct banned message.
    let req = test::TestRequest::get()
        .uri("/article/tag")
        .insert_header(bearer(&ada))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], json!(412));
    assert_eq!(body["msg"], json!("account disabled, contact the administrator"));
}

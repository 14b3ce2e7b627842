mod common;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

use common::{TEST_PASSWORD, TestApp};
use payrolld::services::two_factor;

#[tokio::test]
#[serial]
async fn login_returns_profile_and_token() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let user = test_app.create_user("tester", "admin").await.unwrap();
    let code = two_factor::current_code(&user.totp_secret).unwrap();

    let req = test::TestRequest::post()
        .uri("/api/auth")
        .set_json(json!({
            "login": "tester",
            "password": TEST_PASSWORD,
            "token": code,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], json!(true));

    let payload = &body["payload"];
    assert_eq!(payload["username"], json!("tester"));
    assert_eq!(payload["email"], json!("tester@localhost"));
    assert_eq!(payload["first_name"], json!("Tester"));
    assert_eq!(payload["group"]["tag"], json!("admin"));
    assert!(payload["auth"]["token"].is_string());
    assert!(payload["auth"]["expires"].is_i64());

    // The flags are the admin group's flags.
    let flags = payload["flags"].as_array().unwrap();
    assert!(flags.iter().any(|f| f["flag"] == json!("write_users")));

    // The token resolves back to the same user.
    let token = payload["auth"]["token"].as_str().unwrap().to_string();
    let req = test::TestRequest::get()
        .uri("/api/auth")
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["payload"]["username"], json!("tester"));
    assert_eq!(body["payload"]["auth"], Value::Null);
}

#[tokio::test]
#[serial]
async fn wrong_password_is_unauthorized() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let user = test_app.create_user("tester", "user").await.unwrap();
    let code = two_factor::current_code(&user.totp_secret).unwrap();

    let req = test::TestRequest::post()
        .uri("/api/auth")
        .set_json(json!({
            "login": "tester",
            "password": "wrong",
            "token": code,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"payload": null, "error": "Unauthorized", "status": false}));
}

#[tokio::test]
#[serial]
async fn wrong_totp_code_is_unauthorized() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let user = test_app.create_user("tester", "user").await.unwrap();
    let code = two_factor::current_code(&user.totp_secret).unwrap();
    let wrong = if code == "123456" { "654321" } else { "123456" };

    let req = test::TestRequest::post()
        .uri("/api/auth")
        .set_json(json!({
            "login": "tester",
            "password": TEST_PASSWORD,
            "token": wrong,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn missing_token_header_is_unauthorized() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let req = test::TestRequest::get().uri("/api/auth").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], json!(false));
}

#[tokio::test]
#[serial]
async fn garbage_token_is_unauthorized() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let req = test::TestRequest::get()
        .uri("/api/auth")
        .insert_header(("x-access-token", "not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn flag_gating_denies_basic_users_system_access() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    // The seeded "user" group carries no system-config flags.
    let user = test_app.create_user("basic", "user").await.unwrap();
    let token = test_app.login_token(&user).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/system")
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn route_index_lists_endpoints_without_auth() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let req = test::TestRequest::get().uri("/api").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let routes = body["payload"].as_array().unwrap();
    assert!(routes.iter().any(|r| r["endpoint"] == json!("/api/events")));
}

#[tokio::test]
#[serial]
async fn unknown_api_route_is_bad_request() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let req = test::TestRequest::get().uri("/api/nope").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"payload": null, "error": "Bad Request", "status": false}));
}

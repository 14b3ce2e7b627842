mod common;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

use common::TestApp;

#[tokio::test]
#[serial]
async fn create_user_returns_enrollment_qr() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let admin = test_app.create_user("admin", "admin").await.unwrap();
    let token = test_app.login_token(&admin).await.unwrap();
    let user_group = test_app.groups.find_by_tag("user").await.unwrap().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(("x-access-token", token))
        .set_json(json!({
            "username": "RAGNAR",
            "email": "Ragnar@Localhost",
            "password": "s3cret",
            "first_name": "ragnar",
            "last_name": "laud",
            "group": user_group.id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let payload = &body["payload"];

    // Case normalization on the way out.
    assert_eq!(payload["username"], json!("ragnar"));
    assert_eq!(payload["email"], json!("ragnar@localhost"));
    assert_eq!(payload["first_name"], json!("Ragnar"));
    assert_eq!(payload["last_name"], json!("Laud"));
    assert_eq!(payload["group"]["tag"], json!("user"));
    assert!(
        payload["qr"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );

    // Effective flags come from the group.
    let flags: Vec<&str> = payload["flags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["flag"].as_str().unwrap())
        .collect();
    assert_eq!(flags, vec!["read_users", "use_event_api", "use_holiday_api"]);
}

#[tokio::test]
#[serial]
async fn duplicate_username_is_rejected() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let admin = test_app.create_user("admin", "admin").await.unwrap();
    let token = test_app.login_token(&admin).await.unwrap();
    let user_group = test_app.groups.find_by_tag("user").await.unwrap().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/users")
        .insert_header(("x-access-token", token))
        .set_json(json!({
            "username": "admin",
            "email": "other@localhost",
            "password": "s3cret",
            "first_name": "Other",
            "last_name": "User",
            "group": user_group.id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Username already taken"));
}

#[tokio::test]
#[serial]
async fn missing_user_is_a_not_found_envelope() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let admin = test_app.create_user("admin", "admin").await.unwrap();
    let token = test_app.login_token(&admin).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/users/00000000-0000-0000-0000-000000000000")
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body,
        json!({"payload": null, "error": "User not found", "status": false})
    );
}

#[tokio::test]
#[serial]
async fn user_flag_assignment_cycle() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let admin = test_app.create_user("admin", "admin").await.unwrap();
    let token = test_app.login_token(&admin).await.unwrap();
    let target = test_app.create_user("target", "user").await.unwrap();

    // Assign an individual flag the "user" group does not carry.
    let uri = format!("/api/users/{}/flags/read_system_config", target.id);
    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(("x-access-token", token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let flags: Vec<&str> = body["payload"]["flags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["flag"].as_str().unwrap())
        .collect();
    assert!(flags.contains(&"read_system_config"));
    assert!(flags.contains(&"use_event_api"));

    // Unassign it again; the group flags remain.
    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(("x-access-token", token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let flags: Vec<&str> = body["payload"]["flags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["flag"].as_str().unwrap())
        .collect();
    assert!(!flags.contains(&"read_system_config"));
    assert!(flags.contains(&"use_event_api"));

    // Unknown flag tags are invalid.
    let req = test::TestRequest::put()
        .uri(&format!("/api/users/{}/flags/no_such_flag", target.id))
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Invalid Access Flag"));
}

#[tokio::test]
#[serial]
async fn group_lifecycle_via_api() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let admin = test_app.create_user("admin", "admin").await.unwrap();
    let token = test_app.login_token(&admin).await.unwrap();

    // Create.
    let req = test::TestRequest::post()
        .uri("/api/groups")
        .insert_header(("x-access-token", token.clone()))
        .set_json(json!({
            "tag": "payroll",
            "name": "Payroll Clerks",
            "description": "Payroll processing staff",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let group_id = body["payload"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["payload"]["flags"], json!([]));

    // Duplicate tag is a validation failure.
    let req = test::TestRequest::post()
        .uri("/api/groups")
        .insert_header(("x-access-token", token.clone()))
        .set_json(json!({
            "tag": "payroll",
            "name": "Another Name",
            "description": "Duplicate tag",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["payload"], json!(["Tag already taken"]));

    // Assign a flag by tag.
    let req = test::TestRequest::put()
        .uri(&format!("/api/groups/{}/flags/use_event_api", group_id))
        .insert_header(("x-access-token", token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["payload"]["flags"][0]["flag"], json!("use_event_api"));

    // Update.
    let req = test::TestRequest::put()
        .uri(&format!("/api/groups/{}", group_id))
        .insert_header(("x-access-token", token.clone()))
        .set_json(json!({"description": "Payroll and HR staff"}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["payload"]["description"], json!("Payroll and HR staff"));

    // Delete, then reads 404.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/groups/{}", group_id))
        .insert_header(("x-access-token", token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/groups/{}", group_id))
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn flags_listing_returns_seeded_flags() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let admin = test_app.create_user("admin", "admin").await.unwrap();
    let token = test_app.login_token(&admin).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/flags")
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let flags = body["payload"].as_array().unwrap();
    assert_eq!(flags.len(), 9);
    assert!(flags.iter().all(|f| f["id"].is_string()));
}

#[tokio::test]
#[serial]
async fn listing_users_resolves_groups_and_flags() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let admin = test_app.create_user("admin", "admin").await.unwrap();
    test_app.create_user("basic", "user").await.unwrap();
    let token = test_app.login_token(&admin).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/users")
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let users = body["payload"].as_array().unwrap();
    assert_eq!(users.len(), 2);

    let basic = users
        .iter()
        .find(|u| u["username"] == json!("basic"))
        .unwrap();
    assert_eq!(basic["group"]["tag"], json!("user"));
    assert_eq!(basic["flags"].as_array().unwrap().len(), 3);
}

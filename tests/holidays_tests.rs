mod common;

use actix_web::{http::StatusCode, test};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use serial_test::serial;

use common::TestApp;

#[tokio::test]
#[serial]
async fn lookup_serves_cached_payloads() {
    let test_app = TestApp::new().await.expect("failed to create test app");

    // Prime the cache so the proxy never reaches for the network.
    test_app
        .holidays
        .prime(
            "EST",
            2017,
            json!([
                {"date": 1, "month": 1, "year": 2017, "englishName": "New Year's Day"},
                {"date": 24, "month": 2, "year": 2017, "englishName": "Independence Day"}
            ]),
        )
        .await;

    let app = test::init_service(test_app.app()).await;
    let user = test_app.create_user("tester", "user").await.unwrap();
    let token = test_app.login_token(&user).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/holidays?country=est&year=2017")
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], json!(true));
    assert_eq!(body["payload"][0]["englishName"], json!("New Year's Day"));
}

#[tokio::test]
#[serial]
async fn missing_country_is_invalid_data() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    let user = test_app.create_user("tester", "user").await.unwrap();
    let token = test_app.login_token(&user).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/holidays?year=2017")
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], json!("Invalid Data"));
    assert_eq!(
        body["payload"],
        json!(["Missing required query parameter 'country'"])
    );
}

#[tokio::test]
#[serial]
async fn lookup_requires_the_holiday_flag() {
    let test_app = TestApp::new().await.expect("failed to create test app");
    let app = test::init_service(test_app.app()).await;

    // Strip the user down to a group with no flags.
    let bare_group = test_app
        .groups
        .create(&payrolld::database::models::AccessGroup::new(
            "bare".to_string(),
            "Bare".to_string(),
            "No privileges".to_string(),
        ))
        .await
        .unwrap();
    let mut user = test_app.create_user("restricted", "user").await.unwrap();
    user.group_id = bare_group.id;
    let user = test_app.users.update(&user).await.unwrap();
    let token = test_app.login_token(&user).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/holidays?country=est")
        .insert_header(("x-access-token", token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

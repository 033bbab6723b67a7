//! REST API through the full router stack

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use cleaning_booking::domain::user::UserRole;
use cleaning_booking::infrastructure::crypto::jwt::{create_token, JwtConfig};
use cleaning_booking::{create_api_router, ApiContext};

use common::*;

fn router(app: &TestApp) -> Router {
    create_api_router(ApiContext {
        booking: app.service.clone(),
        db: app.db.clone(),
        jwt_config: JwtConfig::default(),
        metrics: None,
    })
}

fn bearer(user_id: &str) -> String {
    let token = create_token(user_id, UserRole::Customer, &JwtConfig::default()).unwrap();
    format!("Bearer {}", token)
}

fn post_json(uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn read_json(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn cart() -> Value {
    json!({
        "service_type_id": STANDARD_CLEANING,
        "services": [{ "service_id": BEDROOMS, "quantity": 2 }],
        "extra_services": [{ "extra_service_id": SUPER_DEEP_CLEANING }],
        "tips": 10
    })
}

fn booking_body() -> Value {
    let mut body = cart();
    let service_date = (chrono::Utc::now().date_naive() + chrono::Duration::days(3)).to_string();
    let fields = json!({
        "first_name": "Jane",
        "last_name": "Doe",
        "email": "jane@example.com",
        "phone": "555-0100",
        "address": "1 Main St",
        "city": "Springfield",
        "state": "IL",
        "zip_code": "62701",
        "service_date": service_date,
        "service_time": "10:00:00"
    });
    if let (Some(target), Some(extra)) = (body.as_object_mut(), fields.as_object()) {
        target.extend(extra.clone());
    }
    body
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = TestApp::new().await;
    let resp = router(&app)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn booking_routes_require_a_token() {
    let app = TestApp::new().await;
    let resp = router(&app)
        .oneshot(post_json("/api/v1/booking/calculate", None, cart()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = router(&app)
        .oneshot(post_json(
            "/api/v1/booking/calculate",
            Some("Bearer not-a-jwt"),
            cart(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn calculate_returns_quote() {
    let app = TestApp::new().await;
    let auth = bearer("u1");
    let resp = router(&app)
        .oneshot(post_json("/api/v1/booking/calculate", Some(&auth), cart()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["sub_total"].as_f64(), Some(210.0));
    assert_eq!(body["data"]["total"].as_f64(), Some(238.48));
}

#[tokio::test]
async fn invalid_cart_is_unprocessable() {
    let app = TestApp::new().await;
    let auth = bearer("u1");
    let mut body = cart();
    body["services"][0]["quantity"] = json!(-1);
    let resp = router(&app)
        .oneshot(post_json("/api/v1/booking/calculate", Some(&auth), body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(resp).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn oversized_hours_and_tips_get_an_error_envelope() {
    let app = TestApp::new().await;
    insert_user(&app.db, "u1", true).await;
    let auth = bearer("u1");

    let mut huge_hours = cart();
    huge_hours["extra_services"] = json!([
        { "extra_service_id": INSIDE_CABINETS, "hours": 70000000000000000000000000000.0 }
    ]);
    let mut huge_tips = cart();
    huge_tips["tips"] = json!(70000000000000000000000000000.0);
    let mut booking = booking_body();
    booking["extra_services"] = huge_hours["extra_services"].clone();

    let cases = [
        ("/api/v1/booking/calculate", huge_hours),
        ("/api/v1/booking/calculate", huge_tips),
        ("/api/v1/booking/create", booking),
    ];
    for (uri, body) in cases {
        let resp = router(&app)
            .oneshot(post_json(uri, Some(&auth), body))
            .await
            .unwrap();
        assert!(
            matches!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY | StatusCode::BAD_REQUEST),
            "{} answered {}",
            uri,
            resp.status()
        );
        let body = read_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }
}

#[tokio::test]
async fn hourly_extra_is_quoted() {
    let app = TestApp::new().await;
    let mut body = cart();
    body["extra_services"] = json!([
        { "extra_service_id": SUPER_DEEP_CLEANING },
        { "extra_service_id": INSIDE_CABINETS, "hours": 2 }
    ]);
    let resp = router(&app)
        .oneshot(post_json("/api/v1/booking/calculate", Some(&bearer("u1")), body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["sub_total"].as_f64(), Some(300.0));
}

#[tokio::test]
async fn create_then_pay_and_list() {
    let app = TestApp::new().await;
    insert_user(&app.db, "u1", true).await;
    let auth = bearer("u1");

    let resp = router(&app)
        .oneshot(post_json("/api/v1/booking/create", Some(&auth), booking_body()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["order"]["total"].as_f64(), Some(238.48));
    assert_eq!(body["data"]["order"]["status"], "Pending");
    let order_id = body["data"]["order"]["id"].as_i64().unwrap();

    let resp = router(&app)
        .oneshot(post_json(
            &format!("/api/v1/booking/simulate-payment/{}", order_id),
            Some(&auth),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["order"]["is_paid"], true);

    let resp = router(&app)
        .oneshot(
            Request::get("/api/v1/booking/orders")
                .header(header::AUTHORIZATION, &auth)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn unknown_user_booking_is_bad_request() {
    let app = TestApp::new().await;
    let auth = bearer("ghost");
    let resp = router(&app)
        .oneshot(post_json("/api/v1/booking/create", Some(&auth), booking_body()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = read_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn other_users_order_is_forbidden() {
    let app = TestApp::new().await;
    insert_user(&app.db, "u1", true).await;
    let resp = router(&app)
        .oneshot(post_json("/api/v1/booking/create", Some(&bearer("u1")), booking_body()))
        .await
        .unwrap();
    let order_id = read_json(resp).await["data"]["order"]["id"].as_i64().unwrap();

    let resp = router(&app)
        .oneshot(
            Request::get(format!("/api/v1/booking/orders/{}", order_id))
                .header(header::AUTHORIZATION, bearer("u2"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

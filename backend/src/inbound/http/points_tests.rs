//! Tests for points API handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{json, Value};

use super::*;
use crate::inbound::http::test_utils::{login_as, test_app};

fn create_body() -> Value {
    json!({
        "kind": "points",
        "amount": 25,
        "direction": "earn",
        "reason": "forum answer accepted",
    })
}

#[actix_web::test]
async fn create_transaction_requires_a_session() {
    let app = actix_test::init_service(test_app(HttpState::fixture())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/points")
            .set_json(create_body())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_transaction_returns_receipt_and_balance() {
    let app = actix_test::init_service(test_app(HttpState::fixture())).await;
    let cookie = login_as(&app, "member").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/points")
            .cookie(cookie)
            .set_json(create_body())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["transaction"]["direction"], "earn");
    assert_eq!(body["transaction"]["amount"], 25);
    assert_eq!(body["balance"]["totalPoints"], 25);
}

#[actix_web::test]
async fn unknown_direction_is_rejected_with_field_details() {
    let app = actix_test::init_service(test_app(HttpState::fixture())).await;
    let cookie = login_as(&app, "member").await;

    let mut body = create_body();
    body["direction"] = json!("sideways");
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/points")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "direction");
}

#[actix_web::test]
async fn balance_is_returned_without_the_transactions_flag() {
    let app = actix_test::init_service(test_app(HttpState::fixture())).await;
    let cookie = login_as(&app, "member").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/points")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["totalPoints"], 0);
    assert!(body.get("transactions").is_none());
}

#[actix_web::test]
async fn transaction_page_carries_the_pagination_envelope() {
    let app = actix_test::init_service(test_app(HttpState::fixture())).await;
    let cookie = login_as(&app, "member").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/points?transactions=true&page=2&limit=10")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["pagination"]["page"], 2);
    assert_eq!(body["pagination"]["limit"], 10);
    assert_eq!(body["pagination"]["totalPages"], 0);
}

#[actix_web::test]
async fn invalid_filter_kind_is_rejected() {
    let app = actix_test::init_service(test_app(HttpState::fixture())).await;
    let cookie = login_as(&app, "member").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/points?transactions=true&kind=imaginary")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn status_update_rejects_malformed_transaction_ids() {
    let app = actix_test::init_service(test_app(HttpState::fixture())).await;
    let cookie = login_as(&app, "member").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/points/transactions/not-a-uuid/status")
            .cookie(cookie)
            .set_json(json!({ "status": "completed" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn status_update_on_an_unknown_transaction_is_not_found() {
    let app = actix_test::init_service(test_app(HttpState::fixture())).await;
    let cookie = login_as(&app, "member").await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri("/api/v1/points/transactions/00000000-0000-0000-0000-000000000001/status")
            .cookie(cookie)
            .set_json(json!({ "status": "completed" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

//! Integration tests for the staffrec-server API
//!
//! Each test builds the router over a fresh in-memory SQLite pool with
//! the sample rate table and drives it through `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

use staffrec_server::rates::SampleRates;
use staffrec_server::{build_router, AppState};

async fn setup_app() -> axum::Router {
    let db = staffrec_common::db::init_in_memory()
        .await
        .expect("Should create in-memory database");
    build_router(AppState::new(db, Arc::new(SampleRates)))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn send_json(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn employee_json(service_number: i64, employment_date: &str) -> Value {
    json!({
        "name": "ivan",
        "surname": "petrov",
        "patronymic": "sergeevich",
        "department_number": 2,
        "service_number": service_number,
        "employment_date": employment_date,
        "topic_name": "Radio telemetry",
        "topic_number": 7,
        "post_code": 11,
        "post_name": "Senior engineer",
        "salary": { "amount": 1500.0, "currency": "usd" },
        "titles": ["Engineer"]
    })
}

async fn add_employee(app: &axum::Router, body: &Value) -> Value {
    let response = app
        .clone()
        .oneshot(send_json("POST", "/employee", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    extract_json(response.into_body()).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "staffrec-server");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_create_normalizes_and_round_trips() {
    let app = setup_app().await;
    let created = add_employee(&app, &employee_json(1042, "2020-03-16")).await;

    // Server-side normalization applied before storage
    assert_eq!(created["name"], "Ivan");
    assert_eq!(created["surname"], "Petrov");
    assert_eq!(created["patronymic"], "Sergeevich");
    assert_eq!(created["salary"]["currency"], "USD");
    assert!(created["id"].as_i64().unwrap() > 0);

    // Reading back yields the identical aggregate
    let id = created["id"].as_i64().unwrap();
    let response = app
        .oneshot(get(&format!("/employee/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = extract_json(response.into_body()).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_validation_collects_field_errors() {
    let app = setup_app().await;
    let mut body = employee_json(1, "2020-01-01");
    body["name"] = json!("");
    body["service_number"] = json!(0);
    body["salary"]["currency"] = json!("DOLLARS");

    let response = app
        .oneshot(send_json("POST", "/employee", &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = extract_json(response.into_body()).await;
    let detail = body["detail"].as_array().expect("detail array");
    assert_eq!(detail.len(), 3);
    // Each entry carries the (loc, msg, kind) triple
    for entry in detail {
        assert!(entry["loc"].is_array());
        assert!(entry["msg"].is_string());
        assert!(entry["kind"].is_string());
    }
    let locs: Vec<Value> = detail.iter().map(|e| e["loc"].clone()).collect();
    assert!(locs.contains(&json!(["name"])));
    assert!(locs.contains(&json!(["service_number"])));
    assert!(locs.contains(&json!(["salary", "currency"])));
}

#[tokio::test]
async fn test_duplicate_service_number_is_wrong_data() {
    let app = setup_app().await;
    add_employee(&app, &employee_json(500, "2020-01-01")).await;

    let response = app
        .oneshot(send_json(
            "POST",
            "/employee",
            &employee_json(500, "2021-01-01"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["detail"][0]["loc"], json!(["service_number"]));
}

#[tokio::test]
async fn test_update_and_not_found() {
    let app = setup_app().await;
    let created = add_employee(&app, &employee_json(7, "2018-05-05")).await;
    let id = created["id"].as_i64().unwrap();

    let mut updated = employee_json(7, "2018-05-05");
    updated["department_number"] = json!(9);
    let response = app
        .clone()
        .oneshot(send_json("PUT", &format!("/employee/{}", id), &updated))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["department_number"], 9);
    assert_eq!(body["id"], id);

    let response = app
        .oneshot(send_json("PUT", "/employee/99999", &updated))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_returns_snapshot_and_new_id_on_recreate() {
    let app = setup_app().await;
    let created = add_employee(&app, &employee_json(12, "2019-02-02")).await;
    let id = created["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/employee/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let snapshot = extract_json(response.into_body()).await;
    assert_eq!(snapshot, created);

    // Gone now
    let response = app
        .clone()
        .oneshot(get(&format!("/employee/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deleting again reports not-found, no stale snapshot
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/employee/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Recreating from the snapshot assigns a fresh id
    let mut input = snapshot.clone();
    input.as_object_mut().unwrap().remove("id");
    let recreated = add_employee(&app, &input).await;
    assert_ne!(recreated["id"], id);
}

#[tokio::test]
async fn test_list_and_search() {
    let app = setup_app().await;
    add_employee(&app, &employee_json(1, "2020-01-01")).await;
    let mut other = employee_json(2, "2021-06-01");
    other["surname"] = json!("sidorov");
    other["titles"] = json!(["Researcher"]);
    add_employee(&app, &other).await;

    let response = app.clone().oneshot(get("/employees")).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    // Pagination
    let response = app
        .clone()
        .oneshot(get("/employees?skip=1&limit=1"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // Search by surname, case-normalized
    let response = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/search/employees",
            &json!({ "surname": "SIDOROV" }),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    let found = body.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["surname"], "Sidorov");

    // Search by title
    let response = app
        .oneshot(send_json(
            "POST",
            "/search/employees",
            &json!({ "title_name": "Researcher" }),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_statistics_endpoints() {
    let app = setup_app().await;
    let mut first = employee_json(1, "2015-01-01");
    first["salary"] = json!({ "amount": 100.0, "currency": "USD" });
    add_employee(&app, &first).await;

    let mut second = employee_json(2, "2020-01-01");
    second["surname"] = json!("sidorov");
    // 200 EUR is worth more than 100 USD at the sample rates
    second["salary"] = json!({ "amount": 200.0, "currency": "EUR" });
    add_employee(&app, &second).await;

    let response = app
        .clone()
        .oneshot(get("/statistics/longest-tenured?count=1"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["employment_date"], "2015-01-01");

    let response = app
        .clone()
        .oneshot(get("/statistics/highest-paid?count=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body[0]["surname"], "Sidorov");

    let response = app
        .oneshot(get("/statistics/highest-paid?count=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_growth_history_and_forecast() {
    let app = setup_app().await;
    // Engineers hired in 2020 (x2) and 2023 (x1)
    add_employee(&app, &employee_json(1, "2020-02-01")).await;
    add_employee(&app, &employee_json(2, "2020-09-15")).await;
    add_employee(&app, &employee_json(3, "2023-04-04")).await;

    let response = app
        .clone()
        .oneshot(get("/statistics/growth-history?title=Engineer"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(
        body,
        json!({ "2020": 2, "2021": 0, "2022": 0, "2023": 1 })
    );

    // Window of 4 years: (2 + 0 + 0 + 1) / 4 = 0.75 -> 1
    let response = app
        .clone()
        .oneshot(get("/forecasts/growth?title=Engineer&years=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body, json!({ "2024": 1 }));

    // Unknown title is reported as not-found, the client renders it as
    // insufficient data on the title field
    let response = app
        .clone()
        .oneshot(get("/forecasts/growth?title=Nobody&years=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get("/forecasts/growth?title=Engineer&years=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

fn sock(color: &str, cotton: i32, amount: i32) -> Value {
    json!({ "color": color, "cottonPercentage": cotton, "amount": amount })
}

async fn aggregate(app: &TestApp, color: &str, operation: &str, cotton: i32) -> (StatusCode, Value) {
    app.request_json(
        Method::GET,
        &format!("/socks?color={color}&operation={operation}&cotton={cotton}"),
        None,
    )
    .await
}

#[tokio::test]
async fn income_creates_then_merges_stock() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(Method::POST, "/socks/income", Some(sock("red", 70, 100)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["color"], "red");
    assert_eq!(body["cottonPercentage"], 70);
    assert_eq!(body["amount"], 100);
    let first_id = body["id"].as_i64().expect("record id");

    // Second arrival for the same pair merges into the same record.
    let (status, body) = app
        .request_json(Method::POST, "/socks/income", Some(sock("red", 70, 50)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64(), Some(first_id));
    assert_eq!(body["amount"], 150);

    let (status, body) = aggregate(&app, "red", "equal", 70).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 150);
}

#[tokio::test]
async fn aggregate_operators_filter_on_threshold() {
    let app = TestApp::new().await;
    app.request_json(Method::POST, "/socks/income", Some(sock("red", 70, 100)))
        .await;

    let (status, body) = aggregate(&app, "red", "equal", 70).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 100);

    // Strict comparison: 70 is not more than 70.
    let (status, body) = aggregate(&app, "red", "moreThan", 70).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 0);

    let (status, body) = aggregate(&app, "red", "lessThan", 80).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 100);

    // Color is an exact match.
    let (status, body) = aggregate(&app, "blue", "equal", 70).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 0);
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = aggregate(&app, "red", "atLeast", 70).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("atLeast"));
}

#[tokio::test]
async fn exact_outcome_deletes_the_record() {
    let app = TestApp::new().await;
    app.request_json(Method::POST, "/socks/income", Some(sock("blue", 80, 50)))
        .await;

    let (status, body) = app
        .request_json(Method::POST, "/socks/outcome", Some(sock("blue", 80, 50)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 0);

    let (status, body) = aggregate(&app, "blue", "equal", 80).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 0);
}

#[tokio::test]
async fn outcome_exceeding_stock_fails_and_leaves_stock_unchanged() {
    let app = TestApp::new().await;
    app.request_json(Method::POST, "/socks/income", Some(sock("blue", 80, 50)))
        .await;

    let (status, body) = app
        .request_json(Method::POST, "/socks/outcome", Some(sock("blue", 80, 51)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("available 50"));

    let (_, body) = aggregate(&app, "blue", "equal", 80).await;
    assert_eq!(body["amount"], 50);
}

#[tokio::test]
async fn outcome_for_unknown_pair_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request_json(Method::POST, "/socks/outcome", Some(sock("green", 10, 1)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn partial_outcome_decrements_stock() {
    let app = TestApp::new().await;
    app.request_json(Method::POST, "/socks/income", Some(sock("gray", 45, 30)))
        .await;

    let (status, body) = app
        .request_json(Method::POST, "/socks/outcome", Some(sock("gray", 45, 12)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 18);
}

#[tokio::test]
async fn update_applies_only_present_fields() {
    let app = TestApp::new().await;
    let (_, body) = app
        .request_json(Method::POST, "/socks/income", Some(sock("green", 55, 10)))
        .await;
    let id = body["id"].as_i64().unwrap();

    let (status, body) = app
        .request_json(
            Method::PUT,
            &format!("/socks/{id}"),
            Some(json!({ "amount": 99 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 99);
    assert_eq!(body["color"], "green");
    assert_eq!(body["cottonPercentage"], 55);
}

#[tokio::test]
async fn update_of_missing_id_is_not_found() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request_json(Method::PUT, "/socks/9999", Some(json!({ "amount": 1 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_to_an_existing_pair_conflicts() {
    let app = TestApp::new().await;
    app.request_json(Method::POST, "/socks/income", Some(sock("red", 70, 10)))
        .await;
    let (_, body) = app
        .request_json(Method::POST, "/socks/income", Some(sock("blue", 80, 10)))
        .await;
    let blue_id = body["id"].as_i64().unwrap();

    let (status, _) = app
        .request_json(
            Method::PUT,
            &format!("/socks/{blue_id}"),
            Some(json!({ "color": "red", "cottonPercentage": 70 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn filter_by_cotton_range_sorted() {
    let app = TestApp::new().await;
    for (color, cotton) in [("red", 70), ("blue", 80), ("amber", 50), ("zinc", 95)] {
        app.request_json(Method::POST, "/socks/income", Some(sock(color, cotton, 10)))
            .await;
    }

    let (status, body) = app
        .request_json(
            Method::GET,
            "/socks/filter-by-cotton?from=50&to=80&sortedBy=color",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let colors: Vec<&str> = body["socks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["color"].as_str().unwrap())
        .collect();
    assert_eq!(colors, vec!["amber", "blue", "red"]);

    let (status, body) = app
        .request_json(
            Method::GET,
            "/socks/filter-by-cotton?from=0&to=100&sortedBy=cotton",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let percentages: Vec<i64> = body["socks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["cottonPercentage"].as_i64().unwrap())
        .collect();
    assert_eq!(percentages, vec![50, 70, 80, 95]);
}

#[tokio::test]
async fn filter_with_unknown_sort_key_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::GET,
            "/socks/filter-by-cotton?from=0&to=100&sortedBy=invalid",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("invalid"));
}

#[tokio::test]
async fn batch_import_round_trip_preserves_order() {
    let app = TestApp::new().await;

    let csv = b"color,cottonPercentage,amount\nred,70,100\nblue,80,50\n";
    let (status, body) = app.upload("/socks/batch", "stock.csv", csv).await;
    assert_eq!(status, StatusCode::OK);

    let socks = body["socks"].as_array().unwrap();
    assert_eq!(socks.len(), 2);
    assert_eq!(socks[0]["color"], "red");
    assert_eq!(socks[0]["cottonPercentage"], 70);
    assert_eq!(socks[0]["amount"], 100);
    assert_eq!(socks[1]["color"], "blue");
    assert_eq!(socks[1]["cottonPercentage"], 80);
    assert_eq!(socks[1]["amount"], 50);
}

#[tokio::test]
async fn batch_import_rejects_empty_file() {
    let app = TestApp::new().await;

    let (status, body) = app.upload("/socks/batch", "stock.csv", b"").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn batch_import_rejects_wrong_extension() {
    let app = TestApp::new().await;

    let csv = b"color,cottonPercentage,amount\nred,70,100\n";
    let (status, body) = app.upload("/socks/batch", "stock.txt", csv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("format"));
}

#[tokio::test]
async fn batch_import_rejects_wrong_headers() {
    let app = TestApp::new().await;

    let (status, body) = app
        .upload("/socks/batch", "stock.csv", b"a,b,c\nred,70,100\n")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("headers"));
}

#[tokio::test]
async fn batch_import_rejects_malformed_rows() {
    let app = TestApp::new().await;

    let csv = b"color,cottonPercentage,amount\nred,70,not-a-number\n";
    let (status, body) = app.upload("/socks/batch", "stock.csv", csv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("not-a-number"));

    // The whole batch aborts; nothing is committed.
    let (_, body) = aggregate(&app, "red", "equal", 70).await;
    assert_eq!(body["amount"], 0);
}

#[tokio::test]
async fn invalid_income_payloads_are_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request_json(Method::POST, "/socks/income", Some(sock("red", 70, 0)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request_json(Method::POST, "/socks/income", Some(sock("red", 101, 5)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .request_json(Method::POST, "/socks/income", Some(sock("", 70, 5)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_up() {
    let app = TestApp::new().await;

    let (status, body) = app.request_json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
}

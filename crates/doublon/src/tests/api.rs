use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::tests::server;

#[tokio::test]
async fn index_reports_catalog_counts() {
  let server = server();
  let response = server.get("/").await;

  response.assert_status(StatusCode::OK);

  let body: Value = response.json();

  assert_eq!(body["service"], "doublon");
  assert_eq!(body["total_products"], 3);
  assert_eq!(body["active_products"], 1);
}

#[tokio::test]
async fn similar_ranks_candidates() {
  let server = server();

  let response = server.post("/similar").json(&json!({ "product_id": 1 })).await;

  response.assert_status(StatusCode::OK);

  let body: Value = response.json();

  assert_eq!(body["query_product"]["id"], 1);
  assert_eq!(body["parameters"]["top_n"], 10);
  assert_eq!(body["parameters"]["weights"]["text"], 0.8);

  let hits = body["similar_products"].as_array().unwrap();

  assert_eq!(hits.len(), 2);
  assert_eq!(hits[0]["rank"], 1);
  assert_eq!(hits[0]["id"], 2);
  assert_eq!(hits[0]["components"]["brand"], 1.0);
  assert!(hits[0]["score"].as_f64().unwrap() > hits[1]["score"].as_f64().unwrap());
  assert!(body["computation_time_ms"].is_number());
}

#[tokio::test]
async fn similar_honors_top_n_and_weights() {
  let server = server();

  let response = server
    .post("/similar")
    .json(&json!({
        "product_id": 1,
        "top_n": 1,
        "weights": { "text": 0.0, "nutrition": 1.0, "brand": 0.0, "barcode": 0.0 }
    }))
    .await;

  response.assert_status(StatusCode::OK);

  let body: Value = response.json();

  assert_eq!(body["similar_products"].as_array().unwrap().len(), 1);
  assert_eq!(body["parameters"]["weights"]["nutrition"], 1.0);
}

#[tokio::test]
async fn similar_rejects_bad_requests() {
  let server = server();

  let unknown = server.post("/similar").json(&json!({ "product_id": 99 })).await;

  unknown.assert_status(StatusCode::BAD_REQUEST);

  let uneven_weights = server
    .post("/similar")
    .json(&json!({
        "product_id": 1,
        "weights": { "text": 0.5, "nutrition": 0.0, "brand": 0.0, "barcode": 0.0 }
    }))
    .await;

  uneven_weights.assert_status(StatusCode::BAD_REQUEST);

  let zero_top_n = server.post("/similar").json(&json!({ "product_id": 1, "top_n": 0 })).await;

  zero_top_n.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_product_returns_the_full_record() {
  let server = server();

  let response = server.get("/products/1").await;

  response.assert_status(StatusCode::OK);

  let body: Value = response.json();

  assert_eq!(body["name"], "Acme Cola");
  assert_eq!(body["barcodes"], "3000000000011");
  assert_eq!(body["nutrition"]["energy"], 180.0);

  server.get("/products/99").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_products_partitions_on_activity() {
  let server = server();

  let inactive = server.get("/products").add_query_param("filter", "inactive").await;

  inactive.assert_status(StatusCode::OK);

  let body: Value = inactive.json();
  let ids = body.as_array().unwrap().iter().map(|product| product["id"].as_i64().unwrap()).collect::<Vec<_>>();

  assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn update_product_applies_patch_and_detects_conflicts() {
  let server = server();

  let response = server
    .post("/products/2")
    .json(&json!({ "name": "Acme Cola Zero Sugar", "set_active": true, "expected_version": 0 }))
    .await;

  response.assert_status(StatusCode::OK);

  let body: Value = response.json();

  assert_eq!(body["name"], "Acme Cola Zero Sugar");
  assert_eq!(body["active"], true);
  assert_eq!(body["version"], 1);

  let stale = server.post("/products/2").json(&json!({ "name": "again", "expected_version": 0 })).await;

  stale.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn link_merges_and_rejects_replays() {
  let server = server();

  let response = server.post("/link").json(&json!({ "master_id": 1, "duplicate_ids": [2] })).await;

  response.assert_status(StatusCode::OK);

  let body: Value = response.json();

  assert_eq!(body["master"]["id"], 1);
  assert_eq!(body["master"]["barcodes"], "3000000000011;3000000000028");
  assert_eq!(body["superseded"], json!([2]));

  // The superseded record stays readable, with its linking trail.
  let superseded: Value = server.get("/products/2").await.json();

  assert_eq!(superseded["superseded_by"], 1);
  assert!(superseded["deleted_at"].is_string());

  server.post("/link").json(&json!({ "master_id": 1, "duplicate_ids": [2] })).await.assert_status(StatusCode::CONFLICT);
  server.post("/link").json(&json!({ "master_id": 1, "duplicate_ids": [1] })).await.assert_status(StatusCode::BAD_REQUEST);
  server.post("/link").json(&json!({ "master_id": 1, "duplicate_ids": [] })).await.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn stats_exposes_nutrition_aggregates() {
  let server = server();

  let response = server.get("/stats").await;

  response.assert_status(StatusCode::OK);

  let body: Value = response.json();

  assert_eq!(body["total_products"], 3);
  assert_eq!(body["products_with_barcode"], 3);
  assert_eq!(body["nutrition_stats"]["energy"]["min"], 1.0);
  assert_eq!(body["nutrition_stats"]["energy"]["max"], 180.0);
}

#[tokio::test]
async fn probes_respond() {
  let server = server();

  server.get("/healthz").await.assert_status(StatusCode::OK);
  server.get("/readyz").await.assert_status(StatusCode::OK);
  server.get("/nope").await.assert_status(StatusCode::NOT_FOUND);
}

use axum::{
  Router,
  routing::{get, post},
};
use axum_test::TestServer;
use libdoublon::prelude::*;

use crate::api::{AppState, config::{Config, Env}, handlers};

mod api;

fn test_config() -> Config {
  Config {
    env: Env::Dev,
    listen_addr: "127.0.0.1:0".to_string(),
    catalog_path: "catalog.jsonl".to_string(),
    embedding_url: "http://localhost:8600".to_string(),
    embedding_timeout: 5,
    top_n_results: 10,
    enable_prometheus: false,
  }
}

fn catalog() -> Vec<Product> {
  vec![
    Product::builder(1)
      .name("Acme Cola")
      .brand("Acme")
      .category("beverages")
      .barcodes(&["3000000000011"])
      .nutrition(Nutrition {
        energy: Some(180.0),
        sugar: Some(10.5),
        ..Default::default()
      })
      .active(true)
      .build(),
    Product::builder(2)
      .name("Acme Cola Zero")
      .brand("Acme")
      .category("beverages")
      .barcodes(&["3000000000028"])
      .nutrition(Nutrition {
        energy: Some(1.0),
        sugar: Some(0.0),
        ..Default::default()
      })
      .build(),
    Product::builder(3).name("Umbrella Instant Soup").brand("Umbrella").category("soups").barcodes(&["3000000000035"]).build(),
  ]
}

pub fn server() -> TestServer {
  let state = AppState {
    config: test_config(),
    prometheus: None,
    doublon: Doublon::new(MemoryStore::with_products(catalog()), StubEmbedder::default()),
  };

  let app = Router::new()
    .route("/", get(handlers::index))
    .route("/similar", post(handlers::similar))
    .route("/products", get(handlers::list_products))
    .route("/products/{id}", get(handlers::get_product).post(handlers::update_product))
    .route("/link", post(handlers::link))
    .route("/stats", get(handlers::stats))
    .route("/healthz", get(handlers::healthz))
    .route("/readyz", get(handlers::readyz))
    .fallback(handlers::not_found)
    .with_state(state);

  TestServer::new(app)
}

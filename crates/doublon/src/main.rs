mod api;
mod trace;

#[cfg(test)]
mod tests;

use std::time::Duration;

use libdoublon::prelude::*;
use tokio::signal;

use crate::api::config::Config;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let config = Config::from_env()?;

  let products = load_snapshot(&config.catalog_path)?;
  let store = MemoryStore::with_products(products);
  let embedder = HttpEmbeddingProvider::new(&config.embedding_url, Duration::from_secs(config.embedding_timeout))?;

  run(config, store, embedder).await
}

async fn run<S: CatalogStore, E: EmbeddingProvider>(config: Config, store: S, embedder: E) -> anyhow::Result<()> {
  let _guards = trace::init_tracing(&config, std::io::stdout());

  libdoublon::init();

  let app = api::routes(&config, store, embedder).await?;
  let listener = tokio::net::TcpListener::bind(&config.listen_addr).await.expect("could not create listener");

  tracing::info!(doublon = env!("CARGO_PKG_VERSION"), "listening on {}", listener.local_addr()?.to_string());

  axum::serve(listener, app).with_graceful_shutdown(shutdown()).await.expect("could not start app");

  Ok(())
}

async fn shutdown() {
  let ctrl_c = async {
    signal::ctrl_c().await.expect("failed to install ^C handler");
  };

  let terminate = async {
    signal::unix::signal(signal::unix::SignalKind::terminate())
      .expect("failed to install terminate signal handler")
      .recv()
      .await;
  };

  tokio::select! {
      () = ctrl_c => tracing::info!("received ^C, initiating shutdown"),
      () = terminate => tracing::info!("received terminate signal, initiating shutdown"),
  }
}

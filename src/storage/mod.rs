//! Storage Node Module
//!
//! A single-process, in-memory key/value service. The sender writes pairs here after the
//! ring has picked the owning node; clients may read them back one at a time or in bulk.
//!
//! - **`memory`**: The `KeyStore` holding integer keys and string values.
//! - **`handlers`**: axum handlers for the `/keys` endpoints.
//! - **`protocol`**: Endpoint paths and JSON bodies shared with the sender.

pub mod handlers;
pub mod memory;
pub mod protocol;


use anyhow::{Context, Result};
use axum::{
    Router,
    extract::Extension,
    routing::{get, put},
};
use std::net::SocketAddr;
use std::sync::Arc;

use handlers::{handle_get, handle_list, handle_put};
use memory::KeyStore;

/// Builds the HTTP router of a storage node around `store`.
pub fn router(store: Arc<KeyStore>) -> Router {
    Router::new()
        .route("/keys", get(handle_list))
        .route("/keys/:key", get(handle_get))
        .route("/keys/:key/:value", put(handle_put))
        .layer(Extension(store))
}

/// Binds `addr` and serves `store` until the process stops.
pub async fn serve(addr: SocketAddr, store: Arc<KeyStore>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind storage node on {}", addr))?;

    tracing::info!("Storage node listening on {}", listener.local_addr()?);

    axum::serve(listener, router(store)).await?;
    Ok(())
}

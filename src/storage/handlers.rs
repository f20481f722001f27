use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
};
use std::sync::Arc;

use super::memory::KeyStore;
use super::protocol::{AllPairs, ErrorResponse, Pair};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn parse_key(raw: &str) -> Result<i64, HandlerError> {
    raw.parse().map_err(|e| {
        tracing::warn!("Rejected non-numeric key {:?}: {}", raw, e);
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("key must be an integer, got {:?}", raw),
            }),
        )
    })
}

pub async fn handle_put(
    Extension(store): Extension<Arc<KeyStore>>,
    Path((key_str, value)): Path<(String, String)>,
) -> Result<(StatusCode, Json<Pair>), HandlerError> {
    let key = parse_key(&key_str)?;
    let pair = store.put(key, value);

    tracing::info!("Stored key {} ({} entries)", pair.key, store.len());
    Ok((StatusCode::CREATED, Json(pair)))
}

pub async fn handle_get(
    Extension(store): Extension<Arc<KeyStore>>,
    Path(key_str): Path<String>,
) -> Result<(StatusCode, Json<Pair>), HandlerError> {
    let key = parse_key(&key_str)?;

    match store.get(key) {
        Some(pair) => Ok((StatusCode::OK, Json(pair))),
        None => {
            tracing::debug!("Key {} not found", key);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("key {} not found", key),
                }),
            ))
        }
    }
}

pub async fn handle_list(
    Extension(store): Extension<Arc<KeyStore>>,
) -> (StatusCode, Json<AllPairs>) {
    (
        StatusCode::OK,
        Json(AllPairs {
            pairs: store.all(),
        }),
    )
}

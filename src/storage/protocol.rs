//! Storage Network Protocol
//!
//! Defines the HTTP endpoints and JSON bodies exposed by a storage node.

use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Collection endpoint. `PUT {ENDPOINT_KEYS}/:key/:value` stores a pair,
/// `GET {ENDPOINT_KEYS}/:key` reads one back, `GET {ENDPOINT_KEYS}` lists all.
pub const ENDPOINT_KEYS: &str = "/keys";

// --- Data Transfer Objects ---

/// A single stored entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Pair {
    pub key: i64,
    pub value: String,
}

impl Pair {
    pub fn new(key: i64, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Response for the list endpoint, ordered by key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllPairs {
    pub pairs: Vec<Pair>,
}

/// Body returned with any non-success status.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

//! Consistent-Hashing Key/Value Router
//!
//! Routes string keys to weighted storage nodes so the same key always lands on the same
//! node while load spreads in proportion to node weight.
//!
//! ## Modules
//! - **`ring`**: The consistent hash ring. Places virtual positions for every node, resolves
//!   keys by successor search, and guards both behind a single reader/writer lock.
//! - **`storage`**: The storage node. An in-memory key/value store served over HTTP.
//! - **`client`**: The sender. Routes pairs through the ring and writes them to their owners.
//! - **`config`**: Command-line and environment parsing for the binary.

pub mod client;
pub mod config;
pub mod ring;
pub mod storage;

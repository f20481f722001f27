//! Consistent Hashing Module
//!
//! Routes string keys to one of several weighted storage nodes.
//!
//! ## Core Concepts
//! - **Virtual positions**: Every node is hashed onto a 32-bit ring `replicas * weight` times,
//!   so heavier nodes own a proportionally larger share of the key space.
//! - **Registry**: Maps each ring position to the node that owns it. Colliding positions are
//!   resolved by last write wins.
//! - **Lookup**: A key is hashed with the same function and resolved by successor search on the
//!   sorted ring.
//! - **Locking**: A single reader/writer lock serializes node registration against lookups.

pub mod consistent;
pub mod hash;
pub mod types;

pub use consistent::{ConsistentHash, DEFAULT_REPLICAS};
pub use types::{Node, NodeId, RingError};

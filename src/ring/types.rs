use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A storage node that can own ring positions.
///
/// `address` is both part of the hash input for the node's virtual positions and the
/// base URL the sender writes to. `weight` is a relative capacity; a node with weight 2
/// receives twice as many virtual positions as a node with weight 1.
///
/// Fields are only reachable through accessors so every `Node`, deserialized ones
/// included, has passed the weight check in [`Node::new`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "NodeRecord")]
pub struct Node {
    id: NodeId,
    address: String,
    weight: u32,
}

impl Node {
    pub fn new(id: u64, address: impl Into<String>, weight: u32) -> Result<Self, RingError> {
        if weight == 0 {
            return Err(RingError::ZeroWeight { id: NodeId(id) });
        }
        Ok(Self {
            id: NodeId(id),
            address: address.into(),
            weight,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

#[derive(Deserialize)]
struct NodeRecord {
    id: NodeId,
    address: String,
    weight: u32,
}

impl TryFrom<NodeRecord> for Node {
    type Error = RingError;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        Node::new(record.id.0, record.address, record.weight)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RingError {
    /// A lookup was issued before any node was added.
    #[error("hash ring is empty, add a node before looking up keys")]
    EmptyRing,

    #[error("node {id} has zero weight")]
    ZeroWeight { id: NodeId },

    #[error("replica count must be positive")]
    ZeroReplicas,
}

use parking_lot::RwLock;
use std::collections::HashMap;

use super::hash::{self, HashFn};
use super::types::{Node, NodeId, RingError};

/// Virtual positions generated per unit of node weight.
pub const DEFAULT_REPLICAS: u32 = 10;

#[derive(Default)]
struct RingState {
    /// Ring position -> owning node. Colliding positions keep the last writer.
    registry: HashMap<u32, Node>,
    members: HashMap<NodeId, Node>,
    /// Every registry key, sorted ascending. Rebuilt in full on each add.
    ring: Vec<u32>,
}

impl RingState {
    fn rebuild(&mut self) {
        self.ring = self.registry.keys().copied().collect();
        self.ring.sort_unstable();
    }
}

/// Weighted consistent hash ring.
///
/// Callers only ever see copies of [`Node`]; the registry and the sorted ring stay
/// behind the lock and are mutated exclusively through [`ConsistentHash::add`].
pub struct ConsistentHash {
    replicas: u32,
    hash: HashFn,
    state: RwLock<RingState>,
}

impl ConsistentHash {
    pub fn new() -> Self {
        Self::build(DEFAULT_REPLICAS, hash::crc32)
    }

    pub fn with_replicas(replicas: u32) -> Result<Self, RingError> {
        Self::with_hasher(replicas, hash::crc32)
    }

    /// Builds a ring that places both positions and keys with `hash`.
    pub fn with_hasher(replicas: u32, hash: HashFn) -> Result<Self, RingError> {
        if replicas == 0 {
            return Err(RingError::ZeroReplicas);
        }
        Ok(Self::build(replicas, hash))
    }

    fn build(replicas: u32, hash: HashFn) -> Self {
        Self {
            replicas,
            hash,
            state: RwLock::new(RingState::default()),
        }
    }

    /// Registers `node` and its `replicas * weight` virtual positions.
    ///
    /// Returns `false` without touching any state if a node with the same id was
    /// already added.
    pub fn add(&self, node: Node) -> bool {
        let mut state = self.state.write();

        if state.members.contains_key(&node.id()) {
            tracing::debug!("Node {} already on the ring, ignoring", node.id());
            return false;
        }

        // Widened so the product never wraps or caps.
        let count = u64::from(self.replicas) * u64::from(node.weight());
        for i in 0..count {
            let key = hash::position_key(node.address(), node.weight(), i, node.id().0);
            let position = (self.hash)(key.as_bytes());
            state.registry.insert(position, node.clone());
        }

        state.members.insert(node.id(), node.clone());
        state.rebuild();

        tracing::debug!(
            "Added node {} ({}) with {} positions, ring size {}",
            node.id(),
            node.address(),
            count,
            state.ring.len()
        );
        true
    }

    /// Resolves `key` to the node owning its successor position on the ring.
    pub fn get(&self, key: impl AsRef<[u8]>) -> Result<Node, RingError> {
        let state = self.state.read();

        if state.ring.is_empty() {
            return Err(RingError::EmptyRing);
        }

        let hash = (self.hash)(key.as_ref());
        let position = state.ring[successor_index(&state.ring, hash)];

        // Every ring value is a registry key.
        Ok(state.registry[&position].clone())
    }

    /// Number of positions currently on the ring.
    pub fn len(&self) -> usize {
        self.state.read().ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().ring.is_empty()
    }

    pub fn replicas(&self) -> u32 {
        self.replicas
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.state.read().members.contains_key(&id)
    }

    /// Registered nodes ordered by id.
    pub fn nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.state.read().members.values().cloned().collect();
        nodes.sort_by_key(|n| n.id());
        nodes
    }

    /// Ring positions currently owned by `id`, after collision overwrites.
    pub fn positions_of(&self, id: NodeId) -> usize {
        self.state
            .read()
            .registry
            .values()
            .filter(|node| node.id() == id)
            .count()
    }

    #[cfg(test)]
    pub(crate) fn ring_snapshot(&self) -> Vec<u32> {
        self.state.read().ring.clone()
    }
}

impl Default for ConsistentHash {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the ring index for `hash` given an ascending, non-empty `ring`.
///
/// The first index whose value is `>= hash` wins, with two boundary rules: a hash
/// above every position resolves to the last index, and a hit on the last index
/// resolves to index 0.
pub(crate) fn successor_index(ring: &[u32], hash: u32) -> usize {
    let i = ring.partition_point(|&position| position < hash);
    if i == ring.len() {
        ring.len() - 1
    } else if i == ring.len() - 1 {
        0
    } else {
        i
    }
}

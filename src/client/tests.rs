//! Sender Module Tests
//!
//! Spins real storage nodes on ephemeral ports and routes pairs to them through the ring.

#[cfg(test)]
mod tests {
    use crate::client::KeySender;
    use crate::ring::{ConsistentHash, Node};
    use crate::storage::memory::KeyStore;
    use crate::storage::protocol::Pair;
    use crate::storage::router;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    async fn spawn_storage_node() -> (String, Arc<KeyStore>) {
        let store = Arc::new(KeyStore::new());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();

        let app = router(store.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), store)
    }

    fn sample_pairs() -> Vec<Pair> {
        ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]
            .iter()
            .enumerate()
            .map(|(i, v)| Pair::new(i as i64 + 1, *v))
            .collect()
    }

    // ============================================================
    // ROUTING TESTS
    // ============================================================

    #[test]
    fn test_route_uses_value_not_key() {
        let ring = Arc::new(ConsistentHash::new());
        for id in 0..3 {
            ring.add(Node::new(id, format!("http://localhost:{}", 3000 + id), 1).unwrap());
        }
        let sender = KeySender::new(ring.clone());

        let pairs = vec![Pair::new(1, "same"), Pair::new(99, "same")];
        let placements = sender.route(&pairs).unwrap();

        assert_eq!(placements[0].node, placements[1].node);
        assert_eq!(placements[0].node, ring.get("same").unwrap());
    }

    #[test]
    fn test_route_preserves_input_order() {
        let ring = Arc::new(ConsistentHash::new());
        ring.add(Node::new(0, "http://localhost:3000", 1).unwrap());
        let sender = KeySender::new(ring);

        let pairs = sample_pairs();
        let placements = sender.route(&pairs).unwrap();

        let routed: Vec<Pair> = placements.into_iter().map(|p| p.pair).collect();
        assert_eq!(routed, pairs);
    }

    #[test]
    fn test_route_on_empty_ring_fails() {
        let sender = KeySender::new(Arc::new(ConsistentHash::new()));
        assert!(sender.route(&sample_pairs()).is_err());
    }

    // ============================================================
    // SEND TESTS (live storage nodes)
    // ============================================================

    #[tokio::test]
    async fn test_put_stores_pair_on_node() {
        let (address, store) = spawn_storage_node().await;
        let node = Node::new(0, address, 1).unwrap();
        let sender = KeySender::new(Arc::new(ConsistentHash::new()));

        let echoed = sender.put(&Pair::new(4, "d"), &node).await.unwrap();

        assert_eq!(echoed, Pair::new(4, "d"));
        assert_eq!(store.get(4), Some(Pair::new(4, "d")));
    }

    #[tokio::test]
    async fn test_dispatch_places_every_pair_on_its_owner() {
        let ring = Arc::new(ConsistentHash::new());
        let mut stores = Vec::new();
        for id in 0..3 {
            let (address, store) = spawn_storage_node().await;
            assert!(ring.add(Node::new(id, address, 1).unwrap()));
            stores.push(store);
        }

        let sender = KeySender::new(ring.clone());
        let placements = sender.dispatch(&sample_pairs()).await.unwrap();

        assert_eq!(placements.len(), 10);
        for placement in &placements {
            let store = &stores[placement.node.id().0 as usize];
            assert_eq!(store.get(placement.pair.key), Some(placement.pair.clone()));
        }

        let total: usize = stores.iter().map(|s| s.len()).sum();
        assert_eq!(total, 10, "Each pair should be stored exactly once");
    }

    #[tokio::test]
    async fn test_put_to_unreachable_node_fails() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let node = Node::new(0, format!("http://{}", addr), 1).unwrap();
        let sender = KeySender::with_timeout(
            Arc::new(ConsistentHash::new()),
            Duration::from_millis(500),
        );

        assert!(sender.put(&Pair::new(1, "a"), &node).await.is_err());
    }

    #[tokio::test]
    async fn test_dispatch_stops_at_unreachable_owner() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let ring = Arc::new(ConsistentHash::new());
        ring.add(Node::new(0, format!("http://{}", addr), 1).unwrap());
        let sender = KeySender::with_timeout(ring, Duration::from_millis(500));

        let err = sender.dispatch(&sample_pairs()).await.unwrap_err();
        assert!(
            format!("{:#}", err).contains(&addr.to_string()),
            "Error should name the failing node, got: {:#}",
            err
        );
    }
}

use anyhow::{Context, Result, anyhow};
use std::sync::Arc;
use std::time::Duration;

use crate::ring::{ConsistentHash, Node};
use crate::storage::protocol::{ENDPOINT_KEYS, Pair};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Where a pair ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub pair: Pair,
    pub node: Node,
}

pub struct KeySender {
    ring: Arc<ConsistentHash>,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl KeySender {
    pub fn new(ring: Arc<ConsistentHash>) -> Self {
        Self::with_timeout(ring, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(ring: Arc<ConsistentHash>, timeout: Duration) -> Self {
        Self {
            ring,
            http_client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Resolves every pair to its owning node, keyed by the pair's value.
    pub fn route(&self, pairs: &[Pair]) -> Result<Vec<Placement>> {
        pairs
            .iter()
            .map(|pair| {
                let node = self
                    .ring
                    .get(&pair.value)
                    .with_context(|| format!("cannot route pair {}", pair.key))?;
                tracing::debug!("Pair {} ({}) -> node {}", pair.key, pair.value, node.id());
                Ok(Placement {
                    pair: pair.clone(),
                    node,
                })
            })
            .collect()
    }

    /// Writes `pair` to `node` and returns the pair echoed back by the node.
    pub async fn put(&self, pair: &Pair, node: &Node) -> Result<Pair> {
        let url = put_url(node.address(), pair)?;

        let response = self
            .http_client
            .put(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .with_context(|| format!("PUT {} failed", url))?;

        if !response.status().is_success() {
            return Err(anyhow!("PUT {} returned {}", url, response.status()));
        }

        let stored: Pair = response.json().await?;
        Ok(stored)
    }

    /// Routes and writes every pair. The first failed write aborts the run.
    pub async fn dispatch(&self, pairs: &[Pair]) -> Result<Vec<Placement>> {
        let placements = self.route(pairs)?;

        for placement in &placements {
            if let Err(e) = self.put(&placement.pair, &placement.node).await {
                tracing::error!(
                    "Failed to send key {} to node {}: {:#}",
                    placement.pair.key,
                    placement.node.id(),
                    e
                );
                return Err(e);
            }
            tracing::info!(
                "Sent key {} to node {} at {}",
                placement.pair.key,
                placement.node.id(),
                placement.node.address()
            );
        }

        Ok(placements)
    }
}

fn put_url(address: &str, pair: &Pair) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(address)
        .with_context(|| format!("invalid node address {:?}", address))?;

    url.path_segments_mut()
        .map_err(|_| anyhow!("node address {:?} cannot be a base URL", address))?
        .pop_if_empty()
        .push(ENDPOINT_KEYS.trim_start_matches('/'))
        .push(&pair.key.to_string())
        .push(&pair.value);

    Ok(url)
}

#[cfg(test)]
mod url_tests {
    use super::*;

    #[test]
    fn test_put_url_layout() {
        let url = put_url("http://localhost:3000", &Pair::new(1, "a")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/keys/1/a");
    }

    #[test]
    fn test_put_url_encodes_value() {
        let url = put_url("http://localhost:3000/", &Pair::new(2, "a b/c")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/keys/2/a%20b%2Fc");
    }

    #[test]
    fn test_put_url_rejects_bad_address() {
        assert!(put_url("localhost", &Pair::new(1, "a")).is_err());
    }
}

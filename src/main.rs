use ring_kv::client::KeySender;
use ring_kv::config::{self, Mode, RouteConfig};
use ring_kv::ring::ConsistentHash;
use ring_kv::storage::{self, memory::KeyStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mode = match config::from_env() {
        Ok(mode) => mode,
        Err(e) => {
            let program = std::env::args().next().unwrap_or_else(|| "ring_kv".to_string());
            eprintln!("Error: {:#}", e);
            eprintln!("{}", config::usage(&program));
            std::process::exit(1);
        }
    };

    match mode {
        Mode::Serve { bind } => {
            tracing::info!("Starting storage node on {}", bind);
            storage::serve(bind, Arc::new(KeyStore::new())).await?;
        }
        Mode::Route(route) => run_route(route).await?,
    }

    Ok(())
}

async fn run_route(config: RouteConfig) -> anyhow::Result<()> {
    let ring = Arc::new(ConsistentHash::with_replicas(config.replicas)?);

    for node in config.nodes {
        let (id, address) = (node.id(), node.address().to_string());
        if ring.add(node) {
            tracing::info!("Node {} at {} joined the ring", id, address);
        } else {
            tracing::warn!("Node {} listed twice, skipping {}", id, address);
        }
    }

    tracing::info!(
        "Ring ready: {} nodes, {} positions ({} replicas per weight)",
        ring.nodes().len(),
        ring.len(),
        ring.replicas()
    );

    let sender = KeySender::new(ring);
    let placements = sender.dispatch(&config.pairs).await?;

    for placement in placements {
        println!(
            "{} = {:?} -> node {} ({})",
            placement.pair.key,
            placement.pair.value,
            placement.node.id(),
            placement.node.address()
        );
    }

    Ok(())
}

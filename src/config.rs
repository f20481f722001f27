//! Command-line and environment configuration for the `ring_kv` binary.
//!
//! ```text
//! ring_kv serve [--bind <addr:port>]
//! ring_kv route [--node <id>,<address>,<weight>]... [--pair <key>=<value>]... [--replicas <n>]
//! ```

use anyhow::{Context, Result, anyhow, bail};
use std::net::SocketAddr;

use crate::ring::{DEFAULT_REPLICAS, Node};
use crate::storage::protocol::Pair;

pub const ENV_BIND: &str = "RING_KV_BIND";
/// `;`-separated `id,address,weight` triples used when no `--node` is given.
pub const ENV_NODES: &str = "RING_KV_NODES";

const DEFAULT_BIND: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Serve { bind: SocketAddr },
    Route(RouteConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub nodes: Vec<Node>,
    pub pairs: Vec<Pair>,
    pub replicas: u32,
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} serve [--bind <addr:port>]\n       \
         {program} route [--node <id>,<address>,<weight>]... [--pair <key>=<value>]... \
         [--replicas <n>]\n\
         Example: {program} serve --bind 127.0.0.1:3001\n\
         Example: {program} route --node 0,http://localhost:3000,1 \
         --node 1,http://localhost:3001,2 --pair 1=a"
    )
}

/// Parses the process arguments, excluding the program name.
pub fn parse_args(
    args: &[String],
    env_bind: Option<String>,
    env_nodes: Option<String>,
) -> Result<Mode> {
    let Some((command, rest)) = args.split_first() else {
        bail!("missing command");
    };

    match command.as_str() {
        "serve" => parse_serve(rest, env_bind),
        "route" => parse_route(rest, env_nodes),
        other => Err(anyhow!("unknown command {:?}", other)),
    }
}

/// Parses [`std::env::args`] with the `RING_KV_*` variables as fallbacks.
pub fn from_env() -> Result<Mode> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args(
        &args,
        std::env::var(ENV_BIND).ok(),
        std::env::var(ENV_NODES).ok(),
    )
}

fn parse_serve(args: &[String], env_bind: Option<String>) -> Result<Mode> {
    let mut bind = env_bind.unwrap_or_else(|| DEFAULT_BIND.to_string());

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" => {
                bind = flag_value(args, i)?.to_string();
                i += 2;
            }
            other => bail!("unexpected argument {:?}", other),
        }
    }

    let bind = bind
        .parse()
        .with_context(|| format!("invalid bind address {:?}", bind))?;
    Ok(Mode::Serve { bind })
}

fn parse_route(args: &[String], env_nodes: Option<String>) -> Result<Mode> {
    let mut nodes = Vec::new();
    let mut pairs = Vec::new();
    let mut replicas = DEFAULT_REPLICAS;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--node" => {
                nodes.push(parse_node(flag_value(args, i)?)?);
                i += 2;
            }
            "--pair" => {
                pairs.push(parse_pair(flag_value(args, i)?)?);
                i += 2;
            }
            "--replicas" => {
                let raw = flag_value(args, i)?;
                replicas = raw
                    .parse()
                    .with_context(|| format!("invalid replica count {:?}", raw))?;
                if replicas == 0 {
                    bail!("replica count must be positive");
                }
                i += 2;
            }
            other => bail!("unexpected argument {:?}", other),
        }
    }

    if nodes.is_empty() {
        nodes = match env_nodes {
            Some(raw) => raw
                .split(';')
                .filter(|s| !s.trim().is_empty())
                .map(parse_node)
                .collect::<Result<_>>()?,
            None => default_nodes()?,
        };
    }
    if pairs.is_empty() {
        pairs = default_pairs();
    }

    Ok(Mode::Route(RouteConfig {
        nodes,
        pairs,
        replicas,
    }))
}

fn flag_value(args: &[String], i: usize) -> Result<&str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires a value", args[i]))
}

/// Parses `id,address,weight`.
pub fn parse_node(raw: &str) -> Result<Node> {
    let parts: Vec<&str> = raw.trim().split(',').collect();
    let [id, address, weight] = parts.as_slice() else {
        bail!("node must be id,address,weight, got {:?}", raw);
    };

    let id: u64 = id
        .parse()
        .with_context(|| format!("invalid node id {:?}", id))?;
    let weight: u32 = weight
        .parse()
        .with_context(|| format!("invalid node weight {:?}", weight))?;

    Ok(Node::new(id, *address, weight)?)
}

/// Parses `key=value`.
pub fn parse_pair(raw: &str) -> Result<Pair> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("pair must be key=value, got {:?}", raw))?;
    let key: i64 = key
        .parse()
        .with_context(|| format!("invalid pair key {:?}", key))?;
    Ok(Pair::new(key, value))
}

fn default_nodes() -> Result<Vec<Node>> {
    (0..3u64)
        .map(|id| -> Result<Node> {
            Ok(Node::new(id, format!("http://localhost:{}", 3000 + id), 1)?)
        })
        .collect()
}

fn default_pairs() -> Vec<Pair> {
    ('a'..='j')
        .enumerate()
        .map(|(i, c)| Pair::new(i as i64 + 1, c.to_string()))
        .collect()
}

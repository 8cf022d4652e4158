//! Server configuration from environment variables

use anyhow::Context;
use std::net::SocketAddr;

const BIND_ADDR_VAR: &str = "SCHEDULES_BIND_ADDR";
const AWAY_MODE_VAR: &str = "SCHEDULES_AWAY_MODE";
const SEED_DEMO_VAR: &str = "SCHEDULES_SEED_DEMO";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address the HTTP server listens on
    pub bind_addr: SocketAddr,
    /// Start with away mode switched on
    pub away_mode: bool,
    /// Populate the book with sample schedules on start-up
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            away_mode: false,
            seed_demo: true,
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = match lookup(BIND_ADDR_VAR) {
            Some(value) => value
                .parse()
                .with_context(|| format!("{BIND_ADDR_VAR}: invalid socket address {value:?}"))?,
            None => defaults.bind_addr,
        };

        let away_mode = match lookup(AWAY_MODE_VAR) {
            Some(value) => parse_bool(AWAY_MODE_VAR, &value)?,
            None => defaults.away_mode,
        };

        let seed_demo = match lookup(SEED_DEMO_VAR) {
            Some(value) => parse_bool(SEED_DEMO_VAR, &value)?,
            None => defaults.seed_demo,
        };

        Ok(Self {
            bind_addr,
            away_mode,
            seed_demo,
        })
    }
}

fn parse_bool(name: &str, value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("{name}: expected true or false, got {value:?}"),
    }
}

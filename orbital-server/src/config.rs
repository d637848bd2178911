//! Server configuration from the environment

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_STORAGE_PATH: &str = "./orbital_data";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Root of the authoritative store and the catalog index
    pub storage_path: PathBuf,

    pub bind_addr: SocketAddr,

    /// `*`, a comma-separated list of origins, or unset for localhost dev origins
    pub cors_origins: Option<String>,
}

impl ServerConfig {
    /// Read `ORBITAL_STORAGE_PATH`, `ORBITAL_BIND_ADDR` and `ORBITAL_CORS_ORIGINS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let storage_path = lookup("ORBITAL_STORAGE_PATH")
            .unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_string());

        let bind_addr = lookup("ORBITAL_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("Invalid ORBITAL_BIND_ADDR: {}", bind_addr))?;

        Ok(Self {
            storage_path: PathBuf::from(storage_path),
            bind_addr,
            cors_origins: lookup("ORBITAL_CORS_ORIGINS"),
        })
    }

    /// Catalog index maintained by the catalog service
    pub fn catalog_path(&self) -> PathBuf {
        self.storage_path.join("catalog.json")
    }
}

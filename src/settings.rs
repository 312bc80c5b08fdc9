use crate::repository::DEFAULT_NAMESPACE;
use crate::storage::resolve_data_path;
use std::{env, net::SocketAddr, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;

/// Process settings read from the environment at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
    pub namespace: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, std::io::Error> {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let namespace = env::var("TRACKER_NAMESPACE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        Ok(Self {
            port,
            data_path: resolve_data_path()?,
            namespace,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

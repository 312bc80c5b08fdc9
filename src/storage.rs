use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::{env, path::Path, path::PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write store: {0}")]
    Io(#[from] std::io::Error),
}

/// Get/set-by-key JSON storage. Reads never fail: a missing key is `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Every stored key and its JSON value, kept in memory and written to disk as one file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub entries: BTreeMap<String, Value>,
}

impl KeyValueStore for AppData {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/state.json"))
}

pub async fn load_data(path: &Path) -> AppData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                AppData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => AppData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            AppData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}

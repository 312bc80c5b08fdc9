use crate::storage::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub namespace: Arc<str>,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, namespace: impl Into<Arc<str>>, data: AppData) -> Self {
        Self {
            data_path,
            namespace: namespace.into(),
            data: Arc::new(Mutex::new(data)),
        }
    }
}

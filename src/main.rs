use daily_tracker::{AppState, Settings, load_data, router};
use tokio::fs;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let settings = Settings::from_env()?;
    if let Some(parent) = settings.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let data = load_data(&settings.data_path).await;
    info!(
        entries = data.entries.len(),
        path = %settings.data_path.display(),
        namespace = %settings.namespace,
        "loaded store"
    );
    let state = AppState::new(settings.data_path.clone(), settings.namespace.as_str(), data);
    let app = router(state);

    let addr = settings.addr();
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}

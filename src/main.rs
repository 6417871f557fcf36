use std::sync::Arc;

use maumjari_backend::config::Config;
use maumjari_backend::routes;
use maumjari_backend::state::AppState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("configuration error: {err}");
            error!("{}", err.instructions());
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(&config)?);
    let app = routes::create_router(state, &config.static_dir);

    let addr = format!("{}:{}", config.bind_addr, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        provider = config.chat_provider.name(),
        report_url = %config.report_url,
        "Maumjari backend running at http://{addr}"
    );
    axum::serve(listener, app).await?;
    Ok(())
}

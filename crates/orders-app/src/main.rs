use orders_core::application::data_service::DataService;
use orders_core::config::Config;
use orders_core::inbound::http::{HttpServer, HttpServerConfig};
use orders_store::{build_repo, Repo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env for DATABASE_URL / SERVER_PORT / RUST_LOG when present.
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .init();

    let repo: Repo = build_repo(config.database_url.as_deref()).await?;
    tracing::info!(backend = repo.backend(), "repository ready");
    let service = DataService::new(repo);

    let server_cfg = HttpServerConfig {
        port: config.server_port.clone(),
    };

    let http = HttpServer::new(service, server_cfg).await?;
    http.run().await
}

use axum::{middleware::from_fn_with_state, routing::get, serve, Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use super::middleware::resolve_user;
use super::orders;
use crate::application::data_service::DataService;
use orders_types::ports::Repository;

#[derive(Clone)]
pub struct HttpServerConfig {
    pub port: String,
}

#[derive(Clone)]
pub struct HttpServer<R>
where
    R: Repository,
{
    pub service: Arc<DataService<R>>,
    pub config: HttpServerConfig,
}

impl<R> HttpServer<R>
where
    R: Repository,
{
    pub async fn new(service: DataService<R>, config: HttpServerConfig) -> anyhow::Result<Self> {
        Ok(Self {
            service: Arc::new(service),
            config,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let app = router(self.service.clone());

        let addr: SocketAddr = format!("0.0.0.0:{}", self.config.port).parse()?;
        tracing::info!("starting server on {}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

/// Routes, user resolution and request tracing around one shared service.
///
/// `/health` is public; everything under `/api` requires a valid `email`
/// header.
pub fn router<R>(service: Arc<DataService<R>>) -> Router
where
    R: Repository,
{
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &axum::extract::Request<_>| {
            let uri = request.uri().to_string();
            let request_id = Uuid::new_v4();
            tracing::info_span!(
                "http_request",
                %request_id,
                method = %request.method(),
                uri
            )
        })
        .on_request(
            |request: &axum::extract::Request<_>, span: &tracing::Span| {
                tracing::info!(
                    parent: span,
                    method = %request.method(),
                    uri = %request.uri(),
                    "request"
                );
            },
        )
        .on_response(
            |response: &axum::response::Response, latency: Duration, span: &tracing::Span| {
                tracing::info!(
                    parent: span,
                    status = %response.status(),
                    latency_ms = %latency.as_millis(),
                    "response"
                );
            },
        );

    let api = Router::new()
        .route(
            "/api/order",
            get(orders::index::<R>).post(orders::create::<R>),
        )
        .route_layer(from_fn_with_state(service.clone(), resolve_user::<R>));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(trace_layer)
        .with_state(service)
}

async fn health() -> (axum::http::StatusCode, Json<serde_json::Value>) {
    (
        axum::http::StatusCode::OK,
        Json(serde_json::json!({ "status": "ok" })),
    )
}

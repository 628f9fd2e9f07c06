//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, CORS, request ID)
//! - Mount the forwarder under the configured prefix
//! - Serve the health endpoint
//! - Bind server to listener and drain on shutdown

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ProxyConfig;
use crate::health::health_handler;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::proxy::{Forwarder, InboundRequest};
use crate::security::cors::cors_layer;
use crate::security::headers::TrustedProxies;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Forwarder,
    pub trusted_proxies: Arc<TrustedProxies>,
    pub mount_prefix: Arc<str>,
}

impl AppState {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            forwarder: Forwarder::from_config(config),
            trusted_proxies: Arc::new(TrustedProxies::from_config(&config.listener.trusted_proxies)),
            mount_prefix: Arc::from(config.upstream.mount_prefix.as_str()),
        }
    }
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let state = AppState::from_config(&config);
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let prefix = config.upstream.mount_prefix.as_str();

        Router::new()
            .route("/health", get(health_handler))
            .route(prefix, any(proxy_handler))
            .route(&format!("{}/", prefix), any(proxy_handler))
            .route(&format!("{}/{{*path}}", prefix), any(proxy_handler))
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(cors_layer(&config.cors))
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            mount_prefix = %self.config.upstream.mount_prefix,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward anything under the mount prefix to the upstream.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request.request_id();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let client_ip = state
        .trusted_proxies
        .client_ip(peer, request.headers())
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let inbound = InboundRequest::from_request(request, &state.mount_prefix);
    let method = inbound.method.clone();
    let path = inbound.path.clone();

    tracing::debug!(
        request_id = %request_id,
        client_ip = %client_ip,
        method = %method,
        path = %path,
        "Proxying request"
    );

    match state.forwarder.forward(inbound).await {
        Ok(upstream) => {
            tracing::info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = upstream.status.as_u16(),
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Request forwarded"
            );
            upstream.into_response()
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                client_ip = %client_ip,
                method = %method,
                path = %path,
                error = %e,
                details = %e.details(),
                "Forwarding failed"
            );
            e.into_response()
        }
    }
}

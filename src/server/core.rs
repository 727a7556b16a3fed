//! Server core
//!
//! Binds the listener and assembles the HTTP router. All per-request state
//! is read-only and shared through one `Arc`; the router is generic over the
//! storage provider so tests can run it against a fake.

use axum::Router;
use axum::http::Method;
use axum::http::header::{CONTENT_LENGTH, CONTENT_RANGE, RANGE};
use axum::middleware::from_fn;
use axum::routing::get;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ProxyConfig;
use crate::crypto::TokenCodec;
use crate::error::ServerError;
use crate::middleware::log_request;
use crate::routes::handlers;
use crate::storage::{DriveClient, DriveProvider};

/// Process-wide state shared by all request handlers
pub struct AppState<P> {
    pub provider: P,
    pub codec: TokenCodec,
    pub root_folder_id: String,
}

/// Assembles the API router for any provider implementation.
pub fn router<P: DriveProvider>(state: Arc<AppState<P>>) -> Router {
    // Cross-origin media playback needs the Range family allowed
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([RANGE, CONTENT_RANGE, CONTENT_LENGTH]);

    let streaming = Router::new()
        .route(
            "/api/download",
            get(handlers::download::<P>).options(handlers::preflight),
        )
        .route(
            "/api/download/{token}/redirect",
            get(handlers::download_redirect::<P>).options(handlers::preflight),
        )
        .route(
            "/api/preview/{token}",
            get(handlers::preview::<P>).options(handlers::preflight),
        )
        .layer(cors);

    Router::new()
        .route("/api/files", get(handlers::list_files::<P>))
        .route("/api/folder-path", get(handlers::folder_path::<P>))
        .merge(streaming)
        .layer(from_fn(log_request))
        .with_state(state)
}

pub struct Server {
    addr: String,
    listener: TcpListener,
    state: Arc<AppState<DriveClient>>,
}

impl Server {
    /// Binds the listener and builds the authenticated Drive client.
    pub async fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let addr = config.bind_socket();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("Server bound to {}", addr);

        let provider = DriveClient::new(&config)?;
        let codec = TokenCodec::new(config.encryption_key_bytes());
        let state = Arc::new(AppState {
            provider,
            codec,
            root_folder_id: config.root_folder_id.clone(),
        });

        Ok(Self {
            addr,
            listener,
            state,
        })
    }

    /// Serves requests until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        info!("Starting Rax drive proxy on {}", self.addr);
        axum::serve(self.listener, router(self.state)).await?;
        Ok(())
    }
}

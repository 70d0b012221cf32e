//! HTTP surface of the gateway.
//!
//! [`Gateway`] owns the bound listener and the router. Three `/api` routes are
//! dispatched to the transformers in [`crate::services`]; every other path is
//! answered from the static root.

use std::future::Future;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::error::{Context, Result};

pub mod bootstrap;
pub mod routes;
pub mod state;

pub use state::AppState;

pub fn create_router(state: AppState, static_root: &Path) -> Router {
    Router::new()
        .route("/api/quote", get(routes::quote))
        .route("/api/search", get(routes::search))
        .route("/api/history", get(routes::history))
        .fallback_service(ServeDir::new(static_root))
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    info!(
        "{} {} -> {} ({} ms)",
        method,
        uri,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

/// Bound listener plus router; dropped when serving ends.
pub struct Gateway {
    listener: TcpListener,
    router: Router,
}

impl Gateway {
    pub async fn bind(config: &Config) -> Result<Self> {
        config.validate()?;

        let state = AppState::new(&config.upstream)?;
        let router = create_router(state, &config.server.static_root);

        let addr = config.server.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind listener on {}", addr))?;

        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    pub async fn run(self) -> Result<()> {
        self.serve_until(shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

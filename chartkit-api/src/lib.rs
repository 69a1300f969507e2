//! # chartkit API
//!
//! Chart route registration and serving for axum applications.
//!
//! Charts are registered at boot: each one gets a GET route under the global
//! route prefix, a dotted route name, a middleware chain, and a permanent
//! store entry mapping its name back to its implementing type.
//!
//! ## Example
//!
//! ```rust,ignore
//! use chartkit_api::{ChartService, ChartsConfig, Registrar};
//! use chartkit_core::ChartRegistration;
//!
//! let mut registrar = Registrar::new(ChartsConfig::from_env());
//! registrar.register(vec![
//!     ChartRegistration::of::<SalesChart>(),
//!     ChartRegistration::of::<OrdersChart>(),
//! ])?;
//!
//! ChartService::new(registrar).run(([0, 0, 0, 0], 3000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod error;
mod handlers;
mod middleware;
mod registrar;
mod state;

pub use error::ApiError;
pub use middleware::{ChartRouter, MiddlewareFn, MiddlewareRegistry};
pub use registrar::{RegisteredChart, Registrar};
pub use state::{AppState, ChartsConfig};

use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Serves a finished registrar's routes.
pub struct ChartService {
    router: Router,
}

impl ChartService {
    /// Wraps the registrar's router with CORS and request tracing.
    pub fn new(registrar: Registrar) -> Self {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Self {
            router: registrar
                .into_router()
                .layer(cors)
                .layer(TraceLayer::new_for_http()),
        }
    }

    /// The finished router, for mounting into a larger application.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Runs the service on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("chart service listening on {}", addr);

        axum::serve(listener, self.router).await
    }
}

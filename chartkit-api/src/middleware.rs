//! Named middleware resolution.
//!
//! Middleware chains are configured as ordered name lists (globally and per
//! chart). Names are resolved through an explicit registry populated by the
//! host application; there is no ambient name lookup.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Router type every chart route is registered on, prior to state attachment.
pub type ChartRouter = Router<Arc<AppState>>;

/// A named middleware: wraps a router in one or more layers.
pub type MiddlewareFn = Arc<dyn Fn(ChartRouter) -> ChartRouter + Send + Sync>;

/// Registry mapping middleware names to layer functions.
pub struct MiddlewareRegistry {
    entries: HashMap<String, MiddlewareFn>,
}

impl MiddlewareRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Creates a registry preloaded with `trace` and `cors`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert("trace", |router| {
            router.layer(TraceLayer::new_for_http())
        });
        registry.insert("cors", |router| {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        });
        registry
    }

    /// Registers a middleware under `name`, replacing any previous entry.
    pub fn insert<F>(&mut self, name: impl Into<String>, middleware: F)
    where
        F: Fn(ChartRouter) -> ChartRouter + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(middleware));
    }

    /// Resolves a middleware by name.
    pub fn get(&self, name: &str) -> Option<MiddlewareFn> {
        self.entries.get(name).cloned()
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Returns all registered names.
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

impl Default for MiddlewareRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MiddlewareRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.names();
        names.sort_unstable();
        f.debug_struct("MiddlewareRegistry")
            .field("names", &names)
            .finish()
    }
}

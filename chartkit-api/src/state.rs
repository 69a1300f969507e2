//! App state: chart settings and the shared chart store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use chartkit_cache::ChartStore;
use chartkit_core::constants::{
    DEFAULT_CACHE_KEY_PREFIX, DEFAULT_GLOBAL_ROUTE_NAME_PREFIX, DEFAULT_GLOBAL_ROUTE_PREFIX,
    ENV_CACHE_KEY_PREFIX, ENV_GLOBAL_MIDDLEWARES, ENV_GLOBAL_ROUTE_NAME_PREFIX,
    ENV_GLOBAL_ROUTE_PREFIX,
};

/// Global chart registration settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// URL prefix every chart route is registered under.
    pub global_route_prefix: String,
    /// Middleware names applied to every chart route, before per-chart ones.
    pub global_middlewares: Vec<String>,
    /// Prefix for the dotted route name of every chart route.
    pub global_route_name_prefix: String,
    /// Prefix for chart store keys.
    pub cache_key_prefix: String,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            global_route_prefix: DEFAULT_GLOBAL_ROUTE_PREFIX.into(),
            global_middlewares: Vec::new(),
            global_route_name_prefix: DEFAULT_GLOBAL_ROUTE_NAME_PREFIX.into(),
            cache_key_prefix: DEFAULT_CACHE_KEY_PREFIX.into(),
        }
    }
}

impl ChartsConfig {
    /// Reads the configuration from the environment, with defaults.
    ///
    /// `CHARTS_GLOBAL_MIDDLEWARES` is a comma-separated list; empty items
    /// are discarded.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            global_route_prefix: std::env::var(ENV_GLOBAL_ROUTE_PREFIX)
                .unwrap_or_else(|_| DEFAULT_GLOBAL_ROUTE_PREFIX.into()),
            global_middlewares: std::env::var(ENV_GLOBAL_MIDDLEWARES)
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            global_route_name_prefix: std::env::var(ENV_GLOBAL_ROUTE_NAME_PREFIX)
                .unwrap_or_else(|_| DEFAULT_GLOBAL_ROUTE_NAME_PREFIX.into()),
            cache_key_prefix: std::env::var(ENV_CACHE_KEY_PREFIX)
                .unwrap_or_else(|_| DEFAULT_CACHE_KEY_PREFIX.into()),
        }
    }
}

/// Shared state behind every chart route.
pub struct AppState {
    /// The settings registration ran with.
    pub config: ChartsConfig,
    /// The permanent chart binding store.
    pub store: Arc<ChartStore>,
}

impl AppState {
    /// Creates state with a fresh store.
    pub fn new(config: ChartsConfig) -> Self {
        Self {
            config,
            store: Arc::new(ChartStore::new()),
        }
    }

    /// Creates state around an existing store.
    pub fn with_store(config: ChartsConfig, store: Arc<ChartStore>) -> Self {
        Self { config, store }
    }
}

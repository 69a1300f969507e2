//! Default settings for chart registration.
//!
//! These match the defaults the registrar falls back to when the host
//! application configures nothing, and the environment variable names
//! `ChartsConfig::from_env` reads.

// ═══════════════════════════════════════════════════════════════════════════════
// ROUTE DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default URL prefix every chart route is registered under.
pub const DEFAULT_GLOBAL_ROUTE_PREFIX: &str = "api/chart";

/// Default prefix for the dotted route name of every chart route.
pub const DEFAULT_GLOBAL_ROUTE_NAME_PREFIX: &str = "charts";

/// Separator between the route-name prefix and the per-chart route name.
pub const ROUTE_NAME_SEPARATOR: char = '.';

// ═══════════════════════════════════════════════════════════════════════════════
// STORE DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default prefix for chart store keys (`"{prefix}.{chart_name}"`).
pub const DEFAULT_CACHE_KEY_PREFIX: &str = "charts_cache";

// ═══════════════════════════════════════════════════════════════════════════════
// ENVIRONMENT VARIABLES
// ═══════════════════════════════════════════════════════════════════════════════

/// Overrides the global route prefix.
pub const ENV_GLOBAL_ROUTE_PREFIX: &str = "CHARTS_GLOBAL_ROUTE_PREFIX";

/// Comma-separated list of middleware names applied to every chart route.
pub const ENV_GLOBAL_MIDDLEWARES: &str = "CHARTS_GLOBAL_MIDDLEWARES";

/// Overrides the global route-name prefix.
pub const ENV_GLOBAL_ROUTE_NAME_PREFIX: &str = "CHARTS_GLOBAL_ROUTE_NAME_PREFIX";

/// Overrides the chart store key prefix.
pub const ENV_CACHE_KEY_PREFIX: &str = "CHARTS_CACHE_KEY_PREFIX";

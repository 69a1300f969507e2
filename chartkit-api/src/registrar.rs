//! Chart route registration.
//!
//! The registrar walks an ordered list of chart registrations and, for each
//! one, derives the route path, route name, and middleware chain, stores the
//! chart binding permanently, and registers one GET route bound to the shared
//! chart controller.
//!
//! Registration is a synchronous, single-threaded boot step. It is fail-fast:
//! the first failing chart aborts the call, charts registered before it stay
//! registered, and charts after it are not processed. Replaying an already
//! registered chart trips axum's overlapping-route panic; the stored binding
//! is unaffected because the store never overwrites.

use std::sync::Arc;

use axum::{routing::get, Router};
use serde::Serialize;
use tracing::{info, instrument};

use chartkit_cache::{ChartBinding, ChartStore};
use chartkit_core::{derive_chart_name, ChartError, ChartRegistration, Result};

use crate::handlers;
use crate::middleware::{ChartRouter, MiddlewareRegistry};
use crate::state::{AppState, ChartsConfig};

/// One row of the registrar's route table.
#[derive(Clone, Debug, Serialize)]
pub struct RegisteredChart {
    /// Effective chart name (explicit or derived).
    pub chart: String,
    /// Full type identifier of the chart.
    pub chart_type: String,
    /// Registered URL path.
    pub path: String,
    /// Dotted route name.
    pub route_name: String,
    /// Middleware names in application order.
    pub middlewares: Vec<String>,
    /// Key the chart binding is stored under.
    pub cache_key: String,
}

/// Registers charts as GET endpoints on an axum router.
pub struct Registrar {
    state: Arc<AppState>,
    middlewares: MiddlewareRegistry,
    router: ChartRouter,
    registered: Vec<RegisteredChart>,
}

impl Registrar {
    /// Creates a registrar with a fresh store and the default middleware
    /// registry (`trace`, `cors`).
    pub fn new(config: ChartsConfig) -> Self {
        Self::with_state(Arc::new(AppState::new(config)))
    }

    /// Creates a registrar around existing shared state.
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self {
            state,
            middlewares: MiddlewareRegistry::with_defaults(),
            router: Router::default(),
            registered: Vec::new(),
        }
    }

    /// Registers a named middleware for use in middleware chains.
    pub fn middleware<F>(mut self, name: impl Into<String>, middleware: F) -> Self
    where
        F: Fn(ChartRouter) -> ChartRouter + Send + Sync + 'static,
    {
        self.middlewares.insert(name, middleware);
        self
    }

    /// Replaces the middleware registry wholesale.
    pub fn with_middleware_registry(mut self, registry: MiddlewareRegistry) -> Self {
        self.middlewares = registry;
        self
    }

    /// Registers the given charts, in order.
    ///
    /// Per chart: the binding is stored first (permanently), then the route
    /// is registered. There is no transactional guarantee spanning the two;
    /// a failure in between leaves the binding stored without a route.
    #[instrument(skip(self, charts), fields(count = charts.len()))]
    pub fn register(&mut self, charts: Vec<ChartRegistration>) -> Result<()> {
        let global_segments = path_segments(&self.state.config.global_route_prefix);

        for registration in charts {
            let chart = registration.instantiate();

            let name = chart
                .name()
                .unwrap_or_else(|| derive_chart_name(registration.type_name()));
            if name.is_empty() {
                return Err(ChartError::InvalidChartName(format!(
                    "empty name derived from {}",
                    registration.type_name()
                )));
            }

            let chart_segments = path_segments(&chart.prefix().unwrap_or_default());
            let route_name = format!(
                "{}.{}",
                self.state.config.global_route_name_prefix,
                chart.route_name().unwrap_or_else(|| name.clone())
            );
            let middleware_names: Vec<String> = self
                .state
                .config
                .global_middlewares
                .iter()
                .cloned()
                .chain(chart.middlewares())
                .collect();

            // Stored before the route exists; a failure below leaves the
            // binding in place with no corresponding route.
            let cache_key = format!("{}.{}", self.state.config.cache_key_prefix, name);
            self.state.store.remember_forever(&cache_key, || {
                ChartBinding::new(registration.type_name(), chart.clone())
            });

            let mut segments: Vec<&str> = global_segments.iter().map(String::as_str).collect();
            segments.extend(chart_segments.iter().map(String::as_str));
            segments.push(&name);
            let path = format!("/{}", segments.join("/"));

            let mut layers = Vec::with_capacity(middleware_names.len());
            for middleware_name in &middleware_names {
                let layer = self.middlewares.get(middleware_name).ok_or_else(|| {
                    ChartError::UnknownMiddleware {
                        name: middleware_name.clone(),
                        chart: name.clone(),
                    }
                })?;
                layers.push(layer);
            }

            let mut chart_router: ChartRouter =
                Router::new().route(&path, get(handlers::charts_controller));
            // Applied in reverse so the first configured name is outermost.
            for layer in layers.iter().rev() {
                chart_router = layer(chart_router);
            }
            self.router = std::mem::take(&mut self.router).merge(chart_router);

            info!(chart = %name, %path, %route_name, "registered chart route");

            self.registered.push(RegisteredChart {
                chart: name,
                chart_type: registration.type_name().to_owned(),
                path,
                route_name,
                middlewares: middleware_names,
                cache_key,
            });
        }

        Ok(())
    }

    /// The route table built so far.
    pub fn routes(&self) -> &[RegisteredChart] {
        &self.registered
    }

    /// The shared state the routes run against.
    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// The chart binding store.
    pub fn store(&self) -> Arc<ChartStore> {
        self.state.store.clone()
    }

    /// Finalizes the router, attaching the shared state.
    pub fn into_router(self) -> Router {
        self.router.with_state(self.state)
    }
}

/// Splits a route prefix into its non-empty segments.
fn path_segments(raw: &str) -> Vec<String> {
    raw.split('/')
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::extract::Request;
    use axum::http::StatusCode;
    use axum::middleware::Next;
    use tower::ServiceExt;

    use chartkit_core::Chart;

    #[derive(Default)]
    struct SalesChart;

    #[async_trait]
    impl Chart for SalesChart {
        fn name(&self) -> Option<String> {
            Some("sales".into())
        }

        async fn respond(&self) -> chartkit_core::Result<serde_json::Value> {
            Ok(serde_json::json!({ "labels": ["jan", "feb"], "values": [3, 7] }))
        }
    }

    #[derive(Default)]
    struct OrdersChart;

    #[async_trait]
    impl Chart for OrdersChart {
        async fn respond(&self) -> chartkit_core::Result<serde_json::Value> {
            Ok(serde_json::json!({ "orders": 42 }))
        }
    }

    #[derive(Default)]
    struct RegionalSalesChart;

    #[async_trait]
    impl Chart for RegionalSalesChart {
        fn prefix(&self) -> Option<String> {
            Some("sales/".into())
        }

        fn middlewares(&self) -> Vec<String> {
            vec!["throttle".into()]
        }

        async fn respond(&self) -> chartkit_core::Result<serde_json::Value> {
            Ok(serde_json::json!({ "regions": [] }))
        }
    }

    #[derive(Default)]
    struct RenamedChart;

    #[async_trait]
    impl Chart for RenamedChart {
        fn route_name(&self) -> Option<String> {
            Some("renamed".into())
        }

        async fn respond(&self) -> chartkit_core::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    /// A middleware that records its tag when a request passes through it.
    fn recording(
        log: Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
    ) -> impl Fn(ChartRouter) -> ChartRouter + Send + Sync + 'static {
        move |router| {
            let log = log.clone();
            router.layer(axum::middleware::from_fn(
                move |request: Request, next: Next| {
                    let log = log.clone();
                    async move {
                        log.lock().unwrap().push(tag);
                        next.run(request).await
                    }
                },
            ))
        }
    }

    async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_end_to_end_sales_chart() {
        let mut registrar = Registrar::new(ChartsConfig::default());
        registrar
            .register(vec![ChartRegistration::of::<SalesChart>()])
            .unwrap();

        let row = &registrar.routes()[0];
        assert_eq!(row.chart, "sales");
        assert_eq!(row.path, "/api/chart/sales");
        assert_eq!(row.route_name, "charts.sales");
        assert_eq!(row.cache_key, "charts_cache.sales");
        assert!(row.middlewares.is_empty());

        let binding = registrar.store().get("charts_cache.sales").unwrap();
        assert!(binding.chart_type.ends_with("SalesChart"));

        let router = registrar.into_router();
        let (status, body) = get_json(&router, "/api/chart/sales").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["values"], serde_json::json!([3, 7]));
    }

    #[tokio::test]
    async fn test_derived_chart_name() {
        let mut registrar = Registrar::new(ChartsConfig::default());
        registrar
            .register(vec![ChartRegistration::of::<OrdersChart>()])
            .unwrap();

        let row = &registrar.routes()[0];
        assert_eq!(row.chart, "orders_chart");
        assert_eq!(row.path, "/api/chart/orders_chart");
        assert_eq!(row.route_name, "charts.orders_chart");
        assert_eq!(row.cache_key, "charts_cache.orders_chart");
    }

    #[tokio::test]
    async fn test_prefix_segments_merged() {
        let mut registrar =
            Registrar::new(ChartsConfig::default()).middleware("throttle", |router| router);
        registrar
            .register(vec![ChartRegistration::of::<RegionalSalesChart>()])
            .unwrap();

        // The chart's trailing slash contributes no empty segment.
        let row = &registrar.routes()[0];
        assert_eq!(row.path, "/api/chart/sales/regional_sales_chart");
    }

    #[tokio::test]
    async fn test_messy_prefixes_normalized() {
        let config = ChartsConfig {
            global_route_prefix: "/api//chart/".into(),
            ..ChartsConfig::default()
        };
        let mut registrar = Registrar::new(config).middleware("throttle", |router| router);
        registrar
            .register(vec![ChartRegistration::of::<RegionalSalesChart>()])
            .unwrap();

        assert_eq!(
            registrar.routes()[0].path,
            "/api/chart/sales/regional_sales_chart"
        );
    }

    #[tokio::test]
    async fn test_explicit_route_name() {
        let mut registrar = Registrar::new(ChartsConfig::default());
        registrar
            .register(vec![ChartRegistration::of::<RenamedChart>()])
            .unwrap();

        let row = &registrar.routes()[0];
        assert_eq!(row.route_name, "charts.renamed");
        // The URL segment still uses the chart name, not the route name.
        assert_eq!(row.path, "/api/chart/renamed_chart");
    }

    #[tokio::test]
    async fn test_middleware_chain_order() {
        let config = ChartsConfig {
            global_middlewares: vec!["auth".into()],
            ..ChartsConfig::default()
        };
        let log = Arc::new(Mutex::new(Vec::new()));

        let mut registrar = Registrar::new(config)
            .middleware("auth", recording(log.clone(), "auth"))
            .middleware("throttle", recording(log.clone(), "throttle"));
        registrar
            .register(vec![ChartRegistration::of::<RegionalSalesChart>()])
            .unwrap();

        let row = &registrar.routes()[0];
        assert_eq!(row.middlewares, vec!["auth", "throttle"]);

        let router = registrar.into_router();
        let (status, _) = get_json(&router, "/api/chart/sales/regional_sales_chart").await;
        assert_eq!(status, StatusCode::OK);

        // Global middleware executes before the chart's own.
        assert_eq!(*log.lock().unwrap(), vec!["auth", "throttle"]);
    }

    #[tokio::test]
    async fn test_two_charts_two_store_entries() {
        let mut registrar = Registrar::new(ChartsConfig::default());
        registrar
            .register(vec![
                ChartRegistration::of::<SalesChart>(),
                ChartRegistration::of::<OrdersChart>(),
            ])
            .unwrap();

        let store = registrar.store();
        assert_eq!(store.len(), 2);
        assert!(store
            .get("charts_cache.sales")
            .unwrap()
            .chart_type
            .ends_with("SalesChart"));
        assert!(store
            .get("charts_cache.orders_chart")
            .unwrap()
            .chart_type
            .ends_with("OrdersChart"));
    }

    #[tokio::test]
    async fn test_unknown_middleware_fails_fast() {
        let mut registrar = Registrar::new(ChartsConfig::default());
        let result = registrar.register(vec![
            ChartRegistration::of::<SalesChart>(),
            // "throttle" is not registered.
            ChartRegistration::of::<RegionalSalesChart>(),
            ChartRegistration::of::<OrdersChart>(),
        ]);

        match result {
            Err(ChartError::UnknownMiddleware { name, chart }) => {
                assert_eq!(name, "throttle");
                assert_eq!(chart, "regional_sales_chart");
            }
            other => panic!("expected UnknownMiddleware, got {other:?}"),
        }

        // The first chart stays registered, the failing chart's binding was
        // already stored, and the third chart was never processed.
        assert_eq!(registrar.routes().len(), 1);
        let store = registrar.store();
        assert!(store.contains_key("charts_cache.sales"));
        assert!(store.contains_key("charts_cache.regional_sales_chart"));
        assert!(!store.contains_key("charts_cache.orders_chart"));

        let router = registrar.into_router();
        let (status, _) = get_json(&router, "/api/chart/sales").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_binding_answers_not_found() {
        let mut registrar = Registrar::new(ChartsConfig::default());
        registrar
            .register(vec![ChartRegistration::of::<SalesChart>()])
            .unwrap();

        registrar.store().forget("charts_cache.sales");

        let router = registrar.into_router();
        let (status, body) = get_json(&router, "/api/chart/sales").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "CHART_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_shared_store_injection() {
        let store = Arc::new(ChartStore::new());
        let state = Arc::new(AppState::with_store(ChartsConfig::default(), store.clone()));

        let mut registrar = Registrar::with_state(state);
        registrar
            .register(vec![ChartRegistration::of::<SalesChart>()])
            .unwrap();

        assert!(store.contains_key("charts_cache.sales"));
    }

    #[tokio::test]
    #[should_panic]
    async fn test_replaying_a_chart_panics_on_route_conflict() {
        let mut registrar = Registrar::new(ChartsConfig::default());
        registrar
            .register(vec![ChartRegistration::of::<SalesChart>()])
            .unwrap();
        // Same path again: the router rejects the overlapping route.
        let _ = registrar.register(vec![ChartRegistration::of::<SalesChart>()]);
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(path_segments("api/chart"), vec!["api", "chart"]);
        assert_eq!(path_segments("/api//chart/"), vec!["api", "chart"]);
        assert!(path_segments("").is_empty());
        assert!(path_segments("///").is_empty());
    }
}

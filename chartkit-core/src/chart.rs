//! The chart interface and registration handles.
//!
//! A chart is a user-defined unit exposing a name, an optional URL prefix, an
//! optional route name, and an optional middleware list. Charts are handed to
//! the registrar as [`ChartRegistration`] values: explicit factory handles
//! selected by the caller, never resolved dynamically by name.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

// ═══════════════════════════════════════════════════════════════════════════════
// CHART TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface implemented by each registrable chart.
///
/// All accessors have defaults, so a minimal chart only implements
/// [`respond`](Chart::respond):
///
/// - `name`: falls back to the snake-cased simple type identifier
/// - `prefix`: falls back to no extra URL segments
/// - `route_name`: falls back to the effective chart name
/// - `middlewares`: falls back to the global middleware list alone
#[async_trait]
pub trait Chart: Send + Sync {
    /// Explicit chart name, used as the final URL segment and store key.
    fn name(&self) -> Option<String> {
        None
    }

    /// Extra URL prefix inserted between the global prefix and the chart name.
    fn prefix(&self) -> Option<String> {
        None
    }

    /// Explicit per-chart route name (without the global route-name prefix).
    fn route_name(&self) -> Option<String> {
        None
    }

    /// Middleware names appended after the global middleware list.
    fn middlewares(&self) -> Vec<String> {
        Vec::new()
    }

    /// Produces the chart payload served on its GET endpoint.
    async fn respond(&self) -> Result<serde_json::Value>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRATION HANDLE
// ═══════════════════════════════════════════════════════════════════════════════

/// An explicit factory handle for one chart type.
///
/// Carries the chart's full type identifier and a no-argument constructor.
/// The registrar invokes the constructor once per registration; a panicking
/// constructor propagates to the caller.
pub struct ChartRegistration {
    type_name: &'static str,
    factory: Box<dyn Fn() -> Arc<dyn Chart> + Send + Sync>,
}

impl ChartRegistration {
    /// Creates a registration for a chart constructible via [`Default`].
    pub fn of<C>() -> Self
    where
        C: Chart + Default + 'static,
    {
        Self {
            type_name: std::any::type_name::<C>(),
            factory: Box::new(|| Arc::new(C::default())),
        }
    }

    /// Creates a registration backed by a caller-supplied factory.
    pub fn from_factory<C, F>(factory: F) -> Self
    where
        C: Chart + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        Self {
            type_name: std::any::type_name::<C>(),
            factory: Box::new(move || Arc::new(factory())),
        }
    }

    /// The chart's full type identifier (the value stored per chart name).
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Constructs the chart instance.
    pub fn instantiate(&self) -> Arc<dyn Chart> {
        (self.factory)()
    }
}

impl std::fmt::Debug for ChartRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRegistration")
            .field("type_name", &self.type_name)
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAME DERIVATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Derives the default chart name from a full type identifier.
///
/// Takes the simple identifier (last `::` segment, generics stripped) and
/// snake-cases it: `my_app::charts::SalesChart` becomes `sales_chart`.
pub fn derive_chart_name(type_name: &str) -> String {
    snake_case(simple_type_name(type_name))
}

/// Strips module path and generic parameters from a full type identifier.
fn simple_type_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

/// Converts an UpperCamelCase identifier to snake_case.
///
/// An underscore goes before every uppercase letter that is not the first
/// character, then everything is lowercased. Acronyms split per letter:
/// `HTTPChart` becomes `h_t_t_p_chart`.
fn snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);
    for (i, ch) in ident.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

//! # chartkit Core
//!
//! Core trait, registrations, and errors for the chartkit chart endpoint library.
//!
//! This crate provides the building blocks used by the other chartkit crates:
//!
//! - **[`Chart`]**: the interface a chart type implements to become registrable
//! - **[`ChartRegistration`]**: an explicit factory handle for a chart type
//! - **Errors**: the [`ChartError`] hierarchy shared across the workspace
//! - **Constants**: default route, route-name, and cache-key prefixes
//!
//! ## Example
//!
//! ```rust
//! use chartkit_core::{Chart, ChartRegistration, Result};
//! use async_trait::async_trait;
//!
//! #[derive(Default)]
//! struct SalesChart;
//!
//! #[async_trait]
//! impl Chart for SalesChart {
//!     fn name(&self) -> Option<String> {
//!         Some("sales".into())
//!     }
//!
//!     async fn respond(&self) -> Result<serde_json::Value> {
//!         Ok(serde_json::json!({ "labels": [], "datasets": [] }))
//!     }
//! }
//!
//! let registration = ChartRegistration::of::<SalesChart>();
//! assert!(registration.type_name().ends_with("SalesChart"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod chart;
pub mod constants;
pub mod error;

// Re-export commonly used items at crate root
pub use chart::{derive_chart_name, Chart, ChartRegistration};
pub use constants::*;
pub use error::{ChartError, Result};

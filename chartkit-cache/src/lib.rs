//! Permanent chart lookup store for chartkit.
//!
//! Maps chart names to their bindings with no TTL and no eviction: entries
//! live until explicitly forgotten or cleared.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod store;

pub use store::{ChartBinding, ChartStore, StoreStats};

// Observability: metrics recorded during enrichment runs

pub mod metrics;

pub use metrics::{init, render};

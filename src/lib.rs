pub mod constants;
pub mod error;
pub mod logging;
pub mod types;

pub mod config;
pub mod extract;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod resolver;
pub mod seed;
pub mod table;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub mod observability;

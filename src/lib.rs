pub mod config;
pub mod constants;
pub mod error;

// Domain data shapes shared across layers
pub mod domain;
pub mod pipeline;

// Application use case and its ports; file-based adapters
pub mod app;
pub mod infra;

pub mod observability;

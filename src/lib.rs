pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod types;

// Application ports and pipeline stages
pub mod app;
pub mod pipeline;

// Concrete adapters behind the ports
pub mod infra;

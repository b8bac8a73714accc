//! Service configuration and shared application state.

mod config;
mod state;

pub use config::{AiConfig, PipelineConfig, ServiceConfig};
pub use state::ServiceState;

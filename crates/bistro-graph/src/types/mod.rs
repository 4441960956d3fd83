pub mod config;
pub mod output;
pub mod state;

pub use config::{GraphConfig, LLMConfig};
pub use output::GraphOutput;
pub use state::{GraphInput, GraphState};

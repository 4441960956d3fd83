use std::sync::Arc;

use bistro_llm::ChatClient;
use bistro_persist::{Checkpointer, InMemoryCheckpointer};

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::types::{GraphConfig, LLMConfig};

/// Builder for constructing a Graph with optional components
pub struct GraphBuilder {
    llm_client: Option<Arc<dyn ChatClient>>,
    llm_config: Option<LLMConfig>,
    checkpointer: Option<Arc<dyn Checkpointer>>,
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            llm_client: None,
            llm_config: None,
            checkpointer: None,
            config: GraphConfig::default(),
        }
    }

    pub fn llm_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.llm_client = Some(client);
        self
    }

    pub fn llm_config(mut self, config: LLMConfig) -> Self {
        self.llm_config = Some(config);
        self
    }

    /// Defaults to an in-memory store when not set
    pub fn checkpointer(mut self, checkpointer: Arc<dyn Checkpointer>) -> Self {
        self.checkpointer = Some(checkpointer);
        self
    }

    pub fn config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Graph> {
        if self.config.max_iterations == 0 {
            return Err(GraphError::InvalidConfig("max_iterations must be at least 1"));
        }

        let llm_client = self
            .llm_client
            .ok_or(GraphError::MissingComponent("LLM client"))?;
        let llm_config = self
            .llm_config
            .ok_or(GraphError::MissingComponent("LLM config"))?;
        let checkpointer = self
            .checkpointer
            .unwrap_or_else(|| Arc::new(InMemoryCheckpointer::new()));

        Ok(Graph::new(llm_client, llm_config, checkpointer, self.config))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

use std::sync::Arc;

use bistro_chain::RestaurantGenerator;
use bistro_graph::{ChatAssistant, Graph, LLMConfig};
use bistro_llm::ChatClient;
use bistro_persist::{Checkpointer, InMemoryCheckpointer};

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The model client is built once at startup and shared by the restaurant
/// pipeline and the chat assistant.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<RestaurantGenerator>,
    pub assistant: Arc<ChatAssistant>,
}

impl AppState {
    pub fn new(config: Config, generator: RestaurantGenerator, assistant: ChatAssistant) -> Self {
        Self {
            config: Arc::new(config),
            generator: Arc::new(generator),
            assistant: Arc::new(assistant),
        }
    }

    /// Wire the pipeline and a memory-backed assistant around one client.
    pub fn build(config: Config, llm_client: Arc<dyn ChatClient>) -> anyhow::Result<Self> {
        let model_config = config.model_config();

        let generator = RestaurantGenerator::new(llm_client.clone(), &model_config)?;

        let checkpointer: Arc<dyn Checkpointer> = Arc::new(InMemoryCheckpointer::new());
        let graph = Graph::builder()
            .llm_client(llm_client)
            .llm_config(LLMConfig::from(&model_config))
            .checkpointer(checkpointer)
            .build()?;

        Ok(Self::new(config, generator, ChatAssistant::new(graph)))
    }

    pub fn checkpointer(&self) -> &Arc<dyn Checkpointer> {
        self.assistant.graph().checkpointer()
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use bistro_llm::{ChatClient, ChatOptions, ChatRequest, ModelConfig};

use crate::error::{ChainError, Result};
use crate::prompt::{PromptTemplate, Variables};

/// A step that reads named inputs and produces named outputs.
#[async_trait]
pub trait Chain: Send + Sync {
    fn input_keys(&self) -> Vec<String>;

    fn output_keys(&self) -> Vec<String>;

    async fn call(&self, inputs: &Variables) -> Result<Variables>;
}

/// Renders a prompt, makes one model call, and stores the text under `output_key`.
pub struct LlmChain {
    client: Arc<dyn ChatClient>,
    model: String,
    options: ChatOptions,
    prompt: PromptTemplate,
    output_key: String,
}

impl LlmChain {
    pub fn new(
        client: Arc<dyn ChatClient>,
        config: &ModelConfig,
        prompt: PromptTemplate,
        output_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: config.model.clone(),
            options: config.chat_options(),
            prompt,
            output_key: output_key.into(),
        }
    }

    /// Returns the completion with surrounding whitespace removed.
    pub async fn run(&self, inputs: &Variables) -> Result<String> {
        let messages = self.prompt.format_messages(inputs)?;
        let request = ChatRequest::new(self.model.clone(), messages).with_options(self.options.clone());

        let response = self.client.chat(request).await?;
        let text = response.text().trim();
        if text.is_empty() {
            return Err(ChainError::MalformedResponse(format!(
                "empty completion for '{}'",
                self.output_key
            )));
        }

        Ok(text.to_string())
    }
}

#[async_trait]
impl Chain for LlmChain {
    fn input_keys(&self) -> Vec<String> {
        self.prompt.input_variables().to_vec()
    }

    fn output_keys(&self) -> Vec<String> {
        vec![self.output_key.clone()]
    }

    async fn call(&self, inputs: &Variables) -> Result<Variables> {
        let text = self.run(inputs).await?;
        Ok(Variables::from([(self.output_key.clone(), text)]))
    }
}

/// Runs chains in order, feeding each one the inputs plus every earlier output.
pub struct SequentialChain {
    chains: Vec<Box<dyn Chain>>,
    input_variables: Vec<String>,
    output_variables: Vec<String>,
}

impl std::fmt::Debug for SequentialChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequentialChain")
            .field("chains", &self.chains.len())
            .field("input_variables", &self.input_variables)
            .field("output_variables", &self.output_variables)
            .finish()
    }
}

impl SequentialChain {
    /// Fails when a chain needs a key nothing before it provides, or when a
    /// requested output is never produced.
    pub fn new(
        chains: Vec<Box<dyn Chain>>,
        input_variables: Vec<String>,
        output_variables: Vec<String>,
    ) -> Result<Self> {
        if chains.is_empty() {
            return Err(ChainError::InvalidChain("no chains given".to_string()));
        }

        let mut known: Vec<String> = input_variables.clone();
        for (idx, chain) in chains.iter().enumerate() {
            if let Some(missing) = chain.input_keys().into_iter().find(|k| !known.contains(k)) {
                return Err(ChainError::InvalidChain(format!(
                    "chain {idx} needs '{missing}', which is neither an input nor an earlier output"
                )));
            }
            for key in chain.output_keys() {
                if known.contains(&key) {
                    return Err(ChainError::InvalidChain(format!(
                        "chain {idx} overwrites existing key '{key}'"
                    )));
                }
                known.push(key);
            }
        }

        if let Some(missing) = output_variables.iter().find(|k| !known.contains(k)) {
            return Err(ChainError::InvalidChain(format!(
                "output '{missing}' is not produced by any chain"
            )));
        }

        Ok(Self {
            chains,
            input_variables,
            output_variables,
        })
    }

    pub async fn invoke(&self, inputs: Variables) -> Result<Variables> {
        for key in &self.input_variables {
            if !inputs.contains_key(key) {
                return Err(ChainError::Prompt(crate::error::PromptError::MissingVariable(
                    key.clone(),
                )));
            }
        }

        let mut known = inputs;
        for (idx, chain) in self.chains.iter().enumerate() {
            let outputs = chain.call(&known).await?;
            tracing::debug!(step = idx, outputs = ?outputs.keys().collect::<Vec<_>>(), "Chain step finished");
            known.extend(outputs);
        }

        let mut result: Variables = self
            .input_variables
            .iter()
            .filter_map(|k| known.get(k).map(|v| (k.clone(), v.clone())))
            .collect();
        for key in &self.output_variables {
            let value = known.remove(key).ok_or_else(|| {
                ChainError::MalformedResponse(format!("chain output is missing '{key}'"))
            })?;
            result.insert(key.clone(), value);
        }

        Ok(result)
    }
}

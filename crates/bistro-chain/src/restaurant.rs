use std::sync::Arc;

use bistro_llm::{ChatClient, ModelConfig, Role};
use serde::{Deserialize, Serialize};

use crate::chain::{Chain, LlmChain, SequentialChain};
use crate::error::{ChainError, Result};
use crate::prompt::{PromptTemplate, Variables};
use crate::templates::{
    MENU_HUMAN_PROMPT, MENU_SYSTEM_PROMPT, NAME_HUMAN_PROMPT, NAME_SYSTEM_PROMPT,
};

pub const COUNTRY_KEY: &str = "country";
pub const RESTAURANT_NAME_KEY: &str = "restaurant_name";
pub const MENU_ITEMS_KEY: &str = "menu_items";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSuggestion {
    pub restaurant_name: String,
    /// Raw comma-separated list as returned by the model
    pub menu_items: String,
}

impl MenuSuggestion {
    pub fn items(&self) -> Vec<String> {
        parse_menu_items(&self.menu_items)
    }
}

/// Split a comma-separated list, trimming each item and dropping empty ones.
///
/// There is no escaping: an item that itself contains a comma is split.
pub fn parse_menu_items(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Two-call pipeline: country -> restaurant name -> menu items.
#[derive(Debug)]
pub struct RestaurantGenerator {
    chain: SequentialChain,
}

impl RestaurantGenerator {
    pub fn new(client: Arc<dyn ChatClient>, config: &ModelConfig) -> Result<Self> {
        let name_prompt = PromptTemplate::from_messages([
            (Role::System, NAME_SYSTEM_PROMPT),
            (Role::User, NAME_HUMAN_PROMPT),
        ])?;
        let menu_prompt = PromptTemplate::from_messages([
            (Role::System, MENU_SYSTEM_PROMPT),
            (Role::User, MENU_HUMAN_PROMPT),
        ])?;

        let chains: Vec<Box<dyn Chain>> = vec![
            Box::new(LlmChain::new(client.clone(), config, name_prompt, RESTAURANT_NAME_KEY)),
            Box::new(LlmChain::new(client, config, menu_prompt, MENU_ITEMS_KEY)),
        ];

        let chain = SequentialChain::new(
            chains,
            vec![COUNTRY_KEY.to_string()],
            vec![RESTAURANT_NAME_KEY.to_string(), MENU_ITEMS_KEY.to_string()],
        )?;

        Ok(Self { chain })
    }

    pub async fn generate(&self, country: &str) -> Result<MenuSuggestion> {
        let country = country.trim();
        if country.is_empty() {
            return Err(ChainError::EmptyInput("country"));
        }

        tracing::info!(country, "Generating restaurant name and menu");

        let inputs = Variables::from([(COUNTRY_KEY.to_string(), country.to_string())]);
        let mut outputs = self.chain.invoke(inputs).await?;

        let restaurant_name = take_output(&mut outputs, RESTAURANT_NAME_KEY)?;
        let menu_items = take_output(&mut outputs, MENU_ITEMS_KEY)?;

        tracing::info!(country, restaurant_name = %restaurant_name, "Restaurant generated");

        Ok(MenuSuggestion {
            restaurant_name,
            menu_items,
        })
    }
}

fn take_output(outputs: &mut Variables, key: &str) -> Result<String> {
    outputs
        .remove(key)
        .ok_or_else(|| ChainError::MalformedResponse(format!("pipeline output is missing '{key}'")))
}

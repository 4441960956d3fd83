pub mod chain;
pub mod error;
pub mod prompt;
pub mod restaurant;
pub mod templates;

pub use chain::{Chain, LlmChain, SequentialChain};
pub use error::{ChainError, PromptError};
pub use prompt::{PromptTemplate, Variables};
pub use restaurant::{parse_menu_items, MenuSuggestion, RestaurantGenerator};

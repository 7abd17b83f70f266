//! Fridge Chef engine
//!
//! TF-IDF recipe retrieval, prompt assembly and chat completion, plus the
//! evaluation tooling used to tune retrieval.

pub mod config;
pub mod error;
pub mod evaluate;
pub mod feedback;
pub mod index;
pub mod judge;
pub mod llm;
pub mod optimize;
pub mod prompt;
pub mod rag;
pub mod recipe;
pub mod search;
pub mod server;
mod stop_words;

pub use error::{EngineError, Result};
pub use index::{IndexConfig, RecipeIndex};
pub use rag::FridgeChef;
pub use recipe::{Recipe, RecipeField};
pub use search::{Boosts, SearchConfig};

//! folio-responder
//!
//! Retrieval-grounded answering: embed the query, retrieve the nearest
//! résumé chunks, append publications on keyword triggers, assemble the
//! prompt and delegate to a language model with a bounded wait.

pub mod context;
pub mod llm;
pub mod prompt;
pub mod responder;
pub mod retrieve;
pub mod side_data;

pub use context::AppContext;
pub use llm::{CompletionError, LanguageModel, OpenAiCompatibleModel};
pub use prompt::{build_prompt, PromptSpec};
pub use responder::{Responder, ResponderOptions};
pub use retrieve::{retrieve, RetrievalResult};
pub use side_data::{augment_with_side_data, SideData};

//! Generation service: the HTTP endpoint that turns content into learning data
//!
//! Receives `{content, type, count}`, builds a grounded prompt, asks the
//! upstream model, repairs and normalizes its output, and answers with strict
//! JSON or an `{error}` body carrying a 400/402/429/500 status.

pub mod handler;
pub mod prompt;
pub mod provider;
mod server;

pub use handler::{generation_router, GenerationState, GENERATE_PATH};
pub use prompt::{build_prompt, Prompt};
pub use provider::{ChatCompletionsProvider, CompletionProvider};
pub use server::{ServerBuilder, ServerState, ServiceServer};

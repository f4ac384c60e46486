//! Generation pipeline: request shaping, response repair and the client
//!
//! The same parsing and normalization rules run on both sides of the wire:
//! the service applies them to raw model output, and the client applies them
//! again to whatever the service returned.

pub mod client;
pub mod parse;
pub mod types;

pub use client::GenerationClient;
pub use parse::{extract_json, normalize, parse_generation_output};
pub use types::{
    ArtifactKind, ErrorBody, GenerationRequest, GenerationResult, QuizQuestion,
    DEFAULT_QUESTION_COUNT, MAX_CONCEPTS,
};

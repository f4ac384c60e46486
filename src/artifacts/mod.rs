//! Artifact builders
//!
//! Consumers of a [`GenerationResult`](crate::generation::GenerationResult):
//! questions become a scored quiz session or a flash-card deck, concepts
//! become a memory-match board or a mind-map graph. Each artifact is owned
//! by its caller and mutated only through its own transitions.

pub mod flashcards;
pub mod memory;
pub mod mindmap;
pub mod quiz;

pub use flashcards::{FlashCard, FlashDeck};
pub use memory::{build_deck, BoardView, FlipOutcome, GamePhase, MemoryCard, MemoryGame};
pub use mindmap::{build_mind_map, MindMap, MindMapEdge, MindMapNode, Tier};
pub use quiz::{QuizGrade, QuizPhase, QuizSession, SubmitOutcome};

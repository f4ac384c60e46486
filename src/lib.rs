//! Learnloom - study artifacts generated from your own material
//!
//! Learnloom turns a single blob of study content into learning artifacts:
//! a scored quiz, flash cards, a memory-match board and a concept mind map.
//! Questions and concepts come from one call to a generation service that
//! is grounded strictly in the submitted text.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────┐   POST   ┌─────────────────────┐
//! │ ContentStore │──▶│ GenerationClient  │─────────▶│ Generation service  │
//! │  (one blob)  │   │  validate, guard  │◀─────────│  prompt → provider  │
//! └──────────────┘   └─────────┬─────────┘   JSON   │  → repair/normalize │
//!                              │                    └─────────────────────┘
//!                              ▼
//!              ┌───────────────────────────────┐
//!              │        Artifact builders      │
//!              │ quiz · flashcards · memory ·  │
//!              │           mind map            │
//!              └───────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`content`]: Content store and file intake (.txt, .md, .docx)
//! - [`generation`]: Request/response types, JSON repair, and the HTTP client
//! - [`service`]: The generation endpoint and its upstream model provider
//! - [`artifacts`]: Quiz, flash-card, memory and mind-map builders
//! - [`api`]: Top-level HTTP router
//! - [`config`]: Configuration management

pub mod api;
pub mod artifacts;
pub mod config;
pub mod content;
pub mod error;
pub mod generation;
pub mod service;

pub use config::LearnConfig;
pub use error::{Error, Result};

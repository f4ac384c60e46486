//! Source content: the single study-material blob every learning mode reads
//!
//! Content arrives either as pasted text or as an uploaded file that
//! [`intake`] converts to text. The [`ContentStore`] keeps the most recent
//! submission on disk under one well-known key.

pub mod intake;
pub mod store;

pub use intake::{extract_text, SourceFormat};
pub use store::{ContentStore, CONTENT_KEY};

//! Memoir domain: themes, styles, dialogue messages and text generation.
//!
//! Everything here is synchronous and side-effect free; the server layer
//! decides whether a request goes to the LLM or to [`generator`].

pub mod conversation;
pub mod generator;
pub mod progress;
pub mod prompt;
pub mod styles;
pub mod themes;

pub use conversation::{ChatMessage, Role};
pub use generator::GeneratedMemoir;

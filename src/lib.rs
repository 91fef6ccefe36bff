// Library root: the binary entry point is src/main.rs; integration tests
// drive the router and store through this crate.

pub mod bootstrap;
pub mod core;
pub mod llm;
pub mod memoir;
pub mod server;
pub mod store;
pub mod tts;

pub use bootstrap::logger;
pub use self::core::{config, error};

//! Console front end for flashcue Listen Mode.
//!
//! Loads a deck from a JSON library, narrates it through the session engine
//! and takes line commands from stdin while it plays.
#![deny(unused_crate_dependencies)]

// Used by the binary only
use tracing_subscriber as _;

// Used by the integration tests only
#[cfg(test)]
use mockall as _;

pub mod app;
pub mod console;
pub mod deck;
pub mod parser;
pub mod presentation;
pub mod repl;

pub use app::{execute, load_engine_config, load_items, run};
pub use console::ConsoleBackend;
pub use deck::{Deck, JsonDeckSource, Library};
pub use parser::Cli;
pub use repl::ReplCommand;

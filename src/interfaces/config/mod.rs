//! Text-format automaton definitions.

pub mod loader;

pub use loader::{ConfigWarning, LoadedConfig, load, parse};

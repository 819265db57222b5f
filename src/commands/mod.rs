//! CLI commands implementation

pub mod import;

pub use import::*;

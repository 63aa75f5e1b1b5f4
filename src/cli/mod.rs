//! CLI command handlers

pub mod commands;

pub use commands::{clean, output_path};

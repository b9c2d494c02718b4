//! CLI command implementations.

pub mod content;
pub mod db;

//! Marom Core - Shared types library.
//!
//! This crate provides the record types used across the Marom admin tools:
//! - `admin` - Internal administration dashboard (JSON API + pages)
//! - `cli` - Command-line checks for the hosted store and content files
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients, no filesystem access. Both the file-backed CMS and the hosted
//! store deserialize into these records.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, prices, statuses, slugs and entity records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

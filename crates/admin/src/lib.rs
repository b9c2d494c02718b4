//! Marom Admin library.
//!
//! The dashboard's handlers, stores and services as a library so the
//! binary, the CLI and the integration tests share one implementation.
//!
//! # Data sources
//!
//! - Storefront data files (`app/data/*.ts`) - blog, legal, ingredient
//!   spotlight and site settings, edited in place
//! - Hosted Supabase project - products, ingredients, orders, CRM tables,
//!   settings documents and image buckets
//!
//! # Security
//!
//! There is no login: run the dashboard only on a trusted network.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod db;
pub mod editor;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use routes::app;

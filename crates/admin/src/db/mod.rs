//! Typed repositories over the hosted store.
//!
//! # Tables
//!
//! - `products` - Catalog (ordered by name)
//! - `ingredients` - Ingredient library linked from `products.ingredient_ids`
//! - `orders` - Checkout orders, joined with `customers`
//! - `leads` - Newsletter and marketing sign-ups
//! - `contact_messages` - Contact form submissions
//! - `content_blocks` - JSON settings documents keyed by `section_key`
//!
//! # Buckets
//!
//! - `products` - Product photography
//! - `uploads` (fallback `images`) - Ingredient images
//!
//! Every function takes the store explicitly so handlers, the CLI and tests
//! can pass whichever implementation they hold.

pub mod content_blocks;
pub mod crm;
pub mod ingredients;
pub mod orders;
pub mod products;
pub mod storage;

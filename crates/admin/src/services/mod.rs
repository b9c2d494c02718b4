//! Business logic services for admin.
//!
//! # Services
//!
//! - `email` - One-shot SMTP test delivery
//! - `images` - Local product image library

pub mod email;
pub mod images;

pub use email::{EmailError, SmtpTestRequest, send_test_email};
pub use images::{ImageFile, list_product_images};

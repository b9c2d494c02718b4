//! Core types for Marom.
//!
//! Flat records mirroring the hosted tables and the storefront data files,
//! plus the small value types they are built from.

pub mod catalog;
pub mod commerce;
pub mod content;
pub mod crm;
pub mod id;
pub mod price;
pub mod settings;
pub mod slug;
pub mod status;

pub use catalog::{Ingredient, Product};
pub use commerce::{Order, OrderCustomer, OrderItem, ShippingAddress};
pub use content::{BlogPost, IngredientEntry, LegalDocument, Keyed, SiteSettings, SocialLinks};
pub use crm::{ContactMessage, Lead};
pub use id::*;
pub use price::Price;
pub use settings::{BrandSettings, SmtpSettings};
pub use slug::slugify;
pub use status::*;

//! Single-record editors.
//!
//! An editor works on one record at a time. File-backed records are saved by
//! loading the whole collection, replacing the element with the same id (or
//! appending a new one) and writing the collection back. Hosted records are
//! saved as a single patched row.
//!
//! Slugs are derived from the title/name only when a record is created;
//! editing an existing record keeps the slug as typed.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use marom_core::{
    BlogPost, BlogPostId, Ingredient, IngredientId, Keyed, LegalDocument, LegalDocumentId,
    slugify,
};

use crate::db::ingredients::IngredientPatch;
use crate::db::products::ProductPatch;

/// Editor validation and lookup failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{0} is required")]
    Required(&'static str),

    #[error("Invalid {field}: {value}")]
    Invalid { field: &'static str, value: String },
}

/// Whether the editor was opened on a new record or an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    New,
    Existing(String),
}

impl EditMode {
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::New)
    }
}

/// What a save did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Appended,
    Replaced,
}

/// Put `record` into `records`.
///
/// New records are appended. Existing records replace the element whose key
/// matches the id the editor was opened on; if no element matches, the
/// collection is left untouched.
///
/// # Errors
///
/// [`EditError::NotFound`] when editing an id that is not in the collection.
pub fn save_record<T: Keyed>(
    records: &mut Vec<T>,
    record: T,
    mode: &EditMode,
    kind: &'static str,
) -> Result<Saved, EditError> {
    match mode {
        EditMode::New => {
            records.push(record);
            Ok(Saved::Appended)
        }
        EditMode::Existing(id) => {
            let slot = records
                .iter_mut()
                .find(|r| r.key() == id)
                .ok_or_else(|| EditError::NotFound {
                    kind,
                    id: id.clone(),
                })?;
            *slot = record;
            Ok(Saved::Replaced)
        }
    }
}

/// Remove the record with key `id`.
///
/// # Errors
///
/// [`EditError::NotFound`] when no record has that key.
pub fn remove_record<T: Keyed>(
    records: &mut Vec<T>,
    id: &str,
    kind: &'static str,
) -> Result<T, EditError> {
    let index = records
        .iter()
        .position(|r| r.key() == id)
        .ok_or_else(|| EditError::NotFound {
            kind,
            id: id.to_string(),
        })?;
    Ok(records.remove(index))
}

/// `base`, or `base-2`, `base-3`, ... for the first key no record uses.
#[must_use]
pub fn unique_key<T: Keyed>(records: &[T], base: &str) -> String {
    let taken = |key: &str| records.iter().any(|r| r.key() == key);
    if !taken(base) {
        return base.to_string();
    }
    (2_u32..)
        .map(|n| format!("{base}-{n}"))
        .find(|key| !taken(key))
        .unwrap_or_else(|| base.to_string())
}

/// Split comma separated input into trimmed, non-empty items.
#[must_use]
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn required(value: &str, field: &'static str) -> Result<String, EditError> {
    let value = value.trim();
    if value.is_empty() {
        Err(EditError::Required(field))
    } else {
        Ok(value.to_string())
    }
}

fn slug_for(mode: &EditMode, typed: &str, source: &str) -> String {
    let typed = typed.trim();
    if mode.is_new() && typed.is_empty() {
        slugify(source)
    } else {
        typed.to_string()
    }
}

// =============================================================================
// Blog
// =============================================================================

/// Blog editor form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BlogPostForm {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub image: String,
    pub date: String,
    pub author: String,
    /// Comma separated.
    pub tags: String,
}

impl BlogPostForm {
    /// Prefill the form from an existing post.
    #[must_use]
    pub fn from_post(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            content: post.content.clone(),
            image: post.image.clone(),
            date: post.date.clone(),
            author: post.author.clone(),
            tags: post.tags.join(", "),
        }
    }

    /// Build the post to save.
    ///
    /// New posts get a fresh UUID and default to `today` and the house
    /// author when those fields are blank.
    ///
    /// # Errors
    ///
    /// [`EditError::Required`] when the title is blank.
    pub fn into_post(self, mode: &EditMode, today: NaiveDate) -> Result<BlogPost, EditError> {
        let title = required(&self.title, "Title")?;
        let slug = slug_for(mode, &self.slug, &title);

        let (id, date, author) = match mode {
            EditMode::New => (
                BlogPostId::generate(),
                non_blank_or(self.date, || today.to_string()),
                non_blank_or(self.author, || BlogPost::DEFAULT_AUTHOR.to_string()),
            ),
            EditMode::Existing(id) => (BlogPostId::new(id.clone()), self.date, self.author),
        };

        Ok(BlogPost {
            id,
            title,
            slug,
            excerpt: self.excerpt,
            content: self.content,
            image: self.image.trim().to_string(),
            date,
            author,
            tags: split_list(&self.tags),
        })
    }
}

// =============================================================================
// Legal
// =============================================================================

/// Legal document editor form fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegalDocumentForm {
    pub title: String,
    pub slug: String,
    pub content: String,
}

impl LegalDocumentForm {
    #[must_use]
    pub fn from_document(doc: &LegalDocument) -> Self {
        Self {
            title: doc.title.clone(),
            slug: doc.slug.clone(),
            content: doc.content.clone(),
        }
    }

    /// Build the document to save; `lastUpdated` is stamped with `today`.
    ///
    /// # Errors
    ///
    /// [`EditError::Required`] when the title is blank.
    pub fn into_document(
        self,
        mode: &EditMode,
        today: NaiveDate,
    ) -> Result<LegalDocument, EditError> {
        let title = required(&self.title, "Title")?;
        let slug = slug_for(mode, &self.slug, &title);
        let id = match mode {
            EditMode::New => LegalDocumentId::new(if slug.is_empty() {
                LegalDocumentId::generate().into_inner()
            } else {
                slug.clone()
            }),
            EditMode::Existing(id) => LegalDocumentId::new(id.clone()),
        };

        Ok(LegalDocument {
            id,
            title,
            slug,
            content: self.content,
            last_updated: today.to_string(),
        })
    }
}

// =============================================================================
// Products (hosted)
// =============================================================================

/// Product editor form fields.
///
/// Built from raw form pairs because the ingredient checklist submits one
/// `ingredient_ids` pair per checked box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub image: String,
    /// Comma separated free-text ingredients.
    pub ingredients: String,
    /// Comma separated.
    pub benefits: String,
    pub ingredient_ids: Vec<String>,
}

impl ProductForm {
    /// Collect form pairs (`application/x-www-form-urlencoded`).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "name" => form.name = value,
                "price" => form.price = value,
                "description" => form.description = value,
                "image" => form.image = value,
                "ingredients" => form.ingredients = value,
                "benefits" => form.benefits = value,
                "ingredient_ids" if !value.trim().is_empty() => form.ingredient_ids.push(value),
                _ => {}
            }
        }
        form
    }

    /// Build the row patch.
    ///
    /// # Errors
    ///
    /// [`EditError::Required`] for a blank name or price,
    /// [`EditError::Invalid`] for a price that is not a non-negative number.
    pub fn into_patch(self, now: DateTime<Utc>) -> Result<ProductPatch, EditError> {
        let name = required(&self.name, "Name")?;
        let price_text = required(&self.price, "Price")?;
        let price = price_text
            .parse::<Decimal>()
            .ok()
            .filter(|p| !p.is_sign_negative())
            .ok_or(EditError::Invalid {
                field: "price",
                value: price_text,
            })?;

        let mut ingredient_ids: Vec<IngredientId> = Vec::with_capacity(self.ingredient_ids.len());
        for id in self.ingredient_ids {
            let id = IngredientId::new(id.trim());
            if !ingredient_ids.contains(&id) {
                ingredient_ids.push(id);
            }
        }

        Ok(ProductPatch {
            name,
            price: price.into(),
            description: self.description,
            image: self.image.trim().to_string(),
            ingredient_ids,
            ingredients: split_list(&self.ingredients),
            benefits: split_list(&self.benefits),
            updated_at: now,
        })
    }
}

// =============================================================================
// Ingredients (hosted)
// =============================================================================

/// Ingredient table editor form fields (the image arrives separately).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngredientForm {
    pub name: String,
    pub description: String,
    /// Comma separated.
    pub benefits: String,
}

impl IngredientForm {
    /// Build the row patch. `image` is the uploaded URL, or the row's
    /// current image when nothing was uploaded.
    ///
    /// # Errors
    ///
    /// [`EditError::Required`] when the name is blank.
    pub fn into_patch(self, image: String, now: DateTime<Utc>) -> Result<IngredientPatch, EditError> {
        Ok(IngredientPatch {
            name: required(&self.name, "Name")?,
            description: self.description,
            benefits: Ingredient::parse_benefits(&self.benefits),
            image,
            updated_at: now,
        })
    }
}

/// Object key for an uploaded ingredient image: `ingredients/<slug>-<millis>.<ext>`.
#[must_use]
pub fn ingredient_image_key(ingredient: &Ingredient, file_name: &str, now: DateTime<Utc>) -> String {
    let ext = std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map_or_else(|| "bin".to_string(), str::to_ascii_lowercase);
    let stem = if ingredient.slug.is_empty() {
        slugify(&ingredient.name)
    } else {
        ingredient.slug.clone()
    };
    format!("ingredients/{stem}-{}.{ext}", now.timestamp_millis())
}

fn non_blank_or(value: String, default: impl FnOnce() -> String) -> String {
    if value.trim().is_empty() {
        default()
    } else {
        value
    }
}

//! The four storefront data files and the store that owns them.

use std::path::{Path, PathBuf};

use marom_core::{BlogPost, IngredientEntry, LegalDocument, SiteSettings};

use super::{ContentError, DataFile, Document, DocumentSpec};

pub const BLOG: DocumentSpec = DocumentSpec {
    file_name: "blog.ts",
    interface: "export interface BlogPost {
    id: string;
    title: string;
    slug: string;
    excerpt: string;
    content: string;
    image: string;
    date: string;
    author: string;
    tags: string[];
}",
    export: "export const blogPosts: BlogPost[] = ",
    label: "blog posts",
};

pub const LEGAL: DocumentSpec = DocumentSpec {
    file_name: "legal.ts",
    interface: "export interface LegalDocument {
    id: string;
    title: string;
    slug: string;
    content: string;
    lastUpdated: string;
}",
    export: "export const legalDocuments: LegalDocument[] = ",
    label: "legal docs",
};

pub const INGREDIENTS: DocumentSpec = DocumentSpec {
    file_name: "ingredients.ts",
    interface: "export interface Ingredient {
    id: string;
    name: string;
    image: string;
    description: string;
    benefits: string;
    order: number;
}",
    export: "export const ingredients: Ingredient[] = ",
    label: "ingredients",
};

pub const SETTINGS: DocumentSpec = DocumentSpec {
    file_name: "settings.ts",
    interface: "export interface SiteSettings {
    socialLinks: {
        facebook: string;
        instagram: string;
        tiktok: string;
        youtube: string;
        whatsapp: string;
    };
    trustindexWidgetCode: string;
}",
    export: "export const siteSettings: SiteSettings = ",
    label: "settings",
};

/// Result of checking one data file.
#[derive(Debug)]
pub struct FileReport {
    pub label: &'static str,
    pub path: PathBuf,
    /// Record count, or why the file could not be loaded.
    pub result: Result<usize, ContentError>,
}

/// All file-backed collections of one storefront checkout.
pub struct ContentStore {
    data_dir: PathBuf,
    blog: DataFile<Vec<BlogPost>>,
    legal: DataFile<Vec<LegalDocument>>,
    ingredients: DataFile<Vec<IngredientEntry>>,
    settings: DataFile<SiteSettings>,
}

impl ContentStore {
    /// Bind the collections to `data_dir` (the storefront's `app/data`).
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            blog: DataFile::new(BLOG, &data_dir),
            legal: DataFile::new(LEGAL, &data_dir),
            ingredients: DataFile::new(INGREDIENTS, &data_dir),
            settings: DataFile::new(SETTINGS, &data_dir),
            data_dir,
        }
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub const fn blog(&self) -> &DataFile<Vec<BlogPost>> {
        &self.blog
    }

    #[must_use]
    pub const fn legal(&self) -> &DataFile<Vec<LegalDocument>> {
        &self.legal
    }

    #[must_use]
    pub const fn ingredients(&self) -> &DataFile<Vec<IngredientEntry>> {
        &self.ingredients
    }

    #[must_use]
    pub const fn settings(&self) -> &DataFile<SiteSettings> {
        &self.settings
    }

    /// Strictly load every file and report what was found.
    pub async fn verify(&self) -> Vec<FileReport> {
        vec![
            report(&self.blog).await,
            report(&self.legal).await,
            report(&self.ingredients).await,
            report(&self.settings).await,
        ]
    }

    /// Create any missing data file with an empty document.
    ///
    /// Returns the paths that were created.
    ///
    /// # Errors
    ///
    /// Stops at the first file that cannot be written.
    pub async fn init(&self) -> Result<Vec<PathBuf>, ContentError> {
        let mut created = Vec::new();
        if self.blog.init().await? {
            created.push(self.blog.path().to_path_buf());
        }
        if self.legal.init().await? {
            created.push(self.legal.path().to_path_buf());
        }
        if self.ingredients.init().await? {
            created.push(self.ingredients.path().to_path_buf());
        }
        if self.settings.init().await? {
            created.push(self.settings.path().to_path_buf());
        }
        Ok(created)
    }
}

async fn report<D: Document>(file: &DataFile<D>) -> FileReport {
    FileReport {
        label: file.spec().label,
        path: file.path().to_path_buf(),
        result: file.try_read().await.map(|doc| doc.entries()),
    }
}

//! Website pages: links into the storefront for viewing and visual editing.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::filters;
use crate::routes::layout::Layout;
use crate::state::AppState;

/// Storefront pages managed from the dashboard.
pub const PAGES: [(&str, &str); 7] = [
    ("Home", "/"),
    ("About Us", "/about"),
    ("Shop", "/shop"),
    ("Ingredients", "/ingredients"),
    ("FAQ", "/faq"),
    ("Moringa", "/moringa"),
    ("Contact", "/contact"),
];

/// A storefront page with its links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub name: &'static str,
    pub path: &'static str,
    pub view_url: String,
    pub edit_url: String,
}

/// Links for every managed page on `storefront_url`.
#[must_use]
pub fn page_links(storefront_url: &str) -> Vec<PageLink> {
    PAGES
        .iter()
        .map(|&(name, path)| {
            let view_url = format!("{storefront_url}{path}");
            PageLink {
                name,
                path,
                edit_url: format!("{view_url}?edit=true"),
                view_url,
            }
        })
        .collect()
}

/// Website pages template.
#[derive(Template, WebTemplate)]
#[template(path = "website/index.html")]
pub struct WebsitePagesTemplate {
    pub layout: Layout,
    pub storefront_url: String,
    pub pages: Vec<PageLink>,
}

/// GET /website-pages
pub async fn index(State(state): State<AppState>) -> WebsitePagesTemplate {
    let storefront_url = state.config().storefront_url.clone();
    WebsitePagesTemplate {
        layout: Layout::new("Website Pages", "/website-pages"),
        pages: page_links(&storefront_url),
        storefront_url,
    }
}

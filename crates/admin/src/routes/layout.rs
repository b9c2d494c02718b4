//! Shared page chrome: navigation and flash messages.

use axum::response::Redirect;
use serde::Deserialize;

/// Sidebar entries in display order.
const NAV: [(&str, &str); 9] = [
    ("Dashboard", "/"),
    ("Products", "/products"),
    ("Ingredients", "/ingredients"),
    ("Orders", "/orders"),
    ("CRM", "/crm"),
    ("Blog", "/blog"),
    ("Legal", "/legal"),
    ("Website Pages", "/website-pages"),
    ("Settings", "/settings"),
];

/// Sidebar link.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Flash message query parameters (`?success=...` / `?error=...`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlashQuery {
    pub success: Option<String>,
    pub error: Option<String>,
}

/// Data every page passes to `base.html`.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: &'static str,
    pub current_path: String,
    pub nav: Vec<NavLink>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

impl Layout {
    /// Layout for the page at `current_path`; the nav entry whose section
    /// contains it is highlighted.
    #[must_use]
    pub fn new(title: &'static str, current_path: impl Into<String>) -> Self {
        let current_path = current_path.into();
        let nav = NAV
            .iter()
            .map(|&(label, href)| NavLink {
                label,
                href,
                active: is_section(href, &current_path),
            })
            .collect();
        Self {
            title,
            current_path,
            nav,
            success_message: None,
            error_message: None,
        }
    }

    /// Attach flash messages from the query string.
    #[must_use]
    pub fn with_flash(mut self, flash: FlashQuery) -> Self {
        self.success_message = flash.success.filter(|s| !s.is_empty());
        self.error_message = flash.error.filter(|s| !s.is_empty());
        self
    }

    /// Show `message` as an error banner.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }
}

fn is_section(href: &str, path: &str) -> bool {
    if href == "/" {
        path == "/"
    } else {
        path == href || path.starts_with(&format!("{href}/"))
    }
}

/// Redirect to `path` with a success banner.
#[must_use]
pub fn redirect_success(path: &str, message: &str) -> Redirect {
    redirect_with(path, "success", message)
}

/// Redirect to `path` with an error banner.
#[must_use]
pub fn redirect_error(path: &str, message: &str) -> Redirect {
    redirect_with(path, "error", message)
}

fn redirect_with(path: &str, key: &str, message: &str) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, message)
        .finish();
    Redirect::to(&format!("{path}?{query}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_active_section() {
        let layout = Layout::new("Blog", "/blog/new");
        let active: Vec<_> = layout.nav.iter().filter(|l| l.active).map(|l| l.href).collect();
        assert_eq!(active, ["/blog"]);

        let layout = Layout::new("Dashboard", "/");
        let active: Vec<_> = layout.nav.iter().filter(|l| l.active).map(|l| l.href).collect();
        assert_eq!(active, ["/"]);
    }

    #[test]
    fn test_redirect_encodes_message() {
        let response = redirect_success("/blog", "Post saved & published").into_response();
        assert_eq!(
            response.headers()["location"],
            "/blog?success=Post+saved+%26+published"
        );
    }

    #[test]
    fn test_blank_flash_ignored() {
        let layout = Layout::new("Blog", "/blog").with_flash(FlashQuery {
            success: Some(String::new()),
            error: Some("boom".to_string()),
        });
        assert!(layout.success_message.is_none());
        assert_eq!(layout.error_message.as_deref(), Some("boom"));
    }
}

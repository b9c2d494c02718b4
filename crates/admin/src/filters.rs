//! Template filters shared by the admin pages.

use std::fmt::Display;

/// Year shown in the page footer.
///
/// Usage: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Local::now().year())
}

/// Text content of an HTML fragment, cut to `max` characters.
///
/// Usage: `{{ doc.content|plain_text(120) }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn plain_text(value: impl Display, _env: &dyn askama::Values, max: usize) -> askama::Result<String> {
    Ok(preview(&value.to_string(), max))
}

fn preview(html: &str, max: usize) -> String {
    let mut text = String::with_capacity(html.len().min(max + 3));
    let mut in_tag = false;
    let mut last_space = true;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                if !last_space {
                    text.push(' ');
                    last_space = true;
                }
            }
            _ if in_tag => {}
            c if c.is_whitespace() => {
                if !last_space {
                    text.push(' ');
                    last_space = true;
                }
            }
            c => {
                text.push(c);
                last_space = false;
            }
        }
    }

    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_strips_tags() {
        assert_eq!(
            preview("<h2>Terms</h2><p>Use of <strong>this</strong> site</p>", 100),
            "Terms Use of this site"
        );
    }

    #[test]
    fn test_preview_truncates_on_chars() {
        assert_eq!(preview("<p>ครีมบำรุงผิว</p>", 4), "ครีม...");
        assert_eq!(preview("", 10), "");
    }
}

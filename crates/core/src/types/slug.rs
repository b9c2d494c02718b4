//! URL slug derivation.

/// Derive a URL slug from a title or name.
///
/// Lowercases the input, collapses every run of characters outside
/// `[a-z0-9]` into a single `-`, and trims leading/trailing dashes.
/// Non-ASCII letters count as separators, so a Thai-only title yields an
/// empty slug and the editor keeps whatever the user typed.
///
/// ```
/// use marom_core::slugify;
///
/// assert_eq!(slugify("Rice Water & Honey Mask"), "rice-water-honey-mask");
/// assert_eq!(slugify("  --Vitamin C!--  "), "vitamin-c");
/// ```
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    slug
}

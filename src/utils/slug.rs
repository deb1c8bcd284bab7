//! Slug derivation from titles and names.

use deunicode::deunicode;

/// Convert an arbitrary string into a URL-safe slug.
///
/// Transliterates unicode to ASCII, lowercases, and collapses runs of
/// non-alphanumeric characters into single hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("Déjà Vu"), "deja-vu");
/// ```
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

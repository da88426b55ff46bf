//! URL slug derivation.

/// Separator placed between alphanumeric runs.
pub const SEPARATOR: char = '-';

/// Derive a URL-safe slug from a post title.
///
/// Lowercases ASCII letters and collapses every run of other characters
/// into a single [`SEPARATOR`], trimming separators at both ends. The result
/// only contains `[a-z0-9-]`:
///
/// ```
/// use inkpress_core::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Rust & WASM: 2025  "), "rust-wasm-2025");
/// ```
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push(SEPARATOR);
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

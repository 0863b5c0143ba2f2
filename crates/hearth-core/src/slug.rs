//! URL slugs for blog posts and categories.

use regex::Regex;
use std::sync::OnceLock;

fn non_alphanumeric() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").ok()).as_ref()
}

/// Lowercase ASCII words joined by `-`. Returns `fallback` when nothing is left.
pub fn slugify(input: &str, fallback: &str) -> String {
    let lowered = input.to_lowercase();
    let Some(pattern) = non_alphanumeric() else {
        return fallback.to_string();
    };
    let slug = pattern
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string();
    if slug.is_empty() {
        fallback.to_string()
    } else {
        slug
    }
}

/// `base`, `base-2`, `base-3`, ... without end.
pub fn slug_candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string()).chain((2u32..).map(move |n| format!("{}-{}", base, n)))
}

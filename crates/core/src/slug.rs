//! URL slug generation for memorial pages.
//!
//! Memorial pages live at `/m/{slug}`. A slug is the person's name folded to
//! lowercase ASCII with words joined by `-`, followed by a short random
//! suffix so that two people with the same name never collide.

use std::sync::LazyLock;

use rand::Rng;
use regex::Regex;

/// Slug used when a name folds down to nothing (e.g. only punctuation).
pub const DEFAULT_SLUG_BASE: &str = "memorial";

/// Number of random `[a-z0-9]` characters appended to a candidate slug.
pub const SUFFIX_LENGTH: usize = 4;

/// How many random candidates to try before falling back to a timestamp.
pub const MAX_SLUG_ATTEMPTS: usize = 5;

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

static DISALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid regex"));

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Fold a Latin accented character to its unaccented ASCII base.
///
/// Characters without a mapping are returned unchanged (and later dropped by
/// [`slugify`] if they are not ASCII word characters).
fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        other => other,
    }
}

/// Turn a display name into the base of a slug.
///
/// Accents are folded, anything other than ASCII word characters, whitespace
/// and `-` is removed, the result is trimmed, whitespace runs become a single
/// `-`, and everything is lowercased. Returns [`DEFAULT_SLUG_BASE`] when
/// nothing is left.
///
/// ```
/// use lembranca_core::slug::slugify;
///
/// assert_eq!(slugify("José da Silva"), "jose-da-silva");
/// assert_eq!(slugify("  Maria   Conceição "), "maria-conceicao");
/// assert_eq!(slugify("!!!"), "memorial");
/// ```
pub fn slugify(name: &str) -> String {
    let folded: String = name.chars().map(fold_accent).collect();
    let cleaned = DISALLOWED_RE.replace_all(&folded, "");
    let joined = WHITESPACE_RE.replace_all(cleaned.trim(), "-");
    let slug = joined.to_lowercase();

    if slug.is_empty() || slug.chars().all(|c| c == '-') {
        DEFAULT_SLUG_BASE.to_string()
    } else {
        slug
    }
}

/// Generate a random slug candidate: `{slugify(name)}-{4 random chars}`.
pub fn slug_candidate(name: &str) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("{}-{suffix}", slugify(name))
}

/// Deterministic last-resort slug: `{slugify(name)}-{unix millis}`.
pub fn fallback_slug(name: &str, now: chrono::DateTime<chrono::Utc>) -> String {
    format!("{}-{}", slugify(name), now.timestamp_millis())
}

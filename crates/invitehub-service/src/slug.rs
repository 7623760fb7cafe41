//! URL slugs.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use invitehub_core::traits::IdGenerator;

/// Lowercase ASCII alphanumerics joined by single dashes.
///
/// Accented letters are decomposed (NFKD) and their marks dropped first.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;

    for c in input.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// `len` lowercase hex characters taken from a fresh identifier.
pub fn hex_suffix(ids: &dyn IdGenerator, len: usize) -> String {
    let hex = ids.new_uuid().simple().to_string();
    hex[..len.min(hex.len())].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use invitehub_core::traits::SeededIdGenerator;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Adam-Hawa"), "adam-hawa");
        assert_eq!(slugify("  Romeo & Juliet!! "), "romeo-juliet");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_folds_accents() {
        assert_eq!(slugify("Zoë"), "zoe");
        assert_eq!(slugify("Zoë--Ann"), "zoe-ann");
        assert_eq!(slugify("José & Renée"), "jose-renee");
        assert_eq!(slugify("Ｆｕｌｌ"), "full");
        // No decomposition to ASCII: treated as a separator.
        assert_eq!(slugify("Łukasz Øre"), "ukasz-re");
    }

    #[test]
    fn test_hex_suffix() {
        let ids = SeededIdGenerator::new(9);
        let suffix = hex_suffix(&ids, 8);
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

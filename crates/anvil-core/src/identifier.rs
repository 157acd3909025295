//! The identifier character class shared by names, architectures, versions
//! and group names throughout the configuration and metadata schemas.

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9.\-]+$").unwrap());

/// Whether `target` is entirely composed of the identifier character class.
#[must_use]
pub fn is_identifier(target: &str) -> bool {
    !target.is_empty() && IDENTIFIER_RE.is_match(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_alnum_dot_dash() {
        assert!(is_identifier("amd64"));
        assert!(is_identifier("1.0.1-rc1"));
    }

    #[test]
    fn rejects_empty_and_uppercase_and_other_chars() {
        assert!(!is_identifier(""));
        assert!(!is_identifier("AMD64"));
        assert!(!is_identifier("amd64:extra"));
        assert!(!is_identifier("amd 64"));
    }
}

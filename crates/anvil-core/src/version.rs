//! Version DSL: tokenization and total ordering of version strings.
//!
//! Versions are not semver. They are free-form strings tokenized into a
//! sequence of alphabetic and numeric runs, then compared element-wise.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Za-z]+|[0-9]+)").unwrap());

/// A single token in a tokenized version: either a number or a string run.
///
/// Adjacent alphabetic tokens are coalesced into one `Str` during tokenization,
/// so a parsed version never contains two consecutive `Str` tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Token {
    Num(i64),
    Str(String),
}

/// A tokenized version string, or the sentinel for an unparseable one.
///
/// Two unparseable versions compare equal to each other; an unparseable
/// version is less than every parseable one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    tokens: Option<Vec<Token>>,
    raw: String,
}

impl Version {
    /// Tokenize a version string per the version DSL.
    ///
    /// Alphabetic runs are lowercased; numeric runs become integers; adjacent
    /// alphabetic runs are coalesced (so `"2alPhA------TEST"` becomes the two
    /// tokens `2`, `"alphatest"`).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut tokens: Vec<Token> = Vec::new();
        let mut str_buffer = String::new();

        for m in TOKEN_RE.find_iter(raw) {
            let text = m.as_str();
            if let Ok(n) = text.parse::<i64>() {
                if !str_buffer.is_empty() {
                    tokens.push(Token::Str(std::mem::take(&mut str_buffer)));
                }
                tokens.push(Token::Num(n));
            } else {
                str_buffer.push_str(&text.to_lowercase());
            }
        }
        if !str_buffer.is_empty() {
            tokens.push(Token::Str(str_buffer));
        }

        Self {
            tokens: if tokens.is_empty() { None } else { Some(tokens) },
            raw: raw.to_string(),
        }
    }

    /// Whether this version tokenized to anything at all.
    #[must_use]
    pub fn is_parseable(&self) -> bool {
        self.tokens.is_some()
    }

    /// The original string this version was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Compare two versions per the version DSL's mixed-type ordering rules.
    ///
    /// When one side runs out of tokens first, the longer side's next token
    /// decides the outcome: a leftover integer outranks absence, a leftover
    /// alphabetic token is outranked by absence.
    #[must_use]
    pub fn compare(&self, other: &Self) -> i8 {
        let (a, b) = match (&self.tokens, &other.tokens) {
            (None, None) => return 0,
            (None, Some(_)) => return -1,
            (Some(_), None) => return 1,
            (Some(a), Some(b)) => (a, b),
        };

        let max_len = a.len().max(b.len());
        for i in 0..max_len {
            match (a.get(i), b.get(i)) {
                (Some(x), Some(y)) => match compare_tokens(x, y) {
                    0 => continue,
                    n => return n,
                },
                (Some(Token::Num(_)), None) => return 1,
                (Some(Token::Str(_)), None) => return -1,
                (None, Some(Token::Num(_))) => return -1,
                (None, Some(Token::Str(_))) => return 1,
                (None, None) => unreachable!("loop bound is max_len"),
            }
        }
        0
    }
}

fn compare_tokens(a: &Token, b: &Token) -> i8 {
    match (a, b) {
        (Token::Num(x), Token::Num(y)) => match x.cmp(y) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        },
        (Token::Str(x), Token::Str(y)) => match x.cmp(y) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        },
        // A numeric token and a string token at the same position never
        // compare equal; strings sort below numbers, matching the
        // longer-side tiebreak rule applied one position early.
        (Token::Num(_), Token::Str(_)) => 1,
        (Token::Str(_), Token::Num(_)) => -1,
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.compare(other) {
            n if n < 0 => Ordering::Less,
            0 => Ordering::Equal,
            _ => Ordering::Greater,
        }
    }
}

/// Free function form, mirroring the DSL's `compare(first, second)` contract.
#[must_use]
pub fn compare(first: &str, second: &str) -> i8 {
    Version::parse(first).compare(&Version::parse(second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_empty_and_punctuation_only() {
        assert!(!Version::parse("").is_parseable());
        assert!(!Version::parse("-.-.-.-").is_parseable());
    }

    #[test]
    fn parse_coalesces_alpha_runs_and_lowercases() {
        let v = Version::parse("0.127a.15-rc2.XX.3-2alPhA------TEST");
        let tokens: Vec<_> = v
            .tokens
            .as_ref()
            .unwrap()
            .iter()
            .map(|t| match t {
                Token::Num(n) => n.to_string(),
                Token::Str(s) => s.clone(),
            })
            .collect();
        assert_eq!(
            tokens,
            vec!["0", "127", "a", "15", "rc", "2", "xx", "3", "2", "alphatest"]
        );
    }

    #[test]
    fn parse_scrambled_name_and_digits() {
        let v = Version::parse("P-Y-T-H-O-N2,7,6");
        let tokens: Vec<_> = v
            .tokens
            .as_ref()
            .unwrap()
            .iter()
            .map(|t| match t {
                Token::Num(n) => n.to_string(),
                Token::Str(s) => s.clone(),
            })
            .collect();
        assert_eq!(tokens, vec!["python", "2", "7", "6"]);
    }

    #[test]
    fn compare_integer_run_beats_alpha_then_integer_tail() {
        assert_eq!(compare("3.2", "3.2-rc1"), 1);
        assert_eq!(compare("3.2-rc1", "3.2"), -1);
    }

    #[test]
    fn compare_hyphen_is_not_significant() {
        assert_eq!(compare("pre-alpha", "prealpha"), 0);
        assert_eq!(compare("pre-alpha-1", "prealpha1"), 0);
    }

    #[test]
    fn compare_is_case_insensitive() {
        assert_eq!(compare("1.0-A", "1.0a"), 0);
        assert_eq!(compare("1.0-a", "1.0a"), 0);
        assert_eq!(compare("1.0a", "1.0a"), 0);
    }

    #[test]
    fn compare_trailing_alpha_loses_to_absence() {
        assert_eq!(compare("1.0.1", "1.0.1dev"), 1);
        assert_eq!(compare("3.2final", "3.2beta"), 1);
    }

    #[test]
    fn compare_trailing_integer_beats_absence() {
        assert_eq!(compare("1.0", "1"), 1);
        assert_eq!(compare("1.0.1", "1.0"), 1);
    }

    #[test]
    fn compare_both_unparseable_is_equal() {
        assert_eq!(compare("", ""), 0);
    }

    #[test]
    fn compare_numeric_tail_growth() {
        assert_eq!(compare("3.2-9999", "3.2-9998"), 1);
        assert_eq!(compare("1.0aa", "1.0a"), 1);
        assert_eq!(compare("1.0-ab", "1.0a"), 1);
    }

    proptest::proptest! {
        #[test]
        fn compare_is_antisymmetric(a in "[a-z0-9.\\-]{0,12}", b in "[a-z0-9.\\-]{0,12}") {
            let ab = compare(&a, &b);
            let ba = compare(&b, &a);
            proptest::prop_assert_eq!(ab.signum(), -ba.signum());
        }

        #[test]
        fn compare_reflexive(a in "[a-z0-9.\\-]{0,12}") {
            proptest::prop_assert_eq!(compare(&a, &a), 0);
        }
    }
}

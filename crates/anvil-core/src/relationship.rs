//! Relationship DSL: `name[:arch][ OP version]`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// A comparison operator against a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl Op {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "<" => Some(Self::Lt),
            "<=" => Some(Self::Le),
            "=" => Some(Self::Eq),
            ">=" => Some(Self::Ge),
            ">" => Some(Self::Gt),
            _ => None,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Eq => "=",
            Self::Ge => ">=",
            Self::Gt => ">",
        };
        f.write_str(s)
    }
}

/// A parsed relationship target: a name, optional architecture qualifier, and
/// optional `(op, version)` constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub name: String,
    pub arch: Option<String>,
    pub constraint: Option<(Op, String)>,
}

impl Relationship {
    /// The name as it would appear standalone, e.g. `python:i386`.
    #[must_use]
    pub fn identifier(&self) -> String {
        match &self.arch {
            Some(arch) => format!("{}:{arch}", self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())?;
        if let Some((op, version)) = &self.constraint {
            write!(f, " {op} {version}")?;
        }
        Ok(())
    }
}

// name[:arch] is restricted to the identifier character class; the operator
// and version are captured independently so a version can appear without a
// preceding operator (op-less implies `=`).
static TARGET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z0-9.\-:]+)\s*(?:(<=|>=|<|>|=))?\s*([a-z0-9.\-:]+)?$").unwrap());

/// Parse `target` into a structured relationship.
///
/// Returns `None` for empty input or input containing characters outside
/// `[a-z0-9.\-:]` (plus the whitespace and operator characters that separate
/// the identifier from the version).
#[must_use]
pub fn parse(target: &str) -> Option<Relationship> {
    if target.is_empty() {
        return None;
    }
    let caps = TARGET_RE.captures(target)?;
    let ident = caps.get(1)?.as_str();
    if ident.is_empty() {
        return None;
    }

    let (name, arch) = match ident.split_once(':') {
        Some((n, a)) => (n.to_string(), Some(a.to_string())),
        None => (ident.to_string(), None),
    };

    let constraint = match (caps.get(2), caps.get(3)) {
        (Some(op), Some(version)) => {
            let op = Op::from_str(op.as_str())?;
            Some((op, version.as_str().to_string()))
        }
        (None, Some(version)) => Some((Op::Eq, version.as_str().to_string())),
        (Some(_), None) => return None,
        (None, None) => None,
    };

    Some(Relationship { name, arch, constraint })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name() {
        let r = parse("python").unwrap();
        assert_eq!(r.name, "python");
        assert_eq!(r.arch, None);
        assert_eq!(r.constraint, None);
    }

    #[test]
    fn name_with_arch() {
        let r = parse("python:i386").unwrap();
        assert_eq!(r.name, "python");
        assert_eq!(r.arch.as_deref(), Some("i386"));
    }

    #[test]
    fn name_with_operator_and_version() {
        let r = parse("python >= 2.7.6").unwrap();
        assert_eq!(r.name, "python");
        assert_eq!(r.constraint, Some((Op::Ge, "2.7.6".to_string())));
    }

    #[test]
    fn operator_with_no_surrounding_whitespace() {
        let r = parse("python>=2.7.6").unwrap();
        assert_eq!(r.constraint, Some((Op::Ge, "2.7.6".to_string())));
    }

    #[test]
    fn omitted_operator_with_version_defaults_to_eq() {
        let r = parse("python 2.7.6").unwrap();
        assert_eq!(r.constraint, Some((Op::Eq, "2.7.6".to_string())));
    }

    #[test]
    fn arch_and_version_together() {
        let r = parse("python:i386 <= 3.0").unwrap();
        assert_eq!(r.arch.as_deref(), Some("i386"));
        assert_eq!(r.constraint, Some((Op::Le, "3.0".to_string())));
    }

    #[test]
    fn empty_input_is_none() {
        assert_eq!(parse(""), None);
    }

    #[test]
    fn disallowed_characters_are_none() {
        assert_eq!(parse("python!"), None);
        assert_eq!(parse("Python"), None);
    }
}

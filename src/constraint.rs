//! Constraint expressions over package versions.
//!
//! An expression is a package name optionally followed by a comparison
//! against a version bound: `gcc`, `gcc=4.9`, `glibc>=2.19`. A bare name
//! matches every variant of that package.

use std::fmt;

use crate::version::Version;

/// Comparison operator of a constraint expression.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `=`
    Equal,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
}

impl Operator {
    fn evaluate(self, candidate: &Version, bound: &Version) -> bool {
        match self {
            Operator::Equal => candidate == bound,
            Operator::Greater => candidate > bound,
            Operator::GreaterEqual => candidate >= bound,
            Operator::Less => candidate < bound,
            Operator::LessEqual => candidate <= bound,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::GreaterEqual => ">=",
            Operator::Less => "<",
            Operator::LessEqual => "<=",
        };
        write!(f, "{symbol}")
    }
}

/// A parsed constraint expression: a package name and an optional version
/// bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintExpr {
    /// The name of the constrained package.
    pub name: String,
    /// The version bound, or `None` when every variant matches.
    pub bound: Option<(Operator, Version)>,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-')
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.')
}

impl ConstraintExpr {
    /// Parses an expression such as `name`, `name=1.0` or `name>=1.2`.
    ///
    /// Returns `None` for anything that does not fit the grammar. Callers
    /// compiling dependency and conflict lists skip such entries silently;
    /// only top-level input entries escalate a failed parse into an error.
    pub fn parse(s: &str) -> Option<Self> {
        let name_end = s.find(|c| !is_name_char(c)).unwrap_or(s.len());
        let (name, rest) = s.split_at(name_end);
        if name.is_empty() {
            return None;
        }
        if rest.is_empty() {
            return Some(ConstraintExpr {
                name: name.to_owned(),
                bound: None,
            });
        }

        // Longest operators first so `>=` is not read as `>` followed by
        // a version starting with `=`.
        let (operator, version) = if let Some(v) = rest.strip_prefix(">=") {
            (Operator::GreaterEqual, v)
        } else if let Some(v) = rest.strip_prefix("<=") {
            (Operator::LessEqual, v)
        } else if let Some(v) = rest.strip_prefix('=') {
            (Operator::Equal, v)
        } else if let Some(v) = rest.strip_prefix('>') {
            (Operator::Greater, v)
        } else if let Some(v) = rest.strip_prefix('<') {
            (Operator::Less, v)
        } else {
            return None;
        };

        if version.is_empty() || !version.chars().all(is_version_char) {
            return None;
        }

        Some(ConstraintExpr {
            name: name.to_owned(),
            bound: Some((operator, Version::parse(version))),
        })
    }

    /// Whether the given candidate version satisfies this expression.
    ///
    /// The name match is the caller's concern; candidates are enumerated per
    /// package name by the repository index.
    pub fn matches(&self, candidate: &Version) -> bool {
        match &self.bound {
            None => true,
            Some((operator, bound)) => operator.evaluate(candidate, bound),
        }
    }
}

impl fmt::Display for ConstraintExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.bound {
            None => write!(f, "{}", self.name),
            Some((operator, bound)) => write!(f, "{}{operator}{bound}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_name() {
        let expr = ConstraintExpr::parse("libc6").unwrap();
        assert_eq!(expr.name, "libc6");
        assert!(expr.bound.is_none());
        assert!(expr.matches(&Version::parse("0.0.1")));
        assert!(expr.matches(&Version::parse("999")));
    }

    #[test]
    fn parses_all_operators() {
        for (input, operator) in [
            ("a=1.0", Operator::Equal),
            ("a>1.0", Operator::Greater),
            ("a>=1.0", Operator::GreaterEqual),
            ("a<1.0", Operator::Less),
            ("a<=1.0", Operator::LessEqual),
        ] {
            let expr = ConstraintExpr::parse(input).unwrap();
            assert_eq!(expr.bound.as_ref().unwrap().0, operator, "{input}");
        }
    }

    #[test]
    fn names_may_contain_punctuation() {
        let expr = ConstraintExpr::parse("g++-4.9>=4.9.1").unwrap();
        assert_eq!(expr.name, "g++-4.9");
        assert!(expr.matches(&Version::parse("4.9.2")));
        assert!(!expr.matches(&Version::parse("4.9.0")));
    }

    #[test]
    fn operator_semantics() {
        let expr = ConstraintExpr::parse("a>=1.10").unwrap();
        assert!(expr.matches(&Version::parse("1.10")));
        assert!(expr.matches(&Version::parse("1.11")));
        // Loose ordering: 1.9 < 1.10.
        assert!(!expr.matches(&Version::parse("1.9")));

        let expr = ConstraintExpr::parse("a=1.0").unwrap();
        assert!(expr.matches(&Version::parse("1.00")));
        assert!(!expr.matches(&Version::parse("1.0.1")));
    }

    #[test]
    fn unparseable_expressions_are_none() {
        assert_eq!(ConstraintExpr::parse(""), None);
        assert_eq!(ConstraintExpr::parse("=1.0"), None);
        assert_eq!(ConstraintExpr::parse("a~1.0"), None);
        assert_eq!(ConstraintExpr::parse("a>="), None);
        assert_eq!(ConstraintExpr::parse("a>=1.0 beta"), None);
    }
}

//! Lenient ("loose") version ordering.
//!
//! Repository versions are free-form strings. They are ordered by splitting
//! them into runs of digits and runs of other characters, with dots acting
//! as separators: digit runs compare numerically (so `1.9 < 1.10`), other
//! runs compare lexically, and numeric components order before textual ones.
//! This is deliberately not semantic versioning; it mirrors the permissive
//! ordering packaging metadata in the wild actually relies on.

use std::{fmt, str::FromStr};

/// A single parsed version component.
///
/// The derive order makes every numeric component smaller than every textual
/// component, which pins down the otherwise underspecified mixed-segment
/// comparison (`1.0` < `1.a`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Component {
    Numeric(u64),
    Text(String),
}

/// A version string parsed for ordered comparison.
///
/// Parsing never fails: any string decomposes into components. Two versions
/// compare component-wise, and a version that is a strict prefix of another
/// is the smaller one (`1.0` < `1.0.1`). Trailing zero components are
/// significant separators but not values, so `1.0` equals `1.00` while
/// remaining distinct from `1`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    components: Vec<Component>,
}

impl Version {
    /// Parses a version string. Infallible by construction.
    pub fn parse(s: &str) -> Self {
        let mut components = Vec::new();
        let mut rest = s;
        while let Some(first) = rest.chars().next() {
            if first == '.' {
                rest = &rest[1..];
                continue;
            }
            let run_end = if first.is_ascii_digit() {
                rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len())
            } else {
                rest.find(|c: char| c.is_ascii_digit() || c == '.')
                    .unwrap_or(rest.len())
            };
            let (run, tail) = rest.split_at(run_end);
            let component = if first.is_ascii_digit() {
                // Digit runs too long for u64 fall back to textual ordering.
                run.parse()
                    .map(Component::Numeric)
                    .unwrap_or_else(|_| Component::Text(run.to_owned()))
            } else {
                Component::Text(run.to_owned())
            };
            components.push(component);
            rest = tail;
        }
        Version { components }
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version::parse(s)
    }
}

impl FromStr for Version {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Version::parse(s))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match component {
                Component::Numeric(n) => write!(f, "{n}")?,
                Component::Text(t) => write!(f, "{t}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use proptest::prelude::*;

    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s)
    }

    #[test]
    fn numeric_components_compare_numerically() {
        assert!(v("1.9") < v("1.10"));
        assert!(v("2.0") > v("1.99.99"));
        assert!(v("10") > v("9"));
    }

    #[test]
    fn prefix_is_smaller() {
        assert!(v("1.0") < v("1.0.1"));
        assert!(v("1") < v("1.0"));
    }

    #[test]
    fn insignificant_zeroes_are_equal() {
        assert_eq!(v("1.0"), v("1.00"));
        assert_eq!(v("01.2"), v("1.2"));
    }

    #[test]
    fn mixed_segments_are_pinned() {
        // Numeric components order before textual ones.
        assert!(v("1.0") < v("1.a"));
        assert!(v("1.0a") > v("1.0"));
        assert!(v("1.0a") < v("1.0b"));
        // A digit run inside a textual segment splits off numerically.
        assert!(v("1.0rc1") < v("1.0rc2"));
    }

    #[test]
    fn huge_digit_runs_do_not_panic() {
        let long = "1.99999999999999999999999999999999";
        assert_ne!(v(long), v("1.0"));
    }

    proptest! {
        #[test]
        fn parsing_never_panics(s in ".*") {
            let _ = Version::parse(&s);
        }

        #[test]
        fn ordering_is_consistent_with_equality(a in "[0-9a-z.]{0,12}", b in "[0-9a-z.]{0,12}") {
            let (a, b) = (v(&a), v(&b));
            prop_assert_eq!(a == b, a.cmp(&b) == Ordering::Equal);
        }

        #[test]
        fn successor_component_is_greater(base in "[0-9]{1,4}(\\.[0-9]{1,4}){0,3}", n in 0u64..9999) {
            let smaller = v(&format!("{base}.{n}"));
            let bigger = v(&format!("{base}.{}", n + 1));
            prop_assert!(smaller < bigger);
        }
    }
}

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::SqlChainError;

// plain or backtick-quoted segments, dot separated; the last segment may be `*`
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_$]*|`[^`]+`)(?:\.(?:[A-Za-z_][A-Za-z0-9_$]*|`[^`]+`))*(?:\.\*)?$")
        .expect("invalid built-in identifier regex")
});

const COMPARISON_OPERATORS: &[&str] = &[
    "=", "!=", "<>", "<", "<=", ">", ">=", "LIKE", "NOT LIKE", "GLOB", "IS", "IS NOT",
];

const SET_OPERATORS: &[&str] = &["IN", "NOT IN"];

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = SqlChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Direction::Asc),
            "DESC" => Ok(Direction::Desc),
            other => Err(SqlChainError::BuildError(format!(
                "invalid sort direction '{other}'"
            ))),
        }
    }
}

pub(crate) fn identifier(name: &str) -> Result<(), SqlChainError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(SqlChainError::BuildError(format!("invalid identifier '{name}'")))
    }
}

/// Projection entries may also be a bare `*`.
pub(crate) fn column(name: &str) -> Result<(), SqlChainError> {
    if name == "*" {
        Ok(())
    } else {
        identifier(name)
    }
}

/// Canonical (upper-case, single-spaced) form of a comparison operator.
pub(crate) fn comparison(operator: &str) -> Result<String, SqlChainError> {
    let canonical = canonical_operator(operator);
    if COMPARISON_OPERATORS.contains(&canonical.as_str()) {
        Ok(canonical)
    } else {
        Err(SqlChainError::BuildError(format!(
            "invalid comparison operator '{operator}'"
        )))
    }
}

/// Operators allowed in front of a subquery: comparisons plus `IN`/`NOT IN`.
pub(crate) fn subquery_operator(operator: &str) -> Result<String, SqlChainError> {
    let canonical = canonical_operator(operator);
    if SET_OPERATORS.contains(&canonical.as_str()) {
        return Ok(canonical);
    }
    comparison(operator)
}

fn canonical_operator(operator: &str) -> String {
    operator
        .split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers() {
        for ok in ["users", "u.id", "`order`", "main.`weird name`", "t.*", "_x1"] {
            assert!(identifier(ok).is_ok(), "{ok}");
        }
        for bad in ["", "1abc", "a b", "id; DROP TABLE t", "a.", "`unterminated", "*"] {
            assert!(identifier(bad).is_err(), "{bad}");
        }
        assert!(column("*").is_ok());
    }

    #[test]
    fn operators_are_canonicalized() {
        assert_eq!(comparison("not   like").ok().as_deref(), Some("NOT LIKE"));
        assert_eq!(comparison(">=").ok().as_deref(), Some(">="));
        assert!(comparison("IN").is_err());
        assert!(comparison("= 1 OR 1 =").is_err());
        assert_eq!(subquery_operator("in").ok().as_deref(), Some("IN"));
        assert_eq!(subquery_operator("=").ok().as_deref(), Some("="));
    }

    #[test]
    fn direction_parses() {
        assert_eq!("desc".parse::<Direction>().ok(), Some(Direction::Desc));
        assert!("sideways".parse::<Direction>().is_err());
    }
}

//! Placeholder scanning and debug interpolation.
//!
//! A lightweight state machine walks statement text and reports `?`, `?N` and
//! `:name`/`@name`/`$name` placeholders that sit outside string literals, quoted
//! identifiers and comments.

use std::ops::Range;

mod parsers;
mod scanner;

use parsers::{is_block_comment_end, is_block_comment_start, is_line_comment_start, try_named_param};
use scanner::{State, scan_digits};

use crate::types::{Params, RowValues};

/// A placeholder found in statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` (no index) or `?N` (explicit one-based index).
    Positional(Option<usize>),
    /// `:name`, `@name` or `$name`, stored with its prefix.
    Named(String),
}

/// Which binding style a statement uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    None,
    Positional,
    Named,
    Mixed,
}

/// Locate every placeholder in `sql` with its byte range.
#[must_use]
pub fn scan_placeholders(sql: &str) -> Vec<(Range<usize>, Placeholder)> {
    let bytes = sql.as_bytes();
    let mut found = Vec::new();
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'`' => state = State::Backtick,
                _ if is_line_comment_start(bytes, idx) => state = State::LineComment,
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'?' => {
                    if let Some((digits_end, digits)) = scan_digits(bytes, idx + 1) {
                        let index = digits.parse().ok();
                        found.push((idx..digits_end, Placeholder::Positional(index)));
                        idx = digits_end - 1;
                    } else {
                        found.push((idx..idx + 1, Placeholder::Positional(None)));
                    }
                }
                b':' | b'@' | b'$' => {
                    if let Some(end) = try_named_param(bytes, idx) {
                        found.push((idx..end, Placeholder::Named(sql[idx..end].to_string())));
                        idx = end - 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Backtick => {
                if b == b'`' {
                    if bytes.get(idx + 1) == Some(&b'`') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }
        idx += 1;
    }

    found
}

/// Classify the binding style of a statement.
#[must_use]
pub fn placeholder_style(sql: &str) -> PlaceholderStyle {
    let found = scan_placeholders(sql);
    let positional = found
        .iter()
        .any(|(_, p)| matches!(p, Placeholder::Positional(_)));
    let named = found.iter().any(|(_, p)| matches!(p, Placeholder::Named(_)));
    match (positional, named) {
        (false, false) => PlaceholderStyle::None,
        (true, false) => PlaceholderStyle::Positional,
        (false, true) => PlaceholderStyle::Named,
        (true, true) => PlaceholderStyle::Mixed,
    }
}

/// Substitute bindings into `sql` as SQL literals, for logging and debugging only.
///
/// Placeholders without a matching binding are left untouched. Never execute the
/// output: it is not an escaping routine for untrusted input.
#[must_use]
pub fn interpolate(sql: &str, params: &Params) -> String {
    let found = scan_placeholders(sql);
    if found.is_empty() || params.is_empty() {
        return sql.to_string();
    }

    let mut out = String::with_capacity(sql.len() + params.len() * 8);
    let mut cursor = 0;
    let mut next_positional = 0usize;

    for (range, placeholder) in found {
        let value: Option<&RowValues> = match (&placeholder, params) {
            (Placeholder::Positional(None), Params::Positional(values)) => {
                let v = values.get(next_positional);
                next_positional += 1;
                v
            }
            (Placeholder::Positional(Some(n)), Params::Positional(values)) => {
                next_positional = *n;
                n.checked_sub(1).and_then(|i| values.get(i))
            }
            (Placeholder::Named(name), Params::Named(_)) => params.get_named(name),
            _ => None,
        };

        out.push_str(&sql[cursor..range.start]);
        match value {
            Some(v) => out.push_str(&v.to_sql_literal()),
            None => out.push_str(&sql[range.clone()]),
        }
        cursor = range.end;
    }
    out.push_str(&sql[cursor..]);
    out
}

/// Number of placeholders in `sql`.
#[must_use]
pub fn count_placeholders(sql: &str) -> usize {
    scan_placeholders(sql).len()
}

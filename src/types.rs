use chrono::NaiveDateTime;
use serde::ser::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Values that can be stored in a database row or used as query parameters.
///
/// The same enum is used for bindings and for normalized result cells, whichever backend
/// produced them:
/// ```rust
/// use sql_chain::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Integer view of the value. Text cells (as the simple backend returns them) are
    /// parsed strictly, so `"12abc"` is `None`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RowValues::Int(value) => Some(*value),
            RowValues::Bool(value) => Some(i64::from(*value)),
            RowValues::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Booleans are stored as 0/1; text `"0"`, `"1"`, `"true"` and `"false"` are read
    /// too.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValues::Bool(value) => Some(*value),
            RowValues::Int(0) => Some(false),
            RowValues::Int(1) => Some(true),
            RowValues::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Some(true),
                "0" | "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Timestamps are stored as text; both `YYYY-MM-DD HH:MM:SS[.fff]` and the ISO `T`
    /// separator are accepted.
    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            RowValues::Timestamp(value) => Some(*value),
            RowValues::Text(s) => ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(s.trim(), format).ok()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(value) => Some(*value as f64),
            RowValues::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Raw bytes of a blob, or of a text cell.
    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            RowValues::Blob(bytes) => Some(bytes),
            RowValues::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Coerce to an integer the way a loosely-typed client would.
    ///
    /// Text is parsed by its leading integer prefix (`"12abc"` is 12), so text-protocol
    /// results and typed results agree on `COUNT(*)`-style scalars. NULL, blobs, JSON and
    /// unparseable text coerce to 0.
    #[must_use]
    pub fn to_i64_lossy(&self) -> i64 {
        match self {
            RowValues::Int(i) => *i,
            #[allow(clippy::cast_possible_truncation)]
            RowValues::Float(f) => *f as i64,
            RowValues::Bool(b) => i64::from(*b),
            RowValues::Text(s) => leading_integer(s),
            RowValues::Timestamp(_) | RowValues::Null | RowValues::JSON(_) | RowValues::Blob(_) => 0,
        }
    }

    /// Render as a SQL literal, used when interpolating bindings for display.
    #[must_use]
    pub fn to_sql_literal(&self) -> String {
        match self {
            RowValues::Int(i) => i.to_string(),
            RowValues::Float(f) => f.to_string(),
            RowValues::Text(s) => quote_literal(s),
            RowValues::Bool(b) => i64::from(*b).to_string(),
            RowValues::Timestamp(dt) => quote_literal(&dt.format("%F %T%.f").to_string()),
            RowValues::Null => "NULL".to_string(),
            RowValues::JSON(v) => quote_literal(&v.to_string()),
            RowValues::Blob(bytes) => {
                let mut out = String::with_capacity(bytes.len() * 2 + 3);
                out.push_str("X'");
                for b in bytes {
                    out.push_str(&format!("{b:02X}"));
                }
                out.push('\'');
                out
            }
        }
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn leading_integer(s: &str) -> i64 {
    let trimmed = s.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return 0;
    }
    trimmed[..end].parse().unwrap_or(0)
}

impl Serialize for RowValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowValues::Int(i) => serializer.serialize_i64(*i),
            RowValues::Float(f) => serializer.serialize_f64(*f),
            RowValues::Text(s) => serializer.serialize_str(s),
            RowValues::Bool(b) => serializer.serialize_bool(*b),
            RowValues::Timestamp(dt) => {
                serializer.serialize_str(&dt.format("%Y-%m-%d %H:%M:%S%.f").to_string())
            }
            RowValues::Null => serializer.serialize_none(),
            RowValues::JSON(v) => v.serialize(serializer),
            RowValues::Blob(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<u32> for RowValues {
    fn from(value: u32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// The two low-level client implementations a statement can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Binds typed parameters through a prepared statement; rows come back typed.
    Prepared,
    /// Runs parameterless statement text; rows come back as text cells.
    Simple,
}

impl BackendKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Prepared => "prepared",
            BackendKind::Simple => "simple",
        }
    }
}

/// What shape of result a statement should yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    /// The full rowset.
    All,
    /// Number of rows changed by the statement.
    RowCount,
    /// Rowid of the last inserted row.
    LastInsertId,
    /// First column of the first row as an integer (`COUNT(*)`-style queries).
    Count,
}

/// Parameters for a statement, positional (`?`) or named (`:name`).
#[derive(Debug, Clone, PartialEq)]
pub enum Params {
    Positional(Vec<RowValues>),
    Named(Vec<(String, RowValues)>),
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(Vec::new())
    }
}

impl Params {
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Build named parameters; keys without a leading `:`, `@` or `$` get a `:` prefix.
    pub fn named<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RowValues>,
    {
        Params::Named(
            pairs
                .into_iter()
                .map(|(k, v)| (normalize_param_name(k.into()), v.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(pairs) => pairs.len(),
        }
    }

    /// Look up a named value; `name` may be given with or without its prefix.
    #[must_use]
    pub fn get_named(&self, name: &str) -> Option<&RowValues> {
        let Params::Named(pairs) = self else {
            return None;
        };
        let wanted = normalize_param_name(name.to_string());
        pairs.iter().find(|(k, _)| *k == wanted).map(|(_, v)| v)
    }
}

impl From<Vec<RowValues>> for Params {
    fn from(values: Vec<RowValues>) -> Self {
        Params::Positional(values)
    }
}

pub(crate) fn normalize_param_name(name: String) -> String {
    if name.starts_with([':', '@', '$']) {
        name
    } else {
        format!(":{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossy_integer_coercion_follows_prefix_rules() {
        assert_eq!(RowValues::Text("42".into()).to_i64_lossy(), 42);
        assert_eq!(RowValues::Text(" -7 apples".into()).to_i64_lossy(), -7);
        assert_eq!(RowValues::Text("abc".into()).to_i64_lossy(), 0);
        assert_eq!(RowValues::Float(3.9).to_i64_lossy(), 3);
        assert_eq!(RowValues::Null.to_i64_lossy(), 0);
        assert_eq!(RowValues::Bool(true).to_i64_lossy(), 1);
    }

    #[test]
    fn accessors_read_typed_and_text_cells_alike() {
        assert_eq!(RowValues::Int(7).as_int(), Some(7));
        assert_eq!(RowValues::Text("7".into()).as_int(), Some(7));
        assert_eq!(RowValues::Text("7x".into()).as_int(), None);
        assert_eq!(RowValues::Text("9.5".into()).as_float(), Some(9.5));
        assert_eq!(RowValues::Int(2).as_float(), Some(2.0));
        assert_eq!(RowValues::Int(1).as_bool(), Some(true));
        assert_eq!(RowValues::Text("0".into()).as_bool(), Some(false));
        assert_eq!(RowValues::Int(5).as_bool(), None);
        assert_eq!(RowValues::Null.as_text(), None);
        assert!(RowValues::Null.is_null());

        let ts = RowValues::Text("2024-01-02 03:04:05.250".into()).as_timestamp();
        assert_eq!(
            ts.map(|t| t.format("%F %T%.3f").to_string()).as_deref(),
            Some("2024-01-02 03:04:05.250")
        );
        assert!(RowValues::Text("2024-01-02T03:04:05".into()).as_timestamp().is_some());
        assert_eq!(RowValues::Blob(vec![1, 2]).as_blob(), Some(&[1_u8, 2][..]));
        assert_eq!(RowValues::Text("ab".into()).as_blob(), Some(&b"ab"[..]));
    }

    #[test]
    fn literals_escape_quotes() {
        assert_eq!(RowValues::Text("O'Neil".into()).to_sql_literal(), "'O''Neil'");
        assert_eq!(RowValues::Null.to_sql_literal(), "NULL");
        assert_eq!(RowValues::Blob(vec![0xAB, 0x01]).to_sql_literal(), "X'AB01'");
    }

    #[test]
    fn named_params_are_prefixed() {
        let params = Params::named([("id", 1), (":age", 30)]);
        assert_eq!(params.get_named("id"), Some(&RowValues::Int(1)));
        assert_eq!(params.get_named(":age"), Some(&RowValues::Int(30)));
        assert_eq!(params.len(), 2);
        assert!(Params::none().is_empty());
    }
}

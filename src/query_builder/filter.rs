use crate::types::RowValues;

/// A `column <operator> value` condition passed as data, for calls that take a list of
/// conditions instead of a chain.
///
/// `(column, value)` pairs convert to an equality and `(column, operator, value)` triples
/// to a comparison, so both forms can be mixed through [`Filter::from`].
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: String,
    pub operator: String,
    pub value: RowValues,
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::cmp(column, "=", value)
    }

    pub fn cmp(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<RowValues>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }
}

impl<K, V> From<(K, V)> for Filter
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn from((column, value): (K, V)) -> Self {
        Filter::eq(column, value)
    }
}

impl<K, O, V> From<(K, O, V)> for Filter
where
    K: Into<String>,
    O: Into<String>,
    V: Into<RowValues>,
{
    fn from((column, operator, value): (K, O, V)) -> Self {
        Filter::cmp(column, operator, value)
    }
}

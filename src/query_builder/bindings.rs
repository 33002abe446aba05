use std::ops::Range;

use crate::types::RowValues;

/// Append-only list of values bound to the `?` placeholders of a WHERE clause.
///
/// Slots are never reordered, so a condition's position in the list is fixed the moment
/// it is added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingList {
    values: Vec<RowValues>,
}

impl BindingList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value and return its slot.
    pub fn push(&mut self, value: RowValues) -> usize {
        self.values.push(value);
        self.values.len() - 1
    }

    /// Append another list's values in order and return the slots they now occupy.
    pub fn extend(&mut self, other: BindingList) -> Range<usize> {
        let start = self.values.len();
        self.values.extend(other.values);
        start..self.values.len()
    }

    pub fn extend_values<I>(&mut self, values: I) -> Range<usize>
    where
        I: IntoIterator<Item = RowValues>,
    {
        let start = self.values.len();
        self.values.extend(values);
        start..self.values.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[RowValues] {
        &self.values
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<RowValues> {
        self.values
    }
}

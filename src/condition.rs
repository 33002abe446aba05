//! WHERE predicate tree.
//!
//! Every list node after the first carries the connective that joins it to its left
//! sibling, so rendering never produces a leading `AND`/`OR`. Bindings are not stored
//! on the nodes; they live in the builder's binding list and nodes only record which
//! slots they consumed.

use std::fmt::Write as _;
use std::ops::Range;

/// Boolean connective between a condition and its left sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Connective::And => "AND",
            Connective::Or => "OR",
        }
    }
}

/// One WHERE predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `column <op> ?`
    Simple {
        column: String,
        operator: String,
        value_index: usize,
    },
    /// `left <op> right`, no binding.
    ColumnCompare {
        left: String,
        operator: String,
        right: String,
    },
    /// `column <op> (<subquery>)`; the subquery's bindings sit inline at `bindings`.
    SubqueryCompare {
        column: String,
        operator: String,
        sql: String,
        bindings: Range<usize>,
    },
    /// Parenthesized nested list.
    Group(ConditionList),
    /// `column IS [NOT] NULL`
    Null { column: String, negated: bool },
    /// `column [NOT] IN (?, ...)`
    InList {
        column: String,
        negated: bool,
        bindings: Range<usize>,
    },
}

impl Condition {
    fn rebase(&mut self, offset: usize) {
        match self {
            Condition::Simple { value_index, .. } => *value_index += offset,
            Condition::SubqueryCompare { bindings, .. } | Condition::InList { bindings, .. } => {
                *bindings = bindings.start + offset..bindings.end + offset;
            }
            Condition::Group(list) => list.rebase(offset),
            Condition::ColumnCompare { .. } | Condition::Null { .. } => {}
        }
    }

    fn render_into(&self, out: &mut String) {
        match self {
            Condition::Simple {
                column, operator, ..
            } => {
                let _ = write!(out, "{column} {operator} ?");
            }
            Condition::ColumnCompare {
                left,
                operator,
                right,
            } => {
                let _ = write!(out, "{left} {operator} {right}");
            }
            Condition::SubqueryCompare {
                column,
                operator,
                sql,
                ..
            } => {
                let _ = write!(out, "{column} {operator} ({sql})");
            }
            Condition::Group(list) => {
                out.push('(');
                list.render_into(out);
                out.push(')');
            }
            Condition::Null { column, negated } => {
                let not = if *negated { "NOT " } else { "" };
                let _ = write!(out, "{column} IS {not}NULL");
            }
            Condition::InList {
                column,
                negated,
                bindings,
            } => {
                // an empty list matches nothing (or, negated, everything)
                if bindings.is_empty() {
                    out.push_str(if *negated { "1 = 1" } else { "1 = 0" });
                    return;
                }
                let not = if *negated { "NOT " } else { "" };
                let _ = write!(out, "{column} {not}IN (");
                for i in 0..bindings.len() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push('?');
                }
                out.push(')');
            }
        }
    }

    /// Number of binding slots this node consumes, groups included.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        match self {
            Condition::Simple { .. } => 1,
            Condition::SubqueryCompare { bindings, .. } | Condition::InList { bindings, .. } => {
                bindings.len()
            }
            Condition::Group(list) => list.binding_count(),
            Condition::ColumnCompare { .. } | Condition::Null { .. } => 0,
        }
    }
}

/// Ordered sibling list of conditions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionList {
    nodes: Vec<(Option<Connective>, Condition)>,
}

impl ConditionList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. The connective is dropped for the first node of the list.
    pub fn push(&mut self, connective: Connective, condition: Condition) {
        let connective = if self.nodes.is_empty() {
            None
        } else {
            Some(connective)
        };
        self.nodes.push((connective, condition));
    }

    /// Shift every recorded binding slot by `offset`, used when a nested list is folded
    /// into a parent whose binding list is already `offset` long.
    pub fn rebase(&mut self, offset: usize) {
        if offset == 0 {
            return;
        }
        for (_, node) in &mut self.nodes {
            node.rebase(offset);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<Connective>, &Condition)> {
        self.nodes.iter().map(|(c, node)| (*c, node))
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.nodes.iter().map(|(_, n)| n.binding_count()).sum()
    }

    /// Render the predicate text without the `WHERE` keyword.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        for (connective, node) in &self.nodes {
            if let Some(c) = connective {
                out.push(' ');
                out.push_str(c.as_str());
                out.push(' ');
            }
            node.render_into(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple(column: &str, idx: usize) -> Condition {
        Condition::Simple {
            column: column.into(),
            operator: "=".into(),
            value_index: idx,
        }
    }

    #[test]
    fn first_node_has_no_connective() {
        let mut list = ConditionList::new();
        list.push(Connective::Or, simple("a", 0));
        list.push(Connective::And, simple("b", 1));
        list.push(Connective::Or, simple("c", 2));
        assert_eq!(list.render(), "a = ? AND b = ? OR c = ?");
        assert_eq!(list.iter().next().map(|(c, _)| c), Some(None));
    }

    #[test]
    fn groups_render_in_parentheses() {
        let mut inner = ConditionList::new();
        inner.push(Connective::And, simple("b", 0));
        inner.push(Connective::Or, simple("c", 1));

        let mut outer = ConditionList::new();
        outer.push(Connective::And, simple("a", 0));
        inner.rebase(1);
        outer.push(Connective::And, Condition::Group(inner));

        assert_eq!(outer.render(), "a = ? AND (b = ? OR c = ?)");
        assert_eq!(outer.binding_count(), 3);
        let indices: Vec<usize> = match outer.iter().nth(1) {
            Some((_, Condition::Group(g))) => g
                .iter()
                .filter_map(|(_, n)| match n {
                    Condition::Simple { value_index, .. } => Some(*value_index),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn null_and_in_list_nodes() {
        let mut list = ConditionList::new();
        list.push(
            Connective::And,
            Condition::Null {
                column: "deleted_at".into(),
                negated: false,
            },
        );
        list.push(
            Connective::And,
            Condition::InList {
                column: "id".into(),
                negated: true,
                bindings: 0..3,
            },
        );
        list.push(
            Connective::Or,
            Condition::InList {
                column: "id".into(),
                negated: false,
                bindings: 3..3,
            },
        );
        assert_eq!(
            list.render(),
            "deleted_at IS NULL AND id NOT IN (?, ?, ?) OR 1 = 0"
        );
    }

    #[test]
    fn column_compare_and_subquery() {
        let mut list = ConditionList::new();
        list.push(
            Connective::And,
            Condition::ColumnCompare {
                left: "a.id".into(),
                operator: "=".into(),
                right: "b.a_id".into(),
            },
        );
        list.push(
            Connective::And,
            Condition::SubqueryCompare {
                column: "id".into(),
                operator: "IN".into(),
                sql: "SELECT user_id FROM orders WHERE status = ?".into(),
                bindings: 0..1,
            },
        );
        assert_eq!(
            list.render(),
            "a.id = b.a_id AND id IN (SELECT user_id FROM orders WHERE status = ?)"
        );
        assert_eq!(list.binding_count(), 1);
    }
}

//! Row representation for the flattened navigation tree.
//!
//! The browser renders the tree as a list, so each navigation node becomes a row that keeps
//! its depth and its parent/child relationships as indices into the list. Rows are built once
//! from a depth-first walk and never change afterwards.

use crate::navigation::{FlatLink, NavTree};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Navigation node positioned in the flattened list.
pub struct Row {
    /// Display label.
    pub label: String,
    /// Target link.
    pub link: String,
    /// Nesting depth in the tree (0 for roots).
    pub depth: usize,
    /// Index of the containing row in the list.
    pub parent_index: Option<usize>,
    /// Indices of directly nested rows.
    pub children_indices: Vec<usize>,
    /// Whether the node's children live in an unresolved subtree script.
    pub deferred: bool,
}

#[must_use]
/// Flattens a tree in document order, linking each row to its parent and children.
pub fn rows_from_tree(tree: &NavTree) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    // Index of the most recent row at each depth along the current path.
    let mut ancestors: Vec<usize> = Vec::new();

    for step in tree.walk() {
        ancestors.truncate(step.depth);
        let parent_index = ancestors.last().copied();
        let index = rows.len();
        if let Some(parent) = parent_index {
            rows[parent].children_indices.push(index);
        }
        rows.push(Row {
            label: step.label.to_string(),
            link: step.link.to_string(),
            depth: step.depth,
            parent_index,
            children_indices: Vec::new(),
            deferred: step.deferred.is_some(),
        });
        ancestors.push(index);
    }

    rows
}

#[must_use]
/// Rows for the unstyled fallback list: every link at depth 0.
pub fn rows_from_links(links: &[FlatLink]) -> Vec<Row> {
    links
        .iter()
        .map(|link| Row {
            label: link.label.clone(),
            link: link.link.clone(),
            depth: 0,
            parent_index: None,
            children_indices: Vec::new(),
            deferred: false,
        })
        .collect()
}

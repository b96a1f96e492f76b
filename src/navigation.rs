//! The navigation descriptor: a site's table of contents plus its linear page order.
//!
//! `navtreedata.js` declares `NAVTREE`, a nested array of `[label, link, children]` triples, and
//! `NAVTREEINDEX`, a flat array of page identifiers. Children are `null` for a leaf, a nested
//! array, or the name of a script that holds the subtree (`"namespaces_dup"` lives in
//! `namespaces_dup.js`). The tree is validated once at load time and is immutable afterwards.

use crate::error::{DoxnavError, Result};
use crate::script::{quote, Literal, Script};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use std::path::Path;

const TREE_VAR: &str = "NAVTREE";
const INDEX_VAR: &str = "NAVTREEINDEX";
const SYNC_ON_VAR: &str = "SYNCONMSG";
const SYNC_OFF_VAR: &str = "SYNCOFFMSG";

#[derive(Clone, Debug, PartialEq, Eq)]
/// How a node's children are stored.
pub enum NavChildren {
    /// `null`: no children.
    Leaf,
    /// Children written inline.
    Nested(Vec<NavNode>),
    /// Children stored in a separate script named by this identifier.
    Deferred(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One entry of the table of contents.
pub struct NavNode {
    /// Display label, emoji and all.
    pub label: String,
    /// Page-relative link, possibly with a `#fragment`.
    pub link: String,
    /// Child entries.
    pub children: NavChildren,
}

impl NavNode {
    #[must_use]
    /// Inline children, empty for leaves and unresolved subtrees.
    pub fn child_nodes(&self) -> &[NavNode] {
        match &self.children {
            NavChildren::Nested(children) => children,
            NavChildren::Leaf | NavChildren::Deferred(_) => &[],
        }
    }

    #[must_use]
    /// Name of the unresolved subtree script, if any.
    pub fn deferred(&self) -> Option<&str> {
        match &self.children {
            NavChildren::Deferred(name) => Some(name),
            NavChildren::Leaf | NavChildren::Nested(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
/// Neighbours of a page in the linear page order.
pub struct PageNeighbours {
    /// Page before the current one.
    pub prev: Option<String>,
    /// Page after the current one.
    pub next: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Flat page order with constant-time position lookup.
pub struct PageIndex {
    pages: Vec<String>,
    positions: HashMap<String, usize>,
}

impl PageIndex {
    /// Builds the index, rejecting empty or repeated identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::StructuralValidation`] naming the offending position.
    pub fn new(pages: Vec<String>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            if page.is_empty() {
                return Err(DoxnavError::structural(
                    format!("{INDEX_VAR}[{i}]"),
                    "page identifier is empty",
                ));
            }
            if let Some(first) = positions.insert(page.clone(), i) {
                return Err(DoxnavError::structural(
                    format!("{INDEX_VAR}[{i}]"),
                    format!("page identifier {page:?} already listed at {first}"),
                ));
            }
        }
        Ok(Self { pages, positions })
    }

    #[must_use]
    /// Position of a page in the linear order.
    pub fn position(&self, page: &str) -> Option<usize> {
        self.positions.get(page).copied()
    }

    #[must_use]
    /// Previous and next page identifiers; both are `None` for an unknown page.
    pub fn neighbours(&self, page: &str) -> PageNeighbours {
        let Some(i) = self.position(page) else {
            return PageNeighbours::default();
        };
        PageNeighbours {
            prev: i.checked_sub(1).map(|p| self.pages[p].clone()),
            next: self.pages.get(i + 1).cloned(),
        }
    }

    #[must_use]
    /// Page identifiers in order.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Tooltips for the panel-synchronisation toggle.
pub struct SyncMessages {
    /// Shown while synchronisation is on.
    pub on: String,
    /// Shown while synchronisation is off.
    pub off: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// One step of a depth-first walk.
pub struct WalkStep<'a> {
    /// Display label.
    pub label: &'a str,
    /// Target link.
    pub link: &'a str,
    /// Nesting depth, 0 for roots.
    pub depth: usize,
    /// Unresolved subtree script, if the node has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deferred: Option<&'a str>,
}

/// Lazy pre-order traversal over a navigation forest.
pub struct Walk<'a> {
    stack: Vec<(&'a NavNode, usize)>,
}

impl<'a> Walk<'a> {
    fn new(roots: &'a [NavNode]) -> Self {
        Self {
            stack: roots.iter().rev().map(|node| (node, 0)).collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = WalkStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        self.stack
            .extend(node.child_nodes().iter().rev().map(|child| (child, depth + 1)));
        Some(WalkStep {
            label: &node.label,
            link: &node.link,
            depth,
            deferred: node.deferred(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
/// A label and link recovered without validation, for the unstyled fallback list.
pub struct FlatLink {
    /// Display label.
    pub label: String,
    /// Target link.
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A validated navigation descriptor.
pub struct NavTree {
    roots: Vec<NavNode>,
    index: PageIndex,
    sync: Option<SyncMessages>,
}

impl NavTree {
    /// Builds a tree from already-validated parts.
    #[must_use]
    pub fn new(roots: Vec<NavNode>, index: PageIndex) -> Self {
        Self {
            roots,
            index,
            sync: None,
        }
    }

    /// Parses and validates `navtreedata.js` source.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::Script`] for unparseable source and
    /// [`DoxnavError::StructuralValidation`] when `NAVTREE` is missing or malformed or
    /// `NAVTREEINDEX` is malformed.
    pub fn parse(source: &str) -> Result<Self> {
        Self::from_script(&Script::parse(source)?)
    }

    /// Reads and validates a descriptor file.
    ///
    /// # Errors
    ///
    /// As [`NavTree::parse`], plus IO failures.
    pub fn load(path: &Path) -> Result<Self> {
        let tree = Self::from_script(&Script::load(path)?)?;
        log::debug!(
            "loaded {} navigation nodes and {} indexed pages from {}",
            tree.len(),
            tree.index.pages().len(),
            path.display()
        );
        Ok(tree)
    }

    /// Validates the declarations of a parsed descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::StructuralValidation`] for any shape violation.
    pub fn from_script(script: &Script) -> Result<Self> {
        let tree = script
            .get(TREE_VAR)
            .ok_or_else(|| DoxnavError::structural(TREE_VAR, "declaration missing"))?;
        let roots = nodes_from_literal(tree, TREE_VAR)?;

        let pages = match script.get(INDEX_VAR) {
            None => Vec::new(),
            Some(Literal::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        DoxnavError::structural(
                            format!("{INDEX_VAR}[{i}]"),
                            format!("expected a string, found {}", item.kind()),
                        )
                    })
                })
                .collect::<Result<_>>()?,
            Some(other) => {
                return Err(DoxnavError::structural(
                    INDEX_VAR,
                    format!("expected an array, found {}", other.kind()),
                ))
            }
        };

        let sync = match (
            script.get(SYNC_ON_VAR).and_then(Literal::as_str),
            script.get(SYNC_OFF_VAR).and_then(Literal::as_str),
        ) {
            (Some(on), Some(off)) => Some(SyncMessages {
                on: on.to_string(),
                off: off.to_string(),
            }),
            _ => None,
        };

        Ok(Self {
            roots,
            index: PageIndex::new(pages)?,
            sync,
        })
    }

    #[must_use]
    /// Top-level entries.
    pub fn roots(&self) -> &[NavNode] {
        &self.roots
    }

    #[must_use]
    /// The linear page order.
    pub fn index(&self) -> &PageIndex {
        &self.index
    }

    #[must_use]
    /// Panel-synchronisation tooltips, when the descriptor declares them.
    pub fn sync_messages(&self) -> Option<&SyncMessages> {
        self.sync.as_ref()
    }

    #[must_use]
    /// Depth-first enumeration of `(label, link, depth)` in document order.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.roots)
    }

    #[must_use]
    /// Previous and next page for `page_id`.
    pub fn lookup(&self, page_id: &str) -> PageNeighbours {
        self.index.neighbours(page_id)
    }

    #[must_use]
    /// Number of nodes reachable without resolving deferred subtrees.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    #[must_use]
    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Splices deferred subtrees in from `<dir>/<name>.js`, returning how many were resolved.
    ///
    /// Subtrees that are missing or malformed stay deferred and are logged. Each script name is
    /// resolved at most once, so a subtree that refers back to itself cannot loop.
    pub fn resolve_deferred(&mut self, dir: &Path) -> usize {
        let mut seen = HashSet::new();
        resolve_in(&mut self.roots, dir, &mut seen)
    }

    #[must_use]
    /// Serialises the descriptor in the generator's layout.
    pub fn to_js(&self) -> String {
        let mut out = format!("var {TREE_VAR} =\n[\n");
        write_nodes(&mut out, &self.roots, 1);
        out.push_str("];\n\n");

        let _ = write!(out, "var {INDEX_VAR} =\n[\n");
        let pages: Vec<String> = self.index.pages().iter().map(|p| quote(p, '"')).collect();
        out.push_str(&pages.join(",\n"));
        if !pages.is_empty() {
            out.push('\n');
        }
        out.push_str("];\n");

        if let Some(sync) = &self.sync {
            let _ = write!(
                out,
                "\nvar {SYNC_ON_VAR} = {};\nvar {SYNC_OFF_VAR} = {};\n",
                quote(&sync.on, '\''),
                quote(&sync.off, '\'')
            );
        }
        out
    }
}

fn nodes_from_literal(value: &Literal, location: &str) -> Result<Vec<NavNode>> {
    let items = value.as_array().ok_or_else(|| {
        DoxnavError::structural(
            location,
            format!("expected an array of entries, found {}", value.kind()),
        )
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| node_from_literal(item, &format!("{location}[{i}]")))
        .collect()
}

fn node_from_literal(value: &Literal, location: &str) -> Result<NavNode> {
    let fields = match value.as_array() {
        Some(fields) if fields.len() == 3 => fields,
        Some(fields) => {
            return Err(DoxnavError::structural(
                location,
                format!("expected [label, link, children], found {} fields", fields.len()),
            ))
        }
        None => {
            return Err(DoxnavError::structural(
                location,
                format!("expected [label, link, children], found {}", value.kind()),
            ))
        }
    };

    let label = fields[0].as_str().ok_or_else(|| {
        DoxnavError::structural(
            format!("{location}[0]"),
            format!("label must be a string, found {}", fields[0].kind()),
        )
    })?;
    let link = match &fields[1] {
        Literal::String(link) if !link.is_empty() => link,
        Literal::String(_) => {
            return Err(DoxnavError::structural(
                format!("{location}[1]"),
                "link is empty",
            ))
        }
        other => {
            return Err(DoxnavError::structural(
                format!("{location}[1]"),
                format!("link must be a string, found {}", other.kind()),
            ))
        }
    };
    let children = match &fields[2] {
        Literal::Null => NavChildren::Leaf,
        Literal::String(name) if !name.is_empty() => NavChildren::Deferred(name.clone()),
        Literal::Array(_) => NavChildren::Nested(nodes_from_literal(
            &fields[2],
            &format!("{location}[2]"),
        )?),
        other => {
            return Err(DoxnavError::structural(
                format!("{location}[2]"),
                format!(
                    "children must be null, an array or a subtree name, found {}",
                    other.kind()
                ),
            ))
        }
    };

    Ok(NavNode {
        label: label.to_string(),
        link: link.clone(),
        children,
    })
}

fn load_subtree(dir: &Path, name: &str) -> Result<Vec<NavNode>> {
    let script = Script::load(&dir.join(format!("{name}.js")))?;
    let value = script
        .get(name)
        .ok_or_else(|| DoxnavError::structural(name, "declaration missing"))?;
    nodes_from_literal(value, name)
}

fn resolve_in(nodes: &mut [NavNode], dir: &Path, seen: &mut HashSet<String>) -> usize {
    let mut resolved = 0;
    for node in nodes {
        if let Some(name) = node.deferred().map(str::to_string) {
            if seen.insert(name.clone()) {
                match load_subtree(dir, &name) {
                    Ok(children) => {
                        node.children = NavChildren::Nested(children);
                        resolved += 1;
                    }
                    Err(e) => log::warn!("leaving subtree {name} unresolved: {e}"),
                }
            }
        }
        if let NavChildren::Nested(children) = &mut node.children {
            resolved += resolve_in(children, dir, seen);
        }
    }
    resolved
}

fn write_nodes(out: &mut String, nodes: &[NavNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for (i, node) in nodes.iter().enumerate() {
        let _ = write!(
            out,
            "{indent}[ {}, {}, ",
            quote(&node.label, '"'),
            quote(&node.link, '"')
        );
        match &node.children {
            NavChildren::Leaf => out.push_str("null ]"),
            NavChildren::Deferred(name) => {
                let _ = write!(out, "{} ]", quote(name, '"'));
            }
            NavChildren::Nested(children) => {
                out.push_str("[\n");
                write_nodes(out, children, depth + 1);
                let _ = write!(out, "{indent}] ]");
            }
        }
        out.push_str(if i + 1 < nodes.len() { ",\n" } else { "\n" });
    }
}

/// Recovers `(label, link)` pairs from a descriptor without validating it.
///
/// Used when [`NavTree::parse`] fails so that a renderer can still offer a plain list of links.
/// Any array under `NAVTREE` whose first two elements are strings, the second non-empty, counts
/// as an entry. Unparseable source yields an empty list.
#[must_use]
pub fn fallback_links(source: &str) -> Vec<FlatLink> {
    let script = match Script::parse(source) {
        Ok(script) => script,
        Err(e) => {
            log::warn!("navigation fallback unavailable: {e}");
            return Vec::new();
        }
    };
    let mut links = Vec::new();
    if let Some(tree) = script.get(TREE_VAR) {
        collect_links(tree, &mut links);
    }
    links
}

fn collect_links(value: &Literal, links: &mut Vec<FlatLink>) {
    let Some(items) = value.as_array() else {
        return;
    };
    if let [Literal::String(label), Literal::String(link), ..] = items {
        if !link.is_empty() {
            links.push(FlatLink {
                label: label.clone(),
                link: link.clone(),
            });
        }
    }
    for item in items {
        collect_links(item, links);
    }
}

#[cfg(test)]
#[path = "tests/navigation.rs"]
mod tests;

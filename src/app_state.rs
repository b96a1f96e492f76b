//! The core state machine bridging the navigation tree, the search index and the browser.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user moves
//! around. The tree is flattened into rows once; structural moves (parent, child, sibling) walk
//! the row indices, while page moves (prev/next) go through the descriptor's page index and then
//! find the row that links to the target page.

use crate::input::Navigation;
use crate::navigation::{NavTree, PageNeighbours};
use crate::row::{rows_from_links, rows_from_tree, Row};
use crate::search::{SearchHit, SearchIndex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Whether the browser shows the validated tree or the fallback link list.
pub enum NavMode {
    /// Rows come from a validated tree; structure and page order are available.
    Tree,
    /// Rows are a flat list recovered from a broken descriptor.
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Shows the navigation rows.
    Tree,
    /// Captures a search query after '/' is pressed.
    Search,
    /// Lists hits for the last query.
    Results,
}

/// Browser session state.
pub struct AppState {
    /// Flattened navigation rows in document order.
    pub rows: Vec<Row>,
    /// Tree or fallback rendering.
    pub mode: NavMode,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Selected row.
    pub current_row_index: usize,
    /// Accumulates the query typed after '/'.
    pub query_buffer: String,
    /// Hits for the last query.
    pub results: Vec<SearchHit>,
    /// Selected hit in the results view.
    pub current_result_index: usize,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// Link picked by the user, printed on exit.
    pub chosen_link: Option<String>,
    tree: Option<NavTree>,
}

impl AppState {
    #[must_use]
    /// Initialises the session from loaded navigation.
    pub fn new(navigation: Navigation) -> Self {
        let (rows, mode, tree, message) = match navigation {
            Navigation::Tree(tree) => (rows_from_tree(&tree), NavMode::Tree, Some(tree), None),
            Navigation::Fallback(links) => (
                rows_from_links(&links),
                NavMode::Fallback,
                None,
                Some("Navigation tree unavailable, showing plain links".to_string()),
            ),
        };

        Self {
            rows,
            mode,
            current_view: View::Tree,
            current_row_index: 0,
            query_buffer: String::new(),
            results: Vec::new(),
            current_result_index: 0,
            message,
            chosen_link: None,
            tree,
        }
    }

    #[must_use]
    /// The selected row, if any rows exist.
    pub fn current_row(&self) -> Option<&Row> {
        self.rows.get(self.current_row_index)
    }

    #[must_use]
    /// Labels from the root down to the selected row.
    pub fn breadcrumb(&self) -> String {
        let mut parts = Vec::new();
        let mut current = self.current_row().map(|_| self.current_row_index);
        while let Some(idx) = current {
            parts.push(self.rows[idx].label.as_str());
            current = self.rows[idx].parent_index;
        }
        parts.reverse();
        parts.join(" > ")
    }

    // --- <Row Navigation> ---

    #[must_use]
    /// Returns the following row index for sequential navigation.
    pub fn find_next_row(&self) -> Option<usize> {
        if self.current_row_index + 1 < self.rows.len() {
            Some(self.current_row_index + 1)
        } else {
            None
        }
    }

    #[must_use]
    /// Returns the preceding row index for reverse navigation.
    pub fn find_prev_row(&self) -> Option<usize> {
        self.current_row_index.checked_sub(1)
    }

    #[must_use]
    /// Moves to the containing row in the tree.
    pub fn navigate_to_parent(&self) -> Option<usize> {
        self.current_row()?.parent_index
    }

    #[must_use]
    /// Descends to the first child row.
    pub fn navigate_to_first_child(&self) -> Option<usize> {
        self.current_row()?.children_indices.first().copied()
    }

    #[must_use]
    /// Finds the next row at the same depth under the same parent.
    pub fn navigate_to_next_sibling(&self) -> Option<usize> {
        let depth = self.current_row()?.depth;

        for i in (self.current_row_index + 1)..self.rows.len() {
            if self.rows[i].depth == depth {
                return Some(i);
            }
            // Stop once we climb above our parent's level
            if self.rows[i].depth < depth {
                break;
            }
        }

        None
    }

    #[must_use]
    /// Finds the previous row at the same depth under the same parent.
    pub fn navigate_to_prev_sibling(&self) -> Option<usize> {
        let depth = self.current_row()?.depth;

        for i in (0..self.current_row_index).rev() {
            if self.rows[i].depth == depth {
                return Some(i);
            }
            if self.rows[i].depth < depth {
                break;
            }
        }

        None
    }

    #[must_use]
    /// Jumps to the first row.
    pub fn navigate_to_first(&self) -> Option<usize> {
        if self.rows.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    #[must_use]
    /// Jumps to the last row.
    pub fn navigate_to_last(&self) -> Option<usize> {
        self.rows.len().checked_sub(1)
    }

    #[must_use]
    /// Finds the first row at the same depth anywhere in the tree.
    pub fn navigate_to_first_at_level(&self) -> Option<usize> {
        let depth = self.current_row()?.depth;
        (0..self.rows.len()).find(|&i| self.rows[i].depth == depth)
    }

    #[must_use]
    /// Finds the last row at the same depth anywhere in the tree.
    pub fn navigate_to_last_at_level(&self) -> Option<usize> {
        let depth = self.current_row()?.depth;
        (0..self.rows.len())
            .rev()
            .find(|&i| self.rows[i].depth == depth)
    }

    // --- </Row Navigation> ---

    // --- <Page Navigation> ---

    #[must_use]
    /// Previous and next pages for the selected row's link.
    ///
    /// Always empty in fallback mode, where no page index is available.
    pub fn page_neighbours(&self) -> PageNeighbours {
        match (&self.tree, self.current_row()) {
            (Some(tree), Some(row)) => tree.lookup(&row.link),
            _ => PageNeighbours::default(),
        }
    }

    #[must_use]
    /// Finds the row for a link: an exact match first, then the first row on the same page.
    pub fn find_row_by_link(&self, link: &str) -> Option<usize> {
        let page = |l: &str| l.split('#').next().unwrap_or_default().to_string();
        self.rows
            .iter()
            .position(|row| row.link == link)
            .or_else(|| {
                let target = page(link);
                self.rows.iter().position(|row| page(&row.link) == target)
            })
    }

    /// Selects the row for the next page in the page index.
    ///
    /// Returns `false` and sets a message when there is no next page or no row links to it.
    pub fn go_to_next_page(&mut self) -> bool {
        let target = self.page_neighbours().next;
        self.go_to_page(target, "No next page")
    }

    /// Selects the row for the previous page in the page index.
    ///
    /// Returns `false` and sets a message when there is no previous page or no row links to it.
    pub fn go_to_prev_page(&mut self) -> bool {
        let target = self.page_neighbours().prev;
        self.go_to_page(target, "No previous page")
    }

    fn go_to_page(&mut self, target: Option<String>, missing: &str) -> bool {
        let Some(target) = target else {
            self.message = Some(missing.to_string());
            return false;
        };
        if let Some(idx) = self.find_row_by_link(&target) {
            self.current_row_index = idx;
            self.message = None;
            true
        } else {
            self.message = Some(format!("{target} is not in the tree"));
            false
        }
    }

    // --- </Page Navigation> ---

    // --- <Search> ---

    /// Enters the search prompt with an empty query.
    pub fn start_search(&mut self) {
        self.current_view = View::Search;
        self.query_buffer.clear();
        self.message = None;
    }

    /// Runs the buffered query and shows the results, or a message when nothing matched.
    pub fn run_search(&mut self, index: &SearchIndex) {
        self.results = index.search(&self.query_buffer);
        self.current_result_index = 0;
        if self.results.is_empty() {
            self.message = Some(format!("No matches for '{}'", self.query_buffer));
            self.current_view = View::Tree;
        } else {
            self.message = None;
            self.current_view = View::Results;
        }
    }

    #[must_use]
    /// The selected search hit.
    pub fn current_result(&self) -> Option<&SearchHit> {
        self.results.get(self.current_result_index)
    }

    /// Follows the selected hit: selects its row when the tree links to it, otherwise records
    /// the hit's link as the user's choice.
    pub fn open_selected_result(&mut self) {
        let Some(link) = self.current_result().map(|hit| hit.link.clone()) else {
            return;
        };
        if let Some(idx) = self.find_row_by_link(&link) {
            self.current_row_index = idx;
            self.current_view = View::Tree;
        } else {
            self.chosen_link = Some(link);
        }
    }

    /// Leaves search results or the prompt and returns to the tree.
    pub fn cancel_search(&mut self) {
        self.current_view = View::Tree;
        self.query_buffer.clear();
    }

    // --- </Search> ---

    /// Records the selected row's link as the user's choice.
    pub fn choose_current(&mut self) {
        self.chosen_link = self.current_row().map(|row| row.link.clone());
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;

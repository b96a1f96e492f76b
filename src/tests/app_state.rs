use super::{AppState, NavMode, View};
use crate::input::Navigation;
use crate::navigation::{FlatLink, NavTree};
use crate::search::{SearchIndex, SearchOptions, SearchPartition};

const GUIDE: &str = r#"
var NAVTREE =
[
  [ "Guide", "index.html", [
    [ "Install", "install.html", [
      [ "Linux", "install.html#linux", null ],
      [ "Windows", "install.html#windows", null ]
    ] ],
    [ "Usage", "usage.html", null ],
    [ "API", "api.html", "api_dup" ]
  ] ]
];

var NAVTREEINDEX =
[
"index.html",
"install.html",
"usage.html",
"reference.html"
];
"#;

fn guide_state() -> AppState {
    AppState::new(Navigation::Tree(NavTree::parse(GUIDE).unwrap()))
}

fn guide_index() -> SearchIndex {
    let partition = SearchPartition::parse(
        "all_0.js",
        "var searchData=\n[\n  ['unlisted_0',['unlisted',['external.html',1,'']]],\n  ['usage_1',['usage',['usage.html',1,'guide']]]\n];\n",
    )
    .unwrap();
    SearchIndex::from_partitions(vec![partition], SearchOptions::default())
}

#[test]
fn test_rows_follow_tree_structure() {
    let app = guide_state();

    assert_eq!(app.mode, NavMode::Tree);
    assert_eq!(app.message, None);
    let labels: Vec<&str> = app.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Guide", "Install", "Linux", "Windows", "Usage", "API"]);

    let depths: Vec<usize> = app.rows.iter().map(|r| r.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 2, 1, 1]);
    assert_eq!(app.rows[0].children_indices, vec![1, 4, 5]);
    assert_eq!(app.rows[1].children_indices, vec![2, 3]);
    assert_eq!(app.rows[3].parent_index, Some(1));
    assert_eq!(app.rows[0].parent_index, None);
    assert!(app.rows[5].deferred);
    assert!(!app.rows[4].deferred);
}

#[test]
fn test_structural_navigation() {
    let mut app = guide_state();

    assert_eq!(app.find_prev_row(), None);
    assert_eq!(app.navigate_to_first_child(), Some(1));

    app.current_row_index = 1;
    assert_eq!(app.navigate_to_next_sibling(), Some(4));
    assert_eq!(app.navigate_to_prev_sibling(), None);
    assert_eq!(app.navigate_to_parent(), Some(0));

    app.current_row_index = 4;
    assert_eq!(app.navigate_to_next_sibling(), Some(5));
    assert_eq!(app.navigate_to_prev_sibling(), Some(1));

    app.current_row_index = 3;
    // Stop at the parent's level rather than jumping to Usage
    assert_eq!(app.navigate_to_next_sibling(), None);
    assert_eq!(app.navigate_to_prev_sibling(), Some(2));
    assert_eq!(app.navigate_to_parent(), Some(1));
    assert_eq!(app.navigate_to_first_at_level(), Some(2));
    assert_eq!(app.navigate_to_last_at_level(), Some(3));
    assert_eq!(app.navigate_to_first(), Some(0));
    assert_eq!(app.navigate_to_last(), Some(5));
    assert_eq!(app.find_next_row(), Some(4));

    app.current_row_index = 5;
    assert_eq!(app.find_next_row(), None);
    assert_eq!(app.navigate_to_first_child(), None);
}

#[test]
fn test_breadcrumb() {
    let mut app = guide_state();
    assert_eq!(app.breadcrumb(), "Guide");

    app.current_row_index = 3;
    assert_eq!(app.breadcrumb(), "Guide > Install > Windows");
}

#[test]
fn test_find_row_by_link() {
    let app = guide_state();

    assert_eq!(app.find_row_by_link("install.html#windows"), Some(3));
    assert_eq!(app.find_row_by_link("install.html"), Some(1));
    assert_eq!(app.find_row_by_link("usage.html#options"), Some(4));
    assert_eq!(app.find_row_by_link("nowhere.html"), None);
}

#[test]
fn test_page_navigation() {
    let mut app = guide_state();

    assert!(!app.go_to_prev_page());
    assert_eq!(app.message.as_deref(), Some("No previous page"));

    assert!(app.go_to_next_page());
    assert_eq!(app.current_row_index, 1);
    assert_eq!(app.message, None);

    assert!(app.go_to_next_page());
    assert_eq!(app.current_row_index, 4);

    assert!(app.go_to_prev_page());
    assert_eq!(app.current_row_index, 1);

    app.current_row_index = 4;
    assert!(!app.go_to_next_page());
    assert_eq!(app.current_row_index, 4);
    assert_eq!(
        app.message.as_deref(),
        Some("reference.html is not in the tree")
    );
}

#[test]
fn test_page_navigation_from_anchor_row() {
    let mut app = guide_state();
    app.current_row_index = 2;

    // Anchors are not page identifiers
    assert_eq!(app.page_neighbours(), Default::default());
    assert!(!app.go_to_next_page());
    assert_eq!(app.message.as_deref(), Some("No next page"));
}

#[test]
fn test_search_selects_linked_row() {
    let mut app = guide_state();
    let index = guide_index();

    app.start_search();
    assert_eq!(app.current_view, View::Search);
    app.query_buffer.push_str("Usage");
    app.run_search(&index);

    assert_eq!(app.current_view, View::Results);
    assert_eq!(app.results.len(), 1);
    assert_eq!(app.current_result().unwrap().scope, "guide");

    app.open_selected_result();
    assert_eq!(app.current_view, View::Tree);
    assert_eq!(app.current_row_index, 4);
    assert_eq!(app.chosen_link, None);
}

#[test]
fn test_search_hit_outside_tree_is_chosen() {
    let mut app = guide_state();
    let index = guide_index();

    app.start_search();
    app.query_buffer.push_str("unlisted");
    app.run_search(&index);
    app.open_selected_result();

    assert_eq!(app.chosen_link.as_deref(), Some("external.html"));
}

#[test]
fn test_search_without_matches() {
    let mut app = guide_state();
    let index = guide_index();

    app.start_search();
    app.query_buffer.push_str("zzz");
    app.run_search(&index);

    assert_eq!(app.current_view, View::Tree);
    assert!(app.results.is_empty());
    assert_eq!(app.message.as_deref(), Some("No matches for 'zzz'"));

    app.start_search();
    assert_eq!(app.message, None);
    app.query_buffer.push('u');
    app.cancel_search();
    assert_eq!(app.current_view, View::Tree);
    assert!(app.query_buffer.is_empty());
}

#[test]
fn test_fallback_mode() {
    let links = vec![
        FlatLink {
            label: "Guide".to_string(),
            link: "index.html".to_string(),
        },
        FlatLink {
            label: "Usage".to_string(),
            link: "usage.html".to_string(),
        },
    ];
    let mut app = AppState::new(Navigation::Fallback(links));

    assert_eq!(app.mode, NavMode::Fallback);
    assert!(app.message.is_some());
    assert!(app.rows.iter().all(|r| r.depth == 0 && r.parent_index.is_none()));

    app.current_row_index = 1;
    assert_eq!(app.navigate_to_parent(), None);
    assert_eq!(app.navigate_to_prev_sibling(), Some(0));
    assert!(!app.go_to_prev_page());
    assert_eq!(app.message.as_deref(), Some("No previous page"));

    app.choose_current();
    assert_eq!(app.chosen_link.as_deref(), Some("usage.html"));
}

#[test]
fn test_empty_fallback() {
    let mut app = AppState::new(Navigation::Fallback(Vec::new()));

    assert_eq!(app.current_row(), None);
    assert_eq!(app.breadcrumb(), "");
    assert_eq!(app.navigate_to_first(), None);
    assert_eq!(app.navigate_to_last(), None);
    app.choose_current();
    assert_eq!(app.chosen_link, None);
}

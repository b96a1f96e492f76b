//! JavaScript format implementation using tree-sitter-javascript.
//!
//! Doxygen writes `navtreedata.js`, deferred subtree scripts and search partitions as plain
//! `var NAME = <literal>;` statements, so a single declarator query covers all of them.

use crate::formats::Format;

/// Tree-sitter queries for `var`/`let`/`const` declarations with an initialiser.
pub struct JavaScriptFormat;

impl Format for JavaScriptFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_javascript::LANGUAGE.into()
    }

    fn declaration_query(&self) -> &str {
        "(variable_declarator name: (identifier) @name value: (_) @value)"
    }
}

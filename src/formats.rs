//! Format trait and implementations for the script dialects the generator emits.
//!
//! The generated site stores its data as script files. A `Format` supplies the tree-sitter
//! grammar for the dialect and the query that picks out top-level data declarations, so the
//! literal extraction in [`crate::script`] stays independent of any particular grammar.

pub mod javascript;

/// Grammar and queries for one script dialect.
pub trait Format {
    /// Grammar used to parse the script.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing each declaration as `@name` and its initialiser as `@value`.
    fn declaration_query(&self) -> &str;
}

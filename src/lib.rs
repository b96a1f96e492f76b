//! doxnav: navigation trees and search indexes for generated documentation sites.
//!
//! A generated site ships two pieces of client-side data: `navtreedata.js`, the table of
//! contents plus a linear page order, and `search/*.js`, an alphabetically partitioned symbol
//! index. This crate loads both, validates the tree, walks it, answers prev/next queries and
//! searches the index, and can write either artifact back out in the generator's layout.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod error;
pub mod formats;
pub mod input;
pub mod navigation;
pub mod row;
pub mod script;
pub mod search;
pub mod ui;

pub use error::{DoxnavError, Result};
pub use navigation::{NavTree, PageNeighbours};
pub use search::{SearchHit, SearchIndex};

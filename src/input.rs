//! Locating a generated site's artifacts and loading them for rendering.
//!
//! Navigation failures are fatal for the tree but not for the caller: [`Site::navigation`]
//! degrades to the flat fallback link list so a renderer always has something to show.

use crate::config::Config;
use crate::error::Result;
use crate::navigation::{fallback_links, FlatLink, NavTree};
use crate::search::{SearchIndex, SearchOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// Navigation as available to a renderer.
pub enum Navigation {
    /// The validated tree.
    Tree(NavTree),
    /// Unstyled links recovered from a descriptor that failed validation.
    Fallback(Vec<FlatLink>),
}

/// Paths of one generated documentation site.
pub struct Site {
    nav_path: PathBuf,
    search_dir: PathBuf,
}

impl Site {
    #[must_use]
    /// Resolves artifact locations under `root` using configured relative paths.
    pub fn new(root: &Path, cfg: &Config) -> Self {
        Self {
            nav_path: root.join(&cfg.nav_file),
            search_dir: root.join(&cfg.search_dir),
        }
    }

    /// Loads and validates the navigation tree, resolving deferred subtrees next to it.
    ///
    /// # Errors
    ///
    /// Returns the loader's error when the descriptor is missing, unparseable or malformed.
    pub fn load_navigation(&self) -> Result<NavTree> {
        let mut tree = NavTree::load(&self.nav_path)?;
        if let Some(dir) = self.nav_path.parent() {
            let resolved = tree.resolve_deferred(dir);
            log::debug!("resolved {resolved} deferred navigation subtrees");
        }
        Ok(tree)
    }

    #[must_use]
    /// Loads the tree, or the fallback link list when the tree cannot be loaded.
    pub fn navigation(&self) -> Navigation {
        match self.load_navigation() {
            Ok(tree) => Navigation::Tree(tree),
            Err(e) => {
                log::error!("navigation unavailable, falling back to plain links: {e}");
                let links = fs::read_to_string(&self.nav_path)
                    .map(|source| fallback_links(&source))
                    .unwrap_or_default();
                Navigation::Fallback(links)
            }
        }
    }

    #[must_use]
    /// Opens the search index.
    pub fn open_search(&self, options: SearchOptions) -> SearchIndex {
        SearchIndex::open(&self.search_dir, options)
    }
}

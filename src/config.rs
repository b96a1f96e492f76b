//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a doxnav.toml, and if present we load settings from there.
//! This provides artifact locations within a generated site and search preferences.

use crate::search::SearchOptions;
use facet::Facet;
use std::fs;

const CONFIG_FILE: &str = "doxnav.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from doxnav.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "navtreedata.js".to_string())]
    /// Navigation descriptor path, relative to the site directory.
    pub nav_file: String,
    #[facet(default = "search".to_string())]
    /// Search partition directory, relative to the site directory.
    pub search_dir: String,
    #[facet(default = true)]
    /// Load search partitions on first use rather than up front.
    pub lazy_partitions: bool,
    #[facet(default = 0)]
    /// Maximum search hits per query; 0 means unlimited.
    pub max_results: usize,
    #[facet(default = Vec::new())]
    /// Search sections to consult (`all`, `classes`, ...); empty means every section.
    pub sections: Vec<String>,
}

impl Config {
    #[must_use]
    /// Load configuration from doxnav.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        if let Ok(contents) = fs::read_to_string(CONFIG_FILE) {
            match facet_toml::from_str::<Self>(&contents) {
                Ok(config) => return config,
                Err(e) => log::warn!("ignoring {CONFIG_FILE}: {e}"),
            }
        }
        facet_toml::from_str::<Self>("").unwrap()
    }

    #[must_use]
    /// Search options derived from these preferences.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            lazy: self.lazy_partitions,
            max_results: self.max_results,
            sections: self.sections.clone(),
        }
    }
}

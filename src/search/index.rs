//! The search index: partition discovery, lazy loading and ranked lookup.
//!
//! Partitions are found through the catalog when `searchdata.js` is present, otherwise by
//! scanning the search directory for `<stem>_<hex>.js` files. Each partition sits behind its own
//! `OnceLock`, so it is read at most once no matter how many threads query the index, and a
//! partition that fails to load simply contributes nothing.

use super::catalog::Catalog;
use super::key::normalize_query;
use super::partition::{SearchEntry, SearchPartition};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const CATALOG_FILE: &str = "searchdata.js";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Tunables for loading and querying.
pub struct SearchOptions {
    /// Load only the partitions a query can match, on first use.
    pub lazy: bool,
    /// Maximum hits returned per query; 0 means unlimited.
    pub max_results: usize,
    /// Section stems to search (`all`, `classes`, ...); empty means every section.
    pub sections: Vec<String>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            lazy: true,
            max_results: 0,
            sections: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
/// One documentation target for a query.
pub struct SearchHit {
    /// Display name.
    pub name: String,
    /// Documentation URL.
    pub link: String,
    /// Owning scope, empty for globals.
    pub scope: String,
}

struct Slot {
    file: String,
    section: String,
    initial: Option<char>,
    path: Option<PathBuf>,
    cell: OnceLock<Option<SearchPartition>>,
}

impl Slot {
    fn covers(&self, first: char) -> bool {
        self.initial
            .is_none_or(|initial| initial.to_lowercase().eq(first.to_lowercase()))
    }

    fn partition(&self) -> Option<&SearchPartition> {
        self.cell
            .get_or_init(|| {
                let path = self.path.as_ref()?;
                match SearchPartition::load(path) {
                    Ok(partition) => Some(partition),
                    Err(e) => {
                        log::warn!("{e}");
                        None
                    }
                }
            })
            .as_ref()
    }
}

/// A partitioned, read-only symbol index.
pub struct SearchIndex {
    slots: Vec<Slot>,
    options: SearchOptions,
}

impl SearchIndex {
    #[must_use]
    /// Opens the index stored in `dir`.
    ///
    /// A missing directory or an unreadable catalog never fails: the index is simply empty or
    /// falls back to scanning the directory.
    pub fn open(dir: &Path, options: SearchOptions) -> Self {
        let catalog_path = dir.join(CATALOG_FILE);
        let mut slots = if catalog_path.is_file() {
            match Catalog::load(&catalog_path) {
                Ok(catalog) => slots_from_catalog(dir, &catalog),
                Err(e) => {
                    log::warn!("ignoring search catalog {}: {e}", catalog_path.display());
                    discover_slots(dir)
                }
            }
        } else {
            discover_slots(dir)
        };

        if !options.sections.is_empty() {
            slots.retain(|slot| options.sections.contains(&slot.section));
        }
        log::debug!(
            "search index at {} has {} partitions",
            dir.display(),
            slots.len()
        );

        let index = Self { slots, options };
        if !index.options.lazy {
            for slot in &index.slots {
                let _ = slot.partition();
            }
        }
        index
    }

    #[must_use]
    /// Builds an index over partitions already in memory, searched in the given order.
    pub fn from_partitions(partitions: Vec<SearchPartition>, options: SearchOptions) -> Self {
        let slots = partitions
            .into_iter()
            .map(|partition| Slot {
                file: partition.name().to_string(),
                section: section_of(partition.name()).unwrap_or_default().to_string(),
                initial: None,
                path: None,
                cell: OnceLock::from(Some(partition)),
            })
            .collect();
        Self { slots, options }
    }

    #[must_use]
    /// Looks up a query: exact matches first, then prefix matches, each in partition and file
    /// order, with duplicate hits removed.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let key = normalize_query(query);
        let Some(first) = key.chars().next() else {
            return Vec::new();
        };

        let mut exact: Vec<&SearchEntry> = Vec::new();
        let mut prefix: Vec<&SearchEntry> = Vec::new();
        for slot in self.slots.iter().filter(|slot| slot.covers(first)) {
            let Some(partition) = slot.partition() else {
                continue;
            };
            exact.extend(partition.exact_matches(&key));
            prefix.extend(partition.prefix_matches(&key));
        }

        let limit = match self.options.max_results {
            0 => usize::MAX,
            n => n,
        };
        let mut seen = HashSet::new();
        exact
            .into_iter()
            .chain(prefix)
            .flat_map(|entry| {
                entry.records.iter().map(move |record| SearchHit {
                    name: entry.name.clone(),
                    link: record.link.clone(),
                    scope: record.scope.clone().unwrap_or_default(),
                })
            })
            .filter(|hit| seen.insert(hit.clone()))
            .take(limit)
            .collect()
    }

    #[must_use]
    /// File names of the known partitions, in search order.
    pub fn partition_files(&self) -> Vec<&str> {
        self.slots.iter().map(|slot| slot.file.as_str()).collect()
    }

    #[must_use]
    /// Number of partitions loaded successfully so far.
    pub fn loaded_partitions(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.cell.get(), Some(Some(_))))
            .count()
    }
}

fn slots_from_catalog(dir: &Path, catalog: &Catalog) -> Vec<Slot> {
    catalog
        .sections()
        .iter()
        .flat_map(|section| {
            section.partitions().map(move |(initial, file)| Slot {
                path: Some(dir.join(&file)),
                file,
                section: section.name.clone(),
                initial: Some(initial),
                cell: OnceLock::new(),
            })
        })
        .collect()
}

fn discover_slots(dir: &Path) -> Vec<Slot> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("search directory {} unavailable: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut found: Vec<(String, u32, String)> = entries
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| {
            let file = entry.file_name().to_str()?.to_string();
            let (section, ordinal) = partition_parts(&file)?;
            Some((section.to_string(), ordinal, file))
        })
        .collect();
    found.sort();

    found
        .into_iter()
        .map(|(section, _, file)| Slot {
            path: Some(dir.join(&file)),
            file,
            section,
            initial: None,
            cell: OnceLock::new(),
        })
        .collect()
}

/// Splits `classes_c.js` into `("classes", 12)`.
fn partition_parts(file: &str) -> Option<(&str, u32)> {
    let stem = file.strip_suffix(".js")?;
    let (section, hex) = stem.rsplit_once('_')?;
    if section.is_empty() || hex.is_empty() {
        return None;
    }
    let ordinal = u32::from_str_radix(hex, 16).ok()?;
    Some((section, ordinal))
}

fn section_of(file: &str) -> Option<&str> {
    partition_parts(file).map(|(section, _)| section)
}

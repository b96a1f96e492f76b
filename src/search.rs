//! Search over the generator's partitioned symbol index.
//!
//! This module provides:
//! - Key encoding and query normalisation
//! - Partition files (`search/classes_c.js`) and the catalog that lists them
//! - The `SearchIndex` that loads partitions on demand and ranks matches

mod catalog;
mod index;
mod key;
mod partition;

pub use catalog::{Catalog, CatalogSection};
pub use index::{SearchHit, SearchIndex, SearchOptions};
pub use key::{encode, normalize_query, strip_ordinal};
pub use partition::{SearchEntry, SearchPartition, SearchRecord};

#[cfg(test)]
#[path = "tests/search.rs"]
mod tests;

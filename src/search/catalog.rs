//! The search catalog, `search/searchdata.js`.
//!
//! It lists, per numbered section, the initial characters that have a partition
//! (`indexSectionsWithContent`), the section's file stem (`indexSectionNames`) and its display
//! label (`indexSectionLabels`). The partition for the character at position `i` of a section's
//! character set is `<stem>_<i in hex>.js`.

use crate::error::{DoxnavError, Result};
use crate::script::{Literal, Script};
use std::path::Path;

const CONTENT_VAR: &str = "indexSectionsWithContent";
const NAMES_VAR: &str = "indexSectionNames";
const LABELS_VAR: &str = "indexSectionLabels";

#[derive(Clone, Debug, PartialEq, Eq)]
/// One search section such as `all` or `classes`.
pub struct CatalogSection {
    /// File stem, e.g. `classes`.
    pub name: String,
    /// Display label, e.g. `Classes`.
    pub label: Option<String>,
    /// Initial characters with a partition, in partition order.
    pub initials: Vec<char>,
}

impl CatalogSection {
    /// Partition file names paired with the initial character each one covers.
    pub fn partitions(&self) -> impl Iterator<Item = (char, String)> + '_ {
        self.initials
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, format!("{}_{i:x}.js", self.name)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// All sections of a search index.
pub struct Catalog {
    sections: Vec<CatalogSection>,
}

impl Catalog {
    /// Parses `searchdata.js` source.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::Script`] for unparseable source and [`DoxnavError::PartitionLoad`]
    /// when the section tables are missing or inconsistent.
    pub fn parse(source: &str) -> Result<Self> {
        let script = Script::parse(source)?;
        let content = table(&script, CONTENT_VAR)?;
        let names = table(&script, NAMES_VAR)?;
        let labels = table(&script, LABELS_VAR).unwrap_or_default();

        let mut sections = Vec::with_capacity(content.len());
        for (id, initials) in content {
            let name = names
                .iter()
                .find(|(other, _)| *other == id)
                .map(|(_, name)| name.clone())
                .ok_or_else(|| {
                    DoxnavError::partition("searchdata.js", format!("section {id} has no name"))
                })?;
            let label = labels
                .iter()
                .find(|(other, _)| *other == id)
                .map(|(_, label)| label.clone());
            sections.push(CatalogSection {
                name,
                label,
                initials: initials.chars().collect(),
            });
        }
        Ok(Self { sections })
    }

    /// Reads `searchdata.js`.
    ///
    /// # Errors
    ///
    /// As [`Catalog::parse`], plus IO failures.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    #[must_use]
    /// Sections in declaration order.
    pub fn sections(&self) -> &[CatalogSection] {
        &self.sections
    }

    #[must_use]
    /// Looks up a section by file stem.
    pub fn section(&self, name: &str) -> Option<&CatalogSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

fn table(script: &Script, var: &str) -> Result<Vec<(String, String)>> {
    let Some(Literal::Object(fields)) = script.get(var) else {
        return Err(DoxnavError::partition(
            "searchdata.js",
            format!("{var} missing or not an object"),
        ));
    };
    fields
        .iter()
        .map(|(key, value)| {
            value
                .as_str()
                .map(|v| (key.clone(), v.to_string()))
                .ok_or_else(|| {
                    DoxnavError::partition(
                        "searchdata.js",
                        format!("{var}[{key}] must be a string, found {}", value.kind()),
                    )
                })
        })
        .collect()
}

//! One alphabetic shard of the search index.
//!
//! A partition file declares `searchData`, an array of
//! `[key, [display name, [link, frame flag, scope], ...]]` entries. Several records under one key
//! are overloads or same-named members of different scopes.

use super::key::strip_ordinal;
use crate::error::{DoxnavError, Result};
use crate::script::{quote, Literal, Script};
use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;

const DATA_VAR: &str = "searchData";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where one symbol is documented.
pub struct SearchRecord {
    /// Documentation URL, absolute for external tag files.
    pub link: String,
    /// Frame-target flag written by the generator: set means open in the parent frame.
    pub parent_frame: bool,
    /// Owning scope such as `std` or `ctype::mask`; `None` when the generator omitted it.
    pub scope: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A stored key with its display name and records.
pub struct SearchEntry {
    /// Encoded key including its ordinal, e.g. `mutex_34`.
    pub key: String,
    /// Name as displayed in results, HTML entities left intact.
    pub name: String,
    /// One or more documentation targets.
    pub records: Vec<SearchRecord>,
}

impl SearchEntry {
    #[must_use]
    /// Key without its ordinal suffix, the part queries are compared against.
    pub fn stem(&self) -> &str {
        strip_ordinal(&self.key)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Entries of one partition file, in file order.
pub struct SearchPartition {
    name: String,
    entries: Vec<SearchEntry>,
}

impl SearchPartition {
    /// Builds a partition, rejecting repeated keys.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::PartitionLoad`] if two entries share a key.
    pub fn new(name: impl Into<String>, entries: Vec<SearchEntry>) -> Result<Self> {
        let name = name.into();
        let mut keys = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !keys.insert(entry.key.as_str()) {
                return Err(DoxnavError::partition(
                    name,
                    format!("duplicate key {:?}", entry.key),
                ));
            }
        }
        Ok(Self { name, entries })
    }

    /// Parses partition source; `name` labels errors and usually is the file name.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::PartitionLoad`] for unparseable source or malformed entries.
    pub fn parse(name: &str, source: &str) -> Result<Self> {
        let script = Script::parse(source).map_err(|e| DoxnavError::partition(name, e))?;
        let data = script
            .get(DATA_VAR)
            .ok_or_else(|| DoxnavError::partition(name, format!("no {DATA_VAR} declaration")))?;
        let items = data.as_array().ok_or_else(|| {
            DoxnavError::partition(
                name,
                format!("{DATA_VAR} is {}, expected an array", data.kind()),
            )
        })?;
        let entries = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                entry_from_literal(item).map_err(|reason| {
                    DoxnavError::partition(name, format!("{DATA_VAR}[{i}]: {reason}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, entries)
    }

    /// Reads a partition file.
    ///
    /// # Errors
    ///
    /// Returns [`DoxnavError::PartitionLoad`] if the file is missing, unreadable or malformed.
    pub fn load(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let source =
            std::fs::read_to_string(path).map_err(|e| DoxnavError::partition(&name, e))?;
        let partition = Self::parse(&name, &source)?;
        log::debug!("loaded {} search entries from {name}", partition.len());
        Ok(partition)
    }

    #[must_use]
    /// Partition label, normally its file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    /// Entries in file order.
    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    #[must_use]
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    /// Whether the partition has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose stem equals the normalised query, in file order.
    pub fn exact_matches<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a SearchEntry> {
        self.entries.iter().filter(move |e| e.stem() == query)
    }

    /// Entries whose stem extends the normalised query, in file order.
    pub fn prefix_matches<'a>(&'a self, query: &'a str) -> impl Iterator<Item = &'a SearchEntry> {
        self.entries
            .iter()
            .filter(move |e| e.stem().len() > query.len() && e.stem().starts_with(query))
    }

    #[must_use]
    /// Serialises the partition in the generator's layout.
    pub fn to_js(&self) -> String {
        let mut out = format!("var {DATA_VAR}=\n[\n");
        let lines: Vec<String> = self.entries.iter().map(write_entry).collect();
        out.push_str(&lines.join(",\n"));
        if !lines.is_empty() {
            out.push('\n');
        }
        out.push_str("];\n");
        out
    }
}

fn entry_from_literal(value: &Literal) -> std::result::Result<SearchEntry, String> {
    let [key, body] = value
        .as_array()
        .ok_or_else(|| format!("expected [key, [name, records...]], found {}", value.kind()))?
    else {
        return Err("expected exactly [key, [name, records...]]".to_string());
    };
    let key = key
        .as_str()
        .filter(|k| !k.is_empty())
        .ok_or("key must be a non-empty string")?;
    let body = body.as_array().ok_or("entry body must be an array")?;
    let (name, records) = body.split_first().ok_or("entry body is empty")?;
    let name = name.as_str().ok_or("display name must be a string")?;
    if records.is_empty() {
        return Err(format!("entry {key:?} has no records"));
    }
    let records = records
        .iter()
        .map(record_from_literal)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(SearchEntry {
        key: key.to_string(),
        name: name.to_string(),
        records,
    })
}

fn record_from_literal(value: &Literal) -> std::result::Result<SearchRecord, String> {
    let fields = value.as_array().ok_or("record must be an array")?;
    let (link, parent_frame, scope) = match fields {
        [link, flag] => (link, flag, None),
        [link, flag, scope] => (
            link,
            flag,
            Some(scope.as_str().ok_or("scope must be a string")?),
        ),
        _ => return Err(format!("record has {} fields, expected 2 or 3", fields.len())),
    };
    let link = link.as_str().ok_or("link must be a string")?;
    let parent_frame = match parent_frame {
        Literal::Number(n) => n.abs() > f64::EPSILON,
        Literal::Bool(b) => *b,
        other => return Err(format!("frame flag must be a number, found {}", other.kind())),
    };
    Ok(SearchRecord {
        link: link.to_string(),
        parent_frame,
        scope: scope.map(str::to_string),
    })
}

fn write_entry(entry: &SearchEntry) -> String {
    let mut out = format!(
        "  [{},[{}",
        quote(&entry.key, '\''),
        quote(&entry.name, '\'')
    );
    for record in &entry.records {
        let _ = write!(
            out,
            ",[{},{}",
            quote(&record.link, '\''),
            u8::from(record.parent_frame)
        );
        if let Some(scope) = &record.scope {
            let _ = write!(out, ",{}", quote(scope, '\''));
        }
        out.push(']');
    }
    out.push_str("]]");
    out
}

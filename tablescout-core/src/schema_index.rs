use std::fmt;

use async_trait::async_trait;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::IndexError;

/// One ranked hit from a hybrid schema search.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TableHit {
    pub table_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Backend-defined; only the ordering of hits is meaningful.
    pub relevance_score: f32,
}

/// An outgoing reference edge from an indexed table.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableNeighbor {
    pub related_table: String,
    pub relationship_type: String,
    pub join_condition: String,
}

/// Table name to DDL mapping that keeps first-insertion order.
///
/// Inserting an existing key replaces its DDL in place, so duplicate table
/// names collapse to one entry positioned where the name first appeared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DdlLookup {
    entries: Vec<(String, String)>,
}

impl DdlLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, ddl: impl Into<String>) {
        let name = name.into();
        let ddl = ddl.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = ddl,
            None => self.entries.push((name, ddl)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, ddl)| ddl.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, ddl)| (name.as_str(), ddl.as_str()))
    }
}

impl IntoIterator for DdlLookup {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for DdlLookup {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut lookup = DdlLookup::new();
        for (name, ddl) in iter {
            lookup.insert(name, ddl);
        }
        lookup
    }
}

impl Serialize for DdlLookup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, ddl) in &self.entries {
            map.serialize_entry(name, ddl)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DdlLookup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DdlLookupVisitor;

        impl<'de> Visitor<'de> for DdlLookupVisitor {
            type Value = DdlLookup;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of table name to DDL text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DdlLookup, A::Error> {
                let mut lookup = DdlLookup::new();
                while let Some((name, ddl)) = access.next_entry::<String, String>()? {
                    lookup.insert(name, ddl);
                }
                Ok(lookup)
            }
        }

        deserializer.deserialize_map(DdlLookupVisitor)
    }
}

/// Read access to the semantic schema index.
#[async_trait]
pub trait SchemaIndex: Send + Sync {
    /// Hybrid lexical + semantic search, highest relevance first.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<TableHit>, IndexError>;

    /// DDL for the named tables. Tables missing from the index are omitted.
    async fn table_ddl(&self, table_names: &[String], minimal: bool)
        -> Result<DdlLookup, IndexError>;

    /// Outgoing reference edges of a table; empty when the table is unknown.
    async fn neighbors(&self, table_name: &str) -> Result<Vec<TableNeighbor>, IndexError>;
}

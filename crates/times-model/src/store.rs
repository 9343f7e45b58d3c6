use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::raw::RawTable;
use crate::table::Table;

/// Name-keyed collection of tables, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStore {
    tables: BTreeMap<String, Table>,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a table, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) -> Option<Table> {
        self.tables.insert(name.into(), table)
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Table> {
        self.tables.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Table> {
        self.tables.iter()
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of rows across all tables.
    pub fn row_count(&self) -> usize {
        self.tables.values().map(Table::height).sum()
    }
}

impl FromIterator<(String, Table)> for TableStore {
    fn from_iter<I: IntoIterator<Item = (String, Table)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for TableStore {
    type Item = (String, Table);
    type IntoIter = btree_map::IntoIter<String, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

impl<'a> IntoIterator for &'a TableStore {
    type Item = (&'a String, &'a Table);
    type IntoIter = btree_map::Iter<'a, String, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}

/// Tables as they travel between pipeline stages.
///
/// Extraction produces `Raw` tables; merging turns them into a `Store`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineTables {
    Raw(Vec<RawTable>),
    Store(TableStore),
}

impl PipelineTables {
    /// Short label for the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Raw(_) => "raw tables",
            Self::Store(_) => "table store",
        }
    }

    pub fn table_count(&self) -> usize {
        match self {
            Self::Raw(tables) => tables.len(),
            Self::Store(store) => store.len(),
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            Self::Raw(tables) => tables.iter().map(|t| t.table.height()).sum(),
            Self::Store(store) => store.row_count(),
        }
    }
}

impl From<Vec<RawTable>> for PipelineTables {
    fn from(tables: Vec<RawTable>) -> Self {
        Self::Raw(tables)
    }
}

impl From<TableStore> for PipelineTables {
    fn from(store: TableStore) -> Self {
        Self::Store(store)
    }
}

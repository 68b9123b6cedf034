use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::table::{ColumnDef, TableSchema, ID_COLUMN};
use crate::error::{DbError, Result};

/// The schema store: table name to column list, in creation order.
///
/// Persists as the schema document, e.g.
/// `{"users": ["ID:int", "name:str", "active:bool"]}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: IndexMap<String, TableSchema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table from `name:type` column specs. `ID:int` is prepended.
    pub fn create_table<S: AsRef<str>>(mut self, name: &str, column_specs: &[S]) -> Result<Self> {
        if self.tables.contains_key(name) {
            return Err(DbError::DuplicateTable(name.to_string()));
        }
        validate_table_name(name)?;

        let mut columns: Vec<ColumnDef> = Vec::with_capacity(column_specs.len());
        for spec in column_specs {
            let column: ColumnDef = spec.as_ref().parse()?;
            if column.name == ID_COLUMN || columns.iter().any(|c| c.name == column.name) {
                return Err(DbError::DuplicateColumn(column.name));
            }
            columns.push(column);
        }

        self.tables.insert(name.to_string(), TableSchema::with_id(columns));
        Ok(self)
    }

    pub fn drop_table(mut self, name: &str) -> Result<Self> {
        self.tables
            .shift_remove(name)
            .ok_or_else(|| DbError::UnknownTable(name.to_string()))?;
        Ok(self)
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn require(&self, name: &str) -> Result<&TableSchema> {
        self.get(name)
            .ok_or_else(|| DbError::UnknownTable(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// Table names double as data file names.
fn validate_table_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidName(name.to_string()))
    }
}

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::catalog::Catalog;
use super::table::Row;
use crate::error::{DbError, Result};

pub const DEFAULT_META_FILE: &str = "db_meta.json";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Where the schema document and per-table data documents live.
///
/// Every call reads or writes a whole document.
pub trait Store {
    fn load_catalog(&self) -> Result<Catalog>;
    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()>;
    fn load_rows(&self, table: &str) -> Result<Vec<Row>>;
    fn save_rows(&mut self, table: &str, rows: &[Row]) -> Result<()>;
    fn remove_rows(&mut self, table: &str) -> Result<()>;
}

/// JSON files on disk: `<root>/<meta_file>` and `<root>/<data_dir>/<table>.json`.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
    meta_path: PathBuf,
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            meta_path: root.join(DEFAULT_META_FILE),
            data_dir: root.join(DEFAULT_DATA_DIR),
            root,
        }
    }

    pub fn with_meta_file(mut self, name: impl AsRef<Path>) -> Self {
        self.meta_path = self.root.join(name);
        self
    }

    pub fn with_data_dir(mut self, name: impl AsRef<Path>) -> Self {
        self.data_dir = self.root.join(name);
        self
    }

    pub fn meta_path(&self) -> &Path {
        &self.meta_path
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", table))
    }
}

impl Store for JsonStore {
    fn load_catalog(&self) -> Result<Catalog> {
        read_document(&self.meta_path)
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        write_document(&self.meta_path, catalog)
    }

    fn load_rows(&self, table: &str) -> Result<Vec<Row>> {
        read_document(&self.table_path(table))
    }

    fn save_rows(&mut self, table: &str, rows: &[Row]) -> Result<()> {
        write_document(&self.table_path(table), &rows)
    }

    fn remove_rows(&mut self, table: &str) -> Result<()> {
        let path = self.table_path(table);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("removed {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DbError::persistence(path, e)),
        }
    }
}

/// Reads a JSON document, falling back to the empty value if the file is missing.
fn read_document<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} not found, starting empty", path.display());
            return Ok(T::default());
        }
        Err(e) => return Err(DbError::persistence(path, e)),
    };

    serde_json::from_str(&contents).map_err(|e| {
        warn!("{} is not a valid document: {}", path.display(), e);
        DbError::persistence(path, e)
    })
}

/// Overwrites the whole document, pretty-printed with a four-space indent.
fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| DbError::persistence(parent, e))?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| DbError::persistence(path, e))?;

    fs::write(path, buf).map_err(|e| DbError::persistence(path, e))?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// Keeps documents in memory. Useful for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: Catalog,
    tables: HashMap<String, Vec<Row>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a data document exists for `table`.
    pub fn has_rows(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }
}

impl Store for MemoryStore {
    fn load_catalog(&self) -> Result<Catalog> {
        Ok(self.catalog.clone())
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> Result<()> {
        self.catalog = catalog.clone();
        Ok(())
    }

    fn load_rows(&self, table: &str) -> Result<Vec<Row>> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }

    fn save_rows(&mut self, table: &str, rows: &[Row]) -> Result<()> {
        self.tables.insert(table.to_string(), rows.to_vec());
        Ok(())
    }

    fn remove_rows(&mut self, table: &str) -> Result<()> {
        self.tables.remove(table);
        Ok(())
    }
}

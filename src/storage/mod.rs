pub mod catalog;
pub mod store;
pub mod table;

pub use catalog::Catalog;
pub use store::{JsonStore, MemoryStore, Store};
pub use table::{ColumnDef, DataType, Row, TableInfo, TableSchema, Value, ID_COLUMN};

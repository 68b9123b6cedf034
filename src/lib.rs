pub mod cli;
pub mod command;
pub mod engine;
pub mod error;
pub mod format;
pub mod storage;
pub mod timer;

pub use command::{Command, Interpreter, Response, Settings};
pub use error::{DbError, Result};
pub use storage::{Catalog, ColumnDef, DataType, JsonStore, MemoryStore, Row, Store, Value};

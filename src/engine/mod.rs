pub mod crud;
pub mod filter;

pub use crud::{delete, insert, next_id, select, table_info, update};
pub use filter::{Assignment, Filter};

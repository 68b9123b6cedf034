use crate::engine::filter::{Assignment, Filter};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateTable {
        table: String,
        columns: Vec<String>,
    },
    DropTable {
        table: String,
    },
    ListTables,
    Insert {
        table: String,
        /// Raw values; cast to the column types by the engine.
        values: Vec<String>,
    },
    Select {
        table: String,
        filter: Option<Filter>,
    },
    Update {
        table: String,
        set: Vec<Assignment>,
        filter: Filter,
    },
    Delete {
        table: String,
        filter: Filter,
    },
    Info {
        table: String,
    },
    Help,
    Exit,
}

impl Command {
    /// The keyword that introduces this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateTable { .. } => "create_table",
            Command::DropTable { .. } => "drop_table",
            Command::ListTables => "list_tables",
            Command::Insert { .. } => "insert",
            Command::Select { .. } => "select",
            Command::Update { .. } => "update",
            Command::Delete { .. } => "delete",
            Command::Info { .. } => "info",
            Command::Help => "help",
            Command::Exit => "exit",
        }
    }
}

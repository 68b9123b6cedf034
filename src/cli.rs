use clap::Parser;
use std::path::PathBuf;

use crate::command::Settings;
use crate::format::OutputFormat;
use crate::storage::store::{JsonStore, DEFAULT_DATA_DIR, DEFAULT_META_FILE};

#[derive(Parser, Debug)]
#[command(name = "primitive-db")]
#[command(author, version, about = "A toy tabular data store with JSON persistence")]
pub struct Cli {
    /// Directory holding the schema document and the table data
    #[arg(long, default_value = ".")]
    pub db_dir: PathBuf,

    /// File name of the schema document inside the database directory
    #[arg(long, default_value = DEFAULT_META_FILE)]
    pub meta_file: PathBuf,

    /// Sub-directory of the database directory holding one JSON file per table
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Execute a single command and exit (non-interactive mode)
    #[arg(short, long)]
    pub command: Option<String>,

    /// Output format for select results
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Do not ask for confirmation before dropping tables or deleting records
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Print how long each command took
    #[arg(long)]
    pub timing: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn store(&self) -> JsonStore {
        JsonStore::new(&self.db_dir)
            .with_meta_file(&self.meta_file)
            .with_data_dir(&self.data_dir)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            format: self.format,
            timing: self.timing,
            assume_yes: self.yes,
        }
    }
}

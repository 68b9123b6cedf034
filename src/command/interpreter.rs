//! Dispatches parsed commands to the catalog and the CRUD engine, and runs
//! the interactive read-eval-print loop.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use super::ast::Command;
use super::parser::parse_command;
use crate::engine::{crud, Filter};
use crate::error::Result;
use crate::format::{self, OutputFormat};
use crate::storage::catalog::Catalog;
use crate::storage::store::Store;
use crate::storage::table::{Row, TableInfo, TableSchema};
use crate::timer::{format_duration, Timer};

const SLOW_COMMAND: Duration = Duration::from_secs(1);

/// Asks the user before a destructive operation goes ahead.
pub trait Confirm {
    fn confirm(&mut self, action: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, action: &str) -> bool {
        self(action)
    }
}

/// Confirms everything. Used for `--yes`.
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _action: &str) -> bool {
        true
    }
}

/// Prompts with `[y/n]` on the session's own input and output.
pub struct PromptConfirm<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<'a, R: BufRead, W: Write> PromptConfirm<'a, R, W> {
    pub fn new(input: &'a mut R, output: &'a mut W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, action: &str) -> io::Result<bool> {
        write!(self.output, "Are you sure you want to {}? [y/n]: ", action)?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        let answer = answer.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<'_, R, W> {
    fn confirm(&mut self, action: &str) -> bool {
        self.ask(action).unwrap_or_else(|e| {
            warn!("confirmation prompt failed: {}", e);
            false
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub format: OutputFormat,
    /// Report how long each command took.
    pub timing: bool,
    /// Skip confirmation prompts.
    pub assume_yes: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Message(String),
    Tables(Vec<String>),
    Rows { columns: Vec<String>, rows: Vec<Row> },
    Info(TableInfo),
    Help,
    Cancelled,
    Exit,
    Nothing,
}

pub struct Interpreter<S> {
    store: S,
    settings: Settings,
    last_timing: Option<String>,
    /// Time spent waiting on confirmation prompts during the current command
    waiting: Duration,
}

impl<S: Store> Interpreter<S> {
    pub fn new(store: S) -> Self {
        Self::with_settings(store, Settings::default())
    }

    pub fn with_settings(store: S, settings: Settings) -> Self {
        Self {
            store,
            settings,
            last_timing: None,
            waiting: Duration::ZERO,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Parses and executes one line of input.
    pub fn execute_line(&mut self, line: &str, confirm: &mut dyn Confirm) -> Result<Response> {
        let command = match parse_command(line)? {
            Some(command) => command,
            None => return Ok(Response::Nothing),
        };

        let name = command.name();
        debug!("dispatching {}", name);

        self.waiting = Duration::ZERO;
        let mut timer = Timer::new(name).with_slow_threshold(SLOW_COMMAND);
        let result = self.execute(command, confirm);
        timer.exclude(self.waiting);
        timer.log("completed");

        if self.settings.timing {
            let elapsed = format_duration(timer.elapsed());
            self.last_timing = Some(format!("Command {} took {}", name, elapsed));
        }
        result
    }

    /// Timing line for the last command, when `timing` is enabled.
    pub fn take_timing(&mut self) -> Option<String> {
        self.last_timing.take()
    }

    pub fn execute(&mut self, command: Command, confirm: &mut dyn Confirm) -> Result<Response> {
        match command {
            Command::CreateTable { table, columns } => {
                let catalog = self.store.load_catalog()?.create_table(&table, &columns)?;
                self.store.save_catalog(&catalog)?;
                let schema = catalog.require(&table)?;
                Ok(Response::Message(format!(
                    "Table \"{}\" created with columns: {}",
                    table,
                    describe_columns(schema)
                )))
            }
            Command::DropTable { table } => {
                let catalog = self.store.load_catalog()?;
                catalog.require(&table)?;
                if !self.confirmed(confirm, &format!("drop table \"{}\"", table)) {
                    return Ok(Response::Cancelled);
                }

                // Rows go first so a failed removal leaves the table registered.
                self.store.remove_rows(&table)?;
                let catalog = catalog.drop_table(&table)?;
                self.store.save_catalog(&catalog)?;
                Ok(Response::Message(format!("Table \"{}\" dropped.", table)))
            }
            Command::ListTables => Ok(Response::Tables(self.load_catalog().list_tables())),
            Command::Insert { table, values } => {
                let catalog = self.store.load_catalog()?;
                let rows = self.store.load_rows(&table)?;
                let rows = crud::insert(&catalog, &table, &values, &rows)?;
                self.store.save_rows(&table, &rows)?;

                let id = rows.last().and_then(Row::id).unwrap_or_default();
                Ok(Response::Message(format!(
                    "Record with ID={} added to table \"{}\".",
                    id, table
                )))
            }
            Command::Select { table, filter } => {
                let catalog = self.load_catalog();
                let schema = catalog.require(&table)?;
                let rows = crud::select(&self.load_rows(&table), filter.as_ref());
                Ok(Response::Rows {
                    columns: column_order(schema, &rows),
                    rows,
                })
            }
            Command::Update { table, set, filter } => {
                self.store.load_catalog()?.require(&table)?;
                let rows = self.store.load_rows(&table)?;
                let updated = crud::update(&rows, &set, &filter)?;
                self.store.save_rows(&table, &updated)?;

                Ok(Response::Message(format!(
                    "Updated {} in table \"{}\".",
                    records(count_matches(&rows, &filter)),
                    table
                )))
            }
            Command::Delete { table, filter } => {
                self.store.load_catalog()?.require(&table)?;
                let rows = self.store.load_rows(&table)?;
                let remaining = crud::delete(&rows, &filter)?;
                let action = format!("delete records where {} from table \"{}\"", filter, table);
                if !self.confirmed(confirm, &action) {
                    return Ok(Response::Cancelled);
                }
                self.store.save_rows(&table, &remaining)?;

                Ok(Response::Message(format!(
                    "Deleted {} from table \"{}\".",
                    records(rows.len() - remaining.len()),
                    table
                )))
            }
            Command::Info { table } => {
                let catalog = self.load_catalog();
                catalog.require(&table)?;
                let rows = self.load_rows(&table);
                Ok(Response::Info(crud::table_info(&catalog, &table, &rows)?))
            }
            Command::Help => Ok(Response::Help),
            Command::Exit => Ok(Response::Exit),
        }
    }

    pub fn render(&self, response: &Response) -> Option<String> {
        match response {
            Response::Message(msg) => Some(msg.clone()),
            Response::Tables(tables) => Some(format::render_tables(tables)),
            Response::Rows { columns, rows } => {
                Some(format::render_rows(columns, rows, self.settings.format))
            }
            Response::Info(info) => Some(format::render_info(info)),
            Response::Help => Some(format::HELP.to_string()),
            Response::Cancelled => Some("Operation cancelled.".to_string()),
            Response::Exit | Response::Nothing => None,
        }
    }

    fn confirmed(&mut self, confirm: &mut dyn Confirm, action: &str) -> bool {
        if self.settings.assume_yes {
            return true;
        }
        let asked = Instant::now();
        let answer = confirm.confirm(action);
        self.waiting += asked.elapsed();
        answer
    }

    // Read-only commands treat an unreadable document as empty. Mutating
    // commands load through the store directly so they never overwrite it.
    fn load_catalog(&self) -> Catalog {
        self.store.load_catalog().unwrap_or_else(|e| {
            warn!("{}; using an empty schema", e);
            Catalog::new()
        })
    }

    fn load_rows(&self, table: &str) -> Vec<Row> {
        self.store.load_rows(table).unwrap_or_else(|e| {
            warn!("{}; using an empty table", e);
            Vec::new()
        })
    }
}

/// Runs the interactive loop until `exit` or end of input.
pub fn run<S: Store, R: BufRead, W: Write>(
    interpreter: &mut Interpreter<S>,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    writeln!(output, "*** Primitive database ***")?;
    writeln!(output, "Type help for the list of commands.")?;

    loop {
        write!(output, ">>> Enter command: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        let result = {
            let mut confirm = PromptConfirm::new(&mut input, &mut output);
            interpreter.execute_line(&line, &mut confirm)
        };

        match result {
            Ok(Response::Exit) => break,
            Ok(response) => {
                if let Some(text) = interpreter.render(&response) {
                    writeln!(output, "{}", text)?;
                }
            }
            Err(e) => {
                info!("command failed: {}", e);
                writeln!(output, "Error: {}. Try again.", e)?;
            }
        }

        if let Some(timing) = interpreter.take_timing() {
            writeln!(output, "{}", timing)?;
        }
    }

    Ok(())
}

/// Executes a single command line, as for `--command`.
///
/// Confirmation prompts read from `input`. Results and timing go to `output`,
/// errors to `errors`. Returns whether the command succeeded.
pub fn run_once<S: Store, R: BufRead, W: Write, E: Write>(
    interpreter: &mut Interpreter<S>,
    line: &str,
    mut input: R,
    mut output: W,
    mut errors: E,
) -> io::Result<bool> {
    let result = {
        let mut confirm = PromptConfirm::new(&mut input, &mut output);
        interpreter.execute_line(line, &mut confirm)
    };

    let succeeded = match result {
        Ok(response) => {
            if let Some(text) = interpreter.render(&response) {
                writeln!(output, "{}", text)?;
            }
            true
        }
        Err(e) => {
            info!("command failed: {}", e);
            writeln!(errors, "Error: {}", e)?;
            false
        }
    };

    if let Some(timing) = interpreter.take_timing() {
        writeln!(output, "{}", timing)?;
    }

    Ok(succeeded)
}

fn describe_columns(schema: &TableSchema) -> String {
    schema
        .columns
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Schema columns first, then any extra fields rows picked up through updates.
fn column_order(schema: &TableSchema, rows: &[Row]) -> Vec<String> {
    let mut columns: Vec<String> = schema.columns.iter().map(|c| c.name.clone()).collect();
    for row in rows {
        for (name, _) in row.iter() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }
    columns
}

fn count_matches(rows: &[Row], filter: &Filter) -> usize {
    rows.iter().filter(|r| filter.matches(r)).count()
}

fn records(n: usize) -> String {
    if n == 1 {
        "1 record".to_string()
    } else {
        format!("{} records", n)
    }
}

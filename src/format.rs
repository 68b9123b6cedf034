//! Rendering of command results for the terminal.

use crate::storage::table::{Row, TableInfo};

#[derive(Debug, Clone, Copy, Default, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

pub const HELP: &str = "\
*** Working with tables ***
Commands:
  create_table <table> <column:type> ...                  create a table (types: int, str, bool)
  list_tables                                             list all tables
  drop_table <table>                                      drop a table and its data
  info <table>                                            show columns and row count

*** Working with records ***
  insert into <table> values (<v1>, <v2>, ...)            add a record
  select from <table> [where <column>=<value>]            show records
  update <table> set <column>=<value>[, ...] where <column>=<value>
                                                          change matching records
  delete from <table> where <column>=<value>              remove matching records

General:
  help                                                    show this help
  exit                                                    quit";

/// Renders rows with the given column order. Fields missing from a row render empty.
pub fn render_rows(columns: &[String], rows: &[Row], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => render_table(columns, rows),
        OutputFormat::Csv => render_csv(columns, rows),
        OutputFormat::Json => render_json(rows),
    }
}

fn cell(row: &Row, column: &str) -> String {
    row.get(column).map(|v| v.to_string()).unwrap_or_default()
}

fn render_table(columns: &[String], rows: &[Row]) -> String {
    if rows.is_empty() {
        return "(0 rows)".to_string();
    }

    let widths: Vec<usize> = columns
        .iter()
        .map(|col| {
            let max_value_width = rows
                .iter()
                .map(|row| cell(row, col).chars().count())
                .max()
                .unwrap_or(0);
            col.chars().count().max(max_value_width)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 3);

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, &width)| format!("{:width$}", col, width = width))
        .collect();
    lines.push(header.join(" | "));

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    lines.push(sep.join("-+-"));

    for row in rows {
        let values: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(col, &width)| format!("{:width$}", cell(row, col), width = width))
            .collect();
        lines.push(values.join(" | "));
    }

    let noun = if rows.len() == 1 { "row" } else { "rows" };
    lines.push(format!("({} {})", rows.len(), noun));
    lines.join("\n")
}

fn render_csv(columns: &[String], rows: &[Row]) -> String {
    let mut lines = vec![columns.join(",")];

    for row in rows {
        let values: Vec<String> = columns
            .iter()
            .map(|col| {
                let s = cell(row, col);
                if s.contains(',') || s.contains('"') || s.contains('\n') {
                    format!("\"{}\"", s.replace('"', "\"\""))
                } else {
                    s
                }
            })
            .collect();
        lines.push(values.join(","));
    }

    lines.join("\n")
}

fn render_json(rows: &[Row]) -> String {
    serde_json::to_string_pretty(rows).unwrap_or_else(|e| format!("<unprintable rows: {}>", e))
}

pub fn render_tables(tables: &[String]) -> String {
    if tables.is_empty() {
        return "No tables.".to_string();
    }
    tables
        .iter()
        .map(|t| format!("- {}", t))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_info(info: &TableInfo) -> String {
    let columns: Vec<String> = info.columns.iter().map(|c| c.to_string()).collect();
    format!(
        "Table: {}\nColumns: {}\nRow count: {}",
        info.name,
        columns.join(", "),
        info.row_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::table::{ColumnDef, DataType, Value};

    fn columns() -> Vec<String> {
        vec!["ID".to_string(), "name".to_string()]
    }

    fn rows() -> Vec<Row> {
        vec![
            [("ID", Value::Int(1)), ("name", Value::from("Alice"))]
                .into_iter()
                .collect(),
            [("ID", Value::Int(2)), ("name", Value::from("Smith, J"))]
                .into_iter()
                .collect(),
        ]
    }

    #[test]
    fn test_table() {
        let out = render_rows(&columns(), &rows(), OutputFormat::Table);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "ID | name    ");
        assert_eq!(lines[1], "---+---------");
        assert_eq!(lines[2], "1  | Alice   ");
        assert_eq!(lines[4], "(2 rows)");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_rows(&columns(), &[], OutputFormat::Table), "(0 rows)");
    }

    #[test]
    fn test_csv_quotes_commas() {
        let out = render_rows(&columns(), &rows(), OutputFormat::Csv);
        assert_eq!(out, "ID,name\n1,Alice\n2,\"Smith, J\"");
    }

    #[test]
    fn test_json() {
        let out = render_rows(&columns(), &rows()[..1], OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, serde_json::json!([{"ID": 1, "name": "Alice"}]));
    }

    #[test]
    fn test_missing_field_renders_empty() {
        let row: Row = [("ID", Value::Int(1))].into_iter().collect();
        let out = render_rows(&columns(), &[row], OutputFormat::Csv);
        assert_eq!(out, "ID,name\n1,");
    }

    #[test]
    fn test_info() {
        let info = TableInfo {
            name: "t".to_string(),
            columns: vec![ColumnDef::id(), ColumnDef::new("a", DataType::Bool)],
            row_count: 0,
        };
        assert_eq!(render_info(&info), "Table: t\nColumns: ID:int, a:bool\nRow count: 0");
    }

    #[test]
    fn test_tables() {
        assert_eq!(render_tables(&[]), "No tables.");
        assert_eq!(
            render_tables(&["a".to_string(), "b".to_string()]),
            "- a\n- b"
        );
    }
}

//! Row-level operations over a table's schema and its row list.
//!
//! Everything here is pure: callers load the documents, pass them in, and
//! persist whatever comes back. On error the input rows are untouched.

use super::filter::{Assignment, Filter};
use crate::error::{DbError, Result};
use crate::storage::catalog::Catalog;
use crate::storage::table::{Row, TableInfo, Value, ID_COLUMN};

/// The ID the next inserted row receives: `max(existing) + 1`, or 1.
///
/// Deleting the highest row frees its ID for reuse.
pub fn next_id(rows: &[Row]) -> Result<i64> {
    let max = rows.iter().filter_map(Row::id).max().unwrap_or(0).max(0);
    max.checked_add(1).ok_or(DbError::IdOverflow(max))
}

/// Casts `values` to the table's column types and appends a new row.
pub fn insert<S: AsRef<str>>(
    catalog: &Catalog,
    table: &str,
    values: &[S],
    rows: &[Row],
) -> Result<Vec<Row>> {
    let schema = catalog.require(table)?;
    let columns = schema.data_columns();

    if values.len() != columns.len() {
        return Err(DbError::ArityMismatch {
            expected: columns.len(),
            found: values.len(),
        });
    }

    let mut record = Row::new();
    record.set(ID_COLUMN, Value::Int(next_id(rows)?));
    for (column, raw) in columns.iter().zip(values) {
        let raw = raw.as_ref();
        let value = column
            .data_type
            .cast(raw)
            .ok_or_else(|| DbError::TypeCastError {
                column: column.name.clone(),
                value: raw.to_string(),
            })?;
        record.set(column.name.clone(), value);
    }

    let mut updated = rows.to_vec();
    updated.push(record);
    Ok(updated)
}

/// All rows, or those matching `filter`, in stored order.
pub fn select(rows: &[Row], filter: Option<&Filter>) -> Vec<Row> {
    match filter {
        None => rows.to_vec(),
        Some(filter) => rows.iter().filter(|r| filter.matches(r)).cloned().collect(),
    }
}

/// Overwrites the assigned fields of every matching row.
///
/// Set values are written as given; they are not checked against the schema.
pub fn update(rows: &[Row], set: &[Assignment], filter: &Filter) -> Result<Vec<Row>> {
    let mut matched = false;
    let updated: Vec<Row> = rows
        .iter()
        .map(|row| {
            let mut row = row.clone();
            if filter.matches(&row) {
                matched = true;
                for assignment in set {
                    row.set(assignment.column.clone(), assignment.value.clone());
                }
            }
            row
        })
        .collect();

    if matched {
        Ok(updated)
    } else {
        Err(DbError::NoMatchingRows(filter.to_string()))
    }
}

/// Removes every matching row.
pub fn delete(rows: &[Row], filter: &Filter) -> Result<Vec<Row>> {
    let remaining: Vec<Row> = rows.iter().filter(|r| !filter.matches(r)).cloned().collect();
    if remaining.len() == rows.len() {
        return Err(DbError::NoMatchingRows(filter.to_string()));
    }
    Ok(remaining)
}

pub fn table_info(catalog: &Catalog, table: &str, rows: &[Row]) -> Result<TableInfo> {
    let schema = catalog.require(table)?;
    Ok(TableInfo {
        name: table.to_string(),
        columns: schema.columns.clone(),
        row_count: rows.len(),
    })
}

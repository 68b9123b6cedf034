use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// Name of the synthetic primary key column every table starts with.
pub const ID_COLUMN: &str = "ID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int,
    Str,
    Bool,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Str => "str",
            DataType::Bool => "bool",
        }
    }

    /// Converts raw user input into a value of this type.
    pub fn cast(&self, raw: &str) -> Option<Value> {
        match self {
            DataType::Int => raw.trim().parse::<i64>().ok().map(Value::Int),
            DataType::Str => Some(Value::Str(raw.to_string())),
            DataType::Bool => match raw.trim().to_lowercase().as_str() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
        }
    }
}

impl FromStr for DataType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(DataType::Int),
            "str" | "string" => Ok(DataType::Str),
            "bool" => Ok(DataType::Bool),
            other => Err(DbError::UnknownType(other.to_string())),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A cell value. Untagged so rows persist as flat JSON scalars.
///
/// `Bool` is listed first: serde tries untagged variants in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Types an unquoted literal: booleans, then integers, otherwise text.
    pub fn from_literal(text: &str) -> Self {
        if text.eq_ignore_ascii_case("true") {
            Value::Bool(true)
        } else if text.eq_ignore_ascii_case("false") {
            Value::Bool(false)
        } else if let Ok(i) = text.parse::<i64>() {
            Value::Int(i)
        } else {
            Value::Str(text.to_string())
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// A column definition, persisted as `"name:type"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    pub fn id() -> Self {
        Self::new(ID_COLUMN, DataType::Int)
    }
}

impl FromStr for ColumnDef {
    type Err = DbError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let (name, ty) = spec
            .split_once(':')
            .ok_or_else(|| DbError::MalformedColumnSpec(spec.to_string()))?;
        if name.is_empty() {
            return Err(DbError::MalformedColumnSpec(spec.to_string()));
        }
        Ok(ColumnDef::new(name, ty.parse()?))
    }
}

impl TryFrom<String> for ColumnDef {
    type Error = DbError;

    fn try_from(spec: String) -> Result<Self, Self::Error> {
        spec.parse()
    }
}

impl From<ColumnDef> for String {
    fn from(col: ColumnDef) -> Self {
        col.to_string()
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.data_type)
    }
}

/// Ordered column list of one table. The first column is always `ID:int`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchema {
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Builds a schema from caller-supplied columns, prepending `ID:int`.
    pub fn with_id(data_columns: Vec<ColumnDef>) -> Self {
        let mut columns = Vec::with_capacity(data_columns.len() + 1);
        columns.push(ColumnDef::id());
        columns.extend(data_columns);
        Self { columns }
    }

    /// Columns the caller supplies values for, i.e. everything but `ID`.
    pub fn data_columns(&self) -> &[ColumnDef] {
        match self.columns.first() {
            Some(first) if first.name == ID_COLUMN => &self.columns[1..],
            _ => &self.columns,
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// One record: column name to value, in column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.fields.insert(column.into(), value);
    }

    /// The row's `ID`, if present and an integer.
    pub fn id(&self) -> Option<i64> {
        self.get(ID_COLUMN).and_then(Value::as_int)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub row_count: usize,
}

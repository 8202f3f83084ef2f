// statlab-core/src/table.rs
//! Typed data tables.
//!
//! The browser always sends a table as a list of row objects keyed by
//! column name. Each table kind gets an explicit row record here, so the
//! column set is checked once at the boundary and the recompute functions
//! never probe for alternative column names.
//!
//! License: MIT OR Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, StatlabError};

/// One row as it travels over the wire.
pub type Record = Map<String, Value>;

/// The 1-based row index column shared by every indexed table.
pub const INDEX_COLUMN: &str = "X Values";

/// Column holding the response variable of the regression table.
pub const Y_COLUMN: &str = "Y Values";

/// Column of the single-column distribution table.
pub const VALUES_COLUMN: &str = "Values";

pub const POPULATION_COLUMNS: [&str; 3] = ["Population 1", "Population 2", "Population 3"];

/// "X Values" + "Y Values", used by the t-test tables.
pub const Y_LAYOUT: SampleLayout = SampleLayout::new(Y_COLUMN);

/// One layout per z-test population table.
pub const POPULATION_LAYOUTS: [SampleLayout; 2] = [
    SampleLayout::new(POPULATION_COLUMNS[0]),
    SampleLayout::new(POPULATION_COLUMNS[1]),
];

/// The three-population ANOVA table.
pub const GROUP_LAYOUT: GroupLayout = GroupLayout { value_columns: POPULATION_COLUMNS };

/// A single cell, before any numeric coercion.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    Number(f64),
    Text(String),
    #[default]
    Blank,
}

impl CellValue {
    /// Lenient conversion: numbers pass, numeric strings parse, the rest is missing.
    pub fn coerce(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Strict conversion: only a numeric cell is accepted.
    pub fn strict(&self, column: &str) -> Result<f64> {
        match self {
            CellValue::Number(n) => Ok(*n),
            CellValue::Text(s) => Err(StatlabError::invalid(
                column,
                format!("all values must be numeric, found '{}'", s),
            )),
            CellValue::Blank => Err(StatlabError::invalid(
                column,
                "all values must be numeric, found an empty cell",
            )),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            CellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Text(s) => Value::String(s.clone()),
            CellValue::Blank => Value::Null,
        }
    }
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => CellValue::Blank,
            Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or(CellValue::Blank),
            Value::String(s) if s.is_empty() => CellValue::Blank,
            Value::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Blank => Ok(()),
        }
    }
}

/// What to do with a cell that does not coerce to a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Exclude the observation.
    #[default]
    Drop,
    /// Count the observation as 0.
    Zero,
}

impl MissingValuePolicy {
    pub fn apply(self, cell: &CellValue) -> Option<f64> {
        match (cell.coerce(), self) {
            (Some(v), _) => Some(v),
            (None, MissingValuePolicy::Zero) => Some(0.0),
            (None, MissingValuePolicy::Drop) => None,
        }
    }

    /// Coerces a column of cells, keeping only what the policy admits.
    pub fn collect<'a>(self, cells: impl IntoIterator<Item = &'a CellValue>) -> Vec<f64> {
        cells.into_iter().filter_map(|c| self.apply(c)).collect()
    }
}

/// A row record with a fixed column set.
pub trait TableRow: Clone + fmt::Debug + PartialEq {
    /// Column names that vary between tables of the same row kind.
    type Layout: Copy + fmt::Debug + PartialEq;

    /// Column names in display order.
    fn columns(layout: Self::Layout) -> Vec<&'static str>;

    fn from_record(record: &Record, layout: Self::Layout) -> Result<Self>;

    fn to_record(&self, layout: Self::Layout) -> Record;
}

/// Rows that carry the 1-based `X Values` index and can be appended.
pub trait IndexedRow: TableRow {
    /// Builds the row appended at 1-based position `index`, drawing each
    /// value column from `fill`.
    fn appended(index: usize, fill: &mut dyn FnMut() -> f64) -> Self;
}

fn cell(record: &Record, column: &str) -> Result<CellValue> {
    record
        .get(column)
        .map(CellValue::from)
        .ok_or_else(|| StatlabError::missing(column))
}

/// "X Values" plus one named value column.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRow {
    pub x: CellValue,
    pub value: CellValue,
}

/// Names the value column of a [`SampleRow`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLayout {
    pub value_column: &'static str,
}

impl SampleLayout {
    pub const fn new(value_column: &'static str) -> Self {
        Self { value_column }
    }
}

impl TableRow for SampleRow {
    type Layout = SampleLayout;

    fn columns(layout: SampleLayout) -> Vec<&'static str> {
        vec![INDEX_COLUMN, layout.value_column]
    }

    fn from_record(record: &Record, layout: SampleLayout) -> Result<Self> {
        Ok(Self {
            x: cell(record, INDEX_COLUMN)?,
            value: cell(record, layout.value_column)?,
        })
    }

    fn to_record(&self, layout: SampleLayout) -> Record {
        let mut record = Record::new();
        record.insert(INDEX_COLUMN.to_string(), self.x.to_json());
        record.insert(layout.value_column.to_string(), self.value.to_json());
        record
    }
}

impl IndexedRow for SampleRow {
    fn appended(index: usize, fill: &mut dyn FnMut() -> f64) -> Self {
        Self {
            x: CellValue::Number(index as f64),
            value: CellValue::Number(fill()),
        }
    }
}

/// "X Values" plus three population columns sharing one row index.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub x: CellValue,
    pub values: [CellValue; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupLayout {
    pub value_columns: [&'static str; 3],
}

impl TableRow for GroupRow {
    type Layout = GroupLayout;

    fn columns(layout: GroupLayout) -> Vec<&'static str> {
        let mut columns = vec![INDEX_COLUMN];
        columns.extend(layout.value_columns);
        columns
    }

    fn from_record(record: &Record, layout: GroupLayout) -> Result<Self> {
        let [a, b, c] = layout.value_columns;
        Ok(Self {
            x: cell(record, INDEX_COLUMN)?,
            values: [cell(record, a)?, cell(record, b)?, cell(record, c)?],
        })
    }

    fn to_record(&self, layout: GroupLayout) -> Record {
        let mut record = Record::new();
        record.insert(INDEX_COLUMN.to_string(), self.x.to_json());
        for (column, value) in layout.value_columns.iter().zip(&self.values) {
            record.insert(column.to_string(), value.to_json());
        }
        record
    }
}

impl IndexedRow for GroupRow {
    fn appended(index: usize, fill: &mut dyn FnMut() -> f64) -> Self {
        Self {
            x: CellValue::Number(index as f64),
            values: [
                CellValue::Number(fill()),
                CellValue::Number(fill()),
                CellValue::Number(fill()),
            ],
        }
    }
}

/// An (X, Y) observation for the regression table.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRow {
    pub x: CellValue,
    pub y: CellValue,
}

impl TableRow for PointRow {
    type Layout = ();

    fn columns(_: ()) -> Vec<&'static str> {
        vec![INDEX_COLUMN, Y_COLUMN]
    }

    fn from_record(record: &Record, _: ()) -> Result<Self> {
        Ok(Self {
            x: cell(record, INDEX_COLUMN)?,
            y: cell(record, Y_COLUMN)?,
        })
    }

    fn to_record(&self, _: ()) -> Record {
        let mut record = Record::new();
        record.insert(INDEX_COLUMN.to_string(), self.x.to_json());
        record.insert(Y_COLUMN.to_string(), self.y.to_json());
        record
    }
}

impl IndexedRow for PointRow {
    fn appended(index: usize, fill: &mut dyn FnMut() -> f64) -> Self {
        Self {
            x: CellValue::Number(index as f64),
            y: CellValue::Number(fill()),
        }
    }
}

/// A bare observation for the distribution table.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueRow {
    pub value: CellValue,
}

impl TableRow for ValueRow {
    type Layout = ();

    fn columns(_: ()) -> Vec<&'static str> {
        vec![VALUES_COLUMN]
    }

    fn from_record(record: &Record, _: ()) -> Result<Self> {
        Ok(Self { value: cell(record, VALUES_COLUMN)? })
    }

    fn to_record(&self, _: ()) -> Record {
        let mut record = Record::new();
        record.insert(VALUES_COLUMN.to_string(), self.value.to_json());
        record
    }
}

/// An ordered sequence of rows sharing one column set.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<R: TableRow> {
    layout: R::Layout,
    rows: Vec<R>,
}

impl<R: TableRow> Table<R> {
    pub fn new(layout: R::Layout) -> Self {
        Self { layout, rows: Vec::new() }
    }

    pub fn with_rows(layout: R::Layout, rows: Vec<R>) -> Self {
        Self { layout, rows }
    }

    /// Parses the wire form. Every row must carry every column of the layout.
    pub fn from_records(records: &[Record], layout: R::Layout) -> Result<Self> {
        let rows = records
            .iter()
            .map(|record| R::from_record(record, layout))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { layout, rows })
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.rows.iter().map(|row| row.to_record(self.layout)).collect()
    }

    pub fn columns(&self) -> Vec<&'static str> {
        R::columns(self.layout)
    }

    pub fn layout(&self) -> R::Layout {
        self.layout
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }
}

impl Table<SampleRow> {
    pub fn values(&self, policy: MissingValuePolicy) -> Vec<f64> {
        policy.collect(self.rows.iter().map(|r| &r.value))
    }
}

impl Table<GroupRow> {
    /// Values of population `group` (0-based).
    pub fn group_values(&self, group: usize, policy: MissingValuePolicy) -> Vec<f64> {
        policy.collect(self.rows.iter().map(|r| &r.values[group]))
    }
}

/// Appends exactly one row when `n_clicks` is positive; otherwise returns
/// the table untouched.
///
/// The new row's index is `len + 1` and its value columns come from `fill`.
/// Existing index values are not validated, so duplicates left by manual
/// edits are kept as they are.
pub fn add_row<R, F>(mut table: Table<R>, n_clicks: u32, mut fill: F) -> Table<R>
where
    R: IndexedRow,
    F: FnMut() -> f64,
{
    if n_clicks == 0 {
        return table;
    }
    let index = table.len() + 1;
    table.push(R::appended(index, &mut fill));
    table
}

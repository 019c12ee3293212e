use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single spreadsheet cell as handed over by the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Null,
}

impl Cell {
    /// Lenient numeric view of the cell. Unparseable and empty cells are NaN.
    pub fn as_number(&self) -> f64 {
        match self {
            Cell::Number(v) => *v,
            Cell::Text(s) => parse_leading_float(s),
            Cell::Null => f64::NAN,
        }
    }

    /// Raw text shown in hover labels.
    pub fn display(&self) -> String {
        match self {
            Cell::Number(v) => format_number(*v),
            Cell::Text(s) => s.clone(),
            Cell::Null => String::new(),
        }
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

/// One record of a sheet, keyed by column name.
pub type Row = HashMap<String, Cell>;

/// Numeric value of `column` in `row`; missing cells are NaN.
pub fn row_number(row: &Row, column: &str) -> f64 {
    row.get(column).map(Cell::as_number).unwrap_or(f64::NAN)
}

/// Build a row from `(column, cell)` pairs.
pub fn row_from<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Cell>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    /// Column names in source order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }
}

/// All sheets of a loaded document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Rows of the named sheet, empty when the sheet does not exist.
    pub fn rows(&self, name: &str) -> &[Row] {
        self.sheet(name).map(|s| s.rows.as_slice()).unwrap_or(&[])
    }

    /// Column names of the named sheet, empty when the sheet does not exist.
    pub fn columns(&self, name: &str) -> &[String] {
        self.sheet(name).map(|s| s.columns.as_slice()).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Parse the longest numeric prefix of `text`, ignoring leading whitespace.
///
/// `"12.5kg"` gives 12.5, `"-Infinity"` gives negative infinity and text
/// without a numeric prefix gives NaN.
pub fn parse_leading_float(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut digits = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
        digits += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when at least one digit follows it.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().unwrap_or(f64::NAN)
}

/// Format a number the way it is typed: integers without a decimal point.
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

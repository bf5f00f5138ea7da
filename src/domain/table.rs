use serde_json::Value;

/// A worksheet materialized in memory: the header row as column names, every
/// following row as cells aligned with those columns.
///
/// Rows shorter than the header are padded with `Null` (the Sheets API omits
/// trailing empty cells), rows longer than the header are truncated. Rows
/// whose cells are all empty are dropped at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

fn is_empty_cell(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn stringify_cell(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl SheetTable {
    /// Builds a table from the raw `values` payload of a `values_get` call,
    /// treating the first row as the header.
    pub fn from_values(mut values: Vec<Vec<Value>>) -> Self {
        if values.is_empty() {
            return SheetTable {
                columns: Vec::new(),
                rows: Vec::new(),
            };
        }

        let header = values.remove(0);
        let columns: Vec<String> = header.iter().map(stringify_cell).collect();

        let rows = values
            .into_iter()
            .filter(|row| !row.iter().all(is_empty_cell))
            .map(|mut row| {
                row.truncate(columns.len());
                row.resize(columns.len(), Value::Null);
                row
            })
            .collect();

        SheetTable { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// One row viewed as ordered (column, cell) pairs.
    pub fn record<'a>(&'a self, row: &'a [Value]) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.columns.iter().map(String::as_str).zip(row.iter())
    }
}

use error_stack::{report, Result};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::domain::table::SheetTable;

use super::client::Write;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("key column '{key_column}' was not found in the sheet. Available columns: {available:?}")]
    KeyColumnMissing {
        key_column: String,
        available: Vec<String>,
    },
    #[error("row {row} has no value in key column '{key_column}'")]
    EmptyKeyValue { row: usize, key_column: String },
}

pub fn document_path(project_id: &str, collection: &str, document_id: &str) -> String {
    format!(
        "projects/{}/databases/(default)/documents/{}/{}",
        project_id, collection, document_id
    )
}

/// String form of a key cell, used as the Firestore document ID.
pub fn document_id(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Encodes one sheet cell as a Firestore REST `Value`. Empty and missing
/// cells normalize to the empty string; `integerValue` is string-encoded on
/// the wire (int64 per the REST protocol).
pub fn firestore_value(cell: &Value) -> Value {
    match cell {
        Value::Null => json!({ "stringValue": "" }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Number(n) if n.is_i64() || n.is_u64() => json!({ "integerValue": n.to_string() }),
        Value::Number(n) => json!({ "doubleValue": n }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        other => json!({ "stringValue": other.to_string() }),
    }
}

fn fields_from_record<'a>(record: impl Iterator<Item = (&'a str, &'a Value)>) -> Map<String, Value> {
    record
        .map(|(column, cell)| (column.to_string(), firestore_value(cell)))
        .collect()
}

/// Maps every table row to a full-overwrite write of the document keyed by
/// its key-column value.
///
/// Fails without staging anything if the key column is absent (naming the
/// columns that were found) or if any row has an empty key cell. Duplicate
/// key values are staged as-is, in row order; the later write wins inside
/// the batch.
pub fn stage_writes(
    table: &SheetTable,
    key_column: &str,
    project_id: &str,
    collection: &str,
) -> Result<Vec<Write>, ConfigurationError> {
    let key_index =
        table
            .column_index(key_column)
            .ok_or_else(|| ConfigurationError::KeyColumnMissing {
                key_column: key_column.to_string(),
                available: table.columns().to_vec(),
            })?;

    let mut writes = Vec::with_capacity(table.row_count());
    for (index, row) in table.rows().iter().enumerate() {
        let doc_id = document_id(&row[key_index]);
        if doc_id.is_empty() {
            return Err(report!(ConfigurationError::EmptyKeyValue {
                row: index + 1,
                key_column: key_column.to_string(),
            }));
        }

        writes.push(Write::set(
            document_path(project_id, collection, &doc_id),
            fields_from_record(table.record(row)),
        ));
    }

    Ok(writes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(values: Vec<Vec<Value>>) -> SheetTable {
        SheetTable::from_values(values)
    }

    #[test]
    fn test_document_id_from_number_is_its_string_form() {
        assert_eq!(document_id(&json!(1)), "1");
        assert_eq!(document_id(&json!("abc")), "abc");
        assert_eq!(document_id(&Value::Null), "");
    }

    #[test]
    fn test_firestore_value_normalizes_empty_cells() {
        assert_eq!(firestore_value(&Value::Null), json!({ "stringValue": "" }));
        assert_eq!(firestore_value(&json!("")), json!({ "stringValue": "" }));
    }

    #[test]
    fn test_firestore_value_keeps_numbers_and_bools() {
        assert_eq!(
            firestore_value(&json!(42)),
            json!({ "integerValue": "42" })
        );
        assert_eq!(
            firestore_value(&json!(1.5)),
            json!({ "doubleValue": 1.5 })
        );
        assert_eq!(
            firestore_value(&json!(true)),
            json!({ "booleanValue": true })
        );
    }

    #[test]
    fn test_document_path() {
        assert_eq!(
            document_path("my-project", "live_picks", "1"),
            "projects/my-project/databases/(default)/documents/live_picks/1"
        );
    }

    #[test]
    fn test_stage_writes_reproduces_rows_keyed_by_column() {
        let table = table(vec![
            vec![json!("pick_id"), json!("team")],
            vec![json!("1"), json!("A")],
            vec![json!("2"), json!("")],
            vec![json!(""), Value::Null],
            vec![json!("3")],
        ]);

        let writes = stage_writes(&table, "pick_id", "p", "live_picks").expect("should stage");
        assert_eq!(writes.len(), 3);

        assert_eq!(
            writes[0].update.name,
            "projects/p/databases/(default)/documents/live_picks/1"
        );
        assert_eq!(
            writes[0].update.fields.get("team"),
            Some(&json!({ "stringValue": "A" }))
        );

        // Empty cell normalized to empty string, not dropped.
        assert_eq!(
            writes[1].update.fields.get("team"),
            Some(&json!({ "stringValue": "" }))
        );

        // Row padded by the table keeps the column, as empty string.
        assert_eq!(
            writes[2].update.name,
            "projects/p/databases/(default)/documents/live_picks/3"
        );
        assert_eq!(
            writes[2].update.fields.get("team"),
            Some(&json!({ "stringValue": "" }))
        );
    }

    #[test]
    fn test_stage_writes_numeric_key_becomes_string_id() {
        let table = table(vec![
            vec![json!("pick_id"), json!("team")],
            vec![json!(7), json!("A")],
        ]);

        let writes = stage_writes(&table, "pick_id", "p", "c").expect("should stage");
        assert_eq!(
            writes[0].update.name,
            "projects/p/databases/(default)/documents/c/7"
        );
        assert_eq!(
            writes[0].update.fields.get("pick_id"),
            Some(&json!({ "integerValue": "7" }))
        );
    }

    #[test]
    fn test_stage_writes_missing_key_column_stages_nothing() {
        let table = table(vec![
            vec![json!("game_id"), json!("team")],
            vec![json!("1"), json!("A")],
        ]);

        let report = stage_writes(&table, "pick_id", "p", "c").expect_err("should fail");
        let error = report.current_context();
        match error {
            ConfigurationError::KeyColumnMissing {
                key_column,
                available,
            } => {
                assert_eq!(key_column, "pick_id");
                assert_eq!(available, &["game_id".to_string(), "team".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_stage_writes_empty_key_cell_stages_nothing() {
        let table = table(vec![
            vec![json!("pick_id"), json!("team")],
            vec![json!("1"), json!("A")],
            vec![json!(""), json!("B")],
        ]);

        let report = stage_writes(&table, "pick_id", "p", "c").expect_err("should fail");
        assert!(matches!(
            report.current_context(),
            ConfigurationError::EmptyKeyValue { row: 2, .. }
        ));
    }

    #[test]
    fn test_stage_writes_duplicate_keys_keep_row_order() {
        let table = table(vec![
            vec![json!("pick_id"), json!("team")],
            vec![json!("1"), json!("A")],
            vec![json!("1"), json!("B")],
        ]);

        let writes = stage_writes(&table, "pick_id", "p", "c").expect("should stage");
        assert_eq!(writes.len(), 2, "duplicates are not deduplicated");
        assert_eq!(writes[0].update.name, writes[1].update.name);
        assert_eq!(
            writes[1].update.fields.get("team"),
            Some(&json!({ "stringValue": "B" }))
        );
    }

    #[test]
    fn test_staging_is_idempotent_over_equal_tables() {
        let values = vec![
            vec![json!("pick_id"), json!("team")],
            vec![json!("1"), json!("A")],
        ];
        let first = stage_writes(&table(values.clone()), "pick_id", "p", "c").expect("stage");
        let second = stage_writes(&table(values), "pick_id", "p", "c").expect("stage");
        assert_eq!(first, second);
    }
}

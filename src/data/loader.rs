use std::io::Read;
use std::path::Path;

use serde_json::Value as JsonValue;

use super::model::{CellValue, ColumnKind, Dataset, Record, SAMPLE_NAME, TEXT_COLUMNS};
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a raw (not yet normalized) dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row plus one record per line
/// * `.json` – `[{ "medical_specialty": "...", "keywords": "...", ... }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => read_csv(std::fs::File::open(path)?),
        "json" => read_json(&std::fs::read_to_string(path)?),
        other => Err(DashboardError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse an uploaded CSV buffer.
pub fn load_csv_bytes(bytes: &[u8]) -> Result<Dataset> {
    read_csv(bytes)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: a header row with column names, then records. Every record
/// must have as many fields as the header; ragged rows are rejected.
///
/// Types are decided per column once every row is read. The text columns
/// and `sample_name` are always kept verbatim.
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(DashboardError::Malformed("no columns to parse".into()));
    }

    let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;

    let kinds: Vec<ColumnKind> = headers
        .iter()
        .enumerate()
        .map(|(col, name)| {
            if is_verbatim_column(name) {
                ColumnKind::Text
            } else {
                ColumnKind::detect(rows.iter().map(|row| row.get(col).unwrap_or("")))
            }
        })
        .collect();

    let records = rows
        .iter()
        .map(|row| {
            let cells = row
                .iter()
                .zip(&kinds)
                .map(|(raw, &kind)| CellValue::parse_as(raw, kind))
                .collect();
            Record::new(cells)
        })
        .collect();

    Ok(Dataset::new(headers, records))
}

fn is_verbatim_column(name: &str) -> bool {
    let name = name.trim();
    name == SAMPLE_NAME || TEXT_COLUMNS.contains(&name)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')` shape).
/// Columns are collected in first-seen order; a key missing from one record
/// is a null cell in that record.
pub fn read_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| DashboardError::Malformed("expected a top-level JSON array".into()))?;

    let mut column_names: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| DashboardError::Malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
        }
    }
    if column_names.is_empty() {
        return Err(DashboardError::Malformed("no columns to parse".into()));
    }

    let records = rows
        .iter()
        .filter_map(|row| row.as_object())
        .map(|obj| {
            let cells = column_names
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            Record::new(cells)
        })
        .collect();

    Ok(Dataset::new(column_names, records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Text(b.to_string()),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_infers_cells() {
        let csv = " medical_specialty ,transcription,age\nCardiology,abc,42\nNeurology,,\n";
        let ds = load_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.column_names, vec![" medical_specialty ", "transcription", "age"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].cells[2], CellValue::Integer(42));
        assert_eq!(ds.records[1].cells[1], CellValue::Null);
    }

    #[test]
    fn numeric_looking_text_is_kept_verbatim() {
        let csv = "sample_name,transcription,code,score\n007,1.50,007,1\nabc,hello,A12,2.5\n";
        let ds = load_csv_bytes(csv.as_bytes()).unwrap();
        let first = &ds.records[0].cells;
        assert_eq!(first[0], CellValue::Text("007".into()));
        assert_eq!(first[1], CellValue::Text("1.50".into()));
        // A mixed column stays text even outside the known text columns.
        assert_eq!(first[2], CellValue::Text("007".into()));
        // A numeric column widens to float when any cell needs it.
        assert_eq!(first[3], CellValue::Float(1.0));
    }

    #[test]
    fn quoted_fields_keep_embedded_commas() {
        let csv = "keywords\n\"heart, lung\"\n";
        let ds = load_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(ds.records[0].cells[0], CellValue::Text("heart, lung".into()));
    }

    #[test]
    fn ragged_rows_are_load_errors() {
        let csv = "a,b\n1,2\n3\n";
        let err = load_csv_bytes(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DashboardError::Csv(_)));
        assert!(err.is_load_error());
    }

    #[test]
    fn empty_input_is_malformed() {
        let err = load_csv_bytes(b"").unwrap_err();
        assert!(matches!(err, DashboardError::Malformed(_)));
    }

    #[test]
    fn json_records_fill_missing_keys_with_null() {
        let json = r#"[{"medical_specialty": "Cardiology", "keywords": "heart"},
                       {"medical_specialty": "Neurology", "sample_name": 7}]"#;
        let ds = read_json(json).unwrap();
        assert_eq!(ds.len(), 2);
        let sample = ds.column_index("sample_name").unwrap();
        assert_eq!(ds.records[0].cells[sample], CellValue::Null);
        assert_eq!(ds.records[1].cells[sample], CellValue::Integer(7));
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(read_json("{}"), Err(DashboardError::Malformed(_))));
        assert!(matches!(read_json("[1, 2]"), Err(DashboardError::Malformed(_))));
        assert!(matches!(read_json("[{"), Err(DashboardError::Json(_))));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(matches!(err, DashboardError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}

use super::model::{
    CellValue, Dataset, KEYWORDS, KEYWORDS_COUNT, TEXT_COLUMNS, TRANSCRIPTION,
    TRANSCRIPTION_LENGTH,
};
use crate::config::KeywordCountPolicy;

/// Clean a freshly loaded dataset and add the derived metrics.
///
/// * trims header names
/// * fills missing text cells with "" and coerces them to text
/// * adds `transcription_length` when `transcription` exists
/// * adds `keywords_count` when `keywords` exists
///
/// Applying it twice gives the same dataset: derived columns are
/// overwritten in place rather than appended again.
pub fn normalize(mut dataset: Dataset, policy: KeywordCountPolicy) -> Dataset {
    for name in &mut dataset.column_names {
        let trimmed = name.trim();
        if trimmed.len() != name.len() {
            *name = trimmed.to_string();
        }
    }

    for column in TEXT_COLUMNS {
        let Some(col) = dataset.column_index(column) else {
            continue;
        };
        for record in &mut dataset.records {
            let cell = std::mem::replace(&mut record.cells[col], CellValue::Null);
            record.cells[col] = cell.into_text();
        }
    }

    if let Some(src) = dataset.column_index(TRANSCRIPTION) {
        let lengths: Vec<CellValue> = dataset
            .records
            .iter()
            .map(|r| CellValue::Integer(text_of(&r.cells[src]).chars().count() as i64))
            .collect();
        set_column(&mut dataset, TRANSCRIPTION_LENGTH, lengths);
    }

    if let Some(src) = dataset.column_index(KEYWORDS) {
        let counts: Vec<CellValue> = dataset
            .records
            .iter()
            .map(|r| CellValue::Integer(keyword_count(text_of(&r.cells[src]), policy) as i64))
            .collect();
        set_column(&mut dataset, KEYWORDS_COUNT, counts);
    }

    dataset
}

/// Number of comma-separated keywords in one cell.
pub fn keyword_count(keywords: &str, policy: KeywordCountPolicy) -> usize {
    match policy {
        KeywordCountPolicy::EmptyAsZero if keywords.trim().is_empty() => 0,
        _ => keywords.split(',').count(),
    }
}

fn text_of(cell: &CellValue) -> &str {
    cell.as_text().unwrap_or("")
}

/// Replace a column's values, appending the column if it is new.
fn set_column(dataset: &mut Dataset, name: &str, values: Vec<CellValue>) {
    match dataset.column_index(name) {
        Some(col) => {
            for (record, value) in dataset.records.iter_mut().zip(values) {
                record.cells[col] = value;
            }
        }
        None => {
            dataset.column_names.push(name.to_string());
            for (record, value) in dataset.records.iter_mut().zip(values) {
                record.cells.push(value);
            }
        }
    }
}

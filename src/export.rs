//! CSV serialization of computed results.

use crate::config::ExportColumns;
use crate::data::filter::DatasetView;
use crate::data::model::{
    CellValue, DESCRIPTION, KEYWORDS_COUNT, MEDICAL_SPECIALTY, SAMPLE_NAME,
    TRANSCRIPTION_LENGTH,
};
use crate::data::stats::SummaryReport;
use crate::error::{DashboardError, Result};

pub const SUMMARY_FILE_NAME: &str = "medical_analysis_summary.csv";
pub const FILTERED_FILE_NAME: &str = "filtered_medical_data.csv";

/// Columns shown in the data preview, in order, when present.
pub const DISPLAY_COLUMNS: [&str; 5] = [
    DESCRIPTION,
    MEDICAL_SPECIALTY,
    SAMPLE_NAME,
    TRANSCRIPTION_LENGTH,
    KEYWORDS_COUNT,
];

pub const MIN_PREVIEW_ROWS: usize = 5;
pub const MAX_PREVIEW_ROWS: usize = 50;

/// One-row summary CSV with header
/// `total_records,specialties_count,avg_transcription_length,avg_keywords`.
pub fn summary_csv(report: &SummaryReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(report).map_err(export_error)?;
    finish(writer)
}

/// The whole view as CSV. No row cap.
pub fn filtered_csv(view: &DatasetView<'_>, columns: ExportColumns) -> Result<String> {
    let selected = selected_columns(view, columns);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(selected.iter().map(|(_, name)| name.as_str()))
        .map_err(export_error)?;
    for record in view.records() {
        writer
            .write_record(selected.iter().map(|&(col, _)| record.cells[col].to_string()))
            .map_err(export_error)?;
    }
    finish(writer)
}

/// First `rows` records of the display columns. `rows` is clamped to the
/// preview bounds.
pub fn preview(view: &DatasetView<'_>, rows: usize) -> Preview {
    let rows = rows.clamp(MIN_PREVIEW_ROWS, MAX_PREVIEW_ROWS);
    let selected = selected_columns(view, ExportColumns::Display);
    Preview {
        columns: selected.iter().map(|(_, name)| name.clone()).collect(),
        rows: view
            .records()
            .take(rows)
            .map(|r| selected.iter().map(|&(col, _)| r.cells[col].clone()).collect())
            .collect(),
    }
}

/// A small table of the first rows of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

fn selected_columns(view: &DatasetView<'_>, columns: ExportColumns) -> Vec<(usize, String)> {
    let names = &view.dataset.column_names;
    match columns {
        ExportColumns::All => names.iter().cloned().enumerate().collect(),
        ExportColumns::Display => DISPLAY_COLUMNS
            .iter()
            .filter_map(|name| Some((view.dataset.column_index(name)?, name.to_string())))
            .collect(),
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(export_error)?;
    String::from_utf8(bytes).map_err(export_error)
}

fn export_error(e: impl std::fmt::Display) -> DashboardError {
    DashboardError::Export(e.to_string())
}

use sha2::{Digest, Sha256};

use crate::config::DashboardConfig;
use crate::data::filter::{filtered_indices, specialty_options, DatasetView, SpecialtyFilter, ALL};
use crate::data::loader::{load_csv_bytes, load_file};
use crate::data::model::Dataset;
use crate::data::normalize::normalize;
use crate::data::stats::{
    insights, keyword_frequency, length_histogram, specialty_distribution, summarize,
    FrequencyTable, HistogramBin, Insights, RankedCount, SummaryReport,
};
use crate::error::{DashboardError, Result};
use crate::export::{filtered_csv, preview, summary_csv, Preview};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Per-session state, independent of any front end.
///
/// Lifecycle: a dataset is created on upload, replaced by the next upload
/// and dropped by [`Session::clear`]. A failed upload leaves no dataset.
pub struct Session {
    pub config: DashboardConfig,

    /// Normalized dataset (None until an upload succeeds).
    dataset: Option<Dataset>,

    /// SHA-256 of the bytes the current dataset was built from.
    upload_digest: Option<String>,

    /// Active specialty filter.
    filter: SpecialtyFilter,

    /// Indices of records passing the current filter (cached).
    visible_indices: Vec<usize>,

    /// Status / error message for the user.
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            upload_digest: None,
            filter: SpecialtyFilter::All,
            visible_indices: Vec::new(),
            status_message: None,
        }
    }

    /// Ingest uploaded CSV bytes. Identical bytes reuse the dataset already
    /// held. On failure the previous dataset is discarded.
    pub fn upload(&mut self, bytes: &[u8]) -> Result<&Dataset> {
        let digest = hex::encode(Sha256::digest(bytes));
        if self.dataset.is_some() && self.upload_digest.as_deref() == Some(digest.as_str()) {
            log::debug!("Upload {digest} unchanged, reusing normalized dataset");
        } else {
            let loaded = load_csv_bytes(bytes);
            self.accept(loaded, Some(digest))?;
        }
        self.current()
    }

    /// Ingest a dataset from disk (CSV or JSON by extension).
    pub fn open(&mut self, path: &std::path::Path) -> Result<&Dataset> {
        let loaded = load_file(path);
        self.accept(loaded, None)?;
        self.current()
    }

    fn accept(&mut self, loaded: Result<Dataset>, digest: Option<String>) -> Result<()> {
        match loaded {
            Ok(raw) => {
                let dataset = normalize(raw, self.config.keyword_count);
                log::info!(
                    "Loaded {} records with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                self.status_message = Some(format!(
                    "Data loaded successfully! {} records found.",
                    dataset.len()
                ));
                self.filter = SpecialtyFilter::All;
                self.visible_indices = (0..dataset.len()).collect();
                self.dataset = Some(dataset);
                self.upload_digest = digest;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.clear();
                self.status_message = Some(format!("Error loading file: {e}"));
                Err(e)
            }
        }
    }

    fn current(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .ok_or(DashboardError::NoDataset)
    }

    /// Drop the dataset, e.g. when the session ends.
    pub fn clear(&mut self) {
        self.dataset = None;
        self.upload_digest = None;
        self.filter = SpecialtyFilter::All;
        self.visible_indices.clear();
        self.status_message = None;
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn filter(&self) -> &SpecialtyFilter {
        &self.filter
    }

    /// Change the active filter and recompute the visible rows.
    pub fn set_filter(&mut self, filter: SpecialtyFilter) {
        log::debug!("Filter set to {filter}");
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &filter);
        }
        self.filter = filter;
    }

    /// The current filtered view, if a dataset is loaded.
    pub fn view(&self) -> Option<DatasetView<'_>> {
        let ds = self.dataset.as_ref()?;
        Some(DatasetView::with_indices(ds, &self.visible_indices))
    }

    pub fn specialty_options(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(specialty_options)
            .unwrap_or_else(|| vec![ALL.to_string()])
    }

    pub fn summary(&self) -> Option<SummaryReport> {
        self.view().map(|v| summarize(&v))
    }

    pub fn specialty_distribution(&self) -> Option<Vec<RankedCount>> {
        self.view()
            .map(|v| specialty_distribution(&v, self.config.top_specialties))
    }

    pub fn top_keywords(&self) -> Option<FrequencyTable> {
        self.view().map(|v| keyword_frequency(&v, self.config.top_keywords))
    }

    pub fn insights(&self) -> Option<Insights> {
        self.view().map(|v| insights(&v))
    }

    pub fn length_histogram(&self) -> Option<Vec<HistogramBin>> {
        self.view()
            .map(|v| length_histogram(&v, self.config.histogram_bins))
    }

    pub fn preview(&self, rows: Option<usize>) -> Option<Preview> {
        self.view()
            .map(|v| preview(&v, rows.unwrap_or(self.config.preview_rows)))
    }

    /// Summary CSV of the current filtered view.
    pub fn export_summary(&self) -> Option<Result<String>> {
        self.summary().map(|s| summary_csv(&s))
    }

    /// Full CSV of the current filtered view.
    pub fn export_filtered(&self) -> Option<Result<String>> {
        self.view()
            .map(|v| filtered_csv(&v, self.config.export_columns))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &[u8] = b"medical_specialty,transcription,keywords\n\
        Cardiology,abcde,\"heart,lung\"\n\
        Cardiology,ab,heart\n\
        Neurology,abcdefgh,brain\n";

    #[test]
    fn upload_then_filter() {
        let mut session = Session::default();
        assert_eq!(session.upload(SCENARIO).unwrap().len(), 3);
        assert_eq!(session.summary().unwrap().avg_keywords, 1.3);

        session.set_filter(SpecialtyFilter::parse("Cardiology"));
        let summary = session.summary().unwrap();
        assert_eq!(summary.total_records, 2);
        assert_eq!(summary.avg_transcription_length, 3);
        assert_eq!(summary.avg_keywords, 1.5);

        session.set_filter(SpecialtyFilter::All);
        assert_eq!(session.summary().unwrap().total_records, 3);
    }

    #[test]
    fn failed_upload_discards_previous_dataset() {
        let mut session = Session::default();
        session.upload(SCENARIO).unwrap();
        let err = session.upload(b"a,b\n1,2,3\n").unwrap_err();
        assert!(err.is_load_error());
        assert!(session.dataset().is_none());
        assert!(session.summary().is_none());
        assert!(session
            .status_message
            .as_deref()
            .unwrap()
            .starts_with("Error loading file"));
    }

    #[test]
    fn new_upload_replaces_and_resets_filter() {
        let mut session = Session::default();
        session.upload(SCENARIO).unwrap();
        session.set_filter(SpecialtyFilter::parse("Neurology"));
        session
            .upload(b"medical_specialty\nUrology\nUrology\n")
            .unwrap();
        assert_eq!(session.filter(), &SpecialtyFilter::All);
        assert_eq!(session.summary().unwrap().total_records, 2);
    }

    #[test]
    fn identical_upload_keeps_the_filter() {
        let mut session = Session::default();
        session.upload(SCENARIO).unwrap();
        session.set_filter(SpecialtyFilter::parse("Neurology"));
        session.upload(SCENARIO).unwrap();
        assert_eq!(session.summary().unwrap().total_records, 1);
    }

    #[test]
    fn summary_export_follows_the_filter() {
        let mut session = Session::default();
        session.upload(SCENARIO).unwrap();
        session.set_filter(SpecialtyFilter::parse("Cardiology"));
        let csv = session.export_summary().unwrap().unwrap();
        assert!(csv.ends_with("\n2,1,3,1.5\n"));
    }

    #[test]
    fn nothing_to_report_before_upload() {
        let session = Session::default();
        assert!(session.view().is_none());
        assert!(session.export_filtered().is_none());
        assert_eq!(session.specialty_options(), vec!["All"]);
    }

    #[test]
    fn missing_dataset_is_not_a_load_error() {
        let err = Session::default().current().unwrap_err();
        assert!(matches!(err, DashboardError::NoDataset));
        assert!(!err.is_load_error());
    }

    #[test]
    fn clear_ends_the_session() {
        let mut session = Session::default();
        session.upload(SCENARIO).unwrap();
        session.clear();
        assert!(session.dataset().is_none());
    }
}

use thiserror::Error;

/// Errors surfaced by the data pipeline.
///
/// Only ingestion can genuinely fail on user input. Filtering and
/// aggregation are total; export only fails if the CSV writer itself does.
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("failed to parse CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("no dataset loaded")]
    NoDataset,

    #[error("failed to write CSV export: {0}")]
    Export(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    /// Whether this error happened while loading a dataset (a `LoadError`
    /// in the user-facing sense: the dataset is reset and the user may retry).
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            DashboardError::Csv(_)
                | DashboardError::Json(_)
                | DashboardError::Io(_)
                | DashboardError::UnsupportedFormat(_)
                | DashboardError::Malformed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_errors_are_classified() {
        assert!(DashboardError::Malformed("x".into()).is_load_error());
        assert!(DashboardError::UnsupportedFormat("xlsx".into()).is_load_error());
        assert!(!DashboardError::Export("x".into()).is_load_error());
        assert!(!DashboardError::Config("x".into()).is_load_error());
        assert!(!DashboardError::NoDataset.is_load_error());
    }

    #[test]
    fn messages_carry_the_cause() {
        let err = DashboardError::UnsupportedFormat("xlsx".into());
        assert_eq!(err.to_string(), "unsupported file extension: .xlsx");
    }
}

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DashboardError, Result};

/// How a blank `keywords` cell is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordCountPolicy {
    /// A blank cell has zero keywords.
    #[default]
    EmptyAsZero,
    /// Count raw comma-separated segments; a blank cell counts as one.
    SplitSegments,
}

/// Which columns the filtered-data export writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportColumns {
    #[default]
    All,
    /// Only the preview columns that are present.
    Display,
}

/// Tunables for aggregation and export. Every field has a default, so an
/// empty (or absent) config file is valid.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub top_specialties: usize,
    pub top_keywords: usize,
    pub histogram_bins: usize,
    pub preview_rows: usize,
    pub keyword_count: KeywordCountPolicy,
    pub export_columns: ExportColumns,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_specialties: 10,
            top_keywords: 15,
            histogram_bins: 20,
            preview_rows: 10,
            keyword_count: KeywordCountPolicy::default(),
            export_columns: ExportColumns::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a TOML file, or fall back to defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|e| {
            DashboardError::Config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: DashboardConfig =
            toml::from_str(content).map_err(|e| DashboardError::Config(e.to_string()))?;
        if config.histogram_bins == 0 {
            return Err(DashboardError::Config(
                "histogram_bins must be at least 1".into(),
            ));
        }
        Ok(config)
    }
}

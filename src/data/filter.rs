use std::fmt;

use super::model::{CellValue, Dataset, Record, MEDICAL_SPECIALTY};

/// Selector value meaning "no filter".
pub const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Equality predicate over `medical_specialty`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpecialtyFilter {
    #[default]
    All,
    Only(String),
}

impl SpecialtyFilter {
    /// Parse a selector value; the sentinel `"All"` disables filtering.
    pub fn parse(value: &str) -> Self {
        if value == ALL {
            SpecialtyFilter::All
        } else {
            SpecialtyFilter::Only(value.to_string())
        }
    }
}

impl From<Option<&str>> for SpecialtyFilter {
    fn from(value: Option<&str>) -> Self {
        value.map(SpecialtyFilter::parse).unwrap_or_default()
    }
}

impl fmt::Display for SpecialtyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialtyFilter::All => write!(f, "{ALL}"),
            SpecialtyFilter::Only(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// DatasetView – a filtered, borrowed selection of rows
// ---------------------------------------------------------------------------

/// Rows of a dataset passing a filter, in original order.
#[derive(Debug, Clone, Copy)]
pub struct DatasetView<'a> {
    pub dataset: &'a Dataset,
    indices: ViewRows<'a>,
}

#[derive(Debug, Clone, Copy)]
enum ViewRows<'a> {
    All,
    Selected(&'a [usize]),
}

impl<'a> DatasetView<'a> {
    /// A view over every record.
    pub fn full(dataset: &'a Dataset) -> Self {
        DatasetView {
            dataset,
            indices: ViewRows::All,
        }
    }

    /// A view over the given row indices. Indices must be in range.
    pub fn with_indices(dataset: &'a Dataset, indices: &'a [usize]) -> Self {
        DatasetView {
            dataset,
            indices: ViewRows::Selected(indices),
        }
    }

    pub fn len(&self) -> usize {
        match self.indices {
            ViewRows::All => self.dataset.len(),
            ViewRows::Selected(idx) => idx.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records in view order.
    pub fn records(&self) -> Box<dyn Iterator<Item = &'a Record> + 'a> {
        let dataset = self.dataset;
        match self.indices {
            ViewRows::All => Box::new(dataset.records.iter()),
            ViewRows::Selected(idx) => Box::new(idx.iter().map(move |&i| &dataset.records[i])),
        }
    }

    /// Values of one column in view order; `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &'a CellValue> + 'a> {
        let col = self.dataset.column_index(name)?;
        Some(self.records().map(move |r| &r.cells[col]))
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Indices of the records whose specialty equals the filter value.
///
/// `All`, or a dataset without a `medical_specialty` column, keeps every
/// record.
pub fn filtered_indices(dataset: &Dataset, filter: &SpecialtyFilter) -> Vec<usize> {
    let (SpecialtyFilter::Only(wanted), Some(col)) =
        (filter, dataset.column_index(MEDICAL_SPECIALTY))
    else {
        return (0..dataset.len()).collect();
    };

    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.cells[col].as_text() == Some(wanted.as_str()))
        .map(|(i, _)| i)
        .collect()
}

/// Options for the specialty selector: `"All"` followed by the sorted
/// distinct specialties.
pub fn specialty_options(dataset: &Dataset) -> Vec<String> {
    std::iter::once(ALL.to_string())
        .chain(
            dataset
                .unique_values(MEDICAL_SPECIALTY)
                .into_iter()
                .map(|v| v.to_string()),
        )
        .collect()
}

use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

pub const DESCRIPTION: &str = "description";
pub const MEDICAL_SPECIALTY: &str = "medical_specialty";
pub const TRANSCRIPTION: &str = "transcription";
pub const KEYWORDS: &str = "keywords";
pub const SAMPLE_NAME: &str = "sample_name";
pub const TRANSCRIPTION_LENGTH: &str = "transcription_length";
pub const KEYWORDS_COUNT: &str = "keywords_count";

/// Raw spellings read as a missing value.
const NA_MARKERS: [&str; 8] = ["NaN", "nan", "NA", "N/A", "n/a", "null", "NULL", "None"];

/// Columns whose missing values become empty strings during normalization.
pub const TEXT_COLUMNS: [&str; 4] = [DESCRIPTION, MEDICAL_SPECIALTY, TRANSCRIPTION, KEYWORDS];

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, inferred from the raw input.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so CellValue can live in a BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                Text(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Null => {}
        }
    }
}

/// Renders the cell the way it is written to CSV. `Null` is an empty field
/// and whole floats keep a trailing `.0` so they re-parse as floats.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => Ok(()),
        }
    }
}

/// Type shared by every cell of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    /// Narrowest type every non-null raw value of a column parses as.
    /// A single non-numeric value makes the whole column text.
    pub fn detect<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut kind = ColumnKind::Integer;
        for raw in values.into_iter().filter(|raw| !is_missing(raw)) {
            if kind == ColumnKind::Integer && raw.parse::<i64>().is_err() {
                kind = ColumnKind::Float;
            }
            if kind == ColumnKind::Float && raw.parse::<f64>().is_err() {
                return ColumnKind::Text;
            }
        }
        kind
    }
}

fn is_missing(raw: &str) -> bool {
    raw.is_empty() || NA_MARKERS.contains(&raw)
}

impl CellValue {
    /// Parse raw text as a cell of the given column type. Empty input and
    /// the usual missing-value markers are `Null`; text is kept verbatim.
    pub fn parse_as(raw: &str, kind: ColumnKind) -> Self {
        if is_missing(raw) {
            return CellValue::Null;
        }
        match kind {
            ColumnKind::Integer => raw
                .parse()
                .map(CellValue::Integer)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            ColumnKind::Float => raw
                .parse()
                .map(CellValue::Float)
                .unwrap_or_else(|_| CellValue::Text(raw.to_string())),
            ColumnKind::Text => CellValue::Text(raw.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Borrow the text of a `Text` cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as an `f64` for numeric aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Coerce to text: `Null` becomes "", numbers use their display form.
    pub fn into_text(self) -> CellValue {
        match self {
            CellValue::Text(_) => self,
            CellValue::Null => CellValue::Text(String::new()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the table
// ---------------------------------------------------------------------------

/// A single record. Cells are aligned with [`Dataset::column_names`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub cells: Vec<CellValue>,
}

impl Record {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Record { cells }
    }

    pub fn get(&self, col: usize) -> Option<&CellValue> {
        self.cells.get(col)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Every record has exactly one cell per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Ordered column names, as they appear in the source header.
    pub column_names: Vec<String>,
    /// All records, in source order.
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(column_names: Vec<String>, records: Vec<Record>) -> Self {
        Dataset {
            column_names,
            records,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `(row, column name)`.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.records.get(row)?.get(col)
    }

    /// Sorted set of the distinct values in a column.
    pub fn unique_values(&self, column: &str) -> BTreeSet<CellValue> {
        let Some(col) = self.column_index(column) else {
            return BTreeSet::new();
        };
        self.records
            .iter()
            .filter_map(|r| r.get(col).cloned())
            .collect()
    }
}

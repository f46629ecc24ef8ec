//! Aggregates computed over a (possibly filtered) [`DatasetView`].
//!
//! Every function here is a pure read and total: an empty view, or one
//! missing the column a metric depends on, yields zeros or empty tables.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::filter::DatasetView;
use super::model::{
    CellValue, KEYWORDS, KEYWORDS_COUNT, MEDICAL_SPECIALTY, TRANSCRIPTION_LENGTH,
};

/// Words of at least three word characters.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w{3,}\b").expect("valid token regex"));

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Headline metrics. Field order is the summary CSV column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    pub total_records: usize,
    pub specialties_count: usize,
    pub avg_transcription_length: i64,
    pub avg_keywords: f64,
}

/// One row of a ranked count table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub value: String,
    pub count: usize,
}

/// Ranked (token, count) pairs built from the keywords column.
pub type FrequencyTable = Vec<RankedCount>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub top_specialty: Option<RankedCount>,
    pub max_transcription_length: Option<i64>,
    pub max_keywords: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

pub fn summarize(view: &DatasetView<'_>) -> SummaryReport {
    let specialties_count = view
        .column(MEDICAL_SPECIALTY)
        .map(|values| values.filter(|v| !v.is_null()).collect::<BTreeSet<_>>().len())
        .unwrap_or(0);

    let avg_transcription_length = mean(view, TRANSCRIPTION_LENGTH)
        .map(|m| m.trunc() as i64)
        .unwrap_or(0);

    let avg_keywords = mean(view, KEYWORDS_COUNT)
        .map(|m| (m * 10.0).round_ties_even() / 10.0)
        .unwrap_or(0.0);

    SummaryReport {
        total_records: view.len(),
        specialties_count,
        avg_transcription_length,
        avg_keywords,
    }
}

/// Arithmetic mean of the numeric cells of a column. `None` when the
/// column is absent or holds no numbers.
fn mean(view: &DatasetView<'_>, column: &str) -> Option<f64> {
    let (sum, n) = view
        .column(column)?
        .filter_map(CellValue::as_f64)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn max_integer(view: &DatasetView<'_>, column: &str) -> Option<i64> {
    view.column(column)?
        .filter_map(CellValue::as_f64)
        .map(|v| v as i64)
        .max()
}

// ---------------------------------------------------------------------------
// Ranked counts
// ---------------------------------------------------------------------------

/// Count occurrences, then order by descending count. Ties keep the order
/// in which values were first seen.
fn ranked_counts<T, I>(items: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut position: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();
    for item in items {
        match position.get(&item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                position.insert(item.clone(), counts.len());
                counts.push((item, 1));
            }
        }
    }
    // sort_by is stable, which is what keeps first-seen order on ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Records per specialty, most frequent first, at most `limit` rows.
pub fn specialty_distribution(view: &DatasetView<'_>, limit: usize) -> Vec<RankedCount> {
    let Some(values) = view.column(MEDICAL_SPECIALTY) else {
        return Vec::new();
    };
    ranked_counts(values.filter(|v| !v.is_null()))
        .into_iter()
        .take(limit)
        .map(|(value, count)| RankedCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

/// All keyword tokens in view order: the keywords cells joined by spaces,
/// lowercased, split into words of three or more characters.
pub fn keyword_tokens(view: &DatasetView<'_>) -> Vec<String> {
    let Some(values) = view.column(KEYWORDS) else {
        return Vec::new();
    };
    let blob = values
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    TOKEN
        .find_iter(&blob)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The `limit` most common keyword tokens.
pub fn keyword_frequency(view: &DatasetView<'_>, limit: usize) -> FrequencyTable {
    ranked_counts(keyword_tokens(view))
        .into_iter()
        .take(limit)
        .map(|(value, count)| RankedCount { value, count })
        .collect()
}

// ---------------------------------------------------------------------------
// Insights & histogram
// ---------------------------------------------------------------------------

pub fn insights(view: &DatasetView<'_>) -> Insights {
    Insights {
        top_specialty: specialty_distribution(view, 1).into_iter().next(),
        max_transcription_length: max_integer(view, TRANSCRIPTION_LENGTH),
        max_keywords: max_integer(view, KEYWORDS_COUNT),
    }
}

/// Equal-width histogram of `transcription_length`. The last bin is closed
/// on both ends so the maximum lands in it.
pub fn length_histogram(view: &DatasetView<'_>, bins: usize) -> Vec<HistogramBin> {
    let values: Vec<f64> = match view.column(TRANSCRIPTION_LENGTH) {
        Some(column) => column.filter_map(CellValue::as_f64).collect(),
        None => return Vec::new(),
    };
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max == min {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut hist: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for v in values {
        let i = (((v - min) / width) as usize).min(bins - 1);
        hist[i].count += 1;
    }
    hist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordCountPolicy;
    use crate::data::filter::{filtered_indices, SpecialtyFilter};
    use crate::data::loader::load_csv_bytes;
    use crate::data::model::Dataset;
    use crate::data::normalize::normalize;

    const SCENARIO: &str = "medical_specialty,transcription,keywords\n\
        Cardiology,abcde,\"heart,lung\"\n\
        Cardiology,ab,heart\n\
        Neurology,abcdefgh,brain\n";

    fn load(csv: &str) -> Dataset {
        normalize(
            load_csv_bytes(csv.as_bytes()).unwrap(),
            KeywordCountPolicy::EmptyAsZero,
        )
    }

    #[test]
    fn summary_over_everything() {
        let ds = load(SCENARIO);
        let report = summarize(&DatasetView::full(&ds));
        assert_eq!(
            report,
            SummaryReport {
                total_records: 3,
                specialties_count: 2,
                avg_transcription_length: 5,
                avg_keywords: 1.3,
            }
        );
    }

    #[test]
    fn summary_over_one_specialty() {
        let ds = load(SCENARIO);
        let idx = filtered_indices(&ds, &SpecialtyFilter::parse("Cardiology"));
        let report = summarize(&DatasetView::with_indices(&ds, &idx));
        assert_eq!(report.total_records, 2);
        assert_eq!(report.specialties_count, 1);
        assert_eq!(report.avg_transcription_length, 3);
        assert_eq!(report.avg_keywords, 1.5);
    }

    #[test]
    fn avg_keywords_rounds_half_to_even() {
        // Counts 1, 1, 1, 2 average to 1.25.
        let ds = load("keywords\nheart\nlung\nbrain\n\"knee,hip\"\n");
        assert_eq!(summarize(&DatasetView::full(&ds)).avg_keywords, 1.2);

        // 1.75 rounds up to the even neighbour.
        let ds = load("keywords\nheart\n\"knee,hip\"\n\"knee,hip\"\n\"knee,hip\"\n");
        assert_eq!(summarize(&DatasetView::full(&ds)).avg_keywords, 1.8);
    }

    #[test]
    fn empty_view_summarizes_to_zero() {
        let ds = load(SCENARIO);
        let idx: Vec<usize> = Vec::new();
        let view = DatasetView::with_indices(&ds, &idx);
        let report = summarize(&view);
        assert_eq!(report.total_records, 0);
        assert_eq!(report.specialties_count, 0);
        assert_eq!(report.avg_transcription_length, 0);
        assert_eq!(report.avg_keywords, 0.0);
        assert!(specialty_distribution(&view, 10).is_empty());
        assert!(keyword_frequency(&view, 15).is_empty());
        assert!(length_histogram(&view, 20).is_empty());
        assert_eq!(insights(&view).top_specialty, None);
    }

    #[test]
    fn missing_columns_degrade_to_zero() {
        let ds = load("sample_name\na\nb\n");
        let view = DatasetView::full(&ds);
        let report = summarize(&view);
        assert_eq!(report.total_records, 2);
        assert_eq!(report.specialties_count, 0);
        assert_eq!(report.avg_transcription_length, 0);
        assert_eq!(report.avg_keywords, 0.0);
        assert!(keyword_tokens(&view).is_empty());
    }

    #[test]
    fn distribution_ties_keep_first_seen_order() {
        let ds = load("medical_specialty\nUrology\nRadiology\nRadiology\nUrology\nSurgery\nSurgery\nSurgery\n");
        let dist = specialty_distribution(&DatasetView::full(&ds), 10);
        let pairs: Vec<(&str, usize)> = dist.iter().map(|r| (r.value.as_str(), r.count)).collect();
        assert_eq!(pairs, vec![("Surgery", 3), ("Urology", 2), ("Radiology", 2)]);
    }

    #[test]
    fn distribution_is_capped() {
        let csv: String = std::iter::once("medical_specialty".to_string())
            .chain((0..12).map(|i| format!("S{i}")))
            .collect::<Vec<_>>()
            .join("\n");
        let ds = load(&csv);
        assert_eq!(specialty_distribution(&DatasetView::full(&ds), 10).len(), 10);
    }

    #[test]
    fn keyword_tokens_are_lowercase_words_of_three_or_more() {
        let ds = load("keywords\n\"Heart, lung, MRI\"\n\"ct, heart_rate, Heart\"\n");
        let tokens = keyword_tokens(&DatasetView::full(&ds));
        assert_eq!(tokens, vec!["heart", "lung", "mri", "heart_rate", "heart"]);
        let table = keyword_frequency(&DatasetView::full(&ds), 15);
        assert_eq!(
            table[0],
            RankedCount {
                value: "heart".into(),
                count: 2
            }
        );
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn blank_keywords_give_an_empty_table() {
        let ds = load("keywords,id\n,1\n  ,2\n");
        assert!(keyword_frequency(&DatasetView::full(&ds), 15).is_empty());
    }

    #[test]
    fn insights_report_mode_and_maxima() {
        let ds = load(SCENARIO);
        let found = insights(&DatasetView::full(&ds));
        assert_eq!(
            found.top_specialty,
            Some(RankedCount {
                value: "Cardiology".into(),
                count: 2
            })
        );
        assert_eq!(found.max_transcription_length, Some(8));
        assert_eq!(found.max_keywords, Some(2));
    }

    #[test]
    fn histogram_puts_the_maximum_in_the_last_bin() {
        let ds = load(SCENARIO);
        let hist = length_histogram(&DatasetView::full(&ds), 3);
        assert_eq!(hist.len(), 3);
        assert_eq!(hist[0].lower, 2.0);
        assert_eq!(hist[2].upper, 8.0);
        let counts: Vec<usize> = hist.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 1, 1]);
    }

    #[test]
    fn histogram_of_identical_lengths_is_one_bin() {
        let ds = load("transcription,id\nabc,1\nxyz,2\n");
        let hist = length_histogram(&DatasetView::full(&ds), 20);
        assert_eq!(hist.len(), 1);
        assert_eq!(hist[0].count, 2);
    }
}

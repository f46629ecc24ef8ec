//! Plain-text and JSON renderings of a session's current view.

use std::fmt;

use serde::Serialize;

use crate::data::stats::{FrequencyTable, HistogramBin, Insights, RankedCount, SummaryReport};
use crate::export::Preview;
use crate::state::Session;

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub filter: String,
    pub summary: SummaryReport,
    pub specialties: Vec<RankedCount>,
    pub top_keywords: FrequencyTable,
    pub insights: Insights,
    pub length_histogram: Vec<HistogramBin>,
    #[serde(skip)]
    pub preview: Option<Preview>,
}

impl Snapshot {
    /// Capture the session's current view. `None` before any upload.
    pub fn capture(session: &Session, preview_rows: Option<usize>) -> Option<Self> {
        Some(Snapshot {
            filter: session.filter().to_string(),
            summary: session.summary()?,
            specialties: session.specialty_distribution()?,
            top_keywords: session.top_keywords()?,
            insights: session.insights()?,
            length_histogram: session.length_histogram()?,
            preview: session.preview(preview_rows),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Specialty filter: {}", self.filter)?;
        writeln!(f)?;
        writeln!(f, "Key statistics")?;
        writeln!(f, "  Total records      {}", s.total_records)?;
        writeln!(f, "  Specialties        {}", s.specialties_count)?;
        writeln!(f, "  Avg text length    {}", s.avg_transcription_length)?;
        writeln!(f, "  Avg keywords       {:.1}", s.avg_keywords)?;

        ranked_section(f, "Medical specialties", &self.specialties)?;
        ranked_section(f, "Top keywords", &self.top_keywords)?;

        writeln!(f)?;
        writeln!(f, "Insights")?;
        match &self.insights.top_specialty {
            Some(top) => writeln!(f, "  Most common specialty  {} ({} records)", top.value, top.count)?,
            None => writeln!(f, "  Most common specialty  -")?,
        }
        if let Some(max) = self.insights.max_transcription_length {
            writeln!(f, "  Longest transcription  {max} characters")?;
        }
        if let Some(max) = self.insights.max_keywords {
            writeln!(f, "  Most keywords          {max}")?;
        }

        if !self.length_histogram.is_empty() {
            writeln!(f)?;
            writeln!(f, "Transcription length distribution")?;
            for bin in &self.length_histogram {
                writeln!(f, "  {:>10.1} .. {:>10.1}  {}", bin.lower, bin.upper, bin.count)?;
            }
        }

        if let Some(preview) = &self.preview {
            writeln!(f)?;
            writeln!(f, "Data preview")?;
            writeln!(f, "  {}", preview.columns.join(" | "))?;
            for row in &preview.rows {
                let cells: Vec<String> = row.iter().map(|c| truncate(&c.to_string(), 40)).collect();
                writeln!(f, "  {}", cells.join(" | "))?;
            }
        }
        Ok(())
    }
}

fn ranked_section(f: &mut fmt::Formatter<'_>, title: &str, rows: &[RankedCount]) -> fmt::Result {
    writeln!(f)?;
    writeln!(f, "{title}")?;
    if rows.is_empty() {
        writeln!(f, "  (none)")?;
    }
    for row in rows {
        writeln!(f, "  {:<32} {}", row.value, row.count)?;
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars - 1).collect();
    short.push('…');
    short
}

// Search analytics module
// Query rows from Search Console and their rendering for the prompt

pub mod search_console;


use chrono::{Days, NaiveDate};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub use search_console::SearchConsoleClient;

/// Number of rows handed to the prompt builder
pub const PROMPT_ROW_LIMIT: usize = 15;
/// Length of the reporting window, ending today
pub const REPORTING_WINDOW_DAYS: u64 = 28;

/// Search performance of a single query over the reporting window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    pub query: String,
    pub clicks: u64,
    pub impressions: u64,
    /// Click-through rate as a percentage, rounded to 2 decimals
    pub ctr: f64,
    /// Average position, rounded to 1 decimal
    pub position: f64,
}

/// Inclusive date range covered by an analytics query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// The last [`REPORTING_WINDOW_DAYS`] days ending on `today`
    #[inline]
    pub fn last_28_days(today: NaiveDate) -> Self {
        Self {
            start: today
                .checked_sub_days(Days::new(REPORTING_WINDOW_DAYS))
                .unwrap_or(NaiveDate::MIN),
            end: today,
        }
    }
}

/// Sort rows by descending impressions and keep the first `limit`.
/// Rows with equal impressions keep their original order.
#[inline]
pub fn top_queries(mut rows: Vec<QueryRow>, limit: usize) -> Vec<QueryRow> {
    rows.sort_by(|a, b| b.impressions.cmp(&a.impressions));
    rows.truncate(limit);
    rows
}

/// Render rows as a pipe-delimited text table
#[inline]
pub fn render_query_table(rows: &[QueryRow]) -> String {
    let header = "query | clicks | impressions | ctr (%) | position";
    let body = rows
        .iter()
        .map(|row| {
            format!(
                "{} | {} | {} | {:.2} | {:.1}",
                row.query, row.clicks, row.impressions, row.ctr, row.position
            )
        })
        .join("\n");

    if body.is_empty() {
        header.to_string()
    } else {
        format!("{header}\n{body}")
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

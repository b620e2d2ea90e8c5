//! Domain types shared across the dashboard data layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from country display name to ISO-3166 alpha-3 code.
///
/// A `BTreeMap` keeps the directory sorted by display name, which is the
/// presentation order everywhere it is shown. Built fresh per filter
/// selection; never mutated in place.
pub type CountryDirectory = BTreeMap<String, String>;

/// One observation of one indicator for one country and year.
///
/// Only produced where the upstream reported a non-null value; absent
/// (country, year) combinations simply do not appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub country: String,
    pub country_code: String,
    pub year: i32,
    pub value: f64,
}

/// Sparse table of records for a single indicator.
///
/// Not guaranteed sorted; callers order as needed.
pub type IndicatorTable = Vec<IndicatorRecord>;

/// A paired observation of two indicators for one country at one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedObservation {
    pub country: String,
    pub x: f64,
    pub y: f64,
}

/// Summary statistics over the most recent year present in a table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub latest_year: i32,
    pub count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

/// Compute summary statistics for the latest year in `table`.
///
/// Returns `None` on an empty table, the canonical "no data" outcome.
pub fn summarize_latest(table: &[IndicatorRecord]) -> Option<SeriesSummary> {
    let latest_year = table.iter().map(|r| r.year).max()?;
    let values: Vec<f64> = table
        .iter()
        .filter(|r| r.year == latest_year)
        .map(|r| r.value)
        .collect();

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    Some(SeriesSummary {
        latest_year,
        count,
        mean,
        max,
        min,
    })
}

/// Sort a table by country ascending, then year descending, the order
/// the raw-data view presents.
pub fn sort_for_display(table: &mut IndicatorTable) {
    table.sort_by(|a, b| a.country.cmp(&b.country).then_with(|| b.year.cmp(&a.year)));
}

//! Cross-indicator join for correlation views.

use std::collections::HashMap;

use common::{IndicatorRecord, JoinedObservation};

/// Pair two indicator tables at one target year.
///
/// Inner join keyed by country display name: only countries with a
/// value in both tables for `year` appear, sorted by name. An empty
/// result means "insufficient overlapping data", not an error.
///
/// Known limitation: the join key is the display name, not the ISO
/// code, so two sources spelling the same country differently silently
/// drop it from the result.
pub fn join_at_year(
    table_x: &[IndicatorRecord],
    table_y: &[IndicatorRecord],
    year: i32,
) -> Vec<JoinedObservation> {
    let xs: HashMap<&str, f64> = table_x
        .iter()
        .filter(|r| r.year == year)
        .map(|r| (r.country.as_str(), r.value))
        .collect();

    let mut joined: Vec<JoinedObservation> = table_y
        .iter()
        .filter(|r| r.year == year)
        .filter_map(|r| {
            xs.get(r.country.as_str()).map(|&x| JoinedObservation {
                country: r.country.clone(),
                x,
                y: r.value,
            })
        })
        .collect();

    joined.sort_by(|a, b| a.country.cmp(&b.country));
    joined
}

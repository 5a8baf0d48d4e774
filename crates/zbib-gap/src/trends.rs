//! Temporal trends over per-dimension publication counts.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use zbib_classify::ClassificationTable;
use zbib_common::{DimensionGroup, Record};

/// year → number of records
pub type YearSeries = BTreeMap<i32, usize>;

/// Minimum relative change between windows to call a dimension emerging or declining.
const SHIFT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inflection {
    pub year: i32,
    pub growth_before: f64,
    pub growth_after: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRate {
    pub dimension: String,
    pub first_year: i32,
    pub last_year: i32,
    pub first_count: usize,
    pub last_count: usize,
    /// Compound annual growth rate; 0 when the first count is 0.
    pub cagr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendShift {
    pub dimension: String,
    pub prior_mean: f64,
    pub recent_mean: f64,
    pub change_pct: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Largest increase first.
    pub emerging: Vec<TrendShift>,
    /// Largest decrease first.
    pub declining: Vec<TrendShift>,
}

/// Per-dimension year series for `group`. Records without a year are skipped;
/// dimensions with no dated record are absent.
pub fn year_series(
    records: &[Record],
    table: &ClassificationTable,
    group: DimensionGroup,
) -> BTreeMap<String, YearSeries> {
    let mut series: BTreeMap<String, YearSeries> = BTreeMap::new();
    for record in records {
        let Some(year) = record.year else { continue };
        for name in table.labels(record, group) {
            *series.entry(name).or_default().entry(year).or_insert(0) += 1;
        }
    }
    series
}

/// Years where the year-over-year growth rate changes by at least `threshold`
/// compared with the previous year's growth. Growth from a zero count is 0.
pub fn detect_inflections(series: &YearSeries, threshold: f64) -> Vec<Inflection> {
    if series.len() < 3 {
        return Vec::new();
    }

    let points: Vec<(i32, usize)> = series.iter().map(|(y, c)| (*y, *c)).collect();
    let growths: Vec<(i32, f64)> = points
        .windows(2)
        .map(|w| {
            let (prev, (year, curr)) = (w[0].1, w[1]);
            let growth = if prev > 0 { (curr as f64 - prev as f64) / prev as f64 } else { 0.0 };
            (year, growth)
        })
        .collect();

    growths
        .windows(2)
        .filter_map(|w| {
            let (before, (year, after)) = (w[0].1, w[1]);
            let delta = after - before;
            (delta.abs() >= threshold).then_some(Inflection {
                year,
                growth_before: before,
                growth_after: after,
                delta,
            })
        })
        .collect()
}

/// Union of the years present in any series, ascending.
fn year_axis(series: &BTreeMap<String, YearSeries>) -> Vec<i32> {
    series
        .values()
        .flat_map(|s| s.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn count_at(series: &YearSeries, year: i32) -> usize {
    series.get(&year).copied().unwrap_or(0)
}

/// CAGR per dimension over the shared year axis, highest first.
pub fn growth_rates(series: &BTreeMap<String, YearSeries>) -> Vec<GrowthRate> {
    let axis = year_axis(series);
    let (Some(&first_year), Some(&last_year)) = (axis.first(), axis.last()) else {
        return Vec::new();
    };
    if axis.len() < 2 {
        return Vec::new();
    }

    let span = (last_year - first_year) as f64;
    let mut rates: Vec<GrowthRate> = series
        .iter()
        .map(|(dimension, s)| {
            let first_count = count_at(s, first_year);
            let last_count = count_at(s, last_year);
            let cagr = if first_count > 0 && span > 0.0 {
                (last_count as f64 / first_count as f64).powf(1.0 / span) - 1.0
            } else {
                0.0
            };
            GrowthRate {
                dimension: dimension.clone(),
                first_year,
                last_year,
                first_count,
                last_count,
                cagr,
            }
        })
        .collect();

    rates.sort_by(|a, b| b.cagr.total_cmp(&a.cagr));
    rates
}

/// Compare the mean count of the last `recent` years with the `recent` years
/// before them. When the axis is shorter than two windows, each window is
/// half the axis.
pub fn emerging_declining(series: &BTreeMap<String, YearSeries>, recent: usize) -> TrendSummary {
    let axis = year_axis(series);
    if axis.is_empty() {
        return TrendSummary::default();
    }

    let window = if axis.len() < recent * 2 { axis.len() / 2 } else { recent };
    let (recent_years, prior_years) = if window == 0 {
        (&axis[..], &axis[..0])
    } else {
        let n = axis.len();
        (&axis[n - window..], &axis[n - 2 * window..n - window])
    };

    let mean = |s: &YearSeries, years: &[i32]| -> f64 {
        if years.is_empty() {
            return 0.0;
        }
        years.iter().map(|y| count_at(s, *y) as f64).sum::<f64>() / years.len() as f64
    };

    let mut summary = TrendSummary::default();
    for (dimension, s) in series {
        let recent_mean = mean(s, recent_years);
        let prior_mean = mean(s, prior_years);
        let change = if prior_mean > 0.0 {
            (recent_mean - prior_mean) / prior_mean
        } else if recent_mean > 0.0 {
            1.0
        } else {
            0.0
        };
        let shift = TrendShift {
            dimension: dimension.clone(),
            prior_mean,
            recent_mean,
            change_pct: change * 100.0,
        };
        if change > SHIFT_THRESHOLD {
            summary.emerging.push(shift);
        } else if change < -SHIFT_THRESHOLD {
            summary.declining.push(shift);
        }
    }

    summary.emerging.sort_by(|a, b| b.change_pct.total_cmp(&a.change_pct));
    summary.declining.sort_by(|a, b| a.change_pct.total_cmp(&b.change_pct));
    summary
}

//! zbib-gap: population-level analysis (gap matrix, dimension cross-tab, temporal trends).

pub mod matrix;
pub mod crosstab;
pub mod trends;

pub use matrix::{find_gaps, Combination, GapDetector, GapMatrix, GapReport, DEFAULT_GAP_THRESHOLD};
pub use crosstab::{cross_tab, CrossTab, OTHER_ROW};
pub use trends::{
    detect_inflections, emerging_declining, growth_rates, year_series, GrowthRate, Inflection,
    TrendShift, TrendSummary, YearSeries,
};

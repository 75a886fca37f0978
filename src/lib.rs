//! # SEO Forecast
//!
//! `seo_forecast_workspace` ties together the crates of the workspace:
//! [`rank_math`] for the CTR curve and position projection, and
//! [`traffic_forecast`] for the forecast runs built on top of it.
//!
//! ## Example
//!
//! ```
//! use seo_forecast_workspace::{summarize, KeywordRecord, Scenario};
//!
//! let records = vec![KeywordRecord::new("blue widgets", 15.0, 1000)];
//! let summaries = summarize(records, Scenario::Moderate)?;
//! assert_eq!(summaries.len(), 3);
//! # Ok::<(), seo_forecast_workspace::ForecastError>(())
//! ```

pub use rank_math;
pub use traffic_forecast;

pub use traffic_forecast::{
    ForecastError, ForecastReport, ForecastRequest, Forecaster, HorizonSummary, KeywordRecord,
    Scenario,
};

/// Runs a forecast over the default horizons and keeps only the per-horizon totals.
///
/// # Examples
///
/// ```
/// use seo_forecast_workspace::{summarize, KeywordRecord, Scenario};
///
/// let records = vec![KeywordRecord::new("blue widgets", 15.0, 1000)];
/// let summaries = summarize(records, Scenario::Aggressive)?;
///
/// let last = summaries.last().unwrap();
/// assert_eq!(last.horizon_days, 360);
/// assert_eq!(last.projected_top_keywords, 1);
/// # Ok::<(), seo_forecast_workspace::ForecastError>(())
/// ```
pub fn summarize(
    records: Vec<KeywordRecord>,
    scenario: Scenario,
) -> traffic_forecast::Result<Vec<HorizonSummary>> {
    let report = Forecaster::default().run(&ForecastRequest::new(records, scenario))?;
    Ok(report.aggregate)
}

/// Formats one horizon summary as a single report line.
///
/// # Examples
///
/// ```
/// use seo_forecast_workspace::{describe, summarize, KeywordRecord, Scenario};
///
/// let records = vec![KeywordRecord::new("blue widgets", 15.0, 1000)];
/// let summaries = summarize(records, Scenario::Moderate)?;
/// assert!(describe(&summaries[0]).starts_with("90 days:"));
/// # Ok::<(), seo_forecast_workspace::ForecastError>(())
/// ```
pub fn describe(summary: &HorizonSummary) -> String {
    format!(
        "{} days: {:.0} -> {:.0} clicks ({:+.1}%), ${:.2} -> ${:.2}, top keywords {} -> {}",
        summary.horizon_days,
        summary.total_current_clicks,
        summary.total_projected_clicks,
        summary.clicks_increase_pct(),
        summary.total_current_value,
        summary.total_projected_value,
        summary.current_top_keywords,
        summary.projected_top_keywords
    )
}

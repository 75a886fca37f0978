//! Planning views built from forecast runs: scenario grids, monthly timelines, ROI

use crate::error::{ForecastError, Result};
use crate::forecast::{ForecastReport, ForecastRequest, Forecaster};
use crate::keyword::KeywordRecord;
use crate::scenario::{Scenario, ScenarioConfig};
use crate::utils::safe_div;
use serde::{Deserialize, Serialize};

/// Horizon used for annual ROI figures
pub const ROI_HORIZON_DAYS: u32 = 360;

/// Days per timeline month
pub const TIMELINE_MONTH_DAYS: u32 = 30;

/// One named scenario and its forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub scenario: Scenario,
    pub label: String,
    pub report: ForecastReport,
}

/// Forecast every named scenario over the same horizons
///
/// The CTR curve is built once and shared by all three runs.
pub fn scenario_grid(
    forecaster: &Forecaster,
    records: &[KeywordRecord],
    horizons: &[u32],
) -> Result<Vec<ScenarioComparison>> {
    let curve = forecaster.build_curve(records);
    let table = &forecaster.settings().scenarios;

    Scenario::NAMED
        .iter()
        .map(|&scenario| {
            let request = ForecastRequest::new(records.to_vec(), scenario)
                .with_horizons(horizons.to_vec());
            let report = forecaster.run_with_curve(&request, &curve)?;

            Ok(ScenarioComparison {
                scenario,
                label: scenario.label(table),
                report,
            })
        })
        .collect()
}

/// Totals at the end of one timeline month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub month: u32,
    pub days: u32,
    pub current_clicks: f64,
    pub projected_clicks: f64,
    pub projected_value: f64,
    pub top_keywords: usize,
}

/// Month-by-month forecast for `months` months
///
/// All months run in a single forecast, so the last month realizes the
/// full scenario improvement.
pub fn timeline(
    forecaster: &Forecaster,
    records: &[KeywordRecord],
    scenario: ScenarioConfig,
    months: u32,
) -> Result<Vec<TimelinePoint>> {
    if months == 0 {
        return Err(ForecastError::InvalidParameter(
            "Timeline needs at least one month".to_string(),
        ));
    }

    let horizons: Vec<u32> = (1..=months).map(|m| m * TIMELINE_MONTH_DAYS).collect();
    let request = ForecastRequest::new(records.to_vec(), scenario).with_horizons(horizons);
    let report = forecaster.run(&request)?;

    Ok(report
        .aggregate
        .iter()
        .map(|summary| TimelinePoint {
            month: summary.horizon_days / TIMELINE_MONTH_DAYS,
            days: summary.horizon_days,
            current_clicks: summary.total_current_clicks,
            projected_clicks: summary.total_projected_clicks,
            projected_value: summary.total_projected_value,
            top_keywords: summary.projected_top_keywords,
        })
        .collect())
}

/// Return on an SEO investment over one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiEstimate {
    pub investment: f64,
    /// Projected traffic value over the year
    pub annual_value: f64,
    /// Projected minus baseline clicks over the year
    pub annual_click_increase: f64,
    pub roi_pct: f64,
    pub payback_months: f64,
    pub monthly_value: f64,
}

/// ROI of `investment` under a scenario, measured at `ROI_HORIZON_DAYS`
pub fn roi_potential(
    forecaster: &Forecaster,
    records: &[KeywordRecord],
    scenario: ScenarioConfig,
    investment: f64,
) -> Result<RoiEstimate> {
    if !investment.is_finite() || investment < 0.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "Investment must be a non-negative amount, got {}",
            investment
        )));
    }

    let request =
        ForecastRequest::new(records.to_vec(), scenario).with_horizons(vec![ROI_HORIZON_DAYS]);
    let report = forecaster.run(&request)?;

    let (annual_value, annual_click_increase) = report
        .summary_for(ROI_HORIZON_DAYS)
        .map(|s| (s.total_projected_value, s.total_projected_clicks - s.total_current_clicks))
        .unwrap_or((0.0, 0.0));

    let monthly_value = annual_value / 12.0;

    Ok(RoiEstimate {
        investment,
        annual_value,
        annual_click_increase,
        roi_pct: safe_div(annual_value - investment, investment.max(1.0), 0.0) * 100.0,
        payback_months: safe_div(investment, monthly_value.max(1.0), 0.0),
        monthly_value,
    })
}

//! Forecast orchestration
//!
//! A run builds (or receives) one CTR curve, then walks every keyword record
//! in input order and every horizon in request order:
//! project the position, estimate traffic, price the clicks, append a row.
//! Per-horizon aggregates are summed from the finished rows.

use crate::config::{ForecastSettings, DEFAULT_HORIZONS};
use crate::error::{ForecastError, Result};
use crate::keyword::{KeywordRecord, SkippedRecord};
use crate::scenario::{Scenario, ScenarioConfig};
use crate::traffic::TrafficEstimator;
use crate::utils::percent_change;
use chrono::{Days, NaiveDate};
use rank_math::{CtrCurve, PositionProjector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Everything needed for one forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Keywords to forecast
    pub records: Vec<KeywordRecord>,
    /// Scenario and realization policy
    pub scenario: ScenarioConfig,
    /// Horizons in days, distinct and positive
    pub horizons: Vec<u32>,
    /// Start date used to stamp each horizon with a calendar date
    pub as_of: Option<NaiveDate>,
}

impl ForecastRequest {
    /// Request over the default horizons
    pub fn new(records: Vec<KeywordRecord>, scenario: impl Into<ScenarioConfig>) -> Self {
        Self {
            records,
            scenario: scenario.into(),
            horizons: DEFAULT_HORIZONS.to_vec(),
            as_of: None,
        }
    }

    /// Replace the horizons
    pub fn with_horizons(mut self, horizons: Vec<u32>) -> Self {
        self.horizons = horizons;
        self
    }

    /// Stamp rows with target dates counted from `as_of`
    pub fn with_as_of(mut self, as_of: NaiveDate) -> Self {
        self.as_of = Some(as_of);
        self
    }
}

/// Forecast for one keyword at one horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub query: String,
    pub url: Option<String>,
    pub horizon_days: u32,
    pub target_date: Option<NaiveDate>,
    pub search_volume: u64,
    pub current_position: f64,
    pub projected_position: f64,
    pub current_ctr: f64,
    pub projected_ctr: f64,
    /// Clicks over the horizon if the position stayed where it is
    pub current_clicks: f64,
    pub projected_clicks: f64,
    pub current_value: f64,
    pub projected_value: f64,
    pub cpc: f64,
    /// CPC category, `None` when the default CPC applied
    pub category: Option<String>,
}

impl ForecastResult {
    /// Projected minus baseline clicks
    pub fn click_increase(&self) -> f64 {
        self.projected_clicks - self.current_clicks
    }

    /// Click change in percent
    pub fn click_increase_pct(&self) -> f64 {
        percent_change(self.current_clicks, self.projected_clicks)
    }

    /// Whether this row was priced at the default CPC
    pub fn uses_default_cpc(&self) -> bool {
        self.category.is_none()
    }
}

/// Totals for one horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonSummary {
    pub horizon_days: u32,
    pub target_date: Option<NaiveDate>,
    /// Keywords contributing to this horizon
    pub keywords: usize,
    pub total_current_clicks: f64,
    pub total_projected_clicks: f64,
    pub total_current_value: f64,
    pub total_projected_value: f64,
    /// Keywords currently at or above the top threshold
    pub current_top_keywords: usize,
    /// Keywords projected at or above the top threshold
    pub projected_top_keywords: usize,
}

impl HorizonSummary {
    fn from_rows<'a, I>(horizon_days: u32, target_date: Option<NaiveDate>, rows: I, top_threshold: f64) -> Self
    where
        I: IntoIterator<Item = &'a ForecastResult>,
    {
        let mut summary = HorizonSummary {
            horizon_days,
            target_date,
            keywords: 0,
            total_current_clicks: 0.0,
            total_projected_clicks: 0.0,
            total_current_value: 0.0,
            total_projected_value: 0.0,
            current_top_keywords: 0,
            projected_top_keywords: 0,
        };

        for row in rows {
            summary.keywords += 1;
            summary.total_current_clicks += row.current_clicks;
            summary.total_projected_clicks += row.projected_clicks;
            summary.total_current_value += row.current_value;
            summary.total_projected_value += row.projected_value;
            if row.current_position <= top_threshold {
                summary.current_top_keywords += 1;
            }
            if row.projected_position <= top_threshold {
                summary.projected_top_keywords += 1;
            }
        }

        summary
    }

    /// Keywords entering (positive) or leaving (negative) the top
    pub fn top_increase(&self) -> i64 {
        self.projected_top_keywords as i64 - self.current_top_keywords as i64
    }

    /// Total click change in percent
    pub fn clicks_increase_pct(&self) -> f64 {
        percent_change(self.total_current_clicks, self.total_projected_clicks)
    }

    /// Total value change in percent
    pub fn value_increase_pct(&self) -> f64 {
        percent_change(self.total_current_value, self.total_projected_value)
    }
}

/// Output of a forecast run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub scenario: Scenario,
    /// Improvement in positions the scenario resolved to
    pub improvement: f64,
    pub horizons: Vec<u32>,
    /// One row per forecast keyword and horizon, keywords outer, horizons inner
    pub results: Vec<ForecastResult>,
    /// One summary per horizon, in request order
    pub aggregate: Vec<HorizonSummary>,
    /// Number of records left out
    pub skipped: usize,
    pub skipped_records: Vec<SkippedRecord>,
    /// Forecast keywords priced at the default CPC
    pub default_cpc_keywords: usize,
    /// CTR curve buckets that used fallback values
    pub fallback_buckets: usize,
}

impl ForecastReport {
    /// Rows for one horizon
    pub fn results_for(&self, horizon_days: u32) -> impl Iterator<Item = &ForecastResult> {
        self.results
            .iter()
            .filter(move |r| r.horizon_days == horizon_days)
    }

    /// Summary for one horizon
    pub fn summary_for(&self, horizon_days: u32) -> Option<&HorizonSummary> {
        self.aggregate
            .iter()
            .find(|s| s.horizon_days == horizon_days)
    }

    /// Number of keywords that were forecast
    pub fn forecast_keywords(&self) -> usize {
        if self.horizons.is_empty() {
            0
        } else {
            self.results.len() / self.horizons.len()
        }
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs forecasts with one set of immutable settings
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    settings: ForecastSettings,
}

impl Forecaster {
    /// Create a forecaster, validating the settings
    pub fn new(settings: ForecastSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Settings in use
    pub fn settings(&self) -> &ForecastSettings {
        &self.settings
    }

    /// Build the CTR curve from every record with usable click data
    pub fn build_curve(&self, records: &[KeywordRecord]) -> CtrCurve {
        CtrCurve::build(
            records.iter().filter_map(KeywordRecord::observation),
            &self.settings.curve,
        )
    }

    /// Build the curve from the request's records and run the forecast
    pub fn run(&self, request: &ForecastRequest) -> Result<ForecastReport> {
        let curve = self.build_curve(&request.records);
        self.run_with_curve(request, &curve)
    }

    /// Run the forecast against an already built curve
    pub fn run_with_curve(&self, request: &ForecastRequest, curve: &CtrCurve) -> Result<ForecastReport> {
        validate_horizons(&request.horizons)?;

        let scenario = request.scenario.scenario;
        let improvement = scenario.improvement(&self.settings.scenarios)?;

        let projector = PositionProjector::new(
            request.scenario.realization.clone(),
            self.settings.dampening,
            &request.horizons,
        );
        let fractions = projector
            .fractions(&request.horizons)
            .map_err(|e| ForecastError::InvalidScenario(e.to_string()))?;

        let estimator = TrafficEstimator::new(curve).with_volume_window(self.settings.volume_window_days);
        let target_dates: Vec<Option<NaiveDate>> = request
            .horizons
            .iter()
            .map(|&h| target_date(request.as_of, h))
            .collect();

        let mut results = Vec::with_capacity(request.records.len() * request.horizons.len());
        let mut skipped_records = Vec::new();
        let mut default_cpc_keywords = 0;

        for record in &request.records {
            let (position, volume) = match record.forecast_inputs() {
                Ok(inputs) => inputs,
                Err(reason) => {
                    log::warn!("Skipping keyword '{}': {}", record.query, reason);
                    skipped_records.push(SkippedRecord {
                        query: record.query.clone(),
                        reason,
                    });
                    continue;
                }
            };

            let rate = self.settings.cpc.rate_for(&record.query);
            if rate.is_default() {
                default_cpc_keywords += 1;
            }

            for ((&horizon, &date), &fraction) in request
                .horizons
                .iter()
                .zip(target_dates.iter())
                .zip(fractions.iter())
            {
                let projected_position = projector.project_at(position, improvement, fraction);
                let baseline = estimator.estimate(position, volume, horizon);
                let projected = estimator.estimate(projected_position, volume, horizon);

                results.push(ForecastResult {
                    query: record.query.clone(),
                    url: record.url.clone(),
                    horizon_days: horizon,
                    target_date: date,
                    search_volume: volume,
                    current_position: position,
                    projected_position,
                    current_ctr: baseline.ctr,
                    projected_ctr: projected.ctr,
                    current_clicks: baseline.clicks,
                    projected_clicks: projected.clicks,
                    current_value: rate.value(baseline.clicks),
                    projected_value: rate.value(projected.clicks),
                    cpc: rate.cpc,
                    category: rate.category.clone(),
                });
            }
        }

        let aggregate: Vec<HorizonSummary> = request
            .horizons
            .iter()
            .zip(target_dates.iter())
            .map(|(&horizon, &date)| {
                HorizonSummary::from_rows(
                    horizon,
                    date,
                    results.iter().filter(|r| r.horizon_days == horizon),
                    self.settings.top_threshold,
                )
            })
            .collect();

        if default_cpc_keywords > 0 {
            log::info!(
                "{} keywords matched no CPC category and use the default rate of {:.2}",
                default_cpc_keywords,
                self.settings.cpc.default_cpc()
            );
        }
        log::info!(
            "Forecast '{}' ({} positions): {} keywords over {} horizons, {} skipped, {} fallback curve buckets",
            scenario,
            improvement,
            request.records.len() - skipped_records.len(),
            request.horizons.len(),
            skipped_records.len(),
            curve.fallback_buckets()
        );

        Ok(ForecastReport {
            scenario,
            improvement,
            horizons: request.horizons.clone(),
            results,
            aggregate,
            skipped: skipped_records.len(),
            skipped_records,
            default_cpc_keywords,
            fallback_buckets: curve.fallback_buckets(),
        })
    }
}

/// Build a CTR curve with default settings
pub fn build_ctr_curve(records: &[KeywordRecord]) -> CtrCurve {
    Forecaster::default().build_curve(records)
}

/// Run a forecast with default settings
pub fn run_forecast(request: &ForecastRequest) -> Result<ForecastReport> {
    Forecaster::default().run(request)
}

fn validate_horizons(horizons: &[u32]) -> Result<()> {
    if horizons.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "At least one forecast horizon is required".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(horizons.len());
    for &horizon in horizons {
        if horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizons must be positive".to_string(),
            ));
        }
        if !seen.insert(horizon) {
            return Err(ForecastError::InvalidParameter(format!(
                "Duplicate forecast horizon: {} days",
                horizon
            )));
        }
    }

    Ok(())
}

fn target_date(as_of: Option<NaiveDate>, horizon_days: u32) -> Option<NaiveDate> {
    as_of.and_then(|d| d.checked_add_days(Days::new(horizon_days as u64)))
}

//! Forecast configuration supplied by the caller

use crate::error::{ForecastError, Result};
use crate::scenario::ScenarioTable;
use crate::traffic::VOLUME_WINDOW_DAYS;
use crate::value::CpcTable;
use rank_math::{CurveSettings, Dampening};
use serde::{Deserialize, Serialize};

/// Default forecast horizons in days
pub const DEFAULT_HORIZONS: [u32; 3] = [90, 120, 360];

/// Keywords ranked at or above this position count as top ten
pub const DEFAULT_TOP_THRESHOLD: f64 = 10.0;

/// Immutable settings shared by every forecast run of a `Forecaster`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    /// Improvement per named scenario
    pub scenarios: ScenarioTable,
    /// CPC by category
    pub cpc: CpcTable,
    /// CTR curve construction
    pub curve: CurveSettings,
    /// Position at or above which a keyword counts toward the top count
    pub top_threshold: f64,
    /// Days covered by one search volume figure
    pub volume_window_days: u32,
    /// Position-dependent scaling of improvements
    pub dampening: Dampening,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            scenarios: ScenarioTable::default(),
            cpc: CpcTable::default(),
            curve: CurveSettings::default(),
            top_threshold: DEFAULT_TOP_THRESHOLD,
            volume_window_days: VOLUME_WINDOW_DAYS,
            dampening: Dampening::None,
        }
    }
}

impl ForecastSettings {
    /// Replace the scenario table
    pub fn with_scenarios(mut self, scenarios: ScenarioTable) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Replace the CPC table
    pub fn with_cpc(mut self, cpc: CpcTable) -> Self {
        self.cpc = cpc;
        self
    }

    /// Replace the curve settings
    pub fn with_curve(mut self, curve: CurveSettings) -> Self {
        self.curve = curve;
        self
    }

    /// Replace the top threshold
    pub fn with_top_threshold(mut self, top_threshold: f64) -> Self {
        self.top_threshold = top_threshold;
        self
    }

    /// Replace the volume window
    pub fn with_volume_window(mut self, days: u32) -> Self {
        self.volume_window_days = days;
        self
    }

    /// Replace the dampening policy
    pub fn with_dampening(mut self, dampening: Dampening) -> Self {
        self.dampening = dampening;
        self
    }

    /// Check the settings once, before any run
    pub fn validate(&self) -> Result<()> {
        self.scenarios.validate()?;
        self.cpc.validate()?;
        self.curve
            .validate()
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;

        if !self.top_threshold.is_finite() || self.top_threshold < 1.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "Top threshold must be a position of at least 1, got {}",
                self.top_threshold
            )));
        }

        if self.volume_window_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Volume window must be at least one day".to_string(),
            ));
        }

        Ok(())
    }
}

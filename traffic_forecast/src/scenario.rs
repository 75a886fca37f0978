//! Ranking improvement scenarios

use crate::error::{ForecastError, Result};
use rank_math::Realization;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named assumption about average ranking improvement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Small, safe gains
    Conservative,
    /// Typical gains
    Moderate,
    /// Large gains
    Aggressive,
    /// Caller-supplied improvement in positions
    Custom(Option<f64>),
}

impl Scenario {
    /// The three scenarios with table-defined improvements
    pub const NAMED: [Scenario; 3] = [
        Scenario::Conservative,
        Scenario::Moderate,
        Scenario::Aggressive,
    ];

    /// Custom scenario with an explicit improvement
    pub fn custom(improvement: f64) -> Self {
        Scenario::Custom(Some(improvement))
    }

    /// Average number of positions gained under this scenario
    pub fn improvement(&self, table: &ScenarioTable) -> Result<f64> {
        match *self {
            Scenario::Conservative => Ok(table.conservative),
            Scenario::Moderate => Ok(table.moderate),
            Scenario::Aggressive => Ok(table.aggressive),
            Scenario::Custom(None) => Err(ForecastError::InvalidScenario(
                "Custom scenario requires an improvement value".to_string(),
            )),
            Scenario::Custom(Some(value)) if !value.is_finite() || value <= 0.0 => {
                Err(ForecastError::InvalidScenario(format!(
                    "Custom improvement must be a positive number of positions, got {}",
                    value
                )))
            }
            Scenario::Custom(Some(value)) => Ok(value),
        }
    }

    /// Human readable label such as "Moderate (10 positions)"
    pub fn label(&self, table: &ScenarioTable) -> String {
        match self.improvement(table) {
            Ok(value) => format!("{} ({} positions)", self.title(), value),
            Err(_) => self.title().to_string(),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Scenario::Conservative => "Conservative",
            Scenario::Moderate => "Moderate",
            Scenario::Aggressive => "Aggressive",
            Scenario::Custom(_) => "Custom",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::Conservative => write!(f, "conservative"),
            Scenario::Moderate => write!(f, "moderate"),
            Scenario::Aggressive => write!(f, "aggressive"),
            Scenario::Custom(Some(value)) => write!(f, "custom({})", value),
            Scenario::Custom(None) => write!(f, "custom"),
        }
    }
}

impl FromStr for Scenario {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "conservative" => Ok(Scenario::Conservative),
            "moderate" => Ok(Scenario::Moderate),
            "aggressive" => Ok(Scenario::Aggressive),
            "custom" => Ok(Scenario::Custom(None)),
            other => Err(ForecastError::InvalidScenario(format!(
                "Unknown scenario: {}",
                other
            ))),
        }
    }
}

/// Improvement in positions for each named scenario
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioTable {
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

impl Default for ScenarioTable {
    fn default() -> Self {
        Self {
            conservative: 5.0,
            moderate: 10.0,
            aggressive: 15.0,
        }
    }
}

impl ScenarioTable {
    /// Check every improvement is a finite number
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("conservative", self.conservative),
            ("moderate", self.moderate),
            ("aggressive", self.aggressive),
        ] {
            if !value.is_finite() {
                return Err(ForecastError::InvalidParameter(format!(
                    "Improvement for the {} scenario must be finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Scenario plus the realization policy fixed for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub scenario: Scenario,
    pub realization: Realization,
}

impl ScenarioConfig {
    /// Scenario with linear realization against the longest horizon
    pub fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            realization: Realization::Linear,
        }
    }

    /// Custom scenario with an explicit improvement
    pub fn custom(improvement: f64) -> Self {
        Self::new(Scenario::custom(improvement))
    }

    /// Use a fixed realization fraction per horizon instead of the linear policy
    pub fn with_realization(mut self, realization: Realization) -> Self {
        self.realization = realization;
        self
    }
}

impl From<Scenario> for ScenarioConfig {
    fn from(scenario: Scenario) -> Self {
        Self::new(scenario)
    }
}

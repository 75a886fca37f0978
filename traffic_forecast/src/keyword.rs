//! Keyword records consumed by the forecaster

use crate::error::{ForecastError, Result};
use rank_math::PositionObservation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One keyword joined from search-console and keyword-research data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordRecord {
    /// Search query, the join key between both sources
    pub query: String,
    /// Current average position, 1 is the top result
    pub current_position: Option<f64>,
    /// Monthly search volume
    pub search_volume: Option<u64>,
    /// Keyword difficulty in [0, 100]
    pub difficulty: f64,
    /// Observed clicks
    pub clicks: u64,
    /// Observed impressions
    pub impressions: u64,
    /// Observed click-through rate, if the source reported one
    pub observed_ctr: Option<f64>,
    /// Ranking landing page
    pub url: Option<String>,
}

impl KeywordRecord {
    /// Create a record with a position and search volume and no observed traffic
    pub fn new(query: impl Into<String>, current_position: f64, search_volume: u64) -> Self {
        Self {
            query: query.into(),
            current_position: Some(current_position),
            search_volume: Some(search_volume),
            difficulty: 0.0,
            clicks: 0,
            impressions: 0,
            observed_ctr: None,
            url: None,
        }
    }

    /// Set observed clicks and impressions
    pub fn with_clicks(mut self, clicks: u64, impressions: u64) -> Self {
        self.clicks = clicks;
        self.impressions = impressions;
        self
    }

    /// Set keyword difficulty
    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the observed click-through rate
    pub fn with_observed_ctr(mut self, ctr: f64) -> Self {
        self.observed_ctr = Some(ctr);
        self
    }

    /// Set the landing page
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Drop the search volume
    pub fn without_search_volume(mut self) -> Self {
        self.search_volume = None;
        self
    }

    /// Drop the current position
    pub fn without_position(mut self) -> Self {
        self.current_position = None;
        self
    }

    /// Observed CTR, falling back to clicks over impressions
    pub fn ctr(&self) -> Option<f64> {
        match self.observed_ctr {
            Some(ctr) => Some(ctr),
            None if self.impressions > 0 => Some(self.clicks as f64 / self.impressions as f64),
            None => None,
        }
    }

    /// Current position, when it is usable for projection
    pub fn ranked_position(&self) -> Option<f64> {
        self.current_position
            .filter(|p| p.is_finite() && *p >= 1.0)
    }

    /// Position and volume needed for a forecast, or why the record cannot be forecast
    pub fn forecast_inputs(&self) -> std::result::Result<(f64, u64), SkipReason> {
        if self.query.trim().is_empty() {
            return Err(SkipReason::EmptyQuery);
        }

        let position = match self.current_position {
            None => return Err(SkipReason::MissingPosition),
            Some(p) if !p.is_finite() || p < 1.0 => return Err(SkipReason::InvalidPosition),
            Some(p) => p,
        };

        let volume = self
            .search_volume
            .ok_or(SkipReason::MissingSearchVolume)?;

        if self.clicks > self.impressions {
            return Err(SkipReason::ClicksExceedImpressions);
        }

        Ok((position, volume))
    }

    /// Check that the record can be forecast
    pub fn validate(&self) -> Result<()> {
        self.forecast_inputs().map(|_| ()).map_err(|reason| {
            ForecastError::InvalidRecord(format!("'{}': {}", self.query, reason))
        })
    }

    /// Curve observation for this record
    ///
    /// Records without impressions or a usable position contribute nothing.
    /// When only a CTR was reported, clicks are derived from it.
    pub fn observation(&self) -> Option<PositionObservation> {
        let position = self.ranked_position()?;
        if self.impressions == 0 || self.clicks > self.impressions {
            return None;
        }

        let clicks = match (self.clicks, self.observed_ctr) {
            (0, Some(ctr)) if ctr.is_finite() && ctr > 0.0 => {
                (ctr.min(1.0) * self.impressions as f64).round() as u64
            }
            (clicks, _) => clicks,
        };

        Some(PositionObservation::new(position, clicks, self.impressions))
    }
}

/// Why a record was left out of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// Query text is blank
    EmptyQuery,
    /// No current position
    MissingPosition,
    /// Position is below 1 or not a number
    InvalidPosition,
    /// No search volume
    MissingSearchVolume,
    /// More clicks than impressions
    ClicksExceedImpressions,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::EmptyQuery => "empty query",
            SkipReason::MissingPosition => "missing current position",
            SkipReason::InvalidPosition => "current position below 1",
            SkipReason::MissingSearchVolume => "missing search volume",
            SkipReason::ClicksExceedImpressions => "clicks exceed impressions",
        };
        write!(f, "{}", text)
    }
}

/// A record excluded from a forecast run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Query of the excluded record
    pub query: String,
    /// Why it was excluded
    pub reason: SkipReason,
}

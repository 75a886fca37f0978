//! Click estimation from projected positions

use rank_math::CtrCurve;
use serde::{Deserialize, Serialize};

/// Days covered by a monthly search volume figure
pub const VOLUME_WINDOW_DAYS: u32 = 30;

/// Traffic expected over one horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficEstimate {
    /// Expected CTR at the position
    pub ctr: f64,
    /// Impressions over the horizon
    pub impressions: f64,
    /// Clicks over the horizon
    pub clicks: f64,
}

/// Turns positions and search volume into clicks using a shared curve
#[derive(Debug, Clone, Copy)]
pub struct TrafficEstimator<'a> {
    curve: &'a CtrCurve,
    volume_window_days: u32,
}

impl<'a> TrafficEstimator<'a> {
    /// Estimator for monthly search volumes
    pub fn new(curve: &'a CtrCurve) -> Self {
        Self {
            curve,
            volume_window_days: VOLUME_WINDOW_DAYS,
        }
    }

    /// Change how many days one search volume figure covers
    pub fn with_volume_window(mut self, days: u32) -> Self {
        self.volume_window_days = days.max(1);
        self
    }

    /// Impressions over a horizon, scaled linearly from the volume window
    pub fn impressions_for(&self, search_volume: u64, horizon_days: u32) -> f64 {
        if search_volume == 0 {
            return 0.0;
        }

        search_volume as f64 * horizon_days as f64 / self.volume_window_days as f64
    }

    /// Expected traffic at `position` over `horizon_days`
    pub fn estimate(&self, position: f64, search_volume: u64, horizon_days: u32) -> TrafficEstimate {
        let ctr = self.curve.ctr_at(position);
        let impressions = self.impressions_for(search_volume, horizon_days);

        TrafficEstimate {
            ctr,
            impressions,
            clicks: impressions * ctr,
        }
    }
}

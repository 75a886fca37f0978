//! Click-through-rate curve by search result position
//!
//! The curve maps integer position buckets 1 to 20, plus one tail bucket for
//! everything ranked below 20, to an expected CTR. Buckets are filled from
//! observed clicks and impressions when enough observations exist, and from
//! a fallback table otherwise. Values never increase with position.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Last bucket that holds a single ranked position
pub const LAST_RANKED_BUCKET: usize = 20;

/// Bucket collecting every position ranked below `LAST_RANKED_BUCKET`
pub const TAIL_BUCKET: usize = LAST_RANKED_BUCKET + 1;

/// Total number of buckets, including the tail
pub const BUCKET_COUNT: usize = TAIL_BUCKET;

/// Minimum observations a bucket needs before observed data replaces the fallback
pub const DEFAULT_MIN_SAMPLES: usize = 3;

/// Industry-typical organic CTR by position, last entry is the tail bucket
pub const FALLBACK_CTR: [f64; BUCKET_COUNT] = [
    0.315, 0.242, 0.185, 0.142, 0.109, 0.084, 0.065, 0.050, 0.039, 0.030, // 1-10
    0.023, 0.018, 0.014, 0.011, 0.008, 0.007, 0.006, 0.005, 0.004, 0.003, // 11-20
    0.001, // >20
];

/// A single observed ranking with its click data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionObservation {
    /// Average position, 1 is the top result
    pub position: f64,
    /// Observed clicks
    pub clicks: u64,
    /// Observed impressions
    pub impressions: u64,
}

impl PositionObservation {
    /// Create a new observation
    pub fn new(position: f64, clicks: u64, impressions: u64) -> Self {
        Self {
            position,
            clicks,
            impressions,
        }
    }
}

/// Where a bucket's CTR value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BucketSource {
    /// Aggregated from observed clicks and impressions
    Observed,
    /// Taken from the fallback table
    Fallback,
}

/// Settings used when building a curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSettings {
    min_samples_per_bucket: usize,
    fallback: Vec<f64>,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            min_samples_per_bucket: DEFAULT_MIN_SAMPLES,
            fallback: FALLBACK_CTR.to_vec(),
        }
    }
}

impl CurveSettings {
    /// Create settings with a custom fallback table
    ///
    /// The table must hold one CTR in [0, 1] for each of the `BUCKET_COUNT` buckets.
    pub fn new(min_samples_per_bucket: usize, fallback: Vec<f64>) -> Result<Self> {
        let settings = Self {
            min_samples_per_bucket,
            fallback,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check the fallback table, which may also arrive through deserialization
    pub fn validate(&self) -> Result<()> {
        if self.fallback.len() != BUCKET_COUNT {
            return Err(MathError::InvalidInput(format!(
                "Fallback curve needs {} values, got {}",
                BUCKET_COUNT,
                self.fallback.len()
            )));
        }

        if let Some((idx, value)) = self
            .fallback
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > 1.0)
        {
            return Err(MathError::OutOfRange(format!(
                "Fallback CTR for bucket {} must be within [0, 1], got {}",
                idx + 1,
                value
            )));
        }

        Ok(())
    }

    /// Replace the minimum observation count per bucket
    pub fn with_min_samples(mut self, min_samples_per_bucket: usize) -> Self {
        self.min_samples_per_bucket = min_samples_per_bucket;
        self
    }

    /// Minimum observation count per bucket
    pub fn min_samples_per_bucket(&self) -> usize {
        self.min_samples_per_bucket
    }

    /// Fallback CTR table
    pub fn fallback(&self) -> &[f64] {
        &self.fallback
    }
}

/// Expected CTR for each position bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveParts")]
pub struct CtrCurve {
    values: [f64; BUCKET_COUNT],
    sources: [BucketSource; BUCKET_COUNT],
    samples: [usize; BUCKET_COUNT],
}

impl Default for CtrCurve {
    fn default() -> Self {
        Self::fallback(&CurveSettings::default())
    }
}

impl CtrCurve {
    /// Curve made only of fallback values
    pub fn fallback(settings: &CurveSettings) -> Self {
        Self::build(std::iter::empty(), settings)
    }

    /// Build a curve from observed positions
    ///
    /// Observations with a position below 1, a non-finite position, or no
    /// impressions are ignored. A bucket uses observed data only when it has
    /// at least `min_samples_per_bucket` observations.
    pub fn build<I>(observations: I, settings: &CurveSettings) -> Self
    where
        I: IntoIterator<Item = PositionObservation>,
    {
        let mut clicks = [0u128; BUCKET_COUNT];
        let mut impressions = [0u128; BUCKET_COUNT];
        let mut samples = [0usize; BUCKET_COUNT];

        for obs in observations {
            if obs.impressions == 0 {
                continue;
            }
            if let Some(bucket) = Self::bucket_for(obs.position) {
                let idx = bucket - 1;
                clicks[idx] += u128::from(obs.clicks);
                impressions[idx] += u128::from(obs.impressions);
                samples[idx] += 1;
            }
        }

        let mut values = [0.0; BUCKET_COUNT];
        let mut sources = [BucketSource::Fallback; BUCKET_COUNT];

        for idx in 0..BUCKET_COUNT {
            let enough = samples[idx] >= settings.min_samples_per_bucket && impressions[idx] > 0;
            if enough {
                values[idx] = (clicks[idx] as f64 / impressions[idx] as f64).clamp(0.0, 1.0);
                sources[idx] = BucketSource::Observed;
            } else {
                values[idx] = settings.fallback.get(idx).copied().unwrap_or(FALLBACK_CTR[idx]);
            }
        }

        clamp_non_increasing(&mut values);

        let curve = Self {
            values,
            sources,
            samples,
        };

        log::debug!(
            "Built CTR curve: {} observed buckets, {} fallback buckets",
            BUCKET_COUNT - curve.fallback_buckets(),
            curve.fallback_buckets()
        );

        curve
    }

    /// Bucket number (1-based) for a position, `None` when the position is unusable
    pub fn bucket_for(position: f64) -> Option<usize> {
        if !position.is_finite() || position < 1.0 {
            return None;
        }

        let rounded = position.round() as usize;
        Some(rounded.min(TAIL_BUCKET))
    }

    /// Expected CTR at a position
    ///
    /// Positions are clamped to [1, `TAIL_BUCKET`]. Fractional positions are
    /// interpolated linearly between the two neighbouring buckets.
    pub fn ctr_at(&self, position: f64) -> f64 {
        if position.is_nan() {
            return self.values[TAIL_BUCKET - 1];
        }

        let clamped = position.clamp(1.0, TAIL_BUCKET as f64);
        let lower = clamped.floor();
        let fraction = clamped - lower;
        let lower_idx = lower as usize - 1;

        if fraction == 0.0 {
            return self.values[lower_idx];
        }

        let low = self.values[lower_idx];
        let high = self.values[lower_idx + 1];
        low + (high - low) * fraction
    }

    /// CTR stored for a bucket
    pub fn bucket_ctr(&self, bucket: usize) -> Option<f64> {
        bucket
            .checked_sub(1)
            .and_then(|idx| self.values.get(idx))
            .copied()
    }

    /// Source of a bucket's value
    pub fn bucket_source(&self, bucket: usize) -> Option<BucketSource> {
        bucket
            .checked_sub(1)
            .and_then(|idx| self.sources.get(idx))
            .copied()
    }

    /// Number of observations that landed in a bucket
    pub fn bucket_samples(&self, bucket: usize) -> Option<usize> {
        bucket
            .checked_sub(1)
            .and_then(|idx| self.samples.get(idx))
            .copied()
    }

    /// How many buckets fell back to the fallback table
    pub fn fallback_buckets(&self) -> usize {
        self.sources
            .iter()
            .filter(|s| **s == BucketSource::Fallback)
            .count()
    }

    /// Iterate over `(bucket, ctr, source)` in position order
    pub fn buckets(&self) -> impl Iterator<Item = (usize, f64, BucketSource)> + '_ {
        self.values
            .iter()
            .zip(self.sources.iter())
            .enumerate()
            .map(|(idx, (v, s))| (idx + 1, *v, *s))
    }
}

/// Forward pass: no bucket may beat the one above it
fn clamp_non_increasing(values: &mut [f64; BUCKET_COUNT]) {
    for idx in 1..BUCKET_COUNT {
        if values[idx] > values[idx - 1] {
            values[idx] = values[idx - 1];
        }
    }
}

/// Serialized form of a curve, checked before it becomes a `CtrCurve`
#[derive(Deserialize)]
struct CurveParts {
    values: [f64; BUCKET_COUNT],
    sources: [BucketSource; BUCKET_COUNT],
    samples: [usize; BUCKET_COUNT],
}

impl TryFrom<CurveParts> for CtrCurve {
    type Error = MathError;

    fn try_from(parts: CurveParts) -> Result<Self> {
        let mut values = parts.values;
        if let Some((idx, value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0 || **v > 1.0)
        {
            return Err(MathError::OutOfRange(format!(
                "CTR for bucket {} must be within [0, 1], got {}",
                idx + 1,
                value
            )));
        }

        clamp_non_increasing(&mut values);

        Ok(Self {
            values,
            sources: parts.sources,
            samples: parts.samples,
        })
    }
}

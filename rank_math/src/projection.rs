//! Ranking position projection over a forecast horizon
//!
//! Ranking gains accrue gradually. A horizon realizes a fraction of the
//! scenario improvement, either linearly against a reference horizon or
//! from an explicit per-horizon table. The projected position never goes
//! above rank 1.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Best possible ranking
pub const TOP_POSITION: f64 = 1.0;

/// How much of the scenario improvement a horizon realizes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Realization {
    /// `min(1, horizon / reference_horizon)`
    #[default]
    Linear,
    /// Fixed fraction per horizon in days
    Table(BTreeMap<u32, f64>),
}

impl Realization {
    /// Build a table policy, checking every fraction lies in [0, 1]
    pub fn table<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let table: BTreeMap<u32, f64> = entries.into_iter().collect();

        if table.is_empty() {
            return Err(MathError::InvalidInput(
                "Realization table must not be empty".to_string(),
            ));
        }

        for (&horizon, &fraction) in &table {
            if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                return Err(MathError::OutOfRange(format!(
                    "Realization fraction for {} days must be within [0, 1], got {}",
                    horizon, fraction
                )));
            }
        }

        Ok(Realization::Table(table))
    }

    /// Fraction realized at `horizon_days`
    pub fn fraction(&self, horizon_days: u32, reference_horizon_days: u32) -> Result<f64> {
        match self {
            Realization::Linear => Ok(realized_fraction(horizon_days, reference_horizon_days)),
            Realization::Table(table) => match table.get(&horizon_days).copied() {
                None => Err(MathError::InvalidInput(format!(
                    "No realization fraction for a {} day horizon",
                    horizon_days
                ))),
                // Tables built without `Realization::table` are unchecked
                Some(f) if !f.is_finite() || !(0.0..=1.0).contains(&f) => {
                    Err(MathError::OutOfRange(format!(
                        "Realization fraction for {} days must be within [0, 1], got {}",
                        horizon_days, f
                    )))
                }
                Some(f) => Ok(f),
            },
        }
    }
}

/// Extra scaling applied to the improvement depending on where a keyword ranks now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Dampening {
    /// Improvement applied as is
    #[default]
    None,
    /// Gains near the top are harder: x0.3 within the top 3, x0.6 within the top 10, x0.9 below
    ByCurrentPosition,
}

impl Dampening {
    /// Multiplier for a keyword currently at `current_position`
    pub fn factor(&self, current_position: f64) -> f64 {
        match self {
            Dampening::None => 1.0,
            Dampening::ByCurrentPosition => {
                if current_position <= 3.0 {
                    0.3
                } else if current_position <= 10.0 {
                    0.6
                } else {
                    0.9
                }
            }
        }
    }
}

/// Linear fraction of the improvement realized by a horizon
///
/// The reference horizon realizes exactly 1.0. A zero reference means the
/// full improvement applies immediately.
pub fn realized_fraction(horizon_days: u32, reference_horizon_days: u32) -> f64 {
    if reference_horizon_days == 0 || horizon_days >= reference_horizon_days {
        return 1.0;
    }

    horizon_days as f64 / reference_horizon_days as f64
}

/// Move a position by the realized share of an improvement
///
/// Positive improvement moves toward rank 1, negative improvement moves away.
/// The result is never better than rank 1.
pub fn project_with_fraction(current_position: f64, improvement: f64, fraction: f64) -> f64 {
    let realized = improvement * fraction;
    (current_position - realized).max(TOP_POSITION)
}

/// Project a position with the linear realization policy
pub fn project(
    current_position: f64,
    improvement: f64,
    horizon_days: u32,
    max_horizon_days: u32,
) -> f64 {
    let fraction = realized_fraction(horizon_days, max_horizon_days);
    project_with_fraction(current_position, improvement, fraction)
}

/// Position projector fixed for one forecast run
#[derive(Debug, Clone, PartialEq)]
pub struct PositionProjector {
    realization: Realization,
    dampening: Dampening,
    reference_horizon_days: u32,
}

impl PositionProjector {
    /// Create a projector whose reference is the longest of `horizons`
    pub fn new(realization: Realization, dampening: Dampening, horizons: &[u32]) -> Self {
        let reference_horizon_days = horizons.iter().copied().max().unwrap_or(0);

        Self {
            realization,
            dampening,
            reference_horizon_days,
        }
    }

    /// Horizon that realizes the full improvement under the linear policy
    pub fn reference_horizon_days(&self) -> u32 {
        self.reference_horizon_days
    }

    /// Fraction for every horizon, in order, failing on the first one the policy cannot resolve
    pub fn fractions(&self, horizons: &[u32]) -> Result<Vec<f64>> {
        horizons.iter().map(|&h| self.fraction(h)).collect()
    }

    /// Fraction of the improvement realized at a horizon
    pub fn fraction(&self, horizon_days: u32) -> Result<f64> {
        self.realization
            .fraction(horizon_days, self.reference_horizon_days)
    }

    /// Projected position at a horizon
    pub fn project(&self, current_position: f64, improvement: f64, horizon_days: u32) -> Result<f64> {
        let fraction = self.fraction(horizon_days)?;
        Ok(self.project_at(current_position, improvement, fraction))
    }

    /// Projected position for a fraction already resolved by `fractions`
    pub fn project_at(&self, current_position: f64, improvement: f64, fraction: f64) -> f64 {
        let improvement = improvement * self.dampening.factor(current_position);
        project_with_fraction(current_position, improvement, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_realized_fraction() {
        assert_eq!(realized_fraction(360, 360), 1.0);
        assert_eq!(realized_fraction(90, 360), 0.25);
        assert_abs_diff_eq!(realized_fraction(120, 360), 1.0 / 3.0, epsilon = 1e-12);
        assert_eq!(realized_fraction(400, 360), 1.0);
        assert_eq!(realized_fraction(30, 0), 1.0);
    }

    #[test]
    fn test_project_no_improvement() {
        for horizon in [30, 90, 120, 360] {
            assert_eq!(project(14.3, 0.0, horizon, 360), 14.3);
        }
    }

    #[test]
    fn test_project_reference_example() {
        // Moderate scenario, a quarter of the way to the reference horizon
        assert_abs_diff_eq!(project(15.0, 10.0, 90, 360), 12.5, epsilon = 1e-12);
        assert_abs_diff_eq!(project(15.0, 10.0, 360, 360), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_project_bounded_at_top() {
        assert_eq!(project(1.0, 5.0, 90, 360), 1.0);
        assert_eq!(project(1.0, 5.0, 360, 360), 1.0);
        assert_eq!(project(3.0, 15.0, 360, 360), 1.0);
    }

    #[test]
    fn test_project_regression() {
        assert_abs_diff_eq!(project(5.0, -4.0, 360, 360), 9.0, epsilon = 1e-12);
        assert_abs_diff_eq!(project(5.0, -4.0, 180, 360), 7.0, epsilon = 1e-12);
        assert_abs_diff_eq!(project(1.0, -2.0, 360, 360), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_table_realization() {
        let policy = Realization::table([(90, 0.5), (120, 0.6), (360, 0.8)]).unwrap();

        assert_eq!(policy.fraction(90, 360).unwrap(), 0.5);
        assert_eq!(policy.fraction(360, 360).unwrap(), 0.8);
        assert!(policy.fraction(30, 360).is_err());
    }

    #[test]
    fn test_table_validation() {
        assert!(Realization::table(Vec::<(u32, f64)>::new()).is_err());
        assert!(matches!(
            Realization::table([(90, 1.2)]),
            Err(MathError::OutOfRange(_))
        ));
        assert!(Realization::table([(90, f64::NAN)]).is_err());
    }

    #[test]
    fn test_dampening_factors() {
        let dampening = Dampening::ByCurrentPosition;
        assert_eq!(dampening.factor(2.0), 0.3);
        assert_eq!(dampening.factor(3.0), 0.3);
        assert_eq!(dampening.factor(8.0), 0.6);
        assert_eq!(dampening.factor(25.0), 0.9);
        assert_eq!(Dampening::None.factor(2.0), 1.0);
    }

    #[test]
    fn test_projector_uses_longest_horizon() {
        let projector = PositionProjector::new(Realization::Linear, Dampening::None, &[120, 90, 360]);

        assert_eq!(projector.reference_horizon_days(), 360);
        assert_eq!(projector.fraction(360).unwrap(), 1.0);
        assert_abs_diff_eq!(projector.project(15.0, 10.0, 90).unwrap(), 12.5, epsilon = 1e-12);
    }

    #[test]
    fn test_projector_with_dampening() {
        let projector =
            PositionProjector::new(Realization::Linear, Dampening::ByCurrentPosition, &[360]);

        // 10 positions scaled by 0.9 below the top 10
        assert_abs_diff_eq!(projector.project(20.0, 10.0, 360).unwrap(), 11.0, epsilon = 1e-12);
        // 10 positions scaled by 0.6 inside the top 10
        assert_abs_diff_eq!(projector.project(8.0, 10.0, 360).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_projector_resolves_table_fractions() {
        let policy = Realization::table([(90, 0.3), (360, 0.9)]).unwrap();
        let projector = PositionProjector::new(policy, Dampening::None, &[90, 360]);

        assert_eq!(projector.fractions(&[360, 90]).unwrap(), vec![0.9, 0.3]);
        assert!(projector.fractions(&[90, 120]).is_err());
        assert_abs_diff_eq!(projector.project_at(15.0, 10.0, 0.3), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unchecked_table_fraction_is_rejected() {
        let policy = Realization::Table(BTreeMap::from([(90, 1.5)]));

        assert!(matches!(policy.fraction(90, 360), Err(MathError::OutOfRange(_))));
    }
}

//! # Traffic Forecast
//!
//! A Rust library for forecasting organic search clicks and their monetary
//! value from ranking-improvement scenarios.
//!
//! ## Features
//!
//! - CTR curve built from observed search-console data, with a fallback curve
//! - Position projection per horizon for conservative, moderate, aggressive or custom scenarios
//! - Click and traffic value estimates per keyword and per horizon
//! - Opportunity, competitive and difficulty analysis of a keyword set
//! - Scenario grids, monthly timelines and ROI estimates
//! - CSV loading and merging of search-console and keyword-research exports
//!
//! ## Quick Start
//!
//! ```rust
//! use traffic_forecast::{run_forecast, ForecastRequest, KeywordRecord, Scenario};
//!
//! let records = vec![
//!     KeywordRecord::new("seo tools", 15.0, 1000).with_clicks(12, 900),
//!     KeywordRecord::new("keyword research", 8.0, 5400).with_clicks(200, 6000),
//! ];
//!
//! let request = ForecastRequest::new(records, Scenario::Moderate)
//!     .with_horizons(vec![90, 120, 360]);
//! let report = run_forecast(&request)?;
//!
//! assert_eq!(report.results.len(), 6);
//! assert_eq!(report.skipped, 0);
//! for summary in &report.aggregate {
//!     println!("{} days: {:.0} clicks", summary.horizon_days, summary.total_projected_clicks);
//! }
//! # Ok::<(), traffic_forecast::ForecastError>(())
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod keyword;
pub mod planning;
pub mod scenario;
pub mod traffic;
pub mod utils;
pub mod value;

// Re-export commonly used types
pub use crate::config::ForecastSettings;
pub use crate::data::DataLoader;
pub use crate::error::{ForecastError, Result};
pub use crate::forecast::{
    build_ctr_curve, run_forecast, ForecastReport, ForecastRequest, ForecastResult, Forecaster,
    HorizonSummary,
};
pub use crate::keyword::{KeywordRecord, SkipReason, SkippedRecord};
pub use crate::scenario::{Scenario, ScenarioConfig, ScenarioTable};
pub use crate::traffic::{TrafficEstimate, TrafficEstimator};
pub use crate::value::{CpcRate, CpcTable};
pub use rank_math::{CtrCurve, CurveSettings, Dampening, Realization};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

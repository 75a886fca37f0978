//! Utility functions for the traffic_forecast crate

/// Divide, returning `fallback` when the denominator is zero or the result is not finite
pub fn safe_div(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        return fallback;
    }

    let result = numerator / denominator;
    if result.is_finite() {
        result
    } else {
        fallback
    }
}

/// Percentage change from `before` to `after`, with `before` floored at 1
pub fn percent_change(before: f64, after: f64) -> f64 {
    safe_div(after - before, before.max(1.0), 0.0) * 100.0
}

/// Round for presentation only
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

//! Cost metrics computed over a dispatch window.
//!
//! Every helper takes the slice of timesteps that falls inside the scoring
//! horizon; callers are responsible for truncating the submitted week.

use super::types::{BatteryStatus, CostBreakdown, STEP_MINUTES};

/// Counts diesel starts: a start at step 0 plus every off→on transition.
pub fn diesel_activations(window: &[BatteryStatus]) -> u32 {
    let initial = window.first().map_or(0, |s| u32::from(s.use_diesel));
    let edges = window
        .windows(2)
        .filter(|pair| !pair[0].use_diesel && pair[1].use_diesel)
        .count();
    initial + edges as u32
}

/// Total diesel runtime in minutes.
pub fn total_diesel_minutes(window: &[BatteryStatus]) -> f64 {
    window.iter().filter(|s| s.use_diesel).count() as f64 * STEP_MINUTES
}

/// Longest unbroken diesel run in minutes.
pub fn max_continuous_diesel_minutes(window: &[BatteryStatus]) -> f64 {
    let mut longest = 0_usize;
    let mut current = 0_usize;
    for status in window {
        if status.use_diesel {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest as f64 * STEP_MINUTES
}

/// Total grid usage in minutes, as requested by the strategy.
///
/// The grid plan does not gate this metric: a request in a forbidden hour
/// still costs time even though no power is drawn.
pub fn total_grid_minutes(window: &[BatteryStatus]) -> f64 {
    window.iter().filter(|s| s.use_grid).count() as f64 * STEP_MINUTES
}

/// Relative mean absolute error of a predicted hourly solar series.
///
/// Computed as `Σ|predicted − actual| / Σ|actual|` over the first `hours`
/// entries. Returns `None` if either series is shorter than `hours` or the
/// actual series carries no energy.
pub fn solar_forecast_mae(actual: &[f64], predicted: &[f64], hours: usize) -> Option<f64> {
    if actual.len() < hours || predicted.len() < hours {
        return None;
    }
    let (abs_err, total) = actual[..hours]
        .iter()
        .zip(&predicted[..hours])
        .fold((0.0_f64, 0.0_f64), |(err, sum), (a, p)| {
            (err + (p - a).abs(), sum + a.abs())
        });
    if total > 0.0 { Some(abs_err / total) } else { None }
}

impl CostBreakdown {
    /// Computes every cost term from the dispatch window.
    pub fn from_window(window: &[BatteryStatus]) -> Self {
        Self {
            diesel_activations: diesel_activations(window),
            diesel_minutes: total_diesel_minutes(window),
            max_continuous_diesel_minutes: max_continuous_diesel_minutes(window),
            grid_minutes: total_grid_minutes(window),
        }
    }
}

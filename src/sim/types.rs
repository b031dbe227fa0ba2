//! Core simulation types: horizon, dispatch decisions, step records and cost breakdowns.

use std::fmt;

/// Number of scoring timesteps per hour.
pub const STEPS_PER_HOUR: usize = 4;

/// Duration of one timestep in minutes.
pub const STEP_MINUTES: f64 = 60.0 / STEPS_PER_HOUR as f64;

/// Longest horizon a submission covers.
pub const MAX_DAYS: usize = 7;

/// Timesteps in a full submitted week (7 days at 15-minute resolution).
pub const FULL_WEEK_STEPS: usize = MAX_DAYS * 24 * STEPS_PER_HOUR;

/// Number of sites every submission must cover; also the aggregate divisor.
pub const SITE_COUNT: usize = 10;

/// Scoring horizon, expressed in whole days.
///
/// # Examples
///
/// ```
/// use microgrid_score::sim::types::Horizon;
///
/// let horizon = Horizon::new(2);
/// assert_eq!(horizon.hours(), 48);
/// assert_eq!(horizon.steps(), 192);
/// assert_eq!(horizon.hour_of(7), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    days: usize,
}

impl Horizon {
    /// Creates a horizon covering `days` days.
    pub fn new(days: usize) -> Self {
        Self { days }
    }

    /// Number of days covered.
    pub fn days(&self) -> usize {
        self.days
    }

    /// Number of hours simulated (`24 × days`).
    pub fn hours(&self) -> usize {
        24 * self.days
    }

    /// Number of 15-minute timesteps simulated.
    pub fn steps(&self) -> usize {
        self.hours() * STEPS_PER_HOUR
    }

    /// Hour bucket a timestep falls into.
    pub fn hour_of(&self, timestep: usize) -> usize {
        timestep / STEPS_PER_HOUR
    }
}

/// Dispatch decision for one site at one timestep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatteryStatus {
    /// Request grid import (granted only where the grid plan permits it).
    pub use_grid: bool,
    /// Run the diesel generator.
    pub use_diesel: bool,
    /// Take the available solar generation.
    pub use_solar: bool,
}

impl BatteryStatus {
    pub fn new(use_grid: bool, use_diesel: bool, use_solar: bool) -> Self {
        Self {
            use_grid,
            use_diesel,
            use_solar,
        }
    }
}

/// Weights of the terms in the per-site cost function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    /// Penalty per diesel start.
    pub activation: f64,
    /// Weight per minute of diesel runtime.
    pub diesel_runtime: f64,
    /// Weight per minute of the longest continuous diesel run.
    pub max_diesel_run: f64,
    /// Weight per minute of grid usage.
    pub grid_runtime: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            activation: 300.0,
            diesel_runtime: 1.0,
            max_diesel_run: 0.95,
            grid_runtime: 0.25,
        }
    }
}

/// Cost terms accumulated over a feasible site run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostBreakdown {
    /// Number of diesel starts (rising edges, including a start at step 0).
    pub diesel_activations: u32,
    /// Total diesel runtime in minutes.
    pub diesel_minutes: f64,
    /// Longest continuous diesel run in minutes.
    pub max_continuous_diesel_minutes: f64,
    /// Total grid usage in minutes.
    pub grid_minutes: f64,
}

impl CostBreakdown {
    /// Combines the cost terms into a single weighted score.
    pub fn weighted(&self, weights: &CostWeights) -> f64 {
        weights.activation * f64::from(self.diesel_activations)
            + weights.diesel_runtime * self.diesel_minutes
            + weights.max_diesel_run * self.max_continuous_diesel_minutes
            + weights.grid_runtime * self.grid_minutes
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "starts={} diesel={:.0} min  max_run={:.0} min  grid={:.0} min",
            self.diesel_activations,
            self.diesel_minutes,
            self.max_continuous_diesel_minutes,
            self.grid_minutes,
        )
    }
}

/// Complete record of one simulated timestep.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    /// Timestep index.
    pub timestep: usize,
    /// Hour bucket used for solar, load and grid plan lookups.
    pub hour: usize,
    /// Diesel generation delivered (W).
    pub diesel_w: f64,
    /// Solar generation taken (W).
    pub solar_w: f64,
    /// Grid import granted (W).
    pub grid_w: f64,
    /// Load demand (W).
    pub load_w: f64,
    /// Net power into the battery (W; negative = discharge).
    pub net_w: f64,
    /// Coefficient applied to this step's SoC update.
    pub coefficient: f64,
    /// State of charge after this step.
    pub soc: f64,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} (h={:>3}) | diesel={:>8.1} W  solar={:>8.1} W  grid={:>8.1} W  \
             load={:>8.1} W | net={:>9.1} W  coe={:.3}  SoC={:.2}%",
            self.timestep,
            self.hour,
            self.diesel_w,
            self.solar_w,
            self.grid_w,
            self.load_w,
            self.net_w,
            self.coefficient,
            self.soc * 100.0,
        )
    }
}

//! Per-site state-of-charge walk over a submitted dispatch timeline.

use std::fmt;

use thiserror::Error;
use tracing::trace;

use crate::site::SiteConfig;
use crate::strategy::SiteStrategy;

use super::battery::SiteBattery;
use super::clock::{Clock, Tick};
use super::power_balance::battery_net_w;
use super::types::{BatteryStatus, CostBreakdown, Horizon, StepRecord};

/// A timestep at which the battery fell below its depth-of-discharge floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Infeasible {
    pub site: String,
    pub timestep: usize,
    pub soc: f64,
    pub dod: f64,
}

impl fmt::Display for Infeasible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "site `{}` reaches SoC {:.4} below DOD {:.4} at timestep {}",
            self.site, self.soc, self.dod, self.timestep
        )
    }
}

/// Reasons a single site cannot be scored.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    #[error("The strategy is unfeasible, please re-design your strategy ({0})")]
    Infeasible(Infeasible),
    #[error(
        "reference data for site `{site}` covers {available_hours} h, horizon needs {required_hours} h"
    )]
    ReferenceTooShort {
        site: String,
        required_hours: usize,
        available_hours: usize,
    },
    #[error(
        "strategy for site `{site}` has {available_steps} timesteps, horizon needs {required_steps}"
    )]
    StrategyTooShort {
        site: String,
        required_steps: usize,
        available_steps: usize,
    },
}

/// Outcome of a feasible site run.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRun {
    /// Cost terms over the horizon.
    pub breakdown: CostBreakdown,
    /// State of charge after the last timestep.
    pub final_soc: f64,
    /// Lowest state of charge reached.
    pub min_soc: f64,
}

/// Walks one site's timeline timestep by timestep.
///
/// Holds the site's reference data and the battery being integrated. The
/// dispatch window must not be longer than the site's hourly data; use
/// [`simulate_site`] for a checked entry point.
pub struct SiteSimulator<'a> {
    site: &'a SiteConfig,
    battery: SiteBattery,
}

impl<'a> SiteSimulator<'a> {
    /// Creates a simulator with the battery at the site's initial SoC.
    pub fn new(site: &'a SiteConfig) -> Self {
        Self {
            site,
            battery: SiteBattery::new(site.capacity(), site.init_soc, site.coe, site.dis_coe),
        }
    }

    /// Executes one timestep and returns its record.
    pub fn step(&mut self, tick: Tick, status: BatteryStatus) -> StepRecord {
        let site = self.site;
        let hour = tick.hour;

        let diesel_w = if status.use_diesel {
            site.diesel_power_w
        } else {
            0.0
        };
        let solar_w = if status.use_solar {
            site.profile.solar_w(hour)
        } else {
            0.0
        };
        let grid_w = if status.use_grid && site.grid_permitted(hour) {
            site.grid_power_w
        } else {
            0.0
        };
        let load_w = site.profile.load_w(hour);

        let net_w = battery_net_w(diesel_w, solar_w, grid_w, load_w);
        let soc = self.battery.apply(net_w);

        StepRecord {
            timestep: tick.step,
            hour,
            diesel_w,
            solar_w,
            grid_w,
            load_w,
            net_w,
            coefficient: self.battery.active_coefficient(),
            soc,
        }
    }

    /// Runs the whole window, stopping at the first DOD violation.
    ///
    /// Every completed step is handed to `observe`, including the violating one.
    pub fn run(
        &mut self,
        window: &[BatteryStatus],
        mut observe: impl FnMut(&StepRecord),
    ) -> Result<SiteRun, Infeasible> {
        let mut min_soc = self.battery.soc;
        for tick in Clock::with_steps(window.len()) {
            let record = self.step(tick, window[tick.step]);
            observe(&record);
            min_soc = min_soc.min(record.soc);
            if record.soc < self.site.dod {
                return Err(Infeasible {
                    site: self.site.site.clone(),
                    timestep: tick.step,
                    soc: record.soc,
                    dod: self.site.dod,
                });
            }
        }

        Ok(SiteRun {
            breakdown: CostBreakdown::from_window(window),
            final_soc: self.battery.soc,
            min_soc,
        })
    }
}

fn checked_window<'s>(
    strategy: &'s SiteStrategy,
    site: &SiteConfig,
    horizon: Horizon,
) -> Result<&'s [BatteryStatus], SimulationError> {
    if site.covered_hours() < horizon.hours() {
        return Err(SimulationError::ReferenceTooShort {
            site: site.site.clone(),
            required_hours: horizon.hours(),
            available_hours: site.covered_hours(),
        });
    }
    if strategy.len() < horizon.steps() {
        return Err(SimulationError::StrategyTooShort {
            site: site.site.clone(),
            required_steps: horizon.steps(),
            available_steps: strategy.len(),
        });
    }
    Ok(strategy.window(horizon.steps()))
}

/// Simulates one site over `horizon` and returns its cost breakdown.
///
/// Only the first `horizon.steps()` timesteps of the strategy are consumed.
///
/// # Errors
///
/// Returns [`SimulationError::Infeasible`] as soon as SoC drops below the
/// site's DOD, or a coverage error if the strategy or reference data is
/// shorter than the horizon.
pub fn simulate_site(
    strategy: &SiteStrategy,
    site: &SiteConfig,
    horizon: Horizon,
) -> Result<SiteRun, SimulationError> {
    let window = checked_window(strategy, site, horizon)?;
    SiteSimulator::new(site)
        .run(window, |record| trace!(site = %site.site, "{record}"))
        .map_err(SimulationError::Infeasible)
}

/// Like [`simulate_site`], additionally returning every step record.
///
/// On infeasibility the trace ends with the violating step.
pub fn simulate_site_traced(
    strategy: &SiteStrategy,
    site: &SiteConfig,
    horizon: Horizon,
) -> (Result<SiteRun, SimulationError>, Vec<StepRecord>) {
    let window = match checked_window(strategy, site, horizon) {
        Ok(window) => window,
        Err(err) => return (Err(err), Vec::new()),
    };
    let mut records = Vec::with_capacity(window.len());
    let outcome = SiteSimulator::new(site)
        .run(window, |record| records.push(record.clone()))
        .map_err(SimulationError::Infeasible);
    (outcome, records)
}

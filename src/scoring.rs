//! Submission validation and aggregate scoring across all sites.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::sim::simulator::{SiteRun, SimulationError, simulate_site};
use crate::sim::types::{CostWeights, FULL_WEEK_STEPS, Horizon, MAX_DAYS, SITE_COUNT};
use crate::site::SiteConfigTable;
use crate::strategy::StrategyTable;

/// Score reported for any rejected or infeasible submission.
pub const FAILURE_SCORE: f64 = -1.0;

/// Reasons a submission is rejected as a whole.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScoreError {
    #[error("The submission is empty, please check your submission")]
    EmptyStrategy,
    #[error(
        "The number of sites is wrong, please check your submission (expected {expected}, found {found})"
    )]
    WrongSiteCount { expected: usize, found: usize },
    #[error("scoring horizon of {days} day(s) must cover between 1 and {max_days} day(s)")]
    InvalidHorizon { days: usize, max_days: usize },
    #[error(
        "The site name or time length is wrong, please check your submission (site `{site}` is not in the reference data)"
    )]
    UnknownSite { site: String },
    #[error(
        "The site name or time length is wrong, please check your submission (site `{site}` has {found} timesteps, expected {expected})"
    )]
    LengthMismatch {
        site: String,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

impl ScoreError {
    /// Whether the submission was well-formed but drove a battery below its DOD.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::Simulation(SimulationError::Infeasible(_)))
    }
}

/// Score of one feasible site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteScore {
    pub site: String,
    pub score: f64,
    pub run: SiteRun,
}

/// Result of a successful evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Mean site score over the fixed site count.
    pub score: f64,
    /// Per-site scores in site order.
    pub sites: Vec<SiteScore>,
}

/// Collapses an evaluation result to the printed score, `-1.0` on failure.
pub fn score_or_sentinel(result: &Result<Evaluation, ScoreError>) -> f64 {
    result.as_ref().map_or(FAILURE_SCORE, |e| e.score)
}

/// Validates a submission and scores it against the reference sites.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: CostWeights,
}

impl ScoringEngine {
    pub fn new(weights: CostWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Scores `strategies` over the first `days` days.
    ///
    /// Sites are evaluated in name order and evaluation stops at the first
    /// rejected or infeasible site. The aggregate divides by the fixed site
    /// count, never by the number of sites actually supplied.
    ///
    /// # Errors
    ///
    /// Returns a [`ScoreError`] describing the first validation or
    /// feasibility failure; it is also logged at `warn` level.
    pub fn score(
        &self,
        strategies: &StrategyTable,
        sites: &SiteConfigTable,
        days: usize,
    ) -> Result<Evaluation, ScoreError> {
        self.evaluate(strategies, sites, days).inspect_err(|err| warn!("{err}"))
    }

    fn evaluate(
        &self,
        strategies: &StrategyTable,
        sites: &SiteConfigTable,
        days: usize,
    ) -> Result<Evaluation, ScoreError> {
        if strategies.is_empty() {
            return Err(ScoreError::EmptyStrategy);
        }
        if strategies.len() != SITE_COUNT {
            return Err(ScoreError::WrongSiteCount {
                expected: SITE_COUNT,
                found: strategies.len(),
            });
        }

        if !(1..=MAX_DAYS).contains(&days) {
            return Err(ScoreError::InvalidHorizon {
                days,
                max_days: MAX_DAYS,
            });
        }
        let horizon = Horizon::new(days);

        let mut scored = Vec::with_capacity(SITE_COUNT);
        let mut total = 0.0_f64;
        for (name, strategy) in strategies.iter() {
            let Some(site) = sites.get(name) else {
                return Err(ScoreError::UnknownSite {
                    site: name.to_string(),
                });
            };
            if strategy.len() != FULL_WEEK_STEPS {
                return Err(ScoreError::LengthMismatch {
                    site: name.to_string(),
                    expected: FULL_WEEK_STEPS,
                    found: strategy.len(),
                });
            }

            let run = simulate_site(strategy, site, horizon)?;
            let score = run.breakdown.weighted(&self.weights);
            info!(
                site = name,
                score,
                min_soc = run.min_soc,
                final_soc = run.final_soc,
                "{}",
                run.breakdown
            );
            total += score;
            scored.push(SiteScore {
                site: name.to_string(),
                score,
                run,
            });
        }

        let score = total / SITE_COUNT as f64;
        debug!(score, days, "submission scored");
        Ok(Evaluation {
            score,
            sites: scored,
        })
    }
}

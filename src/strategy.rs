//! Submitted dispatch strategies, one timeline per site.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::sim::types::BatteryStatus;
use crate::timeline::densify;

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("site `{site}` has no strategy entry for timestep {timestep}")]
    MissingTimestep { site: String, timestep: usize },
}

/// Per-timestep dispatch decisions of one site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteStrategy {
    steps: Vec<BatteryStatus>,
}

impl SiteStrategy {
    pub fn new(steps: Vec<BatteryStatus>) -> Self {
        Self { steps }
    }

    /// Builds a timeline from timestep-keyed entries.
    ///
    /// # Errors
    ///
    /// Returns [`TimelineError::MissingTimestep`] if the timesteps are not exactly `0..n`.
    pub fn from_timesteps(
        site: &str,
        entries: BTreeMap<usize, BatteryStatus>,
    ) -> Result<Self, TimelineError> {
        densify(entries)
            .map(Self::new)
            .map_err(|timestep| TimelineError::MissingTimestep {
                site: site.to_string(),
                timestep,
            })
    }

    /// Number of submitted timesteps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The first `steps` decisions, or fewer if the timeline is shorter.
    pub fn window(&self, steps: usize) -> &[BatteryStatus] {
        &self.steps[..steps.min(self.steps.len())]
    }
}

/// Submitted strategies keyed by site identifier.
#[derive(Debug, Clone, Default)]
pub struct StrategyTable {
    sites: BTreeMap<String, SiteStrategy>,
}

impl StrategyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the timeline of a site.
    pub fn insert(&mut self, site: impl Into<String>, strategy: SiteStrategy) {
        self.sites.insert(site.into(), strategy);
    }

    pub fn get(&self, site: &str) -> Option<&SiteStrategy> {
        self.sites.get(site)
    }

    /// Number of sites in the submission.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Iterates `(site, strategy)` pairs in site order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SiteStrategy)> {
        self.sites.iter().map(|(k, v)| (k.as_str(), v))
    }
}

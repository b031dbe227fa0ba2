//! Reference site configuration: physical parameters and hourly profiles.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::timeline::densify;

/// Errors raised while assembling a site's hourly profiles.
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("site `{site}` has no profile entry for hour {hour}")]
    MissingHour { site: String, hour: usize },
}

/// Hourly solar and load profile of one site, indexed by hour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyProfile {
    solar_w: Vec<f64>,
    load_w: Vec<f64>,
}

impl HourlyProfile {
    /// Builds a profile from `(solar W, load W)` pairs in hour order.
    pub fn new(hours: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let (solar_w, load_w): (Vec<f64>, Vec<f64>) = hours.into_iter().unzip();
        Self { solar_w, load_w }
    }

    /// Builds a profile from hour-keyed `(solar W, load W)` entries.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::MissingHour`] if the hours are not exactly `0..n`.
    pub fn from_hours(
        site: &str,
        entries: BTreeMap<usize, (f64, f64)>,
    ) -> Result<Self, ProfileError> {
        let dense = densify(entries).map_err(|hour| ProfileError::MissingHour {
            site: site.to_string(),
            hour,
        })?;
        Ok(Self::new(dense))
    }

    /// Number of hours covered.
    pub fn hours(&self) -> usize {
        self.solar_w.len()
    }

    /// Available solar generation at `hour` (W).
    pub fn solar_w(&self, hour: usize) -> f64 {
        self.solar_w[hour]
    }

    /// Load demand at `hour` (W).
    pub fn load_w(&self, hour: usize) -> f64 {
        self.load_w[hour]
    }
}

/// Static and time-indexed parameters of one microgrid site.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteConfig {
    /// Site identifier.
    pub site: String,
    /// Rated diesel generator output (W).
    pub diesel_power_w: f64,
    /// Initial state of charge (fraction).
    pub init_soc: f64,
    /// Rated battery capacity.
    pub rated_capacity: f64,
    /// Rated battery voltage.
    pub rated_voltage: f64,
    /// Minimum permissible state of charge.
    pub dod: f64,
    /// Charge coefficient.
    pub coe: f64,
    /// Discharge coefficient.
    pub dis_coe: f64,
    /// Rated grid import power (W).
    pub grid_power_w: f64,
    /// Per-hour grid import permission.
    pub grid_plan: Vec<bool>,
    /// Hourly solar and load profile.
    pub profile: HourlyProfile,
}

impl SiteConfig {
    /// Battery capacity as rated capacity × rated voltage.
    pub fn capacity(&self) -> f64 {
        self.rated_capacity * self.rated_voltage
    }

    /// Whether grid import is permitted during `hour`.
    pub fn grid_permitted(&self, hour: usize) -> bool {
        self.grid_plan.get(hour).copied().unwrap_or(false)
    }

    /// Number of hours for which profile and grid plan are both defined.
    pub fn covered_hours(&self) -> usize {
        self.profile.hours().min(self.grid_plan.len())
    }
}

/// All reference sites keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct SiteConfigTable {
    sites: BTreeMap<String, SiteConfig>,
}

impl SiteConfigTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a site.
    pub fn insert(&mut self, config: SiteConfig) {
        self.sites.insert(config.site.clone(), config);
    }

    pub fn get(&self, site: &str) -> Option<&SiteConfig> {
        self.sites.get(site)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Iterates sites in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &SiteConfig> {
        self.sites.values()
    }
}

impl FromIterator<SiteConfig> for SiteConfigTable {
    fn from_iter<I: IntoIterator<Item = SiteConfig>>(iter: I) -> Self {
        let mut table = Self::new();
        for config in iter {
            table.insert(config);
        }
        table
    }
}

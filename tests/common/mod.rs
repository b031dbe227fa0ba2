//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::io::Write;

use microgrid_score::sim::types::{BatteryStatus, FULL_WEEK_STEPS, SITE_COUNT};
use microgrid_score::site::{HourlyProfile, SiteConfig, SiteConfigTable};
use microgrid_score::strategy::{SiteStrategy, StrategyTable};
use tempfile::NamedTempFile;

/// Hours of reference data per site (one week).
pub const WEEK_HOURS: usize = 168;

/// The ten site identifiers, `site_0` through `site_9`.
pub fn site_names() -> Vec<String> {
    (0..SITE_COUNT).map(|i| format!("site_{i}")).collect()
}

/// Site with zero solar and zero load over a week.
///
/// Battery capacity is 100 × 48 = 4800, SoC 0.5, DOD 0.2; diesel 5 kW,
/// grid 3 kW permitted every hour.
pub fn balanced_site(name: &str) -> SiteConfig {
    site_with_profile(name, vec![(0.0, 0.0); WEEK_HOURS])
}

/// Site with the given hourly `(solar W, load W)` profile and default parameters.
pub fn site_with_profile(name: &str, hours: Vec<(f64, f64)>) -> SiteConfig {
    let n = hours.len();
    SiteConfig {
        site: name.to_string(),
        diesel_power_w: 5000.0,
        init_soc: 0.5,
        rated_capacity: 100.0,
        rated_voltage: 48.0,
        dod: 0.2,
        coe: 1.0,
        dis_coe: 1.0,
        grid_power_w: 3000.0,
        grid_plan: vec![true; n],
        profile: HourlyProfile::new(hours),
    }
}

/// Ten balanced sites.
pub fn balanced_reference() -> SiteConfigTable {
    site_names().iter().map(|name| balanced_site(name)).collect()
}

/// A full week with the same decision at every timestep.
pub fn constant_strategy(status: BatteryStatus) -> SiteStrategy {
    SiteStrategy::new(vec![status; FULL_WEEK_STEPS])
}

/// Every site submits the same constant week.
pub fn uniform_submission(status: BatteryStatus) -> StrategyTable {
    let mut table = StrategyTable::new();
    for name in site_names() {
        table.insert(name, constant_strategy(status));
    }
    table
}

/// Expected per-site score with diesel and grid on for all of `days`.
pub fn always_on_score(days: usize) -> f64 {
    let minutes = (days * 24 * 60) as f64;
    300.0 + minutes + 0.95 * minutes + 0.25 * minutes
}

/// Reference CSV for ten balanced sites, in the published file layout.
pub fn balanced_reference_csv() -> String {
    reference_csv(0.0, 0.0)
}

/// Reference CSV for ten sites with constant hourly load and solar (kW).
pub fn reference_csv(load_kw: f64, solar_kw: f64) -> String {
    let mut out = String::from("site,hour,load_kw,solar_kw\n");
    for name in site_names() {
        for hour in 0..WEEK_HOURS {
            out.push_str(&format!("{name},{hour},{load_kw},{solar_kw}\n"));
        }
    }
    let plan = vec!["True"; WEEK_HOURS].join(" ");
    for name in site_names() {
        out.push_str(&format!("{name},5,100,48,1,1,0.5,0.2,3,[{plan}]\n"));
    }
    out
}

/// Submission CSV with the same decision at every timestep for `sites`.
pub fn submission_csv(sites: &[String], status: BatteryStatus) -> String {
    let flag = |b: bool| if b { "True" } else { "False" };
    let mut out = String::from("site,timestep,use_grid,use_diesel,use_solar\n");
    for name in sites {
        for step in 0..FULL_WEEK_STEPS {
            out.push_str(&format!(
                "{name},{step},{},{},{}\n",
                flag(status.use_grid),
                flag(status.use_diesel),
                flag(status.use_solar)
            ));
        }
    }
    out
}

/// Writes `contents` to a fresh temporary file.
pub fn write_temp(contents: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

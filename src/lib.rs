//! Microgrid dispatch strategy scorer.
//!
//! Simulates each site's battery under a submitted week of grid, diesel and
//! solar decisions, rejects strategies that breach the depth-of-discharge
//! floor, and averages a weighted diesel/grid cost over all sites.

pub mod config;
/// CSV readers for reference data and submissions.
pub mod io;
pub mod logging;
pub mod scoring;
/// Per-site battery simulation and cost metrics.
pub mod sim;
pub mod site;
pub mod strategy;
mod timeline;

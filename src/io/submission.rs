//! Reader for strategy submissions.
//!
//! One header row, then one row per site and timestep:
//!
//! ```text
//! site, timestep, use_grid, use_diesel, use_solar
//! ```
//!
//! Flags are case-insensitive `true`; any other token reads as `false`. A
//! repeated `(site, timestep)` pair replaces the earlier row.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::{ReadError, csv_reader, field, parse_flag, parse_index, read_text};
use crate::sim::types::BatteryStatus;
use crate::strategy::{SiteStrategy, StrategyTable};

/// Loads a submission from a file.
///
/// # Errors
///
/// Returns [`ReadError::UnreadableFile`] if the file is not UTF-8 text, or
/// another [`ReadError`] if it cannot be parsed.
pub fn read_submission_path(path: &Path) -> Result<StrategyTable, ReadError> {
    let text = read_text(path)?;
    let table = read_submission(text.as_bytes())?;
    debug!(path = %path.display(), sites = table.len(), "submission loaded");
    Ok(table)
}

/// Parses a submission from any reader.
///
/// # Errors
///
/// Returns a [`ReadError`] for CSV errors, unparsable timesteps, or gaps in a
/// site's timesteps.
pub fn read_submission<R: Read>(reader: R) -> Result<StrategyTable, ReadError> {
    let mut rdr = csv_reader(reader);
    let mut entries: BTreeMap<String, BTreeMap<usize, BatteryStatus>> = BTreeMap::new();

    for record in rdr.records() {
        let record = record?;
        let site = field(&record, 0, "site")?;
        let timestep = parse_index(&record, 1, "timestep")?;
        let status = BatteryStatus::new(
            parse_flag(field(&record, 2, "use_grid")?),
            parse_flag(field(&record, 3, "use_diesel")?),
            parse_flag(field(&record, 4, "use_solar")?),
        );
        entries
            .entry(site.to_string())
            .or_default()
            .insert(timestep, status);
    }

    let mut table = StrategyTable::new();
    for (site, steps) in entries {
        let strategy = SiteStrategy::from_timesteps(&site, steps)?;
        table.insert(site, strategy);
    }
    Ok(table)
}

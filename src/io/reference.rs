//! Reader for the reference-data file.
//!
//! The file has one header row followed by two blocks of rows. The first
//! `timeseries_rows` data rows are hourly samples:
//!
//! ```text
//! site, hour, load_kw, solar_kw
//! ```
//!
//! Every following row describes one site:
//!
//! ```text
//! site, diesel_kw, rated_capacity, rated_voltage, coe, dis_coe, init_soc, dod, grid_kw, grid_plan
//! ```
//!
//! where `grid_plan` is a bracketed list of `true`/`false` tokens separated by
//! single spaces, one per hour. Power values are converted from kW to W.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::debug;

use super::{ReadError, csv_reader, field, malformed, parse_f64, parse_flag, parse_index, read_text};
use crate::site::{HourlyProfile, SiteConfig, SiteConfigTable};

/// Number of hourly rows in the reference files published for scoring.
pub const DEFAULT_TIMESERIES_ROWS: usize = 1680;

const KW_TO_W: f64 = 1000.0;

type HourlySamples = BTreeMap<usize, (f64, f64)>;

/// Loads the reference table from a file.
///
/// # Errors
///
/// Returns [`ReadError::UnreadableFile`] if the file is not UTF-8 text, or
/// another [`ReadError`] if it cannot be parsed.
pub fn read_reference_path(
    path: &Path,
    timeseries_rows: usize,
) -> Result<SiteConfigTable, ReadError> {
    let text = read_text(path)?;
    let table = read_reference(text.as_bytes(), timeseries_rows)?;
    debug!(path = %path.display(), sites = table.len(), "reference data loaded");
    Ok(table)
}

/// Parses the reference table from any reader.
///
/// # Errors
///
/// Returns a [`ReadError`] for CSV errors, unparsable fields, gaps in a site's
/// hours, a site row without hourly samples, or a non-positive battery
/// capacity.
pub fn read_reference<R: Read>(
    reader: R,
    timeseries_rows: usize,
) -> Result<SiteConfigTable, ReadError> {
    let mut rdr = csv_reader(reader);
    let mut samples: BTreeMap<String, HourlySamples> = BTreeMap::new();
    let mut table = SiteConfigTable::new();

    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        if row < timeseries_rows {
            let (site, hour, solar_w, load_w) = parse_sample(&record)?;
            samples.entry(site).or_default().insert(hour, (solar_w, load_w));
        } else {
            table.insert(parse_site(&record, &samples)?);
        }
    }

    Ok(table)
}

fn parse_sample(record: &StringRecord) -> Result<(String, usize, f64, f64), ReadError> {
    let site = field(record, 0, "site")?.to_string();
    let hour = parse_index(record, 1, "hour")?;
    let load_w = parse_f64(record, 2, "load_kw")? * KW_TO_W;
    let solar_w = parse_f64(record, 3, "solar_kw")? * KW_TO_W;
    Ok((site, hour, solar_w, load_w))
}

fn parse_site(
    record: &StringRecord,
    samples: &BTreeMap<String, HourlySamples>,
) -> Result<SiteConfig, ReadError> {
    let site = field(record, 0, "site")?.to_string();
    let hours = samples
        .get(&site)
        .ok_or_else(|| malformed(record, format!("site `{site}` has no hourly samples")))?;
    let profile = HourlyProfile::from_hours(&site, hours.clone())?;

    let diesel_power_w = parse_f64(record, 1, "diesel_kw")? * KW_TO_W;
    let rated_capacity = parse_f64(record, 2, "rated_capacity")?;
    let rated_voltage = parse_f64(record, 3, "rated_voltage")?;
    let capacity = rated_capacity * rated_voltage;
    if capacity.is_nan() || capacity <= 0.0 {
        return Err(malformed(
            record,
            format!("site `{site}` has non-positive battery capacity {capacity}"),
        ));
    }

    Ok(SiteConfig {
        diesel_power_w,
        rated_capacity,
        rated_voltage,
        coe: parse_f64(record, 4, "coe")?,
        dis_coe: parse_f64(record, 5, "dis_coe")?,
        init_soc: parse_f64(record, 6, "init_soc")?,
        dod: parse_f64(record, 7, "dod")?,
        grid_power_w: parse_f64(record, 8, "grid_kw")? * KW_TO_W,
        grid_plan: parse_grid_plan(field(record, 9, "grid_plan")?),
        profile,
        site,
    })
}

/// Parses `[true false TRUE ...]` into one flag per hour.
///
/// Tokens are separated by single spaces. Each extra space yields an empty
/// token, which reads as `false` and shifts the following hours.
pub fn parse_grid_plan(raw: &str) -> Vec<bool> {
    let raw = raw.trim();
    let inner = raw.strip_prefix('[').unwrap_or(raw);
    let inner = inner.strip_suffix(']').unwrap_or(inner);
    inner.split(' ').map(parse_flag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
site,hour,load,solar
A,0,1.5,0.5
A,1,2.0,0.25
B,1,0.0,1.0
B,0,0.125,3.0
A,5,100,48,0.95,1.05,0.8,0.2,3,[true FALSE]
B,2.5,50,24,1,1,0.5,0.1,0,[false True]
";

    #[test]
    fn parses_profiles_and_sites() {
        let table = read_reference(SAMPLE.as_bytes(), 4).expect("valid reference");
        assert_eq!(table.len(), 2);

        let a = table.get("A").expect("site A");
        assert_eq!(a.diesel_power_w, 5000.0);
        assert_eq!(a.capacity(), 4800.0);
        assert_eq!(a.coe, 0.95);
        assert_eq!(a.dis_coe, 1.05);
        assert_eq!(a.init_soc, 0.8);
        assert_eq!(a.dod, 0.2);
        assert_eq!(a.grid_power_w, 3000.0);
        assert_eq!(a.grid_plan, vec![true, false]);
        assert_eq!(a.profile.load_w(0), 1500.0);
        assert_eq!(a.profile.solar_w(0), 500.0);
        assert_eq!(a.profile.load_w(1), 2000.0);
        assert_eq!(a.profile.solar_w(1), 250.0);

        let b = table.get("B").expect("site B");
        assert_eq!(b.profile.load_w(0), 125.0);
        assert_eq!(b.profile.solar_w(0), 3000.0);
        assert_eq!(b.grid_plan, vec![false, true]);
    }

    #[test]
    fn kw_values_scale_by_thousand() {
        let input = "h\nS,0,0.001,7.25\nS,1,1,1,1,1,1,0,0,[true]\n";
        let table = read_reference(input.as_bytes(), 1).expect("valid reference");
        let s = table.get("S").expect("site S");
        assert_eq!(s.profile.load_w(0), 1.0);
        assert_eq!(s.profile.solar_w(0), 7250.0);
        assert_eq!(s.diesel_power_w, 1000.0);
    }

    #[test]
    fn load_precedes_solar_in_sample_rows() {
        let input = "h\nS,0,1,2\nS,1,1,1,1,1,1,0,0,[true]\n";
        let table = read_reference(input.as_bytes(), 1).expect("valid reference");
        let s = table.get("S").expect("site S");
        assert_eq!(s.profile.load_w(0), 1000.0);
        assert_eq!(s.profile.solar_w(0), 2000.0);
    }

    #[test]
    fn zero_capacity_is_malformed() {
        for row in ["S,1,0,48,1,1,0.5,0.2,0,[true]", "S,1,100,0,1,1,0.5,0.2,0,[true]"] {
            let input = format!("h\nS,0,1,1\n{row}\n");
            let err = read_reference(input.as_bytes(), 1);
            assert!(matches!(err, Err(ReadError::Malformed { line: 3, .. })));
        }
    }

    #[test]
    fn negative_capacity_is_malformed() {
        let input = "h\nS,0,1,1\nS,1,-100,48,1,1,0.5,0.2,0,[true]\n";
        let err = read_reference(input.as_bytes(), 1).map_err(|e| e.to_string());
        assert_eq!(
            err.err(),
            Some("line 3: site `S` has non-positive battery capacity -4800".to_string())
        );
    }

    #[test]
    fn site_without_samples_is_malformed() {
        let input = "h\nS,0,1,1\nT,1,1,1,1,1,1,0,0,[true]\n";
        let err = read_reference(input.as_bytes(), 1);
        assert!(matches!(err, Err(ReadError::Malformed { line: 3, .. })));
    }

    #[test]
    fn gap_in_hours_is_rejected() {
        let input = "h\nS,0,1,1\nS,2,1,1\nS,1,1,1,1,1,1,0,0,[true]\n";
        let err = read_reference(input.as_bytes(), 2);
        assert!(matches!(err, Err(ReadError::Profile(_))));
    }

    #[test]
    fn bad_number_is_malformed() {
        let input = "h\nS,0,one,1\n";
        let err = read_reference(input.as_bytes(), 1);
        assert!(matches!(err, Err(ReadError::Malformed { line: 2, .. })));
    }

    #[test]
    fn short_site_row_is_malformed() {
        let input = "h\nS,0,1,1\nS,1,1,1\n";
        let err = read_reference(input.as_bytes(), 1).map_err(|e| e.to_string());
        assert_eq!(err.err(), Some("line 3: missing column `coe`".to_string()));
    }

    #[test]
    fn grid_plan_tokens() {
        assert_eq!(parse_grid_plan("[true false TRUE]"), vec![true, false, true]);
        assert_eq!(parse_grid_plan("false true"), vec![false, true]);
        assert_eq!(parse_grid_plan("[true yes]"), vec![true, false]);
    }

    #[test]
    fn grid_plan_extra_spaces_shift_hours() {
        assert_eq!(parse_grid_plan("[true  true]"), vec![true, false, true]);
        assert_eq!(
            parse_grid_plan("[ true true ]"),
            vec![false, true, true, false]
        );
        assert_eq!(parse_grid_plan("[]"), vec![false]);
    }

    #[test]
    fn empty_input_is_empty_table() {
        let table = read_reference("h\n".as_bytes(), DEFAULT_TIMESERIES_ROWS).expect("empty");
        assert!(table.is_empty());
    }
}

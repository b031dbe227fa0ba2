//! Site power balance computation.

/// Computes the net power flowing into the site battery.
///
/// Sources are positive magnitudes; the load is a positive demand that is
/// subtracted. A negative result means the battery discharges.
///
/// # Arguments
///
/// * `diesel_w` - Diesel generation (W, >= 0)
/// * `solar_w` - Solar generation (W, >= 0)
/// * `grid_w` - Grid import (W, >= 0)
/// * `load_w` - Load demand (W, >= 0)
///
/// # Returns
///
/// Net battery power in W (positive=charge, negative=discharge)
pub fn battery_net_w(diesel_w: f64, solar_w: f64, grid_w: f64, load_w: f64) -> f64 {
    diesel_w + solar_w + grid_w - load_w
}

use super::types::STEPS_PER_HOUR;

/// State-of-charge integrator for a site battery.
///
/// Net power is integrated over one 15-minute timestep and scaled by the
/// active coefficient. The charge coefficient is active until the first step
/// with negative net power; from then on the discharge coefficient is used for
/// every remaining step, including later charging steps.
///
/// SoC is capped at 1.0 after each step. There is no lower bound: the caller
/// decides what an SoC below the depth-of-discharge floor means.
#[derive(Debug, Clone)]
pub struct SiteBattery {
    /// Capacity as rated capacity × rated voltage.
    pub capacity: f64,

    /// State of charge as a fraction.
    pub soc: f64,

    /// Coefficient applied while net power has never been negative.
    pub coe: f64,

    /// Coefficient applied once net power has been negative.
    pub dis_coe: f64,

    active_coe: f64,
}

impl SiteBattery {
    /// Creates a battery at `init_soc` with the charge coefficient active.
    pub fn new(capacity: f64, init_soc: f64, coe: f64, dis_coe: f64) -> Self {
        Self {
            capacity,
            soc: init_soc,
            coe,
            dis_coe,
            active_coe: coe,
        }
    }

    /// Coefficient that the next non-negative step would use.
    pub fn active_coefficient(&self) -> f64 {
        self.active_coe
    }

    /// Integrates one timestep of net power (W) and returns the new SoC.
    pub fn apply(&mut self, net_w: f64) -> f64 {
        if net_w < 0.0 {
            self.active_coe = self.dis_coe;
        }
        self.soc += net_w * self.active_coe / (STEPS_PER_HOUR as f64 * self.capacity);
        self.soc = self.soc.min(1.0);
        self.soc
    }
}

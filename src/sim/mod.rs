/// State-of-charge integration for site batteries.
pub mod battery;
/// Timestep clock with hour bucketing.
pub mod clock;
pub mod metrics;
pub mod power_balance;
pub mod simulator;
pub mod types;

use super::types::{Horizon, STEPS_PER_HOUR};

/// Position of the clock within the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// 15-minute timestep index.
    pub step: usize,
    /// Hour bucket the timestep belongs to.
    pub hour: usize,
}

/// A simulation clock that walks the 15-minute timesteps of a horizon.
///
/// # Examples
///
/// ```
/// use microgrid_score::sim::clock::Clock;
/// use microgrid_score::sim::types::Horizon;
///
/// let mut clock = Clock::new(Horizon::new(1));
/// let mut hours = Vec::new();
///
/// clock.run(|tick| hours.push(tick.hour));
/// assert_eq!(hours.len(), 96);
/// assert_eq!(&hours[..5], &[0, 0, 0, 0, 1]);
/// ```
pub struct Clock {
    /// Next timestep to hand out
    current: usize,
    /// Total timesteps in the horizon
    total: usize,
}

impl Clock {
    /// Creates a clock spanning every timestep of `horizon`.
    pub fn new(horizon: Horizon) -> Self {
        Self::with_steps(horizon.steps())
    }

    /// Creates a clock spanning an explicit number of timesteps.
    pub fn with_steps(total: usize) -> Self {
        Self { current: 0, total }
    }

    /// Advances the clock by one timestep.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The timestep (starting from 0) before advancing
    /// * `None` - If every timestep has been handed out
    pub fn tick(&mut self) -> Option<Tick> {
        if self.current < self.total {
            let step = self.current;
            self.current += 1;
            Some(Tick {
                step,
                hour: step / STEPS_PER_HOUR,
            })
        } else {
            None
        }
    }

    /// Runs a function for each remaining timestep.
    pub fn run(&mut self, mut f: impl FnMut(Tick)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }
}

impl Iterator for Clock {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        self.tick()
    }
}

//! Configuration, results and cancellation for extremum searches.

use std::f64::consts::{FRAC_PI_4, PI};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use luna_time::{JulianDay, SECONDS_PER_DAY, SYNODIC_MONTH_DAYS, TimeConverter};

/// Default sampling step: one minute.
pub const DEFAULT_STEP_DAYS: f64 = 60.0 / SECONDS_PER_DAY;

/// Which kind of local extremum a search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extremum {
    Minimum,
    Maximum,
}

impl Extremum {
    /// Sign that turns this extremum into a minimum.
    pub(crate) fn orientation(self) -> f64 {
        match self {
            Self::Minimum => 1.0,
            Self::Maximum => -1.0,
        }
    }
}

/// Parameters for a single extremum search.
///
/// Thresholds are in the units of the tracked function (radians for the
/// built-in separations). For a minimum, the trough must reach
/// `tight_threshold` or below, then the function must rise above
/// `coarse_threshold`; for a maximum both comparisons are mirrored.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Sampling step in days.
    pub step_days: f64,
    /// Number of steps after the start sample before giving up.
    pub max_steps: usize,
    /// Trough acceptance bound.
    pub tight_threshold: f64,
    /// Confirmation bound the function must cross after the trough.
    pub coarse_threshold: f64,
    pub extremum: Extremum,
    /// Fit a parabola through the trough and its neighbours.
    pub refine: bool,
    /// Converts event times to civil UTC.
    pub time: TimeConverter,
    pub cancel: Option<CancellationToken>,
}

impl SearchConfig {
    /// New moon: minimum of the Sun-Moon angle, one synodic month window.
    pub fn new_moon() -> Self {
        Self {
            step_days: DEFAULT_STEP_DAYS,
            max_steps: steps_for(SYNODIC_MONTH_DAYS, DEFAULT_STEP_DAYS),
            tight_threshold: PI / 16.0,
            coarse_threshold: FRAC_PI_4,
            extremum: Extremum::Minimum,
            refine: false,
            time: TimeConverter::default(),
            cancel: None,
        }
    }

    /// Full moon: maximum of the Sun-Moon angle.
    pub fn full_moon() -> Self {
        Self {
            tight_threshold: PI - PI / 16.0,
            coarse_threshold: 3.0 * FRAC_PI_4,
            extremum: Extremum::Maximum,
            ..Self::new_moon()
        }
    }

    /// Equinox: minimum of |solar declination|, hourly steps over 200 days.
    pub fn equinox() -> Self {
        Self {
            step_days: 1.0 / 24.0,
            max_steps: steps_for(SEASON_WINDOW_DAYS, 1.0 / 24.0),
            tight_threshold: 0.05,
            coarse_threshold: 0.2,
            extremum: Extremum::Minimum,
            ..Self::new_moon()
        }
    }

    /// Solstice: maximum of |solar declination|.
    pub fn solstice() -> Self {
        Self {
            tight_threshold: 0.40,
            coarse_threshold: 0.30,
            extremum: Extremum::Maximum,
            ..Self::equinox()
        }
    }

    /// Replace the step, keeping the window length in days.
    pub fn with_step_days(mut self, step_days: f64) -> Self {
        let window = self.window_days();
        self.step_days = step_days;
        if step_days.is_finite() && step_days > 0.0 {
            self.max_steps = steps_for(window, step_days);
        }
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_time(mut self, time: TimeConverter) -> Self {
        self.time = time;
        self
    }

    /// Search window length in days.
    pub fn window_days(&self) -> f64 {
        self.max_steps as f64 * self.step_days
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), &'static str> {
        if !self.step_days.is_finite() || self.step_days <= 0.0 {
            return Err("step_days must be positive");
        }
        if !self.tight_threshold.is_finite() || !self.coarse_threshold.is_finite() {
            return Err("thresholds must be finite");
        }
        let sign = self.extremum.orientation();
        if sign * self.tight_threshold >= sign * self.coarse_threshold {
            return Err("tight_threshold must lie beyond coarse_threshold toward the extremum");
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new_moon()
    }
}

const SEASON_WINDOW_DAYS: f64 = 200.0;

fn steps_for(window_days: f64, step_days: f64) -> usize {
    (window_days / step_days).ceil() as usize
}

/// A detected extremum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremumEvent {
    /// Event time (TDB).
    pub jd: JulianDay,
    /// Event time as civil UTC.
    pub utc: DateTime<Utc>,
    /// Tracked function at the event.
    pub value: f64,
    /// Steps taken before the event was accepted.
    pub steps: usize,
}

/// Result of a search: an event, or none inside the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    Found(ExtremumEvent),
    NotFound { steps: usize },
}

impl SearchOutcome {
    pub fn event(&self) -> Option<&ExtremumEvent> {
        match self {
            Self::Found(e) => Some(e),
            Self::NotFound { .. } => None,
        }
    }

    pub fn into_event(self) -> Option<ExtremumEvent> {
        match self {
            Self::Found(e) => Some(e),
            Self::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Shared flag that stops searches and interrupts waits.
///
/// Clones share state. Cancelling wakes every thread blocked in
/// [`CancellationToken::wait_timeout`].
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        let (flag, cvar) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block for up to `timeout`. Returns `true` if cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, cvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut cancelled = flag.lock().unwrap_or_else(PoisonError::into_inner);
        while !*cancelled {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            cancelled = cvar
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }
}

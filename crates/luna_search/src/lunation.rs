//! The lunation containing a given instant.

use luna_core::Oracle;
use luna_time::{JulianDay, SYNODIC_MONTH_DAYS};

use crate::error::SearchError;
use crate::lunar_phase::next_new_moon;
use crate::separation::illuminated_fraction;
use crate::types::{ExtremumEvent, SearchConfig, SearchOutcome};

/// New moon of 2000-01-06, lunation 0 in the numbering of Meeus,
/// *Astronomical Algorithms* ch. 49.
const LUNATION_ZERO_JD: f64 = 2_451_550.097_66;

/// Searches start this many synodic months before the instant.
const LOOKBACK_MONTHS: f64 = 1.1;

/// Upper bound on chained searches when bracketing an instant.
const MAX_HOPS: usize = 8;

/// Position of an instant within its lunation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lunation {
    /// Lunation number counted from the new moon of 2000-01-06.
    pub number: i64,
    /// New moon at or before the instant.
    pub previous: ExtremumEvent,
    /// First new moon after the instant.
    pub next: ExtremumEvent,
    /// Days since `previous`.
    pub age_days: f64,
    /// `age_days` over the lunation length, in `[0, 1)`.
    pub phase_fraction: f64,
    /// Lit fraction of the disc at the instant.
    pub illuminated: f64,
}

impl Lunation {
    pub fn length_days(&self) -> f64 {
        self.next.jd.days_since(self.previous.jd)
    }
}

/// Bracket `at` between the new moons before and after it.
///
/// The backward search never starts before the oracle's coverage. Returns
/// `None` when no new moon in coverage precedes `at`; lookups past the end
/// of coverage still fail with [`SearchError::Oracle`].
pub fn lunation_at(
    oracle: &Oracle,
    at: JulianDay,
    config: &SearchConfig,
) -> Result<Option<Lunation>, SearchError> {
    let mut cursor = at.add_days(-LOOKBACK_MONTHS * SYNODIC_MONTH_DAYS);
    if let Some((first, _)) = oracle.coverage() {
        let first = JulianDay::from_days(first);
        if first > cursor {
            cursor = first;
        }
    }
    let mut previous: Option<ExtremumEvent> = None;

    for _ in 0..MAX_HOPS {
        let event = match next_new_moon(oracle, cursor, config)? {
            SearchOutcome::Found(event) => event,
            SearchOutcome::NotFound { .. } if config.max_steps >= 2 => {
                cursor = cursor.add_days((config.max_steps - 1) as f64 * config.step_days);
                continue;
            }
            SearchOutcome::NotFound { .. } => return Ok(None),
        };
        if event.jd > at {
            let Some(previous) = previous else {
                return Ok(None);
            };
            let age_days = at.days_since(previous.jd);
            let length = event.jd.days_since(previous.jd);
            return Ok(Some(Lunation {
                number: lunation_number(previous.jd),
                previous,
                next: event,
                age_days,
                phase_fraction: age_days / length,
                illuminated: illuminated_fraction(oracle, at)?,
            }));
        }
        cursor = event.jd.add_days(config.step_days);
        previous = Some(event);
    }
    Ok(None)
}

/// Lunation number of the new moon nearest `jd`.
pub fn lunation_number(jd: JulianDay) -> i64 {
    ((jd.days() - LUNATION_ZERO_JD) / SYNODIC_MONTH_DAYS).round() as i64
}

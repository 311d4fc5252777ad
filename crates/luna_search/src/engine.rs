//! Fixed-step extremum detector.
//!
//! Samples f(t) at `start + i * step` and watches the sign of the discrete
//! derivative. Maxima are handled by negating f, so the state machine only
//! ever looks for a trough:
//!
//! 1. a falling run followed by a rising step marks a trough;
//! 2. the trough is guarded only if its value is at or below the tight
//!    threshold;
//! 3. once guarded, the event is accepted when f climbs past the coarse
//!    threshold. Climbing past coarse without a guard discards the trough.
//!
//! The search never looks backward, so a start on the rising flank of an
//! extremum does not report the start itself.

use luna_time::JulianDay;

use crate::error::SearchError;
use crate::types::{ExtremumEvent, SearchConfig, SearchOutcome};

#[derive(Debug, Clone, Copy)]
struct Sample {
    t: f64,
    g: f64,
}

/// A trough candidate with the samples on either side.
#[derive(Debug, Clone, Copy)]
struct Trough {
    before: Sample,
    at: Sample,
    after: Option<Sample>,
    step: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slope {
    Falling,
    Rising,
}

/// Search forward from `start` for the extremum described by `config`.
///
/// `f` is called once per sample, in time order, and never twice for the
/// same instant. Its first error ends the search.
pub fn find_extremum<F>(
    start: JulianDay,
    config: &SearchConfig,
    mut f: F,
) -> Result<SearchOutcome, SearchError>
where
    F: FnMut(JulianDay) -> Result<f64, SearchError>,
{
    config.validate().map_err(SearchError::InvalidConfig)?;
    if !start.is_finite() {
        return Err(SearchError::InvalidConfig("start time must be finite"));
    }
    if config.max_steps == 0 {
        return Ok(SearchOutcome::NotFound { steps: 0 });
    }

    let sign = config.extremum.orientation();
    let tight = sign * config.tight_threshold;
    let coarse = sign * config.coarse_threshold;
    let t0 = start.days();

    tracing::debug!(
        start = %start,
        step_days = config.step_days,
        max_steps = config.max_steps,
        extremum = ?config.extremum,
        "extremum search started"
    );

    let mut prev = Sample {
        t: t0,
        g: sign * f(start)?,
    };
    let mut slope: Option<Slope> = None;
    let mut candidate: Option<Trough> = None;
    let mut guarded: Option<Trough> = None;

    for i in 1..=config.max_steps {
        if config.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            tracing::debug!(steps = i - 1, "extremum search cancelled");
            return Err(SearchError::Cancelled { steps: i - 1 });
        }

        let t = t0 + i as f64 * config.step_days;
        let cur = Sample {
            t,
            g: sign * f(JulianDay::from_days(t))?,
        };

        let delta = cur.g - prev.g;
        let was = slope;
        if delta < 0.0 {
            slope = Some(Slope::Falling);
        } else if delta > 0.0 {
            slope = Some(Slope::Rising);
        }

        match slope {
            Some(Slope::Falling) => {
                candidate = Some(Trough {
                    before: prev,
                    at: cur,
                    after: None,
                    step: i,
                });
            }
            Some(Slope::Rising) if was == Some(Slope::Falling) => {
                if let Some(mut trough) = candidate.take() {
                    trough.after = Some(cur);
                    if guarded.is_none() && trough.at.g <= tight {
                        guarded = Some(trough);
                    }
                }
            }
            _ => {}
        }

        if cur.g > coarse {
            if let Some(trough) = guarded {
                let event = build_event(trough, sign, i, config)?;
                tracing::debug!(jd = %event.jd, steps = i, "extremum found");
                return Ok(SearchOutcome::Found(event));
            }
            candidate = None;
        }

        prev = cur;
    }

    if let Some(trough) = guarded {
        let event = build_event(trough, sign, config.max_steps, config)?;
        tracing::debug!(jd = %event.jd, "extremum found at window end");
        return Ok(SearchOutcome::Found(event));
    }

    tracing::debug!(steps = config.max_steps, "no extremum in window");
    Ok(SearchOutcome::NotFound {
        steps: config.max_steps,
    })
}

fn build_event(
    trough: Trough,
    sign: f64,
    steps: usize,
    config: &SearchConfig,
) -> Result<ExtremumEvent, SearchError> {
    let (t, g) = match trough.after {
        Some(after) if config.refine => {
            parabolic_vertex(trough.before, trough.at, after, config.step_days)
        }
        _ => (trough.at.t, trough.at.g),
    };
    let jd = JulianDay::from_days(t);
    tracing::trace!(trough_step = trough.step, refined = config.refine, "building event");
    Ok(ExtremumEvent {
        jd,
        utc: config.time.to_civil(jd)?,
        value: sign * g,
        steps,
    })
}

/// Vertex of the parabola through three equally spaced samples, clamped to
/// the outer two.
fn parabolic_vertex(a: Sample, b: Sample, c: Sample, h: f64) -> (f64, f64) {
    let curvature = a.g - 2.0 * b.g + c.g;
    if curvature.is_nan() || curvature <= 0.0 {
        return (b.t, b.g);
    }
    let x = (0.5 * h * (a.g - c.g) / curvature).clamp(-h, h);
    let slope = (c.g - a.g) / (2.0 * h);
    let g = b.g + x * slope + 0.5 * x * x * curvature / (h * h);
    (b.t + x, g)
}

//! Synthetic oracles for unit tests.

use luna_core::{Body, EphemerisProvider, LookupError, Oracle};
use luna_math::{Vec3, ecliptic_to_icrf};
use luna_time::SYNODIC_MONTH_DAYS;

pub const T0: f64 = 2_460_000.5;
pub const SYNODIC: f64 = SYNODIC_MONTH_DAYS;
pub const YEAR: f64 = 365.242_19;
pub const MOON_KM: f64 = 384_400.0;
pub const AU_KM: f64 = 149_597_870.7;

/// Geocentric positions from a closure; velocities are zero.
struct Sky<F>(F);

impl<F> EphemerisProvider for Sky<F>
where
    F: Fn(f64, Body) -> Option<[f64; 3]> + Send + Sync,
{
    fn compute(&self, jd: f64, target: Body, center: Body) -> Result<[f64; 6], LookupError> {
        if center != Body::Earth {
            return Err(LookupError::new(LookupError::MISSING_QUANTITY, "geocentric only"));
        }
        let p = (self.0)(jd, target)
            .ok_or_else(|| LookupError::new(LookupError::MISSING_QUANTITY, "no such body"))?;
        Ok([p[0], p[1], p[2], 0.0, 0.0, 0.0])
    }

    fn coverage(&self) -> (f64, f64) {
        (2_000_000.0, 3_000_000.0)
    }
}

fn sky<F>(f: F) -> Oracle
where
    F: Fn(f64, Body) -> Option<[f64; 3]> + Send + Sync + 'static,
{
    Oracle::with_provider("synthetic", Box::new(Sky(f)))
}

/// Sun fixed on +x, Moon `angle(jd)` radians away in the x-y plane.
fn moon_at_angle(angle: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Oracle {
    sky(move |jd, body| match body {
        Body::Sun => Some([AU_KM, 0.0, 0.0]),
        Body::Moon => {
            let a = angle(jd);
            Some([MOON_KM * a.cos(), MOON_KM * a.sin(), 0.0])
        }
        _ => None,
    })
}

/// Moon on a circular orbit; new moon at `T0 + k * SYNODIC`.
pub fn orbiting_moon() -> Oracle {
    moon_at_angle(|jd| std::f64::consts::TAU * (jd - T0) / SYNODIC)
}

/// Sun-Moon angle equal to `|sin(2 pi (t - T0) / SYNODIC)|`.
pub fn sine_moon() -> Oracle {
    moon_at_angle(|jd| (std::f64::consts::TAU * (jd - T0) / SYNODIC).sin().abs())
}

/// Moon on a circular orbit with a synodic period of `month` days.
pub fn moon_with_month(month: f64) -> Oracle {
    moon_at_angle(move |jd| std::f64::consts::TAU * (jd - T0) / month)
}

/// [`orbiting_moon`] geometry with coverage starting at `first`; earlier
/// lookups fail with code -1.
pub fn moon_covered_from(first: f64) -> Oracle {
    struct Edged(f64);
    impl EphemerisProvider for Edged {
        fn compute(&self, jd: f64, target: Body, center: Body) -> Result<[f64; 6], LookupError> {
            if jd < self.0 {
                return Err(LookupError::new(LookupError::OUT_OF_RANGE, "before coverage"));
            }
            if center != Body::Earth {
                return Err(LookupError::new(LookupError::MISSING_QUANTITY, "geocentric only"));
            }
            let a = std::f64::consts::TAU * (jd - T0) / SYNODIC;
            match target {
                Body::Sun => Ok([AU_KM, 0.0, 0.0, 0.0, 0.0, 0.0]),
                Body::Moon => Ok([MOON_KM * a.cos(), MOON_KM * a.sin(), 0.0, 0.0, 0.0, 0.0]),
                _ => Err(LookupError::new(LookupError::MISSING_QUANTITY, "no such body")),
            }
        }
        fn coverage(&self) -> (f64, f64) {
            (self.0, 3_000_000.0)
        }
    }
    Oracle::with_provider("edged", Box::new(Edged(first)))
}

/// Sun on the ecliptic at longitude zero at `T0`, circling once per `YEAR`.
pub fn seasonal_sun() -> Oracle {
    sky(|jd, body| match body {
        Body::Sun => {
            let lon = std::f64::consts::TAU * (jd - T0) / YEAR;
            let ecl = Vec3::new(AU_KM * lon.cos(), AU_KM * lon.sin(), 0.0);
            Some(ecliptic_to_icrf(ecl).to_array())
        }
        Body::Moon => Some([MOON_KM, 0.0, 0.0]),
        _ => None,
    })
}

/// Fixed Sun and Moon directions.
pub fn fixed_sky(sun: [f64; 3], moon: [f64; 3]) -> Oracle {
    sky(move |_, body| match body {
        Body::Sun => Some(sun),
        Body::Moon => Some(moon),
        _ => None,
    })
}

/// Every lookup fails with a read error.
pub fn failing() -> Oracle {
    struct Broken;
    impl EphemerisProvider for Broken {
        fn compute(&self, _: f64, _: Body, _: Body) -> Result<[f64; 6], LookupError> {
            Err(LookupError::new(LookupError::READ_FAILURE, "disk on fire"))
        }
        fn coverage(&self) -> (f64, f64) {
            (0.0, 0.0)
        }
    }
    Oracle::with_provider("broken", Box::new(Broken))
}

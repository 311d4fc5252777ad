//! The ephemeris oracle: fallback initialization and typed queries.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use jpl_kernel::DeKernel;

use crate::body::Body;
use crate::error::{LookupError, OracleError, SourceAttempt};
use crate::provider::EphemerisProvider;
use crate::{NutationAngles, StateVector};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Ephemeris files tried in order when no sources are configured.
pub const DEFAULT_SOURCES: [&str; 3] = [
    "ephem/lnxm13000p17000.431",
    "ephem/linux_p1550p2650.430t",
    "ephem/linux_p1550p2650.430",
];

struct Ready {
    source: PathBuf,
    provider: Box<dyn EphemerisProvider>,
}

/// Typed access to a planetary ephemeris.
///
/// Starts uninitialized; [`Oracle::initialize`] opens the first usable
/// source from a fallback list. Queries before that fail with
/// [`OracleError::NotInitialized`]. `Oracle` is [`Send`] + [`Sync`] and all
/// queries take `&self`.
#[derive(Default)]
pub struct Oracle {
    ready: Option<Ready>,
}

impl std::fmt::Debug for Oracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Oracle")
            .field("source", &self.source())
            .field("coverage", &self.coverage())
            .finish()
    }
}

impl Oracle {
    /// An oracle with no source opened yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the first DE file in `sources` that loads.
    pub fn open<P: AsRef<Path>>(sources: &[P]) -> Result<Self, OracleError> {
        let mut oracle = Self::new();
        oracle.initialize(sources)?;
        Ok(oracle)
    }

    /// An oracle answering from an already-constructed provider.
    pub fn with_provider(source: impl Into<PathBuf>, provider: Box<dyn EphemerisProvider>) -> Self {
        Self {
            ready: Some(Ready {
                source: source.into(),
                provider,
            }),
        }
    }

    /// Try each DE file in order and keep the first that opens.
    pub fn initialize<P: AsRef<Path>>(&mut self, sources: &[P]) -> Result<(), OracleError> {
        self.initialize_with(sources, |path| {
            DeKernel::open(path).map(|k| Box::new(k) as Box<dyn EphemerisProvider>)
        })
    }

    /// Try each source in order with a caller-supplied opener.
    ///
    /// A source equal to the one already open counts as success without
    /// reopening, so repeating a successful initialization is a no-op. On
    /// total failure the oracle keeps whatever state it had and the error
    /// lists every attempt in order.
    pub fn initialize_with<P, F, E>(&mut self, sources: &[P], mut opener: F) -> Result<(), OracleError>
    where
        P: AsRef<Path>,
        F: FnMut(&Path) -> Result<Box<dyn EphemerisProvider>, E>,
        E: Display,
    {
        let mut attempts = Vec::new();
        for source in sources {
            let path = source.as_ref();
            if self.source() == Some(path) {
                tracing::debug!(source = %path.display(), "ephemeris already open");
                return Ok(());
            }
            match opener(path) {
                Ok(provider) => {
                    let (start, end) = provider.coverage();
                    tracing::info!(
                        source = %path.display(),
                        start_jd = start,
                        end_jd = end,
                        "opened ephemeris"
                    );
                    self.ready = Some(Ready {
                        source: path.to_path_buf(),
                        provider,
                    });
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(source = %path.display(), error = %e, "cannot open ephemeris");
                    attempts.push(SourceAttempt {
                        source: path.to_path_buf(),
                        error: e.to_string(),
                    });
                }
            }
        }
        Err(OracleError::DataSourceUnavailable { attempts })
    }

    pub fn is_ready(&self) -> bool {
        self.ready.is_some()
    }

    /// Path of the opened source.
    pub fn source(&self) -> Option<&Path> {
        self.ready.as_ref().map(|r| r.source.as_path())
    }

    /// `(start_jd, end_jd)` of the opened source.
    pub fn coverage(&self) -> Option<(f64, f64)> {
        self.ready.as_ref().map(|r| r.provider.coverage())
    }

    /// State of `target` relative to `center` at `jd` (TDB), ICRF axes.
    pub fn query_state(&self, jd: f64, center: Body, target: Body) -> Result<StateVector, OracleError> {
        if !target.is_positional() || !center.is_positional() {
            return Err(LookupError::new(
                LookupError::INVALID_INDEX,
                format!("{target} relative to {center} is not a positional query"),
            )
            .into());
        }
        let raw = self.compute(jd, target, center)?;
        Ok(StateVector::from_daily(raw))
    }

    /// Nutation angles at `jd`.
    pub fn query_nutation(&self, jd: f64) -> Result<NutationAngles, OracleError> {
        let raw = self.compute(jd, Body::Nutations, Body::SolarSystemBarycenter)?;
        Ok(NutationAngles {
            dpsi_rad: raw[0],
            deps_rad: raw[1],
            dpsi_rate_rad_day: raw[2],
            deps_rate_rad_day: raw[3],
        })
    }

    /// Lunar libration Euler angles (rad) in `position_km` and their rates
    /// (rad/s) in `velocity_km_s`.
    pub fn query_libration(&self, jd: f64) -> Result<StateVector, OracleError> {
        let raw = self.compute(jd, Body::Librations, Body::SolarSystemBarycenter)?;
        Ok(StateVector::from_daily(raw))
    }

    fn compute(&self, jd: f64, target: Body, center: Body) -> Result<[f64; 6], OracleError> {
        let ready = self.ready.as_ref().ok_or(OracleError::NotInitialized)?;
        if !jd.is_finite() {
            return Err(LookupError::new(LookupError::OUT_OF_RANGE, format!("epoch {jd} is not finite")).into());
        }
        let raw = ready.provider.compute(jd, target, center)?;
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(LookupError::new(
                LookupError::READ_FAILURE,
                format!("non-finite {target} data at JD {jd}"),
            )
            .into());
        }
        Ok(raw)
    }
}

impl StateVector {
    /// Split a provider 6-vector, converting per-day rates to per-second.
    fn from_daily(raw: [f64; 6]) -> Self {
        Self {
            position_km: [raw[0], raw[1], raw[2]],
            velocity_km_s: [
                raw[3] / SECONDS_PER_DAY,
                raw[4] / SECONDS_PER_DAY,
                raw[5] / SECONDS_PER_DAY,
            ],
        }
    }
}

//! DE binary ephemeris reader.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::chebyshev::clenshaw_with_derivative;
use crate::error::KernelError;
use crate::header::{
    DeHeader, LIBRATIONS, LUNAR_MANTLE, NUTATIONS, QuantityLayout, TT_MINUS_TDB,
};

/// Upper bound on the header probe; covers several thousand constants.
const HEADER_PROBE_BYTES: u64 = 64 * 1024;

// DE query codes.
const EARTH: u32 = 3;
const MOON: u32 = 10;
const SUN: u32 = 11;
const SSB: u32 = 12;
const EMB: u32 = 13;
const NUTATION_CODE: u32 = 14;
const LIBRATION_CODE: u32 = 15;
const MANTLE_CODE: u32 = 16;
const TT_TDB_CODE: u32 = 17;

// Pointer-table indices of the positional series.
const IPT_EMB: usize = 2;
const IPT_MOON_GEO: usize = 9;
const IPT_SUN: usize = 10;

struct RecordCache {
    file: File,
    index: Option<usize>,
    raw: Vec<u8>,
    coeffs: Vec<f64>,
}

/// An opened JPL DE binary ephemeris.
///
/// Queries are answered from the Chebyshev record covering the epoch. File
/// access and the single-record cache sit behind a mutex, so a kernel can
/// be shared across threads.
pub struct DeKernel {
    path: PathBuf,
    header: DeHeader,
    constants: Vec<f64>,
    record_count: usize,
    cache: Mutex<RecordCache>,
}

impl DeKernel {
    /// Open a DE binary file and validate its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, KernelError> {
        let path = path.as_ref();
        let mut file = File::open(path)?;
        let file_len = file.metadata()?.len();

        let mut probe = Vec::new();
        (&mut file)
            .take(HEADER_PROBE_BYTES.min(file_len))
            .read_to_end(&mut probe)?;
        let header = DeHeader::parse(&probe)?;

        let record_bytes = header.record_bytes() as u64;
        let total_records = (file_len / record_bytes) as usize;
        if total_records < 3 {
            return Err(KernelError::InvalidFormat(format!(
                "{} holds {total_records} records, need header, constants and data",
                path.display()
            )));
        }
        let record_count = total_records - 2;

        let ncon = header.ncon();
        if ncon > header.record_len {
            return Err(KernelError::InvalidFormat(format!(
                "{ncon} constants do not fit a {}-value record",
                header.record_len
            )));
        }
        let mut raw = vec![0u8; header.record_bytes()];
        file.seek(SeekFrom::Start(record_bytes))?;
        file.read_exact(&mut raw)?;
        let constants = (0..ncon)
            .map(|i| header.endian.read_f64(&raw, i * 8))
            .collect();

        tracing::debug!(
            path = %path.display(),
            de = header.de_number,
            start = header.start_jd,
            end = header.end_jd,
            records = record_count,
            "opened DE ephemeris"
        );

        let coeffs = vec![0.0; header.record_len];
        Ok(Self {
            path: path.to_path_buf(),
            header,
            constants,
            record_count,
            cache: Mutex::new(RecordCache {
                file,
                index: None,
                raw,
                coeffs,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> &DeHeader {
        &self.header
    }

    /// `(start_jd, end_jd)` actually backed by data records.
    pub fn coverage(&self) -> (f64, f64) {
        let backed = self.header.start_jd + self.record_count as f64 * self.header.span_days;
        (self.header.start_jd, self.header.end_jd.min(backed))
    }

    /// Value of a named header constant such as `"AU"` or `"EMRAT"`.
    pub fn constant(&self, name: &str) -> Option<f64> {
        self.header
            .constant_names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.constants.get(i).copied())
    }

    /// All header constants as `(name, value)` pairs, in file order.
    pub fn constants(&self) -> impl Iterator<Item = (&str, f64)> {
        self.header
            .constant_names
            .iter()
            .map(String::as_str)
            .zip(self.constants.iter().copied())
    }

    /// General query by DE code.
    ///
    /// Codes 1..=13 give the state of `target` relative to `center` as
    /// position (km) and velocity (km/day). The non-positional codes ignore
    /// `center`:
    /// - 14: `[dpsi, deps, dpsi_rate, deps_rate, 0, 0]` (rad, rad/day)
    /// - 15: lunar libration angles and rates (rad, rad/day)
    /// - 16: lunar mantle angular velocity and its rate
    /// - 17: `[tt_minus_tdb, rate, 0, 0, 0, 0]` (s, s/day)
    pub fn compute(&self, jd: f64, target: u32, center: u32) -> Result<[f64; 6], KernelError> {
        match target {
            NUTATION_CODE => {
                let [dpsi, deps, dpsi_rate, deps_rate] = self.nutation(jd)?;
                Ok([dpsi, deps, dpsi_rate, deps_rate, 0.0, 0.0])
            }
            LIBRATION_CODE => self.libration(jd),
            MANTLE_CODE => self.vector_quantity(jd, LUNAR_MANTLE, MANTLE_CODE),
            TT_TDB_CODE => {
                let (value, rate) = self.tt_minus_tdb(jd)?;
                Ok([value, rate, 0.0, 0.0, 0.0, 0.0])
            }
            _ => self.state(jd, target, center),
        }
    }

    /// State of `target` relative to `center`, both DE body codes 1..=13.
    pub fn state(&self, jd: f64, target: u32, center: u32) -> Result<[f64; 6], KernelError> {
        let valid = |code: u32| (1..=EMB).contains(&code);
        if !valid(target) || !valid(center) {
            return Err(KernelError::InvalidBody { target, center });
        }
        self.check_coverage(jd)?;
        if target == center {
            return Ok([0.0; 6]);
        }

        self.with_record(jd, |coeffs| {
            // The geocentric Moon is stored directly; skip the barycentric detour.
            match (target, center) {
                (MOON, EARTH) => return self.eval(coeffs, jd, IPT_MOON_GEO, MOON),
                (EARTH, MOON) => return self.eval(coeffs, jd, IPT_MOON_GEO, MOON).map(negate),
                _ => {}
            }
            let t = self.barycentric(coeffs, jd, target)?;
            let c = self.barycentric(coeffs, jd, center)?;
            Ok(std::array::from_fn(|i| t[i] - c[i]))
        })
    }

    /// Nutation in longitude and obliquity with their rates.
    pub fn nutation(&self, jd: f64) -> Result<[f64; 4], KernelError> {
        self.check_coverage(jd)?;
        self.with_record(jd, |coeffs| {
            let v = self.eval(coeffs, jd, NUTATIONS, NUTATION_CODE)?;
            Ok([v[0], v[1], v[3], v[4]])
        })
    }

    /// Lunar mantle libration angles and rates.
    pub fn libration(&self, jd: f64) -> Result<[f64; 6], KernelError> {
        self.vector_quantity(jd, LIBRATIONS, LIBRATION_CODE)
    }

    /// TT-TDB in seconds and its rate in seconds per day.
    pub fn tt_minus_tdb(&self, jd: f64) -> Result<(f64, f64), KernelError> {
        self.check_coverage(jd)?;
        self.with_record(jd, |coeffs| {
            let v = self.eval(coeffs, jd, TT_MINUS_TDB, TT_TDB_CODE)?;
            Ok((v[0], v[3]))
        })
    }

    fn vector_quantity(&self, jd: f64, index: usize, code: u32) -> Result<[f64; 6], KernelError> {
        self.check_coverage(jd)?;
        self.with_record(jd, |coeffs| self.eval(coeffs, jd, index, code))
    }

    fn check_coverage(&self, jd: f64) -> Result<(), KernelError> {
        let (start, end) = self.coverage();
        if !jd.is_finite() || jd < start || jd > end {
            return Err(KernelError::OutOfRange { jd, start, end });
        }
        Ok(())
    }

    /// Run `f` on the coefficient record covering `jd`, loading it if needed.
    fn with_record<T>(
        &self,
        jd: f64,
        f: impl FnOnce(&[f64]) -> Result<T, KernelError>,
    ) -> Result<T, KernelError> {
        let offset = (jd - self.header.start_jd) / self.header.span_days;
        let index = (offset.floor().max(0.0) as usize).min(self.record_count - 1);

        let mut guard = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.index != Some(index) {
            guard.index = None;
            let cache = &mut *guard;
            let at = (index as u64 + 2) * self.header.record_bytes() as u64;
            cache.file.seek(SeekFrom::Start(at))?;
            cache.file.read_exact(&mut cache.raw)?;
            let endian = self.header.endian;
            for (i, slot) in cache.coeffs.iter_mut().enumerate() {
                *slot = endian.read_f64(&cache.raw, i * 8);
            }
            cache.index = Some(index);
            tracing::trace!(record = index, "loaded DE record");
        }
        f(&guard.coeffs)
    }

    fn barycentric(&self, coeffs: &[f64], jd: f64, code: u32) -> Result<[f64; 6], KernelError> {
        let emrat = self.header.emrat;
        match code {
            SSB => Ok([0.0; 6]),
            EMB => self.eval(coeffs, jd, IPT_EMB, EMB),
            SUN => self.eval(coeffs, jd, IPT_SUN, SUN),
            EARTH | MOON => {
                let emb = self.eval(coeffs, jd, IPT_EMB, EMB)?;
                let moon = self.eval(coeffs, jd, IPT_MOON_GEO, MOON)?;
                let k = if code == EARTH {
                    -1.0 / (1.0 + emrat)
                } else {
                    emrat / (1.0 + emrat)
                };
                Ok(std::array::from_fn(|i| emb[i] + k * moon[i]))
            }
            // Mercury, Venus, Mars..Pluto map straight onto the pointer table.
            _ => self.eval(coeffs, jd, (code - 1) as usize, code),
        }
    }

    /// Interpolate one quantity from a loaded record.
    ///
    /// Positions land in `[0..components]`, rates in `[3..3 + components]`.
    fn eval(
        &self,
        coeffs: &[f64],
        jd: f64,
        index: usize,
        code: u32,
    ) -> Result<[f64; 6], KernelError> {
        let layout: QuantityLayout = self.header.layouts[index];
        if !layout.is_present() {
            return Err(KernelError::MissingQuantity(code));
        }

        let span = self.header.span_days;
        let nsub = layout.nsub as f64;
        let t = ((jd - coeffs[0]) / span).clamp(0.0, 1.0);
        let sub = ((t * nsub).floor() as usize).min(layout.nsub - 1);
        let s = 2.0 * (t * nsub - sub as f64) - 1.0;
        let rate_scale = 2.0 * nsub / span;

        let base = layout.offset + sub * layout.components * layout.ncoef;
        let mut out = [0.0; 6];
        for c in 0..layout.components {
            let start = base + c * layout.ncoef;
            let (value, slope) = clenshaw_with_derivative(&coeffs[start..start + layout.ncoef], s);
            out[c] = value;
            out[3 + c] = slope * rate_scale;
        }
        Ok(out)
    }
}

fn negate(v: [f64; 6]) -> [f64; 6] {
    v.map(|x| -x)
}

impl std::fmt::Debug for DeKernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeKernel")
            .field("path", &self.path)
            .field("de_number", &self.header.de_number)
            .field("coverage", &self.coverage())
            .finish()
    }
}

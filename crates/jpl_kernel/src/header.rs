//! DE binary header record.
//!
//! The first record of a DE binary file holds the titles, constant names,
//! coverage, and the coefficient pointer table. Byte offsets:
//!
//! ```text
//!    0  3 x 84-byte title lines
//!  252  400 x 6-byte constant names
//! 2652  start JD, end JD, record span (f64 x 3)
//! 2676  ncon (i32)
//! 2680  AU in km (f64)
//! 2688  Earth/Moon mass ratio (f64)
//! 2696  coefficient pointers, 12 x 3 i32 (offset, ncoef, nsub)
//! 2840  DE number (i32)
//! 2844  libration pointer (3 x i32)
//! 2856  (ncon - 400) x 6-byte extra names, when ncon > 400
//!       lunar mantle pointer (3 x i32), TT-TDB pointer (3 x i32)
//! ```

use crate::error::KernelError;

const TITLE_LEN: usize = 84;
const NAME_LEN: usize = 6;
const NAMES_IN_HEADER: usize = 400;
const OFF_NAMES: usize = 3 * TITLE_LEN;
const OFF_SS: usize = OFF_NAMES + NAMES_IN_HEADER * NAME_LEN;
const OFF_NCON: usize = OFF_SS + 24;
const OFF_AU: usize = OFF_NCON + 4;
const OFF_EMRAT: usize = OFF_AU + 8;
const OFF_IPT: usize = OFF_EMRAT + 8;
const OFF_NUMDE: usize = OFF_IPT + 12 * 3 * 4;
const OFF_LPT: usize = OFF_NUMDE + 4;
const OFF_EXTRA: usize = OFF_LPT + 12;

/// Number of quantities a DE file can carry.
pub const QUANTITY_COUNT: usize = 15;
/// Pointer-table index of the nutation series (2 components).
pub const NUTATIONS: usize = 11;
/// Pointer-table index of the lunar libration series.
pub const LIBRATIONS: usize = 12;
/// Pointer-table index of the lunar mantle angular velocity.
pub const LUNAR_MANTLE: usize = 13;
/// Pointer-table index of TT-TDB (1 component).
pub const TT_MINUS_TDB: usize = 14;

/// Byte order of the numeric fields in a DE file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

impl Endian {
    /// Decode the f64 at byte offset `at`. Caller checks bounds.
    pub fn read_f64(self, bytes: &[u8], at: usize) -> f64 {
        let mut arr = [0u8; 8];
        arr.copy_from_slice(&bytes[at..at + 8]);
        match self {
            Self::Little => f64::from_le_bytes(arr),
            Self::Big => f64::from_be_bytes(arr),
        }
    }

    /// Decode the i32 at byte offset `at`. Caller checks bounds.
    pub fn read_i32(self, bytes: &[u8], at: usize) -> i32 {
        let mut arr = [0u8; 4];
        arr.copy_from_slice(&bytes[at..at + 4]);
        match self {
            Self::Little => i32::from_le_bytes(arr),
            Self::Big => i32::from_be_bytes(arr),
        }
    }
}

/// Where one quantity's coefficients live inside a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantityLayout {
    /// 0-based index of the first coefficient (in f64 units).
    pub offset: usize,
    /// Coefficients per component per sub-interval.
    pub ncoef: usize,
    /// Sub-intervals per record.
    pub nsub: usize,
    /// Components per sample (3 for vectors, 2 for nutations, 1 for TT-TDB).
    pub components: usize,
}

impl QuantityLayout {
    pub fn is_present(&self) -> bool {
        self.ncoef > 0 && self.nsub > 0
    }

    /// One past the last f64 this quantity occupies.
    pub fn end(&self) -> usize {
        self.offset + self.ncoef * self.nsub * self.components
    }
}

/// Components per sample for each pointer-table index.
pub fn components_for(index: usize) -> usize {
    match index {
        NUTATIONS => 2,
        TT_MINUS_TDB => 1,
        _ => 3,
    }
}

/// Parsed DE header.
#[derive(Debug, Clone, PartialEq)]
pub struct DeHeader {
    pub titles: Vec<String>,
    pub endian: Endian,
    pub de_number: i32,
    pub start_jd: f64,
    pub end_jd: f64,
    pub span_days: f64,
    pub au_km: f64,
    pub emrat: f64,
    pub constant_names: Vec<String>,
    pub layouts: [QuantityLayout; QUANTITY_COUNT],
    /// Data record length in f64 units.
    pub record_len: usize,
}

impl DeHeader {
    /// Bytes that must be available to parse a header with `ncon` constants.
    pub fn required_len(ncon: usize) -> usize {
        OFF_EXTRA + ncon.saturating_sub(NAMES_IN_HEADER) * NAME_LEN + 24
    }

    /// Parse the header from the leading bytes of a DE file.
    pub fn parse(bytes: &[u8]) -> Result<Self, KernelError> {
        if bytes.len() < OFF_EXTRA {
            return Err(KernelError::InvalidFormat(format!(
                "header needs at least {OFF_EXTRA} bytes, file has {}",
                bytes.len()
            )));
        }

        let endian = detect_endian(bytes)?;
        let de_number = endian.read_i32(bytes, OFF_NUMDE);
        let ncon = endian.read_i32(bytes, OFF_NCON) as usize;

        let needed = Self::required_len(ncon);
        if bytes.len() < needed {
            return Err(KernelError::InvalidFormat(format!(
                "header with {ncon} constants needs {needed} bytes, file has {}",
                bytes.len()
            )));
        }

        let titles = (0..3)
            .map(|i| ascii_field(&bytes[i * TITLE_LEN..(i + 1) * TITLE_LEN]))
            .collect();

        let mut constant_names = Vec::with_capacity(ncon);
        for i in 0..ncon {
            let at = if i < NAMES_IN_HEADER {
                OFF_NAMES + i * NAME_LEN
            } else {
                OFF_EXTRA + (i - NAMES_IN_HEADER) * NAME_LEN
            };
            constant_names.push(ascii_field(&bytes[at..at + NAME_LEN]));
        }

        let start_jd = endian.read_f64(bytes, OFF_SS);
        let end_jd = endian.read_f64(bytes, OFF_SS + 8);
        let span_days = endian.read_f64(bytes, OFF_SS + 16);
        let au_km = endian.read_f64(bytes, OFF_AU);
        let emrat = endian.read_f64(bytes, OFF_EMRAT);

        if !(start_jd.is_finite() && end_jd.is_finite() && end_jd > start_jd) {
            return Err(KernelError::InvalidFormat(format!(
                "bad coverage [{start_jd}, {end_jd}]"
            )));
        }
        if !(span_days.is_finite() && span_days > 0.0) {
            return Err(KernelError::InvalidFormat(format!(
                "bad record span {span_days}"
            )));
        }
        if !(emrat.is_finite() && emrat > 0.0) {
            return Err(KernelError::InvalidFormat(format!("bad EMRAT {emrat}")));
        }

        let pointer_at = |index: usize| -> usize {
            match index {
                0..=11 => OFF_IPT + index * 12,
                LIBRATIONS => OFF_LPT,
                _ => {
                    let extra = ncon.saturating_sub(NAMES_IN_HEADER) * NAME_LEN;
                    OFF_EXTRA + extra + (index - LUNAR_MANTLE) * 12
                }
            }
        };

        let mut layouts = [QuantityLayout::default(); QUANTITY_COUNT];
        for (index, layout) in layouts.iter_mut().enumerate() {
            let at = pointer_at(index);
            let offset = endian.read_i32(bytes, at);
            let ncoef = endian.read_i32(bytes, at + 4);
            let nsub = endian.read_i32(bytes, at + 8);
            if ncoef <= 0 || nsub <= 0 {
                continue;
            }
            // Pointers are 1-based and the first two slots hold the record's JD bounds.
            if offset < 3 {
                return Err(KernelError::InvalidFormat(format!(
                    "quantity {index} has coefficient offset {offset}"
                )));
            }
            *layout = QuantityLayout {
                offset: (offset - 1) as usize,
                ncoef: ncoef as usize,
                nsub: nsub as usize,
                components: components_for(index),
            };
        }

        let record_len = layouts
            .iter()
            .filter(|l| l.is_present())
            .map(QuantityLayout::end)
            .max()
            .unwrap_or(0);
        if record_len < 3 {
            return Err(KernelError::InvalidFormat(
                "no coefficient pointers in header".into(),
            ));
        }

        Ok(Self {
            titles,
            endian,
            de_number,
            start_jd,
            end_jd,
            span_days,
            au_km,
            emrat,
            constant_names,
            layouts,
            record_len,
        })
    }

    /// Record length in bytes.
    pub fn record_bytes(&self) -> usize {
        self.record_len * 8
    }

    pub fn ncon(&self) -> usize {
        self.constant_names.len()
    }
}

fn plausible(numde: i32, ncon: i32) -> bool {
    (1..=9999).contains(&numde) && (0..=9999).contains(&ncon)
}

fn detect_endian(bytes: &[u8]) -> Result<Endian, KernelError> {
    for endian in [Endian::Little, Endian::Big] {
        let numde = endian.read_i32(bytes, OFF_NUMDE);
        let ncon = endian.read_i32(bytes, OFF_NCON);
        if plausible(numde, ncon) {
            return Ok(endian);
        }
    }
    Err(KernelError::InvalidFormat(
        "cannot determine byte order (implausible DE number)".into(),
    ))
}

fn ascii_field(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

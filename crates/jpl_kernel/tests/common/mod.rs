//! Writer for small synthetic DE binary files with predictable coefficients.
//!
//! Every present quantity stores `[a, b, 0, ...]` per component, so the
//! interpolated value is `a + b*s` and the rate is `b * 2*nsub/span`.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use jpl_kernel::Endian;

pub const START_JD: f64 = 2451536.5;
pub const SPAN_DAYS: f64 = 32.0;
pub const RECORDS: usize = 3;
pub const EMRAT: f64 = 81.300_568_221_497_22;
pub const AU_KM: f64 = 149_597_870.7;
pub const DE_NUMBER: i32 = 499;

const BODY_NCOEF: usize = 6;
const OTHER_NCOEF: usize = 3;

/// `(ncoef, nsub, components)` per pointer-table index; `None` = absent.
pub fn layout(index: usize) -> Option<(usize, usize, usize)> {
    match index {
        0..=10 => Some((BODY_NCOEF, 2, 3)),
        11 => Some((OTHER_NCOEF, 1, 2)),
        12 => Some((OTHER_NCOEF, 1, 3)),
        13 => None,
        14 => Some((OTHER_NCOEF, 1, 1)),
        _ => None,
    }
}

pub fn constant_term(index: usize, component: usize, sub: usize, record: usize) -> f64 {
    1000.0 * (index as f64 + 1.0) + 100.0 * component as f64 + 10.0 * sub as f64 + record as f64
}

pub fn linear_term(index: usize, component: usize) -> f64 {
    index as f64 + 1.0 + component as f64
}

/// Expected `(value, rate per day)` for one component of quantity `index`.
pub fn expected(index: usize, component: usize, jd: f64) -> (f64, f64) {
    let (_, nsub, _) = layout(index).expect("quantity present");
    let offset = (jd - START_JD) / SPAN_DAYS;
    let record = (offset.floor() as usize).min(RECORDS - 1);
    let t = offset - record as f64;
    let sub = ((t * nsub as f64).floor() as usize).min(nsub - 1);
    let s = 2.0 * (t * nsub as f64 - sub as f64) - 1.0;
    let b = linear_term(index, component);
    (
        constant_term(index, component, sub, record) + b * s,
        b * 2.0 * nsub as f64 / SPAN_DAYS,
    )
}

/// Expected 6-vector (positions then rates) of quantity `index`.
pub fn expected_vector(index: usize, jd: f64) -> [f64; 6] {
    let (_, _, components) = layout(index).expect("quantity present");
    let mut out = [0.0; 6];
    for c in 0..components {
        let (v, r) = expected(index, c, jd);
        out[c] = v;
        out[3 + c] = r;
    }
    out
}

struct Writer {
    endian: Endian,
    bytes: Vec<u8>,
}

impl Writer {
    fn f64_at(&mut self, at: usize, v: f64) {
        let raw = match self.endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        };
        self.bytes[at..at + 8].copy_from_slice(&raw);
    }

    fn i32_at(&mut self, at: usize, v: i32) {
        let raw = match self.endian {
            Endian::Little => v.to_le_bytes(),
            Endian::Big => v.to_be_bytes(),
        };
        self.bytes[at..at + 4].copy_from_slice(&raw);
    }
}

/// Write a synthetic DE file and return its record length in f64 units.
pub fn write_de(path: &Path, endian: Endian) -> usize {
    let mut offsets = [0usize; 15];
    let mut next = 2;
    for (index, slot) in offsets.iter_mut().enumerate() {
        if let Some((ncoef, nsub, comps)) = layout(index) {
            *slot = next;
            next += ncoef * nsub * comps;
        }
    }
    let record_len = next;
    let record_bytes = record_len * 8;
    assert!(record_bytes >= 2880, "header must fit in one record");

    let mut w = Writer {
        endian,
        bytes: vec![0u8; record_bytes * (RECORDS + 2)],
    };

    // Header record.
    let title = b"JPL Planetary Ephemeris DE499/synthetic";
    w.bytes[..title.len()].copy_from_slice(title);
    let names: [&[u8; 6]; 3] = [b"AU    ", b"EMRAT ", b"DENUM "];
    for (i, name) in names.iter().enumerate() {
        let at = 252 + i * 6;
        w.bytes[at..at + 6].copy_from_slice(&name[..]);
    }
    w.f64_at(2652, START_JD);
    w.f64_at(2660, START_JD + RECORDS as f64 * SPAN_DAYS);
    w.f64_at(2668, SPAN_DAYS);
    w.i32_at(2676, names.len() as i32);
    w.f64_at(2680, AU_KM);
    w.f64_at(2688, EMRAT);
    for index in 0..15 {
        let Some((ncoef, nsub, _)) = layout(index) else {
            continue;
        };
        let at = match index {
            0..=11 => 2696 + index * 12,
            12 => 2844,
            // ncon <= 400: no extra names before the mantle/TT-TDB pointers.
            _ => 2856 + (index - 13) * 12,
        };
        w.i32_at(at, offsets[index] as i32 + 1);
        w.i32_at(at + 4, ncoef as i32);
        w.i32_at(at + 8, nsub as i32);
    }
    w.i32_at(2840, DE_NUMBER);

    // Constants record.
    w.f64_at(record_bytes, AU_KM);
    w.f64_at(record_bytes + 8, EMRAT);
    w.f64_at(record_bytes + 16, DE_NUMBER as f64);

    // Data records.
    for record in 0..RECORDS {
        let base = (record + 2) * record_bytes;
        let jd0 = START_JD + record as f64 * SPAN_DAYS;
        w.f64_at(base, jd0);
        w.f64_at(base + 8, jd0 + SPAN_DAYS);
        for index in 0..15 {
            let Some((ncoef, nsub, comps)) = layout(index) else {
                continue;
            };
            for sub in 0..nsub {
                for c in 0..comps {
                    let first = offsets[index] + (sub * comps + c) * ncoef;
                    w.f64_at(base + first * 8, constant_term(index, c, sub, record));
                    w.f64_at(base + (first + 1) * 8, linear_term(index, c));
                }
            }
        }
    }

    fs::write(path, &w.bytes).expect("write synthetic DE file");
    record_len
}

//! Integration tests for DE file loading and evaluation.
//!
//! Most tests run against a synthetic file written to a temp dir; the
//! `real_*` tests need a DE file under `ephem/` and skip otherwise.

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use jpl_kernel::{DeKernel, Endian, KernelError};
use tempfile::TempDir;

use common::{expected, expected_vector};

const MERCURY: u32 = 1;
const EARTH: u32 = 3;
const MARS: u32 = 4;
const MOON: u32 = 10;
const SUN: u32 = 11;
const SSB: u32 = 12;
const EMB: u32 = 13;

fn synthetic(endian: Endian) -> (TempDir, DeKernel) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("synthetic.499");
    common::write_de(&path, endian);
    let kernel = DeKernel::open(&path).expect("should open synthetic DE file");
    (dir, kernel)
}

fn assert_close(actual: &[f64; 6], expected: &[f64; 6], tol: f64) {
    for i in 0..6 {
        assert!(
            (actual[i] - expected[i]).abs() <= tol,
            "component {i}: {} vs {}",
            actual[i],
            expected[i]
        );
    }
}

#[test]
fn header_and_constants() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let header = kernel.header();
    assert_eq!(header.de_number, common::DE_NUMBER);
    assert_eq!(header.endian, Endian::Little);
    assert!(header.titles[0].starts_with("JPL Planetary Ephemeris"));
    assert_eq!(kernel.constant("EMRAT"), Some(common::EMRAT));
    assert_eq!(kernel.constant("AU"), Some(common::AU_KM));
    assert_eq!(kernel.constant("GMS"), None);
    assert_eq!(kernel.constants().count(), 3);

    let (start, end) = kernel.coverage();
    assert_eq!(start, common::START_JD);
    assert_eq!(end, common::START_JD + 3.0 * common::SPAN_DAYS);
}

#[test]
fn planet_relative_to_ssb() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let jd = common::START_JD + 8.0;
    let state = kernel.state(jd, MARS, SSB).expect("Mars wrt SSB");
    assert_close(&state, &expected_vector(3, jd), 1e-9);
    // s = 0 at the middle of the first sub-interval.
    assert_eq!(state[0], common::constant_term(3, 0, 0, 0));
}

#[test]
fn sub_interval_and_record_selection() {
    let (_dir, kernel) = synthetic(Endian::Little);
    for offset in [0.0, 3.5, 16.0, 24.0, 31.999, 32.0, 40.25, 70.0, 96.0] {
        let jd = common::START_JD + offset;
        let state = kernel.state(jd, MERCURY, SSB).expect("Mercury");
        assert_close(&state, &expected_vector(0, jd), 1e-8);
    }
}

#[test]
fn velocity_scaled_to_days() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let jd = common::START_JD + 20.0;
    let state = kernel.state(jd, SUN, SSB).expect("Sun");
    // b * 2 * nsub / span with nsub = 2.
    let b = common::linear_term(10, 1);
    assert!((state[4] - b * 4.0 / common::SPAN_DAYS).abs() < 1e-12);
}

#[test]
fn earth_and_moon_from_emb() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let jd = common::START_JD + 45.0;
    let emb = expected_vector(2, jd);
    let moon_geo = expected_vector(9, jd);
    let f = 1.0 + common::EMRAT;

    let earth = kernel.state(jd, EARTH, SSB).expect("Earth");
    let want_earth: [f64; 6] = std::array::from_fn(|i| emb[i] - moon_geo[i] / f);
    assert_close(&earth, &want_earth, 1e-8);

    let moon = kernel.state(jd, MOON, SSB).expect("Moon");
    let want_moon: [f64; 6] =
        std::array::from_fn(|i| emb[i] + moon_geo[i] * common::EMRAT / f);
    assert_close(&moon, &want_moon, 1e-8);

    let geo = kernel.state(jd, MOON, EARTH).expect("Moon wrt Earth");
    assert_close(&geo, &moon_geo, 1e-12);
    let inverse = kernel.state(jd, EARTH, MOON).expect("Earth wrt Moon");
    assert_close(&inverse, &moon_geo.map(|x| -x), 1e-12);

    let emb_state = kernel.state(jd, EMB, SSB).expect("EMB");
    assert_close(&emb_state, &emb, 1e-12);
}

#[test]
fn sun_relative_to_earth() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let jd = common::START_JD + 10.0;
    let sun = kernel.state(jd, SUN, SSB).unwrap();
    let earth = kernel.state(jd, EARTH, SSB).unwrap();
    let rel = kernel.state(jd, SUN, EARTH).unwrap();
    let want: [f64; 6] = std::array::from_fn(|i| sun[i] - earth[i]);
    assert_close(&rel, &want, 1e-9);
}

#[test]
fn same_target_and_center_is_zero() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let state = kernel.state(common::START_JD + 1.0, MARS, MARS).unwrap();
    assert_eq!(state, [0.0; 6]);
}

#[test]
fn outside_coverage_is_code_minus_one() {
    let (_dir, kernel) = synthetic(Endian::Little);
    for jd in [common::START_JD - 0.5, common::START_JD + 96.5, f64::NAN] {
        let err = kernel.state(jd, MOON, EARTH).unwrap_err();
        assert!(matches!(err, KernelError::OutOfRange { .. }), "{err}");
        assert_eq!(err.lookup_code(), -1);
    }
}

#[test]
fn invalid_codes_are_code_minus_five() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let jd = common::START_JD + 1.0;
    for (target, center) in [(0, 3), (18, 3), (3, 14), (10, 99)] {
        let err = kernel.compute(jd, target, center).unwrap_err();
        assert_eq!(err.lookup_code(), -5, "({target}, {center})");
    }
}

#[test]
fn absent_quantity_is_code_minus_three() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let err = kernel.compute(common::START_JD + 1.0, 16, 0).unwrap_err();
    assert_eq!(err, KernelError::MissingQuantity(16));
    assert_eq!(err.lookup_code(), -3);
}

#[test]
fn nutation_librations_and_time_scale() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let jd = common::START_JD + 40.0;

    let nut = kernel.nutation(jd).expect("nutation");
    let (dpsi, dpsi_rate) = expected(11, 0, jd);
    let (deps, deps_rate) = expected(11, 1, jd);
    assert!((nut[0] - dpsi).abs() < 1e-9);
    assert!((nut[1] - deps).abs() < 1e-9);
    assert!((nut[2] - dpsi_rate).abs() < 1e-12);
    assert!((nut[3] - deps_rate).abs() < 1e-12);

    let packed = kernel.compute(jd, 14, 0).expect("nutation by code");
    assert_eq!(&packed[..4], &nut[..]);

    let lib = kernel.libration(jd).expect("librations");
    assert_close(&lib, &expected_vector(12, jd), 1e-9);

    let (tt_tdb, rate) = kernel.tt_minus_tdb(jd).expect("TT-TDB");
    let (want, want_rate) = expected(14, 0, jd);
    assert!((tt_tdb - want).abs() < 1e-9);
    assert!((rate - want_rate).abs() < 1e-12);
}

#[test]
fn big_endian_file_matches_little_endian() {
    let (_a, little) = synthetic(Endian::Little);
    let (_b, big) = synthetic(Endian::Big);
    assert_eq!(big.header().endian, Endian::Big);
    assert_eq!(big.constant("EMRAT"), Some(common::EMRAT));
    let jd = common::START_JD + 50.0;
    for (target, center) in [(MOON, EARTH), (SUN, EARTH), (MARS, SSB)] {
        assert_eq!(
            little.state(jd, target, center).unwrap(),
            big.state(jd, target, center).unwrap()
        );
    }
}

#[test]
fn shared_across_threads() {
    let (_dir, kernel) = synthetic(Endian::Little);
    let kernel = Arc::new(kernel);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let kernel = Arc::clone(&kernel);
            std::thread::spawn(move || {
                // Alternate records so the cache is repeatedly invalidated.
                let jd = common::START_JD + 5.0 + 30.0 * (i % 3) as f64;
                let mut last = [0.0; 6];
                for _ in 0..50 {
                    last = kernel.state(jd, SUN, SSB).expect("Sun");
                }
                (jd, last)
            })
        })
        .collect();
    for handle in handles {
        let (jd, state) = handle.join().expect("thread");
        assert_close(&state, &expected_vector(10, jd), 1e-9);
    }
}

#[test]
fn truncated_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.499");
    let record_len = common::write_de(&path, Endian::Little);
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..record_len * 8 * 2]).unwrap();
    let err = DeKernel::open(&path).unwrap_err();
    assert!(matches!(err, KernelError::InvalidFormat(_)), "{err}");
}

fn real_kernel() -> Option<DeKernel> {
    let base: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../ephem");
    for name in [
        "lnxm13000p17000.431",
        "linux_p1550p2650.430t",
        "linux_p1550p2650.430",
    ] {
        let path = base.join(name);
        if path.exists() {
            return Some(DeKernel::open(&path).expect("should open DE file"));
        }
    }
    eprintln!("Skipping: no DE file under {}", base.display());
    None
}

#[test]
fn real_moon_distance_at_j2000() {
    let Some(kernel) = real_kernel() else {
        return;
    };
    let state = kernel.state(2451545.0, MOON, EARTH).expect("Moon at J2000");
    let r = (state[0].powi(2) + state[1].powi(2) + state[2].powi(2)).sqrt();
    assert!(r > 356_000.0 && r < 407_000.0, "Moon distance {r:.0} km");
    let emrat = kernel.constant("EMRAT").expect("EMRAT constant");
    assert!((emrat - 81.3).abs() < 0.01);
}

#[test]
fn real_earth_sun_distance_at_j2000() {
    let Some(kernel) = real_kernel() else {
        return;
    };
    let state = kernel.state(2451545.0, SUN, EARTH).expect("Sun at J2000");
    let r = (state[0].powi(2) + state[1].powi(2) + state[2].powi(2)).sqrt();
    let au = kernel.header().au_km;
    assert!(r > 0.98 * au && r < 0.99 * au, "Sun distance {r:.0} km");
}

//! Pure-Rust reader for JPL DE binary planetary ephemerides.
//!
//! Handles the classic `lnxm*/linux_p*` DE files (DE405 through DE441):
//! header parsing with byte-order detection, record loading, and Chebyshev
//! evaluation of positions, nutations, librations and TT-TDB.

pub mod chebyshev;
mod error;
pub mod header;
mod kernel;

pub use error::KernelError;
pub use header::{DeHeader, Endian, QuantityLayout};
pub use kernel::DeKernel;

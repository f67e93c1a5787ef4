//! Benchmark profiles for the recon consistency checker.
//!
//! - [`reference_snapshot`]: 32x32x32 grid (32K cells), 13-species network
//! - [`stress_snapshot`]: 48x48x48 grid (~110K cells), same network
//! - [`scattered_violations`]: deterministic sprinkling of bad cells

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use recon_core::{GridDims, Snapshot};
use recon_test_utils::{omegadot_err_name, SnapshotBuilder};

/// Species of a 13-isotope alpha-chain network.
pub const ALPHA_CHAIN: [&str; 13] = [
    "He4", "C12", "O16", "Ne20", "Mg24", "Si28", "S32", "Ar36", "Ca40", "Ti44", "Cr48", "Fe52",
    "Ni56",
];

/// Consistent 32x32x32 snapshot carrying the full alpha-chain layout.
pub fn reference_snapshot() -> Snapshot {
    SnapshotBuilder::cube(32, &ALPHA_CHAIN).time(1.0e-2).build()
}

/// Consistent 48x48x48 snapshot for stress runs.
pub fn stress_snapshot() -> Snapshot {
    SnapshotBuilder::cube(48, &ALPHA_CHAIN).time(1.0e-2).build()
}

/// Snapshot where every `stride`-th cell along x violates each
/// omegadot field, tolerance-sized so literal and magnitude modes
/// both flag it.
pub fn scattered_violations(n: u32, stride: u32) -> Snapshot {
    let dims = match GridDims::new_3d(n, n, n) {
        Ok(dims) => dims,
        Err(e) => panic!("bench grid {n}^3 rejected: {e}"),
    };
    let mut builder = SnapshotBuilder::new(dims, &ALPHA_CHAIN);
    for (s, species) in ALPHA_CHAIN.iter().enumerate() {
        let name = omegadot_err_name(species);
        let mut x = s as u32 % stride.max(1);
        while x < n {
            builder = builder.set(&name, &[x, x % n, (x + s as u32) % n], 1.0e-12);
            x += stride.max(1);
        }
    }
    builder.build()
}

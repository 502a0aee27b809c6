//! Reporter: flat tabular text output for sweep results.
//!
//! Column layout is fixed: 20-character right-aligned fields with 10 decimal
//! places. I/O failures surface to the caller and never touch the in-memory
//! statistics.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use nalgebra::DMatrix;

use crate::sampling::StatisticsRow;

/// Write the statistics table, one row per variational parameter.
pub fn write_statistics<P: AsRef<Path>>(path: P, rows: &[StatisticsRow]) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(
        out,
        "{:>20}{:>20}{:>20}",
        "alpha", "variance_energy", "expected_energy"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:>20.10}{:>20.10}{:>20.10}",
            row.alpha, row.variance, row.energy
        )?;
    }
    out.flush()
}

/// Statistics table normalized per particle.
pub fn write_statistics_per_particle<P: AsRef<Path>>(
    path: P,
    rows: &[StatisticsRow],
    n_particles: usize,
) -> io::Result<()> {
    let n = n_particles as f64;
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(
        out,
        "{:>20}{:>20}{:>20}",
        "alpha", "variance_energy", "expected_energy"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:>20.10}{:>20.10}{:>20.10}",
            row.alpha,
            row.variance / n,
            row.energy / n
        )?;
    }
    out.flush()
}

/// Write the per-cycle energy log: first line the alpha values, then one row
/// per Monte Carlo cycle with one column per parameter.
pub fn write_energies<P: AsRef<Path>>(
    path: P,
    rows: &[StatisticsRow],
    energies: &DMatrix<f64>,
) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for row in rows {
        write!(out, "{:>20.10}", row.alpha)?;
    }
    writeln!(out)?;
    for r in 0..energies.nrows() {
        for c in 0..energies.ncols() {
            write!(out, "{:>20.10}", energies[(r, c)])?;
        }
        writeln!(out)?;
    }
    out.flush()
}

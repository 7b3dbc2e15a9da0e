//! Row-partitioned multithreaded strategy.
//!
//! Each pass splits the destination rows into a [`RowPartition`] and hands
//! every worker its own `&mut` slice of rows, so writes never overlap.
//! Sources are shared read-only. The horizontal pass must finish entirely
//! before the vertical pass starts, since vertical taps read temporary rows
//! written by other workers; the parallel iterator returning is that barrier.

use log::trace;
use rayon::prelude::*;

use super::convolve::{convolve_region, LaneTap, Pass, Plane, Region};
use super::partition::RowPartition;
use crate::kernel::GaussianKernel;
use crate::ImageBuffer;

pub(crate) fn run(
    input: &ImageBuffer,
    temp: &mut ImageBuffer,
    output: &mut ImageBuffer,
    kernel: &GaussianKernel,
    workers: usize,
) {
    let partition = RowPartition::new(input.height(), workers);
    trace!(
        "parallel blur: {} rows over {} workers",
        input.height(),
        partition.len()
    );

    run_pass(&Plane::new(input), temp, kernel, Pass::Horizontal, &partition);
    run_pass(&Plane::new(temp), output, kernel, Pass::Vertical, &partition);
}

fn run_pass(
    source: &Plane<'_>,
    destination: &mut ImageBuffer,
    kernel: &GaussianKernel,
    pass: Pass,
    partition: &RowPartition,
) {
    let width = source.width();
    let row_len = destination.row_len();

    partition
        .split_mut(destination.data_mut(), row_len)
        .into_par_iter()
        .for_each(|(rows, chunk)| {
            let region = Region {
                columns: 0..width,
                rows: rows.clone(),
            };
            convolve_region::<LaneTap>(source, kernel, pass, &region, chunk, rows.start);
        });
}

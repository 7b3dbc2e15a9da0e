//! Single-threaded strategy with the tap reduction done in 8-wide lanes.
//!
//! Same `y, x, c` loop nest as the scalar strategy. Only the innermost
//! reduction over kernel taps changes: see [`LaneTap`].

use super::convolve::{two_pass, LaneTap};
use crate::kernel::GaussianKernel;
use crate::ImageBuffer;

pub(crate) fn run(
    input: &ImageBuffer,
    temp: &mut ImageBuffer,
    output: &mut ImageBuffer,
    kernel: &GaussianKernel,
) {
    two_pass::<LaneTap>(input, temp, output, kernel);
}

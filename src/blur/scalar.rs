//! Reference strategy: plain nested loops, one multiply-add per tap.
//!
//! Every other strategy is validated against this one.

use super::convolve::{two_pass, ScalarTap};
use crate::kernel::GaussianKernel;
use crate::ImageBuffer;

pub(crate) fn run(
    input: &ImageBuffer,
    temp: &mut ImageBuffer,
    output: &mut ImageBuffer,
    kernel: &GaussianKernel,
) {
    two_pass::<ScalarTap>(input, temp, output, kernel);
}

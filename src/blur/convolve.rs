//! Per-pixel convolution shared by every strategy.
//!
//! A strategy decides *which* pixels are computed, in *what order* and on
//! *which thread*; the arithmetic for one output value lives here, in the
//! [`Tap`] implementations. Strategies that share a `Tap` produce
//! bit-identical output regardless of visitation order.

use std::ops::Range;

use crate::boundary::clamp_coordinate;
use crate::kernel::GaussianKernel;
use crate::simd::{Lane, SimdAccumulate, LANE_COUNT};
use crate::{ImageBuffer, CHANNELS};

/// Direction of a 1-D pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pass {
    /// Taps run along `x`; reads the source image, writes the temporary buffer.
    Horizontal,
    /// Taps run along `y`; reads the temporary buffer, writes the output.
    Vertical,
}

/// Read-only view of an image used as the source of a pass.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Plane<'a> {
    data: &'a [f32],
    width: usize,
    height: usize,
}

impl<'a> Plane<'a> {
    pub(crate) fn new(image: &'a ImageBuffer) -> Self {
        Self {
            data: image.data(),
            width: image.width(),
            height: image.height(),
        }
    }

    #[inline]
    pub(crate) fn data(&self) -> &'a [f32] {
        self.data
    }

    #[inline]
    pub(crate) fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub(crate) fn height(&self) -> usize {
        self.height
    }

    /// Value of `channel` at `offset` taps from `(x, y)` along `pass`,
    /// edge-clamped.
    #[inline(always)]
    fn sample(&self, pass: Pass, x: usize, y: usize, channel: usize, offset: isize) -> f32 {
        let (sx, sy) = match pass {
            Pass::Horizontal => (
                clamp_coordinate(x as isize + offset, 0, self.width as isize - 1) as usize,
                y,
            ),
            Pass::Vertical => (
                x,
                clamp_coordinate(y as isize + offset, 0, self.height as isize - 1) as usize,
            ),
        };
        self.data[(sy * self.width + sx) * CHANNELS + channel]
    }
}

/// Computes one output value of a pass.
pub(crate) trait Tap {
    fn convolve(
        plane: &Plane<'_>,
        kernel: &GaussianKernel,
        pass: Pass,
        x: usize,
        y: usize,
        channel: usize,
    ) -> f32;
}

/// Straight multiply-accumulate over every tap, in order.
pub(crate) struct ScalarTap;

impl Tap for ScalarTap {
    #[inline(always)]
    fn convolve(
        plane: &Plane<'_>,
        kernel: &GaussianKernel,
        pass: Pass,
        x: usize,
        y: usize,
        channel: usize,
    ) -> f32 {
        let radius = kernel.radius() as isize;
        let mut sum = 0.0f32;
        for (i, &weight) in kernel.weights().iter().enumerate() {
            sum += plane.sample(pass, x, y, channel, i as isize - radius) * weight;
        }
        sum
    }
}

/// Taps gathered [`LANE_COUNT`] at a time into a [`Lane`] accumulator.
///
/// Each full group of taps gathers its clamped samples into a lane and
/// fuses them with the matching weights. The lane is then reduced to a
/// scalar and the last `len % LANE_COUNT` taps are added one by one.
pub(crate) struct LaneTap;

impl Tap for LaneTap {
    #[inline(always)]
    fn convolve(
        plane: &Plane<'_>,
        kernel: &GaussianKernel,
        pass: Pass,
        x: usize,
        y: usize,
        channel: usize,
    ) -> f32 {
        let weights = kernel.weights();
        let radius = kernel.radius() as isize;
        let complete = weights.len() - weights.len() % LANE_COUNT;

        let mut acc = Lane::zeros();
        let mut samples = [0.0f32; LANE_COUNT];

        for start in (0..complete).step_by(LANE_COUNT) {
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample = plane.sample(pass, x, y, channel, (start + i) as isize - radius);
            }
            acc = acc.fmadd(Lane::from(&samples[..]), Lane::from(&weights[start..]));
        }

        let mut sum = acc.reduce_add();
        for (i, &weight) in weights.iter().enumerate().skip(complete) {
            sum += plane.sample(pass, x, y, channel, i as isize - radius) * weight;
        }
        sum
    }
}

/// A rectangle of output pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Region {
    pub(crate) columns: Range<usize>,
    pub(crate) rows: Range<usize>,
}

impl Region {
    pub(crate) fn full(width: usize, height: usize) -> Self {
        Self {
            columns: 0..width,
            rows: 0..height,
        }
    }
}

/// Writes every pixel of `region` into `dst`.
///
/// `dst` holds whole rows of the destination starting at row `first_row`;
/// it is the full image for sequential strategies and a worker's own row
/// slice for the parallel one. Rows outside `dst` are never touched.
pub(crate) fn convolve_region<T: Tap>(
    source: &Plane<'_>,
    kernel: &GaussianKernel,
    pass: Pass,
    region: &Region,
    dst: &mut [f32],
    first_row: usize,
) {
    let row_len = source.width() * CHANNELS;

    for y in region.rows.clone() {
        let offset = (y - first_row) * row_len;
        let row = &mut dst[offset..offset + row_len];

        for x in region.columns.clone() {
            let pixel = &mut row[x * CHANNELS..(x + 1) * CHANNELS];
            for (channel, value) in pixel.iter_mut().enumerate() {
                *value = T::convolve(source, kernel, pass, x, y, channel);
            }
        }
    }
}

/// Horizontal pass over the whole image into `temp`, then vertical into `output`.
pub(crate) fn two_pass<T: Tap>(
    input: &ImageBuffer,
    temp: &mut ImageBuffer,
    output: &mut ImageBuffer,
    kernel: &GaussianKernel,
) {
    let region = Region::full(input.width(), input.height());

    convolve_region::<T>(
        &Plane::new(input),
        kernel,
        Pass::Horizontal,
        &region,
        temp.data_mut(),
        0,
    );

    convolve_region::<T>(
        &Plane::new(temp),
        kernel,
        Pass::Vertical,
        &region,
        output.data_mut(),
        0,
    );
}

//! Owned RGBA `f32` pixel buffers.

use ndarray::{ArrayView3, ArrayViewMut3, Zip};

use crate::error::{dimension_mismatch, layout_error, Result};
use crate::simd::SIMD_ALIGNMENT;
use crate::utils::AlignedVec;
use crate::CHANNELS;

/// A row-major RGBA image with `f32` channels.
///
/// `data` holds `width * height * 4` floats with the four channels of each
/// pixel interleaved as (R, G, B, A). The storage is 32-byte aligned and
/// zero-filled on construction.
///
/// The buffer is move-only: there is no `Clone` impl, duplication is an
/// explicit, fallible [`ImageBuffer::try_clone`].
///
/// ```rust
/// use simdblur::ImageBuffer;
///
/// let mut image = ImageBuffer::new(4, 2).unwrap();
/// image.set(3, 1, 0, 1.0);
/// assert_eq!(image.get(3, 1, 0), 1.0);
/// assert_eq!(image.size_bytes(), 4 * 2 * 4 * 4);
/// ```
#[derive(Debug)]
pub struct ImageBuffer {
    width: usize,
    height: usize,
    data: AlignedVec<f32>,
}

impl ImageBuffer {
    /// Allocates a zero-filled image.
    ///
    /// # Errors
    ///
    /// [`LayoutError`](crate::BlurError::LayoutError) when the element count
    /// overflows, [`AllocationError`](crate::BlurError::AllocationError) when
    /// the memory cannot be obtained.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or_else(|| {
                layout_error(
                    width.saturating_mul(height),
                    SIMD_ALIGNMENT,
                    format!("{width}x{height} RGBA image does not fit in usize"),
                )
            })?;

        Ok(Self {
            width,
            height,
            data: AlignedVec::zeroed(len, SIMD_ALIGNMENT)?,
        })
    }

    /// Builds an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> [f32; CHANNELS],
    {
        let mut image = Self::new(width, height)?;
        {
            let mut view = image.as_array_mut()?;
            for (y, mut row) in view.outer_iter_mut().enumerate() {
                for (x, mut pixel) in row.outer_iter_mut().enumerate() {
                    for (value, channel) in pixel.iter_mut().zip(f(x, y)) {
                        *value = channel;
                    }
                }
            }
        }
        Ok(image)
    }

    /// Deep copy into a freshly allocated buffer.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            width: self.width,
            height: self.height,
            data: self.data.try_clone()?,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn same_dimensions(&self, other: &ImageBuffer) -> bool {
        self.dimensions() == other.dimensions()
    }

    /// Number of `f32` elements, `width * height * 4`.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Total size of the pixel data in bytes.
    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f32>()
    }

    /// Floats per row, `width * 4`.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.width * CHANNELS
    }

    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let row_len = self.row_len();
        &self.data[y * row_len..(y + 1) * row_len]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let row_len = self.row_len();
        &mut self.data[y * row_len..(y + 1) * row_len]
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize, channel: usize) -> usize {
        debug_assert!(x < self.width && y < self.height && channel < CHANNELS);
        (y * self.width + x) * CHANNELS + channel
    }

    /// Channel value at `(x, y)`. Panics when out of range.
    #[inline]
    pub fn get(&self, x: usize, y: usize, channel: usize) -> f32 {
        self.data[self.index(x, y, channel)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, channel: usize, value: f32) {
        let index = self.index(x, y, channel);
        self.data[index] = value;
    }

    /// All four channels of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f32; CHANNELS] {
        let start = self.index(x, y, 0);
        let mut rgba = [0.0; CHANNELS];
        rgba.copy_from_slice(&self.data[start..start + CHANNELS]);
        rgba
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [f32; CHANNELS]) {
        let start = self.index(x, y, 0);
        self.data[start..start + CHANNELS].copy_from_slice(&rgba);
    }

    /// Sets every element to `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Read-only `ndarray` view shaped `(height, width, 4)`.
    pub fn as_array(&self) -> Result<ArrayView3<'_, f32>> {
        let shape = (self.height, self.width, CHANNELS);
        ArrayView3::from_shape(shape, self.data())
            .map_err(|e| layout_error(self.len(), SIMD_ALIGNMENT, e.to_string()))
    }

    /// Element-wise comparison with `other`, counting channels that differ
    /// by `tolerance` or more.
    ///
    /// # Errors
    ///
    /// [`DimensionMismatch`](crate::BlurError::DimensionMismatch) when the
    /// images differ in size.
    ///
    /// ```rust
    /// use simdblur::ImageBuffer;
    ///
    /// let a = ImageBuffer::from_fn(2, 2, |x, _| [x as f32, 0.0, 0.0, 1.0]).unwrap();
    /// let b = ImageBuffer::from_fn(2, 2, |_, _| [0.0, 0.0, 0.0, 1.0]).unwrap();
    ///
    /// let diff = a.diff(&b, 0.5).unwrap();
    /// assert_eq!(diff.max_abs, 1.0);
    /// assert_eq!(diff.channel_max, [1.0, 0.0, 0.0, 0.0]);
    /// assert_eq!(diff.mismatches, 2);
    /// ```
    pub fn diff(&self, other: &ImageBuffer, tolerance: f32) -> Result<ImageDiff> {
        if !self.same_dimensions(other) {
            return Err(dimension_mismatch(self.dimensions(), other.dimensions()));
        }

        let mut diff = ImageDiff {
            max_abs: 0.0,
            channel_max: [0.0; CHANNELS],
            mismatches: 0,
            total: self.len(),
        };

        Zip::indexed(&self.as_array()?)
            .and(&other.as_array()?)
            .for_each(|(_, _, channel), &a, &b| {
                let d = (a - b).abs();
                diff.max_abs = diff.max_abs.max(d);
                diff.channel_max[channel] = diff.channel_max[channel].max(d);
                if d >= tolerance {
                    diff.mismatches += 1;
                }
            });

        Ok(diff)
    }

    /// Mutable `ndarray` view shaped `(height, width, 4)`.
    pub fn as_array_mut(&mut self) -> Result<ArrayViewMut3<'_, f32>> {
        let shape = (self.height, self.width, CHANNELS);
        let len = self.len();
        ArrayViewMut3::from_shape(shape, &mut self.data[..])
            .map_err(|e| layout_error(len, SIMD_ALIGNMENT, e.to_string()))
    }
}

/// Result of [`ImageBuffer::diff`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageDiff {
    /// Largest absolute difference over all channels.
    pub max_abs: f32,
    /// Largest absolute difference per channel (R, G, B, A).
    pub channel_max: [f32; CHANNELS],
    /// Elements whose difference is at least the tolerance.
    pub mismatches: usize,
    /// Elements compared.
    pub total: usize,
}

impl ImageDiff {
    /// Fraction of compared elements that mismatched; `0.0` for empty images.
    pub fn mismatch_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mismatches as f64 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlurError;

    #[test]
    fn new_image_is_zeroed_and_aligned() {
        let image = ImageBuffer::new(64, 64).unwrap();
        assert_eq!(image.width(), 64);
        assert_eq!(image.height(), 64);
        assert_eq!(image.len(), 64 * 64 * 4);
        assert_eq!(image.size_bytes(), 64 * 64 * 4 * 4);
        assert_eq!(image.data().as_ptr() as usize % SIMD_ALIGNMENT, 0);
        assert!(image.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_sized_images_are_valid() {
        let image = ImageBuffer::new(0, 10).unwrap();
        assert!(image.is_empty());
        assert_eq!(image.size_bytes(), 0);
    }

    #[test]
    fn overflowing_dimensions_are_rejected() {
        assert!(matches!(
            ImageBuffer::new(usize::MAX, 2),
            Err(BlurError::LayoutError { .. })
        ));
    }

    #[test]
    fn channels_are_interleaved_row_major() {
        let mut image = ImageBuffer::new(3, 2).unwrap();
        image.set_pixel(1, 1, [0.1, 0.2, 0.3, 0.4]);

        let base = (3 + 1) * 4;
        assert_eq!(&image.data()[base..base + 4], &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(image.get(1, 1, 2), 0.3);
        assert_eq!(image.pixel(1, 1), [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(image.row(1)[4..8], [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn try_clone_is_a_deep_copy() {
        let mut original = ImageBuffer::from_fn(4, 4, |x, y| [x as f32, y as f32, 0.0, 1.0]).unwrap();
        let copy = original.try_clone().unwrap();

        original.fill(0.0);
        assert_eq!(copy.pixel(3, 2), [3.0, 2.0, 0.0, 1.0]);
        assert!(copy.same_dimensions(&original));
    }

    #[test]
    fn ndarray_view_matches_indexing() {
        let mut image = ImageBuffer::from_fn(5, 3, |x, y| [x as f32, y as f32, 0.5, 1.0]).unwrap();

        let view = image.as_array().unwrap();
        assert_eq!(view.dim(), (3, 5, 4));
        assert_eq!(view[[2, 4, 0]], 4.0);
        assert_eq!(view[[2, 4, 1]], 2.0);

        image.as_array_mut().unwrap()[[0, 1, 3]] = 0.25;
        assert_eq!(image.get(1, 0, 3), 0.25);
    }

    #[test]
    fn from_fn_visits_pixels_row_major() {
        let mut order = Vec::new();
        let image = ImageBuffer::from_fn(3, 2, |x, y| {
            order.push((x, y));
            [x as f32, y as f32, 0.0, 1.0]
        })
        .unwrap();

        assert_eq!(order, [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(image.pixel(2, 1), [2.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn diff_tracks_channels_and_tolerance() {
        let a = ImageBuffer::from_fn(4, 3, |_, _| [0.5, 0.5, 0.5, 1.0]).unwrap();
        let mut b = a.try_clone().unwrap();
        b.set(1, 2, 2, 0.75);
        b.set(3, 0, 0, 0.51);

        let diff = a.diff(&b, 0.05).unwrap();
        assert_eq!(diff.total, 4 * 3 * 4);
        assert_eq!(diff.mismatches, 1);
        assert_eq!(diff.max_abs, 0.25);
        assert_eq!(diff.channel_max[2], 0.25);
        assert!(diff.channel_max[0] > 0.0 && diff.channel_max[0] < 0.05);
        assert_eq!(diff.channel_max[3], 0.0);
        assert_eq!(diff.mismatch_ratio(), 1.0 / 48.0);

        assert_eq!(a.diff(&a, 0.0).unwrap().mismatches, a.len());
        assert_eq!(a.diff(&a, 1e-9).unwrap().mismatches, 0);
    }

    #[test]
    fn diff_rejects_mismatched_images() {
        let a = ImageBuffer::new(4, 3).unwrap();
        let b = ImageBuffer::new(3, 4).unwrap();
        assert!(matches!(
            a.diff(&b, 0.05),
            Err(BlurError::DimensionMismatch { .. })
        ));
    }
}

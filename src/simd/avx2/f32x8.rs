//! AVX2 8-lane f32 vector.
//!
//! `F32x8` wraps an `__m256` register. The convolution engine only needs
//! loads, a fused multiply-add accumulator and a horizontal sum, so that is
//! all this type exposes.
//!
//! # Performance Characteristics
//!
//! - **Vector Width**: 256 bits (8 × f32)
//! - **Memory Alignment**: aligned loads are used when the pointer is 32-byte
//!   aligned, unaligned loads otherwise
//! - **Accumulation**: `_mm256_fmadd_ps`, one rounding per tap group

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::{Alignment, SimdAccumulate, SimdLoad, LANE_COUNT};

/// AVX2 SIMD vector containing 8 packed f32 values.
///
/// # Usage
///
/// ```rust
/// # #[cfg(target_feature = "avx2")]
/// # {
/// use simdblur::simd::{Lane, SimdAccumulate};
///
/// let samples = [1.0f32, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
/// let weights = [0.125f32; 8];
/// let acc = Lane::zeros().fmadd(Lane::from(&samples[..]), Lane::from(&weights[..]));
/// assert_eq!(acc.reduce_add(), 4.5);
/// # }
/// ```
#[derive(Copy, Clone, Debug)]
pub struct F32x8 {
    /// AVX2 256-bit vector register containing 8 packed f32 values
    pub elements: __m256,
}

impl Alignment<f32> for F32x8 {
    #[inline(always)]
    fn is_aligned(ptr: *const f32) -> bool {
        let ptr = ptr as usize;

        ptr % core::mem::align_of::<__m256>() == 0
    }
}

impl From<&[f32]> for F32x8 {
    /// Loads the first 8 elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if the slice holds fewer than 8 elements.
    #[inline(always)]
    fn from(slice: &[f32]) -> Self {
        assert!(
            slice.len() >= LANE_COUNT,
            "slice must hold at least {LANE_COUNT} elements"
        );

        // SAFETY: the slice has at least LANE_COUNT readable elements.
        unsafe { Self::load(slice.as_ptr(), LANE_COUNT) }
    }
}

impl SimdLoad<f32> for F32x8 {
    type Output = Self;

    /// Loads exactly 8 elements, picking the aligned path when possible.
    ///
    /// # Safety
    ///
    /// Pointer must not be null and must point to at least 8 valid f32 values.
    #[inline(always)]
    unsafe fn load(ptr: *const f32, size: usize) -> Self::Output {
        debug_assert!(size == LANE_COUNT, "Size must be == {LANE_COUNT}");
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match F32x8::is_aligned(ptr) {
            true => unsafe { Self::load_aligned(ptr) },
            false => unsafe { Self::load_unaligned(ptr) },
        }
    }

    /// # Safety
    ///
    /// Pointer must be 32-byte aligned and point to at least 8 valid f32 values.
    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self::Output {
        Self {
            elements: unsafe { _mm256_load_ps(ptr) },
        }
    }

    /// # Safety
    ///
    /// Pointer must point to at least 8 valid f32 values.
    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> Self::Output {
        Self {
            elements: unsafe { _mm256_loadu_ps(ptr) },
        }
    }
}

impl SimdAccumulate for F32x8 {
    #[inline(always)]
    fn zeros() -> Self {
        Self {
            elements: unsafe { _mm256_setzero_ps() },
        }
    }

    #[inline(always)]
    fn fmadd(&self, a: Self, b: Self) -> Self {
        Self {
            elements: unsafe { _mm256_fmadd_ps(a.elements, b.elements, self.elements) },
        }
    }

    #[inline(always)]
    fn reduce_add(&self) -> f32 {
        unsafe {
            let high = _mm256_extractf128_ps::<1>(self.elements);
            let low = _mm256_castps256_ps128(self.elements);
            let sum = _mm_add_ps(low, high);
            let sum = _mm_hadd_ps(sum, sum);
            let sum = _mm_hadd_ps(sum, sum);
            _mm_cvtss_f32(sum)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_and_unaligned_loads_agree() {
        #[repr(align(32))]
        struct Aligned([f32; 16]);

        let mut data = Aligned([0.0; 16]);
        for (i, v) in data.0.iter_mut().enumerate() {
            *v = i as f32;
        }

        assert!(F32x8::is_aligned(data.0.as_ptr()));
        assert!(!F32x8::is_aligned(data.0[1..].as_ptr()));

        let ones = F32x8::from(&[1.0f32; 8][..]);
        let aligned = F32x8::zeros().fmadd(F32x8::from(&data.0[..]), ones);
        let shifted = F32x8::zeros().fmadd(F32x8::from(&data.0[1..]), ones);

        assert_eq!(aligned.reduce_add(), 28.0);
        assert_eq!(shifted.reduce_add(), 36.0);
    }

    #[test]
    #[should_panic]
    fn short_slice_panics() {
        let _ = F32x8::from(&[1.0f32; 7][..]);
    }
}

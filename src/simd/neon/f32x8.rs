//! NEON 8-lane f32 vector built from two `float32x4_t` halves.
//!
//! NEON registers are 128 bits wide, so the 8-lane contract of the
//! convolution engine is met with a low and a high half. Loads have no
//! alignment requirement on AArch64.

use std::arch::aarch64::*;

use crate::simd::{Alignment, SimdAccumulate, SimdLoad, LANE_COUNT};

/// Two NEON registers holding 8 packed f32 values.
#[derive(Copy, Clone, Debug)]
pub struct F32x8 {
    /// Elements 0..4
    pub low: float32x4_t,
    /// Elements 4..8
    pub high: float32x4_t,
}

impl Alignment<f32> for F32x8 {
    #[inline(always)]
    fn is_aligned(ptr: *const f32) -> bool {
        (ptr as usize) % core::mem::align_of::<float32x4_t>() == 0
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

    /// # Safety
    ///
    /// Pointer must point to at least 8 valid f32 values.
    #[inline(always)]
    unsafe fn load(ptr: *const f32, size: usize) -> Self::Output {
        debug_assert!(size == LANE_COUNT, "Size must be == {LANE_COUNT}");
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        unsafe { Self::load_unaligned(ptr) }
    }

    /// # Safety
    ///
    /// Pointer must point to at least 8 valid f32 values.
    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self::Output {
        unsafe { Self::load_unaligned(ptr) }
    }

    /// # Safety
    ///
    /// Pointer must point to at least 8 valid f32 values.
    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> Self::Output {
        unsafe {
            Self {
                low: vld1q_f32(ptr),
                high: vld1q_f32(ptr.add(4)),
            }
        }
    }
}

impl SimdAccumulate for F32x8 {
    #[inline(always)]
    fn zeros() -> Self {
        unsafe {
            Self {
                low: vdupq_n_f32(0.0),
                high: vdupq_n_f32(0.0),
            }
        }
    }

    #[inline(always)]
    fn fmadd(&self, a: Self, b: Self) -> Self {
        unsafe {
            Self {
                low: vfmaq_f32(self.low, a.low, b.low),
                high: vfmaq_f32(self.high, a.high, b.high),
            }
        }
    }

    #[inline(always)]
    fn reduce_add(&self) -> f32 {
        unsafe {
            let sum = vaddq_f32(self.low, self.high);
            let pairs = vpaddq_f32(sum, sum);
            vgetq_lane_f32::<0>(vpaddq_f32(pairs, pairs))
        }
    }
}

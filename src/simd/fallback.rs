//! Portable 8-lane vector used when no SIMD backend was selected.
//!
//! Plain arrays of eight `f32`; LLVM is free to auto-vectorize the
//! element-wise loops. The reduction order mirrors the hardware backends
//! (halves first, then pairwise) so results stay close across targets.

use crate::simd::{Alignment, SimdAccumulate, SimdLoad, LANE_COUNT};

/// Eight `f32` values processed element-wise.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct F32x8 {
    pub elements: [f32; LANE_COUNT],
}

impl Alignment<f32> for F32x8 {
    #[inline(always)]
    fn is_aligned(ptr: *const f32) -> bool {
        (ptr as usize) % core::mem::align_of::<f32>() == 0
    }
}

impl From<&[f32]> for F32x8 {
    /// Copies the first 8 elements of `slice`.
    ///
    /// # Panics
    ///
    /// Panics if the slice holds fewer than 8 elements.
    #[inline(always)]
    fn from(slice: &[f32]) -> Self {
        let mut elements = [0.0f32; LANE_COUNT];
        elements.copy_from_slice(&slice[..LANE_COUNT]);
        Self { elements }
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
        let slice = unsafe { std::slice::from_raw_parts(ptr, LANE_COUNT) };
        Self::from(slice)
    }
}

impl SimdAccumulate for F32x8 {
    #[inline(always)]
    fn zeros() -> Self {
        Self {
            elements: [0.0; LANE_COUNT],
        }
    }

    #[inline(always)]
    fn fmadd(&self, a: Self, b: Self) -> Self {
        let mut elements = self.elements;
        for ((acc, x), y) in elements.iter_mut().zip(a.elements).zip(b.elements) {
            *acc += x * y;
        }
        Self { elements }
    }

    #[inline(always)]
    fn reduce_add(&self) -> f32 {
        let e = &self.elements;
        let halves = [e[0] + e[4], e[1] + e[5], e[2] + e[6], e[3] + e[7]];
        (halves[0] + halves[1]) + (halves[2] + halves[3])
    }
}

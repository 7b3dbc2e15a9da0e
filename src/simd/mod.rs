//! Fixed-width `f32` lanes.
//!
//! The convolution engine is written against [`Lane`], an 8-wide vector of
//! `f32` exposed through the [`SimdLoad`] and [`SimdAccumulate`] traits. The
//! concrete type is picked by the build script:
//!
//! | cfg        | Implementation                          |
//! |------------|-----------------------------------------|
//! | `avx2`     | one `__m256` register, FMA accumulation |
//! | `neon`     | two `float32x4_t` registers             |
//! | otherwise  | portable `[f32; 8]`                     |
//!
//! The lane width is an implementation detail of the inner loop; nothing in
//! the public API depends on it.

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub mod avx2;

#[cfg(all(neon, target_arch = "aarch64"))]
pub mod neon;

pub mod fallback;

pub mod traits;

pub use traits::{Alignment, SimdAccumulate, SimdLoad};

/// Number of `f32` values processed together by one [`Lane`].
pub const LANE_COUNT: usize = 8;

/// Byte alignment of pixel storage, matching a 256-bit register.
pub const SIMD_ALIGNMENT: usize = 32;

#[cfg(all(avx2, any(target_arch = "x86", target_arch = "x86_64")))]
pub type Lane = avx2::f32x8::F32x8;

#[cfg(all(neon, target_arch = "aarch64"))]
pub type Lane = neon::f32x8::F32x8;

#[cfg(not(any(
    all(avx2, any(target_arch = "x86", target_arch = "x86_64")),
    all(neon, target_arch = "aarch64")
)))]
pub type Lane = fallback::F32x8;

/// Name of the lane backend compiled into this build.
pub const fn backend_name() -> &'static str {
    if cfg!(all(avx2, any(target_arch = "x86", target_arch = "x86_64"))) {
        "avx2+fma"
    } else if cfg!(all(neon, target_arch = "aarch64")) {
        "neon"
    } else {
        "portable"
    }
}

/// Issues a non-binding read prefetch for `data[index]`.
///
/// Out-of-range indices are ignored. On targets without a stable prefetch
/// intrinsic this compiles to nothing.
#[inline(always)]
pub fn prefetch_read(data: &[f32], index: usize) {
    #[cfg(target_arch = "x86_64")]
    {
        use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};

        if let Some(value) = data.get(index) {
            // SAFETY: prefetch never faults and the pointer is in bounds.
            unsafe { _mm_prefetch::<_MM_HINT_T0>((value as *const f32).cast::<i8>()) };
        }
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        let _ = (data, index);
    }
}

//! ARM NEON lane implementation.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: any AArch64 processor (Advanced SIMD is mandatory there)
//! - **Selection**: `build.rs` emits `cfg(neon)` when the host reports `asimd`
//!   (Linux) or `hw.optional.neon` (macOS) on a native build
//!
//! # Available Types
//!
//! - [`f32x8::F32x8`]: a pair of 128-bit registers holding 8 packed `f32`

pub mod f32x8;

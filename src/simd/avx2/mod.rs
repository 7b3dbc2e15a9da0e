//! AVX2 lane implementation.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Haswell (2013+) or AMD Excavator (2015+)
//! - **Instruction Sets**: AVX, AVX2 and FMA
//! - **Selection**: `build.rs` emits `cfg(avx2)` only when both AVX2 and FMA
//!   are reported by the host CPU on a native build
//!
//! # Available Types
//!
//! - [`f32x8::F32x8`]: 256-bit vector containing 8 packed `f32`

pub mod f32x8;

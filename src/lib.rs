//! Separable Gaussian blur over RGBA `f32` images.
//!
//! The same two-pass convolution is available as four interchangeable
//! strategies (scalar, 8-lane vectorized, cache-tiled, and row-partitioned
//! multithreaded) that agree on every valid input.
//!
//! ```rust
//! use simdblur::{blur_tiled, io, ImageBuffer};
//!
//! let input = io::test_pattern(64, 64).unwrap();
//! let mut output = ImageBuffer::new(64, 64).unwrap();
//! blur_tiled(&input, &mut output, 2.0).unwrap();
//! ```

pub mod blur;
pub mod boundary;
pub mod config;
pub mod error;
pub mod image;
pub mod io;
pub mod kernel;
pub mod simd;
pub mod utils;

pub use blur::partition::RowPartition;
pub use blur::{blur_parallel, blur_scalar, blur_tiled, blur_vectorized, BlurStrategy, GaussianBlur};
pub use boundary::clamp_coordinate;
pub use config::BlurConfig;
pub use error::{BlurError, Result};
pub use image::{ImageBuffer, ImageDiff};
pub use kernel::GaussianKernel;
pub use simd::{LANE_COUNT, SIMD_ALIGNMENT};

/// Channels per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

/// Edge length of the square tiles used by the tiled strategy.
pub const TILE_SIZE: usize = 32;

/// Worker count used when hardware concurrency cannot be determined.
pub const FALLBACK_WORKERS: usize = 4;

/// Gaussian standard deviation used by the demo binary and benches.
///
/// ```rust
/// use simdblur::{GaussianKernel, DEFAULT_SIGMA};
///
/// assert_eq!(GaussianKernel::generate(DEFAULT_SIGMA).unwrap().radius(), 6);
/// ```
pub const DEFAULT_SIGMA: f32 = 2.0;

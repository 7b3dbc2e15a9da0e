//! Tuning knobs for the tiled and parallel strategies.

use std::num::NonZeroUsize;

use crate::error::{invalid_parameter, Result};
use crate::{FALLBACK_WORKERS, TILE_SIZE};

/// Configuration shared by every [`GaussianBlur`](crate::GaussianBlur) call.
///
/// The defaults reproduce the free functions ([`blur_tiled`](crate::blur_tiled),
/// [`blur_parallel`](crate::blur_parallel), ...): 32-pixel tiles and one
/// worker per available hardware thread.
///
/// ```rust
/// use std::num::NonZeroUsize;
/// use simdblur::BlurConfig;
///
/// let config = BlurConfig::default()
///     .with_tile_size(64)
///     .with_workers(NonZeroUsize::new(2).unwrap());
/// assert_eq!(config.effective_workers(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurConfig {
    /// Edge length of the square tiles used by the tiled strategy.
    pub tile_size: usize,
    /// Worker count for the parallel strategy; `None` means hardware concurrency.
    pub workers: Option<NonZeroUsize>,
}

impl Default for BlurConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            workers: None,
        }
    }
}

impl BlurConfig {
    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Rejects a zero tile size.
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(invalid_parameter("tile_size", "must be at least 1 pixel"));
        }
        Ok(())
    }

    /// Worker count the parallel strategy will partition rows into.
    pub fn effective_workers(&self) -> usize {
        self.workers.map(NonZeroUsize::get).unwrap_or_else(available_workers)
    }
}

/// Hardware concurrency, or [`FALLBACK_WORKERS`] when it cannot be determined.
pub fn available_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_crate_constants() {
        let config = BlurConfig::default();
        assert_eq!(config.tile_size, TILE_SIZE);
        assert_eq!(config.workers, None);
        assert!(config.validate().is_ok());
        assert!(config.effective_workers() >= 1);
    }

    #[test]
    fn zero_tile_size_is_rejected() {
        let config = BlurConfig::default().with_tile_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_workers_override_hardware() {
        let config = BlurConfig::default().with_workers(NonZeroUsize::new(3).unwrap());
        assert_eq!(config.effective_workers(), 3);
    }
}

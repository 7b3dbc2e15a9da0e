//! Normalized 1-D Gaussian kernels.

use crate::error::{allocation_error, invalid_parameter, Result};

/// A symmetric, normalized 1-D Gaussian weight sequence.
///
/// Built once per blur call by [`GaussianKernel::generate`]. Weights are
/// stored from offset `-radius` to `+radius`, so `weights()[i]` is the weight
/// for offset `i as isize - radius as isize`.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKernel {
    sigma: f32,
    radius: usize,
    weights: Vec<f32>,
}

impl GaussianKernel {
    /// Generates the kernel for standard deviation `sigma`.
    ///
    /// `radius = ceil(3σ)`, each tap is `exp(-i² / 2σ²)`, and every tap is
    /// divided by the sum so the kernel integrates to one.
    ///
    /// # Errors
    ///
    /// - [`InvalidParameter`](crate::BlurError::InvalidParameter) when
    ///   `sigma` is zero, negative, NaN or infinite, so small that `2σ²`
    ///   underflows, or so large that the tap count does not fit in `usize`.
    /// - [`AllocationError`](crate::BlurError::AllocationError) when the tap
    ///   vector cannot be allocated.
    ///
    /// ```rust
    /// use simdblur::GaussianKernel;
    ///
    /// let kernel = GaussianKernel::generate(2.0).unwrap();
    /// assert_eq!(kernel.radius(), 6);
    /// assert_eq!(kernel.len(), 13);
    /// assert!((kernel.sum() - 1.0).abs() < 1e-5);
    /// ```
    pub fn generate(sigma: f32) -> Result<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(invalid_parameter(
                "sigma",
                format!("must be a finite positive number, got {sigma}"),
            ));
        }

        let radius_f = (3.0 * sigma).ceil();
        // f32 -> usize saturates, so compare before converting.
        if radius_f >= (usize::MAX / 2) as f32 {
            return Err(invalid_parameter(
                "sigma",
                format!("kernel radius for sigma {sigma} does not fit in memory"),
            ));
        }
        let radius = radius_f as usize;
        let size = 2 * radius + 1;

        let mut weights = Vec::new();
        weights.try_reserve_exact(size).map_err(|e| {
            allocation_error(
                size.saturating_mul(std::mem::size_of::<f32>()),
                std::mem::align_of::<f32>(),
                e.to_string(),
            )
        })?;

        // sigma² underflows for tiny sigma, which would make the center tap 0/0.
        let denominator = 2.0 * sigma * sigma;
        if !denominator.is_normal() {
            return Err(invalid_parameter(
                "sigma",
                format!("sigma {sigma} is too small to build a finite kernel"),
            ));
        }

        let mut sum = 0.0f32;
        for i in 0..size {
            let x = i as f32 - radius as f32;
            let w = (-(x * x) / denominator).exp();
            sum += w;
            weights.push(w);
        }

        if !sum.is_finite() || sum <= 0.0 {
            return Err(invalid_parameter(
                "sigma",
                format!("kernel for sigma {sigma} does not normalize (sum {sum})"),
            ));
        }

        for w in weights.iter_mut() {
            *w /= sum;
        }

        Ok(Self {
            sigma,
            radius,
            weights,
        })
    }

    #[inline]
    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    /// Half-width of the kernel, `ceil(3σ)`.
    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Number of taps, `2 * radius + 1`.
    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// All taps, ordered from offset `-radius` to `+radius`.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Weight at `offset` from the center, or `None` outside `[-radius, radius]`.
    #[inline]
    pub fn weight(&self, offset: isize) -> Option<f32> {
        let index = offset.checked_add(self.radius as isize)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.weights.get(i).copied())
    }

    /// Sum of all taps; one up to rounding.
    pub fn sum(&self) -> f32 {
        self.weights.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlurError;

    #[test]
    fn radius_is_ceil_of_three_sigma() {
        assert_eq!(GaussianKernel::generate(0.1).unwrap().radius(), 1);
        assert_eq!(GaussianKernel::generate(1.0).unwrap().radius(), 3);
        assert_eq!(GaussianKernel::generate(1.5).unwrap().radius(), 5);
        assert_eq!(GaussianKernel::generate(3.0).unwrap().radius(), 9);
    }

    #[test]
    fn center_tap_is_the_largest() {
        let kernel = GaussianKernel::generate(2.0).unwrap();
        let center = kernel.weight(0).unwrap();
        assert!(kernel.weights().iter().all(|&w| w <= center));
    }

    #[test]
    fn weight_lookup_outside_radius_is_none() {
        let kernel = GaussianKernel::generate(1.0).unwrap();
        assert!(kernel.weight(3).is_some());
        assert!(kernel.weight(-3).is_some());
        assert!(kernel.weight(4).is_none());
        assert!(kernel.weight(-4).is_none());
        assert!(kernel.weight(isize::MIN).is_none());
    }

    #[test]
    fn rejects_non_finite_sigma() {
        for sigma in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(matches!(
                GaussianKernel::generate(sigma),
                Err(BlurError::InvalidParameter {
                    parameter: "sigma",
                    ..
                })
            ));
        }
    }

    #[test]
    fn rejects_sigma_whose_square_underflows() {
        for sigma in [1e-23f32, 1e-30, f32::MIN_POSITIVE, 1e-45] {
            assert!(
                matches!(
                    GaussianKernel::generate(sigma),
                    Err(BlurError::InvalidParameter {
                        parameter: "sigma",
                        ..
                    })
                ),
                "sigma {sigma}"
            );
        }
    }

    #[test]
    fn rejects_absurd_sigma() {
        assert!(matches!(
            GaussianKernel::generate(f32::MAX),
            Err(BlurError::InvalidParameter { .. })
        ));
    }
}

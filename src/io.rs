//! Image persistence and synthetic inputs for demos, benches and tests.
//!
//! None of this is needed to blur: the core only reads and writes
//! [`ImageBuffer`]s in memory.

use std::f32::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::Result;
use crate::ImageBuffer;

/// Writes `image` as a binary PPM (`P6`).
///
/// The header is `P6\n{width} {height}\n255\n`, followed by three bytes per
/// pixel (R, G, B) in row-major order. Each channel is scaled by 255,
/// clamped to `[0, 255]` and truncated. Alpha is dropped.
pub fn write_ppm<W: Write>(image: &ImageBuffer, mut writer: W) -> Result<()> {
    write!(writer, "P6\n{} {}\n255\n", image.width(), image.height())?;

    let mut row = Vec::with_capacity(image.width() * 3);
    for y in 0..image.height() {
        row.clear();
        for pixel in image.row(y).chunks_exact(4) {
            row.extend(pixel[..3].iter().map(|&v| to_byte(v)));
        }
        writer.write_all(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes `image` as a binary PPM file at `path`, replacing any existing file.
pub fn save_ppm<P: AsRef<Path>>(image: &ImageBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_ppm(image, BufWriter::new(file))?;
    debug!(
        "saved {}x{} image to {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

/// Smooth deterministic pattern: a horizontal sine in red, a vertical cosine
/// in green and a diagonal gradient in blue, fully opaque.
pub fn test_pattern(width: usize, height: usize) -> Result<ImageBuffer> {
    let (w, h) = (width as f32, height as f32);
    ImageBuffer::from_fn(width, height, |x, y| {
        let (fx, fy) = (x as f32, y as f32);
        [
            (2.0 * PI * fx / w).sin() * 0.5 + 0.5,
            (2.0 * PI * fy / h).cos() * 0.5 + 0.5,
            (fx / w + fy / h) * 0.5,
            1.0,
        ]
    })
}

/// Uniform noise in `[0, 1)` for R, G and B, alpha 1. Same `seed`, same image.
pub fn noise_pattern(width: usize, height: usize, seed: u64) -> Result<ImageBuffer> {
    let mut rng = StdRng::seed_from_u64(seed);
    ImageBuffer::from_fn(width, height, |_, _| {
        [rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>(), 1.0]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ppm_header_and_payload() {
        let mut image = ImageBuffer::new(2, 1).unwrap();
        image.set_pixel(0, 0, [1.0, 0.5, 0.0, 0.3]);
        image.set_pixel(1, 0, [-0.2, 2.0, 0.25, 1.0]);

        let mut bytes = Vec::new();
        write_ppm(&image, &mut bytes).unwrap();

        let header = b"P6\n2 1\n255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(&bytes[header.len()..], &[255, 127, 0, 0, 255, 63]);
    }

    #[test]
    fn ppm_writes_green_from_its_own_channel() {
        let image = ImageBuffer::from_fn(1, 1, |_, _| [0.0, 1.0, 0.0, 1.0]).unwrap();
        let mut bytes = Vec::new();
        write_ppm(&image, &mut bytes).unwrap();
        assert_eq!(&bytes[bytes.len() - 3..], &[0, 255, 0]);
    }

    #[test]
    fn test_pattern_values() {
        let image = test_pattern(8, 4).unwrap();
        let [r, g, b, a] = image.pixel(0, 0);
        assert!((r - 0.5).abs() < 1e-6);
        assert!((g - 1.0).abs() < 1e-6);
        assert_eq!(b, 0.0);
        assert_eq!(a, 1.0);

        // quarter period along x, half period along y
        let [r, g, b, _] = image.pixel(2, 2);
        assert!((r - 1.0).abs() < 1e-6);
        assert!(g.abs() < 1e-6);
        assert!((b - 0.375).abs() < 1e-6);
    }

    #[test]
    fn noise_is_seeded() {
        let a = noise_pattern(16, 16, 42).unwrap();
        let b = noise_pattern(16, 16, 42).unwrap();
        let c = noise_pattern(16, 16, 43).unwrap();

        assert_eq!(a.data(), b.data());
        assert_ne!(a.data(), c.data());
        assert!(a.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}

//! Cache-blocked strategy.
//!
//! Both passes walk the image in square tiles, row-major over tiles, and
//! finish a tile before starting the next one. Before each tile the source
//! row the *next* tile will start reading is prefetched: to the right for
//! the horizontal pass, below for the vertical pass.
//!
//! Tiling only reorders pixel visits. The per-pixel arithmetic is the
//! vectorized strategy's [`LaneTap`], so the output is bit-identical to it.

use log::trace;

use super::convolve::{convolve_region, LaneTap, Pass, Plane, Region};
use crate::kernel::GaussianKernel;
use crate::simd::prefetch_read;
use crate::{ImageBuffer, CHANNELS};

/// Tiles of edge `tile_size` covering a `width × height` image, row-major.
/// Tiles on the right and bottom edges are clipped to the image.
pub(crate) fn tiles(width: usize, height: usize, tile_size: usize) -> impl Iterator<Item = Region> {
    debug_assert!(tile_size > 0, "tile size must be non-zero");

    (0..height).step_by(tile_size).flat_map(move |tile_y| {
        (0..width).step_by(tile_size).map(move |tile_x| Region {
            columns: tile_x..(tile_x + tile_size).min(width),
            rows: tile_y..(tile_y + tile_size).min(height),
        })
    })
}

pub(crate) fn run(
    input: &ImageBuffer,
    temp: &mut ImageBuffer,
    output: &mut ImageBuffer,
    kernel: &GaussianKernel,
    tile_size: usize,
) {
    let (width, height) = input.dimensions();
    trace!(
        "tiled blur: {}x{} tiles of {tile_size}px",
        width.div_ceil(tile_size),
        height.div_ceil(tile_size)
    );

    let source = Plane::new(input);
    for region in tiles(width, height, tile_size) {
        if region.columns.end < width {
            prefetch_read(
                source.data(),
                (region.rows.start * width + region.columns.end) * CHANNELS,
            );
        }
        convolve_region::<LaneTap>(&source, kernel, Pass::Horizontal, &region, temp.data_mut(), 0);
    }

    let source = Plane::new(temp);
    for region in tiles(width, height, tile_size) {
        if region.rows.end < source.height() {
            prefetch_read(
                source.data(),
                (region.rows.end * width + region.columns.start) * CHANNELS,
            );
        }
        convolve_region::<LaneTap>(&source, kernel, Pass::Vertical, &region, output.data_mut(), 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_cover_every_pixel_exactly_once() {
        let (width, height) = (70, 33);
        let mut hits = vec![0u8; width * height];

        for region in tiles(width, height, 32) {
            for y in region.rows.clone() {
                for x in region.columns.clone() {
                    hits[y * width + x] += 1;
                }
            }
        }

        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn tiles_are_row_major_and_clipped() {
        let regions: Vec<Region> = tiles(40, 20, 16).collect();
        assert_eq!(regions.len(), 6);
        assert_eq!(regions[0], Region { columns: 0..16, rows: 0..16 });
        assert_eq!(regions[1], Region { columns: 16..32, rows: 0..16 });
        assert_eq!(regions[2], Region { columns: 32..40, rows: 0..16 });
        assert_eq!(regions[3], Region { columns: 0..16, rows: 16..20 });
        assert_eq!(regions[5], Region { columns: 32..40, rows: 16..20 });
    }

    #[test]
    fn empty_image_has_no_tiles() {
        assert_eq!(tiles(0, 10, 8).count(), 0);
        assert_eq!(tiles(10, 0, 8).count(), 0);
    }
}

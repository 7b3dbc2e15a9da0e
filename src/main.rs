//! simdblur CLI - blur a synthetic image with every strategy.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::{error, info};

use simdblur::simd::backend_name;
use simdblur::{io, BlurConfig, BlurStrategy, GaussianBlur, ImageBuffer, DEFAULT_SIGMA};

/// Per-channel tolerance between strategies.
const TOLERANCE: f32 = 0.05;

/// Separable Gaussian blur demo
///
/// Runs the scalar, vectorized, tiled and parallel strategies on a
/// synthetic image. Set RUST_LOG=debug for per-call details.
#[derive(Parser, Debug)]
#[command(name = "simdblur")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    Blur a 1024x1024 test pattern and save every result:
        simdblur demo --size 1024 --out-dir out/

    Only the tiled and parallel strategies, wider kernel:
        simdblur demo --strategy tiled --strategy parallel --sigma 5

    Check that all strategies agree on random noise:
        simdblur compare --size 257 --seed 7

EXIT CODES:
    0 - Success
    1 - Strategies disagree beyond tolerance (compare)
    2 - Error (invalid sigma, I/O failure, ...)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blur the test pattern and save PPM files
    Demo {
        /// Image edge length in pixels
        #[arg(long, default_value_t = 512)]
        size: usize,

        /// Gaussian standard deviation
        #[arg(long, default_value_t = DEFAULT_SIGMA)]
        sigma: f32,

        /// Directory the PPM files are written to
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Strategies to run (repeatable); all when omitted
        #[arg(long, value_name = "STRATEGY")]
        strategy: Vec<BlurStrategy>,

        /// Edge length of tiles for the tiled strategy
        #[arg(long, default_value_t = simdblur::TILE_SIZE)]
        tile_size: usize,
    },
    /// Compare every strategy against the scalar baseline on noise
    Compare {
        /// Image edge length in pixels
        #[arg(long, default_value_t = 256)]
        size: usize,

        /// Gaussian standard deviation
        #[arg(long, default_value_t = DEFAULT_SIGMA)]
        sigma: f32,

        /// Seed for the noise image
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    info!("lane backend: {}", backend_name());

    match cli.command {
        Command::Demo {
            size,
            sigma,
            out_dir,
            strategy,
            tile_size,
        } => run_demo(size, sigma, &out_dir, &strategy, tile_size),
        Command::Compare { size, sigma, seed } => run_compare(size, sigma, seed),
    }
}

fn run_demo(
    size: usize,
    sigma: f32,
    out_dir: &Path,
    strategies: &[BlurStrategy],
    tile_size: usize,
) -> ExitCode {
    let strategies = if strategies.is_empty() {
        &BlurStrategy::ALL[..]
    } else {
        strategies
    };

    if let Err(e) = fs::create_dir_all(out_dir) {
        error!("cannot create {}: {e}", out_dir.display());
        return ExitCode::from(2);
    }

    let input = match io::test_pattern(size, size) {
        Ok(image) => image,
        Err(e) => {
            error!("cannot build {size}x{size} test pattern: {e}");
            return ExitCode::from(2);
        }
    };
    if let Err(e) = io::save_ppm(&input, out_dir.join("original.ppm")) {
        error!("saving original: {e}");
    }

    let blur = GaussianBlur::new(BlurConfig::default().with_tile_size(tile_size));
    println!(
        "{size}x{size} image, sigma {sigma}, {} workers, {tile_size}px tiles",
        blur.config().effective_workers()
    );

    let mut failures = 0;
    for &strategy in strategies {
        let mut output = match ImageBuffer::new(size, size) {
            Ok(image) => image,
            Err(e) => {
                error!("{strategy}: {e}");
                failures += 1;
                continue;
            }
        };

        let start = Instant::now();
        if let Err(e) = blur.blur(strategy, &input, &mut output, sigma) {
            error!("{strategy}: {e}");
            failures += 1;
            continue;
        }
        let elapsed = start.elapsed();
        println!("{strategy:>12}: {:>10.3} ms", elapsed.as_secs_f64() * 1e3);

        let path = out_dir.join(format!("blurred_{strategy}.ppm"));
        if let Err(e) = io::save_ppm(&output, &path) {
            error!("saving {}: {e}", path.display());
            failures += 1;
        }
    }

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

fn run_compare(size: usize, sigma: f32, seed: u64) -> ExitCode {
    let input = match io::noise_pattern(size, size, seed) {
        Ok(image) => image,
        Err(e) => {
            error!("cannot build {size}x{size} noise: {e}");
            return ExitCode::from(2);
        }
    };

    let blur = GaussianBlur::default();
    let mut outputs = Vec::with_capacity(BlurStrategy::ALL.len());
    for strategy in BlurStrategy::ALL {
        let result = ImageBuffer::new(size, size)
            .and_then(|mut output| blur.blur(strategy, &input, &mut output, sigma).map(|_| output));
        match result {
            Ok(output) => outputs.push((strategy, output)),
            Err(e) => {
                error!("{strategy}: {e}");
                return ExitCode::from(2);
            }
        }
    }

    let Some(((_, baseline), rest)) = outputs.split_first() else {
        return ExitCode::from(2);
    };

    let mut within_bounds = true;
    for (strategy, output) in rest {
        let diff = match baseline.diff(output, TOLERANCE) {
            Ok(diff) => diff,
            Err(e) => {
                error!("{strategy}: {e}");
                return ExitCode::from(2);
            }
        };
        let ok = diff.mismatch_ratio() < 0.01;
        within_bounds &= ok;
        let [r, g, b, a] = diff.channel_max;
        println!(
            "{strategy:>12} vs scalar: max |diff| {:.3e} (R {r:.1e} G {g:.1e} B {b:.1e} A {a:.1e}), {} mismatches ({:.4}%) {}",
            diff.max_abs,
            diff.mismatches,
            diff.mismatch_ratio() * 100.0,
            if ok { "OK" } else { "FAIL" }
        );
    }

    if within_bounds {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

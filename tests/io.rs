use std::fs;
use std::path::PathBuf;

use simdblur::io::{save_ppm, test_pattern, write_ppm};
use simdblur::{blur_vectorized, BlurError, ImageBuffer};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("simdblur-{}-{name}", std::process::id()))
}

#[test]
fn test_save_ppm_writes_header_and_rgb_payload() {
    let input = test_pattern(32, 16).unwrap();
    let mut output = ImageBuffer::new(32, 16).unwrap();
    blur_vectorized(&input, &mut output, 2.0).unwrap();

    let path = temp_path("blurred.ppm");
    save_ppm(&output, &path).unwrap();
    let bytes = fs::read(&path).unwrap();
    fs::remove_file(&path).unwrap();

    let header = b"P6\n32 16\n255\n";
    assert_eq!(&bytes[..header.len()], header);
    assert_eq!(bytes.len(), header.len() + 32 * 16 * 3);

    let mut in_memory = Vec::new();
    write_ppm(&output, &mut in_memory).unwrap();
    assert_eq!(bytes, in_memory);
}

#[test]
fn test_save_ppm_reports_io_errors() {
    let image = ImageBuffer::new(2, 2).unwrap();
    let path = temp_path("missing-dir").join("image.ppm");

    let result = save_ppm(&image, &path);
    assert!(matches!(result, Err(BlurError::Io { .. })), "{result:?}");
}

#[test]
fn test_pattern_is_deterministic() {
    let a = test_pattern(50, 30).unwrap();
    let b = test_pattern(50, 30).unwrap();
    assert_eq!(a.data(), b.data());
    assert!(a.data().iter().all(|v| (0.0..=1.0).contains(v)));
}

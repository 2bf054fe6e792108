//! Integration tests for the soq binary.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn soq(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_soq"))
        .args(args)
        .env_remove("SOQ_LOG")
        .output()
        .expect("Failed to run soq")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Writes an 8-bit PNG.
fn write_png(path: &Path, width: u32, height: u32, color: png::ColorType, data: &[u8]) {
    let file = File::create(path).expect("Failed to create PNG");
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(color);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().expect("Failed to write header");
    writer.write_image_data(data).expect("Failed to write PNG");
}

/// An RGB PNG with a deterministic pattern.
fn pattern_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    let data: Vec<u8> = (0..width * height * 3)
        .map(|i| ((i * 29 + i / 3) % 256) as u8)
        .collect();
    write_png(&path, width, height, png::ColorType::Rgb, &data);
    path
}

/// An RGB PNG of one flat colour.
fn solid_png(dir: &Path, name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    let data: Vec<u8> = (0..width * height).flat_map(|_| rgb).collect();
    write_png(&path, width, height, png::ColorType::Rgb, &data);
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().expect("temp path is UTF-8")
}

#[test]
fn test_identical_images_default_psnr() {
    let dir = tempfile::tempdir().unwrap();
    let a = pattern_png(dir.path(), "a.png", 16, 12);

    let out = soq(&[arg(&a), arg(&a)]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "psnr.R: inf\npsnr.G: inf\npsnr.B: inf\n");
}

#[test]
fn test_metric_flags_output_order() {
    let dir = tempfile::tempdir().unwrap();
    let a = pattern_png(dir.path(), "a.png", 16, 16);

    let out = soq(&["--mse", "--ssim", arg(&a), arg(&a)]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "ssim.R: 1.0000\nssim.G: 1.0000\nssim.B: 1.0000\n\
         mse.R: 0.0000\nmse.G: 0.0000\nmse.B: 0.0000\n"
    );
}

#[test]
fn test_known_mse() {
    let dir = tempfile::tempdir().unwrap();
    let a = solid_png(dir.path(), "a.png", 4, 4, [100, 100, 100]);
    let b = solid_png(dir.path(), "b.png", 4, 4, [110, 100, 90]);

    let out = soq(&["--mse", "--psnr", arg(&a), arg(&b)]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], "psnr.R: 28.1308");
    assert_eq!(lines[1], "psnr.G: inf");
    assert_eq!(lines[3], "mse.R: 100.0000");
    assert_eq!(lines[4], "mse.G: 0.0000");
    assert_eq!(lines[5], "mse.B: 100.0000");
}

#[test]
fn test_unsupported_colourspace_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let a = pattern_png(dir.path(), "a.png", 8, 8);

    let out = soq(&["-C", "XYZ", arg(&a), arg(&a)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(
        stderr(&out).contains("Fatal: No colour mapping RGB -> XYZ"),
        "stderr: {}",
        stderr(&out)
    );
}

#[test]
fn test_colourspace_yuv_labels() {
    let dir = tempfile::tempdir().unwrap();
    let a = pattern_png(dir.path(), "a.png", 8, 8);

    for flag in ["-C", "--colourspace", "--colorspace"] {
        let out = soq(&[flag, "yuv", arg(&a), arg(&a)]);
        assert!(out.status.success(), "{flag}: {}", stderr(&out));
        assert_eq!(stdout(&out), "psnr.Y: inf\npsnr.U: inf\npsnr.V: inf\n");
    }
}

#[test]
fn test_benchmark_prints_results_once() {
    let dir = tempfile::tempdir().unwrap();
    let a = pattern_png(dir.path(), "a.png", 8, 8);

    let out = soq(&["-B", "3", "--mse", arg(&a), arg(&a)]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "Benchmark mode; looping 3 times\nmse.R: 0.0000\nmse.G: 0.0000\nmse.B: 0.0000\n"
    );

    let out = soq(&["--benchmark", "0", arg(&a), arg(&a)]);
    assert!(out.status.success());
    assert!(stdout(&out).is_empty());
}

#[test]
fn test_original_resized_to_version() {
    let dir = tempfile::tempdir().unwrap();
    let small = solid_png(dir.path(), "small.png", 2, 2, [128, 128, 128]);
    let large = solid_png(dir.path(), "large.png", 4, 4, [128, 128, 128]);

    let out = soq(&["--psnr", "--ssim", "--mse", arg(&small), arg(&large)]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).lines().count(), 9);
    assert!(stdout(&out).contains("mse.B: 0.0000"));
}

#[test]
fn test_gray_against_rgb_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let gray = dir.path().join("gray.png");
    write_png(&gray, 4, 4, png::ColorType::Grayscale, &[50; 16]);
    let rgb = solid_png(dir.path(), "rgb.png", 4, 4, [50, 50, 50]);

    let out = soq(&[arg(&gray), arg(&rgb)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Fatal: No colour mapping Y -> RGB"));
}

#[test]
fn test_rgba_original_against_rgb_version() {
    let dir = tempfile::tempdir().unwrap();
    let rgba = dir.path().join("original.png");
    let data: Vec<u8> = (0..16).flat_map(|_| [60, 120, 180, 255]).collect();
    write_png(&rgba, 4, 4, png::ColorType::Rgba, &data);
    let rgb = solid_png(dir.path(), "version.png", 4, 4, [60, 120, 180]);

    let out = soq(&["--mse", arg(&rgba), arg(&rgb)]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "mse.R: 0.0000\nmse.G: 0.0000\nmse.B: 0.0000\n");

    // And the other way round, through a channel-order conversion
    let out = soq(&["-C", "BGR", "--mse", arg(&rgb), arg(&rgba)]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "mse.B: 0.0000\nmse.G: 0.0000\nmse.R: 0.0000\n");
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let a = pattern_png(dir.path(), "a.png", 4, 4);
    let missing = dir.path().join("missing.png");

    let out = soq(&[arg(&a), arg(&missing)]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Fatal: Could not read image file"));
    assert!(stderr(&out).contains("missing.png"));

    // The OS message is reported once, not repeated by the error chain
    let reason = std::fs::File::open(&missing).unwrap_err().to_string();
    assert_eq!(
        stderr(&out).trim_end(),
        format!("Fatal: Could not read image file {}: {reason}", missing.display())
    );
}

#[test]
fn test_usage_errors_exit_1() {
    let dir = tempfile::tempdir().unwrap();
    let a = pattern_png(dir.path(), "a.png", 4, 4);

    // One positional
    assert_eq!(soq(&[arg(&a)]).status.code(), Some(1));
    // Three positionals
    assert_eq!(soq(&[arg(&a), arg(&a), arg(&a)]).status.code(), Some(1));
    // Unknown option
    assert_eq!(soq(&["--nope", arg(&a), arg(&a)]).status.code(), Some(1));
    // Bad number
    assert_eq!(soq(&["-B", "x", arg(&a), arg(&a)]).status.code(), Some(1));

    let help = soq(&["--help"]);
    assert_eq!(help.status.code(), Some(1));
    assert!(stdout(&help).contains("--colourspace"));
}

#[test]
fn test_version_exits_0() {
    let out = soq(&["-V"]);
    assert!(out.status.success());
    assert_eq!(
        stdout(&out).trim(),
        format!("soq {}", env!("CARGO_PKG_VERSION"))
    );
}

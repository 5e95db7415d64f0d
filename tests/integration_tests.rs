mod common;

use assert_cmd::Command;
use common::{count_files, create_temp_directory, write_corrupt, write_image};
use image::ImageFormat;
use predicates::prelude::*;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("img-compact").unwrap();
    cmd.arg("--no-progress");
    cmd
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("img-compact").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("agressivo"));
}

#[test]
fn test_missing_args() {
    let mut cmd = Command::cargo_bin("img-compact").unwrap();
    cmd.assert().failure();
}

#[test]
fn test_nonexistent_input_fails() {
    let temp_dir = create_temp_directory();
    let output = temp_dir.path().join("out");

    cmd()
        .arg(temp_dir.path().join("nonexistent.jpg"))
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input path not found"));

    assert!(!output.exists());
}

#[test]
fn test_invalid_quality_fails() {
    let temp_dir = create_temp_directory();
    let source = write_image(&temp_dir.path().join("a.jpg"), 20, 20, ImageFormat::Jpeg);

    cmd()
        .arg(&source)
        .args(["--quality", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quality"));

    assert_eq!(count_files(temp_dir.path()), 1);
}

#[test]
fn test_upscale_rejected() {
    let temp_dir = create_temp_directory();
    let source = write_image(&temp_dir.path().join("a.jpg"), 20, 20, ImageFormat::Jpeg);

    cmd()
        .arg(&source)
        .args(["--scale", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scale"));
}

#[test]
fn test_invalid_format_fails() {
    let temp_dir = create_temp_directory();
    let source = write_image(&temp_dir.path().join("a.jpg"), 20, 20, ImageFormat::Jpeg);

    cmd()
        .arg(&source)
        .args(["--format", "tiff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("format"));
}

#[test]
fn test_output_path_is_a_file() {
    let temp_dir = create_temp_directory();
    write_image(&temp_dir.path().join("a.jpg"), 20, 20, ImageFormat::Jpeg);
    let occupied = temp_dir.path().join("occupied");
    std::fs::write(&occupied, b"x").unwrap();

    cmd()
        .arg(temp_dir.path())
        .arg("-o")
        .arg(&occupied)
        .assert()
        .failure();
}

#[test]
fn test_single_file_default_profile() {
    let temp_dir = create_temp_directory();
    let source = write_image(&temp_dir.path().join("photo.jpg"), 100, 50, ImageFormat::Jpeg);

    cmd()
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("photo.jpg"))
        .stdout(predicate::str::contains("TOTAL"));

    let output = temp_dir.path().join("photo_moderado.jpg");
    let img = image::open(&output).unwrap();
    assert_eq!((img.width(), img.height()), (80, 40));
}

#[test]
fn test_agressivo_converts_to_webp() {
    let temp_dir = create_temp_directory();
    write_image(&temp_dir.path().join("a.png"), 50, 50, ImageFormat::Png);
    let output = temp_dir.path().join("out");

    cmd()
        .arg(temp_dir.path())
        .args(["-m", "agressivo", "-o"])
        .arg(&output)
        .assert()
        .success();

    let written = output.join("a_agressivo.webp");
    let data = std::fs::read(&written).unwrap();
    assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::WebP);
}

#[test]
fn test_overrides_use_custom_tag() {
    let temp_dir = create_temp_directory();
    write_image(&temp_dir.path().join("a.jpg"), 40, 40, ImageFormat::Jpeg);
    let output = temp_dir.path().join("out");

    cmd()
        .arg(temp_dir.path())
        .args(["-m", "leve", "-q", "30", "-s", "0.5", "-f", "png", "-o"])
        .arg(&output)
        .assert()
        .success();

    let img = image::open(output.join("a_custom.png")).unwrap();
    assert_eq!((img.width(), img.height()), (20, 20));
}

#[test]
fn test_batch_with_corrupt_files_still_succeeds() {
    let temp_dir = create_temp_directory();
    write_image(&temp_dir.path().join("a.jpg"), 30, 30, ImageFormat::Jpeg);
    write_image(&temp_dir.path().join("b.png"), 30, 30, ImageFormat::Png);
    write_corrupt(&temp_dir.path().join("c.jpg"));
    write_corrupt(&temp_dir.path().join("d.webp"));
    let output = temp_dir.path().join("out");

    cmd()
        .arg(temp_dir.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 succeeded, 2 failed"))
        .stdout(predicate::str::contains("DecodeError"));

    assert_eq!(count_files(&output), 2);
}

#[test]
fn test_batch_all_corrupt_still_succeeds() {
    let temp_dir = create_temp_directory();
    write_corrupt(&temp_dir.path().join("a.jpg"));

    cmd()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 succeeded, 1 failed"));
}

#[test]
fn test_batch_empty_directory() {
    let temp_dir = create_temp_directory();

    cmd()
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No image files found"));
}

#[test]
fn test_batch_recursive_flag() {
    let temp_dir = create_temp_directory();
    let subdir = temp_dir.path().join("subdir");
    std::fs::create_dir(&subdir).unwrap();
    write_image(&subdir.join("nested.jpg"), 20, 20, ImageFormat::Jpeg);
    let output = temp_dir.path().join("out");

    cmd()
        .arg(temp_dir.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("No image files found"));

    cmd()
        .arg(temp_dir.path())
        .arg("-r")
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    assert!(output.join("nested_moderado.jpg").exists());
}

#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn noisy_image(width: u32, height: u32) -> DynamicImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let v = (x.wrapping_mul(31) ^ y.wrapping_mul(17)).wrapping_add(x * y) as u8;
        Rgb([v, v.wrapping_mul(3), 255 - v])
    });
    DynamicImage::ImageRgb8(img)
}

/// Write a JPEG that shrinks a lot when re-encoded at a low quality.
pub fn create_test_jpeg(path: &Path, quality: u8) {
    let mut buf = Vec::new();
    noisy_image(96, 96)
        .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        .unwrap();
    fs::write(path, buf).unwrap();
}

pub fn create_test_png(path: &Path, width: u32, height: u32) {
    noisy_image(width, height).save(path).unwrap();
}

pub fn create_fake_file(path: &Path, contents: &[u8]) {
    File::create(path).unwrap().write_all(contents).unwrap();
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn create_images_directory(temp_dir: &TempDir) -> PathBuf {
    let images = temp_dir.child("assets/images");
    images.create_dir_all().unwrap();
    images.to_path_buf()
}

/// The binary, running in `cwd` as if on a GitHub runner.
pub fn action_command(cwd: &Path, output_file: &Path) -> Command {
    let mut cmd = Command::cargo_bin("img-squeeze-action").unwrap();
    cmd.current_dir(cwd)
        .env("GITHUB_ACTIONS", "true")
        .env("GITHUB_OUTPUT", output_file)
        .env_remove("INPUT_IMAGES-PATH")
        .env_remove("INPUT_QUALITY")
        .env_remove("INPUT_MAX-WIDTH")
        .env_remove("RUST_LOG");
    cmd
}

pub fn git_available() -> bool {
    let available = std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false);
    if !available {
        eprintln!("skipping: git is not installed");
    }
    available
}

/// A repository with one commit holding a README, ready for a second commit.
pub fn init_repository(repo: &Path) {
    git(repo, &["init", "-q"]);
    create_fake_file(&repo.join("README.md"), b"images\n");
    git(repo, &["add", "."]);
    git(repo, &["commit", "-q", "-m", "initial"]);
}

pub fn git(cwd: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .current_dir(cwd)
        .args([
            "-c",
            "user.name=img-squeeze",
            "-c",
            "user.email=img-squeeze@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .status()
        .unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use img_parts::{Bytes, DynImage, ImageEXIF};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Minimal big-endian TIFF block with a single GPS IFD pointer tag.
pub const GPS_EXIF: &[u8] = &[
    b'M', b'M', 0x00, 0x2a, 0x00, 0x00, 0x00, 0x08, // header, IFD0 at offset 8
    0x00, 0x01, // one entry
    0x88, 0x25, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x1a, // GPSInfo -> 26
    0x00, 0x00, 0x00, 0x00, // no next IFD
    0x00, 0x00, // empty GPS IFD
    0x00, 0x00, 0x00, 0x00,
];

/// Big-endian TIFF block whose only tag is Orientation = 6 (rotate 90° CW).
pub const ROTATE_90_EXIF: &[u8] = &[
    b'M', b'M', 0x00, 0x2a, 0x00, 0x00, 0x00, 0x08, // header, IFD0 at offset 8
    0x00, 0x01, // one entry
    0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01, 0x00, 0x06, 0x00, 0x00, // Orientation = 6
    0x00, 0x00, 0x00, 0x00, // no next IFD
];

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 3 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
    }))
}

pub fn write_image(path: &Path, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    gradient(width, height)
        .save_with_format(path, format)
        .unwrap();
    path.to_path_buf()
}

pub fn write_corrupt(path: &Path) -> PathBuf {
    fs::write(path, b"fake image data").unwrap();
    path.to_path_buf()
}

/// JPEG carrying the `GPS_EXIF` block.
pub fn write_jpeg_with_exif(path: &Path) -> PathBuf {
    write_jpeg_with_custom_exif(path, 64, 48, GPS_EXIF)
}

pub fn write_jpeg_with_custom_exif(
    path: &Path,
    width: u32,
    height: u32,
    exif: &'static [u8],
) -> PathBuf {
    let mut encoded = Vec::new();
    gradient(width, height)
        .write_to(&mut std::io::Cursor::new(&mut encoded), ImageFormat::Jpeg)
        .unwrap();

    let mut image = DynImage::from_bytes(Bytes::from(encoded)).unwrap().unwrap();
    image.set_exif(Some(Bytes::from_static(exif)));
    let mut spliced = Vec::new();
    image.encoder().write_to(&mut spliced).unwrap();

    fs::write(path, spliced).unwrap();
    path.to_path_buf()
}

pub fn read_exif(path: &Path) -> Option<Bytes> {
    let data = fs::read(path).unwrap();
    DynImage::from_bytes(Bytes::from(data))
        .unwrap()
        .and_then(|image| image.exif())
}

pub fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter(|entry| entry.as_ref().unwrap().path().is_file())
        .count()
}

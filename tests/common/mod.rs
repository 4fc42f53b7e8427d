/*!
 * Common test utilities for the echopath test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;


/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Encodes a small blank image as PNG bytes for OCR pipeline tests
pub fn create_test_image_bytes() -> Vec<u8> {
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;

    let image = DynamicImage::new_rgb8(64, 32);
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encoding a blank test image cannot fail");
    bytes
}

use std::path::{Path, PathBuf};

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;

use crate::error::Result;

pub const METADATA_FILE_NAME: &str = "pose.yaml";

/// Same default as OpenCV's `imwrite`.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

pub fn image_file_name(index: usize) -> String {
    format!("image{}.jpg", index)
}

/// Joins a relative `path` onto `cwd`; absolute paths are returned as is.
pub fn resolve_against(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_relative() {
        cwd.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Resolves `path` against the current working directory and creates it.
///
/// An existing directory is fine; its contents are left alone and overwritten
/// file by file during capture.
pub fn prepare_output_dir(path: &Path) -> Result<PathBuf> {
    let output_dir = if path.is_relative() {
        log::info!("relative path {}", path.display());
        resolve_against(path, &std::env::current_dir()?)
    } else {
        path.to_path_buf()
    };
    std::fs::create_dir_all(&output_dir)?;
    log::info!("saving in: {}", output_dir.display());
    Ok(output_dir)
}

/// Encodes a frame as JPEG, dropping alpha since JPEG has none.
pub fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    let rgb = img.to_rgb8();
    JpegEncoder::new_with_quality(&mut bytes, quality).encode_image(&rgb)?;
    Ok(bytes)
}

pub fn write_jpeg(output_dir: &Path, index: usize, jpeg: &[u8]) -> Result<String> {
    let file_name = image_file_name(index);
    std::fs::write(output_dir.join(&file_name), jpeg)?;
    Ok(file_name)
}

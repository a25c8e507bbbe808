//! Decoding inputs and encoding the annotated result for download or upload.

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::error::Error;

/// Decodes any supported raster file into RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, Error> {
    Ok(image::open(path)?.to_rgba8())
}

/// Decodes uploaded bytes into RGBA, guessing the format from the content.
pub fn load_rgba_from_memory(bytes: &[u8]) -> Result<RgbaImage, Error> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Lossless PNG encoding of an annotated image.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, Error> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Writes `image` as PNG, creating parent directories. Returns the byte count.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<usize, Error> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let bytes = encode_png(image)?;
    std::fs::write(path, &bytes).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(bytes.len())
}

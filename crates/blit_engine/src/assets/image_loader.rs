//! Image loading utilities for texture data
//!
//! Decodes PNG, JPEG, and other raster formats into RGBA8 pixel buffers
//! ready for GPU upload. The texture cache consumes decoding through the
//! [`ImageDecoder`] trait so tests and tools can substitute their own
//! sources.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Image decoding errors.
#[derive(Debug, Error)]
pub enum ImageError {
    /// No known image format matched the file's contents.
    #[error("could not detect an image format for {path}")]
    UnknownFormat {
        /// The file that was probed.
        path: PathBuf,
    },

    /// The format was recognized but decoding failed.
    #[error("failed to decode {path}: {message}")]
    DecodeFailed {
        /// The file that failed to decode.
        path: PathBuf,
        /// Decoder diagnostic.
        message: String,
    },

    /// Decoding produced no pixels.
    #[error("{path} decoded to an empty pixel buffer")]
    EmptyImage {
        /// The offending file.
        path: PathBuf,
    },
}

/// Decoded RGBA8 pixel data ready for GPU upload.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data, 4 bytes per pixel
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl ImageData {
    /// Load an image from a file path.
    ///
    /// The format is sniffed from the file contents, not the extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        log::debug!("decoding image {}", path.display());

        let reader = image::ImageReader::open(path)
            .map_err(|e| ImageError::DecodeFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .with_guessed_format()
            .map_err(|e| ImageError::DecodeFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if reader.format().is_none() {
            return Err(ImageError::UnknownFormat {
                path: path.to_path_buf(),
            });
        }

        let decoded = reader.decode().map_err(|e| ImageError::DecodeFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::validated(rgba.into_raw(), width, height, path)
    }

    /// Load an image from memory (useful for embedded resources).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let placeholder = Path::new("<memory>");
        let decoded =
            image::load_from_memory(bytes).map_err(|e| ImageError::DecodeFailed {
                path: placeholder.to_path_buf(),
                message: e.to_string(),
            })?;

        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::validated(rgba.into_raw(), width, height, placeholder)
    }

    /// Create a solid color image (useful for testing and placeholders).
    pub fn solid_color(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 4);
        for _ in 0..pixel_count {
            data.extend_from_slice(&color);
        }
        Self { data, width, height }
    }

    /// Size of the pixel buffer in bytes.
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    fn validated(
        data: Vec<u8>,
        width: u32,
        height: u32,
        path: &Path,
    ) -> Result<Self, ImageError> {
        if data.is_empty() || width == 0 || height == 0 {
            return Err(ImageError::EmptyImage {
                path: path.to_path_buf(),
            });
        }
        log::debug!("decoded {}x{} image from {}", width, height, path.display());
        Ok(Self { data, width, height })
    }
}

/// Decoder seam between the texture cache and the image backend.
pub trait ImageDecoder {
    /// Decode the image at `path` into RGBA8 pixels.
    fn decode(&self, path: &Path) -> Result<ImageData, ImageError>;
}

/// Decoder backed by the `image` crate.
#[derive(Debug, Default)]
pub struct FileDecoder;

impl ImageDecoder for FileDecoder {
    fn decode(&self, path: &Path) -> Result<ImageData, ImageError> {
        ImageData::from_file(path)
    }
}

//! Texture device interface
//!
//! The engine never drives a GPU API directly; every texture upload, bind,
//! and destroy goes through this trait. The backend (OpenGL, Vulkan, a
//! recording fake) is chosen by whoever constructs the engine.

use thiserror::Error;

use crate::assets::image_loader::ImageData;

/// Opaque identifier for a GPU-resident texture object.
///
/// Handles are issued by the device and may be recycled after a destroy;
/// the bind-state cache accounts for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Sampling filter applied when a texture is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Nearest-neighbour sampling.
    Nearest,
    /// Linear interpolation.
    Linear,
    /// Trilinear interpolation across mipmap levels.
    LinearMipmapLinear,
}

/// Edge wrap behaviour outside the 0..1 texture coordinate range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Stretch the edge texels.
    #[default]
    ClampToEdge,
    /// Tile the texture.
    Repeat,
    /// Tile with mirroring.
    MirroredRepeat,
}

/// Parameters for a texture upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadDesc {
    /// Generate a mipmap chain after upload
    pub mipmaps: bool,
    /// Magnification filter
    pub mag_filter: Filter,
    /// Minification filter
    pub min_filter: Filter,
    /// Edge wrap mode for both axes
    pub wrap: WrapMode,
    /// Anisotropic filtering level to apply, when supported
    pub anisotropy: Option<f32>,
}

/// Errors reported by a texture device.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device could not allocate a texture object.
    #[error("texture allocation failed: {0}")]
    Allocation(String),

    /// The pixel data was rejected.
    #[error("texture upload rejected: {0}")]
    Upload(String),
}

/// Interface to the GPU's texture facilities.
///
/// Implementations are not required to be thread-safe; the engine only
/// calls them from the thread that owns the graphics context.
pub trait TextureDevice {
    /// Upload `image` as a new texture object and return its handle.
    fn create_texture(
        &mut self,
        image: &ImageData,
        desc: &UploadDesc,
    ) -> Result<TextureHandle, DeviceError>;

    /// Make `handle` the active texture on `unit`.
    fn bind_texture(&mut self, unit: u32, handle: TextureHandle);

    /// Destroy the texture object behind `handle`.
    fn destroy_texture(&mut self, handle: TextureHandle);

    /// Highest supported anisotropic filtering level, or `None` when the
    /// device has no anisotropic filtering.
    fn max_anisotropy(&self) -> Option<f32>;
}

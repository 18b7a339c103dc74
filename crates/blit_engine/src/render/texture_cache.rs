//! Reference-counted texture cache with a per-unit bind-state cache
//!
//! The cache owns the mapping from logical texture name to GPU handle,
//! dimensions, and reference count. Loading a name that is already cached
//! bumps its refcount instead of decoding again; releasing drops the count
//! and destroys the GPU object the moment it reaches zero. There is no LRU
//! and no deferred eviction.
//!
//! Alongside the records sits the bind-state cache: one slot per texture
//! unit remembering the last handle bound there. Binding a handle that the
//! slot already holds is skipped entirely, because on some drivers a
//! redundant bind costs as much as a real texture switch. Evicting a
//! record scrubs every slot holding its handle, so a recycled handle can
//! never produce a stale "already bound" match.
//!
//! The cache is not thread-safe. It belongs to the thread that owns the
//! graphics context, and the engine only exposes it through the draw-side
//! context to keep it there.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::assets::image_loader::{ImageDecoder, ImageError};
use crate::core::config::TextureConfig;

use super::device::{DeviceError, Filter, TextureDevice, TextureHandle, UploadDesc, WrapMode};

/// Texture cache errors.
#[derive(Debug, Error)]
pub enum TextureError {
    /// The requested unit is outside the configured bind-slot range.
    #[error("texture unit {unit} is outside the configured limit of {limit}")]
    UnitOutOfRange {
        /// The rejected unit index.
        unit: u32,
        /// The configured unit count.
        limit: u32,
    },

    /// The cache already holds its configured maximum number of records.
    #[error("texture cache is full ({capacity} textures)")]
    CacheFull {
        /// The configured capacity.
        capacity: usize,
    },

    /// The name is not in the cache.
    #[error("texture \"{name}\" is not cached")]
    NotCached {
        /// The missing name.
        name: String,
    },

    /// The record was registered without dimensions and is bind-only.
    #[error("texture \"{name}\" has no recorded dimensions")]
    DimensionsUnknown {
        /// The offending name.
        name: String,
    },

    /// `register_external` would have overwritten an existing record.
    #[error("texture name \"{name}\" is already in use; release it first")]
    NameTaken {
        /// The contested name.
        name: String,
    },

    /// The image decoder could not produce pixels.
    #[error("loading \"{name}\" failed: {source}")]
    Load {
        /// The texture that failed to load.
        name: String,
        /// The decoder error.
        #[source]
        source: ImageError,
    },

    /// The device rejected the upload.
    #[error("device rejected \"{name}\": {source}")]
    Device {
        /// The texture that failed to upload.
        name: String,
        /// The device error.
        #[source]
        source: DeviceError,
    },
}

/// Load options for [`TextureCache::load_or_get`].
#[derive(Debug, Clone, Copy)]
pub struct LoadParams {
    /// Generate mipmaps and minify with trilinear filtering
    pub mipmaps: bool,
    /// Nearest-neighbour magnification for pixel art; ignored when
    /// `mipmaps` is set
    pub pixelate: bool,
    /// Edge wrap mode
    pub wrap: WrapMode,
    /// Texture unit the handle is bound to after the load
    pub unit: u32,
}

impl Default for LoadParams {
    fn default() -> Self {
        Self {
            mipmaps: true,
            pixelate: false,
            wrap: WrapMode::ClampToEdge,
            unit: 0,
        }
    }
}

struct TextureRecord {
    handle: TextureHandle,
    /// `None` for external registrations that supplied no size; such
    /// records are bind-only.
    size: Option<(u32, u32)>,
    refcount: u32,
    unload_on_zero: bool,
}

/// Reference-counted texture cache with redundant-bind elision.
///
/// See the [module docs](self) for the lifecycle rules.
pub struct TextureCache {
    device: Box<dyn TextureDevice>,
    decoder: Box<dyn ImageDecoder>,
    records: HashMap<String, TextureRecord>,
    /// Bind-state cache: last handle bound per unit, `None` = unknown.
    bound: Vec<Option<TextureHandle>>,
    search_path: PathBuf,
    capacity: usize,
}

impl TextureCache {
    /// Create a cache over the given device and decoder.
    pub fn new(
        device: Box<dyn TextureDevice>,
        decoder: Box<dyn ImageDecoder>,
        config: &TextureConfig,
    ) -> Self {
        log::info!(
            "creating texture cache: {} bind slots, capacity {}",
            config.max_texture_units,
            config.max_cached_textures
        );
        Self {
            device,
            decoder,
            records: HashMap::new(),
            bound: vec![None; config.max_texture_units as usize],
            search_path: config.search_path.clone(),
            capacity: config.max_cached_textures,
        }
    }

    /// Return the handle for `name`, loading it on first use.
    ///
    /// A cache hit increments the refcount and binds the cached handle to
    /// `params.unit`. A miss decodes the image under the search path,
    /// uploads it with the filtering policy derived from `params`, inserts
    /// a record with refcount 1, and binds it.
    ///
    /// On any failure the cache and the bind-state slots are left exactly
    /// as they were; no partial record is inserted.
    pub fn load_or_get(
        &mut self,
        name: &str,
        params: &LoadParams,
    ) -> Result<TextureHandle, TextureError> {
        self.check_unit(params.unit)?;

        if let Some(record) = self.records.get_mut(name) {
            record.refcount += 1;
            let (handle, refcount) = (record.handle, record.refcount);
            log::debug!("texture \"{name}\" cache hit, refcount now {refcount}");
            self.bind_handle(handle, params.unit)?;
            return Ok(handle);
        }

        if self.records.len() >= self.capacity {
            return Err(TextureError::CacheFull {
                capacity: self.capacity,
            });
        }

        let path = self.search_path.join(name);
        let image = self.decoder.decode(&path).map_err(|source| {
            log::error!("failed to load texture \"{name}\": {source}");
            TextureError::Load {
                name: name.to_owned(),
                source,
            }
        })?;

        let desc = self.upload_desc(params);
        let handle = self
            .device
            .create_texture(&image, &desc)
            .map_err(|source| TextureError::Device {
                name: name.to_owned(),
                source,
            })?;

        self.records.insert(
            name.to_owned(),
            TextureRecord {
                handle,
                size: Some((image.width, image.height)),
                refcount: 1,
                unload_on_zero: true,
            },
        );
        log::debug!(
            "loaded \"{name}\" ({}x{}) as {handle:?}",
            image.width,
            image.height
        );

        self.bind_handle(handle, params.unit)?;
        Ok(handle)
    }

    /// Drop one reference to `name`.
    ///
    /// When the count reaches zero the GPU handle is destroyed, every
    /// bind-state slot holding it is reset, and the record is removed.
    /// Releasing a name that is not cached is a warned no-op.
    pub fn release(&mut self, name: &str) -> Result<(), TextureError> {
        let Some(record) = self.records.get_mut(name) else {
            log::warn!("tried to release texture \"{name}\" but it isn't cached");
            return Err(TextureError::NotCached {
                name: name.to_owned(),
            });
        };

        record.refcount = record.refcount.saturating_sub(1);
        if record.refcount == 0 && record.unload_on_zero {
            let handle = record.handle;
            self.records.remove(name);
            self.device.destroy_texture(handle);
            for slot in &mut self.bound {
                if *slot == Some(handle) {
                    *slot = None;
                }
            }
            log::debug!("evicted texture \"{name}\" ({handle:?})");
        }
        Ok(())
    }

    /// Bind `name` to `unit`, loading it first if it is not cached.
    ///
    /// The implicit load uses mipmaps and clamp-to-edge wrapping; callers
    /// that need other parameters must call
    /// [`load_or_get`](Self::load_or_get) themselves.
    pub fn bind(&mut self, name: &str, unit: u32) -> Result<TextureHandle, TextureError> {
        self.check_unit(unit)?;

        if let Some(record) = self.records.get(name) {
            let handle = record.handle;
            self.bind_handle(handle, unit)?;
            return Ok(handle);
        }

        self.load_or_get(
            name,
            &LoadParams {
                unit,
                ..LoadParams::default()
            },
        )
    }

    /// Bind a raw handle to `unit`.
    ///
    /// When the bind-state slot for `unit` already holds `handle` this is
    /// a no-op and no device call is made.
    pub fn bind_handle(
        &mut self,
        handle: TextureHandle,
        unit: u32,
    ) -> Result<(), TextureError> {
        self.check_unit(unit)?;
        let slot = unit as usize;
        if self.bound[slot] != Some(handle) {
            self.device.bind_texture(unit, handle);
            self.bound[slot] = Some(handle);
        }
        Ok(())
    }

    /// Adopt a handle created outside the cache, e.g. a render-target
    /// color attachment.
    ///
    /// Registering a name that is already present fails with
    /// [`TextureError::NameTaken`] instead of silently orphaning the old
    /// handle. Records registered without `size` can be bound but report
    /// [`TextureError::DimensionsUnknown`] from
    /// [`dimensions`](Self::dimensions).
    pub fn register_external(
        &mut self,
        name: &str,
        handle: TextureHandle,
        size: Option<(u32, u32)>,
    ) -> Result<(), TextureError> {
        if self.records.contains_key(name) {
            return Err(TextureError::NameTaken {
                name: name.to_owned(),
            });
        }
        if self.records.len() >= self.capacity {
            return Err(TextureError::CacheFull {
                capacity: self.capacity,
            });
        }
        self.records.insert(
            name.to_owned(),
            TextureRecord {
                handle,
                size,
                refcount: 1,
                unload_on_zero: true,
            },
        );
        log::debug!("registered external texture \"{name}\" as {handle:?}");
        Ok(())
    }

    /// Width and height of a cached texture in pixels.
    pub fn dimensions(&self, name: &str) -> Result<(u32, u32), TextureError> {
        match self.records.get(name) {
            None => {
                log::warn!("texture \"{name}\" is not cached, cannot fetch dimensions");
                Err(TextureError::NotCached {
                    name: name.to_owned(),
                })
            }
            Some(record) => record.size.ok_or_else(|| TextureError::DimensionsUnknown {
                name: name.to_owned(),
            }),
        }
    }

    /// Current reference count for `name`, if cached.
    pub fn refcount(&self, name: &str) -> Option<u32> {
        self.records.get(name).map(|record| record.refcount)
    }

    /// Handle the bind-state cache believes is on `unit`.
    pub fn bound_handle(&self, unit: u32) -> Option<TextureHandle> {
        self.bound.get(unit as usize).copied().flatten()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the cache holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Destroy every remaining record and reset the bind-state cache.
    ///
    /// Runs again on drop; a record destroyed here is never destroyed
    /// twice.
    pub fn clear(&mut self) {
        for (name, record) in self.records.drain() {
            log::debug!("destroying texture \"{name}\" at cache teardown");
            self.device.destroy_texture(record.handle);
        }
        for slot in &mut self.bound {
            *slot = None;
        }
    }

    fn upload_desc(&self, params: &LoadParams) -> UploadDesc {
        let (mag_filter, min_filter) = if params.mipmaps {
            (Filter::Linear, Filter::LinearMipmapLinear)
        } else if params.pixelate {
            (Filter::Nearest, Filter::Linear)
        } else {
            (Filter::Linear, Filter::Linear)
        };
        UploadDesc {
            mipmaps: params.mipmaps,
            mag_filter,
            min_filter,
            wrap: params.wrap,
            anisotropy: self.device.max_anisotropy(),
        }
    }

    fn check_unit(&self, unit: u32) -> Result<(), TextureError> {
        let limit = self.bound.len() as u32;
        if unit >= limit {
            return Err(TextureError::UnitOutOfRange { unit, limit });
        }
        Ok(())
    }
}

impl Drop for TextureCache {
    fn drop(&mut self) {
        self.clear();
    }
}

//! A texture device that records calls instead of driving a GPU.
//!
//! Used by the unit tests and by headless runs of demo programs. The
//! shared [`DeviceLog`] makes it possible to assert exactly how many
//! uploads, binds, and destroys the cache issued.

use std::cell::RefCell;
use std::rc::Rc;

use crate::assets::image_loader::ImageData;

use super::device::{DeviceError, TextureDevice, TextureHandle, UploadDesc};

/// One recorded upload.
#[derive(Debug, Clone)]
pub struct UploadRecord {
    /// Handle issued for the upload
    pub handle: TextureHandle,
    /// Uploaded width in pixels
    pub width: u32,
    /// Uploaded height in pixels
    pub height: u32,
    /// Upload parameters as received
    pub desc: UploadDesc,
}

/// Call log shared between a [`HeadlessDevice`] and the code inspecting it.
#[derive(Debug, Default)]
pub struct DeviceLog {
    /// Every upload, in order
    pub uploads: Vec<UploadRecord>,
    /// Every bind actually issued, as (unit, handle)
    pub binds: Vec<(u32, TextureHandle)>,
    /// Every destroyed handle, in order
    pub destroyed: Vec<TextureHandle>,
}

/// A [`TextureDevice`] that allocates fake handles and records every call.
pub struct HeadlessDevice {
    log: Rc<RefCell<DeviceLog>>,
    next_handle: u64,
    free_handles: Vec<u64>,
    recycle: bool,
    anisotropy: Option<f32>,
}

impl HeadlessDevice {
    /// Create a device with fresh handles and 16x anisotropy support.
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(DeviceLog::default())),
            next_handle: 1,
            free_handles: Vec::new(),
            recycle: false,
            anisotropy: Some(16.0),
        }
    }

    /// Reuse destroyed handles for new uploads, the way real drivers do.
    #[must_use]
    pub fn recycle_handles(mut self, recycle: bool) -> Self {
        self.recycle = recycle;
        self
    }

    /// Report no anisotropic filtering support.
    #[must_use]
    pub fn without_anisotropy(mut self) -> Self {
        self.anisotropy = None;
        self
    }

    /// Shared view of the recorded calls.
    pub fn log(&self) -> Rc<RefCell<DeviceLog>> {
        Rc::clone(&self.log)
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureDevice for HeadlessDevice {
    fn create_texture(
        &mut self,
        image: &ImageData,
        desc: &UploadDesc,
    ) -> Result<TextureHandle, DeviceError> {
        let recycled = if self.recycle { self.free_handles.pop() } else { None };
        let id = match recycled {
            Some(id) => id,
            None => {
                let id = self.next_handle;
                self.next_handle += 1;
                id
            }
        };
        let handle = TextureHandle(id);
        self.log.borrow_mut().uploads.push(UploadRecord {
            handle,
            width: image.width,
            height: image.height,
            desc: *desc,
        });
        Ok(handle)
    }

    fn bind_texture(&mut self, unit: u32, handle: TextureHandle) {
        self.log.borrow_mut().binds.push((unit, handle));
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        self.free_handles.push(handle.0);
        self.log.borrow_mut().destroyed.push(handle);
    }

    fn max_anisotropy(&self) -> Option<f32> {
        self.anisotropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::device::{Filter, WrapMode};

    fn upload(device: &mut HeadlessDevice) -> TextureHandle {
        let image = ImageData::solid_color(2, 2, [0, 0, 0, 255]);
        let desc = UploadDesc {
            mipmaps: false,
            mag_filter: Filter::Linear,
            min_filter: Filter::Linear,
            wrap: WrapMode::ClampToEdge,
            anisotropy: None,
        };
        device.create_texture(&image, &desc).unwrap()
    }

    #[test]
    fn test_handles_are_unique_by_default() {
        let mut device = HeadlessDevice::new();
        let a = upload(&mut device);
        device.destroy_texture(a);
        let b = upload(&mut device);
        assert_ne!(a, b);
    }

    #[test]
    fn test_recycling_reissues_destroyed_handles() {
        let mut device = HeadlessDevice::new().recycle_handles(true);
        let a = upload(&mut device);
        device.destroy_texture(a);
        let b = upload(&mut device);
        assert_eq!(a, b);
    }
}

//! Asset loading: image decoding for texture data.

pub mod image_loader;

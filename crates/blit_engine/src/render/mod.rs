//! Rendering-side resource management: the texture device interface, the
//! reference-counted texture cache, and the sprite registry.

pub mod device;
pub mod headless;
pub mod sprite;
pub mod texture_cache;

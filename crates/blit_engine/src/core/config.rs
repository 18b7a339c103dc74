//! Engine configuration
//!
//! All configuration is supplied at construction time; there are no config
//! files and nothing is persisted.

use std::path::PathBuf;
use std::time::Duration;

/// Top-level engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window configuration
    pub window: WindowConfig,

    /// Texture cache configuration
    pub textures: TextureConfig,

    /// Timing configuration
    pub timing: TimingConfig,
}

/// Window configuration.
#[derive(Debug, Clone)]
pub struct WindowConfig {
    /// Window title
    pub title: String,

    /// Requested width in pixels (ignored by the fullscreen modes)
    pub width: u32,

    /// Requested height in pixels (ignored by the fullscreen modes)
    pub height: u32,

    /// Display mode
    pub mode: WindowMode,

    /// Whether buffer swaps wait for vertical sync
    pub vsync: bool,
}

/// Window display modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    /// A normal decorated window of the requested size.
    Decorated,

    /// Exclusive fullscreen at the monitor's video mode.
    Fullscreen,

    /// Borderless window covering the whole monitor.
    Borderless,

    /// Borderless fullscreen with the logical viewport pinned to
    /// 1920x1080 regardless of the physical resolution. Game code works
    /// in 1080p coordinates; inputs arrive in physical pixels and must be
    /// scaled by `true_width / width` (see
    /// [`Viewport`](crate::runtime::state::Viewport)).
    BorderlessScaled1080,

    /// A decorated window with the 1920x1080 logical viewport, handy for
    /// single-screen debugging of games written for the scaled mode.
    DecoratedScaled1080,
}

impl WindowMode {
    /// Logical viewport size for a given physical framebuffer size.
    pub(crate) fn logical_size(self, physical: (u32, u32)) -> (f32, f32) {
        match self {
            Self::BorderlessScaled1080 | Self::DecoratedScaled1080 => (1920.0, 1080.0),
            Self::Decorated | Self::Fullscreen | Self::Borderless => {
                (physical.0 as f32, physical.1 as f32)
            }
        }
    }
}

/// Texture cache configuration.
#[derive(Debug, Clone)]
pub struct TextureConfig {
    /// Directory prepended to every texture name passed to the cache
    pub search_path: PathBuf,

    /// Maximum number of cached records; loads beyond this fail with a
    /// reported error rather than growing without bound
    pub max_cached_textures: usize,

    /// Number of texture units the bind-state cache tracks; binds to a
    /// unit at or past this limit are rejected
    pub max_texture_units: u32,
}

/// Timing configuration.
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Logical timestep for the dedicated update thread in the fully
    /// multithreaded model. The single-threaded models measure real
    /// frame deltas instead.
    pub fixed_timestep: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            textures: TextureConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Blit Engine".to_string(),
            width: 1920,
            height: 1080,
            mode: WindowMode::Decorated,
            vsync: true,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            search_path: PathBuf::new(),
            max_cached_textures: 256,
            max_texture_units: 32,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            // 60 logical ticks per second
            fixed_timestep: Duration::from_micros(16_667),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_modes_pin_logical_size() {
        let physical = (2560, 1440);
        assert_eq!(
            WindowMode::BorderlessScaled1080.logical_size(physical),
            (1920.0, 1080.0)
        );
        assert_eq!(
            WindowMode::DecoratedScaled1080.logical_size(physical),
            (1920.0, 1080.0)
        );
        assert_eq!(WindowMode::Decorated.logical_size(physical), (2560.0, 1440.0));
    }
}

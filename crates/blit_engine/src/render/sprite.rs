//! Sprite ownership registry
//!
//! Sprites are created through the engine's factory calls and owned by the
//! registry until they are individually freed or the engine tears down.
//! The registry is mutex-guarded because callback code that creates or
//! destroys sprites is not necessarily on the render thread; the texture
//! references a sprite holds are released by the caller (the draw-side
//! context), which is.

use std::sync::Mutex;

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable key for a sprite owned by the registry.
    pub struct SpriteKey;
}

/// A drawable region of a cached texture.
///
/// The engine tracks ownership only; quad geometry and per-sprite
/// transform math live in the game's renderer.
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Name of the backing texture in the cache
    pub texture: String,
    /// Left edge of the source rectangle on the sheet, in pixels
    pub sheet_x: f32,
    /// Top edge of the source rectangle on the sheet, in pixels
    pub sheet_y: f32,
    /// Source rectangle width in pixels
    pub width: f32,
    /// Source rectangle height in pixels
    pub height: f32,
    /// Rotation applied when blitting, in radians
    pub angle: f32,
}

/// Owns every sprite created through the factory calls.
///
/// Destruction of the registry's owner frees each still-registered member
/// exactly once; members freed individually are removed from the set, so
/// the bulk teardown never sees them again.
pub struct SpriteRegistry {
    sprites: Mutex<SlotMap<SpriteKey, Sprite>>,
}

impl SpriteRegistry {
    pub(crate) fn new() -> Self {
        Self {
            sprites: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Register a sprite, taking ownership.
    pub fn insert(&self, sprite: Sprite) -> SpriteKey {
        self.sprites.lock().unwrap().insert(sprite)
    }

    /// Remove and return a sprite.
    ///
    /// Removing a key that was already removed returns `None` and changes
    /// nothing.
    pub fn remove(&self, key: SpriteKey) -> Option<Sprite> {
        self.sprites.lock().unwrap().remove(key)
    }

    /// Clone of the sprite for draw code.
    pub fn get(&self, key: SpriteKey) -> Option<Sprite> {
        self.sprites.lock().unwrap().get(key).cloned()
    }

    /// Run `f` against a sprite in place, e.g. to set its angle.
    pub fn with_sprite<R>(&self, key: SpriteKey, f: impl FnOnce(&mut Sprite) -> R) -> Option<R> {
        self.sprites.lock().unwrap().get_mut(key).map(f)
    }

    /// Number of registered sprites.
    pub fn len(&self) -> usize {
        self.sprites.lock().unwrap().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sprites.lock().unwrap().is_empty()
    }

    /// Remove every sprite, in unspecified order, for engine teardown.
    pub(crate) fn drain(&self) -> Vec<Sprite> {
        let mut sprites = self.sprites.lock().unwrap();
        let drained = sprites.iter().map(|(_, sprite)| sprite.clone()).collect();
        sprites.clear();
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(texture: &str) -> Sprite {
        Sprite {
            texture: texture.to_string(),
            sheet_x: 0.0,
            sheet_y: 0.0,
            width: 16.0,
            height: 16.0,
            angle: 0.0,
        }
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = SpriteRegistry::new();
        let key = registry.insert(sprite("a.png"));

        assert!(registry.remove(key).is_some());
        assert!(registry.remove(key).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_drain_skips_individually_freed_members() {
        let registry = SpriteRegistry::new();
        let a = registry.insert(sprite("a.png"));
        let _b = registry.insert(sprite("b.png"));
        let _c = registry.insert(sprite("c.png"));

        registry.remove(a);
        let drained = registry.drain();
        assert_eq!(drained.len(), 2);
        assert!(drained.iter().all(|s| s.texture != "a.png"));

        // A second drain finds nothing.
        assert!(registry.drain().is_empty());
        assert!(registry.remove(a).is_none());
    }

    #[test]
    fn test_with_sprite_mutates_in_place() {
        let registry = SpriteRegistry::new();
        let key = registry.insert(sprite("a.png"));

        let _ = registry.with_sprite(key, |s| s.angle = 1.5);
        assert!((registry.get(key).unwrap().angle - 1.5).abs() < f32::EPSILON);
    }
}

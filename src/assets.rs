//! Sprite asset loading
//!
//! The core only needs one image: the ship sprite, from which every bit of
//! ship geometry is derived. Where it comes from is behind `ImageProvider`.
//! Whether its absence is fatal is an explicit `AssetPolicy`.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::GameError;
use crate::sim::Sprite;

/// Asset name of the ship sprite
pub const SHIP_SPRITE: &str = "ship";

/// Supplies decoded sprites by name
pub trait ImageProvider {
    /// `Ok(None)` when the asset simply is not there
    fn load(&self, name: &str) -> Result<Option<Sprite>, GameError>;
}

/// What to do when the ship sprite is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetPolicy {
    /// Missing ship sprite is a startup error
    Strict,
    /// Substitute the built-in placeholder ship
    #[default]
    Tolerant,
}

/// Searches directories in order for `<name>.json` sprite files
#[derive(Debug, Clone)]
pub struct DirImageProvider {
    dirs: Vec<PathBuf>,
}

impl Default for DirImageProvider {
    fn default() -> Self {
        Self::new(vec![PathBuf::from("."), PathBuf::from("./assets")])
    }
}

impl DirImageProvider {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }
}

impl ImageProvider for DirImageProvider {
    fn load(&self, name: &str) -> Result<Option<Sprite>, GameError> {
        let file = format!("{name}.json");
        let Some(path) = self.dirs.iter().map(|d| d.join(&file)).find(|p| p.exists()) else {
            return Ok(None);
        };

        let json = std::fs::read_to_string(&path)?;
        let sprite: Sprite =
            serde_json::from_str(&json).map_err(|e| GameError::AssetFormat {
                name: path.display().to_string(),
                reason: e.to_string(),
            })?;
        log::info!(
            "Loaded sprite {} ({}x{})",
            path.display(),
            sprite.width,
            sprite.height
        );
        Ok(Some(sprite))
    }
}

/// In-memory provider, for embedding sprites or injecting them in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryImageProvider {
    sprites: HashMap<String, Sprite>,
}

impl MemoryImageProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, sprite: Sprite) -> Self {
        self.sprites.insert(name.to_string(), sprite);
        self
    }
}

impl ImageProvider for MemoryImageProvider {
    fn load(&self, name: &str) -> Result<Option<Sprite>, GameError> {
        Ok(self.sprites.get(name).cloned())
    }
}

/// Fetch the ship sprite, validate it and scale it to `width` x `height`.
///
/// Under `Tolerant`, absence falls back to the placeholder ship with a
/// warning. A sprite that exists but is malformed is always an error.
pub fn load_ship_sprite(
    provider: &dyn ImageProvider,
    policy: AssetPolicy,
    width: u32,
    height: u32,
) -> Result<Sprite, GameError> {
    match provider.load(SHIP_SPRITE)? {
        Some(sprite) => {
            sprite.check().map_err(|reason| GameError::AssetFormat {
                name: SHIP_SPRITE.to_string(),
                reason,
            })?;
            Ok(sprite.scaled(width, height))
        }
        None => match policy {
            AssetPolicy::Strict => Err(GameError::MissingAsset {
                name: SHIP_SPRITE.to_string(),
            }),
            AssetPolicy::Tolerant => {
                log::warn!("Ship sprite not found, using placeholder geometry");
                Ok(Sprite::placeholder_ship(width, height))
            }
        },
    }
}

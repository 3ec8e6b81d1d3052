//! Error taxonomy for startup and asset loading
//!
//! Every failure in the core is fatal at startup. Per-frame degenerate
//! geometry is skipped, never reported through here.

use std::fmt;

#[derive(Debug)]
pub enum GameError {
    /// Ship sprite not found while loading in strict mode
    MissingAsset { name: String },
    /// Sprite file exists but cannot be turned into a raster
    AssetFormat { name: String, reason: String },
    /// Tunables rejected by `GameConfig::validate`
    InvalidConfig(String),
    /// Config file parse failure
    ConfigFormat(serde_json::Error),
    Io(std::io::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAsset { name } => write!(f, "required asset not found: {name}"),
            Self::AssetFormat { name, reason } => {
                write!(f, "malformed asset {name}: {reason}")
            }
            Self::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            Self::ConfigFormat(e) => write!(f, "config parse error: {e}"),
            Self::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigFormat(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GameError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigFormat(e)
    }
}

//! Game configuration and map file loading.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glam::Vec2;
use serde::Deserialize;
use upside_home_core::{MapData, TileGrid};
use upside_home_world::{LevelMap, SessionConfig};

/// Contents of the TOML configuration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct GameConfig {
    /// Labyrinths in play order.
    pub(crate) levels: Vec<LevelEntry>,
    /// Session tuning, defaulting to the stock game.
    #[serde(default)]
    pub(crate) session: SessionConfig,
    /// Size of the simulated screen.
    #[serde(default)]
    pub(crate) viewport: ViewportConfig,
}

/// One `[[levels]]` table.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LevelEntry {
    /// JSON map file, relative to the configuration file.
    pub(crate) map: PathBuf,
    /// Whether visibility is restricted to an aura around the player.
    #[serde(default)]
    pub(crate) aura: bool,
}

/// Viewport dimensions in world units.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ViewportConfig {
    pub(crate) width: f32,
    pub(crate) height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 540.0,
        }
    }
}

impl ViewportConfig {
    pub(crate) fn extent(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl GameConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        if config.viewport.width <= 0.0 || config.viewport.height <= 0.0 {
            anyhow::bail!(
                "viewport must be positive (got {}x{})",
                config.viewport.width,
                config.viewport.height
            );
        }
        Ok(config)
    }

    /// Loads every configured map, resolving paths against `base`.
    pub(crate) fn load_levels(&self, base: &Path) -> Result<Vec<LevelMap>> {
        self.levels
            .iter()
            .map(|entry| {
                let grid = load_map(&base.join(&entry.map))?;
                Ok(LevelMap::new(grid, entry.aura))
            })
            .collect()
    }
}

/// Reads a JSON map file and validates it into a grid.
pub(crate) fn load_map(path: &Path) -> Result<TileGrid> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read map file {}", path.display()))?;
    let data: MapData = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse map file {}", path.display()))?;
    TileGrid::try_from(data).with_context(|| format!("invalid map in {}", path.display()))
}

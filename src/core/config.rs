//! Engine configuration with documented defaults
//!
//! Values come from a TOML file and/or command line flags. The config is
//! owned by the [`Engine`](crate::game::Engine) context; there is no global copy.

use std::path::{Path, PathBuf};

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};

/// Size of the camera window in unscaled pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(267, 150)
    }
}

/// Configuration for the engine loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Verbose logging of atlas placement, graph sizes, trigger firing and paths.
    pub debug: bool,

    /// Render frames per model update.
    ///
    /// The model (input, triggers, units, animation) advances once every
    /// `frames_per_update` rendered frames. At 60 rendered frames per second
    /// and the default of 3, the model runs at 20 ticks per second.
    pub frames_per_update: u32,

    /// Camera window size in unscaled pixels.
    pub viewport: Viewport,

    /// Screen pixels per game pixel.
    pub pixel_size: u32,

    /// Window title handed to the host.
    pub title: String,

    /// Width and height of the shared texture atlas.
    pub atlas_size: [i32; 2],

    /// Preview the whole level: triggers are disabled and the view covers the map.
    pub level_preview: bool,

    /// Write the generated obstacle/path graphs here after loading.
    pub dump_graphs: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debug: false,
            frames_per_update: 3,
            viewport: Viewport::default(),
            pixel_size: 3,
            title: "Mosaic".into(),
            atlas_size: [1024, 1024],
            level_preview: false,
            dump_graphs: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn atlas_size(&self) -> IVec2 {
        IVec2::new(self.atlas_size[0], self.atlas_size[1])
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.frames_per_update == 0 {
            return Err(EngineError::Config(
                "frames_per_update must be at least 1".into(),
            ));
        }
        if self.viewport.width <= 0 || self.viewport.height <= 0 {
            return Err(EngineError::Config(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if self.pixel_size == 0 {
            return Err(EngineError::Config("pixel_size must be at least 1".into()));
        }
        if self.atlas_size[0] <= 0 || self.atlas_size[1] <= 0 {
            return Err(EngineError::Config(format!(
                "atlas_size must be positive, got {:?}",
                self.atlas_size
            )));
        }
        Ok(())
    }
}

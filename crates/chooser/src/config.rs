use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{Argb, Error, Result};

/// Tunables for the chooser, loadable from JSON.
///
/// Missing fields fall back to [`ChooserConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChooserConfig {
    /// The color selected before any input arrives.
    pub initial_color: Argb,
    /// The color behind translucent previews; checkerboard squares contrast with it.
    pub background_color: Argb,
    /// Checkerboard period in pixels. Each square is half of it.
    pub checkerboard_grid_size: f32,
    /// Margin around opacity ramp and swatch, as a fraction of the view size.
    pub background_portion: f32,
    pub marker_radius: f32,
    pub marker_stroke_width: f32,
    /// Block size of the coarsest gradient preview. Must be a power of two.
    pub gradient_start_resolution: u32,
}

impl Default for ChooserConfig {
    fn default() -> Self {
        Self {
            initial_color: Argb(0xff80_8080),
            background_color: Argb::WHITE,
            checkerboard_grid_size: 15.0,
            background_portion: 0.1,
            marker_radius: 20.0,
            marker_stroke_width: 2.0,
            gradient_start_resolution: 64,
        }
    }
}

impl ChooserConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        tracing::debug!("loaded chooser config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        positive("checkerboard_grid_size", self.checkerboard_grid_size)?;
        positive("marker_radius", self.marker_radius)?;
        positive("marker_stroke_width", self.marker_stroke_width)?;

        if !(0.0..0.5).contains(&self.background_portion) {
            return Err(Error::InvalidConfig {
                field: "background_portion",
                reason: format!("{} is outside [0, 0.5)", self.background_portion),
            });
        }

        if !self.gradient_start_resolution.is_power_of_two() {
            return Err(Error::InvalidConfig {
                field: "gradient_start_resolution",
                reason: format!("{} is not a power of two", self.gradient_start_resolution),
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            field,
            reason: format!("{value} must be a positive number"),
        })
    }
}

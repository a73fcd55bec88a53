use tiny_skia::Pixmap;

use crate::checkerboard::{self, CheckerboardKey, CheckerboardOutput};
use crate::geometry::Geometry;
use crate::raster::{self, Bitmap};
use crate::task::CancelToken;
use crate::{Argb, Result};

/// The selected color, alpha included, filled over a checkerboard.
#[derive(Clone, Debug)]
pub struct SwatchGenerator {
    pub geometry: Geometry,
    pub color: Argb,
    pub reference: Argb,
    pub grid_size: f32,
    pub checkerboard: Option<Bitmap>,
}

impl SwatchGenerator {
    pub fn key(&self) -> CheckerboardKey {
        CheckerboardKey {
            width: self.geometry.width,
            height: self.geometry.height,
            reference: self.reference,
        }
    }

    pub fn render(&self, token: &CancelToken) -> Result<Option<(Pixmap, CheckerboardOutput)>> {
        let Some(background) =
            checkerboard::resolve(self.checkerboard.clone(), self.key(), self.grid_size, token)?
        else {
            return Ok(None);
        };
        if token.is_cancelled() {
            return Ok(None);
        }

        let mut pixmap = (*background.bitmap).clone();
        let region = self
            .geometry
            .region
            .clamp_to(self.geometry.width, self.geometry.height);
        if region.is_empty() {
            return Ok(Some((pixmap, background)));
        }
        raster::blend_rect(
            &mut pixmap,
            region.left as f32,
            region.top as f32,
            region.right as f32,
            region.bottom as f32,
            self.color,
        );

        Ok(Some((pixmap, background)))
    }
}

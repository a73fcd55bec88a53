use tiny_skia::Pixmap;

use crate::checkerboard::{self, CheckerboardKey, CheckerboardOutput};
use crate::geometry::Geometry;
use crate::raster::{self, Bitmap};
use crate::task::CancelToken;
use crate::{Argb, Result};

/// The alpha ramp behind the opacity slider, drawn over a checkerboard.
#[derive(Clone, Debug)]
pub struct OpacityTrackGenerator {
    pub geometry: Geometry,
    /// The selected color; its alpha is ignored.
    pub color: Argb,
    pub reference: Argb,
    pub grid_size: f32,
    /// The cached checkerboard at launch time, if it matched.
    pub checkerboard: Option<Bitmap>,
}

impl OpacityTrackGenerator {
    pub fn key(&self) -> CheckerboardKey {
        CheckerboardKey {
            width: self.geometry.width,
            height: self.geometry.height,
            reference: self.reference,
        }
    }

    /// Alpha goes 0..=255 along the region's long axis, bottom-up on vertical tracks.
    pub fn render(&self, token: &CancelToken) -> Result<Option<(Pixmap, CheckerboardOutput)>> {
        let Some(background) =
            checkerboard::resolve(self.checkerboard.clone(), self.key(), self.grid_size, token)?
        else {
            return Ok(None);
        };

        let mut pixmap = (*background.bitmap).clone();
        let region = self
            .geometry
            .region
            .clamp_to(self.geometry.width, self.geometry.height);
        if region.is_empty() {
            return Ok(Some((pixmap, background)));
        }

        let vertical = self.geometry.orientation.is_vertical();
        let extent = if vertical {
            region.height()
        } else {
            region.width()
        };
        let (left, top) = (region.left as f32, region.top as f32);
        let (right, bottom) = (region.right as f32, region.bottom as f32);

        for step in 0..extent {
            if token.is_cancelled() {
                return Ok(None);
            }
            let alpha = ramp_alpha(step, extent);
            let color = self.color.with_alpha(alpha);
            if vertical {
                let y = bottom - 1.0 - step as f32;
                raster::blend_rect(&mut pixmap, left, y, right, y + 1.0, color);
            } else {
                let x = left + step as f32;
                raster::blend_rect(&mut pixmap, x, top, x + 1.0, bottom, color);
            }
        }

        Ok(Some((pixmap, background)))
    }
}

fn ramp_alpha(step: i32, extent: i32) -> u8 {
    if extent <= 1 {
        return 255;
    }
    (step as i64 * 255 / (extent as i64 - 1)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{DrawingRegion, Orientation};
    use crate::raster::argb_at;

    fn generator(orientation: Orientation) -> OpacityTrackGenerator {
        let geometry = match orientation {
            Orientation::Horizontal => Geometry::new(120, 20, DrawingRegion::new(10, 2, 110, 18)),
            Orientation::Vertical => Geometry::new(20, 120, DrawingRegion::new(2, 10, 18, 110)),
        };
        OpacityTrackGenerator {
            geometry: geometry.orientation(orientation),
            color: Argb(0x00ff_0000),
            reference: Argb::WHITE,
            grid_size: 8.0,
            checkerboard: None,
        }
    }

    #[test]
    fn test_ramp_alpha() {
        assert_eq!(ramp_alpha(0, 100), 0);
        assert_eq!(ramp_alpha(99, 100), 255);
        assert_eq!(ramp_alpha(0, 1), 255);
    }

    #[test]
    fn test_horizontal_ramp() {
        let track = generator(Orientation::Horizontal);
        let (pixmap, background) = track.render(&CancelToken::new()).unwrap().unwrap();
        assert!(background.rebuilt);

        // Transparent start shows the checkerboard, opaque end shows the color.
        assert_eq!(argb_at(&pixmap, 10, 5), argb_at(&background.bitmap, 10, 5));
        assert_eq!(argb_at(&pixmap, 109, 5), Some(Argb(0xffff_0000)));
        // Outside the region the checkerboard is untouched.
        assert_eq!(argb_at(&pixmap, 115, 1), argb_at(&background.bitmap, 115, 1));
    }

    #[test]
    fn test_vertical_ramp_runs_bottom_up() {
        let track = generator(Orientation::Vertical);
        let (pixmap, background) = track.render(&CancelToken::new()).unwrap().unwrap();
        assert_eq!(argb_at(&pixmap, 5, 109), argb_at(&background.bitmap, 5, 109));
        assert_eq!(argb_at(&pixmap, 5, 10), Some(Argb(0xffff_0000)));
    }

    #[test]
    fn test_reuses_snapshot() {
        let first = generator(Orientation::Horizontal);
        let (_, background) = first.render(&CancelToken::new()).unwrap().unwrap();

        let second = OpacityTrackGenerator {
            checkerboard: Some(background.bitmap.clone()),
            ..generator(Orientation::Horizontal)
        };
        let (_, reused) = second.render(&CancelToken::new()).unwrap().unwrap();
        assert!(!reused.rebuilt);
        assert_eq!(reused.bitmap.data(), background.bitmap.data());
    }
}

use tiny_skia::Pixmap;

use crate::color::Hsv;
use crate::geometry::Geometry;
use crate::raster;
use crate::task::CancelToken;
use crate::Result;

/// The hue spectrum behind the hue slider. Depends only on geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HueTrackGenerator {
    pub geometry: Geometry,
}

impl HueTrackGenerator {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry }
    }

    /// Hue runs 0..360 along the long axis of the drawing region, one pixel line per step.
    /// Each line spans the whole view across the track. Vertical tracks start at the
    /// bottom edge.
    pub fn render(&self, token: &CancelToken) -> Result<Option<Pixmap>> {
        let Geometry {
            width,
            height,
            region,
            orientation,
        } = self.geometry;
        let mut pixmap = raster::pixmap(width, height)?;
        let region = region.clamp_to(width, height);
        if region.is_empty() {
            return Ok(Some(pixmap));
        }

        let vertical = orientation.is_vertical();
        let extent = if vertical {
            region.height()
        } else {
            region.width()
        };

        let pixels = pixmap.pixels_mut();
        for step in 0..extent {
            if token.is_cancelled() {
                return Ok(None);
            }

            let hue = step as f32 * 360.0 / extent as f32;
            let [r, g, b] = Hsv::new(hue, 1.0, 1.0).to_rgb();
            let pixel = raster::opaque_pixel(r, g, b);

            if vertical {
                let y = (region.bottom - 1 - step) as u32;
                let start = (y * width) as usize;
                pixels[start..start + width as usize].fill(pixel);
            } else {
                let x = (region.left + step) as u32;
                for y in 0..height {
                    pixels[(y * width + x) as usize] = pixel;
                }
            }
        }

        Ok(Some(pixmap))
    }
}

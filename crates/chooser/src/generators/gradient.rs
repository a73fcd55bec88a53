use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::color::Hsv;
use crate::raster::{self, Bitmap};
use crate::task::CancelToken;
use crate::Result;

/// The saturation/value square for one hue, refined from coarse blocks down to pixels.
///
/// Saturation grows left to right and value top to bottom, both from 0 to 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientGenerator {
    pub hue: f32,
    pub width: u32,
    pub height: u32,
    /// Block size of the first preview, a power of two.
    pub start_resolution: u32,
}

impl GradientGenerator {
    /// Block sizes of the coarse previews, largest first. Empty when the start is 1.
    pub fn stages(&self) -> impl Iterator<Item = u32> {
        std::iter::successors(Some(self.start_resolution.max(1)), |size| Some(size / 2))
            .take_while(|size| *size > 1)
    }

    /// Run every stage. `publish` receives each coarse preview with its block size before
    /// the next stage starts. Returns the exact per-pixel gradient, or `None` if the token
    /// was cancelled first.
    pub fn render(
        &self,
        token: &CancelToken,
        mut publish: impl FnMut(Bitmap, u32),
    ) -> Result<Option<Pixmap>> {
        let mut pixmap = raster::pixmap(self.width, self.height)?;

        for block_size in self.stages() {
            if !self.paint_blocks(&mut pixmap, block_size, token) {
                return Ok(None);
            }
            publish(Arc::new(pixmap.clone()), block_size);
        }

        if !self.paint_exact(&mut pixmap, token) {
            return Ok(None);
        }
        Ok(Some(pixmap))
    }

    fn paint_blocks(&self, pixmap: &mut Pixmap, block_size: u32, token: &CancelToken) -> bool {
        let (width, height) = (self.width as f32, self.height as f32);
        for y in (0..self.height).step_by(block_size as usize) {
            if token.is_cancelled() {
                return false;
            }
            let value = y as f32 / height;
            for x in (0..self.width).step_by(block_size as usize) {
                let [r, g, b] = Hsv::new(self.hue, x as f32 / width, value).to_rgb();
                raster::fill_block(pixmap, x, y, block_size, raster::opaque_pixel(r, g, b));
            }
        }
        true
    }

    fn paint_exact(&self, pixmap: &mut Pixmap, token: &CancelToken) -> bool {
        let (width, height) = (self.width as f32, self.height as f32);
        let pixels = pixmap.pixels_mut();
        for y in 0..self.height {
            if token.is_cancelled() {
                return false;
            }
            let value = y as f32 / height;
            for x in 0..self.width {
                let [r, g, b] = Hsv::new(self.hue, x as f32 / width, value).to_rgb();
                pixels[(y * self.width + x) as usize] = raster::opaque_pixel(r, g, b);
            }
        }
        true
    }
}

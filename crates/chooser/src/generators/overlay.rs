use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::color::Hsv;
use crate::raster::Bitmap;
use crate::task::CancelToken;
use crate::Result;

/// The selection marker, stroked over a copy of a final gradient.
#[derive(Clone, Debug)]
pub struct OverlayGenerator {
    pub gradient: Bitmap,
    pub hsv: Hsv,
    pub radius: f32,
    pub stroke_width: f32,
}

impl OverlayGenerator {
    /// Marker center in gradient pixels.
    pub fn center(&self) -> (f32, f32) {
        (
            self.hsv.s * self.gradient.width() as f32,
            self.hsv.v * self.gradient.height() as f32,
        )
    }

    pub fn render(&self, token: &CancelToken) -> Result<Option<Pixmap>> {
        if token.is_cancelled() {
            return Ok(None);
        }

        let mut pixmap = (*self.gradient).clone();
        let (cx, cy) = self.center();
        let Some(path) = PathBuilder::from_circle(cx, cy, self.radius) else {
            return Ok(Some(pixmap));
        };

        let mark = self.hsv.to_argb(255).contrast();
        let mut paint = Paint::default();
        paint.set_color(mark.to_skia());
        paint.anti_alias = true;
        let stroke = Stroke {
            width: self.stroke_width,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);

        Ok(Some(pixmap))
    }
}

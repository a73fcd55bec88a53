use std::sync::Arc;

use tiny_skia::{Paint, Pixmap, PremultipliedColorU8, Transform};

use crate::{Argb, Error, Result};

/// A finished raster, shared between workers, caches and the presentation layer.
pub type Bitmap = Arc<Pixmap>;

/// A transparent `width` x `height` pixmap.
pub fn pixmap(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height).ok_or(Error::EmptyGeometry { width, height })
}

/// Premultiplied pixel for an opaque color.
#[inline]
pub(crate) fn opaque_pixel(r: u8, g: u8, b: u8) -> PremultipliedColorU8 {
    PremultipliedColorU8::from_rgba(r, g, b, 255).unwrap_or(PremultipliedColorU8::TRANSPARENT)
}

/// Overwrite a `size` x `size` block (clipped to the pixmap) with an opaque pixel.
pub(crate) fn fill_block(pixmap: &mut Pixmap, x: u32, y: u32, size: u32, pixel: PremultipliedColorU8) {
    let (width, height) = (pixmap.width(), pixmap.height());
    let x_end = (x + size).min(width);
    let y_end = (y + size).min(height);
    let pixels = pixmap.pixels_mut();
    for row in y..y_end {
        let start = (row * width) as usize;
        pixels[start + x as usize..start + x_end as usize].fill(pixel);
    }
}

/// Source-over fill of a rectangle in pixel coordinates. Empty rectangles are ignored.
pub(crate) fn blend_rect(pixmap: &mut Pixmap, left: f32, top: f32, right: f32, bottom: f32, color: Argb) {
    if left >= right || top >= bottom {
        return;
    }
    let Some(rect) = tiny_skia::Rect::from_ltrb(left, top, right, bottom) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color(color.to_skia());
    paint.anti_alias = false;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
}

/// The straight-alpha color of one pixel, if it lies inside the pixmap.
pub fn argb_at(pixmap: &Pixmap, x: u32, y: u32) -> Option<Argb> {
    let color = pixmap.pixel(x, y)?.demultiply();
    Some(Argb::from_components(
        color.alpha(),
        color.red(),
        color.green(),
        color.blue(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pixmap() {
        assert!(matches!(
            pixmap(0, 10),
            Err(Error::EmptyGeometry {
                width: 0,
                height: 10
            })
        ));
    }

    #[test]
    fn test_fill_block_clips() {
        let mut pm = pixmap(5, 5).unwrap();
        fill_block(&mut pm, 3, 3, 4, opaque_pixel(255, 0, 0));
        assert_eq!(argb_at(&pm, 4, 4), Some(Argb(0xffff_0000)));
        assert_eq!(argb_at(&pm, 3, 3), Some(Argb(0xffff_0000)));
        assert_eq!(argb_at(&pm, 2, 2), Some(Argb(0)));
        assert_eq!(argb_at(&pm, 5, 5), None);
    }

    #[test]
    fn test_blend_rect() {
        let mut pm = pixmap(4, 4).unwrap();
        pm.fill(Argb::WHITE.to_skia());
        blend_rect(&mut pm, 0.0, 0.0, 2.0, 4.0, Argb(0xff00_00ff));
        assert_eq!(argb_at(&pm, 1, 3), Some(Argb(0xff00_00ff)));
        assert_eq!(argb_at(&pm, 2, 3), Some(Argb::WHITE));

        // Transparent paint leaves the background alone.
        blend_rect(&mut pm, 2.0, 0.0, 4.0, 4.0, Argb(0x0000_00ff));
        assert_eq!(argb_at(&pm, 3, 0), Some(Argb::WHITE));

        // Degenerate rectangles are a no-op.
        blend_rect(&mut pm, 3.0, 0.0, 3.0, 4.0, Argb::BLACK);
        blend_rect(&mut pm, 0.0, 2.0, 4.0, 2.0, Argb::BLACK);
        blend_rect(&mut pm, 3.0, 4.0, 2.0, 0.0, Argb::BLACK);
        for (x, y) in [(2, 0), (3, 0), (3, 3), (2, 2), (3, 2)] {
            assert_eq!(argb_at(&pm, x, y), Some(Argb::WHITE), "({x}, {y})");
        }
    }
}

use serde::{Deserialize, Serialize};

/// The long axis of a track.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "horizontal")]
    Horizontal,
    #[serde(rename = "vertical")]
    Vertical,
}

impl Orientation {
    #[inline]
    pub fn is_vertical(&self) -> bool {
        matches!(self, Orientation::Vertical)
    }
}

/// An axis-aligned rectangle in bitmap pixels, `right` and `bottom` exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DrawingRegion {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl DrawingRegion {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The whole `width` x `height` bitmap.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    /// The ramp area of a track: inset by the thumb offset along the long axis and by
    /// `portion` of the short side across it.
    pub fn for_track(
        width: u32,
        height: u32,
        thumb_offset: u32,
        orientation: Orientation,
        portion: f32,
    ) -> Self {
        let (width, height, thumb) = (width as i32, height as i32, thumb_offset as i32);
        let portion = portion as f64;
        match orientation {
            Orientation::Vertical => Self::new(
                scale(width, portion),
                thumb,
                scale(width, 1.0 - portion),
                height - thumb,
            ),
            Orientation::Horizontal => Self::new(
                thumb,
                scale(height, portion),
                width - thumb,
                scale(height, 1.0 - portion),
            ),
        }
    }

    /// The fill area of a swatch: inset by `portion` on every side.
    pub fn for_swatch(width: u32, height: u32, portion: f32) -> Self {
        let portion = portion as f64;
        let (width, height) = (width as i32, height as i32);
        Self::new(
            scale(width, portion),
            scale(height, portion),
            scale(width, 1.0 - portion),
            scale(height, 1.0 - portion),
        )
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Intersect with a `width` x `height` bitmap.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        Self::new(
            self.left.clamp(0, width as i32),
            self.top.clamp(0, height as i32),
            self.right.clamp(0, width as i32),
            self.bottom.clamp(0, height as i32),
        )
    }
}

fn scale(length: i32, fraction: f64) -> i32 {
    (length as f64 * fraction).round() as i32
}

/// The on-screen size of a view plus the region its foreground is drawn in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub region: DrawingRegion,
    pub orientation: Orientation,
}

impl Geometry {
    pub fn new(width: u32, height: u32, region: DrawingRegion) -> Self {
        Self {
            width,
            height,
            region,
            orientation: Orientation::Horizontal,
        }
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_region() {
        let region = DrawingRegion::for_track(200, 40, 8, Orientation::Horizontal, 0.1);
        assert_eq!(region, DrawingRegion::new(8, 4, 192, 36));
        assert_eq!(region.width(), 184);
        assert_eq!(region.height(), 32);

        let region = DrawingRegion::for_track(40, 200, 8, Orientation::Vertical, 0.1);
        assert_eq!(region, DrawingRegion::new(4, 8, 36, 192));
    }

    #[test]
    fn test_swatch_region() {
        let region = DrawingRegion::for_swatch(100, 50, 0.1);
        assert_eq!(region, DrawingRegion::new(10, 5, 90, 45));
        assert!(!region.is_empty());
        assert!(DrawingRegion::new(5, 5, 5, 10).is_empty());
    }

    #[test]
    fn test_clamp_to() {
        let region = DrawingRegion::new(-5, 2, 120, 80).clamp_to(100, 50);
        assert_eq!(region, DrawingRegion::new(0, 2, 100, 50));
    }

    #[test]
    fn test_orientation_serde() {
        assert_eq!(
            serde_json::to_string(&Orientation::Vertical).unwrap(),
            r#""vertical""#
        );
        assert_eq!(
            serde_json::from_str::<Orientation>(r#""horizontal""#).unwrap(),
            Orientation::Horizontal
        );
    }
}

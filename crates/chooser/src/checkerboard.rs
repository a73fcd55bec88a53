use std::sync::Arc;

use tiny_skia::Pixmap;

use crate::artifact::Artifact;
use crate::raster::{self, Bitmap};
use crate::task::CancelToken;
use crate::{Argb, Result};

/// What a checkerboard was built for. Equal keys produce bit-identical bitmaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CheckerboardKey {
    pub width: u32,
    pub height: u32,
    pub reference: Argb,
}

/// The checkerboard a worker drew on, reported back so the apply context can cache it.
#[derive(Clone, Debug)]
pub struct CheckerboardOutput {
    pub key: CheckerboardKey,
    pub bitmap: Bitmap,
    /// True when the worker had no cached copy and drew this one itself.
    pub rebuilt: bool,
}

/// Resolve the checkerboard for `key`: reuse the launch-time snapshot if there is one,
/// otherwise draw a new one. `None` means the token was cancelled mid-build.
pub(crate) fn resolve(
    snapshot: Option<Bitmap>,
    key: CheckerboardKey,
    grid_size: f32,
    token: &CancelToken,
) -> Result<Option<CheckerboardOutput>> {
    if let Some(bitmap) = snapshot {
        return Ok(Some(CheckerboardOutput {
            key,
            bitmap,
            rebuilt: false,
        }));
    }

    Ok(build(key, grid_size, token)?.map(|pixmap| CheckerboardOutput {
        key,
        bitmap: Arc::new(pixmap),
        rebuilt: true,
    }))
}

/// Tile squares of half the grid size over an opaque fill of the reference color.
/// Squares on even `row + col` take the reference's contrast color.
pub fn build(key: CheckerboardKey, grid_size: f32, token: &CancelToken) -> Result<Option<Pixmap>> {
    let mut pixmap = raster::pixmap(key.width, key.height)?;
    let base = key.reference.with_alpha(255);
    let mark = base.contrast();
    let base_pixel = raster::opaque_pixel(base.red(), base.green(), base.blue());
    let mark_pixel = raster::opaque_pixel(mark.red(), mark.green(), mark.blue());
    let cell = (grid_size / 2.0).max(1.0);

    let width = key.width;
    let pixels = pixmap.pixels_mut();
    for y in 0..key.height {
        if token.is_cancelled() {
            return Ok(None);
        }
        let row = (y as f32 / cell) as u32;
        for x in 0..width {
            let col = (x as f32 / cell) as u32;
            pixels[(y * width + x) as usize] = if (row + col) % 2 == 0 {
                mark_pixel
            } else {
                base_pixel
            };
        }
    }

    Ok(Some(pixmap))
}

/// One checkerboard per artifact kind, written only from the apply context.
#[derive(Debug, Default)]
pub struct CheckerboardCache {
    opacity_track: Option<(CheckerboardKey, Bitmap)>,
    swatch: Option<(CheckerboardKey, Bitmap)>,
    rebuilds: usize,
}

impl CheckerboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, artifact: Artifact) -> Option<&Option<(CheckerboardKey, Bitmap)>> {
        match artifact {
            Artifact::OpacityTrack => Some(&self.opacity_track),
            Artifact::Swatch => Some(&self.swatch),
            _ => None,
        }
    }

    fn entry_mut(&mut self, artifact: Artifact) -> Option<&mut Option<(CheckerboardKey, Bitmap)>> {
        match artifact {
            Artifact::OpacityTrack => Some(&mut self.opacity_track),
            Artifact::Swatch => Some(&mut self.swatch),
            _ => None,
        }
    }

    /// The cached bitmap for `artifact`, if it was built for exactly `key`.
    pub fn lookup(&self, artifact: Artifact, key: &CheckerboardKey) -> Option<Bitmap> {
        match self.entry(artifact)? {
            Some((cached, bitmap)) if cached == key => Some(bitmap.clone()),
            _ => None,
        }
    }

    /// Record the checkerboard a finished worker used. Replaces any entry wholesale.
    pub fn store(&mut self, artifact: Artifact, output: &CheckerboardOutput) {
        let Some(entry) = self.entry_mut(artifact) else {
            tracing::warn!("{artifact} has no checkerboard");
            return;
        };
        *entry = Some((output.key, output.bitmap.clone()));
        if output.rebuilt {
            self.rebuilds += 1;
        }
    }

    pub fn invalidate(&mut self) {
        self.opacity_track = None;
        self.swatch = None;
    }

    /// How many freshly built checkerboards have been stored.
    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }
}

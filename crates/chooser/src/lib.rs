//! Background rendering for an HSV color chooser.
//!
//! A [`Coordinator`] owns the selected color and keeps five rendered artifacts in step
//! with it: the hue track, the saturation/value gradient with its selection marker, the
//! opacity ramp and the result swatch. Renders run on worker threads through a
//! [`Spawner`] and are applied back through a [`Presenter`].

mod artifact;
mod checkerboard;
mod color;
mod config;
mod coordinator;
mod error;
mod event;
pub mod generators;
mod geometry;
pub mod input;
mod presenter;
pub mod raster;
mod state;
mod task;

pub use artifact::{Artifact, ArtifactSet, View};
pub use checkerboard::{CheckerboardCache, CheckerboardKey, CheckerboardOutput};
pub use color::{Argb, Hsv, normalize_hue};
pub use config::ChooserConfig;
pub use coordinator::Coordinator;
pub use error::{Error, Result};
pub use event::{EventSender, RenderEvent, RenderResult, Stage};
pub use geometry::{DrawingRegion, Geometry, Orientation};
pub use presenter::Presenter;
pub use raster::Bitmap;
pub use state::ColorState;
pub use task::{CancelToken, Job, PoolSpawner, Spawner, TaskHandle, TaskId, TaskState};

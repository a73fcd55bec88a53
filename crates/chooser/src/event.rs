use smol::channel::{Receiver, Sender};

use crate::artifact::Artifact;
use crate::checkerboard::CheckerboardOutput;
use crate::generators::RenderJob;
use crate::raster::Bitmap;
use crate::task::TaskId;

/// Whether a bitmap is a coarse preview or the finished artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// A coarse preview drawn with square blocks of this many pixels.
    Intermediate { block_size: u32 },
    Final,
}

impl Stage {
    pub fn is_final(self) -> bool {
        matches!(self, Stage::Final)
    }
}

/// A bitmap produced by a worker, tagged with the task that produced it and the
/// parameters it was launched with.
#[derive(Clone, Debug)]
pub struct RenderResult {
    pub task: TaskId,
    pub job: RenderJob,
    pub bitmap: Bitmap,
    pub stage: Stage,
}

impl RenderResult {
    pub fn new(task: TaskId, job: RenderJob, bitmap: Bitmap, stage: Stage) -> Self {
        Self {
            task,
            job,
            bitmap,
            stage,
        }
    }
}

/// Messages from workers to the apply loop.
///
/// Each task posts any number of `GradientProgress` messages, then exactly one terminal
/// message: its `*Done` variant, or `Cancelled` if it saw its flag and stopped early.
#[derive(Clone, Debug)]
pub enum RenderEvent {
    HueTrackDone(RenderResult),
    GradientProgress(RenderResult),
    GradientDone(RenderResult),
    OverlayDone(RenderResult),
    OpacityTrackDone(RenderResult, CheckerboardOutput),
    SwatchDone(RenderResult, CheckerboardOutput),
    Cancelled { task: TaskId, artifact: Artifact },
}

impl RenderEvent {
    pub fn task(&self) -> TaskId {
        match self {
            RenderEvent::HueTrackDone(result)
            | RenderEvent::GradientProgress(result)
            | RenderEvent::GradientDone(result)
            | RenderEvent::OverlayDone(result)
            | RenderEvent::OpacityTrackDone(result, _)
            | RenderEvent::SwatchDone(result, _) => result.task,
            RenderEvent::Cancelled { task, .. } => *task,
        }
    }

    pub fn artifact(&self) -> Artifact {
        match self {
            RenderEvent::HueTrackDone(_) => Artifact::HueTrack,
            RenderEvent::GradientProgress(_) | RenderEvent::GradientDone(_) => Artifact::Gradient,
            RenderEvent::OverlayDone(_) => Artifact::Overlay,
            RenderEvent::OpacityTrackDone(..) => Artifact::OpacityTrack,
            RenderEvent::SwatchDone(..) => Artifact::Swatch,
            RenderEvent::Cancelled { artifact, .. } => *artifact,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RenderEvent::GradientProgress(_))
    }
}

/// The worker side of the event channel.
#[derive(Clone, Debug)]
pub struct EventSender(Sender<RenderEvent>);

impl EventSender {
    /// Post an event. A closed channel means the coordinator is gone; the event is dropped.
    pub fn post(&self, event: RenderEvent) {
        if let Err(err) = self.0.try_send(event) {
            let event = err.into_inner();
            tracing::trace!(
                "dropping {} event for {}: channel closed",
                event.artifact(),
                event.task()
            );
        }
    }
}

pub(crate) fn channel() -> (EventSender, Receiver<RenderEvent>) {
    let (tx, rx) = smol::channel::unbounded();
    (EventSender(tx), rx)
}

mod gradient;
mod hue_track;
mod opacity_track;
mod overlay;
mod swatch;

use std::sync::Arc;

pub use gradient::GradientGenerator;
pub use hue_track::HueTrackGenerator;
pub use opacity_track::OpacityTrackGenerator;
pub use overlay::OverlayGenerator;
pub use swatch::SwatchGenerator;

use crate::Result;
use crate::artifact::Artifact;
use crate::event::{EventSender, RenderEvent, RenderResult, Stage};
use crate::task::{CancelToken, TaskId};

/// A generator with every parameter captured at launch.
#[derive(Clone, Debug)]
pub enum RenderJob {
    HueTrack(HueTrackGenerator),
    Gradient(GradientGenerator),
    Overlay(OverlayGenerator),
    OpacityTrack(OpacityTrackGenerator),
    Swatch(SwatchGenerator),
}

impl RenderJob {
    pub fn artifact(&self) -> Artifact {
        match self {
            RenderJob::HueTrack(_) => Artifact::HueTrack,
            RenderJob::Gradient(_) => Artifact::Gradient,
            RenderJob::Overlay(_) => Artifact::Overlay,
            RenderJob::OpacityTrack(_) => Artifact::OpacityTrack,
            RenderJob::Swatch(_) => Artifact::Swatch,
        }
    }

    /// Run on a worker. Posts progress as it goes, then exactly one terminal event.
    pub(crate) fn run(self, task: TaskId, token: CancelToken, events: EventSender) {
        let artifact = self.artifact();
        let terminal = if token.is_cancelled() {
            None
        } else {
            match self.render(task, &token, &events) {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("{artifact} task {task} failed: {err}");
                    None
                }
            }
        };

        events.post(terminal.unwrap_or(RenderEvent::Cancelled { task, artifact }));
    }

    fn render(
        &self,
        task: TaskId,
        token: &CancelToken,
        events: &EventSender,
    ) -> Result<Option<RenderEvent>> {
        let done = |pixmap: tiny_skia::Pixmap| {
            RenderResult::new(task, self.clone(), Arc::new(pixmap), Stage::Final)
        };

        let event = match self {
            RenderJob::HueTrack(generator) => generator
                .render(token)?
                .map(|pixmap| RenderEvent::HueTrackDone(done(pixmap))),
            RenderJob::Gradient(generator) => generator
                .render(token, |bitmap, block_size| {
                    events.post(RenderEvent::GradientProgress(RenderResult::new(
                        task,
                        self.clone(),
                        bitmap,
                        Stage::Intermediate { block_size },
                    )));
                })?
                .map(|pixmap| RenderEvent::GradientDone(done(pixmap))),
            RenderJob::Overlay(generator) => generator
                .render(token)?
                .map(|pixmap| RenderEvent::OverlayDone(done(pixmap))),
            RenderJob::OpacityTrack(generator) => generator
                .render(token)?
                .map(|(pixmap, background)| RenderEvent::OpacityTrackDone(done(pixmap), background)),
            RenderJob::Swatch(generator) => generator
                .render(token)?
                .map(|(pixmap, background)| RenderEvent::SwatchDone(done(pixmap), background)),
        };
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event;
    use crate::geometry::{DrawingRegion, Geometry};

    fn gradient_job() -> RenderJob {
        RenderJob::Gradient(GradientGenerator {
            hue: 90.0,
            width: 16,
            height: 16,
            start_resolution: 8,
        })
    }

    #[test]
    fn test_run_posts_progress_then_done() {
        let (tx, rx) = event::channel();
        gradient_job().run(TaskId(7), CancelToken::new(), tx);

        let events: Vec<RenderEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            &events[0],
            RenderEvent::GradientProgress(result) if result.stage == Stage::Intermediate { block_size: 8 }
        ));
        assert!(matches!(&events[3], RenderEvent::GradientDone(result) if result.stage.is_final()));
        assert!(events.iter().all(|event| event.task() == TaskId(7)));
        assert!(matches!(
            &events[1],
            RenderEvent::GradientProgress(RenderResult { job: RenderJob::Gradient(generator), .. })
                if generator.hue == 90.0
        ));
    }

    #[test]
    fn test_run_cancelled_posts_acknowledgement() {
        let (tx, rx) = event::channel();
        let token = CancelToken::new();
        token.cancel();
        gradient_job().run(TaskId(3), token, tx);

        assert!(matches!(
            rx.try_recv(),
            Ok(RenderEvent::Cancelled {
                task: TaskId(3),
                artifact: Artifact::Gradient
            })
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_run_failure_posts_cancelled() {
        let (tx, rx) = event::channel();
        let job = RenderJob::HueTrack(HueTrackGenerator::new(Geometry::new(
            0,
            10,
            DrawingRegion::full(0, 10),
        )));
        job.run(TaskId(1), CancelToken::new(), tx);
        assert!(matches!(rx.try_recv(), Ok(RenderEvent::Cancelled { .. })));
    }
}

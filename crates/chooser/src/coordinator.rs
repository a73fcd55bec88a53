use std::collections::HashMap;
use std::sync::Arc;

use smol::channel::Receiver;

use crate::artifact::{Artifact, ArtifactSet, View};
use crate::checkerboard::{CheckerboardCache, CheckerboardKey};
use crate::config::ChooserConfig;
use crate::event::{self, EventSender, RenderEvent, RenderResult};
use crate::generators::{
    GradientGenerator, HueTrackGenerator, OpacityTrackGenerator, OverlayGenerator, RenderJob,
    SwatchGenerator,
};
use crate::geometry::Geometry;
use crate::input;
use crate::presenter::Presenter;
use crate::raster::Bitmap;
use crate::state::ColorState;
use crate::task::{Spawner, TaskHandle, TaskId, TaskState};
use crate::{Argb, Result};

/// One render slot per artifact.
#[derive(Debug, Default)]
enum Slot {
    #[default]
    Idle,
    Rendering(TaskHandle),
}

impl Slot {
    fn handle(&self) -> Option<&TaskHandle> {
        match self {
            Slot::Idle => None,
            Slot::Rendering(handle) => Some(handle),
        }
    }
}

/// Owns the color selection and keeps every rendered artifact in step with it.
///
/// Inputs mutate [`ColorState`], then cancel and replace the renders they made stale.
/// Workers report back over a channel; [`Coordinator::pump`] applies what they sent on
/// the calling thread, discarding anything produced by a superseded task.
pub struct Coordinator<P: Presenter> {
    config: ChooserConfig,
    state: ColorState,
    background: Argb,
    presenter: P,
    spawner: Arc<dyn Spawner>,
    events: EventSender,
    inbox: Receiver<RenderEvent>,

    slots: HashMap<Artifact, Slot>,
    /// Superseded handles still waiting for their worker's terminal event.
    retired: HashMap<TaskId, TaskHandle>,
    next_task: u64,

    geometries: HashMap<View, Geometry>,
    checkerboards: CheckerboardCache,
    /// The last final-resolution gradient for the current hue and gradient geometry.
    gradient: Option<Bitmap>,
    hue_track: Option<(Geometry, Bitmap)>,
    destroyed: bool,
}

impl<P: Presenter> Coordinator<P> {
    pub fn new(config: ChooserConfig, spawner: Arc<dyn Spawner>, presenter: P) -> Result<Self> {
        config.validate()?;
        let (events, inbox) = event::channel();
        Ok(Self {
            state: ColorState::from_argb(config.initial_color),
            background: config.background_color,
            config,
            presenter,
            spawner,
            events,
            inbox,
            slots: HashMap::new(),
            retired: HashMap::new(),
            next_task: 0,
            geometries: HashMap::new(),
            checkerboards: CheckerboardCache::new(),
            gradient: None,
            hue_track: None,
            destroyed: false,
        })
    }

    pub fn color(&self) -> Argb {
        self.state.argb()
    }

    pub fn state(&self) -> &ColorState {
        &self.state
    }

    pub fn config(&self) -> &ChooserConfig {
        &self.config
    }

    pub fn background_color(&self) -> Argb {
        self.background
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The state of the task currently owning `artifact`'s slot, if any.
    pub fn task_state(&self, artifact: Artifact) -> Option<TaskState> {
        self.slots
            .get(&artifact)
            .and_then(Slot::handle)
            .map(TaskHandle::state)
    }

    /// No slot has a task in flight.
    pub fn is_idle(&self) -> bool {
        self.slots.values().all(|slot| matches!(slot, Slot::Idle))
    }

    /// Idle, and every superseded worker has reported back.
    pub fn is_settled(&self) -> bool {
        self.is_idle() && self.retired.is_empty()
    }

    /// How many checkerboards were drawn from scratch and cached.
    pub fn checkerboard_rebuilds(&self) -> usize {
        self.checkerboards.rebuilds()
    }

    /// The cached checkerboard matching `artifact`'s current geometry and background.
    pub fn checkerboard(&self, artifact: Artifact) -> Option<Bitmap> {
        let key = self.checkerboard_key(artifact)?;
        self.checkerboards.lookup(artifact, &key)
    }

    pub fn on_hue_input(&mut self, hue: f32) {
        if self.destroyed {
            return;
        }
        let affected = self.state.set_hue(hue);
        self.commit(affected);
    }

    pub fn on_saturation_value_input(&mut self, saturation: f32, value: f32) {
        if self.destroyed {
            return;
        }
        let affected = self.state.set_saturation_value(saturation, value);
        self.commit(affected);
    }

    pub fn on_alpha_input(&mut self, alpha: u8) {
        if self.destroyed {
            return;
        }
        let affected = self.state.set_alpha(alpha);
        self.commit(affected);
    }

    pub fn on_argb_input(&mut self, argb: Argb) {
        if self.destroyed {
            return;
        }
        let affected = self.state.set_argb(argb);
        self.commit(affected);
    }

    /// Apply the four text fields. Returns the sanitised `[a, r, g, b]` to write back.
    pub fn on_component_text_input(
        &mut self,
        alpha: &str,
        red: &str,
        green: &str,
        blue: &str,
    ) -> [u8; 4] {
        let components = input::parse_components(alpha, red, green, blue);
        let [a, r, g, b] = components;
        self.on_argb_input(Argb::from_components(a, r, g, b));
        components
    }

    /// A view got its on-screen size. Renders that were waiting for it start now.
    pub fn on_geometry_resolved(&mut self, view: View, geometry: Geometry) {
        if self.destroyed || self.geometries.get(&view) == Some(&geometry) {
            return;
        }
        if geometry.is_empty() {
            tracing::warn!("ignoring empty geometry for {view:?}: {geometry:?}");
            return;
        }

        tracing::debug!("{view:?} resolved to {}x{}", geometry.width, geometry.height);
        self.geometries.insert(view, geometry);

        match view {
            View::HueTrack => match self.hue_track.clone() {
                Some((memo, bitmap)) if memo == geometry => {
                    self.cancel(Artifact::HueTrack);
                    self.present(Artifact::HueTrack, bitmap);
                }
                _ => self.launch(Artifact::HueTrack),
            },
            View::Gradient => self.schedule(ArtifactSet::of(&[Artifact::Gradient, Artifact::Overlay])),
            View::OpacityTrack => self.launch(Artifact::OpacityTrack),
            View::Swatch => self.launch(Artifact::Swatch),
        }
    }

    /// Change the color checkerboards contrast against. Both cached checkerboards are dropped.
    pub fn set_background_color(&mut self, background: Argb) {
        if self.destroyed || background == self.background {
            return;
        }
        self.background = background;
        self.checkerboards.invalidate();
        self.schedule(ArtifactSet::of(&[Artifact::OpacityTrack, Artifact::Swatch]));
    }

    /// Cancel everything and forget all state. Later inputs and results are ignored.
    pub fn on_view_destroyed(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        for (artifact, slot) in self.slots.drain() {
            if let Slot::Rendering(mut handle) = slot {
                handle.request_cancel();
                tracing::debug!("cancelled {artifact} task {}", handle.id());
                self.retired.insert(handle.id(), handle);
            }
        }
        self.geometries.clear();
        self.checkerboards.invalidate();
        self.gradient = None;
        self.hue_track = None;
    }

    /// Apply every event workers have posted so far. Returns how many were handled.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.inbox.try_recv() {
            self.apply(event);
            count += 1;
        }
        count
    }

    /// Apply events as they arrive until every launched task has finished.
    pub async fn settle(&mut self) {
        self.pump();
        while !self.is_settled() {
            match self.inbox.recv().await {
                Ok(event) => self.apply(event),
                Err(_) => break,
            }
        }
    }

    fn commit(&mut self, affected: ArtifactSet) {
        if affected.is_empty() {
            return;
        }
        tracing::debug!("{} changed, re-rendering {affected:?}", self.state.argb());
        self.schedule(affected);
        self.presenter.notify_color_changed(self.state.argb());
    }

    fn schedule(&mut self, affected: ArtifactSet) {
        if affected.contains(Artifact::Gradient) {
            self.gradient = None;
        }
        for artifact in affected.iter() {
            match artifact {
                Artifact::Overlay => self.schedule_overlay(),
                _ => self.launch(artifact),
            }
        }
    }

    /// The overlay needs a final gradient. Without one it waits for the next `GradientDone`.
    fn schedule_overlay(&mut self) {
        let gradient_rendering = self.task_state(Artifact::Gradient).is_some();
        if self.gradient.is_some() && !gradient_rendering {
            self.launch(Artifact::Overlay);
        } else {
            self.cancel(Artifact::Overlay);
        }
    }

    /// Start a task for `artifact`, superseding whatever the slot was running.
    fn launch(&mut self, artifact: Artifact) {
        if self.destroyed {
            return;
        }
        let Some(job) = self.job(artifact) else {
            tracing::debug!("deferring {artifact}: geometry not resolved");
            return;
        };

        self.next_task += 1;
        let id = TaskId(self.next_task);
        let mut handle = TaskHandle::new(id, artifact);
        handle.mark_running();
        let token = handle.token();

        let previous = std::mem::replace(
            self.slots.entry(artifact).or_default(),
            Slot::Rendering(handle),
        );
        if let Slot::Rendering(mut old) = previous {
            old.request_cancel();
            tracing::debug!("{artifact} task {} superseded by {id}", old.id());
            self.retired.insert(old.id(), old);
        }

        let events = self.events.clone();
        self.spawner
            .spawn(Box::new(move || job.run(id, token, events)));
        tracing::debug!("launched {artifact} task {id}");
    }

    /// Request cancellation without a replacement. The slot clears on acknowledgement.
    fn cancel(&mut self, artifact: Artifact) {
        if let Some(Slot::Rendering(handle)) = self.slots.get_mut(&artifact) {
            if handle.request_cancel() {
                tracing::debug!("cancelling {artifact} task {}", handle.id());
            }
        }
    }

    fn checkerboard_key(&self, artifact: Artifact) -> Option<CheckerboardKey> {
        let geometry = self.geometries.get(&artifact.view())?;
        Some(CheckerboardKey {
            width: geometry.width,
            height: geometry.height,
            reference: self.background,
        })
    }

    /// Capture everything `artifact`'s generator needs. `None` until its view has a size.
    fn job(&self, artifact: Artifact) -> Option<RenderJob> {
        let geometry = *self.geometries.get(&artifact.view())?;
        let job = match artifact {
            Artifact::HueTrack => RenderJob::HueTrack(HueTrackGenerator::new(geometry)),
            Artifact::Gradient => RenderJob::Gradient(GradientGenerator {
                hue: self.state.hue(),
                width: geometry.width,
                height: geometry.height,
                start_resolution: self.config.gradient_start_resolution,
            }),
            Artifact::Overlay => RenderJob::Overlay(OverlayGenerator {
                gradient: self.gradient.clone()?,
                hsv: self.state.hsv(),
                radius: self.config.marker_radius,
                stroke_width: self.config.marker_stroke_width,
            }),
            Artifact::OpacityTrack => RenderJob::OpacityTrack(OpacityTrackGenerator {
                geometry,
                color: self.state.argb().with_alpha(255),
                reference: self.background,
                grid_size: self.config.checkerboard_grid_size,
                checkerboard: self.checkerboard(artifact),
            }),
            Artifact::Swatch => RenderJob::Swatch(SwatchGenerator {
                geometry,
                color: self.state.argb(),
                reference: self.background,
                grid_size: self.config.checkerboard_grid_size,
                checkerboard: self.checkerboard(artifact),
            }),
        };
        Some(job)
    }

    fn apply(&mut self, event: RenderEvent) {
        let task = event.task();
        let artifact = event.artifact();

        if let RenderEvent::Cancelled { .. } = event {
            self.acknowledge_cancel(artifact, task);
            return;
        }

        let current = matches!(
            self.slots.get(&artifact).and_then(Slot::handle),
            Some(handle) if handle.id() == task && handle.state() == TaskState::Running
        );
        if self.destroyed || !current {
            self.discard(&event);
            return;
        }

        if !event.is_terminal() {
            if let RenderEvent::GradientProgress(result) = event {
                tracing::trace!("gradient preview {:?} from {task}", result.stage);
                self.present(Artifact::Gradient, result.bitmap);
            }
            return;
        }

        if let Some(Slot::Rendering(mut handle)) = self.slots.insert(artifact, Slot::Idle) {
            handle.mark_completed();
        }
        tracing::trace!("applying {artifact} from {task}");

        match event {
            RenderEvent::HueTrackDone(RenderResult { bitmap, job, .. }) => {
                if let RenderJob::HueTrack(generator) = job {
                    self.hue_track = Some((generator.geometry, bitmap.clone()));
                }
                self.present(artifact, bitmap);
            }
            RenderEvent::GradientDone(RenderResult { bitmap, .. }) => {
                self.gradient = Some(bitmap.clone());
                self.present(artifact, bitmap);
                if self.presenter.is_alive(View::Gradient) {
                    self.launch(Artifact::Overlay);
                }
            }
            RenderEvent::OverlayDone(RenderResult { bitmap, .. }) => {
                self.present(artifact, bitmap);
            }
            RenderEvent::OpacityTrackDone(RenderResult { bitmap, .. }, background)
            | RenderEvent::SwatchDone(RenderResult { bitmap, .. }, background) => {
                if background.key.reference == self.background {
                    self.checkerboards.store(artifact, &background);
                }
                self.present(artifact, bitmap);
            }
            RenderEvent::GradientProgress(_) | RenderEvent::Cancelled { .. } => {}
        }
    }

    /// A result from a task that no longer owns its slot.
    fn discard(&mut self, event: &RenderEvent) {
        let task = event.task();
        tracing::trace!("discarding stale {} event from {task}", event.artifact());
        if !event.is_terminal() {
            return;
        }

        if let Some(mut handle) = self.retired.remove(&task) {
            handle.mark_cancelled();
            return;
        }
        // Cancelled in place but finished before it noticed.
        let artifact = event.artifact();
        if self.slots.get(&artifact).and_then(Slot::handle).map(TaskHandle::id) == Some(task) {
            self.slots.insert(artifact, Slot::Idle);
        }
    }

    fn acknowledge_cancel(&mut self, artifact: Artifact, task: TaskId) {
        if let Some(mut handle) = self.retired.remove(&task) {
            handle.mark_cancelled();
            tracing::trace!("{artifact} task {task} acknowledged cancellation");
            return;
        }

        let Some(Slot::Rendering(handle)) = self.slots.get_mut(&artifact) else {
            return;
        };
        if handle.id() != task {
            return;
        }
        if !handle.mark_cancelled() {
            tracing::warn!("{artifact} task {task} stopped without a result");
        }
        self.slots.insert(artifact, Slot::Idle);
    }

    fn present(&mut self, artifact: Artifact, bitmap: Bitmap) {
        let view = artifact.view();
        if !self.presenter.is_alive(view) {
            tracing::debug!("{view:?} is gone, dropping {artifact} bitmap");
            return;
        }
        if artifact.is_background() {
            self.presenter.apply_background(view, bitmap);
        } else {
            self.presenter.apply_bitmap(view, bitmap);
        }
    }
}

use std::fmt;

use enum_iterator::{Sequence, all};

/// A render slot owned by the coordinator. Every slot has at most one live task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Sequence)]
pub enum Artifact {
    HueTrack,
    Gradient,
    /// The selection marker drawn over a final-resolution gradient.
    Overlay,
    OpacityTrack,
    Swatch,
}

impl Artifact {
    /// The on-screen view this artifact is presented on.
    pub fn view(self) -> View {
        match self {
            Artifact::HueTrack => View::HueTrack,
            Artifact::Gradient | Artifact::Overlay => View::Gradient,
            Artifact::OpacityTrack => View::OpacityTrack,
            Artifact::Swatch => View::Swatch,
        }
    }

    /// Tracks take their bitmap as a background, image views as content.
    pub fn is_background(self) -> bool {
        matches!(self, Artifact::HueTrack | Artifact::OpacityTrack)
    }

    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::HueTrack => write!(f, "hue-track"),
            Artifact::Gradient => write!(f, "gradient"),
            Artifact::Overlay => write!(f, "overlay"),
            Artifact::OpacityTrack => write!(f, "opacity-track"),
            Artifact::Swatch => write!(f, "swatch"),
        }
    }
}

/// The four on-screen views. Gradient and overlay share one view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Sequence)]
pub enum View {
    HueTrack,
    Gradient,
    OpacityTrack,
    Swatch,
}

/// A small set of artifacts, iterated in declaration order.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactSet(u8);

impl ArtifactSet {
    pub const EMPTY: ArtifactSet = ArtifactSet(0);

    pub fn of(artifacts: &[Artifact]) -> Self {
        artifacts.iter().fold(Self::EMPTY, |set, a| set.with(*a))
    }

    #[must_use]
    pub fn with(self, artifact: Artifact) -> Self {
        Self(self.0 | artifact.bit())
    }

    pub fn contains(self, artifact: Artifact) -> bool {
        self.0 & artifact.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Artifact> {
        all::<Artifact>().filter(move |a| self.contains(*a))
    }
}

impl fmt::Debug for ArtifactSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

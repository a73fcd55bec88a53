use crate::artifact::{Artifact, ArtifactSet};
use crate::color::{Argb, Hsv, normalize_hue};

/// The selected color, kept both as HSV components and packed ARGB.
///
/// Every setter updates both representations before returning, and returns the set of
/// artifacts that no longer match the selection. An unchanged value returns an empty set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorState {
    alpha: u8,
    hue: f32,
    saturation: f32,
    value: f32,
    argb: Argb,
}

impl ColorState {
    pub fn from_argb(argb: Argb) -> Self {
        let hsv = argb.to_hsv();
        Self {
            alpha: argb.alpha(),
            hue: hsv.h,
            saturation: hsv.s,
            value: hsv.v,
            argb,
        }
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn hue(&self) -> f32 {
        self.hue
    }

    pub fn saturation(&self) -> f32 {
        self.saturation
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn argb(&self) -> Argb {
        self.argb
    }

    pub fn hsv(&self) -> Hsv {
        Hsv {
            h: self.hue,
            s: self.saturation,
            v: self.value,
        }
    }

    /// New hue; saturation, value and alpha stay.
    pub fn set_hue(&mut self, hue: f32) -> ArtifactSet {
        let hue = normalize_hue(hue);
        if hue == self.hue {
            return ArtifactSet::EMPTY;
        }

        self.hue = hue;
        self.argb = self.hsv().to_argb(self.alpha);
        ArtifactSet::of(&[
            Artifact::Gradient,
            Artifact::Overlay,
            Artifact::OpacityTrack,
            Artifact::Swatch,
        ])
    }

    /// New marker position on the gradient; the gradient itself is unaffected.
    pub fn set_saturation_value(&mut self, saturation: f32, value: f32) -> ArtifactSet {
        let saturation = clamp_unit(saturation);
        let value = clamp_unit(value);
        if saturation == self.saturation && value == self.value {
            return ArtifactSet::EMPTY;
        }

        self.saturation = saturation;
        self.value = value;
        self.argb = self.hsv().to_argb(self.alpha);
        ArtifactSet::of(&[Artifact::Overlay, Artifact::OpacityTrack, Artifact::Swatch])
    }

    pub fn set_alpha(&mut self, alpha: u8) -> ArtifactSet {
        if alpha == self.alpha {
            return ArtifactSet::EMPTY;
        }

        self.alpha = alpha;
        self.argb = self.argb.with_alpha(alpha);
        ArtifactSet::of(&[Artifact::OpacityTrack, Artifact::Swatch])
    }

    /// Replace the color wholesale, deriving HSV from the packed value.
    ///
    /// Achromatic colors keep the previous hue so the gradient does not jump to red.
    pub fn set_argb(&mut self, argb: Argb) -> ArtifactSet {
        if argb == self.argb {
            return ArtifactSet::EMPTY;
        }

        let hsv = argb.to_hsv();
        let hue = if hsv.s == 0.0 || hsv.v == 0.0 {
            self.hue
        } else {
            hsv.h
        };

        let mut affected = ArtifactSet::of(&[Artifact::OpacityTrack, Artifact::Swatch]);
        if hue != self.hue {
            affected = affected.with(Artifact::Gradient).with(Artifact::Overlay);
        }
        if hsv.s != self.saturation || hsv.v != self.value {
            affected = affected.with(Artifact::Overlay);
        }

        self.alpha = argb.alpha();
        self.hue = hue;
        self.saturation = hsv.s;
        self.value = hsv.v;
        self.argb = argb;
        affected
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray() -> ColorState {
        ColorState::from_argb(Argb(0xff80_8080))
    }

    #[test]
    fn test_set_hue() {
        let mut state = gray();
        state.set_saturation_value(1.0, 1.0);
        let affected = state.set_hue(120.0);
        assert!(affected.contains(Artifact::Gradient));
        assert!(affected.contains(Artifact::Overlay));
        assert!(affected.contains(Artifact::OpacityTrack));
        assert!(affected.contains(Artifact::Swatch));
        assert!(!affected.contains(Artifact::HueTrack));
        assert_eq!(state.argb(), Argb(0xff00_ff00));

        assert!(state.set_hue(120.0).is_empty());
        assert!(state.set_hue(480.0).is_empty());
    }

    #[test]
    fn test_set_saturation_value() {
        let mut state = gray();
        state.set_hue(0.0);
        let affected = state.set_saturation_value(1.0, 1.0);
        assert_eq!(
            affected,
            ArtifactSet::of(&[Artifact::Overlay, Artifact::OpacityTrack, Artifact::Swatch])
        );
        assert_eq!(state.argb(), Argb(0xffff_0000));
        assert!(state.set_saturation_value(1.5, 2.0).is_empty());
    }

    #[test]
    fn test_set_alpha() {
        let mut state = gray();
        let affected = state.set_alpha(0x40);
        assert_eq!(
            affected,
            ArtifactSet::of(&[Artifact::OpacityTrack, Artifact::Swatch])
        );
        assert_eq!(state.argb(), Argb(0x4080_8080));
        assert_eq!(state.alpha(), 0x40);
        assert!(state.set_alpha(0x40).is_empty());
    }

    #[test]
    fn test_set_argb_alpha_only() {
        let mut state = ColorState::from_argb(Argb(0xff33_66cc));
        let affected = state.set_argb(Argb(0x8033_66cc));
        assert_eq!(
            affected,
            ArtifactSet::of(&[Artifact::OpacityTrack, Artifact::Swatch])
        );
        assert_eq!(state.alpha(), 0x80);
    }

    #[test]
    fn test_set_argb_hue_change() {
        let mut state = ColorState::from_argb(Argb(0xffff_0000));
        let affected = state.set_argb(Argb(0xff00_00ff));
        assert!(affected.contains(Artifact::Gradient));
        assert!(affected.contains(Artifact::Overlay));
        assert!((state.hue() - 240.0).abs() < 1e-4);
    }

    #[test]
    fn test_set_argb_same_hue_moves_marker() {
        let mut state = ColorState::from_argb(Argb(0xffff_0000));
        let affected = state.set_argb(Argb(0xff80_0000));
        assert!(!affected.contains(Artifact::Gradient));
        assert!(affected.contains(Artifact::Overlay));
    }

    #[test]
    fn test_set_argb_gray_keeps_hue() {
        let mut state = ColorState::from_argb(Argb(0xff00_00ff));
        let affected = state.set_argb(Argb(0xff40_4040));
        assert!(!affected.contains(Artifact::Gradient));
        assert!((state.hue() - 240.0).abs() < 1e-4);
        assert_eq!(state.saturation(), 0.0);
    }

    #[test]
    fn test_representations_stay_consistent() {
        let mut state = gray();
        state.set_hue(200.0);
        state.set_saturation_value(0.25, 0.75);
        state.set_alpha(10);
        assert_eq!(state.argb(), state.hsv().to_argb(state.alpha()));
        assert!(state.set_argb(state.argb()).is_empty());
    }
}

use crate::artifact::View;
use crate::raster::Bitmap;
use crate::Argb;

/// The presentation layer the coordinator applies results to.
///
/// Called only from the apply context. Workers never see it.
pub trait Presenter {
    /// Show a bitmap as the content of an image view.
    fn apply_bitmap(&mut self, view: View, bitmap: Bitmap);

    /// Show a bitmap as the background of a track view.
    fn apply_background(&mut self, view: View, bitmap: Bitmap);

    /// The selection changed. Fired once per input, after its renders are scheduled.
    fn notify_color_changed(&mut self, argb: Argb);

    /// Whether the view still exists. Results for dead views are dropped.
    fn is_alive(&self, _view: View) -> bool {
        true
    }
}

#[cfg(test)]
pub(crate) use recording::{Call, RecordingPresenter};

#[cfg(test)]
mod recording {
    use std::collections::HashSet;

    use super::*;

    #[derive(Clone, Debug)]
    pub(crate) enum Call {
        Bitmap(View, Bitmap),
        Background(View, Bitmap),
        ColorChanged(Argb),
    }

    /// Records every call in order.
    #[derive(Default)]
    pub(crate) struct RecordingPresenter {
        pub(crate) calls: Vec<Call>,
        pub(crate) dead: HashSet<View>,
    }

    impl RecordingPresenter {
        /// Bitmaps applied to `view`, as content or background, oldest first.
        pub(crate) fn bitmaps(&self, view: View) -> Vec<Bitmap> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Bitmap(v, bitmap) | Call::Background(v, bitmap) if *v == view => {
                        Some(bitmap.clone())
                    }
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn last_bitmap(&self, view: View) -> Option<Bitmap> {
            self.bitmaps(view).pop()
        }

        pub(crate) fn color_changes(&self) -> Vec<Argb> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::ColorChanged(argb) => Some(*argb),
                    _ => None,
                })
                .collect()
        }
    }

    impl Presenter for RecordingPresenter {
        fn apply_bitmap(&mut self, view: View, bitmap: Bitmap) {
            self.calls.push(Call::Bitmap(view, bitmap));
        }

        fn apply_background(&mut self, view: View, bitmap: Bitmap) {
            self.calls.push(Call::Background(view, bitmap));
        }

        fn notify_color_changed(&mut self, argb: Argb) {
            self.calls.push(Call::ColorChanged(argb));
        }

        fn is_alive(&self, view: View) -> bool {
            !self.dead.contains(&view)
        }
    }
}

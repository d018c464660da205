//! Graphics state stack
//!
//! One frame per `save`, strict nesting. A frame owns everything a terminal
//! drawing operation consults: the CTM, the device-space clip list, brushes,
//! stroke parameters, global alpha, blend mode, and the optional shadow.
//! `restore` pops the whole frame, so every field round-trips bit-identical
//! and clip additions since the matching `save` vanish together.

use plume_core::{BlendMode, Brush, PaintError, Path, Result, Shadow, Stroke, Transform};
use smallvec::{smallvec, SmallVec};

/// One frame of drawing state.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsState {
    /// Current transformation matrix, user space to device space.
    pub ctm: Transform,
    /// Clip paths in device space; the effective clip is their intersection.
    pub clips: SmallVec<[Path; 2]>,
    pub fill_brush: Brush,
    pub stroke_brush: Brush,
    pub stroke: Stroke,
    /// Global alpha in `[0, 1]`, multiplied onto every submission.
    pub alpha: f32,
    pub blend_mode: BlendMode,
    /// `None` means no shadow; a zero-blur shadow is still a shadow.
    pub shadow: Option<Shadow>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Transform::IDENTITY,
            clips: SmallVec::new(),
            fill_brush: Brush::default(),
            stroke_brush: Brush::default(),
            stroke: Stroke::default(),
            alpha: 1.0,
            blend_mode: BlendMode::Normal,
            shadow: None,
        }
    }
}

impl GraphicsState {
    /// Compose a transform onto the CTM. The new transform applies first
    /// when mapping user space to device space.
    pub fn concat(&mut self, transform: &Transform) {
        self.ctm = self.ctm.then(transform);
    }

    /// Narrow the clip with an already device-space path. Clips only ever
    /// accumulate within a frame; widening happens through `restore` alone.
    pub fn intersect_clip(&mut self, device_path: Path) {
        self.clips.push(device_path);
    }

    /// Freeze the renderer-visible part of this frame into a value copy.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            ctm: self.ctm,
            clips: self.clips.to_vec(),
            alpha: self.alpha,
            blend_mode: self.blend_mode,
            shadow: self.shadow,
        }
    }
}

/// Immutable copy of the drawing state delivered alongside a submission.
///
/// Captured at submission time; later context mutation never reaches a
/// snapshot a renderer already holds. Coordinates in submissions are already
/// device space, so `ctm` is informational and must not be re-applied.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSnapshot {
    pub ctm: Transform,
    pub clips: Vec<Path>,
    pub alpha: f32,
    pub blend_mode: BlendMode,
    pub shadow: Option<Shadow>,
}

/// The save/restore stack. Never empty; the base frame cannot be popped.
#[derive(Clone, Debug)]
pub struct StateStack {
    frames: SmallVec<[GraphicsState; 4]>,
}

impl Default for StateStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStack {
    pub fn new() -> Self {
        Self {
            frames: smallvec![GraphicsState::default()],
        }
    }

    pub fn current(&self) -> &GraphicsState {
        self.frames.last().expect("stack holds at least one frame")
    }

    pub fn current_mut(&mut self) -> &mut GraphicsState {
        self.frames
            .last_mut()
            .expect("stack holds at least one frame")
    }

    /// Push a deep copy of the current frame.
    pub fn save(&mut self) {
        self.frames.push(self.current().clone());
    }

    /// Pop back to the previous frame. Fails on the base frame, leaving the
    /// state untouched.
    pub fn restore(&mut self) -> Result<()> {
        if self.frames.len() == 1 {
            return Err(PaintError::InvalidStateOperation(
                "restore without matching save",
            ));
        }
        self.frames.pop();
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plume_core::{Color, LineCap, Point, Rect, Vec2};

    #[test]
    fn test_save_restore_round_trips_every_field() {
        let mut stack = StateStack::new();
        let state = stack.current_mut();
        state.concat(&Transform::rotation(0.3));
        state.fill_brush = Brush::Solid(Color::RED);
        state.stroke_brush = Brush::Solid(Color::BLUE);
        state.stroke = Stroke::new(3.5).with_cap(LineCap::Round);
        state.alpha = 0.75;
        state.blend_mode = BlendMode::Multiply;
        state.shadow = Some(Shadow::new(1.0, 2.0, 3.0, Color::BLACK));
        state.intersect_clip(Path::rect(Rect::new(0.0, 0.0, 5.0, 5.0)));
        let before = stack.current().clone();

        stack.save();
        let inner = stack.current_mut();
        inner.concat(&Transform::scale(2.0, 2.0));
        inner.fill_brush = Brush::Solid(Color::GREEN);
        inner.stroke = Stroke::new(1.0);
        inner.alpha = 0.1;
        inner.blend_mode = BlendMode::Screen;
        inner.shadow = Some(Shadow {
            offset: Vec2::new(9.0, 9.0),
            blur: 9.0,
            color: Color::WHITE,
        });
        inner.intersect_clip(Path::circle(Point::ZERO, 1.0));

        stack.restore().unwrap();
        assert_eq!(*stack.current(), before);
    }

    #[test]
    fn test_restore_on_base_frame_fails_and_changes_nothing() {
        let mut stack = StateStack::new();
        stack.current_mut().alpha = 0.5;
        let before = stack.current().clone();

        let err = stack.restore().unwrap_err();
        assert!(matches!(err, PaintError::InvalidStateOperation(_)));
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.current(), before);
    }

    #[test]
    fn test_clip_only_narrows_and_restore_removes_additions() {
        let mut stack = StateStack::new();
        stack
            .current_mut()
            .intersect_clip(Path::rect(Rect::new(0.0, 0.0, 100.0, 100.0)));
        stack.save();
        stack
            .current_mut()
            .intersect_clip(Path::rect(Rect::new(10.0, 10.0, 50.0, 50.0)));
        assert_eq!(stack.current().clips.len(), 2);

        stack.restore().unwrap();
        assert_eq!(stack.current().clips.len(), 1);
    }

    #[test]
    fn test_snapshot_is_immune_to_later_mutation() {
        let mut stack = StateStack::new();
        stack.current_mut().alpha = 0.5;
        let snap = stack.current().snapshot();

        stack.current_mut().alpha = 1.0;
        stack.current_mut().concat(&Transform::translation(5.0, 5.0));
        stack
            .current_mut()
            .intersect_clip(Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0)));

        assert_eq!(snap.alpha, 0.5);
        assert_eq!(snap.ctm, Transform::IDENTITY);
        assert!(snap.clips.is_empty());
    }

    #[test]
    fn test_concat_applies_new_transform_first() {
        let mut stack = StateStack::new();
        stack.current_mut().concat(&Transform::translation(10.0, 0.0));
        stack.current_mut().concat(&Transform::scale(2.0, 2.0));
        // Scale applies to user coordinates before the translation.
        let p = stack.current().ctm.transform_point(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(12.0, 2.0));
    }
}

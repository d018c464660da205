//! Renderer contract
//!
//! A renderer is a pure sink: the drawing context hands it device-space
//! geometry plus an immutable state snapshot, in submission order (painter's
//! algorithm), and the renderer owns everything pixel-shaped from there.
//! Submission methods are fire-and-forget; backend failures travel the
//! backend's own channel. `materialize` is the single suspension point.

use std::future::Future;
use std::pin::Pin;

use plume_core::{BlendMode, Brush, GradientStop, Image, Interpolation, Point, Quad, Rect};
use plume_geom::Triangle;

use crate::state::StateSnapshot;

/// Device-space triangle list produced by the tessellator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangleMesh {
    pub triangles: Vec<Triangle>,
}

impl TriangleMesh {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }
}

/// Rasterized output of `Renderer::materialize`: RGBA8, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0, Vec::new())
    }
}

/// Boxed completion future for [`Renderer::materialize`].
pub type MaterializeFuture = Pin<Box<dyn Future<Output = PixelBuffer> + Send>>;

/// Backend interface fed by the drawing context.
///
/// Every coordinate arrives with the CTM already applied; implementations
/// must not re-apply `StateSnapshot::ctm`. Clip paths in the snapshot are
/// device space as well.
pub trait Renderer {
    /// Fill a tessellated mesh with a brush.
    fn fill(
        &mut self,
        mesh: TriangleMesh,
        brush: &Brush,
        alpha: f32,
        blend: BlendMode,
        state: &StateSnapshot,
    );

    /// Fill a stroke-outline mesh. `line_width` is the user-space width, for
    /// backends that re-render strokes analytically.
    fn stroke(
        &mut self,
        mesh: TriangleMesh,
        brush: &Brush,
        line_width: f32,
        alpha: f32,
        blend: BlendMode,
        state: &StateSnapshot,
    );

    /// Draw an image stretched onto a device-space quad.
    fn draw_image(
        &mut self,
        image: Image,
        dest: Quad,
        alpha: f32,
        blend: BlendMode,
        interpolation: Interpolation,
        state: &StateSnapshot,
    );

    /// Paint a linear gradient across the current clip region.
    #[allow(clippy::too_many_arguments)]
    fn draw_linear_gradient(
        &mut self,
        stops: &[GradientStop],
        start: Point,
        end: Point,
        extend_start: bool,
        extend_end: bool,
        state: &StateSnapshot,
    );

    /// Paint a radial gradient between two device-space circles.
    #[allow(clippy::too_many_arguments)]
    fn draw_radial_gradient(
        &mut self,
        stops: &[GradientStop],
        start_center: Point,
        start_radius: f32,
        end_center: Point,
        end_radius: f32,
        extend_start: bool,
        extend_end: bool,
        state: &StateSnapshot,
    );

    /// Open an offscreen compositing group, optionally bounded.
    fn begin_transparency_layer(&mut self, bounds: Option<Rect>, state: &StateSnapshot);

    /// Composite the innermost open group with the alpha and blend mode
    /// captured when it was begun.
    fn end_transparency_layer(&mut self, alpha: f32, blend: BlendMode);

    /// Reset a device-space rect to transparent black, ignoring blend state.
    fn clear(&mut self, rect: Rect, state: &StateSnapshot);

    /// Resolve all submissions so far into pixels.
    fn materialize(&mut self) -> MaterializeFuture;
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording sink for tests
// ─────────────────────────────────────────────────────────────────────────────

/// One recorded renderer call, with owned copies of every argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    Fill {
        mesh: TriangleMesh,
        brush: Brush,
        alpha: f32,
        blend: BlendMode,
        state: StateSnapshot,
    },
    Stroke {
        mesh: TriangleMesh,
        brush: Brush,
        line_width: f32,
        alpha: f32,
        blend: BlendMode,
        state: StateSnapshot,
    },
    Image {
        image: Image,
        dest: Quad,
        alpha: f32,
        blend: BlendMode,
        interpolation: Interpolation,
        state: StateSnapshot,
    },
    LinearGradient {
        stops: Vec<GradientStop>,
        start: Point,
        end: Point,
        extend_start: bool,
        extend_end: bool,
        state: StateSnapshot,
    },
    RadialGradient {
        stops: Vec<GradientStop>,
        start_center: Point,
        start_radius: f32,
        end_center: Point,
        end_radius: f32,
        extend_start: bool,
        extend_end: bool,
        state: StateSnapshot,
    },
    BeginLayer {
        bounds: Option<Rect>,
        state: StateSnapshot,
    },
    EndLayer {
        alpha: f32,
        blend: BlendMode,
    },
    Clear {
        rect: Rect,
        state: StateSnapshot,
    },
}

/// Renderer that records every submission verbatim, for asserting on what
/// the drawing context produced.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub submissions: Vec<Submission>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

impl Renderer for RecordingRenderer {
    fn fill(
        &mut self,
        mesh: TriangleMesh,
        brush: &Brush,
        alpha: f32,
        blend: BlendMode,
        state: &StateSnapshot,
    ) {
        self.submissions.push(Submission::Fill {
            mesh,
            brush: brush.clone(),
            alpha,
            blend,
            state: state.clone(),
        });
    }

    fn stroke(
        &mut self,
        mesh: TriangleMesh,
        brush: &Brush,
        line_width: f32,
        alpha: f32,
        blend: BlendMode,
        state: &StateSnapshot,
    ) {
        self.submissions.push(Submission::Stroke {
            mesh,
            brush: brush.clone(),
            line_width,
            alpha,
            blend,
            state: state.clone(),
        });
    }

    fn draw_image(
        &mut self,
        image: Image,
        dest: Quad,
        alpha: f32,
        blend: BlendMode,
        interpolation: Interpolation,
        state: &StateSnapshot,
    ) {
        self.submissions.push(Submission::Image {
            image,
            dest,
            alpha,
            blend,
            interpolation,
            state: state.clone(),
        });
    }

    fn draw_linear_gradient(
        &mut self,
        stops: &[GradientStop],
        start: Point,
        end: Point,
        extend_start: bool,
        extend_end: bool,
        state: &StateSnapshot,
    ) {
        self.submissions.push(Submission::LinearGradient {
            stops: stops.to_vec(),
            start,
            end,
            extend_start,
            extend_end,
            state: state.clone(),
        });
    }

    fn draw_radial_gradient(
        &mut self,
        stops: &[GradientStop],
        start_center: Point,
        start_radius: f32,
        end_center: Point,
        end_radius: f32,
        extend_start: bool,
        extend_end: bool,
        state: &StateSnapshot,
    ) {
        self.submissions.push(Submission::RadialGradient {
            stops: stops.to_vec(),
            start_center,
            start_radius,
            end_center,
            end_radius,
            extend_start,
            extend_end,
            state: state.clone(),
        });
    }

    fn begin_transparency_layer(&mut self, bounds: Option<Rect>, state: &StateSnapshot) {
        self.submissions.push(Submission::BeginLayer {
            bounds,
            state: state.clone(),
        });
    }

    fn end_transparency_layer(&mut self, alpha: f32, blend: BlendMode) {
        self.submissions.push(Submission::EndLayer { alpha, blend });
    }

    fn clear(&mut self, rect: Rect, state: &StateSnapshot) {
        self.submissions.push(Submission::Clear {
            rect,
            state: state.clone(),
        });
    }

    fn materialize(&mut self) -> MaterializeFuture {
        Box::pin(std::future::ready(PixelBuffer::empty()))
    }
}

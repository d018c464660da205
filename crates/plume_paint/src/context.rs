//! The drawing context
//!
//! Immediate-mode surface of the engine. A context borrows exactly one
//! renderer for its lifetime, accumulates a working path and graphics state,
//! and converts each terminal operation into device-space geometry plus a
//! state snapshot submitted to the renderer. Single-threaded by design;
//! geometry generation is pure.

use plume_core::{
    BlendMode, Brush, Gradient, GradientStop, Image, ImageFit, Interpolation, LineCap, LineJoin,
    PaintError, Path, PathBuilder, Point, Quad, Rect, Result, Shadow, Transform,
};
use plume_geom::{flatten_path, stroke_outline, tessellate, FillRule, DEFAULT_TOLERANCE};

use crate::renderer::{MaterializeFuture, Renderer, TriangleMesh};
use crate::state::StateStack;

fn ensure_finite_rect(rect: Rect) -> Result<()> {
    if rect.is_finite() {
        Ok(())
    } else {
        Err(PaintError::InvalidParameter("non-finite rectangle"))
    }
}

/// Alpha and blend captured when a transparency layer is begun; applied at
/// the matching end.
#[derive(Clone, Copy, Debug)]
struct LayerFrame {
    alpha: f32,
    blend: BlendMode,
}

/// Immediate-mode drawing context bound to a single renderer.
///
/// # Example
///
/// ```rust,ignore
/// let mut renderer = RecordingRenderer::new();
/// let mut ctx = DrawingContext::new(&mut renderer);
/// ctx.set_fill_brush(Color::RED);
/// ctx.move_to(0.0, 0.0)?;
/// ctx.line_to(10.0, 0.0)?;
/// ctx.line_to(10.0, 10.0)?;
/// ctx.close_subpath();
/// ctx.fill_path(FillRule::NonZero)?;
/// ```
pub struct DrawingContext<'r> {
    renderer: &'r mut dyn Renderer,
    states: StateStack,
    path: PathBuilder,
    layers: Vec<LayerFrame>,
    tolerance: f32,
}

impl<'r> DrawingContext<'r> {
    /// Bind a context to a renderer for the context's lifetime. The renderer
    /// is chosen here and never swapped.
    pub fn new(renderer: &'r mut dyn Renderer) -> Self {
        Self {
            renderer,
            states: StateStack::new(),
            path: PathBuilder::new(),
            layers: Vec::new(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Override the device-space flattening tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    // ─────────────────────────────────────────────────────────────────────
    // Path construction
    // ─────────────────────────────────────────────────────────────────────

    pub fn move_to(&mut self, x: f32, y: f32) -> Result<()> {
        self.path.move_to(x, y)
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> Result<()> {
        self.path.line_to(x, y)
    }

    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> Result<()> {
        self.path.quad_to(cx, cy, x, y)
    }

    pub fn cubic_to(&mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) -> Result<()> {
        self.path.cubic_to(cx1, cy1, cx2, cy2, x, y)
    }

    pub fn close_subpath(&mut self) {
        self.path.close_subpath();
    }

    pub fn append_rect(&mut self, rect: Rect) {
        self.path.append_path(&Path::rect(rect));
    }

    pub fn append_ellipse(&mut self, center: Point, radius_x: f32, radius_y: f32) {
        self.path.append_path(&Path::ellipse(center, radius_x, radius_y));
    }

    pub fn append_path(&mut self, path: &Path) {
        self.path.append_path(path);
    }

    /// The working path's current point, if a subpath is open.
    pub fn current_point(&self) -> Option<Point> {
        self.path.current_point()
    }

    /// Discard the working path without drawing it.
    pub fn discard_path(&mut self) {
        self.path.clear();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Paint setters
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_fill_brush(&mut self, brush: impl Into<Brush>) {
        self.states.current_mut().fill_brush = brush.into();
    }

    pub fn set_stroke_brush(&mut self, brush: impl Into<Brush>) {
        self.states.current_mut().stroke_brush = brush.into();
    }

    pub fn set_line_width(&mut self, width: f32) -> Result<()> {
        if !(width.is_finite() && width > 0.0) {
            return Err(PaintError::InvalidParameter(
                "line width must be positive and finite",
            ));
        }
        self.states.current_mut().stroke.width = width;
        Ok(())
    }

    pub fn set_line_cap(&mut self, cap: LineCap) {
        self.states.current_mut().stroke.cap = cap;
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.states.current_mut().stroke.join = join;
    }

    pub fn set_miter_limit(&mut self, limit: f32) -> Result<()> {
        if !(limit.is_finite() && limit >= 1.0) {
            return Err(PaintError::InvalidParameter(
                "miter limit must be finite and at least 1",
            ));
        }
        self.states.current_mut().stroke.miter_limit = limit;
        Ok(())
    }

    /// Set the dash pattern; an empty pattern means solid.
    pub fn set_dash(&mut self, pattern: Vec<f32>, offset: f32) -> Result<()> {
        if !offset.is_finite() || pattern.iter().any(|len| !len.is_finite() || *len < 0.0) {
            return Err(PaintError::InvalidParameter(
                "dash lengths must be finite and non-negative",
            ));
        }
        let stroke = &mut self.states.current_mut().stroke;
        stroke.dash = pattern;
        stroke.dash_offset = offset;
        Ok(())
    }

    /// Set the global alpha, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) -> Result<()> {
        if !alpha.is_finite() {
            return Err(PaintError::InvalidParameter("alpha must be finite"));
        }
        self.states.current_mut().alpha = alpha.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.states.current_mut().blend_mode = blend;
    }

    pub fn set_shadow(&mut self, shadow: Shadow) {
        self.states.current_mut().shadow = Some(shadow);
    }

    pub fn clear_shadow(&mut self) {
        self.states.current_mut().shadow = None;
    }

    // ─────────────────────────────────────────────────────────────────────
    // State
    // ─────────────────────────────────────────────────────────────────────

    pub fn save(&mut self) {
        self.states.save();
    }

    pub fn restore(&mut self) -> Result<()> {
        self.states.restore()
    }

    pub fn concat_transform(&mut self, transform: &Transform) {
        self.states.current_mut().concat(transform);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.concat_transform(&Transform::translation(x, y));
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.concat_transform(&Transform::scale(sx, sy));
    }

    pub fn rotate(&mut self, angle: f32) {
        self.concat_transform(&Transform::rotation(angle));
    }

    pub fn current_transform(&self) -> Transform {
        self.states.current().ctm
    }

    /// Intersect the clip with the working path, consuming it. The path is
    /// mapped to device space with the call-time CTM; later CTM changes do
    /// not move an established clip.
    pub fn clip(&mut self) {
        let device = self.path.build().transform(&self.states.current().ctm);
        self.path.clear();
        if device.is_empty() {
            tracing::trace!("clip with empty path ignored");
            return;
        }
        self.states.current_mut().intersect_clip(device);
    }

    /// Intersect the clip with a user-space rectangle. A non-finite rect is
    /// rejected before it can poison later snapshots.
    pub fn clip_rect(&mut self, rect: Rect) -> Result<()> {
        ensure_finite_rect(rect)?;
        let device = Path::rect(rect).transform(&self.states.current().ctm);
        self.states.current_mut().intersect_clip(device);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Terminal operations
    // ─────────────────────────────────────────────────────────────────────

    /// Fill the working path under a fill rule, then clear it.
    pub fn fill_path(&mut self, rule: FillRule) -> Result<()> {
        let path = self.path.build();
        self.submit_fill(&path, rule)?;
        self.path.clear();
        Ok(())
    }

    /// Fill a rectangle without touching the working path.
    pub fn fill_rect(&mut self, rect: Rect) -> Result<()> {
        ensure_finite_rect(rect)?;
        self.submit_fill(&Path::rect(rect), FillRule::NonZero)
    }

    fn submit_fill(&mut self, path: &Path, rule: FillRule) -> Result<()> {
        let state = self.states.current();
        let device = path.transform(&state.ctm);
        let subpaths = flatten_path(&device, self.tolerance);
        let triangles = tessellate(&subpaths, rule);
        if triangles.is_empty() {
            tracing::trace!("fill produced no geometry");
            return Ok(());
        }
        let snapshot = state.snapshot();
        self.renderer.fill(
            TriangleMesh::new(triangles),
            &state.fill_brush,
            state.alpha,
            state.blend_mode,
            &snapshot,
        );
        Ok(())
    }

    /// Stroke the working path with the current stroke settings, then clear
    /// it. On error the working path is left intact.
    pub fn stroke_path(&mut self) -> Result<()> {
        let path = self.path.build();
        self.submit_stroke(&path)?;
        self.path.clear();
        Ok(())
    }

    /// Stroke a rectangle without touching the working path.
    pub fn stroke_rect(&mut self, rect: Rect) -> Result<()> {
        ensure_finite_rect(rect)?;
        self.submit_stroke(&Path::rect(rect))
    }

    fn submit_stroke(&mut self, path: &Path) -> Result<()> {
        let state = self.states.current();
        let ctm = state.ctm;
        // Centerlines are flattened in user space; scaling the tolerance by
        // the CTM keeps the chord error a device-space quantity.
        let user_tolerance = self.tolerance / ctm.max_scale().max(1e-6);

        let centerlines = flatten_path(path, user_tolerance);
        let mut outlines = Vec::new();
        for centerline in &centerlines {
            outlines.extend(stroke_outline(centerline, &state.stroke, user_tolerance)?);
        }
        for outline in &mut outlines {
            for point in &mut outline.points {
                *point = ctm.transform_point(*point);
            }
        }
        // Outline polygons overlap at joins; nonzero winding absorbs that.
        let triangles = tessellate(&outlines, FillRule::NonZero);
        if triangles.is_empty() {
            tracing::trace!("stroke produced no geometry");
            return Ok(());
        }
        let snapshot = state.snapshot();
        self.renderer.stroke(
            TriangleMesh::new(triangles),
            &state.stroke_brush,
            state.stroke.width,
            state.alpha,
            state.blend_mode,
            &snapshot,
        );
        Ok(())
    }

    /// Draw an image into a user-space destination rect.
    ///
    /// `Fill` stretches; `Tile` repeats at natural size from the destination
    /// origin, clipped to the destination. A zero-dimension image or a
    /// zero-area destination submits nothing and returns immediately.
    pub fn draw_image(
        &mut self,
        image: Image,
        dest: Rect,
        fit: ImageFit,
        interpolation: Interpolation,
    ) -> Result<()> {
        ensure_finite_rect(dest)?;
        if image.is_empty() {
            tracing::trace!(?fit, "zero-dimension image, nothing to draw");
            return Ok(());
        }
        if dest.size.is_empty() {
            tracing::trace!("empty image destination, nothing to draw");
            return Ok(());
        }
        let state = self.states.current();
        let ctm = state.ctm;

        match fit {
            ImageFit::Fill => {
                let quad = ctm.transform_quad(Quad::from_rect(dest));
                let snapshot = state.snapshot();
                self.renderer.draw_image(
                    image,
                    quad,
                    state.alpha,
                    state.blend_mode,
                    interpolation,
                    &snapshot,
                );
            }
            ImageFit::Tile => {
                // Edge tiles overhang; the destination joins the clip set so
                // the renderer crops them.
                let mut snapshot = state.snapshot();
                snapshot.clips.push(Path::rect(dest).transform(&ctm));

                let tile_w = image.width as f32;
                let tile_h = image.height as f32;
                let cols = (dest.width() / tile_w).ceil() as u32;
                let rows = (dest.height() / tile_h).ceil() as u32;
                for row in 0..rows {
                    for col in 0..cols {
                        let tile = Rect::new(
                            dest.x() + col as f32 * tile_w,
                            dest.y() + row as f32 * tile_h,
                            tile_w,
                            tile_h,
                        );
                        let quad = ctm.transform_quad(Quad::from_rect(tile));
                        self.renderer.draw_image(
                            image,
                            quad,
                            state.alpha,
                            state.blend_mode,
                            interpolation,
                            &snapshot,
                        );
                    }
                }
            }
        }
        Ok(())
    }

    /// Paint a linear gradient across the current clip region.
    pub fn draw_linear_gradient(
        &mut self,
        start: Point,
        end: Point,
        stops: &[GradientStop],
        extend_start: bool,
        extend_end: bool,
    ) -> Result<()> {
        if !Gradient::stops_are_valid(stops) {
            return Err(PaintError::InvalidParameter("malformed gradient stop list"));
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(PaintError::InvalidParameter("non-finite gradient endpoint"));
        }
        let state = self.states.current();
        let snapshot = state.snapshot();
        self.renderer.draw_linear_gradient(
            stops,
            state.ctm.transform_point(start),
            state.ctm.transform_point(end),
            extend_start,
            extend_end,
            &snapshot,
        );
        Ok(())
    }

    /// Paint a radial gradient between two circles.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_radial_gradient(
        &mut self,
        start_center: Point,
        start_radius: f32,
        end_center: Point,
        end_radius: f32,
        stops: &[GradientStop],
        extend_start: bool,
        extend_end: bool,
    ) -> Result<()> {
        if !Gradient::stops_are_valid(stops) {
            return Err(PaintError::InvalidParameter("malformed gradient stop list"));
        }
        let radii_ok = start_radius.is_finite()
            && end_radius.is_finite()
            && start_radius >= 0.0
            && end_radius >= 0.0;
        if !radii_ok || !start_center.is_finite() || !end_center.is_finite() {
            return Err(PaintError::InvalidParameter("malformed gradient geometry"));
        }
        let state = self.states.current();
        let scale = state.ctm.max_scale();
        let snapshot = state.snapshot();
        self.renderer.draw_radial_gradient(
            stops,
            state.ctm.transform_point(start_center),
            start_radius * scale,
            state.ctm.transform_point(end_center),
            end_radius * scale,
            extend_start,
            extend_end,
            &snapshot,
        );
        Ok(())
    }

    /// Reset a user-space rect to transparent black.
    pub fn clear_rect(&mut self, rect: Rect) -> Result<()> {
        ensure_finite_rect(rect)?;
        let state = self.states.current();
        let device = state.ctm.transform_rect(rect);
        let snapshot = state.snapshot();
        self.renderer.clear(device, &snapshot);
        Ok(())
    }

    /// Open a transparency layer. The current alpha and blend mode are
    /// captured now and applied when the layer ends; drawing inside the
    /// layer starts from neutral compositing.
    pub fn begin_transparency_layer(&mut self, bounds: Option<Rect>) {
        let state = self.states.current();
        let device_bounds = bounds.map(|b| state.ctm.transform_rect(b));
        self.layers.push(LayerFrame {
            alpha: state.alpha,
            blend: state.blend_mode,
        });
        let snapshot = state.snapshot();
        self.renderer.begin_transparency_layer(device_bounds, &snapshot);

        let state = self.states.current_mut();
        state.alpha = 1.0;
        state.blend_mode = BlendMode::Normal;
    }

    /// Close the innermost transparency layer, compositing it with the
    /// alpha and blend mode captured at begin.
    pub fn end_transparency_layer(&mut self) -> Result<()> {
        let frame = self.layers.pop().ok_or(PaintError::InvalidStateOperation(
            "end transparency layer without begin",
        ))?;
        self.renderer.end_transparency_layer(frame.alpha, frame.blend);
        let state = self.states.current_mut();
        state.alpha = frame.alpha;
        state.blend_mode = frame.blend;
        Ok(())
    }

    /// Resolve everything submitted so far into pixels.
    pub fn materialize(&mut self) -> MaterializeFuture {
        self.renderer.materialize()
    }
}

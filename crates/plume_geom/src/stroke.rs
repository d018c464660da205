//! Stroke outline generation
//!
//! Converts a flattened centerline plus stroke style into closed outline
//! polygons that fill (nonzero) as the stroked region. Open centerlines
//! become a single polygon: the left offset walked forward, the end cap, the
//! right offset walked backward, the start cap. Closed centerlines become
//! two rings of opposite orientation whose nonzero fill is the annulus.
//!
//! Joins are decorated only on the outer side of a turn; the inner side just
//! connects the two offset points, and the resulting self-overlap cancels
//! under the nonzero rule.

use crate::dash::split_dashes;
use crate::flatten::Polyline;
use plume_core::{LineCap, LineJoin, PaintError, Point, Result, Stroke, Vec2};

/// Segments shorter than this contribute no direction.
const MIN_LENGTH: f32 = 1e-6;

/// Generate the outline polygons for a stroked centerline.
///
/// `tolerance` bounds the chord error of round joins and caps. Returns
/// `InvalidParameter` for a non-positive or non-finite width; degenerate
/// centerlines (fewer than two distinct points) produce an empty outline,
/// never an error.
pub fn stroke_outline(
    centerline: &Polyline,
    stroke: &Stroke,
    tolerance: f32,
) -> Result<Vec<Polyline>> {
    if !(stroke.width.is_finite() && stroke.width > 0.0) {
        return Err(PaintError::InvalidParameter(
            "stroke width must be positive and finite",
        ));
    }
    let half = stroke.width * 0.5;

    let runs = if stroke.dash.is_empty() {
        vec![centerline.clone()]
    } else {
        split_dashes(centerline, &stroke.dash, stroke.dash_offset)
    };

    let mut outlines = Vec::new();
    for run in &runs {
        let points = dedup(&run.points, run.closed);
        if points.len() < 2 {
            tracing::trace!("skipping degenerate stroke run");
            continue;
        }
        if run.closed {
            outline_closed(&points, half, stroke, tolerance, &mut outlines);
        } else {
            outlines.push(outline_open(&points, half, stroke, tolerance));
        }
    }
    Ok(outlines)
}

/// Drop consecutive duplicates (and the wrap-around duplicate when closed).
fn dedup(points: &[Point], closed: bool) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().map_or(true, |&last| last.distance(p) > MIN_LENGTH) {
            out.push(p);
        }
    }
    if closed && out.len() > 1 {
        let first = out[0];
        if out[out.len() - 1].distance(first) <= MIN_LENGTH {
            out.pop();
        }
    }
    out
}

fn offset(p: Point, dir: Vec2, half: f32) -> Point {
    p + dir.perp().scale(half)
}

fn segment_dirs(points: &[Point], closed: bool) -> Vec<Vec2> {
    let count = if closed {
        points.len()
    } else {
        points.len() - 1
    };
    (0..count)
        .map(|i| Vec2::from_points(points[i], points[(i + 1) % points.len()]).normalize())
        .collect()
}

fn outline_open(points: &[Point], half: f32, stroke: &Stroke, tolerance: f32) -> Polyline {
    let dirs = segment_dirs(points, false);
    let n = points.len();
    let mut out = Vec::with_capacity(n * 2 + 8);

    // Left side, forward.
    out.push(offset(points[0], dirs[0], half));
    for i in 1..n - 1 {
        add_join(&mut out, points[i], dirs[i - 1], dirs[i], half, stroke, tolerance);
    }
    out.push(offset(points[n - 1], dirs[n - 2], half));

    // End cap, then the right side is the left side of the reversed walk.
    add_cap(&mut out, points[n - 1], dirs[n - 2], half, stroke.cap, tolerance);
    out.push(offset(points[n - 1], dirs[n - 2].scale(-1.0), half));
    for i in (1..n - 1).rev() {
        add_join(
            &mut out,
            points[i],
            dirs[i].scale(-1.0),
            dirs[i - 1].scale(-1.0),
            half,
            stroke,
            tolerance,
        );
    }
    out.push(offset(points[0], dirs[0].scale(-1.0), half));

    // Start cap closes back to the first outline point.
    add_cap(&mut out, points[0], dirs[0].scale(-1.0), half, stroke.cap, tolerance);

    Polyline::new(out, true)
}

/// Two concentric rings with opposite orientation.
fn outline_closed(
    points: &[Point],
    half: f32,
    stroke: &Stroke,
    tolerance: f32,
    outlines: &mut Vec<Polyline>,
) {
    let dirs = segment_dirs(points, true);
    let n = points.len();

    let mut ring = Vec::with_capacity(n * 2);
    for i in 0..n {
        let d_in = dirs[(i + n - 1) % n];
        let d_out = dirs[i];
        add_join(&mut ring, points[i], d_in, d_out, half, stroke, tolerance);
    }
    outlines.push(Polyline::new(ring, true));

    let mut ring = Vec::with_capacity(n * 2);
    for i in (0..n).rev() {
        let d_in = dirs[i].scale(-1.0);
        let d_out = dirs[(i + n - 1) % n].scale(-1.0);
        add_join(&mut ring, points[i], d_in, d_out, half, stroke, tolerance);
    }
    outlines.push(Polyline::new(ring, true));
}

/// Emit the outline points for one side of a vertex.
///
/// On the outer side of the turn (`cross < 0`): incoming offset, join
/// decoration per style, outgoing offset. On the inner side the true
/// boundary is the intersection of the two offset lines; falling back to the
/// raw offset pair there would leave corner regions with zero winding.
fn add_join(
    out: &mut Vec<Point>,
    vertex: Point,
    d_in: Vec2,
    d_out: Vec2,
    half: f32,
    stroke: &Stroke,
    tolerance: f32,
) {
    let cross = d_in.cross(d_out);
    if cross > MIN_LENGTH {
        if let Some(tip) = join_tip(vertex, d_in, d_out, half, f32::INFINITY) {
            out.push(tip);
            return;
        }
        // Near-reversal: anchor through the vertex.
        out.push(offset(vertex, d_in, half));
        out.push(vertex);
        out.push(offset(vertex, d_out, half));
        return;
    }

    let a = offset(vertex, d_in, half);
    let b = offset(vertex, d_out, half);
    out.push(a);
    if cross < -MIN_LENGTH {
        match stroke.join {
            LineJoin::Bevel => {}
            LineJoin::Miter => {
                if let Some(tip) = join_tip(vertex, d_in, d_out, half, stroke.miter_limit) {
                    out.push(tip);
                }
            }
            LineJoin::Round => {
                let a0 = Vec2::from_points(vertex, a);
                let a1 = Vec2::from_points(vertex, b);
                add_arc(out, vertex, half, a0.y.atan2(a0.x), sweep_between(a0, a1), tolerance);
            }
        }
    }
    out.push(b);
}

/// Intersection of the two offset lines at a vertex, or `None` when the
/// turn is a near-reversal or the tip exceeds `limit * half`.
fn join_tip(vertex: Point, d_in: Vec2, d_out: Vec2, half: f32, limit: f32) -> Option<Point> {
    let cos_half_angle = ((1.0 + d_in.dot(d_out)) * 0.5).max(0.0).sqrt();
    if cos_half_angle < 1e-4 {
        return None;
    }
    let length = half / cos_half_angle;
    if length > limit * half {
        return None;
    }
    let bisector = Vec2::new(
        d_in.perp().x + d_out.perp().x,
        d_in.perp().y + d_out.perp().y,
    )
    .normalize();
    Some(vertex + bisector.scale(length))
}

/// Signed minimal sweep from `from` to `to`, in radians.
fn sweep_between(from: Vec2, to: Vec2) -> f32 {
    let mut sweep = to.y.atan2(to.x) - from.y.atan2(from.x);
    if sweep > std::f32::consts::PI {
        sweep -= std::f32::consts::TAU;
    } else if sweep < -std::f32::consts::PI {
        sweep += std::f32::consts::TAU;
    }
    sweep
}

/// Append the interior points of an arc around `center`; endpoints are the
/// caller's responsibility.
fn add_arc(out: &mut Vec<Point>, center: Point, radius: f32, start: f32, sweep: f32, tolerance: f32) {
    if radius <= 0.0 {
        return;
    }
    // Chord error e for angular step t satisfies e = r * (1 - cos(t / 2)).
    let max_step = 2.0 * (1.0 - (tolerance / radius).min(1.0)).acos().max(1e-2);
    let steps = (sweep.abs() / max_step).ceil() as usize;
    for k in 1..steps {
        let angle = start + sweep * (k as f32 / steps as f32);
        out.push(Point::new(
            center.x + radius * angle.cos(),
            center.y + radius * angle.sin(),
        ));
    }
}

/// Emit the cap between the two offset points at an endpoint. `dir` points
/// out of the run. The caller has pushed the left offset and will push (or
/// close onto) the right offset.
fn add_cap(out: &mut Vec<Point>, endpoint: Point, dir: Vec2, half: f32, cap: LineCap, tolerance: f32) {
    match cap {
        LineCap::Butt => {}
        LineCap::Square => {
            let d = dir.scale(half);
            out.push(offset(endpoint, dir, half) + d);
            out.push(offset(endpoint, dir.scale(-1.0), half) + d);
        }
        LineCap::Round => {
            let l = dir.perp();
            // Semicircle from the left offset through `endpoint + dir * half`.
            add_arc(
                out,
                endpoint,
                half,
                l.y.atan2(l.x),
                -std::f32::consts::PI,
                tolerance,
            );
        }
    }
}

//! Curve flattening
//!
//! Converts curved path segments into polylines by recursive de Casteljau
//! midpoint subdivision, until the chord-to-curve deviation is below the
//! tolerance. The emitted sequence for a segment always ends bit-exactly at
//! the segment's declared end point, so subpath joins stay seamless.

use plume_core::{Path, PathCommand, Point};
use smallvec::SmallVec;

/// Default flattening tolerance, a device-space distance.
pub const DEFAULT_TOLERANCE: f32 = 0.25;

/// Subdivision cap; beyond this the chord is taken as-is.
const MAX_DEPTH: u32 = 16;

/// A flattened subpath.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    /// Whether the subpath was explicitly closed. Fill treats every subpath
    /// as closed; stroking caps open ends.
    pub closed: bool,
}

impl Polyline {
    pub fn new(points: Vec<Point>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Total length along the polyline, including the closing edge when
    /// closed.
    pub fn length(&self) -> f32 {
        let mut len = 0.0;
        for pair in self.points.windows(2) {
            len += pair[0].distance(pair[1]);
        }
        if self.closed && self.points.len() > 1 {
            len += self.points[self.points.len() - 1].distance(self.points[0]);
        }
        len
    }
}

/// Distance from `p` to the segment `a..b`.
fn dist_point_to_line(p: Point, a: Point, b: Point) -> f32 {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let wx = p.x - a.x;
    let wy = p.y - a.y;
    let c1 = vx * wx + vy * wy;
    if c1 <= 0.0 {
        return p.distance(a);
    }
    let c2 = vx * vx + vy * vy;
    if c2 <= c1 {
        return p.distance(b);
    }
    let t = c1 / c2;
    p.distance(Point::new(a.x + t * vx, a.y + t * vy))
}

fn quad_rec(p0: Point, p1: Point, p2: Point, tolerance: f32, depth: u32, out: &mut Vec<Point>) {
    if depth >= MAX_DEPTH || dist_point_to_line(p1, p0, p2) <= tolerance {
        out.push(p2);
        return;
    }
    let p01 = p0.midpoint(p1);
    let p12 = p1.midpoint(p2);
    let p012 = p01.midpoint(p12);
    quad_rec(p0, p01, p012, tolerance, depth + 1, out);
    quad_rec(p012, p12, p2, tolerance, depth + 1, out);
}

#[allow(clippy::too_many_arguments)]
fn cubic_rec(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    tolerance: f32,
    depth: u32,
    out: &mut Vec<Point>,
) {
    let d1 = dist_point_to_line(p1, p0, p3);
    let d2 = dist_point_to_line(p2, p0, p3);
    if depth >= MAX_DEPTH || d1.max(d2) <= tolerance {
        out.push(p3);
        return;
    }
    let p01 = p0.midpoint(p1);
    let p12 = p1.midpoint(p2);
    let p23 = p2.midpoint(p3);
    let p012 = p01.midpoint(p12);
    let p123 = p12.midpoint(p23);
    let p0123 = p012.midpoint(p123);
    cubic_rec(p0, p01, p012, p0123, tolerance, depth + 1, out);
    cubic_rec(p0123, p123, p23, p3, tolerance, depth + 1, out);
}

/// Flatten a quadratic Bézier from `from`, appending points after `from`.
///
/// The final appended point is `end`, bit-exact. A zero-length segment
/// (all control points coincident with `from`) appends nothing.
pub fn flatten_quad(from: Point, control: Point, end: Point, tolerance: f32, out: &mut Vec<Point>) {
    if from == control && from == end {
        return;
    }
    let before = out.len();
    quad_rec(from, control, end, tolerance, 0, out);
    // Subdivision midpoints accumulate rounding; pin the terminal point.
    debug_assert!(out.len() > before);
    *out.last_mut().expect("subdivision emits at least one point") = end;
}

/// Flatten a cubic Bézier from `from`, appending points after `from`.
///
/// Same contract as [`flatten_quad`].
pub fn flatten_cubic(
    from: Point,
    control1: Point,
    control2: Point,
    end: Point,
    tolerance: f32,
    out: &mut Vec<Point>,
) {
    if from == control1 && from == control2 && from == end {
        return;
    }
    let before = out.len();
    cubic_rec(from, control1, control2, end, tolerance, 0, out);
    debug_assert!(out.len() > before);
    *out.last_mut().expect("subdivision emits at least one point") = end;
}

/// Flatten every subpath of a path into polylines.
///
/// Zero-length segments are dropped; subpaths that end up with fewer than
/// two points are discarded (a lone `move_to` draws nothing).
pub fn flatten_path(path: &Path, tolerance: f32) -> SmallVec<[Polyline; 4]> {
    let mut subpaths: SmallVec<[Polyline; 4]> = SmallVec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut pen: Option<Point> = None;

    let mut finalize = |points: &mut Vec<Point>, closed: bool| {
        if points.len() >= 2 {
            subpaths.push(Polyline::new(std::mem::take(points), closed));
        } else if !points.is_empty() {
            tracing::trace!("dropping degenerate subpath with a single point");
            points.clear();
        }
    };

    for cmd in path.commands() {
        match cmd {
            PathCommand::MoveTo(p) => {
                finalize(&mut current, false);
                current.push(*p);
                pen = Some(*p);
            }
            PathCommand::LineTo(p) => {
                if let Some(from) = pen {
                    if from != *p {
                        current.push(*p);
                    }
                    pen = Some(*p);
                }
            }
            PathCommand::QuadTo { control, end } => {
                if let Some(from) = pen {
                    flatten_quad(from, *control, *end, tolerance, &mut current);
                    pen = Some(*end);
                }
            }
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => {
                if let Some(from) = pen {
                    flatten_cubic(from, *control1, *control2, *end, tolerance, &mut current);
                    pen = Some(*end);
                }
            }
            PathCommand::Close => {
                // Drop a vertex that duplicates the start; the closed flag
                // carries the closing edge.
                if current.len() > 1 && current.first() == current.last() {
                    current.pop();
                }
                let start = current.first().copied();
                finalize(&mut current, true);
                pen = start;
                if let Some(s) = start {
                    current.push(s);
                }
            }
        }
    }
    finalize(&mut current, false);

    subpaths
}

//! Fill tessellation
//!
//! Triangulates flattened subpaths into a flat triangle list. The polygon is
//! cut into horizontal slabs at every vertex y and at every pairwise edge
//! intersection y, so edges never cross inside a slab. Within a slab, edges
//! spanning it are ordered left to right and winding is accumulated across
//! them; interior spans become trapezoids, each split into two triangles.
//!
//! Classification is by winding (nonzero) or parity (even-odd), so multiple
//! subpaths, holes, and self-intersecting subpaths are all handled by the
//! same machinery, never rejected. Output order is deterministic: slabs top
//! to bottom, spans left to right.

use crate::flatten::Polyline;
use plume_core::Point;

/// Fill rule: determines which regions of self-overlapping geometry count as
/// inside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    /// Inside where the signed crossing count is nonzero
    #[default]
    NonZero,
    /// Inside where the crossing count is odd
    EvenOdd,
}

/// A single triangle: three positions, nothing else. Paint attributes attach
/// at the brush, not the geometry.
pub type Triangle = [Point; 3];

/// Signed area of a triangle (positive for counter-clockwise in y-up
/// coordinates).
pub fn triangle_area(tri: &Triangle) -> f32 {
    let [a, b, c] = tri;
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y))
}

/// Total unsigned area of a triangle list.
pub fn mesh_area(triangles: &[Triangle]) -> f32 {
    triangles.iter().map(|t| triangle_area(t).abs()).sum()
}

/// A non-horizontal polygon edge, normalized top-to-bottom, remembering its
/// original direction for winding.
#[derive(Clone, Copy, Debug)]
struct Edge {
    top: Point,
    bottom: Point,
    /// +1 when the source edge pointed toward increasing y, -1 otherwise.
    winding: i32,
}

impl Edge {
    fn from_points(a: Point, b: Point) -> Option<Edge> {
        if a.y == b.y {
            // Horizontal edges never cross a slab interior.
            return None;
        }
        if a.y < b.y {
            Some(Edge {
                top: a,
                bottom: b,
                winding: 1,
            })
        } else {
            Some(Edge {
                top: b,
                bottom: a,
                winding: -1,
            })
        }
    }

    fn x_at(&self, y: f32) -> f32 {
        let t = (y - self.top.y) / (self.bottom.y - self.top.y);
        self.top.x + t * (self.bottom.x - self.top.x)
    }
}

/// y of the crossing between two edges, if the open interiors intersect.
fn crossing_y(a: &Edge, b: &Edge) -> Option<f32> {
    let d1x = a.bottom.x - a.top.x;
    let d1y = a.bottom.y - a.top.y;
    let d2x = b.bottom.x - b.top.x;
    let d2y = b.bottom.y - b.top.y;
    let denom = d1x * d2y - d1y * d2x;
    if denom == 0.0 {
        return None;
    }
    let ox = b.top.x - a.top.x;
    let oy = b.top.y - a.top.y;
    let t = (ox * d2y - oy * d2x) / denom;
    let u = (ox * d1y - oy * d1x) / denom;
    if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
        Some(a.top.y + t * d1y)
    } else {
        None
    }
}

const EPS: f32 = 1e-6;

/// Tessellate flattened subpaths into triangles under a fill rule.
///
/// Every subpath is treated as closed for filling. Degenerate input (fewer
/// than three distinct points, zero total area) yields an empty list.
pub fn tessellate(subpaths: &[Polyline], rule: FillRule) -> Vec<Triangle> {
    let mut edges: Vec<Edge> = Vec::new();
    for subpath in subpaths {
        let pts = &subpath.points;
        if pts.len() < 2 {
            continue;
        }
        for pair in pts.windows(2) {
            if let Some(e) = Edge::from_points(pair[0], pair[1]) {
                edges.push(e);
            }
        }
        // Closing edge, whether or not the subpath was explicitly closed.
        if let Some(e) = Edge::from_points(pts[pts.len() - 1], pts[0]) {
            edges.push(e);
        }
    }
    if edges.len() < 2 {
        tracing::trace!("tessellate: degenerate input, no edges");
        return Vec::new();
    }

    // Slab boundaries: every vertex y plus every edge-crossing y.
    let mut ys: Vec<f32> = Vec::with_capacity(edges.len() * 2);
    for e in &edges {
        ys.push(e.top.y);
        ys.push(e.bottom.y);
    }
    for i in 0..edges.len() {
        for j in (i + 1)..edges.len() {
            if let Some(y) = crossing_y(&edges[i], &edges[j]) {
                ys.push(y);
            }
        }
    }
    ys.retain(|y| y.is_finite());
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    ys.dedup_by(|a, b| (*a - *b).abs() <= EPS);

    let mut triangles = Vec::new();
    let mut active: Vec<(f32, f32, f32, i32)> = Vec::new(); // (x_mid, x_top, x_bot, winding)

    for slab in ys.windows(2) {
        let (y0, y1) = (slab[0], slab[1]);
        if y1 - y0 <= EPS {
            continue;
        }
        let y_mid = (y0 + y1) * 0.5;

        active.clear();
        for e in &edges {
            if e.top.y <= y_mid && e.bottom.y >= y_mid {
                active.push((e.x_at(y_mid), e.x_at(y0), e.x_at(y1), e.winding));
            }
        }
        // No crossings inside a slab, so midpoint order is the slab order.
        active.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        });

        let mut winding = 0i32;
        for (k, edge) in active.iter().enumerate() {
            winding += edge.3;
            let inside = match rule {
                FillRule::NonZero => winding != 0,
                FillRule::EvenOdd => (k + 1) % 2 == 1,
            };
            if !inside || k + 1 >= active.len() {
                continue;
            }
            let next = &active[k + 1];
            emit_trapezoid(
                &mut triangles,
                Point::new(edge.1, y0),
                Point::new(next.1, y0),
                Point::new(next.2, y1),
                Point::new(edge.2, y1),
            );
        }
    }

    triangles
}

/// Split a trapezoid (top-left, top-right, bottom-right, bottom-left) into
/// two triangles, skipping slivers with no area.
fn emit_trapezoid(out: &mut Vec<Triangle>, tl: Point, tr: Point, br: Point, bl: Point) {
    let t1 = [tl, tr, br];
    if triangle_area(&t1).abs() > EPS {
        out.push(t1);
    }
    let t2 = [tl, br, bl];
    if triangle_area(&t2).abs() > EPS {
        out.push(t2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten_path;
    use plume_core::{Path, Point, Rect};

    fn polyline(points: &[(f32, f32)]) -> Polyline {
        Polyline::new(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            true,
        )
    }

    /// Shoelace area of a point loop.
    fn shoelace(points: &[(f32, f32)]) -> f32 {
        let mut a = 0.0;
        let n = points.len();
        for i in 0..n {
            let j = (i + 1) % n;
            a += points[i].0 * points[j].1 - points[j].0 * points[i].1;
        }
        (a * 0.5).abs()
    }

    #[test]
    fn test_unit_square_is_two_triangles_with_area_one() {
        let square = polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        let tris = tessellate(&[square], FillRule::NonZero);
        assert_eq!(tris.len(), 2);
        assert!((mesh_area(&tris) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_tessellation_is_deterministic() {
        let shape = polyline(&[(0.0, 0.0), (4.0, 1.0), (5.0, 4.0), (1.0, 5.0), (-1.0, 2.0)]);
        let a = tessellate(&[shape.clone()], FillRule::NonZero);
        let b = tessellate(&[shape], FillRule::NonZero);
        assert_eq!(a, b);
    }

    #[test]
    fn test_area_conservation_simple_polygon_both_rules() {
        let pts = [(0.0, 0.0), (6.0, 0.0), (6.0, 2.0), (3.0, 5.0), (0.0, 2.0)];
        let expected = shoelace(&pts);
        for rule in [FillRule::NonZero, FillRule::EvenOdd] {
            let tris = tessellate(&[polyline(&pts)], rule);
            assert!(
                (mesh_area(&tris) - expected).abs() < 1e-4,
                "{rule:?}: {} != {expected}",
                mesh_area(&tris)
            );
        }
    }

    #[test]
    fn test_hole_is_not_filled() {
        // 10x10 outer, 2x2 hole with opposite orientation.
        let outer = polyline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = polyline(&[(4.0, 4.0), (4.0, 6.0), (6.0, 6.0), (6.0, 4.0)]);
        let tris = tessellate(&[outer.clone(), hole.clone()], FillRule::NonZero);
        assert!((mesh_area(&tris) - 96.0).abs() < 1e-3);

        // Even-odd gives the same annulus regardless of orientation.
        let tris = tessellate(&[outer, hole], FillRule::EvenOdd);
        assert!((mesh_area(&tris) - 96.0).abs() < 1e-3);
    }

    #[test]
    fn test_fill_rules_differ_on_overlap() {
        // Two same-orientation overlapping squares in one tessellation call.
        let a = polyline(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        let b = polyline(&[(2.0, 2.0), (6.0, 2.0), (6.0, 6.0), (2.0, 6.0)]);

        let nonzero = tessellate(&[a.clone(), b.clone()], FillRule::NonZero);
        // Union: 16 + 16 - 4 overlap.
        assert!((mesh_area(&nonzero) - 28.0).abs() < 1e-3);

        let evenodd = tessellate(&[a, b], FillRule::EvenOdd);
        // Overlap cancels under parity.
        assert!((mesh_area(&evenodd) - 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_self_intersecting_bowtie_is_classified_not_rejected() {
        // Bowtie: two triangular lobes of area 1 each.
        let bowtie = polyline(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]);
        let tris = tessellate(&[bowtie], FillRule::NonZero);
        assert!(!tris.is_empty());
        assert!((mesh_area(&tris) - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_degenerate_input_is_empty() {
        assert!(tessellate(&[], FillRule::NonZero).is_empty());

        // Collinear points enclose no area.
        let line = polyline(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        assert!(tessellate(&[line], FillRule::NonZero).is_empty());

        // Fewer than 3 distinct points.
        let two = Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)], true);
        assert!(tessellate(&[two], FillRule::EvenOdd).is_empty());
    }

    #[test]
    fn test_flattened_circle_area_approaches_pi_r_squared() {
        let subpaths = flatten_path(&Path::circle(Point::new(0.0, 0.0), 10.0), 0.05);
        let tris = tessellate(&subpaths, FillRule::NonZero);
        let expected = std::f32::consts::PI * 100.0;
        assert!(
            (mesh_area(&tris) - expected).abs() / expected < 0.01,
            "area {}",
            mesh_area(&tris)
        );
    }

    #[test]
    fn test_open_subpath_is_implicitly_closed_for_fill() {
        let mut open = polyline(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        open.closed = false;
        let tris = tessellate(&[open], FillRule::NonZero);
        assert!((mesh_area(&tris) - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_rect_path_end_to_end() {
        let subpaths = flatten_path(&Path::rect(Rect::new(1.0, 1.0, 3.0, 2.0)), 0.25);
        let tris = tessellate(&subpaths, FillRule::EvenOdd);
        assert!((mesh_area(&tris) - 6.0).abs() < 1e-4);
    }
}

//! Core geometry value types
//!
//! Points, sizes, rectangles, and the affine transform that carries the CTM.
//! Pure value math; everything here is `Copy` and allocation-free.

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// 2D vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_points(from: Point, to: Point) -> Self {
        Self::new(to.x - from.x, to.y - from.y)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (z component of the 3D cross product).
    pub fn cross(&self, other: Vec2) -> f32 {
        self.x * other.y - self.y * other.x
    }

    /// Counter-clockwise perpendicular.
    pub fn perp(&self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn scale(&self, factor: f32) -> Vec2 {
        Vec2::new(self.x * factor, self.y * factor)
    }
}

impl std::ops::Add<Vec2> for Point {
    type Output = Point;

    fn add(self, v: Vec2) -> Point {
        Point::new(self.x + v.x, self.y + v.y)
    }
}

impl std::ops::Sub<Vec2> for Point {
    type Output = Point;

    fn sub(self, v: Vec2) -> Point {
        Point::new(self.x - v.x, self.y - v.y)
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Create a rect from two corner points.
    pub fn from_points(p1: Point, p2: Point) -> Self {
        let min_x = p1.x.min(p2.x);
        let min_y = p1.y.min(p2.y);
        let max_x = p1.x.max(p2.x);
        let max_y = p1.y.max(p2.y);
        Rect {
            origin: Point::new(min_x, min_y),
            size: Size::new(max_x - min_x, max_y - min_y),
        }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn max_x(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn max_y(&self) -> f32 {
        self.origin.y + self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.origin.is_finite() && self.size.width.is_finite() && self.size.height.is_finite()
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.max_x()
            && point.y >= self.origin.y
            && point.y <= self.max_y()
    }

    /// Smallest rect containing both.
    pub fn union(&self, other: &Rect) -> Self {
        let min_x = self.x().min(other.x());
        let min_y = self.y().min(other.y());
        let max_x = self.max_x().max(other.max_x());
        let max_y = self.max_y().max(other.max_y());
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// Overlapping region, if any.
    pub fn intersection(&self, other: &Rect) -> Option<Self> {
        let x = self.x().max(other.x());
        let y = self.y().max(other.y());
        let right = self.max_x().min(other.max_x());
        let bottom = self.max_y().min(other.max_y());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Expand to include a point.
    pub fn expand_to_include(&self, point: Point) -> Self {
        let min_x = self.x().min(point.x);
        let min_y = self.y().min(point.y);
        let max_x = self.max_x().max(point.x);
        let max_y = self.max_y().max(point.y);
        Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
    }

    /// The four corners, clockwise from the origin.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.origin,
            Point::new(self.max_x(), self.y()),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.x(), self.max_y()),
        ]
    }
}

/// Four device-space corner points.
///
/// A `Rect` mapped through an arbitrary affine transform is not a rect, so
/// image destinations cross the renderer boundary as quads.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Quad(pub [Point; 4]);

impl Quad {
    pub fn from_rect(rect: Rect) -> Self {
        Quad(rect.corners())
    }

    /// Axis-aligned bounding rect of the four corners.
    pub fn bounds(&self) -> Rect {
        let mut bounds = Rect::from_points(self.0[0], self.0[1]);
        bounds = bounds.expand_to_include(self.0[2]);
        bounds.expand_to_include(self.0[3])
    }
}

/// 2D affine transformation
///
/// Matrix elements `[a, b, c, d, tx, ty]`:
/// ```text
/// | a  c  tx |
/// | b  d  ty |
/// | 0  0   1 |
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub elements: [f32; 6],
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        elements: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self {
            elements: [a, b, c, d, tx, ty],
        }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            elements: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            elements: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    /// Rotation around the origin, angle in radians.
    pub fn rotation(angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self {
            elements: [c, s, -s, c, 0.0, 0.0],
        }
    }

    pub fn is_identity(&self) -> bool {
        self.elements == Self::IDENTITY.elements
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, c, d, tx, ty] = self.elements;
        Point::new(
            a * point.x + c * point.y + tx,
            b * point.x + d * point.y + ty,
        )
    }

    /// Map a rect through the transform and return the axis-aligned bounding
    /// rect of its corners.
    pub fn transform_rect(&self, rect: Rect) -> Rect {
        let [p0, p1, p2, p3] = rect.corners();
        let mut bounds = Rect::from_points(self.transform_point(p0), self.transform_point(p1));
        bounds = bounds.expand_to_include(self.transform_point(p2));
        bounds.expand_to_include(self.transform_point(p3))
    }

    pub fn transform_quad(&self, quad: Quad) -> Quad {
        Quad([
            self.transform_point(quad.0[0]),
            self.transform_point(quad.0[1]),
            self.transform_point(quad.0[2]),
            self.transform_point(quad.0[3]),
        ])
    }

    /// Concatenate this transform with another (self * other).
    /// The resulting transform first applies `other`, then `self`.
    pub fn then(&self, other: &Transform) -> Transform {
        let [a1, b1, c1, d1, tx1, ty1] = self.elements;
        let [a2, b2, c2, d2, tx2, ty2] = other.elements;

        Transform {
            elements: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * tx2 + c1 * ty2 + tx1,
                b1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }

    pub fn determinant(&self) -> f32 {
        let [a, b, c, d, _, _] = self.elements;
        a * d - b * c
    }

    /// Inverse transform, or `None` when the determinant is zero.
    pub fn invert(&self) -> Option<Transform> {
        let [a, b, c, d, tx, ty] = self.elements;
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        Some(Transform {
            elements: [
                d * inv_det,
                -b * inv_det,
                -c * inv_det,
                a * inv_det,
                (c * ty - d * tx) * inv_det,
                (b * tx - a * ty) * inv_det,
            ],
        })
    }

    /// Maximum axis scale factor: the larger of the two basis-vector lengths.
    ///
    /// Used to keep flattening tolerance visually correct after zoom.
    pub fn max_scale(&self) -> f32 {
        let [a, b, c, d, _, _] = self.elements;
        let sx = (a * a + b * b).sqrt();
        let sy = (c * c + d * d).sqrt();
        sx.max(sy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_near(p: Point, q: Point, eps: f32) {
        assert!(
            (p.x - q.x).abs() < eps && (p.y - q.y).abs() < eps,
            "{p:?} != {q:?}"
        );
    }

    #[test]
    fn test_identity_is_neutral() {
        let t = Transform::rotation(0.7).then(&Transform::translation(3.0, -2.0));
        assert_eq!(Transform::IDENTITY.then(&t), t);
        assert_eq!(t.then(&Transform::IDENTITY), t);
    }

    #[test]
    fn test_compose_matches_sequential_application() {
        // apply(compose(T2, T1), P) == apply(T2, apply(T1, P))
        let t1 = Transform::rotation(0.3).then(&Transform::scale(2.0, 0.5));
        let t2 = Transform::translation(5.0, 7.0).then(&Transform::rotation(-1.1));
        let p = Point::new(3.5, -4.25);

        let composed = t2.then(&t1);
        assert_point_near(
            composed.transform_point(p),
            t2.transform_point(t1.transform_point(p)),
            1e-4,
        );
    }

    #[test]
    fn test_composition_is_not_commutative() {
        let t1 = Transform::scale(2.0, 1.0);
        let t2 = Transform::translation(10.0, 0.0);
        let p = Point::new(1.0, 1.0);
        assert_ne!(
            t1.then(&t2).transform_point(p),
            t2.then(&t1).transform_point(p)
        );
    }

    #[test]
    fn test_invert_round_trip() {
        let t = Transform::translation(4.0, -1.0)
            .then(&Transform::rotation(0.9))
            .then(&Transform::scale(3.0, 0.25));
        let inv = t.invert().unwrap();
        let p = Point::new(-2.0, 6.0);
        assert_point_near(inv.transform_point(t.transform_point(p)), p, 1e-4);
    }

    #[test]
    fn test_singular_transform_has_no_inverse() {
        assert!(Transform::scale(0.0, 1.0).invert().is_none());
        assert!(Transform::scale(1.0, 0.0).invert().is_none());
    }

    #[test]
    fn test_max_scale() {
        assert_eq!(Transform::scale(2.0, 3.0).max_scale(), 3.0);
        // Rotation does not change scale.
        let s = Transform::rotation(1.2).then(&Transform::scale(2.0, 2.0));
        assert!((s.max_scale() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_rect_bounds() {
        let r = Rect::new(0.0, 0.0, 2.0, 1.0);
        let t = Transform::translation(1.0, 1.0);
        assert_eq!(t.transform_rect(r), Rect::new(1.0, 1.0, 2.0, 1.0));

        // 90 degree rotation swaps extents.
        let rot = Transform::rotation(std::f32::consts::FRAC_PI_2);
        let b = rot.transform_rect(r);
        assert!((b.width() - 1.0).abs() < 1e-5);
        assert!((b.height() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        let c = Rect::new(20.0, 20.0, 1.0, 1.0);
        assert_eq!(a.intersection(&c), None);
    }
}

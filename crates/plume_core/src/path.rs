//! Vector paths and the path builder
//!
//! A `Path` is an ordered command list describing one or more subpaths. It is
//! a plain value: cloning it at a paint boundary freezes the geometry, so a
//! stored snapshot is never affected by later mutation of the builder that
//! produced it.

use crate::error::{PaintError, Result};
use crate::geometry::{Point, Rect, Transform};

/// Path command for building vector paths
#[derive(Clone, Debug, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath at a point
    MoveTo(Point),
    /// Line to a point
    LineTo(Point),
    /// Quadratic Bézier curve
    QuadTo { control: Point, end: Point },
    /// Cubic Bézier curve
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Close the current subpath
    Close,
}

/// A vector path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create a new empty path
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Create a path from a vector of commands
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Move to a point
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    /// Line to a point
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    /// Quadratic Bézier curve
    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self
    }

    /// Cubic Bézier curve
    pub fn cubic_to(mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::CubicTo {
            control1: Point::new(cx1, cy1),
            control2: Point::new(cx2, cy2),
            end: Point::new(x, y),
        });
        self
    }

    /// Close the current subpath
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Create a rectangle path
    pub fn rect(rect: Rect) -> Self {
        Self::new()
            .move_to(rect.x(), rect.y())
            .line_to(rect.max_x(), rect.y())
            .line_to(rect.max_x(), rect.max_y())
            .line_to(rect.x(), rect.max_y())
            .close()
    }

    /// Create an ellipse path approximated by 4 cubic Bézier curves
    pub fn ellipse(center: Point, radius_x: f32, radius_y: f32) -> Self {
        // Magic number for cubic Bézier circle approximation
        let k = 0.5522847498;
        let (rx, ry) = (radius_x, radius_y);
        let (cx, cy) = (center.x, center.y);

        Self::new()
            .move_to(cx + rx, cy)
            .cubic_to(cx + rx, cy + ry * k, cx + rx * k, cy + ry, cx, cy + ry)
            .cubic_to(cx - rx * k, cy + ry, cx - rx, cy + ry * k, cx - rx, cy)
            .cubic_to(cx - rx, cy - ry * k, cx - rx * k, cy - ry, cx, cy - ry)
            .cubic_to(cx + rx * k, cy - ry, cx + rx, cy - ry * k, cx + rx, cy)
            .close()
    }

    /// Create a circle path
    pub fn circle(center: Point, radius: f32) -> Self {
        Self::ellipse(center, radius, radius)
    }

    /// Create a single line segment path
    pub fn line(from: Point, to: Point) -> Self {
        Self::new().move_to(from.x, from.y).line_to(to.x, to.y)
    }

    /// Create a rounded rectangle path
    pub fn rounded_rect(rect: Rect, radius: f32) -> Self {
        let x = rect.x();
        let y = rect.y();
        let w = rect.width();
        let h = rect.height();

        // Clamp radius to half the minimum dimension
        let r = radius.min(w.min(h) / 2.0).max(0.0);
        if r == 0.0 {
            return Self::rect(rect);
        }

        let k = 0.5522847498;

        Self::new()
            .move_to(x + r, y)
            .line_to(x + w - r, y)
            .cubic_to(x + w - r * (1.0 - k), y, x + w, y + r * (1.0 - k), x + w, y + r)
            .line_to(x + w, y + h - r)
            .cubic_to(
                x + w,
                y + h - r * (1.0 - k),
                x + w - r * (1.0 - k),
                y + h,
                x + w - r,
                y + h,
            )
            .line_to(x + r, y + h)
            .cubic_to(x + r * (1.0 - k), y + h, x, y + h - r * (1.0 - k), x, y + h - r)
            .line_to(x, y + r)
            .cubic_to(x, y + r * (1.0 - k), x + r * (1.0 - k), y, x + r, y)
            .close()
    }

    /// Get the path commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Map every coordinate of this path through a transform.
    pub fn transform(&self, transform: &Transform) -> Path {
        let commands = self
            .commands
            .iter()
            .map(|cmd| match cmd {
                PathCommand::MoveTo(p) => PathCommand::MoveTo(transform.transform_point(*p)),
                PathCommand::LineTo(p) => PathCommand::LineTo(transform.transform_point(*p)),
                PathCommand::QuadTo { control, end } => PathCommand::QuadTo {
                    control: transform.transform_point(*control),
                    end: transform.transform_point(*end),
                },
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => PathCommand::CubicTo {
                    control1: transform.transform_point(*control1),
                    control2: transform.transform_point(*control2),
                    end: transform.transform_point(*end),
                },
                PathCommand::Close => PathCommand::Close,
            })
            .collect();
        Path { commands }
    }

    /// Conservative bounding rectangle of this path.
    ///
    /// Control points are included, so the bounds may exceed the curve by up
    /// to the control-polygon margin.
    pub fn bounds(&self) -> Rect {
        let mut min_x = f32::INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut max_y = f32::NEG_INFINITY;

        let mut include = |p: &Point| {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        };

        for cmd in &self.commands {
            match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => include(p),
                PathCommand::QuadTo { control, end } => {
                    include(control);
                    include(end);
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => {
                    include(control1);
                    include(control2);
                    include(end);
                }
                PathCommand::Close => {}
            }
        }

        if min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite() {
            Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
        } else {
            Rect::ZERO
        }
    }
}

fn ensure_finite(points: &[Point]) -> Result<()> {
    if points.iter().all(Point::is_finite) {
        Ok(())
    } else {
        Err(PaintError::InvalidParameter("non-finite coordinate"))
    }
}

/// Builder for constructing paths with current-point tracking
///
/// Unlike the fluent `Path` constructors, the builder enforces the drawing
/// contract: a line or curve segment issued before any `move_to` fails with
/// `InvalidStateOperation`, and non-finite coordinates fail with
/// `InvalidParameter`. Failed calls leave the path under construction
/// untouched.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    path: Path,
    current: Option<Point>,
    subpath_start: Option<Point>,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f32, y: f32) -> Result<()> {
        let p = Point::new(x, y);
        ensure_finite(&[p])?;
        self.path.commands.push(PathCommand::MoveTo(p));
        self.current = Some(p);
        self.subpath_start = Some(p);
        Ok(())
    }

    /// Line to `(x, y)`.
    pub fn line_to(&mut self, x: f32, y: f32) -> Result<()> {
        let p = Point::new(x, y);
        ensure_finite(&[p])?;
        self.require_current()?;
        self.path.commands.push(PathCommand::LineTo(p));
        self.current = Some(p);
        Ok(())
    }

    /// Quadratic Bézier to `(x, y)` with control `(cx, cy)`.
    pub fn quad_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> Result<()> {
        let control = Point::new(cx, cy);
        let end = Point::new(x, y);
        ensure_finite(&[control, end])?;
        self.require_current()?;
        self.path.commands.push(PathCommand::QuadTo { control, end });
        self.current = Some(end);
        Ok(())
    }

    /// Cubic Bézier to `(x, y)` with controls `(cx1, cy1)` and `(cx2, cy2)`.
    pub fn cubic_to(&mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) -> Result<()> {
        let control1 = Point::new(cx1, cy1);
        let control2 = Point::new(cx2, cy2);
        let end = Point::new(x, y);
        ensure_finite(&[control1, control2, end])?;
        self.require_current()?;
        self.path.commands.push(PathCommand::CubicTo {
            control1,
            control2,
            end,
        });
        self.current = Some(end);
        Ok(())
    }

    /// Close the current subpath. A no-op when no subpath is open.
    pub fn close_subpath(&mut self) {
        if self.subpath_start.is_some() {
            self.path.commands.push(PathCommand::Close);
            // The current point moves back to the subpath start.
            self.current = self.subpath_start;
        }
    }

    /// Append a whole path (used for rect/ellipse appends).
    pub fn append_path(&mut self, other: &Path) {
        self.path.commands.extend_from_slice(&other.commands);
        // Track the trailing state of the appended commands.
        for cmd in &other.commands {
            match cmd {
                PathCommand::MoveTo(p) => {
                    self.current = Some(*p);
                    self.subpath_start = Some(*p);
                }
                PathCommand::LineTo(p) => self.current = Some(*p),
                PathCommand::QuadTo { end, .. } | PathCommand::CubicTo { end, .. } => {
                    self.current = Some(*end)
                }
                PathCommand::Close => self.current = self.subpath_start,
            }
        }
    }

    /// The current point, if a subpath has been started.
    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    /// The path built so far.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Discard the path under construction.
    pub fn clear(&mut self) {
        self.path.commands.clear();
        self.current = None;
        self.subpath_start = None;
    }

    /// Freeze the built path into an independent value copy.
    pub fn build(&self) -> Path {
        self.path.clone()
    }

    fn require_current(&self) -> Result<()> {
        if self.current.is_some() {
            Ok(())
        } else {
            Err(PaintError::InvalidStateOperation(
                "draw segment before a starting move",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_before_move_is_rejected() {
        let mut b = PathBuilder::new();
        let err = b.line_to(10.0, 10.0).unwrap_err();
        assert!(matches!(err, PaintError::InvalidStateOperation(_)));
        // The failed call left nothing behind.
        assert!(b.is_empty());
    }

    #[test]
    fn test_non_finite_coordinate_is_rejected() {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0).unwrap();
        let err = b.line_to(f32::NAN, 1.0).unwrap_err();
        assert!(matches!(err, PaintError::InvalidParameter(_)));
        assert_eq!(b.path().commands().len(), 1);
    }

    #[test]
    fn test_built_path_is_an_independent_copy() {
        let mut b = PathBuilder::new();
        b.move_to(0.0, 0.0).unwrap();
        b.line_to(1.0, 0.0).unwrap();
        let frozen = b.build();

        b.line_to(1.0, 1.0).unwrap();
        assert_eq!(frozen.commands().len(), 2);
        assert_eq!(b.path().commands().len(), 3);
    }

    #[test]
    fn test_close_restores_current_point() {
        let mut b = PathBuilder::new();
        b.move_to(2.0, 3.0).unwrap();
        b.line_to(5.0, 3.0).unwrap();
        b.close_subpath();
        assert_eq!(b.current_point(), Some(Point::new(2.0, 3.0)));
    }

    #[test]
    fn test_path_bounds() {
        let path = Path::rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(path.bounds(), Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(Path::new().bounds(), Rect::ZERO);
    }

    #[test]
    fn test_path_transform() {
        let path = Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let scaled = path.transform(&Transform::scale(2.0, 2.0));
        assert_eq!(scaled.bounds(), Rect::new(0.0, 0.0, 2.0, 2.0));
        // The original is untouched.
        assert_eq!(path.bounds(), Rect::new(0.0, 0.0, 1.0, 1.0));
    }
}

//! Plume Core
//!
//! Foundational value types for the Plume 2D vector drawing engine:
//!
//! - **Geometry**: points, sizes, rectangles, quads, affine transforms
//! - **Paths**: command lists, fluent constructors, and a checked builder
//! - **Paint**: colors, gradients, brushes, strokes, shadows, blend modes
//! - **Errors**: the `PaintError` contract-violation taxonomy
//!
//! Everything here is plain value data. The geometry pipeline lives in
//! `plume_geom` and the drawing context in `plume_paint`.
//!
//! # Example
//!
//! ```rust
//! use plume_core::{Path, Point, Rect, Transform};
//!
//! let square = Path::rect(Rect::new(0.0, 0.0, 1.0, 1.0));
//! let doubled = square.transform(&Transform::scale(2.0, 2.0));
//! assert_eq!(doubled.bounds(), Rect::new(0.0, 0.0, 2.0, 2.0));
//! ```

pub mod color;
pub mod error;
pub mod geometry;
pub mod image;
pub mod paint;
pub mod path;

pub use color::{Color, Gradient, GradientStop};
pub use error::{PaintError, Result};
pub use geometry::{Point, Quad, Rect, Size, Transform, Vec2};
pub use image::{Image, ImageFit, ImageId, Interpolation};
pub use paint::{shadow_presets, BlendMode, Brush, LineCap, LineJoin, Shadow, Stroke};
pub use path::{Path, PathBuilder, PathCommand};

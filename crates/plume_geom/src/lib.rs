//! Plume Geometry
//!
//! The geometry pipeline between paths and renderers: curve flattening,
//! fill tessellation, dash splitting, and stroke outline generation. Input
//! is resolution-independent path data from `plume_core`; output is flat
//! polylines and triangle lists a renderer can consume directly.
//!
//! # Example
//!
//! ```rust
//! use plume_core::{Path, Point};
//! use plume_geom::{flatten_path, tessellate, FillRule, DEFAULT_TOLERANCE};
//!
//! let circle = Path::circle(Point::new(0.0, 0.0), 10.0);
//! let subpaths = flatten_path(&circle, DEFAULT_TOLERANCE);
//! let triangles = tessellate(&subpaths, FillRule::NonZero);
//! assert!(!triangles.is_empty());
//! ```

pub mod dash;
pub mod flatten;
pub mod stroke;
pub mod tessellate;

pub use dash::split_dashes;
pub use flatten::{flatten_cubic, flatten_path, flatten_quad, Polyline, DEFAULT_TOLERANCE};
pub use stroke::stroke_outline;
pub use tessellate::{mesh_area, tessellate, triangle_area, FillRule, Triangle};

//! Plume Paint
//!
//! The stateful drawing layer of the Plume engine: the graphics state stack,
//! the renderer contract, and the immediate-mode `DrawingContext` that turns
//! path and paint commands into device-space submissions.
//!
//! A context is bound to exactly one [`Renderer`] at construction. Backends
//! implement the trait; [`RecordingRenderer`] is the in-tree sink used by
//! the test suites.

pub mod context;
pub mod renderer;
pub mod state;

pub use context::DrawingContext;
pub use renderer::{
    MaterializeFuture, PixelBuffer, RecordingRenderer, Renderer, Submission, TriangleMesh,
};
pub use state::{GraphicsState, StateSnapshot, StateStack};

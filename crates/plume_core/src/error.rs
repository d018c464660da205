//! Error taxonomy for the drawing engine
//!
//! Only contract violations are errors. Degenerate geometry (zero-area fill,
//! zero-length stroke segment) is absorbed where it occurs and yields empty
//! output instead of surfacing here.

use thiserror::Error;

/// Errors surfaced synchronously at the call that violated the contract.
///
/// A failed call leaves all previously established state untouched; there is
/// no partial mutation of the graphics state stack.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaintError {
    /// A parameter was outside its contract: zero or negative stroke width,
    /// non-finite coordinates, a malformed gradient stop list.
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// A stack-discipline violation: restore on the base frame, mismatched
    /// transparency-layer end, or a draw segment before a starting move.
    #[error("invalid state operation: {0}")]
    InvalidStateOperation(&'static str),
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PaintError>;

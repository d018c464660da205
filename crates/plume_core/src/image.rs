//! Image handles
//!
//! The engine never touches pixels; an image is an opaque handle plus the
//! dimensions the drawing context needs for tiling math.

/// Handle to an externally managed image
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(pub u64);

/// An opaque pixel source with known dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(id: ImageId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }

    /// An image with a zero dimension has no pixels to sample; tiling logic
    /// must bail out before entering any dimension-bounded loop.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// How an image maps onto its destination rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ImageFit {
    /// Stretch to fill the destination exactly
    #[default]
    Fill,
    /// Repeat at natural size from the destination origin
    Tile,
}

/// Sampling mode requested from the renderer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    Nearest,
    #[default]
    Linear,
}

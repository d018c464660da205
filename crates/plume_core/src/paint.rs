//! Paint attributes: brushes, strokes, shadows, blend modes

use crate::color::{Color, Gradient};
use crate::geometry::Vec2;

/// Brush for filling or stroking shapes
///
/// Opaque to the geometry layer: tessellation produces positions only, and
/// the brush travels alongside the mesh to the renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum Brush {
    Solid(Color),
    Gradient(Gradient),
}

impl From<Color> for Brush {
    fn from(color: Color) -> Self {
        Brush::Solid(color)
    }
}

impl From<Gradient> for Brush {
    fn from(gradient: Gradient) -> Self {
        Brush::Gradient(gradient)
    }
}

impl Default for Brush {
    fn default() -> Self {
        Brush::Solid(Color::BLACK)
    }
}

/// Line cap style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    /// Flat cap at the endpoint
    #[default]
    Butt,
    /// Rounded cap extending past the endpoint
    Round,
    /// Square cap extending past the endpoint
    Square,
}

/// Line join style
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineJoin {
    /// Miter join (sharp corner)
    #[default]
    Miter,
    /// Round join
    Round,
    /// Bevel join (flat corner)
    Bevel,
}

/// Stroke style configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Line width
    pub width: f32,
    /// Line cap style
    pub cap: LineCap,
    /// Line join style
    pub join: LineJoin,
    /// Miter limit: maximum ratio of miter length to stroke width
    pub miter_limit: f32,
    /// Dash pattern of alternating on/off run lengths (empty for solid)
    pub dash: Vec<f32>,
    /// Offset into the dash pattern
    pub dash_offset: f32,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            miter_limit: 4.0,
            dash: Vec::new(),
            dash_offset: 0.0,
        }
    }
}

impl Stroke {
    /// Create a new stroke with the given width
    pub fn new(width: f32) -> Self {
        Self {
            width,
            ..Default::default()
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = limit;
        self
    }

    pub fn with_dash(mut self, pattern: Vec<f32>, offset: f32) -> Self {
        self.dash = pattern;
        self.dash_offset = offset;
        self
    }
}

/// Blend mode for compositing paints
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
}

/// Shadow configuration
///
/// "No shadow" is represented as `Option<Shadow>::None` at the state layer;
/// a shadow with zero blur is still a shadow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    pub offset: Vec2,
    pub blur: f32,
    pub color: Color,
}

impl Shadow {
    pub fn new(offset_x: f32, offset_y: f32, blur: f32, color: Color) -> Self {
        Self {
            offset: Vec2::new(offset_x, offset_y),
            blur,
            color,
        }
    }
}

/// Shadow presets for convenience
pub mod shadow_presets {
    use super::*;

    /// Small shadow (1px offset, 2px blur)
    pub fn sm() -> Shadow {
        Shadow::new(0.0, 1.0, 2.0, Color::BLACK.with_alpha(0.1))
    }

    /// Medium shadow (4px offset, 6px blur)
    pub fn md() -> Shadow {
        Shadow::new(0.0, 4.0, 6.0, Color::BLACK.with_alpha(0.1))
    }

    /// Large shadow (10px offset, 15px blur)
    pub fn lg() -> Shadow {
        Shadow::new(0.0, 10.0, 15.0, Color::BLACK.with_alpha(0.1))
    }
}

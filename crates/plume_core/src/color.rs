//! Colors and gradients

use crate::geometry::Point;

/// RGBA color (linear space)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Gradient stop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0)
    pub offset: f32,
    /// Color at this stop
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Gradient descriptor
///
/// Coordinates are in path-construction (user) space; the drawing context
/// applies the CTM before the gradient reaches a renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum Gradient {
    /// Linear gradient between two points
    Linear {
        start: Point,
        end: Point,
        /// Color stops, sorted by offset
        stops: Vec<GradientStop>,
        /// Extend the first stop's color before `start`
        extend_start: bool,
        /// Extend the last stop's color past `end`
        extend_end: bool,
    },
    /// Radial gradient between two circles
    Radial {
        start_center: Point,
        start_radius: f32,
        end_center: Point,
        end_radius: f32,
        /// Color stops, sorted by offset
        stops: Vec<GradientStop>,
        extend_start: bool,
        extend_end: bool,
    },
}

impl Gradient {
    /// Create a simple two-color linear gradient
    pub fn linear(start: Point, end: Point, from: Color, to: Color) -> Self {
        Gradient::Linear {
            start,
            end,
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
            extend_start: true,
            extend_end: true,
        }
    }

    /// Create a simple two-color radial gradient from a point to a circle
    pub fn radial(center: Point, radius: f32, from: Color, to: Color) -> Self {
        Gradient::Radial {
            start_center: center,
            start_radius: 0.0,
            end_center: center,
            end_radius: radius,
            stops: vec![GradientStop::new(0.0, from), GradientStop::new(1.0, to)],
            extend_start: true,
            extend_end: true,
        }
    }

    /// Get the gradient stops
    pub fn stops(&self) -> &[GradientStop] {
        match self {
            Gradient::Linear { stops, .. } => stops,
            Gradient::Radial { stops, .. } => stops,
        }
    }

    /// A stop list is well formed when it is non-empty, every offset is
    /// finite and within `[0, 1]`, and offsets are non-decreasing.
    pub fn stops_are_valid(stops: &[GradientStop]) -> bool {
        if stops.is_empty() {
            return false;
        }
        let mut prev = 0.0f32;
        for stop in stops {
            if !stop.offset.is_finite() || !(0.0..=1.0).contains(&stop.offset) {
                return false;
            }
            if stop.offset < prev {
                return false;
            }
            prev = stop.offset;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = Color::from_hex(0xFF8000);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.g - 0.5019608).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
        assert_eq!(c.a, 1.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(Color::lerp(&Color::BLACK, &Color::WHITE, 0.0), Color::BLACK);
        assert_eq!(Color::lerp(&Color::BLACK, &Color::WHITE, 1.0), Color::WHITE);
    }

    #[test]
    fn test_stop_validation() {
        let good = vec![
            GradientStop::new(0.0, Color::RED),
            GradientStop::new(0.5, Color::GREEN),
            GradientStop::new(1.0, Color::BLUE),
        ];
        assert!(Gradient::stops_are_valid(&good));

        assert!(!Gradient::stops_are_valid(&[]));
        assert!(!Gradient::stops_are_valid(&[GradientStop::new(1.5, Color::RED)]));
        assert!(!Gradient::stops_are_valid(&[
            GradientStop::new(0.8, Color::RED),
            GradientStop::new(0.2, Color::BLUE),
        ]));
        assert!(!Gradient::stops_are_valid(&[GradientStop::new(
            f32::NAN,
            Color::RED
        )]));
    }
}

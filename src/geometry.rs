//! Shared geometric and color primitives used across scene, editor and render modules.

/// Fraction of the container an image may occupy after fitting.
pub const DEFAULT_FIT_MARGIN: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Point {
        center_position(f64::from(self.width), f64::from(self.height))
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from a CSS-style alpha fraction, `rgba(255, 0, 0, 0.5)`.
    pub fn with_alpha(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b, a }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn alpha(self) -> f64 {
        f64::from(self.a) / 255.0
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Scale that fits an `obj_w` x `obj_h` box into `bounds_w` x `bounds_h`, shrunk by `margin`.
///
/// Returns `None` for zero or non-finite object dimensions; callers must not place an
/// object with a degenerate scale.
pub fn fit_scale(obj_w: f64, obj_h: f64, bounds_w: f64, bounds_h: f64, margin: f64) -> Option<f64> {
    if !(obj_w.is_finite() && obj_h.is_finite()) || obj_w <= 0.0 || obj_h <= 0.0 {
        return None;
    }
    let scale = (bounds_w / obj_w).min(bounds_h / obj_h) * margin;
    scale.is_finite().then_some(scale)
}

pub fn center_position(bounds_w: f64, bounds_h: f64) -> Point {
    Point::new(bounds_w / 2.0, bounds_h / 2.0)
}

/// Rotates `point` around `origin` by `degrees`, clockwise in screen space.
pub fn rotate_point(point: Point, origin: Point, degrees: f64) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let dx = point.x - origin.x;
    let dy = point.y - origin.y;
    Point::new(
        origin.x + dx * cos - dy * sin,
        origin.y + dx * sin + dy * cos,
    )
}

/// Ray-casting containment test for a closed polygon.
pub fn polygon_contains(points: &[Point], target: Point) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut previous = points[points.len() - 1];
    for &current in points {
        let crosses = (current.y > target.y) != (previous.y > target.y);
        if crosses {
            let x_at_y = (previous.x - current.x) * (target.y - current.y)
                / (previous.y - current.y)
                + current.x;
            if target.x < x_at_y {
                inside = !inside;
            }
        }
        previous = current;
    }
    inside
}

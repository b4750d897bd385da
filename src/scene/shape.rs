use crate::geometry::{Color, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Triangle,
    Polygon,
}

impl ShapeKind {
    /// Maps a toolbar subtype name to a shape. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rectangle" | "rect" => Some(Self::Rectangle),
            "circle" => Some(Self::Circle),
            "triangle" => Some(Self::Triangle),
            "polygon" | "star" => Some(Self::Polygon),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Triangle => "triangle",
            Self::Polygon => "polygon",
        }
    }

    /// Translucent fill that distinguishes each subtype.
    pub fn default_fill(self) -> Color {
        match self {
            Self::Rectangle => Color::with_alpha(255, 0, 0, 0.5),
            Self::Circle => Color::with_alpha(0, 255, 0, 0.5),
            Self::Triangle => Color::with_alpha(0, 0, 255, 0.5),
            Self::Polygon => Color::with_alpha(255, 255, 0, 0.5),
        }
    }
}

/// Star outline in its authoring frame; the first vertex sits at the local origin.
pub const STAR_OUTLINE: [(f64, f64); 10] = [
    (0.0, 0.0),
    (30.0, -50.0),
    (60.0, 0.0),
    (110.0, -10.0),
    (70.0, 30.0),
    (85.0, 80.0),
    (30.0, 50.0),
    (-25.0, 80.0),
    (-10.0, 30.0),
    (-50.0, -10.0),
];

pub const RECTANGLE_SIZE: (f64, f64) = (100.0, 80.0);
pub const CIRCLE_RADIUS: f64 = 50.0;
pub const TRIANGLE_SIZE: (f64, f64) = (100.0, 100.0);

/// Shape payload of a scene object. Geometry is expressed around the object center.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle,
    Circle,
    Triangle,
    Polygon(Vec<Point>),
}

impl Shape {
    pub const fn kind(&self) -> ShapeKind {
        match self {
            Self::Rectangle => ShapeKind::Rectangle,
            Self::Circle => ShapeKind::Circle,
            Self::Triangle => ShapeKind::Triangle,
            Self::Polygon(_) => ShapeKind::Polygon,
        }
    }

    /// Outline in the object's local frame (origin at center, unscaled) for a
    /// `width` x `height` box.
    ///
    /// Rectangles and circles report their bounding box and are tested analytically.
    pub fn outline(&self, width: f64, height: f64) -> Vec<Point> {
        let half_w = width / 2.0;
        let half_h = height / 2.0;
        match self {
            Self::Rectangle | Self::Circle => vec![
                Point::new(-half_w, -half_h),
                Point::new(half_w, -half_h),
                Point::new(half_w, half_h),
                Point::new(-half_w, half_h),
            ],
            Self::Triangle => vec![
                Point::new(0.0, -half_h),
                Point::new(half_w, half_h),
                Point::new(-half_w, half_h),
            ],
            Self::Polygon(points) => points.clone(),
        }
    }
}

/// Re-centers an outline on its bounding-box center. Returns the centered points and box size.
pub fn centered_outline(points: &[(f64, f64)]) -> (Vec<Point>, f64, f64) {
    if points.is_empty() {
        return (Vec::new(), 0.0, 0.0);
    }
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for &(x, y) in points {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;
    let centered = points
        .iter()
        .map(|&(x, y)| Point::new(x - center_x, y - center_y))
        .collect();
    (centered, max_x - min_x, max_y - min_y)
}

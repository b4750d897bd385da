//! Scene object model: drawable entities, their factories and the render stack.

mod bitmap;
mod factory;
mod shape;
mod stack;
mod text;

pub use crate::geometry::{Color, Point, Size};
pub use bitmap::{decode_image, ImageContent, ImagePixels, LoadError, LoadResult};
pub use factory::{
    create_image_object, create_shape_object, create_text_object, DEFAULT_TEXT_CONTENT,
    DEFAULT_TEXT_FONT_FAMILY, DEFAULT_TEXT_FONT_SIZE,
};
pub use shape::{centered_outline, Shape, ShapeKind, STAR_OUTLINE};
pub use stack::{SceneStack, StackEntry};
pub use text::{TextAlign, TextContent};

#[cfg(test)]
pub(crate) use bitmap::encoded_png;

use crate::geometry::rotate_point;
use crate::layers::LayerKind;

/// Stable identity of a scene object, allocated at creation and never reused in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Image(ImageContent),
    Text(TextContent),
    Shape(Shape),
}

/// Center-origin placement: `center` is the object's centroid on the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub center: Point,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees around `center`.
    pub angle: f64,
    pub scale: f64,
}

impl Geometry {
    pub const fn new(center: Point, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
            angle: 0.0,
            scale: 1.0,
        }
    }

    pub fn scaled_width(&self) -> f64 {
        self.width * self.scale
    }

    pub fn scaled_height(&self) -> f64 {
        self.height * self.scale
    }

    /// Maps a surface point into the unscaled, unrotated frame centered on the object.
    pub fn to_local(&self, point: Point) -> Point {
        let unrotated = rotate_point(point, self.center, -self.angle);
        let scale = if self.scale.abs() < f64::EPSILON {
            f64::EPSILON
        } else {
            self.scale
        };
        Point::new(
            (unrotated.x - self.center.x) / scale,
            (unrotated.y - self.center.y) / scale,
        )
    }

    /// Inverse of [`Geometry::to_local`].
    pub fn to_surface(&self, local: Point) -> Point {
        let scaled = Point::new(
            self.center.x + local.x * self.scale,
            self.center.y + local.y * self.scale,
        );
        rotate_point(scaled, self.center, self.angle)
    }

    /// Bounding-box corners on the surface: top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [Point; 4] {
        let half_w = self.width / 2.0;
        let half_h = self.height / 2.0;
        [
            self.to_surface(Point::new(-half_w, -half_h)),
            self.to_surface(Point::new(half_w, -half_h)),
            self.to_surface(Point::new(half_w, half_h)),
            self.to_surface(Point::new(-half_w, half_h)),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Color,
    pub stroke: Option<Stroke>,
    pub opacity: f64,
    pub shadow: Option<Shadow>,
}

impl Style {
    pub const fn filled(fill: Color) -> Self {
        Self {
            fill,
            stroke: None,
            opacity: 1.0,
            shadow: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interactivity {
    pub selectable: bool,
    /// Whether resize/rotate handles are offered once selected.
    pub has_controls: bool,
}

impl Interactivity {
    pub const INTERACTIVE: Self = Self {
        selectable: true,
        has_controls: true,
    };
    pub const LOCKED: Self = Self {
        selectable: false,
        has_controls: false,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub geometry: Geometry,
    pub style: Style,
    pub interactivity: Interactivity,
}

impl SceneObject {
    pub const fn layer_kind(&self) -> LayerKind {
        match self.kind {
            ObjectKind::Image(_) => LayerKind::Image,
            ObjectKind::Text(_) => LayerKind::Text,
            ObjectKind::Shape(_) => LayerKind::Shape,
        }
    }

    pub const fn is_background(&self) -> bool {
        matches!(self.kind, ObjectKind::Image(_))
    }

    pub const fn is_selectable(&self) -> bool {
        self.interactivity.selectable
    }

    pub fn as_text(&self) -> Option<&TextContent> {
        match &self.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextContent> {
        match &mut self.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match &self.kind {
            ObjectKind::Shape(shape) => Some(shape),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageContent> {
        match &self.kind {
            ObjectKind::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Re-derives the intrinsic box of a text object after its content changed.
    pub fn refresh_text_bounds(&mut self) {
        if let ObjectKind::Text(text) = &self.kind {
            let (width, height) = text.measure();
            self.geometry.width = width;
            self.geometry.height = height;
        }
    }
}

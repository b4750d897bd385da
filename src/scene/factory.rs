use super::shape::{CIRCLE_RADIUS, RECTANGLE_SIZE, TRIANGLE_SIZE};
use super::*;
use crate::geometry::fit_scale;

pub const DEFAULT_TEXT_CONTENT: &str = "Edit this text";
pub const DEFAULT_TEXT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_TEXT_FONT_SIZE: f64 = 30.0;
const DEFAULT_TEXT_STROKE_WIDTH: f64 = 1.0;
const DEFAULT_TEXT_SHADOW_BLUR: f64 = 5.0;
const DEFAULT_TEXT_SHADOW_OFFSET: f64 = 2.0;

/// Places decoded pixels as the locked background, fit and centered inside `bounds`.
pub fn create_image_object(
    id: ObjectId,
    source_url: impl Into<String>,
    pixels: ImagePixels,
    bounds: Size,
    margin: f64,
) -> LoadResult<SceneObject> {
    let source_url = source_url.into();
    let width = f64::from(pixels.width);
    let height = f64::from(pixels.height);
    let scale = fit_scale(
        width,
        height,
        f64::from(bounds.width),
        f64::from(bounds.height),
        margin,
    )
    .ok_or_else(|| LoadError::Empty {
        url: source_url.clone(),
    })?;

    let mut geometry = Geometry::new(bounds.center(), width, height);
    geometry.scale = scale;
    Ok(SceneObject {
        id,
        kind: ObjectKind::Image(ImageContent { source_url, pixels }),
        geometry,
        style: Style::filled(Color::WHITE),
        interactivity: Interactivity::LOCKED,
    })
}

pub fn create_text_object(id: ObjectId, bounds: Size) -> SceneObject {
    let text = TextContent::new(
        DEFAULT_TEXT_CONTENT,
        DEFAULT_TEXT_FONT_FAMILY,
        DEFAULT_TEXT_FONT_SIZE,
        TextAlign::Center,
    );
    let (width, height) = text.measure();
    SceneObject {
        id,
        kind: ObjectKind::Text(text),
        geometry: Geometry::new(bounds.center(), width, height),
        style: Style {
            fill: Color::WHITE,
            stroke: Some(Stroke {
                color: Color::BLACK,
                width: DEFAULT_TEXT_STROKE_WIDTH,
            }),
            opacity: 1.0,
            shadow: Some(Shadow {
                color: Color::with_alpha(0, 0, 0, 0.5),
                blur: DEFAULT_TEXT_SHADOW_BLUR,
                offset_x: DEFAULT_TEXT_SHADOW_OFFSET,
                offset_y: DEFAULT_TEXT_SHADOW_OFFSET,
            }),
        },
        interactivity: Interactivity::INTERACTIVE,
    }
}

/// Builds a default shape for a toolbar subtype name; unknown names produce nothing.
pub fn create_shape_object(id: ObjectId, subtype: &str, bounds: Size) -> Option<SceneObject> {
    let Some(kind) = ShapeKind::parse(subtype) else {
        tracing::debug!(subtype, "ignoring unsupported shape subtype");
        return None;
    };

    let (shape, width, height) = match kind {
        ShapeKind::Rectangle => (Shape::Rectangle, RECTANGLE_SIZE.0, RECTANGLE_SIZE.1),
        ShapeKind::Circle => (Shape::Circle, CIRCLE_RADIUS * 2.0, CIRCLE_RADIUS * 2.0),
        ShapeKind::Triangle => (Shape::Triangle, TRIANGLE_SIZE.0, TRIANGLE_SIZE.1),
        ShapeKind::Polygon => {
            let (points, width, height) = centered_outline(&STAR_OUTLINE);
            (Shape::Polygon(points), width, height)
        }
    };

    Some(SceneObject {
        id,
        kind: ObjectKind::Shape(shape),
        geometry: Geometry::new(bounds.center(), width, height),
        style: Style::filled(kind.default_fill()),
        interactivity: Interactivity::INTERACTIVE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DEFAULT_FIT_MARGIN;

    fn pixels(width: u32, height: u32) -> ImagePixels {
        ImagePixels::from_rgba(image::RgbaImage::new(width, height))
    }

    #[test]
    fn image_object_is_fit_centered_and_locked() {
        let object = create_image_object(
            ObjectId::new(1),
            "https://example.test/photo.jpg",
            pixels(1600, 900),
            Size::new(800, 600),
            DEFAULT_FIT_MARGIN,
        )
        .expect("image should be placed");

        assert_eq!(object.geometry.center, Point::new(400.0, 300.0));
        assert!((object.geometry.scale - 0.45).abs() < 1e-9);
        assert!(object.geometry.scaled_width() <= 800.0);
        assert!(!object.is_selectable());
        assert!(!object.interactivity.has_controls);
        assert!(object.is_background());
    }

    #[test]
    fn image_object_rejects_empty_pixels() {
        let err = create_image_object(
            ObjectId::new(1),
            "mem://empty",
            pixels(0, 10),
            Size::new(800, 600),
            DEFAULT_FIT_MARGIN,
        )
        .expect_err("zero width cannot be fit");
        assert!(matches!(err, LoadError::Empty { .. }));
    }

    #[test]
    fn text_object_uses_caption_defaults() {
        let object = create_text_object(ObjectId::new(2), Size::new(800, 600));
        let text = object.as_text().expect("text payload");
        assert_eq!(text.content, "Edit this text");
        assert_eq!(text.font_family, "Arial");
        assert!((text.font_size - 30.0).abs() < f64::EPSILON);
        assert_eq!(text.align, TextAlign::Center);
        assert_eq!(object.style.fill, Color::WHITE);
        assert_eq!(
            object.style.stroke,
            Some(Stroke {
                color: Color::BLACK,
                width: 1.0
            })
        );
        assert!(object.style.shadow.is_some());
        assert_eq!(object.geometry.center, Point::new(400.0, 300.0));
        assert!(object.is_selectable());
    }

    #[test]
    fn shape_objects_use_fixed_dimensions() {
        let bounds = Size::new(800, 600);
        let rect = create_shape_object(ObjectId::new(3), "rectangle", bounds).unwrap();
        assert_eq!((rect.geometry.width, rect.geometry.height), (100.0, 80.0));
        let circle = create_shape_object(ObjectId::new(4), "circle", bounds).unwrap();
        assert_eq!((circle.geometry.width, circle.geometry.height), (100.0, 100.0));
        let triangle = create_shape_object(ObjectId::new(5), "triangle", bounds).unwrap();
        assert_eq!(triangle.as_shape(), Some(&Shape::Triangle));
        let star = create_shape_object(ObjectId::new(6), "polygon", bounds).unwrap();
        assert!(matches!(star.as_shape(), Some(Shape::Polygon(points)) if points.len() == 10));
        assert_eq!(star.geometry.center, Point::new(400.0, 300.0));
    }

    #[test]
    fn unsupported_shape_subtype_is_ignored() {
        assert!(create_shape_object(ObjectId::new(7), "hexagon", Size::new(10, 10)).is_none());
    }
}

use crate::geometry::{Color, Point, Size};
use crate::scene::{
    Geometry, ObjectKind, SceneObject, Shadow, Shape, Style, TextAlign, TextContent,
};

/// Baseline offset below the middle of a line box, as a fraction of the font size.
const BASELINE_FACTOR: f64 = 0.35;
const SHADOW_FILTER_ID: &str = "shadow";

/// Standalone SVG document (surface-sized) drawing a single vector object.
///
/// Image objects are composited directly and yield `None`.
pub(crate) fn object_document(object: &SceneObject, surface: Size) -> Option<String> {
    let body = match &object.kind {
        ObjectKind::Image(_) => return None,
        ObjectKind::Shape(shape) => shape_element(shape, &object.geometry, &object.style),
        ObjectKind::Text(text) => text_element(text, &object.geometry, &object.style),
    };

    let mut doc = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
            r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ),
        w = surface.width.max(1),
        h = surface.height.max(1),
    );
    if let Some(shadow) = object.style.shadow {
        doc.push_str(&shadow_filter(shadow));
        doc.push_str(&format!(r#"<g filter="url(#{SHADOW_FILTER_ID})">"#));
    }
    doc.push_str(&format!(
        r#"<g transform="{}" opacity="{}">"#,
        transform_attr(&object.geometry),
        num(object.style.opacity.clamp(0.0, 1.0)),
    ));
    doc.push_str(&body);
    doc.push_str("</g>");
    if object.style.shadow.is_some() {
        doc.push_str("</g>");
    }
    doc.push_str("</svg>");
    Some(doc)
}

fn shadow_filter(shadow: Shadow) -> String {
    format!(
        concat!(
            r#"<defs><filter id="{id}" x="-50%" y="-50%" width="200%" height="200%">"#,
            r#"<feDropShadow dx="{dx}" dy="{dy}" stdDeviation="{sd}" "#,
            r#"flood-color="{color}" flood-opacity="{alpha}"/>"#,
            "</filter></defs>"
        ),
        id = SHADOW_FILTER_ID,
        dx = num(shadow.offset_x),
        dy = num(shadow.offset_y),
        sd = num((shadow.blur / 2.0).max(0.0)),
        color = shadow.color.to_hex(),
        alpha = num(shadow.color.alpha()),
    )
}

fn transform_attr(geometry: &Geometry) -> String {
    format!(
        "translate({} {}) rotate({}) scale({})",
        num(geometry.center.x),
        num(geometry.center.y),
        num(geometry.angle),
        num(geometry.scale),
    )
}

fn paint_attrs(style: &Style) -> String {
    let mut attrs = paint("fill", style.fill);
    match style.stroke {
        Some(stroke) if stroke.width > 0.0 => {
            attrs.push(' ');
            attrs.push_str(&paint("stroke", stroke.color));
            attrs.push_str(&format!(r#" stroke-width="{}""#, num(stroke.width)));
        }
        _ => attrs.push_str(r#" stroke="none""#),
    }
    attrs
}

fn paint(attr: &str, color: Color) -> String {
    format!(
        r#"{attr}="{}" {attr}-opacity="{}""#,
        color.to_hex(),
        num(color.alpha())
    )
}

fn shape_element(shape: &Shape, geometry: &Geometry, style: &Style) -> String {
    let paint = paint_attrs(style);
    let (w, h) = (geometry.width, geometry.height);
    match shape {
        Shape::Rectangle => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" {paint}/>"#,
            num(-w / 2.0),
            num(-h / 2.0),
            num(w),
            num(h),
        ),
        Shape::Circle => format!(
            r#"<ellipse cx="0" cy="0" rx="{}" ry="{}" {paint}/>"#,
            num(w / 2.0),
            num(h / 2.0),
        ),
        Shape::Triangle | Shape::Polygon(_) => format!(
            r#"<polygon points="{}" {paint}/>"#,
            points_attr(&shape.outline(w, h)),
        ),
    }
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", num(point.x), num(point.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn text_element(text: &TextContent, geometry: &Geometry, style: &Style) -> String {
    let half_w = geometry.width / 2.0;
    let top = -geometry.height / 2.0;
    let x = match text.align {
        TextAlign::Left => -half_w,
        TextAlign::Center => 0.0,
        TextAlign::Right => half_w,
    };
    let line_height = text.line_height();

    let mut out = format!(
        r#"<text font-family="{}" font-size="{}" text-anchor="{}" xml:space="preserve" {}>"#,
        escape_xml(&text.font_family),
        num(text.font_size),
        text.align.svg_anchor(),
        paint_attrs(style),
    );
    for (index, line) in text.lines().iter().enumerate() {
        let baseline = top + (index as f64 + 0.5) * line_height + BASELINE_FACTOR * text.font_size;
        out.push_str(&format!(
            r#"<tspan x="{}" y="{}">{}</tspan>"#,
            num(x),
            num(baseline),
            escape_xml(line),
        ));
    }
    out.push_str("</text>");
    out
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Finite numbers only; SVG rejects `NaN` and `inf`.
fn num(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{rounded}")
    }
}

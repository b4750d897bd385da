//! Selection box, transform handles and text caret drawn over the composited scene.

use resvg::tiny_skia::{
    Color as SkiaColor, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::editor::{control_points, HANDLE_SIZE};
use crate::geometry::Point;
use crate::scene::SceneStack;
use crate::state::InteractionState;

const CHROME_COLOR: (u8, u8, u8, u8) = (102, 153, 255, 191);
const OUTLINE_WIDTH: f32 = 1.5;
const CARET_WIDTH: f32 = 2.0;

fn chrome_paint() -> Paint<'static> {
    let (r, g, b, a) = CHROME_COLOR;
    let mut paint = Paint::default();
    paint.set_color(SkiaColor::from_rgba8(r, g, b, a));
    paint.anti_alias = true;
    paint
}

fn polyline(points: &[Point], close: bool) -> Option<resvg::tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.x as f32, first.y as f32);
    for point in rest {
        builder.line_to(point.x as f32, point.y as f32);
    }
    if close {
        builder.close();
    }
    builder.finish()
}

fn stroke(pixmap: &mut Pixmap, points: &[Point], close: bool, width: f32, paint: &Paint<'_>) {
    if let Some(path) = polyline(points, close) {
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
}

/// Draws chrome for the active object of `state`. Returns whether anything was drawn.
pub(crate) fn draw_selection(
    pixmap: &mut Pixmap,
    stack: &SceneStack,
    state: InteractionState,
) -> bool {
    let Some(object) = state.active_object().and_then(|id| stack.get(id)) else {
        return false;
    };
    let paint = chrome_paint();
    let controls = control_points(&object.geometry);

    stroke(pixmap, &controls.corners, true, OUTLINE_WIDTH, &paint);

    if object.interactivity.has_controls {
        let half = (HANDLE_SIZE / 2.0) as f32;
        for corner in controls.corners {
            let rect = Rect::from_xywh(
                corner.x as f32 - half,
                corner.y as f32 - half,
                HANDLE_SIZE as f32,
                HANDLE_SIZE as f32,
            );
            if let Some(rect) = rect {
                let path = PathBuilder::from_rect(rect);
                pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }

        stroke(
            pixmap,
            &[controls.top_center, controls.rotation],
            false,
            OUTLINE_WIDTH,
            &paint,
        );
        let rotation = PathBuilder::from_circle(
            controls.rotation.x as f32,
            controls.rotation.y as f32,
            half,
        );
        if let Some(path) = rotation {
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    if let (InteractionState::Editing(_), Some(text)) = (state, object.as_text()) {
        let (top, bottom) = text.caret_segment();
        let caret = [
            object.geometry.to_surface(top),
            object.geometry.to_surface(bottom),
        ];
        stroke(pixmap, &caret, false, CARET_WIDTH, &paint);
    }
    true
}

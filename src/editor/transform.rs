use super::hit_test::HitPart;
use crate::geometry::Point;
use crate::scene::{Geometry, ObjectId};

const MIN_SCALE: f64 = 0.05;
const MIN_DRAG_RADIUS: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    Resize,
    Rotate,
}

impl From<HitPart> for DragKind {
    fn from(part: HitPart) -> Self {
        match part {
            HitPart::Body => Self::Move,
            HitPart::Resize(_) => Self::Resize,
            HitPart::Rotate => Self::Rotate,
        }
    }
}

/// Pointer gesture in progress. Every update is computed from the pointer-down snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub id: ObjectId,
    pub kind: DragKind,
    start_pointer: Point,
    start_geometry: Geometry,
}

impl DragSession {
    pub fn begin(id: ObjectId, part: HitPart, pointer: Point, geometry: Geometry) -> Self {
        Self {
            id,
            kind: part.into(),
            start_pointer: pointer,
            start_geometry: geometry,
        }
    }

    pub fn apply(&self, pointer: Point) -> Geometry {
        let start = self.start_geometry;
        match self.kind {
            DragKind::Move => Geometry {
                center: start.center.offset(
                    pointer.x - self.start_pointer.x,
                    pointer.y - self.start_pointer.y,
                ),
                ..start
            },
            DragKind::Resize => Geometry {
                scale: resized_scale(start, self.start_pointer, pointer),
                ..start
            },
            DragKind::Rotate => Geometry {
                angle: rotated_angle(start, self.start_pointer, pointer),
                ..start
            },
        }
    }
}

/// Uniform scale about the center, proportional to the pointer's distance from it.
fn resized_scale(start: Geometry, from: Point, to: Point) -> f64 {
    let initial = start.center.distance_to(from);
    if initial < MIN_DRAG_RADIUS {
        return start.scale;
    }
    (start.scale * start.center.distance_to(to) / initial).max(MIN_SCALE)
}

fn rotated_angle(start: Geometry, from: Point, to: Point) -> f64 {
    let bearing = |point: Point| {
        (point.y - start.center.y)
            .atan2(point.x - start.center.x)
            .to_degrees()
    };
    normalize_degrees(start.angle + bearing(to) - bearing(from))
}

pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

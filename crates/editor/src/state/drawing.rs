//! Freehand ground-plane digitizer for custom surfaces.

use kurbo::{Point, Rect};
use shared::Vec3;

/// Points closer than this (XZ distance) to the last accepted point are ignored
pub const POINT_TOLERANCE: f64 = 0.01;

/// Minimum number of points for a closed polygon
pub const MIN_POLYGON_POINTS: usize = 3;

/// Polygon produced by the digitizer, ready to become a `custom` shape
#[derive(Debug, Clone, PartialEq)]
pub struct DigitizedPolygon {
    /// World position of the shape: midpoint of the XZ bounding box, Y = 0
    pub anchor: Vec3,
    /// Points relative to the anchor, Y = 0
    pub points: Vec<Vec3>,
}

/// Drawing mode state and accumulated points
#[derive(Debug, Clone, Default)]
pub struct DrawingState {
    active: bool,
    points: Vec<Vec3>,
}

impl DrawingState {
    /// Is drawing mode on
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Accumulated ground points
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Enter drawing mode with an empty buffer
    pub fn start(&mut self) {
        self.active = true;
        self.points.clear();
    }

    /// Leave drawing mode, discarding the buffer
    pub fn cancel(&mut self) {
        self.active = false;
        self.points.clear();
    }

    /// Append a point (projected to Y = 0).
    ///
    /// Returns false when not drawing or when the point repeats the last one.
    pub fn add_point(&mut self, point: Vec3) -> bool {
        if !self.active {
            return false;
        }
        let point = [point[0], 0.0, point[2]];
        if let Some(last) = self.points.last() {
            if xz_distance(last, &point) < POINT_TOLERANCE {
                return false;
            }
        }
        self.points.push(point);
        true
    }

    /// Close the polygon: on success the buffer is consumed and drawing mode ends.
    ///
    /// With fewer than three points nothing changes and `None` is returned.
    pub fn finish(&mut self) -> Option<DigitizedPolygon> {
        let polygon = normalize_polygon(&self.points)?;
        self.cancel();
        Some(polygon)
    }
}

fn xz_distance(a: &Vec3, b: &Vec3) -> f64 {
    let dx = a[0] - b[0];
    let dz = a[2] - b[2];
    (dx * dx + dz * dz).sqrt()
}

/// Anchor a polygon at its XZ bounding-box midpoint and express points relative to it.
///
/// The anchor is the bounding-box midpoint, not the vertex centroid.
pub fn normalize_polygon(points: &[Vec3]) -> Option<DigitizedPolygon> {
    if points.len() < MIN_POLYGON_POINTS {
        return None;
    }

    let first = Point::new(points[0][0], points[0][2]);
    let bounds = points
        .iter()
        .skip(1)
        .fold(Rect::from_points(first, first), |rect, p| {
            rect.union_pt(Point::new(p[0], p[2]))
        });
    let center = bounds.center();

    let normalized = points
        .iter()
        .map(|p| [p[0] - center.x, 0.0, p[2] - center.y])
        .collect();

    Some(DigitizedPolygon {
        anchor: [center.x, 0.0, center.y],
        points: normalized,
    })
}

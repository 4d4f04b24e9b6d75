//! Clean-outline sketcher backed by kurbo paths.

use super::Sketcher;
use kurbo::{BezPath, Ellipse, Line, Point, Rect, Shape as KurboShape};

/// Bezier tolerance used when flattening kurbo shapes to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// A [`Sketcher`] producing precise outlines with no hand-drawn jitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSketcher;

impl Sketcher for PathSketcher {
    type Drawable = BezPath;

    fn rectangle(&self, x: f64, y: f64, width: f64, height: f64, _seed: u64) -> BezPath {
        Rect::new(x, y, x + width, y + height)
            .abs()
            .to_path(PATH_TOLERANCE)
    }

    fn line(&self, x1: f64, y1: f64, x2: f64, y2: f64, _seed: u64) -> BezPath {
        Line::new(Point::new(x1, y1), Point::new(x2, y2)).to_path(PATH_TOLERANCE)
    }

    fn ellipse(&self, cx: f64, cy: f64, width: f64, height: f64, _seed: u64) -> BezPath {
        Ellipse::new(Point::new(cx, cy), (width / 2.0, height / 2.0), 0.0).to_path(PATH_TOLERANCE)
    }
}

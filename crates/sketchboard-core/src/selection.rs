//! Selection, focus and resize-handle geometry.

use crate::shapes::{Element, ElementGeometry, ShapeKind};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle side length in screen pixels.
pub const HANDLE_SIZE: f64 = 10.0;
/// Gap between a shape and its selection outline, in world units.
pub const SELECTION_PADDING: f64 = 10.0;
/// Vertical distance within which a pointer counts as touching a line.
pub const LINE_HIT_TOLERANCE: f64 = 5.0;

/// Identifies one resize handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleSlug {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Right,
    Left,
    Bottom,
    /// Line start point.
    Start,
    /// Line end point.
    End,
}

impl HandleSlug {
    /// Short identifier (`tl`, `rr`, `l1`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            HandleSlug::TopLeft => "tl",
            HandleSlug::TopRight => "tr",
            HandleSlug::BottomLeft => "bl",
            HandleSlug::BottomRight => "br",
            HandleSlug::Top => "tt",
            HandleSlug::Right => "rr",
            HandleSlug::Left => "ll",
            HandleSlug::Bottom => "bb",
            HandleSlug::Start => "l1",
            HandleSlug::End => "l2",
        }
    }
}

/// A selection handle with its draw origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub slug: HandleSlug,
    /// Top-left corner of the handle square, in world coordinates.
    pub position: Point,
}

impl Handle {
    pub fn new(slug: HandleSlug, x: f64, y: f64) -> Self {
        Self {
            slug,
            position: Point::new(x, y),
        }
    }

    /// Check if a point lies within this handle's square of side `square`.
    pub fn hit_test(&self, point: Point, square: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        (0.0..=square).contains(&dx) && (0.0..=square).contains(&dy)
    }
}

/// Handle sizing, in screen pixels and world units respectively.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleMetrics {
    pub size: f64,
    pub padding: f64,
}

impl Default for HandleMetrics {
    fn default() -> Self {
        Self {
            size: HANDLE_SIZE,
            padding: SELECTION_PADDING,
        }
    }
}

impl HandleMetrics {
    /// Handle side length in world units at the given zoom.
    pub fn square(&self, scale: f64) -> f64 {
        self.size / scale
    }
}

/// Selection outline and handles for one element.
#[derive(Debug, Clone)]
pub struct HandleLayout {
    /// Padded bounding box (raw endpoints for lines).
    pub outline: Rect,
    pub handles: Vec<Handle>,
}

/// Bounding box used for the selection outline.
///
/// Rectangles and ellipses are normalized and padded on every side. Lines
/// return their raw endpoints as `(x0, y0)` / `(x1, y1)` with no padding.
pub fn bounding_box(geometry: &ElementGeometry, padding: f64) -> Rect {
    let ElementGeometry { x, y, x2, y2, .. } = *geometry;

    if geometry.kind.is_line() {
        return Rect::new(x, y, x2, y2);
    }

    let min_x = x.min(x2);
    let max_x = x.max(x2);
    let min_y = y.min(y2);
    let max_y = y.max(y2);

    Rect::new(
        min_x - padding,
        min_y - padding,
        max_x + padding,
        max_y + padding,
    )
}

/// Positions of every handle, offset by `half` so each is its draw origin.
///
/// Rectangle order: tl, tr, bl, br, tt, rr, ll, bb. Line order: l1, l2.
pub fn handle_positions(geometry: &ElementGeometry, padding: f64, half: f64) -> HandleLayout {
    let outline = bounding_box(geometry, padding);

    if geometry.kind.is_line() {
        return HandleLayout {
            outline,
            handles: vec![
                Handle::new(HandleSlug::Start, outline.x0 - half, outline.y0 - half),
                Handle::new(HandleSlug::End, outline.x1 - half, outline.y1 - half),
            ],
        };
    }

    let (fx, fy) = (outline.x0, outline.y0);
    let (fw, fh) = (outline.width(), outline.height());

    HandleLayout {
        outline,
        handles: vec![
            Handle::new(HandleSlug::TopLeft, fx - half, fy - half),
            Handle::new(HandleSlug::TopRight, fx + fw - half, fy - half),
            Handle::new(HandleSlug::BottomLeft, fx - half, fy + fh - half),
            Handle::new(HandleSlug::BottomRight, fx + fw - half, fy + fh - half),
            Handle::new(HandleSlug::Top, fx + fw / 2.0 - half, fy - half),
            Handle::new(HandleSlug::Right, fx + fw - half, fy + fh / 2.0 - half),
            Handle::new(HandleSlug::Left, fx - half, fy + fh / 2.0 - half),
            Handle::new(HandleSlug::Bottom, fx + fw / 2.0 - half, fy + fh - half),
        ],
    }
}

/// Find the first handle under `point` (world coordinates) at zoom `scale`.
pub fn hit_test_handle(
    geometry: &ElementGeometry,
    point: Point,
    scale: f64,
    metrics: HandleMetrics,
) -> Option<Handle> {
    let square = metrics.square(scale);
    handle_positions(geometry, metrics.padding, square / 2.0)
        .handles
        .into_iter()
        .find(|handle| handle.hit_test(point, square))
}

/// Check if `point` lies on the body of a shape.
///
/// Lines hit within `tolerance` of the line's y at that x, strictly between
/// the endpoints' x values. Rectangles and ellipses hit strictly inside
/// their box.
pub fn hit_test_body(geometry: &ElementGeometry, point: Point, tolerance: f64) -> bool {
    let ElementGeometry { x, y, x2, y2, .. } = *geometry;

    match geometry.kind {
        ShapeKind::Line => {
            let in_span = (point.x > x && point.x < x2) || (point.x < x && point.x > x2);
            if !in_span {
                return false;
            }
            let slope = (y2 - y) / (x2 - x);
            let intercept = y - slope * x;
            let expected_y = slope * point.x + intercept;
            (point.y - expected_y).abs() < tolerance
        }
        ShapeKind::Rectangle | ShapeKind::Ellipse => {
            point.x > x.min(x2) && point.x < x.max(x2) && point.y > y.min(y2) && point.y < y.max(y2)
        }
    }
}

/// Transient marquee rectangle in world space.
///
/// The all-zero value is the inactive sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    /// Where the drag started.
    pub anchor: Point,
    /// Current pointer position.
    pub current: Point,
}

impl SelectionRect {
    pub fn new(anchor: Point, current: Point) -> Self {
        Self { anchor, current }
    }

    /// Signed horizontal extent.
    pub fn width(&self) -> f64 {
        self.current.x - self.anchor.x
    }

    /// Signed vertical extent.
    pub fn height(&self) -> f64 {
        self.current.y - self.anchor.y
    }

    /// False for the sentinel: anchored at the origin with zero extent.
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    /// The marquee as a normalized rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::from_points(self.anchor, self.current)
    }

    /// Whether `[x, x2]` lies strictly inside the marquee's horizontal span,
    /// in either drag direction.
    ///
    /// Only the X extent is compared. Vertical position is ignored.
    fn contains_span(&self, x: f64, x2: f64) -> bool {
        let (sx, sx2) = (self.anchor.x, self.current.x);
        (sx < x && sx < x2 && sx2 > x && sx2 > x2) || (sx > x && sx > x2 && sx2 < x && sx2 < x2)
    }
}

/// Index of the first element horizontally contained by `selection`.
pub fn selection_contains_index<D>(
    elements: &[Element<D>],
    selection: &SelectionRect,
) -> Option<usize> {
    if !selection.is_active() {
        return None;
    }
    elements.iter().position(|element| {
        let g = element.geometry();
        selection.contains_span(g.x, g.x2)
    })
}

/// Focus the first element contained by `selection`.
///
/// Other elements keep their focus flag; callers clear first when needed.
pub fn mark_focus<D>(elements: &mut [Element<D>], selection: &SelectionRect) -> Option<usize> {
    let index = selection_contains_index(elements, selection)?;
    elements[index].focused = true;
    Some(index)
}

/// Clear the focus flag on every element.
pub fn clear_focus<D>(elements: &mut [Element<D>]) {
    for element in elements {
        element.focused = false;
    }
}

/// Geometry after dragging `slug` to `point`.
///
/// Each rectangle handle moves only the sides it touches; the opposite sides
/// stay fixed and the signed extents grow by the distance moved. Line
/// handles relocate one endpoint.
pub fn resize_geometry(
    geometry: &ElementGeometry,
    slug: HandleSlug,
    point: Point,
) -> ElementGeometry {
    let g = *geometry;
    let (px, py) = (point.x, point.y);

    match slug {
        HandleSlug::Right => ElementGeometry {
            x2: px,
            width: g.width + (px - g.x2),
            ..g
        },
        HandleSlug::Left => ElementGeometry {
            x: px,
            width: g.width + (g.x - px),
            ..g
        },
        HandleSlug::Top => ElementGeometry {
            y: py,
            height: g.height + (g.y - py),
            ..g
        },
        HandleSlug::Bottom => ElementGeometry {
            y2: py,
            height: g.height + (py - g.y2),
            ..g
        },
        HandleSlug::BottomRight => ElementGeometry {
            x2: px,
            y2: py,
            width: g.width + (px - g.x2),
            height: g.height + (py - g.y2),
            ..g
        },
        HandleSlug::TopRight => ElementGeometry {
            y: py,
            x2: px,
            width: g.width + (px - g.x2),
            height: g.height + (g.y - py),
            ..g
        },
        HandleSlug::TopLeft => ElementGeometry {
            x: px,
            y: py,
            width: g.width + (g.x - px),
            height: g.height + (g.y - py),
            ..g
        },
        HandleSlug::BottomLeft => ElementGeometry {
            x: px,
            y2: py,
            width: g.width + (g.x - px),
            height: g.height + (py - g.y2),
            ..g
        },
        HandleSlug::Start => ElementGeometry::from_points(px, py, g.x2, g.y2, ShapeKind::Line),
        HandleSlug::End => ElementGeometry::from_points(g.x, g.y, px, py, ShapeKind::Line),
    }
}

/// Geometry recentred on `point`, keeping the signed extents.
pub fn move_geometry(geometry: &ElementGeometry, point: Point) -> ElementGeometry {
    let x = point.x - geometry.width / 2.0;
    let y = point.y - geometry.height / 2.0;
    ElementGeometry {
        x,
        y,
        x2: x + geometry.width,
        y2: y + geometry.height,
        ..*geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{PathSketcher, create_element};

    fn rect_geometry() -> ElementGeometry {
        ElementGeometry::from_points(10.0, 10.0, 50.0, 40.0, ShapeKind::Rectangle)
    }

    fn elements(geometries: &[ElementGeometry]) -> Vec<Element<kurbo::BezPath>> {
        geometries
            .iter()
            .enumerate()
            .map(|(id, g)| create_element(&PathSketcher, id, *g))
            .collect()
    }

    #[test]
    fn test_bounding_box_padded() {
        let g = ElementGeometry::from_points(50.0, 40.0, 10.0, 10.0, ShapeKind::Rectangle);
        let bounds = bounding_box(&g, 10.0);
        assert_eq!(bounds, Rect::new(0.0, 0.0, 60.0, 50.0));
    }

    #[test]
    fn test_bounding_box_line_ignores_padding() {
        let g = ElementGeometry::from_points(50.0, 40.0, 10.0, 10.0, ShapeKind::Line);
        let bounds = bounding_box(&g, 10.0);
        assert_eq!((bounds.x0, bounds.y0, bounds.x1, bounds.y1), (50.0, 40.0, 10.0, 10.0));
    }

    #[test]
    fn test_rectangle_handles() {
        let layout = handle_positions(&rect_geometry(), 10.0, 5.0);
        let slugs: Vec<&str> = layout.handles.iter().map(|h| h.slug.as_str()).collect();
        assert_eq!(slugs, ["tl", "tr", "bl", "br", "tt", "rr", "ll", "bb"]);

        // Outline is (0, 0) -> (60, 50).
        assert_eq!(layout.handles[0].position, Point::new(-5.0, -5.0));
        assert_eq!(layout.handles[3].position, Point::new(55.0, 45.0));
        assert_eq!(layout.handles[4].position, Point::new(25.0, -5.0));
        assert_eq!(layout.handles[5].position, Point::new(55.0, 20.0));
        assert_eq!(layout.handles[6].position, Point::new(-5.0, 20.0));
        assert_eq!(layout.handles[7].position, Point::new(25.0, 45.0));
    }

    #[test]
    fn test_line_handles() {
        let g = ElementGeometry::from_points(0.0, 0.0, 100.0, 50.0, ShapeKind::Line);
        let layout = handle_positions(&g, 10.0, 5.0);
        assert_eq!(layout.handles.len(), 2);
        assert_eq!(layout.handles[0].slug, HandleSlug::Start);
        assert_eq!(layout.handles[0].position, Point::new(-5.0, -5.0));
        assert_eq!(layout.handles[1].slug, HandleSlug::End);
        assert_eq!(layout.handles[1].position, Point::new(95.0, 45.0));
    }

    #[test]
    fn test_handle_hit_test() {
        let g = rect_geometry();
        let metrics = HandleMetrics::default();

        // rr handle origin at (55, 20) with side 10.
        let hit = hit_test_handle(&g, Point::new(60.0, 25.0), 1.0, metrics);
        assert_eq!(hit.map(|h| h.slug), Some(HandleSlug::Right));

        // Edges of the square are inclusive.
        let edge = hit_test_handle(&g, Point::new(65.0, 30.0), 1.0, metrics);
        assert_eq!(edge.map(|h| h.slug), Some(HandleSlug::Right));

        assert!(hit_test_handle(&g, Point::new(30.0, 25.0), 1.0, metrics).is_none());
    }

    #[test]
    fn test_handle_hit_scales_with_zoom() {
        let g = rect_geometry();
        let metrics = HandleMetrics::default();
        // At scale 2 the br square is 5 wide with origin (57.5, 47.5).
        assert!(hit_test_handle(&g, Point::new(63.0, 53.0), 2.0, metrics).is_none());
        let hit = hit_test_handle(&g, Point::new(62.0, 52.0), 2.0, metrics);
        assert_eq!(hit.map(|h| h.slug), Some(HandleSlug::BottomRight));
    }

    #[test]
    fn test_body_hit_rectangle() {
        let g = rect_geometry();
        assert!(hit_test_body(&g, Point::new(30.0, 20.0), LINE_HIT_TOLERANCE));
        assert!(!hit_test_body(&g, Point::new(10.0, 20.0), LINE_HIT_TOLERANCE));
        assert!(!hit_test_body(&g, Point::new(60.0, 20.0), LINE_HIT_TOLERANCE));

        let reversed = ElementGeometry::from_points(50.0, 40.0, 10.0, 10.0, ShapeKind::Ellipse);
        assert!(hit_test_body(&reversed, Point::new(30.0, 20.0), LINE_HIT_TOLERANCE));
    }

    #[test]
    fn test_body_hit_line() {
        let g = ElementGeometry::from_points(0.0, 0.0, 100.0, 100.0, ShapeKind::Line);
        assert!(hit_test_body(&g, Point::new(50.0, 53.0), LINE_HIT_TOLERANCE));
        assert!(!hit_test_body(&g, Point::new(50.0, 56.0), LINE_HIT_TOLERANCE));
        assert!(!hit_test_body(&g, Point::new(120.0, 120.0), LINE_HIT_TOLERANCE));

        let backwards = ElementGeometry::from_points(100.0, 0.0, 0.0, 100.0, ShapeKind::Line);
        assert!(hit_test_body(&backwards, Point::new(25.0, 75.0), LINE_HIT_TOLERANCE));

        let vertical = ElementGeometry::from_points(10.0, 0.0, 10.0, 100.0, ShapeKind::Line);
        assert!(!hit_test_body(&vertical, Point::new(10.0, 50.0), LINE_HIT_TOLERANCE));
    }

    #[test]
    fn test_selection_contains_either_direction() {
        let list = elements(&[rect_geometry()]);

        let forward = SelectionRect::new(Point::new(0.0, 0.0), Point::new(60.0, 60.0));
        assert_eq!(selection_contains_index(&list, &forward), Some(0));

        let backward = SelectionRect::new(Point::new(60.0, 60.0), Point::new(5.0, 5.0));
        assert_eq!(selection_contains_index(&list, &backward), Some(0));

        let partial = SelectionRect::new(Point::new(20.0, 0.0), Point::new(60.0, 60.0));
        assert_eq!(selection_contains_index(&list, &partial), None);
    }

    #[test]
    fn test_selection_ignores_vertical_extent() {
        let list = elements(&[rect_geometry()]);
        let above = SelectionRect::new(Point::new(0.0, -100.0), Point::new(60.0, -90.0));
        assert_eq!(selection_contains_index(&list, &above), Some(0));
    }

    #[test]
    fn test_inactive_selection_matches_nothing() {
        let list = elements(&[ElementGeometry::from_points(
            -10.0,
            -10.0,
            -5.0,
            -5.0,
            ShapeKind::Rectangle,
        )]);
        let sentinel = SelectionRect::default();
        assert!(!sentinel.is_active());
        assert_eq!(selection_contains_index(&list, &sentinel), None);
    }

    #[test]
    fn test_mark_and_clear_focus() {
        let mut list = elements(&[
            ElementGeometry::from_points(200.0, 0.0, 300.0, 10.0, ShapeKind::Rectangle),
            rect_geometry(),
            ElementGeometry::from_points(20.0, 0.0, 30.0, 10.0, ShapeKind::Line),
        ]);
        let selection = SelectionRect::new(Point::new(0.0, 0.0), Point::new(60.0, 60.0));

        assert_eq!(mark_focus(&mut list, &selection), Some(1));
        assert!(list[1].is_focused());
        assert!(!list[2].is_focused());

        clear_focus(&mut list);
        assert!(list.iter().all(|e| !e.is_focused()));
    }

    #[test]
    fn test_resize_right_handle() {
        let resized = resize_geometry(&rect_geometry(), HandleSlug::Right, Point::new(70.0, 40.0));
        assert_eq!(
            resized,
            ElementGeometry {
                x2: 70.0,
                width: 60.0,
                ..rect_geometry()
            }
        );
    }

    #[test]
    fn test_resize_edges_keep_other_sides() {
        let g = rect_geometry();
        let p = Point::new(-7.0, 93.0);

        let top = resize_geometry(&g, HandleSlug::Top, p);
        assert_eq!((top.x, top.x2, top.y2), (g.x, g.x2, g.y2));
        assert!((top.height - (top.y2 - top.y)).abs() < f64::EPSILON);

        let bottom = resize_geometry(&g, HandleSlug::Bottom, p);
        assert_eq!((bottom.x, bottom.x2, bottom.y), (g.x, g.x2, g.y));
        assert!((bottom.height - (bottom.y2 - bottom.y)).abs() < f64::EPSILON);

        let left = resize_geometry(&g, HandleSlug::Left, p);
        assert_eq!((left.y, left.y2, left.x2), (g.y, g.y2, g.x2));
        assert!((left.width - (left.x2 - left.x)).abs() < f64::EPSILON);

        let right = resize_geometry(&g, HandleSlug::Right, p);
        assert_eq!((right.y, right.y2, right.x), (g.y, g.y2, g.x));
        assert!((right.width - (right.x2 - right.x)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resize_corners_keep_opposite_corner() {
        let g = rect_geometry();
        let p = Point::new(0.0, 0.0);

        let tl = resize_geometry(&g, HandleSlug::TopLeft, p);
        assert_eq!((tl.x, tl.y, tl.x2, tl.y2), (0.0, 0.0, g.x2, g.y2));
        assert_eq!((tl.width, tl.height), (50.0, 40.0));

        let br = resize_geometry(&g, HandleSlug::BottomRight, Point::new(80.0, 90.0));
        assert_eq!((br.x, br.y, br.x2, br.y2), (g.x, g.y, 80.0, 90.0));
        assert_eq!((br.width, br.height), (70.0, 80.0));

        let tr = resize_geometry(&g, HandleSlug::TopRight, Point::new(80.0, 0.0));
        assert_eq!((tr.x, tr.y, tr.x2, tr.y2), (g.x, 0.0, 80.0, g.y2));

        let bl = resize_geometry(&g, HandleSlug::BottomLeft, Point::new(0.0, 90.0));
        assert_eq!((bl.x, bl.y, bl.x2, bl.y2), (0.0, g.y, g.x2, 90.0));
    }

    #[test]
    fn test_resize_keeps_ellipse_kind() {
        let g = ElementGeometry::from_points(10.0, 10.0, 50.0, 40.0, ShapeKind::Ellipse);
        let resized = resize_geometry(&g, HandleSlug::Bottom, Point::new(0.0, 80.0));
        assert_eq!(resized.kind, ShapeKind::Ellipse);
    }

    #[test]
    fn test_resize_line_endpoints() {
        let g = ElementGeometry::from_points(0.0, 0.0, 100.0, 50.0, ShapeKind::Line);

        let start = resize_geometry(&g, HandleSlug::Start, Point::new(20.0, 30.0));
        assert_eq!((start.x, start.y, start.x2, start.y2), (20.0, 30.0, 100.0, 50.0));
        assert_eq!(start.kind, ShapeKind::Line);

        let end = resize_geometry(&g, HandleSlug::End, Point::new(-10.0, 5.0));
        assert_eq!((end.x, end.y, end.x2, end.y2), (0.0, 0.0, -10.0, 5.0));
        assert_eq!((end.width, end.height), (-10.0, 5.0));
    }

    #[test]
    fn test_move_recentres() {
        let moved = move_geometry(&rect_geometry(), Point::new(100.0, 100.0));
        assert_eq!((moved.x, moved.y, moved.x2, moved.y2), (80.0, 85.0, 120.0, 115.0));
        assert_eq!((moved.width, moved.height), (40.0, 30.0));
    }
}

//! Element definitions for the canvas.
//!
//! An [`Element`] pairs world-space geometry with an opaque drawable produced
//! by a [`Sketcher`]. The drawable is never patched: any geometry change goes
//! through [`create_element`] again.

mod path;

pub use path::PathSketcher;

use serde::{Deserialize, Serialize};

/// Kind of shape an element draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Line,
    Ellipse,
}

impl ShapeKind {
    /// Parse a shape name. Unknown names fall back to a rectangle.
    pub fn from_name(name: &str) -> Self {
        match name {
            "line" => ShapeKind::Line,
            "ellipse" => ShapeKind::Ellipse,
            _ => ShapeKind::Rectangle,
        }
    }

    /// Name used by the sketch backend for this kind.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Line => "line",
            ShapeKind::Ellipse => "ellipse",
        }
    }

    pub fn is_line(self) -> bool {
        self == ShapeKind::Line
    }
}

/// World-space geometry of an element.
///
/// `x, y, x2, y2` are the defining corners (rectangle, ellipse) or endpoints
/// (line) and are not normalized. `width` and `height` are signed extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementGeometry {
    pub x: f64,
    pub y: f64,
    pub x2: f64,
    pub y2: f64,
    pub width: f64,
    pub height: f64,
    pub kind: ShapeKind,
}

impl ElementGeometry {
    /// Geometry spanning two points, with extents derived from them.
    pub fn from_points(x: f64, y: f64, x2: f64, y2: f64, kind: ShapeKind) -> Self {
        Self {
            x,
            y,
            x2,
            y2,
            width: x2 - x,
            height: y2 - y,
            kind,
        }
    }

    /// Zero-size geometry anchored at a point.
    pub fn anchored(x: f64, y: f64, kind: ShapeKind) -> Self {
        Self::from_points(x, y, x, y, kind)
    }
}

/// Generates renderable primitives from shape parameters.
///
/// Implementations must be deterministic for a given `seed`: calling a method
/// twice with the same arguments yields equivalent drawables.
pub trait Sketcher {
    /// Opaque renderable primitive.
    type Drawable;

    /// Rectangle with top-left `(x, y)` and signed extents.
    fn rectangle(&self, x: f64, y: f64, width: f64, height: f64, seed: u64) -> Self::Drawable;

    /// Straight line between two points.
    fn line(&self, x1: f64, y1: f64, x2: f64, y2: f64, seed: u64) -> Self::Drawable;

    /// Ellipse centred at `(cx, cy)` with the given diameters.
    fn ellipse(&self, cx: f64, cy: f64, width: f64, height: f64, seed: u64) -> Self::Drawable;
}

/// A drawable shape instance.
#[derive(Debug, Clone)]
pub struct Element<D> {
    id: usize,
    geometry: ElementGeometry,
    pub(crate) focused: bool,
    drawable: D,
}

impl<D> Element<D> {
    /// Position of the element in the canvas collection.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn geometry(&self) -> &ElementGeometry {
        &self.geometry
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry.kind
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn drawable(&self) -> &D {
        &self.drawable
    }
}

/// Build an element, regenerating its drawable from `geometry`.
///
/// This is the only way to construct or update an element's geometry.
pub fn create_element<K: Sketcher>(
    sketcher: &K,
    id: usize,
    geometry: ElementGeometry,
) -> Element<K::Drawable> {
    // Stable per-element seed so strokes don't shimmer while dragging.
    let seed = id as u64 + 1;
    let g = &geometry;
    let drawable = match g.kind {
        ShapeKind::Rectangle => sketcher.rectangle(g.x, g.y, g.width, g.height, seed),
        ShapeKind::Line => sketcher.line(g.x, g.y, g.x2, g.y2, seed),
        ShapeKind::Ellipse => sketcher.ellipse(
            (g.x + g.x2) / 2.0,
            (g.y + g.y2) / 2.0,
            (g.x2 - g.x).abs(),
            (g.y2 - g.y).abs(),
            seed,
        ),
    };

    Element {
        id,
        geometry,
        focused: false,
        drawable,
    }
}

//! View module for pan/zoom transforms.
//!
//! Zoom is centred on the viewport centre rather than the origin: every scale
//! change carries a `scale_offset` correction derived from the viewport size.

use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Default minimum zoom factor.
pub const MIN_SCALE: f64 = 0.1;
/// Default maximum zoom factor.
pub const MAX_SCALE: f64 = 20.0;

/// Centering correction for a viewport of the given size at `scale`.
pub fn scaled_offsets(viewport: Size, scale: f64) -> Vec2 {
    let scaled_width = viewport.width * scale;
    let scaled_height = viewport.height * scale;
    Vec2::new(
        (scaled_width - viewport.width) / 2.0,
        (scaled_height - viewport.height) / 2.0,
    )
}

/// Convert a screen-space pointer position to world coordinates.
///
/// Inverse of [`render_transform`]; the two must change together.
pub fn screen_to_world(point: Point, pan: Vec2, scale: f64, scale_offset: Vec2) -> Point {
    Point::new(
        (point.x - pan.x * scale + scale_offset.x) / scale,
        (point.y - pan.y * scale + scale_offset.y) / scale,
    )
}

/// The world-to-screen transform applied by the render pass.
pub fn render_transform(pan: Vec2, scale: f64, scale_offset: Vec2) -> Affine {
    Affine::translate(pan * scale - scale_offset) * Affine::scale(scale)
}

/// Live view state of the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    /// World-space translation.
    pub pan: Vec2,
    /// Current zoom factor.
    pub scale: f64,
    /// Centering correction, recomputed whenever `viewport` or `scale` changes.
    pub scale_offset: Vec2,
    /// Size of the drawing surface in screen pixels.
    pub viewport: Size,
    /// Minimum allowed zoom factor.
    pub min_scale: f64,
    /// Maximum allowed zoom factor.
    pub max_scale: f64,
}

impl Default for View {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            scale: 1.0,
            scale_offset: Vec2::ZERO,
            viewport: Size::ZERO,
            min_scale: MIN_SCALE,
            max_scale: MAX_SCALE,
        }
    }
}

impl View {
    /// Create a new view with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a view with custom zoom limits.
    pub fn with_limits(min_scale: f64, max_scale: f64) -> Self {
        Self {
            min_scale,
            max_scale,
            ..Self::default()
        }
    }

    /// Get the affine transform for rendering (world to screen).
    pub fn transform(&self) -> Affine {
        render_transform(self.pan, self.scale, self.scale_offset)
    }

    /// Convert a screen point to world coordinates.
    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        screen_to_world(screen_point, self.pan, self.scale, self.scale_offset)
    }

    /// Convert a world point to screen coordinates.
    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Resize the viewport and refresh the centering correction.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.refresh_offset();
    }

    /// Replace the pan translation.
    pub fn set_pan(&mut self, pan: Vec2) {
        self.pan = pan;
    }

    /// Set the zoom factor, clamped to the view's limits.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(self.min_scale, self.max_scale);
        self.refresh_offset();
    }

    /// Apply a wheel delta. Scrolling up (negative delta) zooms in.
    pub fn zoom_by_wheel(&mut self, delta_y: f64, sensitivity: f64) {
        self.set_scale(self.scale + delta_y * -sensitivity);
    }

    fn refresh_offset(&mut self) {
        self.scale_offset = scaled_offsets(self.viewport, self.scale);
    }
}

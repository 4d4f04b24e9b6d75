//! Render pass and drawing-surface abstraction.

use kurbo::{Affine, BezPath, Rect, RoundedRect, Shape as KurboShape, Size};
use peniko::Color;
use sketchboard_core::canvas::Canvas;
use sketchboard_core::selection::{HandleMetrics, handle_positions};
use sketchboard_core::shapes::{ElementGeometry, PathSketcher, Sketcher};
use sketchboard_core::tools::Action;
use thiserror::Error;

/// Tolerance used when converting kurbo shapes to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid style: {0}")]
    InvalidStyle(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// A 2D drawing context.
///
/// Paths are given in the coordinate space set up by [`DrawContext::transform`].
pub trait DrawContext {
    /// Clear the whole surface. Ignores the current transform.
    fn clear(&mut self, size: Size);

    /// Push the current transform.
    fn save(&mut self);

    /// Pop back to the last saved transform.
    fn restore(&mut self);

    /// Post-multiply the current transform.
    fn transform(&mut self, transform: Affine);

    /// Stroke a path with a line width in current units.
    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64);

    /// Fill a path using the non-zero rule.
    fn fill_path(&mut self, path: &BezPath, color: Color);
}

/// A drawable target, such as a window surface or an offscreen buffer.
pub trait Surface {
    /// Surface size in screen pixels.
    fn size(&self) -> Size;

    /// The drawing context, or `None` while the surface is unavailable.
    fn context(&mut self) -> Option<&mut dyn DrawContext>;
}

/// Colors and widths used by the render pass.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    /// Marquee stroke.
    pub selection_color: Color,
    /// Handle border and selection outline.
    pub handle_stroke: Color,
    pub handle_fill: Color,
    pub element_stroke: Color,
    /// Element stroke width in world units.
    pub stroke_width: f64,
    /// Handle corner radius in screen pixels.
    pub handle_radius: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            selection_color: Color::from_rgba8(255, 0, 0, 255),
            handle_stroke: Color::from_rgba8(0, 0, 255, 255),
            handle_fill: Color::from_rgba8(0xEE, 0xF5, 0xFF, 255),
            element_stroke: Color::WHITE,
            stroke_width: 1.0,
            handle_radius: 3.0,
        }
    }
}

impl RenderStyle {
    pub fn validate(&self) -> RenderResult<()> {
        if !(self.stroke_width > 0.0) {
            return Err(RendererError::InvalidStyle(format!(
                "stroke_width must be positive, got {}",
                self.stroke_width
            )));
        }
        if !(self.handle_radius >= 0.0) {
            return Err(RendererError::InvalidStyle(format!(
                "handle_radius must not be negative, got {}",
                self.handle_radius
            )));
        }
        Ok(())
    }
}

/// The painting half of a sketch collaborator.
pub trait SketchPainter: Sketcher {
    /// Draw one element's drawable into `ctx`.
    fn paint(&self, drawable: &Self::Drawable, ctx: &mut dyn DrawContext, style: &RenderStyle);
}

impl SketchPainter for PathSketcher {
    fn paint(&self, drawable: &BezPath, ctx: &mut dyn DrawContext, style: &RenderStyle) {
        ctx.stroke_path(drawable, style.element_stroke, style.stroke_width);
    }
}

/// Match the canvas viewport to the surface so zoom stays centred on it.
fn sync_viewport<K: Sketcher>(surface: &dyn Surface, canvas: &mut Canvas<K>) -> Size {
    let size = surface.size();
    if canvas.view().viewport != size {
        log::debug!("Viewport resized to {}x{}", size.width, size.height);
        canvas.set_viewport(size);
    }
    size
}

/// Draw one frame of `canvas` onto `surface`.
///
/// Adopts the surface size as the viewport before building the transform.
/// Reads focus flags as they are; run [`Canvas::compute_focus`] first (or use
/// [`redraw_if_needed`]). Returns false if the surface had no context.
pub fn render_frame<K: SketchPainter>(
    surface: &mut dyn Surface,
    canvas: &mut Canvas<K>,
    style: &RenderStyle,
) -> bool {
    let size = sync_viewport(surface, canvas);
    let Some(ctx) = surface.context() else {
        log::debug!("No drawing context, skipping frame");
        return false;
    };

    let view = canvas.view();
    ctx.clear(size);
    ctx.save();
    ctx.transform(view.transform());

    if canvas.action() == Action::Select {
        let marquee = canvas.selection().to_rect().to_path(PATH_TOLERANCE);
        ctx.stroke_path(&marquee, style.selection_color, style.stroke_width);
    }

    let metrics = canvas.config().handle_metrics();
    for element in canvas.elements() {
        // Handles go underneath the element stroke.
        if element.is_focused() {
            draw_handles(ctx, element.geometry(), view.scale, metrics, style);
        }
        canvas.sketcher().paint(element.drawable(), ctx, style);
    }

    ctx.restore();
    true
}

/// Recompute focus and draw a frame if the canvas changed since the last one.
///
/// Returns true if a frame was drawn. A skipped frame stays pending.
pub fn redraw_if_needed<K: SketchPainter>(
    surface: &mut dyn Surface,
    canvas: &mut Canvas<K>,
    style: &RenderStyle,
) -> bool {
    sync_viewport(surface, canvas);
    if !canvas.take_needs_redraw() {
        return false;
    }
    canvas.compute_focus();
    let drawn = render_frame(surface, canvas, style);
    if !drawn {
        canvas.request_redraw();
    }
    drawn
}

/// Selection outline and resize handles, sized to stay constant on screen.
fn draw_handles(
    ctx: &mut dyn DrawContext,
    geometry: &ElementGeometry,
    scale: f64,
    metrics: HandleMetrics,
    style: &RenderStyle,
) {
    let line_width = 1.0 / scale;
    let square = metrics.square(scale);
    let half = square / 2.0;
    let layout = handle_positions(geometry, metrics.padding, half);

    // Line handles are circles; box handles get a small rounding.
    let radius = if geometry.kind.is_line() {
        half
    } else {
        ctx.stroke_path(
            &layout.outline.to_path(PATH_TOLERANCE),
            style.handle_stroke,
            line_width,
        );
        (style.handle_radius / scale).min(half)
    };

    for handle in &layout.handles {
        let rect = Rect::from_origin_size(handle.position, (square, square));
        let path = RoundedRect::from_rect(rect, radius).to_path(PATH_TOLERANCE);
        ctx.fill_path(&path, style.handle_fill);
        ctx.stroke_path(&path, style.handle_stroke, line_width);
    }
}

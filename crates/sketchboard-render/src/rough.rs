//! Hand-drawn sketch style.
//!
//! Strokes are built from the clean kurbo outline and then perturbed the way
//! rough.js does it: endpoints are jittered so corners overshoot, straight
//! segments bow slightly, and each shape is stroked more than once with
//! different randomness. All randomness comes from the element seed, so an
//! element keeps its look while it is dragged or resized.

use crate::renderer::{DrawContext, RenderResult, RenderStyle, RendererError, SketchPainter};
use kurbo::{BezPath, PathEl, Point, Vec2};
use sketchboard_core::shapes::{PathSketcher, Sketcher};

/// Large prime mixed into the seed so each stroke gets a distinct sequence.
const STROKE_SEED_STEP: u32 = 99991;

/// Seeded random number generator (xorshift32).
struct SketchRng {
    state: u32,
}

impl SketchRng {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Random value in `[-amount, amount]`.
    fn offset(&mut self, amount: f64) -> f64 {
        let unit = self.next_u32() as f64 / u32::MAX as f64;
        (unit * 2.0 - 1.0) * amount
    }

    fn jitter(&mut self, point: Point, amount: f64) -> Point {
        Point::new(point.x + self.offset(amount), point.y + self.offset(amount))
    }
}

/// Tuning for the hand-drawn look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoughOptions {
    /// 0 = clean, 1 = slight wobble, 2 = very sketchy.
    pub roughness: f64,
    /// How far straight segments curve away from the chord.
    pub bowing: f64,
    /// Strokes drawn per shape.
    pub stroke_count: u32,
}

impl Default for RoughOptions {
    fn default() -> Self {
        Self {
            roughness: 1.0,
            bowing: 1.0,
            stroke_count: 2,
        }
    }
}

impl RoughOptions {
    pub fn validate(&self) -> RenderResult<()> {
        if !(self.roughness >= 0.0) {
            return Err(RendererError::InvalidStyle(format!(
                "roughness must not be negative, got {}",
                self.roughness
            )));
        }
        if !(self.bowing >= 0.0) {
            return Err(RendererError::InvalidStyle(format!(
                "bowing must not be negative, got {}",
                self.bowing
            )));
        }
        if self.stroke_count == 0 {
            return Err(RendererError::InvalidStyle(
                "stroke_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// A [`Sketcher`] producing hand-drawn multi-stroke outlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoughSketcher {
    options: RoughOptions,
}

impl RoughSketcher {
    pub fn new(options: RoughOptions) -> RenderResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &RoughOptions {
        &self.options
    }

    fn strokes(&self, outline: &BezPath, seed: u64) -> Vec<BezPath> {
        // Fold the element seed into the generator's 32-bit state.
        let seed = (seed ^ (seed >> 32)) as u32;
        (0..self.options.stroke_count)
            .map(|stroke_index| roughen(outline, &self.options, seed, stroke_index))
            .collect()
    }
}

impl Sketcher for RoughSketcher {
    type Drawable = Vec<BezPath>;

    fn rectangle(&self, x: f64, y: f64, width: f64, height: f64, seed: u64) -> Vec<BezPath> {
        self.strokes(&PathSketcher.rectangle(x, y, width, height, seed), seed)
    }

    fn line(&self, x1: f64, y1: f64, x2: f64, y2: f64, seed: u64) -> Vec<BezPath> {
        self.strokes(&PathSketcher.line(x1, y1, x2, y2, seed), seed)
    }

    fn ellipse(&self, cx: f64, cy: f64, width: f64, height: f64, seed: u64) -> Vec<BezPath> {
        self.strokes(&PathSketcher.ellipse(cx, cy, width, height, seed), seed)
    }
}

impl SketchPainter for RoughSketcher {
    fn paint(&self, drawable: &Vec<BezPath>, ctx: &mut dyn DrawContext, style: &RenderStyle) {
        for stroke in drawable {
            ctx.stroke_path(stroke, style.element_stroke, style.stroke_width);
        }
    }
}

/// One hand-drawn pass over `path`.
fn roughen(path: &BezPath, options: &RoughOptions, seed: u32, stroke_index: u32) -> BezPath {
    let roughness = options.roughness;
    if roughness <= 0.0 {
        return path.clone();
    }

    let max_offset = roughness * 2.0;
    let mut rng = SketchRng::new(seed.wrapping_add(stroke_index.wrapping_mul(STROKE_SEED_STEP)));
    let mut result = BezPath::new();
    let mut last = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                result.move_to(rng.jitter(p, max_offset));
                last = p;
            }
            PathEl::LineTo(p) => {
                let delta = p - last;
                let len = delta.hypot();
                let bow = rng.offset(options.bowing * roughness * len / 200.0);
                let normal = if len > 1e-3 {
                    Vec2::new(-delta.y / len, delta.x / len)
                } else {
                    Vec2::ZERO
                };
                let control = last.midpoint(p) + normal * bow;
                result.quad_to(control, rng.jitter(p, max_offset));
                last = p;
            }
            PathEl::QuadTo(p1, p2) => {
                result.quad_to(rng.jitter(p1, max_offset * 0.7), rng.jitter(p2, max_offset));
                last = p2;
            }
            PathEl::CurveTo(p1, p2, p3) => {
                result.curve_to(
                    rng.jitter(p1, max_offset * 0.5),
                    rng.jitter(p2, max_offset * 0.5),
                    rng.jitter(p3, max_offset),
                );
                last = p3;
            }
            PathEl::ClosePath => result.close_path(),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCommand, RecordingSurface};
    use crate::renderer::render_frame;
    use kurbo::{Shape as KurboShape, Size};
    use sketchboard_core::canvas::Canvas;
    use sketchboard_core::config::CanvasConfig;
    use sketchboard_core::input::Modifiers;
    use sketchboard_core::tools::{ToolKind, ToolStore};

    #[test]
    fn test_same_seed_same_strokes() {
        let sketcher = RoughSketcher::default();
        let a = sketcher.rectangle(10.0, 10.0, 40.0, 30.0, 1);
        let b = sketcher.rectangle(10.0, 10.0, 40.0, 30.0, 1);
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_strokes_differ() {
        let sketcher = RoughSketcher::default();
        let strokes = sketcher.line(0.0, 0.0, 100.0, 0.0, 7);
        assert_ne!(strokes[0], strokes[1]);

        let other_seed = sketcher.line(0.0, 0.0, 100.0, 0.0, 8);
        assert_ne!(strokes, other_seed);
    }

    #[test]
    fn test_zero_roughness_is_clean() {
        let sketcher = RoughSketcher::new(RoughOptions {
            roughness: 0.0,
            stroke_count: 1,
            ..RoughOptions::default()
        })
        .unwrap();
        assert_eq!(sketcher.options().stroke_count, 1);
        let strokes = sketcher.ellipse(30.0, 20.0, 40.0, 20.0, 3);
        assert_eq!(strokes, vec![PathSketcher.ellipse(30.0, 20.0, 40.0, 20.0, 3)]);
    }

    #[test]
    fn test_strokes_stay_near_outline() {
        let sketcher = RoughSketcher::default();
        for stroke in sketcher.rectangle(10.0, 10.0, 100.0, 50.0, 42) {
            let bounds = stroke.bounding_box();
            assert!((bounds.x0 - 10.0).abs() < 3.0);
            assert!((bounds.y0 - 10.0).abs() < 3.0);
            assert!((bounds.x1 - 110.0).abs() < 3.0);
            assert!((bounds.y1 - 60.0).abs() < 3.0);
        }
    }

    #[test]
    fn test_rng_offset_range() {
        let mut rng = SketchRng::new(0);
        for _ in 0..1000 {
            let value = rng.offset(2.0);
            assert!((-2.0..=2.0).contains(&value));
        }
    }

    #[test]
    fn test_rejects_invalid_options() {
        let negative = RoughOptions {
            roughness: -1.0,
            ..RoughOptions::default()
        };
        assert!(RoughSketcher::new(negative).is_err());

        let no_strokes = RoughOptions {
            stroke_count: 0,
            ..RoughOptions::default()
        };
        assert!(matches!(
            RoughSketcher::new(no_strokes),
            Err(RendererError::InvalidStyle(_))
        ));
    }

    #[test]
    fn test_canvas_paints_every_stroke() {
        let mut canvas = Canvas::new(
            RoughSketcher::default(),
            ToolStore::new(ToolKind::Rectangle),
            CanvasConfig::default(),
        )
        .unwrap();
        canvas.pointer_down(Point::new(10.0, 10.0), Modifiers::default());
        canvas.pointer_move(Point::new(50.0, 40.0));
        canvas.pointer_up();

        let mut surface = RecordingSurface::new(Size::new(100.0, 100.0));
        assert!(render_frame(&mut surface, &mut canvas, &RenderStyle::default()));
        let strokes = surface
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke { .. }))
            .count();
        // Marquee plus two element strokes.
        assert_eq!(strokes, 3);
    }
}

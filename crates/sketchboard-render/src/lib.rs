//! Sketchboard Render Library
//!
//! Render pass for the sketchboard canvas, written against a small
//! drawing-surface abstraction. Ships the hand-drawn sketch style and an
//! in-memory recording surface.

mod recording;
mod renderer;
mod rough;

pub use recording::{DrawCommand, RecordingSurface};
pub use renderer::{
    DrawContext, RenderResult, RenderStyle, RendererError, SketchPainter, Surface,
    redraw_if_needed, render_frame,
};
pub use rough::{RoughOptions, RoughSketcher};

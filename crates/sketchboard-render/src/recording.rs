//! In-memory surface that records draw calls instead of rasterizing them.

use crate::renderer::{DrawContext, Surface};
use kurbo::{Affine, BezPath, Size};
use peniko::Color;

/// One recorded draw call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Clear(Size),
    Save,
    Restore,
    Transform(Affine),
    Stroke {
        path: BezPath,
        color: Color,
        width: f64,
    },
    Fill {
        path: BezPath,
        color: Color,
    },
}

/// A [`Surface`] that keeps a log of every command drawn on it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    size: Size,
    commands: Vec<DrawCommand>,
    /// Reports no context, like a window that is not ready yet.
    detached: bool,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
            detached: false,
        }
    }

    /// A surface whose context is unavailable.
    pub fn detached(size: Size) -> Self {
        Self {
            detached: true,
            ..Self::new(size)
        }
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawContext for RecordingSurface {
    fn clear(&mut self, size: Size) {
        self.commands.push(DrawCommand::Clear(size));
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn transform(&mut self, transform: Affine) {
        self.commands.push(DrawCommand::Transform(transform));
    }

    fn stroke_path(&mut self, path: &BezPath, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            color,
            width,
        });
    }

    fn fill_path(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color,
        });
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn context(&mut self) -> Option<&mut dyn DrawContext> {
        if self.detached {
            None
        } else {
            Some(self)
        }
    }
}

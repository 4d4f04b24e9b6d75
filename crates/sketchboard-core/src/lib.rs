//! Sketchboard Core Library
//!
//! Platform-agnostic interaction engine for the sketchboard canvas: view
//! transforms, the element model, hit-testing and resize geometry, and the
//! tool-driven pointer state machine.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod input;
pub mod selection;
pub mod shapes;
pub mod tools;

pub use camera::{View, render_transform, scaled_offsets, screen_to_world};
pub use canvas::Canvas;
pub use config::{CanvasConfig, ConfigError};
pub use input::{KeyEvent, Modifiers, PointerEvent};
pub use selection::{Handle, HandleLayout, HandleMetrics, HandleSlug, SelectionRect};
pub use shapes::{Element, ElementGeometry, PathSketcher, ShapeKind, Sketcher, create_element};
pub use tools::{Action, ToolKind, ToolStore, handle_key_down};

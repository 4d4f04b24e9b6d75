//! Canvas interaction state.
//!
//! [`Canvas`] owns the element collection, the view and the selection
//! rectangle, and routes pointer, wheel and key input into mode-specific
//! mutations. Rendering reads it after [`Canvas::compute_focus`].

use crate::camera::View;
use crate::config::{CanvasConfig, ConfigError};
use crate::input::{KeyEvent, Modifiers, PointerEvent};
use crate::selection::{
    HandleSlug, SelectionRect, clear_focus, hit_test_body, hit_test_handle, mark_focus,
    move_geometry, resize_geometry,
};
use crate::shapes::{Element, ElementGeometry, Sketcher, create_element};
use crate::tools::{self, Action, ToolKind, ToolStore};
use kurbo::{Point, Size};
use winit::keyboard::PhysicalKey;

/// Focused element captured when a move or resize starts.
#[derive(Debug, Clone, Copy)]
struct Manipulation {
    index: usize,
    /// Geometry at pointer-down; every move recomputes from it.
    original: ElementGeometry,
    /// Handle being dragged (None = moving the whole element).
    handle: Option<HandleSlug>,
}

/// An active pointer gesture.
#[derive(Debug, Clone, Copy)]
struct Gesture {
    screen_start: Point,
    world_start: Point,
    manipulation: Option<Manipulation>,
    /// Element appended by this draw gesture.
    drawing: Option<usize>,
}

/// The interactive drawing surface.
pub struct Canvas<K: Sketcher> {
    sketcher: K,
    tools: ToolStore,
    config: CanvasConfig,
    elements: Vec<Element<K::Drawable>>,
    view: View,
    selection: SelectionRect,
    action: Action,
    /// Tool the current action was derived from.
    last_tool: ToolKind,
    gesture: Option<Gesture>,
    focused: Option<usize>,
    needs_redraw: bool,
}

impl<K: Sketcher> Canvas<K> {
    /// Create a canvas sharing an existing tool store.
    ///
    /// Fails if `config` does not validate.
    pub fn new(sketcher: K, tools: ToolStore, config: CanvasConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let tool = tools.current();
        Ok(Self {
            sketcher,
            tools,
            view: View::with_limits(config.min_scale, config.max_scale),
            config,
            elements: Vec::new(),
            selection: SelectionRect::default(),
            action: Action::from_tool(tool),
            last_tool: tool,
            gesture: None,
            focused: None,
            needs_redraw: true,
        })
    }

    /// Create a canvas with its own tool store, starting at the configured tool.
    pub fn with_config(sketcher: K, config: CanvasConfig) -> Result<Self, ConfigError> {
        let tools = ToolStore::new(config.initial_tool);
        Self::new(sketcher, tools, config)
    }

    pub fn elements(&self) -> &[Element<K::Drawable>] {
        &self.elements
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn selection(&self) -> &SelectionRect {
        &self.selection
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Index of the element eligible for move/resize.
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_element(&self) -> Option<&Element<K::Drawable>> {
        self.focused.and_then(|index| self.elements.get(index))
    }

    pub fn tools(&self) -> &ToolStore {
        &self.tools
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn sketcher(&self) -> &K {
        &self.sketcher
    }

    /// Whether a pointer gesture is in progress.
    pub fn is_pointer_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Whether state visible to the render pass changed since the last frame.
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Read and reset the redraw flag.
    pub fn take_needs_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Resize the drawing surface (host window size).
    pub fn set_viewport(&mut self, size: Size) {
        self.view.set_viewport(size);
        self.needs_redraw = true;
    }

    /// Re-derive the action if the shared tool changed since the last event.
    pub fn sync_tool(&mut self) {
        let tool = self.tools.current();
        if tool != self.last_tool {
            self.last_tool = tool;
            self.set_action(Action::from_tool(tool));
        }
    }

    fn set_action(&mut self, action: Action) {
        if action != self.action {
            log::debug!("Action: {:?} -> {:?}", self.action, action);
            self.action = action;
        }
    }

    fn set_focused(&mut self, focused: Option<usize>) {
        if focused != self.focused {
            self.focused = focused;
            self.needs_redraw = true;
        }
    }

    /// Rebuild the element at `index` from new geometry.
    fn replace_element(&mut self, index: usize, geometry: ElementGeometry) {
        if index >= self.elements.len() {
            log::warn!("Ignoring update for missing element {index}");
            return;
        }
        log::trace!("Element {index} -> {geometry:?}");
        self.elements[index] = create_element(&self.sketcher, index, geometry);
        self.needs_redraw = true;
    }

    /// Dispatch a pointer or wheel event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                modifiers,
            } => self.pointer_down(position, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Wheel { delta_y } => self.wheel(delta_y),
        }
    }

    /// Start a gesture at a screen position.
    pub fn pointer_down(&mut self, screen: Point, modifiers: Modifiers) {
        self.sync_tool();

        let world = self.view.screen_to_world(screen);
        let mut gesture = Gesture {
            screen_start: screen,
            world_start: world,
            manipulation: None,
            drawing: None,
        };

        let focused = self
            .focused_element()
            .map(|element| (element.id(), *element.geometry()));
        if self.action == Action::Select {
            if let Some((index, original)) = focused {
                if hit_test_body(&original, world, self.config.line_hit_tolerance) {
                    self.set_action(Action::Move);
                    gesture.manipulation = Some(Manipulation {
                        index,
                        original,
                        handle: None,
                    });
                }

                let metrics = self.config.handle_metrics();
                if let Some(handle) = hit_test_handle(&original, world, self.view.scale, metrics) {
                    log::debug!("Resize from handle {}", handle.slug.as_str());
                    self.set_action(Action::Resize);
                    gesture.manipulation = Some(Manipulation {
                        index,
                        original,
                        handle: Some(handle.slug),
                    });
                    self.gesture = Some(gesture);
                    return;
                }
            }
        }

        if modifiers.alt {
            self.gesture = Some(gesture);
            self.tools.set(ToolKind::Pan);
            self.sync_tool();
            return;
        }

        if self.action == Action::Draw {
            match self.last_tool.shape_kind() {
                Some(kind) => {
                    let index = self.elements.len();
                    let geometry = ElementGeometry::anchored(world.x, world.y, kind);
                    self.elements.push(create_element(&self.sketcher, index, geometry));
                    gesture.drawing = Some(index);
                    self.needs_redraw = true;
                    log::debug!("Created {} element {index}", kind.name());
                }
                None => log::warn!("Draw gesture with non-shape tool {}", self.last_tool.id()),
            }
        }

        self.gesture = Some(gesture);
    }

    /// Continue the active gesture. Ignored when no pointer is down.
    pub fn pointer_move(&mut self, screen: Point) {
        self.sync_tool();

        let Some(gesture) = self.gesture else {
            return;
        };
        let world = self.view.screen_to_world(screen);

        match self.action {
            Action::Pan => {
                self.view.set_pan(screen - gesture.screen_start);
                self.needs_redraw = true;
            }
            Action::Select => {
                self.selection = SelectionRect::new(gesture.world_start, world);
                self.needs_redraw = true;
            }
            Action::Resize => {
                if let Some(Manipulation {
                    index,
                    original,
                    handle: Some(slug),
                }) = gesture.manipulation
                {
                    self.replace_element(index, resize_geometry(&original, slug, world));
                }
            }
            Action::Move => {
                if let Some(manipulation) = gesture.manipulation {
                    let geometry = move_geometry(&manipulation.original, world);
                    self.replace_element(manipulation.index, geometry);
                }
            }
            Action::Draw => {
                if let Some((index, kind)) = gesture
                    .drawing
                    .and_then(|index| self.elements.get(index).map(|e| (index, e.kind())))
                {
                    let start = gesture.world_start;
                    let geometry =
                        ElementGeometry::from_points(start.x, start.y, world.x, world.y, kind);
                    self.replace_element(index, geometry);
                }
            }
        }
    }

    /// End the active gesture.
    pub fn pointer_up(&mut self) {
        self.sync_tool();
        self.gesture = None;

        if self.action != Action::Select {
            self.set_focused(None);
        }

        match self.action {
            // Pan and draw are single-shot: fall back to selection.
            Action::Pan | Action::Draw => self.tools.set(ToolKind::Select),
            Action::Move | Action::Resize => self.set_action(Action::Select),
            Action::Select => {
                self.selection = SelectionRect::default();
                self.needs_redraw = true;
            }
        }

        self.sync_tool();
    }

    /// Zoom by a wheel delta. Scrolling up zooms in.
    pub fn wheel(&mut self, delta_y: f64) {
        self.sync_tool();
        self.view.zoom_by_wheel(delta_y, self.config.zoom_sensitivity);
        log::trace!("Scale {}", self.view.scale);
        self.needs_redraw = true;
    }

    /// Apply a key press to the shared tool store.
    pub fn key_down(&mut self, key: PhysicalKey) -> bool {
        let handled = tools::handle_key_down(&self.tools, key);
        self.sync_tool();
        handled
    }

    /// Dispatch a keyboard event. Only presses select tools.
    pub fn handle_key_event(&mut self, event: KeyEvent) -> bool {
        match event {
            KeyEvent::Pressed(key) => self.key_down(key),
            KeyEvent::Released(_) => false,
        }
    }

    /// Update focus flags ahead of a render pass.
    ///
    /// In select mode the first element contained by the selection rectangle
    /// becomes the only focused element; without a match the previous focus
    /// is kept. Draw mode clears all focus.
    pub fn compute_focus(&mut self) {
        match self.action {
            Action::Select => {
                clear_focus(&mut self.elements);
                match mark_focus(&mut self.elements, &self.selection) {
                    Some(index) => self.focused = Some(index),
                    None => {
                        if let Some(element) =
                            self.focused.and_then(|index| self.elements.get_mut(index))
                        {
                            element.focused = true;
                        }
                    }
                }
            }
            Action::Draw => {
                self.focused = None;
                clear_focus(&mut self.elements);
            }
            Action::Pan | Action::Move | Action::Resize => {}
        }
    }
}

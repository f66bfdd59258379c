//! Tool system: gesture state machines that turn input into store mutations.
//!
//! Tools never write to the store. They read it through a [`ToolContext`]
//! and queue [`Effect`]s (notifications and mutations), which the session
//! applies in order once the tool call returns.

mod eraser;
mod measure;
mod paint;
mod polygon;
mod select;
mod shape;
mod star;
mod text;

pub use eraser::EraserTool;
pub use measure::MeasureTool;
pub use paint::PaintTool;
pub use polygon::PolygonTool;
pub use select::SelectTool;
pub use shape::ShapeTool;
pub use star::StarTool;
pub use text::TextTool;

use crate::config::EditorConfig;
use crate::element::{Color, Element, ElementId, ShapeKind};
use crate::events::EditorEvent;
use crate::input::{InputEvent, Key, Modifiers};
use crate::snap::snap_point;
use crate::store::{ElementStore, Mutation};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Rectangle,
    Circle,
    Line,
    Polygon,
    Star,
    Measure,
    Text,
    Eraser,
    Paint,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Select,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Line,
        ToolKind::Polygon,
        ToolKind::Star,
        ToolKind::Measure,
        ToolKind::Text,
        ToolKind::Eraser,
        ToolKind::Paint,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Line => "line",
            ToolKind::Polygon => "polygon",
            ToolKind::Star => "star",
            ToolKind::Measure => "measure",
            ToolKind::Text => "text",
            ToolKind::Eraser => "eraser",
            ToolKind::Paint => "paint",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Working style and content applied to newly drawn elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolSettings {
    /// Semantic tag given to new elements.
    pub element_type: String,
    /// Working fill color.
    pub fill: Color,
    /// Working stroke color.
    pub stroke: Color,
    pub border_width: f64,
    pub opacity: f64,
    /// Content placed by the text tool.
    pub text: String,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            element_type: "annotation".to_string(),
            fill: Color::transparent(),
            stroke: Color::black(),
            border_width: 2.0,
            opacity: 1.0,
            text: String::new(),
        }
    }
}

/// Something a tool asks the session to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Publish an event as-is (previews, selection).
    Notify(EditorEvent),
    /// Apply a change to the store and publish the resulting event.
    Mutate(Mutation),
}

/// Everything a tool may look at while handling one input event.
pub struct ToolContext<'a> {
    pub store: &'a ElementStore,
    pub config: &'a EditorConfig,
    pub settings: &'a mut ToolSettings,
    pub selection: &'a mut Vec<ElementId>,
    effects: Vec<Effect>,
}

impl<'a> ToolContext<'a> {
    pub fn new(
        store: &'a ElementStore,
        config: &'a EditorConfig,
        settings: &'a mut ToolSettings,
        selection: &'a mut Vec<ElementId>,
    ) -> Self {
        Self {
            store,
            config,
            settings,
            selection,
            effects: Vec::new(),
        }
    }

    pub fn notify(&mut self, event: EditorEvent) {
        self.effects.push(Effect::Notify(event));
    }

    pub fn mutate(&mut self, mutation: Mutation) {
        self.effects.push(Effect::Mutate(mutation));
    }

    /// Queued effects, in the order they were produced.
    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }

    /// Snap a point according to the editor configuration.
    pub fn snap(&self, point: Point) -> Point {
        snap_point(point, self.config.snap_to_grid, self.config.grid_size)
    }

    /// Whether the active layer accepts new elements.
    pub fn can_draw(&self) -> bool {
        self.store.can_draw()
    }

    /// A fresh preview element on the active layer, styled from the settings.
    pub fn new_element(&self, shape: ShapeKind) -> Element {
        let mut element = Element::new(shape, self.settings.element_type.clone(), self.store.active_layer_id());
        element.color = self.settings.fill;
        element.border_color = self.settings.stroke;
        element.border_width = self.settings.border_width;
        element.opacity = self.settings.opacity;
        element.is_temp = true;
        element
    }

    /// Publish a preview: `element:create` the first time, then `element:update-temp`.
    pub(crate) fn show_temp(&mut self, slot: &mut Option<Element>, element: Element) {
        let event = if slot.is_some() {
            EditorEvent::TempUpdated { element: element.clone() }
        } else {
            EditorEvent::TempCreated { element: element.clone() }
        };
        *slot = Some(element);
        self.notify(event);
    }

    /// Drop the preview, if any, announcing its removal.
    pub(crate) fn clear_temp(&mut self, slot: &mut Option<Element>) -> Option<Element> {
        let element = slot.take()?;
        self.notify(EditorEvent::TempRemoved { id: element.id });
        Some(element)
    }

    /// Drop the preview and commit it into its layer.
    pub(crate) fn commit_temp(&mut self, slot: &mut Option<Element>) {
        if let Some(mut element) = self.clear_temp(slot) {
            element.is_temp = false;
            log::debug!("Committing {:?} element {}", element.shape, element.id);
            self.mutate(Mutation::AddElement(element));
        }
    }
}

/// Gesture contract shared by every tool.
///
/// State machine: inactive, then idle and in-gesture while active. A tool
/// never keeps a preview alive across `deactivate`.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    fn activate(&mut self, _ctx: &mut ToolContext<'_>) {}

    /// Release all gesture state.
    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.cancel(ctx);
    }

    fn handle_start(&mut self, ctx: &mut ToolContext<'_>, point: Point, modifiers: Modifiers);

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, point: Point, modifiers: Modifiers);

    fn handle_end(&mut self, ctx: &mut ToolContext<'_>, point: Point, modifiers: Modifiers);

    fn handle_double_click(&mut self, _ctx: &mut ToolContext<'_>, _point: Point, _modifiers: Modifiers) {}

    /// Escape cancels by default.
    fn handle_key(&mut self, ctx: &mut ToolContext<'_>, key: Key) {
        if key == Key::Escape {
            self.cancel(ctx);
        }
    }

    /// Abandon the current gesture without committing anything.
    fn cancel(&mut self, ctx: &mut ToolContext<'_>);

    /// Whether a gesture is in progress.
    fn is_busy(&self) -> bool;
}

/// The closed set of tool implementations.
#[derive(Debug, Clone)]
pub enum ActiveTool {
    Select(SelectTool),
    Shape(ShapeTool),
    Polygon(PolygonTool),
    Star(StarTool),
    Measure(MeasureTool),
    Text(TextTool),
    Eraser(EraserTool),
    Paint(PaintTool),
}

impl ActiveTool {
    /// A fresh, idle tool of the given kind.
    pub fn new(kind: ToolKind) -> Self {
        match kind {
            ToolKind::Select => ActiveTool::Select(SelectTool::default()),
            ToolKind::Rectangle => ActiveTool::Shape(ShapeTool::rectangle()),
            ToolKind::Circle => ActiveTool::Shape(ShapeTool::circle()),
            ToolKind::Line => ActiveTool::Shape(ShapeTool::line()),
            ToolKind::Polygon => ActiveTool::Polygon(PolygonTool::default()),
            ToolKind::Star => ActiveTool::Star(StarTool::default()),
            ToolKind::Measure => ActiveTool::Measure(MeasureTool::default()),
            ToolKind::Text => ActiveTool::Text(TextTool),
            ToolKind::Eraser => ActiveTool::Eraser(EraserTool::default()),
            ToolKind::Paint => ActiveTool::Paint(PaintTool),
        }
    }

    pub fn as_tool(&self) -> &dyn Tool {
        match self {
            ActiveTool::Select(t) => t,
            ActiveTool::Shape(t) => t,
            ActiveTool::Polygon(t) => t,
            ActiveTool::Star(t) => t,
            ActiveTool::Measure(t) => t,
            ActiveTool::Text(t) => t,
            ActiveTool::Eraser(t) => t,
            ActiveTool::Paint(t) => t,
        }
    }

    pub fn as_tool_mut(&mut self) -> &mut dyn Tool {
        match self {
            ActiveTool::Select(t) => t,
            ActiveTool::Shape(t) => t,
            ActiveTool::Polygon(t) => t,
            ActiveTool::Star(t) => t,
            ActiveTool::Measure(t) => t,
            ActiveTool::Text(t) => t,
            ActiveTool::Eraser(t) => t,
            ActiveTool::Paint(t) => t,
        }
    }
}

/// Owns the single active tool and routes input to it.
#[derive(Debug, Clone)]
pub struct ToolController {
    active: ActiveTool,
}

impl Default for ToolController {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolController {
    /// Start with the select tool.
    pub fn new() -> Self {
        Self {
            active: ActiveTool::new(ToolKind::Select),
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.active.as_tool().kind()
    }

    pub fn is_busy(&self) -> bool {
        self.active.as_tool().is_busy()
    }

    pub fn active(&self) -> &ActiveTool {
        &self.active
    }

    /// Switch tools. The old tool is deactivated (dropping its preview)
    /// before the new one is activated. Returns false if `kind` is already
    /// active.
    pub fn set_tool(&mut self, ctx: &mut ToolContext<'_>, kind: ToolKind) -> bool {
        let old = self.kind();
        if old == kind {
            return false;
        }
        self.active.as_tool_mut().deactivate(ctx);
        self.active = ActiveTool::new(kind);
        self.active.as_tool_mut().activate(ctx);
        log::debug!("Tool changed: {} -> {}", old, kind);
        ctx.notify(EditorEvent::ToolChanged { old, new: kind });
        true
    }

    /// Forward one input event to the active tool.
    pub fn handle(&mut self, ctx: &mut ToolContext<'_>, event: InputEvent) {
        let tool = self.active.as_tool_mut();
        match event {
            InputEvent::PointerDown { x, y, modifiers } => tool.handle_start(ctx, Point::new(x, y), modifiers),
            InputEvent::PointerMove { x, y, modifiers } => tool.handle_move(ctx, Point::new(x, y), modifiers),
            InputEvent::PointerUp { x, y, modifiers } => tool.handle_end(ctx, Point::new(x, y), modifiers),
            InputEvent::DoubleClick { x, y, modifiers } => {
                tool.handle_double_click(ctx, Point::new(x, y), modifiers)
            }
            InputEvent::KeyDown { key } => tool.handle_key(ctx, key),
        }
    }

    /// Abandon the active tool's gesture.
    pub fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.active.as_tool_mut().cancel(ctx);
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Owns everything a [`ToolContext`] borrows.
    pub struct Harness {
        pub store: ElementStore,
        pub config: EditorConfig,
        pub settings: ToolSettings,
        pub selection: Vec<ElementId>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_config(EditorConfig::default())
        }

        pub fn with_config(config: EditorConfig) -> Self {
            Self {
                store: ElementStore::new(),
                config,
                settings: ToolSettings::default(),
                selection: Vec::new(),
            }
        }

        /// Run `f` against a fresh context, apply its mutations, and return its effects.
        pub fn run(&mut self, f: impl FnOnce(&mut ToolContext<'_>)) -> Vec<Effect> {
            let mut ctx = ToolContext::new(&self.store, &self.config, &mut self.settings, &mut self.selection);
            f(&mut ctx);
            let effects = ctx.into_effects();
            for effect in &effects {
                if let Effect::Mutate(mutation) = effect {
                    self.store.apply(mutation.clone()).unwrap();
                }
            }
            effects
        }
    }

    pub fn mutations(effects: &[Effect]) -> Vec<&Mutation> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Mutate(m) => Some(m),
                Effect::Notify(_) => None,
            })
            .collect()
    }

    pub fn notifications(effects: &[Effect]) -> Vec<&EditorEvent> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Notify(n) => Some(n),
                Effect::Mutate(_) => None,
            })
            .collect()
    }

    pub fn added(effects: &[Effect]) -> Vec<&Element> {
        mutations(effects)
            .into_iter()
            .filter_map(|m| match m {
                Mutation::AddElement(e) => Some(e),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_controller_starts_with_select() {
        let controller = ToolController::new();
        assert_eq!(controller.kind(), ToolKind::Select);
        assert!(!controller.is_busy());
    }

    #[test]
    fn test_switch_emits_tool_changed() {
        let mut h = Harness::new();
        let mut controller = ToolController::new();
        let effects = h.run(|ctx| {
            assert!(controller.set_tool(ctx, ToolKind::Rectangle));
            assert!(!controller.set_tool(ctx, ToolKind::Rectangle));
        });
        assert_eq!(
            notifications(&effects),
            vec![&EditorEvent::ToolChanged {
                old: ToolKind::Select,
                new: ToolKind::Rectangle
            }]
        );
        assert_eq!(controller.kind(), ToolKind::Rectangle);
    }

    #[test]
    fn test_switch_mid_gesture_drops_preview() {
        let mut h = Harness::new();
        let mut controller = ToolController::new();
        h.run(|ctx| {
            controller.set_tool(ctx, ToolKind::Rectangle);
        });
        let effects = h.run(|ctx| {
            controller.handle(ctx, InputEvent::PointerDown { x: 0.0, y: 0.0, modifiers: Modifiers::NONE });
            controller.handle(ctx, InputEvent::PointerMove { x: 60.0, y: 60.0, modifiers: Modifiers::NONE });
            assert!(controller.is_busy());
            controller.set_tool(ctx, ToolKind::Circle);
        });

        let names: Vec<&str> = notifications(&effects).iter().map(|e| e.name()).collect();
        assert_eq!(
            names,
            vec!["element:create", "element:update-temp", "element:remove-temp", "tool:changed"]
        );
        assert!(mutations(&effects).is_empty());
        assert!(!controller.is_busy());
        assert!(h.store.is_empty());
    }

    #[test]
    fn test_every_kind_constructs_matching_tool() {
        for kind in ToolKind::ALL {
            assert_eq!(ActiveTool::new(kind).as_tool().kind(), kind);
        }
    }

    #[test]
    fn test_new_element_uses_settings() {
        let mut h = Harness::new();
        h.settings.fill = Color::new(10, 20, 30, 255);
        h.settings.element_type = "power-point".to_string();
        let layer = h.store.active_layer_id();
        h.run(|ctx| {
            let e = ctx.new_element(ShapeKind::Rect);
            assert_eq!(e.kind, "power-point");
            assert_eq!(e.color, Color::new(10, 20, 30, 255));
            assert_eq!(e.layer_id, layer);
            assert!(e.is_temp);
        });
    }
}

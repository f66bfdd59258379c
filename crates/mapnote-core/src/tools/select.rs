//! Selection tool: click, shift-drag box selection, move-drag and delete.

use super::{Tool, ToolContext, ToolKind};
use crate::element::{Element, ElementId};
use crate::events::EditorEvent;
use crate::input::{Key, Modifiers};
use crate::snap::snap;
use crate::store::Mutation;
use kurbo::{Point, Rect};

#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    /// Shift-drag area selection.
    Box { origin: Point, current: Point },
    /// Dragging an element; `preview` is live once it has moved.
    Move {
        start: Point,
        original: Element,
        preview: Option<Element>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct SelectTool {
    gesture: Gesture,
}

/// Replace the selection with `ids`, announcing each change.
fn set_selection(ctx: &mut ToolContext<'_>, ids: &[ElementId]) {
    let dropped: Vec<ElementId> = ctx.selection.iter().copied().filter(|id| !ids.contains(id)).collect();
    for id in dropped {
        ctx.notify(EditorEvent::ElementDeselected { id });
    }
    for &id in ids {
        if !ctx.selection.contains(&id) {
            ctx.notify(EditorEvent::ElementSelected { id });
        }
    }
    ctx.selection.clear();
    ctx.selection.extend_from_slice(ids);
}

impl SelectTool {
    /// Pointer displacement since the drag started, grid-quantized when snapping.
    fn drag_delta(ctx: &ToolContext<'_>, start: Point, point: Point) -> (f64, f64) {
        let (dx, dy) = (point.x - start.x, point.y - start.y);
        if ctx.config.snap_to_grid {
            (snap(dx, ctx.config.grid_size), snap(dy, ctx.config.grid_size))
        } else {
            (dx, dy)
        }
    }

    fn moved(original: &Element, dx: f64, dy: f64) -> Element {
        let mut element = original.clone();
        element.translate(dx, dy);
        element.is_temp = true;
        element
    }
}

impl Tool for SelectTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Select
    }

    fn handle_start(&mut self, ctx: &mut ToolContext<'_>, point: Point, modifiers: Modifiers) {
        self.cancel(ctx);
        if modifiers.shift {
            self.gesture = Gesture::Box {
                origin: point,
                current: point,
            };
            ctx.notify(EditorEvent::SelectionBoxStarted { origin: point });
            return;
        }

        let store = ctx.store;
        let Some(id) = store.element_at(point, ctx.config.hit_tolerance) else {
            set_selection(ctx, &[]);
            return;
        };
        set_selection(ctx, &[id]);
        if store.is_editable(id) {
            if let Some(original) = store.element(id) {
                self.gesture = Gesture::Move {
                    start: point,
                    original,
                    preview: None,
                };
            }
        }
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Box { origin, current } => {
                *current = point;
                let rect = Rect::from_points(*origin, point);
                ctx.notify(EditorEvent::SelectionBoxUpdated { rect });
            }
            Gesture::Move {
                start,
                original,
                preview,
            } => {
                let (dx, dy) = Self::drag_delta(ctx, *start, point);
                if preview.is_none() && dx == 0.0 && dy == 0.0 {
                    return;
                }
                let element = Self::moved(original, dx, dy);
                ctx.show_temp(preview, element);
            }
        }
    }

    fn handle_end(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Box { origin, .. } => {
                let rect = Rect::from_points(origin, point);
                let selected = ctx.store.elements_in_box(rect);
                set_selection(ctx, &selected);
                ctx.notify(EditorEvent::SelectionBoxEnded { rect, selected });
            }
            Gesture::Move {
                start,
                original,
                mut preview,
            } => {
                ctx.clear_temp(&mut preview);
                let (dx, dy) = Self::drag_delta(ctx, start, point);
                if dx != 0.0 || dy != 0.0 {
                    let mut element = Self::moved(&original, dx, dy);
                    element.is_temp = false;
                    log::debug!("Moving {} by ({}, {})", element.id, dx, dy);
                    ctx.mutate(Mutation::UpdateElement(element));
                }
            }
        }
    }

    fn handle_key(&mut self, ctx: &mut ToolContext<'_>, key: Key) {
        if key == Key::Escape {
            self.cancel(ctx);
        } else if key.is_delete() && !self.is_busy() && !ctx.selection.is_empty() {
            let ids = ctx.selection.clone();
            ctx.mutate(Mutation::RemoveElements(ids));
            set_selection(ctx, &[]);
        }
    }

    /// A cancelled box selection ends with an empty result and leaves the
    /// selection as it was.
    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => {}
            Gesture::Box { origin, current } => {
                ctx.notify(EditorEvent::SelectionBoxEnded {
                    rect: Rect::from_points(origin, current),
                    selected: Vec::new(),
                });
            }
            Gesture::Move { mut preview, .. } => {
                ctx.clear_temp(&mut preview);
            }
        }
    }

    fn is_busy(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }
}

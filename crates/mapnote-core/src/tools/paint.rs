//! Paint bucket: picks or applies colors on click.

use super::{Tool, ToolContext, ToolKind};
use crate::input::Modifiers;
use crate::store::Mutation;
use kurbo::Point;

/// Click effects by modifier priority: `alt` picks the target's colors,
/// `shift` applies the working fill, anything else applies the working stroke.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaintTool;

impl Tool for PaintTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Paint
    }

    fn handle_start(&mut self, ctx: &mut ToolContext<'_>, point: Point, modifiers: Modifiers) {
        let store = ctx.store;
        let Some(id) = store.element_at(point, ctx.config.hit_tolerance) else {
            return;
        };
        let Some(target) = store.element_ref(id) else {
            return;
        };

        if modifiers.alt {
            ctx.settings.fill = target.color;
            ctx.settings.stroke = target.border_color;
            log::debug!("Picked colors {} / {} from {}", target.color, target.border_color, id);
            return;
        }
        if !store.is_editable(id) {
            log::warn!("paint tool: element {} is locked", id);
            return;
        }

        let mut painted = target.clone();
        if modifiers.shift {
            painted.color = ctx.settings.fill;
        } else {
            painted.border_color = ctx.settings.stroke;
        }
        if &painted != target {
            ctx.mutate(Mutation::UpdateElement(painted));
        }
    }

    fn handle_move(&mut self, _ctx: &mut ToolContext<'_>, _point: Point, _modifiers: Modifiers) {}

    fn handle_end(&mut self, _ctx: &mut ToolContext<'_>, _point: Point, _modifiers: Modifiers) {}

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn is_busy(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::element::{Color, Element, ElementId, ShapeKind};

    fn target(h: &mut Harness) -> ElementId {
        let mut e = Element::new(ShapeKind::Rect, "zone", h.store.active_layer_id());
        e.set_box(Point::new(0.0, 0.0), Point::new(40.0, 40.0));
        e.color = Color::new(1, 2, 3, 255);
        e.border_color = Color::new(4, 5, 6, 255);
        let id = e.id;
        h.store.add_element(e).unwrap();
        id
    }

    #[test]
    fn test_alt_picks_without_mutation() {
        let mut h = Harness::new();
        target(&mut h);
        let effects = h.run(|ctx| PaintTool.handle_start(ctx, Point::new(10.0, 10.0), Modifiers::ALT));
        assert!(effects.is_empty());
        assert_eq!(h.settings.fill, Color::new(1, 2, 3, 255));
        assert_eq!(h.settings.stroke, Color::new(4, 5, 6, 255));
    }

    #[test]
    fn test_alt_wins_over_shift() {
        let mut h = Harness::new();
        let id = target(&mut h);
        let both = Modifiers {
            alt: true,
            shift: true,
            ..Modifiers::NONE
        };
        let effects = h.run(|ctx| PaintTool.handle_start(ctx, Point::new(10.0, 10.0), both));
        assert!(effects.is_empty());
        assert_eq!(h.store.element(id).unwrap().color, Color::new(1, 2, 3, 255));
    }

    #[test]
    fn test_shift_fills_and_plain_strokes() {
        let mut h = Harness::new();
        let id = target(&mut h);
        h.settings.fill = Color::white();
        h.settings.stroke = Color::new(200, 0, 0, 255);

        h.run(|ctx| PaintTool.handle_start(ctx, Point::new(10.0, 10.0), Modifiers::SHIFT));
        let painted = h.store.element(id).unwrap();
        assert_eq!(painted.color, Color::white());
        assert_eq!(painted.border_color, Color::new(4, 5, 6, 255));

        h.run(|ctx| PaintTool.handle_start(ctx, Point::new(10.0, 10.0), Modifiers::NONE));
        let painted = h.store.element(id).unwrap();
        assert_eq!(painted.border_color, Color::new(200, 0, 0, 255));
    }

    #[test]
    fn test_miss_does_nothing() {
        let mut h = Harness::new();
        target(&mut h);
        let effects = h.run(|ctx| PaintTool.handle_start(ctx, Point::new(300.0, 300.0), Modifiers::NONE));
        assert!(effects.is_empty());
    }
}

//! Eraser: removes everything touched during one drag as a single batch.

use super::{Tool, ToolContext, ToolKind};
use crate::element::ElementId;
use crate::input::Modifiers;
use crate::store::Mutation;
use kurbo::Point;

#[derive(Debug, Clone, Default)]
pub struct EraserTool {
    erasing: bool,
    /// Touched elements in first-touch order, without duplicates.
    touched: Vec<ElementId>,
}

impl EraserTool {
    pub fn touched(&self) -> &[ElementId] {
        &self.touched
    }

    fn collect(&mut self, ctx: &ToolContext<'_>, point: Point) {
        for id in ctx.store.elements_at(point, ctx.config.hit_tolerance) {
            if ctx.store.is_editable(id) && !self.touched.contains(&id) {
                self.touched.push(id);
            }
        }
    }
}

impl Tool for EraserTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Eraser
    }

    fn handle_start(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        self.touched.clear();
        self.erasing = true;
        self.collect(ctx, point);
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        if self.erasing {
            self.collect(ctx, point);
        }
    }

    fn handle_end(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        if !self.erasing {
            return;
        }
        self.collect(ctx, point);
        self.erasing = false;
        let ids = std::mem::take(&mut self.touched);
        if !ids.is_empty() {
            log::debug!("Erasing {} elements", ids.len());
            ctx.mutate(Mutation::RemoveElements(ids));
        }
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) {
        self.erasing = false;
        self.touched.clear();
    }

    fn is_busy(&self) -> bool {
        self.erasing
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::element::{Element, ShapeKind};
    use crate::input::Key;

    fn rect(h: &mut Harness, x: f64, y: f64, size: f64) -> ElementId {
        let mut e = Element::new(ShapeKind::Rect, "zone", h.store.active_layer_id());
        e.set_box(Point::new(x, y), Point::new(x + size, y + size));
        let id = e.id;
        h.store.add_element(e).unwrap();
        id
    }

    #[test]
    fn test_one_batch_without_duplicates() {
        let mut h = Harness::new();
        let a = rect(&mut h, 0.0, 0.0, 100.0);
        let b = rect(&mut h, 50.0, 50.0, 100.0);
        let untouched = rect(&mut h, 500.0, 500.0, 10.0);

        let mut tool = EraserTool::default();
        let effects = h.run(|ctx| {
            tool.handle_start(ctx, Point::new(10.0, 10.0), Modifiers::NONE);
            for _ in 0..3 {
                tool.handle_move(ctx, Point::new(75.0, 75.0), Modifiers::NONE);
                tool.handle_move(ctx, Point::new(20.0, 20.0), Modifiers::NONE);
            }
            tool.handle_end(ctx, Point::new(75.0, 75.0), Modifiers::NONE);
        });

        assert_eq!(mutations(&effects), vec![&Mutation::RemoveElements(vec![a, b])]);
        assert_eq!(h.store.len(), 1);
        assert!(h.store.contains(untouched));
    }

    #[test]
    fn test_locked_elements_survive() {
        let mut h = Harness::new();
        let id = rect(&mut h, 0.0, 0.0, 50.0);
        let mut locked = h.store.element(id).unwrap();
        locked.locked = true;
        h.store.update_element(locked).unwrap();

        let mut tool = EraserTool::default();
        let effects = h.run(|ctx| {
            tool.handle_start(ctx, Point::new(10.0, 10.0), Modifiers::NONE);
            tool.handle_end(ctx, Point::new(10.0, 10.0), Modifiers::NONE);
        });
        assert!(effects.is_empty());
        assert!(h.store.contains(id));
    }

    #[test]
    fn test_escape_cancels() {
        let mut h = Harness::new();
        rect(&mut h, 0.0, 0.0, 50.0);
        let mut tool = EraserTool::default();
        let effects = h.run(|ctx| {
            tool.handle_start(ctx, Point::new(10.0, 10.0), Modifiers::NONE);
            tool.handle_key(ctx, Key::Escape);
            tool.handle_end(ctx, Point::new(10.0, 10.0), Modifiers::NONE);
        });
        assert!(effects.is_empty());
        assert_eq!(h.store.len(), 1);
    }
}

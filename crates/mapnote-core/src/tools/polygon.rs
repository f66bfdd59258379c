//! Multi-click polygon tool.

use super::{Tool, ToolContext, ToolKind};
use crate::element::{Element, ShapeKind};
use crate::input::{Key, Modifiers};
use crate::store::Mutation;
use kurbo::Point;

/// Fixed vertices of a multi-click gesture plus its preview element.
///
/// The fixed list only grows on clicks; pointer motion builds a separate
/// preview list and never touches it.
#[derive(Debug, Clone, Default)]
pub struct VertexBuffer {
    fixed: Vec<Point>,
    temp: Option<Element>,
}

impl VertexBuffer {
    pub fn fixed(&self) -> &[Point] {
        &self.fixed
    }

    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty()
    }

    /// Append a vertex unless it repeats the last one. Returns true if added.
    pub fn push(&mut self, point: Point) -> bool {
        if self.fixed.last() == Some(&point) {
            return false;
        }
        self.fixed.push(point);
        true
    }

    /// Show the fixed vertices followed by the live pointer.
    pub fn preview(&mut self, ctx: &mut ToolContext<'_>, shape: ShapeKind, live: Option<Point>) {
        if self.fixed.is_empty() {
            return;
        }
        let mut points = self.fixed.clone();
        points.extend(live);
        let mut element = match &self.temp {
            Some(existing) => existing.clone(),
            None => ctx.new_element(shape),
        };
        element.set_points(&points);
        ctx.show_temp(&mut self.temp, element);
    }

    /// Take the fixed vertices, dropping the preview.
    pub fn finish(&mut self, ctx: &mut ToolContext<'_>) -> (Vec<Point>, Option<Element>) {
        let temp = ctx.clear_temp(&mut self.temp);
        (std::mem::take(&mut self.fixed), temp)
    }

    pub fn clear(&mut self, ctx: &mut ToolContext<'_>) {
        self.fixed.clear();
        ctx.clear_temp(&mut self.temp);
    }
}

/// Click to add vertices; double-click or Enter closes the polygon.
#[derive(Debug, Clone, Default)]
pub struct PolygonTool {
    vertices: VertexBuffer,
}

impl PolygonTool {
    /// Vertices placed so far.
    pub fn vertices(&self) -> &[Point] {
        self.vertices.fixed()
    }

    fn finalize(&mut self, ctx: &mut ToolContext<'_>) {
        let (points, temp) = self.vertices.finish(ctx);
        if points.len() < 3 {
            log::debug!("Polygon discarded with {} vertices", points.len());
            return;
        }
        let mut element = temp.unwrap_or_else(|| ctx.new_element(ShapeKind::Polygon));
        element.set_points(&points);
        element.is_temp = false;
        log::debug!("Committing polygon {} with {} vertices", element.id, points.len());
        ctx.mutate(Mutation::AddElement(element));
    }
}

impl Tool for PolygonTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Polygon
    }

    fn handle_start(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        if self.vertices.is_empty() && !ctx.can_draw() {
            log::warn!("polygon tool: active layer does not accept drawing");
            return;
        }
        let point = ctx.snap(point);
        if self.vertices.push(point) {
            self.vertices.preview(ctx, ShapeKind::Polygon, None);
        }
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        let live = ctx.snap(point);
        self.vertices.preview(ctx, ShapeKind::Polygon, Some(live));
    }

    fn handle_end(&mut self, _ctx: &mut ToolContext<'_>, _point: Point, _modifiers: Modifiers) {}

    fn handle_double_click(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        if self.vertices.is_empty() {
            return;
        }
        self.vertices.push(ctx.snap(point));
        self.finalize(ctx);
    }

    fn handle_key(&mut self, ctx: &mut ToolContext<'_>, key: Key) {
        match key {
            Key::Escape => self.cancel(ctx),
            Key::Enter => self.finalize(ctx),
            Key::Delete | Key::Backspace => {}
        }
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.vertices.clear(ctx);
    }

    fn is_busy(&self) -> bool {
        !self.vertices.is_empty()
    }
}

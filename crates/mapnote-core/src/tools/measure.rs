//! Distance measurement along a clicked polyline.

use super::polygon::VertexBuffer;
use super::{Tool, ToolContext, ToolKind};
use crate::element::ShapeKind;
use crate::geometry::polyline_length;
use crate::input::{Key, Modifiers};
use crate::store::Mutation;
use kurbo::Point;
use serde_json::Value;

/// Semantic tag of committed measurements.
pub const MEASURE_TYPE: &str = "measurement";

#[derive(Debug, Clone, Default)]
pub struct MeasureTool {
    vertices: VertexBuffer,
}

impl MeasureTool {
    fn finalize(&mut self, ctx: &mut ToolContext<'_>) {
        let (points, temp) = self.vertices.finish(ctx);
        let length = polyline_length(&points);
        if points.len() < 2 || length <= 0.0 {
            log::debug!("Measurement discarded with {} vertices", points.len());
            return;
        }
        let mut element = temp.unwrap_or_else(|| ctx.new_element(ShapeKind::Line));
        element.set_points(&points);
        element.kind = MEASURE_TYPE.to_string();
        element.name = format!("{:.1}", length);
        element.metadata.insert("length".to_string(), Value::from(length));
        element.is_temp = false;
        ctx.mutate(Mutation::AddElement(element));
    }
}

impl Tool for MeasureTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Measure
    }

    fn handle_start(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        if self.vertices.is_empty() && !ctx.can_draw() {
            log::warn!("measure tool: active layer does not accept drawing");
            return;
        }
        if self.vertices.push(ctx.snap(point)) {
            self.vertices.preview(ctx, ShapeKind::Line, None);
        }
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        let live = ctx.snap(point);
        self.vertices.preview(ctx, ShapeKind::Line, Some(live));
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

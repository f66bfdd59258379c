//! Text placement tool.

use super::{Tool, ToolContext, ToolKind};
use crate::element::ShapeKind;
use crate::input::Modifiers;
use crate::store::Mutation;
use kurbo::Point;

/// Average glyph width relative to the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Line height relative to the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.2;

/// Estimated box for `text` set at `font_size`.
pub fn estimate_text_size(text: &str, font_size: f64) -> (f64, f64) {
    let lines: Vec<&str> = text.lines().collect();
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let rows = lines.len().max(1);
    (
        widest as f64 * font_size * CHAR_WIDTH_FACTOR,
        rows as f64 * font_size * LINE_HEIGHT_FACTOR,
    )
}

/// Places the working text where the user clicks.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTool;

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn handle_start(&mut self, _ctx: &mut ToolContext<'_>, _point: Point, _modifiers: Modifiers) {}

    fn handle_move(&mut self, _ctx: &mut ToolContext<'_>, _point: Point, _modifiers: Modifiers) {}

    fn handle_end(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        let content = ctx.settings.text.trim().to_string();
        if content.is_empty() {
            log::debug!("Text tool: nothing to place");
            return;
        }
        if !ctx.can_draw() {
            log::warn!("text tool: active layer does not accept drawing");
            return;
        }

        let origin = ctx.snap(point);
        let font_size = ctx.config.default_font_size;
        let (width, height) = estimate_text_size(&content, font_size);
        let mut element = ctx.new_element(ShapeKind::Text);
        element.set_box(origin, Point::new(origin.x + width, origin.y + height));
        element.name = content.lines().next().unwrap_or_default().to_string();
        element.text = Some(content);
        element.font_size = Some(font_size);
        element.is_temp = false;
        ctx.mutate(Mutation::AddElement(element));
    }

    fn cancel(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn is_busy(&self) -> bool {
        false
    }
}

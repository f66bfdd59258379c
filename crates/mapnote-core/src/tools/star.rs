//! Star tool: a polygon with alternating outer and inner vertices.

use super::{Tool, ToolContext, ToolKind};
use crate::element::{Element, ShapeKind};
use crate::geometry::distance;
use crate::input::Modifiers;
use kurbo::Point;
use std::f64::consts::PI;

/// Vertices of a star, first outer point straight up, going clockwise on screen.
pub fn star_vertices(center: Point, outer: f64, inner: f64, points: usize) -> Vec<Point> {
    let points = points.max(2);
    let step = PI / points as f64;
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let angle = -PI / 2.0 + step * i as f64;
            Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
        })
        .collect()
}

/// Press to fix the center, drag to size the outer radius.
#[derive(Debug, Clone, Default)]
pub struct StarTool {
    center: Option<Point>,
    radius: f64,
    temp: Option<Element>,
}

impl StarTool {
    fn preview(&mut self, ctx: &mut ToolContext<'_>, point: Point) {
        let (Some(center), Some(mut element)) = (self.center, self.temp.clone()) else {
            return;
        };
        self.radius = distance(center, ctx.snap(point));
        let inner = self.radius * ctx.config.star_inner_ratio;
        element.set_points(&star_vertices(center, self.radius, inner, ctx.config.star_points));
        ctx.show_temp(&mut self.temp, element);
    }
}

impl Tool for StarTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Star
    }

    fn handle_start(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        self.cancel(ctx);
        if !ctx.can_draw() {
            log::warn!("star tool: active layer does not accept drawing");
            return;
        }
        let center = ctx.snap(point);
        let mut element = ctx.new_element(ShapeKind::Polygon);
        element.set_points(&[center]);
        self.center = Some(center);
        self.radius = 0.0;
        ctx.show_temp(&mut self.temp, element);
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        self.preview(ctx, point);
    }

    fn handle_end(&mut self, ctx: &mut ToolContext<'_>, point: Point, _modifiers: Modifiers) {
        self.preview(ctx, point);
        if self.center.take().is_some() && self.radius >= ctx.config.min_element_size {
            ctx.commit_temp(&mut self.temp);
        } else {
            ctx.clear_temp(&mut self.temp);
        }
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.center = None;
        self.radius = 0.0;
        ctx.clear_temp(&mut self.temp);
    }

    fn is_busy(&self) -> bool {
        self.center.is_some()
    }
}

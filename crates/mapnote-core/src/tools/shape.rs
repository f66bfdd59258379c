//! Two-point drag tools: rectangle, circle and line.

use super::{Tool, ToolContext, ToolKind};
use crate::element::{Element, ShapeKind};
use crate::geometry::distance;
use crate::input::Modifiers;
use crate::snap::{constrain_axis, constrain_square};
use kurbo::Point;

/// Geometry rules for one drag tool.
#[derive(Debug, Clone, Copy)]
pub struct ShapeStrategy {
    pub kind: ToolKind,
    pub shape: ShapeKind,
    /// Write geometry spanned by `start` and `current` into the element.
    pub build: fn(&mut Element, Point, Point, Modifiers),
    /// Whether the finished element is big enough to keep.
    pub accept: fn(&Element, f64) -> bool,
}

fn build_rect(element: &mut Element, start: Point, current: Point, modifiers: Modifiers) {
    let end = if modifiers.shift { constrain_square(start, current) } else { current };
    element.set_box(start, end);
}

fn build_circle(element: &mut Element, start: Point, current: Point, _modifiers: Modifiers) {
    element.set_circle(start, distance(start, current));
}

fn build_line(element: &mut Element, start: Point, current: Point, modifiers: Modifiers) {
    let end = if modifiers.shift { constrain_axis(start, current) } else { current };
    element.set_points(&[start, end]);
}

fn accept_box(element: &Element, min: f64) -> bool {
    element.width >= min && element.height >= min
}

fn accept_radius(element: &Element, min: f64) -> bool {
    element.radius.is_some_and(|r| r >= min)
}

fn accept_length(element: &Element, min: f64) -> bool {
    match element.vertex_points().as_slice() {
        [a, b] => distance(*a, *b) >= min,
        _ => false,
    }
}

pub const RECTANGLE: ShapeStrategy = ShapeStrategy {
    kind: ToolKind::Rectangle,
    shape: ShapeKind::Rect,
    build: build_rect,
    accept: accept_box,
};

pub const CIRCLE: ShapeStrategy = ShapeStrategy {
    kind: ToolKind::Circle,
    shape: ShapeKind::Circle,
    build: build_circle,
    accept: accept_radius,
};

pub const LINE: ShapeStrategy = ShapeStrategy {
    kind: ToolKind::Line,
    shape: ShapeKind::Line,
    build: build_line,
    accept: accept_length,
};

/// Drag from a fixed start point to the live pointer.
#[derive(Debug, Clone)]
pub struct ShapeTool {
    strategy: ShapeStrategy,
    start: Option<Point>,
    temp: Option<Element>,
}

impl ShapeTool {
    pub fn new(strategy: ShapeStrategy) -> Self {
        Self {
            strategy,
            start: None,
            temp: None,
        }
    }

    pub fn rectangle() -> Self {
        Self::new(RECTANGLE)
    }

    pub fn circle() -> Self {
        Self::new(CIRCLE)
    }

    pub fn line() -> Self {
        Self::new(LINE)
    }

    fn preview(&mut self, ctx: &mut ToolContext<'_>, point: Point, modifiers: Modifiers) {
        let (Some(start), Some(mut element)) = (self.start, self.temp.clone()) else {
            return;
        };
        (self.strategy.build)(&mut element, start, ctx.snap(point), modifiers);
        ctx.show_temp(&mut self.temp, element);
    }
}

impl Tool for ShapeTool {
    fn kind(&self) -> ToolKind {
        self.strategy.kind
    }

    fn handle_start(&mut self, ctx: &mut ToolContext<'_>, point: Point, modifiers: Modifiers) {
        self.cancel(ctx);
        if !ctx.can_draw() {
            log::warn!("{} tool: active layer does not accept drawing", self.strategy.kind);
            return;
        }
        let start = ctx.snap(point);
        let mut element = ctx.new_element(self.strategy.shape);
        (self.strategy.build)(&mut element, start, start, modifiers);
        self.start = Some(start);
        ctx.show_temp(&mut self.temp, element);
    }

    fn handle_move(&mut self, ctx: &mut ToolContext<'_>, point: Point, modifiers: Modifiers) {
        self.preview(ctx, point, modifiers);
    }

    fn handle_end(&mut self, ctx: &mut ToolContext<'_>, point: Point, modifiers: Modifiers) {
        self.preview(ctx, point, modifiers);
        self.start = None;
        let keep = self
            .temp
            .as_ref()
            .is_some_and(|e| (self.strategy.accept)(e, ctx.config.min_element_size));
        if keep {
            ctx.commit_temp(&mut self.temp);
        } else {
            ctx.clear_temp(&mut self.temp);
        }
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        self.start = None;
        ctx.clear_temp(&mut self.temp);
    }

    fn is_busy(&self) -> bool {
        self.start.is_some()
    }
}

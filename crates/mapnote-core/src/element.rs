//! Annotation elements: the geometry addressed by id in the store.

use crate::geometry::{self, bounds_of, point_in_polygon, point_to_polyline_dist, rect_contains};
use crate::layer::LayerId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Geometric category of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned box at `(x, y)` with `width`/`height`.
    Rect,
    /// Circle centered on `(x, y)` with `radius`.
    Circle,
    /// Polyline through `points` (two points for a plain line).
    Line,
    /// Closed polygon through `points`.
    Polygon,
    /// Text box at `(x, y)` with `width`/`height`.
    Text,
}

/// A vertex belonging to an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub id: Uuid,
    /// Whether the user may drag this vertex.
    pub can_edit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounded: Option<bool>,
}

impl Vertex {
    /// Create an editable vertex.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            id: Uuid::new_v4(),
            can_edit: true,
            rounded: None,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<Point> for Vertex {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// A map annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// Semantic tag, e.g. `"power-point"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub shape: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub points: Vec<Vertex>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    /// Fill color.
    pub color: Color,
    pub border_color: Color,
    pub border_width: f64,
    pub opacity: f64,
    pub name: String,
    pub visible: bool,
    pub locked: bool,
    pub layer_id: LayerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Type-specific properties (voltage, diameter, flow direction, ...).
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Set while the element only exists as a gesture preview.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_temp: bool,
}

impl Element {
    /// Create an element with default styling and empty geometry.
    pub fn new(shape: ShapeKind, kind: impl Into<String>, layer_id: LayerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            shape,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            points: Vec::new(),
            radius: None,
            color: Color::transparent(),
            border_color: Color::black(),
            border_width: 2.0,
            opacity: 1.0,
            name: String::new(),
            visible: true,
            locked: false,
            layer_id,
            text: None,
            font_size: None,
            metadata: Map::new(),
            is_temp: false,
        }
    }

    /// Set box geometry from two corner points.
    pub fn set_box(&mut self, p1: Point, p2: Point) {
        self.x = p1.x.min(p2.x);
        self.y = p1.y.min(p2.y);
        self.width = (p2.x - p1.x).abs();
        self.height = (p2.y - p1.y).abs();
    }

    /// Set circle geometry; `(x, y)` becomes the center.
    pub fn set_circle(&mut self, center: Point, radius: f64) {
        self.x = center.x;
        self.y = center.y;
        self.radius = Some(radius);
        self.width = radius * 2.0;
        self.height = radius * 2.0;
    }

    /// Replace the vertex list and refit `x/y/width/height` to its bounding box.
    pub fn set_points(&mut self, points: &[Point]) {
        self.points = points.iter().copied().map(Vertex::from).collect();
        if let Some(rect) = bounds_of(points) {
            self.x = rect.x0;
            self.y = rect.y0;
            self.width = rect.width();
            self.height = rect.height();
        }
    }

    /// Vertex positions as points.
    pub fn vertex_points(&self) -> Vec<Point> {
        self.points.iter().map(Vertex::point).collect()
    }

    /// Center of a circle element (or top-left for other shapes).
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> Rect {
        match self.shape {
            ShapeKind::Circle => {
                let r = self.radius.unwrap_or(0.0);
                Rect::new(self.x - r, self.y - r, self.x + r, self.y + r)
            }
            ShapeKind::Line | ShapeKind::Polygon => {
                bounds_of(&self.vertex_points()).unwrap_or_else(|| Rect::from_origin_size(self.origin(), (0.0, 0.0)))
            }
            ShapeKind::Rect | ShapeKind::Text => {
                Rect::from_origin_size(self.origin(), (self.width, self.height))
            }
        }
    }

    /// Check whether a point hits this element.
    ///
    /// `tolerance` only widens stroke-like shapes (lines); areas use exact
    /// containment.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self.shape {
            ShapeKind::Rect | ShapeKind::Text => rect_contains(self.bounds(), point),
            ShapeKind::Circle => {
                geometry::distance(point, self.origin()) <= self.radius.unwrap_or(0.0)
            }
            ShapeKind::Polygon => point_in_polygon(point, &self.vertex_points()),
            ShapeKind::Line => {
                let slack = tolerance.max(0.0) + self.border_width / 2.0;
                point_to_polyline_dist(point, &self.vertex_points()) <= slack
            }
        }
    }

    /// Representative points used for area (box) selection.
    pub fn test_points(&self) -> Vec<Point> {
        match self.shape {
            ShapeKind::Rect | ShapeKind::Text => {
                let b = self.bounds();
                vec![
                    Point::new(b.x0, b.y0),
                    Point::new(b.x1, b.y0),
                    Point::new(b.x1, b.y1),
                    Point::new(b.x0, b.y1),
                    b.center(),
                ]
            }
            ShapeKind::Circle => {
                let c = self.origin();
                let r = self.radius.unwrap_or(0.0);
                vec![
                    c,
                    Point::new(c.x + r, c.y),
                    Point::new(c.x - r, c.y),
                    Point::new(c.x, c.y + r),
                    Point::new(c.x, c.y - r),
                ]
            }
            ShapeKind::Line | ShapeKind::Polygon => self.vertex_points(),
        }
    }

    /// Whether any test point lies inside `rect`.
    pub fn intersects_box(&self, rect: Rect) -> bool {
        self.test_points().into_iter().any(|p| rect_contains(rect, p))
    }

    /// Translate the element by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        for v in &mut self.points {
            v.x += dx;
            v.y += dy;
        }
    }

    /// Structural well-formedness check, independent of layers.
    pub fn validate(&self) -> Result<(), String> {
        if self.kind.trim().is_empty() {
            return Err("element type tag is empty".to_string());
        }
        let finite = [self.x, self.y, self.width, self.height, self.border_width, self.opacity]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.points.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err("non-finite coordinate".to_string());
        }
        if self.width < 0.0 || self.height < 0.0 || self.border_width < 0.0 {
            return Err("negative size".to_string());
        }
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(format!("opacity {} out of range", self.opacity));
        }
        match self.shape {
            ShapeKind::Rect => Ok(()),
            ShapeKind::Circle => match self.radius {
                Some(r) if r.is_finite() && r > 0.0 => Ok(()),
                _ => Err("circle needs a positive radius".to_string()),
            },
            ShapeKind::Line if self.points.len() < 2 => {
                Err(format!("line needs 2 points, got {}", self.points.len()))
            }
            ShapeKind::Polygon if self.points.len() < 3 => {
                Err(format!("polygon needs 3 points, got {}", self.points.len()))
            }
            ShapeKind::Text if self.text.as_deref().is_none_or(str::is_empty) => {
                Err("text element has no content".to_string())
            }
            ShapeKind::Line | ShapeKind::Polygon | ShapeKind::Text => Ok(()),
        }
    }
}

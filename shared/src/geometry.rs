//! # Geometry
//!
//! Point-in-triangle containment and Cartesian to barycentric conversion for
//! the ternary input. Everything here is pure: no operation panics, and
//! degenerate input produces a defined fallback rather than an error.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Weights below this (negative) value mean the click is outside the triangle.
pub const CLICK_TOLERANCE: f64 = 0.001;

/// `|denom|` at or below this value marks a degenerate triangle.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Width of the SVG view box the triangle is drawn in
pub const VIEWBOX_WIDTH: f64 = 400.0;

/// Height of the SVG view box the triangle is drawn in
pub const VIEWBOX_HEIGHT: f64 = 350.0;

/// Gap between the triangle and the view box edges
pub const VIEWBOX_PADDING: f64 = 12.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("triangle vertices are collinear (denominator {0})")]
    Degenerate(f64),

    #[error("viewport {width}x{height} with padding {padding} leaves no drawable area")]
    InvalidViewport { width: f64, height: f64, padding: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn sub(self, other: Point) -> (f64, f64) {
        (self.x - other.x, self.y - other.y)
    }
}

fn dot(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.0 + u.1 * v.1
}

/// Barycentric weights, one per triangle vertex, in vertex order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarycentricWeights {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl BarycentricWeights {
    pub fn sum(&self) -> f64 {
        self.a + self.b + self.c
    }

    /// True when every weight is at or above `-tolerance`.
    pub fn within_tolerance(&self, tolerance: f64) -> bool {
        self.a >= -tolerance && self.b >= -tolerance && self.c >= -tolerance
    }

    /// Clamp negative weights to zero and rescale so the three sum to 1.
    pub fn clamp_normalized(&self) -> BarycentricWeights {
        let a = self.a.max(0.0);
        let b = self.b.max(0.0);
        let c = self.c.max(0.0);
        let sum = a + b + c;
        let sum = if sum == 0.0 { 1.0 } else { sum };
        BarycentricWeights {
            a: a / sum,
            b: b / sum,
            c: c / sum,
        }
    }
}

/// Containment test using the sign of the triangle's double-area proxy.
///
/// Works for either winding order and counts points on an edge as inside.
/// A degenerate triangle (`D == 0`) only contains points for which both
/// terms are zero; callers must not build one in the first place.
pub fn point_in_triangle(pt: Point, v1: Point, v2: Point, v3: Point) -> bool {
    let dx = pt.x - v3.x;
    let dy = pt.y - v3.y;
    let dx21 = v3.x - v2.x;
    let dy12 = v2.y - v3.y;
    let d = dy12 * (v1.x - v3.x) + dx21 * (v1.y - v3.y);
    let s = dy12 * dx + dx21 * dy;
    let t = (v3.y - v1.y) * dx + (v1.x - v3.x) * dy;

    if d < 0.0 {
        s <= 0.0 && t <= 0.0 && s + t >= d
    } else {
        s >= 0.0 && t >= 0.0 && s + t <= d
    }
}

/// Express `pt` as `a*A + b*B + c*C` with `a + b + c = 1`.
///
/// For a degenerate triangle the result is `(1, 0, 0)` and a warning is
/// logged. Use [`Triangle::barycentric`] to rule that case out up front.
pub fn cartesian_to_barycentric(pt: Point, a: Point, b: Point, c: Point) -> BarycentricWeights {
    let v0 = b.sub(a);
    let v1 = c.sub(a);
    let v2 = pt.sub(a);

    let d00 = dot(v0, v0);
    let d01 = dot(v0, v1);
    let d11 = dot(v1, v1);
    let d20 = dot(v2, v0);
    let d21 = dot(v2, v1);

    let denom = d00 * d11 - d01 * d01;
    if denom.abs() <= DEGENERATE_EPSILON {
        warn!(
            "Degenerate triangle {:?} {:?} {:?} (denom {}), falling back to first vertex",
            a, b, c, denom
        );
        return BarycentricWeights { a: 1.0, b: 0.0, c: 0.0 };
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    BarycentricWeights {
        a: 1.0 - v - w,
        b: v,
        c: w,
    }
}

/// Size of the drawing surface the triangle is inscribed in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, padding: f64) -> Self {
        Self { width, height, padding }
    }

    /// Map a position measured in rendered pixels (relative to the element's
    /// top-left corner) onto this viewport's coordinate system.
    pub fn map_rendered(&self, x: f64, y: f64, rendered_width: f64, rendered_height: f64) -> Point {
        let sx = if rendered_width > 0.0 { self.width / rendered_width } else { 1.0 };
        let sy = if rendered_height > 0.0 { self.height / rendered_height } else { 1.0 };
        Point::new(x * sx, y * sy)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(VIEWBOX_WIDTH, VIEWBOX_HEIGHT, VIEWBOX_PADDING)
    }
}

/// A non-degenerate triangle. Vertex order carries the axis labels:
/// `a` innovation, `b` equality, `c` stability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Triangle {
    a: Point,
    b: Point,
    c: Point,
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Result<Self, GeometryError> {
        let v0 = b.sub(a);
        let v1 = c.sub(a);
        let denom = dot(v0, v0) * dot(v1, v1) - dot(v0, v1) * dot(v0, v1);
        if denom.abs() <= DEGENERATE_EPSILON {
            return Err(GeometryError::Degenerate(denom));
        }
        Ok(Self { a, b, c })
    }

    /// Bottom-left, bottom-right and top-centre of the padded viewport.
    pub fn from_viewport(viewport: Viewport) -> Result<Self, GeometryError> {
        let Viewport { width, height, padding } = viewport;
        if !(width > 2.0 * padding && height > 2.0 * padding) {
            return Err(GeometryError::InvalidViewport { width, height, padding });
        }
        Self::new(
            Point::new(padding, height - padding),
            Point::new(width - padding, height - padding),
            Point::new(width / 2.0, padding),
        )
    }

    pub fn vertices(&self) -> [Point; 3] {
        [self.a, self.b, self.c]
    }

    pub fn contains(&self, pt: Point) -> bool {
        point_in_triangle(pt, self.a, self.b, self.c)
    }

    pub fn barycentric(&self, pt: Point) -> BarycentricWeights {
        cartesian_to_barycentric(pt, self.a, self.b, self.c)
    }

    /// Inverse of [`Triangle::barycentric`].
    pub fn to_cartesian(&self, w: &BarycentricWeights) -> Point {
        Point::new(
            w.a * self.a.x + w.b * self.b.x + w.c * self.c.x,
            w.a * self.a.y + w.b * self.b.y + w.c * self.c.y,
        )
    }

    /// SVG `points` attribute for a `<polygon>`.
    pub fn svg_points(&self) -> String {
        self.vertices()
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

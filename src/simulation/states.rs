//! Core state types for the body simulation.
//!
//! - `Shape` is the tagged shape payload (circle or axis-aligned rectangle)
//! - `Body` carries kinematic state, derived mass and its outgoing spring edges
//!
//! Spring edges are stored as indices into the owning simulation's body list.
//! Bodies are never removed one at a time (only by a bulk clear), so indices stay valid.

use nalgebra::Vector2;

use crate::error::{Error, Result};

pub type NVec2 = Vector2<f64>;

/// Default restitution multiplier for wall contact (no energy loss)
pub const DEFAULT_DAMPING: f64 = 1.0;

/// Cosmetic body color, carried through for renderers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self { r: 1.0, g: 1.0, b: 1.0 }
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Self { r: c[0], g: c[1], b: c[2] }
    }
}

/// Discriminant of [`Shape`], used to index the collision dispatch table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Circle = 0,
    Rectangle = 1,
}

impl ShapeKind {
    pub const COUNT: usize = 2;
}

/// Shape payload. Circles are positioned by their center, rectangles by their
/// top-left (minimum) corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f64 },
    Rectangle { width: f64, height: f64 },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
        }
    }

    /// Mass from shape parameters.
    /// - circle: pi * r^2
    /// - rectangle: max(w, h)^2 * min(w, h) * cubic_pixel_mass
    pub fn mass(&self, cubic_pixel_mass: f64) -> f64 {
        match *self {
            Shape::Circle { radius } => std::f64::consts::PI * radius * radius,
            Shape::Rectangle { width, height } => {
                let big = width.max(height);
                let small = width.min(height);
                big * big * small * cubic_pixel_mass
            }
        }
    }

    fn validate(&self, cubic_pixel_mass: f64) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        match *self {
            Shape::Circle { radius } => {
                if !positive(radius) {
                    return Err(Error::InvalidShape(format!(
                        "radius must be finite and > 0, got {radius}"
                    )));
                }
            }
            Shape::Rectangle { width, height } => {
                if !positive(width) || !positive(height) {
                    return Err(Error::InvalidShape(format!(
                        "width and height must be finite and > 0, got {width} x {height}"
                    )));
                }
                if !positive(cubic_pixel_mass) {
                    return Err(Error::InvalidShape(format!(
                        "rectangle density must be finite and > 0, got {cubic_pixel_mass}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec2, // position
    pub v: NVec2, // velocity
    pub damping: f64, // restitution on wall contact and in collisions
    pub color: Color,
    shape: Shape,
    m: f64, // derived from shape, never set directly
    pub(crate) springs: Vec<usize>, // outgoing edges, owned by this body
    pub(crate) incoming_springs: usize, // edges elsewhere that target this body
}

impl Body {
    /// Build a body, deriving its mass from `shape`.
    ///
    /// `cubic_pixel_mass` is the rectangle density constant; circles ignore it.
    pub fn new(shape: Shape, x: NVec2, v: NVec2, cubic_pixel_mass: f64) -> Result<Self> {
        shape.validate(cubic_pixel_mass)?;
        if !x.iter().chain(v.iter()).all(|c| c.is_finite()) {
            return Err(Error::InvalidParam(
                "position and velocity must be finite".into(),
            ));
        }
        Ok(Self {
            x,
            v,
            damping: DEFAULT_DAMPING,
            color: Color::default(),
            shape,
            m: shape.mass(cubic_pixel_mass),
            springs: Vec::new(),
            incoming_springs: 0,
        })
    }

    pub fn circle(x: NVec2, v: NVec2, radius: f64) -> Result<Self> {
        // density is unused for circles
        Self::new(Shape::Circle { radius }, x, v, 1.0)
    }

    pub fn rectangle(x: NVec2, v: NVec2, width: f64, height: f64, cubic_pixel_mass: f64) -> Result<Self> {
        Self::new(Shape::Rectangle { width, height }, x, v, cubic_pixel_mass)
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Replace the shape and recompute the mass
    pub fn set_shape(&mut self, shape: Shape, cubic_pixel_mass: f64) -> Result<()> {
        shape.validate(cubic_pixel_mass)?;
        self.shape = shape;
        self.m = shape.mass(cubic_pixel_mass);
        Ok(())
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn mass(&self) -> f64 {
        self.m
    }

    /// Radius if this body is a circle
    #[inline]
    pub fn radius(&self) -> Option<f64> {
        match self.shape {
            Shape::Circle { radius } => Some(radius),
            Shape::Rectangle { .. } => None,
        }
    }

    /// Indices of the bodies this body pulls on with a spring
    #[inline]
    pub fn springs(&self) -> &[usize] {
        &self.springs
    }

    #[inline]
    pub fn incoming_springs(&self) -> usize {
        self.incoming_springs
    }

    /// 1/2 m |v|^2
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.m * self.v.norm_squared()
    }

    pub fn momentum(&self) -> NVec2 {
        self.m * self.v
    }
}

//! Lengths and points.
//!
//! All geometry in the crate is expressed in [Pt] (1/72 of an inch). [Mm] and [In]
//! exist so that paper and margin sizes can be written in whatever unit is natural
//! and converted with `.into()`.
//!
//! Coordinates follow screen conventions: x grows to the right and y grows
//! downwards. The PDF canvas flips the y-axis when it writes content streams.

use derive_more::{Add, AddAssign, Deref, Display, From, Into, Neg, Sub, SubAssign, Sum};
use std::ops::{Div, Mul};

/// A length in points, the canonical unit of the crate
#[derive(
    Debug,
    Default,
    Copy,
    Clone,
    PartialEq,
    PartialOrd,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Neg,
    Sum,
    Deref,
    Display,
    From,
    Into,
)]
pub struct Pt(pub f32);

/// A length in millimetres
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Display, From, Into)]
pub struct Mm(pub f32);

/// A length in inches
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, Sub, Display, From, Into)]
pub struct In(pub f32);

impl From<Mm> for Pt {
    fn from(mm: Mm) -> Self {
        Pt(mm.0 * 72.0 / 25.4)
    }
}

impl From<In> for Pt {
    fn from(inch: In) -> Self {
        Pt(inch.0 * 72.0)
    }
}

impl From<Pt> for Mm {
    fn from(pt: Pt) -> Self {
        Mm(pt.0 * 25.4 / 72.0)
    }
}

impl From<Pt> for In {
    fn from(pt: Pt) -> Self {
        In(pt.0 / 72.0)
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;

    fn mul(self, rhs: f32) -> Pt {
        Pt(self.0 * rhs)
    }
}

impl Mul<Pt> for f32 {
    type Output = Pt;

    fn mul(self, rhs: Pt) -> Pt {
        Pt(self * rhs.0)
    }
}

impl Div<f32> for Pt {
    type Output = Pt;

    fn div(self, rhs: f32) -> Pt {
        Pt(self.0 / rhs)
    }
}

/// Dividing two lengths yields a plain ratio
impl Div<Pt> for Pt {
    type Output = f32;

    fn div(self, rhs: Pt) -> f32 {
        self.0 / rhs.0
    }
}

impl Pt {
    pub const ZERO: Pt = Pt(0.0);

    pub fn abs(self) -> Pt {
        Pt(self.0.abs())
    }

    pub fn min(self, other: Pt) -> Pt {
        Pt(self.0.min(other.0))
    }

    pub fn max(self, other: Pt) -> Pt {
        Pt(self.0.max(other.0))
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

/// A two-dimensional point. The x-axis grows left to right, the y-axis top to bottom.
#[derive(Debug, Default, Copy, Clone, PartialEq, Add, AddAssign, Sub, SubAssign, Neg)]
pub struct Point {
    pub x: Pt,
    pub y: Pt,
}

/// Shorthand for a point at `(0, 0)`
pub const ORIGIN: Point = Point {
    x: Pt::ZERO,
    y: Pt::ZERO,
};

impl Point {
    pub fn new<X: Into<Pt>, Y: Into<Pt>>(x: X, y: Y) -> Point {
        Point {
            x: x.into(),
            y: y.into(),
        }
    }
}

impl<X: Into<Pt>, Y: Into<Pt>> From<(X, Y)> for Point {
    fn from((x, y): (X, Y)) -> Self {
        Point::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

use crate::units::*;

/// A rectangle, specified by two opposite corners.
///
/// In layout space (y grows downwards) the first corner is the top-left one.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Rect {
    /// The x-coordinate of the first (typically, top-left) corner.
    pub x1: Pt,
    /// The y-coordinate of the first (typically, top-left) corner.
    pub y1: Pt,
    /// The x-coordinate of the second (typically, bottom-right) corner.
    pub x2: Pt,
    /// The y-coordinate of the second (typically, bottom-right) corner.
    pub y2: Pt,
}

impl Rect {
    /// Create a rectangle from its top-left corner and its size
    pub fn from_xywh(x: Pt, y: Pt, width: Pt, height: Pt) -> Rect {
        Rect {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn width(&self) -> Pt {
        self.x2 - self.x1
    }

    pub fn height(&self) -> Pt {
        self.y2 - self.y1
    }

    pub fn top_left(&self) -> Point {
        Point {
            x: self.x1,
            y: self.y1,
        }
    }

    /// The same rectangle moved by `offset`
    pub fn translated(&self, offset: Point) -> Rect {
        Rect {
            x1: self.x1 + offset.x,
            y1: self.y1 + offset.y,
            x2: self.x2 + offset.x,
            y2: self.y2 + offset.y,
        }
    }

    /// The smallest rectangle containing both `self` and `point`
    pub fn expanded_to(&self, point: Point) -> Rect {
        Rect {
            x1: self.x1.min(point.x),
            y1: self.y1.min(point.y),
            x2: self.x2.max(point.x),
            y2: self.y2.max(point.y),
        }
    }
}

impl From<Rect> for pdf_writer::Rect {
    fn from(r: Rect) -> Self {
        pdf_writer::Rect {
            x1: r.x1.into(),
            y1: r.y1.into(),
            x2: r.x2.into(),
            y2: r.y2.into(),
        }
    }
}

impl From<&Rect> for pdf_writer::Rect {
    fn from(r: &Rect) -> Self {
        (*r).into()
    }
}

//! 2D transformation matrices for placing canvas content on PDF pages.

use crate::units::*;
use pdf_writer::Content;

/// An affine transformation matrix `[a b c d e f]`, as used by the PDF `cm` operator:
/// ```text
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
/// ```
///
/// Transforms chain with [`then`](Transform::then); operations apply in the order
/// they are chained.
///
/// ```
/// use pageflow::{Pt, Point, Transform};
///
/// // move a page's worth of canvas content back to the PDF origin, y pointing up
/// let to_page = Transform::canvas_to_page(Point::new(Pt(600.0), Pt(0.0)), Pt(800.0));
/// assert_eq!(to_page.apply(Point::new(Pt(610.0), Pt(10.0))), Point::new(Pt(10.0), Pt(790.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Transform {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(x: Pt, y: Pt) -> Self {
        Transform {
            e: *x,
            f: *y,
            ..Self::identity()
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Transform {
            a: sx,
            d: sy,
            ..Self::identity()
        }
    }

    /// Map canvas space (y down, pages side by side) onto a single PDF page (y up)
    /// whose paper starts at `page_origin` and is `page_height` tall
    pub fn canvas_to_page(page_origin: Point, page_height: Pt) -> Self {
        Transform::translate(-page_origin.x, -page_origin.y)
            .then(Transform::scale(1.0, -1.0))
            .then(Transform::translate(Pt::ZERO, page_height))
    }

    /// Combine this transform with another (self * other)
    pub fn then(self, other: Transform) -> Self {
        Transform {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn apply(&self, point: Point) -> Point {
        Point {
            x: Pt(self.a * *point.x + self.c * *point.y + self.e),
            y: Pt(self.b * *point.x + self.d * *point.y + self.f),
        }
    }

    pub fn write_to_content(&self, content: &mut Content) {
        content.transform([self.a, self.b, self.c, self.d, self.e, self.f]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chained_transforms_apply_in_order() {
        let t = Transform::scale(2.0, 2.0).then(Transform::translate(Pt(1.0), Pt(0.0)));
        assert_eq!(t.apply(Point::new(Pt(3.0), Pt(4.0))), Point::new(Pt(7.0), Pt(8.0)));
        assert_eq!(Transform::default().apply(Point::new(Pt(3.0), Pt(4.0))), Point::new(Pt(3.0), Pt(4.0)));
    }

    #[test]
    fn canvas_to_page_flips_y() {
        let t = Transform::canvas_to_page(ORIGIN, Pt(100.0));
        assert_eq!(t.apply(ORIGIN), Point::new(Pt(0.0), Pt(100.0)));
        assert_eq!(t.apply(Point::new(Pt(5.0), Pt(100.0))), Point::new(Pt(5.0), Pt(0.0)));
    }
}

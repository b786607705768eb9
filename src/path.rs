use crate::breakable::Breakable;
use crate::canvas::{Canvas, PathElement, Pen, StrokePath};
use crate::clip::{clip_rect, ClipWindow};
use crate::error::LayoutError;
use crate::flowable::DocumentPosition;
use crate::rect::Rect;
use crate::units::*;

/// A stroked outline made of straight and curved segments.
///
/// Element coordinates are relative to the path's own position in the scene. A
/// path is drawn in one piece unless it is made [breakable](Path::breakable), in
/// which case it is split wherever it crosses a flowable line break.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    elements: Vec<PathElement>,
    pen: Pen,
    breakable: bool,
    /// Cached during a render pass
    bounds: Option<Rect>,
}

impl Path {
    pub fn new(pen: Pen) -> Path {
        Path {
            pen,
            ..Path::default()
        }
    }

    /// A single straight line from `start` to `end`
    pub fn straight_line<A: Into<Point>, B: Into<Point>>(start: A, end: B, pen: Pen) -> Path {
        Path::new(pen).move_to(start).line_to(end)
    }

    pub fn move_to<P: Into<Point>>(mut self, point: P) -> Path {
        self.elements.push(PathElement::MoveTo(point.into()));
        self
    }

    pub fn line_to<P: Into<Point>>(mut self, point: P) -> Path {
        self.elements.push(PathElement::LineTo(point.into()));
        self
    }

    pub fn curve_to<P: Into<Point>>(mut self, c1: P, c2: P, end: P) -> Path {
        self.elements.push(PathElement::CurveTo {
            c1: c1.into(),
            c2: c2.into(),
            end: end.into(),
        });
        self
    }

    /// Allow the path to be split across flowable line breaks
    pub fn breakable(self) -> Path {
        Path {
            breakable: true,
            ..self
        }
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    /// The box containing every element, control points included. Empty paths have
    /// no bounds.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds.or_else(|| self.compute_bounds())
    }

    fn compute_bounds(&self) -> Option<Rect> {
        let mut points = self.elements.iter().flat_map(PathElement::points);
        let first = points.next()?;
        let start = Rect {
            x1: first.x,
            y1: first.y,
            x2: first.x,
            y2: first.y,
        };
        Some(points.fold(start, |rect, point| rect.expanded_to(point)))
    }

    fn render_slice(
        &self,
        pos: DocumentPosition,
        window: ClipWindow,
        canvas: &mut dyn Canvas,
    ) -> Result<(), LayoutError> {
        let Some(bounds) = self.bounds() else {
            return Ok(());
        };
        let clip = clip_rect(bounds, window, self.pen.thickness / 2.0)?;
        let origin = pos.point
            - Point {
                x: window.shift(),
                y: Pt::ZERO,
            };
        canvas.stroke_path(
            pos.page_index,
            StrokePath {
                elements: self.elements.iter().map(|e| e.translated(origin)).collect(),
                pen: self.pen,
                clip: clip.translated(pos.point),
            },
        );
        Ok(())
    }
}

impl Breakable for Path {
    /// How far the path reaches to the right of its own position
    fn breakable_length(&self) -> Pt {
        if !self.breakable {
            return Pt::ZERO;
        }
        self.bounds()
            .map(|bounds| bounds.x2.max(Pt::ZERO))
            .unwrap_or(Pt::ZERO)
    }

    fn has_attribute(&self, name: &str) -> bool {
        name == "path"
    }

    fn prepare(&mut self) {
        self.bounds = self.compute_bounds();
    }

    fn finish(&mut self) {
        self.bounds = None;
    }

    fn render_complete(&self, pos: DocumentPosition, canvas: &mut dyn Canvas) -> Result<(), LayoutError> {
        self.render_slice(pos, ClipWindow::FULL, canvas)
    }

    fn render_before_break(
        &self,
        pos: DocumentPosition,
        width: Pt,
        canvas: &mut dyn Canvas,
    ) -> Result<(), LayoutError> {
        self.render_slice(pos, ClipWindow::before(width), canvas)
    }

    fn render_spanning_continuation(
        &self,
        pos: DocumentPosition,
        consumed: Pt,
        width: Pt,
        canvas: &mut dyn Canvas,
    ) -> Result<(), LayoutError> {
        self.render_slice(pos, ClipWindow::spanning(consumed, width), canvas)
    }

    fn render_after_break(
        &self,
        pos: DocumentPosition,
        consumed: Pt,
        canvas: &mut dyn Canvas,
    ) -> Result<(), LayoutError> {
        self.render_slice(pos, ClipWindow::after(consumed), canvas)
    }
}

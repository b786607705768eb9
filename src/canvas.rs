//! The drawing surface that render pieces are emitted to.

use crate::colour::{colours, Colour};
use crate::rect::Rect;
use crate::units::*;
use std::collections::BTreeMap;

/// A segment of a path outline
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathElement {
    MoveTo(Point),
    LineTo(Point),
    /// A cubic Bézier curve through two control points
    CurveTo { c1: Point, c2: Point, end: Point },
}

impl PathElement {
    /// The same element moved by `offset`
    pub fn translated(self, offset: Point) -> PathElement {
        match self {
            PathElement::MoveTo(p) => PathElement::MoveTo(p + offset),
            PathElement::LineTo(p) => PathElement::LineTo(p + offset),
            PathElement::CurveTo { c1, c2, end } => PathElement::CurveTo {
                c1: c1 + offset,
                c2: c2 + offset,
                end: end + offset,
            },
        }
    }

    /// Every point the element references, control points included
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let points = match *self {
            PathElement::MoveTo(p) | PathElement::LineTo(p) => [Some(p), None, None],
            PathElement::CurveTo { c1, c2, end } => [Some(c1), Some(c2), Some(end)],
        };
        points.into_iter().flatten()
    }
}

/// How a path outline is stroked
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pen {
    pub colour: Colour,
    pub thickness: Pt,
}

impl Default for Pen {
    fn default() -> Self {
        Pen {
            colour: colours::BLACK,
            thickness: Pt(1.0),
        }
    }
}

impl Pen {
    pub fn new<C: Into<Colour>>(colour: C, thickness: Pt) -> Pen {
        Pen {
            colour: colour.into(),
            thickness,
        }
    }
}

/// A stroked outline, restricted to a clip rectangle. All coordinates are in
/// canvas space.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokePath {
    pub elements: Vec<PathElement>,
    pub pen: Pen,
    pub clip: Rect,
}

/// Something that render pieces can be drawn onto
pub trait Canvas {
    fn stroke_path(&mut self, page_index: usize, path: StrokePath);
}

/// A drawing command captured by a [RecordingCanvas]
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Stroke(StrokePath),
}

/// A canvas that remembers everything drawn on it, grouped by page
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    pages: BTreeMap<usize, Vec<DrawCommand>>,
}

impl RecordingCanvas {
    pub fn new() -> RecordingCanvas {
        RecordingCanvas::default()
    }

    /// The commands drawn on a page, in the order they were drawn
    pub fn commands(&self, page_index: usize) -> &[DrawCommand] {
        self.pages
            .get(&page_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Pages that have anything drawn on them, in page order
    pub fn pages(&self) -> impl Iterator<Item = (usize, &[DrawCommand])> + '_ {
        self.pages
            .iter()
            .map(|(index, commands)| (*index, commands.as_slice()))
    }

    /// Total number of commands across all pages
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Canvas for RecordingCanvas {
    fn stroke_path(&mut self, page_index: usize, path: StrokePath) {
        self.pages
            .entry(page_index)
            .or_default()
            .push(DrawCommand::Stroke(path));
    }
}

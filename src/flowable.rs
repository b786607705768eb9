//! Flowables: long horizontal strips of content wrapped into fixed-width lines that
//! are stacked down each page's live area and continue onto following pages.
//!
//! Laying out a flowable is a pure function of its parameters, its position on its
//! first page, and the paper geometry. [FlowLayout::compute] produces the full line
//! table every time it is called; nothing is cached between queries.
//!
//! # Example
//!
//! ```
//! use pageflow::{Document, DocumentOptions, Flowable, Pt, ORIGIN};
//! use pageflow::paper::{Margins, Paper};
//!
//! // a page whose live area is 45pt tall
//! let paper = Paper::new((Pt(200.0), Pt(65.0)), Margins::all(Pt(10.0)));
//! let mut doc = Document::new(DocumentOptions { paper, page_gap: Pt(50.0) });
//!
//! let flowable = Flowable::new(Pt(250.0), Pt(100.0), Pt(20.0)).with_line_gap(Pt(5.0));
//! let id = doc.add_flowable(ORIGIN, None, flowable).unwrap();
//!
//! let layout = doc.flow_layout(id).unwrap();
//! let pages: Vec<usize> = layout.lines().iter().map(|l| l.page_index).collect();
//! assert_eq!(pages, vec![0, 0, 1]);
//! ```

use crate::error::LayoutError;
use crate::page::PageSupplier;
use crate::units::*;

/// A position in document space: a page and an absolute canvas-space point
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DocumentPosition {
    pub page_index: usize,
    pub point: Point,
}

impl DocumentPosition {
    /// The same position moved by `offset`, staying on the same page
    pub fn offset(self, offset: Point) -> DocumentPosition {
        DocumentPosition {
            page_index: self.page_index,
            point: self.point + offset,
        }
    }
}

/// The parameters of a flowable strip
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Flowable {
    /// Total length of the unwrapped strip
    pub length: Pt,
    /// Maximum length of content on one line
    pub line_length: Pt,
    /// Height reserved for each line
    pub line_height: Pt,
    /// Vertical gap between consecutive lines on a page
    pub line_gap: Pt,
}

impl Flowable {
    /// Create a flowable with the default 5mm gap between lines
    pub fn new(length: Pt, line_length: Pt, line_height: Pt) -> Flowable {
        Flowable {
            length,
            line_length,
            line_height,
            line_gap: Mm(5.0).into(),
        }
    }

    pub fn with_line_gap(self, line_gap: Pt) -> Flowable {
        Flowable { line_gap, ..self }
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let values = [
            ("length", self.length),
            ("line length", self.line_length),
            ("line height", self.line_height),
            ("line gap", self.line_gap),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(LayoutError::config(format!("flowable {name} must be finite")));
            }
            if value < Pt::ZERO {
                return Err(LayoutError::config(format!(
                    "flowable {name} must not be negative, got {value}"
                )));
            }
        }
        if self.line_length <= Pt::ZERO {
            return Err(LayoutError::config("flowable line length must be positive"));
        }
        Ok(())
    }

    /// `ceil(length / line_length)`; an empty flowable has no lines
    pub fn line_count(&self) -> usize {
        if self.length <= Pt::ZERO {
            0
        } else {
            (self.length / self.line_length).ceil() as usize
        }
    }

    /// The flowable-space start and length of line `index`. Every line is full
    /// except the last, which holds whatever is left.
    pub fn line_extent(&self, index: usize) -> (Pt, Pt) {
        let start = self.line_length * index as f32;
        let length = if index + 1 >= self.line_count() {
            (self.length - start).max(Pt::ZERO)
        } else {
            self.line_length
        };
        (start, length)
    }

    /// How many lines fit in `available` height. A line fits when its bottom edge
    /// stays inside the area; at least one line is always placed.
    pub fn lines_fitting(&self, available: Pt) -> usize {
        let pitch = self.line_height + self.line_gap;
        if pitch <= Pt::ZERO {
            return usize::MAX;
        }
        let fitting = ((available + self.line_gap) / pitch).floor();
        if fitting.is_finite() && fitting >= 1.0 {
            fitting as usize
        } else {
            1
        }
    }
}

/// Where a flowable starts: the page it is placed on and its offset from that
/// page's live-area origin
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlowAnchor {
    pub page_index: usize,
    pub offset: Point,
}

/// One laid-out line of a flowable
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Line {
    pub index: usize,
    /// Where the line starts in flowable space
    pub flowable_x: Pt,
    pub length: Pt,
    pub height: Pt,
    pub page_index: usize,
    /// Canvas-space top-left corner of the line
    pub origin: Point,
}

impl Line {
    /// Where the line ends in flowable space
    pub fn end_x(&self) -> Pt {
        self.flowable_x + self.length
    }

    pub fn position(&self) -> DocumentPosition {
        DocumentPosition {
            page_index: self.page_index,
            point: self.origin,
        }
    }
}

/// The line table of a flowable, see the module documentation
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLayout {
    flowable: Flowable,
    anchor: FlowAnchor,
    first_page_lines: usize,
    lines_per_page: usize,
    /// Placement of line 0, kept separately so empty flowables still resolve
    start: DocumentPosition,
    lines: Vec<Line>,
}

impl FlowLayout {
    pub fn compute(
        flowable: Flowable,
        anchor: FlowAnchor,
        pages: &PageSupplier,
    ) -> Result<FlowLayout, LayoutError> {
        flowable.validate()?;

        let live_height = pages.paper().live_height();
        let lines_per_page = flowable.lines_fitting(live_height);
        let first_page_lines = flowable.lines_fitting(live_height - anchor.offset.y);

        let mut layout = FlowLayout {
            flowable,
            anchor,
            first_page_lines,
            lines_per_page,
            start: DocumentPosition {
                page_index: anchor.page_index,
                point: ORIGIN,
            },
            lines: Vec::with_capacity(flowable.line_count()),
        };
        layout.start = layout.line_position(0, pages);
        for index in 0..flowable.line_count() {
            let (flowable_x, length) = flowable.line_extent(index);
            let position = layout.line_position(index, pages);
            layout.lines.push(Line {
                index,
                flowable_x,
                length,
                height: flowable.line_height,
                page_index: position.page_index,
                origin: position.point,
            });
        }

        tracing::debug!(
            length = *flowable.length,
            line_length = *flowable.line_length,
            lines = layout.lines.len(),
            lines_per_page,
            first_page = anchor.page_index,
            last_page = layout.last_page_index(),
            "partitioned flowable"
        );
        Ok(layout)
    }

    pub fn flowable(&self) -> &Flowable {
        &self.flowable
    }

    pub fn anchor(&self) -> FlowAnchor {
        self.anchor
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lines per page after the first page
    pub fn lines_per_page(&self) -> usize {
        self.lines_per_page
    }

    /// Lines placed on the flowable's first page
    pub fn first_page_lines(&self) -> usize {
        self.first_page_lines
    }

    /// Index of the last page touched by the flowable
    pub fn last_page_index(&self) -> usize {
        self.lines
            .last()
            .map(|line| line.page_index)
            .unwrap_or(self.anchor.page_index)
    }

    /// Page and canvas-space origin of line `index`. This is defined for any index,
    /// including lines past the end of the flowable.
    fn line_position(&self, index: usize, pages: &PageSupplier) -> DocumentPosition {
        let pitch = self.flowable.line_height + self.flowable.line_gap;
        let (page_index, local) = if index < self.first_page_lines {
            let x = if index == 0 {
                self.anchor.offset.x
            } else {
                Pt::ZERO
            };
            let y = self.anchor.offset.y + pitch * index as f32;
            (self.anchor.page_index, Point { x, y })
        } else {
            let rest = index - self.first_page_lines;
            let page_index = self.anchor.page_index + 1 + rest / self.lines_per_page;
            let y = pitch * (rest % self.lines_per_page) as f32;
            (page_index, Point { x: Pt::ZERO, y })
        };
        DocumentPosition {
            page_index,
            point: pages.live_origin(page_index) + local,
        }
    }

    /// The index of the line containing flowable-space position `x`.
    ///
    /// A position exactly on a line boundary belongs to the following line, except
    /// for the end of the flowable, which belongs to the last line. Positions before
    /// the start map to the first line and positions past the end to the last.
    pub fn line_index_at(&self, x: Pt) -> usize {
        // read the line starts back from the table so that a position taken from
        // `Line::flowable_x` always lands on that line
        self.lines
            .partition_point(|line| line.flowable_x <= x)
            .saturating_sub(1)
    }

    /// The line containing `x`, or `None` for a flowable without lines
    pub fn line_at(&self, x: Pt) -> Option<&Line> {
        self.lines.get(self.line_index_at(x))
    }

    /// Map a flowable-space x position to document space
    pub fn flowable_space_to_document(&self, x: Pt) -> DocumentPosition {
        match self.line_at(x) {
            Some(line) => line.position().offset(Point {
                x: x - line.flowable_x,
                y: Pt::ZERO,
            }),
            // an empty flowable maps onto where its first line would have gone
            None => self.start.offset(Point { x, y: Pt::ZERO }),
        }
    }

    /// Map a flowable-space point to document space, carrying the y offset along
    pub fn map_to_document(&self, point: Point) -> DocumentPosition {
        self.flowable_space_to_document(point.x).offset(Point {
            x: Pt::ZERO,
            y: point.y,
        })
    }

    /// Distance from `x` back to the start of its line
    pub fn dist_to_line_start(&self, x: Pt) -> Pt {
        match self.line_at(x) {
            Some(line) => x - line.flowable_x,
            None => x,
        }
    }

    /// Distance from `x` forward to the end of its line
    pub fn dist_to_line_end(&self, x: Pt) -> Pt {
        match self.line_at(x) {
            Some(line) => line.end_x() - x,
            None => -x,
        }
    }
}

//! Paper geometry: sizes, margins, gutters, and the live area they leave behind.
//!
//! # Example
//!
//! ```
//! use pageflow::paper::{sizes, Margins, PageOrientation, Paper};
//! use pageflow::{In, Pt};
//!
//! let paper = Paper::new(sizes::LETTER.landscape(), Margins::all(In(0.5)))
//!     .with_gutter(In(0.25).into());
//! assert_eq!(paper.live_height(), Pt(7.5 * 72.0));
//! ```

use crate::rect::Rect;
use crate::units::*;

/// Pre-defined paper sizes, as (width, height) in portrait orientation
pub mod sizes {
    use crate::units::Pt;

    /// Page dimensions as (width, height) in points.
    pub type PageSize = (Pt, Pt);

    pub const LETTER: PageSize = (Pt(8.5 * 72.0), Pt(11.0 * 72.0));
    pub const LEGAL: PageSize = (Pt(8.5 * 72.0), Pt(13.0 * 72.0));
    pub const TABLOID: PageSize = (Pt(11.0 * 72.0), Pt(17.0 * 72.0));

    pub const A3: PageSize = (Pt(297.0 * 72.0 / 25.4), Pt(420.0 * 72.0 / 25.4));
    pub const A4: PageSize = (Pt(210.0 * 72.0 / 25.4), Pt(297.0 * 72.0 / 25.4));
    pub const A5: PageSize = (Pt(148.0 * 72.0 / 25.4), Pt(210.0 * 72.0 / 25.4));
}

use sizes::PageSize;

/// Convert page sizes between portrait and landscape orientations.
pub trait PageOrientation {
    /// Returns the size in portrait orientation (width ≤ height).
    fn portrait(self) -> Self;
    /// Returns the size in landscape orientation (width ≥ height).
    fn landscape(self) -> Self;
}

impl PageOrientation for PageSize {
    fn portrait(self) -> Self {
        if self.0 <= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }

    fn landscape(self) -> PageSize {
        if self.0 >= self.1 {
            self
        } else {
            (self.1, self.0)
        }
    }
}

/// Margins bound the live area of a page, which is where flowable lines are laid out.
/// Nothing prevents objects from being placed in the margins by hand.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    /// Create margins by specifying individual components in a clockwise fashion
    /// starting at the top (in the same order as CSS margins)
    pub fn trbl(top: Pt, right: Pt, bottom: Pt, left: Pt) -> Margins {
        Margins {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create margins where all values are equal
    pub fn all<D: Into<Pt>>(value: D) -> Margins {
        let value: Pt = value.into();
        Margins {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Create margins by specifying different values for vertical (top and bottom)
    /// and horizontal (left and right) margins
    pub fn symmetric(vertical: Pt, horizontal: Pt) -> Margins {
        Margins {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Create margins where all values are 0.0
    pub fn empty() -> Margins {
        Margins::default()
    }
}

/// Which side of a bound spread a page sits on. The gutter is applied to the
/// binding edge: the left edge of right-hand pages and the right edge of
/// left-hand pages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PageSide {
    Left,
    Right,
}

impl PageSide {
    /// Page sides alternate starting with a right-hand first page
    pub fn for_index(index: usize) -> PageSide {
        if index % 2 == 0 {
            PageSide::Right
        } else {
            PageSide::Left
        }
    }
}

/// The paper geometry used to lay out every page of a document
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Paper {
    pub width: Pt,
    pub height: Pt,
    pub margins: Margins,
    /// Extra margin on the binding edge, see [PageSide]
    pub gutter: Pt,
}

impl Default for Paper {
    fn default() -> Self {
        Paper::A4
    }
}

impl Paper {
    /// A4 portrait paper with 20mm margins
    pub const A4: Paper = Paper {
        width: sizes::A4.0,
        height: sizes::A4.1,
        margins: Margins {
            top: Pt(20.0 * 72.0 / 25.4),
            right: Pt(20.0 * 72.0 / 25.4),
            bottom: Pt(20.0 * 72.0 / 25.4),
            left: Pt(20.0 * 72.0 / 25.4),
        },
        gutter: Pt(0.0),
    };

    /// US letter portrait paper with 1 inch margins
    pub const LETTER: Paper = Paper {
        width: sizes::LETTER.0,
        height: sizes::LETTER.1,
        margins: Margins {
            top: Pt(72.0),
            right: Pt(72.0),
            bottom: Pt(72.0),
            left: Pt(72.0),
        },
        gutter: Pt(0.0),
    };

    pub fn new(size: PageSize, margins: Margins) -> Paper {
        Paper {
            width: size.0,
            height: size.1,
            margins,
            gutter: Pt(0.0),
        }
    }

    pub fn with_gutter(self, gutter: Pt) -> Paper {
        Paper { gutter, ..self }
    }

    pub fn with_margins(self, margins: Margins) -> Paper {
        Paper { margins, ..self }
    }

    pub fn with_size(self, size: PageSize) -> Paper {
        Paper {
            width: size.0,
            height: size.1,
            ..self
        }
    }

    /// A 90-degree clockwise rotation of this paper. The gutter is left unchanged.
    pub fn rotated(&self) -> Paper {
        Paper {
            width: self.height,
            height: self.width,
            margins: Margins {
                top: self.margins.left,
                right: self.margins.top,
                bottom: self.margins.right,
                left: self.margins.bottom,
            },
            gutter: self.gutter,
        }
    }

    /// Width of the area inside the margins and gutter
    pub fn live_width(&self) -> Pt {
        self.width - self.gutter - self.margins.left - self.margins.right
    }

    /// Height of the area inside the margins
    pub fn live_height(&self) -> Pt {
        self.height - self.margins.top - self.margins.bottom
    }

    /// The left margin, including the gutter when it sits on the left
    pub fn full_margin_left(&self, side: PageSide) -> Pt {
        match side {
            PageSide::Right => self.margins.left + self.gutter,
            PageSide::Left => self.margins.left,
        }
    }

    /// The right margin, including the gutter when it sits on the right
    pub fn full_margin_right(&self, side: PageSide) -> Pt {
        match side {
            PageSide::Right => self.margins.right,
            PageSide::Left => self.margins.right + self.gutter,
        }
    }

    /// Offset of the live area's top-left corner from the paper's top-left corner
    pub fn live_offset(&self, side: PageSide) -> Point {
        Point {
            x: self.full_margin_left(side),
            y: self.margins.top,
        }
    }

    /// The live area relative to the paper's top-left corner
    pub fn live_rect(&self, side: PageSide) -> Rect {
        Rect::from_xywh(
            self.full_margin_left(side),
            self.margins.top,
            self.live_width(),
            self.live_height(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_area_excludes_margins_and_gutter() {
        let paper = Paper::new((Pt(600.0), Pt(800.0)), Margins::trbl(Pt(10.0), Pt(20.0), Pt(30.0), Pt(40.0)))
            .with_gutter(Pt(5.0));
        assert_eq!(paper.live_width(), Pt(535.0));
        assert_eq!(paper.live_height(), Pt(760.0));
    }

    #[test]
    fn gutter_follows_page_side() {
        let paper = Paper::new((Pt(600.0), Pt(800.0)), Margins::all(Pt(10.0))).with_gutter(Pt(5.0));
        assert_eq!(PageSide::for_index(0), PageSide::Right);
        assert_eq!(PageSide::for_index(1), PageSide::Left);

        assert_eq!(paper.full_margin_left(PageSide::Right), Pt(15.0));
        assert_eq!(paper.full_margin_right(PageSide::Right), Pt(10.0));
        assert_eq!(paper.full_margin_left(PageSide::Left), Pt(10.0));
        assert_eq!(paper.full_margin_right(PageSide::Left), Pt(15.0));

        assert_eq!(paper.live_offset(PageSide::Right), Point::new(Pt(15.0), Pt(10.0)));
        assert_eq!(paper.live_rect(PageSide::Left).x2, Pt(10.0) + paper.live_width());
    }

    #[test]
    fn rotation_swaps_dimensions() {
        let paper = Paper::new((Pt(100.0), Pt(200.0)), Margins::trbl(Pt(1.0), Pt(2.0), Pt(3.0), Pt(4.0)));
        let rotated = paper.rotated();
        assert_eq!(rotated.width, Pt(200.0));
        assert_eq!(rotated.height, Pt(100.0));
        assert_eq!(rotated.margins, Margins::trbl(Pt(4.0), Pt(1.0), Pt(2.0), Pt(3.0)));
        assert_eq!(rotated.rotated().rotated().rotated(), paper);
    }

    #[test]
    fn orientation() {
        assert_eq!(sizes::LETTER.landscape(), (Pt(11.0 * 72.0), Pt(8.5 * 72.0)));
        assert_eq!(sizes::LETTER.landscape().portrait(), sizes::LETTER);
    }
}

//! Clip windows: horizontal slices of a shape's natural geometry.
//!
//! A breakable object that straddles line breaks is drawn once per line, each time
//! clipped to the part of it that belongs on that line. The piece coordinate system
//! has its origin at the piece's document position; pieces after the first one draw
//! the shape shifted left by the clip start so that the visible slice begins at
//! `x = 0`.
//!
//! Padding (typically half a pen thickness) is added around the clip rectangle so
//! that thick strokes aren't cut short, but never on a side that meets another
//! piece. Adjacent pieces therefore tile the shape exactly.

use crate::error::LayoutError;
use crate::rect::Rect;
use crate::units::*;

/// A `(start, width)` slice of a shape, measured from the shape's local origin.
///
/// `None` for the start means "from the beginning of the shape", and `None` for the
/// width means "to the end of the shape".
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ClipWindow {
    pub start: Option<Pt>,
    pub width: Option<Pt>,
}

impl ClipWindow {
    /// The whole shape
    pub const FULL: ClipWindow = ClipWindow {
        start: None,
        width: None,
    };

    /// Everything up to `width`
    pub fn before(width: Pt) -> ClipWindow {
        ClipWindow {
            start: None,
            width: Some(width),
        }
    }

    /// A slice in the middle of the shape
    pub fn spanning(start: Pt, width: Pt) -> ClipWindow {
        ClipWindow {
            start: Some(start),
            width: Some(width),
        }
    }

    /// Everything from `start` onwards
    pub fn after(start: Pt) -> ClipWindow {
        ClipWindow {
            start: Some(start),
            width: None,
        }
    }

    /// How far the shape is moved left when drawing this slice
    pub fn shift(&self) -> Pt {
        self.start.unwrap_or(Pt::ZERO)
    }

    /// Check the window against a shape reaching `extent` past its local origin
    pub fn validate(&self, extent: Pt) -> Result<(), LayoutError> {
        let tolerance = Pt(1e-3_f32.max(extent.abs().0 * 1e-5));
        let start = self.shift();
        let width = self.width.unwrap_or(Pt::ZERO);
        let out_of_range = start < Pt::ZERO
            || width < Pt::ZERO
            || !start.is_finite()
            || !width.is_finite()
            || start + width > extent + tolerance;
        if out_of_range {
            return Err(LayoutError::ClipRange {
                start: self.start,
                width: self.width,
                extent,
            });
        }
        Ok(())
    }
}

/// The visible rectangle, in piece coordinates, of a shape with bounding box `bounds`
/// (in the shape's local coordinates) drawn through `window`.
///
/// ```
/// use pageflow::clip::{clip_rect, ClipWindow};
/// use pageflow::{Pt, Rect};
///
/// let bounds = Rect::from_xywh(Pt(0.0), Pt(-5.0), Pt(100.0), Pt(10.0));
/// let middle = clip_rect(bounds, ClipWindow::spanning(Pt(20.0), Pt(50.0)), Pt(1.0)).unwrap();
/// assert_eq!(middle, Rect::from_xywh(Pt(0.0), Pt(-6.0), Pt(50.0), Pt(12.0)));
/// ```
pub fn clip_rect(bounds: Rect, window: ClipWindow, padding: Pt) -> Result<Rect, LayoutError> {
    window.validate(bounds.x2)?;

    let y1 = bounds.y1 - padding;
    let y2 = bounds.y2 + padding;
    let (x1, x2) = match (window.start, window.width) {
        (None, None) => (bounds.x1 - padding, bounds.x2 + padding),
        // a shape starting right of the seam leaves an empty slice at the seam
        (None, Some(width)) => ((bounds.x1 - padding).min(width), width),
        (Some(_), Some(width)) => (Pt::ZERO, width),
        (Some(start), None) => (Pt::ZERO, bounds.x2 - start + padding),
    };
    Ok(Rect { x1, y1, x2, y2 })
}

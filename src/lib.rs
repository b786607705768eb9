//! Lay out long strips of content across the pages of a document.
//!
//! Objects live in a [Scene] and are positioned relative to their parent. A
//! [Flowable] wraps everything placed inside it into fixed-width lines that run down
//! each page's live area and continue onto following pages, which are generated on
//! demand. At render time, objects that straddle a line break are drawn once per
//! line, each piece clipped to its own slice of the object.

mod breakable;
pub use breakable::*;

mod canvas;
pub use canvas::*;

/// Clip-window geometry for drawing slices of shapes
pub mod clip;

mod colour;
pub use colour::*;

pub(crate) mod content;

mod document;
pub use document::*;

mod error;
pub use error::*;

mod flowable;
pub use flowable::*;

mod info;
pub use info::*;

mod page;
pub use page::*;

/// Paper sizes, margins, and the live area they leave
pub mod paper;
pub use paper::{Margins, PageSide, Paper};

mod path;
pub use path::*;

mod pdf;
pub use pdf::*;

mod rect;
pub use rect::*;

pub(crate) mod refs;

mod scene;
pub use scene::*;

mod transform;
pub use transform::*;

mod units;
pub use units::*;

/// Re-export PDF-writer functionality
pub use pdf_writer;

use crate::paper::{PageSide, Paper};
use crate::rect::Rect;
use crate::scene::{ObjectId, Scene};
use crate::units::*;

/// A document page.
///
/// Pages are generated on demand by the [PageSupplier] and are never moved once
/// created. Each page anchors a root object in the [Scene]; anything placed on the
/// page is positioned relative to the top-left corner of its live area.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    index: usize,
    origin: Point,
    side: PageSide,
    paper: Paper,
    object: ObjectId,
}

impl Page {
    /// The index of this page in its [PageSupplier]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The canvas-space position of the paper's top-left corner
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// The left/right side the page lies on when bound, which determines which
    /// edge carries the gutter
    pub fn side(&self) -> PageSide {
        self.side
    }

    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    /// The scene object that children of this page are attached to
    pub fn object(&self) -> ObjectId {
        self.object
    }

    /// The canvas-space position of the live area's top-left corner
    pub fn live_origin(&self) -> Point {
        self.origin + self.paper.live_offset(self.side)
    }

    /// The paper bounds in canvas space
    pub fn bounding_rect(&self) -> Rect {
        Rect::from_xywh(self.origin.x, self.origin.y, self.paper.width, self.paper.height)
    }

    /// The live area in canvas space
    pub fn live_rect(&self) -> Rect {
        self.paper.live_rect(self.side).translated(self.origin)
    }

    /// The left margin, including the gutter if this page has it on the left
    pub fn full_margin_left(&self) -> Pt {
        self.paper.full_margin_left(self.side)
    }

    /// The right margin, including the gutter if this page has it on the right
    pub fn full_margin_right(&self) -> Pt {
        self.paper.full_margin_right(self.side)
    }

    /// Horizontal centre of the live area, relative to the live-area origin
    pub fn center_x(&self) -> Pt {
        self.paper.live_width() / 2.0
    }
}

/// A function run once on every page right after it is generated, typically to
/// attach headers and footers to it
pub type PageOverlay = Box<dyn FnMut(&Page, &mut Scene)>;

/// A generator-on-demand of document [Page]s.
///
/// Requesting a page that doesn't exist yet generates it, along with every missing
/// page before it. Keep in mind that an innocent looking `get(100_000, ..)` creates a
/// hundred thousand pages. Generated pages are never removed or regenerated.
pub struct PageSupplier {
    paper: Paper,
    page_gap: Pt,
    pages: Vec<Page>,
    overlay: Option<PageOverlay>,
}

impl std::fmt::Debug for PageSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSupplier")
            .field("paper", &self.paper)
            .field("page_gap", &self.page_gap)
            .field("pages", &self.pages.len())
            .field("overlay", &self.overlay.is_some())
            .finish()
    }
}

impl PageSupplier {
    /// Create an empty supplier. `page_gap` is the horizontal space left between
    /// pages laid side by side on the canvas.
    pub fn new(paper: Paper, page_gap: Pt) -> PageSupplier {
        PageSupplier {
            paper,
            page_gap,
            pages: Vec::new(),
            overlay: None,
        }
    }

    pub fn paper(&self) -> &Paper {
        &self.paper
    }

    pub fn page_gap(&self) -> Pt {
        self.page_gap
    }

    /// Set the function run on every newly generated page. Pages that already exist
    /// are not affected.
    pub fn set_overlay<F>(&mut self, overlay: F)
    where
        F: FnMut(&Page, &mut Scene) + 'static,
    {
        self.overlay = Some(Box::new(overlay));
    }

    pub fn clear_overlay(&mut self) {
        self.overlay = None;
    }

    /// Get the page at `index`, generating it and every missing page before it
    pub fn get(&mut self, index: usize, scene: &mut Scene) -> &Page {
        while self.pages.len() <= index {
            let new_index = self.pages.len();
            let live_origin = self.live_origin(new_index);
            let page = Page {
                index: new_index,
                origin: self.page_origin(new_index),
                side: PageSide::for_index(new_index),
                paper: self.paper,
                object: scene.alloc_page(new_index, live_origin),
            };
            tracing::debug!(index = new_index, side = ?page.side, "generated page");
            self.pages.push(page);
            if let Some(overlay) = self.overlay.as_mut() {
                overlay(&self.pages[new_index], scene);
            }
        }
        &self.pages[index]
    }

    /// Get a page only if it has already been generated
    pub fn get_existing(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// The number of pages generated so far
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Page> {
        self.pages.iter()
    }

    /// The canvas-space top-left corner of page `index`, whether or not it exists yet
    pub fn page_origin(&self, index: usize) -> Point {
        Point {
            x: (self.paper.width + self.page_gap) * index as f32,
            y: Pt::ZERO,
        }
    }

    /// The canvas-space live-area origin of page `index`, whether or not it exists yet
    pub fn live_origin(&self, index: usize) -> Point {
        self.page_origin(index) + self.paper.live_offset(PageSide::for_index(index))
    }
}

impl<'a> IntoIterator for &'a PageSupplier {
    type Item = &'a Page;
    type IntoIter = std::slice::Iter<'a, Page>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

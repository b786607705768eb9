use crate::breakable::{dispatch, plan_pieces, Breakable, RenderPiece};
use crate::canvas::Canvas;
use crate::error::LayoutError;
use crate::flowable::{DocumentPosition, FlowAnchor, FlowLayout, Flowable};
use crate::page::{Page, PageSupplier};
use crate::paper::Paper;
use crate::scene::{Anchor, ObjectId, ObjectKind, Role, Scene, SceneObject};
use crate::units::*;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Flowable line tables computed during one query or render pass
type Layouts = HashMap<ObjectId, FlowLayout>;

/// How many times a render pass will generate pages and rerun the overlays on them
/// before deciding the overlays never settle
pub const MAX_PAGE_PASSES: usize = 64;

/// Document-wide settings
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DocumentOptions {
    /// The geometry shared by every page
    pub paper: Paper,
    /// Horizontal space between pages as they are laid out side by side on the canvas
    pub page_gap: Pt,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions {
            paper: Paper::A4,
            page_gap: Mm(150.0).into(),
        }
    }
}

/// A document is the main object that owns every positioned object and the pages
/// they land on, then renders them out with a call to [Document::render]
#[derive(Debug)]
pub struct Document {
    scene: Scene,
    pages: PageSupplier,
}

impl Default for Document {
    fn default() -> Self {
        Document::new(DocumentOptions::default())
    }
}

impl Document {
    pub fn new(options: DocumentOptions) -> Document {
        Document {
            scene: Scene::new(),
            pages: PageSupplier::new(options.paper, options.page_gap),
        }
    }

    /// Get a page, generating it and every page before it if needed
    pub fn page(&mut self, index: usize) -> &Page {
        self.pages.get(index, &mut self.scene)
    }

    /// The number of pages generated so far
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &PageSupplier {
        &self.pages
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Run `overlay` on every page generated from now on, e.g. to add headers and
    /// footers.
    ///
    /// An overlay that moves flowable content so that it reaches a page which
    /// doesn't exist yet makes rendering generate that page too. If that never
    /// settles, [Document::render] fails with [LayoutError::Configuration].
    pub fn set_page_overlay<F>(&mut self, overlay: F)
    where
        F: FnMut(&Page, &mut Scene) + 'static,
    {
        self.pages.set_overlay(overlay);
    }

    fn parent_or_first_page(&mut self, parent: Option<ObjectId>) -> ObjectId {
        match parent {
            Some(parent) => parent,
            None => self.pages.get(0, &mut self.scene).object(),
        }
    }

    /// Create an invisible object that groups its children. Objects without a
    /// parent are placed on the first page.
    pub fn create<P: Into<Point>>(
        &mut self,
        pos: P,
        parent: Option<ObjectId>,
    ) -> Result<ObjectId, LayoutError> {
        let parent = self.parent_or_first_page(parent);
        self.scene.alloc(pos.into(), parent, Role::Group)
    }

    pub fn add_drawable<P, B>(
        &mut self,
        pos: P,
        parent: Option<ObjectId>,
        drawable: B,
    ) -> Result<ObjectId, LayoutError>
    where
        P: Into<Point>,
        B: Breakable + 'static,
    {
        let parent = self.parent_or_first_page(parent);
        self.scene.add_drawable(pos, parent, drawable)
    }

    /// Add a flowable. Its position sets where its first line starts on its page.
    pub fn add_flowable<P: Into<Point>>(
        &mut self,
        pos: P,
        parent: Option<ObjectId>,
        flowable: Flowable,
    ) -> Result<ObjectId, LayoutError> {
        flowable.validate()?;
        let parent = self.parent_or_first_page(parent);
        let id = self
            .scene
            .alloc(pos.into(), parent, Role::Flowable(flowable))?;
        tracing::debug!(object = ?id, lines = flowable.line_count(), "added flowable");
        Ok(id)
    }

    /// Move an object under a new parent, or onto the first page if `parent` is
    /// [None]
    pub fn set_parent(&mut self, id: ObjectId, parent: Option<ObjectId>) -> Result<(), LayoutError> {
        let parent = self.parent_or_first_page(parent);
        self.scene.set_parent(id, parent)
    }

    pub fn set_pos<P: Into<Point>>(&mut self, id: ObjectId, pos: P) -> Result<(), LayoutError> {
        self.scene.set_pos(id, pos)
    }

    /// Detach an object and everything below it from the document
    pub fn remove(&mut self, id: ObjectId) -> Result<(), LayoutError> {
        self.scene.remove(id)
    }

    fn lookup(&self, id: ObjectId) -> Result<&SceneObject, LayoutError> {
        self.scene
            .get(id)
            .ok_or_else(|| LayoutError::config(format!("{id:?} is not an object in this document")))
    }

    /// Lay out a flowable's lines. Pages the lines land on are not generated.
    pub fn flow_layout(&self, flowable: ObjectId) -> Result<FlowLayout, LayoutError> {
        let params = *self
            .lookup(flowable)?
            .flowable()
            .ok_or_else(|| LayoutError::config(format!("{flowable:?} is not a flowable")))?;
        match self.scene.anchor(flowable)? {
            Anchor::Page { index, offset, .. } => FlowLayout::compute(
                params,
                FlowAnchor {
                    page_index: index,
                    offset,
                },
                &self.pages,
            ),
            Anchor::Flowable { .. } => Err(LayoutError::config("flowables cannot be nested")),
        }
    }

    /// Map a flowable-space x position in `flowable` to document space
    pub fn flowable_space_to_document(
        &self,
        flowable: ObjectId,
        x: Pt,
    ) -> Result<DocumentPosition, LayoutError> {
        Ok(self.flow_layout(flowable)?.flowable_space_to_document(x))
    }

    /// The page and canvas-space point an object's origin lands on, following line
    /// breaks if the object is inside a flowable
    pub fn resolve_document_position(&self, id: ObjectId) -> Result<DocumentPosition, LayoutError> {
        self.resolve_with(id, &mut Layouts::new())
    }

    fn resolve_with(&self, id: ObjectId, layouts: &mut Layouts) -> Result<DocumentPosition, LayoutError> {
        match self.scene.anchor(id)? {
            Anchor::Page { index, offset, .. } => Ok(DocumentPosition {
                page_index: index,
                point: self.pages.live_origin(index) + offset,
            }),
            Anchor::Flowable { flowable, offset } => {
                Ok(self.layout_in(flowable, layouts)?.map_to_document(offset))
            }
        }
    }

    fn layout_in<'a>(
        &self,
        flowable: ObjectId,
        layouts: &'a mut Layouts,
    ) -> Result<&'a FlowLayout, LayoutError> {
        let layout: &'a FlowLayout = match layouts.entry(flowable) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(self.flow_layout(flowable)?),
        };
        Ok(layout)
    }

    /// The pieces an object is drawn in
    pub fn render_pieces(&self, id: ObjectId) -> Result<Vec<RenderPiece>, LayoutError> {
        self.pieces_with(id, &mut Layouts::new())
    }

    fn pieces_with(&self, id: ObjectId, layouts: &mut Layouts) -> Result<Vec<RenderPiece>, LayoutError> {
        let length = self.lookup(id)?.breakable_length();
        match self.scene.anchor(id)? {
            Anchor::Page { .. } => Ok(vec![RenderPiece::complete(
                self.resolve_with(id, layouts)?,
                None,
                length,
            )]),
            Anchor::Flowable { flowable, offset } => {
                Ok(plan_pieces(self.layout_in(flowable, layouts)?, offset, length))
            }
        }
    }

    /// Generate every page that flowable content reaches onto, returning the line
    /// tables used to decide that. Overlays may move content onto the new pages, so
    /// this repeats until no more pages are needed, giving up after
    /// [MAX_PAGE_PASSES] rounds.
    fn materialize_pages(&mut self) -> Result<Layouts, LayoutError> {
        for _ in 0..MAX_PAGE_PASSES {
            let mut layouts = Layouts::new();
            let mut last_page = 0;
            for page in self.pages.iter() {
                for flowable in self.scene.descendants_of_kind(page.object(), ObjectKind::Flowable) {
                    let layout = self.flow_layout(flowable)?;
                    last_page = last_page.max(layout.last_page_index());
                    layouts.insert(flowable, layout);
                }
            }
            if last_page < self.pages.len() || self.pages.is_empty() {
                return Ok(layouts);
            }
            self.pages.get(last_page, &mut self.scene);
        }
        Err(LayoutError::config(format!(
            "page overlays kept extending the document past {} pages",
            self.pages.len()
        )))
    }

    /// Drawables reachable from a page, in page order and then tree order
    fn live_drawables(&self) -> Vec<ObjectId> {
        self.pages
            .iter()
            .flat_map(|page| {
                self.scene
                    .descendants_of_kind(page.object(), ObjectKind::Drawable)
            })
            .collect()
    }

    /// Draw every object in the document onto `canvas`.
    ///
    /// Every page that flowable content reaches is generated first. Then each
    /// drawable is prepared, drawn piece by piece, and finally given a chance to
    /// clean up. Cleanup happens even if drawing fails.
    pub fn render(&mut self, canvas: &mut dyn Canvas) -> Result<(), LayoutError> {
        let mut layouts = self.materialize_pages()?;
        let drawables = self.live_drawables();
        tracing::debug!(
            pages = self.pages.len(),
            flowables = layouts.len(),
            drawables = drawables.len(),
            "starting render pass"
        );

        for id in drawables.iter() {
            if let Some(drawable) = self.scene.get_mut(*id).and_then(SceneObject::drawable_mut) {
                drawable.prepare();
            }
        }

        let result = self.draw(&drawables, &mut layouts, canvas);

        for id in drawables.iter() {
            if let Some(drawable) = self.scene.get_mut(*id).and_then(SceneObject::drawable_mut) {
                drawable.finish();
            }
        }
        tracing::debug!(ok = result.is_ok(), "finished render pass");
        result
    }

    fn draw(
        &self,
        drawables: &[ObjectId],
        layouts: &mut Layouts,
        canvas: &mut dyn Canvas,
    ) -> Result<(), LayoutError> {
        for id in drawables.iter() {
            let pieces = self.pieces_with(*id, layouts)?;
            let Some(drawable) = self.scene[*id].drawable() else {
                continue;
            };
            for piece in pieces.iter() {
                dispatch(piece, drawable, canvas)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paper::Margins;
    use pretty_assertions::assert_eq;

    fn document() -> Document {
        let paper = Paper::new((Pt(200.0), Pt(65.0)), Margins::all(Pt(10.0)));
        Document::new(DocumentOptions {
            paper,
            page_gap: Pt(50.0),
        })
    }

    fn flowable() -> Flowable {
        Flowable::new(Pt(250.0), Pt(100.0), Pt(20.0)).with_line_gap(Pt(5.0))
    }

    #[test]
    fn default_options_use_a4() {
        let options = DocumentOptions::default();
        assert_eq!(options.paper, Paper::A4);
        assert_eq!(options.page_gap, Mm(150.0).into());
    }

    #[test]
    fn objects_without_parent_go_on_the_first_page() {
        let mut doc = document();
        assert_eq!(doc.page_count(), 0);
        let id = doc.create((Pt(5.0), Pt(5.0)), None).unwrap();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(
            doc.resolve_document_position(id).unwrap(),
            DocumentPosition {
                page_index: 0,
                point: Point::new(Pt(15.0), Pt(15.0)),
            }
        );
    }

    #[test]
    fn positions_inside_flowables_follow_line_breaks() {
        let mut doc = document();
        let flow = doc.add_flowable(ORIGIN, None, flowable()).unwrap();
        let group = doc.create((Pt(200.0), Pt(0.0)), Some(flow)).unwrap();
        let inner = doc.create((Pt(20.0), Pt(2.0)), Some(group)).unwrap();

        assert_eq!(
            doc.resolve_document_position(inner).unwrap(),
            DocumentPosition {
                page_index: 1,
                point: Point::new(Pt(280.0), Pt(12.0)),
            }
        );
        // resolving doesn't generate pages
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn nested_flowables_are_rejected() {
        let mut doc = document();
        let flow = doc.add_flowable(ORIGIN, None, flowable()).unwrap();
        assert!(matches!(
            doc.add_flowable(ORIGIN, Some(flow), flowable()),
            Err(LayoutError::Configuration(_))
        ));
        assert!(matches!(
            doc.add_flowable(ORIGIN, None, Flowable::new(Pt(10.0), Pt(0.0), Pt(1.0))),
            Err(LayoutError::Configuration(_))
        ));
    }

    #[test]
    fn non_flowables_have_no_layout() {
        let mut doc = document();
        let group = doc.create(ORIGIN, None).unwrap();
        assert!(matches!(doc.flow_layout(group), Err(LayoutError::Configuration(_))));
    }

    #[test]
    fn detached_objects_cannot_resolve() {
        let mut doc = document();
        let group = doc.create(ORIGIN, None).unwrap();
        let child = doc.create(ORIGIN, Some(group)).unwrap();
        doc.remove(group).unwrap();
        assert!(matches!(
            doc.resolve_document_position(child),
            Err(LayoutError::Detached(_))
        ));
        assert!(matches!(doc.render_pieces(child), Err(LayoutError::Detached(_))));
    }

    #[test]
    fn reparenting_to_none_moves_to_first_page() {
        let mut doc = document();
        let flow = doc.add_flowable(ORIGIN, None, flowable()).unwrap();
        let object = doc.create((Pt(150.0), Pt(0.0)), Some(flow)).unwrap();
        assert_eq!(doc.resolve_document_position(object).unwrap().point.y, Pt(35.0));

        doc.set_parent(object, None).unwrap();
        assert_eq!(
            doc.resolve_document_position(object).unwrap().point,
            Point::new(Pt(160.0), Pt(10.0))
        );
    }
}

//! The scene graph that every positioned object lives in.
//!
//! Objects are stored in an [Arena] and refer to each other by [ObjectId]. Each object
//! owns its list of children; the link back to the parent is a plain id used only for
//! walking upwards. Pages are the roots of the tree, and an object's position is
//! always relative to its parent (or, for objects directly on a page, to the top-left
//! corner of that page's live area).

use crate::breakable::Breakable;
use crate::error::LayoutError;
use crate::flowable::Flowable;
use crate::units::*;
use id_arena::{Arena, Id};
use std::fmt;

pub type ObjectId = Id<SceneObject>;

/// The broad category of a scene object, used to filter traversals
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Page,
    Flowable,
    Drawable,
    /// An invisible object that only positions its children
    Group,
}

pub(crate) enum Role {
    Page(usize),
    Flowable(Flowable),
    Drawable(Box<dyn Breakable>),
    Group,
}

impl fmt::Debug for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Page(index) => f.debug_tuple("Page").field(index).finish(),
            Role::Flowable(flowable) => f.debug_tuple("Flowable").field(flowable).finish(),
            Role::Drawable(_) => f.write_str("Drawable"),
            Role::Group => f.write_str("Group"),
        }
    }
}

/// A node in the scene graph
#[derive(Debug)]
pub struct SceneObject {
    pos: Point,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    role: Role,
}

impl SceneObject {
    /// The position of the object relative to its parent
    pub fn pos(&self) -> Point {
        self.pos
    }

    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Direct children, in the order they were attached
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    pub fn kind(&self) -> ObjectKind {
        match self.role {
            Role::Page(_) => ObjectKind::Page,
            Role::Flowable(_) => ObjectKind::Flowable,
            Role::Drawable(_) => ObjectKind::Drawable,
            Role::Group => ObjectKind::Group,
        }
    }

    /// The page index, if this object is a page
    pub fn page_index(&self) -> Option<usize> {
        match self.role {
            Role::Page(index) => Some(index),
            _ => None,
        }
    }

    pub fn flowable(&self) -> Option<&Flowable> {
        match &self.role {
            Role::Flowable(flowable) => Some(flowable),
            _ => None,
        }
    }

    pub fn drawable(&self) -> Option<&dyn Breakable> {
        match &self.role {
            Role::Drawable(drawable) => Some(drawable.as_ref()),
            _ => None,
        }
    }

    pub fn drawable_mut(&mut self) -> Option<&mut (dyn Breakable + 'static)> {
        match &mut self.role {
            Role::Drawable(drawable) => Some(drawable.as_mut()),
            _ => None,
        }
    }

    /// The length over which this object may be split across flowable lines.
    /// Zero means the object is always drawn in one piece.
    pub fn breakable_length(&self) -> Pt {
        self.drawable()
            .map(|d| d.breakable_length())
            .unwrap_or(Pt::ZERO)
    }

    /// Whether this object exposes a named capability. The built-in attributes are
    /// `"page"`, `"flowable"`, and `"breakable"`; drawables may report more.
    pub fn has_attribute(&self, name: &str) -> bool {
        match name {
            "page" => self.kind() == ObjectKind::Page,
            "flowable" => self.kind() == ObjectKind::Flowable,
            "breakable" => self.breakable_length() > Pt::ZERO,
            _ => self.drawable().is_some_and(|d| d.has_attribute(name)),
        }
    }
}

/// Where an object's ancestor chain ends up, along with the object's position
/// relative to that ancestor
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Anchor {
    /// The object sits (possibly indirectly) on a page; the offset is relative to
    /// the page's live-area origin
    Page { page: ObjectId, index: usize, offset: Point },
    /// The object lives in a flowable; the offset is in flowable space
    Flowable { flowable: ObjectId, offset: Point },
}

/// All objects in a document
#[derive(Debug, Default)]
pub struct Scene {
    objects: Arena<SceneObject>,
}

impl std::ops::Index<ObjectId> for Scene {
    type Output = SceneObject;

    fn index(&self, id: ObjectId) -> &SceneObject {
        &self.objects[id]
    }
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id)
    }

    /// Number of objects ever allocated, including pages and removed objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.len() == 0
    }

    fn lookup(&self, id: ObjectId) -> Result<&SceneObject, LayoutError> {
        self.objects
            .get(id)
            .ok_or_else(|| LayoutError::config(format!("{id:?} is not an object in this scene")))
    }

    pub(crate) fn alloc_page(&mut self, index: usize, live_origin: Point) -> ObjectId {
        self.objects.alloc(SceneObject {
            pos: live_origin,
            parent: None,
            children: Vec::new(),
            role: Role::Page(index),
        })
    }

    /// Allocate a new object and register it with its parent
    pub(crate) fn alloc(
        &mut self,
        pos: Point,
        parent: ObjectId,
        role: Role,
    ) -> Result<ObjectId, LayoutError> {
        self.lookup(parent)?;
        if matches!(role, Role::Flowable(_)) && self.flowable_of(parent).is_some() {
            return Err(LayoutError::config("flowables cannot be nested"));
        }
        let id = self.objects.alloc(SceneObject {
            pos,
            parent: Some(parent),
            children: Vec::new(),
            role,
        });
        self.objects[parent].children.push(id);
        Ok(id)
    }

    /// Create an invisible grouping object under `parent`
    pub fn create<P: Into<Point>>(&mut self, pos: P, parent: ObjectId) -> Result<ObjectId, LayoutError> {
        self.alloc(pos.into(), parent, Role::Group)
    }

    /// Add a drawable object under `parent`
    pub fn add_drawable<P, B>(&mut self, pos: P, parent: ObjectId, drawable: B) -> Result<ObjectId, LayoutError>
    where
        P: Into<Point>,
        B: Breakable + 'static,
    {
        self.alloc(pos.into(), parent, Role::Drawable(Box::new(drawable)))
    }

    /// Set the position of an object relative to its parent. Nothing is recomputed
    /// eagerly; resolution happens on demand.
    pub fn set_pos<P: Into<Point>>(&mut self, id: ObjectId, pos: P) -> Result<(), LayoutError> {
        self.lookup(id)?;
        self.objects[id].pos = pos.into();
        Ok(())
    }

    /// Move an object (and its subtree) under a new parent
    pub fn set_parent(&mut self, id: ObjectId, new_parent: ObjectId) -> Result<(), LayoutError> {
        let object = self.lookup(id)?;
        self.lookup(new_parent)?;
        if object.kind() == ObjectKind::Page {
            return Err(LayoutError::config("pages cannot be reparented"));
        }
        if id == new_parent || self.is_ancestor(id, new_parent) {
            return Err(LayoutError::Cycle {
                child: id,
                parent: new_parent,
            });
        }
        if self.flowable_of(new_parent).is_some() {
            let moves_flowable = object.kind() == ObjectKind::Flowable
                || self.descendants_of_kind(id, ObjectKind::Flowable).next().is_some();
            if moves_flowable {
                return Err(LayoutError::config("flowables cannot be nested"));
            }
        }

        self.detach(id);
        self.objects[id].parent = Some(new_parent);
        self.objects[new_parent].children.push(id);
        tracing::trace!(object = ?id, parent = ?new_parent, "reparented");
        Ok(())
    }

    /// Detach an object and its subtree from the tree. The objects remain allocated
    /// but can no longer be resolved onto a page.
    pub fn remove(&mut self, id: ObjectId) -> Result<(), LayoutError> {
        if self.lookup(id)?.kind() == ObjectKind::Page {
            return Err(LayoutError::config("pages cannot be removed"));
        }
        self.detach(id);
        Ok(())
    }

    fn detach(&mut self, id: ObjectId) {
        if let Some(old_parent) = self.objects[id].parent.take() {
            self.objects[old_parent].children.retain(|child| *child != id);
        }
    }

    /// Whether `ancestor` appears anywhere in the parent chain of `id`
    pub fn is_ancestor(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Iterate over the parent chain of an object, starting with its parent
    pub fn ancestors(&self, id: ObjectId) -> Ancestors<'_> {
        Ancestors {
            scene: self,
            next: self.objects.get(id).and_then(|o| o.parent),
        }
    }

    pub fn first_ancestor_where<P>(&self, id: ObjectId, mut predicate: P) -> Option<ObjectId>
    where
        P: FnMut(&SceneObject) -> bool,
    {
        self.ancestors(id).find(|a| predicate(&self.objects[*a]))
    }

    /// The flowable this object belongs in, if any
    pub fn flowable_of(&self, id: ObjectId) -> Option<ObjectId> {
        let is_flowable = |o: &SceneObject| o.kind() == ObjectKind::Flowable;
        match self.objects.get(id) {
            Some(object) if is_flowable(object) => Some(id),
            Some(_) => self.first_ancestor_where(id, is_flowable),
            None => None,
        }
    }

    /// The page this object is ultimately attached to, if any
    pub fn page_of(&self, id: ObjectId) -> Option<ObjectId> {
        let is_page = |o: &SceneObject| o.kind() == ObjectKind::Page;
        match self.objects.get(id) {
            Some(object) if is_page(object) => Some(id),
            Some(_) => self.first_ancestor_where(id, is_page),
            None => None,
        }
    }

    /// All objects in the subtree below `id` (excluding `id` itself), in pre-order:
    /// every object is visited before its children, and siblings in insertion order.
    pub fn descendants(&self, id: ObjectId) -> Descendants<'_> {
        let mut stack = Vec::new();
        if let Some(object) = self.objects.get(id) {
            stack.extend(object.children.iter().rev().copied());
        }
        Descendants { scene: self, stack }
    }

    pub fn descendants_where<'a, P>(
        &'a self,
        id: ObjectId,
        mut predicate: P,
    ) -> impl Iterator<Item = ObjectId> + 'a
    where
        P: FnMut(&SceneObject) -> bool + 'a,
    {
        self.descendants(id)
            .filter(move |d| predicate(&self.objects[*d]))
    }

    pub fn descendants_of_kind(
        &self,
        id: ObjectId,
        kind: ObjectKind,
    ) -> impl Iterator<Item = ObjectId> + '_ {
        self.descendants_where(id, move |o| o.kind() == kind)
    }

    pub fn descendants_with_attribute<'a>(
        &'a self,
        id: ObjectId,
        attribute: &'a str,
    ) -> impl Iterator<Item = ObjectId> + 'a {
        self.descendants_where(id, move |o| o.has_attribute(attribute))
    }

    /// Walk up from `id` until a page or flowable is found, summing positions on
    /// the way. Objects that are themselves pages or flowables are resolved through
    /// their own parents (a page anchors itself).
    pub fn anchor(&self, id: ObjectId) -> Result<Anchor, LayoutError> {
        let object = self.lookup(id)?;
        if let Some(index) = object.page_index() {
            return Ok(Anchor::Page {
                page: id,
                index,
                offset: ORIGIN,
            });
        }

        let mut offset = object.pos;
        let mut current = object.parent;
        while let Some(parent_id) = current {
            let parent = &self.objects[parent_id];
            match parent.role {
                Role::Page(index) => {
                    return Ok(Anchor::Page {
                        page: parent_id,
                        index,
                        offset,
                    })
                }
                Role::Flowable(_) => {
                    return Ok(Anchor::Flowable {
                        flowable: parent_id,
                        offset,
                    })
                }
                _ => {
                    offset += parent.pos;
                    current = parent.parent;
                }
            }
        }
        Err(LayoutError::Detached(id))
    }

    /// The logical position of `descendant` relative to `ancestor`. This is a plain
    /// sum of positions and ignores any line breaks introduced by flowables.
    pub fn descendant_pos(&self, ancestor: ObjectId, descendant: ObjectId) -> Result<Point, LayoutError> {
        let mut pos = self.lookup(descendant)?.pos;
        for parent in self.ancestors(descendant) {
            if parent == ancestor {
                return Ok(pos);
            }
            pos += self.objects[parent].pos;
        }
        Err(LayoutError::config(format!(
            "{ancestor:?} is not an ancestor of {descendant:?}"
        )))
    }

    /// The logical position of `dst` relative to `src`, measured through their
    /// nearest common ancestor. Like [Scene::descendant_pos], this ignores line
    /// breaks: two objects in a flowable have the same relative position whether or
    /// not a break separates them.
    pub fn map_to(&self, src: ObjectId, dst: ObjectId) -> Result<Point, LayoutError> {
        self.lookup(src)?;
        self.lookup(dst)?;
        if src == dst {
            return Ok(ORIGIN);
        }

        // positions of each object relative to every one of its ancestors
        let src_chain = self.chain_offsets(src);
        let dst_chain = self.chain_offsets(dst);
        for (dst_ancestor, dst_offset) in dst_chain.iter() {
            if let Some((_, src_offset)) = src_chain.iter().find(|(a, _)| a == dst_ancestor) {
                return Ok(*dst_offset - *src_offset);
            }
        }
        Err(LayoutError::NoCommonAncestor(src, dst))
    }

    /// Like [Scene::map_to], but only the horizontal distance
    pub fn map_x_to(&self, src: ObjectId, dst: ObjectId) -> Result<Pt, LayoutError> {
        self.map_to(src, dst).map(|p| p.x)
    }

    /// The object itself (at offset zero) followed by each ancestor together with
    /// the object's position relative to it
    fn chain_offsets(&self, id: ObjectId) -> Vec<(ObjectId, Point)> {
        let mut chain = vec![(id, ORIGIN)];
        let mut offset = self.objects[id].pos;
        for ancestor in self.ancestors(id) {
            chain.push((ancestor, offset));
            offset += self.objects[ancestor].pos;
        }
        chain
    }
}

/// Iterator over an object's ancestors, see [Scene::ancestors]
pub struct Ancestors<'a> {
    scene: &'a Scene,
    next: Option<ObjectId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        let current = self.next?;
        self.next = self.scene.objects[current].parent;
        Some(current)
    }
}

/// Pre-order iterator over a subtree, see [Scene::descendants]
pub struct Descendants<'a> {
    scene: &'a Scene,
    stack: Vec<ObjectId>,
}

impl Iterator for Descendants<'_> {
    type Item = ObjectId;

    fn next(&mut self) -> Option<ObjectId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.scene.objects[current].children.iter().rev().copied());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scene_with_page() -> (Scene, ObjectId) {
        let mut scene = Scene::new();
        let page = scene.alloc_page(0, ORIGIN);
        (scene, page)
    }

    #[test]
    fn descendants_are_preorder_and_restartable() {
        let (mut scene, page) = scene_with_page();
        let a = scene.create((Pt(1.0), Pt(0.0)), page).unwrap();
        let a1 = scene.create((Pt(1.0), Pt(0.0)), a).unwrap();
        let a2 = scene.create((Pt(2.0), Pt(0.0)), a).unwrap();
        let b = scene.create((Pt(3.0), Pt(0.0)), page).unwrap();
        let a1x = scene.create((Pt(4.0), Pt(0.0)), a1).unwrap();

        let order: Vec<ObjectId> = scene.descendants(page).collect();
        assert_eq!(order, vec![a, a1, a1x, a2, b]);
        // a second traversal yields the same sequence
        assert_eq!(scene.descendants(page).collect::<Vec<_>>(), order);
        assert_eq!(scene.descendants(a1x).count(), 0);
    }

    #[test]
    fn reparenting_moves_between_child_lists() {
        let (mut scene, page) = scene_with_page();
        let a = scene.create(ORIGIN, page).unwrap();
        let b = scene.create(ORIGIN, page).unwrap();
        let c = scene.create(ORIGIN, a).unwrap();

        scene.set_parent(c, b).unwrap();
        assert!(scene[a].children().is_empty());
        assert_eq!(scene[b].children(), &[c]);
        assert_eq!(scene[c].parent(), Some(b));
    }

    #[test]
    fn cycles_are_rejected() {
        let (mut scene, page) = scene_with_page();
        let a = scene.create(ORIGIN, page).unwrap();
        let b = scene.create(ORIGIN, a).unwrap();
        let c = scene.create(ORIGIN, b).unwrap();

        assert!(matches!(
            scene.set_parent(a, c),
            Err(LayoutError::Cycle { child, parent }) if child == a && parent == c
        ));
        assert!(matches!(scene.set_parent(a, a), Err(LayoutError::Cycle { .. })));
        // the failed assignment left the tree untouched
        assert_eq!(scene[a].parent(), Some(page));
        assert_eq!(scene[c].parent(), Some(b));
    }

    #[test]
    fn pages_cannot_move() {
        let (mut scene, page) = scene_with_page();
        let other_page = scene.alloc_page(1, ORIGIN);
        assert!(matches!(
            scene.set_parent(page, other_page),
            Err(LayoutError::Configuration(_))
        ));
        assert!(scene.remove(page).is_err());
    }

    #[test]
    fn anchor_sums_offsets_up_to_the_page() {
        let (mut scene, page) = scene_with_page();
        let a = scene.create((Pt(10.0), Pt(5.0)), page).unwrap();
        let b = scene.create((Pt(1.0), Pt(2.0)), a).unwrap();
        assert_eq!(
            scene.anchor(b).unwrap(),
            Anchor::Page {
                page,
                index: 0,
                offset: Point::new(Pt(11.0), Pt(7.0))
            }
        );
    }

    #[test]
    fn removed_objects_are_detached() {
        let (mut scene, page) = scene_with_page();
        let a = scene.create(ORIGIN, page).unwrap();
        let b = scene.create(ORIGIN, a).unwrap();
        scene.remove(a).unwrap();

        assert!(scene[page].children().is_empty());
        assert!(matches!(scene.anchor(b), Err(LayoutError::Detached(id)) if id == b));
        assert_eq!(scene.page_of(b), None);
    }

    #[test]
    fn map_to_goes_through_common_ancestor() {
        let (mut scene, page) = scene_with_page();
        let a = scene.create((Pt(10.0), Pt(0.0)), page).unwrap();
        let a1 = scene.create((Pt(5.0), Pt(1.0)), a).unwrap();
        let b = scene.create((Pt(30.0), Pt(4.0)), page).unwrap();

        assert_eq!(scene.map_to(a1, b).unwrap(), Point::new(Pt(15.0), Pt(3.0)));
        assert_eq!(scene.map_to(b, a1).unwrap(), Point::new(Pt(-15.0), Pt(-3.0)));
        assert_eq!(scene.map_to(a, a1).unwrap(), Point::new(Pt(5.0), Pt(1.0)));
        assert_eq!(scene.map_x_to(a1, a).unwrap(), Pt(-5.0));
        assert_eq!(scene.descendant_pos(page, a1).unwrap(), Point::new(Pt(15.0), Pt(1.0)));
        assert!(scene.descendant_pos(a1, page).is_err());

        let lonely_page = scene.alloc_page(1, ORIGIN);
        assert!(matches!(
            scene.map_to(a, lonely_page),
            Err(LayoutError::NoCommonAncestor(_, _))
        ));
    }

    #[test]
    fn attribute_and_kind_filters_share_traversal() {
        let (mut scene, page) = scene_with_page();
        let flowable = scene
            .alloc(
                ORIGIN,
                page,
                Role::Flowable(Flowable::new(Pt(100.0), Pt(10.0), Pt(5.0))),
            )
            .unwrap();
        let inner = scene.create(ORIGIN, flowable).unwrap();

        assert_eq!(
            scene.descendants_of_kind(page, ObjectKind::Flowable).collect::<Vec<_>>(),
            vec![flowable]
        );
        assert_eq!(
            scene.descendants_with_attribute(page, "flowable").collect::<Vec<_>>(),
            vec![flowable]
        );
        assert_eq!(scene.descendants_with_attribute(page, "breakable").count(), 0);
        assert_eq!(scene.flowable_of(inner), Some(flowable));
        assert_eq!(scene.page_of(inner), Some(page));
    }

    #[test]
    fn flowables_cannot_nest() {
        let (mut scene, page) = scene_with_page();
        let outer = scene
            .alloc(
                ORIGIN,
                page,
                Role::Flowable(Flowable::new(Pt(100.0), Pt(10.0), Pt(5.0))),
            )
            .unwrap();
        let nested = scene.alloc(
            ORIGIN,
            outer,
            Role::Flowable(Flowable::new(Pt(100.0), Pt(10.0), Pt(5.0))),
        );
        assert!(matches!(nested, Err(LayoutError::Configuration(_))));

        let group = scene.create(ORIGIN, page).unwrap();
        scene
            .alloc(
                ORIGIN,
                group,
                Role::Flowable(Flowable::new(Pt(100.0), Pt(10.0), Pt(5.0))),
            )
            .unwrap();
        assert!(matches!(
            scene.set_parent(group, outer),
            Err(LayoutError::Configuration(_))
        ));
    }
}

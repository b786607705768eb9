use crate::scene::ObjectId;
use crate::units::Pt;
use thiserror::Error;

/// All errors that the crate can generate
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("invalid configuration: {0}")]
    /// Invalid flowable parameters or an operation the scene structure can't support
    Configuration(String),

    #[error("making {parent:?} the parent of {child:?} would create a cycle")]
    /// A parent assignment that would make an object its own ancestor
    Cycle { child: ObjectId, parent: ObjectId },

    #[error("{0:?} has no page or flowable ancestor")]
    /// Document-space resolution attempted on an object detached from every page
    Detached(ObjectId),

    #[error("clip window (start: {start:?}, width: {width:?}) exceeds shape extent {extent}")]
    /// A clip window reaching outside of the shape it slices
    ClipRange {
        start: Option<Pt>,
        width: Option<Pt>,
        extent: Pt,
    },

    #[error("{0:?} and {1:?} share no common ancestor")]
    /// A relative position query between objects in disjoint trees
    NoCommonAncestor(ObjectId, ObjectId),

    #[error(transparent)]
    /// An I/O error occurred while writing output
    Io(#[from] std::io::Error),
}

impl LayoutError {
    pub(crate) fn config<S: Into<String>>(message: S) -> LayoutError {
        LayoutError::Configuration(message.into())
    }
}

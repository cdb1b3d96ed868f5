use crate::node::Node;
use crate::{HasEnvelope, Rectangle};

/// A slot in a node: either a stored item or a child subtree.
///
/// An internal entry's `bbox` is a cache of its child's bounding box and has
/// to be refreshed with [`Entry::refresh_bbox`] whenever the child changes.
#[derive(Debug, Clone)]
pub enum Entry<T> {
    Leaf { data: T, bbox: Rectangle },
    Internal { child: Box<Node<T>>, bbox: Rectangle },
}

impl<T> Entry<T> {
    pub(crate) fn leaf(data: T, bbox: Rectangle) -> Self {
        Entry::Leaf { data, bbox }
    }

    /// Wrap `child`, computing its bounding box.
    pub(crate) fn internal(child: Node<T>) -> Self {
        let bbox = child.envelope();
        Entry::Internal {
            child: Box::new(child),
            bbox,
        }
    }

    pub fn bbox(&self) -> Rectangle {
        match self {
            Entry::Leaf { bbox, .. } | Entry::Internal { bbox, .. } => *bbox,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Entry::Leaf { .. })
    }

    pub(crate) fn child(&self) -> Option<&Node<T>> {
        match self {
            Entry::Internal { child, .. } => Some(&**child),
            Entry::Leaf { .. } => None,
        }
    }

    pub(crate) fn child_mut(&mut self) -> Option<&mut Node<T>> {
        match self {
            Entry::Internal { child, .. } => Some(&mut **child),
            Entry::Leaf { .. } => None,
        }
    }

    /// Recompute an internal entry's cached box from its child. Leaf entries
    /// carry their item's exact extent and are left alone.
    pub(crate) fn refresh_bbox(&mut self) {
        if let Entry::Internal { child, bbox } = self {
            *bbox = child.envelope();
        }
    }
}

impl<T> HasEnvelope for Entry<T> {
    fn envelope(&self) -> Rectangle {
        self.bbox()
    }
}

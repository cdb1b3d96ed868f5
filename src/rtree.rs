//! A dynamic R-tree with Guttman's quadratic split.
//!
//! Items are inserted and deleted one at a time. The tree stays balanced by
//! splitting overflowing nodes on the way up from an insert, and by
//! dissolving underfull nodes and reinserting their items after a delete.

use std::mem;
use std::slice;

use crate::entry::Entry;
use crate::node::Node;
use crate::{Coordinate, HasEnvelope, RTreeConfig, RTreeResult, Rectangle};

#[derive(Debug, Clone)]
pub struct RTree<T> {
    config: RTreeConfig,
    root: Node<T>,
    size: usize,
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        RTree {
            config: RTreeConfig::default(),
            root: Node::new_leaf(),
            size: 0,
        }
    }
}

impl<T> RTree<T> {
    /// An empty tree whose nodes hold at most `max_entries` entries and,
    /// below the root, at least `min_entries`.
    pub fn new(max_entries: usize, min_entries: usize) -> RTreeResult<Self> {
        Self::with_config(RTreeConfig::new(max_entries, min_entries)?)
    }

    pub fn with_config(config: RTreeConfig) -> RTreeResult<Self> {
        config.validate()?;
        Ok(RTree {
            config,
            root: Node::new_leaf(),
            size: 0,
        })
    }

    pub fn config(&self) -> RTreeConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of levels, counting the root. A tree whose root is a leaf has
    /// height 1, even when empty.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while !node.is_leaf() && !node.is_empty() {
            node = node.child(0);
            height += 1;
        }
        height
    }

    pub fn degree(&self) -> usize {
        self.config.max_entries
    }

    pub fn min_fill(&self) -> usize {
        self.config.min_entries
    }

    pub fn envelope(&self) -> Rectangle {
        self.root.envelope()
    }

    #[cfg(test)]
    pub(crate) fn root(&self) -> &Node<T> {
        &self.root
    }

    pub fn clear(&mut self) {
        self.root = Node::new_leaf();
        self.size = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            stack: vec![self.root.entries().iter()],
        }
    }

    pub fn insert<E: HasEnvelope>(&mut self, data: T, item: E) {
        let bbox = item.envelope();
        assert!(!bbox.is_empty(), "cannot index an empty rectangle");
        self.insert_entry(data, bbox);
        self.size += 1;
    }

    pub fn insert_point(&mut self, data: T, x: f64, y: f64) {
        self.insert(data, Coordinate::new(x, y));
    }

    /// Every item whose box intersects `query`, in no particular order.
    pub fn search(&self, query: &Rectangle) -> Vec<(&T, Rectangle)> {
        let mut results = Vec::new();
        let mut stack: Vec<&Node<T>> = vec![&self.root];
        while let Some(node) = stack.pop() {
            for entry in node.entries() {
                if !query.intersects(entry.bbox()) {
                    continue;
                }
                match entry {
                    Entry::Leaf { data, bbox } => results.push((data, *bbox)),
                    Entry::Internal { child, .. } => stack.push(&**child),
                }
            }
        }
        results
    }

    pub fn query_point(&self, coord: Coordinate) -> Vec<(&T, Rectangle)> {
        self.search(&coord.envelope())
    }

    /// Remove the item equal to `data` stored under exactly `item`'s box.
    /// Returns false, leaving the tree untouched, if there is no such item.
    pub fn delete<E: HasEnvelope>(&mut self, data: &T, item: E) -> bool
    where
        T: PartialEq,
    {
        let bbox = item.envelope();
        let mut path = Vec::new();
        let index = match find_leaf(&self.root, data, &bbox, &mut path) {
            Some(index) => index,
            None => return false,
        };

        self.node_at_mut(&path).remove(index);
        self.size -= 1;

        let orphans = self.condense_tree(&path);
        self.reinsert(orphans);
        true
    }

    fn insert_entry(&mut self, data: T, bbox: Rectangle) {
        let path = self.choose_leaf(&bbox);
        log::trace!("inserting {:?} at leaf path {:?}", bbox, path);

        let RTreeConfig {
            max_entries,
            min_entries,
        } = self.config;
        let leaf = self.node_at_mut(&path);
        let split = match leaf.try_insert(Entry::leaf(data, bbox), max_entries) {
            Ok(()) => None,
            Err(entry) => Some(leaf.split(entry, min_entries)),
        };
        self.adjust_tree(&path, split);
    }

    /// Descend from the root to a leaf, returning the index of the child
    /// taken at each level.
    fn choose_leaf(&self, bbox: &Rectangle) -> Vec<usize> {
        let mut path = Vec::new();
        let mut node = &self.root;
        while !node.is_leaf() {
            let index = node.choose_subtree(bbox);
            path.push(index);
            node = node.child(index);
        }
        path
    }

    fn node_at_mut(&mut self, path: &[usize]) -> &mut Node<T> {
        let mut node = &mut self.root;
        for &index in path {
            node = node.child_mut(index);
        }
        node
    }

    /// Walk `path` bottom-up, refreshing cached boxes and placing the sibling
    /// of each split into the level above.
    fn adjust_tree(&mut self, path: &[usize], mut split: Option<Node<T>>) {
        let RTreeConfig {
            max_entries,
            min_entries,
        } = self.config;
        for depth in (0..path.len()).rev() {
            let parent = self.node_at_mut(&path[..depth]);
            // Refresh before any split below moves the entry away.
            parent.entry_mut(path[depth]).refresh_bbox();
            if let Some(sibling) = split.take() {
                if let Err(entry) = parent.try_insert(Entry::internal(sibling), max_entries) {
                    split = Some(parent.split(entry, min_entries));
                }
            }
        }

        if let Some(sibling) = split {
            let old_root = mem::replace(&mut self.root, Node::new_leaf());
            self.root = Node::new_root(old_root, sibling);
            log::debug!("root split, height is now {}", self.height());
        }
    }

    /// Detach every node on `path` that fell below the minimum fill and
    /// refresh the cached boxes of the rest. Returns the detached nodes.
    fn condense_tree(&mut self, path: &[usize]) -> Vec<Node<T>> {
        let min_entries = self.config.min_entries;
        let mut orphans = Vec::new();
        for depth in (0..path.len()).rev() {
            let parent = self.node_at_mut(&path[..depth]);
            let index = path[depth];
            if parent.child(index).len() < min_entries {
                match parent.remove(index) {
                    Entry::Internal { child, .. } => orphans.push(*child),
                    Entry::Leaf { .. } => panic!("internal node holds a leaf entry"),
                }
            } else {
                parent.entry_mut(index).refresh_bbox();
            }
        }

        if !orphans.is_empty() {
            log::debug!("condensed {} underfull nodes", orphans.len());
        }
        if !self.root.is_leaf() && self.root.is_empty() {
            log::debug!("root lost its last child, resetting to an empty leaf");
            self.root = Node::new_leaf();
        }
        orphans
    }

    fn reinsert(&mut self, orphans: Vec<Node<T>>) {
        let mut worklist = orphans;
        let mut count = 0;
        while let Some(node) = worklist.pop() {
            for entry in node.into_entries() {
                match entry {
                    Entry::Leaf { data, bbox } => {
                        self.insert_entry(data, bbox);
                        count += 1;
                    }
                    Entry::Internal { child, .. } => worklist.push(*child),
                }
            }
        }
        if count > 0 {
            log::trace!("reinserted {} orphaned items", count);
        }
    }
}

/// Depth-first search for the leaf holding `(data, bbox)`, descending only
/// into children whose box intersects `bbox`. On success `path` holds the
/// child indices leading to the leaf and the entry's index is returned.
fn find_leaf<T: PartialEq>(
    node: &Node<T>,
    data: &T,
    bbox: &Rectangle,
    path: &mut Vec<usize>,
) -> Option<usize> {
    for (index, entry) in node.entries().iter().enumerate() {
        match entry {
            Entry::Leaf {
                data: candidate,
                bbox: candidate_bbox,
            } => {
                if candidate == data && candidate_bbox == bbox {
                    return Some(index);
                }
            }
            Entry::Internal {
                child,
                bbox: child_bbox,
            } => {
                if !child_bbox.intersects(bbox) {
                    continue;
                }
                path.push(index);
                if let Some(found) = find_leaf(&**child, data, bbox, path) {
                    return Some(found);
                }
                path.pop();
            }
        }
    }
    None
}

/// Iterator over every stored item, in tree order.
pub struct Iter<'a, T> {
    stack: Vec<slice::Iter<'a, Entry<T>>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, Rectangle);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(Entry::Leaf { data, bbox }) => return Some((data, *bbox)),
                Some(Entry::Internal { child, .. }) => self.stack.push(child.entries().iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

impl<'a, T> IntoIterator for &'a RTree<T> {
    type Item = (&'a T, Rectangle);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RTreeError;

    #[test]
    fn test_empty_tree() {
        let tree: RTree<u32> = RTree::new(4, 2).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.degree(), 4);
        assert_eq!(tree.min_fill(), 2);
        assert!(tree.envelope().is_empty());
        let everything = Rectangle::from_corners(-1e9, -1e9, 1e9, 1e9);
        assert!(tree.search(&everything).is_empty());
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn test_invalid_config() {
        assert_eq!(
            RTree::<u32>::new(4, 3).unwrap_err(),
            RTreeError::Configuration {
                max_entries: 4,
                min_entries: 3
            }
        );
        assert!(RTree::<u32>::new(9, 1).is_err());
    }

    #[test]
    fn test_default_config() {
        let tree: RTree<u32> = RTree::default();
        assert_eq!(tree.degree(), 9);
        assert_eq!(tree.min_fill(), 4);
    }

    #[test]
    fn test_insert_without_split() {
        let mut tree = RTree::new(4, 2).unwrap();
        tree.insert_point(1, 0., 0.);
        tree.insert_point(2, 3., 4.);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.height(), 1);
        assert!(tree.root().is_leaf());
        assert_eq!(tree.envelope(), Rectangle::from_corners(0., 0., 3., 4.));
    }

    #[test]
    fn test_root_grows_on_split() {
        let mut tree = RTree::new(3, 2).unwrap();
        for i in 0..4 {
            tree.insert_point(i, i as f64, 0.);
        }
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.root().len(), 2);
        assert!(!tree.root().is_leaf());
    }

    #[test]
    fn test_query_point() {
        let mut tree = RTree::new(4, 2).unwrap();
        tree.insert("a", Rectangle::from_corners(0., 0., 2., 2.));
        tree.insert("b", Rectangle::from_corners(1., 1., 3., 3.));
        tree.insert("c", Rectangle::from_corners(5., 5., 6., 6.));
        let mut hits: Vec<&str> = tree
            .query_point(Coordinate::new(1.5, 1.5))
            .into_iter()
            .map(|(d, _)| *d)
            .collect();
        hits.sort();
        assert_eq!(hits, vec!["a", "b"]);
        // Corners touch.
        assert_eq!(tree.query_point(Coordinate::new(3., 3.)).len(), 1);
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let mut tree = RTree::new(4, 2).unwrap();
        tree.insert_point(1, 0., 0.);
        assert!(!tree.delete(&1, Coordinate::new(1., 1.)));
        assert!(!tree.delete(&2, Coordinate::new(0., 0.)));
        assert_eq!(tree.len(), 1);
        assert!(tree.delete(&1, Coordinate::new(0., 0.)));
        assert!(tree.is_empty());
        assert!(!tree.delete(&1, Coordinate::new(0., 0.)));
    }

    #[test]
    fn test_delete_removes_one_of_duplicates() {
        let mut tree = RTree::new(4, 2).unwrap();
        for _ in 0..3 {
            tree.insert_point(7, 1., 1.);
        }
        assert!(tree.delete(&7, Coordinate::new(1., 1.)));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.query_point(Coordinate::new(1., 1.)).len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut tree = RTree::new(3, 2).unwrap();
        for i in 0..20 {
            tree.insert_point(i, i as f64, i as f64);
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn test_iter_visits_everything() {
        let mut tree = RTree::new(4, 2).unwrap();
        for i in 0..50 {
            tree.insert_point(i, (i % 7) as f64, (i / 7) as f64);
        }
        let mut seen: Vec<i32> = tree.iter().map(|(d, _)| *d).collect();
        seen.sort();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
        assert_eq!((&tree).into_iter().count(), 50);
    }
}

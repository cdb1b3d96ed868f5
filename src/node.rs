use std::mem;

use crate::entry::Entry;
use crate::{HasEnvelope, Rectangle};

/// A tree node: an ordered run of entries, all leaf entries or all internal
/// entries depending on the node's tag. The tag is fixed for the node's
/// lifetime.
#[derive(Debug, Clone)]
pub struct Node<T> {
    leaf: bool,
    entries: Vec<Entry<T>>,
}

/// One side of a split being assembled, with its running bounding box.
struct Group<T> {
    bbox: Rectangle,
    entries: Vec<Entry<T>>,
}

impl<T> Group<T> {
    fn new(seed: Entry<T>) -> Self {
        Group {
            bbox: seed.bbox(),
            entries: vec![seed],
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn push(&mut self, entry: Entry<T>) {
        self.bbox.expand(entry.bbox());
        self.entries.push(entry);
    }
}

impl<T> Node<T> {
    pub fn new_leaf() -> Self {
        Node {
            leaf: true,
            entries: Vec::new(),
        }
    }

    pub fn new_internal() -> Self {
        Node {
            leaf: false,
            entries: Vec::new(),
        }
    }

    /// A new root over the two halves of a split root.
    pub fn new_root(left: Node<T>, right: Node<T>) -> Self {
        let mut root = Node::new_internal();
        root.entries.push(Entry::internal(left));
        root.entries.push(Entry::internal(right));
        root
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn entry_mut(&mut self, index: usize) -> &mut Entry<T> {
        &mut self.entries[index]
    }

    pub fn remove(&mut self, index: usize) -> Entry<T> {
        self.entries.remove(index)
    }

    pub fn into_entries(self) -> Vec<Entry<T>> {
        self.entries
    }

    /// The bounding box of every entry; empty for an empty node.
    pub fn envelope(&self) -> Rectangle {
        Rectangle::of(&self.entries)
    }

    /// Child node behind entry `index` of an internal node.
    pub fn child(&self, index: usize) -> &Node<T> {
        match self.entries[index].child() {
            Some(child) => child,
            None => panic!("entry {} of a leaf node has no child", index),
        }
    }

    pub fn child_mut(&mut self, index: usize) -> &mut Node<T> {
        match self.entries[index].child_mut() {
            Some(child) => child,
            None => panic!("entry {} of a leaf node has no child", index),
        }
    }

    /// Append `entry` if the node has fewer than `max_entries` entries,
    /// otherwise hand it back so the caller can split.
    ///
    /// Cached boxes above this node are not touched.
    pub fn try_insert(&mut self, entry: Entry<T>, max_entries: usize) -> Result<(), Entry<T>> {
        self.assert_kind(&entry);
        if self.entries.len() < max_entries {
            self.entries.push(entry);
            Ok(())
        } else {
            Err(entry)
        }
    }

    /// Index of the child that should receive `bbox`: the one minimizing
    /// `enclosing_area(child, bbox) - area(bbox)`, ties going to the child
    /// with the smaller box, then to the first.
    pub fn choose_subtree(&self, bbox: &Rectangle) -> usize {
        assert!(!self.leaf, "choose_subtree called on a leaf node");
        assert!(!self.entries.is_empty(), "internal node has no children");

        let item_area = bbox.area();
        let mut best: Option<(usize, f64, f64)> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            let child_bbox = entry.bbox();
            let enlargement = Rectangle::enclosing_area(child_bbox, bbox) - item_area;
            let area = child_bbox.area();
            let better = match best {
                None => true,
                Some((_, best_enlargement, best_area)) => {
                    enlargement < best_enlargement
                        || (enlargement == best_enlargement && area < best_area)
                }
            };
            if better {
                best = Some((idx, enlargement, area));
            }
        }
        best.map(|(idx, _, _)| idx).unwrap_or(0)
    }

    /// Quadratic split.
    ///
    /// Distributes the current entries plus `entry` over two groups. Self keeps
    /// the first group, and the second is returned as a new node of the same
    /// kind. Neither group ends with fewer than `min_entries` entries as long
    /// as the node held at least `2 * min_entries - 1` entries beforehand.
    pub fn split(&mut self, entry: Entry<T>, min_entries: usize) -> Node<T> {
        self.assert_kind(&entry);
        let mut remaining = mem::take(&mut self.entries);
        remaining.push(entry);
        assert!(
            remaining.len() >= 2,
            "split needs at least 2 entries, got {}",
            remaining.len()
        );
        let total = remaining.len();

        let (a, b) = pick_seeds(&remaining);
        // a < b, so removing b first keeps a in place.
        let seed_b = remaining.remove(b);
        let seed_a = remaining.remove(a);
        let mut group_one = Group::new(seed_a);
        let mut group_two = Group::new(seed_b);

        while !remaining.is_empty() {
            if group_one.len() + remaining.len() <= min_entries {
                for e in remaining.drain(..) {
                    group_one.push(e);
                }
                break;
            }
            if group_two.len() + remaining.len() <= min_entries {
                for e in remaining.drain(..) {
                    group_two.push(e);
                }
                break;
            }

            let (idx, d1, d2) = pick_next(&remaining, &group_one.bbox, &group_two.bbox);
            let next = remaining.remove(idx);
            if d1 < d2 {
                group_one.push(next);
            } else if d2 < d1 {
                group_two.push(next);
            } else if group_two.len() < group_one.len() {
                group_two.push(next);
            } else {
                group_one.push(next);
            }
        }

        debug_assert_eq!(group_one.len() + group_two.len(), total);
        log::debug!(
            "split {} node of {} entries into {} + {}",
            if self.leaf { "leaf" } else { "internal" },
            total,
            group_one.len(),
            group_two.len()
        );

        self.entries = group_one.entries;
        Node {
            leaf: self.leaf,
            entries: group_two.entries,
        }
    }

    fn assert_kind(&self, entry: &Entry<T>) {
        assert_eq!(
            entry.is_leaf(),
            self.leaf,
            "entry kind does not match node kind"
        );
    }
}

/// The pair of entries that would waste the most area if grouped together.
/// Returns indices `(a, b)` with `a < b`; the first maximal pair wins.
fn pick_seeds<T>(candidates: &[Entry<T>]) -> (usize, usize) {
    let mut best: Option<(usize, usize, f64)> = None;
    for (i, a) in candidates.iter().enumerate() {
        let a_bbox = a.bbox();
        for (j, b) in candidates.iter().enumerate().skip(i + 1) {
            let b_bbox = b.bbox();
            let waste = Rectangle::enclosing_area(a_bbox, b_bbox) - a_bbox.area() - b_bbox.area();
            if best.map(|(_, _, w)| waste > w).unwrap_or(true) {
                best = Some((i, j, waste));
            }
        }
    }
    match best {
        Some((i, j, _)) => (i, j),
        None => panic!("pick_seeds needs at least 2 candidates"),
    }
}

/// The remaining entry with the strongest preference for one group, with its
/// enlargement cost for group one and group two.
fn pick_next<T>(
    remaining: &[Entry<T>],
    group_one: &Rectangle,
    group_two: &Rectangle,
) -> (usize, f64, f64) {
    let area_one = group_one.area();
    let area_two = group_two.area();
    let mut best: Option<(usize, f64, f64, f64)> = None;
    for (idx, entry) in remaining.iter().enumerate() {
        let bbox = entry.envelope();
        let d1 = Rectangle::enclosing_area(group_one, bbox) - area_one;
        let d2 = Rectangle::enclosing_area(group_two, bbox) - area_two;
        let diff = (d1 - d2).abs();
        if best.map(|(_, _, _, max)| diff > max).unwrap_or(true) {
            best = Some((idx, d1, d2, diff));
        }
    }
    match best {
        Some((idx, d1, d2, _)) => (idx, d1, d2),
        None => panic!("pick_next called with nothing left to assign"),
    }
}

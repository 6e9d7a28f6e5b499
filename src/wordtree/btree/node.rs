use crate::wordtree::btree::{MAX_KEYS, MIN_DEGREE, MIN_KEYS};
use std::borrow::Borrow;
use std::fmt::{Debug, Display, Formatter};

#[derive(Debug)]
pub(super) struct Node<K> {
    pub(super) is_leaf: bool,
    pub(super) keys: Vec<K>, // at most MAX_KEYS, non-decreasing
    pub(super) children: Vec<Box<Node<K>>>, // keys.len() + 1 for a link, empty for a leaf
}

impl<K: Ord + Clone + Debug> Node<K> {
    /// Allocates a node and bumps the live node counter. This is the only
    /// place nodes come into existence.
    pub(super) fn create(is_leaf: bool, nodes: &mut usize) -> Box<Self> {
        *nodes += 1;
        tracing::trace!(is_leaf, live = *nodes, "created node");

        Box::new(Node {
            is_leaf,
            keys: Vec::with_capacity(MAX_KEYS),
            children: if is_leaf {
                Vec::new()
            } else {
                Vec::with_capacity(MAX_KEYS + 1)
            },
        })
    }

    pub(super) fn is_full(&self) -> bool {
        self.keys.len() == MAX_KEYS
    }

    /// Splits the full child at `index`. Its upper `t - 1` keys (and upper `t`
    /// children) move into a new right sibling and its median is promoted into
    /// this node at `index`.
    pub(super) fn split_child(&mut self, index: usize, nodes: &mut usize) {
        let child = &mut self.children[index];
        debug_assert!(child.is_full(), "split_child called on a non-full child");

        let mut sibling = Node::create(child.is_leaf, nodes);
        sibling.keys = child.keys.split_off(MIN_DEGREE);
        if !child.is_leaf {
            sibling.children = child.children.split_off(MIN_DEGREE);
        }
        let median = child.keys.remove(MIN_DEGREE - 1);

        tracing::trace!(?median, index, "split child");
        self.keys.insert(index, median);
        self.children.insert(index + 1, sibling);
    }

    /// Inserts `key` below this node, which must not be full. Full children are
    /// split before descending so nothing ever has to be fixed on the way back up.
    pub(super) fn insert_non_full(&mut self, key: K, nodes: &mut usize) {
        // first position whose key sorts strictly after the new one, so equal
        // keys land to the right of the ones already stored
        let mut i = self.keys.partition_point(|k| *k <= key);

        if self.is_leaf {
            self.keys.insert(i, key);
            return;
        }

        if self.children[i].is_full() {
            self.split_child(i, nodes);
            if key > self.keys[i] {
                i += 1;
            }
        }
        self.children[i].insert_non_full(key, nodes);
    }

    /// Rightmost key of the subtree rooted here.
    pub(super) fn predecessor(&self) -> &K {
        let mut node = self;
        while !node.is_leaf {
            node = &node.children[node.children.len() - 1];
        }
        &node.keys[node.keys.len() - 1]
    }

    /// Leftmost key of the subtree rooted here.
    pub(super) fn successor(&self) -> &K {
        let mut node = self;
        while !node.is_leaf {
            node = &node.children[0];
        }
        &node.keys[0]
    }

    /// Rotates one key from `children[idx - 1]` through the separator into
    /// `children[idx]`.
    pub(super) fn borrow_from_prev(&mut self, idx: usize) {
        let (before, after) = self.children.split_at_mut(idx);
        let sibling = &mut before[idx - 1];
        let child = &mut after[0];

        let Some(borrowed) = sibling.keys.pop() else {
            return;
        };
        let separator = std::mem::replace(&mut self.keys[idx - 1], borrowed);
        child.keys.insert(0, separator);

        if !child.is_leaf {
            if let Some(grandchild) = sibling.children.pop() {
                child.children.insert(0, grandchild);
            }
        }
    }

    /// Rotates one key from `children[idx + 1]` through the separator into
    /// `children[idx]`.
    pub(super) fn borrow_from_next(&mut self, idx: usize) {
        let (before, after) = self.children.split_at_mut(idx + 1);
        let child = &mut before[idx];
        let sibling = &mut after[0];

        let borrowed = sibling.keys.remove(0);
        let separator = std::mem::replace(&mut self.keys[idx], borrowed);
        child.keys.push(separator);

        if !child.is_leaf {
            child.children.push(sibling.children.remove(0));
        }
    }

    /// Folds the separator at `idx` and all of `children[idx + 1]` into
    /// `children[idx]`, then frees the absorbed sibling.
    pub(super) fn merge_children(&mut self, idx: usize, nodes: &mut usize) {
        let sibling = *self.children.remove(idx + 1);
        let separator = self.keys.remove(idx);

        let child = &mut self.children[idx];
        child.keys.push(separator);
        child.keys.extend(sibling.keys);
        child.children.extend(sibling.children);

        *nodes -= 1;
        tracing::trace!(idx, live = *nodes, "merged children");
    }

    /// Brings `children[idx]` up to at least `t` keys: borrow from the left,
    /// then from the right, otherwise merge (with the right sibling when there
    /// is one).
    pub(super) fn fill_child(&mut self, idx: usize, nodes: &mut usize) {
        if idx > 0 && self.children[idx - 1].keys.len() > MIN_KEYS {
            self.borrow_from_prev(idx);
        } else if idx < self.keys.len() && self.children[idx + 1].keys.len() > MIN_KEYS {
            self.borrow_from_next(idx);
        } else if idx < self.keys.len() {
            self.merge_children(idx, nodes);
        } else {
            self.merge_children(idx - 1, nodes);
        }
    }

    pub(super) fn delete_from_leaf(&mut self, idx: usize) {
        self.keys.remove(idx);
    }

    /// Removes `keys[idx]` (equal to `key`) from this internal node.
    pub(super) fn delete_from_non_leaf<Q>(&mut self, idx: usize, key: &Q, nodes: &mut usize) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if self.children[idx].keys.len() >= MIN_DEGREE {
            let predecessor = self.children[idx].predecessor().clone();
            self.children[idx].delete_key::<K>(&predecessor, nodes);
            self.keys[idx] = predecessor;
            true
        } else if self.children[idx + 1].keys.len() >= MIN_DEGREE {
            let successor = self.children[idx + 1].successor().clone();
            self.children[idx + 1].delete_key::<K>(&successor, nodes);
            self.keys[idx] = successor;
            true
        } else {
            // the key moves down into the merged node and is removed there
            self.merge_children(idx, nodes);
            self.children[idx].delete_key(key, nodes)
        }
    }

    /// Removes one occurrence of `key` from the subtree rooted here. Any child
    /// about to be descended into is topped up to `t` keys first. Returns
    /// whether a key was removed.
    pub(super) fn delete_key<Q>(&mut self, key: &Q, nodes: &mut usize) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let idx = self.keys.partition_point(|k| <K as Borrow<Q>>::borrow(k) < key);

        if idx < self.keys.len() && <K as Borrow<Q>>::borrow(&self.keys[idx]) == key {
            if self.is_leaf {
                self.delete_from_leaf(idx);
                return true;
            }
            return self.delete_from_non_leaf(idx, key, nodes);
        }

        if self.is_leaf {
            return false;
        }

        let is_last_child = idx == self.keys.len();
        if self.children[idx].keys.len() < MIN_DEGREE {
            self.fill_child(idx, nodes);
        }

        // merging the last child into its left sibling shifts the target left
        if is_last_child && idx > self.keys.len() {
            self.children[idx - 1].delete_key(key, nodes)
        } else {
            self.children[idx].delete_key(key, nodes)
        }
    }

    pub(super) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self;
        loop {
            let idx = node.keys.partition_point(|k| <K as Borrow<Q>>::borrow(k) < key);
            if idx < node.keys.len() && <K as Borrow<Q>>::borrow(&node.keys[idx]) == key {
                return true;
            }
            if node.is_leaf {
                return false;
            }
            node = &node.children[idx];
        }
    }

    fn fmt_depth(&self, f: &mut Formatter<'_>, depth: usize) -> std::fmt::Result {
        f.write_str(&"  ".repeat(depth))?;
        if self.is_leaf {
            writeln!(f, "leaf {:?}", self.keys)
        } else {
            writeln!(f, "link {:?}", self.keys)?;
            for child in &self.children {
                child.fmt_depth(f, depth + 1)?;
            }
            Ok(())
        }
    }
}

impl<K: Ord + Clone + Debug> Display for Node<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.fmt_depth(f, 0)
    }
}

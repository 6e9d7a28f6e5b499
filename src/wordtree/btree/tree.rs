use crate::wordtree::btree::node::Node;
use crate::wordtree::btree::{MAX_KEYS, MIN_KEYS};
use std::borrow::Borrow;
use std::collections::VecDeque;
use std::fmt::{Debug, Display, Formatter};

/// In-memory B-tree of minimum degree [`MIN_DEGREE`](super::MIN_DEGREE) with
/// multiset semantics: equal keys are kept side by side and `remove` takes out
/// a single occurrence.
#[derive(Debug)]
pub struct BTree<K> {
    root: Box<Node<K>>,
    node_count: usize,
    len: usize,
}

/// The tree the word benchmark runs against.
pub type WordTree = BTree<String>;

impl<K: Ord + Clone + Debug> Default for BTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone + Debug> Display for BTree<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "root (nodes: {}, keys: {})", self.node_count, self.len)?;
        write!(f, "{}", self.root)
    }
}

impl<K: Ord + Clone + Debug> BTree<K> {
    /// Creates an empty tree: a single leaf root with no keys.
    pub fn new() -> Self {
        let mut node_count = 0;
        let root = Node::create(true, &mut node_count);

        BTree {
            root,
            node_count,
            len: 0,
        }
    }

    /// Adds `key`, keeping any equal keys already present.
    pub fn insert(&mut self, key: K) {
        if self.root.is_full() {
            // the only place the tree gets taller
            let old_root = std::mem::replace(&mut self.root, Node::create(false, &mut self.node_count));
            self.root.children.push(old_root);
            self.root.split_child(0, &mut self.node_count);
            tracing::debug!(height = self.height(), "root split");
        }

        self.root.insert_non_full(key, &mut self.node_count);
        self.len += 1;
    }

    /// Removes one occurrence of `key`. A missing key is not an error, the tree
    /// is left untouched and `false` comes back.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.root.delete_key(key, &mut self.node_count);
        if removed {
            self.len -= 1;
        }

        // an empty leaf root is already the empty tree
        if self.root.keys.is_empty() && !self.root.is_leaf {
            if let Some(child) = self.root.children.pop() {
                self.root = child;
                self.node_count -= 1;
                tracing::debug!(height = self.height(), "root collapsed");
            }
        }

        removed
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.root.contains(key)
    }

    /// Number of keys stored, counting duplicates.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of levels, a lone root leaf being height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node = &self.root;
        while !node.is_leaf {
            node = &node.children[0];
            height += 1;
        }
        height
    }

    /// Keys in non-decreasing order.
    pub fn iter(&self) -> Iter<'_, K> {
        let mut iter = Iter {
            stack: Vec::new(),
            remaining: self.len,
        };
        iter.push_left_spine(&self.root);
        iter
    }

    /// The key lists of every node, level by level from the root, left to right.
    pub fn levels(&self) -> Vec<Vec<Vec<K>>> {
        let mut levels: Vec<Vec<Vec<K>>> = Vec::new();
        let mut queue = VecDeque::from([(&self.root, 0usize)]);

        while let Some((node, depth)) = queue.pop_front() {
            if levels.len() == depth {
                levels.push(Vec::new());
            }
            levels[depth].push(node.keys.clone());
            queue.extend(node.children.iter().map(|child| (child, depth + 1)));
        }

        levels
    }

    /// Consumes the tree. Children are released before their parents since
    /// every node owns its subtree.
    pub fn destroy(self) {
        tracing::debug!(nodes = self.node_count, "destroying tree");
    }

    /// Walks the whole tree and checks the structural invariants: equal leaf
    /// depth, ordered keys within and across nodes, key and child counts, and
    /// that the recorded node and key counts match what is reachable.
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let mut walk = Walk {
            leaf_depth: None,
            nodes: 0,
            keys: 0,
        };
        walk.visit(&self.root, 0, None, None)?;

        if walk.nodes != self.node_count {
            return Err(InvariantViolation::NodeCount {
                recorded: self.node_count,
                reachable: walk.nodes,
            });
        }
        if walk.keys != self.len {
            return Err(InvariantViolation::KeyCount {
                recorded: self.len,
                reachable: walk.keys,
            });
        }

        Ok(())
    }
}

/// A broken structural invariant found by [`BTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Leaves were found at two different depths.
    UnevenLeaves { expected: usize, found: usize },
    /// A node holds too many keys, or a non-root node too few.
    KeyBounds { depth: usize, keys: usize },
    /// An internal node does not have exactly one more child than keys, or a
    /// leaf has children.
    ChildCount { depth: usize, keys: usize, children: usize },
    /// Keys are out of order inside a node or relative to a parent separator.
    Order { depth: usize },
    NodeCount { recorded: usize, reachable: usize },
    KeyCount { recorded: usize, reachable: usize },
}

impl Display for InvariantViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnevenLeaves { expected, found } => {
                write!(f, "leaf at depth {found}, expected every leaf at depth {expected}")
            }
            Self::KeyBounds { depth, keys } => {
                write!(f, "node at depth {depth} holds {keys} keys")
            }
            Self::ChildCount { depth, keys, children } => {
                write!(f, "node at depth {depth} has {keys} keys and {children} children")
            }
            Self::Order { depth } => write!(f, "keys out of order at depth {depth}"),
            Self::NodeCount { recorded, reachable } => {
                write!(f, "node count says {recorded}, {reachable} nodes reachable")
            }
            Self::KeyCount { recorded, reachable } => {
                write!(f, "length says {recorded}, {reachable} keys reachable")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

struct Walk {
    leaf_depth: Option<usize>,
    nodes: usize,
    keys: usize,
}

impl Walk {
    fn visit<K: Ord>(
        &mut self,
        node: &Node<K>,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> Result<(), InvariantViolation> {
        self.nodes += 1;
        self.keys += node.keys.len();

        let too_few = depth > 0 && node.keys.len() < MIN_KEYS;
        if too_few || node.keys.len() > MAX_KEYS {
            return Err(InvariantViolation::KeyBounds {
                depth,
                keys: node.keys.len(),
            });
        }

        let sorted = node.keys.windows(2).all(|pair| pair[0] <= pair[1]);
        let above_lower = lower.map_or(true, |bound| node.keys.iter().all(|k| bound <= k));
        let below_upper = upper.map_or(true, |bound| node.keys.iter().all(|k| k <= bound));
        if !(sorted && above_lower && below_upper) {
            return Err(InvariantViolation::Order { depth });
        }

        if node.is_leaf {
            if !node.children.is_empty() {
                return Err(InvariantViolation::ChildCount {
                    depth,
                    keys: node.keys.len(),
                    children: node.children.len(),
                });
            }
            return match self.leaf_depth {
                None => {
                    self.leaf_depth = Some(depth);
                    Ok(())
                }
                Some(expected) if expected != depth => Err(InvariantViolation::UnevenLeaves {
                    expected,
                    found: depth,
                }),
                Some(_) => Ok(()),
            };
        }

        if node.children.len() != node.keys.len() + 1 {
            return Err(InvariantViolation::ChildCount {
                depth,
                keys: node.keys.len(),
                children: node.children.len(),
            });
        }

        for (i, child) in node.children.iter().enumerate() {
            let child_lower = if i == 0 { lower } else { Some(&node.keys[i - 1]) };
            let child_upper = node.keys.get(i).or(upper);
            self.visit(child, depth + 1, child_lower, child_upper)?;
        }

        Ok(())
    }
}

/// In-order iterator over the keys of a [`BTree`].
pub struct Iter<'a, K> {
    stack: Vec<(&'a Node<K>, usize)>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn push_left_spine(&mut self, mut node: &'a Node<K>) {
        loop {
            self.stack.push((node, 0));
            if node.is_leaf {
                break;
            }
            node = &node.children[0];
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let node = top.0;
            let idx = top.1;

            if idx < node.keys.len() {
                top.1 += 1;
                if !node.is_leaf {
                    self.push_left_spine(&node.children[idx + 1]);
                }
                self.remaining -= 1;
                return Some(&node.keys[idx]);
            }

            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<'a, K: Ord + Clone + Debug> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord + Clone + Debug> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord + Clone + Debug> FromIterator<K> for BTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = BTree::new();
        tree.extend(iter);
        tree
    }
}

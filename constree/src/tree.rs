//! Constituency trees.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::ops::{Index, IndexMut};

use crate::label::Label;
use crate::penn::PennTree;

/// A node in a constituency tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TreeNode {
    label: Label,
    children: Vec<usize>,
    parent: Option<usize>,
}

impl TreeNode {
    /// Get the node label.
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Get the node label mutably.
    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    /// Get the node's children, in surface order.
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Get the node's parent. The root has no parent.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// An arena-backed constituency tree.
///
/// Nodes live in a single vector and are addressed by `usize` ids; the
/// root is always node `0`. Each node owns its list of child ids and
/// carries its parent id, so parent recovery is a field read rather than
/// a search from the root. The shape of a tree is fixed after
/// construction: only labels are mutated afterwards (word indexing and
/// head percolation annotate labels in place).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tree {
    nodes: Vec<TreeNode>,
}

#[allow(clippy::len_without_is_empty)]
impl Tree {
    /// Construct a tree consisting of a single root node.
    pub fn new(label: Label) -> Tree {
        Tree {
            nodes: vec![TreeNode {
                label,
                children: Vec::new(),
                parent: None,
            }],
        }
    }

    /// Add a child under `parent`, after any existing children.
    ///
    /// Returns the id of the new node.
    ///
    /// Panics when `parent` is not a node of this tree.
    pub fn add_child(&mut self, parent: usize, label: Label) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            label,
            children: Vec::new(),
            parent: Some(parent),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// Get the root node id.
    pub fn root(&self) -> usize {
        0
    }

    /// Get the number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Get a node's children, in surface order.
    pub fn children(&self, node: usize) -> &[usize] {
        &self.nodes[node].children
    }

    /// Get a node's parent. The root has no parent.
    pub fn parent(&self, node: usize) -> Option<usize> {
        self.nodes[node].parent
    }

    /// Returns `true` if the node has no children.
    pub fn is_leaf(&self, node: usize) -> bool {
        self.nodes[node].is_leaf()
    }

    /// Returns `true` if the node dominates exactly one leaf child.
    pub fn is_preterminal(&self, node: usize) -> bool {
        let children = self.children(node);
        children.len() == 1 && self.is_leaf(children[0])
    }

    /// Returns `true` if the node is neither a leaf nor a preterminal.
    pub fn is_phrasal(&self, node: usize) -> bool {
        !self.is_leaf(node) && !self.is_preterminal(node)
    }

    /// Get an iterator over node ids in pre-order.
    pub fn preorder(&self) -> Preorder {
        Preorder {
            tree: self,
            stack: vec![self.root()],
        }
    }

    /// Get an iterator over leaf ids, left to right.
    pub fn leaves(&self) -> Leaves {
        Leaves(self.preorder())
    }

    /// Number the nodes of the tree.
    ///
    /// Leaves are numbered left to right starting at 1, then the
    /// remaining nodes are numbered in pre-order with the numbering
    /// continuing after the last leaf. Nodes that already carry an index
    /// keep it.
    pub fn index_words(&mut self) {
        let mut next = 1;
        let leaves: Vec<_> = self.leaves().collect();
        for leaf in leaves {
            let idx = match self.nodes[leaf].label.index() {
                Some(idx) => idx,
                None => {
                    self.nodes[leaf].label.set_index(Some(next));
                    next
                }
            };
            next = idx + 1;
        }

        let mut next = self
            .nodes
            .iter()
            .filter_map(|node| node.label.index())
            .max()
            .unwrap_or(0)
            + 1;
        let internal: Vec<_> = self.preorder().filter(|&n| !self.is_leaf(n)).collect();
        for node in internal {
            if self.nodes[node].label.index().is_none() {
                self.nodes[node].label.set_index(Some(next));
                next += 1;
            }
        }
    }

    /// Build the index-to-node lookup table.
    ///
    /// Only meaningful after [`index_words`](Tree::index_words); nodes
    /// without an index are absent. Phrasal nodes share their head's
    /// index after percolation, so for those indices the table holds the
    /// leaf, which is always numbered first.
    pub fn index_map(&self) -> HashMap<usize, usize> {
        let mut map = HashMap::new();
        for node in self.preorder() {
            if let Some(idx) = self.nodes[node].label.index() {
                let entry = map.entry(idx).or_insert(node);
                if self.is_leaf(node) {
                    *entry = node;
                }
            }
        }
        map
    }

    /// Get the highest ancestor sharing the node's head index.
    ///
    /// After head percolation, the chain of ancestors whose labels carry
    /// the same index as `node` all share one lexical head; the topmost
    /// of them stands in for the whole chain when dependencies are
    /// attached. An unindexed node is its own chain top.
    pub fn head_chain_top(&self, node: usize) -> usize {
        let idx = match self.nodes[node].label.index() {
            Some(idx) => idx,
            None => return node,
        };

        let mut cur = node;
        while let Some(parent) = self.nodes[cur].parent {
            if self.nodes[parent].label.index() == Some(idx) {
                cur = parent;
            } else {
                break;
            }
        }

        cur
    }
}

impl Display for Tree {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        PennTree::borrowed(self).fmt(fmt)
    }
}

impl Index<usize> for Tree {
    type Output = TreeNode;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.nodes[idx]
    }
}

impl IndexMut<usize> for Tree {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.nodes[idx]
    }
}

/// Iterator over node ids in pre-order.
pub struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<usize>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for &child in self.tree.nodes[node].children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// Iterator over leaf ids, left to right.
pub struct Leaves<'a>(Preorder<'a>);

impl<'a> Iterator for Leaves<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.0.next()?;
            if self.0.tree.is_leaf(node) {
                return Some(node);
            }
        }
    }
}

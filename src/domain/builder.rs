//! Cursor-based construction of game trees.
//!
//! Parsers append nodes below a cursor. The parent links stored in the
//! arena are only consulted here, to climb back out of a variation.

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tree::{NodeId, PropertyTree};

/// Builds a [`PropertyTree`] node by node.
#[derive(Debug)]
pub struct GameBuilder {
    tree: PropertyTree,
    cursor: NodeId,
    /// Branch points opened by [`GameBuilder::start_variation`]
    variations: Vec<NodeId>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        let tree = PropertyTree::new();
        let cursor = tree.root();
        Self {
            tree,
            cursor,
            variations: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Number of nodes created below the root.
    pub fn node_count(&self) -> usize {
        self.tree.len() - 1
    }

    pub fn has_nodes(&self) -> bool {
        self.node_count() > 0
    }

    /// Set a root property, replacing earlier values.
    pub fn set_root(&mut self, key: &str, value: &str) {
        let root = self.tree.root();
        self.tree.set(root, key, value);
    }

    /// Set a root property unless it is already present.
    /// Returns whether the value was stored.
    pub fn set_root_once(&mut self, key: &str, value: &str) -> bool {
        let root = self.tree.root();
        if self.tree.contains(root, key) {
            return false;
        }
        self.tree.set(root, key, value);
        true
    }

    /// Append a value to a multi-value root property.
    pub fn add_root(&mut self, key: &str, value: &str) {
        let root = self.tree.root();
        self.tree.add(root, key, value);
    }

    pub fn root_has(&self, key: &str) -> bool {
        self.tree.contains(self.tree.root(), key)
    }

    /// Create a child of the cursor and move the cursor onto it.
    pub fn append_node(&mut self) -> NodeId {
        // the cursor always points at a live node of our own arena
        let child = self
            .tree
            .add_child(self.cursor)
            .unwrap_or(self.cursor);
        self.cursor = child;
        child
    }

    /// Append a node holding a single property.
    pub fn append_move(&mut self, key: &str, value: &str) -> NodeId {
        let node = self.append_node();
        self.tree.set(node, key, value);
        node
    }

    /// Remember the cursor as a branch point for a new variation.
    pub fn start_variation(&mut self) {
        self.variations.push(self.cursor);
    }

    /// Return the cursor to the branch point of the innermost variation.
    pub fn end_variation(&mut self) -> DomainResult<()> {
        let branch = self
            .variations
            .pop()
            .ok_or_else(|| DomainError::parse("tree", "variation closed without being opened"))?;
        // walk up the build-time parent links until the branch point
        let mut current = self.cursor;
        while current != branch {
            current = self
                .tree
                .parent(current)
                .ok_or_else(|| DomainError::parse("tree", "branch point is not an ancestor"))?;
        }
        self.cursor = branch;
        Ok(())
    }

    /// Hand over the finished tree. The parent links are not used again.
    pub fn finish(self) -> PropertyTree {
        self.tree
    }

    /// Hand over the finished tree, failing when no node was appended.
    pub fn finish_with_moves(self, format: &'static str) -> DomainResult<PropertyTree> {
        if !self.has_nodes() {
            return Err(DomainError::parse(format, "no moves found"));
        }
        Ok(self.finish())
    }
}

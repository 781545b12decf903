use generational_arena::{Arena, Index};
use std::fmt;
use tracing::instrument;

use crate::domain::point::escape_value;

/// Handle of a node inside its [`PropertyTree`].
pub type NodeId = Index;

/// One property: a short key and its ordered, already escaped values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub key: String,
    pub values: Vec<String>,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)?;
        for value in &self.values {
            write!(f, "[{}]", value)?;
        }
        Ok(())
    }
}

/// Tree node in the arena-based game record.
#[derive(Debug, Default)]
pub struct PropertyNode {
    /// Properties in insertion order
    properties: Vec<Property>,
    /// Index of parent node in the arena, only meaningful while building
    parent: Option<NodeId>,
    /// Indices of child nodes in the arena
    children: Vec<NodeId>,
}

impl PropertyNode {
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.values.as_slice())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.key == key)
    }

    /// Replace all values of `key` with the single escaped `value`.
    fn set(&mut self, key: &str, value: &str) {
        let values = vec![escape_value(value)];
        match self.position(key) {
            Some(pos) => self.properties[pos].values = values,
            None => self.properties.push(Property {
                key: key.to_string(),
                values,
            }),
        }
    }

    /// Append the escaped `value` to `key` unless it is already present.
    fn add(&mut self, key: &str, value: &str) {
        let value = escape_value(value);
        match self.position(key) {
            Some(pos) => {
                let values = &mut self.properties[pos].values;
                if !values.contains(&value) {
                    values.push(value);
                }
            }
            None => self.properties.push(Property {
                key: key.to_string(),
                values: vec![value],
            }),
        }
    }

    fn remove(&mut self, key: &str) -> Option<Property> {
        self.position(key).map(|pos| self.properties.remove(pos))
    }
}

/// Arena-backed property tree shared by all parsers and the serializer.
///
/// The root exists from construction on. Children are always created fresh
/// under an existing node, so the structure is acyclic and every node but
/// the root has exactly one parent.
#[derive(Debug)]
pub struct PropertyTree {
    /// Arena storage for all tree nodes
    arena: Arena<PropertyNode>,
    /// Index of the root node
    root: NodeId,
}

impl Default for PropertyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(PropertyNode::default());
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// A tree always holds its root, so this is never true.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, parent: NodeId) -> Option<NodeId> {
        if !self.arena.contains(parent) {
            return None;
        }
        let node_idx = self.arena.insert(PropertyNode {
            parent: Some(parent),
            ..PropertyNode::default()
        });
        if let Some(parent) = self.arena.get_mut(parent) {
            parent.children.push(node_idx);
        }
        Some(node_idx)
    }

    pub fn node(&self, idx: NodeId) -> Option<&PropertyNode> {
        self.arena.get(idx)
    }

    pub fn parent(&self, idx: NodeId) -> Option<NodeId> {
        self.arena.get(idx).and_then(|n| n.parent)
    }

    pub fn children(&self, idx: NodeId) -> &[NodeId] {
        self.arena.get(idx).map_or(&[], |n| n.children.as_slice())
    }

    pub fn get(&self, idx: NodeId, key: &str) -> Option<&[String]> {
        self.arena.get(idx).and_then(|n| n.get(key))
    }

    /// First stored value of `key`, still in escaped form.
    pub fn first(&self, idx: NodeId, key: &str) -> Option<&str> {
        self.get(idx, key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, idx: NodeId, key: &str) -> bool {
        self.get(idx, key).is_some()
    }

    pub fn set(&mut self, idx: NodeId, key: &str, value: &str) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.set(key, value);
        }
    }

    pub fn add(&mut self, idx: NodeId, key: &str, value: &str) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.add(key, value);
        }
    }

    pub fn remove(&mut self, idx: NodeId, key: &str) -> Option<Property> {
        self.arena.get_mut(idx).and_then(|n| n.remove(key))
    }

    /// Move the listed keys to the front of the node, in the given order.
    /// Keys the node does not carry are ignored; other properties keep
    /// their relative order.
    pub fn move_to_front(&mut self, idx: NodeId, keys: &[&str]) {
        if let Some(node) = self.arena.get_mut(idx) {
            let mut front: Vec<Property> = keys.iter().filter_map(|k| node.remove(k)).collect();
            front.append(&mut node.properties);
            node.properties = front;
        }
    }

    /// Pre-order, left-to-right traversal.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Nodes carrying a `B` or `W` move property.
    pub fn move_count(&self) -> usize {
        self.iter()
            .filter(|(_, node)| node.get("B").is_some() || node.get("W").is_some())
            .count()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: NodeId) -> usize {
        // linear games are deep, so follow single-child chains iteratively
        let mut depth = 0;
        let mut current = node_idx;
        while let Some(node) = self.node(current) {
            depth += 1;
            match node.children.as_slice() {
                [] => return depth,
                [only] => current = *only,
                many => {
                    return depth
                        + many
                            .iter()
                            .map(|&child| self.calculate_depth(child))
                            .max()
                            .unwrap_or(0)
                }
            }
        }
        depth
    }
}

pub struct TreeIterator<'a> {
    tree: &'a PropertyTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a PropertyTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root()],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a PropertyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

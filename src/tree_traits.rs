/*
Tree rendering for the `show` command.

A linear run of nodes is listed flat under its parent entry; every fork
opens one "variation N" subtree per child.
 */
use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodeId, PropertyNode, PropertyTree};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for PropertyTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let mut tree = Tree::new(format!("game ({} moves)", self.move_count()));
        push_sequence(self, self.root(), &mut tree);
        tree
    }
}

fn node_label(node: &PropertyNode) -> String {
    if node.properties().is_empty() {
        ";".to_string()
    } else {
        node.properties().iter().join(" ")
    }
}

fn push_sequence(tree: &PropertyTree, start: NodeId, parent: &mut Tree<String>) {
    let mut current = Some(start);
    while let Some(idx) = current {
        let Some(node) = tree.node(idx) else {
            break;
        };
        parent.push(Tree::new(node_label(node)));
        current = match node.children() {
            [] => None,
            [only] => Some(*only),
            many => {
                for (i, &child) in many.iter().enumerate() {
                    let mut variation = Tree::new(format!("variation {}", i + 1));
                    push_sequence(tree, child, &mut variation);
                    parent.push(variation);
                }
                None
            }
        };
    }
}

//! SGF text emission.
//!
//! Values were escaped when they were stored, so nothing is escaped here.
//! A chain of single children stays flat inside its group; a node with two
//! or more children closes its sequence with one nested group per child.

use std::fmt::{self, Write as _};
use std::io;

use crate::domain::{NodeId, PropertyTree};

/// Display adapter writing a tree as SGF.
pub struct Sgf<'a>(pub &'a PropertyTree);

impl fmt::Display for Sgf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        write_sequence(self.0, self.0.root(), f)?;
        f.write_str(")\n")
    }
}

fn write_sequence(tree: &PropertyTree, start: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut current = start;
    while let Some(node) = tree.node(current) {
        f.write_char(';')?;
        for property in node.properties() {
            write!(f, "{}", property)?;
        }
        match node.children() {
            [] => break,
            [only] => current = *only,
            children => {
                for &child in children {
                    f.write_char('(')?;
                    write_sequence(tree, child, f)?;
                    f.write_char(')')?;
                }
                break;
            }
        }
    }
    Ok(())
}

/// Complete SGF text of `tree`.
pub fn serialize(tree: &PropertyTree) -> String {
    Sgf(tree).to_string()
}

/// Stream the SGF text of `tree` into `sink` in emission order.
pub fn write_tree<W: io::Write + ?Sized>(tree: &PropertyTree, sink: &mut W) -> io::Result<()> {
    write!(sink, "{}", Sgf(tree))
}

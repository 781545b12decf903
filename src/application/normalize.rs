//! Root tags every converted record carries, whatever its dialect.

use tracing::debug;

use crate::domain::{DomainError, DomainResult, PropertyTree};

pub const FORMAT_VERSION: &str = "4";
pub const GAME_TYPE: &str = "1";
pub const CHARSET: &str = "UTF-8";
pub const DEFAULT_BOARD_SIZE: &str = "19";
pub const MAX_BOARD_SIZE: i32 = 19;

/// Leading root properties, in output order.
const LEADING_TAGS: [&str; 5] = ["FF", "GM", "CA", "AP", "SZ"];

/// `AP` value: this converter and its version.
pub fn application_tag() -> String {
    format!("{}:{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Force the fixed root tags and check the board size.
pub fn normalize(tree: &mut PropertyTree) -> DomainResult<()> {
    let root = tree.root();
    tree.set(root, "FF", FORMAT_VERSION);
    tree.set(root, "GM", GAME_TYPE);
    tree.set(root, "CA", CHARSET);
    tree.set(root, "AP", &application_tag());
    if !tree.contains(root, "SZ") {
        debug!("no board size, defaulting to {}", DEFAULT_BOARD_SIZE);
        tree.set(root, "SZ", DEFAULT_BOARD_SIZE);
    }

    let raw = tree.first(root, "SZ").unwrap_or_default();
    let size: i32 = raw
        .trim()
        .parse()
        .map_err(|_| DomainError::BoardSize(raw.to_string()))?;
    if !(1..=MAX_BOARD_SIZE).contains(&size) {
        return Err(DomainError::BoardSize(size.to_string()));
    }

    tree.move_to_front(root, &LEADING_TAGS);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_board_size() {
        let mut tree = PropertyTree::new();
        normalize(&mut tree).unwrap();
        let root = tree.root();
        assert_eq!(tree.first(root, "SZ"), Some("19"));
        assert_eq!(tree.first(root, "FF"), Some("4"));
        assert_eq!(tree.first(root, "GM"), Some("1"));
        assert_eq!(tree.first(root, "CA"), Some("UTF-8"));
    }

    #[test]
    fn test_overwrites_existing_tags() {
        let mut tree = PropertyTree::new();
        let root = tree.root();
        tree.set(root, "PB", "someone");
        tree.set(root, "FF", "3");
        tree.set(root, "SZ", "9");
        normalize(&mut tree).unwrap();
        let keys: Vec<&str> = tree
            .node(root)
            .unwrap()
            .properties()
            .iter()
            .map(|p| p.key.as_str())
            .collect();
        assert_eq!(keys, vec!["FF", "GM", "CA", "AP", "SZ", "PB"]);
        assert_eq!(tree.first(root, "FF"), Some("4"));
    }

    #[test]
    fn test_rejects_out_of_range_size() {
        for bad in ["0", "20", "abc"] {
            let mut tree = PropertyTree::new();
            let root = tree.root();
            tree.set(root, "SZ", bad);
            assert!(matches!(
                normalize(&mut tree),
                Err(DomainError::BoardSize(_))
            ));
        }
    }
}

//! Domain layer: game tree model and board math
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod builder;
pub mod error;
pub mod point;
pub mod tree;

pub use builder::GameBuilder;
pub use error::{DomainError, DomainResult};
pub use point::{
    encode_point, escape_value, handicap_points, unescape_value, HandicapLayout, Point,
};
pub use tree::{NodeId, Property, PropertyNode, PropertyTree};

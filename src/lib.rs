//! kifu2sgf: convert legacy Go game records to SGF
//!
//! Layers, innermost first:
//! - `domain`: coordinates, handicap layouts and the game property tree
//! - `application`: format parsers, normalization, serialization and the
//!   conversion service
//! - `infrastructure`: filesystem access and service wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use application::{convert, convert_to_writer, parse_normalized, Format};
pub use domain::PropertyTree;

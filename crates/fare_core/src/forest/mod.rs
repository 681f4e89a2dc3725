//! Random forest inference
//!
//! - `tree`: flat-array regression trees
//! - `model`: the ensemble, member outputs and hashing
//!
//! # Usage
//!
//! ```rust
//! use fare_core::forest::{Forest, Node, Tree};
//!
//! let tree = Tree::new(vec![
//!     Node::internal(0, 0, 5.0, 1, 2),
//!     Node::leaf(1, 4000.0),
//!     Node::leaf(2, 6000.0),
//! ]);
//! let forest = Forest::new(vec![tree], 1);
//!
//! assert_eq!(forest.predict(&[3.0]).unwrap(), 4000.0);
//! ```

pub mod model;
pub mod tree;

pub use model::{Forest, FOREST_FORMAT_VERSION};
pub use tree::{Node, Tree};

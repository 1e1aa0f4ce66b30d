//! Algorithms over the graph traits.

mod traversal;

pub use traversal::{postorder, reverse_postorder};

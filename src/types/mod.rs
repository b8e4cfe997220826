//! Core types for the fragment kernel.

pub mod fragment;
pub mod node;

pub use fragment::{Fragment, View};
pub use node::Node;

//! Fragment-kind variants.
//!
//! The closed set of node kinds a view can be authored from: four leaf
//! primitives and six composites. Each kind satisfies one contract,
//! `assemble(ids) -> (contents, referenced children)`, where `contents`
//! only ever encodes child references through the ids returned by
//! [`ChildIds::get`] — never by embedding a node instance.

pub mod dag;
pub mod grid;
pub mod keyvalue;
pub mod primitives;
pub mod sequence;
pub mod switch;

pub use dag::{Dag, DagError, DagNodeConfig, DagPort, FlowDirection, PortSide};
pub use grid::{Grid, SizingMode};
pub use keyvalue::KeyValue;
pub use primitives::{Color, Emphasis, Icon, Image, Text, TextVariant, Token};
pub use sequence::{Flow, Orientation, Sequence};
pub use switch::Switch;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::assembler::{AssemblyError, ChildIds};
use crate::types::node::Node;

/// Closed tagged union over all node kinds.
pub(crate) enum NodeKind {
    Text(primitives::TextSpec),
    Token(primitives::TokenSpec),
    Icon(primitives::IconSpec),
    Image(primitives::ImageSpec),
    Flow(sequence::FlowSpec),
    Sequence(sequence::SequenceSpec),
    Switch(switch::SwitchSpec),
    KeyValue(keyvalue::KeyValueSpec),
    Grid(grid::GridLayoutSpec),
    Dag(dag::DagLayoutSpec),
    /// Misbehaving kind that registers a child id it never returns as a
    /// referenced child. Exists only to exercise the unresolved-fragment
    /// guard.
    #[cfg(test)]
    Orphaning(Node),
}

impl NodeKind {
    /// Wire tag emitted as the fragment's `type` field.
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            Self::Text(_) => "TextPrimitive",
            Self::Token(_) => "TokenPrimitive",
            Self::Icon(_) => "IconPrimitive",
            Self::Image(_) => "ImagePrimitive",
            Self::Flow(_) => "FlowLayout",
            Self::Sequence(_) => "SequenceLayout",
            Self::Switch(_) => "SwitchLayout",
            Self::KeyValue(_) => "KeyValueLayout",
            Self::Grid(_) => "GridLayout",
            Self::Dag(_) => "DagLayout",
            #[cfg(test)]
            Self::Orphaning(_) => "OrphaningTest",
        }
    }

    /// Resolve this node's content template and enumerate the children it
    /// references.
    pub(crate) fn assemble(
        &self,
        ids: &mut ChildIds<'_>,
    ) -> Result<(Map<String, Value>, Vec<Node>), AssemblyError> {
        match self {
            Self::Text(spec) => Ok(spec.assemble()),
            Self::Token(spec) => Ok(spec.assemble()),
            Self::Icon(spec) => Ok(spec.assemble()),
            Self::Image(spec) => Ok(spec.assemble()),
            Self::Flow(spec) => Ok(spec.assemble(ids)),
            Self::Sequence(spec) => Ok(spec.assemble(ids)),
            Self::Switch(spec) => spec.assemble(ids),
            Self::KeyValue(spec) => Ok(spec.assemble(ids)),
            Self::Grid(spec) => spec.assemble(ids),
            Self::Dag(spec) => spec.assemble(ids),
            #[cfg(test)]
            Self::Orphaning(child) => {
                ids.get(child, "orphan");
                Ok((Map::new(), Vec::new()))
            }
        }
    }
}

/// Insert a content field.
pub(crate) fn put<T: Serialize>(contents: &mut Map<String, Value>, key: &str, value: &T) {
    let value = serde_json::to_value(value).expect("content field serialization failed");
    contents.insert(key.to_string(), value);
}

/// Insert an optional content field; fields with no value are omitted from
/// the emitted content map rather than emitted as a null placeholder.
pub(crate) fn put_opt<T: Serialize>(contents: &mut Map<String, Value>, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        put(contents, key, value);
    }
}

/// Common impls for a kind handle wrapping a [`Node`]: conversions into
/// `Node` and the opaque metadata attachment every kind supports.
macro_rules! node_handle_impls {
    ($handle:ident) => {
        impl From<$handle> for $crate::types::node::Node {
            fn from(handle: $handle) -> Self {
                handle.0
            }
        }

        impl From<&$handle> for $crate::types::node::Node {
            fn from(handle: &$handle) -> Self {
                handle.0.clone()
            }
        }

        impl $handle {
            /// Attach an opaque metadata entry, carried verbatim into the
            /// emitted fragment.
            pub fn meta(&self, key: impl Into<String>, value: serde_json::Value) -> &Self {
                self.0.set_meta(key.into(), value);
                self
            }

            /// Untyped node reference aliasing this handle.
            pub fn as_node(&self) -> $crate::types::node::Node {
                self.0.clone()
            }

            /// Erase the kind-specific handle into an untyped node
            /// reference.
            pub fn into_node(self) -> $crate::types::node::Node {
                self.0
            }
        }
    };
}

pub(crate) use node_handle_impls;

//! # fragment-kernel
//!
//! Deterministic flattening of visualization-model graphs into fragment tables.
//!
//! The kernel answers one question:
//!
//! > Given the root of a (possibly cyclic, possibly aliased) graph of
//! > visualization nodes, what is the flat table of records a renderer
//! > should receive?
//!
//! ## Core Contract
//!
//! 1. Every distinct node *instance* is assigned exactly one [`FragmentId`]
//!    and resolved into exactly one [`Fragment`], no matter how many paths
//!    reach it
//! 2. Every reference between nodes is rewritten into a [`FragmentId`]
//!    resolvable against the output table (closure property)
//! 3. Identical input graphs produce byte-identical [`View`] output,
//!    including identical ids
//!
//! ## Architecture
//!
//! ```text
//! Node graph → assemble() → worklist loop → View { rootId, fragments }
//!                               ↓
//!                   ChildIds (assign-then-resolve)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Ids are a pure function of (parent id, slot name)
//! - The fragment table is canonically ordered (BTreeMap keyed by id)
//! - Content ordering (e.g. a sequence's `elements`) is authoring order,
//!   never traversal order
//!
//! ## Cycles and Sharing
//!
//! A node's id is registered *before* its content is computed. A reference
//! back to a still-unresolved node receives that pre-registered id, which is
//! what lets self-referential graphs assemble without special casing and
//! without non-termination.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod canonical;
pub mod gridspec;
pub mod ident;
pub mod kinds;
pub mod types;

// Re-exports
pub use assembler::{assemble, AssemblyError};
pub use canonical::{canonical_hash, canonical_hash_hex, to_canonical_bytes};
pub use gridspec::{parse_grid_spec, CellBounds, GridSpecError};
pub use ident::{FragmentId, ROOT_FRAGMENT_ID};
pub use kinds::{
    Color, Dag, DagError, DagNodeConfig, DagPort, Emphasis, Flow, FlowDirection, Grid, Icon, Image,
    KeyValue, Orientation, PortSide, Sequence, SizingMode, Switch, Text, TextVariant, Token,
};
pub use types::{Fragment, Node, View};

/// Version of the emitted view data contract.
/// Increment on breaking changes to the fragment wire format.
pub const VIEW_SCHEMA_VERSION: &str = "1.0.0";

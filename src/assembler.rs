//! Graph walker: flattens a node graph into a fragment table.
//!
//! ## Algorithm
//!
//! 1. Assign the reserved root id to the entry node and seed the worklist
//! 2. Pop a node; if its fragment is already resolved, skip (dedup rule)
//! 3. Invoke the node's kind with a [`ChildIds`] resolver; the kind
//!    returns a content template (child references already rewritten into
//!    ids) plus the list of referenced child instances
//! 4. Store the resolved fragment and push the returned children
//! 5. When the worklist drains, assert no registered id is still pending
//!
//! ## Cycles and Sharing
//!
//! [`ChildIds::get`] registers an id for a node *before* that node's
//! content is ever computed. A reference back to a still-unresolved node
//! (a cycle, direct or transitive) simply receives the pre-registered id;
//! no new work is scheduled for an identity that has already been seen.
//! Termination follows: every `get` either returns an existing id or
//! registers exactly one new pending entry, and a finite graph has
//! finitely many identities.
//!
//! ## Concurrency
//!
//! Single-threaded and purely synchronous. All state is run-scoped; nodes
//! are only ever read.

use std::collections::{BTreeMap, HashMap};

use crate::gridspec::GridSpecError;
use crate::ident::FragmentId;
use crate::kinds::DagError;
use crate::types::fragment::{Fragment, View};
use crate::types::node::{Node, NodeKey};

/// Error aborting an assembly run.
///
/// All variants are authoring errors, not transient failures: nothing is
/// retried, and no partial table is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// A switch mode was declared but never given an item.
    #[error("switch mode '{mode}' has no associated item")]
    MissingSwitchItem {
        /// The offending mode name.
        mode: String,
    },
    /// A grid cell was declared but never given an item.
    #[error("grid cell '{cell}' has no associated item")]
    MissingGridCell {
        /// The offending cell name.
        cell: String,
    },
    /// A dag node was declared but never given an item.
    #[error("dag node '{node}' has no associated item")]
    MissingDagItem {
        /// The offending node name.
        node: String,
    },
    /// A grid's ASCII cell specification is malformed.
    #[error("malformed grid specification: {0}")]
    GridSpec(#[from] GridSpecError),
    /// A dag declaration failed structural validation.
    #[error("invalid dag structure: {0}")]
    Dag(#[from] DagError),
    /// Assembly completed with a fragment still pending: a kind registered
    /// a child id it never returned as a referenced child.
    #[error("fragment {0} was assigned an id but never resolved")]
    UnresolvedFragment(FragmentId),
}

enum FragmentSlot {
    Pending,
    Resolved(Fragment),
}

/// Child-id resolver handed to each kind's assembly operation.
///
/// The linchpin for cycles and sharing: ids are registered before content
/// is computed, and a known identity always returns its existing id.
pub(crate) struct ChildIds<'a> {
    parent_id: &'a FragmentId,
    assigned: &'a mut HashMap<NodeKey, FragmentId>,
    pinned: &'a mut Vec<Node>,
    fragments: &'a mut BTreeMap<FragmentId, FragmentSlot>,
}

impl ChildIds<'_> {
    /// Id for `child` when referenced under `slot` by the current parent.
    ///
    /// Returns the existing id if this instance has been seen on any path;
    /// otherwise mints a fresh id from (slot, parent id), registers it as
    /// pending, and pins the instance so its identity stays valid for the
    /// rest of the run.
    pub(crate) fn get(&mut self, child: &Node, slot: &str) -> FragmentId {
        if let Some(id) = self.assigned.get(&child.key()) {
            return id.clone();
        }
        let id = FragmentId::derive(slot, self.parent_id);
        tracing::trace!(id = %id, slot, parent = %self.parent_id, "assigned fragment id");
        self.assigned.insert(child.key(), id.clone());
        self.fragments.insert(id.clone(), FragmentSlot::Pending);
        self.pinned.push(child.clone());
        id
    }
}

/// Flatten the graph reachable from `root` into a [`View`].
///
/// Each distinct node instance resolves to exactly one fragment no matter
/// how many paths reach it; the returned table satisfies the closure
/// property. Assembling the same graph twice yields byte-identical output.
pub fn assemble(root: impl Into<Node>) -> Result<View, AssemblyError> {
    let root = root.into();
    let root_id = FragmentId::root();
    tracing::debug!(kind = root.kind_tag(), "assembly started");

    let mut assigned: HashMap<NodeKey, FragmentId> = HashMap::new();
    let mut pinned: Vec<Node> = Vec::new();
    let mut fragments: BTreeMap<FragmentId, FragmentSlot> = BTreeMap::new();
    let mut worklist: Vec<Node> = Vec::new();

    assigned.insert(root.key(), root_id.clone());
    fragments.insert(root_id.clone(), FragmentSlot::Pending);
    pinned.push(root.clone());
    worklist.push(root);

    while let Some(node) = worklist.pop() {
        let id = assigned
            .get(&node.key())
            .cloned()
            .expect("worklist nodes are assigned an id before being scheduled");
        if matches!(fragments.get(&id), Some(FragmentSlot::Resolved(_))) {
            continue;
        }

        let (contents, children, tag) = {
            let mut ids = ChildIds {
                parent_id: &id,
                assigned: &mut assigned,
                pinned: &mut pinned,
                fragments: &mut fragments,
            };
            node.with_kind(|kind| {
                kind.assemble(&mut ids)
                    .map(|(contents, children)| (contents, children, kind.tag()))
            })?
        };
        tracing::trace!(id = %id, kind = tag, children = children.len(), "resolved fragment");

        fragments.insert(
            id,
            FragmentSlot::Resolved(Fragment::new(tag, contents, node.meta_snapshot())),
        );
        worklist.extend(children);
    }

    let mut table = BTreeMap::new();
    for (id, slot) in fragments {
        match slot {
            FragmentSlot::Resolved(fragment) => {
                table.insert(id, fragment);
            }
            // A pending entry here means a kind registered a child id it
            // never returned as a referenced child.
            FragmentSlot::Pending => return Err(AssemblyError::UnresolvedFragment(id)),
        }
    }
    tracing::debug!(fragments = table.len(), "assembly finished");

    Ok(View {
        root_id,
        fragments: table,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::{NodeKind, Sequence, Text};

    #[test]
    fn test_two_text_sequence() {
        let seq = Sequence::new();
        seq.push(Text::new("hello")).push(Text::new("there"));
        let view = assemble(&seq).unwrap();

        assert_eq!(view.len(), 3);
        let id0 = FragmentId::derive("0", &view.root_id);
        let id1 = FragmentId::derive("1", &view.root_id);
        assert_eq!(view.root().fragment_type, "SequenceLayout");
        assert_eq!(
            view.root().contents["elements"],
            serde_json::json!([id0.as_str(), id1.as_str()])
        );
        assert_eq!(view.get(&id0).unwrap().contents["text"], "hello");
        assert_eq!(view.get(&id1).unwrap().contents["text"], "there");
    }

    #[test]
    fn test_shared_instance_emitted_once() {
        let shared = Text::new("hello");
        let seq = Sequence::new();
        seq.push(&shared).push(&shared);
        let view = assemble(&seq).unwrap();

        assert_eq!(view.len(), 2);
        let elements = view.root().contents["elements"].as_array().unwrap();
        assert_eq!(elements[0], elements[1]);
    }

    #[test]
    fn test_self_reference_terminates() {
        let seq = Sequence::new();
        seq.push(Text::new("before")).push(&seq);
        let view = assemble(&seq).unwrap();

        assert_eq!(view.len(), 2);
        let elements = view.root().contents["elements"].as_array().unwrap();
        assert_eq!(elements[1], view.root_id.as_str());
    }

    #[test]
    fn test_mutual_cycle_terminates() {
        let a = Sequence::new();
        let b = Sequence::new();
        a.push(&b);
        b.push(&a);
        let view = assemble(&a).unwrap();

        assert_eq!(view.len(), 2);
        assert!(view.dangling_references().is_empty());
    }

    #[test]
    fn test_equal_value_distinct_instances() {
        let seq = Sequence::new();
        seq.push(Text::new("hello")).push(Text::new("hello"));
        let view = assemble(&seq).unwrap();

        assert_eq!(view.len(), 3);
        let elements = view.root().contents["elements"].as_array().unwrap();
        assert_ne!(elements[0], elements[1]);
    }

    #[test]
    fn test_meta_carried_verbatim() {
        let text = Text::new("x");
        text.meta("origin", serde_json::json!({"line": 12}));
        let view = assemble(text.into_node()).unwrap();

        assert_eq!(view.root().meta["origin"]["line"], 12);
    }

    #[test]
    fn test_unresolved_fragment_detected() {
        let node = Node::from_kind(NodeKind::Orphaning(Text::new("lost").into_node()));
        let err = assemble(node).unwrap_err();
        match err {
            AssemblyError::UnresolvedFragment(id) => {
                assert_eq!(id, FragmentId::derive("orphan", &FragmentId::root()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_leaf_root() {
        let view = assemble(Text::new("alone").into_node()).unwrap();
        assert_eq!(view.len(), 1);
        assert!(view.root_id.is_root());
    }
}

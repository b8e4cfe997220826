//! Wire types emitted by the assembler.
//!
//! A [`View`] is the complete output of one assembly run: a root id plus a
//! flat table of [`Fragment`]s. Every id referenced inside any fragment's
//! contents is a key of the table (closure property), and the table is a
//! `BTreeMap` so serialization order is canonical.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canonical::canonical_hash_hex;
use crate::ident::{looks_like_fragment_id, FragmentId};

/// One flattened record describing a single node's kind, content, and
/// annotations.
///
/// `contents` is kind-specific; any entry referencing another node holds
/// that node's [`FragmentId`], never the node itself. Optional fields with
/// no value are omitted, never emitted as `null`. `meta` is an opaque
/// annotation bag attached by the authoring API and carried through
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Kind tag, e.g. `TextPrimitive` or `SequenceLayout`.
    #[serde(rename = "type")]
    pub fragment_type: String,
    /// Kind-specific content fields.
    pub contents: Map<String, Value>,
    /// Opaque annotations, never interpreted by the kernel.
    pub meta: Map<String, Value>,
}

impl Fragment {
    pub(crate) fn new(tag: &str, contents: Map<String, Value>, meta: Map<String, Value>) -> Self {
        Self {
            fragment_type: tag.to_string(),
            contents,
            meta,
        }
    }
}

/// The complete output of one assembly run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// Id of the fragment the traversal started from.
    #[serde(rename = "rootId")]
    pub root_id: FragmentId,
    /// Flat table of all emitted fragments, canonically ordered by id.
    pub fragments: BTreeMap<FragmentId, Fragment>,
}

impl View {
    /// The root fragment.
    pub fn root(&self) -> &Fragment {
        self.fragments
            .get(&self.root_id)
            .expect("a view always contains its root fragment")
    }

    /// Look up a fragment by id.
    pub fn get(&self, id: &FragmentId) -> Option<&Fragment> {
        self.fragments.get(id)
    }

    /// Number of fragments in the table.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Whether the table is empty. Never true for an assembled view.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Canonical fingerprint of the whole view.
    ///
    /// Byte-identical views have identical fingerprints, so this is the
    /// primitive for snapshot-style determinism tests.
    pub fn fingerprint(&self) -> String {
        canonical_hash_hex(self)
    }

    /// Ids referenced from fragment contents that are not keys of the
    /// table. Always empty for an assembled view; exposed so consumers and
    /// tests can audit the closure property.
    pub fn dangling_references(&self) -> Vec<FragmentId> {
        fn collect<'a>(value: &'a Value, out: &mut BTreeSet<&'a str>) {
            match value {
                Value::String(s) if looks_like_fragment_id(s) => {
                    out.insert(s);
                }
                Value::Array(items) => {
                    for item in items {
                        collect(item, out);
                    }
                }
                Value::Object(map) => {
                    for item in map.values() {
                        collect(item, out);
                    }
                }
                _ => {}
            }
        }

        let mut referenced: BTreeSet<&str> = BTreeSet::new();
        for fragment in self.fragments.values() {
            for value in fragment.contents.values() {
                collect(value, &mut referenced);
            }
        }
        referenced
            .into_iter()
            .filter(|id| !self.fragments.contains_key(*id))
            .map(|id| FragmentId::from_raw(id.to_string()))
            .collect()
    }
}

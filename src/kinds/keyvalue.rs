//! Key-value composite: an ordered list of pairs.
//!
//! Keys and values are each independently resolved child references, so a
//! key may itself be a composite node. The emitted `entries` field is an
//! ordered array of `{key, value}` id pairs, not a map, precisely to
//! tolerate composite, non-scalar keys.

use serde_json::{json, Map, Value};

use crate::assembler::ChildIds;
use crate::kinds::{node_handle_impls, put_opt, NodeKind};
use crate::types::node::Node;

#[derive(Default)]
pub(crate) struct KeyValueSpec {
    entries: Vec<(Node, Node)>,
    separator: Option<String>,
    start_motif: Option<String>,
    end_motif: Option<String>,
}

impl KeyValueSpec {
    pub(crate) fn assemble(&self, ids: &mut ChildIds<'_>) -> (Map<String, Value>, Vec<Node>) {
        let mut entry_values: Vec<Value> = Vec::with_capacity(self.entries.len());
        let mut children: Vec<Node> = Vec::with_capacity(self.entries.len() * 2);
        for (index, (key, value)) in self.entries.iter().enumerate() {
            let key_id = ids.get(key, &format!("{index}k"));
            let value_id = ids.get(value, &format!("{index}v"));
            entry_values.push(json!({ "key": key_id, "value": value_id }));
            children.push(key.clone());
            children.push(value.clone());
        }

        let mut contents = Map::new();
        contents.insert("entries".to_string(), Value::Array(entry_values));
        put_opt(&mut contents, "separator", &self.separator);
        put_opt(&mut contents, "startMotif", &self.start_motif);
        put_opt(&mut contents, "endMotif", &self.end_motif);
        (contents, children)
    }
}

/// Ordered list of key-value pairs.
#[derive(Clone)]
pub struct KeyValue(Node);

impl KeyValue {
    /// Create an empty key-value composite.
    pub fn new() -> Self {
        Self(Node::from_kind(NodeKind::KeyValue(KeyValueSpec::default())))
    }

    /// Append a pair. Entry order is authoring order.
    pub fn pair(&self, key: impl Into<Node>, value: impl Into<Node>) -> &Self {
        let key = key.into();
        let value = value.into();
        self.spec(|spec| spec.entries.push((key, value)));
        self
    }

    /// Set the motif rendered between each key and its value.
    pub fn separator(&self, separator: impl Into<String>) -> &Self {
        let separator = separator.into();
        self.spec(|spec| spec.separator = Some(separator));
        self
    }

    /// Set the motif rendered before the first entry.
    pub fn start_motif(&self, motif: impl Into<String>) -> &Self {
        let motif = motif.into();
        self.spec(|spec| spec.start_motif = Some(motif));
        self
    }

    /// Set the motif rendered after the last entry.
    pub fn end_motif(&self, motif: impl Into<String>) -> &Self {
        let motif = motif.into();
        self.spec(|spec| spec.end_motif = Some(motif));
        self
    }

    fn spec<R>(&self, f: impl FnOnce(&mut KeyValueSpec) -> R) -> R {
        self.0.with_kind_mut(|kind| match kind {
            NodeKind::KeyValue(spec) => f(spec),
            _ => unreachable!("key-value handle wraps a key-value node"),
        })
    }
}

impl Default for KeyValue {
    fn default() -> Self {
        Self::new()
    }
}

node_handle_impls!(KeyValue);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::ident::FragmentId;
    use crate::kinds::{Sequence, Text};

    #[test]
    fn test_entries_ordered_pairs() {
        let kv = KeyValue::new();
        kv.pair(Text::new("a"), Text::new("1"))
            .pair(Text::new("b"), Text::new("2"))
            .separator(":");
        let view = assemble(&kv).unwrap();

        let entries = view.root().contents["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        let root = FragmentId::root();
        assert_eq!(entries[0]["key"], FragmentId::derive("0k", &root).as_str());
        assert_eq!(entries[0]["value"], FragmentId::derive("0v", &root).as_str());
        assert_eq!(entries[1]["key"], FragmentId::derive("1k", &root).as_str());
        assert_eq!(view.root().contents["separator"], ":");
    }

    #[test]
    fn test_composite_key() {
        let key = Sequence::new();
        key.push(Text::new("tuple")).push(Text::new("key"));
        let kv = KeyValue::new();
        kv.pair(&key, Text::new("value"));
        let view = assemble(&kv).unwrap();

        let entries = view.root().contents["entries"].as_array().unwrap();
        let key_id = FragmentId::derive("0k", &FragmentId::root());
        assert_eq!(entries[0]["key"], key_id.as_str());
        assert_eq!(
            view.get(&key_id).unwrap().fragment_type,
            "SequenceLayout"
        );
        // 1 root + 1 composite key + 2 key elements + 1 value
        assert_eq!(view.len(), 5);
    }
}

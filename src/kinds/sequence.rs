//! Ordered element composites: sequences and flows.
//!
//! Elements keep authoring order in the emitted `elements` array;
//! duplicates are allowed and preserved positionally. Child slots are the
//! decimal element indexes, so the first element of the root always gets
//! the id derived from `("0", root)`.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::assembler::ChildIds;
use crate::ident::FragmentId;
use crate::kinds::{node_handle_impls, put, put_opt, NodeKind};
use crate::types::node::Node;

/// Layout direction for a [`Sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Elements flow left to right.
    Horizontal,
    /// Elements flow top to bottom.
    Vertical,
}

#[derive(Default)]
pub(crate) struct SequenceSpec {
    elements: Vec<Node>,
    orientation: Option<Orientation>,
    start_motif: Option<String>,
    end_motif: Option<String>,
}

impl SequenceSpec {
    pub(crate) fn assemble(&self, ids: &mut ChildIds<'_>) -> (Map<String, Value>, Vec<Node>) {
        let element_ids: Vec<FragmentId> = self
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| ids.get(element, &index.to_string()))
            .collect();

        let mut contents = Map::new();
        put(&mut contents, "elements", &element_ids);
        put_opt(&mut contents, "orientation", &self.orientation);
        put_opt(&mut contents, "startMotif", &self.start_motif);
        put_opt(&mut contents, "endMotif", &self.end_motif);
        (contents, self.elements.clone())
    }
}

/// Ordered run of child nodes with optional bracketing motifs.
#[derive(Clone)]
pub struct Sequence(Node);

impl Sequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self(Node::from_kind(NodeKind::Sequence(SequenceSpec::default())))
    }

    /// Append an element. Duplicates are allowed and keep their position;
    /// pushing the sequence into itself is a legal cycle.
    pub fn push(&self, element: impl Into<Node>) -> &Self {
        let element = element.into();
        self.spec(|spec| spec.elements.push(element));
        self
    }

    /// Set the layout direction.
    pub fn orientation(&self, orientation: Orientation) -> &Self {
        self.spec(|spec| spec.orientation = Some(orientation));
        self
    }

    /// Set the motif rendered before the first element.
    pub fn start_motif(&self, motif: impl Into<String>) -> &Self {
        let motif = motif.into();
        self.spec(|spec| spec.start_motif = Some(motif));
        self
    }

    /// Set the motif rendered after the last element.
    pub fn end_motif(&self, motif: impl Into<String>) -> &Self {
        let motif = motif.into();
        self.spec(|spec| spec.end_motif = Some(motif));
        self
    }

    fn spec<R>(&self, f: impl FnOnce(&mut SequenceSpec) -> R) -> R {
        self.0.with_kind_mut(|kind| match kind {
            NodeKind::Sequence(spec) => f(spec),
            _ => unreachable!("sequence handle wraps a sequence node"),
        })
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

node_handle_impls!(Sequence);

#[derive(Default)]
pub(crate) struct FlowSpec {
    elements: Vec<Node>,
}

impl FlowSpec {
    pub(crate) fn assemble(&self, ids: &mut ChildIds<'_>) -> (Map<String, Value>, Vec<Node>) {
        let element_ids: Vec<FragmentId> = self
            .elements
            .iter()
            .enumerate()
            .map(|(index, element)| ids.get(element, &index.to_string()))
            .collect();

        let mut contents = Map::new();
        put(&mut contents, "elements", &element_ids);
        (contents, self.elements.clone())
    }
}

/// Inline run of child nodes that wraps like text.
#[derive(Clone)]
pub struct Flow(Node);

impl Flow {
    /// Create an empty flow.
    pub fn new() -> Self {
        Self(Node::from_kind(NodeKind::Flow(FlowSpec::default())))
    }

    /// Append an element.
    pub fn push(&self, element: impl Into<Node>) -> &Self {
        let element = element.into();
        self.spec(|spec| spec.elements.push(element));
        self
    }

    fn spec<R>(&self, f: impl FnOnce(&mut FlowSpec) -> R) -> R {
        self.0.with_kind_mut(|kind| match kind {
            NodeKind::Flow(spec) => f(spec),
            _ => unreachable!("flow handle wraps a flow node"),
        })
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::new()
    }
}

node_handle_impls!(Flow);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::kinds::Text;

    #[test]
    fn test_elements_keep_authoring_order() {
        let seq = Sequence::new();
        seq.push(Text::new("b")).push(Text::new("a"));
        let view = assemble(&seq).unwrap();

        let elements = view.root().contents["elements"].as_array().unwrap();
        assert_eq!(elements.len(), 2);
        let first = FragmentId::derive("0", &FragmentId::root());
        assert_eq!(elements[0], first.as_str());
        assert_eq!(view.get(&first).unwrap().contents["text"], "b");
    }

    #[test]
    fn test_duplicates_preserved_positionally() {
        let shared = Text::new("x");
        let seq = Sequence::new();
        seq.push(&shared).push(Text::new("y")).push(&shared);
        let view = assemble(&seq).unwrap();

        let elements = view.root().contents["elements"].as_array().unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0], elements[2]);
        assert_ne!(elements[0], elements[1]);
    }

    #[test]
    fn test_motifs_and_orientation_emitted() {
        let seq = Sequence::new();
        seq.start_motif("[")
            .end_motif("]")
            .orientation(Orientation::Vertical);
        let view = assemble(&seq).unwrap();

        let contents = &view.root().contents;
        assert_eq!(contents["startMotif"], "[");
        assert_eq!(contents["endMotif"], "]");
        assert_eq!(contents["orientation"], "vertical");
    }

    #[test]
    fn test_flow_has_no_optional_fields() {
        let flow = Flow::new();
        flow.push(Text::new("a"));
        let view = assemble(&flow).unwrap();

        let root = view.root();
        assert_eq!(root.fragment_type, "FlowLayout");
        assert_eq!(root.contents.len(), 1);
        assert!(root.contents.contains_key("elements"));
    }
}

//! Author-facing node handles.
//!
//! A [`Node`] is a shared, untyped reference to one visualization-model
//! node. Cloning a `Node` (or a kind handle such as
//! [`Sequence`](crate::kinds::Sequence)) aliases the same underlying
//! instance; it never copies it. *Identity*, not value equality, is what
//! the assembler deduplicates on: two separate `Text` nodes holding the
//! same string are two fragments, one `Text` node pushed twice is one.
//!
//! Interior mutability is deliberate: it is what lets an author close a
//! cycle after construction (push a sequence into itself, point a dag edge
//! back at an ancestor). The assembler itself only ever reads.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::kinds::NodeKind;

/// Shared reference to one node instance in the authored graph.
pub struct Node {
    cell: Rc<NodeCell>,
}

struct NodeCell {
    kind: RefCell<NodeKind>,
    meta: RefCell<Map<String, Value>>,
}

/// Identity-map key: the address of the shared cell.
///
/// Stable for as long as any clone of the `Node` is alive; the assembler
/// pins every first-seen instance for the duration of a run so keys cannot
/// be invalidated by address reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeKey(usize);

impl Node {
    pub(crate) fn from_kind(kind: NodeKind) -> Self {
        Self {
            cell: Rc::new(NodeCell {
                kind: RefCell::new(kind),
                meta: RefCell::new(Map::new()),
            }),
        }
    }

    pub(crate) fn key(&self) -> NodeKey {
        NodeKey(Rc::as_ptr(&self.cell) as usize)
    }

    /// Whether two handles alias the same underlying node instance.
    pub fn same_instance(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// Wire kind tag of this node, e.g. `SequenceLayout`.
    pub fn kind_tag(&self) -> &'static str {
        self.with_kind(|kind| kind.tag())
    }

    pub(crate) fn with_kind<R>(&self, f: impl FnOnce(&NodeKind) -> R) -> R {
        f(&self.cell.kind.borrow())
    }

    pub(crate) fn with_kind_mut<R>(&self, f: impl FnOnce(&mut NodeKind) -> R) -> R {
        f(&mut self.cell.kind.borrow_mut())
    }

    pub(crate) fn set_meta(&self, key: String, value: Value) {
        self.cell.meta.borrow_mut().insert(key, value);
    }

    pub(crate) fn meta_snapshot(&self) -> Map<String, Value> {
        self.cell.meta.borrow().clone()
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        Self {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({} @ {:p})", self.kind_tag(), Rc::as_ptr(&self.cell))
    }
}

impl From<&Node> for Node {
    fn from(node: &Node) -> Self {
        node.clone()
    }
}

#[cfg(test)]
mod tests {
    use crate::kinds::Text;

    #[test]
    fn test_clone_aliases() {
        let a = Text::new("x").as_node();
        let b = a.clone();
        assert!(a.same_instance(&b));
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_equal_value_distinct_identity() {
        let a = Text::new("x").as_node();
        let b = Text::new("x").as_node();
        assert!(!a.same_instance(&b));
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn test_kind_tag() {
        assert_eq!(Text::new("x").as_node().kind_tag(), "TextPrimitive");
    }
}

//! Switch composite: one child per named mode.
//!
//! Modes keep declaration order; the emitted `modes` array holds the child
//! id resolved for each mode, in that order. A declared mode with no
//! associated item aborts assembly naming the mode.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::assembler::{AssemblyError, ChildIds};
use crate::ident::FragmentId;
use crate::kinds::{node_handle_impls, put, NodeKind};
use crate::types::node::Node;

#[derive(Default)]
pub(crate) struct SwitchSpec {
    modes: Vec<String>,
    items: BTreeMap<String, Node>,
}

impl SwitchSpec {
    pub(crate) fn assemble(
        &self,
        ids: &mut ChildIds<'_>,
    ) -> Result<(Map<String, Value>, Vec<Node>), AssemblyError> {
        let mut mode_ids: Vec<FragmentId> = Vec::with_capacity(self.modes.len());
        let mut children: Vec<Node> = Vec::with_capacity(self.modes.len());
        for mode in &self.modes {
            let item = self
                .items
                .get(mode)
                .ok_or_else(|| AssemblyError::MissingSwitchItem { mode: mode.clone() })?;
            mode_ids.push(ids.get(item, mode));
            children.push(item.clone());
        }

        let mut contents = Map::new();
        put(&mut contents, "modes", &mode_ids);
        Ok((contents, children))
    }
}

/// Composite showing exactly one of several named modes at a time.
#[derive(Clone)]
pub struct Switch(Node);

impl Switch {
    /// Create a switch with no modes.
    pub fn new() -> Self {
        Self(Node::from_kind(NodeKind::Switch(SwitchSpec::default())))
    }

    /// Declare a mode. Declaration order is the emitted mode order; a mode
    /// left without an item fails assembly.
    pub fn mode(&self, name: impl Into<String>) -> &Self {
        let name = name.into();
        self.spec(|spec| {
            if !spec.modes.contains(&name) {
                spec.modes.push(name);
            }
        });
        self
    }

    /// Associate an item with a mode, declaring the mode if needed.
    pub fn item(&self, mode: impl Into<String>, item: impl Into<Node>) -> &Self {
        let mode = mode.into();
        let item = item.into();
        self.spec(|spec| {
            if !spec.modes.contains(&mode) {
                spec.modes.push(mode.clone());
            }
            spec.items.insert(mode, item);
        });
        self
    }

    fn spec<R>(&self, f: impl FnOnce(&mut SwitchSpec) -> R) -> R {
        self.0.with_kind_mut(|kind| match kind {
            NodeKind::Switch(spec) => f(spec),
            _ => unreachable!("switch handle wraps a switch node"),
        })
    }
}

impl Default for Switch {
    fn default() -> Self {
        Self::new()
    }
}

node_handle_impls!(Switch);

//! Dag composite: nodes, ports, edges, and alignment groups.
//!
//! Declaration and item attachment are separate operations, so a node that
//! is declared but never given content is a reportable authoring error.
//! Structural validation runs before emission: parents, edge endpoints,
//! edge ports, and alignment members must all name declared entities.
//! Node `children` are derived from `parent` declarations at emission, so
//! the two can never disagree.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::assembler::{AssemblyError, ChildIds};
use crate::kinds::{node_handle_impls, put, put_opt, NodeKind};
use crate::types::node::Node;

/// Direction child nodes flow away from their parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowDirection {
    /// Children above.
    North,
    /// Children below.
    South,
    /// Children to the right.
    East,
    /// Children to the left.
    West,
}

/// Side of a node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSide {
    /// Top edge.
    North,
    /// Bottom edge.
    South,
    /// Right edge.
    East,
    /// Left edge.
    West,
}

/// Declaration of one connection port on a dag node.
#[derive(Debug, Clone)]
pub struct DagPort {
    /// Port name, unique per node.
    pub name: String,
    /// Side of the node the port sits on.
    pub side: Option<PortSide>,
    /// Ordering among ports on the same side.
    pub order: Option<i64>,
}

impl DagPort {
    /// Declare a port with no placement constraints.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            side: None,
            order: None,
        }
    }

    /// Pin the port to a side.
    pub fn side(mut self, side: PortSide) -> Self {
        self.side = Some(side);
        self
    }

    /// Order the port among its side's ports.
    pub fn order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }
}

/// Optional per-node configuration, with defaultable fields.
#[derive(Debug, Clone, Default)]
pub struct DagNodeConfig {
    /// Name of the containing parent node, if nested.
    pub parent: Option<String>,
    /// Flow direction for this node's children.
    pub flow_direction: Option<FlowDirection>,
    /// Whether the node starts expanded.
    pub is_expanded: Option<bool>,
    /// Whether the node is rendered at all.
    pub is_visible: Option<bool>,
    /// Connection ports declared on this node.
    pub ports: Vec<DagPort>,
}

struct DagNodeDecl {
    name: String,
    config: DagNodeConfig,
}

struct DagEdgeDecl {
    source: String,
    target: String,
    source_port: Option<String>,
    target_port: Option<String>,
}

/// Referential-integrity violation in a dag declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DagError {
    /// A node name was declared twice.
    #[error("dag node '{node}' is declared more than once")]
    DuplicateNode {
        /// The duplicated name.
        node: String,
    },
    /// A node's parent names an undeclared node.
    #[error("dag node '{node}' names undeclared parent '{parent}'")]
    UnknownParent {
        /// The declaring node.
        node: String,
        /// The missing parent name.
        parent: String,
    },
    /// An edge endpoint names an undeclared node.
    #[error("dag edge {edge} references undeclared node '{node}'")]
    UnknownEndpoint {
        /// Index of the offending edge, in declaration order.
        edge: usize,
        /// The missing node name.
        node: String,
    },
    /// An edge names a port not declared on its endpoint node.
    #[error("dag edge {edge} names port '{port}' which is not declared on node '{node}'")]
    UnknownPort {
        /// Index of the offending edge, in declaration order.
        edge: usize,
        /// The endpoint node.
        node: String,
        /// The missing port name.
        port: String,
    },
    /// An alignment group names an undeclared node.
    #[error("dag alignment group {group} references undeclared node '{node}'")]
    UnknownAlignmentNode {
        /// Index of the offending group, in declaration order.
        group: usize,
        /// The missing node name.
        node: String,
    },
}

#[derive(Default)]
pub(crate) struct DagLayoutSpec {
    nodes: Vec<DagNodeDecl>,
    items: BTreeMap<String, Node>,
    edges: Vec<DagEdgeDecl>,
    alignments: Vec<Vec<String>>,
    flow_direction: Option<FlowDirection>,
}

impl DagLayoutSpec {
    fn validate(&self) -> Result<(), DagError> {
        let mut declared: HashMap<&str, &DagNodeDecl> = HashMap::new();
        for node in &self.nodes {
            if declared.insert(&node.name, node).is_some() {
                return Err(DagError::DuplicateNode {
                    node: node.name.clone(),
                });
            }
        }

        for node in &self.nodes {
            if let Some(parent) = &node.config.parent {
                if !declared.contains_key(parent.as_str()) {
                    return Err(DagError::UnknownParent {
                        node: node.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        for (index, edge) in self.edges.iter().enumerate() {
            let endpoints = [
                (&edge.source, &edge.source_port),
                (&edge.target, &edge.target_port),
            ];
            for (endpoint, port) in endpoints {
                let Some(decl) = declared.get(endpoint.as_str()) else {
                    return Err(DagError::UnknownEndpoint {
                        edge: index,
                        node: endpoint.clone(),
                    });
                };
                if let Some(port) = port {
                    if !decl.config.ports.iter().any(|p| p.name == *port) {
                        return Err(DagError::UnknownPort {
                            edge: index,
                            node: endpoint.clone(),
                            port: port.clone(),
                        });
                    }
                }
            }
        }

        for (index, group) in self.alignments.iter().enumerate() {
            for member in group {
                if !declared.contains_key(member.as_str()) {
                    return Err(DagError::UnknownAlignmentNode {
                        group: index,
                        node: member.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub(crate) fn assemble(
        &self,
        ids: &mut ChildIds<'_>,
    ) -> Result<(Map<String, Value>, Vec<Node>), AssemblyError> {
        self.validate()?;

        // Children derive from parent declarations, in declaration order.
        let mut children_of: HashMap<&str, Vec<&str>> = HashMap::new();
        for node in &self.nodes {
            if let Some(parent) = &node.config.parent {
                children_of.entry(parent).or_default().push(&node.name);
            }
        }

        let mut node_map = Map::new();
        let mut referenced: Vec<Node> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let item = self.items.get(&node.name).ok_or_else(|| {
                AssemblyError::MissingDagItem {
                    node: node.name.clone(),
                }
            })?;
            let id = ids.get(item, &node.name);

            let mut entry = Map::new();
            put(&mut entry, "fragmentId", &id);
            put_opt(&mut entry, "parent", &node.config.parent);
            if let Some(children) = children_of.get(node.name.as_str()) {
                put(&mut entry, "children", children);
            }
            put_opt(&mut entry, "flowDirection", &node.config.flow_direction);
            put_opt(&mut entry, "isExpanded", &node.config.is_expanded);
            put_opt(&mut entry, "isVisible", &node.config.is_visible);
            if !node.config.ports.is_empty() {
                let mut ports = Map::new();
                for port in &node.config.ports {
                    let mut port_entry = Map::new();
                    put_opt(&mut port_entry, "side", &port.side);
                    put_opt(&mut port_entry, "order", &port.order);
                    ports.insert(port.name.clone(), Value::Object(port_entry));
                }
                entry.insert("ports".to_string(), Value::Object(ports));
            }
            node_map.insert(node.name.clone(), Value::Object(entry));
            referenced.push(item.clone());
        }

        let edges: Vec<Value> = self
            .edges
            .iter()
            .map(|edge| {
                let mut entry = Map::new();
                put(&mut entry, "source", &edge.source);
                put(&mut entry, "target", &edge.target);
                put_opt(&mut entry, "sourcePort", &edge.source_port);
                put_opt(&mut entry, "targetPort", &edge.target_port);
                Value::Object(entry)
            })
            .collect();

        let mut contents = Map::new();
        contents.insert("nodes".to_string(), Value::Object(node_map));
        contents.insert("edges".to_string(), Value::Array(edges));
        if !self.alignments.is_empty() {
            put(&mut contents, "alignments", &self.alignments);
        }
        put_opt(&mut contents, "flowDirection", &self.flow_direction);
        Ok((contents, referenced))
    }
}

/// Composite rendering a directed acyclic graph of named nodes.
#[derive(Clone)]
pub struct Dag(Node);

impl Dag {
    /// Create a dag with no nodes.
    pub fn new() -> Self {
        Self(Node::from_kind(NodeKind::Dag(DagLayoutSpec::default())))
    }

    /// Declare a node with default configuration. The node still needs an
    /// item attached via [`Dag::item`] before assembly.
    pub fn node(&self, name: impl Into<String>) -> &Self {
        self.node_with(name, DagNodeConfig::default())
    }

    /// Declare a node with explicit configuration.
    pub fn node_with(&self, name: impl Into<String>, config: DagNodeConfig) -> &Self {
        let name = name.into();
        self.spec(|spec| spec.nodes.push(DagNodeDecl { name, config }));
        self
    }

    /// Attach the content item for a declared node.
    pub fn item(&self, node: impl Into<String>, item: impl Into<Node>) -> &Self {
        let node = node.into();
        let item = item.into();
        self.spec(|spec| spec.items.insert(node, item));
        self
    }

    /// Declare an edge between two nodes.
    pub fn edge(&self, source: impl Into<String>, target: impl Into<String>) -> &Self {
        self.edge_with_ports(source, None, target, None)
    }

    /// Declare an edge whose endpoints attach to named ports.
    pub fn edge_with_ports(
        &self,
        source: impl Into<String>,
        source_port: Option<&str>,
        target: impl Into<String>,
        target_port: Option<&str>,
    ) -> &Self {
        let edge = DagEdgeDecl {
            source: source.into(),
            target: target.into(),
            source_port: source_port.map(str::to_string),
            target_port: target_port.map(str::to_string),
        };
        self.spec(|spec| spec.edges.push(edge));
        self
    }

    /// Constrain a group of nodes to render aligned.
    pub fn align<I, S>(&self, nodes: I) -> &Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let group: Vec<String> = nodes.into_iter().map(Into::into).collect();
        self.spec(|spec| spec.alignments.push(group));
        self
    }

    /// Set the dag-level flow direction.
    pub fn flow_direction(&self, direction: FlowDirection) -> &Self {
        self.spec(|spec| spec.flow_direction = Some(direction));
        self
    }

    fn spec<R>(&self, f: impl FnOnce(&mut DagLayoutSpec) -> R) -> R {
        self.0.with_kind_mut(|kind| match kind {
            NodeKind::Dag(spec) => f(spec),
            _ => unreachable!("dag handle wraps a dag node"),
        })
    }
}

impl Default for Dag {
    fn default() -> Self {
        Self::new()
    }
}

node_handle_impls!(Dag);

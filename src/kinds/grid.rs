//! Grid composite: named rectangular cells.
//!
//! Cell geometry comes from an explicit `(row, col, width, height)` list,
//! from a compact ASCII specification (see [`crate::gridspec`]), or both.
//! The specification is parsed during assembly so a malformed spec
//! surfaces as an assembly error, like every other authoring mistake.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::assembler::{AssemblyError, ChildIds};
use crate::gridspec::{parse_grid_spec, CellBounds};
use crate::kinds::{node_handle_impls, put_opt, NodeKind};
use crate::types::node::Node;

/// Row or column sizing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// Size tracks to content.
    Fit,
    /// All tracks share the same size.
    Equal,
}

#[derive(Default)]
pub(crate) struct GridLayoutSpec {
    spec_text: Option<String>,
    cells: Vec<(String, CellBounds)>,
    items: BTreeMap<String, Node>,
    row_height: Option<SizingMode>,
    col_width: Option<SizingMode>,
    show_labels: Option<bool>,
}

impl GridLayoutSpec {
    pub(crate) fn assemble(
        &self,
        ids: &mut ChildIds<'_>,
    ) -> Result<(Map<String, Value>, Vec<Node>), AssemblyError> {
        let mut cells = self.cells.clone();
        if let Some(text) = &self.spec_text {
            cells.extend(parse_grid_spec(text)?);
        }

        let mut cell_map = Map::new();
        let mut children: Vec<Node> = Vec::with_capacity(cells.len());
        for (name, bounds) in &cells {
            let item = self
                .items
                .get(name)
                .ok_or_else(|| AssemblyError::MissingGridCell { cell: name.clone() })?;
            let id = ids.get(item, name);
            cell_map.insert(
                name.clone(),
                json!({
                    "row": bounds.row,
                    "col": bounds.col,
                    "width": bounds.width,
                    "height": bounds.height,
                    "fragmentId": id,
                }),
            );
            children.push(item.clone());
        }

        let mut contents = Map::new();
        contents.insert("cells".to_string(), Value::Object(cell_map));
        put_opt(&mut contents, "rowHeight", &self.row_height);
        put_opt(&mut contents, "colWidth", &self.col_width);
        put_opt(&mut contents, "showLabels", &self.show_labels);
        Ok((contents, children))
    }
}

/// Composite laying out named cells on a rectangular grid.
#[derive(Clone)]
pub struct Grid(Node);

impl Grid {
    /// Create a grid with no cells.
    pub fn new() -> Self {
        Self(Node::from_kind(NodeKind::Grid(GridLayoutSpec::default())))
    }

    /// Create a grid whose cell geometry comes from an ASCII
    /// specification, e.g. `"ABB\nACC\nACC"`.
    pub fn from_spec(spec: impl Into<String>) -> Self {
        let grid = Self::new();
        grid.cells_from_spec(spec);
        grid
    }

    /// Set the ASCII cell specification, replacing any previous one. The
    /// specification is parsed at assembly time; a malformed specification
    /// fails assembly.
    pub fn cells_from_spec(&self, spec: impl Into<String>) -> &Self {
        let spec = spec.into();
        self.spec(|layout| layout.spec_text = Some(spec));
        self
    }

    /// Declare one cell with explicit geometry.
    pub fn cell(
        &self,
        name: impl Into<String>,
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    ) -> &Self {
        let name = name.into();
        self.spec(|layout| {
            layout.cells.push((
                name,
                CellBounds {
                    row,
                    col,
                    width,
                    height,
                },
            ))
        });
        self
    }

    /// Associate an item with a named cell. Every declared cell must have
    /// an item or assembly fails.
    pub fn item(&self, cell: impl Into<String>, item: impl Into<Node>) -> &Self {
        let cell = cell.into();
        let item = item.into();
        self.spec(|layout| layout.items.insert(cell, item));
        self
    }

    /// Set the row sizing policy.
    pub fn row_height(&self, mode: SizingMode) -> &Self {
        self.spec(|layout| layout.row_height = Some(mode));
        self
    }

    /// Set the column sizing policy.
    pub fn col_width(&self, mode: SizingMode) -> &Self {
        self.spec(|layout| layout.col_width = Some(mode));
        self
    }

    /// Set whether cell labels are rendered.
    pub fn show_labels(&self, show: bool) -> &Self {
        self.spec(|layout| layout.show_labels = Some(show));
        self
    }

    fn spec<R>(&self, f: impl FnOnce(&mut GridLayoutSpec) -> R) -> R {
        self.0.with_kind_mut(|kind| match kind {
            NodeKind::Grid(spec) => f(spec),
            _ => unreachable!("grid handle wraps a grid node"),
        })
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

node_handle_impls!(Grid);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::assemble;
    use crate::gridspec::GridSpecError;
    use crate::ident::FragmentId;
    use crate::kinds::Text;

    #[test]
    fn test_cells_from_spec() {
        let grid = Grid::from_spec("ABB\nACC\nACC");
        grid.item("A", Text::new("a"))
            .item("B", Text::new("b"))
            .item("C", Text::new("c"));
        let view = assemble(&grid).unwrap();

        let cells = view.root().contents["cells"].as_object().unwrap();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells["A"]["row"], 0);
        assert_eq!(cells["A"]["col"], 0);
        assert_eq!(cells["A"]["width"], 1);
        assert_eq!(cells["A"]["height"], 3);
        assert_eq!(cells["B"]["width"], 2);
        assert_eq!(cells["C"]["height"], 2);
        assert_eq!(
            cells["A"]["fragmentId"],
            FragmentId::derive("A", &FragmentId::root()).as_str()
        );
    }

    #[test]
    fn test_explicit_cells() {
        let grid = Grid::new();
        grid.cell("left", 0, 0, 1, 2)
            .cell("right", 0, 1, 1, 2)
            .item("left", Text::new("l"))
            .item("right", Text::new("r"))
            .row_height(SizingMode::Equal)
            .show_labels(false);
        let view = assemble(&grid).unwrap();

        let contents = &view.root().contents;
        assert_eq!(contents["rowHeight"], "equal");
        assert_eq!(contents["showLabels"], false);
        assert!(!contents.contains_key("colWidth"));
        assert_eq!(contents["cells"]["right"]["col"], 1);
    }

    #[test]
    fn test_missing_item_fails_naming_cell() {
        let grid = Grid::from_spec("AB");
        grid.item("A", Text::new("a"));

        let err = assemble(&grid).unwrap_err();
        match err {
            AssemblyError::MissingGridCell { cell } => assert_eq!(cell, "B"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_spec_fails_assembly() {
        let grid = Grid::from_spec("AB\nABC");
        grid.item("A", Text::new("a")).item("B", Text::new("b"));

        let err = assemble(&grid).unwrap_err();
        match err {
            AssemblyError::GridSpec(GridSpecError::RaggedRow { row, .. }) => assert_eq!(row, 1),
            other => panic!("unexpected error: {other}"),
        }
    }
}

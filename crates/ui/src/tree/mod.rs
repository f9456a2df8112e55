//! Arena-backed layout tree.
//!
//! Windows are roots. Below them the structure is fixed:
//!
//! ```text
//! Window ─→ Table | Grid
//! Table  ─→ Row | RowGrid
//! Row    ─→ Cell
//! Cell   ─→ Table | Grid   (or exactly one element)
//! ```
//!
//! Grids create their rows and cells up front; their cells are fixed-size
//! squares rather than percentage shares.
//!
//! # Design Principles
//!
//! - **Index handles**: nodes refer to each other by [`NodeId`]; a removed
//!   node's id goes stale (generation bump) instead of dangling
//! - **Authored values are kept**: every node remembers its unscaled padding,
//!   windows their unscaled rect, so rescaling always starts from them

mod layout;
mod window;

use core::fmt;

use tracing::trace;

use crate::element::{CellElement, Element, ElementData, Texture};
use crate::error::UiError;
use crate::geometry::{Padding, Rect};
use crate::host::UiHost;

pub use layout::{Shares, distribute, pow2_floor, resolve_shares};
pub use window::{Placement, WindowData};

/// Stable handle to a node. Stale once the node is removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

pub type WindowId = NodeId;

/// Share of the parent's layout axis a child asks for.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sizing {
    /// Splits whatever the fixed siblings leave over.
    #[default]
    Auto,
    /// Percentage of the parent's inner size, 0 to 100.
    Percent(f32),
}

impl Sizing {
    pub fn percent(value: f32) -> Result<Self, UiError> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Ok(Self::Percent(value))
        } else {
            Err(UiError::InvalidPercent(value))
        }
    }
}

#[derive(Debug, strum::IntoStaticStr)]
pub enum NodeKind {
    Window(Box<WindowData>),
    Table,
    Grid { rows: usize, cols: usize, spacing: f32 },
    Row,
    RowGrid { cols: usize, spacing: f32 },
    Cell,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BackgroundMode {
    /// Native size from the top-left corner.
    #[default]
    None,
    Stretch,
    /// Covers the node, cropping the overflow.
    Fill,
    Tile,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Background {
    pub texture: Texture,
    pub mode: BackgroundMode,
}

pub struct Node<H: UiHost> {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    element: Option<Element<H>>,
    sizing: Sizing,
    rect: Rect,
    padding: Padding,
    unscaled_padding: Padding,
    background: Option<Background>,
}

impl<H: UiHost> Node<H> {
    fn new(kind: NodeKind, parent: Option<NodeId>, sizing: Sizing, padding: Padding) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            element: None,
            sizing,
            rect: Rect::ZERO,
            padding,
            unscaled_padding: padding,
            background: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn sizing(&self) -> Sizing {
        self.sizing
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn padding(&self) -> Padding {
        self.padding
    }

    pub fn unscaled_padding(&self) -> Padding {
        self.unscaled_padding
    }

    /// Space left for children or the element.
    pub fn inner(&self) -> Rect {
        self.rect.inset(&self.padding)
    }

    pub fn element(&self) -> Option<&ElementData> {
        self.element.as_ref().map(|element| &element.data)
    }

    pub fn background(&self) -> Option<&Background> {
        self.background.as_ref()
    }

    pub fn window(&self) -> Option<&WindowData> {
        match &self.kind {
            NodeKind::Window(window) => Some(window),
            _ => None,
        }
    }
}

struct Slot<H: UiHost> {
    generation: u32,
    node: Option<Node<H>>,
}

/// Owner of every node of every window.
pub struct LayoutTree<H: UiHost> {
    slots: Vec<Slot<H>>,
    free: Vec<u32>,
}

impl<H: UiHost> Default for LayoutTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: UiHost> LayoutTree<H> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<H>> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<H>> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn node(&self, id: NodeId) -> Result<&Node<H>, UiError> {
        self.get(id).ok_or(UiError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node<H>, UiError> {
        self.get_mut(id).ok_or(UiError::UnknownNode(id))
    }

    fn insert(&mut self, node: Node<H>) -> NodeId {
        let parent = node.parent;
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 0,
                }
            }
        };
        if let Some(parent) = parent
            && let Some(parent) = self.get_mut(parent)
        {
            parent.children.push(id);
        }
        id
    }

    /// Adds a window root. The window is laid out once the engine places it.
    pub fn add_window(
        &mut self,
        name: impl Into<String>,
        rect: Rect,
        placement: Placement,
        padding: Padding,
    ) -> WindowId {
        let data = WindowData::new(name.into(), rect, placement);
        let mut node = Node::new(
            NodeKind::Window(Box::new(data)),
            None,
            Sizing::Auto,
            padding,
        );
        node.rect = rect;
        self.insert(node)
    }

    /// Adds a table under a window or an empty cell.
    pub fn add_table(
        &mut self,
        parent: NodeId,
        sizing: Sizing,
        padding: Padding,
    ) -> Result<NodeId, UiError> {
        self.check_table_parent(parent, "Table")?;
        Ok(self.insert(Node::new(NodeKind::Table, Some(parent), sizing, padding)))
    }

    /// Adds a `rows` x `cols` grid of square cells under a window or an empty
    /// cell. Rows and cells are created immediately; see [`Self::grid_cell`].
    pub fn add_grid(
        &mut self,
        parent: NodeId,
        rows: usize,
        cols: usize,
        spacing: f32,
        sizing: Sizing,
        padding: Padding,
    ) -> Result<NodeId, UiError> {
        self.check_table_parent(parent, "Grid")?;
        let grid = self.insert(Node::new(
            NodeKind::Grid {
                rows,
                cols,
                spacing,
            },
            Some(parent),
            sizing,
            padding,
        ));
        for _ in 0..rows {
            let row = self.insert(Node::new(
                NodeKind::Row,
                Some(grid),
                Sizing::Auto,
                Padding::ZERO,
            ));
            for _ in 0..cols {
                self.insert(Node::new(
                    NodeKind::Cell,
                    Some(row),
                    Sizing::Auto,
                    Padding::ZERO,
                ));
            }
        }
        Ok(grid)
    }

    /// Adds a row to a table.
    pub fn add_row(
        &mut self,
        table: NodeId,
        sizing: Sizing,
        padding: Padding,
    ) -> Result<NodeId, UiError> {
        self.check_row_parent(table, "Row")?;
        Ok(self.insert(Node::new(NodeKind::Row, Some(table), sizing, padding)))
    }

    /// Adds a row of `cols` square cells to a table.
    pub fn add_row_grid(
        &mut self,
        table: NodeId,
        cols: usize,
        spacing: f32,
        sizing: Sizing,
        padding: Padding,
    ) -> Result<NodeId, UiError> {
        self.check_row_parent(table, "RowGrid")?;
        let row = self.insert(Node::new(
            NodeKind::RowGrid { cols, spacing },
            Some(table),
            sizing,
            padding,
        ));
        for _ in 0..cols {
            self.insert(Node::new(
                NodeKind::Cell,
                Some(row),
                Sizing::Auto,
                Padding::ZERO,
            ));
        }
        Ok(row)
    }

    /// Adds a cell to a plain row. Grid rows have a fixed cell count.
    pub fn add_cell(
        &mut self,
        row: NodeId,
        sizing: Sizing,
        padding: Padding,
    ) -> Result<NodeId, UiError> {
        let node = self.node(row)?;
        let in_grid = node
            .parent
            .and_then(|parent| self.get(parent))
            .is_some_and(|parent| matches!(parent.kind, NodeKind::Grid { .. }));
        if !matches!(node.kind, NodeKind::Row) || in_grid {
            return Err(UiError::NotAContainer {
                node: row,
                kind: node.kind.name(),
                child: "Cell",
            });
        }
        Ok(self.insert(Node::new(NodeKind::Cell, Some(row), sizing, padding)))
    }

    /// Cell at `row`, `col` of a grid, or of a row grid when `row` is 0.
    pub fn grid_cell(&self, grid: NodeId, row: usize, col: usize) -> Option<NodeId> {
        let node = self.get(grid)?;
        match node.kind {
            NodeKind::Grid { .. } => {
                let row = self.get(*node.children.get(row)?)?;
                row.children.get(col).copied()
            }
            NodeKind::RowGrid { .. } if row == 0 => node.children.get(col).copied(),
            _ => None,
        }
    }

    /// Places an element in an empty cell.
    pub fn set_element(
        &mut self,
        cell: NodeId,
        data: ElementData,
        behavior: Option<Box<dyn CellElement<H>>>,
    ) -> Result<(), UiError> {
        let node = self.node_mut(cell)?;
        if !matches!(node.kind, NodeKind::Cell) {
            return Err(UiError::NotAContainer {
                node: cell,
                kind: node.kind.name(),
                child: "element",
            });
        }
        if node.element.is_some() || !node.children.is_empty() {
            return Err(UiError::CellOccupied(cell));
        }
        node.element = Some(Element::new(data, behavior));
        Ok(())
    }

    pub fn set_background(&mut self, node: NodeId, background: Background) -> Result<(), UiError> {
        self.node_mut(node)?.background = Some(background);
        Ok(())
    }

    /// Changes authored padding. Takes effect at the next rescale.
    pub fn set_padding(&mut self, node: NodeId, padding: Padding) -> Result<(), UiError> {
        let node = self.node_mut(node)?;
        node.padding = padding;
        node.unscaled_padding = padding;
        Ok(())
    }

    fn check_table_parent(&self, parent: NodeId, child: &'static str) -> Result<(), UiError> {
        let node = self.node(parent)?;
        match node.kind {
            NodeKind::Window(_) => Ok(()),
            NodeKind::Cell if node.element.is_none() => Ok(()),
            NodeKind::Cell => Err(UiError::CellOccupied(parent)),
            _ => Err(UiError::NotAContainer {
                node: parent,
                kind: node.kind.name(),
                child,
            }),
        }
    }

    fn check_row_parent(&self, parent: NodeId, child: &'static str) -> Result<(), UiError> {
        let node = self.node(parent)?;
        match node.kind {
            NodeKind::Table => Ok(()),
            _ => Err(UiError::NotAContainer {
                node: parent,
                kind: node.kind.name(),
                child,
            }),
        }
    }

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.get(id).map(|node| node.rect)
    }

    pub(crate) fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.get_mut(id) {
            node.rect = rect;
        }
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.element()
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id)?
            .element
            .as_mut()
            .map(|element| &mut element.data)
    }

    pub fn behavior(&self, id: NodeId) -> Option<&dyn CellElement<H>> {
        self.get(id)?.element.as_ref()?.behavior()
    }

    pub(crate) fn take_behavior(&mut self, id: NodeId) -> Option<Box<dyn CellElement<H>>> {
        self.get_mut(id)?.element.as_mut()?.behavior.take()
    }

    /// Puts a behavior back after a hook. Dropped if the cell went away
    /// meanwhile.
    pub(crate) fn restore_behavior(&mut self, id: NodeId, behavior: Box<dyn CellElement<H>>) {
        if let Some(element) = self.get_mut(id).and_then(|node| node.element.as_mut())
            && element.behavior.is_none()
        {
            element.behavior = Some(behavior);
        }
    }

    pub fn window(&self, id: WindowId) -> Option<&WindowData> {
        self.get(id)?.window()
    }

    pub(crate) fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowData> {
        match &mut self.get_mut(id)?.kind {
            NodeKind::Window(window) => Some(window),
            _ => None,
        }
    }

    /// Window root above `id` (itself for a window).
    pub fn window_of(&self, id: NodeId) -> Option<WindowId> {
        let mut current = id;
        loop {
            let node = self.get(current)?;
            match node.parent {
                Some(parent) => current = parent,
                None => return node.window().map(|_| current),
            }
        }
    }

    /// `root` and everything below it, depth first, parents before children.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            out.push(id);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Cells under `root` that hold an element, in depth-first order.
    pub fn element_cells(&self, root: NodeId) -> Vec<NodeId> {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.element(*id).is_some())
            .collect()
    }

    /// Removes `root` and its subtree. Ids into it become stale.
    pub fn remove(&mut self, root: NodeId) {
        let ids = self.descendants(root);
        if let Some(parent) = self.get(root).and_then(|node| node.parent)
            && let Some(parent) = self.get_mut(parent)
        {
            parent.children.retain(|child| *child != root);
        }
        for id in &ids {
            let slot = &mut self.slots[id.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
        }
        trace!(target: "ui::tree", root = %root, removed = ids.len(), "removed subtree");
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn reset_paddings(&mut self, root: NodeId, scale: f32) {
        for id in self.descendants(root) {
            if let Some(node) = self.get_mut(id) {
                node.padding = node.unscaled_padding.scaled(scale);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::element::TextBox;

    fn label() -> ElementData {
        ElementData::text(TextBox::new("x", &UiConfig::default()))
    }

    fn window(tree: &mut LayoutTree<()>) -> WindowId {
        tree.add_window(
            "test",
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Placement::Floating,
            Padding::ZERO,
        )
    }

    #[test]
    fn containers_only_take_their_own_children() {
        let mut tree = LayoutTree::<()>::new();
        let window = window(&mut tree);
        let err = tree.add_row(window, Sizing::Auto, Padding::ZERO).unwrap_err();
        assert_eq!(err.code(), "UI_NOT_A_CONTAINER");

        let table = tree.add_table(window, Sizing::Auto, Padding::ZERO).unwrap();
        assert!(tree.add_cell(table, Sizing::Auto, Padding::ZERO).is_err());
    }

    #[test]
    fn a_cell_holds_an_element_or_children_never_both() {
        let mut tree = LayoutTree::<()>::new();
        let window = window(&mut tree);
        let table = tree.add_table(window, Sizing::Auto, Padding::ZERO).unwrap();
        let row = tree.add_row(table, Sizing::Auto, Padding::ZERO).unwrap();
        let cell = tree.add_cell(row, Sizing::Auto, Padding::ZERO).unwrap();

        tree.set_element(cell, label(), None).unwrap();
        assert_eq!(
            tree.add_table(cell, Sizing::Auto, Padding::ZERO),
            Err(UiError::CellOccupied(cell))
        );
        assert_eq!(
            tree.set_element(cell, label(), None),
            Err(UiError::CellOccupied(cell))
        );
    }

    #[test]
    fn removed_ids_go_stale_even_when_the_slot_is_reused() {
        let mut tree = LayoutTree::<()>::new();
        let first = window(&mut tree);
        tree.remove(first);
        let second = window(&mut tree);

        assert!(!tree.contains(first));
        assert!(tree.contains(second));
        assert_ne!(first, second);
    }

    #[test]
    fn grids_build_their_cells_up_front() {
        let mut tree = LayoutTree::<()>::new();
        let window = window(&mut tree);
        let grid = tree
            .add_grid(window, 2, 3, 4.0, Sizing::Auto, Padding::ZERO)
            .unwrap();

        assert!(tree.grid_cell(grid, 1, 2).is_some());
        assert!(tree.grid_cell(grid, 2, 0).is_none());
        let row = tree.get(grid).unwrap().children()[0];
        assert!(tree.add_cell(row, Sizing::Auto, Padding::ZERO).is_err());
        assert_eq!(tree.window_of(tree.grid_cell(grid, 1, 2).unwrap()), Some(window));
    }

    #[test]
    fn percent_sizing_is_validated() {
        assert!(Sizing::percent(100.0).is_ok());
        assert_eq!(Sizing::percent(120.0), Err(UiError::InvalidPercent(120.0)));
        assert!(Sizing::percent(f32::NAN).is_err());
    }
}

//! Percentage box layout.
//!
//! Every container splits its inner rect along one axis:
//!
//! 1. children with [`Sizing::Percent`] take their share, the fixed sum capped
//!    at 100
//! 2. [`Sizing::Auto`] children split what is left evenly
//! 3. sizes are rounded up and laid end to end, so siblings tile without gaps
//!    or overlap; the cross axis is the full inner size
//!
//! Grids ignore sizing and use square cells whose side is a power of two.
//! Elements are fitted in a second pass, once every cell rect is final, so
//! row and column image groups see their siblings' final space.

use crate::element::{ImageOverflow, Visual};
use crate::geometry::{Rect, Vec2};
use crate::host::UiHost;
use crate::render::TextMeasure;

use super::{LayoutTree, NodeId, NodeKind, Sizing};

/// How a container's percent budget is split.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shares {
    /// Combined share of the fixed children, capped at 100.
    pub fixed_total: f32,
    /// Share each auto child receives.
    pub auto_share: f32,
}

/// Over-subscribed fixed children are clamped as a group, not scaled down;
/// auto children then receive nothing.
pub fn resolve_shares(sizings: &[Sizing]) -> Shares {
    let mut fixed = 0.0;
    let mut autos = 0usize;
    for sizing in sizings {
        match sizing {
            Sizing::Percent(percent) => fixed += percent,
            Sizing::Auto => autos += 1,
        }
    }
    let fixed_total: f32 = f32::min(fixed, 100.0);
    let auto_share = if autos == 0 {
        0.0
    } else {
        (100.0 - fixed_total) / autos as f32
    };
    Shares {
        fixed_total,
        auto_share,
    }
}

/// Offsets and sizes along one axis, in child order.
pub fn distribute(start: f32, available: f32, sizings: &[Sizing]) -> Vec<(f32, f32)> {
    let shares = resolve_shares(sizings);
    let mut offset = start;
    sizings
        .iter()
        .map(|sizing| {
            let percent = match sizing {
                Sizing::Percent(percent) => *percent,
                Sizing::Auto => shares.auto_share,
            };
            let size = (available * percent / 100.0).ceil();
            let span = (offset, size);
            offset += size;
            span
        })
        .collect()
}

/// Largest power of two not above `value`; zero below one.
pub fn pow2_floor(value: f32) -> f32 {
    if value < 1.0 {
        return 0.0;
    }
    2f32.powi(value.log2().floor() as i32)
}

#[derive(Clone, Copy)]
enum Axis {
    Vertical,
    Horizontal,
}

/// Square grid cells: side length, and the top-left of the centered block.
fn grid_geometry(inner: Rect, rows: usize, cols: usize, spacing: f32) -> (f32, Vec2) {
    let rows = rows.max(1) as f32;
    let cols = cols.max(1) as f32;
    let fit = (inner.width / cols).min(inner.height / rows) - spacing;
    let side = pow2_floor(fit);
    let step = side + spacing;
    let width = cols * step - spacing;
    let height = rows * step - spacing;
    let origin = Vec2::new(
        inner.x + (inner.width - width) / 2.0,
        inner.y + (inner.height - height) / 2.0,
    );
    (side, origin)
}

impl<H: UiHost> LayoutTree<H> {
    /// Lays out everything below `root`, whose own rect must already be set.
    pub fn layout(&mut self, root: NodeId, device_scale: f32, measure: &dyn TextMeasure) {
        self.layout_children(root);
        self.fit_elements(root, device_scale, measure);
    }

    fn layout_children(&mut self, id: NodeId) {
        let Some(node) = self.get(id) else { return };
        let inner = node.inner();
        let children = node.children.clone();

        let descend = match node.kind {
            NodeKind::Window(_) | NodeKind::Table | NodeKind::Cell => {
                self.stack(&children, inner, Axis::Vertical);
                children
            }
            NodeKind::Row => {
                self.stack(&children, inner, Axis::Horizontal);
                children
            }
            NodeKind::Grid {
                rows,
                cols,
                spacing,
            } => {
                let (side, origin) = grid_geometry(inner, rows, cols, spacing);
                let step = side + spacing;
                let width = cols as f32 * step - spacing;
                let mut cells = Vec::new();
                for (r, row) in children.iter().enumerate() {
                    let y = origin.y + r as f32 * step;
                    self.set_rect(*row, Rect::new(origin.x, y, width, side));
                    let row_cells = self
                        .get(*row)
                        .map(|row| row.children.clone())
                        .unwrap_or_default();
                    for (c, cell) in row_cells.iter().enumerate() {
                        let x = origin.x + c as f32 * step;
                        self.set_rect(*cell, Rect::new(x, y, side, side));
                    }
                    cells.extend(row_cells);
                }
                cells
            }
            NodeKind::RowGrid { cols, spacing } => {
                let (side, origin) = grid_geometry(inner, 1, cols, spacing);
                let step = side + spacing;
                for (c, cell) in children.iter().enumerate() {
                    let x = origin.x + c as f32 * step;
                    self.set_rect(*cell, Rect::new(x, origin.y, side, side));
                }
                children
            }
        };

        for child in descend {
            self.layout_children(child);
        }
    }

    fn stack(&mut self, children: &[NodeId], inner: Rect, axis: Axis) {
        let sizings: Vec<Sizing> = children
            .iter()
            .filter_map(|child| self.get(*child).map(|node| node.sizing))
            .collect();
        let spans = match axis {
            Axis::Vertical => distribute(inner.y, inner.height, &sizings),
            Axis::Horizontal => distribute(inner.x, inner.width, &sizings),
        };
        for (child, (offset, size)) in children.iter().zip(spans) {
            let rect = match axis {
                Axis::Vertical => Rect::new(inner.x, offset, inner.width, size),
                Axis::Horizontal => Rect::new(offset, inner.y, size, inner.height),
            };
            self.set_rect(*child, rect);
        }
    }

    fn fit_elements(&mut self, root: NodeId, device_scale: f32, measure: &dyn TextMeasure) {
        let window_space = self
            .window_of(root)
            .and_then(|window| self.get(window))
            .map(|window| window.inner())
            .unwrap_or_default();

        for cell in self.element_cells(root) {
            let Some(node) = self.get(cell) else { continue };
            assert!(
                node.children.is_empty(),
                "cell {cell} holds both an element and children"
            );
            let space = node.inner();
            let shared = self.shared_image_scale(cell, device_scale);

            let Some(element) = self.get_mut(cell).and_then(|node| node.element.as_mut()) else {
                continue;
            };
            element.data.rect = match &mut element.data.visual {
                Visual::Text(text) => text.fit(space, window_space, device_scale, measure),
                Visual::Image(image) => image.fit(space, device_scale, shared),
            };
        }
    }

    /// One factor for a row or column group: the smallest any member needs.
    fn shared_image_scale(&self, cell: NodeId, device_scale: f32) -> Option<f32> {
        let overflow = self.element(cell)?.image_box()?.overflow;
        let row = self.get(cell)?.parent?;
        let group: Vec<NodeId> = match overflow {
            ImageOverflow::ShrinkRowToFit => self.get(row)?.children.clone(),
            ImageOverflow::ShrinkColToFit => {
                let col = self.get(row)?.children.iter().position(|c| *c == cell)?;
                let table = self.get(row)?.parent?;
                self.get(table)?
                    .children
                    .iter()
                    .filter_map(|row| self.get(*row)?.children.get(col).copied())
                    .collect()
            }
            ImageOverflow::AllowOverflow | ImageOverflow::ShrinkToFit => return None,
        };

        let factor = group
            .iter()
            .filter_map(|member| {
                let node = self.get(*member)?;
                let image = node.element()?.image_box()?;
                (image.overflow == overflow)
                    .then(|| image.required_scale(node.inner().size(), device_scale))
            })
            .fold(f32::INFINITY, f32::min);
        Some(if factor.is_finite() { factor } else { 1.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_children_split_the_remainder() {
        let spans = distribute(
            0.0,
            200.0,
            &[Sizing::Percent(50.0), Sizing::Auto, Sizing::Auto],
        );
        assert_eq!(spans, vec![(0.0, 100.0), (100.0, 50.0), (150.0, 50.0)]);
    }

    #[test]
    fn sizes_round_up() {
        let spans = distribute(10.0, 100.0, &[Sizing::Auto, Sizing::Auto, Sizing::Auto]);
        assert_eq!(spans[0], (10.0, 34.0));
        assert_eq!(spans[1].0, 44.0);
    }

    #[test]
    fn pow2_floor_snaps_down() {
        assert_eq!(pow2_floor(64.0), 64.0);
        assert_eq!(pow2_floor(100.0), 64.0);
        assert_eq!(pow2_floor(0.5), 0.0);
    }

    #[test]
    fn grid_block_is_centered() {
        let (side, origin) = grid_geometry(Rect::new(0.0, 0.0, 300.0, 100.0), 1, 2, 4.0);
        assert_eq!(side, 64.0);
        assert_eq!(origin, Vec2::new((300.0 - 132.0) / 2.0, 18.0));
    }
}

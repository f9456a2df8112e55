//! Plain-data dump of the resolved layout, for tooling and golden tests.

use crate::element::InteractionState;
use crate::engine::UiEngine;
use crate::geometry::{Rect, Vec2};
use crate::host::UiHost;
use crate::tree::NodeId;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutSnapshot {
    pub viewport: Vec2,
    pub scale_factor: f32,
    /// Back to front; the tooltip, if any, last.
    pub windows: Vec<WindowSnapshot>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowSnapshot {
    pub name: String,
    pub hidden: bool,
    pub root: NodeSnapshot,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSnapshot {
    pub kind: String,
    pub rect: Rect,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub element: Option<ElementSnapshot>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<NodeSnapshot>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementSnapshot {
    pub rect: Rect,
    pub state: InteractionState,
    pub text: Option<String>,
    pub font_size: Option<f32>,
    pub texture: Option<String>,
    pub scale: Option<f32>,
}

impl<H: UiHost> UiEngine<H> {
    pub fn snapshot(&self) -> LayoutSnapshot {
        let windows = self
            .windows()
            .iter()
            .copied()
            .chain(self.tooltip())
            .filter_map(|window| {
                let data = self.tree().window(window)?;
                Some(WindowSnapshot {
                    name: data.name.clone(),
                    hidden: data.is_hidden(),
                    root: self.node_snapshot(window)?,
                })
            })
            .collect();
        LayoutSnapshot {
            viewport: self.settings().viewport(),
            scale_factor: self.settings().scale_factor(),
            windows,
        }
    }

    fn node_snapshot(&self, id: NodeId) -> Option<NodeSnapshot> {
        let node = self.tree().get(id)?;
        let element = node.element().map(|data| {
            let text = data.text_box();
            let image = data.image_box();
            ElementSnapshot {
                rect: data.rect(),
                state: data.state(),
                text: text.map(|text| text.display_text()),
                font_size: text.map(|text| text.font_size()),
                texture: image
                    .and_then(|image| image.texture.as_ref())
                    .map(|texture| texture.key.clone()),
                scale: image.map(|image| image.scale()),
            }
        });
        Some(NodeSnapshot {
            kind: node.kind().name().to_owned(),
            rect: node.rect(),
            element,
            children: node
                .children()
                .iter()
                .filter_map(|child| self.node_snapshot(*child))
                .collect(),
        })
    }
}

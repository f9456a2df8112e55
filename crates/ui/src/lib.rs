//! Retained-mode UI layout and interaction.
//!
//! Windows hold a tree of tables, rows and cells laid out by percentage
//! shares; cells hold text or image elements that react to the pointer
//! through a small per-element state machine (idle, hover, drag delay,
//! drag). The engine never draws on its own: it resolves rects and hands
//! draw calls to a [`Renderer`].
//!
//! # Architecture
//!
//! - [`LayoutTree`]: arena of every window's nodes, addressed by [`NodeId`]
//! - [`ElementData`] / [`CellElement`]: element layout data and widget behavior
//! - [`UiEngine`]: z-order, hit-testing, dragging, tooltip, error banner,
//!   viewport rescaling
//! - [`UiHost`]: the world widgets act on, plus pointer capture
//!
//! # Design Principles
//!
//! - **Authored once, scaled on demand**: windows are written against a target
//!   resolution; every resize starts again from the authored values
//! - **Deferred removal**: removed windows disappear at the end of the frame
//! - **Hooks borrow, never keep**: behaviors get the host and engine per call

pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod host;
pub mod render;
pub mod settings;
pub mod snapshot;
pub mod tree;
pub mod widgets;

pub use config::UiConfig;
pub use element::{
    CellElement, DropOutcome, Effect, ElementCx, ElementData, ElementFlags, ImageBox,
    ImageOverflow, InteractionState, TextBox, TextOverflow, Texture, Visual,
};
pub use engine::{ErrorBanner, UiEngine};
pub use error::UiError;
pub use geometry::{HoriAlign, Padding, Rect, Vec2, VertAlign};
pub use host::{Pointer, UiHost};
pub use render::{DrawCommand, Monospace, RecordingRenderer, Renderer, TextMeasure};
pub use settings::Settings;
pub use snapshot::{ElementSnapshot, LayoutSnapshot, NodeSnapshot, WindowSnapshot};
pub use tree::{
    Background, BackgroundMode, LayoutTree, NodeId, NodeKind, Placement, Sizing, WindowData,
    WindowId,
};
pub use widgets::{CloseButton, TitleBar, WindowButton};

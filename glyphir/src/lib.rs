//! Glyph layer model: outlines, anchors and the metrics a layer is drawn against.

pub mod error;
pub mod layer;
pub mod path_builder;
pub mod types;

pub use layer::{
    Anchors, Component, Layer, MetricsContext, Node, NodeType, Path, SideBearings,
    VerticalMetrics,
};
pub use types::GlyphName;

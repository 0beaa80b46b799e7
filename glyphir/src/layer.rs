//! A single master layer of a glyph as handed over by the host editor.

use std::str::FromStr;

use indexmap::IndexMap;
use kurbo::{Affine, BezPath, ParamCurveExtrema, PathEl, Point, Rect};
use log::debug;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::{error::PathConversionError, path_builder::GlyphPathBuilder, types::GlyphName};

/// Possible types of a node in a layer path, following Glyphs semantics.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    #[serde(rename = "l")]
    Line,
    #[serde(rename = "ls")]
    LineSmooth,
    #[serde(rename = "o")]
    OffCurve,
    #[serde(rename = "c")]
    Curve,
    #[serde(rename = "cs")]
    CurveSmooth,
    #[serde(rename = "q")]
    QCurve,
    #[serde(rename = "qs")]
    QCurveSmooth,
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // Glyphs 2 style
            "LINE" => Ok(NodeType::Line),
            "LINE SMOOTH" => Ok(NodeType::LineSmooth),
            "OFFCURVE" => Ok(NodeType::OffCurve),
            "CURVE" => Ok(NodeType::Curve),
            "CURVE SMOOTH" => Ok(NodeType::CurveSmooth),
            "QCURVE" => Ok(NodeType::QCurve),
            "QCURVE SMOOTH" => Ok(NodeType::QCurveSmooth),
            // Glyphs 3 style
            "l" => Ok(NodeType::Line),
            "ls" => Ok(NodeType::LineSmooth),
            "o" => Ok(NodeType::OffCurve),
            "c" => Ok(NodeType::Curve),
            "cs" => Ok(NodeType::CurveSmooth),
            "q" => Ok(NodeType::QCurve),
            "qs" => Ok(NodeType::QCurveSmooth),
            _ => Err(format!("unknown node type {s}")),
        }
    }
}

/// A point of a path. Identity is positional: the index within its path.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub x: f64,
    pub y: f64,
    pub typ: NodeType,
}

impl Node {
    pub fn new(x: f64, y: f64, typ: NodeType) -> Node {
        Node { x, y, typ }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_point(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Path {
    pub closed: bool,
    pub nodes: Vec<Node>,
}

impl Path {
    pub fn new(closed: bool) -> Path {
        Path {
            closed,
            nodes: Vec::new(),
        }
    }

    pub fn add(&mut self, pt: impl Into<Point>, typ: NodeType) {
        let pt = pt.into();
        self.nodes.push(Node::new(pt.x, pt.y, typ));
    }

    pub fn to_bez(&self) -> Result<BezPath, PathConversionError> {
        let mut builder = GlyphPathBuilder::new(self.closed, self.nodes.len());
        for node in self.nodes.iter() {
            builder.push(node.typ, node.point())?;
        }
        builder.build()
    }

    /// The extent of the drawn contour, curve extrema included.
    ///
    /// None if the path has no nodes.
    pub fn bounds(&self) -> Result<Option<Rect>, PathConversionError> {
        let bez = self.to_bez()?;
        let Some(start) = bez.elements().iter().find_map(|el| match el {
            PathEl::MoveTo(p) => Some(*p),
            _ => None,
        }) else {
            return Ok(None);
        };
        Ok(Some(bez.segments().fold(
            Rect::from_points(start, start),
            |acc, seg| acc.union(seg.bounding_box()),
        )))
    }
}

/// A reference to another glyph drawn inside this layer.
///
/// The host resolves the referenced glyph; `bounds` is its extent in its own
/// coordinates, before `transform`. None for a reference to an empty glyph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Component {
    pub base: GlyphName,
    #[serde(default = "identity")]
    pub transform: Affine,
    #[serde(default)]
    pub bounds: Option<Rect>,
}

fn identity() -> Affine {
    Affine::IDENTITY
}

impl Component {
    pub fn transformed_bounds(&self) -> Option<Rect> {
        self.bounds
            .map(|bounds| self.transform.transform_rect_bbox(bounds))
    }
}

/// Named points attached to a layer.
///
/// At most one anchor exists per name; insertion order is kept so a layer
/// round trips through serialization unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Anchors(IndexMap<SmolStr, Point>);

impl Anchors {
    pub fn new() -> Anchors {
        Anchors::default()
    }

    /// Sets the anchor `name` to `pos`, replacing any existing anchor of that name.
    ///
    /// Returns the previous position, if any.
    pub fn upsert(&mut self, name: impl Into<SmolStr>, pos: Point) -> Option<Point> {
        let name = name.into();
        // a replaced anchor moves to the end, as delete-then-append would
        let prev = self.0.shift_remove(&name);
        self.0.insert(name, pos);
        prev
    }

    pub fn remove(&mut self, name: &str) -> Option<Point> {
        self.0.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Point> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.0.iter().map(|(name, pos)| (name.as_str(), *pos))
    }
}

impl<N: Into<SmolStr>> FromIterator<(N, Point)> for Anchors {
    fn from_iter<T: IntoIterator<Item = (N, Point)>>(iter: T) -> Self {
        let mut anchors = Anchors::new();
        for (name, pos) in iter {
            anchors.upsert(name, pos);
        }
        anchors
    }
}

/// Vertical metrics of the master a layer belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct VerticalMetrics {
    pub ascender: f64,
    pub descender: f64,
}

/// Everything an engine reads about the space a glyph is drawn in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct MetricsContext {
    /// Advance width.
    pub width: f64,
    pub ascender: f64,
    pub descender: f64,
}

/// Side-bearing values stored on the layer.
///
/// None means the host has no explicit value for that side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct SideBearings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
}

/// One layer of a glyph: outline, anchors and the metrics it is drawn against.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Layer {
    pub glyph_name: GlyphName,
    /// The layer (usually master) name, used only for reporting.
    pub name: SmolStr,
    /// Advance width.
    pub width: f64,
    pub metrics: VerticalMetrics,
    #[serde(default)]
    pub paths: Vec<Path>,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub anchors: Anchors,
    #[serde(default)]
    pub side_bearings: SideBearings,
}

impl Layer {
    pub fn new(
        glyph_name: impl Into<GlyphName>,
        name: impl Into<SmolStr>,
        width: f64,
        metrics: VerticalMetrics,
    ) -> Layer {
        Layer {
            glyph_name: glyph_name.into(),
            name: name.into(),
            width,
            metrics,
            paths: Vec::new(),
            components: Vec::new(),
            anchors: Anchors::new(),
            side_bearings: SideBearings::default(),
        }
    }

    /// True if there is nothing to measure: no paths and no components.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.components.is_empty()
    }

    /// The bounding box of everything drawn in the layer.
    ///
    /// None is the empty state: no paths with nodes and no components with bounds.
    pub fn bounds(&self) -> Result<Option<Rect>, PathConversionError> {
        let mut bounds: Option<Rect> = None;
        for path in self.paths.iter() {
            if let Some(path_bounds) = path.bounds()? {
                bounds = Some(bounds.map_or(path_bounds, |b| b.union(path_bounds)));
            }
        }
        for component in self.components.iter() {
            let Some(component_bounds) = component.transformed_bounds() else {
                debug!(
                    "'{}' layer '{}': component '{}' has no bounds, ignored",
                    self.glyph_name, self.name, component.base
                );
                continue;
            };
            bounds = Some(bounds.map_or(component_bounds, |b| b.union(component_bounds)));
        }
        Ok(bounds)
    }

    pub fn metrics_context(&self) -> MetricsContext {
        MetricsContext {
            width: self.width,
            ascender: self.metrics.ascender,
            descender: self.metrics.descender,
        }
    }
}

//! The coordinate frames placements and fits are measured against.

use std::{fmt::Display, str::FromStr};

use glyphir::{Layer, MetricsContext};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which frame side-bearing anchors are placed relative to.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PlacementMode {
    /// Offsets are measured outward from the edges of the outline.
    #[default]
    Bounds,
    /// Offsets are measured from the center of the advance and the ascender/descender body.
    Metrics,
}

impl FromStr for PlacementMode {
    type Err = Error;

    /// Accepts the mode names as well as the radio button index (0 bounds, 1 metrics).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "bounds" | "0" => Ok(PlacementMode::Bounds),
            "metrics" | "1" => Ok(PlacementMode::Metrics),
            other => Err(Error::InvalidParameter {
                what: "placement mode".into(),
                value: other.to_string(),
            }),
        }
    }
}

impl Display for PlacementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlacementMode::Bounds => f.write_str("bounds"),
            PlacementMode::Metrics => f.write_str("metrics"),
        }
    }
}

/// A coordinate reference derived from a layer. Values are exact, never rounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frame {
    /// Edges and center of the outline bounding box.
    Bounds(Rect),
    /// Center of the advance and the vertical body, with half extents.
    Metrics { center: Point, half_extent: Vec2 },
}

impl Frame {
    /// The metrics frame for a glyph of the given width and vertical metrics.
    pub fn metrics(metrics: MetricsContext) -> Frame {
        let (center, half_extent) = metrics_body(metrics);
        Frame::Metrics {
            center,
            half_extent,
        }
    }

    pub fn center(&self) -> Point {
        match self {
            Frame::Bounds(rect) => rect.center(),
            Frame::Metrics { center, .. } => *center,
        }
    }
}

/// Center and half extents of the advance and the ascender/descender body.
pub(crate) fn metrics_body(metrics: MetricsContext) -> (Point, Vec2) {
    (
        Point::new(
            metrics.width / 2.0,
            (metrics.ascender + metrics.descender) / 2.0,
        ),
        Vec2::new(
            metrics.width / 2.0,
            (metrics.ascender - metrics.descender) / 2.0,
        ),
    )
}

/// The bounding box of a layer, failing if there is nothing to measure.
pub fn layer_bounds(layer: &Layer) -> Result<Rect, Error> {
    let bounds = layer.bounds().map_err(|source| Error::BadPath {
        glyph: layer.glyph_name.clone(),
        layer: layer.name.clone(),
        source,
    })?;
    bounds.ok_or_else(|| Error::EmptyGeometry {
        glyph: layer.glyph_name.clone(),
        layer: layer.name.clone(),
    })
}

/// Compute the frame of `layer` for `mode`.
///
/// The bounds frame of an empty layer is undefined and reported as
/// [`Error::EmptyGeometry`]; the metrics frame never looks at the outline.
pub fn compute_frame(layer: &Layer, mode: PlacementMode) -> Result<Frame, Error> {
    match mode {
        PlacementMode::Bounds => layer_bounds(layer).map(Frame::Bounds),
        PlacementMode::Metrics => Ok(Frame::metrics(layer.metrics_context())),
    }
}

#[cfg(test)]
mod tests {
    use glyphir::{NodeType, Path, VerticalMetrics};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn layer(rect: Option<Rect>) -> Layer {
        let mut layer = Layer::new(
            "H",
            "Regular",
            500.0,
            VerticalMetrics {
                ascender: 800.0,
                descender: -200.0,
            },
        );
        if let Some(rect) = rect {
            let mut path = Path::new(true);
            path.add((rect.x0, rect.y0), NodeType::Line);
            path.add((rect.x1, rect.y0), NodeType::Line);
            path.add((rect.x1, rect.y1), NodeType::Line);
            path.add((rect.x0, rect.y1), NodeType::Line);
            layer.paths.push(path);
        }
        layer
    }

    #[test]
    fn bounds_frame() {
        let frame = compute_frame(
            &layer(Some(Rect::new(10.0, -5.0, 490.0, 705.0))),
            PlacementMode::Bounds,
        )
        .unwrap();
        assert_eq!(Frame::Bounds(Rect::new(10.0, -5.0, 490.0, 705.0)), frame);
        assert_eq!(Point::new(250.0, 350.0), frame.center());
    }

    #[test]
    fn metrics_frame_ignores_outline() {
        let frame = compute_frame(
            &layer(Some(Rect::new(10.0, -5.0, 490.0, 705.0))),
            PlacementMode::Metrics,
        )
        .unwrap();
        assert_eq!(
            Frame::Metrics {
                center: Point::new(250.0, 300.0),
                half_extent: Vec2::new(250.0, 500.0),
            },
            frame
        );
    }

    #[test]
    fn metrics_frame_of_empty_layer() {
        let frame = compute_frame(&layer(None), PlacementMode::Metrics).unwrap();
        assert_eq!(Point::new(250.0, 300.0), frame.center());
    }

    #[test]
    fn bounds_frame_of_empty_layer_fails() {
        let err = compute_frame(&layer(None), PlacementMode::Bounds).unwrap_err();
        assert!(matches!(err, Error::EmptyGeometry { .. }), "{err:?}");
    }

    #[test]
    fn frames_are_not_rounded() {
        let frame = compute_frame(
            &layer(Some(Rect::new(0.0, 0.0, 501.0, 701.0))),
            PlacementMode::Bounds,
        )
        .unwrap();
        assert_eq!(Point::new(250.5, 350.5), frame.center());
    }

    #[rstest]
    #[case("bounds", PlacementMode::Bounds)]
    #[case("0", PlacementMode::Bounds)]
    #[case(" metrics ", PlacementMode::Metrics)]
    #[case("1", PlacementMode::Metrics)]
    fn parse_mode(#[case] raw: &str, #[case] expected: PlacementMode) {
        assert_eq!(expected, raw.parse::<PlacementMode>().unwrap());
    }

    #[test]
    fn parse_bad_mode() {
        assert!(matches!(
            "2".parse::<PlacementMode>(),
            Err(Error::InvalidParameter { .. })
        ));
    }
}

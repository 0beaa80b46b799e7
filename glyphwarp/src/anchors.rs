//! Placing and removing the side-bearing marker anchors.

use std::{collections::BTreeSet, fmt::Display};

use glyphir::Layer;
use kurbo::Point;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    frame::{compute_frame, Frame, PlacementMode},
    params::parse_offset,
};

/// The anchors this crate manages. Any other anchor on a layer is left alone.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SideAnchor {
    #[serde(rename = "LSB")]
    Left,
    #[serde(rename = "RSB")]
    Right,
    #[serde(rename = "TSB")]
    Top,
    #[serde(rename = "BSB")]
    Bottom,
}

impl SideAnchor {
    pub const ALL: [SideAnchor; 4] = [
        SideAnchor::Left,
        SideAnchor::Right,
        SideAnchor::Top,
        SideAnchor::Bottom,
    ];

    /// The anchor name as stored on the layer.
    pub fn name(self) -> &'static str {
        match self {
            SideAnchor::Left => "LSB",
            SideAnchor::Right => "RSB",
            SideAnchor::Top => "TSB",
            SideAnchor::Bottom => "BSB",
        }
    }
}

impl Display for SideAnchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Anchors that are only meaningful together.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnchorPair {
    #[serde(rename = "TSB/BSB")]
    TopBottom,
    #[serde(rename = "LSB/RSB")]
    LeftRight,
}

impl AnchorPair {
    pub fn members(self) -> [SideAnchor; 2] {
        match self {
            AnchorPair::TopBottom => [SideAnchor::Top, SideAnchor::Bottom],
            AnchorPair::LeftRight => [SideAnchor::Left, SideAnchor::Right],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnchorPair::TopBottom => "TSB/BSB",
            AnchorPair::LeftRight => "LSB/RSB",
        }
    }
}

impl Display for AnchorPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Rounds an anchor coordinate to the unit grid.
///
/// Halves round to the even neighbour: 2.5 becomes 2, 3.5 becomes 4.
pub fn round_coord(v: f64) -> f64 {
    v.round_ties_even()
}

/// What to place: offsets for either axis (absent means leave that pair alone) and the frame.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
    pub h_offset: Option<i32>,
    pub v_offset: Option<i32>,
    pub mode: PlacementMode,
}

impl PlacementRequest {
    pub fn new(h_offset: Option<i32>, v_offset: Option<i32>, mode: PlacementMode) -> Self {
        PlacementRequest {
            h_offset,
            v_offset,
            mode,
        }
    }

    /// Build a request from offsets as typed; blank text leaves that axis out.
    pub fn from_text(h_offset: &str, v_offset: &str, mode: PlacementMode) -> Result<Self, Error> {
        Ok(PlacementRequest {
            h_offset: parse_offset("horizontal offset", h_offset)?,
            v_offset: parse_offset("vertical offset", v_offset)?,
            mode,
        })
    }

    /// True if there is nothing to place.
    pub fn is_empty(&self) -> bool {
        self.h_offset.is_none() && self.v_offset.is_none()
    }
}

/// Rounded anchor positions for the requested offsets, in write order.
pub fn placements(
    frame: &Frame,
    h_offset: Option<i32>,
    v_offset: Option<i32>,
) -> Vec<(SideAnchor, Point)> {
    let center = frame.center();
    let mut placed = Vec::with_capacity(4);

    if let Some(h) = h_offset.map(f64::from) {
        let (left, right) = match frame {
            Frame::Bounds(rect) => (rect.x0 - h, rect.x1 + h),
            Frame::Metrics { center, .. } => (center.x - h, center.x + h),
        };
        let y = round_coord(center.y);
        placed.push((SideAnchor::Left, Point::new(round_coord(left), y)));
        placed.push((SideAnchor::Right, Point::new(round_coord(right), y)));
    }

    if let Some(v) = v_offset.map(f64::from) {
        let (top, bottom) = match frame {
            Frame::Bounds(rect) => (rect.y1 + v, rect.y0 - v),
            Frame::Metrics { center, .. } => (center.y + v, center.y - v),
        };
        let x = round_coord(center.x);
        placed.push((SideAnchor::Top, Point::new(x, round_coord(top))));
        placed.push((SideAnchor::Bottom, Point::new(x, round_coord(bottom))));
    }

    placed
}

/// Place the side-bearing anchors requested on `layer`, replacing any of the same name.
///
/// Returns the anchors written. An empty layer is refused with
/// [`Error::EmptyGeometry`] whatever the mode, leaving its anchors untouched.
pub fn place_anchors(
    layer: &mut Layer,
    request: &PlacementRequest,
) -> Result<BTreeSet<SideAnchor>, Error> {
    if request.is_empty() {
        return Ok(BTreeSet::new());
    }
    if layer.is_empty() {
        return Err(Error::EmptyGeometry {
            glyph: layer.glyph_name.clone(),
            layer: layer.name.clone(),
        });
    }

    // Work out every position before writing any, so failure leaves the layer as it was
    let frame = compute_frame(layer, request.mode)?;
    let placed = placements(&frame, request.h_offset, request.v_offset);

    let mut added = BTreeSet::new();
    for (anchor, pos) in placed {
        debug!(
            "'{}' layer '{}': {anchor} at ({}, {}) from {} frame",
            layer.glyph_name,
            layer.name,
            pos.x,
            pos.y,
            request.mode
        );
        layer.anchors.upsert(anchor.name(), pos);
        added.insert(anchor);
    }
    Ok(added)
}

/// Remove every managed anchor present on `layer`, returning those removed.
pub fn delete_anchors(layer: &mut Layer) -> BTreeSet<SideAnchor> {
    SideAnchor::ALL
        .into_iter()
        .filter(|anchor| layer.anchors.remove(anchor.name()).is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use glyphir::{Component, NodeType, Path, VerticalMetrics};
    use kurbo::{Affine, Rect};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn empty_layer(width: f64) -> Layer {
        Layer::new(
            "O",
            "Regular",
            width,
            VerticalMetrics {
                ascender: 800.0,
                descender: -200.0,
            },
        )
    }

    fn boxed_layer(rect: Rect, width: f64) -> Layer {
        let mut layer = empty_layer(width);
        let mut path = Path::new(true);
        path.add((rect.x0, rect.y0), NodeType::Line);
        path.add((rect.x1, rect.y0), NodeType::Line);
        path.add((rect.x1, rect.y1), NodeType::Line);
        path.add((rect.x0, rect.y1), NodeType::Line);
        layer.paths.push(path);
        layer
    }

    fn anchor(layer: &Layer, anchor: SideAnchor) -> Point {
        layer.anchors.get(anchor.name()).unwrap()
    }

    #[test]
    fn place_from_bounds() {
        let mut layer = boxed_layer(Rect::new(0.0, 0.0, 500.0, 700.0), 500.0);
        let added = place_anchors(
            &mut layer,
            &PlacementRequest::new(Some(50), Some(30), PlacementMode::Bounds),
        )
        .unwrap();

        assert_eq!(BTreeSet::from(SideAnchor::ALL), added);
        assert_eq!(Point::new(-50.0, 350.0), anchor(&layer, SideAnchor::Left));
        assert_eq!(Point::new(550.0, 350.0), anchor(&layer, SideAnchor::Right));
        assert_eq!(Point::new(250.0, 730.0), anchor(&layer, SideAnchor::Top));
        assert_eq!(Point::new(250.0, -30.0), anchor(&layer, SideAnchor::Bottom));
    }

    #[test]
    fn place_from_metrics_center() {
        let mut layer = boxed_layer(Rect::new(40.0, 0.0, 460.0, 700.0), 500.0);
        place_anchors(
            &mut layer,
            &PlacementRequest::new(Some(300), Some(600), PlacementMode::Metrics),
        )
        .unwrap();

        assert_eq!(Point::new(-50.0, 300.0), anchor(&layer, SideAnchor::Left));
        assert_eq!(Point::new(550.0, 300.0), anchor(&layer, SideAnchor::Right));
        assert_eq!(Point::new(250.0, 900.0), anchor(&layer, SideAnchor::Top));
        assert_eq!(Point::new(250.0, -300.0), anchor(&layer, SideAnchor::Bottom));
    }

    #[test]
    fn only_horizontal() {
        let mut layer = boxed_layer(Rect::new(0.0, 0.0, 500.0, 700.0), 500.0);
        layer.anchors.upsert("TSB", Point::new(1.0, 1.0));
        let added = place_anchors(
            &mut layer,
            &PlacementRequest::new(Some(10), None, PlacementMode::Bounds),
        )
        .unwrap();
        assert_eq!(
            BTreeSet::from([SideAnchor::Left, SideAnchor::Right]),
            added
        );
        // the vertical pair is left as it was
        assert_eq!(Point::new(1.0, 1.0), anchor(&layer, SideAnchor::Top));
        assert!(!layer.anchors.contains("BSB"));
    }

    #[test]
    fn no_offsets_is_a_noop() {
        let mut layer = empty_layer(500.0);
        let added = place_anchors(&mut layer, &PlacementRequest::default()).unwrap();
        assert!(added.is_empty());
        assert!(layer.anchors.is_empty());
    }

    #[rstest]
    #[case(PlacementMode::Bounds)]
    #[case(PlacementMode::Metrics)]
    fn empty_layer_is_skipped(#[case] mode: PlacementMode) {
        let mut layer = empty_layer(500.0);
        layer.anchors.upsert("LSB", Point::new(-5.0, 0.0));
        let err = place_anchors(&mut layer, &PlacementRequest::new(Some(5), Some(5), mode))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyGeometry { .. }), "{err:?}");
        // nothing added or removed
        assert_eq!(1, layer.anchors.len());
        assert_eq!(Point::new(-5.0, 0.0), anchor(&layer, SideAnchor::Left));
    }

    #[test]
    fn component_only_layer_is_placed() {
        let mut layer = empty_layer(600.0);
        layer.components.push(Component {
            base: "A".into(),
            transform: Affine::IDENTITY,
            bounds: Some(Rect::new(10.0, 0.0, 590.0, 700.0)),
        });
        place_anchors(
            &mut layer,
            &PlacementRequest::new(Some(20), None, PlacementMode::Bounds),
        )
        .unwrap();
        assert_eq!(Point::new(-10.0, 350.0), anchor(&layer, SideAnchor::Left));
        assert_eq!(Point::new(610.0, 350.0), anchor(&layer, SideAnchor::Right));
    }

    #[test]
    fn replaces_existing_and_keeps_others() {
        let mut layer = boxed_layer(Rect::new(0.0, 0.0, 500.0, 700.0), 500.0);
        layer.anchors.upsert("top", Point::new(250.0, 700.0));
        layer.anchors.upsert("LSB", Point::new(-999.0, 0.0));
        place_anchors(
            &mut layer,
            &PlacementRequest::new(Some(50), None, PlacementMode::Bounds),
        )
        .unwrap();
        assert_eq!(3, layer.anchors.len());
        assert_eq!(Point::new(-50.0, 350.0), anchor(&layer, SideAnchor::Left));
        assert_eq!(Some(Point::new(250.0, 700.0)), layer.anchors.get("top"));
    }

    #[test]
    fn half_units_round_to_even() {
        // center at (250.5, 350.5)
        let mut layer = boxed_layer(Rect::new(0.0, 0.0, 501.0, 701.0), 501.0);
        place_anchors(
            &mut layer,
            &PlacementRequest::new(Some(0), Some(0), PlacementMode::Bounds),
        )
        .unwrap();
        assert_eq!(Point::new(0.0, 350.0), anchor(&layer, SideAnchor::Left));
        assert_eq!(Point::new(250.0, 701.0), anchor(&layer, SideAnchor::Top));
    }

    #[rstest]
    #[case(2.5, 2.0)]
    #[case(3.5, 4.0)]
    #[case(-2.5, -2.0)]
    #[case(251.5, 252.0)]
    #[case(2.4999, 2.0)]
    #[case(-0.6, -1.0)]
    fn round_coord_ties(#[case] raw: f64, #[case] expected: f64) {
        assert_eq!(expected, round_coord(raw));
    }

    #[test]
    fn request_from_text() {
        let request = PlacementRequest::from_text(" 50", "", PlacementMode::Metrics).unwrap();
        assert_eq!(
            PlacementRequest::new(Some(50), None, PlacementMode::Metrics),
            request
        );
        assert!(PlacementRequest::from_text("", " ", PlacementMode::Bounds)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn request_from_bad_text() {
        let err = PlacementRequest::from_text("50", "3O", PlacementMode::Bounds).unwrap_err();
        assert_eq!("Invalid vertical offset: '3O'", err.to_string());
    }

    #[test]
    fn delete_is_idempotent() {
        let mut layer = boxed_layer(Rect::new(0.0, 0.0, 500.0, 700.0), 500.0);
        layer.anchors.upsert("bottom", Point::new(250.0, 0.0));
        place_anchors(
            &mut layer,
            &PlacementRequest::new(Some(50), Some(50), PlacementMode::Bounds),
        )
        .unwrap();

        assert_eq!(BTreeSet::from(SideAnchor::ALL), delete_anchors(&mut layer));
        let after_once = layer.anchors.clone();
        assert!(delete_anchors(&mut layer).is_empty());
        assert_eq!(after_once, layer.anchors);
        assert_eq!(
            vec![("bottom", Point::new(250.0, 0.0))],
            layer.anchors.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn delete_reports_only_present() {
        let mut layer = empty_layer(500.0);
        layer.anchors.upsert("RSB", Point::new(510.0, 0.0));
        assert_eq!(
            BTreeSet::from([SideAnchor::Right]),
            delete_anchors(&mut layer)
        );
    }

    #[test]
    fn pair_labels() {
        assert_eq!("TSB/BSB", AnchorPair::TopBottom.to_string());
        assert_eq!("LSB/RSB", AnchorPair::LeftRight.to_string());
        assert_eq!(
            [SideAnchor::Left, SideAnchor::Right],
            AnchorPair::LeftRight.members()
        );
    }
}

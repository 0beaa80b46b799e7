//! Recovering side bearings from the side-bearing anchors.
//!
//! Side bearings are always measured from the current bounding box of the
//! outline, whichever frame the anchors were placed in.

use std::{collections::BTreeSet, fmt::Display};

use glyphir::{GlyphName, Layer};
use indexmap::IndexMap;
use kurbo::Point;
use log::debug;

use crate::{
    anchors::{AnchorPair, SideAnchor},
    error::Error,
    frame::layer_bounds,
};

fn require_anchor(layer: &Layer, anchor: SideAnchor) -> Result<Point, Error> {
    layer
        .anchors
        .get(anchor.name())
        .ok_or_else(|| Error::MissingAnchor {
            glyph: layer.glyph_name.clone(),
            layer: layer.name.clone(),
            anchor: anchor.name().into(),
        })
}

/// Top and bottom side bearings implied by the TSB and BSB anchors.
pub fn fit_height(layer: &Layer) -> Result<(f64, f64), Error> {
    let tsb = require_anchor(layer, SideAnchor::Top)?;
    let bsb = require_anchor(layer, SideAnchor::Bottom)?;
    let bounds = layer_bounds(layer)?;
    Ok((tsb.y - bounds.y1, bounds.y0 - bsb.y))
}

/// Left and right side bearings implied by the LSB and RSB anchors.
pub fn fit_width(layer: &Layer) -> Result<(f64, f64), Error> {
    let lsb = require_anchor(layer, SideAnchor::Left)?;
    let rsb = require_anchor(layer, SideAnchor::Right)?;
    let bounds = layer_bounds(layer)?;
    Ok((bounds.x0 - lsb.x, rsb.x - bounds.x1))
}

/// [`fit_height`], storing the result as the layer's top and bottom side bearings.
pub fn apply_fit_height(layer: &mut Layer) -> Result<(f64, f64), Error> {
    let (top, bottom) = fit_height(layer)?;
    debug!(
        "'{}' layer '{}': TSB {top}, BSB {bottom}",
        layer.glyph_name, layer.name
    );
    layer.side_bearings.top = Some(top);
    layer.side_bearings.bottom = Some(bottom);
    Ok((top, bottom))
}

/// [`fit_width`], storing the result as the layer's left and right side bearings.
pub fn apply_fit_width(layer: &mut Layer) -> Result<(f64, f64), Error> {
    let (left, right) = fit_width(layer)?;
    debug!(
        "'{}' layer '{}': LSB {left}, RSB {right}",
        layer.glyph_name, layer.name
    );
    layer.side_bearings.left = Some(left);
    layer.side_bearings.right = Some(right);
    Ok((left, right))
}

/// The pairs with at least one anchor missing on `layer`.
pub fn missing_pairs(layer: &Layer) -> BTreeSet<AnchorPair> {
    [AnchorPair::TopBottom, AnchorPair::LeftRight]
        .into_iter()
        .filter(|pair| {
            pair.members()
                .iter()
                .any(|anchor| !layer.anchors.contains(anchor.name()))
        })
        .collect()
}

/// Glyphs lacking a complete anchor pair, in the order they were checked.
///
/// Glyphs with nothing missing are not listed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PairReport(IndexMap<GlyphName, BTreeSet<AnchorPair>>);

impl PairReport {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, glyph: &str) -> Option<&BTreeSet<AnchorPair>> {
        self.0.get(glyph)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GlyphName, &BTreeSet<AnchorPair>)> {
        self.0.iter()
    }
}

impl Display for PairReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("All selected glyphs contain both anchor pairs.");
        }
        f.write_str("Missing anchor pairs:\n")?;
        for (glyph, pairs) in self.iter() {
            let labels: Vec<_> = pairs.iter().map(|p| p.label()).collect();
            write!(f, "\n{glyph}: missing {}", labels.join(", "))?;
        }
        Ok(())
    }
}

/// Which glyphs lack a complete TSB/BSB or LSB/RSB pair.
///
/// Layers of the same glyph are merged. Read only.
pub fn check_anchor_pairs<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> PairReport {
    let mut report = PairReport::default();
    for layer in layers {
        let missing = missing_pairs(layer);
        if missing.is_empty() {
            continue;
        }
        report
            .0
            .entry(layer.glyph_name.clone())
            .or_default()
            .extend(missing);
    }
    report
}

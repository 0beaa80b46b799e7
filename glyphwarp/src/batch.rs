//! Applying an operation to every selected layer.
//!
//! A layer that can't take the operation is reported and skipped, the rest
//! are still processed. Parameters are validated by the caller before a batch
//! starts, so no batch aborts part way through.

use std::{collections::BTreeSet, fmt::Debug};

use glyphir::{GlyphName, Layer};
use log::{error, info, warn};
use smol_str::SmolStr;

use crate::{
    anchors::{delete_anchors, place_anchors, PlacementRequest, SideAnchor},
    deform::{deform_layer, BumpParams},
    error::Error,
    fit::{apply_fit_height, apply_fit_width},
};

/// What happened to one layer of a batch.
#[derive(Debug)]
pub struct LayerOutcome<T> {
    pub glyph: GlyphName,
    pub layer: SmolStr,
    pub result: Result<T, Error>,
}

impl<T> LayerOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Number of layers that succeeded and that were skipped.
pub fn tally<T>(outcomes: &[LayerOutcome<T>]) -> (usize, usize) {
    let ok = outcomes.iter().filter(|o| o.is_ok()).count();
    (ok, outcomes.len() - ok)
}

fn run_each<'a, T: Debug>(
    what: &str,
    layers: impl IntoIterator<Item = &'a mut Layer>,
    mut op: impl FnMut(&mut Layer) -> Result<T, Error>,
) -> Vec<LayerOutcome<T>> {
    let outcomes: Vec<_> = layers
        .into_iter()
        .map(|layer| {
            let result = op(layer);
            match &result {
                Ok(value) => info!(
                    "{what} '{}' layer '{}': {value:?}",
                    layer.glyph_name, layer.name
                ),
                Err(e) if e.is_per_layer() => warn!(
                    "{what} skipped '{}' layer '{}': {e}",
                    layer.glyph_name, layer.name
                ),
                Err(e) => error!(
                    "{what} failed on '{}' layer '{}': {e}",
                    layer.glyph_name, layer.name
                ),
            }
            LayerOutcome {
                glyph: layer.glyph_name.clone(),
                layer: layer.name.clone(),
                result,
            }
        })
        .collect();
    let (ok, skipped) = tally(&outcomes);
    info!("{what}: {ok} layers done, {skipped} skipped");
    outcomes
}

/// Place side-bearing anchors on every layer.
///
/// A request with neither offset does nothing at all.
pub fn place_all<'a>(
    layers: impl IntoIterator<Item = &'a mut Layer>,
    request: &PlacementRequest,
) -> Vec<LayerOutcome<BTreeSet<SideAnchor>>> {
    if request.is_empty() {
        info!("No offsets given, nothing to place");
        return Vec::new();
    }
    run_each("place", layers, |layer| place_anchors(layer, request))
}

/// Remove the side-bearing anchors from every layer. Never fails.
pub fn delete_all<'a>(
    layers: impl IntoIterator<Item = &'a mut Layer>,
) -> Vec<LayerOutcome<BTreeSet<SideAnchor>>> {
    run_each("delete", layers, |layer| Ok(delete_anchors(layer)))
}

/// Set top and bottom side bearings of every layer from its anchors.
pub fn fit_height_all<'a>(
    layers: impl IntoIterator<Item = &'a mut Layer>,
) -> Vec<LayerOutcome<(f64, f64)>> {
    run_each("fit height", layers, apply_fit_height)
}

/// Set left and right side bearings of every layer from its anchors.
pub fn fit_width_all<'a>(
    layers: impl IntoIterator<Item = &'a mut Layer>,
) -> Vec<LayerOutcome<(f64, f64)>> {
    run_each("fit width", layers, apply_fit_width)
}

/// Deform every layer with the same parameters.
pub fn deform_all<'a>(
    layers: impl IntoIterator<Item = &'a mut Layer>,
    params: BumpParams,
) -> Vec<LayerOutcome<BumpParams>> {
    run_each("bump", layers, |layer| deform_layer(layer, params))
}

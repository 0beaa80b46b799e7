//! Runs one [`Operation`] over a layer file.

use std::{fs, path::Path};

use glyphir::Layer;
use log::{debug, info};
use regex::Regex;

use crate::{
    anchors::PlacementRequest,
    args::{Args, Operation},
    batch::{
        delete_all, deform_all, fit_height_all, fit_width_all, place_all, tally, LayerOutcome,
    },
    deform::{BumpField, BumpParams},
    error::Error,
    fit::check_anchor_pairs,
};

pub fn load_layers(path: &Path) -> Result<Vec<Layer>, Error> {
    let raw = fs::read_to_string(path).map_err(|source| Error::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_yaml::from_str(&raw)?)
}

pub fn save_layers(path: &Path, layers: &[Layer]) -> Result<(), Error> {
    let raw = serde_yaml::to_string(layers)?;
    fs::write(path, raw).map_err(|source| Error::FileIo {
        path: path.to_path_buf(),
        source,
    })
}

fn bump_params(ky: &str, kx: &str, y_offset: &str, x_offset: &str) -> Result<BumpParams, Error> {
    BumpParams::default()
        .with_text(BumpField::Ky, ky)?
        .with_text(BumpField::Kx, kx)?
        .with_text(BumpField::YOffset, y_offset)?
        .with_text(BumpField::XOffset, x_offset)
}

/// An [`Operation`] with every typed value parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Plan {
    Place(PlacementRequest),
    Delete,
    FitHeight,
    FitWidth,
    Check,
    Bump(BumpParams),
}

impl Plan {
    fn new(operation: &Operation) -> Result<Plan, Error> {
        Ok(match operation {
            Operation::Place {
                h_offset,
                v_offset,
                mode,
            } => Plan::Place(PlacementRequest::from_text(h_offset, v_offset, *mode)?),
            Operation::Delete => Plan::Delete,
            Operation::FitHeight => Plan::FitHeight,
            Operation::FitWidth => Plan::FitWidth,
            Operation::Check => Plan::Check,
            Operation::Bump {
                ky,
                kx,
                y_offset,
                x_offset,
            } => Plan::Bump(bump_params(ky, kx, y_offset, x_offset)?),
        })
    }
}

fn summarize<T>(what: &str, outcomes: &[LayerOutcome<T>]) -> String {
    let (ok, skipped) = tally(outcomes);
    let mut summary = format!("{what}: {ok} layers done, {skipped} skipped");
    for outcome in outcomes {
        if let Err(e) = &outcome.result {
            summary.push_str(&format!("\n  {e}"));
        }
    }
    summary
}

fn is_selected(layer: &Layer, filter: Option<&Regex>) -> bool {
    filter.map_or(true, |re| re.is_match(layer.glyph_name.as_str()))
}

fn select<'a>(
    layers: &'a mut [Layer],
    filter: Option<&'a Regex>,
) -> impl Iterator<Item = &'a mut Layer> + 'a {
    layers
        .iter_mut()
        .filter(move |layer| is_selected(layer, filter))
}

/// Load the layers, apply the operation to those selected and save.
///
/// Returns a summary for the user. Bad parameters fail before anything is
/// loaded; problems with individual layers are listed in the summary.
pub fn run(args: &Args) -> Result<String, Error> {
    let glyph_name_filter = args
        .glyph_name_filter
        .as_deref()
        .map(Regex::new)
        .transpose()?;
    let plan = Plan::new(&args.operation)?;
    if let Plan::Place(request) = plan {
        if request.is_empty() {
            return Ok("Nothing to do: no offsets given".to_string());
        }
    }

    let mut layers = load_layers(&args.source)?;
    info!("Loaded {} layers from {:?}", layers.len(), args.source);

    let filter = glyph_name_filter.as_ref();
    let summary = match plan {
        Plan::Check => {
            let report = check_anchor_pairs(layers.iter().filter(|l| is_selected(l, filter)));
            return Ok(report.to_string());
        }
        Plan::Place(request) => {
            summarize("place", &place_all(select(&mut layers, filter), &request))
        }
        Plan::Delete => summarize("delete", &delete_all(select(&mut layers, filter))),
        Plan::FitHeight => {
            summarize("fit height", &fit_height_all(select(&mut layers, filter)))
        }
        Plan::FitWidth => summarize("fit width", &fit_width_all(select(&mut layers, filter))),
        Plan::Bump(params) => {
            summarize("bump", &deform_all(select(&mut layers, filter), params))
        }
    };

    let output = args.output.as_deref().unwrap_or(&args.source);
    save_layers(output, &layers)?;
    debug!("Wrote {:?}", output);
    Ok(summary)
}

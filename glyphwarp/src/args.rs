//! Command line arguments

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::frame::PlacementMode;

/// Side-bearing anchors, metrics fitting and bump deformation for a file of glyph layers.
#[derive(Serialize, Deserialize, Parser, Debug, Clone, PartialEq)]
pub struct Args {
    /// A yaml file holding a list of glyph layers
    #[arg(short, long)]
    pub source: PathBuf,

    /// Where to write the edited layers. Defaults to overwriting the source.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Glyph names must match this regex to be processed
    #[arg(short, long)]
    #[clap(default_value = None)]
    pub glyph_name_filter: Option<String>,

    #[command(subcommand)]
    pub operation: Operation,
}

/// What to do to the selected layers.
///
/// Values are taken as text and validated before any layer is touched.
#[derive(Serialize, Deserialize, Subcommand, Debug, Clone, PartialEq)]
pub enum Operation {
    /// Place LSB/RSB and TSB/BSB anchors at an offset from the outline or the metrics
    Place {
        /// Horizontal offset for LSB and RSB. Leave blank to skip them.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        h_offset: String,

        /// Vertical offset for TSB and BSB. Leave blank to skip them.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        v_offset: String,

        /// What offsets are measured from
        #[arg(short, long, value_enum, default_value_t = PlacementMode::Bounds)]
        mode: PlacementMode,
    },
    /// Remove the side-bearing anchors
    Delete,
    /// Set top and bottom side bearings from the TSB and BSB anchors
    FitHeight,
    /// Set left and right side bearings from the LSB and RSB anchors
    FitWidth,
    /// List glyphs missing a complete anchor pair. Writes nothing.
    Check,
    /// Apply a bump deformation
    Bump {
        /// Vertical coefficient, clamped to [-1, 1]
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        ky: String,

        /// Horizontal coefficient, clamped to [-1, 1]
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        kx: String,

        /// Vertical shift of the deformation center, clamped to [-500, 500]
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        y_offset: String,

        /// Horizontal shift of the deformation center, clamped to [-500, 500]
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x_offset: String,
    },
}

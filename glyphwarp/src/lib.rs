//! Side-bearing anchors, metrics fitting and bump deformation for glyph layers.
//!
//! Anchors named `LSB`, `RSB`, `TSB` and `BSB` mark where a glyph's side
//! bearings should be. They can be placed at an offset from the outline or
//! from the glyph metrics, read back into side bearings, and checked for
//! completeness. Separately a layer can be warped by a reversible bump
//! deformation driven by live parameters.

pub mod anchors;
pub mod batch;
pub mod deform;
pub mod error;
pub mod fit;
pub mod frame;
pub mod params;

#[cfg(feature = "cli")]
mod args;
#[cfg(feature = "cli")]
mod command;

#[cfg(feature = "cli")]
pub use args::{Args, Operation};
#[cfg(feature = "cli")]
pub use command::{load_layers, run, save_layers};
pub use error::Error;

use std::{io, path::PathBuf};

use glyphir::{error::PathConversionError, GlyphName};
use smol_str::SmolStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("'{glyph}' layer '{layer}' has no paths or components")]
    EmptyGeometry { glyph: GlyphName, layer: SmolStr },
    #[error("'{glyph}' layer '{layer}' has no {anchor} anchor")]
    MissingAnchor {
        glyph: GlyphName,
        layer: SmolStr,
        anchor: SmolStr,
    },
    #[error("'{glyph}' layer '{layer}' has degenerate metrics: width {width}, height {height}")]
    DegenerateMetrics {
        glyph: GlyphName,
        layer: SmolStr,
        width: f64,
        height: f64,
    },
    #[error("Invalid {what}: '{value}'")]
    InvalidParameter { what: SmolStr, value: String },
    #[error("'{glyph}' layer '{layer}' has no paths to deform")]
    EmptySession { glyph: GlyphName, layer: SmolStr },
    #[error("'{glyph}' layer '{layer}' no longer matches its snapshot: {reason}")]
    SnapshotMismatch {
        glyph: GlyphName,
        layer: SmolStr,
        reason: String,
    },
    #[error("'{glyph}' layer '{layer}' has a malformed path: {source}")]
    BadPath {
        glyph: GlyphName,
        layer: SmolStr,
        #[source]
        source: PathConversionError,
    },
    #[error("io failed for '{path}': '{source}'")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    YamlSerError(#[from] serde_yaml::Error),
    #[cfg(feature = "cli")]
    #[error("Bad glyph name filter: {0}")]
    BadRegex(#[from] regex::Error),
}

impl Error {
    /// True for problems confined to one layer; a batch records them and moves on.
    pub fn is_per_layer(&self) -> bool {
        matches!(
            self,
            Error::EmptyGeometry { .. }
                | Error::MissingAnchor { .. }
                | Error::DegenerateMetrics { .. }
                | Error::EmptySession { .. }
                | Error::SnapshotMismatch { .. }
                | Error::BadPath { .. }
        )
    }
}

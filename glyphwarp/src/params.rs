//! Parsing of values typed in by a user.
//!
//! Everything here runs before any layer is touched, so a typo aborts the
//! whole operation instead of leaving some layers edited and others not.

use crate::error::Error;

/// Parse an integer offset; blank text means the offset was left out.
pub fn parse_offset(what: &str, text: &str) -> Result<Option<i32>, Error> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i32>()
        .map(Some)
        .map_err(|_| Error::InvalidParameter {
            what: what.into(),
            value: text.to_string(),
        })
}

/// Parse a finite real number.
pub fn parse_real(what: &str, text: &str) -> Result<f64, Error> {
    let text = text.trim();
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidParameter {
            what: what.into(),
            value: text.to_string(),
        }),
    }
}

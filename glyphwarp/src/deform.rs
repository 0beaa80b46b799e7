//! The bump deformation: a reversible, non-uniform warp of every node of a layer.
//!
//! Nodes are displaced in proportion to their offset from a deformation
//! center, on both axes at once:
//!
//! ```text
//! y' = y + ky * (x - Xc) * (y - Yc) / Yh
//! x' = x + kx * (x - Xc) * (y - Yc) / Xh
//! ```
//!
//! where `(Xc, Yc)` is the center of the advance and the ascender/descender
//! body moved by the x and y offsets, and `(Xh, Yh)` are the half extents of
//! that body (offsets do not move them).
//!
//! Coordinates are always recomputed from a [`Snapshot`] of the original
//! nodes, never from what is currently displayed, so dragging a parameter
//! back and forth accumulates no error.

use glyphir::{GlyphName, Layer, MetricsContext};
use kurbo::{Point, Vec2};
use log::info;
use smol_str::SmolStr;

use crate::{error::Error, frame::metrics_body, params::parse_real};

/// Limit on the magnitude of `ky` and `kx`.
pub const COEFFICIENT_LIMIT: f64 = 1.0;
/// Limit on the magnitude of the center offsets.
pub const OFFSET_LIMIT: f64 = 500.0;

/// One of the four parameters, for reporting and for text entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BumpField {
    Ky,
    Kx,
    YOffset,
    XOffset,
}

impl BumpField {
    pub fn name(self) -> &'static str {
        match self {
            BumpField::Ky => "ky",
            BumpField::Kx => "kx",
            BumpField::YOffset => "y offset",
            BumpField::XOffset => "x offset",
        }
    }

    fn limit(self) -> f64 {
        match self {
            BumpField::Ky | BumpField::Kx => COEFFICIENT_LIMIT,
            BumpField::YOffset | BumpField::XOffset => OFFSET_LIMIT,
        }
    }

    fn clamp(self, value: f64) -> f64 {
        value.clamp(-self.limit(), self.limit())
    }
}

/// The live parameters of a deformation, always within their limits.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct BumpParams {
    ky: f64,
    kx: f64,
    y_offset: f64,
    x_offset: f64,
}

impl BumpParams {
    /// Out of range values are clamped; only non-finite values are refused.
    pub fn new(ky: f64, kx: f64, y_offset: f64, x_offset: f64) -> Result<BumpParams, Error> {
        let mut params = BumpParams::default();
        for (field, value) in [
            (BumpField::Ky, ky),
            (BumpField::Kx, kx),
            (BumpField::YOffset, y_offset),
            (BumpField::XOffset, x_offset),
        ] {
            params = params.with(field, value)?;
        }
        Ok(params)
    }

    /// A copy with `field` set to `value`, clamped.
    pub fn with(mut self, field: BumpField, value: f64) -> Result<BumpParams, Error> {
        if !value.is_finite() {
            return Err(Error::InvalidParameter {
                what: field.name().into(),
                value: value.to_string(),
            });
        }
        let value = field.clamp(value);
        match field {
            BumpField::Ky => self.ky = value,
            BumpField::Kx => self.kx = value,
            BumpField::YOffset => self.y_offset = value,
            BumpField::XOffset => self.x_offset = value,
        }
        Ok(self)
    }

    /// A copy with `field` set from free text entry.
    ///
    /// Text that isn't a number is an error and nothing changes.
    pub fn with_text(self, field: BumpField, text: &str) -> Result<BumpParams, Error> {
        self.with(field, parse_real(field.name(), text)?)
    }

    pub fn get(&self, field: BumpField) -> f64 {
        match field {
            BumpField::Ky => self.ky,
            BumpField::Kx => self.kx,
            BumpField::YOffset => self.y_offset,
            BumpField::XOffset => self.x_offset,
        }
    }

    pub fn ky(&self) -> f64 {
        self.ky
    }

    pub fn kx(&self) -> f64 {
        self.kx
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }

    pub fn x_offset(&self) -> f64 {
        self.x_offset
    }
}

/// The deformation as a point function, for one glyph's metrics and one parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BumpTransform {
    center: Point,
    half_extent: Vec2,
    ky: f64,
    kx: f64,
}

impl BumpTransform {
    /// None for a zero width or zero height body, where the warp is undefined.
    pub fn new(metrics: MetricsContext, params: BumpParams) -> Option<BumpTransform> {
        let (center, half_extent) = metrics_body(metrics);
        if half_extent.x == 0.0 || half_extent.y == 0.0 {
            return None;
        }
        Some(BumpTransform {
            center: center + Vec2::new(params.x_offset, params.y_offset),
            half_extent,
            ky: params.ky,
            kx: params.kx,
        })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn apply(&self, p: Point) -> Point {
        let d = p - self.center;
        // Expanded so that k = 0 leaves the coordinate bit-for-bit unchanged
        Point::new(
            p.x + self.kx * d.x * d.y / self.half_extent.x,
            p.y + self.ky * d.x * d.y / self.half_extent.y,
        )
    }
}

/// Node coordinates of a layer, per path in path order.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot(Vec<Vec<Point>>);

impl Snapshot {
    pub fn capture(layer: &Layer) -> Snapshot {
        Snapshot(
            layer
                .paths
                .iter()
                .map(|path| path.nodes.iter().map(|node| node.point()).collect())
                .collect(),
        )
    }

    /// Why `layer` can't be written from this snapshot, if it can't.
    fn mismatch(&self, layer: &Layer) -> Option<String> {
        if layer.paths.len() != self.0.len() {
            return Some(format!(
                "{} paths, expected {}",
                layer.paths.len(),
                self.0.len()
            ));
        }
        layer
            .paths
            .iter()
            .zip(self.0.iter())
            .enumerate()
            .find(|(_, (path, points))| path.nodes.len() != points.len())
            .map(|(i, (path, points))| {
                format!(
                    "path {i} has {} nodes, expected {}",
                    path.nodes.len(),
                    points.len()
                )
            })
    }

    /// Write every node of `layer` as `f` of its snapshot position.
    ///
    /// Callers have checked the layer matches.
    fn write(&self, layer: &mut Layer, f: impl Fn(Point) -> Point) {
        for (path, points) in layer.paths.iter_mut().zip(self.0.iter()) {
            for (node, p) in path.nodes.iter_mut().zip(points.iter()) {
                node.set_point(f(*p));
            }
        }
    }
}

/// An editing session: a snapshot of a layer's nodes and the parameters currently shown.
///
/// Holding no session is the idle state. Committing keeps the session but
/// rebases it on the current coordinates with zeroed parameters, as if a new
/// session had begun.
#[derive(Debug, Clone)]
pub struct DeformSession {
    glyph: GlyphName,
    layer: SmolStr,
    snapshot: Snapshot,
    params: BumpParams,
}

impl DeformSession {
    /// Capture `layer` for deformation. A layer without paths has nothing to deform.
    pub fn begin(layer: &Layer) -> Result<DeformSession, Error> {
        if layer.paths.is_empty() {
            return Err(Error::EmptySession {
                glyph: layer.glyph_name.clone(),
                layer: layer.name.clone(),
            });
        }
        Ok(DeformSession {
            glyph: layer.glyph_name.clone(),
            layer: layer.name.clone(),
            snapshot: Snapshot::capture(layer),
            params: BumpParams::default(),
        })
    }

    pub fn params(&self) -> BumpParams {
        self.params
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn check(&self, layer: &Layer) -> Result<(), Error> {
        let reason = if layer.glyph_name != self.glyph || layer.name != self.layer {
            Some(format!(
                "session began on '{}' layer '{}'",
                self.glyph, self.layer
            ))
        } else {
            self.snapshot.mismatch(layer)
        };
        match reason {
            Some(reason) => Err(Error::SnapshotMismatch {
                glyph: layer.glyph_name.clone(),
                layer: layer.name.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Show `params`: recompute every node of `layer` from the snapshot.
    ///
    /// Either every node is written or, on error, none is.
    pub fn set_parameters(&mut self, layer: &mut Layer, params: BumpParams) -> Result<(), Error> {
        self.check(layer)?;
        let metrics = layer.metrics_context();
        let transform =
            BumpTransform::new(metrics, params).ok_or_else(|| Error::DegenerateMetrics {
                glyph: self.glyph.clone(),
                layer: self.layer.clone(),
                width: metrics.width,
                height: metrics.ascender - metrics.descender,
            })?;
        self.snapshot.write(layer, |p| transform.apply(p));
        self.params = params;
        Ok(())
    }

    /// Put the snapshot coordinates back and zero the parameters.
    pub fn reset(&mut self, layer: &mut Layer) -> Result<(), Error> {
        self.check(layer)?;
        self.snapshot.write(layer, |p| p);
        self.params = BumpParams::default();
        Ok(())
    }

    /// Accept what is shown: the current coordinates become the new snapshot.
    ///
    /// Returns the parameters that were committed.
    pub fn commit(&mut self, layer: &Layer) -> Result<BumpParams, Error> {
        self.check(layer)?;
        let committed = self.params;
        info!(
            "'{}' layer '{}': applied ky={:.2}, kx={:.2}, y offset {:.0}, x offset {:.0}",
            self.glyph,
            self.layer,
            committed.ky,
            committed.kx,
            committed.y_offset,
            committed.x_offset
        );
        self.snapshot = Snapshot::capture(layer);
        self.params = BumpParams::default();
        Ok(committed)
    }
}

/// Deform `layer` in one step: begin a session, show `params` and commit.
pub fn deform_layer(layer: &mut Layer, params: BumpParams) -> Result<BumpParams, Error> {
    let mut session = DeformSession::begin(layer)?;
    session.set_parameters(layer, params)?;
    session.commit(layer)
}

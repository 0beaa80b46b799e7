//! Turns a contour stored as typed nodes into a bezier path.
//!
//! Layers store contours the way font editors do: a list of points, each
//! tagged on- or off-curve. Measuring a contour (its true extent, not the
//! extent of its control points) is much easier on a [`BezPath`], so this
//! module provides the conversion.

use kurbo::{BezPath, PathEl, Point};

use crate::{error::PathConversionError, layer::NodeType};

/// The kind of segment that ends on an on-curve point.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Segment {
    Line,
    Cubic,
    Quad,
}

impl Segment {
    fn of(typ: NodeType) -> Option<Segment> {
        match typ {
            NodeType::Line | NodeType::LineSmooth => Some(Segment::Line),
            NodeType::Curve | NodeType::CurveSmooth => Some(Segment::Cubic),
            NodeType::QCurve | NodeType::QCurveSmooth => Some(Segment::Quad),
            NodeType::OffCurve => None,
        }
    }
}

/// Builds one [`BezPath`] contour from a stream of typed nodes.
///
/// An open contour starts at its first node, which must be on-curve. A closed
/// contour is cyclic: it has no preferred start, so any off-curve points seen
/// before the first on-curve are carried around to the end and the contour is
/// drawn starting from the first on-curve point.
#[derive(Debug)]
pub struct GlyphPathBuilder {
    closed: bool,
    pending: Vec<Point>,
    leading: Vec<Point>,
    elements: Vec<PathEl>,
    start: Option<(Segment, Point)>,
}

impl GlyphPathBuilder {
    pub fn new(closed: bool, estimated_num_nodes: usize) -> GlyphPathBuilder {
        GlyphPathBuilder {
            closed,
            pending: Vec::with_capacity(2),
            leading: Vec::new(),
            // closing a contour usually adds a segment and a ClosePath
            elements: Vec::with_capacity(estimated_num_nodes + 2),
            start: None,
        }
    }

    /// Feed the next node of the contour.
    pub fn push(&mut self, typ: NodeType, p: impl Into<Point>) -> Result<(), PathConversionError> {
        let p = p.into();
        match Segment::of(typ) {
            Some(segment) => self.oncurve(segment, p),
            None => {
                self.offcurve(p);
                Ok(())
            }
        }
    }

    pub fn offcurve(&mut self, p: impl Into<Point>) {
        if self.start.is_some() {
            self.pending.push(p.into());
        } else {
            self.leading.push(p.into());
        }
    }

    pub fn line_to(&mut self, p: impl Into<Point>) -> Result<(), PathConversionError> {
        self.oncurve(Segment::Line, p.into())
    }

    /// Cubic curve to `p` through the pending off-curves.
    ///
    /// Zero off-curves make a line and one makes a quadratic; more than two is an error.
    pub fn curve_to(&mut self, p: impl Into<Point>) -> Result<(), PathConversionError> {
        self.oncurve(Segment::Cubic, p.into())
    }

    /// Quadratic spline to `p`, with implied on-curves between consecutive off-curves.
    pub fn qcurve_to(&mut self, p: impl Into<Point>) -> Result<(), PathConversionError> {
        self.oncurve(Segment::Quad, p.into())
    }

    fn oncurve(&mut self, segment: Segment, p: Point) -> Result<(), PathConversionError> {
        if self.start.is_none() {
            if !self.closed && !self.leading.is_empty() {
                return Err(PathConversionError::OpenContourStartsOffcurve {
                    points: std::mem::take(&mut self.leading),
                });
            }
            self.elements.push(PathEl::MoveTo(p));
            self.start = Some((segment, p));
            return Ok(());
        }
        self.segment_to(segment, p)
    }

    fn segment_to(&mut self, segment: Segment, p: Point) -> Result<(), PathConversionError> {
        match (segment, self.pending.as_slice()) {
            (_, []) => self.elements.push(PathEl::LineTo(p)),
            (Segment::Line, offcurves) => {
                return Err(PathConversionError::OffcurveBeforeLine {
                    points: offcurves.to_vec(),
                })
            }
            (Segment::Cubic, [c]) => self.elements.push(PathEl::QuadTo(*c, p)),
            (Segment::Cubic, [c0, c1]) => self.elements.push(PathEl::CurveTo(*c0, *c1, p)),
            (Segment::Cubic, offcurves) => {
                return Err(PathConversionError::TooManyOffcurvePoints {
                    num_offcurve: offcurves.len(),
                    points: offcurves.to_vec(),
                })
            }
            (Segment::Quad, [rest @ .., last]) => {
                let mut prev = rest.first().copied();
                for c in rest.iter().skip(1).chain(std::iter::once(last)) {
                    if let Some(q) = prev {
                        self.elements.push(PathEl::QuadTo(q, q.midpoint(*c)));
                    }
                    prev = Some(*c);
                }
                self.elements.push(PathEl::QuadTo(*last, p));
            }
        }
        self.pending.clear();
        Ok(())
    }

    fn close(&mut self) -> Result<(), PathConversionError> {
        self.pending.append(&mut self.leading);
        match self.start {
            Some((segment, first)) => self.segment_to(segment, first)?,
            None if !self.pending.is_empty() => {
                // TrueType allows an all off-curve quadratic contour; it starts
                // halfway between its last and first off-curve.
                let first = self.pending[0];
                let last = self.pending[self.pending.len() - 1];
                let implied = last.midpoint(first);
                self.elements.push(PathEl::MoveTo(implied));
                self.segment_to(Segment::Quad, implied)?;
            }
            None => return Ok(()),
        }
        self.elements.push(PathEl::ClosePath);
        Ok(())
    }

    pub fn build(mut self) -> Result<BezPath, PathConversionError> {
        if self.closed {
            self.close()?;
        } else if !self.pending.is_empty() {
            return Err(PathConversionError::OpenContourEndsOffcurve {
                points: self.pending,
            });
        }
        Ok(BezPath::from_vec(self.elements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn closed() -> GlyphPathBuilder {
        GlyphPathBuilder::new(true, 0)
    }

    fn open() -> GlyphPathBuilder {
        GlyphPathBuilder::new(false, 0)
    }

    #[test]
    fn open_lines() {
        let mut builder = open();
        builder.line_to((2.0, 2.0)).unwrap();
        builder.line_to((4.0, 2.0)).unwrap();
        assert_eq!("M2,2 L4,2", builder.build().unwrap().to_svg());
    }

    #[test]
    fn closed_lines_emit_closing_line() {
        let mut builder = closed();
        builder.line_to((0.0, 0.0)).unwrap();
        builder.line_to((10.0, 0.0)).unwrap();
        builder.line_to((10.0, 10.0)).unwrap();
        assert_eq!(
            "M0,0 L10,0 L10,10 L0,0 Z",
            builder.build().unwrap().to_svg()
        );
    }

    #[test]
    fn cubic_with_two_offcurves() {
        let mut builder = open();
        builder.line_to((0.0, 0.0)).unwrap();
        builder.offcurve((0.0, 5.0));
        builder.offcurve((5.0, 10.0));
        builder.curve_to((10.0, 10.0)).unwrap();
        assert_eq!("M0,0 C0,5 5,10 10,10", builder.build().unwrap().to_svg());
    }

    #[test]
    fn curve_with_one_offcurve_is_a_quad() {
        let mut builder = open();
        builder.line_to((2.0, 2.0)).unwrap();
        builder.offcurve((3.0, 0.0));
        builder.curve_to((4.0, 2.0)).unwrap();
        assert_eq!("M2,2 Q3,0 4,2", builder.build().unwrap().to_svg());
    }

    #[test]
    fn qcurve_implies_oncurves_between_offcurves() {
        let mut builder = open();
        builder.line_to((0.0, 0.0)).unwrap();
        builder.offcurve((2.0, 2.0));
        builder.offcurve((4.0, 2.0));
        builder.offcurve((6.0, 0.0));
        builder.qcurve_to((8.0, 0.0)).unwrap();
        assert_eq!(
            "M0,0 Q2,2 3,2 Q4,2 5,1 Q6,0 8,0",
            builder.build().unwrap().to_svg()
        );
    }

    #[test]
    fn leading_offcurves_of_closed_contour_wrap_to_the_end() {
        // how editors typically store a closed curve: the start point last
        let mut builder = closed();
        builder.offcurve((0.0, 5.0));
        builder.offcurve((5.0, 10.0));
        builder.curve_to((10.0, 10.0)).unwrap();
        builder.line_to((10.0, 0.0)).unwrap();
        builder.line_to((0.0, 0.0)).unwrap();
        assert_eq!(
            "M10,10 L10,0 L0,0 C0,5 5,10 10,10 Z",
            builder.build().unwrap().to_svg()
        );
    }

    #[test]
    fn closed_quadratic_contour_without_oncurve_points() {
        let mut builder = closed();
        builder.offcurve((0.0, 0.0));
        builder.offcurve((0.0, 10.0));
        builder.offcurve((10.0, 10.0));
        builder.offcurve((10.0, 0.0));
        assert_eq!(
            "M5,0 Q0,0 0,5 Q0,10 5,10 Q10,10 10,5 Q10,0 5,0 Z",
            builder.build().unwrap().to_svg()
        );
    }

    #[test]
    fn three_offcurves_before_cubic_is_an_error() {
        let mut builder = open();
        builder.line_to((0.0, 0.0)).unwrap();
        builder.offcurve((1.0, 1.0));
        builder.offcurve((2.0, 2.0));
        builder.offcurve((3.0, 3.0));
        assert!(matches!(
            builder.curve_to((4.0, 4.0)),
            Err(PathConversionError::TooManyOffcurvePoints {
                num_offcurve: 3,
                ..
            })
        ));
    }

    #[test]
    fn offcurve_before_line_is_an_error() {
        let mut builder = open();
        builder.line_to((0.0, 0.0)).unwrap();
        builder.offcurve((1.0, 1.0));
        assert!(matches!(
            builder.line_to((4.0, 4.0)),
            Err(PathConversionError::OffcurveBeforeLine { .. })
        ));
    }

    #[test]
    fn open_contour_must_start_oncurve() {
        let mut builder = open();
        builder.offcurve((1.0, 1.0));
        assert!(matches!(
            builder.line_to((4.0, 4.0)),
            Err(PathConversionError::OpenContourStartsOffcurve { .. })
        ));
    }

    #[test]
    fn open_contour_must_end_oncurve() {
        let mut builder = open();
        builder.line_to((0.0, 0.0)).unwrap();
        builder.offcurve((1.0, 1.0));
        assert!(matches!(
            builder.build(),
            Err(PathConversionError::OpenContourEndsOffcurve { .. })
        ));
    }

    #[test]
    fn empty_contour_is_empty_path() {
        assert!(closed().build().unwrap().elements().is_empty());
    }
}

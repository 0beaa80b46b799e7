use kurbo::Point;
use thiserror::Error;

/// Reasons a stream of typed nodes can't be drawn as a bezier contour.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathConversionError {
    #[error("Too many off-curve points: {num_offcurve}, {points:?}")]
    TooManyOffcurvePoints {
        num_offcurve: usize,
        points: Vec<Point>,
    },
    #[error("Off-curve points {points:?} precede a straight line")]
    OffcurveBeforeLine { points: Vec<Point> },
    #[error("Open contour starts with off-curve points {points:?}")]
    OpenContourStartsOffcurve { points: Vec<Point> },
    #[error("Open contour ends with off-curve points {points:?}")]
    OpenContourEndsOffcurve { points: Vec<Point> },
}

/*

    Errors raised by the geometry constructors.

    Only contract violations are errors. Degenerate input
    (zero-size rectangles, collapsed spans, zero-scale axes)
    is valid and yields a degenerate box instead.

    @date: 14 Nov, 2025
    @author: bartu
*/

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

pub type GeoResult<T> = Result<T, GeometryError>;

/// Unwraps a required argument or reports it as missing.
pub(crate) fn required<T>(value: Option<T>, message: &'static str) -> GeoResult<T> {
    value.ok_or(GeometryError::InvalidArgument(message))
}

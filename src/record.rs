use nalgebra::point;
use thiserror::Error;

use crate::P2;

/// One unit of tabular input: an ordered sequence of opaque text fields
/// addressable by position. Anything slice-shaped over string-like values
/// qualifies; only the fields named by a [`FieldSelect`] are ever read.
pub trait Record {
    /// Get the raw content of the field at `index`, if present
    fn field(&self, index: usize) -> Option<&str>;
}

impl<T: AsRef<str>> Record for Vec<T> {
    fn field(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

impl<T: AsRef<str>> Record for &[T] {
    fn field(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

impl<T: AsRef<str>, const N: usize> Record for [T; N] {
    fn field(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

/// Error raised when a selected field of a record cannot be read as a
/// finite number. Carries the 1-based position of the offending record so
/// the caller can locate it in the source data.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MalformedRecordError {
    /// The record has no field at the selected index
    #[error("record {position}: no field at index {field}")]
    MissingField { position: usize, field: usize },
    /// The field content does not parse as a finite number
    #[error("record {position}: field {field} is not a finite number: {content:?}")]
    NotFinite {
        position: usize,
        field: usize,
        content: String,
    },
}

impl MalformedRecordError {
    /// 1-based ordinal of the offending record in the scanned sequence
    pub fn position(&self) -> usize {
        match self {
            Self::MissingField { position, .. } => *position,
            Self::NotFinite { position, .. } => *position,
        }
    }

    /// Index of the field that failed to convert
    pub fn field(&self) -> usize {
        match self {
            Self::MissingField { field, .. } => *field,
            Self::NotFinite { field, .. } => *field,
        }
    }
}

/// Names which positions within a record hold the x and y coordinates.
/// Positions are data-source configuration, supplied by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSelect {
    pub x: usize,
    pub y: usize,
}

impl FieldSelect {
    /// Select the fields at positions `x` and `y`
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Read the selected fields of `record` as a point. `position` is the
    /// record's 1-based ordinal in its sequence, reported on failure.
    pub fn point_of<R: Record>(
        &self,
        record: &R,
        position: usize,
    ) -> Result<P2, MalformedRecordError> {
        let x = parse_field(record, self.x, position)?;
        let y = parse_field(record, self.y, position)?;
        Ok(point![x, y])
    }
}

fn parse_field<R: Record>(
    record: &R,
    field: usize,
    position: usize,
) -> Result<f64, MalformedRecordError> {
    let content = record
        .field(field)
        .ok_or(MalformedRecordError::MissingField { position, field })?;
    match content.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(MalformedRecordError::NotFinite {
            position,
            field,
            content: content.to_owned(),
        }),
    }
}

//! Error types shared by every module of the crate.
//!
//! All failures are local precondition violations raised at the call that
//! broke the precondition. None of them are transient, so there is nothing
//! to retry.

use crate::geometry::Rect;

/// Errors raised by surface, layer and scene operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// A size argument was non-positive, or a view exceeded its buffer.
    #[error("invalid dimension: view {width}x{height} in buffer {buffer_width}x{buffer_height}")]
    InvalidDimension {
        /// Requested view width.
        width: i32,
        /// Requested view height.
        height: i32,
        /// Requested (or current) buffer width.
        buffer_width: i32,
        /// Requested (or current) buffer height.
        buffer_height: i32,
    },

    /// A requested view falls outside the buffer it refers to.
    #[error("view {view:?} is outside buffer {buffer_width}x{buffer_height}")]
    OutOfBounds {
        /// The rejected view.
        view: Rect,
        /// Width of the buffer the view must fit in.
        buffer_width: i32,
        /// Height of the buffer the view must fit in.
        buffer_height: i32,
    },

    /// A replacement cell array does not match its declared dimensions.
    #[error("cell array holds {actual} cells, expected {expected}")]
    SizeMismatch {
        /// `buffer_width * buffer_height`.
        expected: usize,
        /// Length of the array that was passed in.
        actual: usize,
    },

    /// A layer with this name already exists in the set.
    #[error("layer `{0}` already exists")]
    DuplicateName(String),

    /// A lookup by name or id missed.
    #[error("{kind} `{key}` not found")]
    NotFound {
        /// What was looked up ("layer", "object").
        kind: &'static str,
        /// The name or id that missed.
        key: String,
    },

    /// A cell coordinate lies outside the buffer extent.
    #[error("cell ({x}, {y}) is outside buffer {buffer_width}x{buffer_height}")]
    IndexOutOfRange {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
        /// Buffer width.
        buffer_width: i32,
        /// Buffer height.
        buffer_height: i32,
    },

    /// The backing cells are held by a `CellMut` on an aliased surface.
    #[error("cells are borrowed through an aliased surface")]
    CellsBorrowed,

    /// Reparenting would make an object its own ancestor.
    #[error("object {child} cannot be parented under {parent}")]
    InvalidHierarchy {
        /// The object being moved.
        child: u64,
        /// The requested parent.
        parent: u64,
    },
}

impl SceneError {
    pub(crate) fn layer_not_found(name: &str) -> Self {
        Self::NotFound {
            kind: "layer",
            key: name.to_string(),
        }
    }

    pub(crate) fn object_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            kind: "object",
            key: id.to_string(),
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, SceneError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offending_values() {
        let err = SceneError::DuplicateName("background".into());
        assert_eq!(err.to_string(), "layer `background` already exists");

        let err = SceneError::layer_not_found("fog");
        assert_eq!(err.to_string(), "layer `fog` not found");

        let err = SceneError::SizeMismatch { expected: 100, actual: 99 };
        assert_eq!(err.to_string(), "cell array holds 99 cells, expected 100");

        assert_eq!(SceneError::CellsBorrowed.to_string(), "cells are borrowed through an aliased surface");
    }
}

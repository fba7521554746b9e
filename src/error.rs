//! Error types for the circumplex engine.
//!
//! Everything the engine can reject is an [`InvalidInput`]. Inputs are
//! checked before any raster work starts, so a failed call never leaves a
//! half-synthesized layer behind.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CircumplexError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("cannot composite an empty layer list")]
    NoLayers,

    #[error("layer '{id}' is {found}px but the stack is {expected}px")]
    LayerSizeMismatch {
        id: String,
        expected: u32,
        found: u32,
    },

    #[error("image encode failed: {0}")]
    Encode(String),
}

impl CircumplexError {
    /// Whether this error belongs to the invalid-input family.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, CircumplexError::InvalidInput(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("category catalog is empty")]
    EmptyCatalog,

    #[error("category '{0}' appears more than once")]
    DuplicateCategory(String),

    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    #[error("active set must contain at least one category")]
    EmptyActiveSet,

    #[error("'{0}' is the last active category and cannot be removed")]
    LastActiveCategory(String),

    #[error("resolution must be a positive integer, got {0}")]
    Resolution(u32),

    #[error("canvas {width}x{height} leaves no room for labels")]
    Canvas { width: u32, height: u32 },

    #[error("invalid hex color '{0}', expected #RRGGBB")]
    Color(String),
}

pub type Result<T, E = CircumplexError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_classified() {
        let err: CircumplexError = InvalidInput::Resolution(0).into();
        assert!(err.is_invalid_input());
        assert!(!CircumplexError::NoLayers.is_invalid_input());
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = CircumplexError::from(InvalidInput::LastActiveCategory("joy".into()));
        assert_eq!(
            err.to_string(),
            "invalid input: 'joy' is the last active category and cannot be removed"
        );
    }
}

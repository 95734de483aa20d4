use thiserror::Error;

use super::FieldPath;
use crate::parse::ParseError;

/// The single way compilation can fail: one declared path equals or prefixes
/// another, so the two encryption scopes overlap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("encrypted field paths conflict: '{existing}' and '{conflicting}'")]
    PathConflict {
        existing: FieldPath,
        conflicting: FieldPath,
    },
}

/// Errors raised while turning external field declarations into [`FieldSpec`](super::FieldSpec)s.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("invalid field path '{path}': {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: ParseError,
    },

    #[error("unknown bson type '{name}'")]
    UnknownType { name: String },

    #[error("invalid key id '{value}': expected a UUID")]
    InvalidKeyId { value: String },
}

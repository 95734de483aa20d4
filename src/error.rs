use thiserror::Error;

use crate::{CompileError, SpecError};

/// Unified error type covering configuration loading and compilation.
///
/// Returned by convenience methods like [`Validator::from_json()`](crate::Validator::from_json)
/// and [`Validator::from_file()`](crate::Validator::from_file). Plain
/// [`compile()`](crate::compile) only ever fails with [`CompileError`].
#[derive(Debug, Error)]
pub enum FieldsealError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("invalid encrypted field config: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

mod compile;
mod config;
mod envelope;
mod error;
mod evaluate;
pub mod parse;
mod serialize;
mod trie;
mod types;

pub use compile::compile;
pub use config::{EncryptedFieldConfig, EncryptedFieldEntry};
pub use envelope::{EncryptedBinDataType, EnvelopeHeader, HEADER_LEN, matches_envelope};
pub use error::FieldsealError;
pub use evaluate::{evaluate, evaluate_with};
pub use trie::PathTrie;
pub use types::{
    CompileError, Expr, FieldPath, FieldSpec, SpecError, Validator, ValidatorBuilder, type_code,
    type_from_name, type_name,
};

pub use bson::spec::ElementType;

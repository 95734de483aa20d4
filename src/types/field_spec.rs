use bson::Uuid;
use bson::spec::ElementType;

use super::bson_type::{type_from_name, type_name};
use super::error::SpecError;
use super::field_path::FieldPath;

/// A single encrypted-field declaration: which key encrypts the value at
/// `path`, and which plaintext type the ciphertext stands in for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key_id: Uuid,
    pub path: FieldPath,
    pub bson_type: ElementType,
}

impl FieldSpec {
    #[must_use]
    pub fn new(key_id: Uuid, path: FieldPath, bson_type: ElementType) -> Self {
        Self {
            key_id,
            path,
            bson_type,
        }
    }

    /// Build a spec from its external form: a dotted path and a type alias
    /// such as `"string"` or `"int"`.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] if the path is malformed or the type alias unknown.
    pub fn parse(key_id: Uuid, path: &str, type_alias: &str) -> Result<Self, SpecError> {
        let field_path = FieldPath::parse(path).map_err(|source| SpecError::InvalidPath {
            path: source.input().to_owned(),
            source,
        })?;
        let bson_type = type_from_name(type_alias).ok_or_else(|| SpecError::UnknownType {
            name: type_alias.to_owned(),
        })?;
        Ok(Self::new(key_id, field_path, bson_type))
    }

    /// The canonical alias of the expected plaintext type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        type_name(self.bson_type)
    }
}

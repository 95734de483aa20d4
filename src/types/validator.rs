use std::fmt;

use bson::spec::ElementType;
use bson::{Document, Uuid};

use super::error::CompileError;
use super::expr::Expr;
use super::field_path::FieldPath;
use super::field_spec::FieldSpec;
use crate::config::EncryptedFieldConfig;

/// Builder for constructing a [`Validator`].
///
/// # Example
///
/// ```
/// use bson::{doc, Uuid};
/// use fieldseal::{ElementType, ValidatorBuilder};
///
/// let key = Uuid::from_bytes([0; 16]);
/// let validator = ValidatorBuilder::new()
///     .encrypted(key, "patient.ssn".parse().unwrap(), ElementType::String)
///     .encrypted(key, "billing".parse().unwrap(), ElementType::EmbeddedDocument)
///     .compile()
///     .unwrap();
///
/// assert!(validator.evaluate(&doc! { "name": "sue" }));
/// assert!(!validator.evaluate(&doc! { "patient": { "ssn": "123-45-6789" } }));
/// ```
#[derive(Debug, Default)]
pub struct ValidatorBuilder {
    fields: Vec<FieldSpec>,
}

impl ValidatorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an encrypted field.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Declare an encrypted field from its parts.
    #[must_use]
    pub fn encrypted(self, key_id: Uuid, path: FieldPath, bson_type: ElementType) -> Self {
        self.field(FieldSpec::new(key_id, path, bson_type))
    }

    /// Declare several encrypted fields at once.
    #[must_use]
    pub fn fields(mut self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(specs);
        self
    }

    /// Compile the declarations into an immutable `Validator`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::PathConflict`] if one path equals or prefixes another.
    pub fn compile(self) -> Result<Validator, CompileError> {
        let expr = crate::compile::compile(&self.fields)?;
        Ok(Validator {
            fields: self.fields,
            expr,
        })
    }
}

/// A compiled, immutable encrypted-field validator. Thread-safe and designed to
/// live behind `Arc`; every evaluation only borrows it.
#[derive(Debug, Clone)]
pub struct Validator {
    fields: Vec<FieldSpec>,
    expr: Expr,
}

impl Validator {
    /// Whether `doc` stores every declared field either not at all or as a
    /// well-formed envelope of the declared type.
    #[must_use]
    pub fn evaluate(&self, doc: &Document) -> bool {
        crate::evaluate::evaluate(&self.expr, doc)
    }

    /// The compiled expression tree.
    #[must_use]
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// The declarations this validator was compiled from, in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Parse a JSON field configuration and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`FieldsealError`](crate::FieldsealError) on malformed JSON,
    /// an invalid declaration, or a path conflict.
    pub fn from_json(input: &str) -> Result<Self, crate::FieldsealError> {
        let config = EncryptedFieldConfig::from_json(input)?;
        Self::from_config(&config)
    }

    /// Read a JSON field configuration file and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`FieldsealError`](crate::FieldsealError) on I/O failure or any
    /// error [`from_json`](Self::from_json) can return.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::FieldsealError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_json(&input)
    }

    /// Compile an already-parsed field configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FieldsealError`](crate::FieldsealError) on an invalid
    /// declaration or a path conflict.
    pub fn from_config(config: &EncryptedFieldConfig) -> Result<Self, crate::FieldsealError> {
        let specs = config.to_specs()?;
        let validator = ValidatorBuilder::new().fields(specs).compile()?;
        Ok(validator)
    }

    /// The configuration this validator would be rebuilt from.
    #[must_use]
    pub fn to_config(&self) -> EncryptedFieldConfig {
        EncryptedFieldConfig {
            fields: self.fields.iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validator({} fields, {} nodes)",
            self.fields.len(),
            self.expr.node_count(),
        )
    }
}

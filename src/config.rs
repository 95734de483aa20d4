use bson::Uuid;
use serde::{Deserialize, Serialize};

use crate::{FieldSpec, SpecError};

/// External declaration of a collection's encrypted fields.
///
/// ```json
/// { "fields": [ { "keyId": "deadbeef-0000-0000-0000-0000deadbeef",
///                 "path": "a.b.c", "bsonType": "string" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedFieldConfig {
    #[serde(default)]
    pub fields: Vec<EncryptedFieldEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedFieldEntry {
    pub key_id: String,
    pub path: String,
    pub bson_type: String,
}

impl EncryptedFieldConfig {
    /// Parse the JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] if the input is not valid JSON or does not
    /// have the expected shape.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Convert every entry into a [`FieldSpec`], stopping at the first bad one.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] for a malformed key id, path, or type alias.
    pub fn to_specs(&self) -> Result<Vec<FieldSpec>, SpecError> {
        self.fields.iter().map(EncryptedFieldEntry::to_spec).collect()
    }
}

impl EncryptedFieldEntry {
    /// # Errors
    ///
    /// Returns [`SpecError`] for a malformed key id, path, or type alias.
    pub fn to_spec(&self) -> Result<FieldSpec, SpecError> {
        let key_id = Uuid::parse_str(&self.key_id).map_err(|_| SpecError::InvalidKeyId {
            value: self.key_id.clone(),
        })?;
        FieldSpec::parse(key_id, &self.path, &self.bson_type)
    }
}

impl From<&FieldSpec> for EncryptedFieldEntry {
    fn from(spec: &FieldSpec) -> Self {
        Self {
            key_id: spec.key_id.to_string(),
            path: spec.path.to_string(),
            bson_type: spec.type_name().to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use bson::spec::ElementType;

    use super::*;

    const KEY: &str = "deadbeef-0000-0000-0000-0000deadbeef";

    #[test]
    fn parses_camel_case_entries() {
        let config = EncryptedFieldConfig::from_json(&format!(
            r#"{{"fields":[{{"keyId":"{KEY}","path":"a.b","bsonType":"int"}}]}}"#
        ))
        .unwrap();
        let specs = config.to_specs().unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].path.to_string(), "a.b");
        assert_eq!(specs[0].bson_type, ElementType::Int32);
        assert_eq!(specs[0].key_id.to_string(), KEY);
    }

    #[test]
    fn missing_fields_means_empty() {
        let config = EncryptedFieldConfig::from_json("{}").unwrap();
        assert!(config.to_specs().unwrap().is_empty());
    }

    #[test]
    fn bad_key_id_is_reported() {
        let config = EncryptedFieldConfig {
            fields: vec![EncryptedFieldEntry {
                key_id: "nope".into(),
                path: "a".into(),
                bson_type: "string".into(),
            }],
        };
        assert!(matches!(
            config.to_specs(),
            Err(SpecError::InvalidKeyId { value }) if value == "nope"
        ));
    }

    #[test]
    fn entry_from_spec_uses_canonical_names() {
        let spec = FieldSpec::parse(Uuid::parse_str(KEY).unwrap(), "x.y", "bool").unwrap();
        let entry = EncryptedFieldEntry::from(&spec);
        assert_eq!(entry.key_id, KEY);
        assert_eq!(entry.path, "x.y");
        assert_eq!(entry.bson_type, "bool");
        assert_eq!(entry.to_spec().unwrap(), spec);
    }
}

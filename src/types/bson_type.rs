use bson::spec::ElementType;

const NAMES: &[(&str, ElementType)] = &[
    ("double", ElementType::Double),
    ("string", ElementType::String),
    ("object", ElementType::EmbeddedDocument),
    ("array", ElementType::Array),
    ("binData", ElementType::Binary),
    ("undefined", ElementType::Undefined),
    ("objectId", ElementType::ObjectId),
    ("bool", ElementType::Boolean),
    ("date", ElementType::DateTime),
    ("null", ElementType::Null),
    ("regex", ElementType::RegularExpression),
    ("dbPointer", ElementType::DbPointer),
    ("javascript", ElementType::JavaScriptCode),
    ("symbol", ElementType::Symbol),
    ("javascriptWithScope", ElementType::JavaScriptCodeWithScope),
    ("int", ElementType::Int32),
    ("timestamp", ElementType::Timestamp),
    ("long", ElementType::Int64),
    ("decimal", ElementType::Decimal128),
    ("minKey", ElementType::MinKey),
    ("maxKey", ElementType::MaxKey),
];

/// Resolve a type alias such as `"string"` or `"binData"` to its element type.
#[must_use]
pub fn type_from_name(name: &str) -> Option<ElementType> {
    NAMES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, ty)| *ty)
}

/// The canonical alias for an element type.
#[must_use]
pub fn type_name(ty: ElementType) -> &'static str {
    NAMES
        .iter()
        .find(|(_, candidate)| *candidate == ty)
        .map_or("unknown", |(alias, _)| alias)
}

/// Numeric type tag as it appears in serialized match expressions.
///
/// Identical to the element type byte except for `MinKey`, which is `-1`.
#[must_use]
pub fn type_code(ty: ElementType) -> i32 {
    match ty {
        ElementType::MinKey => -1,
        other => i32::from(other as u8),
    }
}

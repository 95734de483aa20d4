mod bson_type;
mod error;
mod expr;
mod field_path;
mod field_spec;
mod validator;

pub use bson_type::{type_code, type_from_name, type_name};
pub use error::{CompileError, SpecError};
pub use expr::Expr;
pub use field_path::FieldPath;
pub use field_spec::FieldSpec;
pub use validator::{Validator, ValidatorBuilder};

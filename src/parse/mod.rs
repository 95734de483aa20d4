//! Dotted field path parsing.

mod error;
mod grammar;

pub use error::ParseError;

/// Parse a dotted path such as `"a.b.c"` into its components.
///
/// # Errors
///
/// Returns [`ParseError`] if the input is empty or contains an empty component
/// (leading, trailing, or doubled dots).
pub fn parse_path(input: &str) -> Result<Vec<String>, ParseError> {
    use winnow::Parser;
    grammar::field_path
        .parse(input)
        .map_err(|e| ParseError::new(input, e.to_string()))
}

use winnow::combinator::separated;
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

fn component(input: &mut &str) -> ModalResult<String> {
    take_while(1.., |c: char| c != '.')
        .map(|s: &str| s.to_owned())
        .context(StrContext::Expected(StrContextValue::Description(
            "path component",
        )))
        .parse_next(input)
}

/// `component ('.' component)*`, where a component is any non-empty run of
/// characters other than `.`.
pub(super) fn field_path(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., component, '.').parse_next(input)
}

use bson::spec::ElementType;
use bson::{Bson, Document};

use crate::Expr;
use crate::envelope::matches_envelope;

/// Evaluate `expr` against `doc` using the standard envelope check for
/// [`Expr::EncryptedEnvelopeMatch`] leaves.
///
/// Never fails: malformed or hostile documents simply evaluate to `false`.
#[must_use]
pub fn evaluate(expr: &Expr, doc: &Document) -> bool {
    eval_expr(expr, doc, &matches_envelope)
}

/// Evaluate `expr` against `doc` with a caller-supplied predicate for
/// [`Expr::EncryptedEnvelopeMatch`] leaves.
///
/// The predicate receives the field's value and the expected plaintext type;
/// it is only called when the field is present.
#[must_use]
pub fn evaluate_with<F>(expr: &Expr, doc: &Document, leaf: F) -> bool
where
    F: Fn(&Bson, ElementType) -> bool,
{
    eval_expr(expr, doc, &leaf)
}

fn eval_expr<F>(expr: &Expr, doc: &Document, leaf: &F) -> bool
where
    F: Fn(&Bson, ElementType) -> bool,
{
    match expr {
        Expr::AlwaysTrue => true,
        Expr::And(children) => children.iter().all(|child| eval_expr(child, doc, leaf)),
        Expr::Or(children) => children.iter().any(|child| eval_expr(child, doc, leaf)),
        Expr::Not(inner) => !eval_expr(inner, doc, leaf),
        Expr::FieldAbsent(field) => !doc.contains_key(field),
        Expr::TypeIs { field, types } => doc
            .get(field)
            .is_some_and(|value| types.contains(&value.element_type())),
        Expr::ObjectMatch { field, sub } => match doc.get(field) {
            Some(Bson::Document(inner)) => eval_expr(sub, inner, leaf),
            _ => false,
        },
        Expr::EncryptedEnvelopeMatch { field, expected } => doc
            .get(field)
            .is_some_and(|value| leaf(value, *expected)),
    }
}

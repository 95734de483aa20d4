//! Match-expression document form of a compiled [`Expr`].
//!
//! The layout mirrors the server's own serialized match expressions, so a
//! compiled validator can be logged, diffed, or compared for exact shape:
//!
//! ```text
//! AlwaysTrue                    {$alwaysTrue: 1}
//! And / Or                      {$and: [..]} / {$or: [..]}
//! FieldAbsent(n)                {n: {$not: {$exists: true}}}
//! TypeIs(n, ts)                 {n: {$_internalSchemaType: [ts..]}}
//! ObjectMatch(n, s)             {n: {$_internalSchemaObjectMatch: s}}
//! EncryptedEnvelopeMatch(n, t)  {n: {$_internalSchemaBinDataFLE2EncryptedType: [t]}}
//! Not(field predicate on n)     {n: {$not: predicate}}
//! Not(anything else)            {$nor: [child]}
//! ```

use bson::{Bson, Document, doc};

use crate::Expr;
use crate::types::type_code;

pub(crate) fn expr_to_document(expr: &Expr) -> Document {
    match expr {
        Expr::AlwaysTrue => doc! { "$alwaysTrue": 1 },
        Expr::And(children) => {
            let children = children_to_array(children);
            doc! { "$and": children }
        }
        Expr::Or(children) => {
            let children = children_to_array(children);
            doc! { "$or": children }
        }
        Expr::Not(inner) if inner.field().is_none() => {
            let child = expr_to_document(inner);
            doc! { "$nor": [child] }
        }
        _ => single_field_document(expr),
    }
}

fn single_field_document(expr: &Expr) -> Document {
    let mut out = Document::new();
    if let Some((field, predicate)) = field_predicate(expr) {
        out.insert(field, predicate);
    }
    out
}

fn children_to_array(children: &[Expr]) -> Vec<Bson> {
    children
        .iter()
        .map(|child| Bson::Document(expr_to_document(child)))
        .collect()
}

/// Split a single-field predicate into its field name and operator document.
fn field_predicate(expr: &Expr) -> Option<(&str, Document)> {
    match expr {
        Expr::FieldAbsent(field) => {
            Some((field.as_str(), doc! { "$not": { "$exists": true } }))
        }
        Expr::TypeIs { field, types } => {
            let codes: Vec<Bson> = types.iter().map(|t| Bson::Int32(type_code(*t))).collect();
            Some((field.as_str(), doc! { "$_internalSchemaType": codes }))
        }
        Expr::ObjectMatch { field, sub } => {
            let sub = expr_to_document(sub);
            Some((field.as_str(), doc! { "$_internalSchemaObjectMatch": sub }))
        }
        Expr::EncryptedEnvelopeMatch { field, expected } => {
            let code = type_code(*expected);
            Some((
                field.as_str(),
                doc! { "$_internalSchemaBinDataFLE2EncryptedType": [code] },
            ))
        }
        Expr::Not(inner) => {
            let (field, predicate) = field_predicate(inner)?;
            Some((field, doc! { "$not": predicate }))
        }
        Expr::AlwaysTrue | Expr::And(_) | Expr::Or(_) => None,
    }
}

use std::fmt;
use std::ops::Not;

use bson::Document;
use bson::spec::ElementType;

/// Boolean match expression over a document.
///
/// Field names are single path components relative to the document (or
/// sub-document, under [`Expr::ObjectMatch`]) being evaluated. Produced once by
/// [`compile()`](crate::compile) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Matches every document. The compiled form of an empty field list.
    AlwaysTrue,
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    /// The field is not present at all.
    FieldAbsent(String),
    /// The field is present and its value has one of `types`.
    TypeIs {
        field: String,
        types: Vec<ElementType>,
    },
    /// The field holds a sub-document that satisfies `sub`.
    ObjectMatch { field: String, sub: Box<Expr> },
    /// The field holds an encrypted envelope wrapping a plaintext of `expected` type.
    EncryptedEnvelopeMatch {
        field: String,
        expected: ElementType,
    },
}

impl Expr {
    #[must_use]
    pub fn and(children: Vec<Expr>) -> Expr {
        Expr::And(children)
    }

    #[must_use]
    pub fn or(children: Vec<Expr>) -> Expr {
        Expr::Or(children)
    }

    #[must_use]
    pub fn absent(field: &str) -> Expr {
        Expr::FieldAbsent(field.to_owned())
    }

    #[must_use]
    pub fn type_is(field: &str, types: Vec<ElementType>) -> Expr {
        Expr::TypeIs {
            field: field.to_owned(),
            types,
        }
    }

    #[must_use]
    pub fn object_match(field: &str, sub: Expr) -> Expr {
        Expr::ObjectMatch {
            field: field.to_owned(),
            sub: Box::new(sub),
        }
    }

    #[must_use]
    pub fn envelope(field: &str, expected: ElementType) -> Expr {
        Expr::EncryptedEnvelopeMatch {
            field: field.to_owned(),
            expected,
        }
    }

    /// The field a single-field predicate applies to, looking through `Not`.
    /// `None` for `AlwaysTrue` and the n-ary combinators.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Expr::FieldAbsent(field)
            | Expr::TypeIs { field, .. }
            | Expr::ObjectMatch { field, .. }
            | Expr::EncryptedEnvelopeMatch { field, .. } => Some(field.as_str()),
            Expr::Not(inner) => inner.field(),
            Expr::AlwaysTrue | Expr::And(_) | Expr::Or(_) => None,
        }
    }

    /// Number of nodes in the tree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + match self {
            Expr::And(children) | Expr::Or(children) => {
                children.iter().map(Expr::node_count).sum()
            }
            Expr::Not(inner) | Expr::ObjectMatch { sub: inner, .. } => inner.node_count(),
            Expr::AlwaysTrue
            | Expr::FieldAbsent(_)
            | Expr::TypeIs { .. }
            | Expr::EncryptedEnvelopeMatch { .. } => 0,
        }
    }

    /// The match-expression document form of this tree.
    #[must_use]
    pub fn to_document(&self) -> Document {
        crate::serialize::expr_to_document(self)
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_document())
    }
}

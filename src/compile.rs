use bson::spec::ElementType;

use crate::trie::{PathTrie, TrieNode};
use crate::{CompileError, Expr, FieldSpec};

/// Compile encrypted-field declarations into a validator expression.
///
/// The result accepts a document iff every declared path is either absent or
/// holds a well-formed envelope of the declared type, and no array appears
/// along any declared path.
///
/// # Errors
///
/// Returns [`CompileError::PathConflict`] if one declared path equals or
/// prefixes another.
pub fn compile(specs: &[FieldSpec]) -> Result<Expr, CompileError> {
    tracing::debug!(fields = specs.len(), "compiling encrypted field validator");
    let trie = PathTrie::build(specs)?;
    Ok(compile_trie(&trie))
}

impl PathTrie {
    /// Translate this trie into its validator expression.
    #[must_use]
    pub fn to_expr(&self) -> Expr {
        compile_trie(self)
    }
}

pub(crate) fn compile_trie(trie: &PathTrie) -> Expr {
    let top = trie.top_level();
    if top.is_empty() {
        return Expr::AlwaysTrue;
    }
    let children = compile_children(trie, top);
    // Single-element outer grouping is part of the serialized shape.
    Expr::and(vec![Expr::and(children)])
}

fn compile_children(trie: &PathTrie, children: &[(String, usize)]) -> Vec<Expr> {
    children
        .iter()
        .map(|(name, id)| compile_node(trie, name, *id))
        .collect()
}

fn compile_node(trie: &PathTrie, name: &str, id: usize) -> Expr {
    match trie.node(id) {
        TrieNode::Leaf(spec) => leaf_expr(name, spec.bson_type),
        TrieNode::Branch(branch) => {
            branch_expr(name, compile_children(trie, &branch.children))
        }
    }
}

/// `name` is absent, or holds an envelope of `expected` type.
fn leaf_expr(name: &str, expected: ElementType) -> Expr {
    Expr::or(vec![
        Expr::absent(name),
        Expr::and(vec![Expr::envelope(name, expected)]),
    ])
}

/// `name` is absent, or is not an array and, if it is an object, satisfies
/// every child constraint.
fn branch_expr(name: &str, children: Vec<Expr>) -> Expr {
    Expr::or(vec![
        Expr::absent(name),
        Expr::and(vec![
            Expr::or(vec![
                !Expr::type_is(name, vec![ElementType::EmbeddedDocument]),
                Expr::object_match(name, Expr::and(children)),
            ]),
            !Expr::type_is(name, vec![ElementType::Array]),
        ]),
    ])
}

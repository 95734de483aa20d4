use std::collections::HashMap;

use crate::{CompileError, FieldPath, FieldSpec};

const ROOT: usize = 0;

/// Prefix tree over declared field paths, stored as an arena of nodes.
///
/// Each node is either a leaf holding the spec that terminates there, or a
/// branch keyed by the next path component. The root is always a branch.
/// Children keep first-insertion order so compilation is deterministic.
#[derive(Debug, Clone)]
pub struct PathTrie {
    nodes: Vec<TrieNode>,
}

#[derive(Debug, Clone)]
pub(crate) enum TrieNode {
    Leaf(FieldSpec),
    Branch(Branch),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Branch {
    pub(crate) children: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Branch {
    fn get(&self, component: &str) -> Option<usize> {
        self.index.get(component).copied()
    }
}

impl PathTrie {
    /// Build the trie, failing on the first pair of paths where one equals or
    /// prefixes the other. No partial trie is returned.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::PathConflict`] naming both paths.
    pub fn build(specs: &[FieldSpec]) -> Result<Self, CompileError> {
        let _span = tracing::debug_span!("build_path_trie", fields = specs.len()).entered();
        let mut trie = Self {
            nodes: vec![TrieNode::Branch(Branch::default())],
        };
        for spec in specs {
            trie.insert(spec)?;
        }
        Ok(trie)
    }

    /// Number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leaves().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Declared specs in depth-first, first-inserted order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&FieldSpec> {
        let mut out = Vec::new();
        self.collect_leaves(ROOT, &mut out);
        out
    }

    /// Top-level components and their node ids.
    pub(crate) fn top_level(&self) -> &[(String, usize)] {
        self.children_of(ROOT)
    }

    pub(crate) fn children_of(&self, id: usize) -> &[(String, usize)] {
        match &self.nodes[id] {
            TrieNode::Branch(branch) => &branch.children,
            TrieNode::Leaf(_) => &[],
        }
    }

    pub(crate) fn node(&self, id: usize) -> &TrieNode {
        &self.nodes[id]
    }

    fn insert(&mut self, spec: &FieldSpec) -> Result<(), CompileError> {
        let Some((last, parents)) = spec.path.components().split_last() else {
            debug_assert!(false, "field path '{}' has no components", spec.path);
            return Ok(());
        };

        let mut current = ROOT;
        for component in parents {
            current = match self.child(current, component) {
                Some(id) => {
                    if let TrieNode::Leaf(existing) = &self.nodes[id] {
                        return Err(conflict(&existing.path, &spec.path));
                    }
                    id
                }
                None => self.push_child(current, component, TrieNode::Branch(Branch::default())),
            };
        }

        match self.child(current, last) {
            None => {
                self.push_child(current, last, TrieNode::Leaf(spec.clone()));
            }
            Some(id) => match self.first_leaf(id) {
                // Either a duplicate path or a longer path already declared here.
                Some(existing) => return Err(conflict(&existing.path, &spec.path)),
                None => self.nodes[id] = TrieNode::Leaf(spec.clone()),
            },
        }
        Ok(())
    }

    fn child(&self, parent: usize, component: &str) -> Option<usize> {
        match &self.nodes[parent] {
            TrieNode::Branch(branch) => branch.get(component),
            TrieNode::Leaf(_) => None,
        }
    }

    fn push_child(&mut self, parent: usize, component: &str, node: TrieNode) -> usize {
        let id = self.nodes.len();
        self.nodes.push(node);
        if let TrieNode::Branch(branch) = &mut self.nodes[parent] {
            branch.children.push((component.to_owned(), id));
            branch.index.insert(component.to_owned(), id);
        }
        id
    }

    fn first_leaf(&self, id: usize) -> Option<&FieldSpec> {
        match &self.nodes[id] {
            TrieNode::Leaf(spec) => Some(spec),
            TrieNode::Branch(branch) => branch
                .children
                .iter()
                .find_map(|(_, child)| self.first_leaf(*child)),
        }
    }

    fn collect_leaves<'a>(&'a self, id: usize, out: &mut Vec<&'a FieldSpec>) {
        match &self.nodes[id] {
            TrieNode::Leaf(spec) => out.push(spec),
            TrieNode::Branch(branch) => {
                for (_, child) in &branch.children {
                    self.collect_leaves(*child, out);
                }
            }
        }
    }
}

fn conflict(existing: &FieldPath, conflicting: &FieldPath) -> CompileError {
    debug_assert!(existing.conflicts_with(conflicting));
    tracing::warn!(%existing, %conflicting, "conflicting encrypted field paths");
    CompileError::PathConflict {
        existing: existing.clone(),
        conflicting: conflicting.clone(),
    }
}

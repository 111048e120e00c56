//! Binds rows to a selected tree and drops rows that are not on its head.

use crate::model::JoinedRow;
use crate::normalize::tree_identity;
use crate::trees::Tree;

/// The selected tree whose identity matches the row's checkout.
pub fn current_tree<'t>(row: &JoinedRow, trees: &'t [Tree]) -> Option<&'t Tree> {
    let identity = tree_identity(row);
    trees.iter().find(|t| t.matches(&identity))
}

pub fn is_in_tree_head(row: &JoinedRow, tree: &Tree) -> bool {
    row.checkout_git_commit_hash == tree.head_git_commit_hash
}

/// The tree a row is summarized under, or `None` when the row belongs to an
/// unselected tree or to a stale commit.
pub fn head_tree<'t>(row: &JoinedRow, trees: &'t [Tree]) -> Option<&'t Tree> {
    current_tree(row, trees).filter(|t| is_in_tree_head(row, t))
}

//! Tree resolution: the distinct tree lines seen for a hardware in a window,
//! their head commits and stable indices, plus caller selection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::{TreeCheckoutRow, TreeIdentity};

/// Marker value a caller puts next to a tree index to select that tree.
pub const SELECTED_VALUE: &str = "selected";

/// A tree line and its head commit for the current query window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tree {
    pub tree_name: Option<String>,
    pub git_repository_branch: Option<String>,
    pub git_repository_url: Option<String>,
    pub head_git_commit_name: Option<String>,
    pub head_git_commit_hash: Option<String>,
    pub index: String,
}

impl Tree {
    pub fn matches(&self, identity: &TreeIdentity) -> bool {
        self.tree_name == identity.tree_name
            && self.git_repository_branch == identity.git_repository_branch
            && self.git_repository_url == identity.git_repository_url
    }
}

/// Index → marker map sent by the caller. An empty selection means "all
/// trees"; a non-empty one keeps only indices marked [`SELECTED_VALUE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeSelection(pub BTreeMap<String, String>);

impl TreeSelection {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_selected(&self, index: &str) -> bool {
        self.0.get(index).map(String::as_str) == Some(SELECTED_VALUE)
    }

    pub fn select<I: IntoIterator<Item = String>>(indices: I) -> Self {
        Self(
            indices
                .into_iter()
                .map(|i| (i, SELECTED_VALUE.to_string()))
                .collect(),
        )
    }
}

/// Reduces checkouts to one [`Tree`] per identity.
///
/// Checkouts are ordered by identity, then by descending start time, and the
/// first checkout of each identity provides the head commit. Indices are the
/// ordinal positions in that ordering.
pub fn resolve_trees(mut checkouts: Vec<TreeCheckoutRow>) -> Vec<Tree> {
    checkouts.sort_by(|a, b| {
        a.identity
            .cmp_nulls_last(&b.identity)
            .then_with(|| b.start_time.cmp(&a.start_time))
    });
    checkouts.dedup_by(|later, first| later.identity == first.identity);

    checkouts
        .into_iter()
        .enumerate()
        .map(|(idx, c)| Tree {
            tree_name: c.identity.tree_name,
            git_repository_branch: c.identity.git_repository_branch,
            git_repository_url: c.identity.git_repository_url,
            head_git_commit_name: c.git_commit_name,
            head_git_commit_hash: c.git_commit_hash,
            index: idx.to_string(),
        })
        .collect()
}

pub fn select_trees(trees: &[Tree], selection: &TreeSelection) -> Vec<Tree> {
    if selection.is_empty() {
        return trees.to_vec();
    }
    trees
        .iter()
        .filter(|t| selection.is_selected(&t.index))
        .cloned()
        .collect()
}

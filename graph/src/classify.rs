//! Sub-branch classification.
//!
//! Commits outside every lineage are grouped into connected components
//! (parent and child edges, ignoring direction). A component becomes a
//! sub-branch of lineage `L` only when every loaded parent of every member is
//! inside the component or inside `L`; anything else stays unclaimed and ends
//! up in the Other column.

use crate::core::Model;
use crate::error::GraphError;
use crate::lineage::Lineage;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Stable identifier of a sub-branch within one layout pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SubBranchId(pub usize);

/// A connected run of non-lineage commits owned by one lineage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubBranch {
    pub id: SubBranchId,
    /// Index of the owning lineage
    pub lineage: usize,
    /// Member hashes in row order (newest first)
    pub commits: Vec<String>,
    /// Lineage commit that merges this sub-branch in through a non-first parent
    pub merge_commit: Option<String>,
    /// Lineage commit this sub-branch forks from
    pub branch_point: Option<String>,
    #[serde(skip)]
    members: HashSet<String>,
}

impl SubBranch {
    pub fn contains(&self, hash: &str) -> bool {
        self.members.contains(hash)
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    pub fn is_merged(&self) -> bool {
        self.merge_commit.is_some()
    }

    /// Row of the newest member
    pub fn newest_row(&self, model: &Model) -> Option<usize> {
        self.commits.first().and_then(|hash| model.row(hash))
    }

    /// Row of the oldest member
    pub fn oldest_row(&self, model: &Model) -> Option<usize> {
        self.commits.last().and_then(|hash| model.row(hash))
    }
}

/// How components that merge elsewhere are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// Every valid component is returned, wherever it merges.
    Any,
    /// Components merging into another active lineage are left for that lineage.
    MergeTarget,
}

/// Sub-branch classifier over one model and its active lineages
pub struct Classifier<'a> {
    model: &'a Model,
    lineages: &'a [Lineage],
    ownership: Ownership,
}

impl<'a> Classifier<'a> {
    pub fn new(model: &'a Model, lineages: &'a [Lineage]) -> Self {
        Self {
            model,
            lineages,
            ownership: Ownership::MergeTarget,
        }
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Classify for every lineage in selection order.
    ///
    /// Passes run from the lowest lineage index up and claimed commits are
    /// never reconsidered, so a component that qualifies for several
    /// lineages goes to the lowest index among them.
    pub fn classify_all(&self, diagnostics: &mut Vec<GraphError>) -> Vec<Vec<SubBranch>> {
        let mut claimed = HashSet::new();
        let mut next_id = 0;
        let result: Vec<Vec<SubBranch>> = self
            .lineages
            .iter()
            .map(|lineage| {
                self.sub_branches(lineage.index, &mut claimed, &mut next_id, diagnostics)
            })
            .collect();

        debug!(
            sub_branches = result.iter().map(Vec::len).sum::<usize>(),
            claimed = claimed.len(),
            "classified sub-branches"
        );
        result
    }

    /// Sub-branches owned by the lineage at `index`.
    ///
    /// Members of the returned sub-branches are added to `claimed`; hashes
    /// already in `claimed` are never seeds.
    pub fn sub_branches(
        &self,
        index: usize,
        claimed: &mut HashSet<String>,
        next_id: &mut usize,
        diagnostics: &mut Vec<GraphError>,
    ) -> Vec<SubBranch> {
        let Some(lineage) = self.lineages.get(index) else {
            return Vec::new();
        };

        let mut searched: HashSet<String> = HashSet::new();
        let mut found = Vec::new();

        for seed in self.model.commits() {
            let seed = seed.hash.as_str();
            if self.in_any_lineage(seed) || claimed.contains(seed) || searched.contains(seed) {
                continue;
            }

            let component = match self.component(seed, claimed) {
                Ok(component) => component,
                Err(err) => {
                    warn!(error = %err, "abandoning component");
                    diagnostics.push(err);
                    searched.insert(seed.to_string());
                    continue;
                }
            };
            searched.extend(component.iter().cloned());

            if !self.is_valid_for(&component, lineage) {
                continue;
            }

            let merge_commit = self.merge_commit_in(&component, lineage);
            if merge_commit.is_none() && self.ownership == Ownership::MergeTarget {
                let merged_elsewhere = self
                    .lineages
                    .iter()
                    .filter(|other| other.index != lineage.index)
                    .any(|other| self.merge_commit_in(&component, other).is_some());
                if merged_elsewhere {
                    continue;
                }
            }

            let branch_point = self.branch_point_in(&component, lineage);
            found.push(self.make_sub_branch(
                SubBranchId(*next_id),
                lineage.index,
                component,
                merge_commit,
                branch_point,
            ));
            *next_id += 1;
        }

        for sub in &found {
            claimed.extend(sub.commits.iter().cloned());
        }
        found
    }

    fn in_any_lineage(&self, hash: &str) -> bool {
        self.lineages.iter().any(|lineage| lineage.contains(hash))
    }

    /// Undirected connected component of `seed`, bounded by lineage commits.
    fn component(
        &self,
        seed: &str,
        claimed: &HashSet<String>,
    ) -> Result<HashSet<String>, GraphError> {
        let limit = self.model.len();
        let mut component: HashSet<String> = HashSet::from([seed.to_string()]);
        let mut stack = vec![seed.to_string()];
        let mut steps = 0;

        while let Some(hash) = stack.pop() {
            steps += 1;
            if steps > limit {
                return Err(GraphError::RunawayTraversal {
                    start: seed.to_string(),
                    limit,
                });
            }

            let neighbours = self
                .model
                .loaded_parents(&hash)
                .chain(self.model.children(&hash).iter().map(String::as_str));
            for next in neighbours {
                if self.in_any_lineage(next) || claimed.contains(next) {
                    continue;
                }
                if component.insert(next.to_string()) {
                    stack.push(next.to_string());
                }
            }
        }

        Ok(component)
    }

    /// Every loaded parent of every member is in the component or the lineage.
    fn is_valid_for(&self, component: &HashSet<String>, lineage: &Lineage) -> bool {
        component.iter().all(|hash| {
            self.model
                .loaded_parents(hash)
                .all(|parent| component.contains(parent) || lineage.contains(parent))
        })
    }

    /// Newest lineage commit that has a member as a non-first parent
    fn merge_commit_in(&self, component: &HashSet<String>, lineage: &Lineage) -> Option<String> {
        component
            .iter()
            .flat_map(|hash| {
                self.model
                    .children(hash)
                    .iter()
                    .map(move |child| (hash, child))
            })
            .filter(|(_, child)| lineage.contains(child))
            .filter(|(hash, child)| {
                self.model
                    .get(child)
                    .is_some_and(|merge| merge.merged_parents().any(|p| p == hash.as_str()))
            })
            .filter_map(|(_, child)| self.model.row(child).map(|row| (row, child)))
            .min()
            .map(|(_, child)| child.clone())
    }

    /// Parent in the lineage of the oldest member that has one
    fn branch_point_in(&self, component: &HashSet<String>, lineage: &Lineage) -> Option<String> {
        let mut members: Vec<(usize, &String)> = component
            .iter()
            .filter_map(|hash| self.model.row(hash).map(|row| (row, hash)))
            .collect();
        members.sort_by_key(|&(row, _)| Reverse(row));

        members.into_iter().find_map(|(_, hash)| {
            self.model
                .loaded_parents(hash)
                .find(|parent| lineage.contains(parent))
                .map(str::to_string)
        })
    }

    fn make_sub_branch(
        &self,
        id: SubBranchId,
        lineage: usize,
        members: HashSet<String>,
        merge_commit: Option<String>,
        branch_point: Option<String>,
    ) -> SubBranch {
        let mut commits: Vec<String> = members.iter().cloned().collect();
        commits.sort_by_key(|hash| self.model.row(hash).unwrap_or(usize::MAX));
        SubBranch {
            id,
            lineage,
            commits,
            merge_commit,
            branch_point,
            members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Branch, Commit};
    use crate::lineage::{resolve_lineages, KeySelection};
    use pretty_assertions::assert_eq;

    fn classify(model: &Model, keys: &[&str]) -> (Vec<Lineage>, Vec<Vec<SubBranch>>) {
        let mut diagnostics = Vec::new();
        let selection = KeySelection::new(keys.iter().copied());
        let lineages = resolve_lineages(model, &selection, &mut diagnostics);
        let subs = Classifier::new(model, &lineages).classify_all(&mut diagnostics);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        (lineages, subs)
    }

    fn hashes(sub: &SubBranch) -> Vec<&str> {
        sub.commits.iter().map(String::as_str).collect()
    }

    #[test]
    fn merged_feature_records_merge_and_branch_point() {
        let model = Model::new(
            vec![
                Commit::new("c3", ["c2", "f2"], 40, "merge"),
                Commit::new("f2", ["f1"], 35, "feature 2"),
                Commit::new("c2", ["c1"], 30, "main 2"),
                Commit::new("f1", ["c1"], 20, "feature 1"),
                Commit::new("c1", Vec::<String>::new(), 10, "root"),
            ],
            vec![Branch::new("main", "c3")],
        );
        let (_, subs) = classify(&model, &["main"]);
        assert_eq!(subs[0].len(), 1);
        let sub = &subs[0][0];
        assert_eq!(hashes(sub), vec!["f2", "f1"]);
        assert_eq!(sub.merge_commit.as_deref(), Some("c3"));
        assert_eq!(sub.branch_point.as_deref(), Some("c1"));
        assert_eq!(sub.lineage, 0);
    }

    #[test]
    fn unmerged_feature_has_no_merge_commit() {
        let model = Model::new(
            vec![
                Commit::new("wip", ["c1"], 30, "wip"),
                Commit::new("c2", ["c1"], 20, "main"),
                Commit::new("c1", Vec::<String>::new(), 10, "root"),
            ],
            vec![Branch::new("main", "c2"), Branch::new("topic", "wip")],
        );
        let (_, subs) = classify(&model, &["main"]);
        assert_eq!(subs[0].len(), 1);
        assert!(!subs[0][0].is_merged());
        assert_eq!(subs[0][0].branch_point.as_deref(), Some("c1"));
    }

    #[test]
    fn unrelated_history_merged_off_lineage_stays_one_component() {
        let model = Model::new(
            vec![
                Commit::new("x", ["c1", "o1"], 30, "cross merge"),
                Commit::new("c2", ["c1"], 25, "main"),
                Commit::new("o1", ["o0"], 20, "other"),
                Commit::new("o0", Vec::<String>::new(), 15, "other root"),
                Commit::new("c1", Vec::<String>::new(), 10, "root"),
            ],
            vec![Branch::new("main", "c2")],
        );
        let (_, subs) = classify(&model, &["main"]);
        assert_eq!(subs[0].len(), 1);
        assert_eq!(hashes(&subs[0][0]), vec!["x", "o1", "o0"]);

        let model = Model::new(
            vec![
                Commit::new("dev2", ["dev1"], 40, "dev"),
                Commit::new("f", ["dev1"], 35, "feature off dev"),
                Commit::new("c2", ["c1"], 30, "main"),
                Commit::new("dev1", ["c1"], 20, "dev"),
                Commit::new("c1", Vec::<String>::new(), 10, "root"),
            ],
            vec![Branch::new("main", "c2"), Branch::new("dev", "dev2")],
        );
        // With only main selected, dev's commits are ordinary non-lineage
        // commits: dev1, dev2 and f form one valid component.
        let (_, subs) = classify(&model, &["main"]);
        assert_eq!(subs[0].len(), 1);
        assert_eq!(subs[0][0].len(), 3);
    }

    #[test]
    fn parent_in_other_lineage_invalidates_for_this_one() {
        let model = Model::new(
            vec![
                Commit::new("f", ["dev1"], 35, "feature off dev"),
                Commit::new("c2", ["c1"], 30, "main"),
                Commit::new("dev1", ["c1"], 20, "dev"),
                Commit::new("c1", Vec::<String>::new(), 10, "root"),
            ],
            vec![Branch::new("main", "c2"), Branch::new("dev", "dev1")],
        );
        let (_, subs) = classify(&model, &["main", "dev"]);
        assert!(subs[0].is_empty());
        assert_eq!(subs[1].len(), 1);
        assert_eq!(subs[1][0].branch_point.as_deref(), Some("dev1"));
        assert_eq!(subs[1][0].id, SubBranchId(0));
    }

    #[test]
    fn merge_into_other_lineage_is_left_for_it() {
        // f forks from the shared root and merges into dev only.
        let model = Model::new(
            vec![
                Commit::new("d2", ["d1", "f"], 40, "merge f into dev"),
                Commit::new("c2", ["c1"], 35, "main"),
                Commit::new("f", ["c1"], 30, "feature"),
                Commit::new("d1", ["c1"], 20, "dev"),
                Commit::new("c1", Vec::<String>::new(), 10, "root"),
            ],
            vec![Branch::new("main", "c2"), Branch::new("dev", "d2")],
        );
        let (_, subs) = classify(&model, &["main", "dev"]);
        assert!(subs[0].is_empty());
        assert_eq!(subs[1].len(), 1);
        assert_eq!(subs[1][0].merge_commit.as_deref(), Some("d2"));

        let mut diagnostics = Vec::new();
        let selection = KeySelection::new(["main", "dev"]);
        let lineages = resolve_lineages(&model, &selection, &mut diagnostics);
        let loose = Classifier::new(&model, &lineages)
            .with_ownership(Ownership::Any)
            .classify_all(&mut diagnostics);
        assert_eq!(loose[0].len(), 1);
        assert!(loose[1].is_empty());
    }

    #[test]
    fn unmerged_shared_fork_goes_to_lowest_index() {
        let model = Model::new(
            vec![
                Commit::new("t", ["c1"], 40, "topic"),
                Commit::new("c2", ["c1"], 30, "main"),
                Commit::new("d1", ["c1"], 20, "dev"),
                Commit::new("c1", Vec::<String>::new(), 10, "root"),
            ],
            vec![Branch::new("main", "c2"), Branch::new("dev", "d1")],
        );
        let (_, subs) = classify(&model, &["dev", "main"]);
        assert_eq!(subs[0].len(), 1);
        assert!(subs[1].is_empty());

        let (_, subs) = classify(&model, &["main", "dev"]);
        assert_eq!(subs[0].len(), 1);
        assert!(subs[1].is_empty());
    }

    #[test]
    fn disconnected_history_has_no_branch_point() {
        let model = Model::new(
            vec![
                Commit::new("orphan", Vec::<String>::new(), 30, "gh-pages"),
                Commit::new("c1", Vec::<String>::new(), 10, "root"),
            ],
            vec![Branch::new("main", "c1")],
        );
        let (_, subs) = classify(&model, &["main"]);
        assert_eq!(subs[0].len(), 1);
        assert_eq!(subs[0][0].branch_point, None);
        assert_eq!(subs[0][0].merge_commit, None);
    }

    #[test]
    fn newest_merge_wins_when_merged_twice() {
        // f1 is merged at c2, work continues on f2 (child of f1) merged at c3.
        let model = Model::new(
            vec![
                Commit::new("c3", ["c2", "f2"], 50, "merge again"),
                Commit::new("f2", ["f1"], 40, "more"),
                Commit::new("c2", ["c1", "f1"], 30, "merge"),
                Commit::new("f1", ["c1"], 20, "feature"),
                Commit::new("c1", Vec::<String>::new(), 10, "root"),
            ],
            vec![Branch::new("main", "c3")],
        );
        let (_, subs) = classify(&model, &["main"]);
        assert_eq!(subs[0].len(), 1);
        assert_eq!(subs[0][0].merge_commit.as_deref(), Some("c3"));
        assert_eq!(subs[0][0].newest_row(&model), Some(1));
        assert_eq!(subs[0][0].oldest_row(&model), Some(3));
    }
}

use crate::core::{Model, PullRequest};
use crate::layout::Layout;
use crate::lineage::{Lineage, LineageColor};
use serde::Serialize;
use std::collections::HashMap;

/// Labels attached to a commit for display
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Decoration {
    pub branches: Vec<String>,
    pub pull_request: Option<PullRequest>,
    /// Set when the commit is the tip of a lineage
    pub lineage_tip: Option<usize>,
    /// Colour of the column the commit is drawn in
    pub color: Option<LineageColor>,
}

impl Decoration {
    pub fn is_empty(&self) -> bool {
        self.branches.is_empty() && self.pull_request.is_none() && self.lineage_tip.is_none()
    }
}

/// Decorates commits with refs and pull requests
pub struct RefDecorator {
    pull_requests: HashMap<String, PullRequest>,
    tips: HashMap<String, usize>,
}

impl RefDecorator {
    pub fn new(pull_requests: &[PullRequest], lineages: &[Lineage]) -> Self {
        let mut by_head = HashMap::new();
        for pr in pull_requests {
            // Keep the lowest PR number when several share a head commit.
            by_head
                .entry(pr.head_ref_oid.clone())
                .and_modify(|existing: &mut PullRequest| {
                    if pr.number < existing.number {
                        *existing = pr.clone();
                    }
                })
                .or_insert_with(|| pr.clone());
        }

        let mut tips = HashMap::new();
        for lineage in lineages {
            tips.entry(lineage.tip.clone()).or_insert(lineage.index);
        }

        Self {
            pull_requests: by_head,
            tips,
        }
    }

    pub fn decorate(&self, model: &Model, layout: &Layout, hash: &str) -> Decoration {
        Decoration {
            branches: model.branches_at(hash).map(|b| b.name.clone()).collect(),
            pull_request: self.pull_requests.get(hash).cloned(),
            lineage_tip: self.tips.get(hash).copied(),
            color: layout
                .placement(hash)
                .and_then(|p| layout.columns.get(p.column))
                .and_then(|c| c.color),
        }
    }

    /// Decorations of every commit that has at least one label
    pub fn decorate_all(&self, model: &Model, layout: &Layout) -> HashMap<String, Decoration> {
        model
            .commits()
            .iter()
            .map(|c| (c.hash.clone(), self.decorate(model, layout, &c.hash)))
            .filter(|(_, d)| !d.is_empty())
            .collect()
    }
}

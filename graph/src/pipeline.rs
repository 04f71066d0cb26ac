use crate::classify::{Classifier, SubBranch};
use crate::core::Model;
use crate::edges::{classify_edges, Edge};
use crate::error::GraphError;
use crate::highlight::highlight_set;
use crate::layout::{layout, Geometry, Layout, Placement};
use crate::lineage::{resolve_lineages, KeySelection, Lineage};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Everything derived from one model and one key selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphLayout {
    pub lineages: Vec<Lineage>,
    /// Sub-branches per lineage index
    pub sub_branches: Vec<Vec<SubBranch>>,
    pub layout: Layout,
    pub edges: Vec<Edge>,
    /// Integrity problems met during the pass
    #[serde(skip)]
    pub diagnostics: Vec<GraphError>,
}

impl GraphLayout {
    /// Run lineage tracing, classification, layout and edge classification.
    pub fn build(model: &Model, selection: &KeySelection, geometry: &Geometry) -> Self {
        let mut diagnostics = Vec::new();
        let lineages = resolve_lineages(model, selection, &mut diagnostics);
        let sub_branches = Classifier::new(model, &lineages).classify_all(&mut diagnostics);
        let layout = layout(model, &lineages, &sub_branches, geometry);
        let edges = classify_edges(model, &layout);

        debug!(
            commits = model.len(),
            lineages = lineages.len(),
            edges = edges.len(),
            diagnostics = diagnostics.len(),
            "graph layout built"
        );

        Self {
            lineages,
            sub_branches,
            layout,
            edges,
            diagnostics,
        }
    }

    pub fn placement(&self, hash: &str) -> Option<&Placement> {
        self.layout.placement(hash)
    }

    pub fn sub_branch_of(&self, hash: &str) -> Option<&SubBranch> {
        let id = self.placement(hash)?.sub_branch?;
        self.sub_branches.iter().flatten().find(|sub| sub.id == id)
    }

    pub fn highlight_set(&self, model: &Model, hovered: &str) -> HashSet<String> {
        highlight_set(model, &self.layout, &self.sub_branches, hovered)
    }
}

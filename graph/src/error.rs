use thiserror::Error;

/// Data-integrity conditions found while laying out a graph.
///
/// None of these abort a layout pass; they are collected as diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("traversal from {start} exceeded {limit} steps; commit graph is cyclic or corrupt")]
    RunawayTraversal { start: String, limit: usize },

    #[error("key branch '{0}' is not present in the branch list")]
    UnknownBranch(String),
}

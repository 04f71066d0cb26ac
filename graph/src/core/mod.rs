pub mod branch;
pub mod commit;
pub mod model;
pub mod parse;

pub use branch::{Branch, PullRequest};
pub use commit::{Commit, Parents};
pub use model::{Model, ModelStats};
pub use parse::{parse_branches, parse_commits, parse_pull_requests};

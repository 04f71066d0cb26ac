use graph::{
    parse_branches, parse_commits, Branch, Commit, GraphLayout, KeySelection, Model, Ownership,
    SubBranchId,
};
use graph::classify::Classifier;
use graph::lineage::resolve_lineages;
use graph::trace_lineage;
use pretty_assertions::assert_eq;
use std::collections::{HashMap, HashSet};

fn set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn scenario_a_linear_main() {
    let model = Model::new(
        vec![
            Commit::new("c3", ["c2"], 3, "m3"),
            Commit::new("c2", ["c1"], 2, "m2"),
            Commit::new("c1", Vec::<String>::new(), 1, "m1"),
        ],
        vec![Branch::new("main", "c3")],
    );

    assert_eq!(trace_lineage("c3", &model).unwrap(), set(&["c1", "c2", "c3"]));

    let graph = GraphLayout::build(&model, &KeySelection::new(["main"]), &Default::default());
    assert!(graph.sub_branches[0].is_empty());
    for (hash, row) in [("c3", 0), ("c2", 1), ("c1", 2)] {
        let placement = graph.placement(hash).unwrap();
        assert_eq!(placement.column, 0);
        assert_eq!(placement.row, row);
        assert_eq!(placement.offset, 0);
    }
}

#[test]
fn scenario_b_merged_feature() {
    // Timestamps scaled by ten so f1 sits between c1 and c2.
    let model = Model::new(
        vec![
            Commit::new("c3", ["c2", "f1"], 30, "m3"),
            Commit::new("c2", ["c1"], 20, "m2"),
            Commit::new("f1", ["c1"], 15, "feature"),
            Commit::new("c1", Vec::<String>::new(), 10, "m1"),
        ],
        vec![Branch::new("main", "c3")],
    );
    assert_eq!(trace_lineage("c3", &model).unwrap(), set(&["c1", "c2", "c3"]));

    let mut diagnostics = Vec::new();
    let lineages = resolve_lineages(&model, &KeySelection::new(["main"]), &mut diagnostics);
    let subs = Classifier::new(&model, &lineages).classify_all(&mut diagnostics);

    assert_eq!(subs[0].len(), 1);
    let sub = &subs[0][0];
    assert_eq!(sub.commits, vec!["f1".to_string()]);
    assert_eq!(sub.merge_commit.as_deref(), Some("c3"));
    assert_eq!(sub.branch_point.as_deref(), Some("c1"));

    let graph = GraphLayout::build(&model, &KeySelection::new(["main"]), &Default::default());
    let f1 = graph.placement("f1").unwrap();
    assert_eq!((f1.column, f1.offset, f1.row), (0, 1, 2));
    assert_eq!(f1.sub_branch, Some(SubBranchId(0)));
}

#[test]
fn scenario_c_malformed_line_is_skipped() {
    let commits = parse_commits([
        "c3|c2|3|m3",
        "short|line",
        "c2|c1|2|m2",
        "c1||1|m1",
    ]);
    let hashes: Vec<_> = commits.iter().map(|c| c.hash.as_str()).collect();
    assert_eq!(hashes, vec!["c3", "c2", "c1"]);

    let model = Model::new(commits, parse_branches(["main c3"]));
    let graph = GraphLayout::build(&model, &KeySelection::new(["main"]), &Default::default());
    assert_eq!(graph.layout.placements.len(), 3);
    assert!(graph.placement("short").is_none());
}

#[test]
fn scenario_d_empty_feed_still_lays_out() {
    let model = Model::new(parse_commits(std::iter::empty()), Vec::new());
    let selection = KeySelection::default_for(&model, &["main".to_string()]);
    let graph = GraphLayout::build(&model, &selection, &Default::default());

    assert!(model.is_empty());
    assert!(graph.layout.placements.is_empty());
    assert!(graph.edges.is_empty());
    assert_eq!(graph.layout.columns.len(), 1);
}

fn three_lineage_model() -> Model {
    Model::new(
        parse_commits([
            "r3|r2 h1|100|merge hotfix into release",
            "m5|m4 f2|95|merge feature 2",
            "f2|f1|90|feature 2b",
            "h1|r1|85|hotfix",
            "m4|m3 d2|80|merge develop",
            "d2|d1 g1|75|merge g",
            "g1|d1|70|g",
            "f1|m3|65|feature 2a",
            "r2|r1|60|release 2",
            "d1|m2|55|develop 1",
            "r1|m2|50|release cut",
            "x1|m3 d1|45|odd cross merge",
            "m3|m2|40|main 3",
            "m2|m1|20|main 2",
            "m1||10|root",
        ]),
        parse_branches(["main m5", "develop d2", "release r3", "origin/HEAD m5"]),
    )
}

#[test]
fn three_key_branches_end_to_end() {
    let model = three_lineage_model();
    let graph = GraphLayout::build(
        &model,
        &KeySelection::new(["main", "develop", "release"]),
        &Default::default(),
    );
    assert!(graph.diagnostics.is_empty());
    assert_eq!(graph.lineages.len(), 3);

    let column = |hash: &str| graph.placement(hash).unwrap().column;
    assert_eq!(column("m1"), 0);
    assert_eq!(column("d1"), 1);
    assert_eq!(column("r1"), 2);
    assert_eq!(column("h1"), 2);
    assert_eq!(column("g1"), 1);
    assert_eq!(column("f2"), 0);
    // x1 has parents on main and develop: valid for neither.
    assert_eq!(column("x1"), 3);

    let owner = |hash: &str| graph.sub_branch_of(hash).map(|s| s.lineage);
    assert_eq!(owner("f1"), Some(0));
    assert_eq!(owner("g1"), Some(1));
    assert_eq!(owner("h1"), Some(2));
    assert_eq!(owner("x1"), None);
}

#[test]
fn layout_is_idempotent() {
    let model = three_lineage_model();
    let selection = KeySelection::new(["main", "develop", "release"]);
    let first = GraphLayout::build(&model, &selection, &Default::default());
    let second = GraphLayout::build(&model, &selection, &Default::default());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn no_two_sub_branches_share_an_offset_on_a_row() {
    let model = three_lineage_model();
    let graph = GraphLayout::build(
        &model,
        &KeySelection::new(["main", "develop", "release"]),
        &Default::default(),
    );

    let mut taken: HashMap<(usize, usize, u32), SubBranchId> = HashMap::new();
    for subs in &graph.sub_branches {
        for sub in subs {
            let (lo, hi) = graph::layout::sub_branch_span(&model, sub).unwrap();
            let offset = graph.placement(&sub.commits[0]).unwrap().offset;
            for row in lo..=hi {
                if let Some(previous) = taken.insert((sub.lineage, row, offset), sub.id) {
                    panic!("{previous:?} and {:?} share offset {offset} on row {row}", sub.id);
                }
            }
        }
    }
}

#[test]
fn work_after_a_merge_keeps_its_offset_reserved() {
    // f2 continues the feature after c2 merged f1; g1 forks later and
    // spans f2's row.
    let model = Model::new(
        vec![
            Commit::new("c4", ["c3", "g1"], 60, "merge g"),
            Commit::new("g1", ["c3"], 55, "g"),
            Commit::new("f2", ["f1"], 52, "more feature"),
            Commit::new("c3", ["c2"], 50, "main"),
            Commit::new("c2", ["c1", "f1"], 30, "merge f"),
            Commit::new("f1", ["c1"], 20, "feature"),
            Commit::new("c1", Vec::<String>::new(), 10, "root"),
        ],
        vec![Branch::new("main", "c4")],
    );
    let graph = GraphLayout::build(&model, &KeySelection::new(["main"]), &Default::default());
    assert_eq!(graph.sub_branches[0].len(), 2);

    let feature = graph.sub_branch_of("f2").unwrap();
    assert_eq!(feature.merge_commit.as_deref(), Some("c2"));
    assert_eq!(graph::layout::sub_branch_span(&model, feature), Some((2, 6)));

    let offset = |hash: &str| graph.placement(hash).unwrap().offset;
    assert_eq!(offset("f1"), 1);
    assert_eq!(offset("f2"), 1);
    assert_eq!(offset("g1"), 2);
}

#[test]
fn ownership_any_keeps_foreign_merges() {
    let model = three_lineage_model();
    let mut diagnostics = Vec::new();
    let selection = KeySelection::new(["main", "develop"]);
    let lineages = resolve_lineages(&model, &selection, &mut diagnostics);
    let subs = Classifier::new(&model, &lineages)
        .with_ownership(Ownership::Any)
        .classify_all(&mut diagnostics);
    let total: usize = subs.iter().map(Vec::len).sum();
    assert!(total >= 2);
}

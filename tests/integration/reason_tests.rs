//! Explanation integration tests

use depadvice::graph::{GraphBuilder, GraphError};
use depadvice::{
    AnalysisInput, BundleTrace, Coordinates, DependencyAdviceExplainer, DependencyGraph,
    ProjectAnalyzer, ReasonError,
};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Explanation for `id` in the fixture module, the way the CLI builds it
fn explain_fixture(id: &str) -> String {
    let input = AnalysisInput::from_file(&fixture("app.yml")).unwrap();
    let module = input.module_input().unwrap();
    let analysis = ProjectAnalyzer::new().analyze(&module).unwrap();

    let target = input.resolve(id);
    let usages = module
        .dependencies()
        .into_iter()
        .find(|(c, _)| c.identifier == target.identifier)
        .map(|(_, usages)| usages)
        .unwrap_or_default();
    let advice = analysis.advice_for(&target.identifier);
    let graphs = input.graphs();

    DependencyAdviceExplainer::new(&module.project, &target, &graphs)
        .with_usages(&usages)
        .with_advice(advice.first().copied())
        .compute_reason()
        .unwrap()
}

// ============================================================================
// Fixture module
// ============================================================================

#[test]
fn test_explain_transitive_add() {
    let text = explain_fixture("com.squareup.okio:okio");

    assert!(text.contains("You asked about the dependency 'com.squareup.okio:okio:3.6.0'."));
    assert!(text.contains("You have been advised to add this dependency to 'api'."));
    assert!(text.contains(
        "\nShortest path from :app to com.squareup.okio:okio:3.6.0 for debugCompileClasspath:\n\
         :app\n\
         \\--- com.squareup.okhttp3:okhttp:4.12.0\n\
         \x20     \\--- com.squareup.okio:okio:3.6.0\n"
    ));
    assert!(text.contains("for releaseCompileClasspath:"));
    assert!(text.contains(
        "Source: debug\n-------------\n* Exposes 1 class: okio.BufferedSource (implies debugApi).\n"
    ));
}

#[test]
fn test_explain_change() {
    let text = explain_fixture("com.squareup.okhttp3:okhttp");
    assert!(text.contains(
        "You have been advised to change this dependency to 'implementation' from 'api'."
    ));
    assert!(text.contains(
        "* Uses 2 classes: okhttp3.OkHttpClient, okhttp3.Request (implies releaseImplementation)."
    ));
}

#[test]
fn test_explain_unused_declaration() {
    let text = explain_fixture("com.google.dagger:dagger");
    assert!(text.contains("You have been advised to remove this dependency from 'implementation'."));
    assert!(text.contains("Source: release\n---------------\n(no usages)\n"));
}

#[test]
fn test_explain_compile_only_without_advice() {
    let text = explain_fixture("org.jetbrains:annotations");
    assert!(text.contains("There is no advice regarding this dependency.\n"));
    assert!(text.contains("\\--- :lib\n"));
    assert!(text.contains("* Provides compile-time annotations (implies debugCompileOnly)."));
}

// ============================================================================
// Unreachable targets and bundles
// ============================================================================

fn views() -> BTreeMap<String, DependencyGraph> {
    let mut builder = GraphBuilder::new().with_root(":app");
    builder.edges([
        (":app", "g:a:1"),
        ("g:a:1", "g:b:1"),
        ("g:island:1", "g:orphan:1"),
    ]);
    let mut views = BTreeMap::new();
    views.insert("main".to_string(), builder.build());
    views
}

#[test]
fn test_unreachable_target() {
    let project = Coordinates::project(":app").unwrap();
    let target = Coordinates::parse("g:orphan:1");
    let views = views();

    let text = DependencyAdviceExplainer::new(&project, &target, &views)
        .compute_reason()
        .unwrap();
    assert!(text.contains("\nThere is no path from :app to g:orphan:1 for main\n"));
    assert!(!text.contains("Shortest path"));
}

#[test]
fn test_target_missing_from_graph() {
    let project = Coordinates::project(":app").unwrap();
    let target = Coordinates::parse("g:elsewhere:1");
    let views = views();

    let text = DependencyAdviceExplainer::new(&project, &target, &views)
        .compute_reason()
        .unwrap();
    assert!(text.contains("There is no path from :app to g:elsewhere:1 for main"));
}

#[test]
fn test_view_not_rooted_at_project_fails() {
    let project = Coordinates::project(":app").unwrap();
    let target = Coordinates::parse("g:a:1");
    let mut builder = GraphBuilder::new();
    builder.edge(":other", "g:a:1");
    let mut views = BTreeMap::new();
    views.insert("debugCompileClasspath".to_string(), builder.build());

    let result = DependencyAdviceExplainer::new(&project, &target, &views).compute_reason();
    assert!(matches!(
        result,
        Err(ReasonError::Graph(GraphError::MissingNode(_)))
    ));
}

#[test]
fn test_bundle_trace_must_involve_target() {
    let project = Coordinates::project(":app").unwrap();
    let target = Coordinates::parse("g:b:1");
    let views = views();

    let traces = vec![BundleTrace::DeclaredParent {
        parent: Coordinates::parse("g:a:1"),
        child: target.clone(),
    }];
    let text = DependencyAdviceExplainer::new(&project, &target, &views)
        .with_bundle_traces(&traces)
        .compute_reason()
        .unwrap();
    assert!(text.contains("matched a bundle rule for g:a:1, which is already declared."));
    assert!(text.contains(":app\n\\--- g:a:1\n      \\--- g:b:1\n"));

    let unrelated = vec![BundleTrace::DeclaredParent {
        parent: Coordinates::parse("g:x:1"),
        child: Coordinates::parse("g:y:1"),
    }];
    let result = DependencyAdviceExplainer::new(&project, &target, &views)
        .with_bundle_traces(&unrelated)
        .compute_reason();
    assert!(matches!(result, Err(ReasonError::MissingBundleTrace { .. })));
}

#[test]
fn test_colors_can_be_disabled() {
    let project = Coordinates::project(":app").unwrap();
    let target = Coordinates::parse("g:b:1");
    let views = views();

    let text = DependencyAdviceExplainer::new(&project, &target, &views)
        .with_colors(false)
        .compute_reason()
        .unwrap();
    assert!(!text.contains('\u{1b}'));
}

//! Advice integration tests
//!
//! End-to-end advice for the fixture module plus the properties every
//! reduction must hold.

use depadvice::analysis::{AdviceFilter, ModuleInput};
use depadvice::config::IssuesConfig;
use depadvice::{
    Advice, AnalysisInput, Bucket, Coordinates, Location, ProjectAnalyzer, Reason,
    StandardTransform, Usage, UsageTransform, Variant,
};
use std::collections::BTreeSet;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn used(variant: &str, bucket: Bucket) -> Usage {
    Usage::new(
        Variant::new(variant),
        bucket,
        [Reason::Impl { classes: vec!["com.example.Widget".to_string()] }],
    )
}

fn unused(variant: &str) -> Usage {
    Usage::new(Variant::new(variant), Bucket::None, [Reason::Unused])
}

fn widget() -> Coordinates {
    Coordinates::parse("com.example:widget:1.0")
}

fn reduce(locations: &[Location], usages: &[Usage]) -> BTreeSet<Advice> {
    StandardTransform::new(&widget(), locations)
        .reduce(usages)
        .unwrap()
}

fn rendered(advice: &BTreeSet<Advice>) -> Vec<String> {
    advice.iter().map(|a| a.to_string()).collect()
}

// ============================================================================
// Fixture module
// ============================================================================

#[test]
fn test_fixture_advice() {
    let input = AnalysisInput::from_file(&fixture("app.yml")).unwrap();
    let module = input.module_input().unwrap();
    let analysis = ProjectAnalyzer::new().analyze(&module).unwrap();

    assert_eq!(
        rendered(&analysis.advice),
        vec![
            "remove com.google.dagger:dagger from 'implementation'",
            "change com.squareup.okhttp3:okhttp:4.12.0 from 'api' to 'implementation'",
            "add com.squareup.okio:okio:3.6.0 to 'api'",
        ]
    );
    assert!(analysis.filtered.is_empty());
}

#[test]
fn test_fixture_parallel_matches_sequential() {
    let input = AnalysisInput::from_file(&fixture("app.yml")).unwrap();
    let module = input.module_input().unwrap();

    let sequential = ProjectAnalyzer::new().analyze(&module).unwrap();
    let parallel = ProjectAnalyzer::new()
        .with_parallel(true)
        .analyze(&module)
        .unwrap();
    assert_eq!(sequential, parallel);
}

#[test]
fn test_fixture_with_exclude_rule() {
    let input = AnalysisInput::from_file(&fixture("app.yml")).unwrap();
    let module = input.module_input().unwrap();

    let mut issues = IssuesConfig::default();
    issues.on_unused_dependencies.exclude = vec!["com.google.dagger:*".to_string()];
    issues.on_used_transitive_dependencies.exclude = vec!["*:okio".to_string()];

    let analysis = ProjectAnalyzer::new()
        .with_filter(AdviceFilter::from_config(&issues))
        .analyze(&module)
        .unwrap();

    assert_eq!(analysis.advice.len(), 1);
    assert!(analysis.was_filtered("com.google.dagger:dagger"));
    assert!(analysis.was_filtered("com.squareup.okio:okio"));
    assert!(!analysis.was_filtered("com.squareup.okhttp3:okhttp"));
}

#[test]
fn test_many_modules_keep_input_order() {
    let modules: Vec<ModuleInput> = [":a", ":b", ":c"]
        .iter()
        .map(|path| {
            let mut module = ModuleInput::new(Coordinates::project(*path).unwrap());
            module.locations = vec![Location::main("com.example:widget", "api").unwrap()];
            module
        })
        .collect();

    let analyses = ProjectAnalyzer::new()
        .with_parallel(true)
        .analyze_modules(&modules)
        .unwrap();

    let projects: Vec<String> = analyses.iter().map(|a| a.project.to_string()).collect();
    assert_eq!(projects, vec![":a", ":b", ":c"]);
    assert!(analyses
        .iter()
        .all(|a| rendered(&a.advice) == vec!["remove com.example:widget from 'api'"]));
}

// ============================================================================
// Reduction properties
// ============================================================================

#[test]
fn test_applying_advice_is_idempotent() {
    // Declared api, used as implementation everywhere
    let first = reduce(
        &[Location::main("com.example:widget", "api").unwrap()],
        &[used("debug", Bucket::Impl), used("release", Bucket::Impl)],
    );
    assert_eq!(
        rendered(&first),
        vec!["change com.example:widget:1.0 from 'api' to 'implementation'"]
    );

    // Apply it and reduce again
    let second = reduce(
        &[Location::main("com.example:widget", "implementation").unwrap()],
        &[used("debug", Bucket::Impl), used("release", Bucket::Impl)],
    );
    assert!(second.is_empty());
}

#[test]
fn test_redundant_variant_declarations_are_consolidated() {
    let advice = reduce(
        &[
            Location::main("com.example:widget", "implementation").unwrap(),
            Location::new("com.example:widget", "debugImplementation", Variant::new("debug")).unwrap(),
        ],
        &[used("debug", Bucket::Impl), used("release", Bucket::Impl)],
    );
    assert_eq!(
        rendered(&advice),
        vec!["remove com.example:widget:1.0 from 'debugImplementation'"]
    );
}

#[test]
fn test_variant_split_for_undeclared_dependency() {
    let advice = reduce(&[], &[used("debug", Bucket::Api), used("release", Bucket::Impl)]);
    assert_eq!(
        rendered(&advice),
        vec![
            "add com.example:widget:1.0 to 'debugApi'",
            "add com.example:widget:1.0 to 'releaseImplementation'",
        ]
    );
}

#[test]
fn test_compile_only_declaration_is_trusted() {
    let advice = reduce(
        &[Location::main("com.example:widget", "compileOnly").unwrap()],
        &[used("debug", Bucket::Impl), used("release", Bucket::Impl)],
    );
    assert!(advice.is_empty());
}

#[test]
fn test_runtime_only_declaration_is_trusted() {
    let advice = reduce(
        &[Location::main("com.example:widget", "runtimeOnly").unwrap()],
        &[used("debug", Bucket::Impl), used("release", Bucket::Impl)],
    );
    assert!(advice.is_empty());
}

#[test]
fn test_runtime_only_usage_of_declared_dependency_is_left_alone() {
    let advice = reduce(
        &[Location::main("com.example:widget", "implementation").unwrap()],
        &[used("debug", Bucket::RuntimeOnly), used("release", Bucket::RuntimeOnly)],
    );
    assert!(advice.is_empty());
}

#[test]
fn test_unused_everywhere_is_removed() {
    let advice = reduce(
        &[Location::main("com.example:widget", "api").unwrap()],
        &[unused("debug"), unused("release")],
    );
    assert_eq!(rendered(&advice), vec!["remove com.example:widget:1.0 from 'api'"]);
}

#[test]
fn test_reduction_is_deterministic() {
    let locations = [
        Location::new("com.example:widget", "debugApi", Variant::new("debug")).unwrap(),
        Location::new("com.example:widget", "releaseApi", Variant::new("release")).unwrap(),
    ];
    let forward = [used("debug", Bucket::Impl), unused("release")];
    let backward = [unused("release"), used("debug", Bucket::Impl)];

    assert_eq!(reduce(&locations, &forward), reduce(&locations, &backward));
    assert_eq!(
        rendered(&reduce(&locations, &forward)),
        vec![
            "remove com.example:widget:1.0 from 'releaseApi'",
            "change com.example:widget:1.0 from 'debugApi' to 'debugImplementation'",
        ]
    );
}

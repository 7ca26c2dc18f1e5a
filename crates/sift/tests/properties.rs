//! Structural properties that hold for every provider and query shape.

use regex::Regex;
use rstest::rstest;

use sift::compiler::compile_leaf;
use sift::{
    Engine, EngineConfig, LeafQuery, NodeKind, Pattern, ProviderRegistry, SupportedLanguage, parse,
};

const GO_SOURCE: &str = r#"package main

import "fmt"

type User struct {
	Name  string
	Email string
}

func TestCreate() {}

func TestDelete() {}

func helper() {
	fmt.Println("hi")
}

var retries, timeout int
var label string
"#;

#[rstest]
#[case(SupportedLanguage::Go)]
#[case(SupportedLanguage::Rust)]
#[case(SupportedLanguage::Python)]
#[case(SupportedLanguage::TypeScript)]
#[case(SupportedLanguage::JavaScript)]
fn every_pattern_line_has_exactly_one_target(#[case] language: SupportedLanguage) {
    let registry = ProviderRegistry::with_defaults();
    let provider = registry.get(language).expect("built-in provider");
    let target = Regex::new(r"@target\b").expect("valid regex");
    let kinds: Vec<NodeKind> = provider.mapping_table().kinds().collect();
    for kind in kinds {
        let compiled = compile_leaf(&LeafQuery::new(kind, Pattern::Any), provider)
            .unwrap_or_else(|err| panic!("{language} {kind}: {err}"));
        for line in compiled.text().lines() {
            assert_eq!(target.find_iter(line).count(), 1, "{language} {kind}: {line}");
        }
    }
}

#[rstest]
#[case("func:main")]
#[case("!func:Test*")]
#[case("!func:*")]
#[case("struct:User > field:Name")]
#[case("func:a & func:b | func:c")]
#[case("!(func:a | func:b) & var:count int")]
fn display_text_parses_back_to_the_same_query(#[case] text: &str) {
    let query = parse(text).unwrap_or_else(|err| panic!("{text:?}: {err}"));
    let reparsed = parse(&query.to_string())
        .unwrap_or_else(|err| panic!("{query} should reparse: {err}"));
    assert_eq!(reparsed, query);
}

#[rstest]
#[case("func:Test* & func:*Create", "func:Test*")]
#[case("struct:User > field:*", "field:*")]
#[case("func:helper > call:*", "call:*")]
#[case("var:timeout", "var:*")]
#[case("var:timeout int", "var:timeout")]
#[case("struct:User > !field:Name", "field:*")]
fn narrowing_never_adds_results(#[case] narrow: &str, #[case] wide: &str) {
    let engine = Engine::new(EngineConfig::default());
    let run = |text: &str| {
        engine
            .evaluate(SupportedLanguage::Go, text, GO_SOURCE)
            .unwrap_or_else(|err| panic!("{text:?}: {err}"))
    };
    let narrow_results = run(narrow);
    let wide_ids = run(wide).node_ids();
    assert!(!narrow_results.is_empty(), "{narrow:?} found nothing");
    assert!(
        narrow_results
            .iter()
            .all(|result| wide_ids.contains(&result.node)),
        "{narrow:?} is not a subset of {wide:?}"
    );
}

#[rstest]
#[case("func:*", "func:Test*")]
#[case("var:*", "var:timeout")]
#[case("var:*", "var:label string")]
fn complement_and_positive_partition_the_universe(#[case] universe: &str, #[case] positive: &str) {
    let engine = Engine::new(EngineConfig::default());
    let run = |text: &str| {
        engine
            .evaluate(SupportedLanguage::Go, text, GO_SOURCE)
            .unwrap_or_else(|err| panic!("{text:?}: {err}"))
            .node_ids()
    };
    let all = run(universe);
    let matched = run(positive);
    let rest = run(&format!("!{positive}"));
    assert!(matched.is_disjoint(&rest), "{positive:?} overlaps its complement");
    assert_eq!(matched.union(&rest).copied().collect::<std::collections::HashSet<_>>(), all);
}

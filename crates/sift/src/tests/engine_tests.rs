//! Tests for the `Engine` and `QueryPlan` types.

use rstest::{fixture, rstest};
use sift_syntax::providers::GoProvider;
use sift_syntax::{MappingTable, Provider};
use tree_sitter::Node;

use crate::{
    Engine, EngineConfig, EvalError, LeafQuery, NodeKind, Pattern, ProviderRegistry, Query,
    ResultSet, ScopeType, SiftError, SupportedLanguage,
};

const TESTS: &str = "package main

func TestA() {}

func TestB() {}

func Helper() {}
";

const SERVER: &str = r#"package main

import "fmt"

type Server struct {
	Name string
	port int
}

func main() {
	fmt.Println("starting")
	run()
}

func run() {}
"#;

#[fixture]
fn engine() -> Engine {
    Engine::new(EngineConfig::default())
}

fn go(engine: &Engine, query: &str, source: &str) -> ResultSet {
    engine
        .evaluate(SupportedLanguage::Go, query, source)
        .unwrap_or_else(|err| panic!("{query:?} should evaluate: {err}"))
}

/// A Go provider that reports no grammar.
struct Gramless(GoProvider);

impl Provider for Gramless {
    fn language(&self) -> SupportedLanguage {
        self.0.language()
    }

    fn language_grammar(&self) -> Option<tree_sitter::Language> {
        None
    }

    fn mapping_table(&self) -> &MappingTable {
        self.0.mapping_table()
    }

    fn node_to_universal_kind(&self, node: Node<'_>, source: &[u8]) -> Option<NodeKind> {
        self.0.node_to_universal_kind(node, source)
    }
}

// ===== Construction =====

#[rstest]
fn engine_registers_every_language(engine: Engine) {
    let languages: Vec<_> = engine.registry().languages().collect();
    assert_eq!(languages.len(), SupportedLanguage::all().len());
    assert_eq!(engine.config().max_results(), 10_000);
}

#[rstest]
fn plan_remembers_query_and_language(engine: Engine) {
    let plan = engine
        .compile(SupportedLanguage::Go, "struct:User > field:Name")
        .expect("compiles");
    assert_eq!(plan.language(), SupportedLanguage::Go);
    assert_eq!(plan.query().to_string(), "class:User > field:Name");
    assert_eq!(plan.plan().patterns().len(), 1);
}

#[rstest]
fn one_plan_runs_over_many_sources(engine: Engine) {
    let plan = engine.compile(SupportedLanguage::Go, "func:*").expect("compiles");
    let first = engine.execute(&plan, TESTS).expect("runs");
    let second = engine.execute(&plan, SERVER).expect("runs");
    assert_eq!(first.names(), vec!["TestA", "TestB", "Helper"]);
    assert_eq!(second.names(), vec!["main", "run"]);
}

// ===== Errors =====

#[rstest]
fn malformed_text_is_a_parse_error(engine: Engine) {
    let err = engine
        .compile(SupportedLanguage::Go, "func:main &")
        .expect_err("dangling operator");
    assert!(matches!(err, SiftError::Parse(_)));
}

#[rstest]
fn empty_source_is_rejected(engine: Engine) {
    let err = engine
        .evaluate(SupportedLanguage::Go, "func:main", "")
        .expect_err("empty source");
    assert_eq!(err, SiftError::Eval(EvalError::EmptySource));
}

#[test]
fn unregistered_language_has_no_grammar() {
    let engine = Engine::with_registry(EngineConfig::default(), ProviderRegistry::new());
    let err = engine
        .compile(SupportedLanguage::Go, "func:main")
        .expect_err("nothing registered");
    assert!(matches!(
        err,
        SiftError::Eval(EvalError::MissingGrammar { .. })
    ));
}

#[rstest]
fn provider_without_grammar_is_rejected(engine: Engine) {
    let provider = Gramless(GoProvider::new());
    let plan = engine
        .compile(SupportedLanguage::Go, "func:main")
        .expect("compiles");
    let err = engine
        .execute_with(&provider, &plan, TESTS)
        .expect_err("no grammar");
    assert!(matches!(
        err,
        SiftError::Eval(EvalError::MissingGrammar { .. })
    ));
}

#[rstest]
fn sources_with_syntax_errors_are_still_searched(engine: Engine) {
    let source = "package main\n\nfunc main() {}\n\nfunc broken( {\n";
    let results = go(&engine, "func:main", source);
    assert_eq!(results.names(), vec!["main"]);
}

// ===== Results =====

#[rstest]
fn results_carry_location_content_and_provenance(engine: Engine) {
    let results = go(&engine, "func:main", SERVER);
    let main = results.iter().next().expect("one result");
    assert_eq!(main.kind(), NodeKind::Function);
    assert_eq!(main.name(), "main");
    assert_eq!(main.location().start.line, 10);
    assert_eq!(main.location().start.column, 1);
    assert!(main.content().starts_with("func main() {"));
    assert_eq!(main.scope(), ScopeType::File);
    assert!(main.parent_kind().is_none());
    assert_eq!(main.metadata_str("node_type"), Some("function_declaration"));
    assert_eq!(main.metadata_str("query_kind"), Some("function"));
    assert_eq!(main.metadata_str("query_pattern"), Some("main"));
    assert_eq!(main.metadata_str("exported"), Some("false"));
}

#[rstest]
fn nested_results_report_their_structural_parent(engine: Engine) {
    let results = go(&engine, "call:Println", SERVER);
    let call = results.iter().next().expect("one call");
    assert_eq!(call.parent_kind(), Some(NodeKind::Function));
    assert_eq!(call.parent_name(), Some("main"));
    assert_eq!(call.scope(), ScopeType::Function);
}

#[rstest]
fn results_are_in_source_order(engine: Engine) {
    let results = go(&engine, "func:Test* | func:Helper", TESTS);
    assert_eq!(results.names(), vec!["TestA", "TestB", "Helper"]);
}

#[test]
fn result_limit_truncates_and_keeps_the_total() {
    let engine = Engine::new(EngineConfig::default().with_max_results(2));
    let results = go(&engine, "func:*", TESTS);
    assert_eq!(results.names(), vec!["TestA", "TestB"]);
    assert_eq!(results.total_matches(), 3);
}

#[rstest]
#[case::complement("!(func:TestA | func:TestC)", TESTS, vec!["TestB"], 2)]
#[case::intersection("func:* & func:Helper", TESTS, vec!["Helper"], 1)]
#[case::containment("func:main > call:*", SERVER, vec!["Println"], 2)]
fn result_limit_applies_to_the_combined_set(
    #[case] query: &str,
    #[case] source: &str,
    #[case] expected: Vec<&str>,
    #[case] total: usize,
) {
    let engine = Engine::new(EngineConfig::default().with_max_results(1));
    let results = go(&engine, query, source);
    assert_eq!(results.names(), expected, "{query}");
    assert_eq!(results.total_matches(), total, "{query}");
}

#[test]
fn content_is_truncated_to_the_byte_limit() {
    let engine = Engine::new(EngineConfig::default().with_max_content_bytes(4));
    let results = go(&engine, "func:TestA", TESTS);
    assert_eq!(
        results.iter().map(|r| r.content()).collect::<Vec<_>>(),
        vec!["func"]
    );
}

// ===== Operators =====

#[rstest]
fn and_intersects(engine: Engine) {
    assert_eq!(go(&engine, "func:Test* & func:*A", TESTS).names(), vec!["TestA"]);
}

#[rstest]
fn or_keeps_duplicates_by_default(engine: Engine) {
    let results = go(&engine, "func:TestA | func:Test*", TESTS);
    assert_eq!(results.names(), vec!["TestA", "TestA", "TestB"]);
}

#[test]
fn or_can_deduplicate() {
    let engine = Engine::new(EngineConfig::default().with_dedupe_union(true));
    let results = go(&engine, "func:TestA | func:Test*", TESTS);
    assert_eq!(results.names(), vec!["TestA", "TestB"]);
}

#[rstest]
fn negated_group_is_a_complement(engine: Engine) {
    let results = go(&engine, "!(func:TestA | func:TestB)", TESTS);
    assert_eq!(results.names(), vec!["Helper"]);
}

#[rstest]
fn negated_wildcard_leaf_is_empty(engine: Engine) {
    assert!(go(&engine, "!func:*", TESTS).is_empty());
}

#[rstest]
fn containment_finds_nested_calls(engine: Engine) {
    let results = go(&engine, "func:main > call:*", SERVER);
    assert_eq!(results.names(), vec!["Println", "run"]);
    assert!(go(&engine, "func:run > call:*", SERVER).is_empty());
}

// ===== Leaf constraints =====

#[rstest]
fn attribute_constraints_filter_results(engine: Engine) {
    let exported = LeafQuery::new(NodeKind::Field, Pattern::Any).with_attribute("exported", "true");
    let plan = engine
        .compile_query(SupportedLanguage::Go, Query::leaf(exported))
        .expect("compiles");
    let results = engine.execute(&plan, SERVER).expect("runs");
    assert_eq!(results.names(), vec!["Name"]);
}

#[rstest]
fn scope_constraints_filter_results(engine: Engine) {
    let in_functions = LeafQuery::new(NodeKind::Call, Pattern::Any).with_scope(ScopeType::Function);
    let at_file = LeafQuery::new(NodeKind::Call, Pattern::Any).with_scope(ScopeType::File);
    let run = |leaf: LeafQuery| {
        let plan = engine
            .compile_query(SupportedLanguage::Go, Query::leaf(leaf))
            .expect("compiles");
        engine.execute(&plan, SERVER).expect("runs").len()
    };
    assert_eq!(run(in_functions), 2);
    assert_eq!(run(at_file), 0);
}

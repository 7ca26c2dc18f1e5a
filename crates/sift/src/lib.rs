//! Structural code search across languages.
//!
//! Sift answers queries such as `class:User > field:Name` or
//! `func:test_* & !func:*_skip` over source files in any language with a
//! registered [`Provider`]. A query is parsed once, compiled into Tree-sitter
//! patterns through the provider's mapping table, and evaluated into
//! language-neutral [`QueryResult`]s.
//!
//! The pipeline has four stages:
//!
//! - [`dsl`] parses query text into a [`Query`] tree.
//! - [`compiler`] renders leaves, and hierarchies of leaves where possible,
//!   into native pattern text.
//! - [`plan`] decides which parts run natively and which are combined as
//!   result sets.
//! - [`evaluator`] runs a plan over one parsed source, using [`algebra`] for
//!   `&`, `|`, `!`, and containment.
//!
//! [`Engine`] wraps all of them behind `compile`, `execute`, and `evaluate`.
//!
//! # Example
//!
//! ```
//! use sift::{Engine, EngineConfig, SupportedLanguage};
//!
//! let source = "type User struct {\n\tName string\n\tAge  int\n}\n";
//! let engine = Engine::new(EngineConfig::default());
//! let results = engine.evaluate(SupportedLanguage::Go, "struct:User > field:Name", source)?;
//! assert_eq!(results.names(), vec!["Name"]);
//! # Ok::<(), sift::SiftError>(())
//! ```

pub mod algebra;
pub mod compiler;
pub mod dsl;
mod engine;
pub mod evaluator;
pub mod plan;
pub mod telemetry;

pub use dsl::parse;
pub use engine::{Engine, QueryPlan};
pub use sift_core::{
    CompileError, CompositeQuery, EngineConfig, EvalError, LeafQuery, LineCol, Location, LogFormat,
    NodeId, NodeKind, Operator, ParseError, Pattern, Query, QueryResult, ResultSet, ScopeType,
    SiftError, WildcardShape,
};
pub use sift_syntax::{Provider, ProviderRegistry, SupportedLanguage};

#[cfg(test)]
mod tests;

//! Core data model and error taxonomy for the Sift structural query engine.
//!
//! This crate provides the language-independent vocabulary shared by every
//! stage of the pipeline: the closed set of universal node kinds, the query
//! AST produced by the DSL parser, the uniform result records produced by the
//! evaluator, and the errors each stage can raise. It is re-exported by the
//! `sift` facade crate for stable public consumption.
//!
//! # Core types
//!
//! - [`NodeKind`] and [`ScopeType`]: the universal vocabulary
//! - [`Query`], [`LeafQuery`], [`Pattern`]: the parsed query AST
//! - [`QueryResult`] and [`ResultSet`]: evaluation output
//! - [`Location`] and [`LineCol`]: one-based source positions
//! - [`ParseError`], [`CompileError`], [`EvalError`], [`SiftError`]
//! - [`EngineConfig`]: engine and logging settings
//!
//! # Example
//!
//! ```
//! use sift_core::{LeafQuery, NodeKind, Pattern, Query};
//!
//! let query = Query::leaf(LeafQuery::new(NodeKind::Function, Pattern::literal("main")));
//! assert_eq!(query.target_kinds(), vec![NodeKind::Function]);
//! ```

mod config;
mod error;
mod kind;
mod location;
mod query;
mod result;

pub use config::{EngineConfig, LogFormat, LogFormatParseError};
pub use error::{CompileError, EvalError, ParseError, SiftError};
pub use kind::{NodeKind, ScopeType};
pub use location::{LineCol, Location};
pub use query::{CompositeQuery, LeafQuery, Operator, Pattern, Query, WildcardShape};
pub use result::{NodeId, QueryResult, ResultSet};

#[cfg(test)]
mod tests;

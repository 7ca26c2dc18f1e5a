//! Tree-sitter grammars and language providers for structural search.
//!
//! This crate is the native half of the query engine:
//!
//! - **Parsing** via [`Parser`], which wraps a Tree-sitter parser for one
//!   [`SupportedLanguage`] and reports syntax errors without failing.
//! - **Templates** via [`NodeMapping`] and [`TemplateNode`], which describe
//!   how each universal kind is spelled in a grammar.
//! - **Providers** via the [`Provider`] trait and its built-in
//!   implementations for Go, Rust, Python, TypeScript and JavaScript.
//! - **Lookup** via [`ProviderRegistry`].
//!
//! # Supported Languages
//!
//! - Go (`.go`)
//! - Rust (`.rs`)
//! - Python (`.py`, `.pyi`)
//! - TypeScript (`.ts`, `.tsx`, `.mts`, `.cts`)
//! - JavaScript (`.js`, `.jsx`, `.mjs`, `.cjs`)
//!
//! # Example
//!
//! ```
//! use sift_syntax::{Parser, ProviderRegistry, SupportedLanguage};
//! use sift_core::NodeKind;
//!
//! let registry = ProviderRegistry::with_defaults();
//! let provider = registry.get(SupportedLanguage::Go).expect("go provider");
//!
//! let mut parser = Parser::new(SupportedLanguage::Go)?;
//! let parsed = parser.parse("package main\n\nfunc main() {}\n")?;
//! let function = parsed.root_node().named_child(1).expect("function");
//! assert_eq!(
//!     provider.node_to_universal_kind(function, parsed.source_bytes()),
//!     Some(NodeKind::Function)
//! );
//! # Ok::<(), sift_syntax::SyntaxError>(())
//! ```

mod error;
mod language;
mod parser;
mod position;
mod provider;
pub mod providers;
mod registry;
mod template;

pub use error::SyntaxError;
pub use language::{LanguageParseError, SupportedLanguage};
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use position::node_location;
pub use provider::{
    IgnorePatterns, MappingTable, Provider, base_attributes, comment_text, default_display_name,
    default_scope_for, enclosing_scope, field_text, first_line, node_text, starts_uppercase,
};
pub use registry::ProviderRegistry;
pub use template::{Element, NodeMapping, NodeShape, Slot, Template, TemplateNode, TextFilter};

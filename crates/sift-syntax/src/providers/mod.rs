//! Built-in providers for the supported languages.
//!
//! Each provider owns an immutable [`MappingTable`](crate::MappingTable)
//! built in its constructor.

mod go;
mod javascript;
mod python;
mod rust;
mod typescript;

pub use go::GoProvider;
pub use javascript::JavaScriptProvider;
pub use python::PythonProvider;
pub use rust::RustProvider;
pub use typescript::TypeScriptProvider;

use crate::language::SupportedLanguage;
use crate::provider::Provider;
use crate::template::{Slot, Template, TemplateNode};

/// Returns the built-in provider for `language`.
#[must_use]
pub fn builtin(language: SupportedLanguage) -> Box<dyn Provider> {
    match language {
        SupportedLanguage::Go => Box::new(GoProvider::new()),
        SupportedLanguage::Rust => Box::new(RustProvider::new()),
        SupportedLanguage::Python => Box::new(PythonProvider::new()),
        SupportedLanguage::TypeScript => Box::new(TypeScriptProvider::new()),
        SupportedLanguage::JavaScript => Box::new(JavaScriptProvider::new()),
    }
}

/// A node of `node_type` bound to the `name` field and captured as the
/// identifier.
fn name_node(node_type: &'static str) -> TemplateNode {
    TemplateNode::new(node_type).field("name").capture(Slot::Name)
}

/// Any named node bound to `field` and captured as the declared type.
fn type_node(field: &'static str) -> TemplateNode {
    TemplateNode::new("_").field(field).capture(Slot::Type)
}

/// A template matching `node_type` with no further structure.
fn bare(node_type: &'static str) -> Template {
    Template::new(TemplateNode::new(node_type))
}

/// A template for `node_type` whose identifier is the `name` field.
fn named(node_type: &'static str, name_type: &'static str) -> Template {
    Template::new(TemplateNode::new(node_type).child(name_node(name_type)))
}

/// Returns `"true"` or `"false"`.
fn flag(value: bool) -> String {
    value.to_string()
}

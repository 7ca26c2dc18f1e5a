//! The query text language.
//!
//! ```text
//! query   := or
//! or      := and (('|' | '||' | 'or') and)*
//! and     := child (('&' | '&&' | 'and') child)*
//! child   := unary ('>' child)?
//! unary   := '!' unary | '(' query ')' | leaf
//! leaf    := kind ':' pattern [type]
//! ```

mod lexer;
mod parser;

pub use parser::parse;

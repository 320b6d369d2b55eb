//! Shared data structures for the ByteLang compiler.
//!
//! - [`Span`]: byte ranges into unit text
//! - [`Token`], [`TokenKind`], [`TokenList`]: lexer output
//! - [`ast`]: syntax tree for packages, environments and sketches
//! - [`registry`]: keyed, insertion-ordered stores

pub mod ast;
pub mod registry;
mod span;
mod token;

pub use ast::{
    CommonDirective, EnvironmentStatement, Expr, ExprKind, Field, Ident, Literal, Operator,
    PackageStatement, PointerKind, Program, SketchStatement, TypeNode, TypeNodeKind,
};
pub use registry::{ImmediateRegistry, Items, MutableRegistry, Registry, RegistryError};
pub use span::Span;
pub use token::{Token, TokenKind, TokenList};

//! Declaration-level TypeScript host for ts2rs.
//!
//! This crate owns everything that touches the surface language:
//! - `scanner` - tokenizer for the declaration subset of TypeScript
//! - `ast` - owned syntax tree for declarations and type expressions
//! - `parser` - recursive-descent parser producing the AST
//! - `modules` - module specifier resolution (relative, `node_modules`,
//!   tsconfig `paths`)
//! - `project` - the module cache and the `TypeHost` implementation
//! - `types` - interned type handles and the `TypeHost` query trait
//!
//! The resolver consumes only the [`TypeHost`] trait; nothing downstream of
//! this crate sees a token or an AST node.

pub mod ast;
pub mod modules;
pub mod parser;
pub mod project;
pub mod scanner;
pub mod types;

pub use project::Project;
pub use types::{
    DeclId, DeclKind, EnumMember, EnumMemberValue, ModuleId, Property, PropertyNode, Symbol,
    TypeHost, TypeId,
};

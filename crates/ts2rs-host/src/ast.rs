//! Owned syntax tree for the declaration subset of TypeScript.
//!
//! Only what type conversion needs survives parsing: interfaces, type
//! aliases, enums, namespaces, and imports. Statements with no bearing on
//! type shapes (functions, variables, classes) are skipped by the parser
//! and never reach this tree.

/// A parsed module: imports plus type declarations in source order.
#[derive(Debug, Clone, Default)]
pub struct ModuleAst {
    pub imports: Vec<ImportDecl>,
    pub declarations: Vec<Declaration>,
}

/// One import statement.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub specifier: String,
    pub kind: ImportKind,
}

#[derive(Debug, Clone)]
pub enum ImportKind {
    /// `import { A, B as C } from "..."` - pairs of (imported, local).
    Named(Vec<(String, String)>),
    /// `import * as ns from "..."`.
    Namespace(String),
    /// Default or side-effect imports; kept only so the module graph edge
    /// exists for transitive lookup.
    Bare,
}

#[derive(Debug, Clone)]
pub enum Declaration {
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Enum(EnumDecl),
    /// `namespace Ns { ... }` - members are registered under `Ns.Member`.
    Namespace(NamespaceDecl),
}

#[derive(Debug, Clone)]
pub struct InterfaceDecl {
    pub name: String,
    pub exported: bool,
    pub type_params: Vec<String>,
    pub extends: Vec<TypeExpr>,
    pub body: ObjectBody,
    pub doc: Option<String>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct TypeAliasDecl {
    pub name: String,
    pub exported: bool,
    pub type_params: Vec<String>,
    pub aliased: TypeExpr,
    pub doc: Option<String>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct EnumDecl {
    pub name: String,
    pub exported: bool,
    pub members: Vec<EnumMemberDecl>,
    pub doc: Option<String>,
    pub line: u32,
}

#[derive(Debug, Clone)]
pub struct EnumMemberDecl {
    pub name: String,
    pub initializer: Option<EnumInitializer>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone)]
pub enum EnumInitializer {
    String(String),
    Number(f64),
}

#[derive(Debug, Clone)]
pub struct NamespaceDecl {
    pub name: String,
    pub exported: bool,
    pub declarations: Vec<Declaration>,
}

/// Body of an interface or inline object type.
#[derive(Debug, Clone, Default)]
pub struct ObjectBody {
    pub properties: Vec<PropertySig>,
    pub string_index: Option<Box<TypeExpr>>,
    pub number_index: Option<Box<TypeExpr>>,
}

#[derive(Debug, Clone)]
pub struct PropertySig {
    /// Wire name, exactly as written (identifier or string literal).
    pub name: String,
    pub optional: bool,
    pub type_expr: TypeExpr,
    pub doc: Option<String>,
    pub line: u32,
}

/// A type expression. Constructs outside the supported subset parse to
/// `Function` or `Unsupported` and take the fallback path downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Keyword(TypeKeyword),
    StringLit(String),
    NumberLit(f64),
    BoolLit(bool),
    /// A possibly-qualified reference: `Name`, `Ns.Member`, `Map<K, V>`.
    Reference { name: String, args: Vec<TypeExpr> },
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Object(ObjectBody),
    Paren(Box<TypeExpr>),
    /// Any function or constructor type.
    Function,
    /// Recognized but unconvertible syntax, with the reason it is.
    Unsupported(String),
}

impl PartialEq for ObjectBody {
    fn eq(&self, other: &Self) -> bool {
        // Properties compare by name and optionality only.
        self.properties.len() == other.properties.len()
            && self
                .properties
                .iter()
                .zip(&other.properties)
                .all(|(a, b)| a.name == b.name && a.optional == b.optional)
            && self.string_index == other.string_index
            && self.number_index == other.number_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Any,
    Unknown,
    Never,
    Void,
    Object,
    Symbol,
    BigInt,
}

impl TypeKeyword {
    /// Parse an identifier as a type keyword.
    #[must_use]
    pub fn from_ident(name: &str) -> Option<TypeKeyword> {
        Some(match name {
            "string" => TypeKeyword::String,
            "number" => TypeKeyword::Number,
            "boolean" => TypeKeyword::Boolean,
            "null" => TypeKeyword::Null,
            "undefined" => TypeKeyword::Undefined,
            "any" => TypeKeyword::Any,
            "unknown" => TypeKeyword::Unknown,
            "never" => TypeKeyword::Never,
            "void" => TypeKeyword::Void,
            "object" => TypeKeyword::Object,
            "symbol" => TypeKeyword::Symbol,
            "bigint" => TypeKeyword::BigInt,
            _ => return None,
        })
    }

    /// The keyword as written in source, for diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TypeKeyword::String => "string",
            TypeKeyword::Number => "number",
            TypeKeyword::Boolean => "boolean",
            TypeKeyword::Null => "null",
            TypeKeyword::Undefined => "undefined",
            TypeKeyword::Any => "any",
            TypeKeyword::Unknown => "unknown",
            TypeKeyword::Never => "never",
            TypeKeyword::Void => "void",
            TypeKeyword::Object => "object",
            TypeKeyword::Symbol => "symbol",
            TypeKeyword::BigInt => "bigint",
        }
    }
}

impl TypeExpr {
    /// Strip redundant parentheses.
    #[must_use]
    pub fn unparenthesized(&self) -> &TypeExpr {
        let mut expr = self;
        while let TypeExpr::Paren(inner) = expr {
            expr = inner;
        }
        expr
    }
}

//! Type handles and the host query trait.
//!
//! Types are interned into an arena owned by the project; handles are plain
//! `u32` newtypes, cheap to copy and hash. The [`TypeHost`] trait is the
//! seam between the front-end and the resolver: the resolver never sees an
//! AST node, only these queries.

use std::path::{Path, PathBuf};
use ts2rs_common::HostError;

/// Handle to an interned type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(pub(crate) u32);

/// Handle to a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(pub(crate) u32);

/// Handle to a loaded module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModuleId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Interface,
    TypeAlias,
    Enum,
}

/// A named symbol behind a type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Bare declaration name (`Member` for `Ns.Member`).
    pub name: String,
    /// The lookup key as written at the use site.
    pub qualified: String,
    /// Declaring module.
    pub module: ModuleId,
    /// True when the declaration lives in an external package.
    pub external: bool,
    pub kind: DeclKind,
    pub decl: DeclId,
}

/// One property of an interface or object type, as the resolver consumes it.
#[derive(Debug, Clone)]
pub struct Property {
    /// Wire name, exactly as declared.
    pub name: String,
    pub optional: bool,
    pub ty: TypeId,
    /// Syntactic form of the declared type, for the nullable-reference
    /// refinement at property sites.
    pub node: PropertyNode,
    pub doc: Option<String>,
    /// Module the property was declared in; name lookups from the property
    /// type start here.
    pub module: ModuleId,
    pub line: u32,
}

/// Syntactic summary of a property's declared type node. Only the shapes
/// the nullable-reference refinement cares about are distinguished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyNode {
    /// `N | null` where `N` is a bare type reference.
    NullableNamed(String),
    /// `N[] | null` or `Array<N> | null` with `N` a bare type reference.
    NullableNamedArray(String),
    Other,
}

/// An enum member with its computed value.
#[derive(Debug, Clone)]
pub struct EnumMember {
    pub name: String,
    pub value: EnumMemberValue,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumMemberValue {
    String(String),
    Number(i64),
}

/// Interned type representation. References stay unexpanded; queries that
/// need their structure chase the referenced declaration on demand.
#[derive(Debug, Clone)]
pub(crate) enum TypeData {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
    Any,
    Unknown,
    StringLiteral(String),
    NumberLiteral(f64),
    BooleanLiteral(bool),
    Array(TypeId),
    Tuple(Vec<TypeId>),
    Union(Vec<TypeId>),
    Object(ObjectShape),
    Reference(ReferenceData),
    TypeParameter(String),
    /// Syntax with no JSON representation, with the reason it has none.
    Unsupported(String),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ObjectShape {
    pub properties: Vec<Property>,
    pub string_index: Option<TypeId>,
    pub number_index: Option<TypeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct ReferenceData {
    /// Possibly-dotted name as written.
    pub name: String,
    pub args: Vec<TypeId>,
    /// Module the reference occurred in.
    pub module: ModuleId,
}

/// The host query interface the resolver runs against.
///
/// A reference implementation backed by the declaration parser lives in
/// [`crate::project::Project`]; anything exposing these queries over a
/// structural type checker can stand in for it.
pub trait TypeHost {
    // -- modules and declarations ----------------------------------------

    /// Add a module to the project so subsequent queries see it.
    fn load_module(&self, path: &Path) -> Result<ModuleId, HostError>;

    /// Find a declaration by (possibly dotted) name: the module itself, its
    /// transitive imports, then any previously-loaded module.
    fn find_declaration(&self, from: ModuleId, name: &str)
        -> Result<Option<DeclId>, HostError>;

    /// Exported interface/type-alias/enum declarations of a module, in
    /// source order.
    fn exported_declarations(&self, module: ModuleId) -> Vec<DeclId>;

    /// Source path of a loaded module.
    fn module_path(&self, module: ModuleId) -> PathBuf;

    fn decl_kind(&self, decl: DeclId) -> DeclKind;
    fn decl_name(&self, decl: DeclId) -> String;
    fn decl_documentation(&self, decl: DeclId) -> Option<String>;
    fn decl_source_path(&self, decl: DeclId) -> PathBuf;
    fn decl_line(&self, decl: DeclId) -> u32;
    fn decl_module(&self, decl: DeclId) -> ModuleId;
    fn decl_type_parameters(&self, decl: DeclId) -> Vec<String>;

    /// Types named in an interface's `extends` clause.
    fn interface_extends(&self, decl: DeclId) -> Vec<TypeId>;

    /// An interface's own properties, in declaration order.
    fn interface_own_properties(&self, decl: DeclId) -> Vec<Property>;

    /// The right-hand side of a type alias; `None` for other declarations.
    fn alias_type(&self, decl: DeclId) -> Option<TypeId>;

    /// Enum members with computed values, in declaration order.
    fn enum_members(&self, decl: DeclId) -> Vec<EnumMember>;

    // -- type predicates -------------------------------------------------

    fn is_string(&self, t: TypeId) -> bool;
    fn is_number(&self, t: TypeId) -> bool;
    fn is_boolean(&self, t: TypeId) -> bool;
    fn is_null(&self, t: TypeId) -> bool;
    fn is_undefined(&self, t: TypeId) -> bool;
    fn is_any(&self, t: TypeId) -> bool;
    fn is_unknown(&self, t: TypeId) -> bool;
    fn is_string_literal(&self, t: TypeId) -> bool;
    fn is_number_literal(&self, t: TypeId) -> bool;
    fn is_boolean_literal(&self, t: TypeId) -> bool;
    fn is_array(&self, t: TypeId) -> bool;
    fn is_tuple(&self, t: TypeId) -> bool;
    fn is_union(&self, t: TypeId) -> bool;
    fn is_object(&self, t: TypeId) -> bool;
    fn is_type_parameter(&self, t: TypeId) -> bool;

    // -- type accessors --------------------------------------------------

    fn literal_string(&self, t: TypeId) -> Option<String>;
    fn literal_number(&self, t: TypeId) -> Option<f64>;
    fn literal_boolean(&self, t: TypeId) -> Option<bool>;
    fn type_parameter_name(&self, t: TypeId) -> Option<String>;
    fn array_element(&self, t: TypeId) -> Option<TypeId>;
    fn tuple_elements(&self, t: TypeId) -> Vec<TypeId>;
    fn union_members(&self, t: TypeId) -> Vec<TypeId>;
    fn type_arguments(&self, t: TypeId) -> Vec<TypeId>;
    fn string_index_value_type(&self, t: TypeId) -> Option<TypeId>;
    fn number_index_value_type(&self, t: TypeId) -> Option<TypeId>;

    /// Properties of an object type. For references to interfaces this is
    /// the flattened view: inherited properties first, own properties last.
    fn properties(&self, t: TypeId) -> Vec<Property>;

    /// The symbol behind a named reference, if it resolves to a user
    /// declaration of any kind.
    fn symbol(&self, t: TypeId) -> Option<Symbol>;

    /// Like [`TypeHost::symbol`], but only when the reference names a type
    /// alias. Mirrors the checker distinction between a type written as an
    /// alias reference and the structure it denotes.
    fn alias_symbol(&self, t: TypeId) -> Option<Symbol>;

    /// The name as written at the use site, for any named reference,
    /// resolvable or not. Drives the well-known-name table.
    fn reference_name(&self, t: TypeId) -> Option<String>;

    /// Module a named reference occurred in; lookups for it start there.
    fn reference_module(&self, t: TypeId) -> Option<ModuleId>;

    /// A human-readable description of the type, for warnings.
    fn describe(&self, t: TypeId) -> String;
}

//! Project state: loaded modules, interned types, and the `TypeHost`
//! implementation backed by the declaration parser.
//!
//! All queries take `&self`; the module cache and type arena live behind a
//! `RefCell` so lazy module loading can happen mid-query. Borrows are kept
//! narrow: every helper copies what it needs out of the cell before any
//! call that might load another module.

use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::debug;
use ts2rs_common::HostError;

use crate::ast::{
    self, Declaration, EnumInitializer, ImportKind, ObjectBody, TypeExpr, TypeKeyword,
};
use crate::modules::{self, ResolutionConfig};
use crate::parser;
use crate::types::{
    DeclId, DeclKind, EnumMember, EnumMemberValue, ModuleId, ObjectShape, Property, PropertyNode,
    ReferenceData, Symbol, TypeData, TypeHost, TypeId,
};

/// Built-in names handled by the resolver's well-known table; the host
/// never resolves them to project declarations.
const WELL_KNOWN: &[&str] = &[
    "Array",
    "ReadonlyArray",
    "Record",
    "Map",
    "Set",
    "Date",
    "Promise",
    "Object",
    "Function",
];

fn is_well_known(name: &str) -> bool {
    WELL_KNOWN.contains(&name) || name.starts_with("__")
}

#[derive(Debug)]
struct ModuleData {
    path: PathBuf,
    external: bool,
    imports: Vec<ast::ImportDecl>,
    /// Declarations keyed by qualified name (`Ns.Member` for namespace
    /// members, bare names at the top level).
    decl_map: FxHashMap<String, DeclId>,
    /// Top-level declarations in source order.
    decl_order: Vec<DeclId>,
    /// Top-level exported declarations; falls back to all top-level
    /// declarations for ambient files with no export markers.
    exported: Vec<DeclId>,
}

#[derive(Debug)]
struct DeclData {
    kind: DeclKind,
    name: String,
    module: ModuleId,
    line: u32,
    doc: Option<String>,
    type_params: Vec<String>,
    extends: Vec<TypeId>,
    own_properties: Vec<Property>,
    string_index: Option<TypeId>,
    number_index: Option<TypeId>,
    alias: Option<TypeId>,
    enum_members: Vec<EnumMember>,
}

#[derive(Default)]
struct Inner {
    overlay: FxHashMap<PathBuf, String>,
    modules: Vec<ModuleData>,
    by_path: FxHashMap<PathBuf, ModuleId>,
    decls: Vec<DeclData>,
    types: Vec<TypeData>,
}

/// A loaded project: module cache, declaration table, and type arena.
#[derive(Default)]
pub struct Project {
    inner: RefCell<Inner>,
    resolution: ResolutionConfig,
}

impl Project {
    #[must_use]
    pub fn new() -> Project {
        Project::default()
    }

    /// Create a project with module resolution settings from a
    /// tsconfig-style file.
    pub fn with_project_hint(hint: &Path) -> Result<Project, HostError> {
        Ok(Project {
            inner: RefCell::default(),
            resolution: ResolutionConfig::from_project_file(hint)?,
        })
    }

    /// Register an in-memory module. Overlay files shadow the disk and
    /// participate in specifier resolution like real files.
    pub fn add_virtual_file(&self, path: impl Into<PathBuf>, source: impl Into<String>) {
        let normalized = modules::normalize_path(&path.into());
        self.inner
            .borrow_mut()
            .overlay
            .insert(normalized, source.into());
    }

    /// Whether a module path can be loaded at all (overlay or disk).
    #[must_use]
    pub fn module_exists(&self, path: &Path) -> bool {
        let normalized = modules::normalize_path(path);
        self.inner.borrow().overlay.contains_key(&normalized) || normalized.is_file()
    }

    pub fn module_path(&self, module: ModuleId) -> PathBuf {
        self.inner.borrow().modules[module.0 as usize].path.clone()
    }

    // =====================================================================
    // Loading and lowering
    // =====================================================================

    fn read_source(&self, path: &Path) -> Result<String, HostError> {
        if let Some(text) = self.inner.borrow().overlay.get(path) {
            return Ok(text.clone());
        }
        std::fs::read_to_string(path).map_err(|e| HostError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn load_normalized(&self, path: PathBuf) -> Result<ModuleId, HostError> {
        if let Some(&id) = self.inner.borrow().by_path.get(&path) {
            return Ok(id);
        }
        debug!(path = %path.display(), "loading module");
        let source = self.read_source(&path)?;
        let ast = parser::parse_module(&source).map_err(|e| HostError::Parse {
            path: path.clone(),
            line: e.line,
            message: e.message,
        })?;

        let mut inner = self.inner.borrow_mut();
        let id = ModuleId(inner.modules.len() as u32);
        inner.modules.push(ModuleData {
            external: modules::is_external_path(&path),
            path: path.clone(),
            imports: ast.imports,
            decl_map: FxHashMap::default(),
            decl_order: Vec::new(),
            exported: Vec::new(),
        });
        inner.by_path.insert(path, id);
        for decl in &ast.declarations {
            lower_declaration(&mut inner, id, "", decl);
        }
        let module = &mut inner.modules[id.0 as usize];
        if module.exported.is_empty() {
            module.exported = module.decl_order.clone();
        }
        Ok(id)
    }

    /// Resolve and load the target of an import specifier.
    fn load_import(&self, from: ModuleId, specifier: &str) -> Result<ModuleId, HostError> {
        let importer = self.module_path(from);
        let resolved = {
            let inner = self.inner.borrow();
            let exists = |p: &Path| inner.overlay.contains_key(p) || p.is_file();
            modules::resolve_specifier(specifier, &importer, &self.resolution, &exists)?
        };
        self.load_normalized(resolved)
    }

    // =====================================================================
    // Internal queries
    // =====================================================================

    fn type_data(&self, t: TypeId) -> TypeData {
        self.inner.borrow().types[t.0 as usize].clone()
    }

    fn decl_data<R>(&self, d: DeclId, f: impl FnOnce(&DeclData) -> R) -> R {
        f(&self.inner.borrow().decls[d.0 as usize])
    }

    fn find_quiet(&self, from: ModuleId, name: &str) -> Option<DeclId> {
        self.find_declaration(from, name).ok().flatten()
    }

    /// Chase a type to its structural form, looking through alias
    /// declarations. References to interfaces and enums stop at the
    /// declaration; unresolvable references are opaque.
    fn chase(&self, t: TypeId) -> Structure {
        let mut current = t;
        let mut seen: FxHashSet<u32> = FxHashSet::default();
        loop {
            let TypeData::Reference(reference) = self.type_data(current) else {
                return Structure::Data(current);
            };
            if is_well_known(&reference.name) {
                return Structure::Opaque;
            }
            let Some(decl) = self.find_quiet(reference.module, &reference.name) else {
                return Structure::Opaque;
            };
            match self.decl_data(decl, |d| (d.kind, d.alias)) {
                (DeclKind::Interface, _) => return Structure::Interface(decl),
                (DeclKind::Enum, _) => return Structure::EnumDecl(decl),
                (DeclKind::TypeAlias, Some(alias)) => {
                    if !seen.insert(decl.0) {
                        return Structure::Opaque;
                    }
                    current = alias;
                }
                (DeclKind::TypeAlias, None) => return Structure::Opaque,
            }
        }
    }

    fn chased_data(&self, t: TypeId) -> Option<TypeData> {
        match self.chase(t) {
            Structure::Data(u) => Some(self.type_data(u)),
            _ => None,
        }
    }

    /// Flattened properties of an interface: every extended interface's
    /// properties first (in extends order), own properties last, later
    /// declarations of a name replacing earlier ones in place.
    fn interface_properties(&self, decl: DeclId, visiting: &mut FxHashSet<u32>) -> Vec<Property> {
        if !visiting.insert(decl.0) {
            return Vec::new();
        }
        let (extends, own) =
            self.decl_data(decl, |d| (d.extends.clone(), d.own_properties.clone()));
        let mut merged: Vec<Property> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        let mut upsert = |props: Vec<Property>, merged: &mut Vec<Property>| {
            for prop in props {
                match index.get(&prop.name) {
                    Some(&at) => merged[at] = prop,
                    None => {
                        index.insert(prop.name.clone(), merged.len());
                        merged.push(prop);
                    }
                }
            }
        };
        for base in extends {
            upsert(self.properties_guarded(base, visiting), &mut merged);
        }
        upsert(own, &mut merged);
        visiting.remove(&decl.0);
        merged
    }

    fn properties_guarded(&self, t: TypeId, visiting: &mut FxHashSet<u32>) -> Vec<Property> {
        match self.chase(t) {
            Structure::Data(u) => match self.type_data(u) {
                TypeData::Object(shape) => shape.properties,
                _ => Vec::new(),
            },
            Structure::Interface(decl) => self.interface_properties(decl, visiting),
            _ => Vec::new(),
        }
    }

    /// An interface's index signature value type, searching the extends
    /// chain when the interface declares none of its own.
    fn interface_index(
        &self,
        decl: DeclId,
        string_key: bool,
        visiting: &mut FxHashSet<u32>,
    ) -> Option<TypeId> {
        if !visiting.insert(decl.0) {
            return None;
        }
        let (own, extends) = self.decl_data(decl, |d| {
            (
                if string_key {
                    d.string_index
                } else {
                    d.number_index
                },
                d.extends.clone(),
            )
        });
        if own.is_some() {
            return own;
        }
        extends
            .into_iter()
            .find_map(|base| self.index_value_guarded(base, string_key, visiting))
    }

    fn index_value_guarded(
        &self,
        t: TypeId,
        string_key: bool,
        visiting: &mut FxHashSet<u32>,
    ) -> Option<TypeId> {
        match self.chase(t) {
            Structure::Data(u) => match self.type_data(u) {
                TypeData::Object(shape) => {
                    if string_key {
                        shape.string_index
                    } else {
                        shape.number_index
                    }
                }
                _ => None,
            },
            Structure::Interface(decl) => self.interface_index(decl, string_key, visiting),
            _ => None,
        }
    }

    fn resolve_symbol(&self, t: TypeId) -> Option<Symbol> {
        let TypeData::Reference(reference) = self.type_data(t) else {
            return None;
        };
        if is_well_known(&reference.name) {
            return None;
        }
        let decl = self.find_quiet(reference.module, &reference.name)?;
        let (name, module, kind) = self.decl_data(decl, |d| (d.name.clone(), d.module, d.kind));
        let external = self.inner.borrow().modules[module.0 as usize].external;
        Some(Symbol {
            name,
            qualified: reference.name,
            module,
            external,
            kind,
            decl,
        })
    }
}

/// Structural classification of a (possibly chased) type.
enum Structure {
    /// A non-reference type in the arena.
    Data(TypeId),
    Interface(DeclId),
    EnumDecl(DeclId),
    /// Built-in, unresolvable, or alias with no right-hand side.
    Opaque,
}

// =========================================================================
// Lowering
// =========================================================================

fn lower_declaration(inner: &mut Inner, module: ModuleId, prefix: &str, decl: &Declaration) {
    match decl {
        Declaration::Interface(iface) => {
            let scope = &iface.type_params;
            let extends = iface
                .extends
                .iter()
                .map(|e| intern_type(inner, e, module, scope))
                .collect();
            let (own_properties, string_index, number_index) =
                lower_object_body(inner, &iface.body, module, scope);
            let data = DeclData {
                kind: DeclKind::Interface,
                name: iface.name.clone(),
                module,
                line: iface.line,
                doc: iface.doc.clone(),
                type_params: iface.type_params.clone(),
                extends,
                own_properties,
                string_index,
                number_index,
                alias: None,
                enum_members: Vec::new(),
            };
            register(inner, module, prefix, &iface.name, iface.exported, data);
        }
        Declaration::TypeAlias(alias) => {
            let aliased = intern_type(inner, &alias.aliased, module, &alias.type_params);
            let data = DeclData {
                kind: DeclKind::TypeAlias,
                name: alias.name.clone(),
                module,
                line: alias.line,
                doc: alias.doc.clone(),
                type_params: alias.type_params.clone(),
                extends: Vec::new(),
                own_properties: Vec::new(),
                string_index: None,
                number_index: None,
                alias: Some(aliased),
                enum_members: Vec::new(),
            };
            register(inner, module, prefix, &alias.name, alias.exported, data);
        }
        Declaration::Enum(decl) => {
            let members = compute_enum_members(&decl.members);
            let data = DeclData {
                kind: DeclKind::Enum,
                name: decl.name.clone(),
                module,
                line: decl.line,
                doc: decl.doc.clone(),
                type_params: Vec::new(),
                extends: Vec::new(),
                own_properties: Vec::new(),
                string_index: None,
                number_index: None,
                alias: None,
                enum_members: members,
            };
            register(inner, module, prefix, &decl.name, decl.exported, data);
        }
        Declaration::Namespace(ns) => {
            let nested = format!("{prefix}{}.", ns.name);
            for member in &ns.declarations {
                lower_declaration(inner, module, &nested, member);
            }
        }
    }
}

fn register(
    inner: &mut Inner,
    module: ModuleId,
    prefix: &str,
    name: &str,
    exported: bool,
    data: DeclData,
) {
    let id = DeclId(inner.decls.len() as u32);
    inner.decls.push(data);
    let qualified = format!("{prefix}{name}");
    let module = &mut inner.modules[module.0 as usize];
    // First declaration of a name wins; interface merging is out of scope.
    if module.decl_map.contains_key(&qualified) {
        return;
    }
    module.decl_map.insert(qualified, id);
    if prefix.is_empty() {
        module.decl_order.push(id);
        if exported {
            module.exported.push(id);
        }
    }
}

fn lower_object_body(
    inner: &mut Inner,
    body: &ObjectBody,
    module: ModuleId,
    scope: &[String],
) -> (Vec<Property>, Option<TypeId>, Option<TypeId>) {
    let properties = body
        .properties
        .iter()
        .map(|prop| Property {
            name: prop.name.clone(),
            optional: prop.optional,
            ty: intern_type(inner, &prop.type_expr, module, scope),
            node: property_node(&prop.type_expr, scope),
            doc: prop.doc.clone(),
            module,
            line: prop.line,
        })
        .collect();
    let string_index = body
        .string_index
        .as_ref()
        .map(|t| intern_type(inner, t, module, scope));
    let number_index = body
        .number_index
        .as_ref()
        .map(|t| intern_type(inner, t, module, scope));
    (properties, string_index, number_index)
}

fn compute_enum_members(members: &[ast::EnumMemberDecl]) -> Vec<EnumMember> {
    let mut next_auto: i64 = 0;
    members
        .iter()
        .map(|member| {
            let value = match &member.initializer {
                Some(EnumInitializer::String(s)) => EnumMemberValue::String(s.clone()),
                Some(EnumInitializer::Number(n)) => {
                    next_auto = *n as i64 + 1;
                    EnumMemberValue::Number(*n as i64)
                }
                None => {
                    let value = next_auto;
                    next_auto += 1;
                    EnumMemberValue::Number(value)
                }
            };
            EnumMember {
                name: member.name.clone(),
                value,
                doc: member.doc.clone(),
            }
        })
        .collect()
}

fn push_type(inner: &mut Inner, data: TypeData) -> TypeId {
    let id = TypeId(inner.types.len() as u32);
    inner.types.push(data);
    id
}

fn intern_type(inner: &mut Inner, expr: &TypeExpr, module: ModuleId, scope: &[String]) -> TypeId {
    let data = match expr {
        TypeExpr::Keyword(keyword) => match keyword {
            TypeKeyword::String => TypeData::String,
            TypeKeyword::Number => TypeData::Number,
            TypeKeyword::Boolean => TypeData::Boolean,
            TypeKeyword::Null => TypeData::Null,
            TypeKeyword::Undefined => TypeData::Undefined,
            TypeKeyword::Any => TypeData::Any,
            TypeKeyword::Unknown => TypeData::Unknown,
            // The `object` keyword behaves like the `Object` built-in.
            TypeKeyword::Object => TypeData::Reference(ReferenceData {
                name: "Object".to_string(),
                args: Vec::new(),
                module,
            }),
            other => TypeData::Unsupported(format!("'{}' type", other.as_str())),
        },
        TypeExpr::StringLit(value) => TypeData::StringLiteral(value.clone()),
        TypeExpr::NumberLit(value) => TypeData::NumberLiteral(*value),
        TypeExpr::BoolLit(value) => TypeData::BooleanLiteral(*value),
        TypeExpr::Reference { name, args } => {
            if args.is_empty() && !name.contains('.') && scope.iter().any(|p| p == name) {
                TypeData::TypeParameter(name.clone())
            } else if (name == "Array" || name == "ReadonlyArray") && args.len() == 1 {
                let element = intern_type(inner, &args[0], module, scope);
                TypeData::Array(element)
            } else {
                let args = args
                    .iter()
                    .map(|a| intern_type(inner, a, module, scope))
                    .collect();
                TypeData::Reference(ReferenceData {
                    name: name.clone(),
                    args,
                    module,
                })
            }
        }
        TypeExpr::Array(element) => {
            let element = intern_type(inner, element, module, scope);
            TypeData::Array(element)
        }
        TypeExpr::Tuple(elements) => {
            let elements = elements
                .iter()
                .map(|e| intern_type(inner, e, module, scope))
                .collect();
            TypeData::Tuple(elements)
        }
        TypeExpr::Union(_) => {
            let mut members = Vec::new();
            flatten_union(expr, &mut members);
            let members = members
                .into_iter()
                .map(|m| intern_type(inner, m, module, scope))
                .collect();
            TypeData::Union(members)
        }
        TypeExpr::Intersection(_) => TypeData::Unsupported("intersection type".to_string()),
        TypeExpr::Object(body) => {
            let (properties, string_index, number_index) =
                lower_object_body(inner, body, module, scope);
            TypeData::Object(ObjectShape {
                properties,
                string_index,
                number_index,
            })
        }
        TypeExpr::Paren(inner_expr) => return intern_type(inner, inner_expr, module, scope),
        TypeExpr::Function => TypeData::Unsupported("function type".to_string()),
        TypeExpr::Unsupported(reason) => TypeData::Unsupported(reason.clone()),
    };
    push_type(inner, data)
}

/// Collect union members, flattening nested and parenthesized unions.
fn flatten_union<'a>(expr: &'a TypeExpr, out: &mut Vec<&'a TypeExpr>) {
    match expr.unparenthesized() {
        TypeExpr::Union(members) => {
            for member in members {
                flatten_union(member, out);
            }
        }
        other => out.push(other),
    }
}

/// Syntactic summary for the nullable-reference refinement: recognizes
/// `N | null` and `N[] | null` (including `Array<N>`) property types.
/// Names bound as type parameters are not references and never qualify.
fn property_node(expr: &TypeExpr, scope: &[String]) -> PropertyNode {
    let named = |name: &str, args: &[TypeExpr]| {
        args.is_empty() && !scope.iter().any(|p| p == name)
    };
    let mut members = Vec::new();
    flatten_union(expr.unparenthesized(), &mut members);
    if members.len() != 2 {
        return PropertyNode::Other;
    }
    let null_count = members
        .iter()
        .filter(|m| matches!(m, TypeExpr::Keyword(TypeKeyword::Null)))
        .count();
    if null_count != 1 {
        return PropertyNode::Other;
    }
    let Some(other) = members
        .iter()
        .find(|m| !matches!(m, TypeExpr::Keyword(TypeKeyword::Null)))
    else {
        return PropertyNode::Other;
    };
    match other {
        TypeExpr::Reference { name, args } if named(name, args) => {
            PropertyNode::NullableNamed(name.clone())
        }
        TypeExpr::Reference { name, args } if name == "Array" && args.len() == 1 => {
            match args[0].unparenthesized() {
                TypeExpr::Reference { name, args } if named(name, args) => {
                    PropertyNode::NullableNamedArray(name.clone())
                }
                _ => PropertyNode::Other,
            }
        }
        TypeExpr::Array(element) => match element.unparenthesized() {
            TypeExpr::Reference { name, args } if named(name, args) => {
                PropertyNode::NullableNamedArray(name.clone())
            }
            _ => PropertyNode::Other,
        },
        _ => PropertyNode::Other,
    }
}

// =========================================================================
// TypeHost implementation
// =========================================================================

impl TypeHost for Project {
    fn load_module(&self, path: &Path) -> Result<ModuleId, HostError> {
        self.load_normalized(modules::normalize_path(path))
    }

    fn module_path(&self, module: ModuleId) -> PathBuf {
        Project::module_path(self, module)
    }

    fn find_declaration(
        &self,
        from: ModuleId,
        name: &str,
    ) -> Result<Option<DeclId>, HostError> {
        let mut visited: FxHashSet<(u32, String)> = FxHashSet::default();
        let mut queue: VecDeque<(ModuleId, String)> = VecDeque::new();
        queue.push_back((from, name.to_string()));

        while let Some((module, wanted)) = queue.pop_front() {
            if !visited.insert((module.0, wanted.clone())) {
                continue;
            }
            let imports = {
                let inner = self.inner.borrow();
                let data = &inner.modules[module.0 as usize];
                if let Some(&decl) = data.decl_map.get(&wanted) {
                    return Ok(Some(decl));
                }
                data.imports.clone()
            };

            let (head, rest) = match wanted.split_once('.') {
                Some((head, rest)) => (head, Some(rest)),
                None => (wanted.as_str(), None),
            };

            for import in &imports {
                match &import.kind {
                    ImportKind::Named(pairs) => {
                        if let Some((original, _)) = pairs.iter().find(|(_, local)| local == head) {
                            let target = self.load_import(module, &import.specifier)?;
                            let lookup = match rest {
                                Some(rest) => format!("{original}.{rest}"),
                                None => original.clone(),
                            };
                            queue.push_back((target, lookup));
                        }
                    }
                    ImportKind::Namespace(alias) => {
                        if alias == head {
                            if let Some(rest) = rest {
                                let target = self.load_import(module, &import.specifier)?;
                                queue.push_back((target, rest.to_string()));
                            }
                        }
                    }
                    ImportKind::Bare => {}
                }
                // Transitive sweep: the name may be declared anywhere in the
                // import graph without being re-exported along the way.
                let target = self.load_import(module, &import.specifier)?;
                queue.push_back((target, wanted.clone()));
            }
        }

        // Previously-loaded modules, in load order.
        let inner = self.inner.borrow();
        for module in &inner.modules {
            if let Some(&decl) = module.decl_map.get(name) {
                return Ok(Some(decl));
            }
        }
        Ok(None)
    }

    fn exported_declarations(&self, module: ModuleId) -> Vec<DeclId> {
        self.inner.borrow().modules[module.0 as usize]
            .exported
            .clone()
    }

    fn decl_kind(&self, decl: DeclId) -> DeclKind {
        self.decl_data(decl, |d| d.kind)
    }

    fn decl_name(&self, decl: DeclId) -> String {
        self.decl_data(decl, |d| d.name.clone())
    }

    fn decl_documentation(&self, decl: DeclId) -> Option<String> {
        self.decl_data(decl, |d| d.doc.clone())
    }

    fn decl_source_path(&self, decl: DeclId) -> PathBuf {
        let module = self.decl_data(decl, |d| d.module);
        self.module_path(module)
    }

    fn decl_line(&self, decl: DeclId) -> u32 {
        self.decl_data(decl, |d| d.line)
    }

    fn decl_module(&self, decl: DeclId) -> ModuleId {
        self.decl_data(decl, |d| d.module)
    }

    fn decl_type_parameters(&self, decl: DeclId) -> Vec<String> {
        self.decl_data(decl, |d| d.type_params.clone())
    }

    fn interface_extends(&self, decl: DeclId) -> Vec<TypeId> {
        self.decl_data(decl, |d| d.extends.clone())
    }

    fn interface_own_properties(&self, decl: DeclId) -> Vec<Property> {
        self.decl_data(decl, |d| d.own_properties.clone())
    }

    fn alias_type(&self, decl: DeclId) -> Option<TypeId> {
        self.decl_data(decl, |d| d.alias)
    }

    fn enum_members(&self, decl: DeclId) -> Vec<EnumMember> {
        self.decl_data(decl, |d| d.enum_members.clone())
    }

    fn is_string(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::String))
    }

    fn is_number(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::Number))
    }

    fn is_boolean(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::Boolean))
    }

    fn is_null(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::Null))
    }

    fn is_undefined(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::Undefined))
    }

    fn is_any(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::Any))
    }

    fn is_unknown(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::Unknown))
    }

    fn is_string_literal(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::StringLiteral(_)))
    }

    fn is_number_literal(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::NumberLiteral(_)))
    }

    fn is_boolean_literal(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::BooleanLiteral(_)))
    }

    fn is_array(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::Array(_)))
    }

    fn is_tuple(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::Tuple(_)))
    }

    fn is_union(&self, t: TypeId) -> bool {
        matches!(self.chased_data(t), Some(TypeData::Union(_)))
    }

    fn is_object(&self, t: TypeId) -> bool {
        match self.chase(t) {
            Structure::Interface(_) => true,
            Structure::Data(u) => matches!(self.type_data(u), TypeData::Object(_)),
            _ => false,
        }
    }

    fn is_type_parameter(&self, t: TypeId) -> bool {
        matches!(self.type_data(t), TypeData::TypeParameter(_))
    }

    fn literal_string(&self, t: TypeId) -> Option<String> {
        match self.chased_data(t) {
            Some(TypeData::StringLiteral(value)) => Some(value),
            _ => None,
        }
    }

    fn literal_number(&self, t: TypeId) -> Option<f64> {
        match self.chased_data(t) {
            Some(TypeData::NumberLiteral(value)) => Some(value),
            _ => None,
        }
    }

    fn literal_boolean(&self, t: TypeId) -> Option<bool> {
        match self.chased_data(t) {
            Some(TypeData::BooleanLiteral(value)) => Some(value),
            _ => None,
        }
    }

    fn type_parameter_name(&self, t: TypeId) -> Option<String> {
        match self.type_data(t) {
            TypeData::TypeParameter(name) => Some(name),
            _ => None,
        }
    }

    fn array_element(&self, t: TypeId) -> Option<TypeId> {
        match self.chased_data(t) {
            Some(TypeData::Array(element)) => Some(element),
            _ => None,
        }
    }

    fn tuple_elements(&self, t: TypeId) -> Vec<TypeId> {
        match self.chased_data(t) {
            Some(TypeData::Tuple(elements)) => elements,
            _ => Vec::new(),
        }
    }

    fn union_members(&self, t: TypeId) -> Vec<TypeId> {
        match self.chased_data(t) {
            Some(TypeData::Union(members)) => members,
            _ => Vec::new(),
        }
    }

    fn type_arguments(&self, t: TypeId) -> Vec<TypeId> {
        match self.type_data(t) {
            TypeData::Reference(reference) => reference.args,
            _ => Vec::new(),
        }
    }

    fn string_index_value_type(&self, t: TypeId) -> Option<TypeId> {
        self.index_value_guarded(t, true, &mut FxHashSet::default())
    }

    fn number_index_value_type(&self, t: TypeId) -> Option<TypeId> {
        self.index_value_guarded(t, false, &mut FxHashSet::default())
    }

    fn properties(&self, t: TypeId) -> Vec<Property> {
        self.properties_guarded(t, &mut FxHashSet::default())
    }

    fn symbol(&self, t: TypeId) -> Option<Symbol> {
        self.resolve_symbol(t)
    }

    fn alias_symbol(&self, t: TypeId) -> Option<Symbol> {
        self.resolve_symbol(t)
            .filter(|sym| sym.kind == DeclKind::TypeAlias)
    }

    fn reference_name(&self, t: TypeId) -> Option<String> {
        match self.type_data(t) {
            TypeData::Reference(reference) => Some(reference.name),
            _ => None,
        }
    }

    fn reference_module(&self, t: TypeId) -> Option<ModuleId> {
        match self.type_data(t) {
            TypeData::Reference(reference) => Some(reference.module),
            _ => None,
        }
    }

    fn describe(&self, t: TypeId) -> String {
        match self.type_data(t) {
            TypeData::Unsupported(reason) => reason,
            TypeData::Reference(reference) => format!("'{}'", reference.name),
            TypeData::TypeParameter(name) => format!("type parameter '{name}'"),
            TypeData::Union(_) => "union type".to_string(),
            TypeData::Object(_) => "object type".to_string(),
            TypeData::Tuple(_) => "tuple type".to_string(),
            TypeData::Array(_) => "array type".to_string(),
            TypeData::Any => "'any'".to_string(),
            TypeData::Unknown => "'unknown'".to_string(),
            TypeData::Null => "'null'".to_string(),
            TypeData::Undefined => "'undefined'".to_string(),
            other => format!("{other:?}").to_lowercase(),
        }
    }
}

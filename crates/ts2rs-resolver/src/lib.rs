//! The resolver: walks the surface type graph and normalizes every
//! reachable declaration into the IR.
//!
//! Resolution is driven entirely through the [`TypeHost`] query trait. A
//! resolver owns the collected map for one run; names currently being
//! resolved sit in a `processing` set that doubles as the cycle sentinel,
//! and any bare self-reference that surfaces while its owner is still in
//! progress gets wrapped in an explicit `Box` to break the cycle.

mod unions;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use ts2rs_common::{case, ConvertError, ConvertOptions};
use ts2rs_host::{DeclId, DeclKind, ModuleId, Property, PropertyNode, Symbol, TypeHost, TypeId};
use ts2rs_ir::{
    CollectedType, EnumValue, Field, LiteralValue, Primitive, ResolvedType, Struct, TypeAlias,
};

/// Names the resolver maps to built-in container and utility types rather
/// than project declarations.
pub(crate) fn is_well_known_name(name: &str) -> bool {
    matches!(
        name,
        "Array" | "ReadonlyArray" | "Record" | "Map" | "Set" | "Date" | "Promise" | "Object"
            | "Function"
    ) || name.starts_with("__")
}

/// Output of a resolver run: collected declarations in insertion order,
/// plus the warnings accumulated along the way.
#[derive(Debug)]
pub struct Resolution {
    pub collected: Vec<CollectedType>,
    pub warnings: Vec<String>,
}

pub struct Resolver<'a> {
    host: &'a dyn TypeHost,
    options: &'a ConvertOptions,
    collected: FxHashMap<String, CollectedType>,
    order: Vec<String>,
    processing: FxHashSet<String>,
    warnings: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(host: &'a dyn TypeHost, options: &'a ConvertOptions) -> Resolver<'a> {
        Resolver {
            host,
            options,
            collected: FxHashMap::default(),
            order: Vec::new(),
            processing: FxHashSet::default(),
            warnings: Vec::new(),
        }
    }

    /// Resolve the requested root types, or every exported declaration of
    /// the entry module when no roots were given.
    pub fn resolve(mut self, entry: ModuleId) -> Result<Resolution, ConvertError> {
        if self.options.type_names.is_empty() {
            for decl in self.host.exported_declarations(entry) {
                self.resolve_decl(decl)?;
            }
        } else {
            for name in &self.options.type_names.clone() {
                let Some(decl) = self.host.find_declaration(entry, name)? else {
                    return Err(ConvertError::TypeNotFound { name: name.clone() });
                };
                self.resolve_decl(decl)?;
            }
        }

        let mut collected = Vec::with_capacity(self.order.len());
        for name in &self.order {
            if let Some(ty) = self.collected.remove(name) {
                collected.push(ty);
            }
        }
        Ok(Resolution {
            collected,
            warnings: self.warnings,
        })
    }

    // =====================================================================
    // Declaration resolution
    // =====================================================================

    pub(crate) fn collect(&mut self, ty: CollectedType) {
        let name = ty.name().to_string();
        if self.collected.contains_key(&name) {
            return;
        }
        self.order.push(name.clone());
        self.collected.insert(name, ty);
    }

    pub(crate) fn is_known(&self, name: &str) -> bool {
        self.collected.contains_key(name) || self.processing.contains(name)
    }

    fn resolve_decl(&mut self, decl: DeclId) -> Result<(), ConvertError> {
        let name = self.host.decl_name(decl);
        if self.is_known(&name) {
            return Ok(());
        }
        debug!(name = %name, "resolving declaration");
        self.processing.insert(name.clone());
        let result = match self.host.decl_kind(decl) {
            DeclKind::Interface => self.resolve_interface(decl),
            DeclKind::TypeAlias => self.resolve_type_alias(decl),
            DeclKind::Enum => self.resolve_enum(decl),
        };
        self.processing.remove(&name);
        result
    }

    fn resolve_interface(&mut self, decl: DeclId) -> Result<(), ConvertError> {
        let name = self.host.decl_name(decl);
        let mut fields = FieldSet::default();
        for base in self.host.interface_extends(decl) {
            for prop in self.host.properties(base) {
                let field = self.make_field(&name, &prop)?;
                fields.upsert(field);
            }
        }
        for prop in self.host.interface_own_properties(decl) {
            let field = self.make_field(&name, &prop)?;
            fields.upsert(field);
        }
        self.collect(CollectedType::Struct(Struct {
            name: name.clone(),
            fields: fields.into_vec(),
            documentation: self.host.decl_documentation(decl),
            type_parameters: self.host.decl_type_parameters(decl),
        }));
        Ok(())
    }

    fn resolve_enum(&mut self, decl: DeclId) -> Result<(), ConvertError> {
        let members = self.host.enum_members(decl);
        let is_string_enum = members
            .iter()
            .any(|m| matches!(m.value, ts2rs_host::EnumMemberValue::String(_)));
        let variants = members
            .into_iter()
            .map(|member| {
                let name = if is_rust_identifier(&member.name) {
                    member.name.clone()
                } else {
                    case::to_variant_name(&member.name)
                };
                let value = match member.value {
                    ts2rs_host::EnumMemberValue::String(s) => EnumValue::String(s),
                    ts2rs_host::EnumMemberValue::Number(n) => EnumValue::Number(n),
                };
                ts2rs_ir::EnumVariant {
                    name,
                    value: Some(value),
                    documentation: member.doc,
                }
            })
            .collect();
        self.collect(CollectedType::Enum(ts2rs_ir::Enum {
            name: self.host.decl_name(decl),
            variants,
            is_string_enum,
            documentation: self.host.decl_documentation(decl),
        }));
        Ok(())
    }

    fn resolve_type_alias(&mut self, decl: DeclId) -> Result<(), ConvertError> {
        let name = self.host.decl_name(decl);
        let doc = self.host.decl_documentation(decl);
        let Some(aliased) = self.host.alias_type(decl) else {
            return Ok(());
        };
        let site = format!("{name} ({})", self.host.decl_source_path(decl).display());

        if self.host.is_tuple(aliased) {
            let elements = self
                .host
                .tuple_elements(aliased)
                .into_iter()
                .map(|e| self.resolve_type(e, &site))
                .collect::<Result<Vec<_>, _>>()?;
            self.collect(CollectedType::TypeAlias(TypeAlias {
                name,
                aliased: ResolvedType::Tuple(elements),
                documentation: doc,
            }));
            return Ok(());
        }

        // A direct object literal with own properties becomes a struct
        // under the alias name. References to named types fall through to
        // the general path so the alias stays an alias.
        let is_reference = self.host.reference_name(aliased).is_some();
        if !is_reference && self.host.is_object(aliased) {
            let props = self.host.properties(aliased);
            if !props.is_empty() {
                let mut fields = FieldSet::default();
                for prop in &props {
                    fields.upsert(self.make_field(&name, prop)?);
                }
                self.collect(CollectedType::Struct(Struct {
                    name,
                    fields: fields.into_vec(),
                    documentation: doc,
                    type_parameters: self.host.decl_type_parameters(decl),
                }));
                return Ok(());
            }
        }

        if !is_reference && self.host.is_union(aliased) {
            return self.resolve_named_union(&name, aliased, doc, &site);
        }

        let resolved = self.resolve_type(aliased, &site)?;
        self.collect(CollectedType::TypeAlias(TypeAlias {
            name,
            aliased: resolved,
            documentation: doc,
        }));
        Ok(())
    }

    // =====================================================================
    // Fields
    // =====================================================================

    /// Resolve one property into a field: the nullable-reference
    /// refinement, the recursion box, then optional wrapping, in that
    /// order.
    pub(crate) fn make_field(
        &mut self,
        owner: &str,
        prop: &Property,
    ) -> Result<Field, ConvertError> {
        let site = self.property_site(owner, prop);
        let mut ty = match &prop.node {
            PropertyNode::NullableNamed(target) if !is_well_known_name(target) => {
                let inner = self.resolve_reference_name(prop.module, target, &site)?;
                let inner = self.boxed_if_processing(inner);
                inner.into_option()
            }
            PropertyNode::NullableNamedArray(target) if !is_well_known_name(target) => {
                let inner = self.resolve_reference_name(prop.module, target, &site)?;
                ResolvedType::Array(Box::new(inner)).into_option()
            }
            _ => self.resolve_type(prop.ty, &site)?,
        };
        ty = self.boxed_if_processing(ty);
        if prop.optional {
            ty = ty.into_option();
        }
        Ok(Field {
            name: prop.name.clone(),
            ty,
            optional: prop.optional,
            documentation: prop.doc.clone(),
        })
    }

    pub(crate) fn property_site(&self, owner: &str, prop: &Property) -> String {
        format!(
            "{owner}.{} ({}:{})",
            prop.name,
            self.host.module_path(prop.module).display(),
            prop.line
        )
    }

    /// Wrap a bare reference to an in-progress type in `Box`; containers
    /// already supply the indirection recursion needs.
    pub(crate) fn boxed_if_processing(&self, ty: ResolvedType) -> ResolvedType {
        match &ty {
            ResolvedType::StructRef(name) if self.processing.contains(name) => {
                ResolvedType::Box(Box::new(ty))
            }
            _ => ty,
        }
    }

    // =====================================================================
    // Type resolution
    // =====================================================================

    /// Resolve a named reference: collect the target, then refer to it.
    /// An alias that ended up uncollected (an unresolvable union) degrades
    /// to the JSON value at this use site.
    pub(crate) fn resolve_reference_name(
        &mut self,
        module: ModuleId,
        lookup: &str,
        site: &str,
    ) -> Result<ResolvedType, ConvertError> {
        let Some(decl) = self.host.find_declaration(module, lookup)? else {
            return Err(ConvertError::TypeNotFound {
                name: lookup.to_string(),
            });
        };
        let bare = self.host.decl_name(decl);
        self.resolve_decl(decl)?;
        if self.is_known(&bare) {
            Ok(ResolvedType::StructRef(bare))
        } else {
            self.fallback(
                format!("type alias '{lookup}' has no nominal representation"),
                site,
            )
        }
    }

    fn resolve_symbol_ref(
        &mut self,
        symbol: &Symbol,
        site: &str,
    ) -> Result<ResolvedType, ConvertError> {
        self.resolve_decl(symbol.decl)?;
        if self.is_known(&symbol.name) {
            Ok(ResolvedType::StructRef(symbol.name.clone()))
        } else {
            self.fallback(
                format!("type alias '{}' has no nominal representation", symbol.qualified),
                site,
            )
        }
    }

    /// The core dispatcher. Rules apply in a fixed order; the first match
    /// wins. The type-parameter check deliberately precedes the alias
    /// check so a parameter shadowing an alias name is never mis-resolved.
    pub(crate) fn resolve_type(
        &mut self,
        t: TypeId,
        site: &str,
    ) -> Result<ResolvedType, ConvertError> {
        let host = self.host;

        // 1. Unbound generic parameter.
        if host.is_type_parameter(t) {
            let name = host.type_parameter_name(t).unwrap_or_default();
            return self.fallback(format!("type parameter '{name}' unresolved"), site);
        }

        // 2. Reference to a user-named alias.
        if let Some(symbol) = host.alias_symbol(t) {
            return self.resolve_symbol_ref(&symbol, site);
        }

        // 3-4. Primitives; single literals collapse to their ground type.
        if host.is_null(t) {
            return Ok(ResolvedType::Primitive(Primitive::Null));
        }
        if host.is_undefined(t) {
            return Ok(ResolvedType::Primitive(Primitive::Undefined));
        }
        if host.is_string(t) || host.is_string_literal(t) {
            return Ok(ResolvedType::Primitive(Primitive::String));
        }
        if host.is_number(t) || host.is_number_literal(t) {
            return Ok(ResolvedType::Primitive(Primitive::Number));
        }
        if host.is_boolean(t) || host.is_boolean_literal(t) {
            return Ok(ResolvedType::Primitive(Primitive::Boolean));
        }

        // 5. Explicit dynamic types fall back without a warning.
        if host.is_any(t) || host.is_unknown(t) {
            if self.options.strict {
                return Err(ConvertError::type_conversion(
                    site,
                    "explicit 'any' or 'unknown' is not allowed in strict mode",
                ));
            }
            return Ok(ResolvedType::JsonValue);
        }

        // 6-7. Containers.
        if let Some(element) = host.array_element(t) {
            let element = self.resolve_type(element, site)?;
            return Ok(ResolvedType::Array(Box::new(element)));
        }
        if host.is_tuple(t) {
            let elements = host
                .tuple_elements(t)
                .into_iter()
                .map(|e| self.resolve_type(e, site))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(ResolvedType::Tuple(elements));
        }

        // 8. Inline unions.
        if host.is_union(t) {
            return self.resolve_inline_union(t, site);
        }

        let props = host.properties(t);

        // 9. Index signature without own properties.
        if props.is_empty() {
            if let Some(value) = host.string_index_value_type(t) {
                let value = self.resolve_type(value, site)?;
                return Ok(ResolvedType::Record(
                    Box::new(ResolvedType::Primitive(Primitive::String)),
                    Box::new(value),
                ));
            }
            if let Some(value) = host.number_index_value_type(t) {
                let value = self.resolve_type(value, site)?;
                return Ok(ResolvedType::Record(
                    Box::new(ResolvedType::Primitive(Primitive::Number)),
                    Box::new(value),
                ));
            }
        }

        // 10. Named object from an external package: materialize its
        // structure under the bare symbol name.
        if let Some(symbol) = host.symbol(t) {
            if symbol.external && !props.is_empty() {
                return self.materialize_external(&symbol, &props);
            }
        }

        // 11. Well-known names.
        if let Some(name) = host.reference_name(t) {
            match name.as_str() {
                "Array" | "ReadonlyArray" => {
                    let element = match host.type_arguments(t).first() {
                        Some(&arg) => self.resolve_type(arg, site)?,
                        None => self.fallback(format!("'{name}' without a type argument"), site)?,
                    };
                    return Ok(ResolvedType::Array(Box::new(element)));
                }
                "Record" | "Map" => {
                    let args = host.type_arguments(t);
                    if args.len() != 2 {
                        return self
                            .fallback(format!("'{name}' expects two type arguments"), site);
                    }
                    let key = self.resolve_type(args[0], site)?;
                    let value = self.resolve_type(args[1], site)?;
                    return Ok(if name == "Record" {
                        ResolvedType::Record(Box::new(key), Box::new(value))
                    } else {
                        ResolvedType::Map(Box::new(key), Box::new(value))
                    });
                }
                "Set" => {
                    let element = match host.type_arguments(t).first() {
                        Some(&arg) => self.resolve_type(arg, site)?,
                        None => self.fallback("'Set' without a type argument".to_string(), site)?,
                    };
                    return Ok(ResolvedType::Set(Box::new(element)));
                }
                // Dates travel as ISO-8601 strings.
                "Date" => return Ok(ResolvedType::Primitive(Primitive::String)),
                "Promise" => {
                    return Err(ConvertError::NonSerializable {
                        name: "Promise".to_string(),
                    })
                }
                _ if name == "Object" || name == "Function" || name.starts_with("__") => {
                    return self.fallback(format!("'{name}' is not representable"), site);
                }
                _ => {}
            }

            // 12. Any other named nominal type.
            if let Some(module) = host.reference_module(t) {
                return self.resolve_reference_name(module, &name, site);
            }
        }

        // 13. Anonymous object literal.
        if !props.is_empty() && host.is_object(t) {
            let mut fields = Vec::with_capacity(props.len());
            for prop in &props {
                fields.push(self.make_field(site, prop)?);
            }
            return Ok(ResolvedType::AnonymousStruct(fields));
        }

        // 14. Everything else.
        let description = host.describe(t);
        self.fallback(format!("{description} is not representable"), site)
    }

    fn materialize_external(
        &mut self,
        symbol: &Symbol,
        props: &[Property],
    ) -> Result<ResolvedType, ConvertError> {
        let name = symbol.name.clone();
        if !self.is_known(&name) {
            debug!(name = %name, "materializing external type structurally");
            self.processing.insert(name.clone());
            let mut fields = FieldSet::default();
            for prop in props {
                let field = self.make_field(&name, prop)?;
                fields.upsert(field);
            }
            self.processing.remove(&name);
            self.collect(CollectedType::Struct(Struct {
                name: name.clone(),
                fields: fields.into_vec(),
                documentation: self.host.decl_documentation(symbol.decl),
                type_parameters: self.host.decl_type_parameters(symbol.decl),
            }));
        }
        Ok(ResolvedType::StructRef(name))
    }

    // =====================================================================
    // Fallback accounting
    // =====================================================================

    /// Produce the dynamic JSON value, warning in normal mode and raising
    /// in strict mode.
    pub(crate) fn fallback(
        &mut self,
        reason: String,
        site: &str,
    ) -> Result<ResolvedType, ConvertError> {
        if self.options.strict {
            return Err(ConvertError::type_conversion(site, reason));
        }
        debug!(site = %site, reason = %reason, "falling back to JSON value");
        self.warnings
            .push(format!("{reason}; using serde_json::Value in {site}"));
        Ok(ResolvedType::JsonValue)
    }

    pub(crate) fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    pub(crate) fn host(&self) -> &'a dyn TypeHost {
        self.host
    }

    pub(crate) fn literal_of(&self, t: TypeId) -> Option<LiteralValue> {
        if let Some(value) = self.host.literal_string(t) {
            return Some(LiteralValue::String(value));
        }
        if let Some(value) = self.host.literal_number(t) {
            return Some(LiteralValue::Number(value));
        }
        self.host.literal_boolean(t).map(LiteralValue::Boolean)
    }
}

/// Ordered field set where a later field with the same wire name replaces
/// the earlier one in place, keeping the original position.
#[derive(Default)]
pub(crate) struct FieldSet {
    fields: Vec<Field>,
    index: FxHashMap<String, usize>,
}

impl FieldSet {
    pub(crate) fn upsert(&mut self, field: Field) {
        match self.index.get(&field.name) {
            Some(&at) => self.fields[at] = field,
            None => {
                self.index.insert(field.name.clone(), self.fields.len());
                self.fields.push(field);
            }
        }
    }

    pub(crate) fn into_vec(self) -> Vec<Field> {
        self.fields
    }
}

fn is_rust_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Format a number literal as an identifier suffix: `2` -> `2`,
/// `-1` -> `Neg1`, `2.5` -> `2_5`.
pub(crate) fn number_ident(value: f64) -> String {
    let text = if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}").replace('.', "_")
    };
    text.replace('-', "Neg")
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;

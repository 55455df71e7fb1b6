//! Union classification: literal unions become enums, discriminated
//! unions become tagged sum types, and whatever is left becomes an
//! untagged union or falls back entirely.

use rustc_hash::FxHashSet;
use tracing::debug;
use ts2rs_common::{case, ConvertError};
use ts2rs_host::{Property, TypeId};
use ts2rs_ir::{
    CollectedType, Enum, EnumValue, EnumVariant, Field, LiteralValue, Primitive, ResolvedType,
    TypeAlias, Union, UnionVariant,
};

use crate::{number_ident, Resolver};

impl<'a> Resolver<'a> {
    /// A union at an inline use site. Anonymous unions cannot become
    /// nominal types, so beyond the nullable single-variant shape
    /// everything degrades to the JSON value.
    pub(crate) fn resolve_inline_union(
        &mut self,
        t: TypeId,
        site: &str,
    ) -> Result<ResolvedType, ConvertError> {
        let host = self.host();
        let members = host.union_members(t);
        let (nulls, rest): (Vec<TypeId>, Vec<TypeId>) = members
            .into_iter()
            .partition(|&m| host.is_null(m) || host.is_undefined(m));

        if rest.is_empty() {
            let inner = self.fallback("union has only null and undefined members".into(), site)?;
            return Ok(inner.into_option());
        }
        if rest.len() == 1 {
            let inner = self.resolve_type(rest[0], site)?;
            let inner = self.boxed_if_processing(inner);
            return Ok(inner.into_option());
        }
        let all_literals = rest.iter().all(|&m| {
            host.is_string_literal(m) || host.is_number_literal(m) || host.is_boolean_literal(m)
        });
        if all_literals && nulls.is_empty() {
            return self.fallback("inline literal union must be a named type".into(), site);
        }
        let inner = self.fallback(
            "inline union with multiple variants cannot be named".into(),
            site,
        )?;
        Ok(inner.into_option())
    }

    /// A union on the right-hand side of a named alias.
    pub(crate) fn resolve_named_union(
        &mut self,
        name: &str,
        aliased: TypeId,
        doc: Option<String>,
        site: &str,
    ) -> Result<(), ConvertError> {
        let host = self.host();
        let members = host.union_members(aliased);

        let literalish = members.iter().all(|&m| {
            host.is_string_literal(m)
                || host.is_number_literal(m)
                || host.is_null(m)
                || host.is_undefined(m)
        });
        let has_literal = members
            .iter()
            .any(|&m| host.is_string_literal(m) || host.is_number_literal(m));
        if literalish && has_literal {
            return self.resolve_literal_union_as_enum(name, &members, doc);
        }

        let non_null: Vec<TypeId> = members
            .iter()
            .copied()
            .filter(|&m| !host.is_null(m) && !host.is_undefined(m))
            .collect();

        if non_null.is_empty() {
            let inner = self.fallback("union has only null and undefined members".into(), site)?;
            self.collect(CollectedType::TypeAlias(TypeAlias {
                name: name.to_string(),
                aliased: inner.into_option(),
                documentation: doc,
            }));
            return Ok(());
        }
        if non_null.len() == 1 {
            let inner = self.resolve_type(non_null[0], site)?;
            let inner = self.boxed_if_processing(inner);
            self.collect(CollectedType::TypeAlias(TypeAlias {
                name: name.to_string(),
                aliased: inner.into_option(),
                documentation: doc,
            }));
            return Ok(());
        }

        if let Some(discriminator) = self.find_discriminator(&non_null) {
            return self.resolve_discriminated_union(name, &non_null, &discriminator, doc);
        }
        self.resolve_general_union(name, &non_null, doc, site)
    }

    /// A union of string/number literals becomes an enum; null and
    /// undefined members are stripped during collection.
    fn resolve_literal_union_as_enum(
        &mut self,
        name: &str,
        members: &[TypeId],
        doc: Option<String>,
    ) -> Result<(), ConvertError> {
        let host = self.host();
        let mut variants = Vec::new();
        let mut is_string_enum = false;
        for &member in members {
            if let Some(value) = host.literal_string(member) {
                is_string_enum = true;
                variants.push(EnumVariant {
                    name: case::to_variant_name(&value),
                    value: Some(EnumValue::String(value)),
                    documentation: None,
                });
            } else if let Some(value) = host.literal_number(member) {
                variants.push(EnumVariant {
                    name: format!("Value{}", number_ident(value)),
                    value: Some(EnumValue::Number(value as i64)),
                    documentation: None,
                });
            }
            // null/undefined members vanish here.
        }
        self.collect(CollectedType::Enum(Enum {
            name: name.to_string(),
            variants,
            is_string_enum,
            documentation: doc,
        }));
        Ok(())
    }

    /// A union of at least two object members is discriminated when some
    /// property is declared with a literal type in every member. The first
    /// qualifying property of the first member wins.
    fn find_discriminator(&self, members: &[TypeId]) -> Option<String> {
        let host = self.host();
        if members.len() < 2 {
            return None;
        }
        if !members
            .iter()
            .all(|&m| host.is_object(m) && !host.properties(m).is_empty())
        {
            return None;
        }
        let member_props: Vec<Vec<Property>> =
            members.iter().map(|&m| host.properties(m)).collect();
        for candidate in &member_props[0] {
            let is_literal = |ty: TypeId| {
                host.is_string_literal(ty)
                    || host.is_number_literal(ty)
                    || host.is_boolean_literal(ty)
            };
            if !is_literal(candidate.ty) {
                continue;
            }
            if member_props.iter().all(|props| {
                props
                    .iter()
                    .any(|p| p.name == candidate.name && is_literal(p.ty))
            }) {
                return Some(candidate.name.clone());
            }
        }
        None
    }

    fn resolve_discriminated_union(
        &mut self,
        name: &str,
        members: &[TypeId],
        discriminator: &str,
        doc: Option<String>,
    ) -> Result<(), ConvertError> {
        debug!(name = %name, discriminator = %discriminator, "collecting discriminated union");
        let mut variants = Vec::new();
        let mut taken: FxHashSet<String> = FxHashSet::default();
        for &member in members {
            let props = self.host().properties(member);
            let disc_prop = props
                .iter()
                .find(|p| p.name == discriminator)
                .cloned();
            let Some(disc_prop) = disc_prop else { continue };
            let Some(value) = self.literal_of(disc_prop.ty) else {
                continue;
            };

            let base_name = match &value {
                LiteralValue::String(s) => case::to_variant_name(s),
                LiteralValue::Number(n) => format!("Value{}", number_ident(*n)),
                LiteralValue::Boolean(true) => "True".to_string(),
                LiteralValue::Boolean(false) => "False".to_string(),
            };
            let mut variant_name = base_name.clone();
            let mut counter = 2;
            while !taken.insert(variant_name.clone()) {
                variant_name = format!("{base_name}{counter}");
                counter += 1;
            }

            let mut fields: Vec<Field> = Vec::new();
            for prop in &props {
                if prop.name == discriminator {
                    // A string discriminator is reconstructed from the
                    // variant tag at serialization time; numeric and
                    // boolean tags stay in the payload.
                    match &value {
                        LiteralValue::String(_) => {}
                        LiteralValue::Number(_) => fields.push(Field {
                            name: prop.name.clone(),
                            ty: ResolvedType::Primitive(Primitive::Number),
                            optional: false,
                            documentation: prop.doc.clone(),
                        }),
                        LiteralValue::Boolean(_) => fields.push(Field {
                            name: prop.name.clone(),
                            ty: ResolvedType::Primitive(Primitive::Boolean),
                            optional: false,
                            documentation: prop.doc.clone(),
                        }),
                    }
                    continue;
                }
                fields.push(self.make_field(name, prop)?);
            }

            variants.push(UnionVariant {
                name: variant_name,
                ty: if fields.is_empty() {
                    None
                } else {
                    Some(ResolvedType::AnonymousStruct(fields))
                },
                discriminator_value: Some(value),
            });
        }
        self.collect(CollectedType::Union(Union {
            name: name.to_string(),
            variants,
            discriminator: Some(discriminator.to_string()),
            documentation: doc,
        }));
        Ok(())
    }

    /// A union with no discriminator. If every member resolves nominally
    /// the union is collected untagged; one unrepresentable member and the
    /// alias is dropped entirely, leaving use sites to fall back.
    fn resolve_general_union(
        &mut self,
        name: &str,
        members: &[TypeId],
        doc: Option<String>,
        site: &str,
    ) -> Result<(), ConvertError> {
        let mut resolved = Vec::with_capacity(members.len());
        for &member in members {
            resolved.push(self.resolve_type(member, site)?);
        }
        if resolved.iter().any(ResolvedType::is_json_value) {
            self.warn(format!(
                "union type '{name}' has members with no nominal representation; \
                 it will not be emitted and uses of it fall back to serde_json::Value"
            ));
            return Ok(());
        }

        let mut taken: FxHashSet<String> = FxHashSet::default();
        let variants = resolved
            .into_iter()
            .map(|ty| {
                let base = general_variant_name(&ty);
                let mut variant_name = base.clone();
                let mut counter = 2;
                while !taken.insert(variant_name.clone()) {
                    variant_name = format!("{base}{counter}");
                    counter += 1;
                }
                UnionVariant {
                    name: variant_name,
                    ty: Some(ty),
                    discriminator_value: None,
                }
            })
            .collect();
        self.collect(CollectedType::Union(Union {
            name: name.to_string(),
            variants,
            discriminator: None,
            documentation: doc,
        }));
        Ok(())
    }
}

fn general_variant_name(ty: &ResolvedType) -> String {
    match ty {
        ResolvedType::StructRef(name) => name.clone(),
        ResolvedType::Primitive(Primitive::String) => "String".to_string(),
        ResolvedType::Primitive(Primitive::Number) => "Number".to_string(),
        ResolvedType::Primitive(Primitive::Boolean) => "Boolean".to_string(),
        ResolvedType::Primitive(_) => "Null".to_string(),
        ResolvedType::Array(_) => "Array".to_string(),
        ResolvedType::Tuple(_) => "Tuple".to_string(),
        ResolvedType::Record(_, _) | ResolvedType::Map(_, _) => "Map".to_string(),
        ResolvedType::Set(_) => "Set".to_string(),
        ResolvedType::AnonymousStruct(_) => "Object".to_string(),
        ResolvedType::Option(inner) | ResolvedType::Box(inner) => general_variant_name(inner),
        ResolvedType::Literal(LiteralValue::String(s)) => case::to_variant_name(s),
        ResolvedType::Literal(LiteralValue::Number(n)) => format!("Value{}", number_ident(*n)),
        ResolvedType::Literal(LiteralValue::Boolean(true)) => "True".to_string(),
        ResolvedType::Literal(LiteralValue::Boolean(false)) => "False".to_string(),
        ResolvedType::JsonValue | ResolvedType::TypeParameter(_) => "Value".to_string(),
    }
}

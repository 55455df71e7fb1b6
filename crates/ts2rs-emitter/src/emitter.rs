//! IR to Rust rendering.
//!
//! Rendering is deterministic: the same collected set produces
//! byte-identical output. Imports are computed from the IR tags actually
//! used, anonymous structs are hoisted to positionally-named declarations
//! right after the type that needed them, and user-supplied mappings
//! replace named references at the point of rendering.

use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use ts2rs_common::{case, ConvertOptions};
use ts2rs_ir::{
    CollectedType, Enum, EnumValue, Field, LiteralValue, Primitive, ResolvedType, Struct,
    TypeAlias, Union, UnionVariant,
};

use crate::writer::RustWriter;

const BANNER: &str = "// This file was generated by ts2rs. Do not edit manually.";

/// Rendered output plus bookkeeping for the caller.
#[derive(Debug)]
pub struct EmitResult {
    pub text: String,
    /// Emitted type names in emission order, hoisted declarations included.
    pub emitted_names: Vec<String>,
    pub warnings: Vec<String>,
}

/// Render a collected set to Rust source.
#[must_use]
pub fn emit(collected: &[CollectedType], options: &ConvertOptions) -> EmitResult {
    let mut emitter = Emitter::new(options);
    for name in collected.iter().map(CollectedType::name) {
        emitter.taken_names.insert(name.to_string());
    }
    for ty in collected {
        emitter.emit_collected(ty);
        // Anonymous structs hoisted while rendering land right after the
        // declaration that produced them, in discovery order.
        while let Some((name, fields)) = emitter.pending.pop_front() {
            emitter.emit_struct_decl(&name, &fields, None);
        }
    }
    emitter.finish()
}

struct Emitter<'a> {
    options: &'a ConvertOptions,
    body: RustWriter,
    emitted_names: Vec<String>,
    warnings: Vec<String>,
    pending: VecDeque<(String, Vec<Field>)>,
    taken_names: FxHashSet<String>,
    needs_serde: bool,
    needs_serde_repr: bool,
    needs_value: bool,
    needs_hash_map: bool,
    needs_hash_set: bool,
}

impl<'a> Emitter<'a> {
    fn new(options: &'a ConvertOptions) -> Emitter<'a> {
        Emitter {
            options,
            body: RustWriter::with_capacity(4096),
            emitted_names: Vec::new(),
            warnings: Vec::new(),
            pending: VecDeque::new(),
            taken_names: FxHashSet::default(),
            needs_serde: false,
            needs_serde_repr: false,
            needs_value: false,
            needs_hash_map: false,
            needs_hash_set: false,
        }
    }

    fn finish(self) -> EmitResult {
        let mut out = RustWriter::with_capacity(4096);
        out.write_line(BANNER);
        if let Some(header) = &self.options.custom_header {
            out.blank_line();
            out.write_line(header.trim_end_matches('\n'));
        }

        let mut imports: Vec<String> = Vec::new();
        if self.needs_serde {
            imports.push("use serde::{Deserialize, Serialize};".to_string());
        }
        if self.needs_value {
            imports.push("use serde_json::Value;".to_string());
        }
        if self.needs_serde_repr {
            imports.push("use serde_repr::{Deserialize_repr, Serialize_repr};".to_string());
        }
        match (self.needs_hash_map, self.needs_hash_set) {
            (true, true) => {
                imports.push("use std::collections::{HashMap, HashSet};".to_string())
            }
            (true, false) => imports.push("use std::collections::HashMap;".to_string()),
            (false, true) => imports.push("use std::collections::HashSet;".to_string()),
            (false, false) => {}
        }
        if !imports.is_empty() {
            out.blank_line();
            for import in imports {
                out.write_line(&import);
            }
        }

        if !self.body.is_empty() {
            out.blank_line();
            out.write(self.body.finish().trim_start_matches('\n'));
        }
        if let Some(footer) = &self.options.custom_footer {
            out.blank_line();
            out.write_line(footer.trim_end_matches('\n'));
        }
        EmitResult {
            text: out.finish(),
            emitted_names: self.emitted_names,
            warnings: self.warnings,
        }
    }

    fn emit_collected(&mut self, ty: &CollectedType) {
        match ty {
            CollectedType::Struct(s) => self.emit_struct(s),
            CollectedType::Enum(e) => self.emit_enum(e),
            CollectedType::Union(u) => self.emit_union(u),
            CollectedType::TypeAlias(a) => self.emit_alias(a),
        }
    }

    // =====================================================================
    // Structs
    // =====================================================================

    fn emit_struct(&mut self, s: &Struct) {
        self.emit_struct_decl(&s.name, &s.fields, s.documentation.as_deref());
    }

    fn emit_struct_decl(&mut self, name: &str, fields: &[Field], doc: Option<&str>) {
        self.body.blank_line();
        self.write_doc(doc);
        self.write_type_attrs();
        self.needs_serde = true;
        self.body
            .write_line("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]");
        self.body.write_line("#[serde(rename_all = \"camelCase\")]");
        if fields.is_empty() {
            self.body.write_line(&format!("pub struct {name} {{}}"));
        } else {
            self.body.write_line(&format!("pub struct {name} {{"));
            self.body.indent();
            for field in fields {
                self.emit_field(name, field, true);
            }
            self.body.dedent();
            self.body.write_line("}");
        }
        self.emitted_names.push(name.to_string());
    }

    fn emit_field(&mut self, owner: &str, field: &Field, public: bool) {
        self.write_doc(field.documentation.as_deref());

        // Field annotations from custom mappings of any referenced name.
        for mapped in referenced_mapped_names(&field.ty, self.options) {
            if let Some(mapping) = self.options.custom_type_mappings.get(&mapped) {
                for annotation in mapping.field_annotations() {
                    self.body.write_line(annotation);
                }
            }
        }

        let (ident, needs_rename) = case::field_identifier(&field.name);
        let mut serde_parts: Vec<String> = Vec::new();
        if needs_rename {
            serde_parts.push(format!("rename = \"{}\"", field.name));
        }
        let rendered = self.render_type(&field.ty, &hoist_hint(owner, &field.name));
        if field.ty.is_option() {
            serde_parts.push("skip_serializing_if = \"Option::is_none\"".to_string());
        }
        if !serde_parts.is_empty() {
            self.body
                .write_line(&format!("#[serde({})]", serde_parts.join(", ")));
        }
        let prefix = if public { "pub " } else { "" };
        self.body
            .write_line(&format!("{prefix}{ident}: {rendered},"));
    }

    // =====================================================================
    // Enums
    // =====================================================================

    fn emit_enum(&mut self, e: &Enum) {
        self.body.blank_line();
        self.write_doc(e.documentation.as_deref());
        self.write_type_attrs();
        if e.is_string_enum {
            self.needs_serde = true;
            self.body
                .write_line("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]");
            self.body.write_line(&format!("pub enum {} {{", e.name));
            self.body.indent();
            for variant in &e.variants {
                self.write_doc(variant.documentation.as_deref());
                let wire = match &variant.value {
                    Some(EnumValue::String(s)) => s.clone(),
                    Some(EnumValue::Number(n)) => n.to_string(),
                    None => variant.name.clone(),
                };
                self.body.write_line(&format!("#[serde(rename = \"{wire}\")]"));
                self.body.write_line(&format!("{},", variant.name));
            }
            self.body.dedent();
            self.body.write_line("}");
        } else {
            self.needs_serde_repr = true;
            self.body
                .write_line("#[derive(Debug, Clone, PartialEq, Serialize_repr, Deserialize_repr)]");
            self.body.write_line("#[repr(i64)]");
            self.body.write_line(&format!("pub enum {} {{", e.name));
            self.body.indent();
            for variant in &e.variants {
                self.write_doc(variant.documentation.as_deref());
                match &variant.value {
                    Some(EnumValue::Number(n)) => {
                        self.body.write_line(&format!("{} = {n},", variant.name));
                    }
                    _ => self.body.write_line(&format!("{},", variant.name)),
                }
            }
            self.body.dedent();
            self.body.write_line("}");
        }
        self.emitted_names.push(e.name.clone());
    }

    // =====================================================================
    // Unions
    // =====================================================================

    fn emit_union(&mut self, u: &Union) {
        self.body.blank_line();
        self.write_doc(u.documentation.as_deref());
        self.write_type_attrs();
        self.needs_serde = true;
        self.body
            .write_line("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]");

        // Internal tagging round-trips only string tags; numeric and
        // boolean discriminators keep their field and emit untagged.
        let string_tagged = u.discriminator.is_some()
            && u.variants.iter().all(|v| {
                matches!(
                    v.discriminator_value,
                    Some(LiteralValue::String(_)) | None
                )
            });
        if string_tagged {
            let tag = u.discriminator.as_deref().unwrap_or_default();
            self.body.write_line(&format!("#[serde(tag = \"{tag}\")]"));
        } else {
            self.body.write_line("#[serde(untagged)]");
        }

        self.body.write_line(&format!("pub enum {} {{", u.name));
        self.body.indent();
        for variant in &u.variants {
            self.emit_union_variant(&u.name, variant, string_tagged);
        }
        self.body.dedent();
        self.body.write_line("}");
        self.emitted_names.push(u.name.clone());
    }

    fn emit_union_variant(&mut self, owner: &str, variant: &UnionVariant, string_tagged: bool) {
        let mut serde_parts: Vec<String> = Vec::new();
        if string_tagged {
            if let Some(LiteralValue::String(value)) = &variant.discriminator_value {
                if value != &variant.name {
                    serde_parts.push(format!("rename = \"{value}\""));
                }
            }
        }
        match &variant.ty {
            None => {
                if !serde_parts.is_empty() {
                    self.body
                        .write_line(&format!("#[serde({})]", serde_parts.join(", ")));
                }
                self.body.write_line(&format!("{},", variant.name));
            }
            Some(ResolvedType::AnonymousStruct(fields)) => {
                serde_parts.push("rename_all = \"camelCase\"".to_string());
                self.body
                    .write_line(&format!("#[serde({})]", serde_parts.join(", ")));
                self.body.write_line(&format!("{} {{", variant.name));
                self.body.indent();
                for field in fields {
                    self.emit_field(&hoist_hint(owner, &variant.name), field, false);
                }
                self.body.dedent();
                self.body.write_line("},");
            }
            Some(ty) => {
                if !serde_parts.is_empty() {
                    self.body
                        .write_line(&format!("#[serde({})]", serde_parts.join(", ")));
                }
                let rendered = self.render_type(ty, &hoist_hint(owner, &variant.name));
                self.body
                    .write_line(&format!("{}({rendered}),", variant.name));
            }
        }
    }

    // =====================================================================
    // Aliases
    // =====================================================================

    fn emit_alias(&mut self, alias: &TypeAlias) {
        self.body.blank_line();
        self.write_doc(alias.documentation.as_deref());
        let rendered = self.render_type(&alias.aliased, &alias.name);
        self.body
            .write_line(&format!("pub type {} = {rendered};", alias.name));
        self.emitted_names.push(alias.name.clone());
    }

    // =====================================================================
    // Types
    // =====================================================================

    fn render_type(&mut self, ty: &ResolvedType, hint: &str) -> String {
        match ty {
            ResolvedType::Primitive(Primitive::String) => "String".to_string(),
            ResolvedType::Primitive(Primitive::Number) => "f64".to_string(),
            ResolvedType::Primitive(Primitive::Boolean) => "bool".to_string(),
            // Stripped or wrapped before these reach the emitter.
            ResolvedType::Primitive(Primitive::Null | Primitive::Undefined) => {
                self.needs_value = true;
                "Value".to_string()
            }
            ResolvedType::Array(element) => {
                format!("Vec<{}>", self.render_type(element, hint))
            }
            ResolvedType::Tuple(elements) => {
                let rendered: Vec<String> = elements
                    .iter()
                    .map(|e| self.render_type(e, hint))
                    .collect();
                match rendered.len() {
                    0 => "()".to_string(),
                    1 => format!("({},)", rendered[0]),
                    _ => format!("({})", rendered.join(", ")),
                }
            }
            ResolvedType::Record(key, value) | ResolvedType::Map(key, value) => {
                self.needs_hash_map = true;
                let key = self.render_map_key(key, hint);
                let value = self.render_type(value, hint);
                format!("HashMap<{key}, {value}>")
            }
            ResolvedType::Set(element) => {
                self.needs_hash_set = true;
                format!("HashSet<{}>", self.render_type(element, hint))
            }
            ResolvedType::Option(inner) => {
                format!("Option<{}>", self.render_type(inner, hint))
            }
            ResolvedType::Box(inner) => {
                format!("Box<{}>", self.render_type(inner, hint))
            }
            ResolvedType::Literal(LiteralValue::String(_)) => "String".to_string(),
            ResolvedType::Literal(LiteralValue::Number(_)) => "f64".to_string(),
            ResolvedType::Literal(LiteralValue::Boolean(_)) => "bool".to_string(),
            ResolvedType::JsonValue | ResolvedType::TypeParameter(_) => {
                self.needs_value = true;
                "Value".to_string()
            }
            ResolvedType::StructRef(name) => match self.options.custom_type_mappings.get(name) {
                Some(mapping) => mapping.rust_type().to_string(),
                None => name.clone(),
            },
            ResolvedType::AnonymousStruct(fields) => self.hoist_anonymous(hint, fields),
        }
    }

    /// JSON object keys are strings on the wire; numeric keys round-trip
    /// through serde's integer key handling.
    fn render_map_key(&mut self, key: &ResolvedType, hint: &str) -> String {
        match key {
            ResolvedType::Primitive(Primitive::Number)
            | ResolvedType::Literal(LiteralValue::Number(_)) => "i64".to_string(),
            ResolvedType::Primitive(Primitive::String)
            | ResolvedType::Literal(LiteralValue::String(_)) => "String".to_string(),
            ResolvedType::StructRef(_) => self.render_type(key, hint),
            _ => "String".to_string(),
        }
    }

    /// Queue an anonymous struct for hoisting and return its synthesized
    /// name. Each occurrence hoists separately; nothing is deduplicated.
    fn hoist_anonymous(&mut self, hint: &str, fields: &[Field]) -> String {
        let base = if hint.is_empty() { "Anonymous" } else { hint };
        let mut name = base.to_string();
        let mut counter = 2;
        while !self.taken_names.insert(name.clone()) {
            name = format!("{base}{counter}");
            counter += 1;
        }
        self.pending.push_back((name.clone(), fields.to_vec()));
        name
    }

    // =====================================================================
    // Shared pieces
    // =====================================================================

    fn write_doc(&mut self, doc: Option<&str>) {
        if let Some(doc) = doc {
            for line in doc.lines() {
                if line.is_empty() {
                    self.body.write_line("///");
                } else {
                    self.body.write_line(&format!("/// {line}"));
                }
            }
        }
    }

    fn write_type_attrs(&mut self) {
        for annotation in &self.options.custom_type_annotations {
            self.body.write_line(annotation);
        }
    }
}

/// Synthesized name for an anonymous struct at `owner.field`: the owner
/// name with the field name capitalized, e.g. `UserBillingAddress`.
fn hoist_hint(owner: &str, field: &str) -> String {
    let mut chars = field.chars();
    let pascal: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{owner}{pascal}")
}

/// Names of mapped nominal references inside a field type, in render
/// order, deduplicated.
fn referenced_mapped_names(ty: &ResolvedType, options: &ConvertOptions) -> Vec<String> {
    let mut out = Vec::new();
    collect_struct_refs(ty, &mut out);
    let mut seen = FxHashSet::default();
    out.retain(|name| {
        options.custom_type_mappings.contains_key(name) && seen.insert(name.clone())
    });
    out
}

fn collect_struct_refs(ty: &ResolvedType, out: &mut Vec<String>) {
    match ty {
        ResolvedType::StructRef(name) => out.push(name.clone()),
        ResolvedType::Array(t)
        | ResolvedType::Set(t)
        | ResolvedType::Option(t)
        | ResolvedType::Box(t) => collect_struct_refs(t, out),
        ResolvedType::Record(k, v) | ResolvedType::Map(k, v) => {
            collect_struct_refs(k, out);
            collect_struct_refs(v, out);
        }
        ResolvedType::Tuple(ts) => {
            for t in ts {
                collect_struct_refs(t, out);
            }
        }
        ResolvedType::AnonymousStruct(fields) => {
            for field in fields {
                collect_struct_refs(&field.ty, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "tests/emitter_tests.rs"]
mod tests;

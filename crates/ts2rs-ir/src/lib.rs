//! Intermediate representation between the resolver and the emitter.
//!
//! The resolver normalizes every reachable surface declaration into this
//! closed node set; the emitter renders it and never looks back at the
//! surface language. IR values are produced once per run and consumed once.

/// A resolved, language-neutral type occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType {
    Primitive(Primitive),
    /// Growable sequence.
    Array(Box<ResolvedType>),
    /// Positional, fixed-length product.
    Tuple(Vec<ResolvedType>),
    /// Arbitrary-key mapping, from an index signature or `Record<K, V>`.
    Record(Box<ResolvedType>, Box<ResolvedType>),
    /// Like `Record` but requested through the surface `Map` type.
    Map(Box<ResolvedType>, Box<ResolvedType>),
    Set(Box<ResolvedType>),
    /// Nullable wrapper. The inner type is never itself `Option`.
    Option(Box<ResolvedType>),
    /// Explicit heap indirection, inserted only to break recursion.
    Box(Box<ResolvedType>),
    Literal(LiteralValue),
    /// The dynamic-JSON fallback sentinel.
    JsonValue,
    /// Reference to a collected nominal type.
    StructRef(String),
    /// Occurrence of an unbound generic parameter; erased at emit time.
    TypeParameter(String),
    /// An inline object literal. Never named by the user and never
    /// deduplicated; the emitter hoists each occurrence separately.
    AnonymousStruct(Vec<Field>),
}

impl ResolvedType {
    /// Wrap in `Option`, preserving the option normal form: wrapping an
    /// `Option` returns it unchanged.
    #[must_use]
    pub fn into_option(self) -> ResolvedType {
        match self {
            ResolvedType::Option(_) => self,
            other => ResolvedType::Option(Box::new(other)),
        }
    }

    #[must_use]
    pub fn is_option(&self) -> bool {
        matches!(self, ResolvedType::Option(_))
    }

    #[must_use]
    pub fn is_json_value(&self) -> bool {
        matches!(self, ResolvedType::JsonValue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Null,
    Undefined,
}

/// A literal value carried by enum variants and union discriminators.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

/// A top-level, emittable declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectedType {
    Struct(Struct),
    Enum(Enum),
    Union(Union),
    TypeAlias(TypeAlias),
}

impl CollectedType {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            CollectedType::Struct(s) => &s.name,
            CollectedType::Enum(e) => &e.name,
            CollectedType::Union(u) => &u.name,
            CollectedType::TypeAlias(a) => &a.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: String,
    pub fields: Vec<Field>,
    pub documentation: Option<String>,
    /// Generic parameter names of the surface declaration. Occurrences in
    /// field types have already been erased; carried for diagnostics.
    pub type_parameters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Wire name, exactly as declared in the surface source.
    pub name: String,
    pub ty: ResolvedType,
    pub optional: bool,
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub variants: Vec<EnumVariant>,
    /// True when at least one variant carries a string value.
    pub is_string_enum: bool,
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    pub name: String,
    pub value: Option<EnumValue>,
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EnumValue {
    String(String),
    Number(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub name: String,
    pub variants: Vec<UnionVariant>,
    /// Property name distinguishing members of a discriminated union.
    pub discriminator: Option<String>,
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionVariant {
    pub name: String,
    /// `None` renders a unit variant; `AnonymousStruct` a struct variant;
    /// anything else a one-element tuple variant.
    pub ty: Option<ResolvedType>,
    pub discriminator_value: Option<LiteralValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: String,
    pub aliased: ResolvedType,
    pub documentation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_normal_form() {
        let inner = ResolvedType::Primitive(Primitive::String);
        let once = inner.clone().into_option();
        let twice = once.clone().into_option();
        assert_eq!(once, twice);
        assert_eq!(
            once,
            ResolvedType::Option(Box::new(ResolvedType::Primitive(Primitive::String)))
        );
    }
}

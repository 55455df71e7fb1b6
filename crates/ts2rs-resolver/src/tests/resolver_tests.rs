use crate::{Resolution, Resolver};
use std::path::Path;
use ts2rs_common::{ConvertError, ConvertOptions};
use ts2rs_host::{Project, TypeHost};
use ts2rs_ir::{
    CollectedType, EnumValue, LiteralValue, Primitive, ResolvedType, Struct, Union,
};

fn try_resolve_files(
    files: &[(&str, &str)],
    type_names: &[&str],
    strict: bool,
) -> Result<Resolution, ConvertError> {
    let project = Project::new();
    for (path, source) in files {
        project.add_virtual_file(*path, *source);
    }
    let options = ConvertOptions {
        type_names: type_names.iter().map(|s| s.to_string()).collect(),
        strict,
        ..ConvertOptions::default()
    };
    let entry = project.load_module(Path::new(files[0].0))?;
    Resolver::new(&project, &options).resolve(entry)
}

fn resolve_files(files: &[(&str, &str)], type_names: &[&str]) -> Resolution {
    try_resolve_files(files, type_names, false).expect("resolution failed")
}

fn resolve_src(source: &str) -> Resolution {
    resolve_files(&[("/src/main.ts", source)], &[])
}

fn find<'a>(resolution: &'a Resolution, name: &str) -> &'a CollectedType {
    resolution
        .collected
        .iter()
        .find(|c| c.name() == name)
        .unwrap_or_else(|| panic!("'{name}' not collected"))
}

fn find_struct<'a>(resolution: &'a Resolution, name: &str) -> &'a Struct {
    match find(resolution, name) {
        CollectedType::Struct(s) => s,
        other => panic!("'{name}' is not a struct: {other:?}"),
    }
}

fn find_union<'a>(resolution: &'a Resolution, name: &str) -> &'a Union {
    match find(resolution, name) {
        CollectedType::Union(u) => u,
        other => panic!("'{name}' is not a union: {other:?}"),
    }
}

fn field<'a>(s: &'a Struct, name: &str) -> &'a ResolvedType {
    &s.fields
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("field '{name}' missing"))
        .ty
}

const STRING: ResolvedType = ResolvedType::Primitive(Primitive::String);
const NUMBER: ResolvedType = ResolvedType::Primitive(Primitive::Number);
const BOOLEAN: ResolvedType = ResolvedType::Primitive(Primitive::Boolean);

fn option(inner: ResolvedType) -> ResolvedType {
    ResolvedType::Option(Box::new(inner))
}

#[test]
fn resolves_basic_primitives() {
    let resolution = resolve_src(
        "export interface BasicTypes {\n  name: string;\n  age: number;\n  isActive: boolean;\n  data: any;\n  metadata: unknown;\n}",
    );
    let s = find_struct(&resolution, "BasicTypes");
    assert_eq!(s.fields.len(), 5);
    assert_eq!(field(s, "name"), &STRING);
    assert_eq!(field(s, "age"), &NUMBER);
    assert_eq!(field(s, "isActive"), &BOOLEAN);
    assert_eq!(field(s, "data"), &ResolvedType::JsonValue);
    assert_eq!(field(s, "metadata"), &ResolvedType::JsonValue);
    // Explicit any/unknown never warn.
    assert!(resolution.warnings.is_empty(), "{:?}", resolution.warnings);
}

#[test]
fn optional_and_nullable_normalize_to_single_option() {
    let resolution = resolve_src(
        "export interface OptionalFields {\n  required: string;\n  optional?: string;\n  nullableRequired: string | null;\n  nullableOptional?: string | null;\n}",
    );
    let s = find_struct(&resolution, "OptionalFields");
    assert_eq!(field(s, "required"), &STRING);
    assert_eq!(field(s, "optional"), &option(STRING));
    assert_eq!(field(s, "nullableRequired"), &option(STRING));
    // Optional on an already-nullable type does not double-wrap.
    assert_eq!(field(s, "nullableOptional"), &option(STRING));
}

#[test]
fn discriminated_union_collects_tagged_variants() {
    let resolution = resolve_src(
        "export type Shape =\n  | { kind: \"circle\"; radius: number }\n  | { kind: \"rectangle\"; width: number; height: number }\n  | { kind: \"point\" };",
    );
    let union = find_union(&resolution, "Shape");
    assert_eq!(union.discriminator.as_deref(), Some("kind"));
    assert_eq!(union.variants.len(), 3);

    assert_eq!(union.variants[0].name, "Circle");
    assert_eq!(
        union.variants[0].discriminator_value,
        Some(LiteralValue::String("circle".to_string()))
    );
    let Some(ResolvedType::AnonymousStruct(fields)) = &union.variants[0].ty else {
        panic!("circle should carry a payload");
    };
    // The string discriminator is omitted from the payload.
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].name, "radius");

    assert_eq!(union.variants[1].name, "Rectangle");
    assert_eq!(union.variants[2].name, "Point");
    assert!(union.variants[2].ty.is_none(), "point is a unit variant");
}

#[test]
fn numeric_discriminators_stay_in_the_payload() {
    let resolution = resolve_src(
        "export type Msg = { code: 1; body: string } | { code: 2; detail: string };",
    );
    let union = find_union(&resolution, "Msg");
    assert_eq!(union.variants[0].name, "Value1");
    let Some(ResolvedType::AnonymousStruct(fields)) = &union.variants[0].ty else {
        panic!("payload expected");
    };
    assert!(fields.iter().any(|f| f.name == "code" && f.ty == NUMBER));
}

#[test]
fn recursion_is_broken_with_box() {
    let resolution = resolve_src(
        "export interface Node {\n  value: string;\n  child: Node | null;\n  metadata?: Record<string, any>;\n}",
    );
    let s = find_struct(&resolution, "Node");
    assert_eq!(field(s, "value"), &STRING);
    assert_eq!(
        field(s, "child"),
        &option(ResolvedType::Box(Box::new(ResolvedType::StructRef(
            "Node".to_string()
        ))))
    );
    assert_eq!(
        field(s, "metadata"),
        &option(ResolvedType::Record(
            Box::new(STRING),
            Box::new(ResolvedType::JsonValue)
        ))
    );
    assert!(resolution.warnings.is_empty(), "{:?}", resolution.warnings);
}

#[test]
fn recursion_through_containers_is_not_boxed() {
    let resolution =
        resolve_src("export interface Tree { children: Tree[]; lookup: Record<string, Tree> }");
    let s = find_struct(&resolution, "Tree");
    assert_eq!(
        field(s, "children"),
        &ResolvedType::Array(Box::new(ResolvedType::StructRef("Tree".to_string())))
    );
    assert_eq!(
        field(s, "lookup"),
        &ResolvedType::Record(
            Box::new(STRING),
            Box::new(ResolvedType::StructRef("Tree".to_string()))
        )
    );
}

#[test]
fn mutual_recursion_boxes_the_back_edge() {
    let resolution = resolve_src(
        "export interface A { b: B }\nexport interface B { a: A }",
    );
    let a = find_struct(&resolution, "A");
    let b = find_struct(&resolution, "B");
    // B was collected while A was still in progress, so B.a is boxed and
    // A.b refers to the finished B directly.
    assert_eq!(
        field(b, "a"),
        &ResolvedType::Box(Box::new(ResolvedType::StructRef("A".to_string())))
    );
    assert_eq!(field(a, "b"), &ResolvedType::StructRef("B".to_string()));
}

#[test]
fn cross_module_types_are_discovered() {
    let resolution = resolve_files(
        &[
            (
                "/src/main.ts",
                "import { Priority, UserRole, TestInterface } from \"./other\";\nexport interface Ticket {\n  priority: Priority;\n  role: UserRole;\n  info: TestInterface;\n}",
            ),
            (
                "/src/other.ts",
                "export enum Priority { Low, High }\nexport type UserRole = \"admin\" | \"user\";\nexport interface TestInterface { id: string }",
            ),
        ],
        &[],
    );
    for name in ["Ticket", "Priority", "UserRole", "TestInterface"] {
        assert!(
            resolution.collected.iter().any(|c| c.name() == name),
            "{name} missing from {:?}",
            resolution.collected.iter().map(|c| c.name()).collect::<Vec<_>>()
        );
    }
}

#[test]
fn transitively_imported_names_resolve() {
    let resolution = resolve_files(
        &[
            (
                "/src/entry.ts",
                "import { Wrapper } from \"./mid\";\nexport interface Use { w: Wrapper; deep: DeepType }",
            ),
            ("/src/mid.ts", "import { DeepType } from \"./deep\";\nexport interface Wrapper { d: DeepType }"),
            ("/src/deep.ts", "export interface DeepType { value: string }"),
        ],
        &[],
    );
    assert!(resolution.collected.iter().any(|c| c.name() == "DeepType"));
}

#[test]
fn unresolvable_union_alias_is_dropped_and_uses_fall_back() {
    let resolution = resolve_src(
        "export type MixedType = string | number | bigint | symbol;\nexport interface Holder { mixed: MixedType }",
    );
    assert!(
        !resolution.collected.iter().any(|c| c.name() == "MixedType"),
        "unresolvable union must not be collected"
    );
    let holder = find_struct(&resolution, "Holder");
    assert_eq!(field(holder, "mixed"), &ResolvedType::JsonValue);
    assert!(resolution
        .warnings
        .iter()
        .any(|w| w.contains("MixedType") && w.contains("not be emitted")));
    assert!(
        resolution
            .warnings
            .iter()
            .any(|w| w.contains("MixedType") && w.contains("Holder.mixed")),
        "a warning names the alias and the using field: {:?}",
        resolution.warnings
    );
}

#[test]
fn string_literal_union_becomes_string_enum() {
    let resolution = resolve_src("export type Status = \"active\" | \"in-progress\" | null;");
    let CollectedType::Enum(e) = find(&resolution, "Status") else {
        panic!("expected enum");
    };
    assert!(e.is_string_enum);
    // null members are stripped.
    assert_eq!(e.variants.len(), 2);
    assert_eq!(e.variants[0].name, "Active");
    assert_eq!(e.variants[1].name, "InProgress");
    assert_eq!(
        e.variants[1].value,
        Some(EnumValue::String("in-progress".to_string()))
    );
}

#[test]
fn numeric_literal_union_becomes_numeric_enum() {
    let resolution = resolve_src("export type Level = 1 | 2 | 3;");
    let CollectedType::Enum(e) = find(&resolution, "Level") else {
        panic!("expected enum");
    };
    assert!(!e.is_string_enum);
    assert_eq!(e.variants[0].name, "Value1");
    assert_eq!(e.variants[0].value, Some(EnumValue::Number(1)));
}

#[test]
fn declared_enums_preserve_member_order_and_values() {
    let resolution = resolve_src(
        "export enum OrderStatus {\n  /** Not yet started. */\n  Pending = \"pending\",\n  Processing = \"processing\",\n}",
    );
    let CollectedType::Enum(e) = find(&resolution, "OrderStatus") else {
        panic!("expected enum");
    };
    assert!(e.is_string_enum);
    assert_eq!(e.variants[0].name, "Pending");
    assert_eq!(
        e.variants[0].value,
        Some(EnumValue::String("pending".to_string()))
    );
    assert_eq!(e.variants[0].documentation.as_deref(), Some("Not yet started."));
}

#[test]
fn general_union_collects_untagged() {
    let resolution = resolve_src(
        "export interface A { a: string }\nexport interface B { b: number }\nexport type Either = A | B;",
    );
    let union = find_union(&resolution, "Either");
    assert!(union.discriminator.is_none());
    assert_eq!(union.variants[0].name, "A");
    assert_eq!(
        union.variants[0].ty,
        Some(ResolvedType::StructRef("A".to_string()))
    );
}

#[test]
fn nullable_named_union_aliases_to_option() {
    let resolution = resolve_src(
        "export interface User { name: string }\nexport type MaybeUser = User | null;",
    );
    let CollectedType::TypeAlias(alias) = find(&resolution, "MaybeUser") else {
        panic!("expected alias");
    };
    assert_eq!(
        alias.aliased,
        option(ResolvedType::StructRef("User".to_string()))
    );
}

#[test]
fn type_parameters_erase_with_a_warning() {
    let resolution = resolve_src("export interface Holder<T> { value: T; values: T[] }");
    let s = find_struct(&resolution, "Holder");
    assert_eq!(field(s, "value"), &ResolvedType::JsonValue);
    assert_eq!(
        field(s, "values"),
        &ResolvedType::Array(Box::new(ResolvedType::JsonValue))
    );
    assert_eq!(s.type_parameters, vec!["T"]);
    assert!(resolution
        .warnings
        .iter()
        .any(|w| w.contains("type parameter 'T' unresolved")));
}

#[test]
fn strict_mode_refuses_fallback() {
    let err = try_resolve_files(
        &[("/src/main.ts", "export interface Holder<T> { value: T }")],
        &[],
        true,
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::TypeConversion { .. }));
}

#[test]
fn strict_mode_refuses_explicit_any() {
    let err = try_resolve_files(
        &[("/src/main.ts", "export interface X { data: any }")],
        &[],
        true,
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::TypeConversion { .. }));
}

#[test]
fn promise_is_fatal() {
    let err = try_resolve_files(
        &[(
            "/src/main.ts",
            "export interface X { result: Promise<string> }",
        )],
        &[],
        false,
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::NonSerializable { name } if name == "Promise"));
}

#[test]
fn missing_root_type_is_fatal() {
    let err = try_resolve_files(
        &[("/src/main.ts", "export interface X { a: string }")],
        &["Nope"],
        false,
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::TypeNotFound { name } if name == "Nope"));
}

#[test]
fn builtin_containers_translate() {
    let resolution = resolve_src(
        "export interface Containers {\n  record: Record<string, number>;\n  map: Map<string, boolean>;\n  set: Set<string>;\n  when: Date;\n  list: Array<number>;\n}",
    );
    let s = find_struct(&resolution, "Containers");
    assert_eq!(
        field(s, "record"),
        &ResolvedType::Record(Box::new(STRING), Box::new(NUMBER))
    );
    assert_eq!(
        field(s, "map"),
        &ResolvedType::Map(Box::new(STRING), Box::new(BOOLEAN))
    );
    assert_eq!(field(s, "set"), &ResolvedType::Set(Box::new(STRING)));
    assert_eq!(field(s, "when"), &STRING);
    assert_eq!(field(s, "list"), &ResolvedType::Array(Box::new(NUMBER)));
}

#[test]
fn index_signatures_become_records() {
    let resolution = resolve_files(
        &[(
            "/src/main.ts",
            "interface Dict { [key: string]: number }\nexport interface Holder { d: Dict; inline: { [key: string]: boolean } }",
        )],
        &["Holder"],
    );
    let s = find_struct(&resolution, "Holder");
    assert_eq!(
        field(s, "d"),
        &ResolvedType::Record(Box::new(STRING), Box::new(NUMBER))
    );
    assert_eq!(
        field(s, "inline"),
        &ResolvedType::Record(Box::new(STRING), Box::new(BOOLEAN))
    );
}

#[test]
fn inline_literal_union_warns_and_falls_back() {
    let resolution = resolve_src("export interface S { mode: \"read\" | \"write\" }");
    let s = find_struct(&resolution, "S");
    assert_eq!(field(s, "mode"), &ResolvedType::JsonValue);
    assert!(resolution
        .warnings
        .iter()
        .any(|w| w.contains("must be a named type")));
}

#[test]
fn inline_multi_variant_union_is_optional_json() {
    let resolution = resolve_src("export interface S { v: string | number }");
    let s = find_struct(&resolution, "S");
    assert_eq!(field(s, "v"), &option(ResolvedType::JsonValue));
    assert_eq!(resolution.warnings.len(), 1);
}

#[test]
fn null_only_inline_union_is_optional_json() {
    let resolution = resolve_src("export interface S { v: null | undefined }");
    let s = find_struct(&resolution, "S");
    assert_eq!(field(s, "v"), &option(ResolvedType::JsonValue));
}

#[test]
fn interface_inheritance_flattens_fields() {
    let resolution = resolve_src(
        "interface Entity { id: string; createdAt: string }\nexport interface User extends Entity { name: string }",
    );
    let s = find_struct(&resolution, "User");
    let names: Vec<&str> = s.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["id", "createdAt", "name"]);
}

#[test]
fn external_package_types_materialize_structurally() {
    let resolution = resolve_files(
        &[
            (
                "/p/src/main.ts",
                "import { ExtConfig } from \"ext-pkg\";\nexport interface App { config: ExtConfig }",
            ),
            (
                "/p/node_modules/ext-pkg/index.d.ts",
                "export interface ExtConfig { url: string; retries: number }",
            ),
        ],
        &[],
    );
    let app = find_struct(&resolution, "App");
    assert_eq!(
        field(app, "config"),
        &ResolvedType::StructRef("ExtConfig".to_string())
    );
    let ext = find_struct(&resolution, "ExtConfig");
    assert_eq!(ext.fields.len(), 2);
}

#[test]
fn namespaced_external_member_collects_under_bare_name() {
    let resolution = resolve_files(
        &[
            (
                "/p/src/main.ts",
                "import * as api from \"ext-pkg\";\nexport interface App { options: api.Options }",
            ),
            (
                "/p/node_modules/ext-pkg/index.d.ts",
                "export interface Options { verbose: boolean }",
            ),
        ],
        &[],
    );
    let app = find_struct(&resolution, "App");
    assert_eq!(
        field(app, "options"),
        &ResolvedType::StructRef("Options".to_string())
    );
    assert!(resolution.collected.iter().any(|c| c.name() == "Options"));
}

#[test]
fn alias_of_array_stays_an_alias() {
    let resolution = resolve_src("export type Names = string[];");
    let CollectedType::TypeAlias(alias) = find(&resolution, "Names") else {
        panic!("expected alias");
    };
    assert_eq!(alias.aliased, ResolvedType::Array(Box::new(STRING)));
}

#[test]
fn tuple_alias_resolves_positionally() {
    let resolution = resolve_src("export type Pair = [string, number];");
    let CollectedType::TypeAlias(alias) = find(&resolution, "Pair") else {
        panic!("expected alias");
    };
    assert_eq!(alias.aliased, ResolvedType::Tuple(vec![STRING, NUMBER]));
}

#[test]
fn object_alias_becomes_struct() {
    let resolution = resolve_src("export type Point = { x: number; y: number };");
    let s = find_struct(&resolution, "Point");
    assert_eq!(s.fields.len(), 2);
}

#[test]
fn anonymous_objects_resolve_inline() {
    let resolution = resolve_src("export interface Outer { inner: { a: string; b?: number } }");
    let s = find_struct(&resolution, "Outer");
    let ResolvedType::AnonymousStruct(fields) = field(s, "inner") else {
        panic!("expected anonymous struct");
    };
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[1].ty, option(NUMBER));
}

#[test]
fn collection_is_idempotent() {
    let resolution = resolve_src(
        "export interface Shared { id: string }\nexport interface A { s: Shared }\nexport interface B { s: Shared }",
    );
    let count = resolution
        .collected
        .iter()
        .filter(|c| c.name() == "Shared")
        .count();
    assert_eq!(count, 1);
}

#[test]
fn strict_mode_output_never_contains_json_value() {
    // A fully-representable module resolves cleanly under strict mode.
    let resolution = try_resolve_files(
        &[(
            "/src/main.ts",
            "export interface Clean { name: string; tags: string[]; child: Clean | null }",
        )],
        &[],
        true,
    )
    .expect("strict resolution succeeds");
    fn contains_json(ty: &ResolvedType) -> bool {
        match ty {
            ResolvedType::JsonValue => true,
            ResolvedType::Array(t)
            | ResolvedType::Set(t)
            | ResolvedType::Option(t)
            | ResolvedType::Box(t) => contains_json(t),
            ResolvedType::Record(k, v) | ResolvedType::Map(k, v) => {
                contains_json(k) || contains_json(v)
            }
            ResolvedType::Tuple(ts) => ts.iter().any(contains_json),
            ResolvedType::AnonymousStruct(fs) => fs.iter().any(|f| contains_json(&f.ty)),
            _ => false,
        }
    }
    for collected in &resolution.collected {
        if let CollectedType::Struct(s) = collected {
            assert!(!s.fields.iter().any(|f| contains_json(&f.ty)));
        }
    }
}

#[test]
fn doc_comments_carry_through() {
    let resolution = resolve_src(
        "/** A user account. */\nexport interface User {\n  /** Unique id. */\n  id: string;\n}",
    );
    let s = find_struct(&resolution, "User");
    assert_eq!(s.documentation.as_deref(), Some("A user account."));
    assert_eq!(s.fields[0].documentation.as_deref(), Some("Unique id."));
}

//! End-to-end conversion scenarios: TypeScript source in, Rust text out.

use pretty_assertions::assert_eq;
use ts2rs::{convert, convert_with_project, ConvertError, ConvertOptions, Project};

fn convert_source(source: &str) -> ts2rs::Conversion {
    convert_sources(&[("/src/main.ts", source)], &[])
}

fn convert_sources(files: &[(&str, &str)], type_names: &[&str]) -> ts2rs::Conversion {
    let project = Project::new();
    for (path, text) in files {
        project.add_virtual_file(*path, *text);
    }
    let options = ConvertOptions {
        entry_file: files[0].0.into(),
        type_names: type_names.iter().map(|s| s.to_string()).collect(),
        ..ConvertOptions::default()
    };
    convert_with_project(&project, &options).expect("conversion failed")
}

#[test]
fn basic_types_end_to_end() {
    let conversion = convert_source(
        "export interface BasicTypes {\n  name: string;\n  age: number;\n  isActive: boolean;\n  data: any;\n  metadata: unknown;\n}",
    );
    let expected = "\
// This file was generated by ts2rs. Do not edit manually.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = \"camelCase\")]
pub struct BasicTypes {
    pub name: String,
    pub age: f64,
    pub is_active: bool,
    pub data: Value,
    pub metadata: Value,
}
";
    assert_eq!(conversion.text, expected);
    assert_eq!(conversion.emitted_names, vec!["BasicTypes"]);
    assert!(conversion.warnings.is_empty(), "{:?}", conversion.warnings);
}

#[test]
fn optional_fields_end_to_end() {
    let conversion = convert_source(
        "export interface OptionalFields {\n  required: string;\n  optional?: string;\n  nullableRequired: string | null;\n  nullableOptional?: string | null;\n}",
    );
    let text = &conversion.text;
    assert!(text.contains("pub required: String,"));
    // Every optional or nullable field is a single Option with the
    // skip-when-absent rule.
    for field in ["optional", "nullable_required", "nullable_optional"] {
        assert!(
            text.contains(&format!("pub {field}: Option<String>,")),
            "{field} in:\n{text}"
        );
    }
    assert_eq!(
        text.matches("#[serde(skip_serializing_if = \"Option::is_none\")]")
            .count(),
        3
    );
}

#[test]
fn discriminated_union_end_to_end() {
    let conversion = convert_source(
        "export type Shape =\n  | { kind: \"circle\"; radius: number }\n  | { kind: \"rectangle\"; width: number; height: number }\n  | { kind: \"point\" };",
    );
    let expected = "\
// This file was generated by ts2rs. Do not edit manually.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = \"kind\")]
pub enum Shape {
    #[serde(rename = \"circle\", rename_all = \"camelCase\")]
    Circle {
        radius: f64,
    },
    #[serde(rename = \"rectangle\", rename_all = \"camelCase\")]
    Rectangle {
        width: f64,
        height: f64,
    },
    #[serde(rename = \"point\")]
    Point,
}
";
    assert_eq!(conversion.text, expected);
}

#[test]
fn recursive_types_end_to_end() {
    let conversion = convert_source(
        "export interface Node {\n  value: string;\n  child: Node | null;\n  metadata?: Record<string, any>;\n}",
    );
    let text = &conversion.text;
    assert!(text.contains("pub child: Option<Box<Node>>,"));
    assert!(text.contains("pub metadata: Option<HashMap<String, Value>>,"));
    assert!(text.contains("use std::collections::HashMap;"));
    assert!(conversion.warnings.is_empty(), "{:?}", conversion.warnings);
}

#[test]
fn cross_module_conversion_collects_imports() {
    let conversion = convert_sources(
        &[
            (
                "/src/main.ts",
                "import { Priority, UserRole, TestInterface } from \"./shared\";\nexport interface Ticket {\n  priority: Priority;\n  role: UserRole;\n  info: TestInterface;\n}",
            ),
            (
                "/src/shared.ts",
                "export enum Priority { Low, Medium, High }\nexport type UserRole = \"admin\" | \"editor\";\nexport interface TestInterface { id: string }",
            ),
        ],
        &[],
    );
    for name in ["Ticket", "Priority", "UserRole", "TestInterface"] {
        assert!(
            conversion.emitted_names.iter().any(|n| n == name),
            "{name} missing from {:?}",
            conversion.emitted_names
        );
    }
    assert!(conversion.text.contains("#[repr(i64)]"));
    assert!(conversion.text.contains("#[serde(rename = \"admin\")]"));
}

#[test]
fn unresolvable_union_falls_back_at_use_sites() {
    let conversion = convert_source(
        "export type MixedType = string | number | bigint | symbol;\nexport interface Holder { mixed: MixedType }",
    );
    assert!(!conversion.emitted_names.iter().any(|n| n == "MixedType"));
    assert!(conversion.text.contains("pub mixed: Value,"));
    assert!(conversion
        .warnings
        .iter()
        .any(|w| w.contains("MixedType") && w.contains("Holder.mixed")));
}

#[test]
fn tuple_fields_round_trip_shape() {
    let conversion = convert_source(
        "export interface DataPoint {\n  values: [string, number];\n  metadata: Record<string, any>;\n}",
    );
    assert!(conversion.text.contains("pub values: (String, f64),"));
    assert!(conversion
        .text
        .contains("pub metadata: HashMap<String, Value>,"));
}

#[test]
fn output_file_is_written_with_parents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let entry = dir.path().join("types.ts");
    std::fs::write(&entry, "export interface Out { a: string }").unwrap();
    let output = dir.path().join("generated/nested/types.rs");

    let options = ConvertOptions {
        entry_file: entry,
        output_path: Some(output.clone()),
        ..ConvertOptions::default()
    };
    let conversion = convert(&options).expect("conversion failed");
    let written = std::fs::read_to_string(&output).expect("output written");
    assert_eq!(written, conversion.text);
}

#[test]
fn missing_entry_module_is_an_error() {
    let options = ConvertOptions {
        entry_file: "/definitely/not/here.ts".into(),
        ..ConvertOptions::default()
    };
    let err = convert(&options).unwrap_err();
    assert!(matches!(err, ConvertError::Host(_)));
}

#[test]
fn type_name_roots_limit_collection() {
    let conversion = convert_sources(
        &[(
            "/src/main.ts",
            "export interface Kept { a: string }\nexport interface Dropped { b: string }",
        )],
        &["Kept"],
    );
    assert_eq!(conversion.emitted_names, vec!["Kept"]);
    assert!(!conversion.text.contains("Dropped"));
}

#[test]
fn generated_text_is_stable_across_runs() {
    let source = "export interface Stable { a: string; b: number[]; c?: boolean }";
    let first = convert_source(source);
    let second = convert_source(source);
    assert_eq!(first.text, second.text);
}

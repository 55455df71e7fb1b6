//! Identifier case conversions between the surface language and Rust.

/// Rust keywords that need escaping when used as field identifiers.
///
/// `crate`, `self`, `super`, and `Self` cannot be raw identifiers and get a
/// trailing underscore instead.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "final", "fn", "for", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "static",
    "struct", "trait", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where",
    "while", "yield",
];

const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

/// Convert a discriminator or enum value to a variant identifier: split on
/// `-`, `_`, and whitespace, capitalize the first letter of each part, and
/// lower-case the remainder.
///
/// `"in-progress"` becomes `InProgress`, `"circle"` becomes `Circle`.
#[must_use]
pub fn to_variant_name(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for part in value.split(|c: char| c == '-' || c == '_' || c.is_whitespace()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.extend(chars.flat_map(|c| c.to_lowercase()));
        }
    }
    out
}

/// Convert a camelCase (or PascalCase) property name to snake_case.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    let mut prev_is_digit = false;
    for c in name.chars() {
        if c.is_uppercase() {
            if prev_lower || prev_is_digit {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev_lower = c.is_lowercase();
        prev_is_digit = c.is_ascii_digit();
    }
    out
}

/// Convert a snake_case name back to camelCase. Used to decide whether the
/// wire name survives the `rename_all = "camelCase"` round trip.
#[must_use]
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Escape a snake_case identifier if it collides with a Rust keyword.
#[must_use]
pub fn escape_keyword(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else if NON_RAW_KEYWORDS.contains(&name) {
        format!("{name}_")
    } else {
        name.to_string()
    }
}

/// A Rust field identifier for a surface property name, plus whether the
/// wire name needs an explicit serde rename to round-trip.
#[must_use]
pub fn field_identifier(wire_name: &str) -> (String, bool) {
    let snake = to_snake_case(wire_name);
    let ident = escape_keyword(&snake);
    // `rename_all = "camelCase"` re-derives the wire name from the unescaped
    // identifier; an explicit rename is needed whenever that differs.
    let needs_rename = to_camel_case(&snake) != wire_name;
    (ident, needs_rename)
}

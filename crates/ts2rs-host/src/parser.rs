//! Recursive-descent parser for the declaration subset.
//!
//! One token of lookahead, explicit backtracking only where TypeScript's
//! grammar demands it (parenthesized type vs. function type). Statements
//! that do not declare types are skipped wholesale.

use crate::ast::*;
use crate::scanner::{Scanner, Token, TokenKind};

/// Parse failure with the offending line.
#[derive(Debug)]
pub struct ParseError {
    pub line: u32,
    pub message: String,
}

/// Parse a whole module source into its AST.
pub fn parse_module(source: &str) -> Result<ModuleAst, ParseError> {
    let tokens = Scanner::new(source).scan_all().map_err(|e| ParseError {
        line: e.line,
        message: e.message,
    })?;
    Parser { tokens, pos: 0 }.parse_module()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn peek_ahead(&self, n: usize) -> &TokenKind {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)].kind
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    fn at_ident(&self, name: &str) -> bool {
        self.peek_kind().ident() == Some(name)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, name: &str) -> bool {
        if self.at_ident(name) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.peek().line,
            message: message.into(),
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.peek_kind() == kind {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected {what}, found {:?}", self.peek_kind())))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        match self.peek_kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.bump();
                Ok(name)
            }
            other => Err(self.error(format!("expected {what}, found {other:?}"))),
        }
    }

    // =====================================================================
    // Module level
    // =====================================================================

    fn parse_module(&mut self) -> Result<ModuleAst, ParseError> {
        let mut module = ModuleAst::default();
        while !self.at_eof() {
            if self.at_ident("import") {
                if let Some(import) = self.parse_import()? {
                    module.imports.push(import);
                }
                continue;
            }
            match self.parse_item()? {
                Some(decl) => module.declarations.push(decl),
                None => {}
            }
        }
        Ok(module)
    }

    /// Parse one top-level item. Returns `None` for skipped statements.
    fn parse_item(&mut self) -> Result<Option<Declaration>, ParseError> {
        let doc = self.peek().doc.clone();
        let line = self.peek().line;
        let mut exported = false;

        loop {
            if self.at_ident("export") {
                // `export { ... }`, `export * from ...`, `export default ...`
                // re-export forms declare nothing locally.
                match self.peek_ahead(1) {
                    TokenKind::LBrace | TokenKind::Star => {
                        self.skip_statement();
                        return Ok(None);
                    }
                    TokenKind::Ident(next) if next == "default" => {
                        self.skip_statement();
                        return Ok(None);
                    }
                    _ => {
                        self.bump();
                        exported = true;
                    }
                }
            } else if self.at_ident("declare") {
                self.bump();
            } else if self.at_ident("const") && self.peek_ahead(1).ident() == Some("enum") {
                self.bump();
            } else {
                break;
            }
        }

        if self.at_ident("interface") {
            self.bump();
            return Ok(Some(Declaration::Interface(
                self.parse_interface(exported, doc, line)?,
            )));
        }
        if self.at_ident("type") {
            self.bump();
            return Ok(Some(Declaration::TypeAlias(
                self.parse_type_alias(exported, doc, line)?,
            )));
        }
        if self.at_ident("enum") {
            self.bump();
            return Ok(Some(Declaration::Enum(
                self.parse_enum(exported, doc, line)?,
            )));
        }
        if self.at_ident("namespace") || self.at_ident("module") {
            // `declare module "specifier"` blocks are ambient module
            // augmentations; skip them.
            if let TokenKind::StringLit(_) = self.peek_ahead(1) {
                self.skip_statement();
                return Ok(None);
            }
            self.bump();
            return Ok(Some(Declaration::Namespace(
                self.parse_namespace(exported)?,
            )));
        }

        self.skip_statement();
        Ok(None)
    }

    fn parse_import(&mut self) -> Result<Option<ImportDecl>, ParseError> {
        self.bump(); // `import`

        // `import "side-effect";`
        if let TokenKind::StringLit(spec) = self.peek_kind() {
            let specifier = spec.clone();
            self.bump();
            self.eat(&TokenKind::Semicolon);
            return Ok(Some(ImportDecl {
                specifier,
                kind: ImportKind::Bare,
            }));
        }

        // `import type { ... }`
        if self.at_ident("type")
            && matches!(
                self.peek_ahead(1),
                TokenKind::LBrace | TokenKind::Star | TokenKind::Ident(_)
            )
        {
            self.bump();
        }

        let kind = if self.eat(&TokenKind::Star) {
            if !self.eat_ident("as") {
                return Err(self.error("expected 'as' in namespace import"));
            }
            ImportKind::Namespace(self.expect_ident("namespace import alias")?)
        } else if self.peek_kind() == &TokenKind::LBrace {
            ImportKind::Named(self.parse_named_imports()?)
        } else {
            // Default import; a named clause may follow the comma.
            self.expect_ident("import binding")?;
            if self.eat(&TokenKind::Comma) {
                ImportKind::Named(self.parse_named_imports()?)
            } else {
                ImportKind::Bare
            }
        };

        if !self.eat_ident("from") {
            return Err(self.error("expected 'from' in import"));
        }
        let specifier = match self.peek_kind() {
            TokenKind::StringLit(spec) => {
                let spec = spec.clone();
                self.bump();
                spec
            }
            other => return Err(self.error(format!("expected module specifier, found {other:?}"))),
        };
        self.eat(&TokenKind::Semicolon);
        Ok(Some(ImportDecl { specifier, kind }))
    }

    fn parse_named_imports(&mut self) -> Result<Vec<(String, String)>, ParseError> {
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut names = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            // `import { type T }` inline type modifier.
            if self.at_ident("type") && matches!(self.peek_ahead(1), TokenKind::Ident(_)) {
                self.bump();
            }
            let imported = self.expect_ident("import name")?;
            let local = if self.eat_ident("as") {
                self.expect_ident("import alias")?
            } else {
                imported.clone()
            };
            names.push((imported, local));
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace, "'}' after imports")?;
                break;
            }
        }
        Ok(names)
    }

    fn parse_namespace(&mut self, exported: bool) -> Result<NamespaceDecl, ParseError> {
        let mut name = self.expect_ident("namespace name")?;
        while self.eat(&TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.expect_ident("namespace name")?);
        }
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut declarations = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            if self.at_eof() {
                return Err(self.error("unterminated namespace body"));
            }
            if let Some(decl) = self.parse_item()? {
                declarations.push(decl);
            }
        }
        Ok(NamespaceDecl {
            name,
            exported,
            declarations,
        })
    }

    // =====================================================================
    // Declarations
    // =====================================================================

    fn parse_interface(
        &mut self,
        exported: bool,
        doc: Option<String>,
        line: u32,
    ) -> Result<InterfaceDecl, ParseError> {
        let name = self.expect_ident("interface name")?;
        let type_params = self.parse_type_params()?;
        let mut extends = Vec::new();
        if self.eat_ident("extends") {
            loop {
                extends.push(self.parse_type()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let body = self.parse_object_body()?;
        Ok(InterfaceDecl {
            name,
            exported,
            type_params,
            extends,
            body,
            doc,
            line,
        })
    }

    fn parse_type_alias(
        &mut self,
        exported: bool,
        doc: Option<String>,
        line: u32,
    ) -> Result<TypeAliasDecl, ParseError> {
        let name = self.expect_ident("type alias name")?;
        let type_params = self.parse_type_params()?;
        self.expect(&TokenKind::Equals, "'=' in type alias")?;
        let aliased = self.parse_type()?;
        self.eat(&TokenKind::Semicolon);
        Ok(TypeAliasDecl {
            name,
            exported,
            type_params,
            aliased,
            doc,
            line,
        })
    }

    fn parse_enum(
        &mut self,
        exported: bool,
        doc: Option<String>,
        line: u32,
    ) -> Result<EnumDecl, ParseError> {
        let name = self.expect_ident("enum name")?;
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut members = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            let member_doc = self.peek().doc.clone();
            let member_name = match self.peek_kind() {
                TokenKind::Ident(name) => {
                    let n = name.clone();
                    self.bump();
                    n
                }
                TokenKind::StringLit(name) => {
                    let n = name.clone();
                    self.bump();
                    n
                }
                other => return Err(self.error(format!("expected enum member, found {other:?}"))),
            };
            let initializer = if self.eat(&TokenKind::Equals) {
                self.parse_enum_initializer()?
            } else {
                None
            };
            members.push(EnumMemberDecl {
                name: member_name,
                initializer,
                doc: member_doc,
            });
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace, "'}' after enum members")?;
                break;
            }
        }
        Ok(EnumDecl {
            name,
            exported,
            members,
            doc,
            line,
        })
    }

    fn parse_enum_initializer(&mut self) -> Result<Option<EnumInitializer>, ParseError> {
        let negative = self.eat(&TokenKind::Minus);
        match self.peek_kind().clone() {
            TokenKind::StringLit(value) if !negative => {
                self.bump();
                Ok(Some(EnumInitializer::String(value)))
            }
            TokenKind::NumberLit(value) => {
                self.bump();
                Ok(Some(EnumInitializer::Number(if negative {
                    -value
                } else {
                    value
                })))
            }
            _ => {
                // Computed initializer; skip to the member separator and
                // fall back to positional numbering.
                while !matches!(
                    self.peek_kind(),
                    TokenKind::Comma | TokenKind::RBrace | TokenKind::Eof
                ) {
                    self.bump();
                }
                Ok(None)
            }
        }
    }

    /// Parse `<T, U extends V = W>`, keeping only the parameter names.
    fn parse_type_params(&mut self) -> Result<Vec<String>, ParseError> {
        let mut params = Vec::new();
        if !self.eat(&TokenKind::Less) {
            return Ok(params);
        }
        loop {
            params.push(self.expect_ident("type parameter")?);
            // Skip constraints and defaults up to the next ',' or '>'.
            let mut depth = 0u32;
            loop {
                match self.peek_kind() {
                    TokenKind::Less | TokenKind::LParen | TokenKind::LBracket
                    | TokenKind::LBrace => {
                        depth += 1;
                        self.bump();
                    }
                    TokenKind::Greater if depth > 0 => {
                        depth -= 1;
                        self.bump();
                    }
                    TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace if depth > 0 => {
                        depth -= 1;
                        self.bump();
                    }
                    TokenKind::Comma | TokenKind::Greater if depth == 0 => break,
                    TokenKind::Eof => return Err(self.error("unterminated type parameters")),
                    _ => {
                        self.bump();
                    }
                }
            }
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::Greater, "'>' after type parameters")?;
                break;
            }
        }
        Ok(params)
    }

    // =====================================================================
    // Object bodies
    // =====================================================================

    fn parse_object_body(&mut self) -> Result<ObjectBody, ParseError> {
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut body = ObjectBody::default();
        loop {
            while self.eat(&TokenKind::Semicolon) || self.eat(&TokenKind::Comma) {}
            if self.eat(&TokenKind::RBrace) {
                return Ok(body);
            }
            if self.at_eof() {
                return Err(self.error("unterminated object type"));
            }
            self.parse_object_member(&mut body)?;
        }
    }

    fn parse_object_member(&mut self, body: &mut ObjectBody) -> Result<(), ParseError> {
        let doc = self.peek().doc.clone();
        let line = self.peek().line;

        if self.at_ident("readonly")
            && matches!(
                self.peek_ahead(1),
                TokenKind::Ident(_) | TokenKind::StringLit(_) | TokenKind::LBracket
            )
        {
            self.bump();
        }

        if self.peek_kind() == &TokenKind::LBracket {
            return self.parse_index_signature(body);
        }

        let name = match self.peek_kind() {
            TokenKind::Ident(name) => {
                let n = name.clone();
                self.bump();
                n
            }
            TokenKind::StringLit(name) => {
                let n = name.clone();
                self.bump();
                n
            }
            other => return Err(self.error(format!("expected property name, found {other:?}"))),
        };
        let optional = self.eat(&TokenKind::Question);

        let type_expr = match self.peek_kind() {
            TokenKind::Colon => {
                self.bump();
                self.parse_type()?
            }
            // Method signature: `name<T>(args): R` - serializes as nothing
            // useful, recorded as a function-typed property.
            TokenKind::Less | TokenKind::LParen => {
                if self.peek_kind() == &TokenKind::Less {
                    self.skip_balanced(&TokenKind::Less, &TokenKind::Greater)?;
                }
                self.skip_balanced(&TokenKind::LParen, &TokenKind::RParen)?;
                if self.eat(&TokenKind::Colon) {
                    self.parse_type()?;
                }
                TypeExpr::Function
            }
            other => {
                return Err(self.error(format!("expected ':' after property, found {other:?}")))
            }
        };

        body.properties.push(PropertySig {
            name,
            optional,
            type_expr,
            doc,
            line,
        });
        Ok(())
    }

    fn parse_index_signature(&mut self, body: &mut ObjectBody) -> Result<(), ParseError> {
        self.bump(); // '['
        // Computed property names (`[Symbol.iterator]`) are not index
        // signatures; skip the whole member.
        if !matches!(self.peek_kind(), TokenKind::Ident(_))
            || self.peek_ahead(1) != &TokenKind::Colon
        {
            self.skip_balanced_from(&TokenKind::LBracket, &TokenKind::RBracket, 1)?;
            if self.eat(&TokenKind::Colon) {
                self.parse_type()?;
            } else if self.peek_kind() == &TokenKind::LParen {
                self.skip_balanced(&TokenKind::LParen, &TokenKind::RParen)?;
                if self.eat(&TokenKind::Colon) {
                    self.parse_type()?;
                }
            }
            return Ok(());
        }
        self.bump(); // key name
        self.expect(&TokenKind::Colon, "':' in index signature")?;
        let key = self.expect_ident("index signature key type")?;
        self.expect(&TokenKind::RBracket, "']'")?;
        self.expect(&TokenKind::Colon, "':' after index signature")?;
        let value = self.parse_type()?;
        match key.as_str() {
            "string" => body.string_index = Some(Box::new(value)),
            "number" => body.number_index = Some(Box::new(value)),
            // Symbol keys and the like cannot appear in JSON.
            _ => {}
        }
        Ok(())
    }

    // =====================================================================
    // Type expressions
    // =====================================================================

    pub(crate) fn parse_type(&mut self) -> Result<TypeExpr, ParseError> {
        self.eat(&TokenKind::Pipe); // leading `|` in multi-line unions
        let first = self.parse_intersection()?;
        if self.peek_kind() != &TokenKind::Pipe {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(&TokenKind::Pipe) {
            members.push(self.parse_intersection()?);
        }
        Ok(TypeExpr::Union(members))
    }

    fn parse_intersection(&mut self) -> Result<TypeExpr, ParseError> {
        let first = self.parse_postfix()?;
        if self.peek_kind() != &TokenKind::Amp {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(&TokenKind::Amp) {
            members.push(self.parse_postfix()?);
        }
        Ok(TypeExpr::Intersection(members))
    }

    fn parse_postfix(&mut self) -> Result<TypeExpr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.peek_kind() == &TokenKind::LBracket {
                if self.peek_ahead(1) == &TokenKind::RBracket {
                    self.bump();
                    self.bump();
                    expr = TypeExpr::Array(Box::new(expr));
                } else {
                    self.bump();
                    self.parse_type()?;
                    self.expect(&TokenKind::RBracket, "']'")?;
                    expr = TypeExpr::Unsupported("indexed access type".to_string());
                }
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<TypeExpr, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Ident(name) => self.parse_ident_type(&name),
            TokenKind::StringLit(value) => {
                self.bump();
                Ok(TypeExpr::StringLit(value))
            }
            TokenKind::NumberLit(value) => {
                self.bump();
                Ok(TypeExpr::NumberLit(value))
            }
            TokenKind::Minus => {
                self.bump();
                match self.peek_kind().clone() {
                    TokenKind::NumberLit(value) => {
                        self.bump();
                        Ok(TypeExpr::NumberLit(-value))
                    }
                    other => Err(self.error(format!("expected number after '-', found {other:?}"))),
                }
            }
            TokenKind::LBracket => self.parse_tuple(),
            TokenKind::LBrace => Ok(TypeExpr::Object(self.parse_object_body()?)),
            TokenKind::LParen => self.parse_paren_or_function(),
            TokenKind::Less => {
                // `<T>(args) => R` generic function type.
                self.skip_balanced(&TokenKind::Less, &TokenKind::Greater)?;
                self.skip_balanced(&TokenKind::LParen, &TokenKind::RParen)?;
                self.expect(&TokenKind::Arrow, "'=>'")?;
                self.parse_type()?;
                Ok(TypeExpr::Function)
            }
            other => Err(self.error(format!("expected type, found {other:?}"))),
        }
    }

    fn parse_ident_type(&mut self, name: &str) -> Result<TypeExpr, ParseError> {
        match name {
            "true" => {
                self.bump();
                return Ok(TypeExpr::BoolLit(true));
            }
            "false" => {
                self.bump();
                return Ok(TypeExpr::BoolLit(false));
            }
            "keyof" | "typeof" | "infer" => {
                self.bump();
                self.parse_type()?;
                return Ok(TypeExpr::Unsupported(format!("{name} type")));
            }
            "readonly" => {
                // `readonly T[]` - the modifier is irrelevant to JSON.
                self.bump();
                return self.parse_postfix();
            }
            "new" => {
                self.bump();
                self.skip_balanced(&TokenKind::LParen, &TokenKind::RParen)?;
                self.expect(&TokenKind::Arrow, "'=>'")?;
                self.parse_type()?;
                return Ok(TypeExpr::Function);
            }
            _ => {}
        }

        if let Some(keyword) = TypeKeyword::from_ident(name) {
            self.bump();
            return Ok(TypeExpr::Keyword(keyword));
        }

        let mut full_name = self.expect_ident("type name")?;
        while self.eat(&TokenKind::Dot) {
            full_name.push('.');
            full_name.push_str(&self.expect_ident("qualified type name")?);
        }
        let args = if self.peek_kind() == &TokenKind::Less {
            self.parse_type_args()?
        } else {
            Vec::new()
        };
        Ok(TypeExpr::Reference {
            name: full_name,
            args,
        })
    }

    fn parse_type_args(&mut self) -> Result<Vec<TypeExpr>, ParseError> {
        self.expect(&TokenKind::Less, "'<'")?;
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::Greater, "'>' after type arguments")?;
                return Ok(args);
            }
        }
    }

    fn parse_tuple(&mut self) -> Result<TypeExpr, ParseError> {
        self.bump(); // '['
        let mut elements = Vec::new();
        while !self.eat(&TokenKind::RBracket) {
            if self.at_eof() {
                return Err(self.error("unterminated tuple type"));
            }
            // Rest elements make the arity dynamic; the element falls back.
            if self.peek_kind() == &TokenKind::Dot
                && self.peek_ahead(1) == &TokenKind::Dot
                && self.peek_ahead(2) == &TokenKind::Dot
            {
                self.bump();
                self.bump();
                self.bump();
                self.parse_type()?;
                elements.push(TypeExpr::Unsupported("tuple rest element".to_string()));
            } else {
                // Named tuple element: `[x: number, ...]`.
                if matches!(self.peek_kind(), TokenKind::Ident(_))
                    && (self.peek_ahead(1) == &TokenKind::Colon
                        || (self.peek_ahead(1) == &TokenKind::Question
                            && self.peek_ahead(2) == &TokenKind::Colon))
                {
                    self.bump();
                    self.eat(&TokenKind::Question);
                    self.expect(&TokenKind::Colon, "':' after tuple element name")?;
                }
                elements.push(self.parse_type()?);
                // Optional element marker: `[string, number?]`.
                self.eat(&TokenKind::Question);
            }
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBracket, "']' after tuple elements")?;
                break;
            }
        }
        Ok(TypeExpr::Tuple(elements))
    }

    /// Disambiguate `(string | null)` from `(x: string) => void`.
    fn parse_paren_or_function(&mut self) -> Result<TypeExpr, ParseError> {
        let start = self.pos;
        self.skip_balanced(&TokenKind::LParen, &TokenKind::RParen)?;
        if self.peek_kind() == &TokenKind::Arrow {
            self.bump();
            self.parse_type()?;
            return Ok(TypeExpr::Function);
        }
        self.pos = start;
        self.bump(); // '('
        let inner = self.parse_type()?;
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(TypeExpr::Paren(Box::new(inner)))
    }

    // =====================================================================
    // Skipping
    // =====================================================================

    fn skip_balanced(&mut self, open: &TokenKind, close: &TokenKind) -> Result<(), ParseError> {
        self.expect(open, "opening delimiter")?;
        self.skip_balanced_from(open, close, 1)
    }

    fn skip_balanced_from(
        &mut self,
        open: &TokenKind,
        close: &TokenKind,
        mut depth: u32,
    ) -> Result<(), ParseError> {
        while depth > 0 {
            let kind = self.peek_kind().clone();
            if kind == TokenKind::Eof {
                return Err(self.error("unterminated delimiter"));
            }
            if &kind == open {
                depth += 1;
            } else if &kind == close {
                depth -= 1;
            }
            self.bump();
        }
        Ok(())
    }

    /// Skip a statement this parser does not model: everything up to a
    /// top-level `;` or the end of a top-level `{ ... }` block, stopping
    /// early if a declaration keyword shows up at depth zero.
    fn skip_statement(&mut self) {
        let mut depth = 0u32;
        let mut first = true;
        loop {
            match self.peek_kind() {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth == 0 => {
                    self.bump();
                    return;
                }
                TokenKind::LBrace => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    self.bump();
                    if depth == 0 {
                        return;
                    }
                }
                TokenKind::Ident(name) if depth == 0 && !first => {
                    if matches!(
                        name.as_str(),
                        "import" | "export" | "declare" | "interface" | "type" | "enum"
                            | "namespace"
                    ) {
                        return;
                    }
                    self.bump();
                }
                _ => {
                    self.bump();
                }
            }
            first = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ModuleAst {
        parse_module(source).expect("parse failed")
    }

    #[test]
    fn parses_interface_with_members() {
        let module = parse(
            "export interface User {\n  /** Display name. */\n  name: string;\n  age?: number;\n}",
        );
        assert_eq!(module.declarations.len(), 1);
        let Declaration::Interface(iface) = &module.declarations[0] else {
            panic!("expected interface");
        };
        assert_eq!(iface.name, "User");
        assert!(iface.exported);
        assert_eq!(iface.body.properties.len(), 2);
        assert_eq!(iface.body.properties[0].name, "name");
        assert_eq!(
            iface.body.properties[0].doc.as_deref(),
            Some("Display name.")
        );
        assert!(!iface.body.properties[0].optional);
        assert!(iface.body.properties[1].optional);
    }

    #[test]
    fn parses_extends_and_type_params() {
        let module = parse("interface Admin<T extends object = {}> extends User, Entity { id: T }");
        let Declaration::Interface(iface) = &module.declarations[0] else {
            panic!("expected interface");
        };
        assert_eq!(iface.type_params, vec!["T"]);
        assert_eq!(iface.extends.len(), 2);
        assert_eq!(
            iface.body.properties[0].type_expr,
            TypeExpr::Reference {
                name: "T".to_string(),
                args: vec![]
            }
        );
    }

    #[test]
    fn parses_union_alias() {
        let module = parse(r#"type Status = "active" | "inactive" | null;"#);
        let Declaration::TypeAlias(alias) = &module.declarations[0] else {
            panic!("expected alias");
        };
        assert_eq!(
            alias.aliased,
            TypeExpr::Union(vec![
                TypeExpr::StringLit("active".to_string()),
                TypeExpr::StringLit("inactive".to_string()),
                TypeExpr::Keyword(TypeKeyword::Null),
            ])
        );
    }

    #[test]
    fn parses_array_and_generics() {
        let module = parse("type T = Map<string, Array<number>>; type U = string[][];");
        let Declaration::TypeAlias(map_alias) = &module.declarations[0] else {
            panic!("expected alias");
        };
        let TypeExpr::Reference { name, args } = &map_alias.aliased else {
            panic!("expected reference");
        };
        assert_eq!(name, "Map");
        assert_eq!(args.len(), 2);
        let Declaration::TypeAlias(arr_alias) = &module.declarations[1] else {
            panic!("expected alias");
        };
        assert_eq!(
            arr_alias.aliased,
            TypeExpr::Array(Box::new(TypeExpr::Array(Box::new(TypeExpr::Keyword(
                TypeKeyword::String
            )))))
        );
    }

    #[test]
    fn parses_function_types_as_opaque() {
        let module = parse("interface Handlers { onClick: (event: string) => void; run(): void }");
        let Declaration::Interface(iface) = &module.declarations[0] else {
            panic!("expected interface");
        };
        assert_eq!(iface.body.properties[0].type_expr, TypeExpr::Function);
        assert_eq!(iface.body.properties[1].type_expr, TypeExpr::Function);
    }

    #[test]
    fn parses_index_signatures() {
        let module = parse("interface Dict { [key: string]: number }");
        let Declaration::Interface(iface) = &module.declarations[0] else {
            panic!("expected interface");
        };
        assert!(iface.body.properties.is_empty());
        assert_eq!(
            iface.body.string_index.as_deref(),
            Some(&TypeExpr::Keyword(TypeKeyword::Number))
        );
    }

    #[test]
    fn parses_imports() {
        let module = parse(
            "import { Priority, UserRole as Role } from \"./other\";\nimport * as api from \"ext-pkg\";\nimport \"./side-effect\";",
        );
        assert_eq!(module.imports.len(), 3);
        let ImportKind::Named(names) = &module.imports[0].kind else {
            panic!("expected named import");
        };
        assert_eq!(
            names,
            &[
                ("Priority".to_string(), "Priority".to_string()),
                ("UserRole".to_string(), "Role".to_string())
            ]
        );
        let ImportKind::Namespace(alias) = &module.imports[1].kind else {
            panic!("expected namespace import");
        };
        assert_eq!(alias, "api");
    }

    #[test]
    fn parses_enum_with_values() {
        let module = parse("enum Priority { Low = 0, Medium, High = 10, Label = \"high\" }");
        let Declaration::Enum(decl) = &module.declarations[0] else {
            panic!("expected enum");
        };
        assert_eq!(decl.members.len(), 4);
        assert!(matches!(
            decl.members[0].initializer,
            Some(EnumInitializer::Number(v)) if v == 0.0
        ));
        assert!(decl.members[1].initializer.is_none());
        assert!(matches!(
            decl.members[3].initializer,
            Some(EnumInitializer::String(ref s)) if s == "high"
        ));
    }

    #[test]
    fn skips_unrelated_statements() {
        let module = parse(
            "const x = 1;\nexport function helper(): void {}\ninterface Kept { a: string }\nclass Skipped { b = 2 }",
        );
        assert_eq!(module.declarations.len(), 1);
        let Declaration::Interface(iface) = &module.declarations[0] else {
            panic!("expected interface");
        };
        assert_eq!(iface.name, "Kept");
    }

    #[test]
    fn parses_namespace_members() {
        let module = parse("declare namespace Api { export interface Config { url: string } }");
        let Declaration::Namespace(ns) = &module.declarations[0] else {
            panic!("expected namespace");
        };
        assert_eq!(ns.name, "Api");
        assert_eq!(ns.declarations.len(), 1);
    }

    #[test]
    fn parses_nullable_parenthesized_array() {
        let module = parse("type T = (Node | null)[];");
        let Declaration::TypeAlias(alias) = &module.declarations[0] else {
            panic!("expected alias");
        };
        let TypeExpr::Array(element) = &alias.aliased else {
            panic!("expected array");
        };
        assert!(matches!(**element, TypeExpr::Paren(_)));
    }
}

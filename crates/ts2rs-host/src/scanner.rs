//! Tokenizer for the declaration subset of TypeScript.
//!
//! Covers what type declarations need: identifiers, string and number
//! literals, the punctuation of type expressions, and doc comments.
//! `/** ... */` blocks are captured and attached to the next token so the
//! parser can carry documentation through to the emitted Rust.

/// A single token with its source line and any doc comment that
/// immediately preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    StringLit(String),
    NumberLit(f64),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Less,
    Greater,
    Comma,
    Semicolon,
    Colon,
    Question,
    Pipe,
    Amp,
    Equals,
    Dot,
    Arrow,
    Minus,
    Star,
    Eof,
}

impl TokenKind {
    /// The identifier text, if this token is an identifier.
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        match self {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// Scanner failure, reported with the line it occurred on.
#[derive(Debug)]
pub struct ScanError {
    pub line: u32,
    pub message: String,
}

pub struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
    pending_doc: Option<String>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            chars: source.chars().peekable(),
            line: 1,
            pending_doc: None,
        }
    }

    /// Tokenize the whole source. The final token is always `Eof`.
    pub fn scan_all(mut self) -> Result<Vec<Token>, ScanError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn error(&self, message: impl Into<String>) -> ScanError {
        ScanError {
            line: self.line,
            message: message.into(),
        }
    }

    fn next_token(&mut self) -> Result<Token, ScanError> {
        self.skip_trivia()?;
        let line = self.line;
        let doc = self.pending_doc.take();
        let token = |kind| Token { kind, line, doc };

        let Some(&c) = self.chars.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                line,
                doc: None,
            });
        };

        if c.is_alphabetic() || c == '_' || c == '$' {
            return Ok(token(TokenKind::Ident(self.scan_ident())));
        }
        if c.is_ascii_digit() {
            return Ok(token(TokenKind::NumberLit(self.scan_number()?)));
        }
        if c == '"' || c == '\'' {
            return Ok(token(TokenKind::StringLit(self.scan_string(c)?)));
        }

        self.bump();
        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '|' => TokenKind::Pipe,
            '&' => TokenKind::Amp,
            '.' => TokenKind::Dot,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '=' => {
                if self.chars.peek() == Some(&'>') {
                    self.bump();
                    TokenKind::Arrow
                } else {
                    TokenKind::Equals
                }
            }
            other => return Err(self.error(format!("unexpected character '{other}'"))),
        };
        Ok(token(kind))
    }

    /// Skip whitespace and comments; `/** */` blocks become the pending doc.
    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some('/') => {
                            while let Some(&c) = self.chars.peek() {
                                if c == '\n' {
                                    break;
                                }
                                self.bump();
                            }
                        }
                        Some('*') => self.scan_block_comment()?,
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_block_comment(&mut self) -> Result<(), ScanError> {
        self.bump(); // '/'
        self.bump(); // '*'
        let is_doc = self.chars.peek() == Some(&'*');
        let mut text = String::new();
        let mut prev = '\0';
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error("unterminated block comment"));
            };
            if prev == '*' && c == '/' {
                text.pop();
                break;
            }
            text.push(c);
            prev = c;
        }
        if is_doc {
            // `/**/` scans as an empty doc body starting with '*'.
            let cleaned = clean_doc_text(text.trim_start_matches('*'));
            if !cleaned.is_empty() {
                self.pending_doc = Some(cleaned);
            }
        }
        Ok(())
    }

    fn scan_ident(&mut self) -> String {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        name
    }

    fn scan_number(&mut self) -> Result<f64, ScanError> {
        let mut text = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == 'x' || c == 'X' {
                text.push(c);
                self.bump();
            } else if (c == '+' || c == '-') && matches!(text.chars().last(), Some('e' | 'E')) {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            return i64::from_str_radix(hex, 16)
                .map(|v| v as f64)
                .map_err(|_| self.error(format!("invalid hex literal '{text}'")));
        }
        text.parse::<f64>()
            .map_err(|_| self.error(format!("invalid number literal '{text}'")))
    }

    fn scan_string(&mut self, quote: char) -> Result<String, ScanError> {
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(self.error("unterminated string literal"));
            };
            if c == quote {
                return Ok(value);
            }
            if c == '\\' {
                let Some(escaped) = self.bump() else {
                    return Err(self.error("unterminated string literal"));
                };
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '0' => '\0',
                    other => other,
                });
            } else {
                value.push(c);
            }
        }
    }
}

/// Strip comment decoration from a doc block: leading `*` per line, shared
/// indentation, and surrounding blank lines.
fn clean_doc_text(raw: &str) -> String {
    let mut lines = Vec::new();
    for line in raw.lines() {
        let trimmed = line.trim_start();
        let trimmed = trimmed.strip_prefix('*').unwrap_or(trimmed);
        let trimmed = trimmed.strip_prefix(' ').unwrap_or(trimmed);
        lines.push(trimmed.trim_end());
    }
    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_all()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_declaration_tokens() {
        let tokens = kinds("interface Foo { bar?: string; }");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Ident("interface".into()),
                TokenKind::Ident("Foo".into()),
                TokenKind::LBrace,
                TokenKind::Ident("bar".into()),
                TokenKind::Question,
                TokenKind::Colon,
                TokenKind::Ident("string".into()),
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_literals() {
        assert_eq!(
            kinds(r#""circle" | 'square' | 42 | 0x10"#),
            vec![
                TokenKind::StringLit("circle".into()),
                TokenKind::Pipe,
                TokenKind::StringLit("square".into()),
                TokenKind::Pipe,
                TokenKind::NumberLit(42.0),
                TokenKind::Pipe,
                TokenKind::NumberLit(16.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn arrow_vs_equals() {
        assert_eq!(
            kinds("= () => void"),
            vec![
                TokenKind::Equals,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::Ident("void".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn captures_doc_comments() {
        let tokens = Scanner::new("/** The name. */ name: string")
            .scan_all()
            .unwrap();
        assert_eq!(tokens[0].doc.as_deref(), Some("The name."));
        assert_eq!(tokens[1].doc, None);
    }

    #[test]
    fn line_comments_are_not_docs() {
        let tokens = Scanner::new("// nope\nname").scan_all().unwrap();
        assert_eq!(tokens[0].doc, None);
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn multi_line_doc_is_cleaned() {
        let source = "/**\n * First line.\n * Second line.\n */ x";
        let tokens = Scanner::new(source).scan_all().unwrap();
        assert_eq!(tokens[0].doc.as_deref(), Some("First line.\nSecond line."));
    }
}

//! Tokenizer for the subset of JavaScript found in `.eslintrc.js` files.
//!
//! Every token keeps its byte span so the printer can copy untouched source
//! verbatim. Comments and whitespace are not tokens; they live in the gaps
//! between spans.

use crate::error::{PatchError, PatchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifiers and keywords
    Word,
    Str,
    Template,
    Number,
    Regex,
    Punct,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// A line break separates this token from the previous one
    pub newline_before: bool,
}

impl Token {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.start..self.span.end]
    }

    pub fn is_punct(&self, source: &str, punct: &str) -> bool {
        self.kind == TokenKind::Punct && self.text(source) == punct
    }

    pub fn is_word(&self, source: &str, word: &str) -> bool {
        self.kind == TokenKind::Word && self.text(source) == word
    }
}

const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==", "!=", "<=",
    ">=", "&&", "||", "??", "?.", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "**", "<<",
    ">>", "{", "}", "(", ")", "[", "]", ";", ",", "<", ">", "+", "-", "*", "/", "%", "&", "|", "^", "!",
    "~", "?", ":", "=", ".", "@", "#",
];

/// Keywords after which a `/` starts a regular expression
const REGEX_PREFIX_WORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do", "else",
    "yield", "await",
];

/// 1-based line and column of a byte offset
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = &source[..offset.min(source.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

pub fn syntax_error(source: &str, offset: usize, message: impl Into<String>) -> PatchError {
    let (line, column) = line_col(source, offset);
    PatchError::Syntax {
        line,
        column,
        message: message.into(),
    }
}

pub fn tokenize(source: &str) -> PatchResult<Vec<Token>> {
    let mut lexer = Lexer {
        source,
        bytes: source.as_bytes(),
        pos: 0,
    };
    lexer.skip_hashbang();

    let mut tokens: Vec<Token> = Vec::new();
    loop {
        let newline_before = lexer.skip_trivia()?;
        let start = lexer.pos;
        let Some(ch) = lexer.peek() else {
            tokens.push(Token {
                kind: TokenKind::Eof,
                span: Span::new(start, start),
                newline_before,
            });
            return Ok(tokens);
        };

        let kind = match ch {
            '"' | '\'' => {
                lexer.scan_string()?;
                TokenKind::Str
            }
            '`' => {
                lexer.scan_template()?;
                TokenKind::Template
            }
            '0'..='9' => {
                lexer.scan_number();
                TokenKind::Number
            }
            '.' if lexer.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                lexer.scan_number();
                TokenKind::Number
            }
            '/' if regex_allowed(source, tokens.last()) => {
                lexer.scan_regex()?;
                TokenKind::Regex
            }
            c if is_id_start(c) => {
                lexer.scan_word();
                TokenKind::Word
            }
            _ => {
                lexer.scan_punct()?;
                TokenKind::Punct
            }
        };

        tokens.push(Token {
            kind,
            span: Span::new(start, lexer.pos),
            newline_before,
        });
    }
}

fn regex_allowed(source: &str, previous: Option<&Token>) -> bool {
    match previous {
        None => true,
        Some(tok) => match tok.kind {
            TokenKind::Punct => !matches!(tok.text(source), ")" | "]" | "}"),
            TokenKind::Word => REGEX_PREFIX_WORDS.contains(&tok.text(source)),
            _ => false,
        },
    }
}

fn is_id_start(c: char) -> bool {
    c == '_' || c == '$' || c == '\\' || c.is_alphabetic()
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_alphanumeric() || c == '\u{200c}' || c == '\u{200d}'
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn error(&self, offset: usize, message: &str) -> PatchError {
        syntax_error(self.source, offset, message)
    }

    fn skip_hashbang(&mut self) {
        if self.source.starts_with("#!") {
            self.pos = self.source.find('\n').unwrap_or(self.source.len());
        }
    }

    /// Skip whitespace and comments; reports whether a line break was crossed
    fn skip_trivia(&mut self) -> PatchResult<bool> {
        let mut newline = false;
        loop {
            match self.peek() {
                Some('\n') | Some('\u{2028}') | Some('\u{2029}') => {
                    newline = true;
                    self.bump();
                }
                Some(c) if c.is_whitespace() || c == '\u{feff}' => {
                    self.bump();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek_at(1) == Some('*') => {
                    let start = self.pos;
                    let Some(len) = self.source[self.pos + 2..].find("*/") else {
                        return Err(self.error(start, "unterminated comment"));
                    };
                    let body = &self.source[self.pos + 2..self.pos + 2 + len];
                    newline |= body.contains('\n');
                    self.pos += len + 4;
                }
                _ => return Ok(newline),
            }
        }
    }

    fn scan_string(&mut self) -> PatchResult<()> {
        let start = self.pos;
        let quote = self.bump();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '\n' => break,
                c if Some(c) == quote => return Ok(()),
                _ => {}
            }
        }
        Err(self.error(start, "unterminated string literal"))
    }

    fn scan_template(&mut self) -> PatchResult<()> {
        let start = self.pos;
        self.bump();
        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    self.bump();
                }
                '`' => return Ok(()),
                '$' if self.peek() == Some('{') => {
                    self.bump();
                    self.skip_substitution()?;
                }
                _ => {}
            }
        }
        Err(self.error(start, "unterminated template literal"))
    }

    /// Consume code inside `${ ... }` up to and including the matching brace
    fn skip_substitution(&mut self) -> PatchResult<()> {
        let start = self.pos;
        let mut depth = 0usize;
        loop {
            self.skip_trivia()?;
            match self.peek() {
                None => return Err(self.error(start, "unterminated template substitution")),
                Some('{') => {
                    depth += 1;
                    self.bump();
                }
                Some('}') => {
                    self.bump();
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                Some('"') | Some('\'') => self.scan_string()?,
                Some('`') => self.scan_template()?,
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn scan_number(&mut self) {
        let mut previous = '\0';
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-') && matches!(previous, 'e' | 'E') && !self.is_hex_literal();
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                previous = c;
                self.bump();
            } else {
                break;
            }
        }
    }

    fn is_hex_literal(&self) -> bool {
        let rest = &self.source[..self.pos];
        let start = rest
            .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == '_'))
            .map_or(0, |i| i + 1);
        let literal = &rest[start..];
        literal.starts_with("0x") || literal.starts_with("0X")
    }

    fn scan_regex(&mut self) -> PatchResult<()> {
        let start = self.pos;
        self.bump();
        let mut in_class = false;
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error(start, "unterminated regular expression")),
                Some('\\') => {
                    self.bump();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some(_) => {}
            }
        }
        while self.peek().is_some_and(is_id_continue) {
            self.bump();
        }
        Ok(())
    }

    fn scan_word(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\\' {
                // unicode escape inside an identifier
                self.bump();
                self.bump();
            } else if is_id_continue(c) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn scan_punct(&mut self) -> PatchResult<()> {
        let rest = &self.bytes[self.pos..];
        match PUNCTUATORS.iter().find(|p| rest.starts_with(p.as_bytes())) {
            Some(p) => {
                self.pos += p.len();
                Ok(())
            }
            None => {
                let ch = self.peek().unwrap_or('\0');
                Err(self.error(self.pos, &format!("unexpected character '{}'", ch)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| (t.kind, t.text(source).to_string()))
            .collect()
    }

    #[test]
    fn test_module_exports_tokens() {
        let toks = kinds("module.exports = { a: 'x' };");
        let texts: Vec<_> = toks.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["module", ".", "exports", "=", "{", "a", ":", "'x'", "}", ";"]);
        assert_eq!(toks[7].0, TokenKind::Str);
    }

    #[test]
    fn test_comments_are_skipped_and_newlines_tracked() {
        let source = "a // one\n/* two\n */ b";
        let toks = tokenize(source).unwrap();
        assert_eq!(toks[0].text(source), "a");
        assert_eq!(toks[1].text(source), "b");
        assert!(toks[1].newline_before);
    }

    #[test]
    fn test_regex_versus_division() {
        let toks = kinds("x = a / b; y = /ab+c/gi;");
        assert!(toks.iter().any(|(k, t)| *k == TokenKind::Regex && t == "/ab+c/gi"));
        assert!(toks.iter().any(|(k, t)| *k == TokenKind::Punct && t == "/"));
    }

    #[test]
    fn test_template_with_nested_substitution() {
        let toks = kinds("`a${ {b: `c${d}`}.b }e` + 1");
        assert_eq!(toks[0].0, TokenKind::Template);
        assert_eq!(toks[0].1, "`a${ {b: `c${d}`}.b }e`");
        assert_eq!(toks[1].1, "+");
    }

    #[test]
    fn test_string_escapes() {
        let toks = kinds(r#"'it\'s' "say \"hi\"""#);
        assert_eq!(toks.len(), 2);
    }

    #[test]
    fn test_numbers() {
        let texts: Vec<_> = kinds("1e+5 0x1F .5 10n").into_iter().map(|(_, t)| t).collect();
        assert_eq!(texts, vec!["1e+5", "0x1F", ".5", "10n"]);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let err = tokenize("module.exports = { a: 'x };").unwrap_err();
        match err {
            PatchError::Syntax { line, column, .. } => {
                assert_eq!(line, 1);
                assert_eq!(column, 23);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_line_col() {
        assert_eq!(line_col("ab\ncd", 4), (2, 2));
    }
}

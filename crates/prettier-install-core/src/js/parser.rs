//! Parser that locates top-level `module.exports = <expr>` assignments and
//! builds a tree for the assigned expression.
//!
//! Only the shapes the patcher edits are modelled: object and array literals,
//! string literals and identifiers. Everything else becomes an opaque
//! [`NodeKind::Other`] covering its source range.

use super::ast::{Ast, Item, NodeId, NodeKind, Trivia};
use super::lexer::{syntax_error, tokenize, Span, Token, TokenKind};
use crate::error::PatchResult;

/// Result of parsing a whole `.eslintrc.js` file
#[derive(Debug)]
pub struct Parsed {
    pub ast: Ast,
    /// Right-hand sides of every top-level `module.exports =`, in source order
    pub exports: Vec<NodeId>,
    /// Quote character of the first string literal in the file
    pub quote: Option<char>,
}

pub fn parse(source: &str) -> PatchResult<Parsed> {
    let tokens = tokenize(source)?;
    let quote = tokens
        .iter()
        .find(|t| t.kind == TokenKind::Str)
        .and_then(|t| t.text(source).chars().next());

    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        ast: Ast::new(),
    };

    let mut exports = Vec::new();
    for start in parser.export_positions()? {
        parser.pos = start;
        exports.push(parser.parse_expression()?);
    }

    Ok(Parsed {
        ast: parser.ast,
        exports,
        quote,
    })
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    ast: Ast,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Token {
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn bump(&mut self) -> Token {
        let tok = self.peek();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn text(&self, tok: Token) -> &'a str {
        tok.text(self.source)
    }

    /// End offset of the last consumed token
    fn consumed_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .map_or(0, |idx| self.tokens[idx].span.end)
    }

    fn unexpected(&self, tok: Token) -> crate::error::PatchError {
        if tok.kind == TokenKind::Eof {
            syntax_error(self.source, tok.span.start, "unexpected end of input")
        } else {
            syntax_error(
                self.source,
                tok.span.start,
                format!("unexpected token '{}'", self.text(tok)),
            )
        }
    }

    /// Token indices just past each `module.exports =` at statement level
    fn export_positions(&self) -> PatchResult<Vec<usize>> {
        let mut found = Vec::new();
        let mut open: Vec<&str> = Vec::new();

        for (idx, tok) in self.tokens.iter().enumerate() {
            if tok.kind == TokenKind::Punct {
                match self.text(*tok) {
                    "(" => open.push(")"),
                    "[" => open.push("]"),
                    "{" => open.push("}"),
                    close @ (")" | "]" | "}") => {
                        if open.pop() != Some(close) {
                            return Err(self.unexpected(*tok));
                        }
                    }
                    _ => {}
                }
                continue;
            }
            if tok.kind == TokenKind::Eof && !open.is_empty() {
                return Err(self.unexpected(*tok));
            }
            if open.is_empty() && self.is_exports_assignment(idx) {
                found.push(idx + 4);
            }
        }
        Ok(found)
    }

    fn is_exports_assignment(&self, idx: usize) -> bool {
        let Some(window) = self.tokens.get(idx..idx + 4) else {
            return false;
        };
        let matches = window[0].is_word(self.source, "module")
            && window[1].is_punct(self.source, ".")
            && window[2].is_word(self.source, "exports")
            && window[3].is_punct(self.source, "=");
        if !matches {
            return false;
        }

        match idx.checked_sub(1).map(|prev| self.tokens[prev]) {
            None => true,
            Some(prev) if prev.is_punct(self.source, ";") || prev.is_punct(self.source, "}") => true,
            Some(prev) => window[0].newline_before && self.can_end_expression(prev),
        }
    }

    fn can_end_expression(&self, tok: Token) -> bool {
        match tok.kind {
            TokenKind::Word | TokenKind::Str | TokenKind::Template | TokenKind::Number | TokenKind::Regex => true,
            TokenKind::Punct => matches!(self.text(tok), ")" | "]" | "}" | "++" | "--"),
            TokenKind::Eof => false,
        }
    }

    /// Whether a token on a new line carries on the previous expression
    fn continues(&self, tok: Token) -> bool {
        match tok.kind {
            TokenKind::Template => true,
            TokenKind::Word => matches!(self.text(tok), "in" | "instanceof"),
            TokenKind::Punct => !matches!(
                self.text(tok),
                "++" | "--" | "!" | "~" | "{" | "}" | ")" | "]" | ";" | "," | "@" | "#"
            ),
            _ => false,
        }
    }

    fn is_terminator(&self, tok: Token) -> bool {
        tok.kind == TokenKind::Eof
            || (tok.kind == TokenKind::Punct && matches!(self.text(tok), "," | ";" | ")" | "]" | "}"))
    }

    fn at_expression_end(&self) -> bool {
        let tok = self.peek();
        self.is_terminator(tok) || (tok.newline_before && !self.continues(tok))
    }

    fn parse_expression(&mut self) -> PatchResult<NodeId> {
        let start = self.pos;
        let tok = self.peek();

        let primary = match tok.kind {
            TokenKind::Punct if self.text(tok) == "{" => Some(self.parse_object()?),
            TokenKind::Punct if self.text(tok) == "[" => Some(self.parse_array()?),
            TokenKind::Str => {
                self.bump();
                let value = decode_string(self.source, tok.span)?;
                Some(self.ast.alloc(NodeKind::StringLiteral { value }, Some(tok.span)))
            }
            TokenKind::Word => {
                self.bump();
                let name = self.text(tok).to_string();
                Some(self.ast.alloc(NodeKind::Identifier { name }, Some(tok.span)))
            }
            _ => None,
        };

        match primary {
            Some(id) if self.at_expression_end() => Ok(id),
            _ => {
                // operator continuation, call, member access...
                self.pos = start;
                self.parse_other()
            }
        }
    }

    /// Consume one expression without interpreting it
    fn parse_other(&mut self) -> PatchResult<NodeId> {
        let start = self.pos;
        let mut open: Vec<&str> = Vec::new();

        loop {
            let tok = self.peek();
            if open.is_empty() {
                let asi = self.pos > start
                    && tok.newline_before
                    && self.can_end_expression(self.tokens[self.pos - 1])
                    && !self.continues(tok);
                if self.is_terminator(tok) || asi {
                    if self.pos == start {
                        return Err(syntax_error(self.source, tok.span.start, "expected expression"));
                    }
                    break;
                }
            }

            match tok.kind {
                TokenKind::Eof => return Err(self.unexpected(tok)),
                TokenKind::Punct => match self.text(tok) {
                    "(" => open.push(")"),
                    "[" => open.push("]"),
                    "{" => open.push("}"),
                    close @ (")" | "]" | "}") => {
                        if open.pop() != Some(close) {
                            return Err(self.unexpected(tok));
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
            self.pos += 1;
        }

        let span = self.tokens[start].span.to(self.tokens[self.pos - 1].span);
        Ok(self.ast.alloc(NodeKind::Other, Some(span)))
    }

    fn parse_array(&mut self) -> PatchResult<NodeId> {
        let open = self.bump();
        let mut elements: Vec<Item> = Vec::new();
        let mut trailing_comma = false;
        let mut carried = Trivia::default();

        let close = loop {
            let gap = split_gap(&self.source[self.consumed_end()..self.peek().span.start]);
            let tok = self.peek();

            if tok.is_punct(self.source, "]") {
                break (self.bump(), carry(carried, attach(&mut elements, gap)));
            }
            if tok.is_punct(self.source, ",") {
                let leading = carry(std::mem::take(&mut carried), attach(&mut elements, gap));
                self.bump();
                elements.push(Item {
                    leading,
                    ..Item::hole()
                });
                continue;
            }

            let leading = carry(std::mem::take(&mut carried), attach(&mut elements, gap));
            let node = self.parse_expression()?;
            elements.push(Item {
                node: Some(node),
                leading,
                trailing: None,
            });

            let next = self.peek();
            if next.is_punct(self.source, ",") {
                carried = self.before_comma(&mut elements, next);
                self.bump();
                trailing_comma = self.peek().is_punct(self.source, "]");
            } else if !next.is_punct(self.source, "]") {
                return Err(self.unexpected(next));
            }
        };

        let (close, dangling) = close;
        Ok(self.ast.alloc(
            NodeKind::ArrayLiteral {
                elements,
                trailing_comma,
                dangling: dangling.comments,
            },
            Some(open.span.to(close.span)),
        ))
    }

    fn parse_object(&mut self) -> PatchResult<NodeId> {
        let open = self.bump();
        let mut properties: Vec<Item> = Vec::new();
        let mut trailing_comma = false;
        let mut carried = Trivia::default();

        let (close, dangling) = loop {
            let gap = split_gap(&self.source[self.consumed_end()..self.peek().span.start]);
            let tok = self.peek();

            if tok.is_punct(self.source, "}") {
                break (self.bump(), carry(carried, attach(&mut properties, gap)));
            }

            let leading = carry(std::mem::take(&mut carried), attach(&mut properties, gap));
            let node = self.parse_property()?;
            properties.push(Item {
                node: Some(node),
                leading,
                trailing: None,
            });

            let next = self.peek();
            if next.is_punct(self.source, ",") {
                carried = self.before_comma(&mut properties, next);
                self.bump();
                trailing_comma = self.peek().is_punct(self.source, "}");
            } else if !next.is_punct(self.source, "}") {
                return Err(self.unexpected(next));
            }
        };

        Ok(self.ast.alloc(
            NodeKind::ObjectLiteral {
                properties,
                trailing_comma,
                dangling: dangling.comments,
            },
            Some(open.span.to(close.span)),
        ))
    }

    fn parse_property(&mut self) -> PatchResult<NodeId> {
        let start = self.pos;
        let tok = self.peek();

        let key = match tok.kind {
            TokenKind::Word => NodeKind::Identifier {
                name: self.text(tok).to_string(),
            },
            TokenKind::Str => NodeKind::StringLiteral {
                value: decode_string(self.source, tok.span)?,
            },
            TokenKind::Number => NodeKind::Other,
            TokenKind::Punct if matches!(self.text(tok), "..." | "[" | "*") => return self.parse_opaque_property(None),
            _ => return Err(self.unexpected(tok)),
        };
        self.bump();
        let key_is_word = tok.kind == TokenKind::Word;
        let key = self.ast.alloc(key, Some(tok.span));
        let next = self.peek();

        if next.is_punct(self.source, ":") {
            self.bump();
            let value = self.parse_expression()?;
            let value_slot = self.ast.node(value).span;
            let span = value_slot.map(|slot| tok.span.to(slot));
            return Ok(self.ast.alloc(
                NodeKind::Property {
                    key: Some(key),
                    value,
                    shorthand: false,
                    value_slot,
                },
                span,
            ));
        }

        let accessor = key_is_word
            && matches!(self.text(tok), "get" | "set" | "async")
            && (matches!(next.kind, TokenKind::Word | TokenKind::Str | TokenKind::Number)
                || next.is_punct(self.source, "[")
                || next.is_punct(self.source, "*"));
        if accessor || next.is_punct(self.source, "(") {
            let name = if accessor { self.member_name(next)? } else { Some(key) };
            self.pos = start;
            return self.parse_opaque_property(name);
        }

        if key_is_word && (next.is_punct(self.source, ",") || next.is_punct(self.source, "}")) {
            let value = self.ast.alloc(
                NodeKind::Identifier {
                    name: self.text(tok).to_string(),
                },
                Some(tok.span),
            );
            return Ok(self.ast.alloc(
                NodeKind::Property {
                    key: Some(key),
                    value,
                    shorthand: true,
                    value_slot: Some(tok.span),
                },
                Some(tok.span),
            ));
        }

        Err(syntax_error(self.source, next.span.start, "expected ':' after property key"))
    }

    /// Comments between an item and its comma; those on the item's line trail
    /// it, later ones lead the next item
    fn before_comma(&self, items: &mut [Item], comma: Token) -> Trivia {
        let mut gap = split_gap(&self.source[self.consumed_end()..comma.span.start]);
        if gap.same_line.is_empty() && !self.source[self.consumed_end()..comma.span.start].contains('\n') {
            gap.same_line = std::mem::take(&mut gap.rest.comments);
        }
        attach(items, gap)
    }

    /// Static name of a `get`/`set`/`async` member
    fn member_name(&mut self, tok: Token) -> PatchResult<Option<NodeId>> {
        let kind = match tok.kind {
            TokenKind::Word => NodeKind::Identifier {
                name: self.text(tok).to_string(),
            },
            TokenKind::Str => NodeKind::StringLiteral {
                value: decode_string(self.source, tok.span)?,
            },
            _ => return Ok(None),
        };
        Ok(Some(self.ast.alloc(kind, Some(tok.span))))
    }

    /// Spread, method, accessor or computed member, kept as written; methods
    /// and accessors keep their name as `key`
    fn parse_opaque_property(&mut self, key: Option<NodeId>) -> PatchResult<NodeId> {
        let value = self.parse_other()?;
        let span = self.ast.node(value).span;
        Ok(self.ast.alloc(
            NodeKind::Property {
                key,
                value,
                shorthand: false,
                value_slot: None,
            },
            span,
        ))
    }
}

/// Whitespace and comments between two tokens, split at the first line break
struct Gap {
    /// Comments on the same line as the preceding token
    same_line: Vec<String>,
    rest: Trivia,
}

fn split_gap(gap: &str) -> Gap {
    let newline = gap.find('\n');
    let mut same_line = Vec::new();
    let mut rest = Trivia::default();

    for (offset, comment) in comments_in(gap) {
        match newline {
            Some(nl) if offset > nl => rest.comments.push(comment),
            _ => same_line.push(comment),
        }
    }

    if let Some(nl) = newline {
        let tail = &gap[nl..];
        let before_comment = tail.find("/").map_or(tail, |idx| &tail[..idx]);
        rest.blank_line = before_comment.matches('\n').count() >= 2;
    } else {
        // no line break: everything belongs to what follows
        rest.comments = std::mem::take(&mut same_line);
    }

    Gap { same_line, rest }
}

/// Give same-line comments to the previous item, return what leads the next one
fn attach(items: &mut [Item], gap: Gap) -> Trivia {
    let Gap { same_line, mut rest } = gap;
    if same_line.is_empty() {
        return rest;
    }
    match items.last_mut() {
        Some(last) if last.node.is_some() => {
            let mut comments: Vec<String> = last.trailing.take().into_iter().collect();
            comments.extend(same_line);
            last.trailing = Some(comments.join(" "));
        }
        _ => {
            let mut comments = same_line;
            comments.append(&mut rest.comments);
            rest.comments = comments;
        }
    }
    rest
}

/// Trivia held over from before a comma, ahead of the next item's own
fn carry(mut carried: Trivia, next: Trivia) -> Trivia {
    carried.comments.extend(next.comments);
    carried.blank_line |= next.blank_line;
    carried
}

fn comments_in(gap: &str) -> Vec<(usize, String)> {
    let mut found = Vec::new();
    let mut idx = 0;
    while idx < gap.len() {
        let rest = &gap[idx..];
        let len = if rest.starts_with("//") {
            rest.find('\n').unwrap_or(rest.len())
        } else if rest.starts_with("/*") {
            rest.find("*/").map_or(rest.len(), |end| end + 2)
        } else {
            idx += rest.chars().next().map_or(1, char::len_utf8);
            continue;
        };
        found.push((idx, rest[..len].trim_end().to_string()));
        idx += len;
    }
    found
}

/// Cooked value of a quoted string literal
pub fn decode_string(source: &str, span: Span) -> PatchResult<String> {
    let raw = &source[span.start + 1..span.end - 1];
    let bad_escape = |at: usize| syntax_error(source, span.start + 1 + at, "invalid escape sequence");

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();
    while let Some((at, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some((_, esc)) = chars.next() else {
            return Err(bad_escape(at));
        };
        match esc {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(|(_, c)| c.is_ascii_digit()) => out.push('\0'),
            '\r' => {
                chars.next_if(|(_, c)| *c == '\n');
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            'x' => {
                let hex: String = chars.by_ref().take(2).map(|(_, c)| c).collect();
                let code = u32::from_str_radix(&hex, 16).map_err(|_| bad_escape(at))?;
                out.push(char::from_u32(code).ok_or_else(|| bad_escape(at))?);
            }
            'u' => {
                let code = read_unicode_escape(&mut chars).ok_or_else(|| bad_escape(at))?;
                if (0xD800..0xDC00).contains(&code) && raw[at..].get(6..8) == Some("\\u") {
                    // surrogate pair spelled as two escapes
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    lookahead.next();
                    if let Some(low @ 0xDC00..=0xDFFF) = read_unicode_escape(&mut lookahead) {
                        chars = lookahead;
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                        continue;
                    }
                }
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn read_unicode_escape<I>(chars: &mut std::iter::Peekable<I>) -> Option<u32>
where
    I: Iterator<Item = (usize, char)> + Clone,
{
    let hex: String = if chars.next_if(|(_, c)| *c == '{').is_some() {
        let mut digits = String::new();
        loop {
            match chars.next()? {
                (_, '}') => break digits,
                (_, c) => digits.push(c),
            }
        }
    } else {
        chars.by_ref().take(4).map(|(_, c)| c).collect()
    };
    if hex.is_empty() {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PatchError;

    fn single_export(source: &str) -> (Parsed, NodeId) {
        let parsed = parse(source).unwrap();
        assert_eq!(parsed.exports.len(), 1);
        let root = parsed.exports[0];
        (parsed, root)
    }

    fn property<'p>(parsed: &'p Parsed, object: NodeId, name: &str) -> &'p NodeKind {
        let NodeKind::ObjectLiteral { properties, .. } = parsed.ast.kind(object) else {
            panic!("not an object");
        };
        let prop = properties
            .iter()
            .filter_map(|item| item.node)
            .find(|id| parsed.ast.property_name(*id) == Some(name))
            .unwrap();
        parsed.ast.kind(prop)
    }

    #[test]
    fn test_parses_object_export() {
        let (parsed, root) = single_export("module.exports = { extends: 'eslint:recommended', 'no-undef': x };");
        assert!(parsed.ast.is_object(root));
        assert_eq!(parsed.quote, Some('\''));

        let NodeKind::Property { value, .. } = property(&parsed, root, "extends") else {
            panic!("not a property");
        };
        assert!(parsed.ast.is_string(*value, "eslint:recommended"));
        assert!(matches!(property(&parsed, root, "no-undef"), NodeKind::Property { .. }));
    }

    #[test]
    fn test_ignores_nested_and_member_exports() {
        let source = "if (x) {\n  module.exports = {};\n}\nfoo.module.exports = 1;\n";
        assert!(parse(source).unwrap().exports.is_empty());
    }

    #[test]
    fn test_finds_export_after_other_statements() {
        let source = "const base = require('./base')\nmodule.exports = {\n  ...base,\n  rules: {},\n}\n";
        let (parsed, root) = single_export(source);
        let NodeKind::ObjectLiteral {
            properties,
            trailing_comma,
            ..
        } = parsed.ast.kind(root)
        else {
            panic!("not an object");
        };
        assert_eq!(properties.len(), 2);
        assert!(trailing_comma);
        assert_eq!(parsed.ast.property_name(properties[0].node.unwrap()), None);
    }

    #[test]
    fn test_binary_expression_is_opaque() {
        let (parsed, root) = single_export("module.exports = { extends: 'a' + b };");
        let NodeKind::Property { value, .. } = property(&parsed, root, "extends") else {
            panic!("not a property");
        };
        assert_eq!(parsed.ast.kind(*value), &NodeKind::Other);
    }

    #[test]
    fn test_call_export_is_opaque() {
        let (parsed, root) = single_export("module.exports = merge(base, { rules: {} });");
        assert_eq!(parsed.ast.kind(root), &NodeKind::Other);
    }

    #[test]
    fn test_array_holes_and_trailing_comma() {
        let (parsed, root) = single_export("module.exports = { plugins: [a, , 'b',] };");
        let NodeKind::Property { value, .. } = property(&parsed, root, "plugins") else {
            panic!("not a property");
        };
        let NodeKind::ArrayLiteral {
            elements,
            trailing_comma,
            ..
        } = parsed.ast.kind(*value)
        else {
            panic!("not an array");
        };
        assert_eq!(elements.len(), 3);
        assert!(elements[1].node.is_none());
        assert!(trailing_comma);
    }

    #[test]
    fn test_methods_and_shorthand() {
        let source = "module.exports = { plugins, get x() { return 1 }, rules() {}, [k]: 1, 2: 'two' };";
        let (parsed, root) = single_export(source);
        assert!(matches!(
            property(&parsed, root, "plugins"),
            NodeKind::Property { shorthand: true, .. }
        ));
        let NodeKind::ObjectLiteral { properties, .. } = parsed.ast.kind(root) else {
            panic!("not an object");
        };
        assert_eq!(properties.len(), 5);

        let names: Vec<_> = properties
            .iter()
            .filter_map(|item| item.node)
            .map(|id| parsed.ast.property_name(id))
            .collect();
        assert_eq!(names, [Some("plugins"), Some("x"), Some("rules"), None, None]);
        let opaque: Vec<_> = properties
            .iter()
            .filter_map(|item| item.node)
            .map(|id| parsed.ast.is_opaque_member(id))
            .collect();
        assert_eq!(opaque, [false, true, true, true, false]);
    }

    #[test]
    fn test_comments_are_attached() {
        let source = "module.exports = {\n  // base config\n  extends: 'a', // inline\n\n  rules: {},\n  // end\n};\n";
        let (parsed, root) = single_export(source);
        let NodeKind::ObjectLiteral {
            properties, dangling, ..
        } = parsed.ast.kind(root)
        else {
            panic!("not an object");
        };
        assert_eq!(properties[0].leading.comments, vec!["// base config"]);
        assert_eq!(properties[0].trailing.as_deref(), Some("// inline"));
        assert!(properties[1].leading.blank_line);
        assert_eq!(dangling, &vec!["// end".to_string()]);
    }

    #[test]
    fn test_comments_before_commas_are_attached() {
        let source = "module.exports = {\n  a: 1 /* one */,\n  b: 2\n  // about c\n  , c: 3,\n};\n";
        let (parsed, root) = single_export(source);
        let NodeKind::ObjectLiteral { properties, .. } = parsed.ast.kind(root) else {
            panic!("not an object");
        };
        assert_eq!(properties[0].trailing.as_deref(), Some("/* one */"));
        assert_eq!(properties[1].trailing, None);
        assert_eq!(properties[2].leading.comments, vec!["// about c"]);
    }

    #[test]
    fn test_decodes_escapes() {
        let source = r#"module.exports = { a: 'it\'s\x41B\u{43}😀' };"#;
        let (parsed, root) = single_export(source);
        let NodeKind::Property { value, .. } = property(&parsed, root, "a") else {
            panic!("not a property");
        };
        assert!(parsed.ast.is_string(*value, "it'sABC\u{1F600}"));
    }

    #[test]
    fn test_unbalanced_brackets_are_syntax_errors() {
        let err = parse("module.exports = {\n  rules: {\n};\n").unwrap_err();
        assert!(matches!(err, PatchError::Syntax { .. }));

        let err = parse("module.exports = { rules: ] };").unwrap_err();
        assert!(matches!(err, PatchError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_missing_colon_reports_position() {
        let err = parse("module.exports = {\n  extends 'a'\n};").unwrap_err();
        match err {
            PatchError::Syntax { line, column, .. } => assert_eq!((line, column), (2, 11)),
            other => panic!("unexpected error {other:?}"),
        }
    }
}

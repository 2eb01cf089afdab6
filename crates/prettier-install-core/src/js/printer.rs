//! Source printer that keeps untouched code byte-for-byte.
//!
//! Nodes that still have a span and were not restructured are copied from the
//! original text, with changed descendants spliced in at their spans. Only
//! synthesized or restructured containers are laid out anew, using the file's
//! indentation unit and quote style.

use super::ast::{Ast, Item, NodeId, NodeKind};
use super::lexer::Span;
use crate::codec::Indent;

pub struct Printer<'a> {
    source: &'a str,
    ast: &'a Ast,
    unit: String,
    quote: char,
}

impl<'a> Printer<'a> {
    pub fn new(source: &'a str, ast: &'a Ast, quote: Option<char>) -> Self {
        Self {
            source,
            ast,
            unit: indent_unit(source),
            quote: quote.unwrap_or('"'),
        }
    }

    /// Render a node whose first line starts at indentation `indent`; `inline`
    /// tells whether the enclosing container sits on a single line
    pub fn print(&self, id: NodeId, indent: &str, inline: bool) -> String {
        let node = self.ast.node(id);
        match (&node.kind, node.span) {
            (NodeKind::Identifier { name }, None) => name.clone(),
            (NodeKind::StringLiteral { value }, None) => quote(value, self.quote),
            (NodeKind::Identifier { .. } | NodeKind::StringLiteral { .. } | NodeKind::Other, Some(span)) => {
                self.slice(span).to_string()
            }
            (NodeKind::Other, None) => String::new(),
            (NodeKind::Property { .. }, span) => self.print_property(id, span, indent, inline),
            (NodeKind::ArrayLiteral { elements: items, .. } | NodeKind::ObjectLiteral { properties: items, .. }, Some(span))
                if !node.restructured =>
            {
                self.splice(span, items)
            }
            (
                NodeKind::ArrayLiteral {
                    elements,
                    trailing_comma,
                    dangling,
                },
                span,
            ) => {
                // new arrays stay on one line unless comments force otherwise
                let multiline = span.is_some_and(|s| self.slice(s).contains('\n')) || has_comments(elements, dangling);
                self.layout('[', elements, *trailing_comma, dangling, indent, multiline)
            }
            (
                NodeKind::ObjectLiteral {
                    properties,
                    trailing_comma,
                    dangling,
                },
                span,
            ) => {
                let multiline = match span {
                    Some(s) => self.slice(s).contains('\n'),
                    None => !inline,
                } || has_comments(properties, dangling);
                self.layout('{', properties, *trailing_comma, dangling, indent, multiline)
            }
        }
    }

    fn slice(&self, span: Span) -> &'a str {
        &self.source[span.start..span.end]
    }

    fn print_property(&self, id: NodeId, span: Option<Span>, indent: &str, inline: bool) -> String {
        let NodeKind::Property {
            key,
            value,
            shorthand,
            value_slot,
        } = self.ast.kind(id)
        else {
            return String::new();
        };
        let value_moved = self.ast.node(*value).span != *value_slot;

        match (span, value_slot) {
            (Some(span), _) if *shorthand && !value_moved => self.slice(span).to_string(),
            (Some(span), Some(slot)) if !*shorthand => format!(
                "{}{}{}",
                &self.source[span.start..slot.start],
                self.print(*value, indent, inline),
                &self.source[slot.end..span.end]
            ),
            (Some(span), None) => self.slice(span).to_string(),
            _ => {
                let key = key.map(|k| self.print(k, indent, inline)).unwrap_or_default();
                format!("{}: {}", key, self.print(*value, indent, inline))
            }
        }
    }

    /// Original text of a container with each child re-printed in place
    fn splice(&self, span: Span, items: &[Item]) -> String {
        let inline = !self.slice(span).contains('\n');
        let mut out = String::new();
        let mut cursor = span.start;
        for child in items.iter().filter_map(|item| item.node) {
            let Some(child_span) = self.ast.node(child).span else {
                continue;
            };
            out.push_str(&self.source[cursor..child_span.start]);
            out.push_str(&self.print(child, line_indent(self.source, child_span.start), inline));
            cursor = child_span.end;
        }
        out.push_str(&self.source[cursor..span.end]);
        out
    }

    /// Indentation for the items of a container laid out at `indent`
    fn item_indent(&self, items: &[Item], indent: &str) -> String {
        let first = items
            .iter()
            .filter_map(|item| item.node)
            .find_map(|id| self.ast.node(id).span);
        match first {
            Some(span) if starts_line(self.source, span.start) => line_indent(self.source, span.start).to_string(),
            _ => format!("{}{}", indent, self.unit),
        }
    }

    fn layout(
        &self,
        open: char,
        items: &[Item],
        trailing_comma: bool,
        dangling: &[String],
        indent: &str,
        multiline: bool,
    ) -> String {
        let close = if open == '{' { '}' } else { ']' };
        if items.is_empty() && dangling.is_empty() {
            return format!("{}{}", open, close);
        }

        if !multiline {
            let parts: Vec<String> = items
                .iter()
                .map(|item| item.node.map(|id| self.print(id, indent, true)).unwrap_or_default())
                .collect();
            let hole_last = items.last().is_some_and(|item| item.node.is_none());
            let body = format!("{}{}", parts.join(", "), if hole_last { "," } else { "" });
            return match open {
                '{' => format!("{{ {} }}", body),
                _ => format!("{}{}{}", open, body, close),
            };
        }

        let inner = self.item_indent(items, indent);
        let mut out = format!("{}\n", open);
        for (idx, item) in items.iter().enumerate() {
            if idx > 0 && item.leading.blank_line {
                out.push('\n');
            }
            for comment in &item.leading.comments {
                out.push_str(&format!("{}{}\n", inner, comment));
            }

            out.push_str(&inner);
            if let Some(id) = item.node {
                out.push_str(&self.print(id, &inner, false));
            }
            if idx + 1 < items.len() || trailing_comma || item.node.is_none() {
                out.push(',');
            }
            if let Some(comment) = &item.trailing {
                out.push(' ');
                out.push_str(comment);
            }
            out.push('\n');
        }
        for comment in dangling {
            out.push_str(&format!("{}{}\n", inner, comment));
        }
        out.push_str(indent);
        out.push(close);
        out
    }
}

fn has_comments(items: &[Item], dangling: &[String]) -> bool {
    !dangling.is_empty()
        || items
            .iter()
            .any(|item| item.trailing.is_some() || !item.leading.comments.is_empty())
}

/// Leading whitespace of the line containing `offset`
pub fn line_indent(source: &str, offset: usize) -> &str {
    let start = source[..offset].rfind('\n').map_or(0, |idx| idx + 1);
    let line = &source[start..offset];
    let width = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..width]
}

fn starts_line(source: &str, offset: usize) -> bool {
    let start = source[..offset].rfind('\n').map_or(0, |idx| idx + 1);
    source[start..offset].trim().is_empty()
}

/// Indentation unit of a JS file; comment continuation lines are ignored
fn indent_unit(source: &str) -> String {
    let code: String = source
        .lines()
        .filter(|line| !line.trim_start().starts_with('*'))
        .collect::<Vec<_>>()
        .join("\n");
    Indent::detect(&code).unwrap_or_default().unit()
}

fn quote(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

// Arena syntax tree for the `module.exports` value of an ESLint config

use super::lexer::Span;
use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Comments attached to an array element or object property
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trivia {
    /// Full comment texts on the lines above the item
    pub comments: Vec<String>,
    /// An empty line separates the item from the previous one
    pub blank_line: bool,
}

/// Array element or object property slot; `node` is `None` for array holes
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub node: Option<NodeId>,
    pub leading: Trivia,
    /// Comment on the same line, after the item
    pub trailing: Option<String>,
}

impl Item {
    pub fn new(node: NodeId) -> Self {
        Self {
            node: Some(node),
            leading: Trivia::default(),
            trailing: None,
        }
    }

    pub fn hole() -> Self {
        Self {
            node: None,
            leading: Trivia::default(),
            trailing: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Identifier {
        name: String,
    },
    StringLiteral {
        value: String,
    },
    ArrayLiteral {
        elements: Vec<Item>,
        trailing_comma: bool,
        /// Comments after the last element
        dangling: Vec<String>,
    },
    ObjectLiteral {
        properties: Vec<Item>,
        trailing_comma: bool,
        dangling: Vec<String>,
    },
    /// `key: value`, shorthand `key`, or an opaque member (spread, method,
    /// computed key) when `key` is `None`
    Property {
        key: Option<NodeId>,
        value: NodeId,
        shorthand: bool,
        /// Where the value sits inside the property's source text
        value_slot: Option<Span>,
    },
    /// Any expression the patcher never looks into
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Source range, `None` for synthesized nodes
    pub span: Option<Span>,
    /// Children were added or removed, so the node must be regenerated
    pub restructured: bool,
}

#[derive(Debug, Default)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Option<Span>) -> NodeId {
        self.nodes.push(Node {
            kind,
            span,
            restructured: false,
        });
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        self.alloc(
            NodeKind::StringLiteral {
                value: value.to_string(),
            },
            None,
        )
    }

    pub fn array(&mut self, elements: Vec<NodeId>) -> NodeId {
        self.alloc(
            NodeKind::ArrayLiteral {
                elements: elements.into_iter().map(Item::new).collect(),
                trailing_comma: false,
                dangling: Vec::new(),
            },
            None,
        )
    }

    pub fn object(&mut self) -> NodeId {
        self.alloc(
            NodeKind::ObjectLiteral {
                properties: Vec::new(),
                trailing_comma: false,
                dangling: Vec::new(),
            },
            None,
        )
    }

    /// Property key: a bare identifier when the name allows it, a string otherwise
    pub fn key(&mut self, name: &str) -> NodeId {
        if IDENTIFIER.is_match(name) {
            self.alloc(
                NodeKind::Identifier {
                    name: name.to_string(),
                },
                None,
            )
        } else {
            self.string(name)
        }
    }

    pub fn property(&mut self, name: &str, value: NodeId) -> NodeId {
        let key = self.key(name);
        self.alloc(
            NodeKind::Property {
                key: Some(key),
                value,
                shorthand: false,
                value_slot: None,
            },
            None,
        )
    }

    /// Static name of a property key, if it has one
    pub fn property_name(&self, property: NodeId) -> Option<&str> {
        match self.kind(property) {
            NodeKind::Property { key: Some(key), .. } => match self.kind(*key) {
                NodeKind::Identifier { name } => Some(name),
                NodeKind::StringLiteral { value } => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn is_string(&self, id: NodeId, expected: &str) -> bool {
        matches!(self.kind(id), NodeKind::StringLiteral { value } if value == expected)
    }

    /// Method or accessor kept verbatim; it may have a name but has no value to edit
    pub fn is_opaque_member(&self, property: NodeId) -> bool {
        matches!(self.kind(property), NodeKind::Property { value_slot: None, .. }) && self.node(property).span.is_some()
    }

    pub fn is_object(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::ObjectLiteral { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_uses_identifier_when_possible() {
        let mut ast = Ast::new();
        let plain = ast.key("extends");
        let quoted = ast.key("prettier/prettier");

        assert!(matches!(ast.kind(plain), NodeKind::Identifier { name } if name == "extends"));
        assert!(ast.is_string(quoted, "prettier/prettier"));
    }

    #[test]
    fn test_property_name() {
        let mut ast = Ast::new();
        let value = ast.string("error");
        let prop = ast.property("prettier/prettier", value);
        assert_eq!(ast.property_name(prop), Some("prettier/prettier"));
    }
}

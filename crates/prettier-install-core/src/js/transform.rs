// Edits applied to the exported ESLint config object

use super::ast::{Ast, Item, NodeId, NodeKind};
use crate::patcher::Severity;
use tracing::debug;

pub const PRETTIER_PRESET: &str = "prettier";
pub const PRETTIER_PLUGIN: &str = "prettier";
pub const PRETTIER_RULE: &str = "prettier/prettier";

/// Add the prettier preset, plugin and rule to an exported config object
pub fn add_prettier(ast: &mut Ast, config: NodeId, severity: Severity) {
    if !ast.is_object(config) {
        debug!("module.exports is not an object literal, leaving it as is");
        return;
    }
    add_preset(ast, config, PRETTIER_PRESET);
    add_plugin(ast, config, PRETTIER_PLUGIN);
    add_rule(ast, config, PRETTIER_RULE, severity.as_str());
}

/// `extends` ends with exactly one `preset`
pub fn add_preset(ast: &mut Ast, config: NodeId, preset: &str) {
    ensure_property(ast, config, "extends", |ast| ast.array(Vec::new()));
    update_property(ast, config, "extends", |ast, value| {
        let list = coerce_array(ast, value);
        move_to_end(ast, list, preset);
        list
    });
}

/// `plugins` contains `plugin`
pub fn add_plugin(ast: &mut Ast, config: NodeId, plugin: &str) {
    ensure_property(ast, config, "plugins", |ast| ast.array(Vec::new()));
    update_property(ast, config, "plugins", |ast, value| {
        let list = coerce_array(ast, value);
        if !elements(ast, list).any(|id| ast.is_string(id, plugin)) {
            let entry = ast.string(plugin);
            push_item(ast, list, entry);
        }
        list
    });
}

/// `rules` has an entry for `rule`; an existing setting is left alone
pub fn add_rule(ast: &mut Ast, config: NodeId, rule: &str, severity: &str) {
    ensure_property(ast, config, "rules", |ast| ast.object());
    update_property(ast, config, "rules", |ast, value| {
        let rules = if ast.is_object(value) { value } else { ast.object() };
        ensure_property(ast, rules, rule, |ast| ast.string(severity));
        rules
    });
}

fn properties_named(ast: &Ast, object: NodeId, name: &str) -> Vec<NodeId> {
    match ast.kind(object) {
        NodeKind::ObjectLiteral { properties, .. } => properties
            .iter()
            .filter_map(|item| item.node)
            .filter(|id| ast.property_name(*id) == Some(name))
            .collect(),
        _ => Vec::new(),
    }
}

fn ensure_property(ast: &mut Ast, object: NodeId, name: &str, default: impl FnOnce(&mut Ast) -> NodeId) {
    if !properties_named(ast, object, name).is_empty() {
        return;
    }
    let value = default(ast);
    let property = ast.property(name, value);
    push_item(ast, object, property);
}

/// Run `update` on the value of every property called `name`
fn update_property(ast: &mut Ast, object: NodeId, name: &str, mut update: impl FnMut(&mut Ast, NodeId) -> NodeId) {
    for property in properties_named(ast, object, name) {
        if ast.is_opaque_member(property) {
            debug!(name, "property is a method or accessor, leaving it as is");
            continue;
        }
        let NodeKind::Property { value, .. } = *ast.kind(property) else {
            continue;
        };
        let updated = update(ast, value);
        if updated != value {
            if let NodeKind::Property { value, .. } = &mut ast.node_mut(property).kind {
                *value = updated;
            }
        }
    }
}

/// Arrays pass through; `null`/`undefined` become `[]`; anything else is wrapped
fn coerce_array(ast: &mut Ast, value: NodeId) -> NodeId {
    match ast.kind(value) {
        NodeKind::ArrayLiteral { .. } => value,
        NodeKind::Identifier { name } if name == "null" || name == "undefined" => ast.array(Vec::new()),
        _ => ast.array(vec![value]),
    }
}

fn elements(ast: &Ast, list: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    let items: &[Item] = match ast.kind(list) {
        NodeKind::ArrayLiteral { elements, .. } => elements,
        _ => &[],
    };
    items.iter().filter_map(|item| item.node)
}

fn move_to_end(ast: &mut Ast, list: NodeId, value: &str) {
    let matching: Vec<usize> = match ast.kind(list) {
        NodeKind::ArrayLiteral { elements, .. } => elements
            .iter()
            .enumerate()
            .filter(|(_, item)| item.node.is_some_and(|id| ast.is_string(id, value)))
            .map(|(idx, _)| idx)
            .collect(),
        _ => return,
    };
    let len = match ast.kind(list) {
        NodeKind::ArrayLiteral { elements, .. } => elements.len(),
        _ => 0,
    };
    if matching == [len.wrapping_sub(1)] {
        return;
    }

    let entry = ast.string(value);
    let node = ast.node_mut(list);
    if let NodeKind::ArrayLiteral { elements, .. } = &mut node.kind {
        for idx in matching.into_iter().rev() {
            elements.remove(idx);
        }
        elements.push(Item::new(entry));
    }
    node.restructured = true;
}

fn push_item(ast: &mut Ast, container: NodeId, child: NodeId) {
    let node = ast.node_mut(container);
    match &mut node.kind {
        NodeKind::ArrayLiteral { elements: items, .. } | NodeKind::ObjectLiteral { properties: items, .. } => {
            items.push(Item::new(child));
            node.restructured = true;
        }
        _ => {}
    }
}

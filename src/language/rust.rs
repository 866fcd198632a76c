use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use tree_sitter::{Language, Node, Parser, Tree};
use tree_sitter_rust::LANGUAGE as rust_language;

use crate::{accessibility::Accessibility, symbol::Declaration, symbol_kind::SymbolKind};

use super::parsable_language::{node_text, squash, ParsableLanguage};

static RUST_LANGUAGE: OnceCell<Language> = OnceCell::new();

fn grammar() -> &'static Language {
    RUST_LANGUAGE.get_or_init(|| rust_language.into())
}

#[derive(Debug, Clone)]
pub struct RustLanguage {}

impl ParsableLanguage for RustLanguage {
    fn tag(&self) -> &'static str {
        "rust"
    }

    fn parse(&self, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser.set_language(grammar())?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow!("Parse failed"))?;
        Ok(tree)
    }

    fn resolve(&self, node: Node, source: &str) -> Option<Declaration> {
        match node.kind() {
            "function_item" | "function_signature_item" => self.resolve_function(node, source),
            "struct_item" => self.resolve_type(node, source, SymbolKind::Struct),
            "enum_item" => self.resolve_type(node, source, SymbolKind::Enum),
            "union_item" => self.resolve_type(node, source, SymbolKind::Struct),
            "trait_item" => self.resolve_type(node, source, SymbolKind::Trait),
            "mod_item" => self.resolve_module(node, source),
            "const_item" => self.resolve_simple(node, source, SymbolKind::Const),
            "static_item" => self.resolve_simple(node, source, SymbolKind::Static),
            "type_item" | "associated_type" => {
                self.resolve_simple(node, source, SymbolKind::TypeAlias)
            }
            "field_declaration" => self.resolve_simple(node, source, SymbolKind::Field),
            "enum_variant" => self.resolve_simple(node, source, SymbolKind::Variant),
            _ => None,
        }
    }
}

impl RustLanguage {
    fn resolve_function(&self, node: Node, source: &str) -> Option<Declaration> {
        let name_node = node.child_by_field_name("name")?;
        let name = node_text(name_node, source);
        let generics = node
            .child_by_field_name("type_parameters")
            .map(|parameters| squash(node_text(parameters, source)))
            .unwrap_or_default();
        let parameters = node
            .child_by_field_name("parameters")
            .map(|parameters| squash(node_text(parameters, source)))
            .unwrap_or_else(|| "()".to_string());
        let container = container(node, source);
        let kind = if container_is_type(node) {
            SymbolKind::Method
        } else {
            SymbolKind::Function
        };
        let signature = if container.is_empty() {
            format!("{name}{generics}{parameters}")
        } else {
            format!("{container}::{name}{generics}{parameters}")
        };
        Some(Declaration {
            name: name.to_string(),
            kind,
            accessibility: accessibility(node, source),
            container,
            signature,
            line: name_node.start_position().row,
        })
    }

    fn resolve_type(&self, node: Node, source: &str, kind: SymbolKind) -> Option<Declaration> {
        let name_node = node.child_by_field_name("name")?;
        Some(Declaration {
            name: node_text(name_node, source).to_string(),
            kind,
            accessibility: accessibility(node, source),
            container: container(node, source),
            signature: type_name(node, source),
            line: name_node.start_position().row,
        })
    }

    fn resolve_module(&self, node: Node, source: &str) -> Option<Declaration> {
        let name_node = node.child_by_field_name("name")?;
        let name = node_text(name_node, source);
        let container = module_chain(node, source);
        let signature = if container.is_empty() {
            name.to_string()
        } else {
            format!("{container}::{name}")
        };
        Some(Declaration {
            name: name.to_string(),
            kind: SymbolKind::Module,
            accessibility: accessibility(node, source),
            container,
            signature,
            line: name_node.start_position().row,
        })
    }

    fn resolve_simple(&self, node: Node, source: &str, kind: SymbolKind) -> Option<Declaration> {
        let name_node = node.child_by_field_name("name")?;
        let name = node_text(name_node, source);
        let container = container(node, source);
        let signature = if container.is_empty() {
            name.to_string()
        } else {
            format!("{container}::{name}")
        };
        Some(Declaration {
            name: name.to_string(),
            kind,
            accessibility: accessibility(node, source),
            container,
            signature,
            line: name_node.start_position().row,
        })
    }
}

/// Accessibility of an item from its `pub` modifier. Bare `pub` is public;
/// `pub(crate)`, `pub(super)` and `pub(in …)` are internal. Items with no
/// modifier are private, except where the language implies visibility: trait
/// items, trait-impl items and enum variants.
fn accessibility(node: Node, source: &str) -> Accessibility {
    for child in node.children(&mut node.walk()) {
        if child.kind() == "visibility_modifier" {
            let text = node_text(child, source);
            return if text == "pub" {
                Accessibility::Public
            } else {
                Accessibility::Internal
            };
        }
    }
    default_accessibility(node)
}

fn default_accessibility(node: Node) -> Accessibility {
    if node.kind() == "enum_variant" {
        return Accessibility::Public;
    }
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "trait_item" | "enum_variant" => return Accessibility::Public,
            "impl_item" => {
                // Methods of a trait impl are reachable through the trait.
                return if parent.child_by_field_name("trait").is_some() {
                    Accessibility::Public
                } else {
                    Accessibility::Private
                };
            }
            "struct_item" | "enum_item" | "union_item" | "mod_item" | "source_file" => {
                return Accessibility::Private
            }
            _ => {}
        }
        current = parent.parent();
    }
    Accessibility::Private
}

fn container_is_type(node: Node) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "impl_item" | "trait_item" => return true,
            "mod_item" | "source_file" => return false,
            _ => {}
        }
        current = parent.parent();
    }
    false
}

/// Container of an item: the implemented or declaring type if there is one,
/// else the enclosing module chain, else empty.
fn container(node: Node, source: &str) -> String {
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            "impl_item" => {
                if let Some(target) = parent.child_by_field_name("type") {
                    return squash(node_text(target, source));
                }
            }
            "trait_item" | "struct_item" | "enum_item" | "union_item" => {
                return type_name(parent, source);
            }
            _ => {}
        }
        current = parent.parent();
    }
    module_chain(node, source)
}

fn type_name(node: Node, source: &str) -> String {
    let name = node
        .child_by_field_name("name")
        .map(|name| node_text(name, source))
        .unwrap_or("<unknown>");
    let generics = node
        .child_by_field_name("type_parameters")
        .map(|parameters| squash(node_text(parameters, source)))
        .unwrap_or_default();
    format!("{name}{generics}")
}

fn module_chain(node: Node, source: &str) -> String {
    let mut parts = Vec::new();
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == "mod_item" {
            if let Some(name) = parent.child_by_field_name("name") {
                parts.push(node_text(name, source).to_string());
            }
        }
        current = parent.parent();
    }
    parts.reverse();
    parts.join("::")
}

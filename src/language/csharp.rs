use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use tree_sitter::{Language, Node, Parser, Tree};

use crate::{accessibility::Accessibility, symbol::Declaration, symbol_kind::SymbolKind};

use super::parsable_language::{node_text, squash, ParsableLanguage};

static CSHARP_LANGUAGE: OnceCell<Language> = OnceCell::new();

fn grammar() -> &'static Language {
    CSHARP_LANGUAGE.get_or_init(|| tree_sitter_c_sharp::LANGUAGE.into())
}

#[derive(Debug, Clone)]
pub struct CSharpLanguage {}

impl ParsableLanguage for CSharpLanguage {
    fn tag(&self) -> &'static str {
        "csharp"
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
            "namespace_declaration" | "file_scoped_namespace_declaration" => {
                self.resolve_namespace(node, source)
            }
            "class_declaration" => self.resolve_type(node, source, SymbolKind::Class),
            "interface_declaration" => self.resolve_type(node, source, SymbolKind::Interface),
            "struct_declaration" => self.resolve_type(node, source, SymbolKind::Struct),
            "enum_declaration" => self.resolve_type(node, source, SymbolKind::Enum),
            "record_declaration" | "record_struct_declaration" => {
                self.resolve_type(node, source, SymbolKind::Record)
            }
            "delegate_declaration" => self.resolve_type(node, source, SymbolKind::Delegate),
            "method_declaration" => self.resolve_callable(node, source, SymbolKind::Method),
            "constructor_declaration" => {
                self.resolve_callable(node, source, SymbolKind::Constructor)
            }
            "property_declaration" => self.resolve_member(node, source, SymbolKind::Property),
            "event_declaration" => self.resolve_member(node, source, SymbolKind::Event),
            "variable_declarator" => self.resolve_declarator(node, source),
            "enum_member_declaration" => self.resolve_enum_member(node, source),
            _ => None,
        }
    }
}

impl CSharpLanguage {
    fn resolve_namespace(&self, node: Node, source: &str) -> Option<Declaration> {
        let name_node = node.child_by_field_name("name")?;
        let full_name = node_text(name_node, source);
        let simple = full_name.rsplit('.').next().unwrap_or(full_name);
        let container = namespace_chain(node, source);
        let signature = if container.is_empty() {
            full_name.to_string()
        } else {
            format!("{container}.{full_name}")
        };
        Some(Declaration {
            name: simple.to_string(),
            kind: SymbolKind::Namespace,
            accessibility: Accessibility::Public,
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
            signature: type_display(node, source),
            line: name_node.start_position().row,
        })
    }

    fn resolve_callable(&self, node: Node, source: &str, kind: SymbolKind) -> Option<Declaration> {
        let name_node = node.child_by_field_name("name")?;
        let name = node_text(name_node, source);
        let generics = type_parameters(node, source).unwrap_or_default();
        let parameters = node
            .child_by_field_name("parameters")
            .map(|parameters| squash(node_text(parameters, source)))
            .unwrap_or_else(|| "()".to_string());
        let container = container(node, source);
        let signature = if container.is_empty() {
            format!("{name}{generics}{parameters}")
        } else {
            format!("{container}.{name}{generics}{parameters}")
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

    fn resolve_member(&self, node: Node, source: &str, kind: SymbolKind) -> Option<Declaration> {
        let name_node = node.child_by_field_name("name")?;
        let name = node_text(name_node, source);
        let container = container(node, source);
        Some(Declaration {
            name: name.to_string(),
            kind,
            accessibility: accessibility(node, source),
            container: container.clone(),
            signature: member_signature(&container, name),
            line: name_node.start_position().row,
        })
    }

    // A declarator only declares a member when it sits under a field or
    // field-like event declaration; local variables resolve to nothing.
    fn resolve_declarator(&self, node: Node, source: &str) -> Option<Declaration> {
        let owner = ancestor_of_kind(node, &["field_declaration", "event_field_declaration"])?;
        let kind = if owner.kind() == "event_field_declaration" {
            SymbolKind::Event
        } else {
            SymbolKind::Field
        };
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| first_child_of_kind(node, "identifier"))?;
        let name = node_text(name_node, source);
        let container = container(node, source);
        Some(Declaration {
            name: name.to_string(),
            kind,
            accessibility: accessibility(owner, source),
            container: container.clone(),
            signature: member_signature(&container, name),
            line: name_node.start_position().row,
        })
    }

    fn resolve_enum_member(&self, node: Node, source: &str) -> Option<Declaration> {
        let name_node = node.child_by_field_name("name")?;
        let name = node_text(name_node, source);
        let container = container(node, source);
        Some(Declaration {
            name: name.to_string(),
            kind: SymbolKind::Field,
            accessibility: Accessibility::Public,
            container: container.clone(),
            signature: member_signature(&container, name),
            line: name_node.start_position().row,
        })
    }
}

fn member_signature(container: &str, name: &str) -> String {
    if container.is_empty() {
        name.to_string()
    } else {
        format!("{container}.{name}")
    }
}

fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "struct_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "record_struct_declaration"
            | "delegate_declaration"
    )
}

/// Accessibility from the declaration's modifiers, with the dialect defaults
/// when no accessibility modifier is written.
fn accessibility(node: Node, source: &str) -> Accessibility {
    let mut public = false;
    let mut internal = false;
    let mut protected = false;
    let mut private = false;
    for child in node.children(&mut node.walk()) {
        let text = node_text(child, source);
        if child.kind() != "modifier"
            && !matches!(text, "public" | "internal" | "protected" | "private")
        {
            continue;
        }
        match text {
            "public" => public = true,
            "internal" => internal = true,
            "protected" => protected = true,
            "private" => private = true,
            _ => {}
        }
    }
    if public {
        Accessibility::Public
    } else if protected && internal {
        Accessibility::ProtectedInternal
    } else if protected && private {
        Accessibility::PrivateProtected
    } else if protected {
        Accessibility::Protected
    } else if internal {
        Accessibility::Internal
    } else if private {
        Accessibility::Private
    } else {
        default_accessibility(node)
    }
}

// Defaults: interface members are public, top-level types are internal,
// everything else is private.
fn default_accessibility(node: Node) -> Accessibility {
    if let Some(owner) = enclosing_type(node) {
        if owner.kind() == "interface_declaration" {
            return Accessibility::Public;
        }
        return Accessibility::Private;
    }
    if is_type_declaration(node.kind()) {
        return Accessibility::Internal;
    }
    Accessibility::Private
}

fn enclosing_type(node: Node) -> Option<Node> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if is_type_declaration(parent.kind()) && parent.kind() != "delegate_declaration" {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

/// Container of a declaration: the enclosing type's display name if there is
/// one, else the enclosing namespace chain, else empty.
fn container(node: Node, source: &str) -> String {
    match enclosing_type(node) {
        Some(owner) => type_display(owner, source),
        None => namespace_chain(node, source),
    }
}

/// Display name of a type declaration: its name plus type parameters,
/// prefixed by every enclosing type, namespaces excluded.
fn type_display(node: Node, source: &str) -> String {
    let mut parts = vec![type_name(node, source)];
    let mut current = node.parent();
    while let Some(parent) = current {
        if is_type_declaration(parent.kind()) {
            parts.push(type_name(parent, source));
        }
        current = parent.parent();
    }
    parts.reverse();
    parts.join(".")
}

fn type_name(node: Node, source: &str) -> String {
    let name = node
        .child_by_field_name("name")
        .map(|name| node_text(name, source))
        .unwrap_or("<unknown>");
    format!("{name}{}", type_parameters(node, source).unwrap_or_default())
}

fn type_parameters(node: Node, source: &str) -> Option<String> {
    let parameters = node
        .child_by_field_name("type_parameters")
        .or_else(|| first_child_of_kind(node, "type_parameter_list"))?;
    Some(squash(node_text(parameters, source)))
}

fn namespace_chain(node: Node, source: &str) -> String {
    let mut parts = Vec::new();
    let mut current = node.parent();
    while let Some(parent) = current {
        if matches!(
            parent.kind(),
            "namespace_declaration" | "file_scoped_namespace_declaration"
        ) {
            if let Some(name) = parent.child_by_field_name("name") {
                parts.push(node_text(name, source).to_string());
            }
        }
        current = parent.parent();
    }
    parts.reverse();
    parts.join(".")
}

fn ancestor_of_kind<'a>(node: Node<'a>, kinds: &[&str]) -> Option<Node<'a>> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if kinds.contains(&parent.kind()) {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

fn first_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    node.children(&mut node.walk())
        .find(|child| child.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declarations(source: &str) -> Vec<Declaration> {
        let language = CSharpLanguage {};
        let tree = language.parse(source).unwrap();
        let mut found = Vec::new();
        collect(tree.root_node(), source, &language, &mut found);
        found
    }

    fn collect(node: Node, source: &str, language: &CSharpLanguage, found: &mut Vec<Declaration>) {
        if let Some(declaration) = language.resolve(node, source) {
            found.push(declaration);
        }
        for child in node.children(&mut node.walk()) {
            collect(child, source, language, found);
        }
    }

    fn public_names(source: &str) -> Vec<String> {
        declarations(source)
            .into_iter()
            .filter(|declaration| declaration.accessibility.is_public())
            .map(|declaration| declaration.name)
            .collect()
    }

    #[test]
    fn public_class_method_and_private_field() {
        let source = "namespace Lib\n{\n    public class Widget\n    {\n        public void Run(int count) { }\n        private int _x;\n    }\n}\n";
        let found = declarations(source);
        assert_eq!(public_names(source), vec!["Lib", "Widget", "Run"]);
        let run = found
            .iter()
            .find(|declaration| declaration.name == "Run")
            .unwrap();
        assert_eq!(run.kind, SymbolKind::Method);
        assert_eq!(run.container, "Widget");
        assert_eq!(run.signature, "Widget.Run(int count)");
        assert_eq!(run.line, 4);
        let field = found
            .iter()
            .find(|declaration| declaration.name == "_x")
            .unwrap();
        assert_eq!(field.kind, SymbolKind::Field);
        assert_eq!(field.accessibility, Accessibility::Private);
    }

    #[test]
    fn interface_members_default_to_public() {
        let source = "public interface IWidget\n{\n    void Run();\n}\n";
        assert_eq!(public_names(source), vec!["IWidget", "Run"]);
    }

    #[test]
    fn top_level_type_defaults_to_internal() {
        let source = "class Helper { }\n";
        let found = declarations(source);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].accessibility, Accessibility::Internal);
    }

    #[test]
    fn nested_members_default_to_private() {
        let source = "public class Widget\n{\n    void Run() { }\n    class Helper { }\n}\n";
        assert_eq!(public_names(source), vec!["Widget"]);
    }

    #[test]
    fn nested_type_display_includes_the_outer_type() {
        let source =
            "public class Outer\n{\n    public class Inner\n    {\n        public void Run() { }\n    }\n}\n";
        let found = declarations(source);
        let inner = found
            .iter()
            .find(|declaration| declaration.name == "Inner")
            .unwrap();
        assert_eq!(inner.container, "Outer");
        assert_eq!(inner.signature, "Outer.Inner");
        let run = found
            .iter()
            .find(|declaration| declaration.name == "Run")
            .unwrap();
        assert_eq!(run.container, "Outer.Inner");
        assert_eq!(run.signature, "Outer.Inner.Run()");
    }

    #[test]
    fn namespaces_qualify_types_but_not_signatures() {
        let source = "namespace Lib.Core\n{\n    public class Widget { }\n}\n";
        let found = declarations(source);
        let namespace = found
            .iter()
            .find(|declaration| declaration.kind == SymbolKind::Namespace)
            .unwrap();
        assert_eq!(namespace.name, "Core");
        assert_eq!(namespace.signature, "Lib.Core");
        let widget = found
            .iter()
            .find(|declaration| declaration.name == "Widget")
            .unwrap();
        assert_eq!(widget.container, "Lib.Core");
        assert_eq!(widget.signature, "Widget");
    }

    #[test]
    fn enum_members_are_public_fields() {
        let source = "public enum Color\n{\n    Red,\n    Green,\n}\n";
        let found = declarations(source);
        let red = found
            .iter()
            .find(|declaration| declaration.name == "Red")
            .unwrap();
        assert_eq!(red.kind, SymbolKind::Field);
        assert!(red.accessibility.is_public());
        assert_eq!(red.signature, "Color.Red");
    }

    #[test]
    fn one_declaration_per_field_declarator() {
        let source = "public class Counter\n{\n    public int a, b;\n}\n";
        assert_eq!(public_names(source), vec!["Counter", "a", "b"]);
    }

    #[test]
    fn properties_and_generics() {
        let source =
            "public class Box<T>\n{\n    public T Value { get; set; }\n    public T Map<U>(U seed) { return default; }\n}\n";
        let found = declarations(source);
        let value = found
            .iter()
            .find(|declaration| declaration.name == "Value")
            .unwrap();
        assert_eq!(value.kind, SymbolKind::Property);
        assert_eq!(value.signature, "Box<T>.Value");
        let map = found
            .iter()
            .find(|declaration| declaration.name == "Map")
            .unwrap();
        assert_eq!(map.signature, "Box<T>.Map<U>(U seed)");
    }

    #[test]
    fn local_variables_resolve_to_nothing() {
        let source = "public class Widget\n{\n    public void Run()\n    {\n        int local = 3;\n    }\n}\n";
        let found = declarations(source);
        assert!(found.iter().all(|declaration| declaration.name != "local"));
    }

    #[test]
    fn constructors_resolve_with_parameters() {
        let source = "public class Widget\n{\n    public Widget(int seed) { }\n}\n";
        let found = declarations(source);
        let constructor = found
            .iter()
            .find(|declaration| declaration.kind == SymbolKind::Constructor)
            .unwrap();
        assert_eq!(constructor.name, "Widget");
        assert_eq!(constructor.signature, "Widget.Widget(int seed)");
    }
}

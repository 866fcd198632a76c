use anyhow::Result;
use tree_sitter::{Node, Tree};

use crate::symbol::Declaration;

/// Trait for a supported language.
pub trait ParsableLanguage {
    /// Tag identifying the dialect in emitted records.
    ///
    /// ## Returns:
    /// * (`&'static str`): Lower-cased dialect tag.
    fn tag(&self) -> &'static str;

    /// Parse a file as a `tree_sitter::Tree`.
    ///
    /// ## Parameters:
    /// * `source` (`&str`): Content of the file.
    ///
    /// ## Returns:
    /// * (`Result<tree_sitter::Tree>`): Given file parsed by tree-sitter.
    fn parse(&self, source: &str) -> Result<Tree>;

    /// Resolve a syntax node to the declaration it introduces, if any.
    ///
    /// Nodes that do not themselves declare a named symbol (expressions,
    /// statements, punctuation) resolve to `None`; that is the expected
    /// outcome for most nodes of a tree, not a failure.
    ///
    /// ## Parameters:
    /// * `node` (`tree_sitter::Node`): Node of a file parsed by tree-sitter,
    /// * `source` (`&str`): Content of the current file.
    ///
    /// ## Returns:
    /// * (`Option<symbol::Declaration>`): The declared symbol, if the node
    /// introduces one.
    fn resolve(&self, node: Node, source: &str) -> Option<Declaration>;
}

/// Collapse runs of whitespace in a display fragment to single spaces.
pub(crate) fn squash(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of a node; invalid byte ranges render as a placeholder.
pub(crate) fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("<unknown>")
}

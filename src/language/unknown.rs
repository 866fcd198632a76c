use anyhow::{bail, Result};
use tree_sitter::{Node, Tree};

use crate::symbol::Declaration;

use super::parsable_language::ParsableLanguage;

#[derive(Debug, Clone)]
pub struct UnknownLanguage {}

impl ParsableLanguage for UnknownLanguage {
    fn tag(&self) -> &'static str {
        "unknown"
    }

    fn parse(&self, _source: &str) -> Result<Tree> {
        bail!("Unknown language")
    }

    fn resolve(&self, _node: Node, _source: &str) -> Option<Declaration> {
        None
    }
}

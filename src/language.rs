use anyhow::Result;
use csharp::CSharpLanguage;
use rust::RustLanguage;
use tree_sitter::{Node, Tree};
use unknown::UnknownLanguage;

use crate::symbol::Declaration;

pub mod parsable_language;

mod csharp;
mod rust;
mod unknown;

use parsable_language::ParsableLanguage;

#[derive(Debug, Clone)]
pub enum Languages {
    CSharp(CSharpLanguage),
    Rust(RustLanguage),
    Unknown(UnknownLanguage),
}

impl ParsableLanguage for Languages {
    fn tag(&self) -> &'static str {
        match &self {
            Languages::CSharp(language) => language.tag(),
            Languages::Rust(language) => language.tag(),
            Languages::Unknown(language) => language.tag(),
        }
    }

    fn parse(&self, source: &str) -> Result<Tree> {
        match &self {
            Languages::CSharp(language) => language.parse(source),
            Languages::Rust(language) => language.parse(source),
            Languages::Unknown(language) => language.parse(source),
        }
    }

    fn resolve(&self, node: Node, source: &str) -> Option<Declaration> {
        match &self {
            Languages::CSharp(language) => language.resolve(node, source),
            Languages::Rust(language) => language.resolve(node, source),
            Languages::Unknown(language) => language.resolve(node, source),
        }
    }
}

/// Find the dialect of a file from its extension, case-insensitively.
///
/// ## Parameters:
/// * `name` (`&str`): Name or path of the file.
///
/// ## Returns:
/// * (`Languages`): Dialect of the file, `Unknown` when unsupported.
pub fn get_language_for_file(name: &str) -> Languages {
    match name
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase())
        .as_deref()
    {
        Some("cs") => Languages::CSharp(CSharpLanguage {}),
        Some("rs") => Languages::Rust(RustLanguage {}),
        _ => Languages::Unknown(UnknownLanguage {}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_map_to_dialects() {
        assert!(matches!(
            get_language_for_file("Lib/Widget.cs"),
            Languages::CSharp(_)
        ));
        assert!(matches!(
            get_language_for_file("src/lib.rs"),
            Languages::Rust(_)
        ));
        assert!(matches!(
            get_language_for_file("Widget.CS"),
            Languages::CSharp(_)
        ));
        assert!(matches!(
            get_language_for_file("notes.txt"),
            Languages::Unknown(_)
        ));
        assert!(matches!(
            get_language_for_file("Makefile"),
            Languages::Unknown(_)
        ));
    }
}

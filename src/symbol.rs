use serde::Serialize;
use surface_scanner_derive::TestBuilder;

use crate::{accessibility::Accessibility, symbol_kind::SymbolKind};

#[derive(Debug, Clone, Serialize, TestBuilder)]
#[serde(rename_all = "camelCase")]
/// One publicly-visible declaration found in a changed file, ready to be
/// serialized as a single JSON line.
///
/// ## Properties:
/// * `language` (`String`): Tag of the dialect that produced the symbol,
/// * `kind` (`symbol_kind::SymbolKind`): Kind of symbol (eg. method),
/// * `name` (`String`): Simple identifier of the symbol,
/// * `container` (`String`): Minimally-qualified name of the enclosing type,
/// else the enclosing namespace or module, else empty,
/// * `signature` (`String`): Minimally-qualified display string of the symbol,
/// * `file` (`String`): Forward-slash path of the declaring file,
/// * `line` (`usize`): Zero-based line of the symbol's name,
/// * `project` (`String`): Name of the owning project,
/// * `assembly` (`String`): Output assembly or module identifier of the
/// owning project,
/// * `public_surface` (`bool`): Always true for emitted records.
pub struct SymbolRecord {
    /// Tag of the dialect that produced the symbol.
    pub language: String,
    #[builder(default = SymbolKind::Class)]
    /// Kind of symbol (eg. method).
    pub kind: SymbolKind,
    /// Simple identifier of the symbol.
    pub name: String,
    /// Minimally-qualified name of the enclosing type, else the enclosing
    /// namespace or module, else empty.
    pub container: String,
    /// Minimally-qualified display string of the symbol.
    pub signature: String,
    /// Forward-slash path of the declaring file.
    pub file: String,
    /// Zero-based line of the symbol's name.
    pub line: usize,
    /// Name of the owning project.
    pub project: String,
    /// Output assembly or module identifier of the owning project.
    pub assembly: String,
    #[builder(default = true)]
    /// Always true for emitted records.
    pub public_surface: bool,
}

#[derive(Debug, Clone)]
/// Resolution result for one declaration node.
///
/// ## Properties:
/// * `name` (`String`): Simple identifier of the symbol,
/// * `kind` (`symbol_kind::SymbolKind`): Kind of symbol (eg. method),
/// * `accessibility` (`accessibility::Accessibility`): Declared accessibility,
/// * `container` (`String`): Enclosing type, namespace or module, else empty,
/// * `signature` (`String`): Minimally-qualified display string,
/// * `line` (`usize`): Zero-based line of the symbol's name.
pub struct Declaration {
    /// Simple identifier of the symbol.
    pub name: String,
    /// Kind of symbol (eg. method).
    pub kind: SymbolKind,
    /// Declared accessibility.
    pub accessibility: Accessibility,
    /// Enclosing type, namespace or module, else empty.
    pub container: String,
    /// Minimally-qualified display string.
    pub signature: String,
    /// Zero-based line of the symbol's name.
    pub line: usize,
}

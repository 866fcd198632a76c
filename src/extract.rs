use anyhow::Result;
use tracing::debug;
use tree_sitter::Node;

use crate::{
    changed::ChangedFileSet,
    language::parsable_language::ParsableLanguage,
    symbol::SymbolRecord,
    workspace::CompilationUnit,
};

/// Get the records for every public declaration of a compilation unit that
/// belongs to the changed set.
///
/// Units that do not match the set are skipped before any read or parse
/// happens, so unaffected files cost nothing. Within a matched unit every
/// node is visited pre-order; nodes that resolve to no declaration and
/// declarations that are not public are silently dropped.
///
/// ## Parameters:
/// * `unit` (`&workspace::CompilationUnit`): Unit to extract from,
/// * `changed` (`&changed::ChangedFileSet`): Set of changed source paths.
///
/// ## Returns:
/// * (`Result<Vec<symbol::SymbolRecord>>`): Records for the unit, empty when
/// the unit is not part of the changed set. Will fail if the unit cannot be
/// read or parsed.
pub fn public_symbols(
    unit: &CompilationUnit,
    changed: &ChangedFileSet,
) -> Result<Vec<SymbolRecord>> {
    if !changed.matches(&unit.path) {
        return Ok(Vec::new());
    }
    debug!("extracting public surface of {}", unit.path);
    let (source, tree) = unit.parse()?;
    let mut records = Vec::new();
    walk_tree(tree.root_node(), unit, &source, &mut records);
    Ok(records)
}

fn walk_tree(node: Node, unit: &CompilationUnit, source: &str, records: &mut Vec<SymbolRecord>) {
    if let Some(declaration) = unit.language.resolve(node, source) {
        if declaration.accessibility.is_public() {
            records.push(SymbolRecord {
                language: unit.language.tag().to_string(),
                kind: declaration.kind,
                name: declaration.name,
                container: declaration.container,
                signature: declaration.signature,
                file: unit.path.clone(),
                line: declaration.line,
                project: unit.project.clone(),
                assembly: unit.assembly.clone(),
                public_surface: true,
            });
        }
    }
    for child in node.children(&mut node.walk()) {
        walk_tree(child, unit, source, records);
    }
}

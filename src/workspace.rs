use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use tracing::debug;
use tree_sitter::Tree;
use walkdir::{DirEntry, WalkDir};

use crate::{
    changed::normalize_separators,
    language::{get_language_for_file, parsable_language::ParsableLanguage, Languages},
};

/// One source file of the workspace, together with its owning build unit.
///
/// ## Properties:
/// * `path` (`String`): Forward-slash path relative to the workspace root,
/// * `disk_path` (`std::path::PathBuf`): Location of the file on disk,
/// * `project` (`String`): Name of the owning project,
/// * `assembly` (`String`): Output assembly or module identifier,
/// * `language` (`language::Languages`): Dialect of the file.
#[derive(Debug)]
pub struct CompilationUnit {
    /// Forward-slash path relative to the workspace root.
    pub path: String,
    /// Location of the file on disk.
    pub disk_path: PathBuf,
    /// Name of the owning project.
    pub project: String,
    /// Output assembly or module identifier.
    pub assembly: String,
    /// Dialect of the file.
    pub language: Languages,
}

impl CompilationUnit {
    /// Read and parse the unit. Only called for units that matched the
    /// changed set, so unaffected files are never read from disk.
    ///
    /// ## Returns:
    /// * (`Result<(String, tree_sitter::Tree)>`): Source text and syntax tree.
    pub fn parse(&self) -> Result<(String, Tree)> {
        let source = fs::read_to_string(&self.disk_path)
            .with_context(|| format!("reading {}", self.path))?;
        let tree = self.language.parse(&source)?;
        Ok((source, tree))
    }
}

/// The set of compilation units discovered under a project root.
#[derive(Debug)]
pub struct Workspace {
    units: Vec<CompilationUnit>,
}

impl Workspace {
    /// Discover the compilation units of the tree rooted at `root`.
    ///
    /// Fails when the root does not exist; that is a startup error for the
    /// whole run. Walks deterministically, skips hidden directories and the
    /// usual build-output directories, and resolves each unit's owning build
    /// unit from the nearest project manifest.
    ///
    /// ## Parameters:
    /// * `root` (`&std::path::Path`): Root of the tree to analyze.
    ///
    /// ## Returns:
    /// * (`Result<Workspace>`): Discovered units, in a stable order.
    pub fn load(root: &Path) -> Result<Workspace> {
        if !root.exists() {
            bail!("Project root not found: {}", root.display());
        }
        let mut cache: HashMap<PathBuf, (String, String)> = HashMap::new();
        let mut units = Vec::new();
        for entry in WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_excluded(entry))
            .filter_map(Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let language = get_language_for_file(&entry.file_name().to_string_lossy());
            if matches!(language, Languages::Unknown(_)) {
                continue;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let (project, assembly) = match entry.path().parent() {
                Some(directory) => owning_project(directory, root, &mut cache),
                None => root_fallback(root),
            };
            units.push(CompilationUnit {
                path: normalize_separators(&relative.to_string_lossy()),
                disk_path: entry.path().to_path_buf(),
                project,
                assembly,
                language,
            });
        }
        debug!("discovered {} compilation units", units.len());
        Ok(Workspace { units })
    }

    /// Units in discovery order, one at a time.
    pub fn units(&self) -> impl Iterator<Item = &CompilationUnit> {
        self.units.iter()
    }
}

fn is_excluded(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || (entry.file_type().is_dir() && matches!(name.as_ref(), "target" | "bin" | "obj"))
}

/// Resolve the build unit owning `directory` by scanning it and its
/// ancestors, up to the workspace root, for the nearest project manifest.
/// Lookups are cached per directory.
fn owning_project(
    directory: &Path,
    root: &Path,
    cache: &mut HashMap<PathBuf, (String, String)>,
) -> (String, String) {
    let mut visited = Vec::new();
    let mut found = None;
    let mut current = Some(directory);
    while let Some(candidate) = current {
        if let Some(hit) = cache.get(candidate) {
            found = Some(hit.clone());
            break;
        }
        visited.push(candidate.to_path_buf());
        if let Some(manifest) = manifest_in(candidate) {
            found = Some(manifest);
            break;
        }
        if candidate == root {
            break;
        }
        current = candidate.parent().filter(|parent| parent.starts_with(root));
    }
    let resolved = found.unwrap_or_else(|| root_fallback(root));
    for directory in visited {
        cache.insert(directory, resolved.clone());
    }
    resolved
}

// Without any manifest the root directory's name stands in for both
// identifiers.
fn root_fallback(root: &Path) -> (String, String) {
    let name = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    (name.clone(), name)
}

/// A `*.csproj` names a .NET project (project and assembly take the file
/// stem); a `Cargo.toml` names a Rust package (the module identifier is the
/// crate name, dashes mapped to underscores).
fn manifest_in(directory: &Path) -> Option<(String, String)> {
    let mut csprojs: Vec<PathBuf> = fs::read_dir(directory)
        .ok()?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|ext| ext == "csproj").unwrap_or(false))
        .collect();
    csprojs.sort();
    if let Some(path) = csprojs.first() {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Some((stem.clone(), stem));
    }
    let cargo = directory.join("Cargo.toml");
    if cargo.exists() {
        if let Some(name) = cargo_package_name(&cargo) {
            let module = name.replace('-', "_");
            return Some((name, module));
        }
    }
    None
}

fn cargo_package_name(manifest: &Path) -> Option<String> {
    let content = fs::read_to_string(manifest).ok()?;
    let doc: toml::Value = content.parse().ok()?;
    doc.get("package")?
        .get("name")?
        .as_str()
        .map(|name| name.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    #[test]
    fn missing_root_is_a_startup_error() {
        let error = Workspace::load(Path::new("/no/such/workspace")).unwrap_err();
        assert!(error.to_string().contains("/no/such/workspace"));
    }

    #[test]
    fn csproj_names_the_build_unit() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "Lib/Lib.csproj", "<Project />");
        write(temp.path(), "Lib/Widget.cs", "public class Widget { }");
        let workspace = Workspace::load(temp.path()).unwrap();
        let unit = workspace.units().next().unwrap();
        assert_eq!(unit.path, "Lib/Widget.cs");
        assert_eq!(unit.project, "Lib");
        assert_eq!(unit.assembly, "Lib");
    }

    #[test]
    fn cargo_manifest_names_the_module() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "Cargo.toml",
            "[package]\nname = \"demo-crate\"\nversion = \"0.1.0\"\n",
        );
        write(temp.path(), "src/lib.rs", "pub fn run() {}");
        let workspace = Workspace::load(temp.path()).unwrap();
        let unit = workspace.units().next().unwrap();
        assert_eq!(unit.project, "demo-crate");
        assert_eq!(unit.assembly, "demo_crate");
    }

    #[test]
    fn without_manifest_the_root_name_stands_in() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "Widget.cs", "public class Widget { }");
        let workspace = Workspace::load(temp.path()).unwrap();
        let unit = workspace.units().next().unwrap();
        let root_name = temp.path().file_name().unwrap().to_string_lossy();
        assert_eq!(unit.project, root_name.as_ref());
    }

    #[test]
    fn build_output_and_hidden_directories_are_skipped() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "src/lib.rs", "pub fn run() {}");
        write(temp.path(), "target/debug/lib.rs", "pub fn stale() {}");
        write(temp.path(), ".git/lib.rs", "pub fn tracked() {}");
        write(temp.path(), "notes.txt", "not source");
        let workspace = Workspace::load(temp.path()).unwrap();
        let paths: Vec<&str> = workspace.units().map(|unit| unit.path.as_str()).collect();
        assert_eq!(paths, vec!["src/lib.rs"]);
    }

    #[test]
    fn discovery_order_is_stable() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "b/Second.cs", "public class Second { }");
        write(temp.path(), "a/First.cs", "public class First { }");
        let workspace = Workspace::load(temp.path()).unwrap();
        let paths: Vec<&str> = workspace.units().map(|unit| unit.path.as_str()).collect();
        assert_eq!(paths, vec!["a/First.cs", "b/Second.cs"]);
    }
}

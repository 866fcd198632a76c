use anyhow::Result;
use git2::{DiffOptions, Repository};
use std::path::Path;

/// List the repository-relative paths touched by the staged changes of the
/// repository at `root`, in the shape a `git diff --name-only` command would
/// print them.
///
/// ## Parameters:
/// * `root` (`&std::path::Path`): Path to the repository to diff.
///
/// ## Returns:
/// * (`Result<Vec<String>>`): One path per staged file.
pub fn staged_files(root: &Path) -> Result<Vec<String>> {
    let repo = Repository::open(root)?;
    let index = repo.index()?;
    let head = repo.head()?.peel_to_tree()?;
    let diff = repo.diff_tree_to_index(Some(&head), Some(&index), Some(&mut DiffOptions::new()))?;

    let mut result = Vec::new();
    diff.foreach(
        &mut |delta, _progress| {
            let path = delta
                .new_file()
                .path()
                .and_then(|p| p.to_str())
                .unwrap_or("<unknown>")
                .to_string();
            result.push(path);
            true
        },
        None,
        None,
        None,
    )?;
    Ok(result)
}

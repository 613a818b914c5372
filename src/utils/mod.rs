mod hash;

pub use hash::{compute_file_hash, compute_hash};

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Project configuration file, relative to the project root
pub const PROJECT_FILE: &str = "sfdx-project.json";

/// Package directory used when the project declares none
pub const DEFAULT_PACKAGE_DIR: &str = "force-app";

/// Resolve a project-relative record path to an absolute path
pub fn resolve_project_path(project_root: &Path, relative: &str) -> PathBuf {
    project_root.join(relative)
}

/// Render a path relative to the project root with `/` separators.
/// Paths outside the root are rendered as they are.
pub fn to_project_relative(project_root: &Path, path: &Path) -> String {
    let Ok(relative) = path.strip_prefix(project_root) else {
        return path.display().to_string();
    };
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Locale-style name ordering: case-insensitive first, lowercase before
/// uppercase when names differ only by case.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

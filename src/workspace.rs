use std::io;
use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::git::{Branch, GitContext};

/// Directory operations needed to establish a workspace
pub trait WorkspaceFs {
    fn is_dir(&self, path: &Path) -> bool;
    /// Create `path` and its parents; succeed if it already exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// WorkspaceFs on the local disk
pub struct LocalFs;

impl WorkspaceFs for LocalFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Resolved scratch location for one (repository, branch) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLocator {
    pub base_dir: PathBuf,
    pub branch_subdir: PathBuf,
}

/// Pick the workspace base directory, highest priority first:
/// 1. the override from the environment
/// 2. an existing repo-local workspace directory
/// 3. `<workspace_root>/<repo name>`
pub fn locate(
    ctx: &GitContext,
    cwd: &Path,
    settings: &Settings,
    fs: &dyn WorkspaceFs,
) -> WorkspaceLocator {
    let base_dir = if let Some(dir) = &settings.workspace_override {
        // join() keeps absolute overrides as-is
        cwd.join(dir)
    } else {
        let local = ctx.repo_root.join(&settings.repo_local_dir);
        if fs.is_dir(&local) {
            local
        } else {
            settings.workspace_root.join(ctx.repo_name())
        }
    };

    let branch = match &ctx.branch {
        Branch::Named(name) => name.as_str(),
        Branch::Detached => settings.detached_branch.as_str(),
    };

    WorkspaceLocator {
        branch_subdir: base_dir.join(branch),
        base_dir,
    }
}

/// Locate the workspace and make sure its directory exists.
pub fn resolve(
    ctx: &GitContext,
    cwd: &Path,
    settings: &Settings,
    fs: &dyn WorkspaceFs,
) -> (WorkspaceLocator, io::Result<()>) {
    let locator = locate(ctx, cwd, settings, fs);
    let created = fs.create_dir_all(&locator.branch_subdir);
    (locator, created)
}

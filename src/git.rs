use std::path::{Path, PathBuf};
use std::process::Command;

/// Currently checked-out branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    Named(String),
    /// HEAD points at a commit, not a branch, or the branch has no commits yet
    Detached,
}

/// Where the cwd sits inside a git working tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitContext {
    pub repo_root: PathBuf,
    pub branch: Branch,
}

impl GitContext {
    /// Final component of the repository root, used to namespace workspaces.
    pub fn repo_name(&self) -> String {
        self.repo_root
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "repo".to_string())
    }
}

/// Read-only access to git state for a directory
pub trait GitRepo {
    /// Returns None if `cwd` is not inside a working tree.
    fn context(&self, cwd: &Path) -> Option<GitContext>;

    /// Value of a git config key as seen from `cwd`, if set.
    fn config(&self, cwd: &Path, key: &str) -> Option<String>;
}

/// GitRepo backed by the `git` binary on PATH
pub struct GitCli;

impl GitCli {
    fn run(cwd: &Path, args: &[&str]) -> Option<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .output()
            .ok()?;

        if output.status.success() {
            Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            None
        }
    }
}

impl GitRepo for GitCli {
    fn context(&self, cwd: &Path) -> Option<GitContext> {
        let root = Self::run(cwd, &["rev-parse", "--show-toplevel"])?;
        if root.is_empty() {
            return None;
        }

        // An unborn branch (no commits yet) counts as no branch, same as a detached HEAD
        let branch = if Self::run(cwd, &["rev-parse", "--verify", "-q", "HEAD"]).is_some() {
            parse_branch(Self::run(cwd, &["symbolic-ref", "--short", "-q", "HEAD"]))
        } else {
            Branch::Detached
        };

        Some(GitContext {
            repo_root: PathBuf::from(root),
            branch,
        })
    }

    fn config(&self, cwd: &Path, key: &str) -> Option<String> {
        Self::run(cwd, &["config", "--get", key]).filter(|v| !v.is_empty())
    }
}

fn parse_branch(symbolic_ref: Option<String>) -> Branch {
    match symbolic_ref {
        Some(name) if !name.is_empty() => Branch::Named(name),
        _ => Branch::Detached,
    }
}

use std::fs;

use crate::config::Settings;
use crate::error::HookError;
use crate::hooks::Capabilities;
use crate::input::HookEvent;
use crate::response::Decision;
use crate::workspace;

const NOT_A_REPO_CONTEXT: &str =
    "No workspace is available because this session is not inside a git repository. \
     Start Claude Code from a git checkout to get a per-branch workspace.";

/// Resolve the per-branch workspace and hand its path to the assistant.
/// Blocks only when the cwd is not inside a git working tree.
pub fn resolve(event: &HookEvent, settings: &Settings, caps: &Capabilities) -> Decision {
    let Some(ctx) = caps.git.context(&event.cwd) else {
        tracing::info!(cwd = %event.cwd.display(), "not in a git repository");
        return Decision::block(
            HookError::NotAGitRepository.to_string(),
            Some(NOT_A_REPO_CONTEXT.to_string()),
        );
    };

    let (locator, created) = workspace::resolve(&ctx, &event.cwd, settings, caps.fs);
    let path = locator.branch_subdir.display();

    let mut context = match created {
        Ok(()) => {
            tracing::debug!(
                workspace = %path,
                base = %locator.base_dir.display(),
                "workspace ready"
            );
            format!(
                "Workspace directory for this branch: {path}\n\
                 Use it for scratch files, notes and plans. It is outside version control and persists across sessions on this branch."
            )
        }
        Err(e) => {
            tracing::warn!(workspace = %path, error = %e, "failed to create workspace");
            format!("Workspace directory for this branch: {path}\nIt could not be created: {e}")
        }
    };

    for file in &settings.context_files {
        match fs::read_to_string(file) {
            Ok(text) => {
                context.push_str("\n\n");
                context.push_str(text.trim_end());
            }
            Err(e) => {
                tracing::warn!(path = %file.display(), error = %e, "skipping context file");
            }
        }
    }

    Decision::with_context(context)
}

//! Routes a parsed hook event to the policy for its lifecycle point.

use crate::config::Settings;
use crate::git::GitRepo;
use crate::gpg::SigningProbe;
use crate::input::{EventKind, HookEvent};
use crate::response::Decision;
use crate::workspace::WorkspaceFs;

pub mod git_gate;
pub mod workspace_context;

/// External effects a hook may need, injected so every path is testable
pub struct Capabilities<'a> {
    pub git: &'a dyn GitRepo,
    pub signer: &'a dyn SigningProbe,
    pub fs: &'a dyn WorkspaceFs,
}

pub fn handle(event: &HookEvent, settings: &Settings, caps: &Capabilities) -> Decision {
    match &event.kind {
        EventKind::PreToolUse => git_gate::check(event, caps.signer),
        EventKind::UserPromptSubmit | EventKind::SessionStart => {
            workspace_context::resolve(event, settings, caps)
        }
        EventKind::Other(name) => {
            tracing::debug!(event = %name, "unhandled event");
            Decision::pass()
        }
    }
}

use regex::Regex;
use std::sync::LazyLock;

use crate::error::HookError;
use crate::gpg::SigningProbe;
use crate::input::HookEvent;
use crate::response::Decision;

/// Literal prefix match, not a shell parse: `git` followed by whitespace or end
#[allow(clippy::expect_used)]
static GIT_COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^git(\s|$)").expect("git command pattern is valid"));

pub fn is_git_command(command: &str) -> bool {
    GIT_COMMAND.is_match(command)
}

/// Deny git commands while the signing key is locked.
/// Everything else continues without probing.
pub fn check(event: &HookEvent, signer: &dyn SigningProbe) -> Decision {
    let Some(command) = event.command.as_deref() else {
        return Decision::pass();
    };

    if !is_git_command(command) {
        tracing::debug!(command, "not a git command, skipping signing probe");
        return Decision::pass();
    }

    if signer.is_unlocked(&event.cwd) {
        tracing::debug!(command, "signing key ready");
        Decision::pass()
    } else {
        tracing::info!(command, "signing key locked, denying git command");
        Decision::block(HookError::CredentialLocked.to_string(), None)
    }
}

use thiserror::Error;

/// Conditions a hook can end up in besides a plain continue.
#[derive(Debug, Error)]
pub enum HookError {
    /// Stdin was not a JSON object with the fields we need.
    #[error("malformed hook input: {0}")]
    MalformedInput(String),

    #[error("Not in a git repository")]
    NotAGitRepository,

    #[error(
        "GPG signing key is locked. Unlock it in a terminal (for example `echo test | gpg --clear-sign`) and retry the git command."
    )]
    CredentialLocked,
}

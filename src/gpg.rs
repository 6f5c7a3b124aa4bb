use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::git::GitRepo;

const PROBE_PAYLOAD: &[u8] = b"gitpad signing probe\n";

/// Checks whether commits could be signed right now without a passphrase prompt
pub trait SigningProbe {
    fn is_unlocked(&self, cwd: &Path) -> bool;
}

/// SigningProbe that clear-signs a throwaway payload with gpg.
///
/// Nothing is written to the repository: the payload comes from stdin and the
/// signature goes to /dev/null. Only the exit status is inspected. The child
/// runs in the hook's own working directory, not the event cwd.
pub struct GpgCli<'a> {
    git: &'a dyn GitRepo,
    /// Explicit program from config; otherwise git's gpg.program, then `gpg`
    program: Option<String>,
}

impl<'a> GpgCli<'a> {
    pub fn new(git: &'a dyn GitRepo, program: Option<String>) -> Self {
        Self { git, program }
    }

    fn program(&self, cwd: &Path) -> String {
        self.program
            .clone()
            .or_else(|| self.git.config(cwd, "gpg.program"))
            .unwrap_or_else(|| "gpg".to_string())
    }

    fn args(signing_key: Option<&str>) -> Vec<String> {
        let mut args: Vec<String> = [
            "--batch",
            "--no-tty",
            "--pinentry-mode",
            "error",
            "--clear-sign",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        if let Some(key) = signing_key {
            args.push("--local-user".to_string());
            args.push(key.to_string());
        }
        args
    }
}

impl SigningProbe for GpgCli<'_> {
    fn is_unlocked(&self, cwd: &Path) -> bool {
        let program = self.program(cwd);
        let key = self.git.config(cwd, "user.signingkey");
        let args = Self::args(key.as_deref());
        tracing::debug!(%program, ?args, "probing signing key");

        // Signing does not depend on cwd, which may already be gone; only the git lookups use it
        let mut child = match Command::new(&program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(c) => c,
            Err(e) => {
                tracing::info!(%program, error = %e, "signing program could not be started");
                return false;
            }
        };

        if let Some(mut stdin) = child.stdin.take() {
            // The program may exit before reading; its status is what counts
            let _ = stdin.write_all(PROBE_PAYLOAD);
        }

        match child.wait() {
            Ok(status) => status.success(),
            Err(e) => {
                tracing::info!(%program, error = %e, "waiting for signing program failed");
                false
            }
        }
    }
}

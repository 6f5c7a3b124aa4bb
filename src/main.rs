use anyhow::{Context, Result};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod git;
mod gpg;
mod hooks;
mod input;
mod response;
mod workspace;

use config::Environment;
use git::GitCli;
use gpg::GpgCli;
use hooks::Capabilities;
use workspace::LocalFs;

/// Log filter directive, e.g. `GITPAD_LOG=debug`
const LOG_ENV: &str = "GITPAD_LOG";

/// Logs go to stderr; stdout is reserved for the hook response.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let payload = read_input()?;
    let event = input::parse(&payload)?;
    tracing::debug!(
        event = %event.kind,
        cwd = %event.cwd.display(),
        tool = event.tool_name.as_deref().unwrap_or("None"),
        "hook invoked"
    );

    let env = Environment::from_process();
    let settings = config::load(&env)?;

    let git = GitCli;
    let signer = GpgCli::new(&git, settings.gpg_program.clone());
    let caps = Capabilities {
        git: &git,
        signer: &signer,
        fs: &LocalFs,
    };

    let decision = hooks::handle(&event, &settings, &caps);
    // Claude Code shows stderr on exit 2, so blocks are logged above the default filter
    if let Some(reason) = decision.block_reason() {
        tracing::warn!(event = %event.kind, "{}", reason);
    }

    let response = response::encode(&event.kind, decision).context("Failed to encode response")?;
    if let Some(body) = &response.body {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", body)?;
        stdout.flush()?;
    }

    if response.exit_code != 0 {
        std::process::exit(response.exit_code);
    }
    Ok(())
}

fn read_input() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read hook input from stdin")?;
    Ok(buffer)
}

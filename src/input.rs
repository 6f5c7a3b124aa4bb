use crate::error::HookError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Input JSON from Claude Code hook system
#[derive(Debug, Deserialize)]
struct HookInputRaw {
    hook_event_name: Option<String>,
    cwd: Option<String>,
    /// Tool name (only present for PreToolUse/PostToolUse events)
    tool_name: Option<String>,
    tool_input: Option<Value>,
}

/// Lifecycle point the hook was invoked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    PreToolUse,
    UserPromptSubmit,
    SessionStart,
    /// Anything we don't handle; passed through untouched
    Other(String),
}

impl EventKind {
    fn from_name(name: &str) -> Self {
        match name {
            "PreToolUse" => EventKind::PreToolUse,
            "UserPromptSubmit" => EventKind::UserPromptSubmit,
            "SessionStart" => EventKind::SessionStart,
            other => EventKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::PreToolUse => "PreToolUse",
            EventKind::UserPromptSubmit => "UserPromptSubmit",
            EventKind::SessionStart => "SessionStart",
            EventKind::Other(name) => name,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single hook invocation
#[derive(Debug, Clone)]
pub struct HookEvent {
    pub kind: EventKind,
    pub cwd: PathBuf,
    pub tool_name: Option<String>,
    /// Shell command about to run (PreToolUse only)
    pub command: Option<String>,
}

/// Parse the JSON payload Claude Code writes to stdin.
///
/// `hook_event_name` is the discriminator. Older PreToolUse payloads only carry
/// `tool_name`, so its presence alone implies PreToolUse.
pub fn parse(payload: &str) -> Result<HookEvent, HookError> {
    let raw: HookInputRaw =
        serde_json::from_str(payload).map_err(|e| HookError::MalformedInput(e.to_string()))?;

    let kind = match (&raw.hook_event_name, &raw.tool_name) {
        (Some(name), _) => EventKind::from_name(name),
        (None, Some(_)) => EventKind::PreToolUse,
        (None, None) => {
            return Err(HookError::MalformedInput(
                "missing field `hook_event_name`".to_string(),
            ))
        }
    };

    let cwd = raw
        .cwd
        .filter(|c| !c.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| HookError::MalformedInput("missing field `cwd`".to_string()))?;

    let command = match kind {
        EventKind::PreToolUse => raw
            .tool_input
            .as_ref()
            .and_then(|input| input.get("command"))
            .and_then(|v| v.as_str())
            .map(String::from),
        _ => None,
    };

    Ok(HookEvent {
        kind,
        cwd,
        tool_name: raw.tool_name,
        command,
    })
}

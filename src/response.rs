use serde::Serialize;

use crate::input::EventKind;

/// Exit code Claude Code reads as "stop and show the reason"
pub const BLOCK_EXIT_CODE: i32 = 2;

/// Outcome of a hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue {
        additional_context: Option<String>,
    },
    Block {
        reason: String,
        additional_context: Option<String>,
    },
}

impl Decision {
    pub fn pass() -> Self {
        Decision::Continue {
            additional_context: None,
        }
    }

    pub fn with_context(context: String) -> Self {
        Decision::Continue {
            additional_context: Some(context),
        }
    }

    /// Block with a reason; an empty reason is replaced so the host always has
    /// something to show.
    pub fn block(reason: impl Into<String>, additional_context: Option<String>) -> Self {
        let mut reason = reason.into();
        if reason.trim().is_empty() {
            reason = "Blocked by gitpad hook".to_string();
        }
        Decision::Block {
            reason,
            additional_context,
        }
    }

    /// The reason, if this decision stops the action
    pub fn block_reason(&self) -> Option<&str> {
        match self {
            Decision::Block { reason, .. } => Some(reason),
            Decision::Continue { .. } => None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HookSpecificOutput {
    hook_event_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission_decision: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permission_decision_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_context: Option<String>,
}

/// Output JSON for the Claude Code hook system
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HookOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    hook_specific_output: HookSpecificOutput,
}

/// What to write to stdout and how to exit
#[derive(Debug)]
pub struct Response {
    pub body: Option<String>,
    pub exit_code: i32,
}

/// Render a decision in the schema Claude Code expects for `kind`.
pub fn encode(kind: &EventKind, decision: Decision) -> serde_json::Result<Response> {
    let (output, exit_code) = match decision {
        Decision::Continue {
            additional_context: None,
        } => {
            return Ok(Response {
                body: None,
                exit_code: 0,
            })
        }
        Decision::Continue {
            additional_context: Some(context),
        } => (
            HookOutput {
                decision: None,
                reason: None,
                hook_specific_output: HookSpecificOutput {
                    hook_event_name: kind.to_string(),
                    permission_decision: None,
                    permission_decision_reason: None,
                    additional_context: Some(context),
                },
            },
            0,
        ),
        Decision::Block { reason, .. } if *kind == EventKind::PreToolUse => (
            HookOutput {
                decision: None,
                reason: None,
                hook_specific_output: HookSpecificOutput {
                    hook_event_name: kind.to_string(),
                    permission_decision: Some("deny"),
                    permission_decision_reason: Some(reason),
                    additional_context: None,
                },
            },
            BLOCK_EXIT_CODE,
        ),
        Decision::Block {
            reason,
            additional_context,
        } => (
            HookOutput {
                decision: Some("block"),
                hook_specific_output: HookSpecificOutput {
                    hook_event_name: kind.to_string(),
                    permission_decision: None,
                    permission_decision_reason: None,
                    additional_context: Some(additional_context.unwrap_or_else(|| reason.clone())),
                },
                reason: Some(reason),
            },
            BLOCK_EXIT_CODE,
        ),
    };

    Ok(Response {
        body: Some(serde_json::to_string(&output)?),
        exit_code,
    })
}

//! Client-visible output channels
//!
//! Everything produced here can end up in front of a client: a printed
//! talk track, a synthesized audio transcript, or a drafted chat message.
//! The builders take [`ClientScript`] and plain strings the agent supplies,
//! never a [`GuidanceEntry`], so agent-only rationale has no path in.
//!
//! [`AgentBriefing`] pairs the client transcript with an agent-only context
//! line. The two are kept in separate fields and only `client_transcript`
//! is meant for playback.

use serde::Serialize;

use crate::guidance::{ClientScript, GuidanceEntry};

/// Printable talk track.
pub fn print_script(script: &ClientScript) -> String {
    format!("\u{201c}{}\u{201d}", script.as_str())
}

/// Chat message drafted for the client.
pub fn chat_reply(script: &ClientScript, client_first_name: Option<&str>) -> String {
    match client_first_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!("Hi {}, {}", name, script.as_str()),
        None => format!("Hi, {}", script.as_str()),
    }
}

/// Transcript handed to the voice synthesizer.
pub fn voice_transcript(script: &ClientScript) -> String {
    format!("[Suggested Voice]: {}", print_script(script))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentBriefing {
    /// Agent-only context. Never played or sent.
    pub agent_context: String,
    /// Playback text; built from the client script alone.
    pub transcript: String,
}

impl AgentBriefing {
    pub fn compose(entry: &GuidanceEntry) -> Self {
        Self {
            agent_context: format!(
                "Flagged due to {}. Market conditions favor a check-in. Suggested action: {}.",
                entry.rationale, entry.action
            ),
            transcript: voice_transcript(&entry.script),
        }
    }

    pub fn client_transcript(&self) -> &str {
        &self.transcript
    }
}

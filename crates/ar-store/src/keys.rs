// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-family string formats. These exact strings are part of
//! the wire contract shared with other replicas/services — never reformat
//! them without a compatibility plan.

pub fn session_key(session_id: &str) -> String {
    format!("cli:session:{session_id}")
}

pub fn workspace_sessions_key(workspace_id: &str) -> String {
    format!("cli:workspace:{workspace_id}:sessions")
}

pub fn agent_pointer_key(agent_id: &str) -> String {
    format!("cli:agent:{agent_id}")
}

pub fn history_key(session_id: &str) -> String {
    format!("cli:history:{session_id}")
}

pub fn channel_name(workspace_id: &str) -> String {
    format!("cli-events:{workspace_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_match_the_wire_contract() {
        assert_eq!(session_key("s1"), "cli:session:s1");
        assert_eq!(workspace_sessions_key("w1"), "cli:workspace:w1:sessions");
        assert_eq!(agent_pointer_key("a1"), "cli:agent:a1");
        assert_eq!(history_key("s1"), "cli:history:s1");
        assert_eq!(channel_name("w1"), "cli-events:w1");
    }
}

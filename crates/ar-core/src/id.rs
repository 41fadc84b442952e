// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Newtype identifiers for the orchestration domain.
//!
//! Ids carry no required shape. One historical quirk is kept: when
//! an id happens to already look like a canonical 36-character hyphenated
//! UUID, it is additionally validated as one; ids that don't look canonical
//! are accepted as opaque strings. `looks_canonical`/`validate_if_canonical`
//! implement that "only validate shape when it already looks canonical" rule.

use std::borrow::Borrow;
use std::fmt;

/// Define a newtype id wrapper around `String` with the common trait set
/// every identifier in this workspace needs.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Identity of an agent; at most one live session per agent.
    pub struct AgentId;
}

define_id! {
    /// Identity of a live CLI agent session.
    pub struct SessionId;
}

define_id! {
    /// Tenancy unit used for isolation and admission control.
    pub struct WorkspaceId;
}

define_id! {
    /// Project scoping within a workspace.
    pub struct ProjectId;
}

/// True if `s` has the shape of a canonical hyphenated UUID: 36 characters,
/// hyphens at positions 8/13/18/23, hex digits elsewhere.
pub fn looks_canonical(s: &str) -> bool {
    if s.len() != 36 {
        return false;
    }
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        let expect_hyphen = matches!(i, 8 | 13 | 18 | 23);
        if expect_hyphen {
            if *b != b'-' {
                return false;
            }
        } else if !b.is_ascii_hexdigit() {
            return false;
        }
    }
    true
}

/// Validate `s` as an id, opportunistically checking UUID shape only when it
/// already looks canonical. Non-canonical-looking strings pass as-is.
pub fn validate_id(field: &str, s: &str) -> Result<(), crate::error::CoreError> {
    if s.is_empty() {
        return Err(crate::error::CoreError::InvalidArgument(format!(
            "{field} must not be empty"
        )));
    }
    if s.len() == 36 && s.contains('-') && !looks_canonical(s) {
        return Err(crate::error::CoreError::InvalidArgument(format!(
            "{field} looks like a UUID but is not well-formed: {s}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_canonical_accepts_valid_uuid() {
        assert!(looks_canonical("550e8400-e29b-41d4-a716-446655440000"));
    }

    #[test]
    fn looks_canonical_rejects_wrong_length() {
        assert!(!looks_canonical("not-a-uuid"));
    }

    #[test]
    fn looks_canonical_rejects_malformed_hyphen_positions() {
        // Same length as a UUID, but hyphens in the wrong places.
        assert!(!looks_canonical("550e8400e29b41d4a716-446655440000-"));
    }

    #[yare::parameterized(
        plain_string       = { "agent-1", true },
        empty               = { "", false },
        canonical_uuid      = { "550e8400-e29b-41d4-a716-446655440000", true },
        uuid_shaped_bad_hex = { "550e8400-e29b-41d4-a716-44665544000g", false },
    )]
    fn validate_id_cases(s: &str, expect_ok: bool) {
        assert_eq!(validate_id("field", s).is_ok(), expect_ok);
    }

    #[test]
    fn id_display_roundtrip() {
        let id = AgentId::new("agent-1");
        assert_eq!(id.to_string(), "agent-1");
        assert_eq!(id.as_str(), "agent-1");
    }

    proptest::proptest! {
        #[test]
        fn every_generated_uuid_v4_looks_canonical(_seed in 0u32..10_000) {
            let generated = uuid::Uuid::new_v4().to_string();
            proptest::prop_assert!(looks_canonical(&generated));
        }
    }
}

//! User identity supplied by the external identity service.

use crate::ProtocolError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identity (an email address or equivalent) that scopes history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserIdentity(String);

impl UserIdentity {
    /// Parse an identity, trimming surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, ProtocolError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ProtocolError::InvalidIdentity(
                "identity must not be empty".to_string(),
            ));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(ProtocolError::InvalidIdentity(
                "identity must not contain control characters".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserIdentity {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for UserIdentity {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<UserIdentity> for String {
    fn from(identity: UserIdentity) -> Self {
        identity.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_trims_whitespace() {
        let identity = UserIdentity::parse("  writer@example.com ").expect("identity");
        assert_eq!(identity.as_str(), "writer@example.com");
    }

    #[test]
    fn parse_rejects_blank_and_control_characters() {
        assert!(UserIdentity::parse("   ").is_err());
        assert!(UserIdentity::parse("a\nb@example.com").is_err());
    }

    #[test]
    fn deserialization_validates() {
        let parsed: Result<UserIdentity, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let parsed: UserIdentity = serde_json::from_str("\"a@b.c\"").expect("identity");
        assert_eq!(parsed.to_string(), "a@b.c");
    }
}

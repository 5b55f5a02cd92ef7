use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who may invite this user into a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitePreference {
    /// Anyone may invite.
    Anyone,
    /// Only people this user follows may invite.
    Following,
    /// Invitations are rejected outright.
    None,
}

impl InvitePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitePreference::Anyone => "anyone",
            InvitePreference::Following => "following",
            InvitePreference::None => "none",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "anyone" => Some(InvitePreference::Anyone),
            "following" => Some(InvitePreference::Following),
            "none" => Some(InvitePreference::None),
            _ => None,
        }
    }
}

/// A user profile. User identities come from the external auth provider;
/// the profile row carries everything the service itself needs to know.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub invite_preference: InvitePreference,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_preference_round_trip() {
        for pref in [
            InvitePreference::Anyone,
            InvitePreference::Following,
            InvitePreference::None,
        ] {
            assert_eq!(InvitePreference::parse(pref.as_str()), Some(pref));
        }
        assert_eq!(InvitePreference::parse("friends"), None);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a room. The only transition is active -> completed, and
/// re-completing an already-completed room is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Active,
    Completed,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Active => "active",
            RoomStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(RoomStatus::Active),
            "completed" => Some(RoomStatus::Completed),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RoomStatus::Active)
    }
}

/// A voting room. Votes are only accepted while the room is active.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchRoom {
    pub id: Uuid,
    pub creator_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub is_public: bool,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        assert_eq!(RoomStatus::parse("active"), Some(RoomStatus::Active));
        assert_eq!(RoomStatus::parse("completed"), Some(RoomStatus::Completed));
        assert_eq!(RoomStatus::parse("archived"), None);
    }

    #[test]
    fn test_only_active_accepts_votes() {
        assert!(RoomStatus::Active.is_active());
        assert!(!RoomStatus::Completed.is_active());
    }
}

use serde::{Deserialize, Serialize};

/// The value of a single vote. Exactly one live value exists per
/// (room, user, media) triple; casting again replaces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteValue {
    Yes,
    No,
    Maybe,
}

impl VoteValue {
    /// Parses the wire representation. Anything outside yes/no/maybe is
    /// rejected at the API boundary before the ledger is touched.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(VoteValue::Yes),
            "no" => Some(VoteValue::No),
            "maybe" => Some(VoteValue::Maybe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteValue::Yes => "yes",
            VoteValue::No => "no",
            VoteValue::Maybe => "maybe",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, VoteValue::Yes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_values() {
        assert_eq!(VoteValue::parse("yes"), Some(VoteValue::Yes));
        assert_eq!(VoteValue::parse("no"), Some(VoteValue::No));
        assert_eq!(VoteValue::parse("maybe"), Some(VoteValue::Maybe));
    }

    #[test]
    fn test_parse_rejects_invalid_values() {
        assert_eq!(VoteValue::parse("YES"), None);
        assert_eq!(VoteValue::parse("nope"), None);
        assert_eq!(VoteValue::parse(""), None);
    }

    #[test]
    fn test_round_trip() {
        for value in [VoteValue::Yes, VoteValue::No, VoteValue::Maybe] {
            assert_eq!(VoteValue::parse(value.as_str()), Some(value));
        }
    }

    #[test]
    fn test_only_yes_is_yes() {
        assert!(VoteValue::Yes.is_yes());
        assert!(!VoteValue::No.is_yes());
        assert!(!VoteValue::Maybe.is_yes());
    }
}

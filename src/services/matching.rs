use std::sync::Arc;

use uuid::Uuid;

use crate::db::VoteLedger;
use crate::error::AppResult;
use crate::models::MediaItem;

/// The match predicate: how many distinct "yes" votes a media item needs
/// before the room is told it has a match.
///
/// An absolute count, not a quorum: it does not scale with room size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPolicy {
    pub min_yes_votes: u32,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self { min_yes_votes: 2 }
    }
}

impl MatchPolicy {
    pub fn is_match(&self, yes_votes: i64) -> bool {
        yes_votes >= i64::from(self.min_yes_votes)
    }
}

/// Pure query layer over the vote ledger applying the match predicate.
#[derive(Clone)]
pub struct MatchDetector {
    votes: Arc<dyn VoteLedger>,
    policy: MatchPolicy,
}

impl MatchDetector {
    pub fn new(votes: Arc<dyn VoteLedger>, policy: MatchPolicy) -> Self {
        Self { votes, policy }
    }

    /// Whether a media item currently qualifies as a match. Used inline
    /// after a "yes" cast so the caller can report a fresh match with a
    /// single count query.
    pub async fn is_match(&self, session_id: Uuid, media_id: Uuid) -> AppResult<bool> {
        let yes_votes = self.votes.count_yes_votes(session_id, media_id).await?;
        Ok(self.policy.is_match(yes_votes))
    }

    /// All media items qualifying under the policy, ordered by title.
    pub async fn list_matches(&self, session_id: Uuid) -> AppResult<Vec<MediaItem>> {
        self.votes
            .list_matches(session_id, i64::from(self.policy.min_yes_votes))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::votes::MockVoteLedger;

    #[test]
    fn test_default_threshold_is_two() {
        let policy = MatchPolicy::default();
        assert!(!policy.is_match(0));
        assert!(!policy.is_match(1));
        assert!(policy.is_match(2));
        assert!(policy.is_match(3));
    }

    #[test]
    fn test_custom_threshold() {
        let policy = MatchPolicy { min_yes_votes: 3 };
        assert!(!policy.is_match(2));
        assert!(policy.is_match(3));
    }

    #[tokio::test]
    async fn test_is_match_applies_policy_to_count() {
        let session_id = Uuid::new_v4();
        let media_id = Uuid::new_v4();

        let mut ledger = MockVoteLedger::new();
        ledger
            .expect_count_yes_votes()
            .returning(|_, _| Ok(2))
            .times(1);

        let detector = MatchDetector::new(Arc::new(ledger), MatchPolicy::default());
        assert!(detector.is_match(session_id, media_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_single_yes_is_not_a_match() {
        let mut ledger = MockVoteLedger::new();
        ledger.expect_count_yes_votes().returning(|_, _| Ok(1));

        let detector = MatchDetector::new(Arc::new(ledger), MatchPolicy::default());
        assert!(!detector
            .is_match(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_list_matches_passes_threshold_to_ledger() {
        let mut ledger = MockVoteLedger::new();
        ledger
            .expect_list_matches()
            .withf(|_, min_yes| *min_yes == 3)
            .returning(|_, _| Ok(vec![]))
            .times(1);

        let detector = MatchDetector::new(Arc::new(ledger), MatchPolicy { min_yes_votes: 3 });
        let matches = detector.list_matches(Uuid::new_v4()).await.unwrap();
        assert!(matches.is_empty());
    }
}

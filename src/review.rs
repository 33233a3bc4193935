//! Admin review queue for games without a confirmed regional mapping

use crate::error::ReviewError;
use crate::markets::{apply_rules, MarketDirectory};
use crate::models::{Game, MappingRule};

/// Placeholder shown in the review form before an admin maps the game
pub const DEFAULT_PLACEHOLDER: &str = "RSN / Blackout Check";

#[derive(Debug, Clone, Default)]
pub struct ReviewQueue {
    games: Vec<Game>,
}

impl ReviewQueue {
    pub fn new(games: Vec<Game>) -> Self {
        Self { games }
    }

    pub fn pending(&self) -> Vec<&Game> {
        self.games.iter().filter(|g| !g.is_validated).collect()
    }

    pub fn pending_count(&self) -> usize {
        self.games.iter().filter(|g| !g.is_validated).count()
    }

    pub fn placeholder(game: &Game) -> &str {
        game.regional_placeholder.as_deref().unwrap_or(DEFAULT_PLACEHOLDER)
    }

    /// Mark a game as mapped: record the admin's channel note, project the
    /// current DMA rules into its overrides and return the published game.
    pub fn approve(
        &mut self,
        game_id: &str,
        channel: &str,
        rules: &[MappingRule],
        directory: &MarketDirectory,
    ) -> Result<Game, ReviewError> {
        let channel = channel.trim();
        if channel.is_empty() {
            return Err(ReviewError::EmptyChannel);
        }
        let game = self
            .games
            .iter_mut()
            .find(|g| g.id == game_id)
            .ok_or_else(|| ReviewError::NotFound(game_id.to_string()))?;
        if game.is_validated {
            return Err(ReviewError::AlreadyValidated(game_id.to_string()));
        }
        // published games must always resolve
        if !game.has_default() {
            return Err(ReviewError::MissingDefault(game_id.to_string()));
        }

        game.regional_placeholder = Some(channel.to_string());
        apply_rules(game, rules, directory);
        game.is_validated = true;
        Ok(game.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationKey;
    use crate::rules::RuleTable;
    use crate::sample;

    fn queue() -> ReviewQueue {
        ReviewQueue::new(sample::unvalidated_games())
    }

    #[test]
    fn test_pending() {
        let q = queue();
        assert_eq!(q.pending_count(), 2);
        assert_eq!(ReviewQueue::placeholder(q.pending()[0]), DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn test_approve_applies_rules_and_leaves_queue() {
        let mut q = queue();
        let rules = RuleTable::from_new_rules(sample::dma_rules());
        let game = q
            .approve("LAL_BOS_Dec10", "Spectrum SportsNet", rules.list_rules(), &MarketDirectory::builtin())
            .unwrap();

        assert!(game.is_validated);
        assert_eq!(game.regional_placeholder.as_deref(), Some("Spectrum SportsNet"));
        assert!(game
            .regional_overrides
            .contains_key(&LocationKey::parse_zip("90210").unwrap()));
        assert_eq!(q.pending_count(), 1);
    }

    #[test]
    fn test_approve_twice_fails() {
        let mut q = queue();
        let dir = MarketDirectory::builtin();
        q.approve("UTA_PHX_Dec11", "Suns Live", &[], &dir).unwrap();
        assert_eq!(
            q.approve("UTA_PHX_Dec11", "Suns Live", &[], &dir),
            Err(ReviewError::AlreadyValidated("UTA_PHX_Dec11".to_string()))
        );
    }

    #[test]
    fn test_approve_requires_default_channel() {
        let mut games = sample::unvalidated_games();
        games[0].regional_overrides.clear();
        let mut q = ReviewQueue::new(games);
        let rules = RuleTable::from_new_rules(sample::dma_rules());

        assert_eq!(
            q.approve("LAL_BOS_Dec10", "Spectrum SportsNet", rules.list_rules(), &MarketDirectory::builtin()),
            Err(ReviewError::MissingDefault("LAL_BOS_Dec10".to_string()))
        );
        let game = q.pending()[0];
        assert!(!game.is_validated);
        assert!(game.regional_overrides.is_empty());
        assert!(game.regional_placeholder.is_none());
    }

    #[test]
    fn test_approve_unknown_or_blank() {
        let mut q = queue();
        let dir = MarketDirectory::builtin();
        assert_eq!(
            q.approve("NOPE", "X", &[], &dir),
            Err(ReviewError::NotFound("NOPE".to_string()))
        );
        assert_eq!(
            q.approve("UTA_PHX_Dec11", "  ", &[], &dir),
            Err(ReviewError::EmptyChannel)
        );
    }
}

//! Shared state and operations behind the guide API
//!
//! REST handlers and the in-process client both go through this layer.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{ResolveError, ReviewError, RuleError};
use crate::location::LocationKey;
use crate::markets::MarketDirectory;
use crate::models::{Game, MappingRule, NewRule, RuleId, RulePatch};
use crate::resolver::{location_label, resolve_schedule, ResolvedGame};
use crate::review::ReviewQueue;
use crate::rules::{RuleTable, Upserted};
use crate::sample;

// ============================================================================
// Data Structures
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduleView {
    pub location: String,
    pub zip: Option<String>,
    pub games: Vec<ResolvedGame>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub published_games: usize,
    pub unvalidated_games: usize,
    pub rules: usize,
}

// ============================================================================
// Guide Service
// ============================================================================

pub struct GuideService {
    games: Arc<RwLock<Vec<Game>>>,
    review: Arc<RwLock<ReviewQueue>>,
    rules: Arc<RwLock<RuleTable>>,
    markets: MarketDirectory,
}

impl GuideService {
    /// Games without a `default` override are dropped; they could never
    /// resolve for viewers outside their listed ZIPs.
    pub fn new(games: Vec<Game>, pending: Vec<Game>, rules: RuleTable, markets: MarketDirectory) -> Self {
        let (games, invalid): (Vec<Game>, Vec<Game>) = games.into_iter().partition(Game::has_default);
        for g in &invalid {
            tracing::warn!(game = %g.id, "dropping game without a default channel");
        }
        Self {
            games: Arc::new(RwLock::new(games)),
            review: Arc::new(RwLock::new(ReviewQueue::new(pending))),
            rules: Arc::new(RwLock::new(rules)),
            markets,
        }
    }

    pub fn with_sample_data() -> Self {
        Self::with_rules(RuleTable::from_new_rules(sample::dma_rules()))
    }

    /// Sample schedule and review queue with a caller-supplied rule table
    pub fn with_rules(rules: RuleTable) -> Self {
        Self::new(
            sample::schedule(),
            sample::unvalidated_games(),
            rules,
            MarketDirectory::builtin(),
        )
    }

    pub async fn stats(&self) -> Stats {
        Stats {
            published_games: self.games.read().await.len(),
            unvalidated_games: self.review.read().await.pending_count(),
            rules: self.rules.read().await.len(),
        }
    }

    // ------------------------------------------------------------------------
    // Schedule
    // ------------------------------------------------------------------------

    /// Published games. With a location, each game's overrides are narrowed
    /// to that ZIP plus `default`, which is all a client needs to resolve.
    pub async fn games(&self, location: Option<&LocationKey>) -> Vec<Game> {
        let games = self.games.read().await;
        match location {
            None => games.clone(),
            Some(key) => games
                .iter()
                .map(|g| {
                    let mut g = g.clone();
                    g.regional_overrides
                        .retain(|k, _| k == key || k.is_default());
                    g
                })
                .collect(),
        }
    }

    pub async fn schedule(&self, location: Option<&LocationKey>) -> Result<ScheduleView, ResolveError> {
        let games = self.games.read().await;
        let rows = resolve_schedule(&games, location)?;
        debug!(location = ?location, rows = rows.len(), "resolved schedule");
        Ok(ScheduleView {
            location: location_label(location),
            zip: location.filter(|k| !k.is_default()).map(|k| k.to_string()),
            games: rows,
        })
    }

    // ------------------------------------------------------------------------
    // Review queue
    // ------------------------------------------------------------------------

    pub async fn unvalidated_games(&self) -> Vec<Game> {
        self.review.read().await.pending().into_iter().cloned().collect()
    }

    /// Approve a pending game and publish it to the schedule
    pub async fn approve_game(&self, game_id: &str, channel: &str) -> Result<Game, ReviewError> {
        let rules = self.rules.read().await.list_rules().to_vec();
        let game = self
            .review
            .write()
            .await
            .approve(game_id, channel, &rules, &self.markets)?;
        self.games.write().await.push(game.clone());
        info!(
            game = %game.id,
            overrides = game.regional_overrides.len(),
            "game approved and published"
        );
        Ok(game)
    }

    // ------------------------------------------------------------------------
    // DMA rules
    // ------------------------------------------------------------------------

    pub async fn list_rules(&self) -> Vec<MappingRule> {
        self.rules.read().await.list_rules().to_vec()
    }

    pub async fn get_rule(&self, id: RuleId) -> Option<MappingRule> {
        self.rules.read().await.get(id).cloned()
    }

    pub async fn create_rule(&self, new: NewRule) -> Result<MappingRule, RuleError> {
        if let Some(field) = new.missing_field() {
            return Err(RuleError::MissingField(field));
        }
        let rule = self.rules.write().await.create_rule(new);
        info!(rule = %rule.id, region = %rule.region, team = %rule.team, "rule created");
        Ok(rule)
    }

    pub async fn upsert_rule(&self, new: NewRule) -> Result<Upserted, RuleError> {
        let result = self.rules.write().await.upsert_rule(new)?;
        info!(
            "Rule {} for {}/{}. ID: {}",
            if result.inserted { "inserted" } else { "updated" },
            result.rule.region,
            result.rule.team,
            result.rule.id
        );
        Ok(result)
    }

    pub async fn update_rule(&self, id: RuleId, patch: RulePatch) -> Result<MappingRule, RuleError> {
        let rule = self.rules.write().await.update_by_id(id, patch)?;
        info!(rule = %rule.id, "rule updated");
        Ok(rule)
    }

    pub async fn delete_rule(&self, id: RuleId) -> Result<MappingRule, RuleError> {
        let rule = self.rules.write().await.delete_by_id(id)?;
        info!(rule = %rule.id, region = %rule.region, "rule deleted");
        Ok(rule)
    }
}

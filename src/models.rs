use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ResolveError;
use crate::location::LocationKey;

pub type ChannelName = String;

/// Regional override table for a game, keyed by ZIP (plus the `default` entry)
pub type RegionalOverrides = BTreeMap<LocationKey, ChannelName>;

/// A scheduled game with its national (Tier 1) feed and regional (Tier 2) overrides
///
/// Deserializing a game without a `default` override fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "GameRecord")]
pub struct Game {
    pub id: String,
    pub sport: String,
    pub scheduled_time: String,
    pub matchup: String,
    pub away_team: String,
    pub home_team: String,
    pub national_channels: String,
    pub regional_overrides: RegionalOverrides,
    /// Channel or blackout note entered by an admin during review
    #[serde(default)]
    pub regional_placeholder: Option<String>,
    #[serde(default)]
    pub is_validated: bool,
}

impl Game {
    pub fn default_channel(&self) -> Option<&str> {
        self.regional_overrides
            .get(&LocationKey::Default)
            .map(String::as_str)
    }

    pub fn has_default(&self) -> bool {
        self.default_channel().is_some()
    }

    pub fn validate(&self) -> Result<(), ResolveError> {
        if self.has_default() {
            Ok(())
        } else {
            Err(ResolveError::MissingDefault {
                game: self.matchup.clone(),
            })
        }
    }
}

/// Wire form of [`Game`] before the `default` override is checked
#[derive(Deserialize)]
struct GameRecord {
    id: String,
    sport: String,
    scheduled_time: String,
    matchup: String,
    away_team: String,
    home_team: String,
    national_channels: String,
    regional_overrides: RegionalOverrides,
    #[serde(default)]
    regional_placeholder: Option<String>,
    #[serde(default)]
    is_validated: bool,
}

impl TryFrom<GameRecord> for Game {
    type Error = ResolveError;

    fn try_from(r: GameRecord) -> Result<Self, Self::Error> {
        let game = Game {
            id: r.id,
            sport: r.sport,
            scheduled_time: r.scheduled_time,
            matchup: r.matchup,
            away_team: r.away_team,
            home_team: r.home_team,
            national_channels: r.national_channels,
            regional_overrides: r.regional_overrides,
            regional_placeholder: r.regional_placeholder,
            is_validated: r.is_validated,
        };
        game.validate()?;
        Ok(game)
    }
}

/// Stable opaque identifier for a mapping rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(Uuid);

impl RuleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for RuleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// DMA/RSN mapping rule: which regional channel carries a team's games in a market
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MappingRule {
    pub id: RuleId,
    pub region: String,
    pub team: String,
    pub sport: String,
    pub channel: ChannelName,
    pub last_updated: DateTime<Utc>,
}

impl MappingRule {
    /// Natural key used for upserts: (region, team, sport)
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.region, &self.team, &self.sport)
    }

    /// First user field left blank, named as in rule payloads
    pub fn missing_field(&self) -> Option<&'static str> {
        NewRule::new(&self.region, &self.team, &self.sport, &self.channel).missing_field()
    }

    pub fn apply(&mut self, patch: RulePatch) {
        let patch = patch.normalized();
        if let Some(region) = patch.region {
            self.region = region;
        }
        if let Some(team) = patch.team {
            self.team = team;
        }
        if let Some(sport) = patch.sport {
            self.sport = sport;
        }
        if let Some(channel) = patch.channel {
            self.channel = channel;
        }
        self.last_updated = Utc::now();
    }
}

/// User-supplied fields of a new rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRule {
    #[serde(alias = "dma_code", alias = "dma")]
    pub region: String,
    pub team: String,
    pub sport: String,
    pub channel: ChannelName,
}

impl NewRule {
    pub fn new(region: &str, team: &str, sport: &str, channel: &str) -> Self {
        Self {
            region: region.to_string(),
            team: team.to_string(),
            sport: sport.to_string(),
            channel: channel.to_string(),
        }
    }

    /// DMA and sport upper-cased, team and channel trimmed
    pub fn normalized(&self) -> Self {
        Self {
            region: normalize_code(&self.region),
            team: self.team.trim().to_string(),
            sport: normalize_code(&self.sport),
            channel: self.channel.trim().to_string(),
        }
    }

    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("dma_code", &self.region),
            ("team", &self.team),
            ("sport", &self.sport),
            ("channel", &self.channel),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
    }

    pub fn into_rule(self) -> MappingRule {
        let n = self.normalized();
        MappingRule {
            id: RuleId::new(),
            region: n.region,
            team: n.team,
            sport: n.sport,
            channel: n.channel,
            last_updated: Utc::now(),
        }
    }
}

/// Partial update of a rule; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RulePatch {
    #[serde(default, alias = "dma_code", alias = "dma", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl RulePatch {
    pub fn channel(channel: &str) -> Self {
        Self {
            channel: Some(channel.to_string()),
            ..Self::default()
        }
    }

    fn normalized(self) -> Self {
        Self {
            region: self.region.as_deref().map(normalize_code),
            team: self.team.map(|t| t.trim().to_string()),
            sport: self.sport.as_deref().map(normalize_code),
            channel: self.channel.map(|c| c.trim().to_string()),
        }
    }
}

/// Raw record from a DMA rule CSV export
#[derive(Debug, Deserialize)]
pub struct RuleCsvRecord {
    pub dma: String,
    pub team: String,
    pub sport: String,
    pub channel: String,
}

impl RuleCsvRecord {
    pub fn to_new_rule(&self) -> anyhow::Result<NewRule> {
        let rule = NewRule::new(&self.dma, &self.team, &self.sport, &self.channel);
        if let Some(field) = rule.missing_field() {
            anyhow::bail!("rule for team '{}' is missing '{}'", self.team, field);
        }
        Ok(rule)
    }
}

fn normalize_code(s: &str) -> String {
    s.trim().to_uppercase()
}

//! ZIP to DMA market lookup
//!
//! Rules are written per DMA; the resolver works per ZIP. This table
//! bridges the two so approved rules can be projected into game overrides.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::location::LocationKey;
use crate::models::{Game, MappingRule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Market {
    pub zip: String,
    pub dma: String,
    pub state: String,
}

/// ZIP5 -> (DMA code, state)
static ZIP_MARKETS: LazyLock<HashMap<&'static str, (&'static str, &'static str)>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();

        // West
        m.insert("90210", ("LA-DMA", "CA"));
        m.insert("90012", ("LA-DMA", "CA"));
        m.insert("94102", ("SF-DMA", "CA"));
        m.insert("94607", ("SF-DMA", "CA"));
        m.insert("85001", ("PHX-DMA", "AZ"));
        m.insert("85004", ("PHX-DMA", "AZ"));
        m.insert("84101", ("SLC-DMA", "UT"));

        // Midwest
        m.insert("60601", ("CHI-DMA", "IL"));
        m.insert("60614", ("CHI-DMA", "IL"));

        // Northeast
        m.insert("02108", ("BOS-DMA", "MA"));
        m.insert("02115", ("BOS-DMA", "MA"));
        m.insert("10001", ("NY-DMA", "NY"));

        m
    });

#[derive(Debug, Clone)]
pub struct MarketDirectory {
    by_zip: HashMap<String, Market>,
}

impl Default for MarketDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MarketDirectory {
    pub fn builtin() -> Self {
        Self::from_markets(ZIP_MARKETS.iter().map(|(zip, (dma, state))| Market {
            zip: zip.to_string(),
            dma: dma.to_string(),
            state: state.to_string(),
        }))
    }

    pub fn from_markets(markets: impl IntoIterator<Item = Market>) -> Self {
        Self {
            by_zip: markets.into_iter().map(|m| (m.zip.clone(), m)).collect(),
        }
    }

    pub fn market(&self, zip: &str) -> Option<&Market> {
        self.by_zip.get(zip)
    }

    pub fn dma_for(&self, zip: &str) -> Option<&str> {
        self.market(zip).map(|m| m.dma.as_str())
    }

    /// All ZIPs in a DMA, sorted
    pub fn zips_in(&self, dma: &str) -> Vec<&str> {
        let mut zips: Vec<&str> = self
            .by_zip
            .values()
            .filter(|m| m.dma.eq_ignore_ascii_case(dma))
            .map(|m| m.zip.as_str())
            .collect();
        zips.sort_unstable();
        zips
    }
}

fn rule_matches(rule: &MappingRule, game: &Game) -> bool {
    rule.sport.eq_ignore_ascii_case(&game.sport)
        && (rule.team.eq_ignore_ascii_case(&game.home_team)
            || rule.team.eq_ignore_ascii_case(&game.away_team))
}

/// Add ZIP overrides for every rule covering one of the game's teams.
/// Existing overrides are kept. Returns the number of overrides added.
pub fn apply_rules(game: &mut Game, rules: &[MappingRule], directory: &MarketDirectory) -> usize {
    let matching: Vec<&MappingRule> = rules.iter().filter(|r| rule_matches(r, game)).collect();
    let mut added = 0;
    for rule in matching {
        for zip in directory.zips_in(&rule.region) {
            let Ok(key) = LocationKey::parse_zip(zip) else {
                continue;
            };
            if !game.regional_overrides.contains_key(&key) {
                game.regional_overrides.insert(key, rule.channel.clone());
                added += 1;
            }
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_channel;
    use crate::rules::RuleTable;
    use crate::sample;

    #[test]
    fn test_known_zip() {
        let dir = MarketDirectory::builtin();
        assert_eq!(dir.dma_for("90210"), Some("LA-DMA"));
        assert_eq!(dir.market("02108").map(|m| m.state.as_str()), Some("MA"));
    }

    #[test]
    fn test_unknown_zip() {
        assert_eq!(MarketDirectory::builtin().dma_for("99999"), None);
    }

    #[test]
    fn test_zips_in_dma() {
        let dir = MarketDirectory::builtin();
        assert_eq!(dir.zips_in("bos-dma"), vec!["02108", "02115"]);
        assert!(dir.zips_in("NOWHERE").is_empty());
    }

    #[test]
    fn test_apply_rules_projects_dma_into_zips() {
        let rules = RuleTable::from_new_rules(sample::dma_rules());
        let mut game = sample::unvalidated_games().remove(0);

        let added = apply_rules(&mut game, rules.list_rules(), &MarketDirectory::builtin());
        // LAL -> LA-DMA (2 zips), BOS -> BOS-DMA (2 zips)
        assert_eq!(added, 4);

        let zip = LocationKey::parse_zip("02115").unwrap();
        assert_eq!(resolve_channel(&game, Some(&zip)), Ok("NBC Sports Boston"));
        let zip = LocationKey::parse_zip("60601").unwrap();
        assert_eq!(resolve_channel(&game, Some(&zip)), Ok("NBA League Pass"));
    }

    #[test]
    fn test_apply_rules_keeps_explicit_overrides() {
        let rules = RuleTable::from_new_rules(sample::dma_rules());
        let mut game = sample::schedule().remove(0);
        apply_rules(&mut game, rules.list_rules(), &MarketDirectory::builtin());

        let zip = LocationKey::parse_zip("90210").unwrap();
        assert_eq!(resolve_channel(&game, Some(&zip)), Ok("Spectrum SportsNet"));
        assert_eq!(
            game.regional_overrides.get(&LocationKey::parse_zip("90012").unwrap()).map(String::as_str),
            Some("Spectrum SportsNet")
        );
    }

    #[test]
    fn test_apply_rules_ignores_other_sports() {
        let mut rules = RuleTable::from_new_rules(sample::dma_rules());
        rules.delete_rule(0).unwrap();
        rules.delete_rule(0).unwrap();
        let mut game = sample::schedule().remove(1);
        assert_eq!(apply_rules(&mut game, rules.list_rules(), &MarketDirectory::builtin()), 0);
    }
}

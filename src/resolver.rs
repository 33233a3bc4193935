//! Schedule resolver
//!
//! Picks the channel a viewer should tune to for each game: the game's
//! override for the viewer's ZIP when one exists, otherwise its `default`.

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::location::LocationKey;
use crate::models::Game;

/// One row of the viewer schedule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedGame {
    pub game_id: String,
    pub scheduled_time: String,
    pub matchup: String,
    pub national_channels: String,
    pub local_channel: String,
    /// True when the local channel came from a ZIP-specific override
    pub is_regional: bool,
}

pub fn resolve_channel<'g>(
    game: &'g Game,
    location: Option<&LocationKey>,
) -> Result<&'g str, ResolveError> {
    if let Some(channel) = location.and_then(|key| game.regional_overrides.get(key)) {
        return Ok(channel);
    }
    game.default_channel().ok_or_else(|| ResolveError::MissingDefault {
        game: game.matchup.clone(),
    })
}

pub fn resolve_game(game: &Game, location: Option<&LocationKey>) -> Result<ResolvedGame, ResolveError> {
    let local_channel = resolve_channel(game, location)?;
    let is_regional = location
        .filter(|key| !key.is_default())
        .is_some_and(|key| game.regional_overrides.contains_key(key));

    Ok(ResolvedGame {
        game_id: game.id.clone(),
        scheduled_time: game.scheduled_time.clone(),
        matchup: game.matchup.clone(),
        national_channels: game.national_channels.clone(),
        local_channel: local_channel.to_string(),
        is_regional,
    })
}

/// Resolve every game in order; fails on the first game without a default.
pub fn resolve_schedule(
    games: &[Game],
    location: Option<&LocationKey>,
) -> Result<Vec<ResolvedGame>, ResolveError> {
    games.iter().map(|g| resolve_game(g, location)).collect()
}

/// Label shown next to the schedule for the active location
pub fn location_label(location: Option<&LocationKey>) -> String {
    match location {
        Some(LocationKey::Zip(zip)) => format!("ZIP: {}", zip),
        _ => "[Default: US National Feed]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationKey;
    use crate::models::RegionalOverrides;

    fn zip(z: &str) -> LocationKey {
        LocationKey::parse_zip(z).unwrap()
    }

    fn lakers_celtics() -> Game {
        let mut overrides = RegionalOverrides::new();
        overrides.insert(LocationKey::Default, "NBA League Pass".to_string());
        overrides.insert(zip("90210"), "Spectrum SportsNet".to_string());
        Game {
            id: "LAL_BOS_Dec10".to_string(),
            sport: "NBA".to_string(),
            scheduled_time: "7:00 PM CST".to_string(),
            matchup: "Lakers @ Celtics".to_string(),
            away_team: "LAL".to_string(),
            home_team: "BOS".to_string(),
            national_channels: "ESPN, ESPN+".to_string(),
            regional_overrides: overrides,
            regional_placeholder: None,
            is_validated: true,
        }
    }

    #[test]
    fn test_no_location_uses_default() {
        let game = lakers_celtics();
        assert_eq!(resolve_channel(&game, None), Ok("NBA League Pass"));
    }

    #[test]
    fn test_known_zip_uses_override() {
        let game = lakers_celtics();
        assert_eq!(resolve_channel(&game, Some(&zip("90210"))), Ok("Spectrum SportsNet"));
    }

    #[test]
    fn test_unknown_zip_falls_back_to_default() {
        let game = lakers_celtics();
        assert_eq!(resolve_channel(&game, Some(&zip("99999"))), Ok("NBA League Pass"));
    }

    #[test]
    fn test_default_sentinel_resolves_to_default() {
        let game = lakers_celtics();
        assert_eq!(
            resolve_channel(&game, Some(&LocationKey::Default)),
            Ok("NBA League Pass")
        );
    }

    #[test]
    fn test_missing_default_is_an_error() {
        let mut game = lakers_celtics();
        game.regional_overrides.remove(&LocationKey::Default);
        assert_eq!(
            resolve_channel(&game, Some(&zip("02108"))),
            Err(ResolveError::MissingDefault {
                game: "Lakers @ Celtics".to_string()
            })
        );
        // a matching override still resolves
        assert_eq!(resolve_channel(&game, Some(&zip("90210"))), Ok("Spectrum SportsNet"));
    }

    #[test]
    fn test_every_override_resolves_to_itself() {
        let game = lakers_celtics();
        for (key, channel) in &game.regional_overrides {
            assert_eq!(resolve_channel(&game, Some(key)), Ok(channel.as_str()));
        }
    }

    #[test]
    fn test_resolve_schedule_marks_regional_rows() {
        let games = vec![lakers_celtics()];
        let rows = resolve_schedule(&games, Some(&zip("90210"))).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_regional);

        let rows = resolve_schedule(&games, None).unwrap();
        assert!(!rows[0].is_regional);
        assert_eq!(rows[0].local_channel, "NBA League Pass");
    }

    #[test]
    fn test_location_label() {
        assert_eq!(location_label(Some(&zip("90210"))), "ZIP: 90210");
        assert_eq!(location_label(None), "[Default: US National Feed]");
    }
}

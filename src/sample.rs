//! Built-in sample schedule, review queue and DMA rules
//!
//! Used when the server starts without a rules file and by the viewer CLI
//! when no server is configured.

use crate::location::LocationKey;
use crate::models::{Game, NewRule, RegionalOverrides};

fn overrides(entries: &[(&str, &str)]) -> RegionalOverrides {
    entries
        .iter()
        .filter_map(|(key, channel)| {
            key.parse::<LocationKey>()
                .ok()
                .map(|k| (k, channel.to_string()))
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn game(
    id: &str,
    sport: &str,
    time: &str,
    matchup: &str,
    away: &str,
    home: &str,
    national: &str,
    regional: &[(&str, &str)],
    is_validated: bool,
) -> Game {
    Game {
        id: id.to_string(),
        sport: sport.to_string(),
        scheduled_time: time.to_string(),
        matchup: matchup.to_string(),
        away_team: away.to_string(),
        home_team: home.to_string(),
        national_channels: national.to_string(),
        regional_overrides: overrides(regional),
        regional_placeholder: None,
        is_validated,
    }
}

/// Published schedule
pub fn schedule() -> Vec<Game> {
    vec![
        game(
            "LAL_BOS_Dec09",
            "NBA",
            "7:00 PM CST",
            "Lakers @ Celtics (NBA)",
            "LAL",
            "BOS",
            "ESPN, ESPN+",
            &[
                ("90210", "Spectrum SportsNet"),
                ("02108", "NBC Sports Boston"),
                ("default", "NBA League Pass"),
            ],
            true,
        ),
        game(
            "TOT_CHE_Dec09",
            "EPL",
            "1:30 PM CST",
            "Tottenham vs Chelsea (EPL)",
            "CHE",
            "TOT",
            "USA Network, Peacock",
            &[("default", "Peacock Premium")],
            true,
        ),
        game(
            "GSW_PHX_Dec09",
            "NBA",
            "9:00 PM CST",
            "Warriors @ Suns (NBA)",
            "GSW",
            "PHX",
            "NBA TV",
            &[
                ("90210", "NBC Sports Bay Area"),
                ("85001", "Suns Live (Local Stream)"),
                ("default", "NBA League Pass"),
            ],
            true,
        ),
    ]
}

/// Games still waiting for an admin to map their regional feed
pub fn unvalidated_games() -> Vec<Game> {
    vec![
        game(
            "LAL_BOS_Dec10",
            "NBA",
            "Dec 10",
            "Lakers @ Celtics (NBA)",
            "LAL",
            "BOS",
            "NBA TV",
            &[("default", "NBA League Pass")],
            false,
        ),
        game(
            "UTA_PHX_Dec11",
            "NBA",
            "Dec 11",
            "Jazz @ Suns (NBA)",
            "UTA",
            "PHX",
            "League Pass",
            &[("default", "NBA League Pass")],
            false,
        ),
    ]
}

pub fn dma_rules() -> Vec<NewRule> {
    vec![
        NewRule::new("LA-DMA", "LAL", "NBA", "Spectrum SportsNet"),
        NewRule::new("BOS-DMA", "BOS", "NBA", "NBC Sports Boston"),
        NewRule::new("CHI-DMA", "CHI", "NBA", "NBC Sports Chicago"),
    ]
}

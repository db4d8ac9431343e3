use std::str::FromStr;

use crate::error::CleanError;

/// Whether each output row is one team's or one player's performance in one
/// game. Everything size-related in the pipeline derives from this: the row
/// gap to the positional opponent, the expected rows per game, the sort keys
/// and the output schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    Team,
    Player,
}

impl Granularity {
    /// Row distance to the positional opponent in the sorted sequence.
    /// Teams alternate (Blue, Red), players are five rows apart (a bot laner
    /// to the opposing bot laner).
    pub fn gap(self) -> usize {
        match self {
            Granularity::Team => 1,
            Granularity::Player => 5,
        }
    }

    /// Well-formed games contribute exactly this many rows: two team rows,
    /// or two sides of five players.
    pub fn rows_per_game(self) -> usize {
        self.gap() * 2
    }

    /// Canonical sort keys. The opponent enricher depends on this ordering:
    /// within one game the first side's rows are contiguous and precede the
    /// second side's in the same position order.
    pub fn sort_keys(self) -> &'static [&'static str] {
        match self {
            Granularity::Team => &["league", "date", "gameid", "side"],
            Granularity::Player => &["league", "date", "gameid", "side", "position"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Team => "team",
            Granularity::Player => "player",
        }
    }
}

impl FromStr for Granularity {
    type Err = CleanError;

    fn from_str(raw: &str) -> Result<Granularity, CleanError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "team" => Ok(Granularity::Team),
            "player" => Ok(Granularity::Player),
            _ => Err(CleanError::InvalidGranularity(raw.to_string())),
        }
    }
}

/// Team-level output schema, before the opponent columns. Column names are
/// the upstream dataset's own, embedded spaces included.
pub const TEAM_COLUMNS: &[&str] = &[
    "date",
    "gameid",
    "side",
    "league",
    "patch",
    "teamname",
    "teamid",
    "result",
    "kills",
    "deaths",
    "assists",
    "egpm",
    "gamelength",
    "ckpm",
    "team kpm",
    "firstblood",
    "dragons",
    "barons",
    "towers",
    "goldat15",
    "xpat15",
    "csat15",
    "golddiffat15",
    "xpdiffat15",
    "csdiffat15",
];

/// Player-level output schema, before the opponent columns.
pub const PLAYER_COLUMNS: &[&str] = &[
    "date",
    "gameid",
    "side",
    "position",
    "league",
    "patch",
    "playername",
    "playerid",
    "teamname",
    "teamid",
    "result",
    "kills",
    "deaths",
    "assists",
    "total cs",
    "egpm",
    "earnedgoldshare",
    "damagetochampions",
    "dpm",
    "damageshare",
    "damagetakenperminute",
    "wardsplaced",
    "wpm",
    "wardskilled",
    "wcpm",
    "controlwardsbought",
    "visionscore",
    "vspm",
    "totalgold",
    "monsterkills",
    "minionkills",
    "gamelength",
    "ckpm",
    "cspm",
    "team kpm",
    "goldat15",
    "xpat15",
    "csat15",
    "killsat15",
    "assistsat15",
    "deathsat15",
    "opp_killsat15",
    "opp_assistsat15",
    "opp_deathsat15",
    "golddiffat15",
    "xpdiffat15",
    "csdiffat15",
];

/// Full output column list for a granularity: the base schema plus the
/// enriched opponent columns for the configured rate metric.
pub fn output_columns(granularity: Granularity, rate_metric: &str) -> Vec<String> {
    let base = match granularity {
        Granularity::Team => TEAM_COLUMNS,
        Granularity::Player => PLAYER_COLUMNS,
    };
    let mut out: Vec<String> = base.iter().map(|c| c.to_string()).collect();
    out.push("opponentteam".to_string());
    out.push("opponentteamid".to_string());
    out.push(format!("opponent_{rate_metric}"));
    if granularity == Granularity::Player {
        out.push("opponentname".to_string());
        out.push("opponentid".to_string());
    }
    out
}

use tracing::debug;

use crate::error::CleanError;
use crate::schema::Granularity;
use crate::table::{Cell, Table};

const UNKNOWN_PLAYER: &str = "unknown player";
const UNKNOWN_TEAM: &str = "unknown team";

/// Position value carried by team-summary rows in the raw export. Player
/// rows carry a lane instead.
const TEAM_POSITION: &str = "team";

/// Drop every row whose game id is missing. A row without a game id cannot
/// be grouped or paired, so it never reaches the later stages.
pub fn drop_missing_game_ids(mut table: Table) -> Result<Table, CleanError> {
    let gameid = table.require_column("gameid")?;
    let dropped = table.retain_rows(|row| !row[gameid].is_missing());
    if dropped > 0 {
        debug!(dropped, "removed rows with missing game ids");
    }
    Ok(table)
}

/// Drop rows naming the reserved "unknown player"/"unknown team" sentinel
/// entities. Both checks apply at either granularity, matching the raw
/// export where team rows still carry a (missing) player column.
pub fn drop_unknown_entities(mut table: Table) -> Result<Table, CleanError> {
    let player = table.column_index("playername");
    let team = table.column_index("teamname");
    let dropped = table.retain_rows(|row| {
        let unknown_player = player.is_some_and(|c| row[c].as_str() == Some(UNKNOWN_PLAYER));
        let unknown_team = team.is_some_and(|c| row[c].as_str() == Some(UNKNOWN_TEAM));
        !unknown_player && !unknown_team
    });
    if dropped > 0 {
        debug!(dropped, "removed rows for unknown entities");
    }
    Ok(table)
}

/// Keep only the rows belonging to the requested granularity: the raw data
/// interleaves ten player rows and two team-summary rows per game, told
/// apart by the position column. Must run before any per-game row counting.
pub fn split_granularity(mut table: Table, granularity: Granularity) -> Result<Table, CleanError> {
    let position = table.require_column("position")?;
    table.retain_rows(|row| {
        let is_team_row = row[position].as_str() == Some(TEAM_POSITION);
        match granularity {
            Granularity::Team => is_team_row,
            Granularity::Player => !is_team_row,
        }
    });
    Ok(table)
}

/// Remove every row of any game whose row count differs from the expected
/// count for the granularity (2 team rows, or 10 player rows). Partial or
/// duplicated games would otherwise break the positional pairing invariant.
pub fn remove_inconsistent_games(
    mut table: Table,
    granularity: Granularity,
) -> Result<Table, CleanError> {
    let gameid = table.require_column("gameid")?;
    let expected = granularity.rows_per_game();
    let counts = table.value_counts(gameid);
    let dropped = table.retain_rows(|row| {
        counts
            .get(&row[gameid].render())
            .is_some_and(|&n| n == expected)
    });
    if dropped > 0 {
        debug!(
            dropped,
            expected, "removed rows from games with inconsistent record counts"
        );
    }
    Ok(table)
}

/// Fill missing ids from the display name: `teamid` from `teamname`, and at
/// player granularity `playerid` from `playername` as well. Reapplying is a
/// no-op.
pub fn backfill_ids(table: &mut Table, granularity: Granularity) -> Result<(), CleanError> {
    backfill_column(table, "teamid", "teamname")?;
    if granularity == Granularity::Player {
        backfill_column(table, "playerid", "playername")?;
    }
    Ok(())
}

fn backfill_column(table: &mut Table, id: &str, name: &str) -> Result<(), CleanError> {
    let id_col = table.require_column(id)?;
    let name_col = table.require_column(name)?;
    let names = table.column_values(name_col);
    let mut names = names.into_iter();
    table.map_column(id_col, |cell| {
        let name = names.next().unwrap_or(Cell::Missing);
        if cell.is_missing() {
            *cell = name;
        }
    });
    Ok(())
}

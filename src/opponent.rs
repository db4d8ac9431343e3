use tracing::info;

use crate::error::CleanError;
use crate::schema::Granularity;
use crate::table::{Cell, Table};

/// How the enricher locates each row's opponent in the sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairingMode {
    /// Pair rows within each game group. Requires the consistency filter to
    /// have run first, and stays correct even if it has not (ragged games
    /// fail loudly instead of silently shifting later games).
    #[default]
    Grouped,
    /// Behavioral parity with the original pipeline: a running cursor over
    /// the whole row sequence with a repeating cycle of length `2 * gap`,
    /// never reset at game boundaries. One game with a non-standard row
    /// count desynchronizes every pairing after it.
    LegacyCursor,
}

/// Add the opponent columns to a sorted table: for every row, the values
/// held by the row `gap` positions across the same game (`opponentteam`,
/// `opponentteamid`, `opponent_<metric>`, and at player granularity
/// `opponentname` and `opponentid`).
pub fn enrich_opponents(
    mut table: Table,
    granularity: Granularity,
    rate_metric: &str,
    mode: PairingMode,
) -> Result<Table, CleanError> {
    info!(
        granularity = granularity.as_str(),
        ?mode,
        "calculating opponent values"
    );
    let partners = match mode {
        PairingMode::Grouped => grouped_partners(&table, granularity)?,
        PairingMode::LegacyCursor => cursor_partners(table.n_rows(), granularity.gap())?,
    };

    let mut pairs = vec![
        ("teamname", "opponentteam".to_string()),
        ("teamid", "opponentteamid".to_string()),
        (rate_metric, format!("opponent_{rate_metric}")),
    ];
    if granularity == Granularity::Player {
        pairs.push(("playername", "opponentname".to_string()));
        pairs.push(("playerid", "opponentid".to_string()));
    }

    for (source, target) in pairs {
        let col = table.require_column(source)?;
        let values = table.column_values(col);
        let opponents: Vec<Cell> = partners.iter().map(|&p| values[p].clone()).collect();
        table.push_column(&target, opponents);
    }
    Ok(table)
}

/// Opponent row index for every row, assuming the fixed repeating pattern:
/// rows in the first half of each `2 * gap` cycle read `gap` rows ahead,
/// rows in the second half read `gap` rows back. The cycle is a pure running
/// counter over the full dataset.
pub fn cursor_partners(len: usize, gap: usize) -> Result<Vec<usize>, CleanError> {
    let cycle = gap * 2;
    let mut partners = Vec::with_capacity(len);
    for i in 0..len {
        let partner = if i % cycle < gap { i + gap } else { i - gap };
        if partner >= len {
            return Err(CleanError::IndexOutOfRange { index: i });
        }
        partners.push(partner);
    }
    Ok(partners)
}

/// Opponent row index for every row, pairing within contiguous `gameid`
/// groups. Each group must hold exactly `2 * gap` rows; a group of any other
/// size is reported as out of range at its first row instead of corrupting
/// the pairing of later games.
fn grouped_partners(table: &Table, granularity: Granularity) -> Result<Vec<usize>, CleanError> {
    let gameid = table.require_column("gameid")?;
    let gap = granularity.gap();
    let expected = granularity.rows_per_game();
    let rows = table.rows();

    let mut partners = Vec::with_capacity(rows.len());
    let mut start = 0;
    while start < rows.len() {
        let mut end = start + 1;
        while end < rows.len() && rows[end][gameid] == rows[start][gameid] {
            end += 1;
        }
        if end - start != expected {
            return Err(CleanError::IndexOutOfRange { index: start });
        }
        for i in start..end {
            let local = i - start;
            let partner = if local < gap { i + gap } else { i - gap };
            partners.push(partner);
        }
        start = end;
    }
    Ok(partners)
}

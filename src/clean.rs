use std::collections::HashMap;

use serde::Deserialize;
use tracing::info;

use crate::error::CleanError;
use crate::filter;
use crate::normalize;
use crate::opponent::{self, PairingMode};
use crate::schema::{self, Granularity};
use crate::table::Table;

/// Configuration for one cleaning run. No process-wide state exists; every
/// knob travels through this struct.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CleanOptions {
    /// Old display name to new display name, for teams renamed over time.
    pub team_replacements: HashMap<String, String>,
    /// Old display name to new display name, for players renamed over time.
    pub player_replacements: HashMap<String, String>,
    /// Which rate metric to mirror into `opponent_<metric>`.
    pub rate_metric: String,
    /// Opponent pairing strategy. [`PairingMode::Grouped`] also moves the
    /// consistency filter in front of enrichment, which is the fixed
    /// ordering; the legacy mode reproduces the original enrich-then-filter
    /// pipeline for parity.
    #[serde(skip)]
    pub pairing: PairingMode,
}

impl Default for CleanOptions {
    fn default() -> CleanOptions {
        CleanOptions {
            team_replacements: HashMap::new(),
            player_replacements: HashMap::new(),
            rate_metric: "egpm".to_string(),
            pairing: PairingMode::default(),
        }
    }
}

/// Run the full cleaning pipeline over a raw match table and return the
/// per-entity dataset for the requested granularity.
///
/// Stages, in order: type normalization (with optional name overrides), row
/// filtering, the team/player split, the stable sort, identifier backfill,
/// then consistency filtering and opponent enrichment (their relative order
/// set by [`CleanOptions::pairing`]), and finally projection onto the
/// granularity's schema. Each stage consumes and returns the table; any
/// error aborts the run with no partial output.
pub fn clean(
    table: Table,
    granularity: Granularity,
    options: &CleanOptions,
) -> Result<Table, CleanError> {
    let rows_in = table.n_rows();
    let table = normalize::normalize_types(
        table,
        &options.team_replacements,
        &options.player_replacements,
    )?;
    let table = filter::drop_missing_game_ids(table)?;
    let table = filter::drop_unknown_entities(table)?;
    let table = filter::split_granularity(table, granularity)?;
    let mut table = sort_rows(table, granularity)?;
    filter::backfill_ids(&mut table, granularity)?;

    let table = match options.pairing {
        PairingMode::Grouped => {
            let table = filter::remove_inconsistent_games(table, granularity)?;
            opponent::enrich_opponents(table, granularity, &options.rate_metric, options.pairing)?
        }
        PairingMode::LegacyCursor => {
            let table =
                opponent::enrich_opponents(table, granularity, &options.rate_metric, options.pairing)?;
            filter::remove_inconsistent_games(table, granularity)?
        }
    };

    let out = table.select(&schema::output_columns(granularity, &options.rate_metric))?;
    info!(
        granularity = granularity.as_str(),
        rows_in,
        rows_out = out.n_rows(),
        "cleaned match dataset"
    );
    Ok(out)
}

/// Canonical row order: by league, date, game id and side (plus position at
/// player granularity). Stable, so ties keep their original relative order.
/// All positional pairing downstream depends on this.
fn sort_rows(mut table: Table, granularity: Granularity) -> Result<Table, CleanError> {
    let mut keys = Vec::new();
    for name in granularity.sort_keys() {
        keys.push(table.require_column(name)?);
    }
    table.sort_rows_by(&keys);
    Ok(table)
}

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::CleanError;
use crate::table::{Cell, Table};

/// Identifier columns that get whitespace-trimmed and sentinel-scrubbed.
const ID_COLUMNS: &[&str] = &["gameid", "playerid", "teamid"];

/// Columns where the upstream export writes literal `""`/`"nan"`/`"null"`
/// for absent values.
const SENTINEL_COLUMNS: &[&str] = &["gameid", "playerid", "teamid", "position"];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// First pipeline stage: canonical types, canonical missing values.
///
/// Parses the `date` column, trims identifier columns, folds the empty /
/// "nan" / "null" string sentinels into [`Cell::Missing`], converts
/// `gamelength` from seconds to minutes, renames `earned gpm` to `egpm`,
/// and applies the optional display-name overrides. Removes no rows.
pub fn normalize_types(
    mut table: Table,
    team_replacements: &HashMap<String, String>,
    player_replacements: &HashMap<String, String>,
) -> Result<Table, CleanError> {
    apply_replacements(&mut table, "teamname", team_replacements);
    apply_replacements(&mut table, "playername", player_replacements);

    // The upstream export spells the metric with a space; everything
    // downstream (including the opponent columns) expects `egpm`.
    table.rename_column("earned gpm", "egpm");

    let date_col = table.require_column("date")?;
    table.try_map_column(date_col, parse_date_cell)?;

    for name in ID_COLUMNS {
        if let Some(col) = table.column_index(name) {
            table.map_column(col, trim_text_cell);
        }
    }
    for name in SENTINEL_COLUMNS {
        if let Some(col) = table.column_index(name) {
            table.map_column(col, scrub_sentinel_cell);
        }
    }

    if let Some(col) = table.column_index("gamelength") {
        table.try_map_column(col, seconds_to_minutes)?;
    }

    Ok(table)
}

fn parse_date_cell(cell: &mut Cell) -> Result<(), CleanError> {
    let raw = match cell {
        Cell::Text(s) => s.clone(),
        // Already parsed, or genuinely absent.
        Cell::Date(_) | Cell::Missing => return Ok(()),
        Cell::Num(n) => n.to_string(),
    };
    let parsed = NaiveDateTime::parse_from_str(raw.trim(), DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| CleanError::Format {
            column: "date".to_string(),
            value: raw.clone(),
        })?;
    *cell = Cell::Date(parsed);
    Ok(())
}

fn trim_text_cell(cell: &mut Cell) {
    if let Cell::Text(s) = cell {
        let trimmed = s.trim();
        if trimmed.len() != s.len() {
            *s = trimmed.to_string();
        }
    }
}

fn scrub_sentinel_cell(cell: &mut Cell) {
    if let Cell::Text(s) = cell
        && matches!(s.as_str(), "" | "nan" | "null")
    {
        *cell = Cell::Missing;
    }
}

fn seconds_to_minutes(cell: &mut Cell) -> Result<(), CleanError> {
    match cell {
        Cell::Num(n) => {
            *n /= 60.0;
            Ok(())
        }
        Cell::Missing => Ok(()),
        Cell::Text(s) => Err(CleanError::Format {
            column: "gamelength".to_string(),
            value: s.clone(),
        }),
        Cell::Date(d) => Err(CleanError::Format {
            column: "gamelength".to_string(),
            value: d.to_string(),
        }),
    }
}

fn apply_replacements(table: &mut Table, column: &str, replacements: &HashMap<String, String>) {
    if replacements.is_empty() {
        return;
    }
    let Some(col) = table.column_index(column) else {
        return;
    };
    table.map_column(col, |cell| {
        if let Cell::Text(name) = cell
            && let Some(renamed) = replacements.get(name.as_str())
        {
            *name = renamed.clone();
        }
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::normalize_types;
    use crate::error::CleanError;
    use crate::table::{Cell, Table};

    fn table_with(columns: &[&str], rows: Vec<Vec<Cell>>) -> Table {
        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    #[test]
    fn parses_dates_and_minutes() {
        let table = table_with(
            &["date", "gameid", "gamelength"],
            vec![vec![text("2023-05-14 17:02:11"), text(" g1 "), Cell::Num(600.0)]],
        );
        let out = normalize_types(table, &HashMap::new(), &HashMap::new()).unwrap();
        assert!(matches!(out.cell(0, 0), Cell::Date(_)));
        assert_eq!(out.cell(0, 1).as_str(), Some("g1"));
        assert_eq!(out.cell(0, 2).as_num(), Some(10.0));
    }

    #[test]
    fn unparsable_date_aborts() {
        let table = table_with(&["date"], vec![vec![text("yesterday")]]);
        let err = normalize_types(table, &HashMap::new(), &HashMap::new()).unwrap_err();
        assert!(matches!(err, CleanError::Format { column, .. } if column == "date"));
    }

    #[test]
    fn sentinels_become_missing() {
        let table = table_with(
            &["date", "gameid", "teamid", "position"],
            vec![vec![text("2023-05-14"), text("nan"), text("null"), text("top")]],
        );
        let out = normalize_types(table, &HashMap::new(), &HashMap::new()).unwrap();
        assert!(out.cell(0, 1).is_missing());
        assert!(out.cell(0, 2).is_missing());
        assert_eq!(out.cell(0, 3).as_str(), Some("top"));
    }

    #[test]
    fn name_overrides_apply_before_anything_else() {
        let mut replacements = HashMap::new();
        replacements.insert("Dignitas".to_string(), "DIG".to_string());
        let table = table_with(
            &["date", "teamname"],
            vec![vec![text("2023-05-14"), text("Dignitas")]],
        );
        let out = normalize_types(table, &replacements, &HashMap::new()).unwrap();
        assert_eq!(out.cell(0, 1).as_str(), Some("DIG"));
    }

    #[test]
    fn earned_gpm_is_renamed() {
        let table = table_with(&["date", "earned gpm"], vec![]);
        let out = normalize_types(table, &HashMap::new(), &HashMap::new()).unwrap();
        assert!(out.column_index("egpm").is_some());
        assert!(out.column_index("earned gpm").is_none());
    }
}

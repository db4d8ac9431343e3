use oe_dataset::schema::{PLAYER_COLUMNS, output_columns};
use oe_dataset::{Cell, CleanOptions, Granularity, Table, clean};

/// Lanes as the raw export spells them. The stable sort orders them
/// alphabetically within each side, identically for both sides, which is
/// what makes the five-row opponent gap line up position against position.
const POSITIONS: &[&str] = &["top", "jng", "mid", "bot", "sup"];

fn raw_columns() -> Vec<String> {
    let mut cols: Vec<String> = PLAYER_COLUMNS.iter().map(|c| c.to_string()).collect();
    let egpm = cols.iter().position(|c| c == "egpm").unwrap();
    cols[egpm] = "earned gpm".to_string();
    cols
}

/// Ten player rows plus two team-summary rows for one game, the way one
/// game appears in the raw export.
fn push_game(table: &mut Table, game: &str, blue: &str, red: &str) {
    let columns: Vec<String> = table.columns().to_vec();
    let mut push = |side: &str, team: &str, position: &str, player: String| {
        let cells = columns
            .iter()
            .map(|name| match name.as_str() {
                "date" => Cell::Text("2023-05-14 17:00:00".to_string()),
                "gameid" => Cell::Text(game.to_string()),
                "side" => Cell::Text(side.to_string()),
                "position" => Cell::Text(position.to_string()),
                "league" => Cell::Text("LCK".to_string()),
                "playername" => {
                    if position == "team" {
                        Cell::Missing
                    } else {
                        Cell::Text(player.clone())
                    }
                }
                "playerid" => Cell::Missing,
                "teamname" => Cell::Text(team.to_string()),
                "teamid" => Cell::Text(format!("oe:team:{team}")),
                "earned gpm" => Cell::Num(250.0),
                "gamelength" => Cell::Num(1920.0),
                _ => Cell::Num(2.0),
            })
            .collect();
        table.push_row(cells);
    };
    for (team, side) in [(blue, "Blue"), (red, "Red")] {
        for position in POSITIONS {
            push(side, team, position, format!("{team} {position}"));
        }
        push(side, team, "team", String::new());
    }
}

fn col(table: &Table, name: &str) -> usize {
    table
        .column_index(name)
        .unwrap_or_else(|| panic!("missing column {name}"))
}

#[test]
fn players_pair_with_the_opposing_lane() {
    let mut raw = Table::new(raw_columns());
    push_game(&mut raw, "g1", "Alpha", "Beta");
    let out = clean(raw, Granularity::Player, &CleanOptions::default()).unwrap();
    assert_eq!(out.n_rows(), 10);

    let position = col(&out, "position");
    let name = col(&out, "playername");
    let opp_name = col(&out, "opponentname");
    let opp_team = col(&out, "opponentteam");
    for i in 0..out.n_rows() {
        let lane = out.cell(i, position).as_str().unwrap();
        let player = out.cell(i, name).as_str().unwrap();
        let opponent = out.cell(i, opp_name).as_str().unwrap();
        // Same lane, other team.
        assert!(opponent.ends_with(lane));
        assert_ne!(player, opponent);
        assert_ne!(
            out.cell(i, opp_team).as_str(),
            out.cell(i, col(&out, "teamname")).as_str()
        );
    }
}

#[test]
fn team_summary_rows_are_excluded_from_player_output() {
    let mut raw = Table::new(raw_columns());
    push_game(&mut raw, "g1", "Alpha", "Beta");
    let out = clean(raw, Granularity::Player, &CleanOptions::default()).unwrap();

    let position = col(&out, "position");
    assert!(
        out.rows()
            .iter()
            .all(|r| r[position].as_str() != Some("team"))
    );
}

#[test]
fn player_output_schema_includes_opponent_player_columns() {
    let mut raw = Table::new(raw_columns());
    push_game(&mut raw, "g1", "Alpha", "Beta");
    push_game(&mut raw, "g2", "Gamma", "Delta");
    let out = clean(raw, Granularity::Player, &CleanOptions::default()).unwrap();
    assert_eq!(out.columns(), output_columns(Granularity::Player, "egpm"));
    assert_eq!(out.n_rows(), 20);
}

#[test]
fn player_ids_are_backfilled_from_player_names() {
    let mut raw = Table::new(raw_columns());
    push_game(&mut raw, "g1", "Alpha", "Beta");
    let out = clean(raw, Granularity::Player, &CleanOptions::default()).unwrap();

    let id = col(&out, "playerid");
    let name = col(&out, "playername");
    for row in out.rows() {
        assert_eq!(row[id].as_str(), row[name].as_str());
    }
}

#[test]
fn games_missing_a_player_row_are_dropped() {
    let mut raw = Table::new(raw_columns());
    push_game(&mut raw, "g1", "Alpha", "Beta");
    push_game(&mut raw, "g2", "Gamma", "Delta");
    // Sever one player row from g2: nine player rows is not a game.
    let mut rows = raw.rows().to_vec();
    let gameid = col(&raw, "gameid");
    let position = col(&raw, "position");
    let victim = rows
        .iter()
        .position(|r| r[gameid].as_str() == Some("g2") && r[position].as_str() == Some("mid"))
        .unwrap();
    rows.remove(victim);
    let mut broken = Table::new(raw.columns().to_vec());
    for row in rows {
        broken.push_row(row);
    }

    let out = clean(broken, Granularity::Player, &CleanOptions::default()).unwrap();
    assert_eq!(out.n_rows(), 10);
    let game = col(&out, "gameid");
    assert!(out.rows().iter().all(|r| r[game].as_str() == Some("g1")));
}

#[test]
fn configurable_rate_metric_enriches_that_column() {
    let options = CleanOptions {
        rate_metric: "dpm".to_string(),
        ..CleanOptions::default()
    };
    let mut raw = Table::new(raw_columns());
    push_game(&mut raw, "g1", "Alpha", "Beta");
    let out = clean(raw, Granularity::Player, &options).unwrap();

    let opp_dpm = col(&out, "opponent_dpm");
    assert!(out.column_index("opponent_egpm").is_none());
    assert_eq!(out.cell(0, opp_dpm).as_num(), Some(2.0));
}

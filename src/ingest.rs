use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use crate::table::{Cell, Table};

/// File name used by the upstream per-year CSV exports.
pub fn year_file_name(year: i32) -> String {
    format!("{year}_LoL_esports_match_data_from_OraclesElixir.csv")
}

/// Read one raw CSV export into a table. Empty fields load as missing,
/// numeric fields as numbers, everything else as text; the type normalizer
/// takes it from there.
pub fn load_csv(path: &Path) -> Result<Table> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .with_context(|| format!("read csv header from {}", path.display()))?;
    let columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record.with_context(|| format!("read csv record from {}", path.display()))?;
        table.push_row(record.iter().map(Cell::from_raw).collect());
    }
    info!(path = %path.display(), rows = table.n_rows(), "loaded raw match data");
    Ok(table)
}

/// Read and concatenate the per-year exports for the given years from a
/// local data directory. All files must share one header.
pub fn load_years(dir: &Path, years: &[i32]) -> Result<Table> {
    let mut merged: Option<Table> = None;
    for &year in years {
        let path: PathBuf = dir.join(year_file_name(year));
        let table = load_csv(&path)?;
        merged = Some(match merged {
            None => table,
            Some(mut acc) => {
                if acc.columns() != table.columns() {
                    return Err(anyhow!(
                        "{} does not share the header of the earlier year files",
                        path.display()
                    ));
                }
                for row in table.rows() {
                    acc.push_row(row.clone());
                }
                acc
            }
        });
    }
    merged.ok_or_else(|| anyhow!("no years requested"))
}

/// Write a table out as CSV. Missing cells become empty fields, dates the
/// upstream `%Y-%m-%d %H:%M:%S` form.
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(table.columns())
        .context("write csv header")?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.render()))
            .context("write csv row")?;
    }
    writer.flush().context("flush csv output")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::year_file_name;

    #[test]
    fn year_file_name_matches_upstream_convention() {
        assert_eq!(
            year_file_name(2023),
            "2023_LoL_esports_match_data_from_OraclesElixir.csv"
        );
    }
}

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::model::{Cell, Column, Table};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Statistic used to impute missing values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMethod {
    #[default]
    Mean,
    Median,
    Mode,
}

impl FillMethod {
    pub const ALL: [FillMethod; 3] = [FillMethod::Mean, FillMethod::Median, FillMethod::Mode];

    pub fn label(self) -> &'static str {
        match self {
            FillMethod::Mean => "mean",
            FillMethod::Median => "median",
            FillMethod::Mode => "mode",
        }
    }
}

/// The cleaning options chosen by the user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningConfig {
    pub remove_duplicates: bool,
    pub drop_missing: bool,
    /// `None` means "no column selected" and disables the fill step.
    pub fill_column: Option<String>,
    pub fill_method: FillMethod,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Apply `config` to `table`: deduplicate, then drop rows with missing values,
/// then fill the selected column. The input table is left untouched.
pub fn clean(table: &Table, config: &CleaningConfig) -> Result<Table, ConfigError> {
    if let Ok(json) = serde_json::to_string(config) {
        log::debug!("Cleaning {} rows with {json}", table.len());
    }

    let mut cleaned = table.clone();
    if config.remove_duplicates {
        cleaned = drop_duplicates(&cleaned);
    }
    if config.drop_missing {
        cleaned = drop_missing_rows(&cleaned);
    }
    if let Some(column) = &config.fill_column {
        cleaned = fill_missing(&cleaned, column, config.fill_method)?;
    }
    Ok(cleaned)
}

/// Keep the first occurrence of every distinct row.
pub fn drop_duplicates(table: &Table) -> Table {
    let mut seen: HashSet<Vec<&Cell>> = HashSet::with_capacity(table.len());
    let keep: Vec<usize> = (0..table.len())
        .filter(|&i| seen.insert(table.row(i)))
        .collect();
    log::debug!("drop_duplicates removed {} rows", table.len() - keep.len());
    table.take_rows(&keep)
}

/// Keep only the rows without a missing value in any column.
pub fn drop_missing_rows(table: &Table) -> Table {
    let keep: Vec<usize> = (0..table.len())
        .filter(|&i| table.row(i).iter().all(|c| !c.is_missing()))
        .collect();
    log::debug!("drop_missing_rows removed {} rows", table.len() - keep.len());
    table.take_rows(&keep)
}

/// Replace the missing cells of `column` with a statistic computed from its
/// present cells. A column with no present cells is returned unchanged.
pub fn fill_missing(table: &Table, column: &str, method: FillMethod) -> Result<Table, ConfigError> {
    let source = table
        .column(column)
        .ok_or_else(|| ConfigError::UnknownColumn(column.to_string()))?;

    if method != FillMethod::Mode && !source.kind.is_numeric() {
        return Err(ConfigError::NonNumericFill {
            column: column.to_string(),
            method: method.label(),
            kind: source.kind,
        });
    }

    let fill = match method {
        FillMethod::Mean => mean(&source.numeric_values()).map(Cell::Float),
        FillMethod::Median => median(&source.numeric_values()).map(Cell::Float),
        FillMethod::Mode => mode(&source.cells).cloned(),
    };
    let Some(fill) = fill else {
        log::debug!("fill_missing: `{column}` has no values, nothing to fill");
        return Ok(table.clone());
    };
    if source.missing_count() == 0 {
        return Ok(table.clone());
    }

    let mut filled: Column = source.clone();
    if matches!(fill, Cell::Float(_)) {
        filled.promote_to_float();
    }
    for cell in filled.cells.iter_mut().filter(|c| c.is_missing()) {
        *cell = fill.clone();
    }
    log::debug!(
        "fill_missing: filled {} cells of `{column}` with {} = {fill}",
        source.missing_count(),
        method.label()
    );
    Ok(table.with_column(filled))
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

pub(crate) fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Most frequent present cell; ties go to the value seen first.
pub(crate) fn mode(cells: &[Cell]) -> Option<&Cell> {
    let mut counts: HashMap<&Cell, (usize, usize)> = HashMap::new();
    for (position, cell) in cells.iter().enumerate().filter(|(_, c)| !c.is_missing()) {
        counts.entry(cell).or_insert((0, position)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(cell, _)| cell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;
    use crate::data::model::ColumnType;

    fn config() -> CleaningConfig {
        CleaningConfig::default()
    }

    #[test]
    fn dedup_keeps_first_occurrences() {
        let table = load_bytes(b"a,b\n1,x\n1,x\n2,y\n").unwrap();
        let cleaned = clean(
            &table,
            &CleaningConfig {
                remove_duplicates: true,
                ..config()
            },
        )
        .unwrap();
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.row(0), vec![&Cell::Int(1), &Cell::Text("x".into())]);
        assert_eq!(cleaned.row(1), vec![&Cell::Int(2), &Cell::Text("y".into())]);
    }

    #[test]
    fn dedup_treats_signed_zeros_as_equal() {
        let table = load_bytes(b"a\n0.0\n-0.0\n").unwrap();
        let deduped = drop_duplicates(&table);
        assert_eq!(deduped.len(), 1);
        assert_eq!(mode(&table.column("a").unwrap().cells), Some(&Cell::Float(0.0)));
    }

    #[test]
    fn dedup_is_idempotent() {
        let table = load_bytes(b"a,b\n1,x\n,y\n1,x\n,y\n3,\n").unwrap();
        let cfg = CleaningConfig {
            remove_duplicates: true,
            ..config()
        };
        let once = clean(&table, &cfg).unwrap();
        let twice = clean(&once, &cfg).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 3);
    }

    #[test]
    fn drop_missing_leaves_only_complete_original_rows() {
        let table = load_bytes(b"a,b\n1,x\n,y\n3,\n4,z\n").unwrap();
        let cleaned = clean(
            &table,
            &CleaningConfig {
                drop_missing: true,
                ..config()
            },
        )
        .unwrap();
        assert_eq!(cleaned.missing_count(), 0);
        let original: Vec<_> = (0..table.len()).map(|i| table.row(i)).collect();
        for i in 0..cleaned.len() {
            assert!(original.contains(&cleaned.row(i)));
        }
        assert_eq!(cleaned.len(), 2);
    }

    #[test]
    fn fill_mean() {
        let table = load_bytes(b"v\n1\nNA\n3\n").unwrap();
        let cleaned = fill_missing(&table, "v", FillMethod::Mean).unwrap();
        let col = cleaned.column("v").unwrap();
        assert_eq!(col.kind, ColumnType::Float);
        assert_eq!(col.cells, vec![Cell::Float(1.0), Cell::Float(2.0), Cell::Float(3.0)]);
        // The input is not mutated.
        assert_eq!(table.column("v").unwrap().cells[1], Cell::Missing);
    }

    #[test]
    fn fill_median_even_count_averages_middle() {
        let table = load_bytes(b"v\n4\n1\nNA\n10\n2\n").unwrap();
        let cleaned = fill_missing(&table, "v", FillMethod::Median).unwrap();
        assert_eq!(cleaned.column("v").unwrap().cells[2], Cell::Float(3.0));
    }

    #[test]
    fn fill_mode_breaks_ties_by_first_seen() {
        let table = load_bytes(b"v\n1\n1\n2\n2\nNA\n").unwrap();
        let cleaned = fill_missing(&table, "v", FillMethod::Mode).unwrap();
        let col = cleaned.column("v").unwrap();
        assert_eq!(col.kind, ColumnType::Integer);
        assert_eq!(col.cells[4], Cell::Int(1));

        let table = load_bytes(b"v\n2\n1\n1\n2\nNA\n").unwrap();
        let cleaned = fill_missing(&table, "v", FillMethod::Mode).unwrap();
        assert_eq!(cleaned.column("v").unwrap().cells[4], Cell::Int(2));
    }

    #[test]
    fn fill_mode_works_on_text() {
        let table = load_bytes(b"t\nb\na\nNA\na\n").unwrap();
        let cleaned = fill_missing(&table, "t", FillMethod::Mode).unwrap();
        assert_eq!(cleaned.column("t").unwrap().cells[2], Cell::Text("a".into()));
    }

    #[test]
    fn fill_mean_on_text_is_a_config_error() {
        let table = load_bytes(b"t\nb\nNA\n").unwrap();
        let err = fill_missing(&table, "t", FillMethod::Mean).unwrap_err();
        assert!(matches!(err, ConfigError::NonNumericFill { .. }));
    }

    #[test]
    fn fill_unknown_column_is_a_config_error() {
        let table = load_bytes(b"a\n1\n").unwrap();
        assert_eq!(
            fill_missing(&table, "zzz", FillMethod::Mode).unwrap_err(),
            ConfigError::UnknownColumn("zzz".into())
        );
    }

    #[test]
    fn fill_on_all_missing_column_is_a_no_op() {
        let table = load_bytes(b"a,b\n1,\n2,\n").unwrap();
        for method in FillMethod::ALL {
            assert_eq!(fill_missing(&table, "b", method).unwrap(), table);
        }
    }

    #[test]
    fn fill_uses_statistics_after_dropping_rows() {
        // Row 2 is a duplicate of row 1 and would pull the mean towards 10.
        let table = load_bytes(b"v,k\n10,a\n10,a\n,b\n0,c\n").unwrap();
        let cleaned = clean(
            &table,
            &CleaningConfig {
                remove_duplicates: true,
                fill_column: Some("v".into()),
                fill_method: FillMethod::Mean,
                ..config()
            },
        )
        .unwrap();
        assert_eq!(cleaned.column("v").unwrap().cells[1], Cell::Float(5.0));
    }

    #[test]
    fn empty_table_passes_every_stage() {
        let table = load_bytes(b"a,b\n").unwrap();
        let cfg = CleaningConfig {
            remove_duplicates: true,
            drop_missing: true,
            fill_column: Some("a".into()),
            fill_method: FillMethod::Median,
        };
        assert_eq!(clean(&table, &cfg).unwrap(), table);
    }

    #[test]
    fn config_uses_camel_case_keys() {
        let cfg: CleaningConfig = serde_json::from_str(
            r#"{"removeDuplicates":true,"dropMissing":false,"fillColumn":null,"fillMethod":"mode"}"#,
        )
        .unwrap();
        assert!(cfg.remove_duplicates);
        assert_eq!(cfg.fill_method, FillMethod::Mode);
    }
}

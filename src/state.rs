use std::path::Path;

use crate::data::chart::{available_kinds, build_chart, Chart, ChartKind, ChartSpec};
use crate::data::clean::{clean, CleaningConfig};
use crate::data::error::{Availability, DataError};
use crate::data::export::{to_xlsx, EXPORT_FILE_NAME};
use crate::data::loader::load_bytes;
use crate::data::model::Table;
use crate::data::schema::numeric_columns;
use crate::data::stats::{correlation, describe, ColumnSummary, CorrelationMatrix};

/// Rows shown in the data previews.
pub const PREVIEW_ROWS: usize = 5;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full session state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// The table as uploaded (None until user loads a file). Never modified.
    pub original: Option<Table>,

    /// Name of the uploaded file, for the status line.
    pub file_name: Option<String>,

    /// Numeric columns of the uploaded table.
    pub numeric_columns: Vec<String>,

    /// Current cleaning options.
    pub cleaning: CleaningConfig,

    /// `original` with `cleaning` applied (cached).
    pub cleaned: Option<Table>,

    /// Current chart selection.
    pub chart: ChartSpec,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load an upload and make it the session's table. On failure the previous
    /// table is kept and the error is reported.
    pub fn load_upload(&mut self, name: &str, bytes: &[u8]) -> Result<(), DataError> {
        match load_bytes(bytes) {
            Ok(table) => {
                self.set_table(name, table);
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {name}: {e}");
                self.status_message = Some(format!("Error processing file: {e}"));
                Err(e.into())
            }
        }
    }

    /// Ingest a newly loaded table, reset the options and rebuild derived state.
    pub fn set_table(&mut self, name: &str, table: Table) {
        self.numeric_columns = numeric_columns(&table);
        self.cleaning = CleaningConfig::default();
        self.chart = ChartSpec {
            kind: ChartKind::Histogram,
            column: self.numeric_columns.first().cloned().unwrap_or_default(),
            y_column: self.numeric_columns.get(1).cloned(),
        };
        self.file_name = Some(name.to_string());
        self.original = Some(table);
        self.status_message = None;
        self.reclean();
    }

    /// Recompute `cleaned` after a change of cleaning options.
    pub fn reclean(&mut self) {
        let Some(table) = &self.original else {
            return;
        };
        match clean(table, &self.cleaning) {
            Ok(cleaned) => {
                self.cleaned = Some(cleaned);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Cleaning failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.cleaned = None;
            }
        }
    }

    /// Chart kinds selectable for the current table.
    pub fn chart_kinds(&self) -> Vec<ChartKind> {
        available_kinds(&self.numeric_columns)
    }

    /// Descriptive statistics of the cleaned table.
    pub fn summaries(&self) -> Vec<ColumnSummary> {
        self.cleaned.as_ref().map(describe).unwrap_or_default()
    }

    pub fn correlation(&self) -> Option<Availability<CorrelationMatrix>> {
        let cleaned = self.cleaned.as_ref()?;
        Some(correlation(cleaned, &self.numeric_columns))
    }

    /// The currently selected chart, if a cleaned table exists.
    pub fn chart(&self) -> Option<Result<Availability<Chart>, DataError>> {
        let cleaned = self.cleaned.as_ref()?;
        Some(build_chart(cleaned, &self.numeric_columns, &self.chart).map_err(DataError::from))
    }

    /// Spreadsheet bytes of the cleaned table and the suggested file name.
    pub fn export(&self) -> Option<Result<(Vec<u8>, &'static str), DataError>> {
        let cleaned = self.cleaned.as_ref()?;
        Some(
            to_xlsx(cleaned)
                .map(|bytes| (bytes, EXPORT_FILE_NAME))
                .map_err(DataError::from),
        )
    }

    /// Read a file picked by the user and load it.
    pub fn open_path(&mut self, path: &Path) -> anyhow::Result<()> {
        use anyhow::Context;

        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv")
            .to_string();
        self.load_upload(&name, &bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::FillMethod;
    use crate::data::error::InsufficientData;

    #[test]
    fn upload_then_clean_keeps_original_untouched() {
        let mut state = AppState::default();
        state.load_upload("a.csv", b"a,b\n1,x\n1,x\n2,y\n").unwrap();
        state.cleaning.remove_duplicates = true;
        state.reclean();
        assert_eq!(state.original.as_ref().unwrap().len(), 3);
        assert_eq!(state.cleaned.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn failed_upload_reports_and_keeps_previous_table() {
        let mut state = AppState::default();
        state.load_upload("a.csv", b"a\n1\n").unwrap();
        assert!(state.load_upload("b.csv", b"a\n1,2\n").is_err());
        assert!(state.status_message.is_some());
        assert_eq!(state.file_name.as_deref(), Some("a.csv"));
    }

    #[test]
    fn new_upload_recomputes_numeric_columns() {
        let mut state = AppState::default();
        state.load_upload("a.csv", b"x,y\n1,2\n").unwrap();
        assert_eq!(state.numeric_columns, vec!["x", "y"]);
        state.load_upload("b.csv", b"x,t\n1,a\n").unwrap();
        assert_eq!(state.numeric_columns, vec!["x"]);
        assert_eq!(state.chart_kinds(), vec![ChartKind::Histogram, ChartKind::BoxPlot]);
        assert!(matches!(
            state.correlation(),
            Some(Availability::Unavailable(InsufficientData::TooFewNumericColumns { .. }))
        ));
        assert!(state.chart().unwrap().unwrap().is_ready());
    }

    #[test]
    fn bad_fill_choice_is_reported_not_fatal() {
        let mut state = AppState::default();
        state.load_upload("a.csv", b"t\na\nNA\n").unwrap();
        state.cleaning.fill_column = Some("t".into());
        state.cleaning.fill_method = FillMethod::Median;
        state.reclean();
        assert!(state.cleaned.is_none());
        assert!(state.status_message.is_some());
        state.cleaning.fill_method = FillMethod::Mode;
        state.reclean();
        assert!(state.cleaned.is_some());
    }

    #[test]
    fn export_produces_named_workbook() {
        let mut state = AppState::default();
        state.load_upload("a.csv", b"a\n1\n").unwrap();
        let (bytes, name) = state.export().unwrap().unwrap();
        assert_eq!(name, "cleaned_data.xlsx");
        assert!(!bytes.is_empty());
    }
}

use eframe::egui::{self, Align2, FontId, Sense, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::color::{correlation_color, label_color};
use crate::data::model::Table;
use crate::data::stats::{
    ColumnSummary, CorrelationMatrix, Summary, CATEGORICAL_STAT_LABELS, NUMERIC_STAT_LABELS,
};

const ROW_HEIGHT: f32 = 18.0;
const HEATMAP_CELL: egui::Vec2 = egui::vec2(72.0, 26.0);

// ---------------------------------------------------------------------------
// Data preview
// ---------------------------------------------------------------------------

/// Render `table` as a striped grid with a row index column.
pub fn preview_table(ui: &mut Ui, id: &str, table: &Table) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(TableColumn::auto().at_least(30.0))
            .columns(TableColumn::auto().at_least(60.0), table.n_columns())
            .header(ROW_HEIGHT + 2.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("");
                });
                for column in table.columns() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(&column.name);
                    });
                }
            })
            .body(|mut body| {
                for i in 0..table.len() {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(i.to_string());
                        });
                        for cell in table.row(i) {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Render the statistics with one column per summarised table column.
pub fn summary_table(ui: &mut Ui, summaries: &[ColumnSummary]) {
    if summaries.is_empty() {
        ui.label("No columns to describe.");
        return;
    }
    let numeric = matches!(summaries[0].summary, Summary::Numeric(_));
    let labels: &[&str] = if numeric {
        &NUMERIC_STAT_LABELS
    } else {
        &CATEGORICAL_STAT_LABELS
    };

    egui::Grid::new("summary_table")
        .striped(true)
        .min_col_width(60.0)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for s in summaries {
                ui.strong(&s.column);
            }
            ui.end_row();

            for (row, label) in labels.iter().enumerate() {
                ui.strong(*label);
                for s in summaries {
                    ui.label(summary_value(&s.summary, row));
                }
                ui.end_row();
            }
        });
}

fn summary_value(summary: &Summary, row: usize) -> String {
    fn num(v: Option<f64>) -> String {
        v.map_or_else(|| "NaN".to_string(), |v| format!("{v:.6}"))
    }
    match summary {
        Summary::Numeric(s) => match row {
            0 => format!("{:.1}", s.count as f64),
            1 => num(s.mean),
            2 => num(s.std),
            3 => num(s.min),
            4 => num(s.q25),
            5 => num(s.median),
            6 => num(s.q75),
            _ => num(s.max),
        },
        Summary::Categorical(s) => match row {
            0 => s.count.to_string(),
            1 => s.unique.to_string(),
            2 => s.top.clone().unwrap_or_else(|| "NaN".to_string()),
            _ => s.freq.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Render the correlation matrix as annotated coloured cells.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    egui::Grid::new("correlation_heatmap")
        .spacing(egui::vec2(2.0, 2.0))
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for name in &matrix.columns {
                ui.strong(name);
            }
            ui.end_row();

            for (i, name) in matrix.columns.iter().enumerate() {
                ui.strong(name);
                for r in &matrix.values[i] {
                    let (rect, _) = ui.allocate_exact_size(HEATMAP_CELL, Sense::hover());
                    ui.painter().rect_filled(rect, 2.0, correlation_color(*r));
                    let text = r.map_or_else(|| "NaN".to_string(), |r| format!("{r:.2}"));
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        text,
                        FontId::monospace(12.0),
                        label_color(*r),
                    );
                }
                ui.end_row();
            }
        });
}

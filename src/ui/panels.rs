use std::path::Path;

use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::chart::ChartKind;
use crate::data::clean::FillMethod;
use crate::data::error::Availability;
use crate::data::export::download_link;
use crate::state::{AppState, PREVIEW_ROWS};
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Left side panel – upload and cleaning options
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload Data");
    ui.separator();
    if ui.button("Choose a CSV file…").clicked() {
        open_file_dialog(state);
    }
    if let Some(name) = &state.file_name {
        ui.label(name);
    }
    ui.add_space(8.0);

    if state.original.is_none() {
        ui.label("Please upload a CSV file to begin.");
        return;
    }

    ui.heading("Data Cleaning Options");
    ui.separator();

    let mut changed = false;
    changed |= ui
        .checkbox(&mut state.cleaning.remove_duplicates, "Remove duplicates")
        .changed();
    changed |= ui
        .checkbox(&mut state.cleaning.drop_missing, "Drop missing values")
        .changed();

    // ---- Fill column / method ----
    ui.strong("Fill NA for column");
    let selected = state.cleaning.fill_column.clone();
    egui::ComboBox::from_id_salt("fill_column")
        .selected_text(selected.as_deref().unwrap_or("None"))
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(selected.is_none(), "None").clicked() {
                state.cleaning.fill_column = None;
                changed = true;
            }
            for col in &state.numeric_columns {
                if ui
                    .selectable_label(selected.as_deref() == Some(col), col)
                    .clicked()
                {
                    state.cleaning.fill_column = Some(col.clone());
                    changed = true;
                }
            }
        });

    ui.strong("Fill method");
    let method = state.cleaning.fill_method;
    egui::ComboBox::from_id_salt("fill_method")
        .selected_text(method.label())
        .show_ui(ui, |ui: &mut Ui| {
            for m in FillMethod::ALL {
                if ui.selectable_label(method == m, m.label()).clicked() {
                    state.cleaning.fill_method = m;
                    changed = true;
                }
            }
        });

    if changed {
        state.reclean();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.cleaned.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Download cleaned data…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.original {
            ui.label(format!("Shape: ({}, {})", table.len(), table.n_columns()));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Central panel tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Cleaning,
    Analysis,
    Visualization,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Cleaning, Tab::Analysis, Tab::Visualization];

    fn label(self) -> &'static str {
        match self {
            Tab::Cleaning => "Data Cleaning",
            Tab::Analysis => "Data Analysis",
            Tab::Visualization => "Visualization",
        }
    }
}

/// Render the central panel: original preview plus the selected tab.
pub fn central_panel(ui: &mut Ui, state: &mut AppState, tab: &mut Tab) {
    let Some(original) = &state.original else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload a CSV file to begin  (File → Open…)");
        });
        return;
    };
    let shape = format!("Shape: ({}, {})", original.len(), original.n_columns());
    let preview = original.head(PREVIEW_ROWS);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Original Data");
            ui.label(shape);
            tables::preview_table(ui, "original_preview", &preview);
            ui.add_space(8.0);

            ui.horizontal(|ui: &mut Ui| {
                for t in Tab::ALL {
                    ui.selectable_value(&mut *tab, t, t.label());
                }
            });
            ui.separator();

            match tab {
                Tab::Cleaning => cleaning_tab(ui, state),
                Tab::Analysis => analysis_tab(ui, state),
                Tab::Visualization => visualization_tab(ui, state),
            }
        });
}

fn cleaning_tab(ui: &mut Ui, state: &mut AppState) {
    let Some(cleaned) = &state.cleaned else {
        ui.label("Adjust the cleaning options to continue.");
        return;
    };
    ui.strong("Cleaned Data Preview");
    ui.label(format!("Shape: ({}, {})", cleaned.len(), cleaned.n_columns()));
    tables::preview_table(ui, "cleaned_preview", &cleaned.head(PREVIEW_ROWS));
    ui.add_space(8.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("📥 Download cleaned data").clicked() {
            save_file_dialog(state);
        }
        if ui
            .button("Copy download link")
            .on_hover_text("Copy an HTML link with the workbook embedded as a data URI")
            .clicked()
        {
            copy_download_link(ui, state);
        }
    });
}

fn copy_download_link(ui: &Ui, state: &mut AppState) {
    match state.export() {
        Some(Ok((bytes, file_name))) => ui.ctx().copy_text(download_link(&bytes, file_name)),
        Some(Err(e)) => {
            log::error!("Export failed: {e}");
            state.status_message = Some(format!("Error: {e}"));
        }
        None => {}
    }
}

fn analysis_tab(ui: &mut Ui, state: &AppState) {
    ui.strong("Descriptive Statistics");
    tables::summary_table(ui, &state.summaries());
    ui.add_space(8.0);

    match state.correlation() {
        Some(Availability::Ready(matrix)) => {
            ui.strong("Correlation Matrix");
            tables::correlation_heatmap(ui, &matrix);
        }
        Some(Availability::Unavailable(_)) => {
            ui.label("Not enough numeric columns for correlation analysis.");
        }
        None => {}
    }
}

fn visualization_tab(ui: &mut Ui, state: &mut AppState) {
    let kinds = state.chart_kinds();
    if kinds.is_empty() {
        ui.label(RichText::new("No numeric columns available for plotting.").color(Color32::YELLOW));
        return;
    }
    if !kinds.contains(&state.chart.kind) {
        state.chart.kind = ChartKind::Histogram;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Plot type");
        egui::ComboBox::from_id_salt("plot_type")
            .selected_text(state.chart.kind.label())
            .show_ui(ui, |ui: &mut Ui| {
                for kind in &kinds {
                    ui.selectable_value(&mut state.chart.kind, *kind, kind.label());
                }
            });

        let x_label = if state.chart.kind == ChartKind::ScatterPlot {
            "X column"
        } else {
            "Column"
        };
        ui.label(x_label);
        column_combo(ui, "plot_column", &state.numeric_columns, &mut state.chart.column);

        if state.chart.kind == ChartKind::ScatterPlot {
            let x = state.chart.column.clone();
            let y_options: Vec<String> = state
                .numeric_columns
                .iter()
                .filter(|c| **c != x)
                .cloned()
                .collect();
            let mut y = state
                .chart
                .y_column
                .clone()
                .filter(|y| y_options.contains(y))
                .or_else(|| y_options.first().cloned())
                .unwrap_or_default();
            ui.label("Y column");
            column_combo(ui, "plot_y_column", &y_options, &mut y);
            state.chart.y_column = Some(y);
        }
    });
    ui.separator();

    match state.chart() {
        Some(Ok(Availability::Ready(chart))) => plot::chart_plot(ui, &chart),
        Some(Ok(Availability::Unavailable(reason))) => {
            ui.label(reason.to_string());
        }
        Some(Err(e)) => {
            ui.label(RichText::new(e.to_string()).color(Color32::RED));
        }
        None => {}
    }
}

fn column_combo(ui: &mut Ui, id: &str, options: &[String], selected: &mut String) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected.as_str())
        .show_ui(ui, |ui: &mut Ui| {
            for col in options {
                ui.selectable_value(selected, col.clone(), col);
            }
        });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Choose a CSV file")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open_path(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error processing file: {e:#}"));
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let Some(export) = state.export() else {
        return;
    };
    let (bytes, file_name) = match export {
        Ok(export) => export,
        Err(e) => {
            log::error!("Export failed: {e}");
            state.status_message = Some(format!("Error: {e}"));
            return;
        }
    };

    let target = rfd::FileDialog::new()
        .set_title("Download cleaned data")
        .set_file_name(file_name)
        .add_filter("Excel workbook", &["xlsx"])
        .save_file();

    if let Some(path) = target {
        if let Err(e) = write_export(&path, &bytes) {
            log::error!("Failed to save export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

fn write_export(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

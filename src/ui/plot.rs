use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Plot, PlotPoints, Points};

use crate::data::chart::Chart;

// ---------------------------------------------------------------------------
// Chart plot (visualization tab)
// ---------------------------------------------------------------------------

/// Render a generated chart.
pub fn chart_plot(ui: &mut Ui, chart: &Chart) {
    ui.strong(chart.title());

    Plot::new("chart_plot")
        .height(360.0)
        .x_axis_label(chart.x_label())
        .y_axis_label(chart.y_label())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| match chart {
            Chart::Histogram { column, bins } => {
                let bars: Vec<Bar> = bins
                    .iter()
                    .map(|b| {
                        Bar::new((b.start + b.end) / 2.0, b.count as f64)
                            .width(b.end - b.start)
                            .fill(Color32::LIGHT_BLUE)
                    })
                    .collect();
                plot_ui.bar_chart(BarChart::new(bars).name(column));
            }
            Chart::BoxPlot { column, stats } => {
                let spread = BoxSpread::new(
                    stats.lower_whisker,
                    stats.q1,
                    stats.median,
                    stats.q3,
                    stats.upper_whisker,
                );
                let elem = BoxElem::new(0.0, spread).name(column).box_width(0.4);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(column));

                if !stats.outliers.is_empty() {
                    let outliers: PlotPoints = stats.outliers.iter().map(|&v| [0.0, v]).collect();
                    plot_ui.points(Points::new(outliers).radius(3.0).name("outliers"));
                }
            }
            Chart::Scatter { points, .. } => {
                let series: PlotPoints = points.iter().copied().collect();
                plot_ui.points(Points::new(series).radius(2.5).color(Color32::LIGHT_BLUE));
            }
        });
}

use serde::{Deserialize, Serialize};

use super::error::{Availability, ConfigError, InsufficientData};
use super::model::Table;
use super::stats::quantile;

/// Number of equal-width bins in a histogram.
pub const HISTOGRAM_BINS: usize = 30;

/// Whisker reach of a box plot, in multiples of the interquartile range.
const WHISKER_IQR: f64 = 1.5;

// ---------------------------------------------------------------------------
// Chart selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Histogram,
    BoxPlot,
    ScatterPlot,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Histogram => "Histogram",
            ChartKind::BoxPlot => "Box Plot",
            ChartKind::ScatterPlot => "Scatter Plot",
        }
    }
}

/// Which chart to draw and over which column(s). `y_column` is only used by
/// scatter plots, where `column` is the X axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub column: String,
    pub y_column: Option<String>,
}

/// Chart kinds that can be offered for the given numeric columns.
pub fn available_kinds(numeric: &[String]) -> Vec<ChartKind> {
    match numeric.len() {
        0 => Vec::new(),
        1 => vec![ChartKind::Histogram, ChartKind::BoxPlot],
        _ => vec![ChartKind::Histogram, ChartKind::BoxPlot, ChartKind::ScatterPlot],
    }
}

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// A renderable chart: the numbers a plotting surface needs, nothing more.
#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    Histogram { column: String, bins: Vec<Bin> },
    BoxPlot { column: String, stats: BoxStats },
    Scatter { x_column: String, y_column: String, points: Vec<[f64; 2]> },
}

impl Chart {
    pub fn title(&self) -> String {
        match self {
            Chart::Histogram { column, .. } => format!("Histogram of {column}"),
            Chart::BoxPlot { column, .. } => format!("Box Plot of {column}"),
            Chart::Scatter { x_column, y_column, .. } => {
                format!("Scatter Plot: {x_column} vs {y_column}")
            }
        }
    }

    pub fn x_label(&self) -> &str {
        match self {
            Chart::Histogram { column, .. } => column,
            Chart::BoxPlot { .. } => "",
            Chart::Scatter { x_column, .. } => x_column,
        }
    }

    pub fn y_label(&self) -> &str {
        match self {
            Chart::Histogram { .. } => "Count",
            Chart::BoxPlot { column, .. } => column,
            Chart::Scatter { y_column, .. } => y_column,
        }
    }
}

// ---------------------------------------------------------------------------
// Chart generation
// ---------------------------------------------------------------------------

/// Build the chart described by `spec`.
///
/// Missing numeric columns are a normal outcome reported through
/// [`Availability::Unavailable`]; naming a column that cannot be plotted is a
/// [`ConfigError`].
pub fn build_chart(
    table: &Table,
    numeric: &[String],
    spec: &ChartSpec,
) -> Result<Availability<Chart>, ConfigError> {
    if numeric.is_empty() {
        return Ok(Availability::Unavailable(InsufficientData::NoNumericColumns));
    }
    if spec.kind == ChartKind::ScatterPlot && numeric.len() < 2 {
        return Ok(Availability::Unavailable(
            InsufficientData::TooFewNumericColumns {
                found: numeric.len(),
                required: 2,
            },
        ));
    }

    let values = plottable_values(table, numeric, &spec.column)?;
    let chart = match spec.kind {
        ChartKind::Histogram => {
            if values.is_empty() {
                return Ok(empty_column(&spec.column));
            }
            Chart::Histogram {
                column: spec.column.clone(),
                bins: histogram(&values, HISTOGRAM_BINS),
            }
        }
        ChartKind::BoxPlot => match box_stats(&values) {
            Some(stats) => Chart::BoxPlot {
                column: spec.column.clone(),
                stats,
            },
            None => return Ok(empty_column(&spec.column)),
        },
        ChartKind::ScatterPlot => {
            let y_column = match &spec.y_column {
                Some(y) if *y != spec.column => y,
                _ => return Err(ConfigError::InvalidScatter),
            };
            // Validates the Y column.
            plottable_values(table, numeric, y_column)?;
            Chart::Scatter {
                x_column: spec.column.clone(),
                y_column: y_column.clone(),
                points: scatter_points(table, &spec.column, y_column),
            }
        }
    };
    log::debug!("Built chart: {}", chart.title());
    Ok(Availability::Ready(chart))
}

fn empty_column(column: &str) -> Availability<Chart> {
    Availability::Unavailable(InsufficientData::EmptyColumn(column.to_string()))
}

fn plottable_values(table: &Table, numeric: &[String], column: &str) -> Result<Vec<f64>, ConfigError> {
    match table.column(column) {
        Some(c) if numeric.iter().any(|n| n == column) => Ok(c.numeric_values()),
        _ => Err(ConfigError::NotPlottable(column.to_string())),
    }
}

/// Equal-width bins spanning `[min, max]`; the last bin includes `max`.
/// A degenerate range is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram(values: &[f64], n_bins: usize) -> Vec<Bin> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if values.is_empty() {
        (0.0, 1.0)
    } else if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / n_bins as f64;

    let mut bins: Vec<Bin> = (0..n_bins)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: if i + 1 == n_bins { hi } else { lo + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(n_bins - 1);
        bins[idx].count += 1;
    }
    bins
}

/// Quartiles, whiskers and outliers of the values, or `None` when empty.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile(&sorted, 0.25)?;
    let median = quantile(&sorted, 0.5)?;
    let q3 = quantile(&sorted, 0.75)?;
    let reach = WHISKER_IQR * (q3 - q1);
    let (low_fence, high_fence) = (q1 - reach, q3 + reach);

    let inside = sorted.iter().copied().filter(|v| (low_fence..=high_fence).contains(v));
    let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min).min(q1);
    let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max).max(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| !(low_fence..=high_fence).contains(v))
        .collect();

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

fn scatter_points(table: &Table, x: &str, y: &str) -> Vec<[f64; 2]> {
    let (Some(xs), Some(ys)) = (table.column(x), table.column(y)) else {
        return Vec::new();
    };
    xs.cells
        .iter()
        .zip(&ys.cells)
        .filter_map(|(a, b)| Some([a.as_f64()?, b.as_f64()?]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;
    use crate::data::schema::numeric_columns;

    fn spec(kind: ChartKind, column: &str, y: Option<&str>) -> ChartSpec {
        ChartSpec {
            kind,
            column: column.to_string(),
            y_column: y.map(str::to_string),
        }
    }

    #[test]
    fn single_numeric_column_offers_no_scatter() {
        let table = load_bytes(b"x,t\n1,a\n2,b\n3,c\n").unwrap();
        let numeric = numeric_columns(&table);
        assert_eq!(available_kinds(&numeric), vec![ChartKind::Histogram, ChartKind::BoxPlot]);

        let scatter = build_chart(&table, &numeric, &spec(ChartKind::ScatterPlot, "x", Some("t")));
        assert!(matches!(
            scatter,
            Ok(Availability::Unavailable(InsufficientData::TooFewNumericColumns { .. }))
        ));
        for kind in [ChartKind::Histogram, ChartKind::BoxPlot] {
            assert!(build_chart(&table, &numeric, &spec(kind, "x", None)).unwrap().is_ready());
        }
    }

    #[test]
    fn no_numeric_columns_means_nothing_to_plot() {
        let table = load_bytes(b"t\na\n").unwrap();
        let numeric = numeric_columns(&table);
        assert!(available_kinds(&numeric).is_empty());
        assert_eq!(
            build_chart(&table, &numeric, &spec(ChartKind::Histogram, "t", None)).unwrap(),
            Availability::Unavailable(InsufficientData::NoNumericColumns)
        );
    }

    #[test]
    fn histogram_has_thirty_bins_covering_every_value() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = histogram(&values, HISTOGRAM_BINS);
        assert_eq!(bins.len(), 30);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 101);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[29].end, 100.0);
    }

    #[test]
    fn histogram_of_a_constant_column() {
        let bins = histogram(&[4.0, 4.0], 30);
        assert_eq!(bins[0].start, 3.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
    }

    #[test]
    fn box_plot_flags_outliers() {
        let stats = box_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.median, 3.0);
        assert_eq!(stats.q1, 2.0);
        assert_eq!(stats.q3, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert_eq!(stats.upper_whisker, 4.0);
        assert_eq!(stats.outliers, vec![100.0]);
    }

    #[test]
    fn scatter_skips_incomplete_rows() {
        let table = load_bytes(b"x,y\n1,2\nNA,3\n4,5\n").unwrap();
        let numeric = numeric_columns(&table);
        let chart = build_chart(&table, &numeric, &spec(ChartKind::ScatterPlot, "x", Some("y")))
            .unwrap()
            .ready()
            .unwrap();
        assert_eq!(chart.title(), "Scatter Plot: x vs y");
        let Chart::Scatter { points, .. } = chart else {
            panic!("expected a scatter plot");
        };
        assert_eq!(points, vec![[1.0, 2.0], [4.0, 5.0]]);
    }

    #[test]
    fn scatter_needs_two_distinct_columns() {
        let table = load_bytes(b"x,y\n1,2\n").unwrap();
        let numeric = numeric_columns(&table);
        assert_eq!(
            build_chart(&table, &numeric, &spec(ChartKind::ScatterPlot, "x", Some("x"))),
            Err(ConfigError::InvalidScatter)
        );
    }

    #[test]
    fn text_column_is_not_plottable() {
        let table = load_bytes(b"x,t\n1,a\n").unwrap();
        let numeric = numeric_columns(&table);
        assert_eq!(
            build_chart(&table, &numeric, &spec(ChartKind::Histogram, "t", None)),
            Err(ConfigError::NotPlottable("t".into()))
        );
    }

    #[test]
    fn empty_column_reports_no_values() {
        let table = load_bytes(b"x,y\n1,\n2,\n").unwrap();
        let numeric = numeric_columns(&table);
        assert_eq!(
            build_chart(&table, &numeric, &spec(ChartKind::BoxPlot, "y", None)).unwrap(),
            Availability::Unavailable(InsufficientData::EmptyColumn("y".into()))
        );
    }
}

use super::clean::{mean, mode};
use super::error::{Availability, InsufficientData};
use super::model::{Column, Table};

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics of a numeric column. `None` marks an undefined value
/// (for example the standard deviation of a single observation).
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

/// Frequency summary used when a table has no numeric columns at all.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub summary: Summary,
}

/// Row labels of the numeric summary, in display order.
pub const NUMERIC_STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];
pub const CATEGORICAL_STAT_LABELS: [&str; 4] = ["count", "unique", "top", "freq"];

/// Summarise every numeric column, or every column categorically when the
/// table has no numeric column.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    let numeric: Vec<&Column> = table
        .columns()
        .iter()
        .filter(|c| c.kind.is_numeric())
        .collect();

    if numeric.is_empty() {
        return table
            .columns()
            .iter()
            .map(|c| ColumnSummary {
                column: c.name.clone(),
                summary: Summary::Categorical(categorical_summary(c)),
            })
            .collect();
    }

    numeric
        .into_iter()
        .map(|c| ColumnSummary {
            column: c.name.clone(),
            summary: Summary::Numeric(numeric_summary(&c.numeric_values())),
        })
        .collect()
}

pub fn numeric_summary(values: &[f64]) -> NumericSummary {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    NumericSummary {
        count: values.len(),
        mean: mean(values),
        std: sample_std(values),
        min: sorted.first().copied(),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

fn categorical_summary(column: &Column) -> CategoricalSummary {
    let present: Vec<_> = column.cells.iter().filter(|c| !c.is_missing()).collect();
    let mut distinct = present.clone();
    distinct.sort();
    distinct.dedup();
    let top = mode(&column.cells);
    CategoricalSummary {
        count: present.len(),
        unique: distinct.len(),
        top: top.map(|c| c.to_string()),
        freq: top.map_or(0, |t| present.iter().filter(|c| *c == &t).count()),
    }
}

/// Sample standard deviation (n - 1 denominator).
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Quantile of already sorted values, interpolating linearly between the two
/// closest ranks.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Square Pearson correlation matrix; `values[i][j]` pairs `columns[i]` with
/// `columns[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Pairwise Pearson correlations of the `numeric` columns. Each pair only uses
/// rows where both values are present.
pub fn correlation(table: &Table, numeric: &[String]) -> Availability<CorrelationMatrix> {
    let columns: Vec<&Column> = numeric.iter().filter_map(|n| table.column(n)).collect();
    if columns.len() < 2 {
        return Availability::Unavailable(InsufficientData::TooFewNumericColumns {
            found: columns.len(),
            required: 2,
        });
    }

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(columns[i], columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Availability::Ready(CorrelationMatrix {
        columns: columns.iter().map(|c| c.name.clone()).collect(),
        values,
    })
}

fn pearson(a: &Column, b: &Column) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .cells
        .iter()
        .zip(&b.cells)
        .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_bytes;
    use crate::data::schema::numeric_columns;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn describe_matches_standard_definitions() {
        let table = load_bytes(b"v,t\n1,a\n2,b\n3,c\n4,d\nNA,e\n").unwrap();
        let summaries = describe(&table);
        assert_eq!(summaries.len(), 1);
        let Summary::Numeric(s) = &summaries[0].summary else {
            panic!("expected a numeric summary");
        };
        assert_eq!(s.count, 4);
        assert!(close(s.mean, 2.5));
        assert!(close(s.std, (5.0f64 / 3.0).sqrt()));
        assert!(close(s.min, 1.0));
        assert!(close(s.q25, 1.75));
        assert!(close(s.median, 2.5));
        assert!(close(s.q75, 3.25));
        assert!(close(s.max, 4.0));
    }

    #[test]
    fn describe_single_value_has_no_std() {
        let s = numeric_summary(&[7.0]);
        assert_eq!(s.std, None);
        assert!(close(s.q75, 7.0));
        assert_eq!(numeric_summary(&[]).mean, None);
    }

    #[test]
    fn describe_without_numeric_columns_counts_frequencies() {
        let table = load_bytes(b"t\nb\na\na\nNA\n").unwrap();
        let summaries = describe(&table);
        assert_eq!(
            summaries[0].summary,
            Summary::Categorical(CategoricalSummary {
                count: 3,
                unique: 2,
                top: Some("a".into()),
                freq: 2,
            })
        );
    }

    #[test]
    fn correlation_of_linear_columns() {
        let table = load_bytes(b"x,y,z\n1,2,5\n2,4,3\n3,6,1\n4,8,NA\n").unwrap();
        let matrix = correlation(&table, &numeric_columns(&table)).ready().unwrap();
        assert_eq!(matrix.columns, vec!["x", "y", "z"]);
        assert!(close(matrix.get("x", "y"), 1.0));
        assert!(close(matrix.get("x", "z"), -1.0));
        assert!(close(matrix.get("z", "z"), 1.0));
    }

    #[test]
    fn constant_column_has_undefined_correlation() {
        let table = load_bytes(b"x,c\n1,3\n2,3\n").unwrap();
        let matrix = correlation(&table, &numeric_columns(&table)).ready().unwrap();
        assert_eq!(matrix.get("x", "c"), None);
    }

    #[test]
    fn single_numeric_column_is_insufficient() {
        let table = load_bytes(b"x,t\n1,a\n2,b\n").unwrap();
        assert_eq!(
            correlation(&table, &numeric_columns(&table)),
            Availability::Unavailable(InsufficientData::TooFewNumericColumns {
                found: 1,
                required: 2
            })
        );
    }
}

use super::model::{Cell, ColumnType, Table};

// ---------------------------------------------------------------------------
// Type tagging
// ---------------------------------------------------------------------------

/// Decide the type of a column from its raw text values (`None` = missing).
///
/// The narrowest type that accepts every present value wins:
/// integer, then float, then boolean, then text. Surrounding whitespace is
/// ignored when parsing. A column with no present values is treated as float
/// so it stays available to numeric steps.
pub fn infer_column_type(raw: &[Option<&str>]) -> ColumnType {
    let mut present = raw.iter().flatten().peekable();
    if present.peek().is_none() {
        return ColumnType::Float;
    }
    let values: Vec<&str> = present.copied().collect();
    if values.iter().all(|v| v.trim().parse::<i64>().is_ok()) {
        ColumnType::Integer
    } else if values.iter().all(|v| v.trim().parse::<f64>().is_ok()) {
        ColumnType::Float
    } else if values.iter().all(|v| parse_bool(v).is_some()) {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    }
}

/// Convert a raw value to a cell of the given column type.
///
/// `raw` must be accepted by `kind` (as decided by [`infer_column_type`]);
/// anything else falls back to a text cell, kept verbatim. Any spelling of
/// NaN in a float column is a missing value.
pub fn to_cell(raw: Option<&str>, kind: ColumnType) -> Cell {
    let Some(s) = raw else {
        return Cell::Missing;
    };
    let parsed = match kind {
        ColumnType::Integer => s.trim().parse().ok().map(Cell::Int),
        ColumnType::Float => s.trim().parse::<f64>().ok().map(|f| {
            if f.is_nan() {
                Cell::Missing
            } else {
                Cell::Float(f)
            }
        }),
        ColumnType::Boolean => parse_bool(s).map(Cell::Bool),
        ColumnType::Text => None,
    };
    parsed.unwrap_or_else(|| Cell::Text(s.to_string()))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim() {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Column classifier
// ---------------------------------------------------------------------------

/// Names of the numeric (integer or float) columns, in table order.
pub fn numeric_columns(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| c.kind.is_numeric())
        .map(|c| c.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    #[test]
    fn narrowest_type_wins() {
        assert_eq!(infer_column_type(&[Some("1"), None, Some("-3")]), ColumnType::Integer);
        assert_eq!(infer_column_type(&[Some("1"), Some("2.5")]), ColumnType::Float);
        assert_eq!(infer_column_type(&[Some("True"), Some("false")]), ColumnType::Boolean);
        assert_eq!(infer_column_type(&[Some("1"), Some("x")]), ColumnType::Text);
    }

    #[test]
    fn all_missing_column_counts_as_numeric() {
        assert_eq!(infer_column_type(&[None, None]), ColumnType::Float);
        assert_eq!(infer_column_type(&[]), ColumnType::Float);
    }

    #[test]
    fn mixed_int_and_float_become_floats() {
        assert_eq!(to_cell(Some("2"), ColumnType::Float), Cell::Float(2.0));
        assert_eq!(to_cell(None, ColumnType::Integer), Cell::Missing);
    }

    #[test]
    fn padded_numbers_are_numeric() {
        assert_eq!(infer_column_type(&[Some(" 2"), Some("3 ")]), ColumnType::Integer);
        assert_eq!(infer_column_type(&[Some(" 2.5")]), ColumnType::Float);
        assert_eq!(infer_column_type(&[Some(" true")]), ColumnType::Boolean);
        assert_eq!(to_cell(Some(" 2"), ColumnType::Integer), Cell::Int(2));
        assert_eq!(to_cell(Some(" 2.5 "), ColumnType::Float), Cell::Float(2.5));
        assert_eq!(to_cell(Some(" x "), ColumnType::Text), Cell::Text(" x ".into()));
    }

    #[test]
    fn any_nan_spelling_is_missing() {
        for raw in ["NAN", "Nan", "+nan", " nan "] {
            assert_eq!(infer_column_type(&[Some("1"), Some(raw)]), ColumnType::Float);
            assert_eq!(to_cell(Some(raw), ColumnType::Float), Cell::Missing, "{raw}");
        }
    }

    #[test]
    fn numeric_columns_keep_table_order() {
        let table = Table::from_columns(vec![
            Column::new("f", ColumnType::Float, vec![Cell::Float(0.5)]),
            Column::new("t", ColumnType::Text, vec![Cell::Text("a".into())]),
            Column::new("i", ColumnType::Integer, vec![Cell::Int(1)]),
        ])
        .unwrap();
        assert_eq!(numeric_columns(&table), vec!["f", "i"]);
    }
}

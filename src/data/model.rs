use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Cell – a single value in a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the usual DataFrame dtypes.
/// Rows are deduplicated through `HashSet`, so `Cell` must be `Eq + Hash`.
#[derive(Debug, Clone)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Missing,
}

// -- Manual Eq/Ord/Hash: floats use a total order, with 0.0 == -0.0 --

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        use Cell::*;
        fn discriminant(v: &Cell) -> u8 {
            match v {
                Missing => 0,
                Bool(_) => 1,
                Int(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        match (self, other) {
            (Missing, Missing) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) if a == b => Ordering::Equal,
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Text(s) => s.hash(state),
            Cell::Int(i) => i.hash(state),
            Cell::Float(f) => {
                let f = if *f == 0.0 { 0.0 } else { *f };
                f.to_bits().hash(state)
            }
            Cell::Bool(b) => b.hash(state),
            Cell::Missing => {}
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Missing => write!(f, "<NA>"),
        }
    }
}

impl Cell {
    /// Interpret the value as an `f64`; `None` for non-numeric and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }
}

// ---------------------------------------------------------------------------
// ColumnType – the tag assigned by the classifier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Boolean => "boolean",
            ColumnType::Text => "text",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// A named, typed column. Every non-missing cell matches `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnType,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType, cells: Vec<Cell>) -> Self {
        Column {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Non-missing numeric values in row order.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells.iter().filter_map(Cell::as_f64).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Convert an Integer column into a Float column, keeping missing cells.
    pub fn promote_to_float(&mut self) {
        if self.kind != ColumnType::Integer {
            return;
        }
        for cell in &mut self.cells {
            if let Cell::Int(i) = *cell {
                *cell = Cell::Float(i as f64);
            }
        }
        self.kind = ColumnType::Float;
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered set of equally long columns. Transformations never mutate a
/// `Table` in place; they build a new one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// Build a table from columns. Returns `None` if column lengths differ.
    pub fn from_columns(columns: Vec<Column>) -> Option<Self> {
        let n_rows = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        if columns.iter().any(|c| c.cells.len() != n_rows) {
            return None;
        }
        Some(Table { columns, n_rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.n_rows
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Borrow the cells of one row, in column order.
    pub fn row(&self, index: usize) -> Vec<&Cell> {
        self.columns.iter().map(|c| &c.cells[index]).collect()
    }

    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// New table holding only the given rows, in the given order.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                kind: c.kind,
                cells: indices.iter().map(|&i| c.cells[i].clone()).collect(),
            })
            .collect();
        Table {
            columns,
            n_rows: indices.len(),
        }
    }

    /// New table with the first `n` rows (preview).
    pub fn head(&self, n: usize) -> Table {
        let indices: Vec<usize> = (0..n.min(self.n_rows)).collect();
        self.take_rows(&indices)
    }

    /// New table with `column` replacing the existing column of the same name.
    pub(crate) fn with_column(&self, column: Column) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| {
                if c.name == column.name {
                    column.clone()
                } else {
                    c.clone()
                }
            })
            .collect();
        Table {
            columns,
            n_rows: self.n_rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn float_cells_hash_and_compare_consistently() {
        let mut set = HashSet::new();
        set.insert(Cell::Float(1.5));
        set.insert(Cell::Float(1.5));
        set.insert(Cell::Missing);
        set.insert(Cell::Missing);
        assert_eq!(set.len(), 2);
        assert_ne!(Cell::Int(1), Cell::Float(1.0));
    }

    #[test]
    fn signed_zeros_are_one_value() {
        assert_eq!(Cell::Float(0.0), Cell::Float(-0.0));
        let set: HashSet<Cell> = [Cell::Float(0.0), Cell::Float(-0.0)].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(Cell::Float(-0.5) < Cell::Float(-0.0));
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let a = Column::new("a", ColumnType::Integer, vec![Cell::Int(1)]);
        let b = Column::new("b", ColumnType::Integer, vec![]);
        assert!(Table::from_columns(vec![a, b]).is_none());
    }

    #[test]
    fn take_rows_keeps_column_order() {
        let a = Column::new("a", ColumnType::Integer, vec![Cell::Int(1), Cell::Int(2)]);
        let b = Column::new(
            "b",
            ColumnType::Text,
            vec![Cell::Text("x".into()), Cell::Text("y".into())],
        );
        let table = Table::from_columns(vec![a, b]).unwrap();
        let picked = table.take_rows(&[1]);
        assert_eq!(picked.column_names(), vec!["a", "b"]);
        assert_eq!(picked.row(0), vec![&Cell::Int(2), &Cell::Text("y".into())]);
    }

    #[test]
    fn promote_keeps_missing_cells() {
        let mut col = Column::new("a", ColumnType::Integer, vec![Cell::Int(3), Cell::Missing]);
        col.promote_to_float();
        assert_eq!(col.kind, ColumnType::Float);
        assert_eq!(col.cells, vec![Cell::Float(3.0), Cell::Missing]);
    }
}

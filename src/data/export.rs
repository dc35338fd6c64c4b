use std::io::Cursor;

use base64::Engine as _;
use calamine::{Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{
    cell_range_absolute, column_name_to_number, DocProperties, ExcelDateTime, Format, Workbook,
    Worksheet,
};

use super::error::SerializationError;
use super::model::{Cell, Column, ColumnType, Table};

/// Suggested name of the downloaded file.
pub const EXPORT_FILE_NAME: &str = "cleaned_data.xlsx";

/// Name of the single worksheet written by [`to_xlsx`].
pub const SHEET_NAME: &str = "Sheet1";

/// Largest integer a spreadsheet number (an IEEE double) holds exactly.
const MAX_EXACT_INT: i64 = 1 << 53;

/// Defined name covering the header and every data row, blank ones included.
const EXTENT_NAME: &str = "TidyPanda_Data";
/// Prefix of the defined names holding one type letter per column.
const KINDS_NAME: &str = "TidyPanda_Types_";
/// Excel caps string constants in formulas at 255 characters.
const KINDS_PER_NAME: usize = 200;

static EMPTY: Data = Data::Empty;

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Serialize `table` into an in-memory `.xlsx` workbook: one sheet, a bold
/// header row with the column names, then one row per table row.
///
/// Missing cells are left blank. Two workbook-level defined names record the
/// table extent and the column types, so [`read_xlsx`] restores trailing blank
/// rows, unnamed empty columns and float columns holding whole numbers.
///
/// The workbook creation time is pinned, so equal tables give equal bytes.
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>, SerializationError> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(2000, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    let header = Format::new().set_bold();

    for (col_idx, column) in table.columns().iter().enumerate() {
        let col = u16::try_from(col_idx).map_err(|_| SerializationError::TooLarge("column count"))?;
        worksheet.write_string_with_format(0, col, &column.name, &header)?;
        write_column(worksheet, col, column)?;
    }

    if table.n_columns() > 0 {
        let last_row = u32::try_from(table.len()).map_err(|_| SerializationError::TooLarge("row count"))?;
        let last_col = u16::try_from(table.n_columns() - 1)
            .map_err(|_| SerializationError::TooLarge("column count"))?;
        let extent = cell_range_absolute(0, 0, last_row, last_col);
        workbook.define_name(EXTENT_NAME, &format!("={SHEET_NAME}!{extent}"))?;

        let letters: Vec<char> = table.columns().iter().map(|c| kind_letter(c.kind)).collect();
        for (idx, chunk) in letters.chunks(KINDS_PER_NAME).enumerate() {
            let kinds: String = chunk.iter().collect();
            workbook.define_name(format!("{KINDS_NAME}{idx}"), &format!("=\"{kinds}\""))?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    log::info!(
        "Exported {} rows x {} columns ({} bytes)",
        table.len(),
        table.n_columns(),
        bytes.len()
    );
    Ok(bytes)
}

fn write_column(worksheet: &mut Worksheet, col: u16, column: &Column) -> Result<(), SerializationError> {
    for (row_idx, cell) in column.cells.iter().enumerate() {
        let row = u32::try_from(row_idx + 1).map_err(|_| SerializationError::TooLarge("row count"))?;
        match cell {
            Cell::Missing => {}
            Cell::Int(i) if i.unsigned_abs() <= MAX_EXACT_INT as u64 => {
                worksheet.write_number(row, col, *i as f64)?;
            }
            Cell::Float(f) if f.is_finite() => {
                worksheet.write_number(row, col, *f)?;
            }
            Cell::Bool(b) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            Cell::Text(s) => {
                worksheet.write_string(row, col, s)?;
            }
            Cell::Int(_) | Cell::Float(_) => {
                return Err(SerializationError::Unrepresentable {
                    row: row_idx,
                    column: column.name.clone(),
                    value: cell.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn kind_letter(kind: ColumnType) -> char {
    match kind {
        ColumnType::Integer => 'i',
        ColumnType::Float => 'f',
        ColumnType::Boolean => 'b',
        ColumnType::Text => 't',
    }
}

fn letter_kind(letter: char) -> Option<ColumnType> {
    match letter {
        'i' => Some(ColumnType::Integer),
        'f' => Some(ColumnType::Float),
        'b' => Some(ColumnType::Boolean),
        't' => Some(ColumnType::Text),
        _ => None,
    }
}

/// An HTML-ready `data:` URI carrying the bytes, for inline download links.
pub fn download_link(bytes: &[u8], file_name: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!(
        r#"<a href="data:application/octet-stream;base64,{encoded}" download="{file_name}">Download {file_name}</a>"#
    )
}

// ---------------------------------------------------------------------------
// Reading back
// ---------------------------------------------------------------------------

/// Read the first worksheet of an `.xlsx` workbook as a table: the first row
/// holds the column names and blank cells become missing values.
///
/// Workbooks written by [`to_xlsx`] come back with their exact extent and
/// column types. For other workbooks the extent is the sheet's used range and
/// the types are re-derived from the stored cells.
pub fn read_xlsx(bytes: &[u8]) -> Result<Table, SerializationError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let extent = workbook
        .defined_names()
        .iter()
        .find(|(name, _)| name == EXTENT_NAME)
        .and_then(|(_, formula)| parse_extent(formula));
    let kinds = stored_kinds(workbook.defined_names());

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SerializationError::NoWorksheet)??;

    // Cells are addressed absolutely: the header sits on row 0 from column A.
    let (n_columns, n_rows) = match extent {
        Some(extent) => extent,
        None => match range.end() {
            Some((row, col)) => (col as usize + 1, row as usize),
            None => return Ok(Table::default()),
        },
    };
    let kinds = kinds.filter(|k| k.len() == n_columns);

    let columns = (0..n_columns)
        .map(|col| {
            let name = data_to_string(cell_at(&range, 0, col));
            let values: Vec<&Data> = (1..=n_rows).map(|row| cell_at(&range, row, col)).collect();
            let stored = kinds.as_ref().map(|k| k[col]);
            typed_column(name, &values, stored)
        })
        .collect();
    Table::from_columns(columns).ok_or(SerializationError::RaggedSheet)
}

fn cell_at(range: &Range<Data>, row: usize, col: usize) -> &Data {
    match (u32::try_from(row), u32::try_from(col)) {
        (Ok(r), Ok(c)) => range.get_value((r, c)).unwrap_or(&EMPTY),
        _ => &EMPTY,
    }
}

/// `(columns, data rows)` of an extent such as `Sheet1!$A$1:$C$4` (or just
/// `Sheet1!$A$1` for a single header cell).
fn parse_extent(formula: &str) -> Option<(usize, usize)> {
    let (_, area) = formula.trim_start_matches('=').rsplit_once('!')?;
    let last = area.rsplit(':').next()?;
    let (letters, row) = last.trim_start_matches('$').split_once('$')?;
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }
    let n_columns = usize::from(column_name_to_number(letters)) + 1;
    let last_row: usize = row.parse().ok()?;
    Some((n_columns, last_row.checked_sub(1)?))
}

fn stored_kinds(names: &[(String, String)]) -> Option<Vec<ColumnType>> {
    let mut chunks: Vec<(usize, &str)> = names
        .iter()
        .filter_map(|(name, value)| {
            let idx = name.strip_prefix(KINDS_NAME)?.parse().ok()?;
            Some((idx, value.trim_start_matches('=').trim_matches('"')))
        })
        .collect();
    if chunks.is_empty() {
        return None;
    }
    chunks.sort_by_key(|(idx, _)| *idx);
    chunks
        .into_iter()
        .flat_map(|(_, letters)| letters.chars())
        .map(letter_kind)
        .collect()
}

fn typed_column(name: String, values: &[&Data], stored: Option<ColumnType>) -> Column {
    if let Some(kind) = stored {
        let cells: Option<Vec<Cell>> = values.iter().map(|d| stored_cell(kind, d)).collect();
        if let Some(cells) = cells {
            return Column::new(name, kind, cells);
        }
        log::warn!("Column {name:?} does not match its stored {kind} type; re-deriving it");
    }

    let kind = infer_kind(values);
    let cells = values
        .iter()
        .map(|d| stored_cell(kind, d).unwrap_or_else(|| Cell::Text(data_to_string(d))))
        .collect();
    Column::new(name, kind, cells)
}

fn infer_kind(values: &[&Data]) -> ColumnType {
    let present: Vec<&Data> = values
        .iter()
        .copied()
        .filter(|d| !matches!(d, Data::Empty))
        .collect();

    if present.is_empty() {
        ColumnType::Float
    } else if present.iter().all(|d| matches!(d, Data::Bool(_))) {
        ColumnType::Boolean
    } else if present.iter().all(|d| whole_number(d).is_some()) {
        ColumnType::Integer
    } else if present.iter().all(|d| matches!(d, Data::Float(_) | Data::Int(_))) {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

/// The cell for `d` in a column of type `kind`, or `None` when it does not fit.
fn stored_cell(kind: ColumnType, d: &Data) -> Option<Cell> {
    match (kind, d) {
        (_, Data::Empty) => Some(Cell::Missing),
        (ColumnType::Boolean, Data::Bool(b)) => Some(Cell::Bool(*b)),
        (ColumnType::Integer, d) => whole_number(d).map(Cell::Int),
        (ColumnType::Float, Data::Float(f)) => Some(Cell::Float(*f)),
        (ColumnType::Float, Data::Int(i)) => Some(Cell::Float(*i as f64)),
        (ColumnType::Text, d) => Some(Cell::Text(data_to_string(d))),
        _ => None,
    }
}

fn whole_number(d: &Data) -> Option<i64> {
    match d {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT as f64 => Some(*f as i64),
        _ => None,
    }
}

fn data_to_string(d: &Data) -> String {
    match d {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

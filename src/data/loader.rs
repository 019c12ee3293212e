use std::io::Read;
use std::path::Path;

use crate::data::dataset::{Cell, Row, Sheet, Workbook};
use crate::error::LoadError;

/// Load a CSV or spreadsheet file into a workbook of named sheets.
///
/// The first row of every sheet is the header row.
pub fn load_file(path: &Path) -> Result<Workbook, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let workbook = match ext.as_str() {
        "csv" => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Sheet1")
                .to_string();
            let file = std::fs::File::open(path)?;
            Workbook::new(vec![load_csv(&name, file)?])
        }
        "xls" | "xlsx" | "xlsm" | "ods" => load_excel(path)?,
        _ => return Err(LoadError::UnsupportedFormat(ext)),
    };

    if workbook.is_empty() {
        return Err(LoadError::Empty(path.display().to_string()));
    }
    tracing::info!(
        "Loaded {:?} with {} sheet(s)",
        path,
        workbook.sheets.len()
    );
    Ok(workbook)
}

/// Read CSV text into a single sheet.
///
/// Input that is not valid UTF-8 is decoded as Latin-1, which covers the
/// CSVs spreadsheet programs export on Windows.
pub fn load_csv<R: Read>(name: &str, mut reader: R) -> Result<Sheet, LoadError> {
    let mut content = Vec::new();
    reader.read_to_end(&mut content)?;
    let text = String::from_utf8(content)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut all_rows: Vec<Vec<String>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        all_rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    let Some((header, data_rows)) = all_rows.split_first() else {
        return Err(LoadError::Empty(name.to_string()));
    };
    let columns = header_names(header.iter().map(|h| h.trim().to_string()));

    let rows = data_rows
        .iter()
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| {
            columns
                .iter()
                .enumerate()
                .map(|(idx, col)| {
                    let cell = row.get(idx).map(|s| text_cell(s)).unwrap_or(Cell::Null);
                    (col.clone(), cell)
                })
                .collect::<Row>()
        })
        .collect();

    Ok(Sheet::new(name, columns, rows))
}

fn load_excel(path: &Path) -> Result<Workbook, LoadError> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = Vec::new();

    for sheet_name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet_name)?;
        let mut rows_iter = range.rows();
        let Some(header) = rows_iter.next() else {
            tracing::debug!("Skipping empty sheet {sheet_name}");
            continue;
        };
        let columns = header_names(header.iter().map(|c| match excel_cell(c) {
            Cell::Null => String::new(),
            other => other.display(),
        }));

        let rows = rows_iter
            .filter(|row| row.iter().any(|c| !matches!(c, calamine::Data::Empty)))
            .map(|row| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(idx, col)| {
                        let cell = row.get(idx).map(excel_cell).unwrap_or(Cell::Null);
                        (col.clone(), cell)
                    })
                    .collect::<Row>()
            })
            .collect();

        sheets.push(Sheet::new(sheet_name, columns, rows));
    }

    Ok(Workbook::new(sheets))
}

/// Name blank header cells `Column N` (1-based).
fn header_names<I: IntoIterator<Item = String>>(raw: I) -> Vec<String> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, name)| {
            if name.is_empty() {
                format!("Column {}", idx + 1)
            } else {
                name
            }
        })
        .collect()
}

fn text_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Cell::Null
    } else if let Ok(v) = trimmed.parse::<f64>() {
        Cell::Number(v)
    } else {
        Cell::Text(raw.to_string())
    }
}

fn excel_cell(cell: &calamine::Data) -> Cell {
    use calamine::Data;

    match cell {
        Data::Empty => Cell::Null,
        Data::String(s) if s.is_empty() => Cell::Null,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Text(dt.to_string()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(format!("{e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_first_row_is_header() {
        let text = "X,Y,Label\n1,2,a\n3,,b\n";
        let sheet = load_csv("data", text.as_bytes()).unwrap();
        assert_eq!(sheet.name, "data");
        assert_eq!(sheet.columns, vec!["X", "Y", "Label"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0]["X"], Cell::Number(1.0));
        assert_eq!(sheet.rows[1]["Y"], Cell::Null);
        assert_eq!(sheet.rows[1]["Label"], Cell::Text("b".to_string()));
    }

    #[test]
    fn csv_short_rows_and_blank_headers() {
        let text = "A,,C\n1\n\n";
        let sheet = load_csv("s", text.as_bytes()).unwrap();
        assert_eq!(sheet.columns, vec!["A", "Column 2", "C"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0]["C"], Cell::Null);
    }

    #[test]
    fn latin1_csv_is_decoded() {
        let bytes: &[u8] = b"X,Temp\xe9rature\n1,2\n";
        let sheet = load_csv("latin1", bytes).unwrap();
        assert_eq!(sheet.columns, vec!["X", "Temp\u{e9}rature"]);
        assert_eq!(sheet.rows[0]["Temp\u{e9}rature"], Cell::Number(2.0));
    }

    #[test]
    fn empty_csv_is_an_error() {
        assert!(matches!(
            load_csv("empty", "".as_bytes()),
            Err(LoadError::Empty(_))
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "txt"));
    }
}

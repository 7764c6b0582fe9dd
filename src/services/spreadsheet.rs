use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use crate::errors::ApiError;

/// First worksheet of an uploaded workbook, with the header row
/// normalized and every data row padded to the header width.
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, ApiError> {
        self.column(name).ok_or_else(|| {
            ApiError::validation(format!("worksheet is missing required column '{}'", name))
        })
    }
}

/// Canonical form for header cells: trimmed, lower-cased, internal
/// whitespace runs collapsed to a single underscore. "Sub Category",
/// "sub_category" and "SUB CATEGORY" all resolve to the same key.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() {
            pending_separator = true;
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('_');
        }
        pending_separator = false;
        out.extend(c.to_lowercase());
    }
    out
}

pub fn cell_to_string(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) => f.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        Some(Data::Empty) | None => String::new(),
        _ => String::new(),
    }
}

/// Open a workbook from uploaded bytes and read its first worksheet.
/// Handles both .xlsx and .xls payloads.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Sheet, ApiError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)
        .map_err(|e| ApiError::validation(format!("failed to open workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ApiError::validation("workbook contains no sheets"))?;

    let range: Range<Data> = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ApiError::validation(format!("failed to read sheet '{}': {}", sheet_name, e)))?;

    if range.height() == 0 || range.width() == 0 {
        return Err(ApiError::validation(format!(
            "sheet '{}' is empty",
            sheet_name
        )));
    }

    let width = range.width();
    let headers = (0..width)
        .map(|col| normalize_header(&cell_to_string(range.get((0, col)))))
        .collect();

    let mut rows = Vec::with_capacity(range.height().saturating_sub(1));
    for row_idx in 1..range.height() {
        let row = (0..width)
            .map(|col| cell_to_string(range.get((row_idx, col))))
            .collect();
        rows.push(row);
    }

    Ok(Sheet { headers, rows })
}

/// Parse an integer cell, tolerating float representations such as
/// "12.0" (truncated toward zero).
pub fn parse_int_cell(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .parse::<i32>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_normalization_collapses_case_and_whitespace() {
        assert_eq!(normalize_header("Sub Category"), "sub_category");
        assert_eq!(normalize_header("  sub_category  "), "sub_category");
        assert_eq!(normalize_header("SUB   CATEGORY"), "sub_category");
        assert_eq!(normalize_header("Color"), "color");
    }

    #[test]
    fn int_cells_accept_float_representations() {
        assert_eq!(parse_int_cell("1200"), Some(1200));
        assert_eq!(parse_int_cell("860.0"), Some(860));
        assert_eq!(parse_int_cell(" 42 "), Some(42));
        assert_eq!(parse_int_cell(""), None);
        assert_eq!(parse_int_cell("n/a"), None);
    }
}

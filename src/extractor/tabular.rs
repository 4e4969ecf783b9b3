use crate::error::{AnalyzerError, Result};

/// Column that holds the reviews in uploaded CSV files.
pub const REVIEW_COLUMN: &str = "review";

/// Cell values read as missing, mirroring the defaults of common dataframe
/// CSV readers.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns every non-missing cell of `column`, in row order.
pub fn extract_column(bytes: &[u8], column: &str) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let index = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| AnalyzerError::MissingColumn {
            column: column.to_string(),
            available: headers.iter().map(str::to_string).collect(),
        })?;

    let mut cells = Vec::new();
    let mut missing = 0usize;

    for record in reader.records() {
        let record = record?;
        match record.get(index) {
            Some(cell) if !is_missing(cell) => cells.push(cell.to_string()),
            _ => missing += 1,
        }
    }

    tracing::debug!(
        column,
        cells = cells.len(),
        missing,
        "CSV column extraction complete"
    );

    Ok(cells)
}

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

//! CSV reader producing a [`RawTable`]

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::domain::{DomainError, RawTable};

/// Load a CSV file with a header row
pub fn load_csv(path: &Path) -> Result<RawTable, DomainError> {
    let file = std::fs::File::open(path).map_err(|e| {
        DomainError::dataset(format!("Cannot open dataset '{}': {}", path.display(), e))
    })?;

    let table = read_csv(file)?;

    info!(
        path = %path.display(),
        rows = table.n_rows(),
        columns = table.n_columns(),
        "Dataset loaded"
    );

    Ok(table)
}

/// Parse CSV content from any reader
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable, DomainError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(csv_error)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(DomainError::dataset("Dataset has no data rows"));
    }

    RawTable::from_strings(headers, rows)
}

fn csv_error(err: csv::Error) -> DomainError {
    match err.position() {
        Some(pos) => DomainError::dataset(format!("CSV error at line {}: {}", pos.line(), err)),
        None => DomainError::dataset(format!("CSV error: {}", err)),
    }
}

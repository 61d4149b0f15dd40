//! Filing file access
//!
//! Thin I/O collaborators around the core pipeline: tab-separated reading
//! with a header row, and filename-derived report-year metadata. Per-row
//! defects are the pipeline's concern; anything that invalidates the whole
//! row sequence (missing file, undecodable record) aborts immediately.

use std::path::Path;

use csv::ReaderBuilder;
use regex::Regex;
use thiserror::Error;

use crate::pipeline::Row;

/// Structural input defects. The row sequence cannot be trusted after any of
/// these, so there is no per-row recovery.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to open filing: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed filing record: {0}")]
    Malformed(#[from] csv::Error),
}

/// Read every row of a tab-separated filing with a header line.
///
/// Records shorter or longer than the header are tolerated: values pair with
/// header columns positionally and missing cells read as empty, which the
/// pipeline treats like any other blank value.
pub fn read_filing(path: &Path) -> Result<Vec<Row>, ReadError> {
    let file = std::fs::File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            headers
                .iter()
                .enumerate()
                .map(|(i, column)| {
                    (
                        column.to_string(),
                        record.get(i).unwrap_or_default().to_string(),
                    )
                })
                .collect(),
        );
    }
    Ok(rows)
}

/// First run of four consecutive digits anywhere in the file's name, if any.
/// Purely advisory metadata; the graph itself never depends on it.
pub fn report_year_from_path(path: &Path) -> Option<i32> {
    let name = path.file_name()?.to_string_lossy();
    let year = Regex::new(r"\d{4}").unwrap();
    year.find(&name).and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn report_year_takes_the_first_digit_run() {
        assert_eq!(
            report_year_from_path(Path::new("MAS_FID_2025-06-19.tsv")),
            Some(2025)
        );
        assert_eq!(
            report_year_from_path(Path::new("/data/fid_2019_2024.tsv")),
            Some(2019)
        );
        assert_eq!(report_year_from_path(Path::new("fid_latest.tsv")), None);
    }

    #[test]
    fn report_year_ignores_directory_components() {
        assert_eq!(
            report_year_from_path(Path::new("/exports/2024/fid_latest.tsv")),
            None
        );
    }

    #[test]
    fn short_records_read_as_empty_cells() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "Organisation Name\tAddress\tPhone Number\nAcme\t1 Raffles Pl\nBeta\n"
        )
        .unwrap();

        let rows = read_filing(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec![
                ("Organisation Name".to_string(), "Acme".to_string()),
                ("Address".to_string(), "1 Raffles Pl".to_string()),
                ("Phone Number".to_string(), String::new()),
            ]
        );
        assert_eq!(rows[1][0].1, "Beta");
        assert_eq!(rows[1][1].1, "");
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = read_filing(Path::new("/no/such/filing.tsv")).unwrap_err();
        assert!(matches!(err, ReadError::Io(_)));
    }
}

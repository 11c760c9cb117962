//! CSV header normalization and column resolution.

use std::path::Path;

use crate::error::{IngestError, Result};

/// Normalized header row of an input file.
#[derive(Debug, Clone)]
pub struct CsvHeaders {
    /// Column names as written (BOM removed), in file order.
    pub raw: Vec<String>,
    /// Normalized column names (trimmed, lowercase) for lookup.
    pub columns: Vec<String>,
}

/// Positions of the identifier and postcode columns within a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    /// `None` when the file has no identifier column and none was required.
    pub identifier: Option<usize>,
    pub postcode: usize,
}

impl ColumnIndices {
    /// Minimum record length needed to read the resolved columns.
    pub fn required_len(self) -> usize {
        self.identifier.unwrap_or(0).max(self.postcode) + 1
    }
}

impl CsvHeaders {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let raw: Vec<String> = names
            .into_iter()
            .map(|name| name.trim_start_matches('\u{feff}').to_string())
            .collect();
        let columns = raw.iter().map(|name| normalize_header(name)).collect();
        Self { raw, columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(String::is_empty)
    }

    /// Position of a column by name (case-insensitive, whitespace-trimmed).
    pub fn position(&self, name: &str) -> Option<usize> {
        let wanted = normalize_header(name);
        self.columns.iter().position(|column| *column == wanted)
    }

    /// Locate the identifier and postcode columns.
    ///
    /// Both are looked up by name. If neither name is present the first two
    /// columns are used positionally; if only one is present the other is
    /// reported missing. When `identifier_required` is false a file with only
    /// the postcode column resolves with no identifier.
    pub fn resolve(
        &self,
        identifier_column: &str,
        postcode_column: &str,
        identifier_required: bool,
        path: &Path,
    ) -> Result<ColumnIndices> {
        let missing = |column: &str| IngestError::MissingColumn {
            column: column.to_string(),
            path: path.to_path_buf(),
        };
        match (
            self.position(identifier_column),
            self.position(postcode_column),
        ) {
            (Some(identifier), Some(postcode)) => Ok(ColumnIndices {
                identifier: Some(identifier),
                postcode,
            }),
            (None, None) if self.len() >= 2 => {
                tracing::warn!(
                    path = %path.display(),
                    identifier_column,
                    postcode_column,
                    "named columns not found, using first two columns"
                );
                Ok(ColumnIndices {
                    identifier: Some(0),
                    postcode: 1,
                })
            }
            (None, Some(postcode)) if !identifier_required => Ok(ColumnIndices {
                identifier: None,
                postcode,
            }),
            (None, _) => Err(missing(identifier_column)),
            (Some(_), None) => Err(missing(postcode_column)),
        }
    }
}

/// Normalizes a header value for lookup.
pub fn normalize_header(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> CsvHeaders {
        CsvHeaders::new(names.iter().copied())
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Row_ID "), "row_id");
        assert_eq!(normalize_header("Postcode"), "postcode");
    }

    #[test]
    fn test_bom_is_removed() {
        let headers = headers(&["\u{feff}row_id", "postcode"]);
        assert_eq!(headers.raw[0], "row_id");
        assert_eq!(headers.position("row_id"), Some(0));
    }

    #[test]
    fn test_resolve_by_name() {
        let headers = headers(&["postcode", "extra", "ROW_ID"]);
        let indices = headers
            .resolve("row_id", "postcode", true, Path::new("in.csv"))
            .unwrap();
        assert_eq!(
            indices,
            ColumnIndices {
                identifier: Some(2),
                postcode: 0
            }
        );
        assert_eq!(indices.required_len(), 3);
    }

    #[test]
    fn test_resolve_positional_fallback() {
        let headers = headers(&["id", "pc"]);
        let indices = headers
            .resolve("row_id", "postcode", true, Path::new("in.csv"))
            .unwrap();
        assert_eq!(
            indices,
            ColumnIndices {
                identifier: Some(0),
                postcode: 1
            }
        );
    }

    #[test]
    fn test_resolve_partial_match_is_an_error() {
        let headers = headers(&["row_id", "pc"]);
        let err = headers
            .resolve("row_id", "postcode", true, Path::new("in.csv"))
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "postcode"));
    }

    #[test]
    fn test_resolve_single_unnamed_column_is_an_error() {
        let headers = headers(&["only"]);
        let err = headers
            .resolve("row_id", "postcode", true, Path::new("in.csv"))
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "row_id"));
    }

    #[test]
    fn test_resolve_without_identifier() {
        let headers = headers(&["source", "Postcode"]);
        let indices = headers
            .resolve("row_id", "postcode", false, Path::new("in.csv"))
            .unwrap();
        assert_eq!(
            indices,
            ColumnIndices {
                identifier: None,
                postcode: 1
            }
        );
        assert_eq!(indices.required_len(), 2);

        let err = headers
            .resolve("row_id", "postcode", true, Path::new("in.csv"))
            .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { ref column, .. } if column == "row_id"));
    }

    #[test]
    fn test_resolve_positional_fallback_wins_over_optional_identifier() {
        let headers = headers(&["id", "pc"]);
        let indices = headers
            .resolve("row_id", "postcode", false, Path::new("in.csv"))
            .unwrap();
        assert_eq!(indices.identifier, Some(0));
    }

    #[test]
    fn test_is_empty() {
        assert!(headers(&[""]).is_empty());
        assert!(!headers(&["row_id"]).is_empty());
    }
}

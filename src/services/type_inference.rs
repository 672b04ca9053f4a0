use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::middleware::AppError;
use crate::models::ColumnType;
use crate::storage::SearchStore;

static INTEGER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());
static FLOAT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(\.\d+)?$").unwrap());
static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").unwrap());

/// Infers a column's semantic type from a handful of its values
pub struct TypeInferencer;

impl TypeInferencer {
    /// Classify a sample set; every sample must agree for a type to win
    ///
    /// Checked in order Integer, Float, Timestamp, falling back to Text. An
    /// empty sample set is Text.
    pub fn classify<S: AsRef<str>>(samples: &[S]) -> ColumnType {
        if samples.is_empty() {
            return ColumnType::Text;
        }

        let all_match = |re: &Regex| samples.iter().all(|s| re.is_match(s.as_ref()));

        if all_match(&*INTEGER_RE) {
            ColumnType::Integer
        } else if all_match(&*FLOAT_RE) {
            ColumnType::Float
        } else if all_match(&*TIMESTAMP_RE) {
            ColumnType::Timestamp
        } else {
            ColumnType::Text
        }
    }

    /// Sample up to `sample_size` non-null values of a column and classify them
    pub fn infer_column<S: SearchStore + ?Sized>(
        store: &S,
        table: &str,
        column: &str,
        sample_size: usize,
    ) -> Result<ColumnType, AppError> {
        let samples = store.sample_values(table, column, sample_size)?;
        let column_type = Self::classify(&samples);
        tracing::debug!(
            "Inferred {}.{} as {} from {} samples",
            table,
            column,
            column_type.as_str(),
            samples.len()
        );
        Ok(column_type)
    }
}

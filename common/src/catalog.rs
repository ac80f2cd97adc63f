use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One row of the question bank, addressed by its dense catalog index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionRecord {
    pub index: usize,
    pub question: String,
    pub answer: String,
    pub category: String,
}

/// Immutable question bank built once at startup.
///
/// Records keep file order and are addressed by dense indices `0..N-1`;
/// the per-category groups hold those same global indices in first-seen
/// order. Duplicate rows are kept as distinct indices: the bank may repeat
/// a question across categories on purpose, so the load is lossless.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<QuestionRecord>,
    categories: Vec<String>,
    by_category: HashMap<String, Vec<usize>>,
}

const REQUIRED_COLUMNS: [&str; 3] = ["Question", "Answer", "Category"];

impl Catalog {
    pub fn load_from_csv(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_csv_bytes(&bytes)
    }

    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        let text = std::str::from_utf8(bytes).map_err(|e| {
            AppError::MalformedData(format!("question bank is not valid UTF-8: {e}"))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let mut column_positions = [0usize; 3];
        for (slot, column) in column_positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| {
                    AppError::MalformedData(format!("missing required column '{column}'"))
                })?;
        }
        let [question_col, answer_col, category_col] = column_positions;

        let mut records = Vec::new();
        let mut categories = Vec::new();
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();

        for (row, result) in reader.records().enumerate() {
            let record = result?;
            let field = |position: usize, column: &str| -> Result<String, AppError> {
                match record.get(position) {
                    Some(value) if !value.is_empty() => Ok(value.to_owned()),
                    _ => Err(AppError::MalformedData(format!(
                        "row {}: empty or missing '{column}' field",
                        row + 1
                    ))),
                }
            };

            let question = field(question_col, "Question")?;
            let answer = field(answer_col, "Answer")?;
            let category = field(category_col, "Category")?;

            let index = records.len();
            match by_category.get_mut(&category) {
                Some(indices) => indices.push(index),
                None => {
                    categories.push(category.clone());
                    by_category.insert(category.clone(), vec![index]);
                }
            }
            records.push(QuestionRecord {
                index,
                question,
                answer,
                category,
            });
        }

        Ok(Self {
            records,
            categories,
            by_category,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, index: usize) -> Option<&QuestionRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    /// Category names in first-seen order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Global catalog indices for a category, in first-seen order.
    pub fn category_indices(&self, category: &str) -> Option<&[usize]> {
        self.by_category.get(category).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"Question,Answer,Category\n\
        What is a B-tree?,A balanced tree index,Databases\n\
        What is normalization?,Removing redundancy,Databases\n\
        What is TCP?,A reliable transport protocol,Networking\n\
        What is a B-tree?,A balanced tree index,Networking\n";

    #[test]
    fn test_load_counts_match_rows() {
        let catalog = Catalog::from_csv_bytes(SAMPLE).expect("catalog should load");
        assert_eq!(catalog.len(), 4);

        let grouped: usize = catalog
            .categories()
            .iter()
            .map(|c| catalog.category_indices(c).map_or(0, <[usize]>::len))
            .sum();
        assert_eq!(grouped, catalog.len());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let catalog = Catalog::from_csv_bytes(SAMPLE).expect("catalog should load");
        assert_eq!(catalog.categories(), ["Databases", "Networking"]);
        assert_eq!(catalog.category_indices("Databases"), Some(&[0, 1][..]));
        assert_eq!(catalog.category_indices("Networking"), Some(&[2, 3][..]));
        assert!(catalog.category_indices("Algorithms").is_none());
    }

    #[test]
    fn test_duplicate_rows_keep_distinct_indices() {
        let catalog = Catalog::from_csv_bytes(SAMPLE).expect("catalog should load");
        let first = catalog.record(0).expect("record 0");
        let duplicate = catalog.record(3).expect("record 3");
        assert_eq!(first.question, duplicate.question);
        assert_ne!(first.index, duplicate.index);
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let result = Catalog::from_csv_bytes(b"Question,Answer\nWhat is TCP?,A protocol\n");
        assert!(
            matches!(result, Err(AppError::MalformedData(msg)) if msg.contains("Category")),
            "missing column should name the column"
        );
    }

    #[test]
    fn test_empty_field_is_malformed() {
        let result =
            Catalog::from_csv_bytes(b"Question,Answer,Category\nWhat is TCP?,,Networking\n");
        assert!(matches!(result, Err(AppError::MalformedData(msg)) if msg.contains("Answer")));
    }

    #[test]
    fn test_invalid_encoding_is_malformed() {
        // 0xFF is never valid in UTF-8
        let result = Catalog::from_csv_bytes(b"Question,Answer,Category\n\xFF,answer,cat\n");
        assert!(matches!(result, Err(AppError::MalformedData(msg)) if msg.contains("UTF-8")));
    }

    #[test]
    fn test_load_from_csv_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE).expect("write sample bank");

        let catalog = Catalog::load_from_csv(file.path()).expect("load from disk");
        assert_eq!(catalog.len(), 4);

        let missing = Catalog::load_from_csv("/nonexistent/questions.csv");
        assert!(matches!(missing, Err(AppError::Io(_))));
    }

    #[test]
    fn test_empty_bank_has_no_categories() {
        let catalog =
            Catalog::from_csv_bytes(b"Question,Answer,Category\n").expect("empty bank loads");
        assert!(catalog.is_empty());
        assert!(catalog.categories().is_empty());
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::Question;

use super::FallbackSet;

/// Errors raised while loading a fallback question file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("fallback question set must contain at least one question")]
    Empty,
}

/// Load a replacement fallback set from a JSON array of questions.
///
/// Entries use the cache's question shape
/// (`{question, options, correctAnswer, translation?}`); missing ids are
/// filled in from the position in the file.
pub fn load_fallback_from_json<P: AsRef<Path>>(path: P) -> Result<FallbackSet, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let questions: Vec<Question> =
        serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let questions = questions
        .into_iter()
        .zip(1u8..)
        .map(|(question, position)| match question.id() {
            0 => question.with_id(position),
            _ => question,
        })
        .collect();

    tracing::info!(path = %path.display(), "loaded fallback questions");
    FallbackSet::new(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("kbc-fallback-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_loads_and_numbers_questions() {
        let path = write_temp(
            r#"[
                {"question":"One?","options":["a","b","c","d"],"correctAnswer":0},
                {"id":9,"question":"Two?","options":["a","b","c","d"],"correctAnswer":3}
            ]"#,
        );
        let set = load_fallback_from_json(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(set.len(), 2);
        assert_eq!(set.for_level(1).id(), 1);
        assert_eq!(set.for_level(2).id(), 9);
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let path = write_temp("[]");
        let result = load_fallback_from_json(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(LoadError::Empty)));
    }

    #[test]
    fn test_invalid_answer_index_is_a_parse_error() {
        let path = write_temp(r#"[{"question":"q","options":["a","b","c","d"],"correctAnswer":5}]"#);
        let result = load_fallback_from_json(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = load_fallback_from_json("/definitely/not/here.json");
        assert!(matches!(result, Err(LoadError::Read { .. })));
    }
}

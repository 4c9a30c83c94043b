//! Load the normalized JSON dataset (styles, skills, enemies, knowledge tables).
//! The workbook normalizer writes this file; the advisor only reads it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::data::model::{Enemy, Skill, Style};

pub const DEFAULT_DATA_PATH: &str = "data/hbr_data.json";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read dataset '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default)]
pub struct AdvisorData {
    pub styles: Vec<Style>,
    pub skills: Vec<Skill>,
    pub enemies: Vec<Enemy>,
    /// Raw knowledge tables keyed by table name. Always an object, possibly empty.
    pub knowledge: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    styles: Vec<Style>,
    #[serde(default)]
    skills: Vec<Skill>,
    #[serde(default)]
    enemies: Vec<Enemy>,
    #[serde(default)]
    knowledge: Value,
}

pub fn parse_dataset(raw: &str) -> Result<AdvisorData, DataError> {
    let parsed: DatasetFile = serde_json::from_str(raw)?;
    let knowledge = match parsed.knowledge {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Ok(AdvisorData {
        styles: parsed.styles,
        skills: parsed.skills,
        enemies: parsed.enemies,
        knowledge,
    })
}

pub fn load_dataset(path: impl AsRef<Path>) -> Result<AdvisorData, DataError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let data = parse_dataset(&raw)?;
    info!(
        path = %path.display(),
        styles = data.styles.len(),
        skills = data.skills.len(),
        enemies = data.enemies.len(),
        knowledge_tables = data.knowledge.len(),
        "dataset loaded"
    );
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_default_to_empty() {
        let data = parse_dataset(r#"{"styles":[{"style_name":"A","character":"x"}]}"#)
            .expect("dataset should parse");
        assert_eq!(data.styles.len(), 1);
        assert!(data.skills.is_empty());
        assert!(data.enemies.is_empty());
        assert!(data.knowledge.is_empty());
    }

    #[test]
    fn non_object_knowledge_becomes_empty() {
        let data = parse_dataset(r#"{"knowledge":[1,2,3]}"#).expect("dataset should parse");
        assert!(data.knowledge.is_empty());
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let err = parse_dataset("{not json").expect_err("should fail");
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_dataset("does/not/exist.json").expect_err("should fail");
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}

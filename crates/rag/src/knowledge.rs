//! Knowledge base file loading
//!
//! Loads the article corpus from YAML or JSON files: a list of
//! title/description records under an `articles` key. The corpus is read
//! once at training time; the serving path never touches the filesystem.

use serde::{Deserialize, Serialize};
use std::path::Path;

use portal_assist_core::ArticleRecord;

use crate::RagError;

/// Knowledge base file format
#[derive(Debug, Serialize, Deserialize)]
pub struct KnowledgeFile {
    /// Format version marker
    #[serde(default)]
    pub version: Option<String>,
    /// Article records
    pub articles: Vec<ArticleRecord>,
}

/// Loader for knowledge base files
pub struct KnowledgeLoader;

impl KnowledgeLoader {
    /// Load article records from a YAML or JSON file
    pub fn load_file(path: &Path) -> Result<Vec<ArticleRecord>, RagError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RagError::Index(format!("failed to read {}: {}", path.display(), e)))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let file: KnowledgeFile = match extension {
            "json" => serde_json::from_str(&raw)
                .map_err(|e| RagError::Index(format!("invalid JSON knowledge file: {}", e)))?,
            "yaml" | "yml" => serde_yaml::from_str(&raw)
                .map_err(|e| RagError::Index(format!("invalid YAML knowledge file: {}", e)))?,
            other => {
                return Err(RagError::Index(format!(
                    "unsupported knowledge file extension: {:?}",
                    other
                )))
            }
        };

        tracing::info!(
            path = %path.display(),
            articles = file.articles.len(),
            "knowledge file loaded"
        );
        Ok(file.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "articles:\n  - title: Price list update\n    description: Steps to update.\n  - title: Registration"
        )
        .unwrap();

        let articles = KnowledgeLoader::load_file(file.path()).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Price list update");
        assert!(articles[1].description.is_none());
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"articles": [{{"title": "A", "description": "B"}}]}}"#
        )
        .unwrap();

        let articles = KnowledgeLoader::load_file(file.path()).unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].description.as_deref(), Some("B"));
    }

    #[test]
    fn test_unsupported_extension() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "not a knowledge file").unwrap();
        assert!(KnowledgeLoader::load_file(file.path()).is_err());
    }
}

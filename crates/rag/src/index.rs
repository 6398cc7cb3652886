//! Trained knowledge index
//!
//! The index owns every artifact produced by training: classified articles,
//! the BM25 index, the document embedding matrix, and the vocabulary and
//! abbreviation tables the query analyzer is rebuilt from. It contains only
//! plain data — model handles are injected separately and re-attached after
//! a load. Training is a one-time exclusive operation; a trained index is
//! immutable and safe to share across concurrent readers.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use portal_assist_config::AppConfig;
use portal_assist_core::{Article, ArticleRecord, EntityRecognizer, TextEncoder};
use portal_assist_text_processing::{
    AbbreviationDictionary, QueryAnalyzer, RuleBasedRecognizer, Vocabulary,
};

use crate::bm25::Bm25Index;
use crate::semantic::EmbeddingMatrix;
use crate::RagError;

/// Trained artifacts of the knowledge base
#[derive(Serialize, Deserialize)]
pub struct KnowledgeIndex {
    pub articles: Vec<Article>,
    pub bm25: Bm25Index,
    /// One row per article; `None` when training ran lexical-only
    pub embeddings: Option<EmbeddingMatrix>,
    pub vocabulary: Vocabulary,
    pub abbreviations: AbbreviationDictionary,
    /// False when the encoder was unavailable at training time
    pub semantic_enabled: bool,
}

impl KnowledgeIndex {
    /// Train the index over the corpus
    ///
    /// An empty corpus is a fatal error. An unavailable encoder is not:
    /// training falls back to lexical-only scoring and records the
    /// degradation in `semantic_enabled`.
    pub async fn train(
        records: &[ArticleRecord],
        encoder: Option<&dyn TextEncoder>,
        config: &AppConfig,
    ) -> Result<Self, RagError> {
        if records.is_empty() {
            return Err(RagError::EmptyCorpus);
        }
        tracing::info!(articles = records.len(), "training index");

        let combined_texts: Vec<String> = records
            .iter()
            .map(|record| match &record.description {
                Some(description) if !description.is_empty() => {
                    format!("{} {}", record.title, description)
                }
                _ => record.title.clone(),
            })
            .collect();

        // vocabulary and abbreviations come from the raw corpus text
        let vocabulary = Vocabulary::build(combined_texts.iter().map(String::as_str));
        let mut abbreviations = AbbreviationDictionary::default();
        for text in &combined_texts {
            abbreviations.harvest(text);
        }

        let analyzer = QueryAnalyzer::new(
            vocabulary.clone(),
            abbreviations.clone(),
            Arc::new(RuleBasedRecognizer::new()),
            config.boost.clone(),
        );

        let mut articles = Vec::with_capacity(records.len());
        let mut token_lists = Vec::with_capacity(records.len());
        for (id, (record, combined_text)) in
            records.iter().zip(combined_texts.iter()).enumerate()
        {
            let classification = analyzer.classify(combined_text, &[]).as_doc();
            let lexical_tokens = analyzer.lexical_tokens(combined_text);
            token_lists.push(lexical_tokens.clone());
            articles.push(Article {
                id: id as u32,
                title: record.title.clone(),
                description: record.description.clone(),
                combined_text: combined_text.clone(),
                classification,
                lexical_tokens,
            });
        }

        let bm25 = Bm25Index::build(&token_lists, config.search.bm25_k1, config.search.bm25_b);

        let (embeddings, semantic_enabled) = match encoder {
            Some(encoder) => match encoder.encode_batch(&combined_texts).await {
                Ok(rows) => match EmbeddingMatrix::from_rows(rows) {
                    Some(matrix) => {
                        tracing::info!(
                            rows = matrix.rows(),
                            dimension = matrix.dimension(),
                            "document embeddings computed"
                        );
                        (Some(matrix), true)
                    }
                    None => {
                        tracing::warn!("encoder returned malformed embeddings, running lexical-only");
                        (None, false)
                    }
                },
                Err(error) => {
                    tracing::warn!(%error, "encoder unavailable, running lexical-only");
                    (None, false)
                }
            },
            None => (None, false),
        };

        tracing::info!(
            indexed = bm25.indexed_count(),
            semantic = semantic_enabled,
            "index training complete"
        );

        Ok(Self {
            articles,
            bm25,
            embeddings,
            vocabulary,
            abbreviations,
            semantic_enabled,
        })
    }

    /// Rebuild the query analyzer from the stored artifacts
    pub fn analyzer(
        &self,
        recognizer: Arc<dyn EntityRecognizer>,
        config: &AppConfig,
    ) -> QueryAnalyzer {
        QueryAnalyzer::new(
            self.vocabulary.clone(),
            self.abbreviations.clone(),
            recognizer,
            config.boost.clone(),
        )
    }

    /// Persist the artifacts with an atomic temp-file rename
    pub fn save(&self, path: &Path) -> Result<(), RagError> {
        let bytes = bincode::serialize(self)
            .map_err(|e| RagError::Persistence(format!("serialize failed: {}", e)))?;

        let tmp_path = path.with_extension("tmp");
        std::fs::write(&tmp_path, &bytes)
            .map_err(|e| RagError::Persistence(format!("write failed: {}", e)))?;
        std::fs::rename(&tmp_path, path)
            .map_err(|e| RagError::Persistence(format!("rename failed: {}", e)))?;

        tracing::info!(path = %path.display(), bytes = bytes.len(), "index saved");
        Ok(())
    }

    /// Load previously saved artifacts
    ///
    /// Model handles are not part of the artifact; callers re-attach them
    /// afterwards and degrade the corresponding feature if that fails.
    pub fn load(path: &Path) -> Result<Self, RagError> {
        let bytes = std::fs::read(path)
            .map_err(|e| RagError::Persistence(format!("read failed: {}", e)))?;
        let index: Self = bincode::deserialize(&bytes)
            .map_err(|e| RagError::Persistence(format!("deserialize failed: {}", e)))?;

        tracing::info!(
            path = %path.display(),
            articles = index.articles.len(),
            semantic = index.semantic_enabled,
            "index loaded"
        );
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::HashEncoder;
    use portal_assist_core::QueryType;

    fn corpus() -> Vec<ArticleRecord> {
        vec![
            ArticleRecord::new(
                "Price list update instructions",
                Some("How to update the price list in the catalog step by step.".to_string()),
            ),
            ArticleRecord::new(
                "Supplier registration",
                Some("Register a supplier profile on the portal.".to_string()),
            ),
            ArticleRecord::new(
                "Contract signing error",
                Some("The portal reports an error when signing the contract.".to_string()),
            ),
        ]
    }

    #[tokio::test]
    async fn test_empty_corpus_is_fatal() {
        let config = AppConfig::default();
        let result = KnowledgeIndex::train(&[], None, &config).await;
        assert!(matches!(result, Err(RagError::EmptyCorpus)));
    }

    #[tokio::test]
    async fn test_train_classifies_documents() {
        let config = AppConfig::default();
        let index = KnowledgeIndex::train(&corpus(), None, &config).await.unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(
            index.articles[0].classification.query_type,
            QueryType::Instruction
        );
        assert_eq!(index.articles[2].classification.query_type, QueryType::Error);
        assert!(index.articles[2].classification.is_error);
        assert!(!index.semantic_enabled);
    }

    #[tokio::test]
    async fn test_train_with_encoder() {
        let config = AppConfig::default();
        let encoder = HashEncoder::new(64);
        let index = KnowledgeIndex::train(&corpus(), Some(&encoder), &config)
            .await
            .unwrap();

        assert!(index.semantic_enabled);
        let matrix = index.embeddings.as_ref().unwrap();
        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.dimension(), 64);
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let config = AppConfig::default();
        let encoder = HashEncoder::new(32);
        let index = KnowledgeIndex::train(&corpus(), Some(&encoder), &config)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.bin");
        index.save(&path).unwrap();
        let loaded = KnowledgeIndex::load(&path).unwrap();

        // identical lexical scores for a held-out query
        let analyzer = index.analyzer(Arc::new(RuleBasedRecognizer::new()), &config);
        let query_tokens = analyzer.lexical_tokens("update the price list");
        assert_eq!(
            index.bm25.scores(&query_tokens),
            loaded.bm25.scores(&query_tokens)
        );

        // identical embeddings
        let original = index.embeddings.as_ref().unwrap();
        let reloaded = loaded.embeddings.as_ref().unwrap();
        assert_eq!(original.rows(), reloaded.rows());
        for row in 0..original.rows() {
            assert_eq!(original.row(row), reloaded.row(row));
        }
    }
}

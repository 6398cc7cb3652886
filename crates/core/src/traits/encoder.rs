//! Dense encoder and pairwise scorer interfaces

use async_trait::async_trait;

use crate::Result;

/// Dense text encoder
///
/// Implementations:
/// - `OllamaEncoder` - embedding model behind an Ollama endpoint
/// - `HashEncoder` - deterministic fallback for tests and offline runs
///
/// # Example
///
/// ```ignore
/// let encoder: Arc<dyn TextEncoder> = Arc::new(OllamaEncoder::new(config));
/// let vector = encoder.encode("how do I update a price list").await?;
/// assert_eq!(vector.len(), encoder.dimension());
/// ```
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Encode one text into a fixed-length vector
    async fn encode(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode a batch of texts
    ///
    /// Called over the whole corpus at training time. The default
    /// implementation encodes sequentially; backends with a batch API
    /// should override it.
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.encode(text).await?);
        }
        Ok(vectors)
    }

    /// Embedding vector length
    fn dimension(&self) -> usize;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Pairwise relevance scorer
///
/// Optional replacement for cosine similarity: scores a (query, document)
/// pair directly. When attached, its score supersedes the cosine score as
/// the semantic signal; downstream boosting is unchanged.
#[async_trait]
pub trait PairwiseScorer: Send + Sync {
    /// Score a (query, document) pair; higher is more relevant
    async fn score(&self, query: &str, document: &str) -> Result<f32>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UnitEncoder;

    #[async_trait]
    impl TextEncoder for UnitEncoder {
        async fn encode(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        fn dimension(&self) -> usize {
            2
        }

        fn name(&self) -> &str {
            "unit"
        }
    }

    #[tokio::test]
    async fn test_default_batch_encoding() {
        let encoder = UnitEncoder;
        let texts = vec!["a".to_string(), "b".to_string()];
        let vectors = encoder.encode_batch(&texts).await.unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0], vec![1.0, 0.0]);
    }
}

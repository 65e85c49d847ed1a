use crate::services::ai::{AiError, InferenceClient};

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("Embedding capability failed: {0}")]
    Embedding(#[from] AiError),

    #[error("No scoreable text chunks in input")]
    NoChunks,
}

/// Similarity score between a resume and a job summary, in [0, 100] with
/// two-decimal rounding.
///
/// An empty or whitespace-only job summary short-circuits to 0.0 without
/// invoking the embedding capability.
pub async fn score(
    client: &InferenceClient,
    resume_text: &str,
    job_summary: &str,
) -> Result<f64, ScoreError> {
    if job_summary.trim().is_empty() {
        return Ok(0.0);
    }

    let resume_chunks = chunk_text(resume_text);
    let job_chunks = chunk_text(job_summary);

    if resume_chunks.is_empty() || job_chunks.is_empty() {
        return Err(ScoreError::NoChunks);
    }

    let resume_embeddings = client.embed_batch(&resume_chunks).await?;
    let job_embeddings = client.embed_batch(&job_chunks).await?;

    Ok(score_from_embeddings(&resume_embeddings, &job_embeddings))
}

/// Split text into sentence-level chunks, then extend with the clause-level
/// comma splits of every sentence. Sentences without commas reappear once as
/// their own clause chunk.
pub fn chunk_text(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut chunks: Vec<String> = lower
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    let clauses: Vec<String> = chunks
        .iter()
        .flat_map(|s| s.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    chunks.extend(clauses);
    chunks
}

/// Cosine similarity of the two centroid embeddings, scaled to [0, 100].
pub fn score_from_embeddings(resume: &[Vec<f32>], job: &[Vec<f32>]) -> f64 {
    let similarity = cosine_similarity(&centroid(resume), &centroid(job));
    scale_score(similarity)
}

/// Mean of a set of chunk embeddings, one representative vector per document.
fn centroid(vectors: &[Vec<f32>]) -> Vec<f32> {
    let Some(first) = vectors.first() else {
        return Vec::new();
    };

    let mut mean = vec![0.0f32; first.len()];
    for v in vectors {
        for (acc, x) in mean.iter_mut().zip(v) {
            *acc += x;
        }
    }
    let n = vectors.len() as f32;
    for acc in &mut mean {
        *acc /= n;
    }
    mean
}

/// Zero-magnitude inputs score 0.0 rather than NaN.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        dot += (*x as f64) * (*y as f64);
        norm_a += (*x as f64) * (*x as f64);
        norm_b += (*y as f64) * (*y as f64);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Scale a cosine similarity to [0, 100], rounded to two decimals.
fn scale_score(similarity: f64) -> f64 {
    let scaled = (similarity * 100.0).clamp(0.0, 100.0);
    (scaled * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunks_sentences_and_clauses() {
        let chunks = chunk_text("Rust developer, 5 years. Knows SQL.");
        assert_eq!(
            chunks,
            vec![
                "rust developer, 5 years",
                "knows sql",
                "rust developer",
                "5 years",
                "knows sql",
            ]
        );
    }

    #[test]
    fn test_chunking_drops_empty_segments() {
        assert!(chunk_text("...").is_empty());
        assert!(chunk_text("   ").is_empty());
        assert_eq!(chunk_text("one"), vec!["one", "one"]);
    }

    #[test]
    fn test_identical_centroids_score_100() {
        let resume = vec![vec![1.0, 2.0, 3.0]];
        let job = vec![vec![2.0, 4.0, 6.0]]; // same direction
        assert_eq!(score_from_embeddings(&resume, &job), 100.0);
    }

    #[test]
    fn test_orthogonal_centroids_score_0() {
        let resume = vec![vec![1.0, 0.0]];
        let job = vec![vec![0.0, 1.0]];
        assert_eq!(score_from_embeddings(&resume, &job), 0.0);
    }

    #[test]
    fn test_negative_similarity_clamped_to_0() {
        let resume = vec![vec![1.0, 0.0]];
        let job = vec![vec![-1.0, 0.0]];
        assert_eq!(score_from_embeddings(&resume, &job), 0.0);
    }

    #[test]
    fn test_centroid_is_mean_of_chunks() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(centroid(&vectors), vec![0.5, 0.5]);
    }

    #[test]
    fn test_score_rounded_to_two_decimals() {
        let resume = vec![vec![1.0, 1.0]];
        let job = vec![vec![1.0, 0.0]];
        let score = score_from_embeddings(&resume, &job);
        // cos(45°) * 100 = 70.7106...
        assert_eq!(score, 70.71);
    }

    #[test]
    fn test_zero_vectors_score_0_not_nan() {
        let resume = vec![vec![0.0, 0.0]];
        let job = vec![vec![1.0, 1.0]];
        let score = score_from_embeddings(&resume, &job);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_mismatched_dimensions_score_0() {
        let resume = vec![vec![1.0, 0.0, 0.0]];
        let job = vec![vec![1.0, 0.0]];
        assert_eq!(score_from_embeddings(&resume, &job), 0.0);
    }
}

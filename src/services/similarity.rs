//! TF-IDF vector space over short genre strings.
//!
//! Documents here are raw comma-joined genre fields ("Action,Indie"), so the
//! corpus is tiny and dense vectors are fine. Tokenization and weighting
//! follow the common conventions: lowercased alphanumeric tokens of two or
//! more characters, smoothed inverse document frequency, l2-normalized
//! vectors so cosine similarity reduces to a dot product.

use std::collections::{HashMap, HashSet};

/// Lowercased tokens of 2+ word characters
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// TF-IDF vectorizer fitted on a fixed corpus
pub struct Vectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl Vectorizer {
    /// Builds the vocabulary and idf weights from the corpus
    ///
    /// idf(t) = ln((1 + n) / (1 + df(t))) + 1, where n is the corpus size
    /// and df(t) the number of documents containing t.
    pub fn fit<S: AsRef<str>>(corpus: &[S]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();

        for doc in corpus {
            let distinct: HashSet<String> = tokenize(doc.as_ref()).into_iter().collect();
            for token in distinct {
                let next_index = vocabulary.len();
                let index = *vocabulary.entry(token).or_insert(next_index);
                if index == doc_freq.len() {
                    doc_freq.push(0);
                }
                doc_freq[index] += 1;
            }
        }

        let n = corpus.len() as f64;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// l2-normalized TF-IDF vector for a document
    ///
    /// Tokens outside the fitted vocabulary are ignored. An all-unknown or
    /// empty document yields the zero vector.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.vocabulary.len()];

        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                vector[index] += self.idf[index];
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        vector
    }
}

/// Cosine similarity between two vectors of equal dimension
///
/// Inputs from [`Vectorizer::transform`] are already normalized, but norms
/// are recomputed so the function is correct for arbitrary vectors too.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|v| v * v).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

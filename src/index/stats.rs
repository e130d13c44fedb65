use crate::index::corpus::CorpusSnapshot;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Summary figures for a corpus snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub image_count: usize,
    pub token_count: usize,
    pub distinct_tokens: usize,
    /// Mean confidence over tokens that report one
    pub average_confidence: Option<f32>,
}

impl CorpusStats {
    pub fn collect(snapshot: &CorpusSnapshot) -> Self {
        let mut token_count = 0;
        let mut distinct = FxHashSet::default();
        let mut confidence_sum = 0.0f64;
        let mut confidence_count = 0usize;

        for image in snapshot.all_images() {
            token_count += image.tokens.len();
            for token in &image.tokens {
                distinct.insert(token.normalized.as_str());
                if let Some(c) = token.confidence {
                    confidence_sum += f64::from(c);
                    confidence_count += 1;
                }
            }
        }

        let average_confidence =
            (confidence_count > 0).then(|| (confidence_sum / confidence_count as f64) as f32);

        Self {
            image_count: snapshot.len(),
            token_count,
            distinct_tokens: distinct.len(),
            average_confidence,
        }
    }
}

/// Display corpus statistics
pub fn show_stats(snapshot: &CorpusSnapshot) {
    let stats = CorpusStats::collect(snapshot);

    println!("Corpus Statistics");
    println!("=================");
    println!();
    println!("Images:           {}", stats.image_count);
    println!("Tokens:           {}", stats.token_count);
    println!("Distinct tokens:  {}", stats.distinct_tokens);
    match stats.average_confidence {
        Some(c) => println!("Avg confidence:   {:.3}", c),
        None => println!("Avg confidence:   n/a"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::types::{BoundingBox, ImageRecord, TokenRecord};

    #[test]
    fn test_collect_counts() {
        let b = BoundingBox::new(0, 0, 1, 1);
        let snapshot = CorpusSnapshot::from_records(vec![
            ImageRecord::new(
                1,
                vec![
                    TokenRecord::new("Task", b, Some(0.5)),
                    TokenRecord::new("task", b, Some(1.0)),
                ],
            ),
            ImageRecord::new(2, vec![TokenRecord::new("meeting", b, None)]),
        ]);

        let stats = CorpusStats::collect(&snapshot);
        assert_eq!(stats.image_count, 2);
        assert_eq!(stats.token_count, 3);
        assert_eq!(stats.distinct_tokens, 2);
        assert_eq!(stats.average_confidence, Some(0.75));
    }

    #[test]
    fn test_collect_empty() {
        let stats = CorpusStats::collect(&CorpusSnapshot::default());
        assert_eq!(stats.image_count, 0);
        assert_eq!(stats.average_confidence, None);
    }
}

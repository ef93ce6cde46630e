//! Greedy partitioning of texts into provider-safe request batches.

use serde::{Deserialize, Serialize};

/// Per-request limits a provider accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchLimits {
    /// Maximum number of texts in one request
    pub max_texts: usize,
    /// Exclusive upper bound on the summed character count of one request
    pub max_chars: usize,
}

impl BatchLimits {
    pub const fn new(max_texts: usize, max_chars: usize) -> Self {
        Self { max_texts, max_chars }
    }

    pub fn split<'a, T: AsRef<str>>(&self, texts: &'a [T]) -> Vec<&'a [T]> {
        text_batches(texts, self.max_texts, self.max_chars)
    }
}

/// Split `texts` into contiguous batches of at most `max_count` items whose
/// total character count stays below `max_chars`.
///
/// A text that alone reaches `max_chars` still gets a batch of its own; it is
/// never dropped or cut. Order is preserved and nothing is deduplicated.
pub fn text_batches<T: AsRef<str>>(texts: &[T], max_count: usize, max_chars: usize) -> Vec<&[T]> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut total_chars = 0;

    for (index, text) in texts.iter().enumerate() {
        let length = text.as_ref().chars().count();
        let count = index - start;

        if count < max_count && total_chars + length < max_chars {
            total_chars += length;
            continue;
        }

        if count > 0 {
            batches.push(&texts[start..index]);
        }
        start = index;
        total_chars = length;
    }

    if start < texts.len() {
        batches.push(&texts[start..]);
    }

    batches
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn chars_of(batch: &[String]) -> usize {
        batch.iter().map(|t| t.chars().count()).sum()
    }

    #[test]
    fn test_splits_by_count() {
        let texts = ["a", "b", "c"];
        let batches = text_batches(&texts, 2, 1000);
        assert_eq!(batches, vec![&["a", "b"][..], &["c"][..]]);
    }

    #[test]
    fn test_thirty_texts_make_two_batches() {
        let texts: Vec<String> = (0..30).map(|_| "x".to_string()).collect();
        let batches = text_batches(&texts, 25, 1000);
        let sizes: Vec<usize> = batches.iter().map(|b| b.len()).collect();
        assert_eq!(sizes, vec![25, 5]);
    }

    #[test]
    fn test_splits_by_length() {
        let texts = ["aaaa", "bbbb", "cccc"];
        // 4 + 4 = 8 < 9, adding a third would reach 12
        let batches = text_batches(&texts, 10, 9);
        assert_eq!(batches, vec![&["aaaa", "bbbb"][..], &["cccc"][..]]);
    }

    #[test]
    fn test_total_must_stay_strictly_below_limit() {
        let texts = ["aaaa", "bbbb"];
        let batches = text_batches(&texts, 10, 8);
        assert_eq!(batches.len(), 2);
    }

    #[test]
    fn test_oversized_text_gets_its_own_batch() {
        let long = "z".repeat(50);
        let texts = vec!["a".to_string(), long.clone(), "b".to_string()];
        let batches = text_batches(&texts, 10, 20);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[1], &[long][..]);
    }

    #[test]
    fn test_empty_input_gives_no_batches() {
        let texts: Vec<String> = Vec::new();
        assert!(text_batches(&texts, 25, 1000).is_empty());
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // Each of these is 3 chars but 9 bytes
        let texts = ["日本語", "中文字"];
        let batches = text_batches(&texts, 10, 7);
        assert_eq!(batches.len(), 1);
    }

    #[test]
    fn test_limits_split_delegates() {
        let limits = BatchLimits::new(2, 1000);
        let texts = ["a", "b", "c", "d", "e"];
        assert_eq!(limits.split(&texts).len(), 3);
    }

    proptest! {
        #[test]
        fn prop_batches_preserve_order_and_bounds(
            texts in proptest::collection::vec("[a-z ]{0,40}", 0..80),
            max_count in 1usize..30,
            max_chars in 1usize..200,
        ) {
            let batches = text_batches(&texts, max_count, max_chars);

            let flattened: Vec<String> = batches.iter().flat_map(|b| b.iter().cloned()).collect();
            prop_assert_eq!(&flattened, &texts);

            for batch in &batches {
                prop_assert!(!batch.is_empty());
                prop_assert!(batch.len() <= max_count);
                if batch.len() > 1 {
                    prop_assert!(chars_of(batch) < max_chars);
                } else if chars_of(batch) >= max_chars {
                    // A lone oversized text is the only allowed overflow
                    prop_assert_eq!(batch.len(), 1);
                }
            }
        }
    }
}

//! Recursive separator-based chunking with overlap.

use ragkb_core::{ChunkError, Chunker, ChunkingConfig};
use std::collections::VecDeque;
use tracing::warn;

/// Separator ladder, coarsest to finest. The empty string is the
/// character-level fallback.
const SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// Approximate characters per word, used to convert word budgets into
/// character budgets.
const CHARS_PER_WORD: usize = 5;

/// Recursive chunker with configurable size and overlap.
///
/// Splits on the coarsest separator present in the text, recursively
/// subdivides any piece still over the size budget with the finer
/// separators, then merges adjacent undersized pieces back together up to
/// the budget. Each emitted chunk starts with up to the overlap budget of
/// trailing context carried over from its predecessor.
pub struct RecursiveChunker {
    chunk_chars: usize,
    overlap_chars: usize,
}

impl RecursiveChunker {
    /// Create a new chunker. Fails fast on invalid sizing.
    pub fn new(config: &ChunkingConfig) -> Result<Self, ChunkError> {
        config.validate()?;
        Ok(Self {
            chunk_chars: config.chunk_words * CHARS_PER_WORD,
            overlap_chars: config.overlap_words * CHARS_PER_WORD,
        })
    }

    /// Size budget in characters.
    #[must_use]
    pub fn chunk_chars(&self) -> usize {
        self.chunk_chars
    }

    /// Overlap budget in characters.
    #[must_use]
    pub fn overlap_chars(&self) -> usize {
        self.overlap_chars
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // Pick the first separator that occurs in the text; the empty
        // string always matches and ends the ladder.
        let mut separator = *separators.last().unwrap_or(&"");
        let mut remaining: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep) {
                separator = sep;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let splits: Vec<String> = if separator.is_empty() {
            text.chars().map(|c| c.to_string()).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut good: Vec<String> = Vec::new();

        for piece in splits {
            if char_len(&piece) < self.chunk_chars {
                good.push(piece);
            } else {
                if !good.is_empty() {
                    chunks.extend(self.merge_splits(&good, separator));
                    good.clear();
                }
                if remaining.is_empty() {
                    // Nothing finer to split on; emit oversized as-is.
                    warn!(
                        "piece of {} chars exceeds budget {} with no finer separator",
                        char_len(&piece),
                        self.chunk_chars
                    );
                    chunks.push(piece);
                } else {
                    chunks.extend(self.split_recursive(&piece, remaining));
                }
            }
        }

        if !good.is_empty() {
            chunks.extend(self.merge_splits(&good, separator));
        }

        chunks
    }

    /// Merge undersized pieces back into budget-sized chunks.
    ///
    /// Keeps a sliding window: when the next piece would overflow the
    /// budget, the window is emitted as a chunk and drained from the front
    /// until it fits inside the overlap budget, so the retained tail seeds
    /// the next chunk.
    fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut docs: Vec<String> = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for piece in splits {
            let piece_len = char_len(piece);
            let join_cost = if window.is_empty() { 0 } else { sep_len };

            if total + piece_len + join_cost > self.chunk_chars {
                if !window.is_empty() {
                    if let Some(doc) = join_window(&window, separator) {
                        docs.push(doc);
                    }
                    while total > self.overlap_chars
                        || (total + piece_len + if window.is_empty() { 0 } else { sep_len }
                            > self.chunk_chars
                            && total > 0)
                    {
                        let front = window
                            .front()
                            .expect("window is non-empty while total > 0");
                        total -= char_len(front) + if window.len() > 1 { sep_len } else { 0 };
                        window.pop_front();
                    }
                }
            }

            window.push_back(piece);
            total += piece_len + if window.len() > 1 { sep_len } else { 0 };
        }

        if let Some(doc) = join_window(&window, separator) {
            docs.push(doc);
        }

        docs
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        self.split_recursive(text, SEPARATORS)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn join_window(window: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = window
        .iter()
        .copied()
        .collect::<Vec<_>>()
        .join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(chunk_words: usize, overlap_words: usize) -> RecursiveChunker {
        RecursiveChunker::new(&ChunkingConfig {
            chunk_words,
            overlap_words,
        })
        .unwrap()
    }

    /// 4-char words: "w000 w001 ..." so word budgets map exactly onto
    /// 5-char-per-word accounting.
    fn words(n: usize) -> String {
        (0..n)
            .map(|i| format!("w{i:03}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn rejects_overlap_at_or_above_chunk_size() {
        let equal = ChunkingConfig {
            chunk_words: 10,
            overlap_words: 10,
        };
        assert!(RecursiveChunker::new(&equal).is_err());

        let above = ChunkingConfig {
            chunk_words: 10,
            overlap_words: 20,
        };
        assert!(RecursiveChunker::new(&above).is_err());
    }

    #[test]
    fn budgets_convert_words_to_chars() {
        let c = chunker(80, 10);
        assert_eq!(c.chunk_chars(), 400);
        assert_eq!(c.overlap_chars(), 50);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let c = chunker(80, 10);
        assert!(c.chunk("").is_empty());
        assert!(c.chunk("   \n\t ").is_empty());
    }

    #[test]
    fn short_text_yields_single_identical_chunk() {
        let c = chunker(80, 10);
        let text = "A short note that fits easily in one chunk.";
        let chunks = c.chunk(text);
        assert_eq!(chunks, vec![text.to_string()]);
    }

    #[test]
    fn one_hundred_thirty_words_make_two_overlapping_chunks() {
        // 130 words, budget 80 words, overlap 10 words.
        let c = chunker(80, 10);
        let text = words(130);

        let chunks = c.chunk(&text);
        assert_eq!(chunks.len(), 2, "chunks: {chunks:?}");

        let first: Vec<&str> = chunks[0].split(' ').collect();
        let second: Vec<&str> = chunks[1].split(' ').collect();
        assert_eq!(first.len(), 80);
        assert_eq!(second.len(), 60);

        // The second chunk opens with the ten-word tail of the first.
        let tail = &first[70..];
        assert_eq!(&second[..10], tail);
    }

    #[test]
    fn chunks_never_grossly_exceed_budget() {
        let c = chunker(40, 5);
        let text = words(500);
        let chunks = c.chunk(&text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(
                chunk.chars().count() <= c.chunk_chars(),
                "chunk of {} chars over budget {}",
                chunk.chars().count(),
                c.chunk_chars()
            );
        }
    }

    #[test]
    fn consecutive_chunks_share_overlap() {
        let c = chunker(40, 5);
        let text = words(200);
        let chunks = c.chunk(&text);
        assert!(chunks.len() > 2);

        for pair in chunks.windows(2) {
            let prev_words: Vec<&str> = pair[0].split(' ').collect();
            let next_words: Vec<&str> = pair[1].split(' ').collect();
            let shared = &prev_words[prev_words.len() - 5..];
            assert_eq!(&next_words[..5], shared, "pair: {pair:?}");
        }
    }

    #[test]
    fn prefers_paragraph_breaks() {
        let c = chunker(80, 10);
        let para1 = "alpha ".repeat(50).trim().to_string();
        let para2 = "omega ".repeat(50).trim().to_string();
        let text = format!("{para1}\n\n{para2}");

        let chunks = c.chunk(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], para1);
        assert_eq!(chunks[1], para2);
    }

    #[test]
    fn falls_through_to_sentence_breaks() {
        let c = chunker(10, 2);
        let text = "First sentence here with words. Second sentence follows along. \
                    Third sentence closes it out.";
        let chunks = c.chunk(&text);
        assert!(chunks.len() > 1);
        // No chunk straddles a sentence boundary mid-sentence when the
        // sentences themselves fit the budget.
        assert!(chunks.iter().any(|ch| ch.starts_with("Second")
            || ch.starts_with("First")));
    }

    #[test]
    fn character_fallback_for_unbroken_text() {
        let c = chunker(2, 0);
        let text = "x".repeat(35);
        let chunks = c.chunk(&text);
        assert_eq!(chunks.len(), 4);
        assert!(chunks[..3].iter().all(|ch| ch.chars().count() == 10));
        assert_eq!(chunks[3].chars().count(), 5);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn multibyte_text_counts_chars_not_bytes() {
        let c = chunker(2, 0);
        let text = "日".repeat(25);
        let chunks = c.chunk(&text);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 10);
    }

    #[test]
    fn deterministic_across_runs() {
        let c = chunker(40, 5);
        let text = words(300);
        assert_eq!(c.chunk(&text), c.chunk(&text));
    }
}

//! Sliding-window text chunking
//!
//! Windows are measured in characters, not bytes. Consecutive chunks share
//! exactly `overlap` characters: each chunk after the first starts `overlap`
//! characters before the previous chunk's end, so dropping that prefix from
//! every chunk but the first and concatenating reproduces the input text
//! exactly.

use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;

/// Text chunker with configurable window size and overlap
pub struct TextChunker {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. Overlap is clamped below the window size so a
    /// window always advances.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split text into ordered chunks.
    ///
    /// Window ends prefer the last sentence boundary inside the window, then
    /// the last whitespace, but never a position that would stop the window
    /// from advancing. A token longer than the window is emitted as its own
    /// oversized chunk instead of looping. The final chunk is whatever
    /// remains and may be shorter than the window.
    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let n = chars.len();
        if n == 0 {
            return Vec::new();
        }

        let byte_at = |i: usize| if i < n { chars[i].0 } else { text.len() };
        let sentence_starts = self.sentence_start_positions(text, &chars);

        let mut chunks = Vec::new();
        let mut start = 0usize;

        loop {
            let end = if n - start <= self.chunk_size {
                n
            } else {
                self.pick_window_end(start, &chars, &sentence_starts)
            };

            chunks.push(text[byte_at(start)..byte_at(end)].to_string());

            if end >= n {
                break;
            }
            start = end - self.overlap;
        }

        chunks
    }

    /// Char positions where a new sentence begins (excluding position 0)
    fn sentence_start_positions(&self, text: &str, chars: &[(usize, char)]) -> Vec<usize> {
        let byte_to_char: HashMap<usize, usize> = chars
            .iter()
            .enumerate()
            .map(|(char_idx, (byte_idx, _))| (*byte_idx, char_idx))
            .collect();

        text.split_sentence_bound_indices()
            .filter_map(|(byte_idx, _)| byte_to_char.get(&byte_idx).copied())
            .filter(|&pos| pos > 0)
            .collect()
    }

    /// End position for a window starting at `start`, within [min_end, hard]
    /// where min_end keeps the next window strictly ahead of this one and
    /// hard is the window edge.
    fn pick_window_end(
        &self,
        start: usize,
        chars: &[(usize, char)],
        sentence_starts: &[usize],
    ) -> usize {
        let n = chars.len();
        let hard = start + self.chunk_size;
        let min_end = start + self.overlap + 1;

        // Last sentence boundary inside the window
        let upper = sentence_starts.partition_point(|&p| p <= hard);
        if upper > 0 {
            let candidate = sentence_starts[upper - 1];
            if candidate >= min_end {
                return candidate;
            }
        }

        // Last whitespace inside the window
        for end in (min_end..=hard).rev() {
            if chars[end - 1].1.is_whitespace() {
                return end;
            }
        }

        // No break at all: an unsplittable run longer than the window.
        // Emit it whole rather than spinning on the same position.
        let mut end = hard;
        while end < n && !chars[end].1.is_whitespace() {
            end += 1;
        }
        end
    }
}

//! Text chunking with page tracking
//!
//! Each page is cut into windows of at most `chunk_size` characters. A window
//! ends at the last paragraph break it contains, else the last sentence
//! boundary, else the last word boundary, and only falls back to a hard cut when
//! none of those exist. The next window starts `chunk_overlap` characters
//! before the previous cut, so consecutive chunks overlap and never leave a gap.

use unicode_segmentation::UnicodeSegmentation;

use crate::types::{ChunkMetadata, DocumentChunk, PdfDocument};

/// Text chunker with configurable size and overlap, both in characters
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Maximum chunk size
    chunk_size: usize,
    /// Overlap between consecutive chunks
    overlap: usize,
}

impl TextChunker {
    /// Create a new chunker. `overlap` is clamped below `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            overlap: overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk every page of a cleaned document, in page order
    pub fn text_to_chunks(&self, document: &PdfDocument) -> Vec<DocumentChunk> {
        let mut chunks = Vec::new();

        for page in &document.pages {
            let spans = self.split(&page.text);
            tracing::debug!("Page {}: {} chunks", page.num, spans.len());

            for (index, (start, end)) in spans.into_iter().enumerate() {
                let metadata = ChunkMetadata::new(document, page.num, index as u32);
                let content = page.text[start..end].trim().to_string();
                chunks.push(DocumentChunk::new(content, start, end, metadata));
            }
        }

        chunks
    }

    /// Split `text` into byte spans. Whitespace-only windows are dropped.
    pub fn split(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut start = 0usize;

        while start < text.len() {
            let window_end = advance_chars(text, start, self.chunk_size);

            let end = if window_end == text.len() {
                window_end
            } else {
                self.find_break(text, start, window_end)
            };

            if !text[start..end].trim().is_empty() {
                spans.push((start, end));
            }

            if end == text.len() {
                break;
            }
            start = self.next_start(text, start, end);
        }

        spans
    }

    /// Pick the cut for the window `text[start..window_end]`.
    ///
    /// Only cuts leaving more than `overlap` characters in the chunk are
    /// considered, so the next window always starts after `start`.
    fn find_break(&self, text: &str, start: usize, window_end: usize) -> usize {
        let min_end = advance_chars(text, start, self.overlap + 1);
        if min_end >= window_end {
            return window_end;
        }
        let window = &text[start..window_end];
        let min_rel = min_end - start;

        // Paragraph
        if let Some(pos) = window[min_rel..].rfind("\n\n") {
            return min_end + pos + 2;
        }

        // Sentence
        if let Some(rel) = window
            .split_sentence_bound_indices()
            .map(|(i, _)| i)
            .filter(|&i| i >= min_rel)
            .last()
        {
            return start + rel;
        }

        // Word
        if let Some(rel) = window
            .split_word_bound_indices()
            .filter(|(i, word)| *i >= min_rel && word.trim().is_empty())
            .map(|(i, word)| i + word.len())
            .filter(|&i| i < window.len())
            .last()
        {
            return start + rel;
        }

        window_end
    }

    /// Start of the window after a cut at `end`: `overlap` characters back,
    /// moved forward to the next word start when one exists before `end`.
    fn next_start(&self, text: &str, start: usize, end: usize) -> usize {
        let back = retreat_chars(text, end, self.overlap).max(start + 1);
        let mut next = back;
        while next < text.len() && !text.is_char_boundary(next) {
            next += 1;
        }

        if next > 0 && !text[..next].ends_with(char::is_whitespace) {
            if let Some(ws) = text[next..end].find(char::is_whitespace) {
                let after_ws = next + ws;
                let word_start = text[after_ws..end]
                    .find(|c: char| !c.is_whitespace())
                    .map(|offset| after_ws + offset);
                if let Some(word_start) = word_start {
                    return word_start;
                }
            }
        }

        next
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(1000, 200)
    }
}

/// Byte offset `n` characters after `from`, capped at the end of `text`
fn advance_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map(|(i, _)| from + i)
        .unwrap_or(text.len())
}

/// Byte offset `n` characters before `to`, floored at zero
fn retreat_chars(text: &str, to: usize, n: usize) -> usize {
    if n == 0 {
        return to;
    }
    text[..to]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageData;
    use proptest::prelude::*;

    fn document(pages: Vec<PageData>) -> PdfDocument {
        PdfDocument {
            title: "Handbook".to_string(),
            pages,
            ..Default::default()
        }
    }

    fn assert_covers(text: &str, spans: &[(usize, usize)]) {
        let first = text.find(|c: char| !c.is_whitespace()).unwrap();
        let last = text.trim_end().len();
        assert!(spans[0].0 <= first);
        assert!(spans.last().unwrap().1 >= last);
        for pair in spans.windows(2) {
            assert!(pair[1].0 > pair[0].0, "windows must advance");
            assert!(pair[1].0 <= pair[0].1, "gap between {:?} and {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_short_page_is_one_chunk() {
        let chunker = TextChunker::new(100, 20);
        let chunks = chunker.text_to_chunks(&document(vec![PageData::new(0, "Short page.")]));

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "Short page.");
        assert_eq!(chunks[0].metadata.page_number, 0);
        assert_eq!(chunks[0].metadata.chunk_index, 0);
        assert_eq!(chunks[0].metadata.title, "Handbook");
    }

    #[test]
    fn test_empty_page_has_no_chunks() {
        let chunker = TextChunker::new(100, 20);
        let chunks = chunker.text_to_chunks(&document(vec![PageData::new(4, "")]));
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_prefers_paragraph_break() {
        let text = format!("{}\n\n{}", "a".repeat(30), "b".repeat(30));
        let chunker = TextChunker::new(50, 5);
        let spans = chunker.split(&text);

        assert_eq!(text[spans[0].0..spans[0].1].trim_end(), "a".repeat(30));
        assert_covers(&text, &spans);
    }

    #[test]
    fn test_prefers_sentence_over_word() {
        let text = "The first sentence is here. The second one keeps going on and on without end";
        let chunker = TextChunker::new(40, 5);
        let spans = chunker.split(text);

        assert_eq!(text[spans[0].0..spans[0].1].trim(), "The first sentence is here.");
        assert_covers(text, &spans);
    }

    #[test]
    fn test_falls_back_to_word_boundary() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let chunker = TextChunker::new(20, 4);
        let spans = chunker.split(text);

        for &(start, end) in &spans {
            let chunk = text[start..end].trim();
            assert!(chunk.chars().count() <= 20);
            assert!(!chunk.starts_with(|c: char| c.is_whitespace()));
        }
        // No word is cut in half
        let first = text[spans[0].0..spans[0].1].trim();
        assert!(first.split(' ').all(|w| text.split(' ').any(|t| t == w)));
        assert_covers(text, &spans);
    }

    #[test]
    fn test_hard_cut_without_breakpoints() {
        let text = "x".repeat(95);
        let chunker = TextChunker::new(30, 10);
        let spans = chunker.split(&text);

        assert!(spans.len() > 3);
        assert!(spans.iter().all(|&(s, e)| e - s <= 30));
        assert_covers(&text, &spans);
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let chunker = TextChunker::new(25, 8);
        let spans = chunker.split(text);

        assert!(spans.len() > 1);
        assert!(spans[1].0 < spans[0].1);
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let text = "é".repeat(70);
        let chunker = TextChunker::new(25, 5);
        let spans = chunker.split(&text);

        for &(start, end) in &spans {
            assert!(text[start..end].chars().count() <= 25);
        }
        assert_covers(&text, &spans);
    }

    #[test]
    fn test_chunks_follow_page_order() {
        let doc = document(vec![
            PageData::new(0, "Page zero text."),
            PageData::new(2, "Page two text."),
        ]);
        let chunks = TextChunker::new(100, 10).text_to_chunks(&doc);

        let pages: Vec<u32> = chunks.iter().map(|c| c.metadata.page_number).collect();
        assert_eq!(pages, vec![0, 2]);
        assert_eq!(chunks[1].metadata.source, "p2-0");
    }

    #[test]
    fn test_overlap_is_clamped_below_size() {
        let chunker = TextChunker::new(10, 50);
        assert_eq!(chunker.overlap(), 9);
        let spans = chunker.split(&"y".repeat(40));
        assert_covers(&"y".repeat(40), &spans);
    }

    proptest! {
        #[test]
        fn prop_chunks_bounded_and_gapless(
            words in proptest::collection::vec("[a-zé]{1,15}[.,]?", 1..120),
            chunk_size in 20usize..120,
            overlap_pct in 0usize..50,
        ) {
            let text = words.join(" ");
            let overlap = chunk_size * overlap_pct / 100;
            let chunker = TextChunker::new(chunk_size, overlap);
            let spans = chunker.split(&text);

            prop_assert!(!spans.is_empty());
            for &(start, end) in &spans {
                prop_assert!(text[start..end].chars().count() <= chunk_size);
            }
            prop_assert_eq!(spans[0].0, 0);
            prop_assert_eq!(spans.last().unwrap().1, text.len());
            for pair in spans.windows(2) {
                prop_assert!(pair[1].0 > pair[0].0);
                prop_assert!(pair[1].0 <= pair[0].1);
            }
        }
    }
}

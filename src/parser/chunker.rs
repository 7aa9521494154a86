/// Default chunk size in characters, sized to stay well inside the
/// Gemini context window
pub const DEFAULT_CHUNK_SIZE: usize = 120_000;

const PARAGRAPH_BREAK: &str = "\n\n";
const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];

/// Text chunker that splits text into bounded chunks, preferring
/// paragraph and sentence boundaries
///
/// Sizes are counted in characters (Unicode scalar values), so a cut never
/// lands inside a multi-byte code point.
#[derive(Debug, Clone)]
pub struct TextChunker {
    pub max_chars: usize,
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl TextChunker {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    /// Split text into chunks of at most `max_chars` characters
    ///
    /// Text that already fits is returned as a single unchanged chunk. The
    /// paragraph break or single whitespace character a cut is made on is
    /// dropped; nothing else is.
    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut rest = text;

        while !rest.is_empty() {
            // Byte offset just past the first `max_chars` characters
            let window_end = match rest.char_indices().nth(self.max_chars) {
                Some((idx, _)) => idx,
                None => {
                    chunks.push(rest.to_string());
                    break;
                }
            };

            let (end, resume) = cut_point(rest, window_end);
            chunks.push(rest[..end].to_string());
            rest = &rest[resume..];
        }

        chunks
    }
}

/// Returns (end of chunk, start of remainder) as byte offsets into `rest`
fn cut_point(rest: &str, window_end: usize) -> (usize, usize) {
    let window = &rest[..window_end];

    if let Some(pos) = window.rfind(PARAGRAPH_BREAK).filter(|&pos| pos > 0) {
        return (pos, pos + PARAGRAPH_BREAK.len());
    }

    if let Some(end) = last_sentence_end(rest, window_end) {
        let gap = rest[end..].chars().next().map_or(0, char::len_utf8);
        return (end, end + gap);
    }

    (window_end, window_end)
}

/// Byte offset just past the last `.`, `!` or `?` inside the window that is
/// followed by whitespace
fn last_sentence_end(rest: &str, window_end: usize) -> Option<usize> {
    rest[..window_end]
        .char_indices()
        .rev()
        .filter(|(_, c)| SENTENCE_ENDINGS.contains(c))
        .map(|(idx, c)| idx + c.len_utf8())
        .find(|&end| rest[end..].chars().next().is_some_and(char::is_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn squeeze(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_empty_text() {
        let chunker = TextChunker::new(100);
        assert!(chunker.split("").is_empty());
    }

    #[test]
    fn test_small_text_fits_one_chunk() {
        let chunker = TextChunker::new(1000);
        let text = "  This is a small text that fits in one chunk.\n\n";
        assert_eq!(chunker.split(text), vec![text.to_string()]);
    }

    #[test]
    fn test_exact_fit_is_not_split() {
        let chunker = TextChunker::new(10);
        assert_eq!(chunker.split("abcdefghij"), vec!["abcdefghij"]);
    }

    #[test]
    fn test_paragraph_boundary_preferred() {
        let chunker = TextChunker::new(40);
        let text = "First paragraph. Still first.\n\nSecond paragraph here.";
        let chunks = chunker.split(text);
        assert_eq!(
            chunks,
            vec!["First paragraph. Still first.", "Second paragraph here."]
        );
    }

    #[test]
    fn test_sentence_boundary_when_no_paragraph() {
        let chunker = TextChunker::new(30);
        let text = "One sentence here. Another one follows after it.";
        let chunks = chunker.split(text);
        assert_eq!(chunks[0], "One sentence here.");
        assert_eq!(chunks[1], "Another one follows after it.");
    }

    #[test]
    fn test_punctuation_without_whitespace_is_not_a_boundary() {
        let chunker = TextChunker::new(8);
        let chunks = chunker.split("v1.2.3.4.5.6");
        assert_eq!(chunks, vec!["v1.2.3.4", ".5.6"]);
    }

    #[test]
    fn test_hard_cut_long_word() {
        let chunker = TextChunker::new(4);
        let chunks = chunker.split("abcdefghij");
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_unicode_text_never_splits_code_points() {
        let chunker = TextChunker::new(7);
        let text = "日本語のテスト文章です。これは二番目の文です。";
        let chunks = chunker.split(text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 7);
        }
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_zero_max_is_clamped() {
        let chunker = TextChunker::new(0);
        assert_eq!(chunker.max_chars, 1);
        assert_eq!(chunker.split("ab"), vec!["a", "b"]);
    }

    #[test]
    fn test_ten_thousand_chars_in_three_chunks() {
        let text: String = "Lorem ipsum dolor sit amet. "
            .repeat(400)
            .chars()
            .take(10_000)
            .collect();
        let chunks = TextChunker::new(4000).split(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[..2].iter().all(|c| c.ends_with('.')));
        assert_eq!(chunks[2].chars().count(), 2048);
        assert_eq!(squeeze(&chunks.concat()), squeeze(&text));
    }

    proptest! {
        #[test]
        fn chunks_respect_limit_and_reassemble(
            paragraphs in prop::collection::vec("[a-zA-Zé日 .!?\n]{0,60}", 0..20),
            limit in 1usize..80usize,
        ) {
            let text = paragraphs.join("\n\n");
            let chunks = TextChunker::new(limit).split(&text);

            for chunk in &chunks {
                let len = chunk.chars().count();
                prop_assert!(len >= 1 && len <= limit);
            }
            prop_assert_eq!(squeeze(&chunks.concat()), squeeze(&text));
            if text.is_empty() {
                prop_assert!(chunks.is_empty());
            }
        }

        #[test]
        fn short_text_is_returned_unchanged(text in ".{1,50}") {
            let chunks = TextChunker::new(50).split(&text);
            prop_assert_eq!(chunks, vec![text]);
        }
    }
}

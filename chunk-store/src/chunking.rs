//! Fixed-size text chunking with overlap.

/// Default chunk size in characters.
pub const CHUNK_CHARS: usize = 900;
/// Default overlap between consecutive chunks in characters.
pub const CHUNK_OVERLAP: usize = 120;

/// Splits `text` into chunks of at most `chunk_chars` characters, each
/// overlapping the previous chunk by `overlap` characters.
///
/// Counts characters, not bytes, so multi-byte text never splits inside a
/// code point. The final chunk may be shorter than `chunk_chars`.
pub fn chunk_text(text: &str, chunk_chars: usize, overlap: usize) -> Vec<String> {
    assert!(chunk_chars > overlap, "chunk size must exceed overlap");

    let chars: Vec<char> = text.chars().collect();
    let n = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < n {
        let end = (start + chunk_chars).min(n);
        chunks.push(chars[start..end].iter().collect());
        // back up for the next chunk to keep continuity across boundaries
        start = if end < n { end - overlap } else { n };
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = chunk_text("hello", 900, 120);
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn chunks_overlap() {
        let text = "abcdefghij"; // 10 chars
        let chunks = chunk_text(text, 6, 2);
        assert_eq!(chunks[0], "abcdef");
        // next chunk starts at 6 - 2 = 4
        assert_eq!(chunks[1], "efghij");
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn multibyte_text_does_not_panic() {
        let text = "ø".repeat(25);
        let chunks = chunk_text(&text, 10, 3);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk_text("", 900, 120).is_empty());
    }
}

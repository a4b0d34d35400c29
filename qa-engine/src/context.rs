//! Context assembly: garbage filtering, capping, citation tag derivation.

use chunk_store::ChunkHit;
use tracing::debug;

/// Context, citation tags, and source identifiers assembled from retrieval
/// hits. Tags and sources are deduplicated preserving first-occurrence order.
#[derive(Debug, Clone, Default)]
pub struct AssembledContext {
    /// Newline-joined chunk contents, bounded by the chunk cap.
    pub context: String,
    /// Deduplicated citation tags in first-retrieval-rank order.
    pub citation_tags: Vec<String>,
    /// Deduplicated source identifiers in first-occurrence order.
    pub source_files: Vec<String>,
}

/// Heuristic filter for OCR noise and numeric tables.
///
/// Rejects chunks shorter than 80 characters or whose digit-character ratio
/// exceeds 0.35. A ratio of exactly 0.35 is retained.
pub fn is_garbage(chunk: &str) -> bool {
    let total = chunk.chars().count();
    if total < 80 {
        return true;
    }
    let digits = chunk.chars().filter(char::is_ascii_digit).count();
    digits as f64 / total.max(1) as f64 > 0.35
}

/// Builds the bounded context from hits in retrieval order.
///
/// Applies the garbage filter, then takes chunks until `max_chunks` survive.
/// No similarity threshold is applied. Citation tags and source files are
/// deduplicated in order; the context text itself keeps every surviving
/// chunk's content as-is.
pub fn build_context(hits: &[ChunkHit], max_chunks: usize) -> AssembledContext {
    let mut ctx: Vec<&str> = Vec::new();
    let mut tags: Vec<String> = Vec::new();
    let mut source_files: Vec<String> = Vec::new();

    for hit in hits {
        if is_garbage(&hit.content) {
            continue;
        }
        ctx.push(&hit.content);
        tags.push(hit.citation_tag());
        source_files.push(hit.source_file.clone());
        if ctx.len() >= max_chunks {
            break;
        }
    }

    debug!("context assembly: kept={} total={}", ctx.len(), hits.len());

    AssembledContext {
        context: ctx.join("\n\n"),
        citation_tags: dedupe_in_order(tags),
        source_files: dedupe_in_order(source_files),
    }
}

/// Restricts hits to documents whose basename is on the allow-list.
pub fn restrict_to_system_docs(hits: Vec<ChunkHit>, allowlist: &[String]) -> Vec<ChunkHit> {
    hits.into_iter()
        .filter(|h| allowlist.iter().any(|a| a == h.basename()))
        .collect()
}

fn dedupe_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(source: &str, index: u32, content: &str) -> ChunkHit {
        ChunkHit {
            source_file: source.to_string(),
            chunk_index: index,
            content: content.to_string(),
            similarity: 0.9,
        }
    }

    fn good_text() -> String {
        "a".repeat(120)
    }

    #[test]
    fn seventy_nine_chars_is_garbage() {
        assert!(is_garbage(&"a".repeat(79)));
    }

    #[test]
    fn eighty_chars_with_low_digit_ratio_is_kept() {
        assert!(!is_garbage(&"a".repeat(80)));
    }

    #[test]
    fn digit_ratio_boundary_at_035() {
        // 100 chars total, 35 digits: ratio exactly 0.35, retained
        let at_limit = format!("{}{}", "1".repeat(35), "a".repeat(65));
        assert!(!is_garbage(&at_limit));
        // 36 digits: ratio 0.36, rejected
        let over_limit = format!("{}{}", "1".repeat(36), "a".repeat(64));
        assert!(is_garbage(&over_limit));
    }

    #[test]
    fn never_more_than_max_chunks() {
        let hits: Vec<ChunkHit> = (0..24).map(|i| hit("doc.txt", i, &good_text())).collect();
        let out = build_context(&hits, 5);
        assert_eq!(out.context.split("\n\n").count(), 5);
    }

    #[test]
    fn tags_and_sources_dedupe_in_first_occurrence_order() {
        let hits = vec![
            hit("A", 0, &good_text()),
            hit("B", 1, &good_text()),
            hit("A", 0, &good_text()),
        ];
        let out = build_context(&hits, 5);
        assert_eq!(out.citation_tags, vec!["[A:0]", "[B:1]"]);
        assert_eq!(out.source_files, vec!["A", "B"]);
    }

    #[test]
    fn garbage_rows_do_not_consume_the_cap() {
        let mut hits = vec![hit("junk.txt", 0, "too short")];
        hits.extend((0..5).map(|i| hit("doc.txt", i, &good_text())));
        let out = build_context(&hits, 5);
        assert_eq!(out.citation_tags.len(), 5);
        assert!(!out.citation_tags.contains(&"[junk.txt:0]".to_string()));
    }

    #[test]
    fn allowlist_restriction_matches_basenames() {
        let hits = vec![
            hit("library/08_Runbook.txt", 0, &good_text()),
            hit("library/datasheet.txt", 1, &good_text()),
        ];
        let allow = vec!["08_Runbook.txt".to_string()];
        let kept = restrict_to_system_docs(hits, &allow);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].source_file, "library/08_Runbook.txt");
    }
}

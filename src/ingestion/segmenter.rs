//! Structure-preserving splitting of parsed markdown into segments
//!
//! A single line-oriented pass over the flat text. Markdown table blocks and
//! bracketed image/diagram/chart description blocks each become one segment and
//! are never split; everything else accumulates into paragraph-level text
//! segments that downstream assembly can re-merge up to a size bound.

use regex::Regex;

use crate::types::{Segment, SegmentKind};

/// Splits flat text into ordered [`Segment`]s without crossing a structural
/// boundary.
pub struct StructuralSegmenter {
    /// A paragraph buffer must exceed this length before a blank line flushes it
    min_flush_len: usize,
    /// Matches a line opening an image/diagram/chart description block
    image_marker: Regex,
}

impl Default for StructuralSegmenter {
    fn default() -> Self {
        Self::new(20)
    }
}

impl StructuralSegmenter {
    /// Create a segmenter with the given paragraph-flush threshold
    pub fn new(min_flush_len: usize) -> Self {
        Self {
            min_flush_len,
            image_marker: Regex::new(r"(?i)^\[(image|diagram|chart):")
                .expect("image marker pattern is valid"),
        }
    }

    /// A table line starts with a vertical bar (after trimming) and contains at
    /// least one more, covering header, separator, and data rows.
    fn is_table_line(line: &str) -> bool {
        let trimmed = line.trim_start();
        trimmed.starts_with('|') && trimmed[1..].contains('|')
    }

    /// Split `text` into ordered segments covering the whole input, modulo
    /// per-segment trimming and collapsed blank-line runs.
    pub fn segment(&self, text: &str) -> Vec<Segment> {
        let lines: Vec<&str> = text.lines().collect();
        let mut segments = Vec::new();
        let mut buffer = String::new();
        let mut in_table = false;

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if Self::is_table_line(line) {
                if !in_table {
                    flush(&mut segments, &mut buffer, SegmentKind::Text);
                    in_table = true;
                }
                buffer.push_str(line);
                buffer.push('\n');
            } else if in_table && line.trim().is_empty() {
                flush(&mut segments, &mut buffer, SegmentKind::Table);
                in_table = false;
            } else if !in_table && self.image_marker.is_match(line.trim_start()) {
                flush(&mut segments, &mut buffer, SegmentKind::Text);

                // Greedily take the marker line and every following line until a
                // blank line or a line opening another bracketed tag. Brackets
                // not at the start of a line are ordinary content.
                let mut block = String::from(line);
                block.push('\n');
                let mut j = i + 1;
                while j < lines.len() {
                    let trimmed = lines[j].trim();
                    if trimmed.is_empty() || trimmed.starts_with('[') {
                        break;
                    }
                    block.push_str(lines[j]);
                    block.push('\n');
                    j += 1;
                }
                flush(&mut segments, &mut block, SegmentKind::Image);
                i = j;
                continue;
            } else {
                // Ordinary content. While inside a table this keeps the block
                // together until the blank line that terminates it.
                buffer.push_str(line);
                buffer.push('\n');
                if !in_table
                    && line.trim().is_empty()
                    && buffer.trim().len() > self.min_flush_len
                {
                    flush(&mut segments, &mut buffer, SegmentKind::Text);
                }
            }

            i += 1;
        }

        // A table that runs to end of input is still flushed whole.
        let final_kind = if in_table {
            SegmentKind::Table
        } else {
            SegmentKind::Text
        };
        flush(&mut segments, &mut buffer, final_kind);

        segments
    }
}

/// Emit the buffer as a segment when it holds anything beyond whitespace,
/// then clear it.
fn flush(segments: &mut Vec<Segment>, buffer: &mut String, kind: SegmentKind) {
    if !buffer.trim().is_empty() {
        segments.push(Segment::new(buffer.as_str(), kind));
    }
    buffer.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(segments: &[Segment]) -> Vec<SegmentKind> {
        segments.iter().map(|s| s.kind).collect()
    }

    #[test]
    fn plain_text_reconstructs_losslessly() {
        let input = "First paragraph with enough length to flush.\n\n\
                     Second paragraph, also long enough to matter.\n\n\
                     Third and final paragraph of the document.";
        let segmenter = StructuralSegmenter::default();
        let segments = segmenter.segment(input);

        assert!(segments.iter().all(|s| s.kind == SegmentKind::Text));
        let rebuilt = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        assert_eq!(rebuilt, input);
    }

    #[test]
    fn table_block_is_one_segment() {
        let input = "Before the table there is some prose.\n\n\
                     | Name | Value |\n|------|-------|\n| a | 1 |\n| b | 2 |\n\n\
                     After the table there is more prose.";
        let segments = StructuralSegmenter::default().segment(input);

        assert_eq!(
            kinds(&segments),
            vec![SegmentKind::Text, SegmentKind::Table, SegmentKind::Text]
        );
        let table = &segments[1];
        assert!(table.text.starts_with("| Name"));
        assert!(table.text.ends_with("| b | 2 |"));
        // No text segment carries a table row
        for seg in segments.iter().filter(|s| s.kind == SegmentKind::Text) {
            assert!(!seg.text.lines().any(StructuralSegmenter::is_table_line));
        }
    }

    #[test]
    fn table_at_end_of_input_is_flushed() {
        let input = "Intro paragraph long enough to stand alone.\n\n\
                     | A | B |\n|---|---|\n| 1 | 2 |";
        let segments = StructuralSegmenter::default().segment(input);
        assert_eq!(kinds(&segments), vec![SegmentKind::Text, SegmentKind::Table]);
    }

    #[test]
    fn image_block_collects_continuation_lines() {
        let input = "Some leading prose that is long enough here.\n\n\
                     [Image: architecture diagram]\nshowing three services\nconnected by queues\n\n\
                     Trailing prose that is long enough as well.";
        let segments = StructuralSegmenter::default().segment(input);

        assert_eq!(
            kinds(&segments),
            vec![SegmentKind::Text, SegmentKind::Image, SegmentKind::Text]
        );
        let image = &segments[1];
        assert!(image.text.starts_with("[Image: architecture diagram]"));
        assert!(image.text.contains("connected by queues"));
    }

    #[test]
    fn image_markers_are_case_insensitive() {
        for marker in ["[image: x]", "[DIAGRAM: y]", "[Chart: z]"] {
            let segments = StructuralSegmenter::default().segment(marker);
            assert_eq!(segments.len(), 1, "marker {marker:?}");
            assert_eq!(segments[0].kind, SegmentKind::Image);
        }
    }

    #[test]
    fn new_bracket_tag_ends_image_block() {
        let input = "[Image: first figure]\ncaption line\n[Chart: second figure]\nother caption";
        let segments = StructuralSegmenter::default().segment(input);
        assert_eq!(kinds(&segments), vec![SegmentKind::Image, SegmentKind::Image]);
        assert!(segments[0].text.contains("caption line"));
        assert!(segments[1].text.contains("other caption"));
    }

    #[test]
    fn brackets_mid_line_stay_inside_image_block() {
        let input = "[Diagram: flow]\nstep one [labelled] goes to step two";
        let segments = StructuralSegmenter::default().segment(input);
        assert_eq!(segments.len(), 1);
        assert!(segments[0].text.contains("[labelled]"));
    }

    #[test]
    fn short_fragment_merges_forward_instead_of_flushing() {
        let input = "Tiny.\n\nA considerably longer paragraph that clears the flush threshold.";
        let segments = StructuralSegmenter::default().segment(input);
        // The blank line after "Tiny." does not flush; both end up in one segment.
        assert_eq!(segments.len(), 1);
        assert!(segments[0].text.starts_with("Tiny."));
    }

    #[test]
    fn short_fragment_before_table_is_kept() {
        let input = "Intro paragraph.\n\n| A | B |\n|---|---|\n| 1 | 2 |\n\nConclusion paragraph.";
        let segments = StructuralSegmenter::default().segment(input);
        assert_eq!(
            kinds(&segments),
            vec![SegmentKind::Text, SegmentKind::Table, SegmentKind::Text]
        );
        assert_eq!(segments[0].text, "Intro paragraph.");
        assert_eq!(segments[2].text, "Conclusion paragraph.");
    }

    #[test]
    fn whitespace_only_input_yields_nothing() {
        let segments = StructuralSegmenter::default().segment("  \n\n   \n");
        assert!(segments.is_empty());
    }
}

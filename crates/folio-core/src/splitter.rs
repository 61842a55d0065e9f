//! Section-aware recursive character splitter.
//!
//! Sections delimited by a line equal to `section_delimiter` are hard
//! boundaries: no chunk ever spans two sections, and a section that fits in
//! `chunk_size` becomes exactly one chunk. Longer sections are cut on the
//! strongest separator that yields pieces within budget (paragraphs, lines,
//! spaces, then raw characters) and the pieces are merged back into chunks
//! of at most `chunk_size` characters, each sharing up to `chunk_overlap`
//! characters with its predecessor.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::{Error, Result};
use crate::types::Chunk;

/// Separators tried inside a section, strongest first. The empty separator
/// means "cut anywhere".
const SOFT_SEPARATORS: &[&str] = &["\n\n", "\n", " ", ""];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Maximum characters shared by neighbouring chunks of one section.
    pub chunk_overlap: usize,
    /// A line consisting of this string separates résumé sections.
    pub section_delimiter: Option<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: 1000, chunk_overlap: 200, section_delimiter: Some("---".to_string()) }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunking.chunk_size must be at least 1".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: ChunkingConfig,
}

impl TextSplitter {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split `document` into trimmed, non-empty chunks. Empty input yields none.
    pub fn split(&self, document: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for section in self.sections(document) {
            for range in self.split_section(document, section) {
                push_trimmed(document, range, &mut chunks);
            }
        }
        chunks
    }

    fn sections(&self, document: &str) -> Vec<Range<usize>> {
        let delimiter = match self.config.section_delimiter.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => d,
            _ => return vec![0..document.len()],
        };
        let mut sections = Vec::new();
        let mut start = 0;
        let mut offset = 0;
        for line in document.split_inclusive('\n') {
            let line_end = offset + line.len();
            if line.trim() == delimiter {
                sections.push(start..offset);
                start = line_end;
            }
            offset = line_end;
        }
        sections.push(start..document.len());
        sections
    }

    fn split_section(&self, document: &str, section: Range<usize>) -> Vec<Range<usize>> {
        // Line endings around the delimiter are not part of the section.
        let section = trim_range(document, section);
        if section.is_empty() {
            return Vec::new();
        }
        if char_len(&document[section.clone()]) <= self.config.chunk_size {
            return vec![section];
        }
        // Pieces leave room for a full overlap in front of them.
        let budget = self.config.chunk_size - self.config.chunk_overlap;
        let mut pieces = Vec::new();
        split_recursive(document, section, SOFT_SEPARATORS, budget, &mut pieces);
        self.merge(document, &pieces)
    }

    fn merge(&self, document: &str, pieces: &[Range<usize>]) -> Vec<Range<usize>> {
        let Some((first, rest)) = pieces.split_first() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut cur_start = first.start;
        let mut cur_end = first.end;
        let mut boundaries = vec![first.start];
        for piece in rest {
            if char_len(&document[cur_start..piece.end]) <= self.config.chunk_size {
                cur_end = piece.end;
                boundaries.push(piece.start);
                continue;
            }
            out.push(cur_start..cur_end);
            let next_start = self.overlap_start(document, cur_start..cur_end, &boundaries);
            boundaries.retain(|&b| b > next_start);
            boundaries.insert(0, next_start);
            if piece.start != next_start {
                boundaries.push(piece.start);
            }
            cur_start = next_start;
            cur_end = piece.end;
        }
        out.push(cur_start..cur_end);
        out
    }

    /// Where the chunk following `prev` starts. Prefers the earliest piece
    /// boundary inside the overlap window, then a word start, then a raw
    /// character position.
    fn overlap_start(&self, document: &str, prev: Range<usize>, boundaries: &[usize]) -> usize {
        let overlap = self.config.chunk_overlap;
        if overlap == 0 {
            return prev.end;
        }
        let shares_text = |start: usize| !document[start..prev.end].trim().is_empty();

        if let Some(b) = boundaries.iter().copied().find(|&b| {
            b > prev.start && b < prev.end && char_len(&document[b..prev.end]) <= overlap
        }) {
            if shares_text(b) {
                return b;
            }
        }

        let tail = &document[prev.clone()];
        let window_start = prev.start
            + tail.char_indices().rev().nth(overlap - 1).map(|(i, _)| i).unwrap_or(0);
        let window = &document[window_start..prev.end];
        let at_word_start = document[..window_start].ends_with(char::is_whitespace)
            && !window.starts_with(char::is_whitespace);
        if at_word_start {
            return window_start;
        }
        if let Some(ws) = window.find(char::is_whitespace) {
            if let Some(word) = window[ws..].find(|c: char| !c.is_whitespace()) {
                let snapped = window_start + ws + word;
                if snapped < prev.end && shares_text(snapped) {
                    return snapped;
                }
            }
        }
        window_start
    }
}

fn split_recursive(
    document: &str,
    range: Range<usize>,
    separators: &[&str],
    budget: usize,
    out: &mut Vec<Range<usize>>,
) {
    let text = &document[range.clone()];
    if char_len(text) <= budget {
        out.push(range);
        return;
    }
    let (separator, weaker) = match separators.iter().position(|s| s.is_empty() || text.contains(s)) {
        Some(p) => (separators[p], &separators[p + 1..]),
        None => ("", &separators[..0]),
    };

    if separator.is_empty() {
        let mut start = range.start;
        for (count, (i, _)) in text.char_indices().enumerate() {
            if count > 0 && count % budget == 0 {
                out.push(start..range.start + i);
                start = range.start + i;
            }
        }
        out.push(start..range.end);
        return;
    }

    // Separators stay attached to the end of the piece they close.
    let mut start = range.start;
    let mut segments = Vec::new();
    for (i, _) in text.match_indices(separator) {
        let end = range.start + i + separator.len();
        segments.push(start..end);
        start = end;
    }
    if start < range.end {
        segments.push(start..range.end);
    }
    for segment in segments {
        if char_len(&document[segment.clone()]) <= budget {
            out.push(segment);
        } else {
            split_recursive(document, segment, weaker, budget, out);
        }
    }
}

fn push_trimmed(document: &str, range: Range<usize>, chunks: &mut Vec<Chunk>) {
    let raw = &document[range.clone()];
    let text = raw.trim();
    if text.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    chunks.push(Chunk { index: chunks.len(), text: text.to_string(), start_offset: range.start + leading });
}

fn trim_range(document: &str, range: Range<usize>) -> Range<usize> {
    let raw = &document[range.clone()];
    let start = range.start + (raw.len() - raw.trim_start().len());
    let end = range.end - (raw.len() - raw.trim_end().len());
    start..end.max(start)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

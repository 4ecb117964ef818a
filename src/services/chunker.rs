use crate::error::Result;
use crate::types::Chunk;
use regex::Regex;
use tracing::debug;

/// Level-1 and level-2 ATX headers occupying a whole line.
const HEADER_PATTERN: &str = r"(?m)^(# .+|## .+)$";

pub struct Chunker {
    header_pattern: Regex,
}

impl Chunker {
    pub fn new() -> Result<Self> {
        let header_pattern = Regex::new(HEADER_PATTERN)?;
        Ok(Self { header_pattern })
    }

    /// Lazily splits `text` at header lines, in document order.
    ///
    /// Each span runs from one boundary (offset 0 or a header line start) to
    /// the next, is trimmed, and is skipped when nothing is left.
    pub fn chunks<'r, 'h>(&'r self, text: &'h str) -> Chunks<'r, 'h> {
        debug!("Chunking {} bytes of markdown", text.len());
        Chunks {
            header_pattern: &self.header_pattern,
            text,
            start: 0,
            number: 0,
        }
    }
}

#[derive(Clone)]
pub struct Chunks<'r, 'h> {
    header_pattern: &'r Regex,
    text: &'h str,
    start: usize,
    number: usize,
}

impl<'r, 'h> Chunks<'r, 'h> {
    // First header starting strictly after the current span start.
    fn next_boundary(&self) -> usize {
        let mut from = self.start;
        while let Some(header) = self.header_pattern.find_at(self.text, from) {
            if header.start() > self.start {
                return header.start();
            }
            from = header.end();
        }
        self.text.len()
    }
}

impl<'r, 'h> Iterator for Chunks<'r, 'h> {
    type Item = Chunk<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.start < self.text.len() {
            let begin = self.start;
            let end = self.next_boundary();
            self.start = end;

            let span = &self.text[begin..end];
            let text = span.trim();
            if text.is_empty() {
                continue;
            }

            self.number += 1;
            let offset = begin + (span.len() - span.trim_start().len());
            return Some(Chunk {
                number: self.number,
                start: offset,
                end: offset + text.len(),
                text,
            });
        }
        None
    }
}

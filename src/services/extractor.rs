use crate::error::Result;
use crate::types::Link;
use regex::Regex;

/// `[description](url)`; neither part may be empty. Escapes and nested
/// parentheses are not understood, and fenced code is not skipped.
const LINK_PATTERN: &str = r"\[([^\]]+)\]\(([^)]+)\)";

pub struct LinkExtractor {
    link_pattern: Regex,
}

impl LinkExtractor {
    pub fn new() -> Result<Self> {
        let link_pattern = Regex::new(LINK_PATTERN)?;
        Ok(Self { link_pattern })
    }

    /// Inline links in `text`, left to right, non-overlapping.
    pub fn links<'r, 'h>(&'r self, text: &'h str) -> impl Iterator<Item = Link<'h>> + 'r
    where
        'h: 'r,
    {
        self.link_pattern.captures_iter(text).filter_map(|caps| {
            Some(Link {
                description: caps.get(1)?.as_str(),
                url: caps.get(2)?.as_str(),
            })
        })
    }
}

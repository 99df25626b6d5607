//! Region merge engine.
//!
//! A [`Document`] is the text of one managed artifact. Named regions are the
//! slices between a begin and an end sentinel line; everything outside them
//! belongs to the developer and is never rewritten.
//!
//! Documents are handled with LF line endings internally. A file read with
//! CRLF endings is written back with CRLF endings.

use std::collections::HashSet;
use std::ops::Range;

use regex::Regex;
use thiserror::Error;

use pktgen_renderer::{Entry, RegionSpec};

/// A sentinel pair that cannot be located unambiguously. Line numbers are
/// one-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("missing begin sentinel `{marker}`")]
    MissingBegin { marker: String },

    #[error("missing end sentinel `{marker}`")]
    MissingEnd { marker: String },

    #[error("end sentinel for region '{region}' (line {end_line}) precedes its begin sentinel (line {begin_line})")]
    EndBeforeBegin {
        region: String,
        begin_line: usize,
        end_line: usize,
    },

    #[error("begin sentinel `{marker}` appears more than once (lines {first_line} and {second_line})")]
    DuplicateBegin {
        marker: String,
        first_line: usize,
        second_line: usize,
    },

    #[error("end sentinel `{marker}` appears more than once (lines {first_line} and {second_line})")]
    DuplicateEnd {
        marker: String,
        first_line: usize,
        second_line: usize,
    },
}

/// Located region: byte range of its interior within the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub interior: Range<usize>,
}

/// Pulls the packet names already represented in an additive region.
#[derive(Debug, Clone)]
pub struct NameExtractor {
    pattern: Regex,
}

impl NameExtractor {
    /// Header style: `void OnPing(const Ping& packet);`
    pub fn declarations() -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(r"(?m)^\s*void\s+On(\w+)\s*\([^)]*\)\s*;")?,
        })
    }

    /// Source style: `void Player::OnPing(`
    pub fn definitions(session_class: &str) -> Result<Self, regex::Error> {
        let pattern = format!(r"\bvoid\s+{}::On(\w+)\s*\(", regex::escape(session_class));
        Ok(Self {
            pattern: Regex::new(&pattern)?,
        })
    }

    pub fn names(&self, text: &str) -> HashSet<String> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_owned())
            .collect()
    }
}

/// Text of one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    crlf: bool,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let crlf = text.contains("\r\n");
        Self {
            text: if crlf {
                text.replace("\r\n", "\n")
            } else {
                text.to_owned()
            },
            crlf,
        }
    }

    /// LF-normalized text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Text with the original line endings restored.
    pub fn render(&self) -> String {
        if self.crlf {
            self.text.replace('\n', "\r\n")
        } else {
            self.text.clone()
        }
    }

    /// Locate `pair`. A sentinel matches when the whole line, ignoring
    /// surrounding whitespace, equals the marker.
    pub fn region(&self, pair: &RegionSpec) -> Result<Region, RegionError> {
        let begin_marker = pair.begin_marker();
        let end_marker = pair.end_marker();

        // (line number, byte offset after the begin line)
        let mut begin: Option<(usize, usize)> = None;
        // (line number, byte offset of the end line's start)
        let mut end: Option<(usize, usize)> = None;

        let mut offset = 0;
        for (index, line) in self.text.split_inclusive('\n').enumerate() {
            let line_no = index + 1;
            let start = offset;
            offset += line.len();
            let trimmed = line.trim();

            if trimmed == begin_marker {
                if let Some((first_line, _)) = begin {
                    return Err(RegionError::DuplicateBegin {
                        marker: begin_marker,
                        first_line,
                        second_line: line_no,
                    });
                }
                begin = Some((line_no, offset));
            } else if trimmed == end_marker {
                if let Some((first_line, _)) = end {
                    return Err(RegionError::DuplicateEnd {
                        marker: end_marker,
                        first_line,
                        second_line: line_no,
                    });
                }
                end = Some((line_no, start));
            }
        }

        let (begin_line, interior_start) =
            begin.ok_or_else(|| RegionError::MissingBegin { marker: begin_marker.clone() })?;
        let (end_line, interior_end) =
            end.ok_or_else(|| RegionError::MissingEnd { marker: end_marker.clone() })?;

        if end_line < begin_line {
            return Err(RegionError::EndBeforeBegin {
                region: pair.name.clone(),
                begin_line,
                end_line,
            });
        }

        Ok(Region {
            name: pair.name.clone(),
            interior: interior_start..interior_end,
        })
    }

    /// Current interior of `pair`.
    pub fn interior(&self, pair: &RegionSpec) -> Result<&str, RegionError> {
        let region = self.region(pair)?;
        Ok(&self.text[region.interior])
    }

    /// Substitute the whole interior of `pair` with `text`.
    pub fn replace(&mut self, pair: &RegionSpec, text: &str) -> Result<(), RegionError> {
        let region = self.region(pair)?;
        self.text.replace_range(region.interior, text);
        Ok(())
    }

    /// Append entries whose key `extractor` does not find in the interior,
    /// just before the end sentinel. Existing interior text is untouched.
    /// Returns the number of entries inserted.
    pub fn merge_additive(
        &mut self,
        pair: &RegionSpec,
        entries: &[Entry],
        extractor: &NameExtractor,
    ) -> Result<usize, RegionError> {
        let region = self.region(pair)?;
        let mut present = extractor.names(&self.text[region.interior.clone()]);

        let mut addition = String::new();
        let mut inserted = 0;
        for entry in entries {
            if present.insert(entry.key.clone()) {
                addition.push_str(&entry.text);
                inserted += 1;
            }
        }

        if inserted > 0 {
            // interior.end is the start of the end sentinel line
            self.text.insert_str(region.interior.end, &addition);
        }
        Ok(inserted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Marker location and substitution over part text
//!
//! Markers are literal tokens such as `{{NAME}}`, `{{#each items}}` and
//! `{{/each}}`. All surgery here works on byte offsets returned by
//! `str::find`, which always land on UTF-8 boundaries because the markers are
//! ASCII.

use std::collections::BTreeMap;
use std::ops::Range;

/// Closing marker of every loop region
pub const LOOP_END: &str = "{{/each}}";

/// Render `{{name}}`
pub fn placeholder(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// Render `{{#each name}}`
pub fn loop_start(name: &str) -> String {
    format!("{{{{#each {}}}}}", name)
}

/// Replace every `{{KEY}}` for every key in `values`
///
/// Keys absent from `values` are left in place. Values are inserted as-is.
pub fn substitute(text: &str, values: &BTreeMap<String, String>) -> String {
    let mut out = text.to_string();
    for (key, value) in values {
        let marker = placeholder(key);
        if out.contains(&marker) {
            out = out.replace(&marker, value);
        }
    }
    out
}

/// A located loop region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSpan {
    /// Whole region, markers included
    pub outer: Range<usize>,
    /// Body sub-template, markers excluded
    pub body: Range<usize>,
}

/// Scanner states while locating a loop region
#[derive(Debug, Clone, PartialEq, Eq)]
enum Scan {
    /// Looking for the opening marker
    Start,
    /// Opening marker found, looking for the first closing marker after it
    Opened { start: usize, body_start: usize },
    /// Both markers found in order
    Closed(LoopSpan),
    /// A marker is missing
    Absent,
}

/// Locates the first `{{#each name}}` … `{{/each}}` region in a text
#[derive(Debug)]
pub struct LoopScanner<'a> {
    text: &'a str,
    start_marker: String,
}

impl<'a> LoopScanner<'a> {
    /// Create a scanner for the loop called `name`
    pub fn new(text: &'a str, name: &str) -> Self {
        Self {
            text,
            start_marker: loop_start(name),
        }
    }

    /// Run the scan to completion
    pub fn locate(&self) -> Option<LoopSpan> {
        let mut state = Scan::Start;
        loop {
            state = match state {
                Scan::Start => match self.text.find(&self.start_marker) {
                    Some(start) => Scan::Opened {
                        start,
                        body_start: start + self.start_marker.len(),
                    },
                    None => Scan::Absent,
                },
                Scan::Opened { start, body_start } => {
                    match self.text[body_start..].find(LOOP_END) {
                        Some(offset) => {
                            let body_end = body_start + offset;
                            Scan::Closed(LoopSpan {
                                outer: start..body_end + LOOP_END.len(),
                                body: body_start..body_end,
                            })
                        }
                        None => Scan::Absent,
                    }
                }
                Scan::Closed(span) => return Some(span),
                Scan::Absent => return None,
            };
        }
    }
}

/// Replace `range` of `text` with `replacement`
pub fn splice(text: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() - range.len() + replacement.len());
    out.push_str(&text[..range.start]);
    out.push_str(replacement);
    out.push_str(&text[range.end..]);
    out
}

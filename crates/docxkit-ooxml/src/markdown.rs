//! Markdown to WordprocessingML conversion
//!
//! Converts line-oriented Markdown into styled paragraphs. Only a small
//! subset is recognized:
//!
//! - `#$# Title`: document title (last one wins, not tokenized)
//! - `# ` … `###### `: `Heading1` … `Heading6`
//! - anything else: `Normal`
//! - `***bold italic***`, `**bold**`, `*italic*`: word-level emphasis
//!
//! # Example
//!
//! ```
//! use docxkit_ooxml::markdown::{parse, ParagraphStyle};
//!
//! let doc = parse("#$# My Title\n# Heading 1\nSome text.");
//! assert_eq!(doc.title, "My Title");
//! assert_eq!(doc.blocks.len(), 2);
//! assert_eq!(doc.blocks[0].style, ParagraphStyle::Heading(1));
//! ```
//!
//! # Known quirk
//!
//! Emphasis is matched per space-separated word. Any part of a word outside
//! the emphasis markers (e.g. the `.` in `***word***.`) is emitted as bare
//! text after the run element instead of inside it.

use std::fmt;
use std::sync::OnceLock;

use quick_xml::escape::escape;
use regex::Regex;

/// Paragraph style assigned to a Markdown line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphStyle {
    /// `#$# `
    Title,
    /// `#` × level, level 1..=6
    Heading(u8),
    /// No marker
    Normal,
}

impl ParagraphStyle {
    /// Style ID as used in `styles.xml`
    pub fn style_id(&self) -> String {
        match self {
            Self::Title => "Title".to_string(),
            Self::Heading(level) => format!("Heading{}", level),
            Self::Normal => "Normal".to_string(),
        }
    }
}

impl fmt::Display for ParagraphStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.style_id())
    }
}

/// Character emphasis of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emphasis {
    #[default]
    None,
    Bold,
    Italic,
    BoldItalic,
}

impl Emphasis {
    fn run_properties(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Bold => "<w:rPr><w:b/></w:rPr>",
            Self::Italic => "<w:rPr><w:i/></w:rPr>",
            Self::BoldItalic => "<w:rPr><w:b/><w:i/></w:rPr>",
        }
    }
}

/// A styled text fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub emphasis: Emphasis,
}

impl Run {
    pub fn new(text: impl Into<String>, emphasis: Emphasis) -> Self {
        Self {
            text: text.into(),
            emphasis,
        }
    }

    /// Serialize to a `<w:r>` element
    pub fn to_xml(&self) -> String {
        format!(
            r#"<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r>"#,
            self.emphasis.run_properties(),
            self.text
        )
    }
}

/// Piece of one tokenized word
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run element
    Run(Run),
    /// Text of the word outside any emphasis markers
    Bare(String),
}

impl Segment {
    fn to_xml(&self) -> String {
        match self {
            Self::Run(run) => run.to_xml(),
            Self::Bare(text) => text.clone(),
        }
    }
}

/// Result of tokenizing one line: words, each made of segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inline {
    pub words: Vec<Vec<Segment>>,
}

impl Inline {
    /// All runs in order, ignoring bare segments
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.words.iter().flatten().filter_map(|s| match s {
            Segment::Run(run) => Some(run),
            Segment::Bare(_) => None,
        })
    }

    /// Serialize; words are joined with a single space
    pub fn to_xml(&self) -> String {
        self.words
            .iter()
            .map(|word| word.iter().map(Segment::to_xml).collect::<String>())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn emphasis_patterns() -> &'static [(Regex, Emphasis); 3] {
    static PATTERNS: OnceLock<[(Regex, Emphasis); 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (
                Regex::new(r"\*\*\*(.+?)\*\*\*").expect("valid regex"),
                Emphasis::BoldItalic,
            ),
            (
                Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"),
                Emphasis::Bold,
            ),
            (
                Regex::new(r"\*(.+?)\*").expect("valid regex"),
                Emphasis::Italic,
            ),
        ]
    })
}

/// Split one word into segments using the first emphasis pattern that matches
fn tokenize_word(word: &str) -> Vec<Segment> {
    let Some((pattern, emphasis)) = emphasis_patterns()
        .iter()
        .find(|(pattern, _)| pattern.is_match(word))
    else {
        return vec![Segment::Run(Run::new(format!("{} ", word), Emphasis::None))];
    };

    let mut segments = Vec::new();
    let mut last = 0;
    for caps in pattern.captures_iter(word) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            segments.push(Segment::Bare(word[last..whole.start()].to_string()));
        }
        segments.push(Segment::Run(Run::new(
            format!("{} ", inner.as_str()),
            *emphasis,
        )));
        last = whole.end();
    }
    if last < word.len() {
        segments.push(Segment::Bare(word[last..].to_string()));
    }
    segments
}

/// Tokenize a line into emphasis runs
///
/// A line without any `*` becomes one unstyled run holding the exact text.
pub fn tokenize(line: &str) -> Inline {
    if !line.contains('*') {
        return Inline {
            words: vec![vec![Segment::Run(Run::new(line, Emphasis::None))]],
        };
    }
    Inline {
        words: line.split(' ').map(tokenize_word).collect(),
    }
}

/// One parsed Markdown line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub style: ParagraphStyle,
    /// Escaped line with the style marker removed
    pub raw_text: String,
}

impl Block {
    /// Render as a styled `<w:p>` element
    pub fn to_xml(&self) -> String {
        format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{}"/></w:pPr>{}</w:p>"#,
            self.style,
            tokenize(&self.raw_text).to_xml()
        )
    }
}

/// Line markers in detection order; `#$# ` must precede the headings
const MARKERS: &[(&str, ParagraphStyle)] = &[
    ("#$# ", ParagraphStyle::Title),
    ("###### ", ParagraphStyle::Heading(6)),
    ("##### ", ParagraphStyle::Heading(5)),
    ("#### ", ParagraphStyle::Heading(4)),
    ("### ", ParagraphStyle::Heading(3)),
    ("## ", ParagraphStyle::Heading(2)),
    ("# ", ParagraphStyle::Heading(1)),
];

/// Classify an (escaped) line and strip its marker
pub fn classify(line: &str) -> Block {
    for (marker, style) in MARKERS {
        if let Some(rest) = line.strip_prefix(marker) {
            return Block {
                style: *style,
                raw_text: rest.to_string(),
            };
        }
    }
    Block {
        style: ParagraphStyle::Normal,
        raw_text: line.to_string(),
    }
}

/// A parsed Markdown document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownDocument {
    /// Escaped title text, empty if the input has no title line
    pub title: String,
    /// Body blocks in input order
    pub blocks: Vec<Block>,
}

impl MarkdownDocument {
    /// Rendered `<w:p>` fragments in order
    pub fn rendered_blocks(&self) -> Vec<String> {
        self.blocks.iter().map(Block::to_xml).collect()
    }
}

/// Parse Markdown text; never fails
pub fn parse(markdown: &str) -> MarkdownDocument {
    let mut doc = MarkdownDocument::default();
    for line in markdown.lines() {
        let escaped = escape(line);
        let block = classify(&escaped);
        match block.style {
            ParagraphStyle::Title => doc.title = block.raw_text,
            _ => doc.blocks.push(block),
        }
    }
    doc
}

//! Embedded package templates and slot filling
//!
//! New documents are materialized from a fixed, process-wide table of parts
//! compiled into the binary. Static parts (content types, relationships,
//! styles) are copied verbatim; only the document skeleton carries slots:
//!
//! - `{{TITLE}}`: replaced at every occurrence
//! - `{{BODY}}`: replaced at every occurrence
//! - `{{SECTION}}`: consumed left to right, one rendered block per slot
//!
//! # Example
//!
//! ```
//! use docxkit_ooxml::template::fill_sections;
//!
//! let blocks = vec!["<a/>".to_string(), "<b/>".to_string()];
//! assert_eq!(fill_sections("{{TITLE}}|{{SECTION}}", "T", &blocks), "T|<a/><b/>");
//! ```

use tracing::debug;

use crate::archive::{Package, DOCUMENT_XML};
use crate::error::{DocxError, Result};
use crate::markdown::{self, MarkdownDocument};
use crate::transform::PartTransformer;

/// Title slot
pub const TITLE_SLOT: &str = "{{TITLE}}";
/// Literal body slot
pub const BODY_SLOT: &str = "{{BODY}}";
/// Rendered block slot
pub const SECTION_SLOT: &str = "{{SECTION}}";

/// One embedded part
#[derive(Debug, Clone, Copy)]
pub struct TemplatePart {
    /// Path inside the package
    pub path: &'static str,
    /// Part text
    pub contents: &'static str,
    /// Whether the part carries slots and goes through the transformer
    pub templated: bool,
}

impl TemplatePart {
    const fn fixed(path: &'static str, contents: &'static str) -> Self {
        Self {
            path,
            contents,
            templated: false,
        }
    }

    const fn slotted(path: &'static str, contents: &'static str) -> Self {
        Self {
            path,
            contents,
            templated: true,
        }
    }
}

macro_rules! asset {
    ($path:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $path))
    };
}

static NEW_DOCUMENT_PARTS: [TemplatePart; 5] = [
    TemplatePart::fixed("[Content_Types].xml", asset!("base/[Content_Types].xml")),
    TemplatePart::fixed("_rels/.rels", asset!("base/_rels/.rels")),
    TemplatePart::fixed(
        "word/_rels/document.xml.rels",
        asset!("base/word/_rels/document.xml.rels"),
    ),
    TemplatePart::fixed("word/styles.xml", asset!("base/word/styles.xml")),
    TemplatePart::slotted(DOCUMENT_XML, asset!("document/document.xml")),
];

static MARKDOWN_PARTS: [TemplatePart; 5] = [
    TemplatePart::fixed("[Content_Types].xml", asset!("base/[Content_Types].xml")),
    TemplatePart::fixed("_rels/.rels", asset!("base/_rels/.rels")),
    TemplatePart::fixed(
        "word/_rels/document.xml.rels",
        asset!("base/word/_rels/document.xml.rels"),
    ),
    TemplatePart::fixed("word/styles.xml", asset!("base/word/styles.xml")),
    TemplatePart::slotted(DOCUMENT_XML, asset!("markdown/document.xml")),
];

static NEW_DOCUMENT: TemplateSet = TemplateSet {
    parts: &NEW_DOCUMENT_PARTS,
};

static MARKDOWN: TemplateSet = TemplateSet {
    parts: &MARKDOWN_PARTS,
};

/// A read-only table of template parts
#[derive(Debug, Clone, Copy)]
pub struct TemplateSet {
    parts: &'static [TemplatePart],
}

impl TemplateSet {
    /// Build a set over caller-provided parts
    pub const fn from_parts(parts: &'static [TemplatePart]) -> Self {
        Self { parts }
    }

    /// Skeleton with `{{TITLE}}`/`{{BODY}}` slots
    pub fn new_document() -> &'static TemplateSet {
        &NEW_DOCUMENT
    }

    /// Skeleton with `{{TITLE}}`/`{{SECTION}}` slots
    pub fn markdown() -> &'static TemplateSet {
        &MARKDOWN
    }

    /// All parts in package order
    pub fn parts(&self) -> &'static [TemplatePart] {
        self.parts
    }

    /// Build a package, passing slotted parts through `transformer`
    pub fn materialize(&self, transformer: &dyn PartTransformer) -> Result<Package> {
        if !self.parts.iter().any(|p| p.path == DOCUMENT_XML) {
            return Err(DocxError::MissingPart(DOCUMENT_XML.to_string()));
        }

        let mut package = Package::new();
        for extra in transformer.extra_parts() {
            package.set(extra.path, extra.contents);
        }
        for part in self.parts {
            if part.templated {
                debug!(part = part.path, "filling template part");
                package.set_string(part.path, transformer.transform(part.path, part.contents)?);
            } else {
                package.set_string(part.path, part.contents);
            }
        }
        Ok(package)
    }
}

/// Copy `text`, letting `fill` write a value for each slot occurrence
///
/// The scan runs once over the template; values written by `fill` are never
/// searched for slots.
fn fill_slots(text: &str, slots: &[&str], mut fill: impl FnMut(&str, &mut String)) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let next = slots
            .iter()
            .filter_map(|slot| rest.find(slot).map(|at| (at, *slot)))
            .min_by_key(|(at, _)| *at);
        match next {
            Some((at, slot)) => {
                out.push_str(&rest[..at]);
                fill(slot, &mut out);
                rest = &rest[at + slot.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// Replace `{{TITLE}}` and `{{BODY}}` at every occurrence
pub fn fill_document(text: &str, title: &str, body: &str) -> String {
    fill_slots(text, &[TITLE_SLOT, BODY_SLOT], |slot, out| {
        out.push_str(if slot == TITLE_SLOT { title } else { body })
    })
}

/// Replace `{{TITLE}}` everywhere and distribute blocks over `{{SECTION}}` slots
///
/// Slots are consumed left to right, one block each. Unused slots become
/// empty; when blocks outnumber slots the remainder goes into the last slot.
pub fn fill_sections(text: &str, title: &str, blocks: &[String]) -> String {
    let slots = text.matches(SECTION_SLOT).count();
    let mut next = 0;
    fill_slots(text, &[TITLE_SLOT, SECTION_SLOT], |slot, out| {
        if slot == TITLE_SLOT {
            out.push_str(title);
            return;
        }
        let i = next;
        next += 1;
        if i + 1 == slots {
            if let Some(rest) = blocks.get(i..) {
                out.push_str(&rest.concat());
            }
        } else if let Some(block) = blocks.get(i) {
            out.push_str(block);
        }
    })
}

/// Fills a new-document skeleton with a literal title and body
#[derive(Debug, Clone, Default)]
pub struct DocumentFill {
    pub title: String,
    pub body: String,
}

impl DocumentFill {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

impl PartTransformer for DocumentFill {
    fn transform(&self, _path: &str, text: &str) -> Result<String> {
        Ok(fill_document(text, &self.title, &self.body))
    }
}

/// Renders a Markdown document into a skeleton's slots
#[derive(Debug, Clone)]
pub struct MarkdownRender {
    title: String,
    blocks: Vec<String>,
}

impl MarkdownRender {
    /// Parse and render `markdown` once; the result is reused for every part
    pub fn new(markdown: &str) -> Self {
        Self::from_document(&markdown::parse(markdown))
    }

    pub fn from_document(doc: &MarkdownDocument) -> Self {
        Self {
            title: doc.title.clone(),
            blocks: doc.rendered_blocks(),
        }
    }
}

impl PartTransformer for MarkdownRender {
    fn transform(&self, _path: &str, text: &str) -> Result<String> {
        Ok(fill_sections(text, &self.title, &self.blocks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Identity;

    #[test]
    fn test_fill_document_all_occurrences() {
        let out = fill_document("{{TITLE}}-{{BODY}}-{{TITLE}}", "T", "B");
        assert_eq!(out, "T-B-T");
    }

    #[test]
    fn test_fill_document_values_not_rescanned() {
        let out = fill_document("[{{TITLE}}]|[{{BODY}}]", "{{BODY}}", "B");
        assert_eq!(out, "[{{BODY}}]|[B]");
    }

    #[test]
    fn test_markdown_title_with_slot_marker_stays_literal() {
        let render = MarkdownRender::new("#$# {{SECTION}}\nBody");
        let out = render
            .transform(DOCUMENT_XML, "[{{TITLE}}]|[{{SECTION}}]")
            .unwrap();
        assert!(out.starts_with("[{{SECTION}}]|[<w:p>"));
        assert!(out.contains("Body"));
    }

    #[test]
    fn test_fill_sections_strips_unused_slots() {
        let template = "<w:document>\n<w:p>{{TITLE}}</w:p>\n<w:p>{{SECTION}}</w:p>\n</w:document>";
        let out = fill_sections(template, "My Document Title", &[]);
        assert_eq!(
            out,
            "<w:document>\n<w:p>My Document Title</w:p>\n<w:p></w:p>\n</w:document>"
        );
    }

    #[test]
    fn test_fill_sections_one_block_per_slot() {
        let blocks = vec!["A".to_string(), "B".to_string()];
        assert_eq!(
            fill_sections("[{{SECTION}}][{{SECTION}}][{{SECTION}}]", "", &blocks),
            "[A][B][]"
        );
    }

    #[test]
    fn test_fill_sections_overflow_into_last_slot() {
        let blocks = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(
            fill_sections("[{{SECTION}}][{{SECTION}}]", "", &blocks),
            "[A][BC]"
        );
    }

    #[test]
    fn test_fill_sections_without_slots() {
        let blocks = vec!["A".to_string()];
        assert_eq!(fill_sections("no slots", "", &blocks), "no slots");
    }

    #[test]
    fn test_markdown_render_end_to_end() {
        let render = MarkdownRender::new("#$# My Title\n# Heading 1\nSome text.");
        let out = render
            .transform(DOCUMENT_XML, "{{TITLE}}|{{SECTION}}")
            .unwrap();
        assert_eq!(
            out,
            concat!(
                "My Title|",
                r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t xml:space="preserve">Heading 1</w:t></w:r></w:p>"#,
                r#"<w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr><w:r><w:t xml:space="preserve">Some text.</w:t></w:r></w:p>"#,
            )
        );
    }

    #[test]
    fn test_builtin_sets_have_document_part() {
        for set in [TemplateSet::new_document(), TemplateSet::markdown()] {
            let doc = set.parts().iter().find(|p| p.path == DOCUMENT_XML).unwrap();
            assert!(doc.templated);
            assert!(doc.contents.contains(TITLE_SLOT));
        }
        assert!(TemplateSet::markdown()
            .parts()
            .iter()
            .any(|p| p.contents.contains(SECTION_SLOT)));
    }

    #[test]
    fn test_static_parts_copied_verbatim() {
        let package = TemplateSet::markdown().materialize(&Identity).unwrap();
        for part in TemplateSet::markdown().parts() {
            assert_eq!(package.get(part.path), Some(part.contents.as_bytes()));
        }
    }

    #[test]
    fn test_materialize_requires_document_part() {
        static PARTS: [TemplatePart; 1] = [TemplatePart::fixed("_rels/.rels", "<Relationships/>")];
        let set = TemplateSet::from_parts(&PARTS);
        let err = set.materialize(&Identity).unwrap_err();
        assert!(matches!(err, DocxError::MissingPart(_)));
    }
}

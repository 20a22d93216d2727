//! Placeholder Rewrite Tests
//!
//! End-to-end tests for rewriting an existing package: text substitution,
//! loop expansion and image insertion, plus the atomic-replace guarantees.

use std::collections::BTreeMap;

use docxkit_ooxml::test_utils::{document_with_body, is_well_formed, read_part, write_minimal_package};
use docxkit_ooxml::{
    expand_loops, insert_image, replace_placeholders, update_docx, DocxError, ErrorKind,
    FieldMap, LoopExpansion, Package, PartTransformer, Result, TextSubstitution, DOCUMENT_XML,
};
use serde_json::json;
use tempfile::TempDir;

fn fields(pairs: &[(&str, &str)]) -> FieldMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_replace_placeholders() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("letter.docx");
    write_minimal_package(
        &path,
        &document_with_body("<w:p><w:r><w:t>Hello {{NAME}}, welcome to {{PLACE}}.</w:t></w:r></w:p>"),
    );

    replace_placeholders(&path, fields(&[("NAME", "John Doe"), ("PLACE", "Rustland")])).unwrap();

    let xml = read_part(&path, DOCUMENT_XML).unwrap();
    assert!(xml.contains("Hello John Doe, welcome to Rustland."));
    assert!(is_well_formed(&xml));
}

#[test]
fn test_single_part_package() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("one.docx");
    let mut package = Package::new();
    package.set_string("part.xml", "X {{T}}");
    package.write_to_file(&path).unwrap();

    replace_placeholders(&path, fields(&[("T", "Y")])).unwrap();

    let package = Package::open(&path).unwrap();
    assert_eq!(package.len(), 1);
    assert_eq!(package.get_string("part.xml").unwrap(), "X Y");
}

#[test]
fn test_placeholders_in_every_part() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("multi.docx");
    let mut package = Package::new();
    package.set_string(DOCUMENT_XML, "body {{NAME}}");
    package.set_string("word/header1.xml", "header {{NAME}}");
    package.write_to_file(&path).unwrap();

    replace_placeholders(&path, fields(&[("NAME", "Alice")])).unwrap();

    assert_eq!(read_part(&path, DOCUMENT_XML).unwrap(), "body Alice");
    assert_eq!(read_part(&path, "word/header1.xml").unwrap(), "header Alice");
}

#[test]
fn test_expand_loops() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("invoice.docx");
    write_minimal_package(
        &path,
        &document_with_body(
            "{{#each items}}<w:p><w:r><w:t>{{NAME}}: {{PRICE}}</w:t></w:r></w:p>{{/each}}",
        ),
    );

    let mut loops = BTreeMap::new();
    loops.insert(
        "items".to_string(),
        vec![
            fields(&[("NAME", "Widget"), ("PRICE", "10")]),
            fields(&[("NAME", "Gadget"), ("PRICE", "20")]),
        ],
    );
    expand_loops(&path, loops).unwrap();

    let xml = read_part(&path, DOCUMENT_XML).unwrap();
    let widget = xml.find("Widget: 10").unwrap();
    let gadget = xml.find("Gadget: 20").unwrap();
    assert!(widget < gadget);
    assert!(!xml.contains("{{#each"));
    assert!(!xml.contains("{{/each}}"));
    assert!(is_well_formed(&xml));
}

#[test]
fn test_loop_from_json_data() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("list.docx");
    let mut package = Package::new();
    package.set_string(DOCUMENT_XML, "{{#each items}}-{{NAME}}:{{PRICE}}\n{{/each}}");
    package.write_to_file(&path).unwrap();

    let loops = LoopExpansion::from_json(&json!({
        "items": [{"NAME": "A", "PRICE": "1"}, {"NAME": "B", "PRICE": "2"}]
    }))
    .unwrap();
    update_docx(&path, &loops).unwrap();

    assert_eq!(read_part(&path, DOCUMENT_XML).unwrap(), "-A:1\n-B:2\n");
}

#[test]
fn test_insert_image() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pic.docx");
    let image = dir.path().join("logo.png");
    std::fs::write(&image, [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]).unwrap();
    write_minimal_package(&path, &document_with_body("{{%img%7}}"));

    insert_image(&path, &image, "7", 914400, 914400).unwrap();

    let package = Package::open(&path).unwrap();
    assert_eq!(
        package.get("word/media/image_7.png"),
        Some(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a][..])
    );
    let xml = package.get_string(DOCUMENT_XML).unwrap();
    assert!(xml.contains(r#"r:embed="rId7""#));
    assert!(!xml.contains("{{%img%7}}"));
    assert!(is_well_formed(&xml));

    // Relationship part is left as the template shipped it
    let rels = package.get_string("word/_rels/document.xml.rels").unwrap();
    assert_eq!(rels.matches("<Relationship ").count(), 1);
}

#[test]
fn test_insert_missing_image() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pic.docx");
    write_minimal_package(&path, &document_with_body("{{%img%1}}"));
    let before = std::fs::read(&path).unwrap();

    let err = insert_image(&path, dir.path().join("nope.png"), "1", 1, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

struct FailOnDocument;

impl PartTransformer for FailOnDocument {
    fn transform(&self, path: &str, text: &str) -> Result<String> {
        if path == DOCUMENT_XML {
            return Err(DocxError::Transform {
                part: path.to_string(),
                message: "simulated write failure".to_string(),
            });
        }
        Ok(text.to_string())
    }
}

#[test]
fn test_interrupted_rewrite_keeps_original() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("safe.docx");
    write_minimal_package(&path, "X {{T}}");
    let before = std::fs::read(&path).unwrap();

    let err = update_docx(&path, &FailOnDocument).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaAssumptionViolated);

    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(read_part(&path, DOCUMENT_XML).unwrap(), "X {{T}}");
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_missing_package() {
    let dir = TempDir::new().unwrap();
    let err = update_docx(dir.path().join("none.docx"), &TextSubstitution::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

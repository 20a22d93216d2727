//! Shared test utilities for docxkit-ooxml
//!
//! This module provides common fixtures and helpers used across tests.

use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::archive::{Package, DOCUMENT_XML};

/// Build a minimal DOCX package whose document part is `document_xml`
///
/// Contains:
/// - [Content_Types].xml
/// - _rels/.rels
/// - word/_rels/document.xml.rels (registers `rId7` as `media/image_7.png`)
/// - word/document.xml
pub fn minimal_package(document_xml: &str) -> Package {
    let mut package = Package::new();
    package.set_string(
        "[Content_Types].xml",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
    );
    package.set_string(
        "_rels/.rels",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#,
    );
    package.set_string(
        "word/_rels/document.xml.rels",
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image_7.png"/>
</Relationships>"#,
    );
    package.set_string(DOCUMENT_XML, document_xml);
    package
}

/// Wrap body content in a `w:document` element with the usual namespaces
pub fn document_with_body(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing">
  <w:body>{}</w:body>
</w:document>"#,
        body
    )
}

/// Write a minimal package to `path`
pub fn write_minimal_package(path: &Path, document_xml: &str) {
    minimal_package(document_xml)
        .write_to_file(path)
        .expect("failed to write test package");
}

/// Read a part of the package at `path` as a string
pub fn read_part(path: &Path, part: &str) -> Option<String> {
    let package = Package::open(path).expect("failed to open test package");
    package.get_string(part)
}

/// Check that `xml` parses without errors
pub fn is_well_formed(xml: &str) -> bool {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => return true,
            Ok(_) => {}
            Err(_) => return false,
        }
    }
}

//! In-memory package handling for DOCX files
//!
//! A DOCX file is a ZIP archive of XML parts and media. [`Package`] keeps the
//! parts in their original order so a package written back out lists its
//! entries the way they were read or added.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use crate::error::{DocxError, Result};

/// Path of the main document part
pub const DOCUMENT_XML: &str = "word/document.xml";

/// An ordered collection of named parts
#[derive(Debug, Default, Clone)]
pub struct Package {
    /// Parts in insertion order
    parts: Vec<(String, Vec<u8>)>,
    /// Path to position in `parts`
    index: HashMap<String, usize>,
}

impl Package {
    /// Create an empty package
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and unpack a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocxError::NotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Create from any reader that implements Read + Seek
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut package = Self::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            // Skip directories
            if name.ends_with('/') {
                continue;
            }

            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            package.set(name, contents);
        }

        Ok(package)
    }

    /// Get a part's contents by path
    pub fn get(&self, path: &str) -> Option<&[u8]> {
        self.index.get(path).map(|&i| self.parts[i].1.as_slice())
    }

    /// Get a part's contents as a string
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Get the main document part, failing if the package has none
    pub fn document_xml(&self) -> Result<&[u8]> {
        self.get(DOCUMENT_XML)
            .ok_or_else(|| DocxError::MissingPart(DOCUMENT_XML.to_string()))
    }

    /// Check if a part exists
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains_key(path)
    }

    /// Part paths in package order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(p, _)| p.as_str())
    }

    /// Number of parts
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the package holds no parts
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Set or replace a part's contents
    ///
    /// Replacing keeps the part at its original position.
    pub fn set(&mut self, path: impl Into<String>, contents: Vec<u8>) {
        let path = path.into();
        match self.index.get(&path) {
            Some(&i) => self.parts[i].1 = contents,
            None => {
                self.index.insert(path.clone(), self.parts.len());
                self.parts.push((path, contents));
            }
        }
    }

    /// Set a part's contents from a string
    pub fn set_string(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.set(path, contents.into().into_bytes());
    }

    /// Write the package to a file
    ///
    /// A partially written file is removed if serialization fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        if let Err(err) = self.write_to(file) {
            let _ = std::fs::remove_file(path);
            return Err(err);
        }
        Ok(())
    }

    /// Write the package to any writer
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated);

        for (path, contents) in &self.parts {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(contents)?;
        }

        let mut inner = zip.finish()?;
        inner.flush()?;
        Ok(())
    }

    /// Serialize the package into a byte vector
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        self.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }
}

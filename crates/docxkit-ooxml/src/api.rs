//! High-level entry points
//!
//! Each operation is self-contained and bound to one output file:
//!
//! - [`Docx::create_new_docx`]: title/body document, written as `new_file.docx`
//! - [`create_markdown_docx`]: Markdown document, written as `docx_markdown.docx`
//! - [`update_docx`] and its wrappers: rewrite an existing package in place
//!
//! Callers must serialize operations against the same target path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use quick_xml::escape::escape;
use tracing::info;

use crate::error::{DocxError, Result};
use crate::image::ImageInsertion;
use crate::placeholder::{FieldMap, LoopExpansion, TextSubstitution};
use crate::rewrite::rewrite_package;
use crate::template::{DocumentFill, MarkdownRender, TemplateSet};
use crate::transform::PartTransformer;

/// File name used by the new-document pipeline
pub const NEW_DOCX_FILE_NAME: &str = "new_file.docx";

/// File name used by the Markdown pipeline
pub const MARKDOWN_DOCX_FILE_NAME: &str = "docx_markdown.docx";

/// Check that `dir` is a usable output directory
pub fn validate_output_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    if dir.as_os_str().is_empty() {
        return Err(DocxError::InvalidInput(
            "file path cannot be empty".to_string(),
        ));
    }
    let metadata = match std::fs::metadata(dir) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(DocxError::NotFound(dir.to_path_buf()))
        }
        Err(err) => return Err(DocxError::Io(err)),
    };
    if !metadata.is_dir() {
        return Err(DocxError::InvalidInput(format!(
            "the specified path is not a directory: {}",
            dir.display()
        )));
    }
    Ok(())
}

fn materialize_into(
    dir: &Path,
    file_name: &str,
    set: &TemplateSet,
    transformer: &dyn PartTransformer,
) -> Result<PathBuf> {
    validate_output_dir(dir)?;
    let package = set.materialize(transformer)?;
    let output = dir.join(file_name);
    package.write_to_file(&output)?;
    info!(path = %output.display(), parts = package.len(), "document created");
    Ok(output)
}

/// A plain document with a title and a body paragraph
///
/// # Example
///
/// ```no_run
/// use docxkit_ooxml::Docx;
///
/// let path = Docx::new()
///     .with_title("My Title")
///     .with_body("This is the document body.")
///     .create_new_docx(".")?;
/// println!("{}", path.display());
/// # Ok::<(), docxkit_ooxml::DocxError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Docx {
    pub title: String,
    pub body: String,
}

impl Docx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Write `new_file.docx` into `dir`
    ///
    /// Title and body are plain text and are XML-escaped.
    pub fn create_new_docx<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let fill = DocumentFill::new(escape(&self.title), escape(&self.body));
        materialize_into(
            dir.as_ref(),
            NEW_DOCX_FILE_NAME,
            TemplateSet::new_document(),
            &fill,
        )
    }
}

/// Convert Markdown into `docx_markdown.docx` inside `dir`
pub fn create_markdown_docx<P: AsRef<Path>>(dir: P, markdown: &str) -> Result<PathBuf> {
    materialize_into(
        dir.as_ref(),
        MARKDOWN_DOCX_FILE_NAME,
        TemplateSet::markdown(),
        &MarkdownRender::new(markdown),
    )
}

/// Rewrite the package at `path` with any transformer
pub fn update_docx<P: AsRef<Path>>(path: P, transformer: &dyn PartTransformer) -> Result<()> {
    rewrite_package(path, transformer)
}

/// Replace `{{KEY}}` placeholders in every part
pub fn replace_placeholders<P: AsRef<Path>>(path: P, replacements: FieldMap) -> Result<()> {
    update_docx(path, &TextSubstitution::new(replacements))
}

/// Expand `{{#each name}}` regions in every part
pub fn expand_loops<P: AsRef<Path>>(
    path: P,
    loops: BTreeMap<String, Vec<FieldMap>>,
) -> Result<()> {
    update_docx(path, &LoopExpansion::new(loops))
}

/// Embed an image and replace `{{%img%id}}` markers with it
pub fn insert_image<P: AsRef<Path>, I: AsRef<Path>>(
    path: P,
    image: I,
    id: &str,
    width_emu: i64,
    height_emu: i64,
) -> Result<()> {
    let insertion = ImageInsertion::from_file(image, id, width_emu, height_emu)?;
    update_docx(path, &insertion)
}

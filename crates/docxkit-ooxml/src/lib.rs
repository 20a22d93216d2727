//! # docxkit-ooxml
//!
//! Assembly and rewriting of OOXML word-processing packages (DOCX).
//!
//! This crate provides functionality to:
//! - Create a DOCX from a title and a body
//! - Convert line-oriented Markdown into styled DOCX paragraphs
//! - Fill `{{KEY}}` placeholders, expand `{{#each}}` loops and insert images
//!   in an existing DOCX, replacing it atomically
//!
//! Every pipeline is a [`PartTransformer`] applied once per package part.
//!
//! ## Example: Markdown to DOCX
//!
//! ```no_run
//! use docxkit_ooxml::create_markdown_docx;
//!
//! let path = create_markdown_docx(".", "#$# Report\n# Summary\nAll **good**.")?;
//! println!("written to {}", path.display());
//! # Ok::<(), docxkit_ooxml::DocxError>(())
//! ```
//!
//! ## Example: Filling placeholders
//!
//! ```no_run
//! use docxkit_ooxml::{update_docx, TextSubstitution};
//!
//! let fill = TextSubstitution::from_pairs([("NAME", "Alice")]);
//! update_docx("letter.docx", &fill)?;
//! # Ok::<(), docxkit_ooxml::DocxError>(())
//! ```

pub mod api;
pub mod archive;
pub mod error;
pub mod image;
pub mod markdown;
pub mod markers;
pub mod placeholder;
pub mod rewrite;
pub mod template;
pub mod transform;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

pub use api::{
    create_markdown_docx, expand_loops, insert_image, replace_placeholders, update_docx,
    validate_output_dir, Docx, MARKDOWN_DOCX_FILE_NAME, NEW_DOCX_FILE_NAME,
};
pub use archive::{Package, DOCUMENT_XML};
pub use error::{DocxError, ErrorKind, Result};
pub use image::ImageInsertion;
pub use markdown::{Emphasis, MarkdownDocument, ParagraphStyle, Run};
pub use placeholder::{FieldMap, LoopExpansion, TextSubstitution};
pub use rewrite::rewrite_package;
pub use template::{DocumentFill, MarkdownRender, TemplateSet};
pub use transform::{ExtraPart, Identity, PartTransformer};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Inline image insertion
//!
//! Images in OOXML are embedded via `<w:drawing>` elements:
//!
//! ```xml
//! <w:drawing>
//!   <wp:inline>
//!     <wp:extent cx="..." cy="..."/>           <!-- Dimensions in EMUs -->
//!     <wp:docPr id="..." name="..."/>
//!     <a:graphic>
//!       <a:graphicData uri="...picture">
//!         <pic:pic>
//!           <pic:blipFill>
//!             <a:blip r:embed="rIdNN"/>        <!-- Relationship ID -->
//!           </pic:blipFill>
//!         </pic:pic>
//!       </a:graphicData>
//!     </a:graphic>
//!   </wp:inline>
//! </w:drawing>
//! ```
//!
//! [`ImageInsertion`] adds the image bytes under `word/media/` and replaces
//! `{{%img%<id>}}` markers with such a drawing referencing `rId<id>`.
//! `word/_rels/document.xml.rels` is *not* updated: the template must already
//! register `rId<id>` pointing at `media/image_<id>.<ext>`, otherwise the
//! reference dangles.
//!
//! # Unit Conversions
//!
//! - 914400 EMUs = 1 inch
//! - 9525 EMUs = 1 pixel (at 96 DPI)

use std::path::Path;

use tracing::warn;

use crate::error::{DocxError, Result};
use crate::transform::{ExtraPart, PartTransformer};

/// EMUs per inch (914400)
pub const EMU_PER_INCH: i64 = 914400;

/// Media directory inside the package
pub const MEDIA_DIR: &str = "word/media";

/// Get the MIME content type for an image extension
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        "tiff" | "tif" => "image/tiff",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Render the `{{%img%id}}` marker
pub fn image_marker(id: &str) -> String {
    format!("{{{{%img%{}}}}}", id)
}

/// Inline drawing paragraph for one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Relationship ID (e.g. "rId7")
    pub rel_id: String,
    /// Drawing object ID for `wp:docPr`
    pub doc_pr_id: u32,
    /// Name for `wp:docPr`
    pub name: String,
    pub width_emu: i64,
    pub height_emu: i64,
}

impl InlineImage {
    pub fn to_xml(&self) -> String {
        let (cx, cy) = (self.width_emu, self.height_emu);
        format!(
            concat!(
                r#"<w:p><w:r><w:drawing>"#,
                r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
                r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
                r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#,
                r#"<wp:docPr id="{id}" name="{name}"/>"#,
                r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
                r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
                r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<pic:nvPicPr><pic:cNvPr id="0" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
                r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
                r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
                r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p>"#,
            ),
            cx = cx,
            cy = cy,
            id = self.doc_pr_id,
            name = self.name,
            rel = self.rel_id,
        )
    }
}

/// Adds one image part and replaces its marker with an inline drawing
#[derive(Debug, Clone)]
pub struct ImageInsertion {
    id: String,
    media_path: String,
    bytes: Vec<u8>,
    drawing: String,
}

impl ImageInsertion {
    /// Build from image bytes and the original file extension (without dot)
    pub fn new(
        id: &str,
        bytes: Vec<u8>,
        extension: Option<&str>,
        width_emu: i64,
        height_emu: i64,
    ) -> Result<Self> {
        validate_id(id)?;
        if width_emu <= 0 || height_emu <= 0 {
            return Err(DocxError::InvalidInput(format!(
                "image size must be positive, got {}x{} EMU",
                width_emu, height_emu
            )));
        }

        let file_name = match extension {
            Some(ext) => {
                if content_type_for_extension(ext) == "application/octet-stream" {
                    warn!(extension = ext, "unrecognized image extension");
                }
                format!("image_{}.{}", id, ext)
            }
            None => format!("image_{}", id),
        };

        let drawing = InlineImage {
            rel_id: format!("rId{}", id),
            doc_pr_id: id.parse().unwrap_or(1),
            name: format!("Picture {}", id),
            width_emu,
            height_emu,
        }
        .to_xml();

        Ok(Self {
            id: id.to_string(),
            media_path: format!("{}/{}", MEDIA_DIR, file_name),
            bytes,
            drawing,
        })
    }

    /// Read the image from disk
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        id: &str,
        width_emu: i64,
        height_emu: i64,
    ) -> Result<Self> {
        let path = path.as_ref();
        if path.file_name().is_none() {
            return Err(DocxError::InvalidInput(format!(
                "image path has no file name: {}",
                path.display()
            )));
        }
        if !path.is_file() {
            return Err(DocxError::NotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let extension = path.extension().and_then(|e| e.to_str());
        Self::new(id, bytes, extension, width_emu, height_emu)
    }

    /// Path of the media part inside the package
    pub fn media_path(&self) -> &str {
        &self.media_path
    }

    /// Rendered drawing fragment
    pub fn drawing(&self) -> &str {
        &self.drawing
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(DocxError::InvalidInput(
            "image placeholder id cannot be empty".to_string(),
        ));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DocxError::InvalidInput(format!(
            "image placeholder id must be alphanumeric: {}",
            id
        )));
    }
    Ok(())
}

impl PartTransformer for ImageInsertion {
    fn transform(&self, _path: &str, text: &str) -> Result<String> {
        Ok(text.replace(&image_marker(&self.id), &self.drawing))
    }

    fn extra_parts(&self) -> Vec<ExtraPart> {
        vec![ExtraPart {
            path: self.media_path.clone(),
            contents: self.bytes.clone(),
        }]
    }
}
